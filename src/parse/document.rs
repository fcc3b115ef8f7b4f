use std::collections::BTreeMap;
use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::parser::ParsedDocument;
use crate::config::{MAX_DOCUMENT_SIZE, MAX_NESTING_DEPTH};
use crate::{Expr, FeedbackDescriptor, QueueMode, Rule, RuleGraphError, TemplateRef};

const CONDITIONAL_PREPEND: &str = "conditionalPrependWithSpaceSeparator(";

/// Object entries in document order, duplicates kept.
#[derive(Debug, Default)]
struct Entries(Vec<(String, JsonValue)>);

impl<'de> Deserialize<'de> for Entries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Entries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Entries, A::Error> {
                let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, JsonValue>()? {
                    out.push(entry);
                }
                Ok(Entries(out))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    #[serde(default)]
    events: Entries,
    #[serde(default)]
    named_nodes: Entries,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RawEvent {
    tts_output: String,
    #[serde(default)]
    tts_queue_mode: QueueMode,
    #[serde(default)]
    tts_force_feedback: bool,
}

/// Read a JSON rule document into rules and events. Rule references, field
/// paths and templates are checked later, by compilation.
///
/// # Errors
///
/// Returns [`RuleGraphError`] for oversized or malformed JSON, invalid
/// events, and rule bodies that do not parse.
pub fn parse_document(input: &str) -> Result<ParsedDocument, RuleGraphError> {
    if input.len() > MAX_DOCUMENT_SIZE {
        return Err(RuleGraphError::DocumentTooLarge {
            size: input.len(),
            limit: MAX_DOCUMENT_SIZE,
        });
    }
    let raw: RawDocument = serde_json::from_str(input)?;

    let mut events = BTreeMap::new();
    for (name, value) in raw.events.0 {
        let descriptor = parse_event(&name, value)?;
        if events.insert(name.clone(), descriptor).is_some() {
            return Err(RuleGraphError::InvalidEvent {
                event: name,
                reason: "defined more than once".to_owned(),
            });
        }
    }

    let rules = raw
        .named_nodes
        .0
        .into_iter()
        .map(|(name, value)| {
            let body = to_expr(&name, &value, 1)?;
            Ok(Rule { name, body })
        })
        .collect::<Result<Vec<_>, RuleGraphError>>()?;

    Ok(ParsedDocument { rules, events })
}

fn parse_event(name: &str, value: JsonValue) -> Result<FeedbackDescriptor, RuleGraphError> {
    let raw: RawEvent = serde_json::from_value(value).map_err(|e| RuleGraphError::InvalidEvent {
        event: name.to_owned(),
        reason: e.to_string(),
    })?;
    let output = TemplateRef::parse(&raw.tts_output).ok_or_else(|| RuleGraphError::InvalidEvent {
        event: name.to_owned(),
        reason: format!(
            "ttsOutput must be a bare @string/<name> reference, found {:?}",
            raw.tts_output
        ),
    })?;
    Ok(FeedbackDescriptor::new(
        output,
        raw.tts_queue_mode,
        raw.tts_force_feedback,
    ))
}

/// Whether a JSON string is an inline expression rather than plain text.
pub(crate) fn is_expression(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with(['%', '$', '@', '!', '(', '\'', '"'])
        || trimmed.starts_with(CONDITIONAL_PREPEND)
}

/// Nesting depth of an inline expression: open parentheses plus any `!`
/// chain, ignoring quoted text.
fn inline_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut bangs = 0usize;
    let mut max = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in text.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '!' => bangs += 1,
            c if c.is_whitespace() => {}
            _ => bangs = 0,
        }
        max = max.max(depth + bangs);
    }
    max
}

fn malformed(rule: &str, reason: impl Into<String>) -> RuleGraphError {
    RuleGraphError::MalformedExpression {
        rule: rule.to_owned(),
        reason: reason.into(),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

fn to_expr(rule: &str, value: &JsonValue, depth: usize) -> Result<Expr, RuleGraphError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(malformed(
            rule,
            format!("nesting exceeds {MAX_NESTING_DEPTH} levels"),
        ));
    }
    match value {
        JsonValue::Bool(b) => Ok(Expr::Bool(*b)),
        JsonValue::String(text) => string_expr(rule, text, depth),
        JsonValue::Object(map) => object_expr(rule, map, depth),
        other => Err(malformed(
            rule,
            format!(
                "expected a string, boolean or object, found {}",
                json_kind(other)
            ),
        )),
    }
}

fn string_expr(rule: &str, text: &str, depth: usize) -> Result<Expr, RuleGraphError> {
    if !is_expression(text) {
        return Ok(Expr::Text(text.to_owned()));
    }
    if depth + inline_depth(text) > MAX_NESTING_DEPTH {
        return Err(malformed(
            rule,
            format!("nesting exceeds {MAX_NESTING_DEPTH} levels"),
        ));
    }
    super::parse_expression(text).map_err(|source| RuleGraphError::Syntax {
        rule: rule.to_owned(),
        source,
    })
}

fn check_keys(
    rule: &str,
    map: &serde_json::Map<String, JsonValue>,
    form: &str,
    allowed: &[&str],
) -> Result<(), RuleGraphError> {
    match map.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(extra) => Err(malformed(
            rule,
            format!("unexpected key '{extra}' in '{form}' expression"),
        )),
        None => Ok(()),
    }
}

fn required<'a>(
    rule: &str,
    map: &'a serde_json::Map<String, JsonValue>,
    form: &str,
    key: &str,
) -> Result<&'a JsonValue, RuleGraphError> {
    map.get(key)
        .ok_or_else(|| malformed(rule, format!("'{form}' expression is missing '{key}'")))
}

fn expr_list(
    rule: &str,
    value: &JsonValue,
    form: &str,
    depth: usize,
) -> Result<Vec<Expr>, RuleGraphError> {
    let JsonValue::Array(items) = value else {
        return Err(malformed(
            rule,
            format!("'{form}' expects an array, found {}", json_kind(value)),
        ));
    };
    items
        .iter()
        .map(|item| to_expr(rule, item, depth + 1))
        .collect()
}

fn field_path_arg(rule: &str, value: &JsonValue, form: &str) -> Result<String, RuleGraphError> {
    match value {
        JsonValue::String(path) if path.trim().starts_with('$') => {
            Ok(path.trim().trim_start_matches('$').to_owned())
        }
        other => Err(malformed(
            rule,
            format!(
                "'{form}' expects a field path such as \"$node.actions\", found {}",
                json_kind(other)
            ),
        )),
    }
}

fn object_expr(
    rule: &str,
    map: &serde_json::Map<String, JsonValue>,
    depth: usize,
) -> Result<Expr, RuleGraphError> {
    if map.contains_key("if") {
        check_keys(rule, map, "if", &["if", "then", "else"])?;
        let condition = to_expr(rule, required(rule, map, "if", "if")?, depth + 1)?;
        let then = to_expr(rule, required(rule, map, "if", "then")?, depth + 1)?;
        let otherwise = map
            .get("else")
            .map(|e| to_expr(rule, e, depth + 1))
            .transpose()?;
        return Ok(Expr::If {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: otherwise.map(Box::new),
        });
    }
    if let Some(items) = map.get("fallback") {
        check_keys(rule, map, "fallback", &["fallback"])?;
        return Ok(Expr::Fallback(expr_list(rule, items, "fallback", depth)?));
    }
    if let Some(items) = map.get("join") {
        check_keys(rule, map, "join", &["join", "separator"])?;
        let separator = match map.get("separator") {
            None => " ".to_owned(),
            Some(JsonValue::String(s)) => s.clone(),
            Some(other) => {
                return Err(malformed(
                    rule,
                    format!("'separator' must be a string, found {}", json_kind(other)),
                ))
            }
        };
        return Ok(Expr::Join {
            parts: expr_list(rule, items, "join", depth)?,
            separator,
        });
    }
    for form in ["for_each_child", "for_reference"] {
        if let Some(path) = map.get(form) {
            check_keys(rule, map, form, &[form, "evaluate"])?;
            let path = field_path_arg(rule, path, form)?;
            let body = Box::new(to_expr(
                rule,
                required(rule, map, form, "evaluate")?,
                depth + 1,
            )?);
            return Ok(if form == "for_each_child" {
                Expr::ForEachChild {
                    collection: path,
                    body,
                }
            } else {
                Expr::ForReference { field: path, body }
            });
        }
    }
    if let Some(key) = map.get("switch") {
        check_keys(rule, map, "switch", &["switch", "cases"])?;
        let key = to_expr(rule, key, depth + 1)?;
        let cases = match required(rule, map, "switch", "cases")? {
            JsonValue::Object(cases) => cases
                .iter()
                .map(|(case, body)| Ok((case.clone(), to_expr(rule, body, depth + 1)?)))
                .collect::<Result<BTreeMap<_, _>, RuleGraphError>>()?,
            other => {
                return Err(malformed(
                    rule,
                    format!("'cases' must be an object, found {}", json_kind(other)),
                ))
            }
        };
        return Ok(Expr::Switch {
            key: Box::new(key),
            cases,
        });
    }
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    Err(malformed(
        rule,
        format!("unrecognized expression with keys [{}]", keys.join(", ")),
    ))
}
