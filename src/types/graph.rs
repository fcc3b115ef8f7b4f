use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::error::RuleGraphError;
use super::event::{EventTable, FeedbackDescriptor};
use super::expr::{CompiledExpr, Expr};
use super::rule::{CompiledRule, Rule};

/// Builder for constructing a [`RuleGraph`] in code.
///
/// # Example
///
/// ```
/// use switch_access_hints::{RuleGraphBuilder, field, rule_ref, template};
///
/// let graph = RuleGraphBuilder::new()
///     .rule("switch_press_label", template("switch_press_select", vec![]))
///     .rule(
///         "get_hint_for_click",
///         field("node.isClickable").then(template(
///             "hint_clickable",
///             vec![rule_ref("switch_press_label")],
///         )),
///     )
///     .compile()
///     .unwrap();
/// assert_eq!(graph.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct RuleGraphBuilder {
    rules: Vec<Rule>,
    events: Vec<(String, FeedbackDescriptor)>,
}

impl RuleGraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a named rule.
    #[must_use]
    pub fn rule(mut self, name: &str, body: Expr) -> Self {
        self.rules.push(Rule {
            name: name.to_owned(),
            body,
        });
        self
    }

    /// Register a feedback event. A later registration of the same name wins.
    #[must_use]
    pub fn event(mut self, name: &str, descriptor: FeedbackDescriptor) -> Self {
        self.events.push((name.to_owned(), descriptor));
        self
    }

    /// Compile the rules into an immutable `RuleGraph`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleGraphError`] if validation fails.
    pub fn compile(self) -> Result<RuleGraph, RuleGraphError> {
        let events: BTreeMap<String, FeedbackDescriptor> = self.events.into_iter().collect();
        crate::compile::compile(&self.rules, events)
    }
}

/// A compiled, immutable rule graph plus its feedback event table.
///
/// Rules are stored in dependency order: every rule appears after the rules
/// it references. Thread-safe and designed to live behind `Arc`.
#[derive(Debug)]
pub struct RuleGraph {
    pub(crate) rules: Vec<CompiledRule>,
    pub(crate) rule_indices: HashMap<String, usize>,
    pub(crate) events: EventTable,
}

impl RuleGraph {
    /// Parse a JSON rule document and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`RuleGraphError`] on malformed JSON, a syntax error in an
    /// inline expression, or a validation failure.
    pub fn from_json(input: &str) -> Result<Self, RuleGraphError> {
        let parsed = crate::parse::parse_document(input)?;
        crate::compile::compile(&parsed.rules, parsed.events)
    }

    /// Read a JSON rule document from disk and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`HintError`](crate::HintError) on I/O or load failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::HintError> {
        let input = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&input)?)
    }

    /// Position of a named rule in dependency order.
    #[must_use]
    pub fn rule_index(&self, name: &str) -> Option<usize> {
        self.rule_indices.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rule_indices.contains_key(name)
    }

    /// Rule names in dependency order. Every dependency appears before the
    /// rule that references it.
    #[must_use]
    pub fn execution_order(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    /// Names of the rules a given rule references, in first-use order.
    ///
    /// Returns `None` if the rule name is not found.
    #[must_use]
    pub fn dependencies_of(&self, rule_name: &str) -> Option<Vec<&str>> {
        let idx = self.rule_index(rule_name)?;
        Some(
            self.rules[idx]
                .dependencies()
                .into_iter()
                .map(|dep| self.rules[dep].name.as_str())
                .collect(),
        )
    }

    #[must_use]
    pub fn events(&self) -> &EventTable {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Compile a free-standing expression against this graph's rules.
    pub(crate) fn compile_expr(&self, expr: &Expr) -> Result<CompiledExpr, RuleGraphError> {
        crate::compile::compile_expr(expr, "<expression>", &self.rule_indices)
    }
}

#[cfg(feature = "binary-cache")]
impl RuleGraph {
    /// Serialize this compiled graph to a byte vector.
    ///
    /// The optional `source_text` is hashed (BLAKE3) and embedded in the
    /// payload metadata so callers can detect a stale cache.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) if encoding fails.
    pub fn to_bytes(
        &self,
        source_text: Option<&str>,
    ) -> Result<Vec<u8>, crate::serial::SerializeError> {
        crate::serial::encode(self, source_text)
    }

    /// Deserialize a graph previously produced by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// format, integrity, or validation failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::serial::DeserializeError> {
        crate::serial::decode(bytes)
    }

    /// Serialize this graph and write it to a file.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) on
    /// encoding or I/O failure.
    pub fn to_binary_file(
        &self,
        path: impl AsRef<std::path::Path>,
        source_text: Option<&str>,
    ) -> Result<(), crate::serial::SerializeError> {
        let bytes = self.to_bytes(source_text)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Read a file and deserialize the graph it contains.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// I/O, format, integrity, or validation failure.
    pub fn from_binary_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, crate::serial::DeserializeError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for RuleGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuleGraph({} rules, {} events)",
            self.rules.len(),
            self.events.len(),
        )
    }
}
