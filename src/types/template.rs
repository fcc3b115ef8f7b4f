use std::collections::HashMap;
use std::fmt;

use super::error::{EvalError, StringTableError, TemplateArityError};
use super::value::Value;
use crate::parse::ParseError;

/// One piece of a parsed format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Literal(String),
    /// Zero-based argument index.
    Arg(usize),
}

/// A parsed Android-style format string such as `"%1$s to activate."`.
///
/// Supports positional (`%1$s`, `%2$d`) and sequential (`%s`, `%d`)
/// placeholders and `%%`. The arity is the highest argument index used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
    arity: usize,
}

impl Template {
    /// Parse a format string.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] on an unknown conversion or a dangling `%`.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let segments = crate::parse::parse_format(source)?;
        let arity = segments
            .iter()
            .filter_map(|s| match s {
                Segment::Arg(idx) => Some(idx + 1),
                Segment::Literal(_) => None,
            })
            .max()
            .unwrap_or(0);
        Ok(Self {
            source: source.to_owned(),
            segments,
            arity,
        })
    }

    /// Number of arguments this template expects.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Substitute `args` into the template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateArityError`] if `args.len()` differs from [`arity()`](Self::arity).
    pub fn render(&self, name: &str, args: &[Value]) -> Result<String, TemplateArityError> {
        if args.len() != self.arity {
            return Err(TemplateArityError {
                template: name.to_owned(),
                expected: self.arity,
                actual: args.len(),
            });
        }
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Arg(idx) => {
                    if let Some(arg) = args.get(*idx) {
                        out.push_str(&arg.to_text());
                    }
                }
            }
        }
        Ok(out)
    }
}

/// A reference to a string resource, written `@string/<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateRef {
    name: String,
}

impl TemplateRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Parse a bare `@string/<name>` reference with no arguments.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let name = text.trim().strip_prefix("@string/")?;
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        valid.then(|| Self::new(name))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@string/{}", self.name)
    }
}

/// Localized string resources keyed by template name.
#[derive(Debug, Clone, Default)]
pub struct StringTable {
    templates: HashMap<String, Template>,
}

impl StringTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a template.
    ///
    /// # Errors
    ///
    /// Returns [`StringTableError::Format`] if `format` does not parse.
    pub fn insert(&mut self, name: &str, format: &str) -> Result<(), StringTableError> {
        let template = Template::parse(format).map_err(|source| StringTableError::Format {
            name: name.to_owned(),
            source,
        })?;
        self.templates.insert(name.to_owned(), template);
        Ok(())
    }

    /// Builder form of [`insert()`](Self::insert).
    ///
    /// # Errors
    ///
    /// Returns [`StringTableError::Format`] if `format` does not parse.
    pub fn with(mut self, name: &str, format: &str) -> Result<Self, StringTableError> {
        self.insert(name, format)?;
        Ok(self)
    }

    /// Load a JSON object mapping template names to format strings.
    ///
    /// # Errors
    ///
    /// Returns [`StringTableError`] on malformed JSON or an invalid format string.
    pub fn from_json(input: &str) -> Result<Self, StringTableError> {
        let raw: HashMap<String, String> = serde_json::from_str(input)?;
        let mut table = Self::new();
        for (name, format) in &raw {
            table.insert(name, format)?;
        }
        tracing::debug!(templates = table.len(), "loaded string table");
        Ok(table)
    }

    /// Read a JSON string table from disk.
    ///
    /// # Errors
    ///
    /// Returns [`HintError`](crate::HintError) on I/O or load failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::HintError> {
        let input = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&input)?)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Resolve `name` and substitute `args`.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::MissingTemplate`] for an unknown name and
    /// [`EvalError::TemplateArity`] on an argument count mismatch.
    pub fn resolve(&self, name: &str, args: &[Value]) -> Result<String, EvalError> {
        let template = self.get(name).ok_or_else(|| EvalError::MissingTemplate {
            name: name.to_owned(),
        })?;
        Ok(template.render(name, args)?)
    }
}
