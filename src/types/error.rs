use thiserror::Error;

use super::field::FieldKind;
use crate::parse::ParseError;

/// Load-time failures. A graph that produces one of these is never built.
#[derive(Debug, Error)]
pub enum RuleGraphError {
    #[error("invalid rule document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rule document is {size} bytes, the limit is {limit}")]
    DocumentTooLarge { size: usize, limit: usize },

    #[error("syntax error in rule '{rule}': {source}")]
    Syntax { rule: String, source: ParseError },

    #[error("malformed expression in rule '{rule}': {reason}")]
    MalformedExpression { rule: String, reason: String },

    #[error("undefined rule reference '%{reference}' in rule '{rule}'")]
    UndefinedRuleRef { rule: String, reference: String },

    #[error("cyclic dependency detected: {}", path.join(" -> "))]
    CyclicDependency { path: Vec<String> },

    #[error("duplicate rule name '{name}'")]
    DuplicateRule { name: String },

    #[error("rule '{rule}' starts a reference chain of {depth} rules, the limit is {limit}")]
    ReferenceChainTooDeep {
        rule: String,
        depth: usize,
        limit: usize,
    },

    #[error("undefined field '${field}' in rule '{rule}'")]
    UndefinedField { rule: String, field: String },

    #[error("field '${field}' in rule '{rule}' is not {expected}")]
    FieldKindMismatch {
        rule: String,
        field: String,
        expected: FieldKind,
    },

    #[error("invalid event '{event}': {reason}")]
    InvalidEvent { event: String, reason: String },

    #[error("undefined template '@string/{template}' used by '{owner}'")]
    UndefinedTemplate { owner: String, template: String },

    #[error(
        "template '@string/{template}' used by '{owner}' expects {expected} argument(s), got {actual}"
    )]
    TemplateArity {
        owner: String,
        template: String,
        expected: usize,
        actual: usize,
    },
}

/// Failures loading a string table.
#[derive(Debug, Error)]
pub enum StringTableError {
    #[error("invalid string table: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid format string for '@string/{name}': {source}")]
    Format { name: String, source: ParseError },
}

/// The live node behind a context went away mid-evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("accessibility node is no longer available (reading '{field}')")]
pub struct StaleContextError {
    field: String,
}

impl StaleContextError {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("template '@string/{template}' expects {expected} argument(s), got {actual}")]
pub struct TemplateArityError {
    pub template: String,
    pub expected: usize,
    pub actual: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown feedback event '{event}'")]
pub struct UnknownEventError {
    pub event: String,
}

/// Recoverable failures while evaluating a rule. "No result" is not one of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Stale(#[from] StaleContextError),

    #[error(transparent)]
    TemplateArity(#[from] TemplateArityError),

    #[error("undefined template '@string/{name}'")]
    MissingTemplate { name: String },

    #[error("undefined rule '{name}'")]
    UndefinedRule { name: String },

    #[error("evaluation exceeded the step budget of {budget}")]
    StepBudgetExceeded { budget: usize },

    #[error("evaluation exceeded the nesting limit of {limit}")]
    DepthExceeded { limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedbackError {
    #[error(transparent)]
    UnknownEvent(#[from] UnknownEventError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
