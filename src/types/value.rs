use std::fmt;

use super::context::ActionInfo;
use super::expr::CompareOp;

/// Values produced and consumed during rule evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A boolean capability or flag.
    Bool(bool),
    /// A 64-bit signed integer (custom action ids).
    Int(i64),
    /// A UTF-8 string.
    String(String),
    /// A reference to one of the node's actions.
    Action(ActionInfo),
    /// An ordered list, produced by iteration or by list-valued node fields.
    List(Vec<Value>),
}

impl Value {
    /// Whether this value contributes no text. Empty strings and lists whose
    /// elements are all empty count as empty; everything else does not.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Value::String(s) => s.is_empty(),
            Value::List(items) => items.iter().all(Value::is_empty),
            Value::Bool(_) | Value::Int(_) | Value::Action(_) => false,
        }
    }

    /// Truthiness used in boolean position (`!`, `&&`, `||`, `if`).
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::String(s) => !s.is_empty(),
            Value::Action(_) => true,
            Value::List(items) => !items.is_empty(),
        }
    }

    /// The lookup key of this value in a `switch` case table.
    /// Actions and lists have no key form.
    #[must_use]
    pub fn as_key(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Action(_) | Value::List(_) => None,
        }
    }

    /// Compare this value to another. Values of different variants are never equal.
    #[must_use]
    pub fn compare(&self, op: CompareOp, other: &Value) -> bool {
        match op {
            CompareOp::Eq => self == other,
            CompareOp::Neq => self != other,
        }
    }

    /// Append the non-empty text pieces of this value to `out`. Lists are
    /// flattened so that each element is joined separately.
    pub(crate) fn push_text(&self, out: &mut Vec<String>) {
        match self {
            Value::List(items) => {
                for item in items {
                    item.push_text(out);
                }
            }
            other => {
                let text = other.to_string();
                if !text.is_empty() {
                    out.push(text);
                }
            }
        }
    }

    /// Render this value as spoken text.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<ActionInfo> for Value {
    fn from(v: ActionInfo) -> Self {
        Value::Action(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Action(action) => f.write_str(action.label().unwrap_or_default()),
            Value::List(_) => {
                let mut pieces = Vec::new();
                self.push_text(&mut pieces);
                f.write_str(&pieces.join(" "))
            }
        }
    }
}
