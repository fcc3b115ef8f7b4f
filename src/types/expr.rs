use std::collections::BTreeMap;
use std::fmt;
use std::ops::Not;

use super::field::{FieldPath, NodeField};

/// Comparison operators supported in inline expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
}

impl CompareOp {
    /// Outcome when at least one operand has no result. Two absent operands
    /// are equal; absent and present are not.
    pub(crate) fn absent_result(self, both_absent: bool) -> bool {
        match self {
            CompareOp::Eq => both_absent,
            CompareOp::Neq => !both_absent,
        }
    }
}

/// User-facing rule expression. Field paths and rule names are strings.
/// Transformed into [`CompiledExpr`] during compilation.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Plain text.
    Text(String),
    /// A boolean constant.
    Bool(bool),
    /// `$scope.name`, stored without the `$`.
    Field(String),
    /// `%name`
    RuleRef(String),
    /// `@string/name(args...)`
    Template { name: String, args: Vec<Expr> },
    Compare {
        left: Box<Expr>,
        op: CompareOp,
        right: Box<Expr>,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    If {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Option<Box<Expr>>,
    },
    Fallback(Vec<Expr>),
    Join {
        parts: Vec<Expr>,
        separator: String,
    },
    ForEachChild {
        collection: String,
        body: Box<Expr>,
    },
    ForReference {
        field: String,
        body: Box<Expr>,
    },
    Switch {
        key: Box<Expr>,
        cases: BTreeMap<String, Expr>,
    },
    ConditionalPrepend {
        prefix: Box<Expr>,
        value: Box<Expr>,
    },
}

/// Compiled expression: field paths are resolved to typed [`FieldPath`]s and
/// rule references to their dependency-order index.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CompiledExpr {
    Text(String),
    Bool(bool),
    Field(FieldPath),
    RuleRef(usize),
    Template {
        name: String,
        args: Vec<CompiledExpr>,
    },
    Compare {
        left: Box<CompiledExpr>,
        op: CompareOp,
        right: Box<CompiledExpr>,
    },
    And(Box<CompiledExpr>, Box<CompiledExpr>),
    Or(Box<CompiledExpr>, Box<CompiledExpr>),
    Not(Box<CompiledExpr>),
    If {
        condition: Box<CompiledExpr>,
        then: Box<CompiledExpr>,
        otherwise: Option<Box<CompiledExpr>>,
    },
    Fallback(Vec<CompiledExpr>),
    Join {
        parts: Vec<CompiledExpr>,
        separator: String,
    },
    ForEachChild {
        collection: NodeField,
        body: Box<CompiledExpr>,
    },
    ForReference {
        field: NodeField,
        body: Box<CompiledExpr>,
    },
    Switch {
        key: Box<CompiledExpr>,
        cases: BTreeMap<String, CompiledExpr>,
    },
    ConditionalPrepend {
        prefix: Box<CompiledExpr>,
        value: Box<CompiledExpr>,
    },
}

impl CompiledExpr {
    /// Visit this expression and every sub-expression, parents first.
    pub(crate) fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a CompiledExpr)) {
        visit(self);
        match self {
            CompiledExpr::Text(_)
            | CompiledExpr::Bool(_)
            | CompiledExpr::Field(_)
            | CompiledExpr::RuleRef(_) => {}
            CompiledExpr::Template { args, .. } => args.iter().for_each(|a| a.walk(visit)),
            CompiledExpr::Fallback(items) | CompiledExpr::Join { parts: items, .. } => {
                items.iter().for_each(|e| e.walk(visit));
            }
            CompiledExpr::Compare { left, right, .. }
            | CompiledExpr::And(left, right)
            | CompiledExpr::Or(left, right)
            | CompiledExpr::ConditionalPrepend {
                prefix: left,
                value: right,
            } => {
                left.walk(visit);
                right.walk(visit);
            }
            CompiledExpr::Not(inner)
            | CompiledExpr::ForEachChild { body: inner, .. }
            | CompiledExpr::ForReference { body: inner, .. } => inner.walk(visit),
            CompiledExpr::If {
                condition,
                then,
                otherwise,
            } => {
                condition.walk(visit);
                then.walk(visit);
                if let Some(otherwise) = otherwise {
                    otherwise.walk(visit);
                }
            }
            CompiledExpr::Switch { key, cases } => {
                key.walk(visit);
                cases.values().for_each(|e| e.walk(visit));
            }
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Neq => write!(f, "!="),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Text(text) => write!(f, "'{}'", text.replace('\\', "\\\\").replace('\'', "\\'")),
            Expr::Bool(b) => write!(f, "{b}"),
            Expr::Field(path) => write!(f, "${path}"),
            Expr::RuleRef(name) => write!(f, "%{name}"),
            Expr::Template { name, args } => {
                write!(f, "@string/{name}")?;
                if !args.is_empty() {
                    write!(f, "(")?;
                    write_list(f, args)?;
                    write!(f, ")")?;
                }
                Ok(())
            }
            Expr::Compare { left, op, right } => write!(f, "({left} {op} {right})"),
            Expr::And(a, b) => write!(f, "({a} && {b})"),
            Expr::Or(a, b) => write!(f, "({a} || {b})"),
            Expr::Not(inner) => write!(f, "!{inner}"),
            Expr::If {
                condition,
                then,
                otherwise,
            } => {
                write!(f, "if {condition} then {then}")?;
                if let Some(otherwise) = otherwise {
                    write!(f, " else {otherwise}")?;
                }
                Ok(())
            }
            Expr::Fallback(items) => {
                write!(f, "fallback[")?;
                write_list(f, items)?;
                write!(f, "]")
            }
            Expr::Join { parts, separator } => {
                write!(f, "join[")?;
                write_list(f, parts)?;
                write!(f, "] by {separator:?}")
            }
            Expr::ForEachChild { collection, body } => {
                write!(f, "for_each_child ${collection} evaluate {body}")
            }
            Expr::ForReference { field, body } => {
                write!(f, "for_reference ${field} evaluate {body}")
            }
            Expr::Switch { key, cases } => {
                write!(f, "switch {key} {{")?;
                for (i, (case, expr)) in cases.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {case:?}: {expr}")?;
                }
                write!(f, " }}")
            }
            Expr::ConditionalPrepend { prefix, value } => {
                write!(f, "conditionalPrependWithSpaceSeparator({prefix}, {value})")
            }
        }
    }
}

impl Expr {
    #[must_use]
    pub fn and(self, other: Expr) -> Expr {
        Expr::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn or(self, other: Expr) -> Expr {
        Expr::Or(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn eq(self, other: Expr) -> Expr {
        Expr::Compare {
            left: Box::new(self),
            op: CompareOp::Eq,
            right: Box::new(other),
        }
    }

    #[must_use]
    pub fn neq(self, other: Expr) -> Expr {
        Expr::Compare {
            left: Box::new(self),
            op: CompareOp::Neq,
            right: Box::new(other),
        }
    }

    /// `if self then then_branch`
    #[must_use]
    pub fn then(self, then_branch: Expr) -> Expr {
        Expr::If {
            condition: Box::new(self),
            then: Box::new(then_branch),
            otherwise: None,
        }
    }

    /// Attach an else branch to an `if` expression. Any other expression is
    /// returned unchanged.
    #[must_use]
    pub fn otherwise(self, else_branch: Expr) -> Expr {
        match self {
            Expr::If {
                condition, then, ..
            } => Expr::If {
                condition,
                then,
                otherwise: Some(Box::new(else_branch)),
            },
            other => other,
        }
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}

/// `$path`, e.g. `field("node.isEnabled")`.
#[must_use]
pub fn field(path: &str) -> Expr {
    Expr::Field(path.trim_start_matches('$').to_owned())
}

/// `%name`
#[must_use]
pub fn rule_ref(name: &str) -> Expr {
    Expr::RuleRef(name.to_owned())
}

#[must_use]
pub fn text(value: &str) -> Expr {
    Expr::Text(value.to_owned())
}

/// `@string/name(args...)`
#[must_use]
pub fn template(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Template {
        name: name.to_owned(),
        args,
    }
}

#[must_use]
pub fn fallback(items: Vec<Expr>) -> Expr {
    Expr::Fallback(items)
}

/// Join with a single space.
#[must_use]
pub fn join(parts: Vec<Expr>) -> Expr {
    Expr::Join {
        parts,
        separator: " ".to_owned(),
    }
}

#[must_use]
pub fn for_each_child(collection: &str, body: Expr) -> Expr {
    Expr::ForEachChild {
        collection: collection.trim_start_matches('$').to_owned(),
        body: Box::new(body),
    }
}

#[must_use]
pub fn for_reference(field: &str, body: Expr) -> Expr {
    Expr::ForReference {
        field: field.trim_start_matches('$').to_owned(),
        body: Box::new(body),
    }
}

#[must_use]
pub fn switch<'a>(key: Expr, cases: impl IntoIterator<Item = (&'a str, Expr)>) -> Expr {
    Expr::Switch {
        key: Box::new(key),
        cases: cases
            .into_iter()
            .map(|(case, expr)| (case.to_owned(), expr))
            .collect(),
    }
}

#[must_use]
pub fn conditional_prepend(prefix: Expr, value: Expr) -> Expr {
    Expr::ConditionalPrepend {
        prefix: Box::new(prefix),
        value: Box::new(value),
    }
}
