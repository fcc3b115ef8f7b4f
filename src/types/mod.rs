mod context;
mod error;
mod evaluation_report;
mod event;
mod expr;
mod field;
mod graph;
mod rule;
mod template;
mod value;

pub use context::{ActionId, ActionInfo, Context, GlobalFlags, NodeProvider, NodeSnapshot};
pub use error::{
    EvalError, FeedbackError, RuleGraphError, StaleContextError, StringTableError,
    TemplateArityError, UnknownEventError,
};
pub use evaluation_report::EvaluationReport;
pub use event::{EventTable, FeedbackDescriptor, QueueMode, SpeechOutput, Utterance};
pub use expr::{
    conditional_prepend, fallback, field, for_each_child, for_reference, join, rule_ref, switch,
    template, text, CompareOp, Expr,
};
pub use field::{ActionField, FieldKind, FieldPath, NodeField};
pub use graph::{RuleGraph, RuleGraphBuilder};
pub use rule::Rule;
pub use template::{StringTable, Template, TemplateRef};
pub use value::Value;

pub(crate) use expr::CompiledExpr;
pub(crate) use rule::CompiledRule;
pub(crate) use template::Segment;
