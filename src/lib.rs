//! Rule-driven spoken hints for switch-access navigation.
//!
//! A JSON rule document is compiled into a [`RuleGraph`], bound to a
//! [`StringTable`] of format templates, and evaluated against a focused
//! accessibility node through [`HintEngine`].

pub mod config;
pub mod parse;
#[cfg(feature = "binary-cache")]
pub mod serial;

mod compile;
mod engine;
mod error;
mod evaluate;
mod types;

pub use engine::{HintEngine, HINT_ENTRY_RULE};
pub use error::HintError;
pub use types::{
    conditional_prepend, fallback, field, for_each_child, for_reference, join, rule_ref, switch,
    template, text, ActionField, ActionId, ActionInfo, CompareOp, Context, EvalError,
    EvaluationReport, EventTable, Expr, FeedbackDescriptor, FeedbackError, FieldKind, FieldPath,
    GlobalFlags, NodeField, NodeProvider, NodeSnapshot, QueueMode, Rule, RuleGraph,
    RuleGraphBuilder, RuleGraphError, SpeechOutput, StaleContextError, StringTable,
    StringTableError, Template, TemplateArityError, TemplateRef, UnknownEventError, Utterance,
    Value,
};
