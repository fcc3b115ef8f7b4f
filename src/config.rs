//! Limits applied while loading and evaluating rule documents.
//!
//! These are compile-time constants. The step budget can be overridden per
//! engine with [`HintEngine::with_step_budget`](crate::HintEngine::with_step_budget).

/// Maximum rule document size in bytes (1 MiB).
///
/// The bundled SwitchAccess document is a few kilobytes.
pub const MAX_DOCUMENT_SIZE: usize = 1 << 20;

/// Maximum nesting depth of a single rule expression, counting JSON objects,
/// parentheses and `!` chains in inline expressions.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Default number of evaluation steps allowed per request. One step is one
/// expression node visited, including each iteration of a `for_each_child` body.
pub const DEFAULT_STEP_BUDGET: usize = 10_000;

/// Maximum number of rules on a single `%reference` chain, counting the rule
/// that starts it. Longer chains are rejected when the graph is built.
pub const MAX_REFERENCE_DEPTH: usize = 32;

/// Maximum evaluation nesting depth, counting every expression node on the
/// current path including those reached through rule references.
///
/// Kept well below what a 2 MiB thread stack holds in a debug build.
pub const MAX_EVAL_DEPTH: usize = 256;
