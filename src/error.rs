use thiserror::Error;

use crate::{EvalError, RuleGraphError, StringTableError};

/// Unified error type covering document loading, evaluation, and I/O.
///
/// Returned by convenience constructors like
/// [`HintEngine::from_files()`](crate::HintEngine::from_files) and
/// [`RuleGraph::from_file()`](crate::RuleGraph::from_file).
#[derive(Debug, Error)]
pub enum HintError {
    #[error(transparent)]
    Graph(#[from] RuleGraphError),

    #[error(transparent)]
    Strings(#[from] StringTableError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Serialize(#[from] crate::serial::SerializeError),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Deserialize(#[from] crate::serial::DeserializeError),
}
