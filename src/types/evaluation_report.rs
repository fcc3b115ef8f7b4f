use std::fmt;
use std::time::Duration;

use super::value::Value;

/// Detailed evaluation report returned by
/// [`HintEngine::evaluate_detailed()`](crate::HintEngine::evaluate_detailed).
///
/// Contains the output, the named rules invoked in call order, the number of
/// evaluation steps taken, and the wall-clock duration of the evaluation.
#[derive(Debug, Clone)]
#[must_use]
pub struct EvaluationReport {
    output: Option<Value>,
    invoked: Vec<String>,
    steps: usize,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(
        output: Option<Value>,
        invoked: Vec<String>,
        steps: usize,
        duration: Duration,
    ) -> Self {
        Self {
            output,
            invoked,
            steps,
            duration,
        }
    }

    /// The evaluation output, same as [`HintEngine::evaluate()`](crate::HintEngine::evaluate).
    #[must_use]
    pub fn output(&self) -> Option<&Value> {
        self.output.as_ref()
    }

    /// The output rendered as text, or `None` if there was no result.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.output
            .as_ref()
            .map(Value::to_text)
            .filter(|s| !s.is_empty())
    }

    /// Names of the rules invoked, in call order. A rule appears once per call.
    #[must_use]
    pub fn invoked(&self) -> &[String] {
        &self.invoked
    }

    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Wall-clock duration of the evaluation.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text() {
            Some(text) => write!(f, "output: {text:?}")?,
            None => write!(f, "output: none")?,
        }
        write!(f, ", invoked: [{}]", self.invoked.join(", "))?;
        write!(f, ", steps: {}", self.steps)?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
