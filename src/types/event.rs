use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::UnknownEventError;
use super::template::TemplateRef;

/// Whether an announcement may be cut off by the next one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueMode {
    #[default]
    Interruptible,
    Uninterruptible,
}

/// How a named event is announced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackDescriptor {
    output: TemplateRef,
    queue_mode: QueueMode,
    force_feedback: bool,
}

impl FeedbackDescriptor {
    #[must_use]
    pub fn new(output: TemplateRef, queue_mode: QueueMode, force_feedback: bool) -> Self {
        Self {
            output,
            queue_mode,
            force_feedback,
        }
    }

    #[must_use]
    pub fn output(&self) -> &TemplateRef {
        &self.output
    }

    #[must_use]
    pub fn queue_mode(&self) -> QueueMode {
        self.queue_mode
    }

    /// Speak even when the user has muted non-essential feedback.
    #[must_use]
    pub fn force_feedback(&self) -> bool {
        self.force_feedback
    }
}

/// Event name to feedback descriptor. Names iterate in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTable {
    events: BTreeMap<String, FeedbackDescriptor>,
}

impl EventTable {
    pub(crate) fn from_map(events: BTreeMap<String, FeedbackDescriptor>) -> Self {
        Self { events }
    }

    /// Look up an event by exact, case-sensitive name.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownEventError`] if no event has that name.
    pub fn lookup(&self, name: &str) -> Result<&FeedbackDescriptor, UnknownEventError> {
        self.events.get(name).ok_or_else(|| UnknownEventError {
            event: name.to_owned(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeedbackDescriptor)> {
        self.events.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Final text handed to the speech collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub queue_mode: QueueMode,
    pub force_feedback: bool,
}

/// Text-to-speech sink.
pub trait SpeechOutput {
    fn speak(&self, utterance: &Utterance);
}
