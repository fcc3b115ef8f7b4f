use std::collections::BTreeMap;

use crate::{FeedbackDescriptor, Rule};

/// The result of reading a rule document, before compilation.
#[derive(Debug)]
pub struct ParsedDocument {
    /// Named rules in document order.
    pub rules: Vec<Rule>,
    pub events: BTreeMap<String, FeedbackDescriptor>,
}
