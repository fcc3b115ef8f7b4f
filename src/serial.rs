//! Binary serialization and deserialization of compiled rule graphs.
//!
//! This module provides a stable binary format for persisting a compiled
//! [`RuleGraph`](crate::RuleGraph), skipping JSON parsing and validation at
//! service start. The format consists of a 32-byte fixed header followed by a
//! bincode-encoded payload.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"SWAH"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Engine version (u16, little-endian)
//! 8       4     Flags (u32, reserved)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! ## Versioning
//!
//! The format version in the header must match exactly. If it does not,
//! deserialization fails immediately with [`DeserializeError::IncompatibleVersion`].
//! The engine version is informational only.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CompiledExpr, CompiledRule};
use crate::{
    CompareOp, EventTable, FeedbackDescriptor, FieldKind, FieldPath, NodeField, QueueMode,
    RuleGraph, TemplateRef,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MAGIC: &[u8; 4] = b"SWAH";
const FORMAT_VERSION: u16 = 1;
const ENGINE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when serializing a [`RuleGraph`](crate::RuleGraph) to bytes.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to encode rule graph: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("rule graph payload is {0} bytes, larger than the format allows")]
    TooLarge(usize),

    #[error("I/O error during serialization: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when deserializing a [`RuleGraph`](crate::RuleGraph) from bytes.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not a hint rule graph binary: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: blob is v{blob}, engine supports v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("I/O error during deserialization: {0}")]
    Io(#[from] std::io::Error),
}

fn invalid(message: impl Into<String>) -> DeserializeError {
    DeserializeError::Validation(message.into())
}

// ---------------------------------------------------------------------------
// Serialized type hierarchy
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct SerializedGraph {
    metadata: GraphMetadata,
    rules: Vec<SerializedRule>,
    events: Vec<SerializedEvent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GraphMetadata {
    rule_count: usize,
    event_count: usize,
    source_digest: Option<[u8; 32]>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedRule {
    index: usize,
    name: String,
    body: SerializedExpr,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedEvent {
    name: String,
    template: String,
    queue_mode: QueueMode,
    force_feedback: bool,
}

/// Field paths are stored as text and re-resolved on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum SerializedExpr {
    Text(String),
    Bool(bool),
    Field(String),
    RuleRef(usize),
    Template {
        name: String,
        args: Vec<SerializedExpr>,
    },
    Compare {
        left: Box<SerializedExpr>,
        negated: bool,
        right: Box<SerializedExpr>,
    },
    And(Vec<SerializedExpr>),
    Or(Vec<SerializedExpr>),
    Not(Box<SerializedExpr>),
    If {
        condition: Box<SerializedExpr>,
        then: Box<SerializedExpr>,
        otherwise: Option<Box<SerializedExpr>>,
    },
    Fallback(Vec<SerializedExpr>),
    Join {
        parts: Vec<SerializedExpr>,
        separator: String,
    },
    ForEachChild {
        collection: String,
        body: Box<SerializedExpr>,
    },
    ForReference {
        field: String,
        body: Box<SerializedExpr>,
    },
    Switch {
        key: Box<SerializedExpr>,
        cases: Vec<(String, SerializedExpr)>,
    },
    ConditionalPrepend {
        prefix: Box<SerializedExpr>,
        value: Box<SerializedExpr>,
    },
}

// ---------------------------------------------------------------------------
// Expression flattening (binary -> n-ary)
// ---------------------------------------------------------------------------

fn flatten_all(items: &[CompiledExpr]) -> Vec<SerializedExpr> {
    items.iter().map(flatten_expr).collect()
}

fn flatten_boxed(expr: &CompiledExpr) -> Box<SerializedExpr> {
    Box::new(flatten_expr(expr))
}

fn flatten_expr(expr: &CompiledExpr) -> SerializedExpr {
    match expr {
        CompiledExpr::Text(text) => SerializedExpr::Text(text.clone()),
        CompiledExpr::Bool(b) => SerializedExpr::Bool(*b),
        CompiledExpr::Field(path) => SerializedExpr::Field(path.path()),
        CompiledExpr::RuleRef(idx) => SerializedExpr::RuleRef(*idx),
        CompiledExpr::Template { name, args } => SerializedExpr::Template {
            name: name.clone(),
            args: flatten_all(args),
        },
        CompiledExpr::Compare { left, op, right } => SerializedExpr::Compare {
            left: flatten_boxed(left),
            negated: *op == CompareOp::Neq,
            right: flatten_boxed(right),
        },
        CompiledExpr::And(_, _) => {
            let mut children = Vec::new();
            collect_and_children(expr, &mut children);
            SerializedExpr::And(children)
        }
        CompiledExpr::Or(_, _) => {
            let mut children = Vec::new();
            collect_or_children(expr, &mut children);
            SerializedExpr::Or(children)
        }
        CompiledExpr::Not(inner) => SerializedExpr::Not(flatten_boxed(inner)),
        CompiledExpr::If {
            condition,
            then,
            otherwise,
        } => SerializedExpr::If {
            condition: flatten_boxed(condition),
            then: flatten_boxed(then),
            otherwise: otherwise.as_deref().map(flatten_boxed),
        },
        CompiledExpr::Fallback(items) => SerializedExpr::Fallback(flatten_all(items)),
        CompiledExpr::Join { parts, separator } => SerializedExpr::Join {
            parts: flatten_all(parts),
            separator: separator.clone(),
        },
        CompiledExpr::ForEachChild { collection, body } => SerializedExpr::ForEachChild {
            collection: FieldPath::Node(*collection).path(),
            body: flatten_boxed(body),
        },
        CompiledExpr::ForReference { field, body } => SerializedExpr::ForReference {
            field: FieldPath::Node(*field).path(),
            body: flatten_boxed(body),
        },
        CompiledExpr::Switch { key, cases } => SerializedExpr::Switch {
            key: flatten_boxed(key),
            cases: cases
                .iter()
                .map(|(case, body)| (case.clone(), flatten_expr(body)))
                .collect(),
        },
        CompiledExpr::ConditionalPrepend { prefix, value } => SerializedExpr::ConditionalPrepend {
            prefix: flatten_boxed(prefix),
            value: flatten_boxed(value),
        },
    }
}

fn collect_and_children(expr: &CompiledExpr, out: &mut Vec<SerializedExpr>) {
    match expr {
        CompiledExpr::And(left, right) => {
            collect_and_children(left, out);
            collect_and_children(right, out);
        }
        other => out.push(flatten_expr(other)),
    }
}

fn collect_or_children(expr: &CompiledExpr, out: &mut Vec<SerializedExpr>) {
    match expr {
        CompiledExpr::Or(left, right) => {
            collect_or_children(left, out);
            collect_or_children(right, out);
        }
        other => out.push(flatten_expr(other)),
    }
}

// ---------------------------------------------------------------------------
// Expression unflattening (n-ary -> binary) with validation
// ---------------------------------------------------------------------------

/// Rebuilds compiled expressions for the rule at `current`, checking that
/// rule references point at earlier rules and that field paths resolve.
struct Unflattener {
    current: usize,
}

impl Unflattener {
    fn all(&self, items: Vec<SerializedExpr>) -> Result<Vec<CompiledExpr>, DeserializeError> {
        items.into_iter().map(|e| self.expr(e)).collect()
    }

    fn boxed(&self, expr: SerializedExpr) -> Result<Box<CompiledExpr>, DeserializeError> {
        self.expr(expr).map(Box::new)
    }

    fn chain(
        &self,
        children: Vec<SerializedExpr>,
        join: fn(Box<CompiledExpr>, Box<CompiledExpr>) -> CompiledExpr,
    ) -> Result<CompiledExpr, DeserializeError> {
        let mut iter = children.into_iter();
        let first = iter
            .next()
            .ok_or_else(|| invalid("empty And/Or expression"))?;
        let first = self.expr(first)?;
        iter.try_fold(first, |acc, child| -> Result<CompiledExpr, DeserializeError> {
            Ok(join(Box::new(acc), self.boxed(child)?))
        })
    }

    fn node_field(&self, path: &str, expected: FieldKind) -> Result<NodeField, DeserializeError> {
        match FieldPath::resolve(path) {
            Some(FieldPath::Node(field)) if field.kind() == expected => Ok(field),
            _ => Err(invalid(format!(
                "field '${path}' in rule {} is not {expected}",
                self.current
            ))),
        }
    }

    fn expr(&self, expr: SerializedExpr) -> Result<CompiledExpr, DeserializeError> {
        let compiled = match expr {
            SerializedExpr::Text(text) => CompiledExpr::Text(text),
            SerializedExpr::Bool(b) => CompiledExpr::Bool(b),
            SerializedExpr::Field(path) => {
                CompiledExpr::Field(FieldPath::resolve(&path).ok_or_else(|| {
                    invalid(format!("unknown field '${path}' in rule {}", self.current))
                })?)
            }
            SerializedExpr::RuleRef(idx) => {
                if idx >= self.current {
                    return Err(invalid(format!(
                        "rule ref {idx} violates dependency order (current rule index {})",
                        self.current
                    )));
                }
                CompiledExpr::RuleRef(idx)
            }
            SerializedExpr::Template { name, args } => CompiledExpr::Template {
                name,
                args: self.all(args)?,
            },
            SerializedExpr::Compare {
                left,
                negated,
                right,
            } => CompiledExpr::Compare {
                left: self.boxed(*left)?,
                op: if negated { CompareOp::Neq } else { CompareOp::Eq },
                right: self.boxed(*right)?,
            },
            SerializedExpr::And(children) => self.chain(children, CompiledExpr::And)?,
            SerializedExpr::Or(children) => self.chain(children, CompiledExpr::Or)?,
            SerializedExpr::Not(inner) => CompiledExpr::Not(self.boxed(*inner)?),
            SerializedExpr::If {
                condition,
                then,
                otherwise,
            } => CompiledExpr::If {
                condition: self.boxed(*condition)?,
                then: self.boxed(*then)?,
                otherwise: otherwise.map(|e| self.boxed(*e)).transpose()?,
            },
            SerializedExpr::Fallback(items) => CompiledExpr::Fallback(self.all(items)?),
            SerializedExpr::Join { parts, separator } => CompiledExpr::Join {
                parts: self.all(parts)?,
                separator,
            },
            SerializedExpr::ForEachChild { collection, body } => CompiledExpr::ForEachChild {
                collection: self.node_field(&collection, FieldKind::ActionList)?,
                body: self.boxed(*body)?,
            },
            SerializedExpr::ForReference { field, body } => CompiledExpr::ForReference {
                field: self.node_field(&field, FieldKind::ActionRef)?,
                body: self.boxed(*body)?,
            },
            SerializedExpr::Switch { key, cases } => CompiledExpr::Switch {
                key: self.boxed(*key)?,
                cases: cases
                    .into_iter()
                    .map(|(case, body)| Ok((case, self.expr(body)?)))
                    .collect::<Result<BTreeMap<_, _>, DeserializeError>>()?,
            },
            SerializedExpr::ConditionalPrepend { prefix, value } => {
                CompiledExpr::ConditionalPrepend {
                    prefix: self.boxed(*prefix)?,
                    value: self.boxed(*value)?,
                }
            }
        };
        Ok(compiled)
    }
}

// ---------------------------------------------------------------------------
// RuleGraph <-> SerializedGraph
// ---------------------------------------------------------------------------

fn graph_to_serialized(graph: &RuleGraph, source_text: Option<&str>) -> SerializedGraph {
    let source_digest = source_text.map(|s| *blake3::hash(s.as_bytes()).as_bytes());

    let rules: Vec<SerializedRule> = graph
        .rules
        .iter()
        .enumerate()
        .map(|(index, r)| SerializedRule {
            index,
            name: r.name.clone(),
            body: flatten_expr(&r.body),
        })
        .collect();

    let events: Vec<SerializedEvent> = graph
        .events
        .iter()
        .map(|(name, desc)| SerializedEvent {
            name: name.to_owned(),
            template: desc.output().name().to_owned(),
            queue_mode: desc.queue_mode(),
            force_feedback: desc.force_feedback(),
        })
        .collect();

    SerializedGraph {
        metadata: GraphMetadata {
            rule_count: rules.len(),
            event_count: events.len(),
            source_digest,
        },
        rules,
        events,
    }
}

fn serialized_to_graph(ser: SerializedGraph) -> Result<RuleGraph, DeserializeError> {
    if ser.metadata.rule_count != ser.rules.len() {
        return Err(invalid(format!(
            "metadata says {} rules but payload has {}",
            ser.metadata.rule_count,
            ser.rules.len()
        )));
    }
    if ser.metadata.event_count != ser.events.len() {
        return Err(invalid(format!(
            "metadata says {} events but payload has {}",
            ser.metadata.event_count,
            ser.events.len()
        )));
    }

    let mut names = HashSet::new();
    let mut rules = Vec::with_capacity(ser.rules.len());
    for (position, rule) in ser.rules.into_iter().enumerate() {
        if rule.index != position {
            return Err(invalid(format!(
                "rule '{}' has index {} at position {position}",
                rule.name, rule.index
            )));
        }
        if !names.insert(rule.name.clone()) {
            return Err(invalid(format!("duplicate rule name '{}'", rule.name)));
        }
        let body = Unflattener { current: position }.expr(rule.body)?;
        rules.push(CompiledRule {
            name: rule.name,
            body,
        });
    }

    let mut events = BTreeMap::new();
    for event in ser.events {
        let output = TemplateRef::parse(&format!("@string/{}", event.template))
            .ok_or_else(|| invalid(format!("event '{}' has an invalid template", event.name)))?;
        let descriptor = FeedbackDescriptor::new(output, event.queue_mode, event.force_feedback);
        if events.insert(event.name.clone(), descriptor).is_some() {
            return Err(invalid(format!("duplicate event '{}'", event.name)));
        }
    }

    crate::compile::check_reference_depth(&rules).map_err(|e| invalid(e.to_string()))?;

    let rule_indices: HashMap<String, usize> = rules
        .iter()
        .enumerate()
        .map(|(i, r)| (r.name.clone(), i))
        .collect();

    Ok(RuleGraph {
        rules,
        rule_indices,
        events: EventTable::from_map(events),
    })
}

// ---------------------------------------------------------------------------
// Header I/O
// ---------------------------------------------------------------------------

fn write_header(buf: &mut Vec<u8>, payload: &[u8], payload_len: u32) {
    let hash = blake3::hash(payload);

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&ENGINE_VERSION.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // flags (reserved)
    buf.extend_from_slice(&payload_len.to_le_bytes());
    buf.extend_from_slice(&hash.as_bytes()[..16]);
}

#[allow(clippy::cast_possible_truncation)] // HEADER_SIZE is 32, always fits in u32
fn read_header(bytes: &[u8]) -> Result<(u16, u32, [u8; 16]), DeserializeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DeserializeError::LengthMismatch {
            expected: HEADER_SIZE as u32,
            actual: bytes.len(),
        });
    }

    if &bytes[0..4] != MAGIC {
        return Err(DeserializeError::BadMagic);
    }

    let format_version = u16::from_le_bytes([bytes[4], bytes[5]]);
    // bytes[6..8] is engine_version, bytes[8..12] is flags
    let payload_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

    let mut hash = [0u8; 16];
    hash.copy_from_slice(&bytes[16..32]);

    Ok((format_version, payload_len, hash))
}

// ---------------------------------------------------------------------------
// Public encode/decode
// ---------------------------------------------------------------------------

pub(crate) fn encode(graph: &RuleGraph, source_text: Option<&str>) -> Result<Vec<u8>, SerializeError> {
    let serialized = graph_to_serialized(graph, source_text);
    let payload = bincode::serde::encode_to_vec(&serialized, bincode::config::standard())?;
    let payload_len =
        u32::try_from(payload.len()).map_err(|_| SerializeError::TooLarge(payload.len()))?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    write_header(&mut buf, &payload, payload_len);
    buf.extend_from_slice(&payload);
    tracing::debug!(bytes = buf.len(), rules = graph.len(), "encoded rule graph");
    Ok(buf)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<RuleGraph, DeserializeError> {
    let (format_version, payload_len, stored_hash) = read_header(bytes)?;

    if format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload = &bytes[HEADER_SIZE..];
    if usize::try_from(payload_len).ok() != Some(payload.len()) {
        return Err(DeserializeError::LengthMismatch {
            expected: payload_len,
            actual: payload.len(),
        });
    }

    let computed_hash = blake3::hash(payload);
    if computed_hash.as_bytes()[..16] != stored_hash {
        return Err(DeserializeError::ChecksumMismatch);
    }

    let (serialized, _): (SerializedGraph, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;

    serialized_to_graph(serialized)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(field: NodeField) -> CompiledExpr {
        CompiledExpr::Field(FieldPath::Node(field))
    }

    #[test]
    fn flatten_chained_and() {
        // And(And(a, b), c) -> And([a, b, c])
        let expr = CompiledExpr::And(
            Box::new(CompiledExpr::And(
                Box::new(flag(NodeField::IsEnabled)),
                Box::new(flag(NodeField::IsClickable)),
            )),
            Box::new(flag(NodeField::IsCheckable)),
        );
        let flat = flatten_expr(&expr);
        match &flat {
            SerializedExpr::And(children) => assert_eq!(children.len(), 3),
            other => panic!("expected And with 3 children, got {other:?}"),
        }
        let restored = Unflattener { current: 0 }.expr(flat).unwrap();
        assert_eq!(restored, expr);
    }

    #[test]
    fn flatten_mixed_and_or_stops_at_boundary() {
        let expr = CompiledExpr::And(
            Box::new(CompiledExpr::Or(
                Box::new(flag(NodeField::IsEnabled)),
                Box::new(flag(NodeField::IsClickable)),
            )),
            Box::new(flag(NodeField::IsChecked)),
        );
        match flatten_expr(&expr) {
            SerializedExpr::And(children) => {
                assert_eq!(children.len(), 2);
                assert!(matches!(&children[0], SerializedExpr::Or(inner) if inner.len() == 2));
            }
            other => panic!("expected And with 2 children, got {other:?}"),
        }
    }

    #[test]
    fn iteration_fields_survive_round_trip() {
        let expr = CompiledExpr::ForEachChild {
            collection: NodeField::CustomActions,
            body: Box::new(CompiledExpr::Switch {
                key: Box::new(CompiledExpr::Field(FieldPath::resolve("action.id").unwrap())),
                cases: BTreeMap::from([("ACTION_EXPAND".to_owned(), CompiledExpr::RuleRef(0))]),
            }),
        };
        let restored = Unflattener { current: 1 }.expr(flatten_expr(&expr)).unwrap();
        assert_eq!(restored, expr);
    }

    #[test]
    fn unflatten_single_child_unwraps() {
        let wrapped = SerializedExpr::And(vec![SerializedExpr::RuleRef(0)]);
        let result = Unflattener { current: 1 }.expr(wrapped).unwrap();
        assert_eq!(result, CompiledExpr::RuleRef(0));
    }

    #[test]
    fn empty_and_rejected() {
        let result = Unflattener { current: 0 }.expr(SerializedExpr::Or(vec![]));
        assert!(matches!(result, Err(DeserializeError::Validation(_))));
    }

    #[test]
    fn forward_rule_ref_rejected() {
        let result = Unflattener { current: 1 }.expr(SerializedExpr::RuleRef(1));
        assert!(matches!(result, Err(DeserializeError::Validation(_))));
    }

    #[test]
    fn unknown_field_rejected() {
        let result = Unflattener { current: 0 }.expr(SerializedExpr::Field("node.bogus".into()));
        assert!(matches!(result, Err(DeserializeError::Validation(_))));
    }

    #[test]
    fn iteration_over_flag_rejected() {
        let result = Unflattener { current: 0 }.expr(SerializedExpr::ForEachChild {
            collection: "node.isEnabled".into(),
            body: Box::new(SerializedExpr::Bool(true)),
        });
        assert!(matches!(result, Err(DeserializeError::Validation(_))));
    }

    #[test]
    fn header_round_trip() {
        let payload = b"test payload data";
        let mut buf = Vec::new();
        write_header(&mut buf, payload, payload.len() as u32);
        assert_eq!(buf.len(), HEADER_SIZE);

        let (format_version, payload_len, hash) = read_header(&buf).unwrap();
        assert_eq!(format_version, FORMAT_VERSION);
        assert_eq!(payload_len as usize, payload.len());
        assert_eq!(&hash, &blake3::hash(payload).as_bytes()[..16]);
    }

    #[test]
    fn header_bad_magic() {
        let mut buf = vec![0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(b"OORO");
        assert!(matches!(read_header(&buf), Err(DeserializeError::BadMagic)));
    }

    #[test]
    fn header_too_short() {
        assert!(matches!(
            read_header(&[0u8; 10]),
            Err(DeserializeError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn metadata_mismatch_rejected() {
        let ser = SerializedGraph {
            metadata: GraphMetadata {
                rule_count: 2,
                event_count: 0,
                source_digest: None,
            },
            rules: vec![],
            events: vec![],
        };
        assert!(matches!(
            serialized_to_graph(ser),
            Err(DeserializeError::Validation(_))
        ));
    }

    #[test]
    fn overlong_reference_chain_rejected() {
        let len = crate::config::MAX_REFERENCE_DEPTH + 1;
        let rules = (0..len)
            .map(|i| SerializedRule {
                index: i,
                name: format!("r{i}"),
                body: match i {
                    0 => SerializedExpr::Bool(true),
                    _ => SerializedExpr::RuleRef(i - 1),
                },
            })
            .collect();
        let ser = SerializedGraph {
            metadata: GraphMetadata {
                rule_count: len,
                event_count: 0,
                source_digest: None,
            },
            rules,
            events: vec![],
        };
        match serialized_to_graph(ser) {
            Err(DeserializeError::Validation(message)) => {
                assert!(message.contains("reference chain"), "{message}");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
