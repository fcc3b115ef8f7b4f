mod document;
mod error;
mod grammar;
mod parser;

pub use error::ParseError;
pub use parser::ParsedDocument;

pub use document::parse_document;

use crate::types::Segment;
use crate::Expr;
use grammar::Piece;

/// Parse an inline expression such as `$node.role == 'pager' && %other`.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not a valid expression.
pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
    use winnow::Parser;
    grammar::expression
        .parse(input)
        .map_err(|e| ParseError::new(e.to_string()))
}

/// Parse an Android format string into literal and argument segments.
pub(crate) fn parse_format(input: &str) -> Result<Vec<Segment>, ParseError> {
    use winnow::Parser;
    let pieces = grammar::format_string
        .parse(input)
        .map_err(|e| ParseError::new(e.to_string()))?;

    let mut segments: Vec<Segment> = Vec::with_capacity(pieces.len());
    let mut next_sequential = 0;
    for piece in pieces {
        let segment = match piece {
            Piece::Literal(text) => Segment::Literal(text.to_owned()),
            Piece::Percent => Segment::Literal("%".to_owned()),
            Piece::Positional(n) => Segment::Arg(n - 1),
            Piece::Sequential => {
                next_sequential += 1;
                Segment::Arg(next_sequential - 1)
            }
        };
        match (segments.last_mut(), segment) {
            (Some(Segment::Literal(prev)), Segment::Literal(text)) => prev.push_str(&text),
            (_, segment) => segments.push(segment),
        }
    }
    Ok(segments)
}
