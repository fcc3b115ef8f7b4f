use winnow::combinator::{alt, cut_err, delimited, opt, preceded, repeat, separated, terminated};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use crate::{CompareOp, Expr};

// -- Whitespace & identifiers -----------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

fn path_segments(input: &mut &str) -> ModalResult<()> {
    repeat(1.., ('.', ident)).parse_next(input)
}

// -- Primaries --------------------------------------------------------------

fn quoted(input: &mut &str) -> ModalResult<String> {
    let quote = alt(('\'', '"')).parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = cut_err(any)
            .context(StrContext::Expected(StrContextValue::CharLiteral(quote)))
            .parse_next(input)?;
        match ch {
            c if c == quote => return Ok(s),
            '\\' => {
                let esc = cut_err(any).parse_next(input)?;
                match esc {
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => s.push(other),
                }
            }
            c => s.push(c),
        }
    }
}

fn field_path(input: &mut &str) -> ModalResult<Expr> {
    '$'.parse_next(input)?;
    let path = cut_err((ident, path_segments).take())
        .context(StrContext::Expected(StrContextValue::Description(
            "field path such as $node.isEnabled",
        )))
        .parse_next(input)?;
    Ok(Expr::Field(path.to_owned()))
}

fn rule_ref(input: &mut &str) -> ModalResult<Expr> {
    let name = preceded(
        '%',
        cut_err(ident).context(StrContext::Expected(StrContextValue::Description(
            "rule name",
        ))),
    )
    .parse_next(input)?;
    Ok(Expr::RuleRef(name.to_owned()))
}

fn arg_list(input: &mut &str) -> ModalResult<Vec<Expr>> {
    ws.parse_next(input)?;
    if input.starts_with(')') {
        return Ok(Vec::new());
    }
    separated(1.., expr, (ws, ',')).parse_next(input)
}

fn template_call(input: &mut &str) -> ModalResult<Expr> {
    "@string/".parse_next(input)?;
    let name = cut_err(ident)
        .context(StrContext::Expected(StrContextValue::Description(
            "template name",
        )))
        .parse_next(input)?;
    let args = opt(preceded((ws, '('), cut_err(terminated(arg_list, (ws, ')')))))
        .parse_next(input)?;
    Ok(Expr::Template {
        name: name.to_owned(),
        args: args.unwrap_or_default(),
    })
}

/// `true`, `false` and `conditionalPrependWithSpaceSeparator(prefix, value)`.
fn keyword(input: &mut &str) -> ModalResult<Expr> {
    let checkpoint = input.checkpoint();
    let word = ident.parse_next(input)?;
    match word {
        "true" => Ok(Expr::Bool(true)),
        "false" => Ok(Expr::Bool(false)),
        "conditionalPrependWithSpaceSeparator" => {
            let (prefix, value) = cut_err(delimited(
                (ws, '('),
                (expr, preceded((ws, ','), expr)),
                (ws, ')'),
            ))
            .parse_next(input)?;
            Ok(Expr::ConditionalPrepend {
                prefix: Box::new(prefix),
                value: Box::new(value),
            })
        }
        _ => {
            input.reset(&checkpoint);
            Err(ErrMode::from_input(input))
        }
    }
}

fn primary(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    alt((
        delimited('(', cut_err(expr), cut_err((ws, ')'))),
        field_path,
        rule_ref,
        template_call,
        quoted.map(Expr::Text),
        keyword,
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "expression",
    )))
    .parse_next(input)
}

// -- Operators (precedence: || < && < ==/!= < ! < primary) -------------------

fn unary(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    if opt('!').parse_next(input)?.is_some() {
        let inner = cut_err(unary).parse_next(input)?;
        Ok(Expr::Not(Box::new(inner)))
    } else {
        primary(input)
    }
}

fn compare_op(input: &mut &str) -> ModalResult<CompareOp> {
    ws.parse_next(input)?;
    alt(("==".value(CompareOp::Eq), "!=".value(CompareOp::Neq))).parse_next(input)
}

fn comparison(input: &mut &str) -> ModalResult<Expr> {
    let left = unary(input)?;
    match opt(compare_op).parse_next(input)? {
        Some(op) => {
            let right = cut_err(unary).parse_next(input)?;
            Ok(Expr::Compare {
                left: Box::new(left),
                op,
                right: Box::new(right),
            })
        }
        None => Ok(left),
    }
}

fn and_expr(input: &mut &str) -> ModalResult<Expr> {
    let first = comparison(input)?;
    let rest: Vec<Expr> =
        repeat(0.., preceded((ws, "&&"), cut_err(comparison))).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, r| Expr::And(Box::new(acc), Box::new(r))))
}

fn or_expr(input: &mut &str) -> ModalResult<Expr> {
    let first = and_expr(input)?;
    let rest: Vec<Expr> =
        repeat(0.., preceded((ws, "||"), cut_err(and_expr))).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, r| Expr::Or(Box::new(acc), Box::new(r))))
}

fn expr(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    or_expr(input)
}

/// A complete inline expression, surrounding whitespace allowed.
pub(crate) fn expression(input: &mut &str) -> ModalResult<Expr> {
    let e = expr(input)?;
    ws.parse_next(input)?;
    Ok(e)
}

// -- Android format strings -------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Piece<'i> {
    Literal(&'i str),
    /// `%%`
    Percent,
    /// `%N$s`, one-based.
    Positional(usize),
    /// `%s`
    Sequential,
}

fn arg_index(input: &mut &str) -> ModalResult<usize> {
    take_while(1.., |c: char| c.is_ascii_digit())
        .try_map(str::parse::<usize>)
        .verify(|n: &usize| *n >= 1)
        .parse_next(input)
}

fn conversion_char(input: &mut &str) -> ModalResult<char> {
    alt(('s', 'd'))
        .context(StrContext::Expected(StrContextValue::Description(
            "conversion 's' or 'd'",
        )))
        .parse_next(input)
}

fn conversion<'i>(input: &mut &'i str) -> ModalResult<Piece<'i>> {
    alt((
        '%'.value(Piece::Percent),
        (arg_index, '$', conversion_char).map(|(n, _, _)| Piece::Positional(n)),
        conversion_char.value(Piece::Sequential),
    ))
    .parse_next(input)
}

fn piece<'i>(input: &mut &'i str) -> ModalResult<Piece<'i>> {
    alt((
        take_while(1.., |c: char| c != '%').map(Piece::Literal),
        preceded('%', cut_err(conversion)),
    ))
    .parse_next(input)
}

pub(crate) fn format_string<'i>(input: &mut &'i str) -> ModalResult<Vec<Piece<'i>>> {
    repeat(0.., piece).parse_next(input)
}
