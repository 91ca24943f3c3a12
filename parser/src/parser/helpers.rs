//! Parsing helpers.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1, take_while_m_n},
    character::complete::char as tag_char,
    combinator::{not, peek, recognize},
    error::context,
    multi::many0,
    sequence::{delimited, preceded, terminated, tuple},
    Err as NomErr, Parser as _,
};

use crate::{Context, Error, ErrorKind, InputSpan, NomResult};

/// Words that cannot be used as variable, field or function names.
const RESERVED_WORDS: &[&str] = &[
    "for", "return", "true", "false", "TRUE", "FALSE", "and", "AND", "or", "OR",
];

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whitespace and comments.
pub(super) fn ws(input: InputSpan<'_>) -> NomResult<'_, InputSpan<'_>> {
    fn long_comment_body(input: InputSpan<'_>) -> NomResult<'_, InputSpan<'_>> {
        take_until::<_, _, Error>("*/")(input)
            .map_err(|_| NomErr::Failure(ErrorKind::UnfinishedComment.with_span(&input)))
    }

    let comment = preceded(tag("//"), take_while(|c: char| c != '\n'));
    let long_comment = delimited(tag("/*"), long_comment_body, tag("*/"));
    let ws_line = alt((
        take_while1(|c: char| c.is_ascii_whitespace()),
        comment,
        long_comment,
    ));
    recognize(many0(ws_line)).parse(input)
}

/// Keyword, e.g., `for`. Unlike `tag`, does not match a prefix of a longer name
/// (e.g., `format`).
pub(super) fn keyword<'a>(
    word: &'static str,
) -> impl FnMut(InputSpan<'a>) -> NomResult<'a, InputSpan<'a>> {
    terminated(tag(word), peek(not(take_while_m_n(1, 1, is_name_char))))
}

fn raw_name(input: InputSpan<'_>) -> NomResult<'_, InputSpan<'_>> {
    recognize(tuple((
        take_while_m_n(1, 1, is_name_start),
        take_while(is_name_char),
    )))(input)
}

/// Variable, field or function name, like `a_foo`, `Bar` or `$x`.
pub(super) fn var_name(input: InputSpan<'_>) -> NomResult<'_, InputSpan<'_>> {
    let (rest, name) = context(Context::Var.to_str(), raw_name)(input)?;

    if RESERVED_WORDS.contains(name.fragment()) {
        Err(NomErr::Error(ErrorKind::ReservedWord.with_span(&name)))
    } else {
        Ok((rest, name))
    }
}

/// Checks if the provided string is a valid variable name.
pub fn is_valid_variable_name(name: &str) -> bool {
    if name.is_empty() || !name.is_ascii() {
        return false;
    }

    match var_name(InputSpan::new(name)) {
        Ok((rest, _)) => rest.fragment().is_empty(),
        Err(_) => false,
    }
}

pub(super) fn comma_sep(input: InputSpan<'_>) -> NomResult<'_, char> {
    delimited(ws, tag_char(','), ws).parse(input)
}

/// Semicolon separating assignments.
pub(super) fn semicolon_sep(input: InputSpan<'_>) -> NomResult<'_, char> {
    delimited(ws, tag_char(';'), ws).parse(input)
}

/// Assignment operator `=` (not to be confused with `==`).
pub(super) fn assign_op(input: InputSpan<'_>) -> NomResult<'_, char> {
    terminated(tag_char('='), peek(not(tag_char('=')))).parse(input)
}
