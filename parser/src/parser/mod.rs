//! Parsers implemented with the help of `nom`.

use nom::{
    branch::alt,
    character::complete::char as tag_char,
    combinator::{cut, map, opt},
    error::context,
    multi::{separated_list0, separated_list1},
    sequence::{delimited, preceded, terminated, tuple},
    Err as NomErr, Slice,
};

mod expr;
mod helpers;
#[cfg(test)]
mod tests;

pub use self::helpers::is_valid_variable_name;
use self::{
    expr::{expr, logical},
    helpers::{assign_op, comma_sep, semicolon_sep, var_name, ws},
};
use crate::{
    Assignment, Context, Error, ErrorKind, Expr, FnDeclaration, Formula, InputSpan, Logical,
    NomResult,
};

/// Assignment to a variable, e.g., `x = 1 + y`.
fn assignment(input: InputSpan<'_>) -> NomResult<'_, Assignment> {
    let parser = tuple((
        var_name,
        preceded(delimited(ws, assign_op, ws), cut(expr)),
    ));
    let parser = map(parser, |(name, value)| {
        Assignment::new(*name.fragment(), value)
    });
    context(Context::Assignment.to_str(), parser)(input)
}

/// Function declaration, e.g., `f(x, y) = x * y`.
fn fn_declaration(input: InputSpan<'_>) -> NomResult<'_, FnDeclaration> {
    let params = delimited(
        terminated(tag_char('('), ws),
        separated_list0(comma_sep, var_name),
        preceded(ws, tag_char(')')),
    );
    let parser = tuple((
        var_name,
        preceded(ws, params),
        preceded(delimited(ws, assign_op, ws), cut(expr)),
    ));
    let parser = map(parser, |(name, params, body)| FnDeclaration {
        name: (*name.fragment()).to_owned(),
        params: params
            .into_iter()
            .map(|param| (*param.fragment()).to_owned())
            .collect(),
        body,
    });
    context(Context::Fn.to_str(), parser)(input)
}

/// Either a single function declaration or a list of `;`-separated assignments.
/// A trailing `;` is allowed in both cases.
fn formula(input: InputSpan<'_>) -> NomResult<'_, Formula> {
    alt((
        map(
            terminated(fn_declaration, opt(semicolon_sep)),
            Formula::Function,
        ),
        map(
            terminated(separated_list1(semicolon_sep, assignment), opt(semicolon_sep)),
            Formula::Assignments,
        ),
    ))(input)
}

fn check_ascii(input: InputSpan<'_>) -> Result<(), Error> {
    match input.fragment().char_indices().find(|(_, c)| !c.is_ascii()) {
        Some((pos, c)) => {
            let span = input.slice(pos..pos + c.len_utf8());
            Err(ErrorKind::NonAsciiInput.with_span(&span))
        }
        None => Ok(()),
    }
}

/// Runs `parser` on the complete input surrounded by optional whitespace and comments.
fn parse_complete<'a, T>(
    input: InputSpan<'a>,
    parser: impl FnMut(InputSpan<'a>) -> NomResult<'a, T>,
) -> Result<T, Error> {
    delimited(ws, parser, ws)(input)
        .map_err(|err| match err {
            NomErr::Failure(err) | NomErr::Error(err) => err,
            NomErr::Incomplete(_) => ErrorKind::UnexpectedTerm { context: None }.with_span(&input),
        })
        .and_then(|(remaining, parsed)| {
            if remaining.fragment().is_empty() {
                Ok(parsed)
            } else {
                Err(ErrorKind::Leftovers.with_span(&remaining))
            }
        })
}

/// Parses a formula.
///
/// # Errors
///
/// Returns an error if the source is not in ASCII, contains no assignments, or does not
/// conform to the formula grammar.
///
/// # Examples
///
/// ```
/// # use assert_matches::assert_matches;
/// use arena_formula_parser::{parse_formula, Expr};
///
/// # fn main() -> anyhow::Result<()> {
/// let formula = parse_formula("base = 10; reward = base * killed.bounty")?;
/// let assignments = formula.assignments();
/// assert_eq!(assignments.len(), 2);
/// assert_eq!(assignments[0].value, Expr::Const(10.0));
/// assert_matches!(&assignments[1].value, Expr::Binary { .. });
/// assert_eq!(formula.last_name(), Some("reward"));
/// # Ok(())
/// # }
/// ```
pub fn parse_formula(source: &str) -> Result<Formula, Error> {
    let input = InputSpan::new(source);
    check_ascii(input)?;

    let (rest, _) = ws(input).map_err(|err| match err {
        NomErr::Failure(err) | NomErr::Error(err) => err,
        NomErr::Incomplete(_) => ErrorKind::UnfinishedComment.with_span(&input),
    })?;
    if rest.fragment().is_empty() {
        return Err(ErrorKind::EmptyFormula.with_span(&rest));
    }
    parse_complete(input, formula)
}

/// Parses a standalone arithmetic expression, e.g., `max(killer.bounty, 10) * 2`.
pub fn parse_expr(source: &str) -> Result<Expr, Error> {
    let input = InputSpan::new(source);
    check_ascii(input)?;
    parse_complete(input, expr)
}

/// Parses a standalone condition, e.g., `killer.freq != killed.freq && bounty > 10`.
pub fn parse_logical(source: &str) -> Result<Logical, Error> {
    let input = InputSpan::new(source);
    check_ascii(input)?;
    parse_complete(input, logical)
}
