//! Parsing functions for arithmetic and logical expressions.

use core::mem;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char as tag_char, one_of},
    combinator::{consumed, cut, map, opt, peek},
    error::context,
    multi::{many0, separated_list0},
    number::complete::double,
    sequence::{delimited, preceded, terminated, tuple},
    Err as NomErr, Slice,
};

use super::{
    assignment,
    helpers::{comma_sep, keyword, semicolon_sep, var_name, ws},
};
use crate::{
    BinaryOp, Comparison, Context, Error, ErrorKind, Expr, ForLoop, InputSpan, Logical, LogicalOp,
    NomResult, UnaryOp,
};

/// Parsed term before it is known whether an arithmetic expression or a condition is required
/// in its position. Parentheses may enclose either, so both kinds share a single grammar.
#[derive(Debug)]
enum Term {
    Arith(Expr),
    Logical(Logical),
}

impl Term {
    fn into_arith(self, span: &InputSpan<'_>) -> Result<Expr, NomErr<Error>> {
        match self {
            Self::Arith(expr) => Ok(expr),
            Self::Logical(_) => Err(NomErr::Failure(
                ErrorKind::ExpectedArithmetic.with_span(span),
            )),
        }
    }

    fn into_logical(self, span: &InputSpan<'_>) -> Result<Logical, NomErr<Error>> {
        match self {
            Self::Logical(logical) => Ok(logical),
            Self::Arith(_) => Err(NomErr::Failure(
                ErrorKind::ExpectedCondition.with_span(span),
            )),
        }
    }
}

/// Unsigned number literal, e.g., `1`, `.5` or `2.5e3`.
fn number(input: InputSpan<'_>) -> NomResult<'_, Expr> {
    peek(one_of::<_, _, Error>("0123456789."))(input)?;
    let (rest, (literal, value)) = consumed(double::<InputSpan<'_>, Error>)(input)
        .map_err(|_| NomErr::Failure(ErrorKind::Literal.with_span(&input.slice(..1))))?;

    // Literals like `2x` are not split into a number and a name.
    let glued_to_name = rest
        .fragment()
        .starts_with(|c: char| c.is_ascii_alphabetic() || c == '_' || c == '$');
    if glued_to_name {
        let span = input.slice(..literal.fragment().len() + 1);
        return Err(NomErr::Failure(ErrorKind::Literal.with_span(&span)));
    }
    Ok((rest, Expr::Const(value)))
}

fn boolean(input: InputSpan<'_>) -> NomResult<'_, Logical> {
    alt((
        map(alt((keyword("true"), keyword("TRUE"))), |_| Logical::True),
        map(alt((keyword("false"), keyword("FALSE"))), |_| Logical::False),
    ))(input)
}

/// Variable optionally followed by property dereferences, e.g., `killer.freq.size`.
pub(super) fn reference(input: InputSpan<'_>) -> NomResult<'_, Expr> {
    let field = preceded(delimited(ws, tag_char('.'), ws), cut(var_name));
    map(tuple((var_name, many0(field))), |(base, fields)| {
        fields
            .into_iter()
            .fold(Expr::var(*base.fragment()), |acc, field| {
                acc.deref(*field.fragment())
            })
    })(input)
}

/// Function call, e.g., `max(x, 1)`.
fn fn_call(input: InputSpan<'_>) -> NomResult<'_, Expr> {
    let args = preceded(
        terminated(tag_char('('), ws),
        // Once we've encountered the opening `(`, the input *must* correspond to the parser.
        cut(terminated(
            separated_list0(comma_sep, expr),
            preceded(ws, tag_char(')')),
        )),
    );
    let parser = map(tuple((var_name, preceded(ws, args))), |(name, args)| {
        Expr::Function {
            name: (*name.fragment()).to_owned(),
            args,
        }
    });
    context(Context::Fn.to_str(), parser)(input)
}

/// Loop over a list, e.g., `for(p : arena.players - killer) { n = n + p.bounty; return n }`.
fn for_loop(input: InputSpan<'_>) -> NomResult<'_, ForLoop> {
    let colon = delimited(ws, tag_char(':'), ws);
    let exclusion = preceded(delimited(ws, tag_char('-'), ws), reference);
    let header = delimited(
        terminated(tag_char('('), ws),
        tuple((var_name, preceded(colon, reference), opt(exclusion))),
        preceded(ws, tag_char(')')),
    );

    let return_stmt = preceded(terminated(keyword("return"), ws), var_name);
    let body = delimited(
        terminated(tag_char('{'), ws),
        tuple((many0(terminated(assignment, semicolon_sep)), return_stmt)),
        tuple((opt(semicolon_sep), ws, tag_char('}'))),
    );

    let parser = preceded(
        terminated(keyword("for"), ws),
        cut(tuple((header, preceded(ws, body)))),
    );
    let parser = map(
        parser,
        |((var, base, exclusion), (body, return_name))| {
            ForLoop::new(
                *var.fragment(),
                base,
                exclusion,
                body,
                *return_name.fragment(),
            )
        },
    );
    context(Context::ForLoop.to_str(), parser)(input)
}

/// Term enclosed in parentheses, e.g., `(1 + x)` or `(x > 1 && y > 1)`.
fn paren_term(input: InputSpan<'_>) -> NomResult<'_, Term> {
    preceded(
        terminated(tag_char('('), ws),
        cut(terminated(any_term, preceded(ws, tag_char(')')))),
    )(input)
}

/// Negation, e.g., `-x`. Binds tighter than any binary operation, so `-2 ^ 2` is `(-2) ^ 2`.
fn negation(input: InputSpan<'_>) -> NomResult<'_, Term> {
    let (rest, (span, inner)) =
        preceded(terminated(tag_char('-'), ws), cut(consumed(operand)))(input)?;
    let inner = inner.into_arith(&span)?;
    let expr = Expr::Unary {
        op: UnaryOp::Neg,
        inner: Box::new(inner),
    };
    Ok((rest, Term::Arith(expr)))
}

/// Simplest term: a literal, a reference, a function call, a loop, a parenthesized term
/// or a negation of an operand.
fn operand(input: InputSpan<'_>) -> NomResult<'_, Term> {
    alt((
        map(number, Term::Arith),
        map(boolean, Term::Logical),
        map(for_loop, |for_loop| Term::Arith(Expr::For(Box::new(for_loop)))),
        map(fn_call, Term::Arith),
        map(reference, Term::Arith),
        paren_term,
        negation,
    ))(input)
}

fn binary_op(input: InputSpan<'_>) -> NomResult<'_, BinaryOp> {
    alt((
        map(tag_char('+'), |_| BinaryOp::Add),
        map(tag_char('-'), |_| BinaryOp::Sub),
        map(tag_char('*'), |_| BinaryOp::Mul),
        map(tag_char('/'), |_| BinaryOp::Div),
        map(tag_char('^'), |_| BinaryOp::Power),
    ))(input)
}

/// Sequence of operands with binary arithmetic operations, e.g., `1 + 2 * x ^ 2`.
fn sum(input: InputSpan<'_>) -> NomResult<'_, Term> {
    // First, we parse the expression into a list with operands interspersed
    // with binary operations. For example, `1 + 2 * foo(x, y)` is parsed into
    //
    //     [ 1, +, 2, *, foo(x, y) ]
    let mut parser = tuple((
        consumed(operand),
        many0(tuple((
            delimited(ws, binary_op, ws),
            cut(consumed(operand)),
        ))),
    ));
    let (rest, ((first_span, first), tail)) = parser(input)?;
    if tail.is_empty() {
        return Ok((rest, first));
    }

    let first = first.into_arith(&first_span)?;
    let tail = tail
        .into_iter()
        .map(|(op, (span, term))| Ok((op, term.into_arith(&span)?)))
        .collect::<Result<Vec<_>, NomErr<Error>>>()?;
    Ok((rest, Term::Arith(fold_binary_expr(first, tail))))
}

// After obtaining the list, we fold it paying attention to the operation priorities.
// We track the `right_contour` of the parsed tree and insert a new operation so that
// operations in the contour with lower priority remain in place.
//
// As an example, consider expression `1 + 2 * foo(x, y) - 7` split into list
// `[ 1, +, 2, *, foo(x, y), -, 7 ]`. First, we form a tree
//
//   +
//  / \
// 1   2
//
// Then, we find the place to insert the `*` op and `foo(x, y)` operand. Since `*` has
// a higher priority than `+`, we insert it *below* the `+` op:
//
//   +
//  / \
// 1   *
//    / \
//   2  foo(x, y)
//
// The next op `-` has the same priority as the first op in the right contour (`+`), so
// we insert it *above* it:
//
//    -
//   / \
//   +  7
//  / \
// 1   *
//    / \
//   2  foo(x, y)
//
// A right-associative op (`^`) is inserted *below* an op of the same priority instead.
fn fold_binary_expr(first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Expr {
    let mut right_contour: Vec<BinaryOp> = vec![];

    rest.into_iter().fold(first, |mut acc, (new_op, expr)| {
        let insert_pos = right_contour
            .iter()
            .position(|past_op| {
                let (past, new) = (past_op.priority(), new_op.priority());
                past > new || (past == new && !new_op.is_right_associative())
            })
            .unwrap_or(right_contour.len());

        right_contour.truncate(insert_pos);
        right_contour.push(new_op);

        if insert_pos == 0 {
            return Expr::binary(acc, new_op, expr);
        }

        let mut parent = &mut acc;
        for _ in 1..insert_pos {
            parent = match parent {
                Expr::Binary { rhs, .. } => rhs.as_mut(),
                _ => unreachable!(),
            };
        }
        if let Expr::Binary { rhs, .. } = parent {
            let old_rhs = mem::replace(rhs.as_mut(), Expr::Const(0.0));
            *rhs = Box::new(Expr::binary(old_rhs, new_op, expr));
        }
        acc
    })
}

fn comparison_op(input: InputSpan<'_>) -> NomResult<'_, Comparison> {
    alt((
        map(tag("<="), |_| Comparison::Le),
        map(tag(">="), |_| Comparison::Ge),
        map(tag("=="), |_| Comparison::Eq),
        map(tag("!="), |_| Comparison::NotEq),
        map(tag("<"), |_| Comparison::Lt),
        map(tag(">"), |_| Comparison::Gt),
    ))(input)
}

/// Comparison of two arithmetic expressions, e.g., `x + 1 >= y`.
fn comparison(input: InputSpan<'_>) -> NomResult<'_, Term> {
    let (rest, (lhs_span, lhs)) = consumed(sum)(input)?;
    let rhs_parser = tuple((delimited(ws, comparison_op, ws), cut(consumed(sum))));
    let (rest, maybe_rhs) = opt(rhs_parser)(rest)?;
    let Some((op, (rhs_span, rhs))) = maybe_rhs else {
        return Ok((rest, lhs));
    };

    let lhs = lhs.into_arith(&lhs_span)?;
    let rhs = rhs.into_arith(&rhs_span)?;
    if let Ok((_, (op_span, _))) = preceded(ws, consumed(comparison_op))(rest) {
        let err = ErrorKind::ChainedComparison.with_span(&op_span);
        return Err(NomErr::Failure(err));
    }
    Ok((rest, Term::Logical(Logical::comparison(lhs, op, rhs))))
}

fn logical_op(input: InputSpan<'_>) -> NomResult<'_, LogicalOp> {
    alt((
        map(alt((tag("&&"), keyword("and"), keyword("AND"))), |_| {
            LogicalOp::And
        }),
        map(alt((tag("||"), keyword("or"), keyword("OR"))), |_| {
            LogicalOp::Or
        }),
    ))(input)
}

/// Conditions joined with left-associative `&&` / `||`, which share the same priority.
fn disjunction(input: InputSpan<'_>) -> NomResult<'_, Term> {
    let mut parser = tuple((
        consumed(comparison),
        many0(tuple((
            delimited(ws, logical_op, ws),
            cut(consumed(comparison)),
        ))),
    ));
    let (rest, ((first_span, first), tail)) = parser(input)?;
    if tail.is_empty() {
        return Ok((rest, first));
    }

    let first = first.into_logical(&first_span)?;
    let folded = tail.into_iter().try_fold(
        first,
        |acc, (op, (span, term))| -> Result<_, NomErr<Error>> {
            Ok(Logical::binary(acc, op, term.into_logical(&span)?))
        },
    )?;
    Ok((rest, Term::Logical(folded)))
}

/// Term optionally followed by ternary branches, e.g., `x > 0 ? x : -x`.
fn any_term(input: InputSpan<'_>) -> NomResult<'_, Term> {
    let (rest, (condition_span, condition)) = consumed(disjunction)(input)?;
    let branches = preceded(
        delimited(ws, tag_char('?'), ws),
        cut(tuple((expr, preceded(delimited(ws, tag_char(':'), ws), expr)))),
    );
    let (rest, branches) = opt(branches)(rest)?;
    let Some((then, otherwise)) = branches else {
        return Ok((rest, condition));
    };

    let condition = condition.into_logical(&condition_span)?;
    let expr = Expr::Ternary {
        condition: Box::new(condition),
        then: Box::new(then),
        otherwise: Box::new(otherwise),
    };
    Ok((rest, Term::Arith(expr)))
}

/// Arithmetic expression.
pub(super) fn expr(input: InputSpan<'_>) -> NomResult<'_, Expr> {
    let (rest, (span, term)) = context(Context::Expr.to_str(), consumed(any_term))(input)?;
    Ok((rest, term.into_arith(&span)?))
}

/// Logical expression (a condition).
pub(super) fn logical(input: InputSpan<'_>) -> NomResult<'_, Logical> {
    let (rest, (span, term)) = consumed(any_term)(input)?;
    Ok((rest, term.into_logical(&span)?))
}
