//! Tests for loops.

use assert_matches::assert_matches;

use super::{bin, var};
use crate::{
    parse_expr, parse_formula, Assignment, BinaryOp, Context, Expr, ForLoop, Formula,
};

#[test]
fn loop_with_exclusion() {
    let expr = parse_expr("for(p : arena.players - killer) { n = n + p.bounty; return n }")
        .unwrap();
    let expected = ForLoop::new(
        "p",
        var("arena").deref("players"),
        Some(var("killer")),
        vec![Assignment::new(
            "n",
            bin(var("n"), BinaryOp::Add, var("p").deref("bounty")),
        )],
        "n",
    );
    assert_eq!(expr, Expr::For(Box::new(expected)));
}

#[test]
fn loop_without_body() {
    let expr = parse_expr("for ( f : arena.freqs ) { return s; }").unwrap();
    assert_matches!(
        expr,
        Expr::For(ref for_loop)
            if for_loop.body.is_empty()
                && for_loop.exclusion.is_none()
                && for_loop.return_name == "s"
    );
}

#[test]
fn loop_with_multiple_assignments() {
    let source = "
        total = for(p : me.freq.everyone - me) {
            cnt = cnt + 1;
            sum = sum + p.bounty;
            avg = sum / cnt;
            return avg
        }
    ";
    let formula = parse_formula(source).unwrap();
    let Formula::Assignments(assignments) = &formula else {
        panic!("Unexpected formula: {formula:?}");
    };
    assert_eq!(assignments.len(), 1);
    assert_matches!(
        &assignments[0].value,
        Expr::For(for_loop) if for_loop.body.len() == 3 && for_loop.return_name == "avg"
    );
}

#[test]
fn loops_in_arithmetic() {
    let expr = parse_expr("1 + for(p : arena.players) { n = n + 1; return n } * 2").unwrap();
    assert_matches!(
        expr,
        Expr::Binary { op: BinaryOp::Add, ref rhs, .. }
            if matches!(**rhs, Expr::Binary { op: BinaryOp::Mul, ref lhs, .. }
                if matches!(**lhs, Expr::For(_)))
    );
}

#[test]
fn loop_without_return() {
    let err = parse_expr("for(p : arena.players) { n = n + 1 }").unwrap_err();
    assert_eq!(err.kind().context(), Some(Context::ForLoop));
}

#[test]
fn loop_over_non_reference() {
    let err = parse_expr("for(p : 1 + 2) { return n }").unwrap_err();
    assert_eq!(err.kind().context(), Some(Context::ForLoop));
    assert_eq!(err.location().offset(), 8);
}

#[test]
fn keyword_cannot_be_assigned() {
    assert!(parse_formula("for = 1").is_err());
    assert!(parse_formula("return = 1").is_err());
}
