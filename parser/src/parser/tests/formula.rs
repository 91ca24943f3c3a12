//! Tests for complete formulas and their formatting.

use assert_matches::assert_matches;

use super::{bin, num, var};
use crate::{parse_formula, BinaryOp, ErrorKind, Formula};

#[test]
fn single_assignment() {
    let formula = parse_formula("x = 2 + 3 * 4").unwrap();
    let expected = Formula::single(
        "x",
        bin(num(2.0), BinaryOp::Add, bin(num(3.0), BinaryOp::Mul, num(4.0))),
    );
    assert_eq!(formula, expected);
    assert_eq!(formula.last_name(), Some("x"));
}

#[test]
fn multiple_assignments() {
    let source = "
        // Kill reward.
        base = killed.bounty;   /* copied */
        reward = base * 2;
    ";
    let formula = parse_formula(source).unwrap();
    let assignments = formula.assignments();
    assert_eq!(assignments.len(), 2);
    assert_eq!(assignments[0].name, "base");
    assert_eq!(assignments[0].value, var("killed").deref("bounty"));
    assert_eq!(formula.last_name(), Some("reward"));
}

#[test]
fn function_declaration() {
    let formula = parse_formula("f(x, y) = x * y;").unwrap();
    assert_matches!(
        &formula,
        Formula::Function(decl)
            if decl.name == "f"
                && decl.params == ["x", "y"]
                && decl.body == bin(var("x"), BinaryOp::Mul, var("y"))
    );
    assert!(formula.assignments().is_empty());
    assert_eq!(formula.last_name(), None);

    let formula = parse_formula("rand() = 4").unwrap();
    assert_matches!(formula, Formula::Function(decl) if decl.params.is_empty());
}

#[test]
fn empty_formulas() {
    for source in ["", "   ", "// only a comment", "/* block */\n"] {
        let err = parse_formula(source).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::EmptyFormula, "{source:?}");
    }
}

#[test]
fn malformed_formulas() {
    let err = parse_formula("x = 1; ; y = 2").unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::Leftovers);
    assert_eq!(err.location().offset(), 7);

    for source in ["x = ", "x == 1", "1 + 2", "x = 1 y = 2", "x = max(1,"] {
        assert!(parse_formula(source).is_err(), "{source}");
    }
}

#[test]
fn formatting_uses_minimal_parentheses() {
    let samples = [
        ("x=1+2*3", "x = 1 + 2 * 3"),
        ("x = (1 + 2) * 3", "x = (1 + 2) * 3"),
        ("x = (1 - 2) - 3", "x = 1 - 2 - 3"),
        ("x = 1 - (2 - 3)", "x = 1 - (2 - 3)"),
        ("x = 2 ^ (3 ^ 2)", "x = 2 ^ 3 ^ 2"),
        ("x = (2 ^ 3) ^ 2", "x = (2 ^ 3) ^ 2"),
        ("x = -(a + b) * -c", "x = -(a + b) * -c"),
        ("x = (-2) ^ 2", "x = -2 ^ 2"),
        ("x = (a > 1 ? 1 : 2) + 3", "x = (a > 1 ? 1 : 2) + 3"),
        (
            "x = a > 1 AND (b > 1 or c>1) ? 1 : 0",
            "x = a > 1 && (b > 1 || c > 1) ? 1 : 0",
        ),
        ("x = (a > 1 && b > 1) || TRUE ? 1 : 0", "x = a > 1 && b > 1 || true ? 1 : 0"),
        ("x = max(a.b, 1.5); y=x", "x = max(a.b, 1.5); y = x"),
        (
            "s = for(p:arena.players-me){n=n+p.bounty;return n;}",
            "s = for(p : arena.players - me) { n = n + p.bounty; return n }",
        ),
        ("f(x,y) = x*y", "f(x, y) = x * y"),
    ];

    for (source, expected) in samples {
        let formula = parse_formula(source).unwrap();
        let formatted = formula.to_string();
        assert_eq!(formatted, expected);
        assert_eq!(parse_formula(&formatted).unwrap(), formula, "{formatted}");
    }
}
