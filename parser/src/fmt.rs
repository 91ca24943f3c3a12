//! `Display` implementations for ASTs. The output is canonical formula source: it uses
//! single spaces around operators and only the parentheses required to preserve the tree.

use core::fmt;

use crate::{Assignment, BinaryOp, Expr, FnDeclaration, ForLoop, Formula, Logical, OpPriority};

struct Parenthesized<'a>(&'a Expr, bool);

impl fmt::Display for Parenthesized<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.1 {
            write!(formatter, "({})", self.0)
        } else {
            fmt::Display::fmt(self.0, formatter)
        }
    }
}

fn binary_operands<'a>(
    lhs: &'a Expr,
    op: BinaryOp,
    rhs: &'a Expr,
) -> (Parenthesized<'a>, Parenthesized<'a>) {
    let priority = op.priority();
    let right_assoc = op.is_right_associative();
    let lhs_parens =
        lhs.priority() < priority || (lhs.priority() == priority && right_assoc);
    let rhs_parens =
        rhs.priority() < priority || (rhs.priority() == priority && !right_assoc);
    (Parenthesized(lhs, lhs_parens), Parenthesized(rhs, rhs_parens))
}

impl fmt::Display for Expr {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(value) => write!(formatter, "{value}"),
            Self::Var(name) => formatter.write_str(name),
            Self::Deref { base, field } => write!(formatter, "{base}.{field}"),
            Self::Unary { op, inner } => {
                let parens = inner.priority() < op.priority();
                write!(formatter, "{}{}", op.as_str(), Parenthesized(inner, parens))
            }
            Self::Binary { lhs, op, rhs } => {
                let (lhs, rhs) = binary_operands(lhs, *op, rhs);
                write!(formatter, "{lhs} {} {rhs}", op.as_str())
            }
            Self::Function { name, args } => {
                write!(formatter, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{arg}")?;
                }
                formatter.write_str(")")
            }
            Self::Ternary {
                condition,
                then,
                otherwise,
            } => write!(formatter, "{condition} ? {then} : {otherwise}"),
            Self::For(for_loop) => fmt::Display::fmt(for_loop, formatter),
        }
    }
}

impl fmt::Display for ForLoop {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "for({} : {}", self.var, self.base)?;
        if let Some(exclusion) = &self.exclusion {
            write!(formatter, " - {exclusion}")?;
        }
        formatter.write_str(") { ")?;
        for assignment in &self.body {
            write!(formatter, "{assignment}; ")?;
        }
        write!(formatter, "return {} }}", self.return_name)
    }
}

impl fmt::Display for Logical {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => formatter.write_str("true"),
            Self::False => formatter.write_str("false"),
            Self::Comparison { lhs, op, rhs } => {
                let lhs = Parenthesized(lhs, lhs.priority() == OpPriority::Ternary);
                let rhs = Parenthesized(rhs, rhs.priority() == OpPriority::Ternary);
                write!(formatter, "{lhs} {} {rhs}", op.as_str())
            }
            Self::Binary { lhs, op, rhs } => {
                if matches!(rhs.as_ref(), Self::Binary { .. }) {
                    write!(formatter, "{lhs} {} ({rhs})", op.as_str())
                } else {
                    write!(formatter, "{lhs} {} {rhs}", op.as_str())
                }
            }
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} = {}", self.name, self.value)
    }
}

impl fmt::Display for FnDeclaration {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}({}) = {}",
            self.name,
            self.params.join(", "),
            self.body
        )
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assignments(assignments) => {
                for (i, assignment) in assignments.iter().enumerate() {
                    if i > 0 {
                        formatter.write_str("; ")?;
                    }
                    write!(formatter, "{assignment}")?;
                }
                Ok(())
            }
            Self::Function(declaration) => fmt::Display::fmt(declaration, formatter),
        }
    }
}
