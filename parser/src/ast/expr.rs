//! `Expr`, `Logical` and tightly related types.

use super::Assignment;
use crate::ops::{BinaryOp, Comparison, LogicalOp, OpPriority, UnaryOp};

/// Arithmetic expression, i.e., one evaluating to a number.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric constant, e.g., `1.5`.
    Const(f64),
    /// Variable use, e.g., `bounty`. Resolved by a lookup in the variable table.
    Var(String),
    /// Property dereference, e.g., `killer.arena` or `arena.jackpot`.
    Deref {
        /// Dereferenced expression; either a [`Var`](Self::Var) or another `Deref`.
        base: Box<Expr>,
        /// Field name, e.g., `jackpot` in `arena.jackpot`.
        field: String,
    },
    /// Unary operation, e.g., `-x`.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Inner expression.
        inner: Box<Expr>,
    },
    /// Binary operation, e.g., `x + 1`.
    Binary {
        /// LHS of the operation.
        lhs: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// RHS of the operation.
        rhs: Box<Expr>,
    },
    /// Call of a built-in function, e.g., `max(x, 10)`.
    Function {
        /// Function name.
        name: String,
        /// Function arguments.
        args: Vec<Expr>,
    },
    /// Ternary expression, e.g., `x > 0 ? x : 0`.
    Ternary {
        /// Condition.
        condition: Box<Logical>,
        /// Expression selected if the condition holds.
        then: Box<Expr>,
        /// Expression selected otherwise.
        otherwise: Box<Expr>,
    },
    /// Loop over a list, e.g., `for(p : arena.players) { n = n + p.bounty; return n }`.
    For(Box<ForLoop>),
}

impl Expr {
    /// Creates a variable reference.
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    /// Creates a property dereference `self.field`.
    #[must_use]
    pub fn deref(self, field: impl Into<String>) -> Self {
        Self::Deref {
            base: Box::new(self),
            field: field.into(),
        }
    }

    /// Creates a binary expression.
    pub fn binary(lhs: Self, op: BinaryOp, rhs: Self) -> Self {
        Self::Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    /// Checks whether this expression is a reference, i.e., a variable or a chain
    /// of property dereferences starting from a variable. Only references may resolve
    /// to non-numeric values.
    pub fn is_reference(&self) -> bool {
        match self {
            Self::Var(_) => true,
            Self::Deref { base, .. } => base.is_reference(),
            _ => false,
        }
    }

    /// Returns the priority of the outermost operation in this expression.
    pub fn priority(&self) -> OpPriority {
        match self {
            Self::Ternary { .. } => OpPriority::Ternary,
            Self::Binary { op, .. } => op.priority(),
            Self::Unary { op, .. } => op.priority(),
            _ => OpPriority::Primary,
        }
    }
}

/// Logical expression, i.e., one evaluating to a Boolean value. Logical expressions
/// can only appear as conditions of [ternary expressions](Expr::Ternary).
#[derive(Debug, Clone, PartialEq)]
pub enum Logical {
    /// `true` constant.
    True,
    /// `false` constant.
    False,
    /// Comparison of two arithmetic expressions, e.g., `x >= 10`.
    Comparison {
        /// LHS of the comparison.
        lhs: Box<Expr>,
        /// Comparison operator.
        op: Comparison,
        /// RHS of the comparison.
        rhs: Box<Expr>,
    },
    /// Binary logical operation, e.g., `x > 1 && y < 2`.
    Binary {
        /// LHS of the operation.
        lhs: Box<Logical>,
        /// Operator.
        op: LogicalOp,
        /// RHS of the operation.
        rhs: Box<Logical>,
    },
}

impl Logical {
    /// Creates a comparison.
    pub fn comparison(lhs: Expr, op: Comparison, rhs: Expr) -> Self {
        Self::Comparison {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    /// Creates a binary logical operation.
    pub fn binary(lhs: Self, op: LogicalOp, rhs: Self) -> Self {
        Self::Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }
}

/// Loop over a freq or player list, the only iteration construct of the language.
///
/// The loop binds `var` to each list element (skipping the element equal to `exclusion`, if any),
/// runs the `body` assignments and finally evaluates to the variable named `return_name`.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct ForLoop {
    /// Loop variable name.
    pub var: String,
    /// Iterated list; a [reference](Expr::is_reference).
    pub base: Expr,
    /// Optional excluded element; a [reference](Expr::is_reference).
    pub exclusion: Option<Expr>,
    /// Assignments executed for each list element.
    pub body: Vec<Assignment>,
    /// Name of the variable the loop evaluates to.
    pub return_name: String,
}

impl ForLoop {
    /// Creates a loop with the specified parts.
    pub fn new(
        var: impl Into<String>,
        base: Expr,
        exclusion: Option<Expr>,
        body: Vec<Assignment>,
        return_name: impl Into<String>,
    ) -> Self {
        Self {
            var: var.into(),
            base,
            exclusion,
            body,
            return_name: return_name.into(),
        }
    }
}
