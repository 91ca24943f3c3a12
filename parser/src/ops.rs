//! Operation-related types.

use core::fmt;

/// Priority of an arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum OpPriority {
    /// Ternary expression (`cond ? x : y`). Binds loosest.
    Ternary,
    /// Addition or subtraction: `+` or `-`.
    AddOrSub,
    /// Multiplication or division: `*` or `/`.
    MulOrDiv,
    /// Power (`^`).
    Power,
    /// Unary `-`.
    Negation,
    /// Constants, variables, property dereferences, function calls and loops.
    Primary,
}

/// Unary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum UnaryOp {
    /// Negation (`-`).
    Neg,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neg => formatter.write_str("negation"),
        }
    }
}

impl UnaryOp {
    /// Returns the string representation of this operation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neg => "-",
        }
    }

    /// Returns a relative priority of this operation.
    pub fn priority(self) -> OpPriority {
        match self {
            Self::Neg => OpPriority::Negation,
        }
    }

    /// Applies this operation to a number.
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Neg => -value,
        }
    }
}

/// Binary arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum BinaryOp {
    /// Addition (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Division (`/`).
    Div,
    /// Power (`^`).
    Power,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Add => "addition",
            Self::Sub => "subtraction",
            Self::Mul => "multiplication",
            Self::Div => "division",
            Self::Power => "exponentiation",
        })
    }
}

impl BinaryOp {
    /// Returns the string representation of this operation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Power => "^",
        }
    }

    /// Returns the priority of this operation.
    pub fn priority(self) -> OpPriority {
        match self {
            Self::Add | Self::Sub => OpPriority::AddOrSub,
            Self::Mul | Self::Div => OpPriority::MulOrDiv,
            Self::Power => OpPriority::Power,
        }
    }

    /// Checks whether this operation is right-associative. Only `^` is: `2 ^ 3 ^ 2`
    /// is parsed as `2 ^ (3 ^ 2)`.
    pub fn is_right_associative(self) -> bool {
        matches!(self, Self::Power)
    }

    /// Applies this operation to a pair of numbers. Division and power follow IEEE 754,
    /// so that, e.g., division by zero produces an infinity or NaN.
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => lhs / rhs,
            Self::Power => lhs.powf(rhs),
        }
    }
}

/// Comparison between two arithmetic expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Comparison {
    /// "Lesser than" comparison (`<`).
    Lt,
    /// "Lesser or equal" comparison (`<=`).
    Le,
    /// Equality (`==`).
    Eq,
    /// "Greater or equal" comparison (`>=`).
    Ge,
    /// "Greater than" comparison (`>`).
    Gt,
    /// Non-equality (`!=`).
    NotEq,
}

impl fmt::Display for Comparison {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Lt => "lesser comparison",
            Self::Le => "lesser-or-equal comparison",
            Self::Eq => "equality comparison",
            Self::Ge => "greater-or-equal comparison",
            Self::Gt => "greater comparison",
            Self::NotEq => "non-equality comparison",
        })
    }
}

impl Comparison {
    /// Returns the string representation of this comparison.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ge => ">=",
            Self::Gt => ">",
            Self::NotEq => "!=",
        }
    }

    /// Applies this comparison to a pair of numbers. Comparisons involving NaN are `false`,
    /// except for `!=`, which is `true`.
    pub fn compare(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
            #[allow(clippy::float_cmp)]
            Self::Eq => lhs == rhs,
            Self::Ge => lhs >= rhs,
            Self::Gt => lhs > rhs,
            #[allow(clippy::float_cmp)]
            Self::NotEq => lhs != rhs,
        }
    }
}

/// Binary logical operation. `&&` and `||` share the same priority and are left-associative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum LogicalOp {
    /// Boolean AND (`&&`).
    And,
    /// Boolean OR (`||`).
    Or,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::And => "AND",
            Self::Or => "OR",
        })
    }
}

impl LogicalOp {
    /// Returns the string representation of this operation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    /// Combines two already evaluated operands.
    pub fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            Self::And => lhs && rhs,
            Self::Or => lhs || rhs,
        }
    }
}
