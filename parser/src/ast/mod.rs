//! ASTs for formulas.

mod expr;

pub use self::expr::{Expr, ForLoop, Logical};

/// Assignment of an arithmetic expression to a variable, e.g., `reward = bounty * 2`.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Assignment {
    /// Name of the assigned variable.
    pub name: String,
    /// Assigned expression.
    pub value: Expr,
}

impl Assignment {
    /// Creates an assignment.
    pub fn new(name: impl Into<String>, value: Expr) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Declaration of a named function, e.g., `f(x, y) = x * y`.
///
/// Declarations are accepted by the parser, but cannot be evaluated.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct FnDeclaration {
    /// Function name.
    pub name: String,
    /// Names of function parameters.
    pub params: Vec<String>,
    /// Function body.
    pub body: Expr,
}

/// Parsed formula.
///
/// A formula returned by the parser is either a non-empty list of assignments,
/// or a single function declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    /// List of assignments executed in order. The formula value is the value
    /// of the last assignment.
    Assignments(Vec<Assignment>),
    /// Function declaration.
    Function(FnDeclaration),
}

impl Formula {
    /// Creates a formula consisting of a single assignment `name = value`.
    pub fn single(name: impl Into<String>, value: Expr) -> Self {
        Self::Assignments(vec![Assignment::new(name, value)])
    }

    /// Returns assignments in this formula. The returned slice is empty
    /// for function declarations.
    pub fn assignments(&self) -> &[Assignment] {
        match self {
            Self::Assignments(assignments) => assignments,
            Self::Function(_) => &[],
        }
    }

    /// Returns the name of the last assigned variable, or `None` for function declarations.
    pub fn last_name(&self) -> Option<&str> {
        self.assignments()
            .last()
            .map(|assignment| assignment.name.as_str())
    }
}
