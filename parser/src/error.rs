//! Error handling.

use nom::{
    error::{ContextError, ErrorKind as NomErrorKind, ParseError},
    Slice,
};

use core::fmt;

use crate::{InputSpan, Location};

/// Parsing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Context {
    /// Variable or field name.
    Var,
    /// Function call or declaration.
    Fn,
    /// Arithmetic expression.
    Expr,
    /// Loop construct, e.g., `for(p : arena.players) { n = n + 1; return n }`.
    ForLoop,
    /// Assignment, e.g., `x = 1`.
    Assignment,
}

impl fmt::Display for Context {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Var => "variable",
            Self::Fn => "function call",
            Self::Expr => "arithmetic expression",
            Self::ForLoop => "for loop",
            Self::Assignment => "assignment",
        })
    }
}

impl Context {
    pub(crate) fn new(s: &str) -> Self {
        match s {
            "var" => Self::Var,
            "fn" => Self::Fn,
            "expr" => Self::Expr,
            "for" => Self::ForLoop,
            "assign" => Self::Assignment,
            _ => unreachable!(),
        }
    }

    pub(crate) fn to_str(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Fn => "fn",
            Self::Expr => "expr",
            Self::ForLoop => "for",
            Self::Assignment => "assign",
        }
    }
}

/// Parsing error kind.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Input is not in ASCII.
    NonAsciiInput,
    /// Input contains no assignments (e.g., it is empty or consists of comments only).
    EmptyFormula,
    /// Error parsing a number literal.
    Literal,
    /// Reserved word (e.g., `for` or `true`) used as a name.
    ReservedWord,
    /// Condition (e.g., `x > 1`) used where an arithmetic expression is expected.
    ExpectedArithmetic,
    /// Arithmetic expression used where a condition is expected.
    ExpectedCondition,
    /// Chained comparison, such as `1 < 2 < 3`.
    ChainedComparison,
    /// Block comment is not terminated.
    UnfinishedComment,

    /// No rules where expecting this character.
    UnexpectedChar {
        /// Parsing context.
        context: Option<Context>,
    },
    /// Unexpected expression end.
    UnexpectedTerm {
        /// Parsing context.
        context: Option<Context>,
    },
    /// Leftover symbols after parsing.
    Leftovers,

    /// Other parsing error.
    Other {
        /// `nom`-defined error kind.
        kind: NomErrorKind,
        /// Parsing context.
        context: Option<Context>,
    },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonAsciiInput => formatter.write_str("Non-ASCII inputs are not supported"),
            Self::EmptyFormula => formatter.write_str("Formula contains no assignments"),
            Self::Literal => formatter.write_str("Invalid number literal"),
            Self::ReservedWord => formatter.write_str("Reserved word cannot be used as a name"),
            Self::ExpectedArithmetic => {
                formatter.write_str("Expected arithmetic expression, got a condition")
            }
            Self::ExpectedCondition => {
                formatter.write_str("Expected condition, got an arithmetic expression")
            }
            Self::ChainedComparison => formatter.write_str("Chained comparisons are not allowed"),
            Self::UnfinishedComment => formatter.write_str("Unfinished comment"),

            Self::UnexpectedChar { context: Some(ctx) } => {
                write!(formatter, "Unexpected character in {ctx}")
            }
            Self::UnexpectedChar { .. } => formatter.write_str("Unexpected character"),
            Self::UnexpectedTerm { context: Some(ctx) } => write!(formatter, "Unfinished {ctx}"),
            Self::UnexpectedTerm { .. } => formatter.write_str("Unfinished expression"),
            Self::Leftovers => formatter.write_str("Uninterpreted characters after parsing"),
            Self::Other { .. } => formatter.write_str("Cannot parse sequence"),
        }
    }
}

impl ErrorKind {
    fn context_mut(&mut self) -> Option<&mut Option<Context>> {
        match self {
            Self::UnexpectedChar { context }
            | Self::UnexpectedTerm { context }
            | Self::Other { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Returns optional error context.
    pub fn context(&self) -> Option<Context> {
        match self {
            Self::UnexpectedChar { context }
            | Self::UnexpectedTerm { context }
            | Self::Other { context, .. } => *context,
            _ => None,
        }
    }

    pub(crate) fn with_span(self, span: &InputSpan<'_>) -> Error {
        Error {
            kind: self,
            location: Location::new(span),
        }
    }
}

/// Parsing error with the associated code location.
///
/// The error does not borrow the parsed code, so it can be freely stored or sent across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    location: Location,
}

impl Error {
    pub(crate) fn new(span: InputSpan<'_>, kind: ErrorKind) -> Self {
        kind.with_span(&span)
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the location of this error in the parsed code.
    pub fn location(&self) -> Location {
        self.location
    }
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}:{}: {}",
            self.location.line(),
            self.location.column(),
            self.kind
        )
    }
}

impl std::error::Error for Error {}

impl<'a> ParseError<InputSpan<'a>> for Error {
    fn from_error_kind(mut input: InputSpan<'a>, kind: NomErrorKind) -> Self {
        if kind == NomErrorKind::Char && !input.fragment().is_empty() {
            // Truncate the error span to the first ineligible char.
            input = input.slice(..1);
        }

        let error_kind = if kind == NomErrorKind::Char {
            if input.fragment().is_empty() {
                ErrorKind::UnexpectedTerm { context: None }
            } else {
                ErrorKind::UnexpectedChar { context: None }
            }
        } else {
            ErrorKind::Other {
                kind,
                context: None,
            }
        };

        Error::new(input, error_kind)
    }

    fn append(_: InputSpan<'a>, _: NomErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a> ContextError<InputSpan<'a>> for Error {
    fn add_context(input: InputSpan<'a>, ctx: &'static str, mut target: Self) -> Self {
        // The innermost context that started before the error position wins.
        if input.location_offset() < target.location.offset() {
            match target.kind.context_mut() {
                Some(context) if context.is_none() => *context = Some(Context::new(ctx)),
                _ => { /* Context is already set or not applicable. */ }
            }
        }
        target
    }
}
