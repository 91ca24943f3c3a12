//! Evaluation errors.

use core::fmt;

use crate::ValueType;

/// Errors that can occur during evaluating formulas.
///
/// Evaluation does not stop on an error: the failing sub-expression contributes `0` (or `false`
/// for conditions), and the remaining assignments are still executed. The first error is
/// reported to the caller, which should then discard the evaluated value.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Formula contains a function declaration rather than assignments.
    FunctionFormula {
        /// Name of the declared function.
        name: String,
    },
    /// Formula contains no assignments.
    EmptyFormula,
    /// Variable is not defined.
    UndefinedVariable {
        /// Variable name.
        name: String,
    },
    /// No property with the specified name is registered for the dereferenced type.
    CannotDereference {
        /// Type of the dereferenced value.
        ty: ValueType,
        /// Field name.
        field: String,
    },
    /// Value of an unexpected type, e.g., a player used in arithmetic.
    TypeMismatch {
        /// Expected value type.
        expected: ValueType,
        /// Actual value type.
        actual: ValueType,
    },
    /// Loop iterates over a value that is not a list.
    NotAList {
        /// Actual value type.
        actual: ValueType,
    },
    /// Element excluded from a loop has a type different from the list elements.
    ExclusionMismatch {
        /// Type of the iterated list.
        list: ValueType,
        /// Type of the excluded value.
        exclusion: ValueType,
    },
    /// Function with the specified name and number of args is not defined.
    UnknownFunction {
        /// Function name.
        name: String,
        /// Number of args in the call.
        arity: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FunctionFormula { name } => {
                write!(formatter, "cannot evaluate declaration of function `{name}`")
            }
            Self::EmptyFormula => formatter.write_str("formula contains no assignments"),
            Self::UndefinedVariable { name } => write!(formatter, "unknown variable `{name}`"),
            Self::CannotDereference { ty, field } => {
                write!(formatter, "cannot dereference {ty} with '{field}'")
            }
            Self::TypeMismatch { expected, actual } => {
                write!(formatter, "expected {expected}, got {actual}")
            }
            Self::NotAList { actual } => write!(formatter, "cannot iterate over {actual}"),
            Self::ExclusionMismatch { list, exclusion } => {
                write!(formatter, "cannot exclude {exclusion} from {list}")
            }
            Self::UnknownFunction { name, arity } => write!(
                formatter,
                "unknown function `{name}` with {arity} argument{}",
                if *arity == 1 { "" } else { "s" }
            ),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Returns information helping fix the error.
    pub fn help(&self) -> Option<String> {
        Some(match self {
            Self::FunctionFormula { .. } => {
                "Function declarations are parsed, but cannot be evaluated".to_owned()
            }
            Self::UndefinedVariable { .. } => "Variables are defined by assignments, e.g. `x = 1`, \
                or supplied by the caller as context"
                .to_owned(),
            Self::CannotDereference { ty, .. } => match ty {
                ValueType::Arena | ValueType::Freq | ValueType::Player => {
                    format!("Only registered {ty} properties can be dereferenced")
                }
                _ => format!("Values of type {ty} have no properties"),
            },
            Self::TypeMismatch {
                expected: ValueType::Number,
                ..
            } => "Arithmetic is performed on numbers only; use a numeric property, \
                e.g. `killer.bounty` instead of `killer`"
                .to_owned(),
            Self::NotAList { .. } => {
                "Loops iterate over freq or player lists, e.g. `arena.players` or `arena.freqs`"
                    .to_owned()
            }
            Self::ExclusionMismatch { list, .. } => match list.element_type() {
                Some(element) => format!("Only a {element} can be excluded from a {list}"),
                None => return None,
            },
            Self::UnknownFunction { .. } => "Supported functions are listed by `:help` \
                in the REPL"
                .to_owned(),
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = Error::CannotDereference {
            ty: ValueType::Arena,
            field: "bogusfield".to_owned(),
        };
        assert_eq!(err.to_string(), "cannot dereference arena with 'bogusfield'");
        assert!(err.help().unwrap().contains("arena properties"));

        let err = Error::UnknownFunction {
            name: "foo".to_owned(),
            arity: 1,
        };
        assert_eq!(err.to_string(), "unknown function `foo` with 1 argument");
        let err = Error::UnknownFunction {
            name: "max".to_owned(),
            arity: 3,
        };
        assert_eq!(err.to_string(), "unknown function `max` with 3 arguments");

        let err = Error::ExclusionMismatch {
            list: ValueType::PlayerList,
            exclusion: ValueType::Freq,
        };
        assert_eq!(err.to_string(), "cannot exclude freq from player list");
        assert_eq!(
            err.help().unwrap(),
            "Only a player can be excluded from a player list"
        );
        assert_eq!(Error::EmptyFormula.help(), None);
    }
}
