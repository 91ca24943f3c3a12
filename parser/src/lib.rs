//! Parser for arena formulas: small arithmetic programs used by game servers to compute
//! rewards, penalties and similar values from the game state.
//!
//! # Supported syntax features
//!
//! - **Assignments.** A formula is a `;`-separated list of assignments, such as
//!   `base = 10; reward = base * killed.bounty`. The formula value is the value
//!   of the last assignment. A trailing `;` is allowed.
//! - **Variables and properties.** Names consist of alphanumeric chars and underscores
//!   and may start with `$` (e.g., `$team_bonus`). Properties are accessed with `.`,
//!   as in `killer.freq.size` or `arena.jackpot`.
//! - **Literals.** Unsigned decimal numbers, like `42`, `.5` or `2.5e3`.
//! - `//` and `/* .. */` **comments**.
//! - **Arithmetic operations**: `+`, `-` (binary and unary), `*`, `/`, `^` (power).
//!   `^` is right-associative; unary `-` binds tighter than any binary operation.
//! - **Function calls**: `max(killer.bounty, 10)`.
//! - **Conditions** used in ternary expressions: comparisons (`<`, `<=`, `==`, `>=`, `>`, `!=`)
//!   joined with `&&` / `||` (also spelled `and` / `AND`, `or` / `OR`), and the `true` / `false`
//!   constants. For example, `killer.freq.size > 2 && bounty < 100 ? 0 : killed.bounty`.
//!   Comparisons cannot be chained.
//! - **Loops** over freq and player lists, with an optional excluded element:
//!   `for(p : killer.freq.players - killer) { s = s + p.bounty; return s }`.
//! - **Function declarations**, e.g., `f(x, y) = x * y`. Declarations are parsed, but cannot
//!   be evaluated.
//!
//! Parsed formulas implement [`Display`](core::fmt::Display), which outputs formula source that
//! parses back into the same AST.
//!
//! # Examples
//!
//! ```
//! # use assert_matches::assert_matches;
//! use arena_formula_parser::{parse_formula, BinaryOp, Expr};
//!
//! const FORMULA: &str = "
//!     // Reward for a kill.
//!     base = killed.bounty / 2;
//!     reward = killer.freq.size > 2 ? base + arena.jackpot ^ 0.5 : base;
//! ";
//!
//! # fn main() -> anyhow::Result<()> {
//! let formula = parse_formula(FORMULA)?;
//! let assignments = formula.assignments();
//! assert_matches!(
//!     &assignments[0].value,
//!     Expr::Binary { op: BinaryOp::Div, lhs, .. } if lhs.is_reference()
//! );
//! assert_matches!(&assignments[1].value, Expr::Ternary { .. });
//! assert_eq!(
//!     formula.to_string(),
//!     "base = killed.bounty / 2; \
//!      reward = killer.freq.size > 2 ? base + arena.jackpot ^ 0.5 : base"
//! );
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

pub use crate::{
    ast::{Assignment, Expr, FnDeclaration, ForLoop, Formula, Logical},
    error::{Context, Error, ErrorKind},
    ops::{BinaryOp, Comparison, LogicalOp, OpPriority, UnaryOp},
    parser::{is_valid_variable_name, parse_expr, parse_formula, parse_logical},
    spans::{InputSpan, Location, NomResult},
};

mod ast;
mod error;
mod fmt;
mod ops;
mod parser;
mod spans;
