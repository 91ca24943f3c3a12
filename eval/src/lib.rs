//! Interpreter for formulas produced by [`arena-formula-parser`], evaluated against live
//! game state.
//!
//! # How it works
//!
//! 1. The host describes its game model by implementing [`Game`]: handle types for arenas
//!   and players, and the shared state borrowed for each evaluation.
//! 2. Host modules populate a [`PropertyRegistry`] with callbacks supplying arena, freq
//!   and player properties (e.g., `arena.jackpot` or `killer.bounty`). Hosts implementing
//!   [`Roster`] can install the common properties with [`register_baseline_properties()`].
//! 3. The caller fills a [`VariableMap`] with context variables (e.g., `killer` or `arena`)
//!   and runs a parsed formula with an [`Interpreter`].
//!
//! # Semantics
//!
//! - [`Value`]s have 6 types: numbers, arenas, freqs, freq lists, players and player lists.
//!   Arithmetic, comparisons and function calls are defined on numbers only; other values
//!   can only be dereferenced or iterated over in loops.
//! - Assignments always store a number. Assigning to an existing variable (even a non-numeric
//!   one) overwrites it in place; otherwise, a new variable is created.
//! - Variables created during an evaluation are either removed once it is finished, or retained
//!   in the variable map (see [`Interpreter::evaluate_retaining()`]). Retaining variables
//!   in a durable map allows stateful formulas, such as `money = money + 5`.
//! - Division and power follow IEEE 754, so NaNs and infinities propagate. Comparisons involving
//!   NaN are false, except for `!=`.
//! - Ternary expressions evaluate only the selected branch, while `&&` and `||` always
//!   evaluate both operands.
//! - Loops iterate over a freq or player list, optionally skipping an excluded element.
//!   The loop variable shadows an existing variable with the same name only within the loop.
//! - Errors do not abort evaluation; see [`Interpreter`] docs for details.
//!
//! Built-in functions are:
//!
//! - Unary: `abs`, `acos`, `acosh`, `asin`, `asinh`, `atan`, `atanh`, `ceil`, `cos`, `cosh`,
//!   `exp`, `floor`, `log` (natural logarithm), `log10`, `log2`, `round`, `sin`, `sinh`, `sqrt`,
//!   `tan`, `tanh`, `trunc`.
//! - Binary: `atan2`, `hypot`, `max`, `min`, `mod` (remainder with the dividend sign),
//!   `remainder` (IEEE 754 remainder).
//!
//! [`arena-formula-parser`]: arena_formula_parser
//!
//! # Examples
//!
//! ```
//! use arena_formula_eval::{
//!     register_baseline_properties, Game, Interpreter, PropertyRegistry, Roster, Value,
//!     VariableMap,
//! };
//! use arena_formula_parser::parse_formula;
//!
//! /// Players in a single arena: `(freq, bounty)` pairs.
//! #[derive(Debug)]
//! struct Demo;
//!
//! impl Game for Demo {
//!     type State = Vec<(i32, u32)>;
//!     type Arena = ();
//!     type Player = usize;
//! }
//!
//! impl Roster for Demo {
//!     fn arena_players(state: &Self::State, _: &()) -> Vec<usize> {
//!         (0..state.len()).collect()
//!     }
//!
//!     fn player_arena(_: &Self::State, _: &usize) {}
//!
//!     fn player_freq(state: &Self::State, &player: &usize) -> i32 {
//!         state[player].0
//!     }
//!
//!     fn is_spectator(_: &Self::State, _: &usize) -> bool {
//!         false
//!     }
//!
//!     fn bounty(state: &Self::State, &player: &usize) -> f64 {
//!         state[player].1.into()
//!     }
//!
//!     fn jackpot(_: &Self::State, _: &()) -> f64 {
//!         0.0
//!     }
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut registry = PropertyRegistry::new();
//! register_baseline_properties::<Demo>(&mut registry);
//! let interpreter = Interpreter::new(&registry);
//!
//! // Reward split among the killer's teammates.
//! let formula = parse_formula("
//!     total = killed.bounty * 2;
//!     share = total / killer.freq.size;
//! ")?;
//! let mut vars = VariableMap::new();
//! vars.insert("killer", Value::Player(0))
//!     .insert("killed", Value::Player(2));
//! let state = vec![(0, 10), (0, 5), (1, 30)];
//! let share = interpreter.evaluate(&state, &formula, &mut vars)?;
//! assert_eq!(share, 30.0);
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
    baseline::{register_baseline_properties, Roster},
    error::Error,
    fns::function_names,
    interpreter::{round_to_int, Evaluation, Interpreter},
    registry::{ArenaProperty, FreqProperty, PlayerProperty, PropertyRegistry},
    value::{Freq, Game, Value, ValueType},
    variable_map::VariableMap,
};

mod baseline;
mod error;
mod fns;
mod interpreter;
mod registry;
mod value;
mod variable_map;
