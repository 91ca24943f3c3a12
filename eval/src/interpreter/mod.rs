//! Top-level evaluation of formulas.

use arena_formula_parser::Formula;

use self::evaluator::{Evaluator, Scope};
use crate::{Error, Game, PropertyRegistry, VariableMap};

mod evaluator;

/// Rounds `value` to the nearest integer, returning `default` if the value is not finite
/// or does not fit into `i32`.
///
/// # Examples
///
/// ```
/// # use arena_formula_eval::round_to_int;
/// assert_eq!(round_to_int(2.5, 0), 3);
/// assert_eq!(round_to_int(-1.2, 0), -1);
/// assert_eq!(round_to_int(1e20, -1), -1);
/// assert_eq!(round_to_int(f64::NAN, -1), -1);
/// ```
#[allow(clippy::cast_possible_truncation)]
pub fn round_to_int(value: f64, default: i32) -> i32 {
    let rounded = value.round();
    if rounded.is_finite() && rounded >= f64::from(i32::MIN) && rounded <= f64::from(i32::MAX) {
        rounded as i32
    } else {
        default
    }
}

/// Successful result of [`Interpreter::evaluate_retaining()`].
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Evaluation {
    /// Value of the last assignment.
    pub value: f64,
    /// Name of the last assigned variable.
    pub name: String,
}

impl Evaluation {
    /// Converts the value to an integer, returning `default` if the value is not finite
    /// or out of `i32` range.
    pub fn to_int(&self, default: i32) -> i32 {
        round_to_int(self.value, default)
    }
}

/// Formula interpreter.
///
/// The interpreter walks formula ASTs, resolving variables in the caller-provided
/// [`VariableMap`] and property dereferences via the [`PropertyRegistry`].
///
/// # Errors
///
/// Errors do not abort evaluation: a failing sub-expression contributes `0` to the enclosing
/// expression (or `false` to a condition), and the following assignments are still executed.
/// Thus, side effects on the variable table are the same as if the error were not checked.
/// The first error is returned; on error, the evaluated value must be discarded.
///
/// # Evaluation order
///
/// - Function args and both operands of binary operations are evaluated left to right.
/// - Ternary expressions evaluate only the selected branch.
/// - Both operands of `&&` and `||` are always evaluated; there is no short-circuiting.
///
/// # Locking
///
/// The game state is borrowed for the entire evaluation, including all nested loops
/// and property dereferences. Property callbacks rely on this: if the state is guarded
/// by a lock, the caller should hold the lock while calling the interpreter.
///
/// # Examples
///
/// ```
/// use arena_formula_eval::{Game, Interpreter, PropertyRegistry, Value, VariableMap};
/// use arena_formula_parser::parse_formula;
///
/// #[derive(Debug)]
/// struct Demo;
///
/// impl Game for Demo {
///     type State = [f64];
///     type Arena = ();
///     type Player = usize;
/// }
///
/// # fn main() -> anyhow::Result<()> {
/// let mut registry = PropertyRegistry::<Demo>::new();
/// registry.register_player_property("bounty", |bounties: &[f64], &player: &usize| {
///     Value::Number(bounties[player])
/// });
/// let interpreter = Interpreter::new(&registry);
///
/// let formula = parse_formula("base = 10; reward = base + killed.bounty / 2")?;
/// let mut vars = VariableMap::new();
/// vars.insert("killed", Value::Player(1));
/// let bounties = [20.0, 50.0];
/// let reward = interpreter.evaluate(&bounties[..], &formula, &mut vars)?;
/// assert_eq!(reward, 35.0);
/// // Variables created by the formula are removed after evaluation.
/// assert!(!vars.contains("base"));
/// # Ok(())
/// # }
/// ```
pub struct Interpreter<'r, G: Game> {
    registry: &'r PropertyRegistry<G>,
}

impl<G: Game> Clone for Interpreter<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: Game> Copy for Interpreter<'_, G> {}

impl<G: Game> std::fmt::Debug for Interpreter<'_, G> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Interpreter")
            .field("registry", self.registry)
            .finish()
    }
}

impl<'r, G: Game> Interpreter<'r, G> {
    /// Creates an interpreter using the specified property registry.
    pub fn new(registry: &'r PropertyRegistry<G>) -> Self {
        Self { registry }
    }

    /// Evaluates a formula. Variables created by the formula are removed from `vars`
    /// once the evaluation is finished; existing variables retain assigned values.
    pub fn evaluate(
        &self,
        state: &G::State,
        formula: &Formula,
        vars: &mut VariableMap<G>,
    ) -> Result<f64, Error> {
        self.run(state, formula, vars, false)
            .map(|evaluation| evaluation.value)
    }

    /// Evaluates a formula retaining all created variables in `vars`. This allows
    /// the variables to persist across evaluations, e.g. to be used in the following formulas.
    /// Returns the value together with the name of the last assigned variable.
    pub fn evaluate_retaining(
        &self,
        state: &G::State,
        formula: &Formula,
        vars: &mut VariableMap<G>,
    ) -> Result<Evaluation, Error> {
        self.run(state, formula, vars, true)
    }

    /// Evaluates a formula and rounds the result to an integer. If the result is not finite
    /// or does not fit into `i32`, returns `default`. Created variables are removed as with
    /// [`Self::evaluate()`].
    pub fn evaluate_int(
        &self,
        state: &G::State,
        formula: &Formula,
        vars: &mut VariableMap<G>,
        default: i32,
    ) -> Result<i32, Error> {
        self.evaluate(state, formula, vars)
            .map(|value| round_to_int(value, default))
    }

    #[tracing::instrument(
        level = "debug",
        skip(self, state, formula, vars),
        fields(formula = %formula)
    )]
    fn run(
        &self,
        state: &G::State,
        formula: &Formula,
        vars: &mut VariableMap<G>,
        retain: bool,
    ) -> Result<Evaluation, Error> {
        let assignments = match formula {
            Formula::Function(declaration) => {
                return Err(Error::FunctionFormula {
                    name: declaration.name.clone(),
                });
            }
            Formula::Assignments(assignments) => assignments,
        };
        let Some(last) = assignments.last() else {
            return Err(Error::EmptyFormula);
        };

        let mut evaluator = Evaluator::new(self.registry, state, Scope::new(vars, retain));
        let mut value = 0.0;
        for assignment in assignments {
            value = evaluator.eval_assignment(assignment);
        }

        if let Some(err) = evaluator.into_error() {
            tracing::debug!(%err, "evaluation failed");
            return Err(err);
        }
        tracing::debug!(value, name = %last.name, "evaluated formula");
        Ok(Evaluation {
            value,
            name: last.name.clone(),
        })
    }
}
