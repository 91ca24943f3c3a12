//! Recursive evaluation of formula ASTs.

use arena_formula_parser::{Assignment, Expr, ForLoop, Logical};

use crate::{fns, Error, Game, PropertyRegistry, Value, ValueType, VariableMap};

/// Variable table borrowed for a single top-level evaluation. Variables created by assignments
/// are removed from the table once the scope is dropped, unless the scope is retaining.
pub(super) struct Scope<'v, G: Game> {
    vars: &'v mut VariableMap<G>,
    created: Vec<String>,
    retain: bool,
}

impl<'v, G: Game> Scope<'v, G> {
    pub fn new(vars: &'v mut VariableMap<G>, retain: bool) -> Self {
        Self {
            vars,
            created: vec![],
            retain,
        }
    }

    fn assign(&mut self, name: &str, value: f64) {
        if !self.vars.contains(name) {
            self.created.push(name.to_owned());
        }
        self.vars.insert(name, Value::Number(value));
    }
}

impl<G: Game> Drop for Scope<'_, G> {
    fn drop(&mut self) {
        if self.retain {
            if !self.created.is_empty() {
                tracing::debug!(retained = ?self.created, "retained created variables");
            }
        } else {
            for name in self.created.drain(..) {
                self.vars.remove(&name);
            }
        }
    }
}

/// Evaluator state for a single top-level evaluation.
pub(super) struct Evaluator<'a, 'v, G: Game> {
    registry: &'a PropertyRegistry<G>,
    state: &'a G::State,
    scope: Scope<'v, G>,
    error: Option<Error>,
}

impl<'a, 'v, G: Game> Evaluator<'a, 'v, G> {
    pub fn new(registry: &'a PropertyRegistry<G>, state: &'a G::State, scope: Scope<'v, G>) -> Self {
        Self {
            registry,
            state,
            scope,
            error: None,
        }
    }

    /// Returns the first recorded error, if any.
    pub fn into_error(self) -> Option<Error> {
        self.error
    }

    fn record(&mut self, err: Error) {
        tracing::debug!(%err, "recorded evaluation error");
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Resolves a reference. Returns `None` (after recording an error) if the reference
    /// cannot be resolved.
    fn eval_variable(&mut self, expr: &Expr) -> Option<Value<G>> {
        match expr {
            Expr::Var(name) => {
                let value = self.scope.vars.get(name).cloned();
                if value.is_none() {
                    self.record(Error::UndefinedVariable { name: name.clone() });
                }
                value
            }
            Expr::Deref { base, field } => {
                let base = self.eval_variable(base)?;
                let value = self.registry.dereference(self.state, &base, field);
                if value.is_none() {
                    self.record(Error::CannotDereference {
                        ty: base.ty(),
                        field: field.clone(),
                    });
                }
                value
            }
            _ => Some(Value::Number(self.eval_double(expr))),
        }
    }

    pub fn eval_double(&mut self, expr: &Expr) -> f64 {
        match expr {
            Expr::Const(value) => *value,
            Expr::Var(_) | Expr::Deref { .. } => match self.eval_variable(expr) {
                Some(Value::Number(value)) => value,
                Some(value) => {
                    self.record(Error::TypeMismatch {
                        expected: ValueType::Number,
                        actual: value.ty(),
                    });
                    0.0
                }
                None => 0.0,
            },
            Expr::Unary { op, inner } => op.apply(self.eval_double(inner)),
            Expr::Binary { lhs, op, rhs } => {
                let lhs = self.eval_double(lhs);
                let rhs = self.eval_double(rhs);
                op.apply(lhs, rhs)
            }
            Expr::Function { name, args } => {
                let args: Vec<_> = args.iter().map(|arg| self.eval_double(arg)).collect();
                fns::call(name, &args).unwrap_or_else(|| {
                    self.record(Error::UnknownFunction {
                        name: name.clone(),
                        arity: args.len(),
                    });
                    0.0
                })
            }
            Expr::Ternary {
                condition,
                then,
                otherwise,
            } => {
                if self.eval_logical(condition) {
                    self.eval_double(then)
                } else {
                    self.eval_double(otherwise)
                }
            }
            Expr::For(for_loop) => self.eval_for(for_loop),
        }
    }

    fn eval_logical(&mut self, logical: &Logical) -> bool {
        match logical {
            Logical::True => true,
            Logical::False => false,
            Logical::Comparison { lhs, op, rhs } => {
                let lhs = self.eval_double(lhs);
                let rhs = self.eval_double(rhs);
                op.compare(lhs, rhs)
            }
            // Both operands are evaluated since they may have side effects.
            Logical::Binary { lhs, op, rhs } => {
                let lhs = self.eval_logical(lhs);
                let rhs = self.eval_logical(rhs);
                op.apply(lhs, rhs)
            }
        }
    }

    pub fn eval_assignment(&mut self, assignment: &Assignment) -> f64 {
        let value = self.eval_double(&assignment.value);
        self.scope.assign(&assignment.name, value);
        value
    }

    fn eval_for(&mut self, for_loop: &ForLoop) -> f64 {
        let Some(list) = self.eval_variable(&for_loop.base) else {
            return 0.0;
        };
        let list_ty = list.ty();
        let elements: Vec<Value<G>> = match list {
            Value::FreqList(freqs) => freqs.into_iter().map(Value::Freq).collect(),
            Value::PlayerList(players) => players.into_iter().map(Value::Player).collect(),
            _ => {
                self.record(Error::NotAList { actual: list_ty });
                return 0.0;
            }
        };

        let exclusion = match &for_loop.exclusion {
            Some(exclusion) => {
                let Some(exclusion) = self.eval_variable(exclusion) else {
                    return 0.0;
                };
                if Some(exclusion.ty()) != list_ty.element_type() {
                    self.record(Error::ExclusionMismatch {
                        list: list_ty,
                        exclusion: exclusion.ty(),
                    });
                    return 0.0;
                }
                Some(exclusion)
            }
            None => None,
        };

        let var = for_loop.var.as_str();
        let shadowed = self.scope.vars.remove(var);
        let mut iterations = 0_usize;
        for element in elements {
            if exclusion.as_ref() == Some(&element) {
                continue;
            }
            self.scope.vars.insert(var, element);
            for assignment in &for_loop.body {
                self.eval_assignment(assignment);
            }
            iterations += 1;
        }
        self.scope.vars.remove(var);
        if let Some(shadowed) = shadowed {
            self.scope.vars.insert(var, shadowed);
        }
        tracing::trace!(var, iterations, "finished loop");

        match self.scope.vars.get(&for_loop.return_name) {
            Some(Value::Number(value)) => *value,
            Some(value) => {
                let actual = value.ty();
                self.record(Error::TypeMismatch {
                    expected: ValueType::Number,
                    actual,
                });
                0.0
            }
            None => {
                self.record(Error::UndefinedVariable {
                    name: for_loop.return_name.clone(),
                });
                0.0
            }
        }
    }
}
