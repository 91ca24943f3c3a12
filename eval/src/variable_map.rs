//! Variable table.

use hashbrown::{hash_map, HashMap};

use core::{fmt, iter, ops};

use crate::{Game, Value};

/// Named variables visible to formulas.
///
/// A map is owned by the caller and may be either transient (created for a single evaluation)
/// or durable (e.g., one per connected player, surviving many evaluations). Durable maps
/// are what allows stateful formulas, such as `money = money + 5`.
///
/// # Examples
///
/// ```
/// # use arena_formula_eval::{Game, Value, VariableMap};
/// # #[derive(Debug)] struct Demo;
/// # impl Game for Demo { type State = (); type Arena = u32; type Player = u32; }
/// let mut vars = VariableMap::<Demo>::new();
/// vars.insert("arena", Value::Arena(0))
///     .insert("bounty", Value::Number(25.0));
/// assert_eq!(vars["bounty"], Value::Number(25.0));
/// assert!(vars.contains("arena"));
/// assert_eq!(vars.len(), 2);
/// ```
pub struct VariableMap<G: Game> {
    variables: HashMap<String, Value<G>>,
}

impl<G: Game> Default for VariableMap<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Game> Clone for VariableMap<G> {
    fn clone(&self) -> Self {
        Self {
            variables: self.variables.clone(),
        }
    }
}

impl<G: Game> PartialEq for VariableMap<G> {
    fn eq(&self, other: &Self) -> bool {
        self.variables == other.variables
    }
}

impl<G: Game> fmt::Debug for VariableMap<G> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<G: Game> VariableMap<G> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            variables: HashMap::new(),
        }
    }

    /// Gets a variable by name.
    pub fn get(&self, name: &str) -> Option<&Value<G>> {
        self.variables.get(name)
    }

    /// Checks if this map contains a variable with the specified name.
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Iterates over variables in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value<G>)> + '_ {
        self.variables
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Checks whether this map is empty.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Inserts a variable with the specified name, replacing the previous value if any.
    pub fn insert(&mut self, name: &str, value: Value<G>) -> &mut Self {
        if let Some(existing) = self.variables.get_mut(name) {
            *existing = value;
        } else {
            self.variables.insert(name.to_owned(), value);
        }
        self
    }

    /// Removes a variable, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value<G>> {
        self.variables.remove(name)
    }

    /// Removes all variables.
    pub fn clear(&mut self) {
        self.variables.clear();
    }
}

impl<G: Game> ops::Index<&str> for VariableMap<G> {
    type Output = Value<G>;

    fn index(&self, index: &str) -> &Self::Output {
        self.get(index)
            .unwrap_or_else(|| panic!("Variable `{index}` is not defined"))
    }
}

impl<G: Game> IntoIterator for VariableMap<G> {
    type Item = (String, Value<G>);
    type IntoIter = hash_map::IntoIter<String, Value<G>>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.into_iter()
    }
}

impl<'r, G: Game> IntoIterator for &'r VariableMap<G> {
    type Item = (&'r str, &'r Value<G>);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'r>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl<G: Game, S: AsRef<str>> Extend<(S, Value<G>)> for VariableMap<G> {
    fn extend<I: IntoIterator<Item = (S, Value<G>)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name.as_ref(), value);
        }
    }
}

impl<G: Game, S: AsRef<str>> iter::FromIterator<(S, Value<G>)> for VariableMap<G> {
    fn from_iter<I: IntoIterator<Item = (S, Value<G>)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Mock;

    impl Game for Mock {
        type State = ();
        type Arena = &'static str;
        type Player = u32;
    }

    #[test]
    fn collecting_and_extending() {
        let mut vars: VariableMap<Mock> = [
            ("arena", Value::Arena("pub")),
            ("x", Value::Number(1.0)),
        ]
        .into_iter()
        .collect();
        assert_eq!(vars.len(), 2);

        vars.extend([
            ("x".to_owned(), Value::Number(2.0)),
            ("y".to_owned(), Value::Number(3.0)),
        ]);
        assert_eq!(vars.len(), 3);
        assert_eq!(vars["x"], Value::Number(2.0));

        let mut names: Vec<_> = (&vars).into_iter().map(|(name, _)| name).collect();
        names.sort_unstable();
        assert_eq!(names, ["arena", "x", "y"]);

        let removed = vars.remove("y");
        assert_eq!(removed, Some(Value::Number(3.0)));
        let owned: Vec<_> = vars.clone().into_iter().collect();
        assert_eq!(owned.len(), 2);

        vars.clear();
        assert!(vars.is_empty());
    }
}
