//! Property registry providing values for `base.field` dereferences.

use hashbrown::HashMap;

use std::{fmt, sync::Arc};

use crate::{Freq, Game, Value, ValueType};

/// Callback providing an arena property, e.g., `arena.jackpot`.
pub type ArenaProperty<G> =
    Arc<dyn Fn(&<G as Game>::State, &<G as Game>::Arena) -> Value<G> + Send + Sync>;
/// Callback providing a freq property, e.g., `freq.size`.
pub type FreqProperty<G> = Arc<dyn Fn(&<G as Game>::State, &Freq<G>) -> Value<G> + Send + Sync>;
/// Callback providing a player property, e.g., `player.bounty`.
pub type PlayerProperty<G> =
    Arc<dyn Fn(&<G as Game>::State, &<G as Game>::Player) -> Value<G> + Send + Sync>;

/// Properties of a single kind keyed by the field name. Registrations under the same name
/// form a stack; the most recent one is visible.
struct PropertyTable<F: ?Sized> {
    kind: &'static str,
    entries: HashMap<String, Vec<Arc<F>>>,
}

impl<F: ?Sized> PropertyTable<F> {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
        }
    }

    fn register(&mut self, name: &str, property: Arc<F>) {
        let stack = self.entries.entry(name.to_owned()).or_default();
        if !stack.is_empty() {
            tracing::warn!(
                kind = self.kind,
                name,
                shadowed = stack.len(),
                "property registration shadows an existing one"
            );
        }
        stack.push(property);
    }

    fn unregister(&mut self, name: &str, property: &Arc<F>) -> bool {
        let Some(stack) = self.entries.get_mut(name) else {
            return false;
        };
        let Some(pos) = stack.iter().rposition(|entry| Arc::ptr_eq(entry, property)) else {
            return false;
        };
        stack.remove(pos);
        if stack.is_empty() {
            self.entries.remove(name);
        }
        true
    }

    fn get(&self, name: &str) -> Option<&Arc<F>> {
        self.entries.get(name).and_then(|stack| stack.last())
    }

    fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Registry of arena, freq and player properties.
///
/// The registry is the only source of values for property dereferences such as `arena.jackpot`
/// or `killer.freq`. Host modules register callbacks that read the shared game state;
/// callbacks may assume that whatever lock guards this state is held by the caller
/// for the whole evaluation.
///
/// Registering a property under an existing name shadows the previous callback
/// (a warning is logged). Unregistering removes the exact registered callback, identified
/// by the [`Arc`] returned on registration, so that the shadowed callback becomes visible again.
///
/// # Examples
///
/// ```
/// # use arena_formula_eval::{Game, PropertyRegistry, Value};
/// # #[derive(Debug)] struct Demo;
/// # impl Game for Demo { type State = (); type Arena = u32; type Player = u32; }
/// let mut registry = PropertyRegistry::<Demo>::new();
/// let original = registry.register_arena_property("jackpot", |_: &(), _: &u32| {
///     Value::Number(1_000.0)
/// });
/// let bonus = registry.register_arena_property("jackpot", |_: &(), _: &u32| {
///     Value::Number(5_000.0)
/// });
///
/// let jackpot = registry.arena_property("jackpot").unwrap();
/// assert_eq!(jackpot(&(), &0), Value::Number(5_000.0));
/// assert!(registry.unregister_arena_property("jackpot", &bonus));
/// let jackpot = registry.arena_property("jackpot").unwrap();
/// assert_eq!(jackpot(&(), &0), Value::Number(1_000.0));
/// # drop(original);
/// ```
pub struct PropertyRegistry<G: Game> {
    arena: PropertyTable<dyn Fn(&G::State, &G::Arena) -> Value<G> + Send + Sync>,
    freq: PropertyTable<dyn Fn(&G::State, &Freq<G>) -> Value<G> + Send + Sync>,
    player: PropertyTable<dyn Fn(&G::State, &G::Player) -> Value<G> + Send + Sync>,
}

impl<G: Game> Default for PropertyRegistry<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Game> fmt::Debug for PropertyRegistry<G> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PropertyRegistry")
            .field("arena", &self.arena.sorted_names())
            .field("freq", &self.freq.sorted_names())
            .field("player", &self.player.sorted_names())
            .finish()
    }
}

impl<G: Game> PropertyRegistry<G> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            arena: PropertyTable::new("arena"),
            freq: PropertyTable::new("freq"),
            player: PropertyTable::new("player"),
        }
    }

    /// Registers an arena property. Returns the shared callback, which can be used to
    /// [unregister](Self::unregister_arena_property) it later.
    pub fn register_arena_property<F>(&mut self, name: &str, property: F) -> ArenaProperty<G>
    where
        F: Fn(&G::State, &G::Arena) -> Value<G> + Send + Sync + 'static,
    {
        let property: ArenaProperty<G> = Arc::new(property);
        self.arena.register(name, Arc::clone(&property));
        property
    }

    /// Registers a freq property.
    pub fn register_freq_property<F>(&mut self, name: &str, property: F) -> FreqProperty<G>
    where
        F: Fn(&G::State, &Freq<G>) -> Value<G> + Send + Sync + 'static,
    {
        let property: FreqProperty<G> = Arc::new(property);
        self.freq.register(name, Arc::clone(&property));
        property
    }

    /// Registers a player property.
    pub fn register_player_property<F>(&mut self, name: &str, property: F) -> PlayerProperty<G>
    where
        F: Fn(&G::State, &G::Player) -> Value<G> + Send + Sync + 'static,
    {
        let property: PlayerProperty<G> = Arc::new(property);
        self.player.register(name, Arc::clone(&property));
        property
    }

    /// Removes the exact `(name, property)` registration. Returns `false` if there is
    /// no such registration.
    pub fn unregister_arena_property(&mut self, name: &str, property: &ArenaProperty<G>) -> bool {
        self.arena.unregister(name, property)
    }

    /// Removes the exact `(name, property)` freq registration.
    pub fn unregister_freq_property(&mut self, name: &str, property: &FreqProperty<G>) -> bool {
        self.freq.unregister(name, property)
    }

    /// Removes the exact `(name, property)` player registration.
    pub fn unregister_player_property(
        &mut self,
        name: &str,
        property: &PlayerProperty<G>,
    ) -> bool {
        self.player.unregister(name, property)
    }

    /// Returns the visible arena property with the specified name.
    pub fn arena_property(&self, name: &str) -> Option<&ArenaProperty<G>> {
        self.arena.get(name)
    }

    /// Returns the visible freq property with the specified name.
    pub fn freq_property(&self, name: &str) -> Option<&FreqProperty<G>> {
        self.freq.get(name)
    }

    /// Returns the visible player property with the specified name.
    pub fn player_property(&self, name: &str) -> Option<&PlayerProperty<G>> {
        self.player.get(name)
    }

    /// Returns sorted names of properties visible for values of the specified type.
    /// The returned list is empty for types without properties (numbers and lists).
    pub fn property_names(&self, ty: ValueType) -> Vec<&str> {
        match ty {
            ValueType::Arena => self.arena.sorted_names(),
            ValueType::Freq => self.freq.sorted_names(),
            ValueType::Player => self.player.sorted_names(),
            _ => vec![],
        }
    }

    /// Resolves `base.field`. Returns `None` if the base type has no properties
    /// or no property with this name is registered.
    pub(crate) fn dereference(
        &self,
        state: &G::State,
        base: &Value<G>,
        field: &str,
    ) -> Option<Value<G>> {
        match base {
            Value::Arena(arena) => self.arena.get(field).map(|property| property(state, arena)),
            Value::Freq(freq) => self.freq.get(field).map(|property| property(state, freq)),
            Value::Player(player) => self
                .player
                .get(field)
                .map(|property| property(state, player)),
            _ => None,
        }
    }
}
