//! Values flowing through the interpreter and the game model they refer to.

use core::fmt;

/// Game model the formulas are evaluated against.
///
/// The implementing type is usually a zero-sized marker; the actual data lives
/// in [`State`](Self::State), which the caller borrows for the whole duration of an evaluation
/// (e.g., as a guard of the lock protecting player rosters). Handles are lightweight identifiers
/// resolved against the state by property callbacks.
pub trait Game: 'static {
    /// Shared game state passed to property callbacks.
    type State: ?Sized;
    /// Arena handle.
    type Arena: Clone + PartialEq + fmt::Debug;
    /// Player handle.
    type Player: Clone + PartialEq + fmt::Debug;
}

/// Team (freq) within an arena.
pub struct Freq<G: Game> {
    /// Arena the freq belongs to.
    pub arena: G::Arena,
    /// Freq number.
    pub freq: i32,
}

impl<G: Game> Freq<G> {
    /// Creates a freq handle.
    pub fn new(arena: G::Arena, freq: i32) -> Self {
        Self { arena, freq }
    }
}

impl<G: Game> Clone for Freq<G> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena.clone(),
            freq: self.freq,
        }
    }
}

impl<G: Game> PartialEq for Freq<G> {
    fn eq(&self, other: &Self) -> bool {
        self.freq == other.freq && self.arena == other.arena
    }
}

impl<G: Game> fmt::Debug for Freq<G> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Freq")
            .field("arena", &self.arena)
            .field("freq", &self.freq)
            .finish()
    }
}

/// Value of a variable or a property.
pub enum Value<G: Game> {
    /// Number. Arithmetic is performed on numbers only.
    Number(f64),
    /// Arena handle.
    Arena(G::Arena),
    /// Freq handle.
    Freq(Freq<G>),
    /// Ordered list of freqs.
    FreqList(Vec<Freq<G>>),
    /// Player handle.
    Player(G::Player),
    /// Ordered list of players.
    PlayerList(Vec<G::Player>),
}

impl<G: Game> Value<G> {
    /// Returns the type of this value.
    pub fn ty(&self) -> ValueType {
        match self {
            Self::Number(_) => ValueType::Number,
            Self::Arena(_) => ValueType::Arena,
            Self::Freq(_) => ValueType::Freq,
            Self::FreqList(_) => ValueType::FreqList,
            Self::Player(_) => ValueType::Player,
            Self::PlayerList(_) => ValueType::PlayerList,
        }
    }

    /// Returns the number contained in this value, or `None` if the value is not a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }
}

impl<G: Game> From<f64> for Value<G> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl<G: Game> Clone for Value<G> {
    fn clone(&self) -> Self {
        match self {
            Self::Number(value) => Self::Number(*value),
            Self::Arena(arena) => Self::Arena(arena.clone()),
            Self::Freq(freq) => Self::Freq(freq.clone()),
            Self::FreqList(freqs) => Self::FreqList(freqs.clone()),
            Self::Player(player) => Self::Player(player.clone()),
            Self::PlayerList(players) => Self::PlayerList(players.clone()),
        }
    }
}

impl<G: Game> PartialEq for Value<G> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(x), Self::Number(y)) => x == y,
            (Self::Arena(x), Self::Arena(y)) => x == y,
            (Self::Freq(x), Self::Freq(y)) => x == y,
            (Self::FreqList(x), Self::FreqList(y)) => x == y,
            (Self::Player(x), Self::Player(y)) => x == y,
            (Self::PlayerList(x), Self::PlayerList(y)) => x == y,
            _ => false,
        }
    }
}

impl<G: Game> fmt::Debug for Value<G> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => formatter.debug_tuple("Number").field(value).finish(),
            Self::Arena(arena) => formatter.debug_tuple("Arena").field(arena).finish(),
            Self::Freq(freq) => formatter.debug_tuple("Freq").field(freq).finish(),
            Self::FreqList(freqs) => formatter.debug_tuple("FreqList").field(freqs).finish(),
            Self::Player(player) => formatter.debug_tuple("Player").field(player).finish(),
            Self::PlayerList(players) => {
                formatter.debug_tuple("PlayerList").field(players).finish()
            }
        }
    }
}

/// Type of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ValueType {
    /// Number.
    Number,
    /// Arena handle.
    Arena,
    /// Freq handle.
    Freq,
    /// List of freqs.
    FreqList,
    /// Player handle.
    Player,
    /// List of players.
    PlayerList,
}

impl ValueType {
    /// Returns the type of list elements, or `None` if this type is not a list.
    pub fn element_type(self) -> Option<Self> {
        match self {
            Self::FreqList => Some(Self::Freq),
            Self::PlayerList => Some(Self::Player),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Number => "number",
            Self::Arena => "arena",
            Self::Freq => "freq",
            Self::FreqList => "freq list",
            Self::Player => "player",
            Self::PlayerList => "player list",
        })
    }
}
