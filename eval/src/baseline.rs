//! Baseline arena, freq and player properties.

use crate::{Freq, Game, PropertyRegistry, Value};

/// Read-only view of arena rosters necessary for the [baseline properties].
///
/// All methods receive the game state borrowed for the current evaluation.
///
/// [baseline properties]: register_baseline_properties()
pub trait Roster: Game {
    /// Returns all players in the arena (both playing and spectating) in a stable order.
    fn arena_players(state: &Self::State, arena: &Self::Arena) -> Vec<Self::Player>;
    /// Returns the arena the player is in.
    fn player_arena(state: &Self::State, player: &Self::Player) -> Self::Arena;
    /// Returns the freq of the player.
    fn player_freq(state: &Self::State, player: &Self::Player) -> i32;
    /// Checks whether the player is a spectator.
    fn is_spectator(state: &Self::State, player: &Self::Player) -> bool;
    /// Returns the current bounty of the player.
    fn bounty(state: &Self::State, player: &Self::Player) -> f64;
    /// Returns the current jackpot of the arena.
    fn jackpot(state: &Self::State, arena: &Self::Arena) -> f64;
}

#[derive(Debug, Clone, Copy)]
enum Membership {
    Playing,
    Spectating,
    Everyone,
}

impl Membership {
    fn matches<G: Roster>(self, state: &G::State, player: &G::Player) -> bool {
        match self {
            Self::Playing => !G::is_spectator(state, player),
            Self::Spectating => G::is_spectator(state, player),
            Self::Everyone => true,
        }
    }
}

fn arena_members<G: Roster>(
    state: &G::State,
    arena: &G::Arena,
    membership: Membership,
) -> Vec<G::Player> {
    let mut players = G::arena_players(state, arena);
    players.retain(|player| membership.matches::<G>(state, player));
    players
}

fn freq_members<G: Roster>(
    state: &G::State,
    freq: &Freq<G>,
    membership: Membership,
) -> Vec<G::Player> {
    let mut players = G::arena_players(state, &freq.arena);
    players.retain(|player| {
        G::player_freq(state, player) == freq.freq && membership.matches::<G>(state, player)
    });
    players
}

/// Distinct freqs with at least one non-spectator, in ascending order.
fn arena_freqs<G: Roster>(state: &G::State, arena: &G::Arena) -> Vec<Freq<G>> {
    let mut freqs: Vec<_> = G::arena_players(state, arena)
        .iter()
        .filter(|player| !G::is_spectator(state, player))
        .map(|player| G::player_freq(state, player))
        .collect();
    freqs.sort_unstable();
    freqs.dedup();
    freqs
        .into_iter()
        .map(|freq| Freq::new(arena.clone(), freq))
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn count_players<G: Game>(players: &[G::Player]) -> Value<G> {
    Value::Number(players.len() as f64)
}

/// Registers baseline properties:
///
/// | Type | Properties |
/// |------|------------|
/// | arena | `players`, `specs`, `everyone`, `freqs`, `jackpot`, `size` |
/// | freq | `players`, `specs`, `everyone`, `arena`, `size` |
/// | player | `arena`, `freq`, `bounty` |
///
/// `players` lists non-spectators, `specs` spectators, and `everyone` all players.
/// `size` is the number of non-spectators.
pub fn register_baseline_properties<G: Roster>(registry: &mut PropertyRegistry<G>) {
    for (name, membership) in [
        ("players", Membership::Playing),
        ("specs", Membership::Spectating),
        ("everyone", Membership::Everyone),
    ] {
        registry.register_arena_property(name, move |state, arena| {
            Value::PlayerList(arena_members::<G>(state, arena, membership))
        });
        registry.register_freq_property(name, move |state, freq| {
            Value::PlayerList(freq_members::<G>(state, freq, membership))
        });
    }

    registry.register_arena_property("freqs", |state, arena| {
        Value::FreqList(arena_freqs::<G>(state, arena))
    });
    registry.register_arena_property("jackpot", |state, arena| {
        Value::Number(G::jackpot(state, arena))
    });
    registry.register_arena_property("size", |state, arena| {
        count_players::<G>(&arena_members::<G>(state, arena, Membership::Playing))
    });

    registry.register_freq_property("arena", |_, freq| Value::Arena(freq.arena.clone()));
    registry.register_freq_property("size", |state, freq| {
        count_players::<G>(&freq_members::<G>(state, freq, Membership::Playing))
    });

    registry.register_player_property("arena", |state, player| {
        Value::Arena(G::player_arena(state, player))
    });
    registry.register_player_property("freq", |state, player| {
        let arena = G::player_arena(state, player);
        Value::Freq(Freq::new(arena, G::player_freq(state, player)))
    });
    registry.register_player_property("bounty", |state, player| {
        Value::Number(G::bounty(state, player))
    });
}
