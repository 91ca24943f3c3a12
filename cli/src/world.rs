//! Simulated arena the formulas are evaluated against.

use anyhow::{ensure, Context as _};

use std::{fmt, str::FromStr};

use arena_formula_eval::{
    register_baseline_properties, Freq, Game, PropertyRegistry, Roster, Value, VariableMap,
};

/// Freq assigned to spectators if not specified explicitly.
pub const SPEC_FREQ: i32 = 8025;

/// Marker type for the simulated game.
#[derive(Debug)]
pub struct Sim;

impl Game for Sim {
    type State = World;
    type Arena = String;
    type Player = String;
}

/// Player description in the `NAME[@FREQ][:spec][/BOUNTY]` format, e.g. `alice@1/50`
/// or `bob:spec`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSpec {
    pub name: String,
    pub freq: i32,
    pub spectator: bool,
    pub bounty: f64,
}

impl FromStr for PlayerSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (s, bounty) = match s.rsplit_once('/') {
            Some((head, bounty)) => {
                let bounty = bounty
                    .parse()
                    .with_context(|| format!("invalid bounty `{bounty}`"))?;
                (head, bounty)
            }
            None => (s, 0.0),
        };
        let (s, spectator) = match s.strip_suffix(":spec") {
            Some(head) => (head, true),
            None => (s, false),
        };
        let (name, freq) = match s.split_once('@') {
            Some((name, freq)) => {
                let freq = freq
                    .parse()
                    .with_context(|| format!("invalid freq `{freq}`"))?;
                (name, freq)
            }
            None => (s, if spectator { SPEC_FREQ } else { 0 }),
        };

        ensure!(
            !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
            "invalid player name `{name}`; use alphanumeric chars and underscores"
        );
        Ok(Self {
            name: name.to_owned(),
            freq,
            spectator,
            bounty,
        })
    }
}

impl fmt::Display for PlayerSpec {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}@{}", self.name, self.freq)?;
        if self.spectator {
            formatter.write_str(":spec")?;
        }
        write!(formatter, "/{}", self.bounty)
    }
}

#[derive(Debug, Clone)]
struct PlayerRecord {
    spec: PlayerSpec,
    money: f64,
    exp: f64,
}

/// Game state: a single arena with players.
#[derive(Debug, Clone)]
pub struct World {
    arena: String,
    jackpot: f64,
    players: Vec<PlayerRecord>,
}

impl World {
    pub fn default_players() -> Vec<PlayerSpec> {
        let player = |name: &str, freq, spectator, bounty| PlayerSpec {
            name: name.to_owned(),
            freq,
            spectator,
            bounty,
        };
        vec![
            player("alice", 0, false, 10.0),
            player("bob", 0, false, 25.0),
            player("carol", 1, false, 40.0),
            player("dave", 1, false, 5.0),
            player("eve", SPEC_FREQ, true, 0.0),
        ]
    }

    pub fn new(arena: String, jackpot: f64, players: Vec<PlayerSpec>) -> anyhow::Result<Self> {
        ensure!(!players.is_empty(), "arena must contain at least one player");
        for (i, player) in players.iter().enumerate() {
            ensure!(
                players[..i].iter().all(|other| other.name != player.name),
                "duplicate player `{}`",
                player.name
            );
        }

        let players = players
            .into_iter()
            .map(|spec| PlayerRecord {
                spec,
                money: 1_000.0,
                exp: 0.0,
            })
            .collect();
        Ok(Self {
            arena,
            jackpot,
            players,
        })
    }

    fn player(&self, name: &str) -> Option<&PlayerRecord> {
        self.players.iter().find(|player| player.spec.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.player(name).is_some()
    }

    pub fn first_player(&self) -> &str {
        &self.players[0].spec.name
    }

    pub fn player_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.players.iter().map(|player| player.spec.name.as_str())
    }

    /// Creates a variable table with the context variables for the specified player.
    pub fn context_for(&self, name: &str) -> VariableMap<Sim> {
        let mut vars = VariableMap::new();
        vars.insert("me", Value::Player(name.to_owned()))
            .insert("arena", Value::Arena(self.arena.clone()));
        if let Some(player) = self.player(name) {
            vars.insert(
                "freq",
                Value::Freq(Freq::new(self.arena.clone(), player.spec.freq)),
            )
            .insert("bounty", Value::Number(player.spec.bounty));
        }
        vars
    }

    /// Creates a registry with baseline properties and `player.money` / `player.exp`.
    pub fn registry() -> PropertyRegistry<Sim> {
        let mut registry = PropertyRegistry::new();
        register_baseline_properties(&mut registry);
        registry.register_player_property("money", |world: &World, name: &String| {
            Value::Number(world.player(name).map_or(0.0, |player| player.money))
        });
        registry.register_player_property("exp", |world: &World, name: &String| {
            Value::Number(world.player(name).map_or(0.0, |player| player.exp))
        });
        registry
    }
}

impl Roster for Sim {
    fn arena_players(world: &World, arena: &String) -> Vec<String> {
        if *arena == world.arena {
            world.player_names().map(str::to_owned).collect()
        } else {
            vec![]
        }
    }

    fn player_arena(world: &World, _: &String) -> String {
        world.arena.clone()
    }

    fn player_freq(world: &World, name: &String) -> i32 {
        world.player(name).map_or(0, |player| player.spec.freq)
    }

    fn is_spectator(world: &World, name: &String) -> bool {
        world.player(name).map_or(false, |player| player.spec.spectator)
    }

    fn bounty(world: &World, name: &String) -> f64 {
        world.player(name).map_or(0.0, |player| player.spec.bounty)
    }

    fn jackpot(world: &World, arena: &String) -> f64 {
        if *arena == world.arena {
            world.jackpot
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parsing_player_specs() {
        let spec: PlayerSpec = "alice@1/50".parse().unwrap();
        assert_eq!(
            spec,
            PlayerSpec {
                name: "alice".to_owned(),
                freq: 1,
                spectator: false,
                bounty: 50.0,
            }
        );

        let spec: PlayerSpec = "bob:spec".parse().unwrap();
        assert_eq!(spec.freq, SPEC_FREQ);
        assert!(spec.spectator);
        assert_eq!(spec.bounty, 0.0);

        let spec: PlayerSpec = "carol@2:spec/7.5".parse().unwrap();
        assert_eq!((spec.freq, spec.spectator, spec.bounty), (2, true, 7.5));
        assert_eq!(spec.to_string(), "carol@2:spec/7.5");
    }

    #[test]
    fn invalid_player_specs() {
        let err = "@1".parse::<PlayerSpec>().unwrap_err();
        assert!(err.to_string().contains("invalid player name"), "{err}");
        let err = "alice@x".parse::<PlayerSpec>().unwrap_err();
        assert_eq!(err.to_string(), "invalid freq `x`");
        let err = "alice/lots".parse::<PlayerSpec>().unwrap_err();
        assert_eq!(err.to_string(), "invalid bounty `lots`");
    }

    #[test]
    fn creating_world() {
        let err = World::new("pub".to_owned(), 0.0, vec![]).unwrap_err();
        assert!(err.to_string().contains("at least one player"));

        let players = vec!["alice".parse().unwrap(), "alice@1".parse().unwrap()];
        let err = World::new("pub".to_owned(), 0.0, players).unwrap_err();
        assert_eq!(err.to_string(), "duplicate player `alice`");
    }

    #[test]
    fn baseline_properties() {
        let world = World::new("pub".to_owned(), 500.0, World::default_players()).unwrap();
        let registry = World::registry();
        let arena = Value::Arena("pub".to_owned());

        let players = registry.arena_property("players").unwrap()(&world, &"pub".to_owned());
        assert_matches!(players, Value::PlayerList(names) if names.len() == 4);
        let specs = registry.arena_property("specs").unwrap()(&world, &"pub".to_owned());
        assert_eq!(specs, Value::PlayerList(vec!["eve".to_owned()]));

        let freqs = registry.arena_property("freqs").unwrap()(&world, &"pub".to_owned());
        assert_eq!(
            freqs,
            Value::FreqList(vec![
                Freq::new("pub".to_owned(), 0),
                Freq::new("pub".to_owned(), 1),
            ])
        );

        let size = registry.freq_property("size").unwrap();
        assert_eq!(
            size(&world, &Freq::new("pub".to_owned(), 1)),
            Value::Number(2.0)
        );
        let money = registry.player_property("money").unwrap();
        assert_eq!(money(&world, &"bob".to_owned()), Value::Number(1_000.0));

        let vars = world.context_for("carol");
        assert_eq!(vars["arena"], arena);
        assert_eq!(vars["bounty"], Value::Number(40.0));
        assert_eq!(vars["freq"], Value::Freq(Freq::new("pub".to_owned(), 1)));
    }
}
