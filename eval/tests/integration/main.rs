//! Tests of formula evaluation against a mock zone with baseline properties.

use assert_matches::assert_matches;

use arena_formula_eval::{
    register_baseline_properties, Error, Freq, Game, Interpreter, PropertyRegistry, Roster,
    Value, ValueType, VariableMap,
};
use arena_formula_parser::parse_formula;

mod properties;

const ARENA: &str = "pub";
const SPEC_FREQ: i32 = 8025;

#[derive(Debug)]
struct Zone;

#[derive(Debug)]
struct Pilot {
    freq: i32,
    spectator: bool,
    bounty: f64,
}

impl Pilot {
    fn new(freq: i32, bounty: f64) -> Self {
        Self {
            freq,
            spectator: false,
            bounty,
        }
    }

    fn spectator() -> Self {
        Self {
            freq: SPEC_FREQ,
            spectator: true,
            bounty: 0.0,
        }
    }
}

#[derive(Debug)]
struct ZoneState {
    jackpot: f64,
    pilots: Vec<Pilot>,
}

impl Default for ZoneState {
    /// Two freqs with two players each, plus a spectator.
    fn default() -> Self {
        Self {
            jackpot: 500.0,
            pilots: vec![
                Pilot::new(0, 10.0),
                Pilot::new(0, 20.0),
                Pilot::new(1, 30.0),
                Pilot::new(1, 40.0),
                Pilot::spectator(),
            ],
        }
    }
}

impl ZoneState {
    fn context(&self, player: usize) -> VariableMap<Zone> {
        let mut vars = VariableMap::new();
        vars.insert("me", Value::Player(player))
            .insert("arena", Value::Arena(ARENA))
            .insert("freq", Value::Freq(Freq::new(ARENA, self.pilots[player].freq)));
        vars
    }
}

impl Game for Zone {
    type State = ZoneState;
    type Arena = &'static str;
    type Player = usize;
}

impl Roster for Zone {
    fn arena_players(state: &ZoneState, arena: &&'static str) -> Vec<usize> {
        if *arena == ARENA {
            (0..state.pilots.len()).collect()
        } else {
            vec![]
        }
    }

    fn player_arena(_: &ZoneState, _: &usize) -> &'static str {
        ARENA
    }

    fn player_freq(state: &ZoneState, player: &usize) -> i32 {
        state.pilots[*player].freq
    }

    fn is_spectator(state: &ZoneState, player: &usize) -> bool {
        state.pilots[*player].spectator
    }

    fn bounty(state: &ZoneState, player: &usize) -> f64 {
        state.pilots[*player].bounty
    }

    fn jackpot(state: &ZoneState, arena: &&'static str) -> f64 {
        if *arena == ARENA {
            state.jackpot
        } else {
            0.0
        }
    }
}

fn registry() -> PropertyRegistry<Zone> {
    let mut registry = PropertyRegistry::new();
    register_baseline_properties(&mut registry);
    registry
}

fn try_evaluate(source: &str, vars: &mut VariableMap<Zone>) -> Result<f64, Error> {
    let formula = parse_formula(source).unwrap();
    let registry = registry();
    Interpreter::new(&registry).evaluate(&ZoneState::default(), &formula, vars)
}

fn evaluate(source: &str, vars: &mut VariableMap<Zone>) -> f64 {
    try_evaluate(source, vars).unwrap()
}

#[test]
fn arithmetic_precedence() {
    let state = ZoneState::default();
    let registry = registry();
    let mut vars = state.context(0);
    let formula = parse_formula("x = 2 + 3 * 4").unwrap();
    let evaluation = Interpreter::new(&registry)
        .evaluate_retaining(&state, &formula, &mut vars)
        .unwrap();
    assert_eq!(evaluation.value, 14.0);
    assert_eq!(evaluation.name, "x");

    assert_eq!(evaluate("x = 1 - 2 - 3", &mut vars), -4.0);
    assert_eq!(evaluate("x = 2 ^ 3 ^ 2", &mut vars), 512.0);
    assert_eq!(evaluate("x = -2 ^ 2", &mut vars), 4.0);
    assert_eq!(evaluate("x = (1 + 2) * 3 / 2", &mut vars), 4.5);
    assert_eq!(evaluate("x = 1 / 0", &mut vars), f64::INFINITY);
    assert!(evaluate("x = 0 / 0", &mut vars).is_nan());
}

#[test]
fn ternary_evaluates_single_branch() {
    let mut vars = ZoneState::default().context(0);
    assert_eq!(evaluate("x = 1 < 2 ? 5 : missing", &mut vars), 5.0);
    assert_eq!(evaluate("x = 1 > 2 ? missing : 7", &mut vars), 7.0);

    let err = try_evaluate("x = 1 < 2 ? missing : 7", &mut vars).unwrap_err();
    assert_matches!(err, Error::UndefinedVariable { name } if name == "missing");

    // A loop in the untaken branch must not run.
    vars.insert("sentinel", Value::Number(0.0));
    let source = "x = 1 < 2 ? 5 : for(p : arena.players) { sentinel = 1; return sentinel }";
    assert_eq!(evaluate(source, &mut vars), 5.0);
    assert_eq!(vars["sentinel"], Value::Number(0.0));
    let source = "x = 1 > 2 ? 5 : for(p : arena.players) { sentinel = 1; return sentinel }";
    assert_eq!(evaluate(source, &mut vars), 1.0);
    assert_eq!(vars["sentinel"], Value::Number(1.0));
}

#[test]
fn logical_ops_evaluate_both_operands() {
    let mut vars = ZoneState::default().context(0);
    let err = try_evaluate("x = false && missing > 0 ? 1 : 2", &mut vars).unwrap_err();
    assert_matches!(err, Error::UndefinedVariable { name } if name == "missing");
    let err = try_evaluate("x = true OR missing > 0 ? 1 : 2", &mut vars).unwrap_err();
    assert_matches!(err, Error::UndefinedVariable { name } if name == "missing");

    // Side effects of the loop in the right-hand operand are observable.
    let state = ZoneState::default();
    let registry = registry();
    let formula = parse_formula(
        "s = 0; x = false AND for(p : arena.players) { s = s + 1; return s } > 0 ? 1 : 2",
    )
    .unwrap();
    let evaluation = Interpreter::new(&registry)
        .evaluate_retaining(&state, &formula, &mut vars)
        .unwrap();
    assert_eq!(evaluation.value, 2.0);
    assert_eq!(vars["s"], Value::Number(4.0));
}

#[test]
fn temporary_variables_do_not_leak() {
    let mut vars = ZoneState::default().context(2);
    let len = vars.len();
    let value = evaluate(
        "base = me.bounty / 2; bonus = for(p : freq.players - me) { base = base + p.bounty; return base }",
        &mut vars,
    );
    assert_eq!(value, 55.0);
    assert_eq!(vars.len(), len);
    assert!(!vars.contains("base"));
    assert!(!vars.contains("p"));

    let formula = parse_formula("y = arena.size * 2; z = y + freq.size").unwrap();
    let state = ZoneState::default();
    let registry = registry();
    let interpreter = Interpreter::new(&registry);
    for _ in 0..2 {
        let value = interpreter.evaluate(&state, &formula, &mut vars);
        assert_eq!(value, Ok(10.0));
        assert_eq!(vars.len(), len);
    }
}

#[test]
fn retained_variables_are_visible_in_following_formulas() {
    let state = ZoneState::default();
    let registry = registry();
    let interpreter = Interpreter::new(&registry);
    let mut vars = state.context(0);

    let formula = parse_formula("ans = 5").unwrap();
    interpreter
        .evaluate_retaining(&state, &formula, &mut vars)
        .unwrap();
    let formula = parse_formula("ans2 = ans + 1").unwrap();
    let evaluation = interpreter
        .evaluate_retaining(&state, &formula, &mut vars)
        .unwrap();
    assert_eq!(evaluation.value, 6.0);
    assert_eq!(vars["ans"], Value::Number(5.0));
    assert_eq!(vars["ans2"], Value::Number(6.0));
}

#[test]
fn loop_exclusion() {
    let mut vars = ZoneState::default().context(0);
    let value = evaluate(
        "sum = 0; x = for(p : freq.everyone - me) { sum = sum + 1; return sum }",
        &mut vars,
    );
    assert_eq!(value, 1.0);

    let value = evaluate(
        "sum = 0; x = for(f : arena.freqs - freq) { sum = sum + f.size; return sum }",
        &mut vars,
    );
    assert_eq!(value, 2.0);

    // Excluding an element not in the list has no effect.
    vars.insert("ghost", Value::Player(100));
    let value = evaluate(
        "sum = 0; x = for(p : arena.players - ghost) { sum = sum + p.bounty; return sum }",
        &mut vars,
    );
    assert_eq!(value, 100.0);
}

#[test]
fn unknown_property() {
    let mut vars = ZoneState::default().context(0);
    let err = try_evaluate("x = arena.bogusfield", &mut vars).unwrap_err();
    assert_eq!(
        err,
        Error::CannotDereference {
            ty: ValueType::Arena,
            field: "bogusfield".to_owned(),
        }
    );
    assert!(err.to_string().contains("cannot dereference"), "{err}");

    let err = try_evaluate("x = arena.freqs.size", &mut vars).unwrap_err();
    assert_matches!(
        err,
        Error::CannotDereference { ty: ValueType::FreqList, field } if field == "size"
    );
}

#[test]
fn integer_evaluation() {
    let state = ZoneState::default();
    let registry = registry();
    let interpreter = Interpreter::new(&registry);
    let mut vars = state.context(0);

    let formula = parse_formula("x = arena.jackpot / 3").unwrap();
    let value = interpreter.evaluate_int(&state, &formula, &mut vars, -1);
    assert_eq!(value, Ok(167));
    let formula = parse_formula("x = 1e20").unwrap();
    let value = interpreter.evaluate_int(&state, &formula, &mut vars, -1);
    assert_eq!(value, Ok(-1));
    let formula = parse_formula("x = -me.bounty / 4").unwrap();
    let value = interpreter.evaluate_int(&state, &formula, &mut vars, 0);
    assert_eq!(value, Ok(-3));
}
