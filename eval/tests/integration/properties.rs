//! Tests for baseline and custom properties.

use super::*;

#[test]
fn arena_properties() {
    let mut vars = ZoneState::default().context(0);
    assert_eq!(evaluate("x = arena.size", &mut vars), 4.0);
    assert_eq!(evaluate("x = arena.jackpot", &mut vars), 500.0);

    let source = "n = 0; x = for(p : arena.specs) { n = n + 1; return n }";
    assert_eq!(evaluate(source, &mut vars), 1.0);
    let source = "n = 0; x = for(p : arena.everyone) { n = n + 1; return n }";
    assert_eq!(evaluate(source, &mut vars), 5.0);
    let source = "n = 0; x = for(f : arena.freqs) { n = n * 10 + f.size; return n }";
    assert_eq!(evaluate(source, &mut vars), 22.0);
}

#[test]
fn freqs_exclude_spectator_only_freqs() {
    let mut state = ZoneState::default();
    state.pilots[2].spectator = true;
    state.pilots[3] = Pilot::spectator();
    let registry = registry();
    let freqs = registry.arena_property("freqs").unwrap()(&state, &ARENA);
    assert_eq!(freqs, Value::FreqList(vec![Freq::new(ARENA, 0)]));

    let specs = registry.freq_property("specs").unwrap()(&state, &Freq::new(ARENA, 1));
    assert_eq!(specs, Value::PlayerList(vec![2]));
}

#[test]
fn freq_properties() {
    let mut vars = ZoneState::default().context(3);
    assert_eq!(evaluate("x = freq.size", &mut vars), 2.0);
    assert_eq!(evaluate("x = me.freq.arena.jackpot / 100", &mut vars), 5.0);

    let source = "s = 0; x = for(p : freq.players) { s = s + p.bounty; return s }";
    assert_eq!(evaluate(source, &mut vars), 70.0);
}

#[test]
fn player_properties() {
    let mut vars = ZoneState::default().context(1);
    assert_eq!(evaluate("x = me.bounty", &mut vars), 20.0);
    assert_eq!(evaluate("x = me.arena.size + me.freq.size", &mut vars), 6.0);

    vars.insert("killed", Value::Player(2));
    let source = "x = killed.freq.size > 1 && killed.bounty >= me.bounty ? killed.bounty : 0";
    assert_eq!(evaluate(source, &mut vars), 30.0);
}

#[test]
fn overriding_properties() {
    let state = ZoneState::default();
    let mut registry = registry();
    let formula = parse_formula("x = me.bounty * 2").unwrap();
    let mut vars = state.context(0);

    let custom = registry.register_player_property("bounty", |_, _| Value::Number(100.0));
    let value = Interpreter::new(&registry).evaluate(&state, &formula, &mut vars);
    assert_eq!(value, Ok(200.0));

    assert!(registry.unregister_player_property("bounty", &custom));
    assert!(!registry.unregister_player_property("bounty", &custom));
    let value = Interpreter::new(&registry).evaluate(&state, &formula, &mut vars);
    assert_eq!(value, Ok(20.0));
}

#[test]
fn custom_properties() {
    let state = ZoneState::default();
    let mut registry = registry();
    registry.register_player_property("team_bounty", |state: &ZoneState, player: &usize| {
        let freq = state.pilots[*player].freq;
        let total = state
            .pilots
            .iter()
            .filter(|pilot| pilot.freq == freq)
            .map(|pilot| pilot.bounty)
            .sum();
        Value::Number(total)
    });
    assert_eq!(
        registry.property_names(ValueType::Player),
        ["arena", "bounty", "freq", "team_bounty"]
    );
    assert!(registry.property_names(ValueType::PlayerList).is_empty());

    let formula = parse_formula("x = me.team_bounty - me.bounty").unwrap();
    let mut vars = state.context(2);
    let value = Interpreter::new(&registry).evaluate(&state, &formula, &mut vars);
    assert_eq!(value, Ok(40.0));
}

#[test]
fn property_type_errors() {
    let mut vars = ZoneState::default().context(0);
    let err = try_evaluate("x = arena.players + 1", &mut vars).unwrap_err();
    assert_eq!(
        err,
        Error::TypeMismatch {
            expected: ValueType::Number,
            actual: ValueType::PlayerList,
        }
    );

    let err = try_evaluate("x = for(p : arena.jackpot) { return x }", &mut vars).unwrap_err();
    assert_eq!(
        err,
        Error::NotAList {
            actual: ValueType::Number,
        }
    );

    let err = try_evaluate("x = for(p : arena.players - freq) { return x }", &mut vars)
        .unwrap_err();
    assert_eq!(
        err,
        Error::ExclusionMismatch {
            list: ValueType::PlayerList,
            exclusion: ValueType::Freq,
        }
    );
}
