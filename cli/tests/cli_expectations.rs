use assert_cmd::prelude::*;
use predicates::prelude::*;
use unindent::unindent;

use std::process::Command;

fn create_command(args: &[&str]) -> Command {
    let mut command = Command::cargo_bin("arena-formula").expect("CLI binary");
    command
        .env("TERM", "dumb")
        .env("COLOR", "never")
        .env_remove("ARENA_FORMULA_LOG")
        .env_remove("RUST_LOG")
        .args(args);
    command
}

fn eval_command(formula: &str) -> Command {
    create_command(&["eval", formula])
}

#[test]
fn successful_execution() {
    let assert = eval_command("x = 2 + 3 * 4").assert();
    assert.success().stdout("x = 14\n");
}

#[test]
fn bare_expression() {
    let assert = eval_command("1 - 2 - 3").assert();
    assert.success().stdout("ans = -4\n");
    let assert = eval_command("2 ^ 3 ^ 2").assert();
    assert.success().stdout("ans = 512\n");
}

#[test]
fn formula_with_context() {
    let assert = eval_command("reward = me.bounty * 2 + arena.size").assert();
    assert.success().stdout("reward = 24\n");

    const FORMULA: &str = "s = 0; x = for(p : freq.players - me) { s = s + p.bounty; return s }";
    let assert = create_command(&["eval", "--as", "carol", FORMULA]).assert();
    assert.success().stdout("x = 5\n");
}

#[test]
fn custom_players() {
    let assert = create_command(&[
        "eval",
        "--player",
        "zed@1/8",
        "--player",
        "yan@2/4",
        "--player",
        "xia:spec",
        "--jackpot",
        "90",
        "n = arena.jackpot / arena.size + arena.freqs.size",
    ])
    .assert();
    // `freqs` is a list, so it cannot be dereferenced further.
    assert
        .failure()
        .code(2)
        .stderr(predicate::str::contains("cannot dereference freq list"));

    let assert = create_command(&[
        "eval",
        "--player",
        "zed@1/8",
        "--player",
        "yan@2/4",
        "--player",
        "xia:spec",
        "--jackpot",
        "90",
        "n = 0; n = for(f : arena.freqs) { n = n + 1; return n } + arena.jackpot / arena.size",
    ])
    .assert();
    assert.success().stdout("n = 47\n");
}

#[test]
fn integer_output() {
    let assert = create_command(&["eval", "--int", "0", "x = 10 / 4"]).assert();
    assert.success().stdout("x = 3\n");
    let assert = create_command(&["eval", "--int", "-1", "x = 10 ^ 20"]).assert();
    assert.success().stdout("x = -1\n");
    let assert = create_command(&["eval", "--int", "-1", "x = 0 / 0"]).assert();
    assert.success().stdout("x = -1\n");
}

#[test]
fn outputting_ast() {
    let assert = create_command(&["ast", "x = 2^3^2"]).assert();
    assert
        .success()
        .stdout(predicate::str::contains("Binary {"))
        .stdout(predicate::str::ends_with("x = 2 ^ 3 ^ 2\n"));
}

#[test]
fn syntax_error() {
    const EXPECTED_ERR: &str = r#"
        error[PARSE]: Invalid number literal
          ┌─ Snip #1:1:9
          │
        1 │ x = 1 + 2y
          │         ^^ Error occurred here
    "#;

    let assert = eval_command("x = 1 + 2y").assert();
    assert
        .failure()
        .code(2)
        .stderr(predicate::str::starts_with(unindent(EXPECTED_ERR)));
}

#[test]
fn dereference_error() {
    let assert = eval_command("x = arena.bogusfield").assert();
    assert
        .failure()
        .code(2)
        .stdout("")
        .stderr(predicate::str::contains(
            "error[EVAL]: cannot dereference arena with 'bogusfield'",
        ))
        .stderr(predicate::str::contains(
            "Only registered arena properties can be dereferenced",
        ));
}

#[test]
fn function_declaration_error() {
    let assert = eval_command("f(x) = x * 2").assert();
    assert.failure().code(2).stderr(predicate::str::contains(
        "cannot evaluate declaration of function `f`",
    ));
}

#[test]
fn invalid_arena_config() {
    let assert = create_command(&["eval", "--as", "mallory", "x = 1"]).assert();
    assert
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid `--as` player"));

    let assert = create_command(&["eval", "--player", "@1", "x = 1"]).assert();
    assert
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid player name"));
}
