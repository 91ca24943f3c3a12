//! REPL for arena formulas.

use rustyline::{error::ReadlineError, DefaultEditor};

use std::io;

use arena_formula_eval::{function_names, ValueType};

use crate::common::{EvalOutcome, Session};

const HELP: &str = "\
Enter a formula, e.g. `reward = killed.bounty * 2`, or a bare expression, which is assigned \
to `ans`. Variables created by formulas persist for the acting player.

Context variables: `me` (acting player), `arena`, `freq` (acting player's freq), `bounty`.

Commands:
  :vars           List variables of the acting player
  :clear          Reset variables of the acting player
  :player NAME    Switch the acting player
  :kick NAME      Disconnect a player, dropping their variables
  :help           Show this help
  :quit           Exit the REPL";

/// Parsed REPL command.
#[derive(Debug, PartialEq)]
enum Command<'a> {
    Vars,
    Clear,
    Player(&'a str),
    Kick(&'a str),
    Help,
    Quit,
}

impl<'a> Command<'a> {
    /// Parses a command. Returns `None` if the line is not a command (i.e., doesn't start
    /// with `:`), and an error message if the command is invalid.
    fn parse(line: &'a str) -> Option<Result<Self, &'static str>> {
        let line = line.trim().strip_prefix(':')?;
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim())),
            None => (line, None),
        };
        Some(match (name, arg) {
            ("vars", None) => Ok(Self::Vars),
            ("clear", None) => Ok(Self::Clear),
            ("help", None) => Ok(Self::Help),
            ("quit" | "q", None) => Ok(Self::Quit),
            ("player", Some(name)) => Ok(Self::Player(name)),
            ("kick", Some(name)) => Ok(Self::Kick(name)),
            ("player" | "kick", None) => Err("Command requires a player name"),
            ("vars" | "clear" | "help" | "quit" | "q", Some(_)) => {
                Err("Command does not take arguments")
            }
            _ => Err("Unknown command"),
        })
    }
}

fn print_help(session: &Session) -> io::Result<()> {
    let reporter = session.reporter();
    reporter.print_text(HELP)?;

    let (unary, binary) = function_names();
    let functions = format!(
        "Functions: {} (1 argument); {} (2 arguments).",
        unary.join(", "),
        binary.join(", ")
    );
    for line in textwrap::wrap(&functions, 80) {
        reporter.print_text(&line)?;
    }

    let registry = session.registry();
    for ty in [ValueType::Arena, ValueType::Freq, ValueType::Player] {
        let properties = format!(
            "Properties of {ty}s: {}.",
            registry.property_names(ty).join(", ")
        );
        for line in textwrap::wrap(&properties, 80) {
            reporter.print_text(&line)?;
        }
    }
    Ok(())
}

/// Runs a single REPL command. Returns `false` if the REPL should exit.
fn run_command(session: &mut Session, command: Command<'_>) -> io::Result<bool> {
    match command {
        Command::Vars => session.dump_vars()?,
        Command::Clear => session.clear_vars(),
        Command::Help => print_help(session)?,
        Command::Quit => return Ok(false),
        Command::Player(name) => match session.switch_player(name) {
            Ok(()) => session
                .reporter()
                .print_text(&format!("Acting as `{name}`"))?,
            Err(err) => session.reporter().print_text(&format!("Error: {err}"))?,
        },
        Command::Kick(name) => {
            let message = if session.kick(name) {
                format!("Dropped variables of `{name}`")
            } else {
                format!("`{name}` has no variables")
            };
            session.reporter().print_text(&message)?;
        }
    }
    Ok(true)
}

pub fn repl(mut session: Session) -> anyhow::Result<()> {
    let mut rl = DefaultEditor::new()?;
    session.reporter().print_greeting()?;

    loop {
        let prompt = format!("{}> ", session.current_player());
        match rl.readline(&prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                rl.add_history_entry(line.as_str())?;

                match Command::parse(&line) {
                    Some(Ok(command)) => {
                        if !run_command(&mut session, command)? {
                            break Ok(());
                        }
                    }
                    Some(Err(message)) => {
                        let file = session.reporter_mut().add_snippet(&line);
                        session.reporter().report_command_error(
                            file,
                            message,
                            "Use `:help` to find out commands",
                        )?;
                    }
                    None => {
                        if session.evaluate(&line, true)? == EvalOutcome::Errored {
                            tracing::debug!(%line, "evaluation failed");
                        }
                    }
                }
            }

            Err(ReadlineError::Interrupted) => {
                println!("Bye");
                break Ok(());
            }
            Err(ReadlineError::Eof) => break Ok(()),
            Err(err) => break Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsing_commands() {
        assert_eq!(Command::parse("1 + 2"), None);
        assert_eq!(Command::parse(":vars"), Some(Ok(Command::Vars)));
        assert_eq!(Command::parse("  :clear "), Some(Ok(Command::Clear)));
        assert_eq!(Command::parse(":q"), Some(Ok(Command::Quit)));
        assert_eq!(
            Command::parse(":player carol"),
            Some(Ok(Command::Player("carol")))
        );
        assert_eq!(Command::parse(":kick  bob"), Some(Ok(Command::Kick("bob"))));
    }

    #[test]
    fn parsing_invalid_commands() {
        assert_eq!(
            Command::parse(":player"),
            Some(Err("Command requires a player name"))
        );
        assert_eq!(
            Command::parse(":vars x"),
            Some(Err("Command does not take arguments"))
        );
        assert_eq!(Command::parse(":dump"), Some(Err("Unknown command")));
    }
}
