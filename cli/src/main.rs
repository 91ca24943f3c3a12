//! Simple CLI / REPL for evaluating arena formulas.

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use codespan_reporting::term::termcolor::ColorChoice;
use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

use std::{
    io::{self, Read},
    process,
};

use crate::{
    common::{parse_input, EvalOutcome, Reporter, Session, ERROR_EXIT_CODE},
    repl::repl,
    world::{PlayerSpec, World},
};

mod common;
mod repl;
mod world;

const ABOUT: &str = "CLI and REPL for parsing and evaluating arena formulas.";

const AFTER_HELP: &str = "\
EXIT CODES:
    0    Normal exit
    1    Invalid simulated arena (e.g., duplicate players)
    2    Invalid command-line option, or parsing / evaluation error
         in non-interactive mode

LOGGING:
    Set ARENA_FORMULA_LOG (or RUST_LOG) to a filter such as `debug`
    to output interpreter logs to stderr.";

/// Environment variable with the logging filter.
const LOG_ENV_VAR: &str = "ARENA_FORMULA_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorPreference {
    Auto,
    Always,
    Never,
}

impl ColorPreference {
    fn color_choice(self) -> ColorChoice {
        match self {
            Self::Auto if io::stderr().is_terminal() => ColorChoice::Auto,
            Self::Auto | Self::Never => ColorChoice::Never,
            Self::Always => ColorChoice::Always,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about = ABOUT, after_help = AFTER_HELP)]
enum Args {
    /// Parse the input and output the AST.
    Ast {
        /// Formula to parse. If omitted, the formula will be read from stdin.
        formula: Option<String>,
    },
    /// Evaluate the input against a simulated arena.
    Eval(EvalArgs),
}

#[derive(Debug, clap::Args)]
struct EvalArgs {
    /// Launch the REPL for formulas.
    #[arg(long, short = 'i')]
    interactive: bool,
    /// Name of the simulated arena.
    #[arg(long, default_value = "pub")]
    arena: String,
    /// Player in the arena in the `NAME[@FREQ][:spec][/BOUNTY]` format, e.g. `alice@1/50`.
    /// Can be specified multiple times. If omitted, a few default players are created.
    #[arg(long = "player", value_name = "SPEC")]
    players: Vec<PlayerSpec>,
    /// Jackpot of the arena.
    #[arg(long, default_value_t = 1_000.0)]
    jackpot: f64,
    /// Name of the player evaluating formulas. Defaults to the first player.
    #[arg(long = "as", value_name = "PLAYER")]
    acting_player: Option<String>,
    /// Round values to integers, outputting DEFAULT if a value is not finite or out of range.
    #[arg(long = "int", value_name = "DEFAULT", allow_negative_numbers = true)]
    int_default: Option<i32>,
    /// Coloring of the output.
    #[arg(long, value_enum, env = "COLOR", default_value_t = ColorPreference::Auto)]
    color: ColorPreference,
    /// Formula to evaluate. If omitted, the formula will be read from stdin.
    #[arg(conflicts_with = "interactive")]
    formula: Option<String>,
}

fn read_input(input: Option<String>) -> io::Result<String> {
    if let Some(input) = input {
        return Ok(input);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

impl Args {
    fn run(self) -> anyhow::Result<()> {
        match self {
            Self::Ast { formula } => Self::output_ast(&read_input(formula)?),
            Self::Eval(eval_args) => eval_args.run(),
        }
    }

    fn output_ast(formula: &str) -> anyhow::Result<()> {
        let mut reporter = Reporter::new(ColorPreference::Auto.color_choice());
        let file = reporter.add_snippet(formula);
        match parse_input(formula) {
            Ok(formula) => {
                println!("{formula:#?}");
                println!("{formula}");
                Ok(())
            }
            Err(err) => {
                reporter.report_parse_error(file, &err)?;
                process::exit(ERROR_EXIT_CODE);
            }
        }
    }
}

impl EvalArgs {
    fn run(self) -> anyhow::Result<()> {
        let players = if self.players.is_empty() {
            World::default_players()
        } else {
            self.players
        };
        let world = World::new(self.arena, self.jackpot, players)?;
        let reporter = Reporter::new(self.color.color_choice());
        let mut session = Session::new(world, reporter).with_int_default(self.int_default);
        if let Some(player) = &self.acting_player {
            session
                .switch_player(player)
                .context("invalid `--as` player")?;
        }

        if self.interactive {
            repl(session)
        } else {
            let formula = read_input(self.formula)?;
            match session.evaluate(&formula, false)? {
                EvalOutcome::Ok => Ok(()),
                EvalOutcome::Errored => process::exit(ERROR_EXIT_CODE),
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    Args::parse().run()
}
