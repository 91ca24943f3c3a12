//! Common utils: diagnostics reporting and per-player evaluation sessions.

use codespan::{FileId, Files};
use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    term::termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor},
    term::{emit, Config as ReportingConfig},
};

use std::{
    collections::HashMap,
    io::{self, Write},
};

use arena_formula_eval::{Error as EvalError, Interpreter, PropertyRegistry, Value, VariableMap};
use arena_formula_parser::{
    parse_expr, parse_formula, Error as ParseError, ErrorKind as ParseErrorKind, Formula,
};

use crate::world::{Sim, World};

/// Exit code on parse or evaluation error in non-interactive mode.
pub const ERROR_EXIT_CODE: i32 = 2;

/// Name of the variable a bare expression is assigned to.
const ANSWER_VAR: &str = "ans";

/// Parses a formula. A bare expression, such as `1 + 2`, is treated as `ans = 1 + 2`.
pub fn parse_input(source: &str) -> Result<Formula, ParseError> {
    parse_formula(source).or_else(|err| {
        if matches!(err.kind(), ParseErrorKind::NonAsciiInput) {
            return Err(err);
        }
        parse_expr(source)
            .map(|expr| Formula::single(ANSWER_VAR, expr))
            .map_err(|_| err)
    })
}

/// Reporter of parsing / evaluation errors based on `codespan-reporting`.
pub struct Reporter {
    files: Files<String>,
    snippet_count: usize,
    writer: StandardStream,
    out: StandardStream,
    config: ReportingConfig,
}

impl Reporter {
    pub fn new(color_choice: ColorChoice) -> Self {
        Self {
            files: Files::new(),
            snippet_count: 0,
            writer: StandardStream::stderr(color_choice),
            out: StandardStream::stdout(color_choice),
            config: ReportingConfig::default(),
        }
    }

    pub fn add_snippet(&mut self, source: &str) -> FileId {
        self.snippet_count += 1;
        let file_name = format!("Snip #{}", self.snippet_count);
        self.files.add(file_name, source.to_owned())
    }

    fn emit(&self, diagnostic: &Diagnostic<FileId>) -> io::Result<()> {
        emit(
            &mut self.writer.lock(),
            &self.config,
            &self.files,
            diagnostic,
        )
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))
    }

    /// Reports a parsing error.
    pub fn report_parse_error(&self, file: FileId, err: &ParseError) -> io::Result<()> {
        let label = Label::primary(file, err.location().range()).with_message(match err.kind() {
            ParseErrorKind::UnexpectedTerm { .. } | ParseErrorKind::EmptyFormula => {
                "Input ends here"
            }
            _ => "Error occurred here",
        });
        let diagnostic = Diagnostic::error()
            .with_message(err.kind().to_string())
            .with_code("PARSE")
            .with_labels(vec![label]);
        self.emit(&diagnostic)
    }

    /// Reports an evaluation error. Since evaluation errors are not tied to a specific span,
    /// the whole snippet is labeled.
    pub fn report_eval_error(&self, file: FileId, err: &EvalError) -> io::Result<()> {
        let source_len = self.files.source(file).trim_end().len();
        let label =
            Label::secondary(file, 0..source_len).with_message("Error occurred evaluating this");
        let mut diagnostic = Diagnostic::error()
            .with_message(err.to_string())
            .with_code("EVAL")
            .with_labels(vec![label]);
        if let Some(help) = err.help() {
            diagnostic = diagnostic.with_notes(vec![help]);
        }
        self.emit(&diagnostic)
    }

    /// Reports an error in a REPL command.
    pub fn report_command_error(&self, file: FileId, message: &str, help: &str) -> io::Result<()> {
        let source_len = self.files.source(file).trim_end().len();
        let label = Label::primary(file, 0..source_len).with_message(help);
        let diagnostic = Diagnostic::error()
            .with_message(message)
            .with_code("CMD")
            .with_labels(vec![label]);
        self.emit(&diagnostic)
    }

    pub fn print_greeting(&self) -> io::Result<()> {
        let mut writer = self.out.lock();
        writer.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(writer, "arena-formula REPL v{}", env!("CARGO_PKG_VERSION"))?;
        writer.reset()?;
        writeln!(writer, "{}", env!("CARGO_PKG_DESCRIPTION"))?;
        writeln!(writer, "Type `:help` for the list of commands.")
    }

    pub fn print_text(&self, text: &str) -> io::Result<()> {
        writeln!(self.out.lock(), "{text}")
    }

    /// Outputs `name = value` for an evaluated number.
    pub fn print_number(&self, name: &str, value: impl ToString) -> io::Result<()> {
        let mut writer = self.out.lock();
        write!(writer, "{name} = ")?;
        writer.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(writer, "{}", value.to_string())?;
        writer.reset()?;
        writeln!(writer)
    }

    pub fn print_value(&self, name: &str, value: &Value<Sim>) -> io::Result<()> {
        let text = match value {
            Value::Number(number) => return self.print_number(name, number),
            Value::Arena(arena) => format!("arena {arena}"),
            Value::Freq(freq) => format!("freq {} in {}", freq.freq, freq.arena),
            Value::FreqList(freqs) => {
                let freqs: Vec<_> = freqs.iter().map(|freq| freq.freq.to_string()).collect();
                format!("freqs [{}]", freqs.join(", "))
            }
            Value::Player(player) => format!("player {player}"),
            Value::PlayerList(players) => format!("players [{}]", players.join(", ")),
        };

        let mut writer = self.out.lock();
        write!(writer, "{name} = ")?;
        writer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(writer, "{text}")?;
        writer.reset()?;
        writeln!(writer)
    }
}

/// Returns the variable table of the player, creating it on first use (i.e., when the player
/// "connects").
fn player_table<'t>(
    tables: &'t mut HashMap<String, VariableMap<Sim>>,
    world: &World,
    player: &str,
) -> &'t mut VariableMap<Sim> {
    tables.entry(player.to_owned()).or_insert_with(|| {
        tracing::debug!(player, "created variable table");
        world.context_for(player)
    })
}

/// Outcome of evaluating a snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalOutcome {
    Ok,
    Errored,
}

/// Evaluation session over the simulated world with a persistent variable table per player.
pub struct Session {
    world: World,
    registry: PropertyRegistry<Sim>,
    tables: HashMap<String, VariableMap<Sim>>,
    current_player: String,
    int_default: Option<i32>,
    reporter: Reporter,
}

impl Session {
    pub fn new(world: World, reporter: Reporter) -> Self {
        let current_player = world.first_player().to_owned();
        Self {
            world,
            registry: World::registry(),
            tables: HashMap::new(),
            current_player,
            int_default: None,
            reporter,
        }
    }

    /// Rounds evaluated values to integers, falling back to `default` for non-finite values
    /// and ones not fitting into `i32`.
    #[must_use]
    pub fn with_int_default(mut self, default: Option<i32>) -> Self {
        self.int_default = default;
        self
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub fn reporter_mut(&mut self) -> &mut Reporter {
        &mut self.reporter
    }

    pub fn registry(&self) -> &PropertyRegistry<Sim> {
        &self.registry
    }

    pub fn current_player(&self) -> &str {
        &self.current_player
    }

    /// Switches the acting player.
    pub fn switch_player(&mut self, name: &str) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.world.contains(name),
            "unknown player `{name}`; known players are: {}",
            self.world.player_names().collect::<Vec<_>>().join(", ")
        );
        self.current_player = name.to_owned();
        Ok(())
    }

    fn vars(&mut self) -> &mut VariableMap<Sim> {
        player_table(&mut self.tables, &self.world, &self.current_player)
    }

    /// Drops the variable table of the specified player. Returns `false` if the player
    /// has no table.
    pub fn kick(&mut self, name: &str) -> bool {
        let removed = self.tables.remove(name).is_some();
        if removed {
            tracing::debug!(player = name, "dropped variable table");
        }
        removed
    }

    /// Resets the acting player's variables to the context ones.
    pub fn clear_vars(&mut self) {
        let context = self.world.context_for(&self.current_player);
        *self.vars() = context;
    }

    pub fn dump_vars(&mut self) -> io::Result<()> {
        let mut vars: Vec<_> = self
            .vars()
            .iter()
            .map(|(name, value)| (name.to_owned(), value.clone()))
            .collect();
        vars.sort_unstable_by(|(x, _), (y, _)| x.cmp(y));
        for (name, value) in &vars {
            self.reporter.print_value(name, value)?;
        }
        Ok(())
    }

    /// Parses and evaluates a snippet. If `retain` is set, variables created by the snippet
    /// persist in the acting player's table.
    pub fn evaluate(&mut self, source: &str, retain: bool) -> io::Result<EvalOutcome> {
        let file = self.reporter.add_snippet(source);
        let formula = match parse_input(source) {
            Ok(formula) => formula,
            Err(err) => {
                self.reporter.report_parse_error(file, &err)?;
                return Ok(EvalOutcome::Errored);
            }
        };

        let vars = player_table(&mut self.tables, &self.world, &self.current_player);
        let interpreter = Interpreter::new(&self.registry);
        let name = formula.last_name().unwrap_or(ANSWER_VAR).to_owned();
        let result = match (retain, self.int_default) {
            (true, int_default) => interpreter
                .evaluate_retaining(&self.world, &formula, vars)
                .map(|evaluation| match int_default {
                    Some(default) => evaluation.to_int(default).to_string(),
                    None => evaluation.value.to_string(),
                }),
            (false, Some(default)) => interpreter
                .evaluate_int(&self.world, &formula, vars, default)
                .map(|value| value.to_string()),
            (false, None) => interpreter
                .evaluate(&self.world, &formula, vars)
                .map(|value| value.to_string()),
        };

        match result {
            Ok(value) => {
                self.reporter.print_number(&name, value)?;
                Ok(EvalOutcome::Ok)
            }
            Err(err) => {
                self.reporter.report_eval_error(file, &err)?;
                Ok(EvalOutcome::Errored)
            }
        }
    }
}
