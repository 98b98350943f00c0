use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{Context as _, Result};
use clap::Parser as _;
use combinator::{
    interpreter::{Interpreter, DEFAULT_MAX_STEPS},
    parser,
    prelude::*,
    reducer, report, Environment,
};
use util::{repl, ResultExt as _};

#[derive(clap::Parser, Debug)]
#[command(
    name = "combinator",
    version,
    about = "Reduce untyped lambda calculus terms to normal form"
)]
struct Args {
    /// Script to run, one definition (`K := λab.a`) or term per line
    file: Option<PathBuf>,
    /// Run this script instead of a file
    #[arg(short, long, conflicts_with = "file")]
    expr: Option<String>,
    /// Give up on a term after this many β-reductions
    #[arg(short = 'n', long, env = "COMBINATOR_MAX_STEPS", default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,
    /// Start without the standard combinators (I, M, K, KI, C, T, F, NOT, AND, OR, EQ, Y)
    #[arg(long)]
    bare: bool,
    /// Log definitions and reductions
    #[arg(short, long)]
    verbose: bool,
}

const EXIT_ERROR: u8 = 1;
const EXIT_DIVERGED: u8 = 2;

fn run_script(interpreter: &mut Interpreter, input: &str) -> Result<ExitCode> {
    let commands = match parser::parse_commands(input) {
        Ok(commands) => commands,
        Err(es) => {
            report::eprint(input, &es)?;
            return Ok(ExitCode::from(EXIT_ERROR));
        }
    };
    let mut diverged = false;
    let result = interpreter.execute_all(&commands, |outcome| {
        if outcome.reached_normal_form() {
            println!("{outcome}");
        } else {
            diverged = true;
            eprintln!("{outcome}");
        }
    });
    if let Err(e) = result {
        report::eprint(input, &[e])?;
        return Ok(ExitCode::from(EXIT_ERROR));
    }
    Ok(if diverged {
        ExitCode::from(EXIT_DIVERGED)
    } else {
        ExitCode::SUCCESS
    })
}

type CommandResult<'a> = Result<(), (&'a str, Vec<Diagnostic>)>;

struct Repl {
    interpreter: Interpreter,
}
impl Repl {
    fn tokenize(input: &str) -> CommandResult {
        let tokens = parser::tokenize(input)
            .map_err(|es| (input, es))?
            .iter()
            .map(|token| token.value().to_string())
            .collect::<Vec<_>>();
        println!("{}", tokens.join(" "));
        Ok(())
    }

    fn parse(input: &str) -> CommandResult {
        let term = parser::parse_term(input).map_err(|es| (input, es))?;
        println!("{term}");
        println!("{term:?}");
        Ok(())
    }

    fn step<'i>(&self, input: &'i str) -> CommandResult<'i> {
        let term = parser::parse_term(input).map_err(|es| (input, es))?;
        let term = self.interpreter.environment().expand(&term).map_err(|e| {
            let span = 0..input.chars().count();
            (input, vec![Diagnostic::custom(span, e.to_string())])
        })?;
        match reducer::step(&term) {
            Some(next) => println!("{term} -> {next}"),
            None => println!("{term} is in normal form"),
        }
        Ok(())
    }

    fn show_env(&self) {
        for (name, term) in self.interpreter.environment().iter() {
            println!("{name} := {term}");
        }
    }

    fn set_max_steps<'i>(&mut self, input: &'i str) -> CommandResult<'i> {
        let input = input.trim();
        if input.is_empty() {
            println!("{}", self.interpreter.max_steps());
            return Ok(());
        }
        let max_steps = input.parse::<usize>().map_err(|e| {
            let span = 0..input.chars().count();
            (input, vec![Diagnostic::custom(span, e.to_string())])
        })?;
        self.interpreter.set_max_steps(max_steps);
        Ok(())
    }

    fn evaluate<'i>(&mut self, input: &'i str) -> CommandResult<'i> {
        let commands = parser::parse_commands(input).map_err(|es| (input, es))?;
        self.interpreter
            .execute_all(&commands, |outcome| println!("{outcome}"))
            .map_err(|e| (input, vec![e]))
    }

    fn show_help() {
        println!(
            "{}",
            r#"
term                -- same as :evaluate term
NAME := term        -- define a combinator (NAME = term works too)
:tokenize   term    -- show tokenized term
:parse      term    -- show parsed term
:step       term    -- contract the leftmost-outermost redex once
:steps      [n]     -- show or set the step bound
:env                -- list the defined combinators
:evaluate   term    -- reduce the term to normal form
:help               -- show this message
        "#
            .trim()
        );
    }

    fn handle_repl_input<'i>(&mut self, input: &'i str) -> CommandResult<'i> {
        let (cmd, input) = split_command(input);
        match cmd {
            "to" | "tokenize" => Self::tokenize(input)?,
            "p" | "parse" => Self::parse(input)?,
            "s" | "step" => self.step(input)?,
            "steps" => self.set_max_steps(input)?,
            "env" => self.show_env(),
            "" | "r" | "run" | "e" | "eval" | "evaluate" => self.evaluate(input)?,
            "h" | "he" | "hel" | "help" => Self::show_help(),
            _ => {
                eprintln!("Unknown command {cmd}");
                Self::show_help();
            }
        }
        Ok(())
    }
}
/// `:cmd rest` becomes `("cmd", "rest")`; input without a leading `:` has an empty command.
fn split_command(input: &str) -> (&str, &str) {
    match input.strip_prefix(':') {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped.split_once(' ').unwrap_or((stripped, ""))
        }
        None => ("", input),
    }
}

impl repl::Repl for Repl {
    type Error = anyhow::Error;
    const HISTORY: Option<&'static str> = Some("/tmp/combinator.history");
    fn evaluate(&mut self, input: String) -> Result<(), Self::Error> {
        if input.trim().is_empty() {
            return Ok(());
        }
        if let Err((input, es)) = self.handle_repl_input(&input) {
            report::eprint(input, &es)?;
        }
        Ok(())
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let environment = if args.bare {
        Environment::default()
    } else {
        Environment::standard().staticalize()?
    };
    let mut interpreter = Interpreter::new(environment, args.max_steps);

    if let Some(expr) = &args.expr {
        return run_script(&mut interpreter, expr);
    }
    if let Some(path) = &args.file {
        let input = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        log::info!("interpreting {}", path.display());
        return run_script(&mut interpreter, &input);
    }

    println!("Hi, this is an untyped lambda calculus REPL. :h to show help");
    println!();
    repl::start_repl(Repl { interpreter })?;
    Ok(ExitCode::SUCCESS)
}
