use std::io::{self, BufRead};

use clap::Parser;
use mathly::{
    EvalConfig, Evaluator, beautify_source,
    interpreter::evaluator::{core::CONSTANTS, function::core::BUILTIN_TABLE},
};
use tracing_subscriber::EnvFilter;

/// mathly evaluates mathematical expressions and prints them in canonical
/// notation next to their value.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Relative tolerance of `==` and `!=` between numbers.
    #[arg(long)]
    epsilon: Option<f64>,

    /// Deepest evaluation nesting allowed before giving up.
    #[arg(long)]
    max_depth: Option<usize>,

    /// Default number of Simpson intervals used by `integ`.
    #[arg(long)]
    steps: Option<usize>,

    /// Only print the canonical text, without evaluating.
    #[arg(short, long)]
    beautify_only: bool,

    /// List the builtin functions and constants, then exit.
    #[arg(long)]
    builtins: bool,

    /// The expression to evaluate. Without it, expressions are read from
    /// standard input, one per line.
    expression: Option<String>,
}

impl Args {
    fn config(&self) -> EvalConfig {
        let defaults = EvalConfig::default();
        EvalConfig { epsilon: self.epsilon.unwrap_or(defaults.epsilon),
                     max_depth: self.max_depth.unwrap_or(defaults.max_depth),
                     integration_steps: self.steps.unwrap_or(defaults.integration_steps),
                     ..defaults }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_writer(io::stderr)
                             .init();

    let args = Args::parse();

    if args.builtins {
        print_builtins();
        return;
    }

    let mut evaluator = Evaluator::with_config(args.config());
    let mut failed = false;

    if let Some(expression) = &args.expression {
        failed |= !run(&mut evaluator, expression, args.beautify_only);
    } else {
        for line in io::stdin().lock().lines() {
            let line = line.unwrap_or_else(|e| {
                               eprintln!("Failed to read standard input: {e}");
                               std::process::exit(1);
                           });
            if line.trim().is_empty() {
                continue;
            }
            failed |= !run(&mut evaluator, &line, args.beautify_only);
        }
    }

    if failed {
        std::process::exit(1);
    }
}

/// Evaluates one expression and prints the outcome. Returns `false` on error.
fn run(evaluator: &mut Evaluator, source: &str, beautify_only: bool) -> bool {
    let outcome = if beautify_only {
        beautify_source(source).map(|text| println!("{text}"))
    } else {
        evaluator.evaluate(source).map(|value| match evaluator.beautified() {
                                      Some(text) => println!("{text} = {value}"),
                                      None => println!("{value}"),
                                  })
    };

    match outcome {
        Ok(()) => true,
        Err(e) => {
            eprintln!("{e}");
            false
        },
    }
}

fn print_builtins() {
    let width = BUILTIN_TABLE.iter().map(|def| def.name.len()).max().unwrap_or(0);

    for def in BUILTIN_TABLE {
        println!("{:width$}  {:>12}  {}", def.name, format!("({})", def.arity), def.doc);
    }
    println!();
    println!("constants: {}", CONSTANTS.join(", "));
}
