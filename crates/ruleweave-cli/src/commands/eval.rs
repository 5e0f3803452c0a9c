//! Implementation of the `ruleweave eval` command.

use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use super::{build_grammar, load_rules, to_json};

/// Arguments for the eval command.
#[derive(Debug, clap::Args)]
pub struct EvalArgs {
    /// Grammar file (.json)
    pub grammar: PathBuf,

    /// Text to expand
    #[arg(short, long, default_value = "#origin#")]
    pub input: String,

    /// Seed for reproducible output
    #[arg(long, env = "RULEWEAVE_SEED")]
    pub seed: Option<u64>,

    /// Number of outputs to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Skip the built-in modifiers and handlers
    #[arg(long)]
    pub bare: bool,
}

/// JSON output for eval results.
#[derive(Serialize)]
pub struct EvalResult {
    pub input: String,
    pub results: Vec<String>,
}

/// Run the eval command.
pub fn run_eval(args: EvalArgs) -> miette::Result<i32> {
    let rules = load_rules(&args.grammar)?;
    debug!(rules = rules.len(), path = %args.grammar.display(), "Loaded grammar");
    let mut grammar = build_grammar(rules, args.seed, args.bare);

    let mut results = Vec::with_capacity(args.count);
    for _ in 0..args.count {
        match grammar.flatten(args.input.as_str()) {
            Ok(text) => results.push(text),
            Err(e) => {
                if args.json {
                    let output = serde_json::json!({
                        "error": e.to_string()
                    });
                    eprintln!("{}", to_json(&output)?);
                } else {
                    eprintln!("Expansion error: {}", e);
                }
                return Ok(exitcode::DATAERR);
            }
        }
    }

    if args.json {
        let output = EvalResult {
            input: args.input,
            results,
        };
        println!("{}", to_json(&output)?);
    } else {
        for text in results {
            println!("{}", text);
        }
    }
    Ok(exitcode::OK)
}
