//! Implementation of the `ruleweave tree` command.

use std::path::PathBuf;

use ruleweave::FlattenOptions;

use super::{build_grammar, load_rules};
use crate::output::render_tree;

/// Arguments for the tree command.
#[derive(Debug, clap::Args)]
pub struct TreeArgs {
    /// Grammar file (.json)
    pub grammar: PathBuf,

    /// Text to expand
    #[arg(short, long, default_value = "#origin#")]
    pub input: String,

    /// Seed for reproducible output
    #[arg(long, env = "RULEWEAVE_SEED")]
    pub seed: Option<u64>,

    /// Skip the built-in modifiers and handlers
    #[arg(long)]
    pub bare: bool,
}

/// Run the tree command.
pub fn run_tree(args: TreeArgs) -> miette::Result<i32> {
    let rules = load_rules(&args.grammar)?;
    let mut grammar = build_grammar(rules, args.seed, args.bare);

    let mut tree = match grammar.expanded_tree(args.input.as_str()) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("Expansion error: {}", e);
            return Ok(exitcode::DATAERR);
        }
    };
    print!("{}", render_tree(&tree));

    match grammar.flatten_tree(&mut tree, FlattenOptions::default()) {
        Ok(text) => {
            println!();
            println!("{}", text);
            Ok(exitcode::OK)
        }
        Err(e) => {
            eprintln!("Flatten error: {}", e);
            Ok(exitcode::DATAERR)
        }
    }
}
