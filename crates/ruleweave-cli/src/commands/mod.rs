//! CLI command implementations.

mod check;
mod eval;
mod tree;

pub use check::{CheckArgs, run_check};
pub use eval::{EvalArgs, run_eval};
pub use tree::{TreeArgs, run_tree};

use std::fs::read_to_string;
use std::path::Path;

use ruleweave::{Grammar, LoadError, RuleSet};
use serde::Serialize;

use crate::output::GrammarDiagnostic;

/// Read and parse a grammar file, rendering JSON errors as source diagnostics.
pub(crate) fn load_rules(path: &Path) -> miette::Result<RuleSet> {
    let content = read_to_string(path)
        .map_err(|e| miette::miette!("Cannot read grammar file {}: {}", path.display(), e))?;
    match RuleSet::from_json_str(&content) {
        Ok(rules) => Ok(rules),
        Err(LoadError::Parse {
            line,
            column,
            message,
            ..
        }) => Err(GrammarDiagnostic::new(path, &content, line, column, message).into()),
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

/// Build a grammar with an optional seed, with or without the built-ins.
pub(crate) fn build_grammar(rules: RuleSet, seed: Option<u64>, bare: bool) -> Grammar {
    let grammar = match seed {
        Some(seed) => Grammar::seeded(rules, seed),
        None => Grammar::new(rules),
    };
    if bare { grammar } else { grammar.with_builtins() }
}

/// Pretty-print a JSON document.
pub(crate) fn to_json<T: Serialize>(value: &T) -> miette::Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| miette::miette!("JSON serialization failed: {}", e))
}
