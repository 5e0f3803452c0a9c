//! Implementation of the `ruleweave check` command.

use std::path::PathBuf;

use owo_colors::{OwoColorize, Stream};
use ruleweave::LintWarning;
use serde::Serialize;

use super::{build_grammar, load_rules, to_json};
use crate::output::{RuleSummary, format_rule_table};

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Grammar file (.json)
    pub grammar: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with an error status when any warning is reported
    #[arg(long)]
    pub strict: bool,
}

/// JSON output for check results.
#[derive(Serialize)]
pub struct CheckResult {
    pub rules: usize,
    pub warnings: Vec<WarningEntry>,
}

#[derive(Serialize)]
pub struct WarningEntry {
    pub rule: String,
    pub message: String,
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> miette::Result<i32> {
    let rules = load_rules(&args.grammar)?;
    let grammar = build_grammar(rules, Some(0), false);
    let warnings = grammar.lint();

    if args.json {
        let output = CheckResult {
            rules: grammar.rules().len(),
            warnings: warnings
                .iter()
                .map(|warning| WarningEntry {
                    rule: warning.rule().to_string(),
                    message: warning.to_string(),
                })
                .collect(),
        };
        println!("{}", to_json(&output)?);
    } else {
        let summaries: Vec<RuleSummary> = grammar
            .rules()
            .iter()
            .map(|(name, contents)| RuleSummary::new(name, contents, count_for(name, &warnings)))
            .collect();
        println!("{}", format_rule_table(&summaries));
        for warning in &warnings {
            eprintln!(
                "{} {}",
                "warning:".if_supports_color(Stream::Stderr, |text| text.yellow()),
                warning
            );
        }
        let status = format!("{} rules, {} warnings", summaries.len(), warnings.len());
        if warnings.is_empty() {
            println!("{}", status.if_supports_color(Stream::Stdout, |text| text.green()));
        } else {
            println!("{}", status.if_supports_color(Stream::Stdout, |text| text.yellow()));
        }
    }

    if args.strict && !warnings.is_empty() {
        return Ok(exitcode::DATAERR);
    }
    Ok(exitcode::OK)
}

fn count_for(rule: &str, warnings: &[LintWarning]) -> usize {
    warnings
        .iter()
        .filter(|warning| warning.rule() == rule)
        .count()
}
