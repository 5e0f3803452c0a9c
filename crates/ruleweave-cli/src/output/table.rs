//! Table formatting utilities for CLI output.

use comfy_table::{ContentArrangement, Table, presets};
use ruleweave::RuleContents;

/// Summary data for a single rule.
pub struct RuleSummary {
    /// Rule name.
    pub name: String,
    /// `text`, `choices` or `object`.
    pub kind: &'static str,
    /// Number of choices, or the handler name for objects.
    pub detail: String,
    /// Number of lint warnings raised against the rule.
    pub warnings: usize,
}

impl RuleSummary {
    pub fn new(name: &str, contents: &RuleContents, warnings: usize) -> Self {
        let (kind, detail) = match contents {
            RuleContents::Text(_) => ("text", "1".to_string()),
            RuleContents::Choices(choices) => ("choices", choices.len().to_string()),
            RuleContents::Object(_) => (
                "object",
                contents.handler_name().unwrap_or("-").to_string(),
            ),
        };
        Self {
            name: name.to_string(),
            kind,
            detail,
            warnings,
        }
    }
}

/// Format rule summaries as an ASCII table.
pub fn format_rule_table(rules: &[RuleSummary]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Rule", "Kind", "Choices/Handler", "Warnings"]);

    for rule in rules {
        table.add_row(vec![
            rule.name.clone(),
            rule.kind.to_string(),
            rule.detail.clone(),
            rule.warnings.to_string(),
        ]);
    }

    table
}
