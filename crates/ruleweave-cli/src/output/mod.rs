//! Output formatting for CLI commands.

mod diagnostic;
mod table;
mod tree;

pub use diagnostic::GrammarDiagnostic;
pub use table::{RuleSummary, format_rule_table};
pub use tree::render_tree;
