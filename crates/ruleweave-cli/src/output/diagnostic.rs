//! Source-annotated errors for grammar files that are not valid JSON.
//!
//! The miette derive reads the struct fields in generated code, which rustc
//! reports as unused assignments.
#![allow(unused_assignments)]

use std::path::Path;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A malformed grammar file, with the offending position labelled.
#[derive(Debug, Error, Diagnostic)]
#[error("invalid grammar: {message}")]
#[diagnostic(
    code(ruleweave::json),
    help("a grammar is a JSON object mapping rule names to strings, arrays or objects")
)]
pub struct GrammarDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    message: String,
}

impl GrammarDiagnostic {
    /// Create a diagnostic pointing at a 1-based line and column of `content`.
    pub fn new(path: &Path, content: &str, line: usize, column: usize, message: String) -> Self {
        GrammarDiagnostic {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: (byte_offset(content, line, column), 1).into(),
            message,
        }
    }
}

/// Byte offset of a 1-based line and column, clamped to the content.
///
/// serde_json counts columns in bytes, so no char conversion is needed.
fn byte_offset(content: &str, line: usize, column: usize) -> usize {
    let line_start: usize = content
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(content.len())
}
