//! Error and warning types for grammar loading, expansion and lint.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

use thiserror::Error;

/// Errors that occur while loading a grammar file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O error when reading the grammar file.
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid grammar JSON.
    #[error("{}:{line}:{column}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
}

/// An error that occurred while expanding or flattening a tree.
#[derive(Debug, Clone, Error)]
pub enum ExpandError {
    /// Rule referenced but neither in the runtime dictionary nor the grammar.
    #[error("unknown rule '{name}'{}", format_suggestions(.suggestions))]
    UnknownRule {
        name: String,
        suggestions: Vec<String>,
    },

    /// Object rule without a registered handler.
    #[error("{}", describe_unknown_handler(.rule, .handler.as_deref()))]
    UnknownHandler {
        rule: String,
        handler: Option<String>,
    },

    /// Object handler returned something other than a string.
    #[error("handler '{handler}' for rule '{rule}' returned {found}, expected a string")]
    HandlerTypeMismatch {
        rule: String,
        handler: String,
        found: String,
    },

    /// Object handler rejected its input.
    #[error("handler '{handler}' for rule '{rule}' failed: {message}")]
    HandlerFailed {
        rule: String,
        handler: String,
        message: String,
    },

    /// The sampler picked an index outside the choice list.
    #[error("sampler picked index {index} for rule '{rule}' with {len} choices")]
    SampleOutOfRange {
        rule: String,
        index: usize,
        len: usize,
    },

    /// A choice rule with nothing to choose from.
    #[error("rule '{rule}' has no choices")]
    EmptyChoices { rule: String },

    /// Modifier called with the wrong number of parameters.
    #[error("modifier '{modifier}' expects {expected} parameters, got {got}")]
    WrongParameterCount {
        modifier: String,
        expected: usize,
        got: usize,
    },

    /// Failure while flattening the expansion of a rule.
    #[error("while flattening rule '{rule}' ({text:?}): {source}")]
    Flatten {
        rule: String,
        text: String,
        #[source]
        source: Box<ExpandError>,
    },

    /// The tree needed more expansion steps than the grammar allows.
    #[error("expansion limit of {limit} steps exceeded")]
    ExpansionLimitExceeded { limit: usize },
}

impl ExpandError {
    /// The innermost error, with flatten context frames removed.
    pub fn root_cause(&self) -> &ExpandError {
        let mut error = self;
        while let ExpandError::Flatten { source, .. } = error {
            error = source;
        }
        error
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!("; did you mean: {}?", suggestions.join(", "))
    }
}

fn describe_unknown_handler(rule: &str, handler: Option<&str>) -> String {
    match handler {
        Some(handler) => format!("rule '{rule}' uses unregistered handler '{handler}'"),
        None => format!("rule '{rule}' is an object without a string 'handler' field"),
    }
}

/// Compute up to 3 names within edit distance of `name`.
///
/// Names of 3 characters or fewer allow distance 1, longer names distance 2.
/// Results are ordered closest first.
pub fn compute_suggestions<S: AsRef<str>>(name: &str, available: &[S]) -> Vec<String> {
    let max_distance = if name.len() <= 3 { 1 } else { 2 };
    let mut scored: Vec<(usize, &str)> = available
        .iter()
        .map(AsRef::as_ref)
        .filter(|candidate| *candidate != name)
        .map(|candidate| (strsim::levenshtein(name, candidate), candidate))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();
    scored.sort();
    scored
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

/// A problem found by static analysis of a rule set.
///
/// Warnings never stop expansion; they flag rules that will fail or behave
/// unexpectedly at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintWarning {
    /// A reference to a rule that is neither defined nor assigned by an action.
    UndefinedRule {
        rule: String,
        name: String,
        suggestions: Vec<String>,
    },
    /// A modifier not present in the registry.
    UnknownModifier { rule: String, modifier: String },
    /// A modifier called with the wrong number of parameters.
    ModifierArity {
        rule: String,
        modifier: String,
        expected: usize,
        got: usize,
    },
    /// An object rule with no string `handler` field.
    MissingHandler { rule: String },
    /// An object rule naming an unregistered handler.
    UnknownHandler { rule: String, handler: String },
    /// A rule whose name can never be referenced.
    UnreachableName { rule: String },
}

impl LintWarning {
    /// The rule the warning is about.
    pub fn rule(&self) -> &str {
        match self {
            LintWarning::UndefinedRule { rule, .. }
            | LintWarning::UnknownModifier { rule, .. }
            | LintWarning::ModifierArity { rule, .. }
            | LintWarning::MissingHandler { rule }
            | LintWarning::UnknownHandler { rule, .. }
            | LintWarning::UnreachableName { rule } => rule,
        }
    }
}

impl Display for LintWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            LintWarning::UndefinedRule {
                rule,
                name,
                suggestions,
            } => write!(
                f,
                "rule '{rule}': reference to undefined rule '{name}'{}",
                format_suggestions(suggestions)
            ),
            LintWarning::UnknownModifier { rule, modifier } => {
                write!(f, "rule '{rule}': unknown modifier '{modifier}'")
            }
            LintWarning::ModifierArity {
                rule,
                modifier,
                expected,
                got,
            } => write!(
                f,
                "rule '{rule}': modifier '{modifier}' expects {expected} parameters, got {got}"
            ),
            LintWarning::MissingHandler { rule } => {
                write!(f, "rule '{rule}': object rule has no string 'handler' field")
            }
            LintWarning::UnknownHandler { rule, handler } => {
                write!(f, "rule '{rule}': unregistered handler '{handler}'")
            }
            LintWarning::UnreachableName { rule } => write!(
                f,
                "rule '{rule}': name is not alphanumeric and cannot be referenced"
            ),
        }
    }
}
