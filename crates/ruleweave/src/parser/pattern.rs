//! Classification of node text into syntactic shapes.
//!
//! The shapes are tried in a fixed priority order and the first match wins.
//! Higher-priority shapes are strict subsets of lower ones (a sole rule
//! reference is also valid mixed text), so the order is significant.

use super::token::{
    MARKER, Piece, action_groups, contains_rule, parse_all, rule_name, rule_token, split_rules,
};

/// The syntactic shape of a node's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape<'a> {
    /// Plain text: no rule reference and no action syntax.
    Literal,
    /// Exactly one rule reference: `#name.mod#`.
    Rule {
        name: &'a str,
        modifiers: Vec<&'a str>,
    },
    /// Action groups followed by a rule, inside one pair of markers:
    /// `#[a][b]name.mod#`.
    RuleWithActions {
        /// The concatenated action groups.
        actions: &'a str,
        /// The rule reference, rewrapped in markers.
        rule: String,
    },
    /// One bracket group expanding a rule for its side effects: `[#rule#]`.
    KeylessAction { value: &'a str },
    /// One bracket group binding a key to an expansion: `[key:#rule#]`.
    KeyWithRule { key: &'a str, value: &'a str },
    /// One bracket group binding a key to literal text: `[key:a,b,c]`.
    KeyWithText { key: &'a str, values: Vec<&'a str> },
    /// Two or more concatenated bracket groups: `[a:b][#c#]`.
    Actions(Vec<&'a str>),
    /// One bracket group that neither binds a key nor expands a rule.
    Inert,
    /// Literal runs interleaved with rule references.
    Mixed(Vec<&'a str>),
}

impl Shape<'_> {
    /// A short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Shape::Literal => "literal",
            Shape::Rule { .. } => "rule",
            Shape::RuleWithActions { .. } => "rule-with-actions",
            Shape::KeylessAction { .. } => "keyless-action",
            Shape::KeyWithRule { .. } => "key-with-rule",
            Shape::KeyWithText { .. } => "key-with-text",
            Shape::Actions(_) => "actions",
            Shape::Inert => "inert-action",
            Shape::Mixed(_) => "mixed",
        }
    }
}

/// Classify text into its shape.
pub fn classify(text: &str) -> Shape<'_> {
    if let Some(token) = parse_all(text, rule_token) {
        if token.actions.is_empty() {
            return Shape::Rule {
                name: token.name,
                modifiers: token.modifiers,
            };
        }
        return Shape::RuleWithActions {
            actions: token.actions,
            rule: token.without_actions(),
        };
    }

    if let Some(groups) = parse_all(text, action_groups) {
        if let [group] = groups[..] {
            return classify_action(group);
        }
        return Shape::Actions(groups);
    }

    let pieces = split_rules(text);
    if pieces.iter().any(|piece| matches!(piece, Piece::Rule(_))) {
        Shape::Mixed(pieces.iter().map(Piece::source).collect())
    } else {
        Shape::Literal
    }
}

/// Classify a single bracket group, brackets included.
fn classify_action(group: &str) -> Shape<'_> {
    let inner = &group[1..group.len() - 1];
    if let Some((key, value)) = split_key(inner) {
        if contains_rule(value) {
            return Shape::KeyWithRule { key, value };
        }
        if !value.is_empty() && !value.contains(MARKER) {
            return Shape::KeyWithText {
                key,
                values: value.split(',').collect(),
            };
        }
        return Shape::Inert;
    }
    if contains_rule(inner) {
        return Shape::KeylessAction { value: inner };
    }
    Shape::Inert
}

/// Split `key:value` action contents. The key must be a rule name.
pub(crate) fn split_key(inner: &str) -> Option<(&str, &str)> {
    let mut input = inner;
    let key = rule_name(&mut input).ok()?;
    let value = input.strip_prefix(':')?;
    Some((key, value))
}
