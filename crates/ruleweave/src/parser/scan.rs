//! Whole-text scans used by static analysis.

use super::pattern::split_key;
use super::token::{Piece, action_group, split_rules};

/// A rule reference found while scanning text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference<'a> {
    pub name: &'a str,
    pub modifiers: Vec<&'a str>,
}

/// List every rule reference in `text`, including those nested inside
/// action groups, in source order.
pub fn scan_references(text: &str) -> Vec<Reference<'_>> {
    let mut references = Vec::new();
    collect_references(text, &mut references);
    references
}

fn collect_references<'a>(text: &'a str, references: &mut Vec<Reference<'a>>) {
    for piece in split_rules(text) {
        if let Piece::Rule(token) = piece {
            collect_references(token.actions, references);
            references.push(Reference {
                name: token.name,
                modifiers: token.modifiers,
            });
        }
    }
}

/// List every key assigned by a `[key:...]` action anywhere in `text`.
pub fn scan_assigned_keys(text: &str) -> Vec<&str> {
    let mut keys = Vec::new();
    for (offset, _) in text.match_indices('[') {
        let mut cursor = &text[offset..];
        let Ok(group) = action_group(&mut cursor) else {
            continue;
        };
        if let Some((key, _)) = split_key(&group[1..group.len() - 1]) {
            keys.push(key);
        }
    }
    keys
}
