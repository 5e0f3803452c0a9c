//! Coloured rendering of expansion trees.

use owo_colors::{OwoColorize, Stream};
use ruleweave::{NodeId, Tree};

/// Render `tree` as an indented outline, one node per line.
///
/// Hidden nodes are dimmed; keys are cyan and modifiers magenta.
pub fn render_tree(tree: &Tree) -> String {
    tree.preorder()
        .into_iter()
        .map(|(depth, id)| format!("{:indent$}{}\n", "", render_node(tree, id), indent = depth * 2))
        .collect()
}

fn render_node(tree: &Tree, id: NodeId) -> String {
    let node = tree.node(id);
    let text = format!("{:?}", node.text());
    let mut parts = vec![if node.is_hidden() {
        text.if_supports_color(Stream::Stdout, |t| t.dimmed())
            .to_string()
    } else {
        text
    }];
    if let Some(rule) = node.rule() {
        parts.push(
            rule.if_supports_color(Stream::Stdout, |t| t.bold())
                .to_string(),
        );
    }
    if let Some(key) = node.key() {
        parts.push(
            format!("[{}]", key)
                .if_supports_color(Stream::Stdout, |t| t.cyan())
                .to_string(),
        );
    }
    if !node.modifiers().is_empty() {
        parts.push(
            format!(".{}", node.modifiers().join("."))
                .if_supports_color(Stream::Stdout, |t| t.magenta())
                .to_string(),
        );
    }
    parts.join(" ")
}
