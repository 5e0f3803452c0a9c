//! Modifier registry.
//!
//! Modifiers transform the flattened text of a rule expansion
//! (`#animal.capitalize#`). Text modifiers return the new text; tree and node
//! modifiers act on the expansion tree for their side effects and contribute
//! nothing to the output.

use std::collections::{HashMap, hash_map};
use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::interpreter::english;
use crate::interpreter::tree::Tree;
use crate::types::Node;

/// Transforms text. Receives the flattened text and the call parameters.
pub type TextModifierFn = fn(&str, &[&str]) -> String;

/// Acts on the whole tree. Receives the tree, the rule name and parameters.
pub type TreeModifierFn = fn(&mut Tree, &str, &[&str]);

/// Acts on the node being flattened. Receives the node, the rule name and
/// parameters.
pub type NodeModifierFn = fn(&mut Node, &str, &[&str]);

/// What a modifier operates on.
#[derive(Clone, Copy)]
pub enum ModifierKind {
    Text(TextModifierFn),
    Tree(TreeModifierFn),
    Node(NodeModifierFn),
}

/// A registered modifier: its function and the parameter count it expects.
#[derive(Clone, Copy)]
pub struct Modifier {
    pub arity: usize,
    pub kind: ModifierKind,
}

impl Modifier {
    /// A text modifier taking no parameters.
    pub fn text(f: TextModifierFn) -> Self {
        Self::text_with_params(0, f)
    }

    /// A text modifier taking `arity` parameters.
    pub fn text_with_params(arity: usize, f: TextModifierFn) -> Self {
        Self {
            arity,
            kind: ModifierKind::Text(f),
        }
    }

    /// A tree modifier taking no parameters.
    pub fn tree(f: TreeModifierFn) -> Self {
        Self::tree_with_params(0, f)
    }

    pub fn tree_with_params(arity: usize, f: TreeModifierFn) -> Self {
        Self {
            arity,
            kind: ModifierKind::Tree(f),
        }
    }

    /// A node modifier taking no parameters.
    pub fn node(f: NodeModifierFn) -> Self {
        Self::node_with_params(0, f)
    }

    pub fn node_with_params(arity: usize, f: NodeModifierFn) -> Self {
        Self {
            arity,
            kind: ModifierKind::Node(f),
        }
    }

    fn kind_label(&self) -> &'static str {
        match self.kind {
            ModifierKind::Text(_) => "text",
            ModifierKind::Tree(_) => "tree",
            ModifierKind::Node(_) => "node",
        }
    }
}

impl Debug for Modifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Modifier")
            .field("arity", &self.arity)
            .field("kind", &self.kind_label())
            .finish()
    }
}

/// Registry of modifiers by name.
#[derive(Clone, Default)]
pub struct ModifierRegistry {
    modifiers: HashMap<String, Modifier>,
}

impl ModifierRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The English text modifiers: `a`, `s`, `ed`, `capitalize`,
    /// `capitalizeAll` and `replace`.
    pub fn english() -> Self {
        [
            ("a", Modifier::text(english::article)),
            ("s", Modifier::text(english::plural)),
            ("ed", Modifier::text(english::past_tense)),
            ("capitalize", Modifier::text(english::capitalize)),
            ("capitalizeAll", Modifier::text(english::capitalize_all)),
            ("replace", Modifier::text_with_params(2, english::replace)),
        ]
        .into_iter()
        .collect()
    }

    /// Modifiers that act on the tree: `pop!!`.
    pub fn extended() -> Self {
        [("pop!!", Modifier::tree(pop_runtime))].into_iter().collect()
    }

    /// The English table and the extended modifiers together.
    pub fn builtin() -> Self {
        let mut registry = Self::english();
        registry.extend(Self::extended());
        registry
    }

    /// Register a modifier, replacing any previous one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, modifier: Modifier) {
        self.modifiers.insert(name.into(), modifier);
    }

    pub fn get(&self, name: &str) -> Option<Modifier> {
        self.modifiers.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modifiers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modifiers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Debug for ModifierRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_set().entries(self.names()).finish()
    }
}

impl<N: Into<String>> FromIterator<(N, Modifier)> for ModifierRegistry {
    fn from_iter<I: IntoIterator<Item = (N, Modifier)>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.extend(iter);
        registry
    }
}

impl<N: Into<String>> Extend<(N, Modifier)> for ModifierRegistry {
    fn extend<I: IntoIterator<Item = (N, Modifier)>>(&mut self, iter: I) {
        for (name, modifier) in iter {
            self.insert(name, modifier);
        }
    }
}

impl IntoIterator for ModifierRegistry {
    type Item = (String, Modifier);
    type IntoIter = hash_map::IntoIter<String, Modifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.modifiers.into_iter()
    }
}

/// `pop!!`: drop the most recent runtime override of the modified rule.
fn pop_runtime(tree: &mut Tree, rule: &str, _params: &[&str]) {
    tree.runtime_mut().pop(rule);
}
