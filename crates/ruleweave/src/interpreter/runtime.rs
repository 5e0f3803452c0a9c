//! Per-generation rule overrides created by actions.

use std::collections::HashMap;

use tracing::debug;

use crate::types::RuleContents;

/// A stack of override values per rule name.
///
/// The top entry for a name takes precedence over the grammar's definition.
/// Actions push entries; the `pop!!` modifier removes the most recent one.
#[derive(Debug, Clone, Default)]
pub struct RuntimeDictionary {
    stacks: HashMap<String, Vec<RuleContents>>,
}

impl RuntimeDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an override for `name`.
    pub fn push(&mut self, name: impl Into<String>, contents: RuleContents) {
        let name = name.into();
        debug!(%name, ?contents, "runtime push");
        self.stacks.entry(name).or_default().push(contents);
    }

    /// Remove and return the most recent override for `name`.
    ///
    /// Popping the last entry restores the grammar's own definition.
    pub fn pop(&mut self, name: &str) -> Option<RuleContents> {
        let stack = self.stacks.get_mut(name)?;
        let popped = stack.pop();
        if stack.is_empty() {
            self.stacks.remove(name);
        }
        debug!(%name, found = popped.is_some(), "runtime pop");
        popped
    }

    /// The active override for `name`.
    pub fn top(&self, name: &str) -> Option<&RuleContents> {
        self.stacks.get(name).and_then(|stack| stack.last())
    }

    /// Number of stacked overrides for `name`.
    pub fn depth(&self, name: &str) -> usize {
        self.stacks.get(name).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Names with at least one override, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.stacks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
