//! Grammar expansion engine.
//!
//! A [`Grammar`] owns the rule set, the random source and the modifier and
//! handler registries. It builds [`Tree`]s, expands them node by node and
//! flattens them into text.

mod english;
mod error;
mod grammar;
mod handlers;
mod lint;
mod modifiers;
mod runtime;
mod sampler;
mod tree;

pub use error::{ExpandError, LintWarning, LoadError, compute_suggestions};
pub use grammar::Grammar;
pub use handlers::{HandlerRegistry, ObjectHandlerFn, binomial, weighted};
pub use lint::lint_rules;
pub use modifiers::{
    Modifier, ModifierKind, ModifierRegistry, NodeModifierFn, TextModifierFn, TreeModifierFn,
};
pub use runtime::RuntimeDictionary;
pub use sampler::{RangeSampler, UniformSampler};
pub use tree::{FlattenOptions, Tree};

/// The built-in English text modifiers, for use outside a registry.
pub mod inflect {
    pub use super::english::{article, capitalize, capitalize_all, past_tense, plural, replace};
}
