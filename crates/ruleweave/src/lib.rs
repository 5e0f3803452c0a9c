//! Generative grammar expansion.
//!
//! A grammar is a table of named rules. Text refers to rules with
//! `#name#` markers; expanding the text substitutes each reference with one
//! of the rule's alternatives, recursively, until only literal text is left.
//!
//! ```
//! use ruleweave::{Grammar, RuleSet};
//!
//! let rules: RuleSet = [("animal", "fox"), ("origin", "the #animal.s# ran")]
//!     .into_iter()
//!     .collect();
//! let mut grammar = Grammar::seeded(rules, 1).with_builtins();
//! assert_eq!(grammar.flatten("#origin#").unwrap(), "the foxes ran");
//! ```
//!
//! Beyond plain references the text language has modifiers
//! (`#name.capitalize#`, `#name.replace(a,b)#`) and actions that bind rules
//! for the rest of a generation (`#[hero:#name#]story#`).

pub mod interpreter;
pub mod parser;
pub mod types;

pub use interpreter::{
    ExpandError, FlattenOptions, Grammar, LintWarning, LoadError, Modifier, ModifierKind,
    ModifierRegistry, RangeSampler, RuntimeDictionary, Tree, UniformSampler, compute_suggestions,
};
pub use types::{Node, NodeId, RuleContents, RuleSet};
