//! Recognizers for grammar text.
//!
//! Node text is classified into a [`Shape`] before expansion. The recognizers
//! are built on `winnow` and borrow from the text they inspect.

mod modifier;
mod pattern;
mod scan;
mod token;

pub use modifier::{ModifierCall, parse_modifier_call};
pub use pattern::{Shape, classify};
pub use scan::{Reference, scan_assigned_keys, scan_references};
pub use token::{
    MARKER, Piece, RuleToken, contains_rule, is_actions_only, is_expandable, split_rules,
};
