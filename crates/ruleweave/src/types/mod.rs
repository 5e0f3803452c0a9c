mod node;
mod rule;
mod rules;

pub use node::{Node, NodeId};
pub use rule::RuleContents;
pub use rules::RuleSet;
