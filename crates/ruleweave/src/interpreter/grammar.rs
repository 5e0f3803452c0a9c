//! The grammar facade.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::interpreter::error::{ExpandError, LintWarning};
use crate::interpreter::handlers::{HandlerRegistry, ObjectHandlerFn};
use crate::interpreter::lint::lint_rules;
use crate::interpreter::modifiers::{Modifier, ModifierRegistry};
use crate::interpreter::sampler::{RangeSampler, UniformSampler};
use crate::interpreter::tree::{FlattenOptions, Tree};
use crate::types::RuleSet;

/// A rule set together with the random source, sampler and registries used
/// to expand it.
///
/// The random source is owned and advances across calls, so repeated
/// [`flatten`](Self::flatten) calls produce different outputs.
///
/// ```
/// use ruleweave::{Grammar, RuleSet};
///
/// let rules = RuleSet::from_json_str(r##"{
///     "animal": "owl",
///     "origin": "#[pet:#animal#]story#",
///     "story": "#pet.a.capitalize# hooted"
/// }"##)?;
/// let mut grammar = Grammar::seeded(rules, 7).with_builtins();
/// assert_eq!(grammar.flatten("#origin#")?, "An owl hooted");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Grammar<R = StdRng, S = UniformSampler> {
    pub(crate) rules: RuleSet,
    pub(crate) rng: R,
    pub(crate) sampler: S,
    pub(crate) modifiers: ModifierRegistry,
    pub(crate) handlers: HandlerRegistry<R>,
    pub(crate) expansion_limit: Option<usize>,
}

impl Grammar {
    /// Create a grammar with an entropy-seeded random source and no
    /// modifiers or handlers.
    pub fn new(rules: RuleSet) -> Self {
        Self::with_rng(rules, StdRng::from_entropy())
    }

    /// Create a grammar with a reproducible random source.
    pub fn seeded(rules: RuleSet, seed: u64) -> Self {
        Self::with_rng(rules, StdRng::seed_from_u64(seed))
    }
}

impl<R> Grammar<R> {
    /// Create a grammar drawing uniform choices from `rng`.
    pub fn with_rng(rules: RuleSet, rng: R) -> Self {
        Self::with_sampler(rules, rng, UniformSampler)
    }
}

impl<R, S> Grammar<R, S> {
    /// Create a grammar with a custom sampler for choice rules.
    pub fn with_sampler(rules: RuleSet, rng: R, sampler: S) -> Self {
        Self {
            rules,
            rng,
            sampler,
            modifiers: ModifierRegistry::new(),
            handlers: HandlerRegistry::new(),
            expansion_limit: None,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn modifiers(&self) -> &ModifierRegistry {
        &self.modifiers
    }

    pub fn handlers(&self) -> &HandlerRegistry<R> {
        &self.handlers
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn expansion_limit(&self) -> Option<usize> {
        self.expansion_limit
    }

    /// Cap the number of node expansions per tree. `None` removes the cap.
    pub fn set_expansion_limit(&mut self, limit: Option<usize>) {
        self.expansion_limit = limit;
    }

    /// Register a modifier, replacing any with the same name.
    pub fn add_modifier(&mut self, name: impl Into<String>, modifier: Modifier) {
        self.modifiers.insert(name, modifier);
    }

    pub fn add_modifiers<N: Into<String>>(
        &mut self,
        modifiers: impl IntoIterator<Item = (N, Modifier)>,
    ) {
        self.modifiers.extend(modifiers);
    }

    /// Register an object handler, replacing any with the same name.
    pub fn add_handler(&mut self, name: impl Into<String>, handler: ObjectHandlerFn<R>) {
        self.handlers.insert(name, handler);
    }

    pub fn add_handlers<N: Into<String>>(
        &mut self,
        handlers: impl IntoIterator<Item = (N, ObjectHandlerFn<R>)>,
    ) {
        self.handlers.extend(handlers);
    }

    /// An unexpanded tree for `input`.
    pub fn tree(&self, input: impl Into<String>) -> Tree {
        Tree::new(input)
    }

    /// Flatten a tree using this grammar's modifiers.
    pub fn flatten_tree(
        &self,
        tree: &mut Tree,
        options: FlattenOptions,
    ) -> Result<String, ExpandError> {
        let root = tree.root();
        tree.flatten_node(root, &self.modifiers, options)
    }

    /// Check the rule set for problems without expanding anything.
    pub fn lint(&self) -> Vec<LintWarning> {
        lint_rules(&self.rules, &self.modifiers, &self.handlers)
    }
}

impl<R: Rng, S> Grammar<R, S> {
    /// Register the English modifiers, `pop!!`, and the `weighted` and
    /// `binomial` handlers.
    pub fn with_builtins(mut self) -> Self {
        self.modifiers.extend(ModifierRegistry::builtin());
        self.handlers.extend(HandlerRegistry::<R>::builtin());
        self
    }
}

impl<R, S: RangeSampler<R>> Grammar<R, S> {
    /// Expand the next pending node of `tree`. Returns whether more remain.
    pub fn expand(&mut self, tree: &mut Tree) -> Result<bool, ExpandError> {
        tree.expand(self)
    }

    /// Expand every pending node of `tree` before any of their children.
    /// Returns whether more remain.
    pub fn expand_breadth_first(&mut self, tree: &mut Tree) -> Result<bool, ExpandError> {
        tree.expand_breadth_first(self)
    }

    /// A fully expanded tree for `input`.
    pub fn expanded_tree(&mut self, input: impl Into<String>) -> Result<Tree, ExpandError> {
        let mut tree = Tree::new(input);
        tree.expand_all(self)?;
        Ok(tree)
    }

    /// Expand `input` fully and flatten it, hiding hidden nodes and applying
    /// modifiers.
    pub fn flatten(&mut self, input: impl Into<String>) -> Result<String, ExpandError> {
        let mut tree = self.expanded_tree(input)?;
        self.flatten_tree(&mut tree, FlattenOptions::default())
    }
}

impl<R, S> Debug for Grammar<R, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Grammar")
            .field("rules", &self.rules)
            .field("modifiers", &self.modifiers)
            .field("handlers", &self.handlers)
            .field("expansion_limit", &self.expansion_limit)
            .finish_non_exhaustive()
    }
}
