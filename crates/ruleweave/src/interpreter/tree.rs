//! Expansion trees.
//!
//! A [`Tree`] starts as a single root node holding the input text and grows
//! one node expansion per [`Tree::expand`] call. Expansion is depth-first and
//! left to right: the incomplete children of a node are expanded before any
//! of its later siblings. [`Tree::expand_breadth_first`] instead expands every
//! pending node, left to right, before any of their children.
//!
//! When a node and all of its descendants are done, the node is *finished*; a
//! finished node carrying a key is flattened and its value pushed onto the
//! runtime dictionary, so later expansions see it.
//!
//! Nodes live in an arena owned by the tree and are addressed by [`NodeId`].

use std::fmt::{Display, Formatter, Result as FmtResult};

use bon::Builder;
use serde_json::Value;
use tracing::{debug, trace};

use crate::interpreter::error::{ExpandError, compute_suggestions};
use crate::interpreter::grammar::Grammar;
use crate::interpreter::modifiers::{ModifierKind, ModifierRegistry};
use crate::interpreter::runtime::RuntimeDictionary;
use crate::interpreter::sampler::RangeSampler;
use crate::parser::{Shape, classify, is_expandable, parse_modifier_call};
use crate::types::{Node, NodeId, RuleContents};

const ROOT: NodeId = NodeId(0);

/// Options controlling how a node is flattened.
///
/// ```
/// use ruleweave::FlattenOptions;
///
/// let options = FlattenOptions::builder().ignore_hidden(false).build();
/// assert!(!options.ignore_hidden);
/// assert!(!options.ignore_modifiers);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct FlattenOptions {
    /// Hidden leaves contribute nothing.
    #[builder(default = true)]
    pub ignore_hidden: bool,

    /// Skip the modifiers of the node being flattened. Its descendants always
    /// apply theirs.
    #[builder(default)]
    pub ignore_modifiers: bool,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// An expansion tree for one input string.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    runtime: RuntimeDictionary,
    /// Nodes waiting to be expanded, rightmost first. The top is expanded
    /// next.
    pending: Vec<NodeId>,
    /// Set when a key capture fails. The tree cannot be expanded further.
    failure: Option<ExpandError>,
    steps: usize,
}

impl Tree {
    /// Create an unexpanded tree whose root holds `input`.
    pub fn new(input: impl Into<String>) -> Self {
        let text = input.into();
        let complete = !is_expandable(&text);
        Self {
            nodes: vec![Node::new(text, complete, false, None)],
            runtime: RuntimeDictionary::new(),
            pending: if complete { Vec::new() } else { vec![ROOT] },
            failure: None,
            steps: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// The node with the given id.
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of nodes created so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn runtime(&self) -> &RuntimeDictionary {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut RuntimeDictionary {
        &mut self.runtime
    }

    /// True once no node is waiting to be expanded and no capture failed.
    pub fn is_expanded(&self) -> bool {
        self.pending.is_empty() && self.failure.is_none()
    }

    /// Number of node expansions performed.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The error that stopped expansion, if a key capture failed.
    pub fn failure(&self) -> Option<&ExpandError> {
        self.failure.as_ref()
    }

    /// The node the next [`expand`](Self::expand) call will expand.
    pub fn first_unexpanded(&self) -> Option<NodeId> {
        self.pending.last().copied()
    }

    /// The last child of `id` that needed expansion when it was created.
    pub fn last_expandable_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0]
            .children
            .iter()
            .rev()
            .find(|child| !self.nodes[child.0].complete)
            .copied()
    }

    /// Leaves in left-to-right order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|(_, id)| self.nodes[id.0].is_leaf())
            .map(|(_, id)| id)
            .collect()
    }

    /// Every node in depth-first, left-to-right order, with its depth.
    pub fn preorder(&self) -> Vec<(usize, NodeId)> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(0, ROOT)];
        while let Some((depth, id)) = stack.pop() {
            order.push((depth, id));
            for &child in self.nodes[id.0].children.iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        order
    }

    /// Expand the next pending node.
    ///
    /// Returns whether more nodes are waiting. If the rule lookup fails, the
    /// node stays pending and the tree is unchanged, so the step can be
    /// retried. If the node finishes and capturing a key fails, the tree is
    /// marked failed and this and every later call return that error.
    pub fn expand<R, S: RangeSampler<R>>(
        &mut self,
        grammar: &mut Grammar<R, S>,
    ) -> Result<bool, ExpandError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        let Some(id) = self.pending.pop() else {
            return Ok(false);
        };
        let incomplete = match self.expand_one(id, grammar) {
            Ok(incomplete) => incomplete,
            Err(error) => {
                self.pending.push(id);
                return Err(error);
            }
        };
        if incomplete.is_empty() {
            self.finish(id, &grammar.modifiers)?;
        } else {
            self.pending.extend(incomplete.into_iter().rev());
        }
        Ok(!self.pending.is_empty())
    }

    /// Expand every pending node, left to right, then queue their incomplete
    /// children for the next call.
    ///
    /// Keys bind when their node finishes, so a rule expanded in the same
    /// pass as a key action, or an earlier one, does not see that key. On a
    /// lookup error the nodes not yet expanded stay pending, together with
    /// the children found so far.
    pub fn expand_breadth_first<R, S: RangeSampler<R>>(
        &mut self,
        grammar: &mut Grammar<R, S>,
    ) -> Result<bool, ExpandError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        let wave: Vec<NodeId> = self.pending.drain(..).rev().collect();
        let mut next = Vec::new();
        for (position, &id) in wave.iter().enumerate() {
            let incomplete = match self.expand_one(id, grammar) {
                Ok(incomplete) => incomplete,
                Err(error) => {
                    next.extend_from_slice(&wave[position..]);
                    self.pending = next.into_iter().rev().collect();
                    return Err(error);
                }
            };
            if incomplete.is_empty() {
                self.finish(id, &grammar.modifiers)?;
            } else {
                next.extend(incomplete);
            }
        }
        self.pending = next.into_iter().rev().collect();
        Ok(!self.pending.is_empty())
    }

    /// Expand until no node is pending.
    pub fn expand_all<R, S: RangeSampler<R>>(
        &mut self,
        grammar: &mut Grammar<R, S>,
    ) -> Result<(), ExpandError> {
        while self.expand(grammar)? {}
        Ok(())
    }

    /// Expand one node, returning its incomplete children left to right.
    fn expand_one<R, S: RangeSampler<R>>(
        &mut self,
        id: NodeId,
        grammar: &mut Grammar<R, S>,
    ) -> Result<Vec<NodeId>, ExpandError> {
        if let Some(limit) = grammar.expansion_limit {
            if self.steps >= limit {
                return Err(ExpandError::ExpansionLimitExceeded { limit });
            }
        }
        self.expand_node(id, grammar)?;
        self.steps += 1;
        Ok(self.nodes[id.0]
            .children
            .iter()
            .copied()
            .filter(|child| !self.nodes[child.0].complete)
            .collect())
    }

    /// Flatten the whole tree with default options.
    pub fn flatten(&mut self, modifiers: &ModifierRegistry) -> Result<String, ExpandError> {
        self.flatten_node(ROOT, modifiers, FlattenOptions::default())
    }

    /// Flatten the subtree below `id`.
    ///
    /// Takes `&mut self` because tree and node modifiers may change the tree.
    /// Those modifiers run at most once per node, so flattening the same
    /// subtree again, directly or through an enclosing key capture, repeats
    /// no side effects.
    pub fn flatten_node(
        &mut self,
        id: NodeId,
        modifiers: &ModifierRegistry,
        options: FlattenOptions,
    ) -> Result<String, ExpandError> {
        self.flatten_inner(id, modifiers, options).map_err(|source| {
            let node = &self.nodes[id.0];
            match &node.rule {
                Some(rule) => ExpandError::Flatten {
                    rule: rule.clone(),
                    text: node.text.clone(),
                    source: Box::new(source),
                },
                None => source,
            }
        })
    }

    fn flatten_inner(
        &mut self,
        id: NodeId,
        registry: &ModifierRegistry,
        options: FlattenOptions,
    ) -> Result<String, ExpandError> {
        if options.ignore_modifiers || self.nodes[id.0].modifiers.is_empty() {
            return self.flatten_contents(id, registry, options.ignore_hidden);
        }
        let base = self.flatten_contents(id, registry, options.ignore_hidden)?;
        if base.is_empty() {
            return Ok(base);
        }
        self.apply_modifiers(id, base, registry)
    }

    fn flatten_contents(
        &mut self,
        id: NodeId,
        registry: &ModifierRegistry,
        ignore_hidden: bool,
    ) -> Result<String, ExpandError> {
        let node = &self.nodes[id.0];
        if node.children.is_empty() {
            if ignore_hidden && node.hidden {
                return Ok(String::new());
            }
            return Ok(node.text.clone());
        }
        let children = node.children.clone();
        let options = FlattenOptions {
            ignore_hidden,
            ignore_modifiers: false,
        };
        let mut output = String::new();
        for child in children {
            output.push_str(&self.flatten_node(child, registry, options)?);
        }
        Ok(output)
    }

    fn apply_modifiers(
        &mut self,
        id: NodeId,
        base: String,
        registry: &ModifierRegistry,
    ) -> Result<String, ExpandError> {
        let node = &self.nodes[id.0];
        let specs = node.modifiers.clone();
        let rule = node.rule.clone().unwrap_or_default();
        let effects_applied = node.effects_applied;
        let mut output = base;
        for spec in &specs {
            let call = parse_modifier_call(spec);
            let Some(modifier) = registry.get(call.name) else {
                debug!(modifier = call.name, %rule, "skipping unknown modifier");
                continue;
            };
            if call.params.len() != modifier.arity {
                return Err(ExpandError::WrongParameterCount {
                    modifier: call.name.to_string(),
                    expected: modifier.arity,
                    got: call.params.len(),
                });
            }
            output = match modifier.kind {
                ModifierKind::Text(f) => f(&output, &call.params),
                ModifierKind::Tree(_) | ModifierKind::Node(_) if effects_applied => String::new(),
                ModifierKind::Tree(f) => {
                    f(self, &rule, &call.params);
                    self.nodes[id.0].effects_applied = true;
                    String::new()
                }
                ModifierKind::Node(f) => {
                    f(&mut self.nodes[id.0], &rule, &call.params);
                    self.nodes[id.0].effects_applied = true;
                    String::new()
                }
            };
        }
        Ok(output)
    }

    fn add_child(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let text = text.into();
        let complete = !is_expandable(&text);
        let hidden = self.nodes[parent.0].hidden;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(text, complete, hidden, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Classify a node's text and attach its children.
    fn expand_node<R, S: RangeSampler<R>>(
        &mut self,
        id: NodeId,
        grammar: &mut Grammar<R, S>,
    ) -> Result<(), ExpandError> {
        let text = self.nodes[id.0].text.clone();
        let shape = classify(&text);
        trace!(node = id.0, %text, shape = shape.label(), "expand");
        match shape {
            Shape::Literal => {}
            Shape::Rule { name, modifiers } => {
                let output = resolve(grammar, &self.runtime, name)?;
                let child = self.add_child(id, output);
                let node = &mut self.nodes[child.0];
                node.rule = Some(name.to_string());
                node.modifiers = modifiers.into_iter().map(str::to_string).collect();
            }
            Shape::RuleWithActions { actions, rule } => {
                self.add_child(id, actions);
                self.add_child(id, rule);
            }
            Shape::KeylessAction { value } => {
                self.nodes[id.0].hidden = true;
                let child = self.add_child(id, value);
                self.nodes[child.0].key = Some(String::new());
            }
            Shape::KeyWithRule { key, value } => {
                self.nodes[id.0].hidden = true;
                let child = self.add_child(id, value);
                self.nodes[child.0].key = Some(key.to_string());
            }
            Shape::KeyWithText { key, values } => {
                self.nodes[id.0].hidden = true;
                for value in &values {
                    self.add_child(id, *value);
                }
                let values = values.into_iter().map(str::to_string).collect();
                self.runtime.push(key, RuleContents::Choices(values));
            }
            Shape::Actions(groups) => {
                for group in groups {
                    self.add_child(id, group);
                }
            }
            Shape::Inert => {
                self.nodes[id.0].hidden = true;
            }
            Shape::Mixed(pieces) => {
                for piece in pieces {
                    self.add_child(id, piece);
                }
            }
        }
        self.nodes[id.0].expanded = true;
        Ok(())
    }

    /// Mark `id` finished, then every ancestor whose children are now all
    /// finished, capturing keys innermost first. A failed capture marks the
    /// tree failed.
    fn finish(&mut self, id: NodeId, modifiers: &ModifierRegistry) -> Result<(), ExpandError> {
        let mut current = id;
        loop {
            if let Err(error) = self.capture(current, modifiers) {
                self.failure = Some(error.clone());
                return Err(error);
            }
            self.nodes[current.0].finished = true;
            let Some(parent) = self.nodes[current.0].parent else {
                return Ok(());
            };
            let siblings_done = self.nodes[parent.0]
                .children
                .iter()
                .all(|child| self.nodes[child.0].is_finished());
            if !siblings_done {
                return Ok(());
            }
            current = parent;
        }
    }

    /// Push a finished keyed node's value onto the runtime dictionary. An
    /// empty key runs the node's modifiers and discards the value.
    fn capture(&mut self, id: NodeId, modifiers: &ModifierRegistry) -> Result<(), ExpandError> {
        let Some(key) = self.nodes[id.0].key.clone() else {
            return Ok(());
        };
        let options = FlattenOptions::builder().ignore_hidden(false).build();
        let value = self.flatten_node(id, modifiers, options)?;
        if !key.is_empty() {
            self.runtime.push(key, RuleContents::Text(value));
        }
        Ok(())
    }
}

/// Resolve a rule name to the text of one expansion.
fn resolve<R, S: RangeSampler<R>>(
    grammar: &mut Grammar<R, S>,
    runtime: &RuntimeDictionary,
    name: &str,
) -> Result<String, ExpandError> {
    let Some(contents) = runtime.top(name).or_else(|| grammar.rules.get(name)) else {
        let mut available: Vec<&str> = grammar.rules.names().collect();
        available.extend(runtime.names());
        return Err(ExpandError::UnknownRule {
            name: name.to_string(),
            suggestions: compute_suggestions(name, &available),
        });
    };
    match contents {
        RuleContents::Text(text) => Ok(text.clone()),
        RuleContents::Choices(choices) => {
            if choices.is_empty() {
                return Err(ExpandError::EmptyChoices {
                    rule: name.to_string(),
                });
            }
            let index = grammar
                .sampler
                .sample(&mut grammar.rng, 0, choices.len() - 1);
            choices
                .get(index)
                .cloned()
                .ok_or_else(|| ExpandError::SampleOutOfRange {
                    rule: name.to_string(),
                    index,
                    len: choices.len(),
                })
        }
        RuleContents::Object(object) => {
            let Some(handler_name) = contents.handler_name() else {
                return Err(ExpandError::UnknownHandler {
                    rule: name.to_string(),
                    handler: None,
                });
            };
            let Some(handler) = grammar.handlers.get(handler_name) else {
                return Err(ExpandError::UnknownHandler {
                    rule: name.to_string(),
                    handler: Some(handler_name.to_string()),
                });
            };
            match handler(object, &mut grammar.rng) {
                Ok(Value::String(text)) => Ok(text),
                Ok(other) => Err(ExpandError::HandlerTypeMismatch {
                    rule: name.to_string(),
                    handler: handler_name.to_string(),
                    found: json_type_name(&other).to_string(),
                }),
                Err(message) => Err(ExpandError::HandlerFailed {
                    rule: name.to_string(),
                    handler: handler_name.to_string(),
                    message,
                }),
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// An indented outline, one node per line.
///
/// Each line shows the node text, then `hidden`, `key=...`, `rule=...` and
/// `mods=...` when they apply.
impl Display for Tree {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (depth, id) in self.preorder() {
            let node = &self.nodes[id.0];
            write!(f, "{:indent$}{:?}", "", node.text, indent = depth * 2)?;
            if node.hidden {
                write!(f, " hidden")?;
            }
            if let Some(key) = &node.key {
                write!(f, " key={key:?}")?;
            }
            if let Some(rule) = &node.rule {
                write!(f, " rule={rule}")?;
            }
            if !node.modifiers.is_empty() {
                write!(f, " mods={}", node.modifiers.join("."))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
