/// Index of a node within its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in creation order. The root is 0.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One node of an expansion tree.
///
/// A node holds the raw text it was created with. Expanding it attaches
/// children; flattening concatenates the leaves below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) text: String,
    pub(crate) complete: bool,
    pub(crate) expanded: bool,
    pub(crate) hidden: bool,
    pub(crate) key: Option<String>,
    pub(crate) modifiers: Vec<String>,
    pub(crate) rule: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Expanded, with every descendant expanded and every key captured.
    pub(crate) finished: bool,
    /// Tree and node modifiers already ran for this node.
    pub(crate) effects_applied: bool,
}

impl Node {
    pub(crate) fn new(
        text: String,
        complete: bool,
        hidden: bool,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            text,
            complete,
            expanded: false,
            hidden,
            key: None,
            modifiers: Vec::new(),
            rule: None,
            parent,
            children: Vec::new(),
            finished: false,
            effects_applied: false,
        }
    }

    /// The text this node was created with.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the node's text. Used by node modifiers.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// True if the text needs no rule or action resolution.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// True once the node and everything below it is expanded and any key
    /// has been captured. Complete leaves count as finished.
    pub fn is_finished(&self) -> bool {
        self.complete || self.finished
    }

    /// True if the node's literal output is suppressed when flattening.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// The runtime key this node's flattened value is captured under.
    ///
    /// An empty key means the value is computed and discarded.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Modifier specs applied when this node is flattened.
    pub fn modifiers(&self) -> &[String] {
        &self.modifiers
    }

    /// The rule whose expansion produced this node.
    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }

    /// The node this one was expanded from. `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
