//! Reconstructed match trees.
//!
//! A [`Parse`] mirrors the pattern it matched: one node per pattern node of the
//! winning derivation, each borrowing its [`PatternNode`] from the grammar so
//! that downstream passes can read names, literals and printing hints without
//! a second lookup.

use std::fmt;

use crate::pattern::PatternNode;

#[derive(Clone)]
pub struct Parse<'g, V> {
    pattern: &'g PatternNode,
    node: ParseNode<'g, V>,
}

/// Kind-specific payload of a [`Parse`] node.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseNode<'g, V> {
    /// The projected value of the consumed token.
    Consume(V),
    Sequence(Vec<Parse<'g, V>>),
    /// The chosen alternative and its position among the alternatives.
    Or {
        index: usize,
        choice: Box<Parse<'g, V>>,
    },
    /// `separators.len() == items.len() - 1` whenever the pattern has a
    /// separator and at least one item matched; empty otherwise.
    Many {
        items: Vec<Parse<'g, V>>,
        separators: Vec<Parse<'g, V>>,
    },
    Option(Option<Box<Parse<'g, V>>>),
    Thunk(Box<Parse<'g, V>>),
    Literal,
    Line,
    Indent(Box<Parse<'g, V>>),
    Group(Box<Parse<'g, V>>),
    If(Box<Parse<'g, V>>),
}

impl<'g, V> Parse<'g, V> {
    pub fn new(pattern: &'g PatternNode, node: ParseNode<'g, V>) -> Self {
        Parse { pattern, node }
    }

    #[inline]
    pub fn pattern(&self) -> &'g PatternNode {
        self.pattern
    }

    #[inline]
    pub fn node(&self) -> &ParseNode<'g, V> {
        &self.node
    }

    pub fn into_node(self) -> ParseNode<'g, V> {
        self.node
    }

    /// Extraction name of the pattern this node matched.
    pub fn name(&self) -> Option<&'g str> {
        self.pattern.name()
    }

    /// Direct children, items before separators for `Many`.
    pub fn children(&self) -> Vec<&Parse<'g, V>> {
        match &self.node {
            ParseNode::Consume(_) | ParseNode::Literal | ParseNode::Line => Vec::new(),
            ParseNode::Sequence(children) => children.iter().collect(),
            ParseNode::Many { items, separators } => items.iter().chain(separators).collect(),
            ParseNode::Option(child) => child.iter().map(AsRef::as_ref).collect(),
            ParseNode::Or { choice: child, .. }
            | ParseNode::Thunk(child)
            | ParseNode::Indent(child)
            | ParseNode::Group(child)
            | ParseNode::If(child) => vec![child.as_ref()],
        }
    }

    /// First node named `name` in depth-first pre-order, `self` included.
    pub fn find_named(&self, name: &str) -> Option<&Parse<'g, V>> {
        let mut stack = vec![self];
        while let Some(current) = stack.pop() {
            if current.name() == Some(name) {
                return Some(current);
            }
            stack.extend(current.children().into_iter().rev());
        }
        None
    }

    /// `false` for an empty repetition or an absent option.
    pub fn is_truthy(&self) -> bool {
        match &self.node {
            ParseNode::Many { items, .. } => !items.is_empty(),
            ParseNode::Option(child) => child.is_some(),
            _ => true,
        }
    }

    /// Consumed token values, in input order.
    pub fn values(&self) -> Vec<&V> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(current) = stack.pop() {
            match &current.node {
                ParseNode::Consume(value) => out.push(value),
                // Separators interleave with items in the input.
                ParseNode::Many { items, separators } => {
                    let mut ordered = Vec::with_capacity(items.len() + separators.len());
                    for (index, item) in items.iter().enumerate() {
                        ordered.push(item);
                        ordered.extend(separators.get(index));
                    }
                    stack.extend(ordered.into_iter().rev());
                }
                _ => stack.extend(current.children().into_iter().rev()),
            }
        }
        out
    }
}

impl<V: PartialEq> PartialEq for Parse<'_, V> {
    fn eq(&self, other: &Self) -> bool {
        self.pattern.id() == other.pattern.id() && self.node == other.node
    }
}

impl<V: fmt::Debug> fmt::Debug for Parse<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parse")
            .field("pattern", &self.pattern.id())
            .field("kind", &self.pattern.kind().tag())
            .field("node", &self.node)
            .finish()
    }
}
