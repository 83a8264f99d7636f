//! Arena-backed syntax tree.
//!
//! Nodes are stored in pre-order in a single `Vec`; children keep their source
//! order. A node's span starts at its first token, after leading trivia, which
//! is the position assertions are matched against.

use crate::syntax_kind::SyntaxKind;
use std::fmt;
use tsexpect_core::text::TextSpan;

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The root (`SourceFile`) node of every tree.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    /// Span from the node's first token to its end.
    pub span: TextSpan,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// The syntax tree of one source file.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    file_name: String,
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// The file this tree was parsed from.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The `SourceFile` node.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Look up a node. Returns `None` for ids from another tree.
    pub fn get(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.index())
    }

    /// Look up a node that is known to belong to this tree.
    ///
    /// # Panics
    /// Panics if `id` is out of range for this tree.
    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.node(id).kind
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// If `id` is an expression statement, the expression it wraps;
    /// otherwise `id` itself. Only one level is unwrapped.
    pub fn unwrap_expression_statement(&self, id: NodeId) -> NodeId {
        let node = self.node(id);
        if node.kind == SyntaxKind::ExpressionStatement {
            if let Some(&expr) = node.children.first() {
                return expr;
            }
        }
        id
    }
}

/// Incrementally builds a [`SyntaxTree`] in pre-order.
///
/// ```
/// use tsexpect_ast::{SyntaxKind, TreeBuilder};
/// use tsexpect_core::TextSpan;
///
/// let mut builder = TreeBuilder::new("a.ts", TextSpan::new(0, 2));
/// builder.start_node(SyntaxKind::ExpressionStatement, TextSpan::new(0, 2));
/// builder.leaf(SyntaxKind::Identifier, TextSpan::new(0, 1));
/// builder.finish_node();
/// let tree = builder.finish();
/// assert_eq!(tree.len(), 3);
/// ```
pub struct TreeBuilder {
    file_name: String,
    nodes: Vec<SyntaxNode>,
    /// Open nodes; the root is always at the bottom.
    stack: Vec<NodeId>,
}

impl TreeBuilder {
    /// Start a tree whose root `SourceFile` node covers `span`.
    pub fn new(file_name: impl Into<String>, span: TextSpan) -> Self {
        let root = SyntaxNode {
            kind: SyntaxKind::SourceFile,
            span,
            parent: None,
            children: Vec::new(),
        };
        Self {
            file_name: file_name.into(),
            nodes: vec![root],
            stack: vec![NodeId::ROOT],
        }
    }

    fn push(&mut self, kind: SyntaxKind, span: TextSpan) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let parent = *self.stack.last().unwrap_or(&NodeId::ROOT);
        self.nodes.push(SyntaxNode {
            kind,
            span,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Open a node; subsequent nodes become its children until
    /// [`finish_node`](Self::finish_node).
    pub fn start_node(&mut self, kind: SyntaxKind, span: TextSpan) -> NodeId {
        let id = self.push(kind, span);
        self.stack.push(id);
        id
    }

    /// Close the most recently opened node. The root is never closed.
    pub fn finish_node(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Add a node without children.
    pub fn leaf(&mut self, kind: SyntaxKind, span: TextSpan) -> NodeId {
        self.push(kind, span)
    }

    /// Close any open nodes and return the tree.
    pub fn finish(self) -> SyntaxTree {
        SyntaxTree {
            file_name: self.file_name,
            nodes: self.nodes,
        }
    }
}
