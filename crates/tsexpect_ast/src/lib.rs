//! tsexpect_ast: Checker-agnostic syntax trees.
//!
//! Every checker version parses test files on its own; what it hands back is
//! flattened into a [`SyntaxTree`] so that assertion matching never depends
//! on a particular checker's node representation.

pub mod syntax_kind;
pub mod tree;
pub mod visitor;

// Re-export key types
pub use syntax_kind::SyntaxKind;
pub use tree::{NodeId, SyntaxNode, SyntaxTree, TreeBuilder};
pub use visitor::Preorder;
