// src/error.rs
//! Error types for the tree, compile and render phases.
//!
//! Structural problems are errors and abort the pass that hit them. Cosmetic
//! problems (bad inherited values, malformed version strings) never reach these
//! types: they are logged and replaced with a default where they occur.

use crate::node::NodeId;
use arbor_traits::CatalogError;
use arbor_types::IdError;
use thiserror::Error;

/// Contract violations on the document tree. These indicate a caller bug and
/// are never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Node {0} does not exist")]
    UnknownNode(NodeId),
    #[error("Cannot attach node {0} to itself")]
    SelfAttach(NodeId),
    #[error("Cannot attach node {child} beneath its own descendant {parent}")]
    CyclicAttach { parent: NodeId, child: NodeId },
    #[error("Page node {0} cannot be attached beneath another node")]
    NestedPage(NodeId),
    #[error("'{kind}' node {node} requires a '{required}' ancestor")]
    MissingAncestor {
        node: NodeId,
        kind: &'static str,
        required: &'static str,
    },
    #[error(transparent)]
    InvalidIdentifier(#[from] IdError),
    #[error("Node {parent} has no child at index {index}")]
    ChildIndexOutOfRange { parent: NodeId, index: usize },
    #[error("Flag key '{0}' is reserved for the framework")]
    ReservedFlag(String),
    #[error("Access violation: {0}")]
    AccessViolation(String),
    #[error("Invalid document configuration: {0}")]
    Config(String),
}

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Tree contract violated during compile: {0}")]
    Tree(#[from] TreeError),
    #[error("'{kind}' node {node} failed to compile: {message}")]
    Widget {
        node: NodeId,
        kind: &'static str,
        message: String,
    },
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Node {0} has not been compiled; run the compile pass before rendering")]
    NotCompiled(NodeId),
    #[error("Module resolution failed: {0}")]
    UnresolvedModules(#[from] CatalogError),
    #[error("Tree contract violated during render: {0}")]
    Tree(#[from] TreeError),
    #[error("Render started while the tree is being written: {0}")]
    AccessViolation(String),
    #[error("Failed to write markup: {0}")]
    Write(#[from] std::fmt::Error),
    #[error("'{kind}' node {node} failed to render: {message}")]
    Widget {
        node: NodeId,
        kind: &'static str,
        message: String,
    },
}
