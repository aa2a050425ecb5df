//! # arbor-core
//!
//! The document-tree pipeline shared by every widget:
//! - **tree**: the node arena under one page root, with attach/detach/touch
//!   and identifier search
//! - **compiler**: the mutating, idempotent compile pass
//! - **theme**: nearest-wins presentation inheritance
//! - **registry**: the page-scoped, deduplicating resource collector
//! - **render**: the read-only serialization pass
//!
//! A build goes: create nodes → configure → attach under the page →
//! [`Compiler::compile`] once → [`Renderer::render`] any number of times.

pub mod access;
pub mod compiler;
pub mod config;
pub mod error;
pub mod flags;
pub mod ids;
pub mod markup;
pub mod node;
pub mod page;
pub mod registry;
pub mod render;
pub mod theme;
pub mod tree;
pub mod widget;

#[cfg(test)]
pub(crate) mod testing;

pub use access::{AccessMonitor, ReadScope, WriteScope};
pub use compiler::{CompileReport, Compiler};
pub use config::DocumentConfig;
pub use error::{CompileError, RenderError, TreeError};
pub use flags::{FlagValue, PageFlagTable};
pub use ids::IdentifierAllocator;
pub use markup::MarkupWriter;
pub use node::{EventBinding, EventKind, Node, NodeId, Presentation, Resolved};
pub use page::Page;
pub use registry::{LinkKind, LoadClass, Payload, ResourceEntry, ResourceRegistry, StateEvent};
pub use render::Renderer;
pub use theme::{ThemeOverlay, ThemeResolver};
pub use tree::Document;
pub use widget::{AttachContext, CompileContext, RenderContext, Widget};

// Foundation crates, re-exported so widget crates need a single dependency.
pub use arbor_style as style;
pub use arbor_traits as traits;
pub use arbor_types as types;
