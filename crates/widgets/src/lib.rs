//! Built-in widgets for arbor documents and a fluent way to assemble them.
//!
//! Widgets describe what a node does; [`Element`](builders::Element) describes
//! one node's configuration and subtree and mounts it into a document:
//!
//! ```ignore
//! use arbor_core::{Document, DocumentConfig};
//! use arbor_widgets::builders::*;
//! use arbor_widgets::widgets::*;
//!
//! let mut doc = Document::new(DocumentConfig::default())?;
//! let root = doc.root();
//! div()
//!     .child(h1("Orders"))
//!     .child(table(&["Id", "Total"], [vec!["1".to_string(), "9.99".to_string()]]))
//!     .child(button("Refresh", "reload()").tooltip("Fetch the latest orders"))
//!     .mount(&mut doc, root)?;
//! ```
//!
//! Widget functions (`h1`, `p`, `button`, ...) return pre-configured elements
//! and compose like any other element.

mod container;
mod control;
mod element;
mod resource;
mod table;

pub mod widgets;

#[cfg(test)]
mod tests;

/// Contains every widget and the element builder.
///
/// Import with `use arbor_widgets::builders::*;` for convenience.
pub mod builders {
    pub use super::container::{Container, Heading, Text};
    pub use super::control::{Button, HiddenField, TextField};
    pub use super::element::Element;
    pub use super::resource::{MetaTag, ModuleLink, Script, StateHook};
    pub use super::table::{Cell, Row, Table};
}
