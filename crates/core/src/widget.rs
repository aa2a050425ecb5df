//! The collaborator contract every node's behaviour implements.
//!
//! A widget is configured by its constructor, attached through the
//! [`Document`], compiled exactly once by the compile pass and rendered any
//! number of times. The hooks receive narrow contexts rather than the whole
//! document so the pass that calls them keeps its own invariants.

use crate::config::DocumentConfig;
use crate::error::{CompileError, RenderError, TreeError};
use crate::flags::PageFlagTable;
use crate::markup::MarkupWriter;
use crate::node::{Node, NodeId};
use crate::registry::{ResourceEntry, ResourceRegistry};
use crate::render;
use crate::tree::Document;
use arbor_traits::{Bundle, Capabilities};
use arbor_types::LinkAddress;
use itertools::Itertools;
use std::fmt::Debug;

pub trait Widget: Send + Debug {
    /// Short kind name, e.g. `"table"`. Required-ancestor checks compare these.
    fn kind(&self) -> &'static str;

    /// Page widgets are document roots and can never be attached.
    fn is_page(&self) -> bool {
        false
    }

    /// Kind of ancestor this widget must sit beneath.
    fn required_ancestor(&self) -> Option<&'static str> {
        None
    }

    /// Theme keys resolved for this node during compile.
    fn themed_keys(&self) -> &'static [&'static str] {
        &[]
    }

    /// Whether the node needs an identifier in markup even if none was set.
    fn needs_identifier(&self) -> bool {
        false
    }

    /// Called when the node (or an ancestor) becomes connected to a page.
    fn attached(&mut self, _ctx: &mut AttachContext<'_>) -> Result<(), TreeError> {
        Ok(())
    }

    /// One-time setup, run after the framework's own setup for the node and
    /// before its children compile.
    fn compile(&mut self, _ctx: &mut CompileContext<'_>) -> Result<(), CompileError> {
        Ok(())
    }

    fn render(&self, ctx: &RenderContext<'_>, out: &mut MarkupWriter) -> Result<(), RenderError>;
}

pub struct AttachContext<'a> {
    pub(crate) node: NodeId,
    pub(crate) page: NodeId,
    pub(crate) flags: &'a mut PageFlagTable,
}

impl AttachContext<'_> {
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    pub fn page(&self) -> NodeId {
        self.page
    }

    pub fn flags(&mut self) -> &mut PageFlagTable {
        &mut *self.flags
    }
}

pub struct CompileContext<'a> {
    pub(crate) doc: &'a mut Document,
    pub(crate) caps: &'a dyn Capabilities,
    pub(crate) node: NodeId,
}

impl CompileContext<'_> {
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    pub fn page(&self) -> NodeId {
        self.doc.root()
    }

    pub fn node(&self) -> Result<&Node, TreeError> {
        self.doc.node(self.node)
    }

    pub fn node_mut(&mut self) -> Result<&mut Node, TreeError> {
        self.doc.node_mut(self.node)
    }

    /// Another node, e.g. one this widget just created.
    pub fn get_node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.doc.node_mut(id)
    }

    pub fn document(&self) -> &Document {
        &*self.doc
    }

    pub fn capabilities(&self) -> &dyn Capabilities {
        self.caps
    }

    pub fn create(&mut self, widget: impl Widget + 'static) -> NodeId {
        self.doc.create(Box::new(widget))
    }

    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.doc.attach(parent, child)
    }

    /// Appends `child` to the node being compiled; it compiles later in this pass.
    pub fn append_child(&mut self, child: NodeId) -> Result<(), TreeError> {
        self.doc.attach(self.node, child)
    }

    pub fn append_to_page(&mut self, child: NodeId) -> Result<(), TreeError> {
        let page = self.doc.root();
        self.doc.attach(page, child)
    }

    /// Queues a resource on this node; it is flushed once the subtree compiles.
    pub fn queue(&mut self, entry: ResourceEntry) -> Result<(), TreeError> {
        self.node_mut()?.queue_resource(entry);
        Ok(())
    }

    pub fn flags(&mut self) -> &mut PageFlagTable {
        self.doc.flags_mut()
    }

    /// Resolved value of one of the widget's themed keys.
    pub fn themed(&self, key: &str) -> Option<String> {
        self.node().ok()?.resolved.theme.get(key).cloned()
    }
}

pub struct RenderContext<'a> {
    pub(crate) doc: &'a Document,
    pub(crate) caps: &'a dyn Capabilities,
    pub(crate) node: &'a Node,
    pub(crate) id: NodeId,
    pub(crate) bundle: Option<&'a Bundle>,
}

impl<'a> RenderContext<'a> {
    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn node_id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn config(&self) -> &'a DocumentConfig {
        self.doc.config()
    }

    pub fn registry(&self) -> &'a ResourceRegistry {
        self.doc.registry()
    }

    pub fn capabilities(&self) -> &'a dyn Capabilities {
        self.caps
    }

    pub fn themed(&self, key: &str) -> Option<&'a str> {
        self.node.resolved.theme.get(key).map(String::as_str)
    }

    /// Where a link points, prefixed with the resolved bundle's base URL.
    pub fn link_href(&self, address: &LinkAddress) -> String {
        render::bundle_href(self.bundle, address)
    }

    /// The attributes every element carries: identifier, classes, tooltip,
    /// tab order and event handlers.
    pub fn common_attributes(&self) -> Vec<(&'static str, String)> {
        let node = self.node;
        let mut attrs = Vec::new();
        if let Some(id) = node.effective_id() {
            attrs.push(("id", id.to_string()));
        }
        let classes = node
            .presentation
            .classes
            .iter()
            .map(String::as_str)
            .chain(node.resolved.style_class.as_deref())
            .join(" ");
        if !classes.is_empty() {
            attrs.push(("class", classes));
        }
        if let Some(tooltip) = &node.presentation.tooltip {
            attrs.push(("data-tooltip", tooltip.clone()));
        }
        if let Some(index) = node.presentation.tab_index {
            attrs.push(("tabindex", index.to_string()));
        }
        for (event, script) in node.merged_events() {
            attrs.push((event.attribute(), script));
        }
        attrs
    }

    /// Opens `tag` with the common attributes followed by `extra`.
    pub fn open(&self, out: &mut MarkupWriter, tag: &str, extra: &[(&str, &str)]) {
        let common = self.common_attributes();
        out.open(tag, Self::pairs(&common, extra));
    }

    /// Like [`open`](Self::open) for void elements.
    pub fn void(&self, out: &mut MarkupWriter, tag: &str, extra: &[(&str, &str)]) {
        let common = self.common_attributes();
        out.void(tag, Self::pairs(&common, extra));
    }

    pub fn render_children(&self, out: &mut MarkupWriter) -> Result<(), RenderError> {
        for &child in self.node.children() {
            render::render_node(self.doc, self.caps, self.bundle, child, out)?;
        }
        Ok(())
    }

    fn pairs<'s>(
        common: &'s [(&'static str, String)],
        extra: &'s [(&'s str, &'s str)],
    ) -> impl Iterator<Item = (&'s str, &'s str)> {
        common
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .chain(extra.iter().copied())
    }
}
