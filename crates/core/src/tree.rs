//! The document: an arena of nodes under one page root, plus the page-scoped
//! state (flags, registry, identifier allocator) that compile feeds.
//!
//! Children are owned through the parent's child list; the parent link is a
//! plain index back into the arena. Detached nodes stay in the arena and may
//! be attached again elsewhere.

use crate::access::AccessMonitor;
use crate::config::DocumentConfig;
use crate::error::TreeError;
use crate::flags::PageFlagTable;
use crate::ids::IdentifierAllocator;
use crate::node::{Node, NodeId};
use crate::page::Page;
use crate::registry::ResourceRegistry;
use crate::theme::{ThemeOverlay, ThemeResolver};
use crate::widget::{AttachContext, Widget};
use log::trace;
use slab::Slab;

/// State shared by every node on the page.
#[derive(Debug)]
pub struct PageState {
    pub(crate) flags: PageFlagTable,
    pub(crate) registry: ResourceRegistry,
    pub(crate) ids: IdentifierAllocator,
}

#[derive(Debug)]
pub struct Document {
    nodes: Slab<Node>,
    root: NodeId,
    pub(crate) page: PageState,
    config: DocumentConfig,
    access: AccessMonitor,
}

impl Document {
    /// Creates a document whose root is a fresh [`Page`].
    pub fn new(config: DocumentConfig) -> Result<Self, TreeError> {
        let ids = IdentifierAllocator::new(config.id_prefix.clone())
            .map_err(|e| TreeError::Config(format!("idPrefix '{}': {e}", config.id_prefix)))?;
        if config.style_class_prefix.is_empty() {
            return Err(TreeError::Config(
                "styleClassPrefix must not be empty".to_string(),
            ));
        }
        let mut nodes = Slab::new();
        let root = NodeId(nodes.insert(Node::new(Box::new(Page::new()))));
        Ok(Self {
            nodes,
            root,
            page: PageState {
                flags: PageFlagTable::new(),
                registry: ResourceRegistry::new(config.style_class_prefix.clone()),
                ids,
            },
            config,
            access: AccessMonitor::new(),
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    pub fn access(&self) -> &AccessMonitor {
        &self.access
    }

    pub fn flags(&self) -> &PageFlagTable {
        &self.page.flags
    }

    pub fn flags_mut(&mut self) -> &mut PageFlagTable {
        &mut self.page.flags
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.page.registry
    }

    /// Number of nodes ever created, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds an unattached node.
    pub fn create(&mut self, widget: Box<dyn Widget>) -> NodeId {
        NodeId(self.nodes.insert(Node::new(widget)))
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.nodes.get(id.0).ok_or(TreeError::UnknownNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.nodes.get_mut(id.0).ok_or(TreeError::UnknownNode(id))
    }

    /// Alias for [`attach`](Self::attach).
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.attach(parent, child)
    }

    /// Appends `child` under `parent`, moving it out of any previous parent.
    ///
    /// Fails without modifying the tree if the attach would create a cycle,
    /// nest a page, or leave a node connected to the page without the
    /// ancestor kind it requires. If an `attached` hook fails, the child is
    /// moved back to where it was; flags set by hooks that already ran stay.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.access.ensure_mutable("attach")?;
        self.node(parent)?;
        let child_node = self.node(child)?;
        if parent == child {
            return Err(TreeError::SelfAttach(child));
        }
        if child_node.is_page {
            return Err(TreeError::NestedPage(child));
        }
        if self.is_ancestor(child, parent)? {
            return Err(TreeError::CyclicAttach { parent, child });
        }
        let page = self.page_of(parent);
        if page.is_some() {
            self.check_required_ancestors(parent, child)?;
        }

        let previous = match self.node(child)?.parent {
            Some(old) => {
                let siblings = &mut self.node_mut(old)?.children;
                let index = siblings.iter().position(|&c| c == child);
                siblings.retain(|&c| c != child);
                index.map(|index| (old, index))
            }
            None => None,
        };
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        self.invalidate_page_cache(child);
        trace!("Attached {child} under {parent}");

        if let Some(page) = page {
            if let Err(e) = self.notify_attached(page, child) {
                self.restore(parent, child, previous)?;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Undoes the splice made by a failed attach.
    fn restore(
        &mut self,
        parent: NodeId,
        child: NodeId,
        previous: Option<(NodeId, usize)>,
    ) -> Result<(), TreeError> {
        self.node_mut(parent)?.children.retain(|&c| c != child);
        self.node_mut(child)?.parent = previous.map(|(old, _)| old);
        if let Some((old, index)) = previous {
            let siblings = &mut self.node_mut(old)?.children;
            siblings.insert(index.min(siblings.len()), child);
        }
        self.invalidate_page_cache(child);
        trace!("Rolled back attach of {child} under {parent}");
        Ok(())
    }

    /// Removes and returns the child at `index`.
    pub fn detach(&mut self, parent: NodeId, index: usize) -> Result<NodeId, TreeError> {
        self.access.ensure_mutable("detach")?;
        let node = self.node_mut(parent)?;
        if index >= node.children.len() {
            return Err(TreeError::ChildIndexOutOfRange { parent, index });
        }
        let child = node.children.remove(index);
        self.node_mut(child)?.parent = None;
        self.invalidate_page_cache(child);
        trace!("Detached {child} from {parent}");
        Ok(child)
    }

    /// Clears the node's compiled flag so the next compile pass sets it up again.
    pub fn touch(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.access.ensure_mutable("touch")?;
        self.node_mut(id)?.compiled = false;
        Ok(())
    }

    /// Depth-first search below (and including) `from` for an explicit or
    /// generated identifier, ignoring ASCII case.
    pub fn find_by_id(&self, from: NodeId, id: &str) -> Option<NodeId> {
        self.descendants(from).into_iter().find(|&candidate| {
            self.nodes
                .get(candidate.0)
                .and_then(Node::effective_id)
                .is_some_and(|found| found.matches(id))
        })
    }

    /// The page the node is connected to, cached on the node after the first walk.
    pub fn page_of(&self, id: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(id.0)?;
        if node.is_page {
            return Some(id);
        }
        if let Some(page) = node.page_cache.get() {
            return Some(page);
        }
        let mut current = node.parent;
        while let Some(ancestor) = current {
            let ancestor_node = self.nodes.get(ancestor.0)?;
            if ancestor_node.is_page {
                node.page_cache.set(Some(ancestor));
                return Some(ancestor);
            }
            current = ancestor_node.parent;
        }
        None
    }

    /// `from` and every node below it, in pre-order.
    pub fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id.0) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// The first node in pre-order below `from` whose compiled flag is clear.
    pub fn first_uncompiled(&self, from: NodeId) -> Option<NodeId> {
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let node = self.nodes.get(id.0)?;
            if !node.compiled {
                return Some(id);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    pub fn theme(&self, id: NodeId) -> Result<&ThemeOverlay, TreeError> {
        ThemeResolver::theme(self, id)
    }

    pub fn theme_mut(&mut self, id: NodeId) -> Result<&mut ThemeOverlay, TreeError> {
        ThemeResolver::theme_mut(self, id)
    }

    /// Whether `ancestor` is `id` or lies on `id`'s parent chain.
    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> Result<bool, TreeError> {
        let mut current = Some(id);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return Ok(true);
            }
            current = self.node(candidate)?.parent;
        }
        Ok(false)
    }

    /// Checks every node of `child`'s subtree as if `child` hung under `parent`.
    fn check_required_ancestors(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        for id in self.descendants(child) {
            let node = self.node(id)?;
            let Some(required) = node.required_ancestor else {
                continue;
            };
            let mut current = if id == child { Some(parent) } else { node.parent };
            let mut found = false;
            while let Some(ancestor) = current {
                let ancestor_node = self.node(ancestor)?;
                if ancestor_node.kind == required {
                    found = true;
                    break;
                }
                current = if ancestor == child {
                    Some(parent)
                } else {
                    ancestor_node.parent
                };
            }
            if !found {
                return Err(TreeError::MissingAncestor {
                    node: id,
                    kind: node.kind,
                    required,
                });
            }
        }
        Ok(())
    }

    fn invalidate_page_cache(&self, from: NodeId) {
        for id in self.descendants(from) {
            if let Some(node) = self.nodes.get(id.0) {
                node.page_cache.set(None);
            }
        }
    }

    fn notify_attached(&mut self, page: NodeId, child: NodeId) -> Result<(), TreeError> {
        for id in self.descendants(child) {
            let Some(mut widget) = self.node_mut(id)?.widget.take() else {
                continue;
            };
            let result = widget.attached(&mut AttachContext {
                node: id,
                page,
                flags: &mut self.page.flags,
            });
            self.node_mut(id)?.widget = Some(widget);
            result?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Probe;

    fn doc() -> Document {
        Document::new(DocumentConfig::default()).unwrap()
    }

    #[test]
    fn test_attach_sets_parent_and_page() {
        let mut doc = doc();
        let a = doc.create(Probe::boxed("a"));
        let b = doc.create(Probe::boxed("b"));
        doc.attach(a, b).unwrap();
        assert_eq!(doc.page_of(b), None);
        doc.attach(doc.root(), a).unwrap();
        assert_eq!(doc.node(b).unwrap().parent(), Some(a));
        assert_eq!(doc.page_of(b), Some(doc.root()));
    }

    #[test]
    fn test_self_and_cyclic_attach_rejected() {
        let mut doc = doc();
        let a = doc.create(Probe::boxed("a"));
        let b = doc.create(Probe::boxed("b"));
        doc.attach(a, b).unwrap();
        assert_eq!(doc.attach(a, a), Err(TreeError::SelfAttach(a)));
        assert_eq!(
            doc.attach(b, a),
            Err(TreeError::CyclicAttach { parent: b, child: a })
        );
        assert!(doc.node(a).unwrap().parent().is_none());
    }

    #[test]
    fn test_page_cannot_be_nested() {
        let mut doc = doc();
        let other_page = doc.create(Box::new(Page::new()));
        let root = doc.root();
        assert_eq!(
            doc.attach(root, other_page),
            Err(TreeError::NestedPage(other_page))
        );
        let a = doc.create(Probe::boxed("a"));
        assert_eq!(doc.attach(a, root), Err(TreeError::NestedPage(root)));
    }

    #[test]
    fn test_reattach_moves_node() {
        let mut doc = doc();
        let a = doc.create(Probe::boxed("a"));
        let b = doc.create(Probe::boxed("b"));
        let c = doc.create(Probe::boxed("c"));
        doc.attach(a, c).unwrap();
        doc.attach(b, c).unwrap();
        assert!(doc.node(a).unwrap().children().is_empty());
        assert_eq!(doc.node(b).unwrap().children(), &[c]);
    }

    #[test]
    fn test_detach_clears_parent_and_cache() {
        let mut doc = doc();
        let root = doc.root();
        let a = doc.create(Probe::boxed("a"));
        doc.attach(root, a).unwrap();
        assert_eq!(doc.page_of(a), Some(root));
        assert_eq!(doc.detach(root, 0).unwrap(), a);
        assert_eq!(doc.node(a).unwrap().parent(), None);
        assert_eq!(doc.page_of(a), None);
        assert_eq!(
            doc.detach(root, 3),
            Err(TreeError::ChildIndexOutOfRange {
                parent: root,
                index: 3
            })
        );
        // Detached nodes are reusable.
        doc.attach(root, a).unwrap();
    }

    #[test]
    fn test_required_ancestor_checked_when_connected() {
        let mut doc = doc();
        let root = doc.root();
        let row = doc.create(Probe::requiring("row", "table"));
        let cell = doc.create(Probe::requiring("cell", "row"));
        doc.attach(row, cell).unwrap();
        let err = doc.attach(root, row).unwrap_err();
        assert_eq!(
            err,
            TreeError::MissingAncestor {
                node: row,
                kind: "row",
                required: "table"
            }
        );
        assert!(doc.node(root).unwrap().children().is_empty());

        let table = doc.create(Probe::boxed("table"));
        doc.attach(table, row).unwrap();
        doc.attach(root, table).unwrap();
    }

    #[test]
    fn test_find_by_id_is_case_insensitive_dfs() {
        let mut doc = doc();
        let root = doc.root();
        let a = doc.create(Probe::boxed("a"));
        let b = doc.create(Probe::boxed("b"));
        let c = doc.create(Probe::boxed("c"));
        doc.node_mut(b).unwrap().set_id("Target").unwrap();
        doc.node_mut(c).unwrap().set_id("target").unwrap();
        doc.attach(root, a).unwrap();
        doc.attach(a, b).unwrap();
        doc.attach(root, c).unwrap();
        assert_eq!(doc.find_by_id(root, "TARGET"), Some(b));
        assert_eq!(doc.find_by_id(root, "missing"), None);
    }

    #[test]
    fn test_mutation_blocked_while_reading() {
        let mut doc = doc();
        let a = doc.create(Probe::boxed("a"));
        let reader = doc.access().clone();
        let _scope = reader.begin_read().unwrap();
        assert!(matches!(
            doc.attach(doc.root(), a),
            Err(TreeError::AccessViolation(_))
        ));
        assert!(matches!(doc.touch(a), Err(TreeError::AccessViolation(_))));
    }

    #[test]
    fn test_attached_hook_runs_on_connection() {
        let mut doc = doc();
        let root = doc.root();
        let a = doc.create(Probe::boxed("a"));
        let b = doc.create(Probe::marking("b", "saw-b"));
        doc.attach(a, b).unwrap();
        assert!(!doc.flags().is_set("saw-b"));
        doc.attach(root, a).unwrap();
        assert!(doc.flags().is_set("saw-b"));
    }

    #[test]
    fn test_failed_attached_hook_rolls_back() {
        let mut doc = doc();
        let root = doc.root();
        let bad = doc.create(Probe::marking("bad", "arbor.mine"));
        assert_eq!(
            doc.attach(root, bad),
            Err(TreeError::ReservedFlag("arbor.mine".to_string()))
        );
        assert!(doc.node(root).unwrap().children().is_empty());
        assert_eq!(doc.node(bad).unwrap().parent(), None);
        assert_eq!(doc.page_of(bad), None);
    }

    #[test]
    fn test_failed_move_restores_previous_position() {
        let mut doc = doc();
        let root = doc.root();
        let holder = doc.create(Probe::boxed("holder"));
        let a = doc.create(Probe::boxed("a"));
        let bad = doc.create(Probe::marking("bad", "arbor.mine"));
        let c = doc.create(Probe::boxed("c"));
        doc.attach(holder, a).unwrap();
        doc.attach(holder, bad).unwrap();
        doc.attach(holder, c).unwrap();

        assert!(doc.attach(root, bad).is_err());
        assert_eq!(doc.node(holder).unwrap().children(), &[a, bad, c]);
        assert_eq!(doc.node(bad).unwrap().parent(), Some(holder));
        assert!(doc.node(root).unwrap().children().is_empty());
    }
}
