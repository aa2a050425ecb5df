//! The presentation element stored in the document arena.

use crate::registry::ResourceEntry;
use crate::theme::ThemeOverlay;
use crate::widget::Widget;
use arbor_style::StyleRule;
use arbor_types::{ElementId, IdError};
use once_cell::unsync::OnceCell;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;

/// Handle to a node inside a [`Document`](crate::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Client-side events a node can carry handlers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Click,
    Change,
    Focus,
    Blur,
    KeyDown,
    MouseOver,
}

impl EventKind {
    /// The markup attribute carrying the handler.
    pub fn attribute(self) -> &'static str {
        match self {
            EventKind::Click => "onclick",
            EventKind::Change => "onchange",
            EventKind::Focus => "onfocus",
            EventKind::Blur => "onblur",
            EventKind::KeyDown => "onkeydown",
            EventKind::MouseOver => "onmouseover",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBinding {
    pub event: EventKind,
    pub script: String,
}

/// Caller-set presentation attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Presentation {
    pub style: StyleRule,
    pub classes: Vec<String>,
    pub tooltip: Option<String>,
    pub tab_index: Option<i32>,
}

/// Values the compile pass derives for a node; the renderer only reads these.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolved {
    /// Generated class of the node's interned style rule.
    pub style_class: Option<String>,
    /// Values of the widget's themed keys after inheritance.
    pub theme: BTreeMap<String, String>,
    /// Handlers injected by the compiler (e.g. click-propagation stopping).
    pub injected_events: Vec<EventBinding>,
}

#[derive(Debug)]
pub struct Node {
    pub(crate) kind: &'static str,
    pub(crate) is_page: bool,
    pub(crate) required_ancestor: Option<&'static str>,
    pub(crate) id: Option<ElementId>,
    pub(crate) generated_id: Option<ElementId>,
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) presentation: Presentation,
    pub(crate) events: Vec<EventBinding>,
    pub(crate) compiled: bool,
    pub(crate) theme: OnceCell<ThemeOverlay>,
    pub(crate) page_cache: Cell<Option<NodeId>>,
    pub(crate) wants_focus: bool,
    pub(crate) stop_click: bool,
    pub(crate) pending: Vec<ResourceEntry>,
    pub(crate) resolved: Resolved,
    /// `None` only while the widget's own compile hook is running.
    pub(crate) widget: Option<Box<dyn Widget>>,
}

impl Node {
    pub(crate) fn new(widget: Box<dyn Widget>) -> Self {
        Self {
            kind: widget.kind(),
            is_page: widget.is_page(),
            required_ancestor: widget.required_ancestor(),
            id: None,
            generated_id: None,
            name: None,
            parent: None,
            children: Vec::new(),
            presentation: Presentation::default(),
            events: Vec::new(),
            compiled: false,
            theme: OnceCell::new(),
            page_cache: Cell::new(None),
            wants_focus: false,
            stop_click: false,
            pending: Vec::new(),
            resolved: Resolved::default(),
            widget: Some(widget),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn is_page(&self) -> bool {
        self.is_page
    }

    /// The caller-assigned identifier.
    pub fn id(&self) -> Option<&ElementId> {
        self.id.as_ref()
    }

    /// The identifier used in markup: the assigned one, else the generated one.
    pub fn effective_id(&self) -> Option<&ElementId> {
        self.id.as_ref().or(self.generated_id.as_ref())
    }

    pub fn set_id(&mut self, id: &str) -> Result<&mut Self, IdError> {
        self.id = Some(ElementId::new(id)?);
        Ok(self)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn style_mut(&mut self) -> &mut StyleRule {
        &mut self.presentation.style
    }

    pub fn set_style(&mut self, style: StyleRule) -> &mut Self {
        self.presentation.style = style;
        self
    }

    pub fn add_class(&mut self, class: impl Into<String>) -> &mut Self {
        let class = class.into();
        if !self.presentation.classes.contains(&class) {
            self.presentation.classes.push(class);
        }
        self
    }

    pub fn set_tooltip(&mut self, tooltip: impl Into<String>) -> &mut Self {
        self.presentation.tooltip = Some(tooltip.into());
        self
    }

    pub fn set_tab_index(&mut self, index: i32) -> &mut Self {
        self.presentation.tab_index = Some(index);
        self
    }

    pub fn events(&self) -> &[EventBinding] {
        &self.events
    }

    pub fn add_event(&mut self, event: EventKind, script: impl Into<String>) -> &mut Self {
        self.events.push(EventBinding {
            event,
            script: script.into(),
        });
        self
    }

    /// Asks for initial keyboard focus. Only the first claimant on a page wins.
    pub fn request_focus(&mut self) -> &mut Self {
        self.wants_focus = true;
        self
    }

    /// Asks the compiler to stop click events from bubbling past this node.
    pub fn stop_click_propagation(&mut self) -> &mut Self {
        self.stop_click = true;
        self
    }

    /// Queues a resource to be flushed into the page registry once this node's
    /// subtree has compiled.
    pub fn queue_resource(&mut self, entry: ResourceEntry) -> &mut Self {
        self.pending.push(entry);
        self
    }

    pub fn resolved(&self) -> &Resolved {
        &self.resolved
    }

    /// Whether the compiler must give this node an identifier even if its
    /// widget does not ask for one.
    pub(crate) fn needs_identifier_for_behaviour(&self) -> bool {
        self.wants_focus
            || self.stop_click
            || !self.events.is_empty()
            || self.presentation.tooltip.is_some()
    }

    /// All handlers for the node, caller-set first, grouped by event in
    /// first-seen order.
    pub fn merged_events(&self) -> Vec<(EventKind, String)> {
        let mut merged: Vec<(EventKind, String)> = Vec::new();
        for binding in self.events.iter().chain(&self.resolved.injected_events) {
            match merged.iter_mut().find(|(event, _)| *event == binding.event) {
                Some((_, script)) => {
                    script.push(';');
                    script.push_str(&binding.script);
                }
                None => merged.push((binding.event, binding.script.clone())),
            }
        }
        merged
    }
}
