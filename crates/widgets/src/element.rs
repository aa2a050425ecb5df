use arbor_core::{Document, EventKind, NodeId, TreeError, Widget};
use arbor_style::StyleRule;
use log::warn;

/// Fluent description of a node and its subtree, mounted into a [`Document`]
/// in one call.
#[derive(Debug)]
pub struct Element {
    widget: Box<dyn Widget>,
    id: Option<String>,
    name: Option<String>,
    style: StyleRule,
    classes: Vec<String>,
    tooltip: Option<String>,
    tab_index: Option<i32>,
    events: Vec<(EventKind, String)>,
    theme: Vec<(&'static str, String)>,
    focus: bool,
    stop_click: bool,
    children: Vec<Element>,
}

impl Element {
    pub fn new(widget: impl Widget + 'static) -> Self {
        Self {
            widget: Box::new(widget),
            id: None,
            name: None,
            style: StyleRule::new(),
            classes: Vec::new(),
            tooltip: None,
            tab_index: None,
            events: Vec::new(),
            theme: Vec::new(),
            focus: false,
            stop_click: false,
            children: Vec::new(),
        }
    }

    /// The identifier is validated when the element is mounted.
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Adds inline declarations such as `"color: red; width: 10px"`.
    /// A malformed block is ignored with a warning.
    pub fn style(mut self, declarations: &str) -> Self {
        match StyleRule::parse(declarations) {
            Ok(rule) => {
                for (property, value) in rule.iter() {
                    self.style.insert(property, value);
                }
            }
            Err(e) => warn!("Ignoring inline style on '{}': {e}", self.widget.kind()),
        }
        self
    }

    pub fn style_property(mut self, property: &str, value: &str) -> Self {
        self.style.insert(property, value);
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn tooltip(mut self, tooltip: &str) -> Self {
        self.tooltip = Some(tooltip.to_string());
        self
    }

    pub fn tab_index(mut self, index: i32) -> Self {
        self.tab_index = Some(index);
        self
    }

    pub fn on(mut self, event: EventKind, script: &str) -> Self {
        self.events.push((event, script.to_string()));
        self
    }

    /// Overrides a theme key for this element and everything below it.
    pub fn theme(mut self, key: &'static str, value: &str) -> Self {
        self.theme.push((key, value.to_string()));
        self
    }

    pub fn focus(mut self) -> Self {
        self.focus = true;
        self
    }

    pub fn stop_click(mut self) -> Self {
        self.stop_click = true;
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Creates the node, attaches it under `parent`, then mounts the children
    /// beneath it in order.
    pub fn mount(self, doc: &mut Document, parent: NodeId) -> Result<NodeId, TreeError> {
        let Element {
            widget,
            id,
            name,
            style,
            classes,
            tooltip,
            tab_index,
            events,
            theme,
            focus,
            stop_click,
            children,
        } = self;

        let node_id = doc.create(widget);
        let node = doc.node_mut(node_id)?;
        if let Some(id) = id {
            node.set_id(&id)?;
        }
        if let Some(name) = name {
            node.set_name(name);
        }
        node.set_style(style);
        for class in classes {
            node.add_class(class);
        }
        if let Some(tooltip) = tooltip {
            node.set_tooltip(tooltip);
        }
        if let Some(index) = tab_index {
            node.set_tab_index(index);
        }
        for (event, script) in events {
            node.add_event(event, script);
        }
        if focus {
            node.request_focus();
        }
        if stop_click {
            node.stop_click_propagation();
        }
        if !theme.is_empty() {
            let overlay = doc.theme_mut(node_id)?;
            for (key, value) in theme {
                overlay.set(key, value);
            }
        }

        doc.attach(parent, node_id)?;
        for child in children {
            child.mount(doc, node_id)?;
        }
        Ok(node_id)
    }
}
