//! The compile phase.
//!
//! Each node is set up exactly once, pre-order. The compiled flag is set
//! before the node's setup runs, and children are iterated by index with the
//! child count re-read on every step, so nodes appended during the pass (by
//! this node's setup or a sibling's) are still visited. Nodes attached
//! elsewhere during the pass are picked up by a final drain over the whole
//! tree. A node's queued resources are flushed into the page registry after
//! its subtree has compiled.

use crate::error::{CompileError, TreeError};
use crate::flags::{FOCUS_KEY, STOP_CLICK_SCRIPT_KEY, TOOLTIP_SCRIPT_KEY};
use crate::node::{EventBinding, EventKind, NodeId};
use crate::registry::{ResourceEntry, StateEvent};
use crate::theme::ThemeResolver;
use crate::tree::{Document, PageState};
use crate::widget::CompileContext;
use arbor_style::parsers::parse_millis;
use arbor_style::{StyleRule, ThemeKey, global_default};
use arbor_traits::{Capabilities, Feature};
use log::{debug, trace, warn};
use std::collections::BTreeMap;

const STOP_CLICK_TOKEN: &str = "arbor.stop-click";
const TOOLTIP_TOKEN: &str = "arbor.tooltip";
const FOCUS_TOKEN: &str = "arbor.focus";

const STOP_PROPAGATION_HELPER: &str =
    "function arborStopClick(e){e=e||window.event;if(e.stopPropagation){e.stopPropagation();}}";
const CANCEL_BUBBLE_HELPER: &str =
    "function arborStopClick(e){e=e||window.event;e.cancelBubble=true;}";
const TOOLTIP_SCRIPT: &str = "function arborTooltip(el,cls,delay){\
var t=setTimeout(function(){var d=document.createElement('div');d.className=cls;\
d.textContent=el.getAttribute('data-tooltip');el.appendChild(d);\
el.onmouseout=function(){clearTimeout(t);if(d.parentNode){d.parentNode.removeChild(d);}};},delay);\
el.onmouseout=function(){clearTimeout(t);};}";

/// Counters reported by one compile pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileReport {
    pub nodes_compiled: usize,
    pub resources_flushed: usize,
}

pub struct Compiler<'a> {
    caps: &'a dyn Capabilities,
}

impl<'a> Compiler<'a> {
    pub fn new(caps: &'a dyn Capabilities) -> Self {
        Self { caps }
    }

    /// Compiles every uncompiled node reachable from the page.
    ///
    /// A second call without an intervening `touch` or attach does nothing.
    pub fn compile(&self, doc: &mut Document) -> Result<CompileReport, CompileError> {
        let _scope = doc.access().begin_write()?;
        let root = doc.root();
        let mut pass = CompilePass {
            doc,
            caps: self.caps,
            report: CompileReport::default(),
        };
        pass.compile_node(root)?;
        while let Some(late) = pass.doc.first_uncompiled(root) {
            trace!("Draining late-attached node {late}");
            pass.compile_node(late)?;
        }
        debug!(
            "Compile pass finished for '{}': {} node(s) compiled, {} resource(s) flushed",
            self.caps.name(),
            pass.report.nodes_compiled,
            pass.report.resources_flushed
        );
        Ok(pass.report)
    }
}

struct CompilePass<'d> {
    doc: &'d mut Document,
    caps: &'d dyn Capabilities,
    report: CompileReport,
}

impl CompilePass<'_> {
    fn compile_node(&mut self, id: NodeId) -> Result<(), CompileError> {
        {
            let node = self.doc.node_mut(id)?;
            if node.compiled {
                return Ok(());
            }
            node.compiled = true;
        }
        self.report.nodes_compiled += 1;
        self.setup(id)?;

        let mut index = 0;
        loop {
            let Some(&child) = self.doc.node(id)?.children.get(index) else {
                break;
            };
            self.compile_node(child)?;
            index += 1;
        }

        self.flush(id)
    }

    fn setup(&mut self, id: NodeId) -> Result<(), CompileError> {
        self.check_required_ancestor(id)?;
        self.assign_identifier(id)?;
        self.doc.node_mut(id)?.resolved.injected_events.clear();
        self.resolve_theme(id)?;
        self.inject_stop_click(id)?;
        self.install_tooltip(id)?;
        self.arbitrate_focus(id)?;
        self.run_widget(id)
    }

    fn check_required_ancestor(&self, id: NodeId) -> Result<(), TreeError> {
        let node = self.doc.node(id)?;
        let Some(required) = node.required_ancestor else {
            return Ok(());
        };
        let mut current = node.parent;
        while let Some(ancestor) = current {
            let ancestor_node = self.doc.node(ancestor)?;
            if ancestor_node.kind == required {
                return Ok(());
            }
            current = ancestor_node.parent;
        }
        Err(TreeError::MissingAncestor {
            node: id,
            kind: node.kind,
            required,
        })
    }

    fn assign_identifier(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.doc.node(id)?;
        let widget_wants = node.widget.as_ref().is_some_and(|w| w.needs_identifier());
        if node.effective_id().is_some()
            || !(widget_wants || node.needs_identifier_for_behaviour())
        {
            return Ok(());
        }
        let page = self.doc.page_of(id).unwrap_or(self.doc.root());
        let generated = loop {
            let candidate = {
                let PageState { flags, ids, .. } = &mut self.doc.page;
                ids.next(flags)?
            };
            if self.doc.find_by_id(page, candidate.as_str()).is_none() {
                break candidate;
            }
            debug!("Skipping {candidate}, already taken by an explicit id");
        };
        trace!("Assigned {generated} to {id}");
        self.doc.node_mut(id)?.generated_id = Some(generated);
        Ok(())
    }

    /// Resolves the widget's themed keys and interns the node's effective
    /// rule-set (own style plus inherited style properties).
    fn resolve_theme(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.doc.node(id)?;
        let mut keys: Vec<&'static str> = node
            .widget
            .as_ref()
            .map(|w| w.themed_keys().to_vec())
            .unwrap_or_default();
        if node.presentation.tooltip.is_some() {
            keys.extend([ThemeKey::TOOLTIP_CLASS, ThemeKey::TOOLTIP_DELAY]);
        }

        let theme = ThemeResolver::theme(self.doc, id)?;
        let mut effective: StyleRule = node.presentation.style.clone();
        let mut resolved = BTreeMap::new();
        for key in keys {
            let own = node.presentation.style.get(key);
            let Some(value) = own.or_else(|| theme.default_for(key)) else {
                continue;
            };
            let value = if ThemeKey::is_duration(key) {
                match parse_millis(key, value) {
                    Ok(ms) => ms.to_string(),
                    Err(e) => {
                        let fallback = global_default(key).unwrap_or("0");
                        warn!("{} node {id}: {e}; using default '{fallback}'", node.kind);
                        fallback.to_string()
                    }
                }
            } else {
                value.to_string()
            };
            if ThemeKey::is_style_property(key) && own.is_none() {
                effective.insert(key, value.clone());
            }
            resolved.insert(key.to_string(), value);
        }

        let style_class = if effective.is_empty() {
            None
        } else {
            Some(self.doc.page.registry.intern_style(&effective))
        };
        let node = self.doc.node_mut(id)?;
        node.resolved.theme = resolved;
        node.resolved.style_class = style_class;
        Ok(())
    }

    fn inject_stop_click(&mut self, id: NodeId) -> Result<(), TreeError> {
        if !self.doc.node(id)?.stop_click {
            return Ok(());
        }
        let helper = if self.caps.supports(Feature::StopPropagation) {
            STOP_PROPAGATION_HELPER
        } else if self.caps.supports(Feature::CancelBubble) {
            CANCEL_BUBBLE_HELPER
        } else {
            warn!(
                "Client '{}' cannot stop event propagation; node {id} will let clicks bubble",
                self.caps.name()
            );
            return Ok(());
        };
        let install = self.doc.page.flags.mark_reserved(STOP_CLICK_SCRIPT_KEY);
        let node = self.doc.node_mut(id)?;
        if install {
            node.queue_resource(ResourceEntry::inline_script(STOP_CLICK_TOKEN, helper));
        }
        node.resolved.injected_events.push(EventBinding {
            event: EventKind::Click,
            script: "arborStopClick(event)".to_string(),
        });
        Ok(())
    }

    fn install_tooltip(&mut self, id: NodeId) -> Result<(), TreeError> {
        if self.doc.node(id)?.presentation.tooltip.is_none() {
            return Ok(());
        }
        let install = self.doc.page.flags.mark_reserved(TOOLTIP_SCRIPT_KEY);
        let node = self.doc.node_mut(id)?;
        if install {
            node.queue_resource(ResourceEntry::deferred_script(TOOLTIP_TOKEN, TOOLTIP_SCRIPT));
        }
        let class = node
            .resolved
            .theme
            .get(ThemeKey::TOOLTIP_CLASS)
            .cloned()
            .unwrap_or_default();
        let delay = node
            .resolved
            .theme
            .get(ThemeKey::TOOLTIP_DELAY)
            .cloned()
            .unwrap_or_else(|| "0".to_string());
        node.resolved.injected_events.push(EventBinding {
            event: EventKind::MouseOver,
            script: format!("arborTooltip(this,'{class}',{delay})"),
        });
        Ok(())
    }

    fn arbitrate_focus(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.doc.node(id)?;
        if !node.wants_focus {
            return Ok(());
        }
        let Some(element) = node.effective_id().cloned() else {
            return Ok(());
        };
        match self.doc.page.flags.claim(FOCUS_KEY, element.as_str()) {
            Ok(()) => {
                self.doc
                    .node_mut(id)?
                    .queue_resource(ResourceEntry::state_handler(
                        FOCUS_TOKEN,
                        StateEvent::Load,
                        format!("document.getElementById('{element}').focus()"),
                    ));
            }
            Err(owner) if owner == element.as_str() => {}
            Err(owner) => warn!(
                "Node {id} ('{element}') requested initial focus, but '{owner}' already holds it"
            ),
        }
        Ok(())
    }

    fn run_widget(&mut self, id: NodeId) -> Result<(), CompileError> {
        let Some(mut widget) = self.doc.node_mut(id)?.widget.take() else {
            return Ok(());
        };
        let result = widget.compile(&mut CompileContext {
            doc: &mut *self.doc,
            caps: self.caps,
            node: id,
        });
        self.doc.node_mut(id)?.widget = Some(widget);
        result
    }

    fn flush(&mut self, id: NodeId) -> Result<(), CompileError> {
        let pending = std::mem::take(&mut self.doc.node_mut(id)?.pending);
        let PageState {
            flags, registry, ..
        } = &mut self.doc.page;
        for entry in pending {
            if registry.register(flags, entry) {
                self.report.resources_flushed += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocumentConfig;
    use crate::render::Renderer;
    use crate::testing::{Probe, Spawner, init_logger};
    use arbor_traits::StaticCapabilities;

    fn doc() -> Document {
        Document::new(DocumentConfig::default()).unwrap()
    }

    #[test]
    fn test_second_compile_is_noop() {
        init_logger();
        let caps = StaticCapabilities::modern();
        let mut doc = doc();
        let a = doc.create(Probe::boxed("a"));
        doc.append(doc.root(), a).unwrap();
        let compiler = Compiler::new(&caps);
        let first = compiler.compile(&mut doc).unwrap();
        assert_eq!(first.nodes_compiled, 2);
        let second = compiler.compile(&mut doc).unwrap();
        assert_eq!(second, CompileReport::default());
    }

    #[test]
    fn test_touch_recompiles_only_that_node() {
        let caps = StaticCapabilities::modern();
        let mut doc = doc();
        let a = doc.create(Probe::boxed("a"));
        let b = doc.create(Probe::boxed("b"));
        doc.append(doc.root(), a).unwrap();
        doc.append(a, b).unwrap();
        Compiler::new(&caps).compile(&mut doc).unwrap();
        doc.touch(a).unwrap();
        assert!(!doc.node(a).unwrap().is_compiled());
        let report = Compiler::new(&caps).compile(&mut doc).unwrap();
        assert_eq!(report.nodes_compiled, 1);
    }

    #[test]
    fn test_nodes_added_during_compile_are_compiled() {
        let caps = StaticCapabilities::modern();
        let mut doc = doc();
        let spawner = doc.create(Box::new(Spawner::default()));
        doc.append(doc.root(), spawner).unwrap();
        let report = Compiler::new(&caps).compile(&mut doc).unwrap();
        // page, spawner, its own child and its page-level companion
        assert_eq!(report.nodes_compiled, 4);
        assert!(doc.first_uncompiled(doc.root()).is_none());
        assert_eq!(doc.node(doc.root()).unwrap().children().len(), 2);
    }

    #[test]
    fn test_generated_ids_follow_attachment_order() {
        let caps = StaticCapabilities::modern();
        let mut doc = doc();
        let nodes: Vec<_> = (0..5)
            .map(|_| {
                let id = doc.create(Probe::labelled("field"));
                doc.append(doc.root(), id).unwrap();
                id
            })
            .collect();
        Compiler::new(&caps).compile(&mut doc).unwrap();
        let ids: Vec<_> = nodes
            .iter()
            .map(|&n| doc.node(n).unwrap().effective_id().unwrap().to_string())
            .collect();
        assert_eq!(ids, ["ID_GEN0", "ID_GEN1", "ID_GEN2", "ID_GEN3", "ID_GEN4"]);
    }

    #[test]
    fn test_explicit_id_not_replaced() {
        let caps = StaticCapabilities::modern();
        let mut doc = doc();
        let a = doc.create(Probe::labelled("field"));
        doc.node_mut(a).unwrap().set_id("email").unwrap();
        doc.append(doc.root(), a).unwrap();
        Compiler::new(&caps).compile(&mut doc).unwrap();
        assert_eq!(doc.node(a).unwrap().effective_id().unwrap().as_str(), "email");
        assert!(!doc.flags().is_set(crate::flags::ID_COUNTER_KEY));
    }

    #[test]
    fn test_generated_id_skips_explicit_collision() {
        let caps = StaticCapabilities::modern();
        let mut doc = doc();
        let root = doc.root();
        let taken = doc.create(Probe::labelled("taken"));
        doc.node_mut(taken).unwrap().set_id("id_gen0").unwrap();
        let fresh = doc.create(Probe::labelled("fresh"));
        doc.append(root, taken).unwrap();
        doc.append(root, fresh).unwrap();
        Compiler::new(&caps).compile(&mut doc).unwrap();

        let assigned = doc.node(fresh).unwrap().effective_id().unwrap().as_str().to_string();
        assert_eq!(assigned, "ID_GEN1");
        assert_eq!(doc.find_by_id(root, "ID_GEN0"), Some(taken));
    }

    #[test]
    fn test_stop_click_follows_capabilities() {
        for (caps, expected) in [
            (StaticCapabilities::modern(), "stopPropagation"),
            (StaticCapabilities::legacy(), "cancelBubble"),
        ] {
            let mut doc = doc();
            for _ in 0..3 {
                let a = doc.create(Probe::boxed("a"));
                doc.node_mut(a).unwrap().stop_click_propagation();
                doc.append(doc.root(), a).unwrap();
            }
            let report = Compiler::new(&caps).compile(&mut doc).unwrap();
            assert_eq!(report.resources_flushed, 1);
            let helper: Vec<_> = doc.registry().blocking_scripts().collect();
            assert_eq!(helper.len(), 1);
            let html = Renderer::new(&caps).render(&doc).unwrap();
            assert!(html.contains(expected));
            assert_eq!(html.matches("onclick=\"arborStopClick(event)\"").count(), 3);
        }
    }

    #[test]
    fn test_focus_is_a_page_singleton() {
        let caps = StaticCapabilities::modern();
        let mut doc = doc();
        for _ in 0..2 {
            let a = doc.create(Probe::boxed("input"));
            doc.node_mut(a).unwrap().request_focus();
            doc.append(doc.root(), a).unwrap();
        }
        Compiler::new(&caps).compile(&mut doc).unwrap();
        let handlers: Vec<_> = doc.registry().state_handlers().collect();
        assert_eq!(handlers.len(), 1);
        assert_eq!(
            handlers[0].1,
            ["document.getElementById('ID_GEN0').focus()"]
        );
    }

    #[test]
    fn test_malformed_tooltip_delay_degrades() {
        let caps = StaticCapabilities::modern();
        let mut doc = doc();
        let a = doc.create(Probe::boxed("a"));
        doc.node_mut(a).unwrap().set_tooltip("Help");
        doc.append(doc.root(), a).unwrap();
        doc.theme_mut(doc.root())
            .unwrap()
            .set(ThemeKey::TOOLTIP_DELAY, "soon");
        Compiler::new(&caps).compile(&mut doc).unwrap();
        let node = doc.node(a).unwrap();
        assert_eq!(
            node.resolved().theme.get(ThemeKey::TOOLTIP_DELAY).map(String::as_str),
            Some("500")
        );
        assert_eq!(doc.registry().deferred_scripts().count(), 1);
    }

    #[test]
    fn test_missing_ancestor_fails_compile() {
        let caps = StaticCapabilities::modern();
        let mut doc = doc();
        let spawner = doc.create(Box::new(Spawner::orphaning()));
        doc.append(doc.root(), spawner).unwrap();
        let err = Compiler::new(&caps).compile(&mut doc).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Tree(TreeError::MissingAncestor { required: "table", .. })
        ));
        // The write scope is released on failure.
        assert!(!doc.access().is_writing());
    }
}
