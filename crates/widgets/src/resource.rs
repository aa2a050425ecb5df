//! Widgets that contribute page resources instead of markup. They render
//! nothing at their own position; their entries surface at the registry's
//! anchors.

use arbor_core::{
    CompileContext, CompileError, LinkKind, LoadClass, MarkupWriter, RenderContext, RenderError,
    ResourceEntry, StateEvent, Widget,
};
use log::warn;

/// An inline script, emitted once per page for its token.
#[derive(Debug, Clone)]
pub struct Script {
    token: String,
    body: String,
    load: LoadClass,
}

impl Script {
    pub fn new(token: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            body: body.into(),
            load: LoadClass::Blocking,
        }
    }

    pub fn deferred(mut self) -> Self {
        self.load = LoadClass::Deferred;
        self
    }
}

impl Widget for Script {
    fn kind(&self) -> &'static str {
        "script"
    }

    fn compile(&mut self, ctx: &mut CompileContext<'_>) -> Result<(), CompileError> {
        ctx.queue(
            ResourceEntry::inline_script(self.token.as_str(), self.body.as_str())
                .with_load(self.load),
        )?;
        Ok(())
    }

    fn render(&self, _ctx: &RenderContext<'_>, _out: &mut MarkupWriter) -> Result<(), RenderError> {
        Ok(())
    }
}

/// A versioned `module/version/path` link. A malformed address is logged and
/// dropped rather than failing the document.
#[derive(Debug, Clone)]
pub struct ModuleLink {
    address: String,
    kind: LinkKind,
    load: LoadClass,
}

impl ModuleLink {
    pub fn script(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            kind: LinkKind::Script,
            load: LoadClass::Blocking,
        }
    }

    pub fn stylesheet(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            kind: LinkKind::Stylesheet,
            load: LoadClass::Blocking,
        }
    }

    pub fn deferred(mut self) -> Self {
        self.load = LoadClass::Deferred;
        self
    }
}

impl Widget for ModuleLink {
    fn kind(&self) -> &'static str {
        "module-link"
    }

    fn compile(&mut self, ctx: &mut CompileContext<'_>) -> Result<(), CompileError> {
        match ResourceEntry::link(&self.address, self.kind) {
            Ok(entry) => ctx.queue(entry.with_load(self.load))?,
            Err(e) => warn!("Skipping link on {}: {e}", ctx.node_id()),
        }
        Ok(())
    }

    fn render(&self, _ctx: &RenderContext<'_>, _out: &mut MarkupWriter) -> Result<(), RenderError> {
        Ok(())
    }
}

/// A `<meta name content>` declaration; the first one per name wins.
#[derive(Debug, Clone)]
pub struct MetaTag {
    name: String,
    content: String,
}

impl MetaTag {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

impl Widget for MetaTag {
    fn kind(&self) -> &'static str {
        "meta"
    }

    fn compile(&mut self, ctx: &mut CompileContext<'_>) -> Result<(), CompileError> {
        ctx.queue(ResourceEntry::meta(self.name.as_str(), self.content.as_str()))?;
        Ok(())
    }

    fn render(&self, _ctx: &RenderContext<'_>, _out: &mut MarkupWriter) -> Result<(), RenderError> {
        Ok(())
    }
}

/// A page load/unload/resize handler.
#[derive(Debug, Clone)]
pub struct StateHook {
    token: String,
    event: StateEvent,
    script: String,
}

impl StateHook {
    pub fn new(token: impl Into<String>, event: StateEvent, script: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            event,
            script: script.into(),
        }
    }
}

impl Widget for StateHook {
    fn kind(&self) -> &'static str {
        "state-hook"
    }

    fn compile(&mut self, ctx: &mut CompileContext<'_>) -> Result<(), CompileError> {
        ctx.queue(ResourceEntry::state_handler(
            self.token.as_str(),
            self.event,
            self.script.as_str(),
        ))?;
        Ok(())
    }

    fn render(&self, _ctx: &RenderContext<'_>, _out: &mut MarkupWriter) -> Result<(), RenderError> {
        Ok(())
    }
}
