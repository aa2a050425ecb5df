//! Widgets used by the unit tests of this crate.

use crate::error::{CompileError, RenderError, TreeError};
use crate::markup::MarkupWriter;
use crate::widget::{AttachContext, CompileContext, RenderContext, Widget};

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Default)]
pub(crate) struct Probe {
    kind: &'static str,
    required: Option<&'static str>,
    mark_on_attach: Option<&'static str>,
    needs_id: bool,
}

impl Probe {
    pub(crate) fn boxed(kind: &'static str) -> Box<dyn Widget> {
        Box::new(Self {
            kind,
            ..Self::default()
        })
    }

    pub(crate) fn requiring(kind: &'static str, required: &'static str) -> Box<dyn Widget> {
        Box::new(Self {
            kind,
            required: Some(required),
            ..Self::default()
        })
    }

    pub(crate) fn marking(kind: &'static str, flag: &'static str) -> Box<dyn Widget> {
        Box::new(Self {
            kind,
            mark_on_attach: Some(flag),
            ..Self::default()
        })
    }

    pub(crate) fn labelled(kind: &'static str) -> Box<dyn Widget> {
        Box::new(Self {
            kind,
            needs_id: true,
            ..Self::default()
        })
    }
}

impl Widget for Probe {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn required_ancestor(&self) -> Option<&'static str> {
        self.required
    }

    fn needs_identifier(&self) -> bool {
        self.needs_id
    }

    fn attached(&mut self, ctx: &mut AttachContext<'_>) -> Result<(), TreeError> {
        if let Some(flag) = self.mark_on_attach {
            ctx.flags().mark(flag)?;
        }
        Ok(())
    }

    fn render(&self, ctx: &RenderContext<'_>, out: &mut MarkupWriter) -> Result<(), RenderError> {
        ctx.open(out, "div", &[("data-kind", self.kind)]);
        ctx.render_children(out)?;
        out.close("div");
        Ok(())
    }
}

/// Synthesizes nodes from its compile hook.
#[derive(Debug, Default)]
pub(crate) struct Spawner {
    orphan: bool,
}

impl Spawner {
    /// Spawns a child requiring a `table` ancestor it does not have.
    pub(crate) fn orphaning() -> Self {
        Self { orphan: true }
    }
}

impl Widget for Spawner {
    fn kind(&self) -> &'static str {
        "spawner"
    }

    fn compile(&mut self, ctx: &mut CompileContext<'_>) -> Result<(), CompileError> {
        if self.orphan {
            let row = ctx.create(Probe {
                kind: "row",
                required: Some("table"),
                ..Probe::default()
            });
            ctx.append_child(row)?;
            return Ok(());
        }
        let child = ctx.create(Probe {
            kind: "child",
            ..Probe::default()
        });
        ctx.append_child(child)?;
        let companion = ctx.create(Probe {
            kind: "companion",
            ..Probe::default()
        });
        ctx.append_to_page(companion)?;
        Ok(())
    }

    fn render(&self, ctx: &RenderContext<'_>, out: &mut MarkupWriter) -> Result<(), RenderError> {
        ctx.open(out, "section", &[]);
        ctx.render_children(out)?;
        out.close("section");
        Ok(())
    }
}
