use arbor_core::{CompileContext, CompileError, MarkupWriter, RenderContext, RenderError, Widget};
use arbor_style::ThemeKey;

#[derive(Debug, Clone, Default)]
pub struct Table;

impl Table {
    pub fn new() -> Self {
        Self
    }
}

impl Widget for Table {
    fn kind(&self) -> &'static str {
        "table"
    }

    fn themed_keys(&self) -> &'static [&'static str] {
        &[ThemeKey::TABLE_CLASS]
    }

    fn compile(&mut self, ctx: &mut CompileContext<'_>) -> Result<(), CompileError> {
        if let Some(class) = ctx.themed(ThemeKey::TABLE_CLASS) {
            ctx.node_mut()?.add_class(class);
        }
        Ok(())
    }

    fn render(&self, ctx: &RenderContext<'_>, out: &mut MarkupWriter) -> Result<(), RenderError> {
        ctx.open(out, "table", &[]);
        ctx.render_children(out)?;
        out.close("table");
        Ok(())
    }
}

/// A table row; must sit beneath a [`Table`].
#[derive(Debug, Clone, Default)]
pub struct Row;

impl Row {
    pub fn new() -> Self {
        Self
    }
}

impl Widget for Row {
    fn kind(&self) -> &'static str {
        "row"
    }

    fn required_ancestor(&self) -> Option<&'static str> {
        Some("table")
    }

    fn render(&self, ctx: &RenderContext<'_>, out: &mut MarkupWriter) -> Result<(), RenderError> {
        ctx.open(out, "tr", &[]);
        ctx.render_children(out)?;
        out.close("tr");
        Ok(())
    }
}

/// A table cell; must sit beneath a [`Row`].
#[derive(Debug, Clone, Default)]
pub struct Cell {
    header: bool,
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header() -> Self {
        Self { header: true }
    }
}

impl Widget for Cell {
    fn kind(&self) -> &'static str {
        "cell"
    }

    fn required_ancestor(&self) -> Option<&'static str> {
        Some("row")
    }

    fn render(&self, ctx: &RenderContext<'_>, out: &mut MarkupWriter) -> Result<(), RenderError> {
        let tag = if self.header { "th" } else { "td" };
        ctx.open(out, tag, &[]);
        ctx.render_children(out)?;
        out.close(tag);
        Ok(())
    }
}
