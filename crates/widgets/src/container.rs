use arbor_core::{MarkupWriter, RenderContext, RenderError, Widget};
use arbor_style::ThemeKey;

/// A generic element that only renders its children, e.g. `div` or `p`.
#[derive(Debug, Clone)]
pub struct Container {
    tag: &'static str,
}

impl Container {
    pub fn new(tag: &'static str) -> Self {
        Self { tag }
    }

    pub fn div() -> Self {
        Self::new("div")
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::div()
    }
}

impl Widget for Container {
    fn kind(&self) -> &'static str {
        "container"
    }

    fn render(&self, ctx: &RenderContext<'_>, out: &mut MarkupWriter) -> Result<(), RenderError> {
        ctx.open(out, self.tag, &[]);
        ctx.render_children(out)?;
        out.close(self.tag);
        Ok(())
    }
}

/// Escaped text; wrapped in a `span` only when it carries attributes.
#[derive(Debug, Clone)]
pub struct Text {
    content: String,
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl Widget for Text {
    fn kind(&self) -> &'static str {
        "text"
    }

    fn render(&self, ctx: &RenderContext<'_>, out: &mut MarkupWriter) -> Result<(), RenderError> {
        if ctx.common_attributes().is_empty() {
            out.text(&self.content);
        } else {
            ctx.open(out, "span", &[]);
            out.text(&self.content).close("span");
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Heading {
    level: u8,
    content: String,
}

impl Heading {
    /// Levels outside 1..=6 are clamped.
    pub fn new(level: u8, content: impl Into<String>) -> Self {
        Self {
            level: level.clamp(1, 6),
            content: content.into(),
        }
    }

    fn tag(&self) -> &'static str {
        match self.level {
            1 => "h1",
            2 => "h2",
            3 => "h3",
            4 => "h4",
            5 => "h5",
            _ => "h6",
        }
    }
}

impl Widget for Heading {
    fn kind(&self) -> &'static str {
        "heading"
    }

    fn themed_keys(&self) -> &'static [&'static str] {
        &[ThemeKey::COLOR, ThemeKey::FONT_FAMILY]
    }

    fn render(&self, ctx: &RenderContext<'_>, out: &mut MarkupWriter) -> Result<(), RenderError> {
        ctx.open(out, self.tag(), &[]);
        out.text(&self.content);
        ctx.render_children(out)?;
        out.close(self.tag());
        Ok(())
    }
}
