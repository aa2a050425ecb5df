use crate::error::RenderError;
use crate::markup::MarkupWriter;
use crate::render;
use crate::widget::{RenderContext, Widget};
use arbor_style::ThemeKey;

pub const PAGE_KIND: &str = "page";

/// The document root. Owns the `<head>` and the end-of-body resource anchors.
#[derive(Debug, Default)]
pub struct Page;

impl Page {
    pub fn new() -> Self {
        Self
    }
}

impl Widget for Page {
    fn kind(&self) -> &'static str {
        PAGE_KIND
    }

    fn is_page(&self) -> bool {
        true
    }

    fn themed_keys(&self) -> &'static [&'static str] {
        &[
            ThemeKey::FONT_FAMILY,
            ThemeKey::FONT_SIZE,
            ThemeKey::COLOR,
            ThemeKey::BACKGROUND_COLOR,
        ]
    }

    fn render(&self, ctx: &RenderContext<'_>, out: &mut MarkupWriter) -> Result<(), RenderError> {
        let config = ctx.config();
        if config.emit_doctype {
            out.raw("<!DOCTYPE html>\n");
        }
        match &config.language {
            Some(lang) => out.open("html", [("lang", lang.as_str())]),
            None => out.open("html", []),
        };
        out.open("head", []);
        render::write_head(ctx, out)?;
        out.close("head");
        ctx.open(out, "body", &[]);
        ctx.render_children(out)?;
        render::write_body_end(ctx, out)?;
        out.close("body").close("html");
        Ok(())
    }
}
