//! Escaping markup writer used by widget render hooks.

use html_escape::{encode_quoted_attribute_to_string, encode_script_to_string, encode_text_to_string};
use std::fmt;

#[derive(Debug, Default, Clone)]
pub struct MarkupWriter {
    buf: String,
}

impl MarkupWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends trusted markup as-is.
    pub fn raw(&mut self, markup: &str) -> &mut Self {
        self.buf.push_str(markup);
        self
    }

    pub fn text(&mut self, text: &str) -> &mut Self {
        encode_text_to_string(text, &mut self.buf);
        self
    }

    pub fn open<'a>(
        &mut self,
        tag: &str,
        attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> &mut Self {
        self.start_tag(tag, attrs);
        self.buf.push('>');
        self
    }

    /// A void element such as `<meta>` or `<input>`.
    pub fn void<'a>(
        &mut self,
        tag: &str,
        attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> &mut Self {
        self.start_tag(tag, attrs);
        self.buf.push_str(" />");
        self
    }

    pub fn close(&mut self, tag: &str) -> &mut Self {
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    /// An inline `<script>` block; `</script` inside the body is escaped.
    pub fn script<'a>(
        &mut self,
        body: &str,
        attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> &mut Self {
        self.open("script", attrs);
        encode_script_to_string(body, &mut self.buf);
        self.close("script")
    }

    pub fn comment(&mut self, text: &str) -> &mut Self {
        self.buf.push_str("<!-- ");
        self.buf.push_str(&text.replace("--", "- -"));
        self.buf.push_str(" -->");
        self
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    fn start_tag<'a>(&mut self, tag: &str, attrs: impl IntoIterator<Item = (&'a str, &'a str)>) {
        self.buf.push('<');
        self.buf.push_str(tag);
        for (name, value) in attrs {
            self.buf.push(' ');
            self.buf.push_str(name);
            self.buf.push_str("=\"");
            encode_quoted_attribute_to_string(value, &mut self.buf);
            self.buf.push('"');
        }
    }
}

impl fmt::Write for MarkupWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }
}
