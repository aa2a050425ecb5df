//! The generate phase: a read-only walk of a compiled document.
//!
//! Structural anchors for registry contents:
//! - `<head>`: charset, title, metas, stylesheet links, the interned style block
//! - end of `<body>`: blocking scripts in registration order, then the
//!   state-change handler script
//! - before the first script already in the output (outside comments):
//!   deferred scripts

use crate::error::RenderError;
use crate::markup::MarkupWriter;
use crate::node::NodeId;
use crate::registry::{LinkKind, LoadClass, Payload, ResourceEntry};
use crate::tree::Document;
use crate::widget::RenderContext;
use arbor_traits::{Bundle, Capabilities, Feature, ModuleCatalog};
use arbor_types::LinkAddress;
use itertools::Itertools;
use log::debug;

pub struct Renderer<'a> {
    caps: &'a dyn Capabilities,
    catalog: Option<&'a dyn ModuleCatalog>,
}

impl<'a> Renderer<'a> {
    pub fn new(caps: &'a dyn Capabilities) -> Self {
        Self {
            caps,
            catalog: None,
        }
    }

    pub fn with_catalog(mut self, catalog: &'a dyn ModuleCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Serializes the document. Never mutates the tree, so repeated calls on
    /// the same compiled document produce identical output.
    ///
    /// # Errors
    ///
    /// - `RenderError::NotCompiled` if any reachable node skipped compilation
    /// - `RenderError::UnresolvedModules` if no bundle covers the linked modules
    /// - `RenderError::AccessViolation` if a compile pass holds the document
    pub fn render(&self, doc: &Document) -> Result<String, RenderError> {
        let _scope = doc
            .access()
            .begin_read()
            .map_err(|e| RenderError::AccessViolation(e.to_string()))?;

        let required = doc.registry().required_modules();
        let bundle = match self.catalog {
            Some(catalog) if !required.is_empty() => {
                let bundle = catalog.resolve(&required)?;
                debug!(
                    "Resolved modules [{}] to bundle '{}' via {}",
                    required.iter().join(", "),
                    bundle.name,
                    catalog.name()
                );
                Some(bundle)
            }
            _ => None,
        };

        let mut out = MarkupWriter::new();
        render_node(doc, self.caps, bundle.as_ref(), doc.root(), &mut out)?;

        let deferred = deferred_markup(doc, self.caps, bundle.as_ref());
        let html = splice_before_first_script(out.into_string(), &deferred);
        debug!(
            "Rendered {} bytes for client profile '{}'",
            html.len(),
            self.caps.name()
        );
        Ok(html)
    }
}

pub(crate) fn render_node(
    doc: &Document,
    caps: &dyn Capabilities,
    bundle: Option<&Bundle>,
    id: NodeId,
    out: &mut MarkupWriter,
) -> Result<(), RenderError> {
    let node = doc.node(id)?;
    if !node.compiled {
        return Err(RenderError::NotCompiled(id));
    }
    let Some(widget) = node.widget.as_deref() else {
        return Err(RenderError::Widget {
            node: id,
            kind: node.kind,
            message: "widget is checked out by a running compile hook".to_string(),
        });
    };
    let ctx = RenderContext {
        doc,
        caps,
        node,
        id,
        bundle,
    };
    widget.render(&ctx, out)
}

pub(crate) fn write_head(ctx: &RenderContext<'_>, out: &mut MarkupWriter) -> Result<(), RenderError> {
    let config = ctx.config();
    let registry = ctx.registry();
    out.void("meta", [("charset", config.charset.as_str())]);
    if !config.title.is_empty() {
        out.open("title", []).text(&config.title).close("title");
    }
    for (name, content) in registry.metas() {
        out.void("meta", [("name", name), ("content", content)]);
    }
    for entry in registry.stylesheets() {
        if let Payload::Link { address, .. } = &entry.payload {
            let href = ctx.link_href(address);
            out.void("link", [("rel", "stylesheet"), ("href", href.as_str())]);
        }
    }
    let mut styles = registry.styles().peekable();
    if styles.peek().is_some() {
        out.open("style", []);
        for (rule, class) in styles {
            out.raw(".").raw(class).raw("{").raw(&rule.to_css()).raw("}");
        }
        out.close("style");
    }
    Ok(())
}

pub(crate) fn write_body_end(
    ctx: &RenderContext<'_>,
    out: &mut MarkupWriter,
) -> Result<(), RenderError> {
    if !ctx.capabilities().supports(Feature::Scripting) {
        debug!("Client '{}' has scripting disabled; omitting scripts", ctx.capabilities().name());
        return Ok(());
    }
    let registry = ctx.registry();
    for entry in registry.blocking_scripts() {
        write_script(entry, ctx.capabilities(), |a| ctx.link_href(a), out);
    }
    let handlers = registry
        .state_handlers()
        .map(|(event, scripts)| {
            format!(
                "window.addEventListener('{}',function(){{{}}});",
                event.dom_event(),
                scripts.join(";")
            )
        })
        .join("");
    if !handlers.is_empty() {
        out.script(&handlers, []);
    }
    Ok(())
}

fn write_script(
    entry: &ResourceEntry,
    caps: &dyn Capabilities,
    href: impl Fn(&LinkAddress) -> String,
    out: &mut MarkupWriter,
) {
    match &entry.payload {
        Payload::Inline(body) => {
            out.script(body, []);
        }
        Payload::Link {
            address,
            kind: LinkKind::Script,
        } => {
            let src = href(address);
            let mut attrs = vec![("src", src.as_str())];
            if entry.load == LoadClass::Deferred
                && caps.supports(Feature::DeferredScripts)
            {
                attrs.push(("defer", "defer"));
            }
            out.open("script", attrs).close("script");
        }
        _ => {}
    }
}

fn deferred_markup(doc: &Document, caps: &dyn Capabilities, bundle: Option<&Bundle>) -> String {
    if !caps.supports(Feature::Scripting) {
        return String::new();
    }
    let mut out = MarkupWriter::new();
    for entry in doc.registry().deferred_scripts() {
        write_script(entry, caps, |a| bundle_href(bundle, a), &mut out);
    }
    out.into_string()
}

/// A link's address, prefixed with the bundle's base URL when one was resolved.
pub(crate) fn bundle_href(bundle: Option<&Bundle>, address: &LinkAddress) -> String {
    match bundle {
        Some(bundle) => format!("{}/{}", bundle.base_url.trim_end_matches('/'), address),
        None => address.to_string(),
    }
}

/// Inserts `insert` before the first `<script` that is not inside a
/// `<!-- -->` comment, else before `</body>`, else at the end.
pub(crate) fn splice_before_first_script(mut html: String, insert: &str) -> String {
    if insert.is_empty() {
        return html;
    }
    let at = first_script_outside_comments(&html)
        .or_else(|| html.rfind("</body>"))
        .unwrap_or(html.len());
    html.insert_str(at, insert);
    html
}

fn first_script_outside_comments(html: &str) -> Option<usize> {
    let mut pos = 0;
    loop {
        let script = html[pos..].find("<script").map(|i| i + pos)?;
        match html[pos..].find("<!--").map(|i| i + pos) {
            Some(comment) if comment < script => {
                let end = html[comment..].find("-->")?;
                pos = comment + end + 3;
            }
            _ => return Some(script),
        }
    }
}
