//! The demonstration document rendered by the `arbor` binary and the benchmarks.

use crate::error::PipelineError;
use crate::pipeline::DocumentPipeline;
use arbor_core::style::ThemeKey;
use arbor_core::{Document, EventKind};
use arbor_traits::{Bundle, InMemoryModuleCatalog};
use arbor_widgets::widgets::*;

/// Module every demo link belongs to.
pub const DEMO_MODULE: &str = "widgets";

/// A small order overview: heading, themed toolbar, a form and a table of
/// `rows` generated orders.
pub fn demo_document(pipeline: &DocumentPipeline, rows: usize) -> Result<Document, PipelineError> {
    let mut doc = pipeline.new_document()?;
    let root = doc.root();

    meta("viewport", "width=device-width, initial-scale=1").mount(&mut doc, root)?;
    stylesheet("widgets/1.2/grid.css").mount(&mut doc, root)?;
    module_script("widgets/1.10/grid.js").mount(&mut doc, root)?;
    on_load("grid-init", "arborGrid.init()").mount(&mut doc, root)?;

    h1("Orders").mount(&mut doc, root)?;
    p("Open orders for the current week.").mount(&mut doc, root)?;

    div()
        .class("toolbar")
        .theme(ThemeKey::BUTTON_CLASS, "toolbar-button")
        .theme(ThemeKey::TOOLTIP_DELAY, "250")
        .child(
            button("Refresh", "arborGrid.reload()")
                .tooltip("Fetch the latest orders")
                .stop_click(),
        )
        .child(
            button("Export", "arborGrid.export()")
                .tooltip("Download as CSV")
                .stop_click(),
        )
        .mount(&mut doc, root)?;

    div()
        .class("filter")
        .style("margin: 0; padding: 4px")
        .child(text_field("customer", "").focus())
        .child(hidden("page", "1"))
        .mount(&mut doc, root)?;

    let records = (0..rows).map(|i| {
        vec![
            format!("{}", 1000 + i),
            format!("Customer {i}"),
            format!("{:.2}", (i as f64 + 1.0) * 9.95),
        ]
    });
    table(&["Order", "Customer", "Total"], records)
        .style("margin: 0; padding: 4px")
        .mount(&mut doc, root)?;

    div()
        .class("footer")
        .on(EventKind::Click, "arborGrid.top()")
        .child(text("Back to top"))
        .mount(&mut doc, root)?;

    Ok(doc)
}

/// A catalog with a single bundle that serves the demo module from `base_url`.
pub fn demo_catalog(base_url: &str) -> InMemoryModuleCatalog {
    InMemoryModuleCatalog::new().with_bundle(Bundle::new("demo", base_url).with_module(DEMO_MODULE))
}
