use crate::builders::*;
use crate::widgets::*;
use arbor_core::{Compiler, Document, DocumentConfig, FlagValue, Renderer, TreeError};
use arbor_style::ThemeKey;
use arbor_traits::StaticCapabilities;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn render(build: impl FnOnce(&mut Document) -> Result<(), TreeError>) -> String {
    init_logger();
    let caps = StaticCapabilities::modern();
    let mut doc = Document::new(DocumentConfig::default()).unwrap();
    build(&mut doc).unwrap();
    Compiler::new(&caps).compile(&mut doc).unwrap();
    Renderer::new(&caps).render(&doc).unwrap()
}

#[test]
fn test_text_is_escaped() {
    let html = render(|doc| {
        let root = doc.root();
        p("Fish & <Chips>").mount(doc, root)?;
        Ok(())
    });
    assert!(html.contains("<p>Fish &amp; &lt;Chips&gt;</p>"));
}

#[test]
fn test_heading_inherits_theme_color() {
    let html = render(|doc| {
        let root = doc.root();
        div()
            .theme(ThemeKey::COLOR, "navy")
            .child(h2("Totals"))
            .mount(doc, root)?;
        Ok(())
    });
    assert!(html.contains("color:navy"));
    assert!(html.contains(">Totals</h2>"));
}

#[test]
fn test_button_gets_theme_class_and_id() {
    let html = render(|doc| {
        let root = doc.root();
        button("Save", "save()")
            .theme(ThemeKey::BUTTON_CLASS, "primary")
            .mount(doc, root)?;
        Ok(())
    });
    assert!(html.contains(
        "<button id=\"ID_GEN0\" class=\"primary\" onclick=\"save()\" type=\"button\">Save</button>"
    ));
}

#[test]
fn test_text_field_synthesizes_one_companion() {
    init_logger();
    let caps = StaticCapabilities::modern();
    let mut doc = Document::new(DocumentConfig::default()).unwrap();
    let root = doc.root();
    let field = text_field("email", "a@b.c")
        .id("email")
        .mount(&mut doc, root)
        .unwrap();
    let compiler = Compiler::new(&caps);
    compiler.compile(&mut doc).unwrap();
    doc.touch(field).unwrap();
    compiler.compile(&mut doc).unwrap();

    assert_eq!(doc.node(root).unwrap().children().len(), 2);
    let shadow = doc.find_by_id(root, "EMAIL_SHADOW").unwrap();
    assert_eq!(doc.node(shadow).unwrap().kind(), "hidden-field");

    let html = Renderer::new(&caps).render(&doc).unwrap();
    assert_eq!(html.matches("type=\"hidden\"").count(), 1);
    assert!(html.contains("email_shadow"));
    assert_eq!(html.matches("onchange=").count(), 1);
}

#[test]
fn test_table_structure() {
    let html = render(|doc| {
        let root = doc.root();
        table(
            &["Name", "Qty"],
            [
                vec!["Apples".to_string(), "3".to_string()],
                vec!["Pears".to_string(), "5".to_string()],
            ],
        )
        .mount(doc, root)?;
        Ok(())
    });
    assert!(html.contains("<table class=\"arbor-table\"><tr><th>Name</th><th>Qty</th></tr>"));
    assert_eq!(html.matches("<tr>").count(), 3);
    assert!(html.contains("<td>Pears</td><td>5</td></tr></table>"));
}

#[test]
fn test_row_outside_table_rejected() {
    let mut doc = Document::new(DocumentConfig::default()).unwrap();
    let root = doc.root();
    let err = Element::new(Row::new())
        .mount(&mut doc, root)
        .unwrap_err();
    assert!(matches!(
        err,
        TreeError::MissingAncestor {
            kind: "row",
            required: "table",
            ..
        }
    ));
}

#[test]
fn test_invalid_identifier_rejected() {
    let mut doc = Document::new(DocumentConfig::default()).unwrap();
    let root = doc.root();
    let err = div().id("1st").mount(&mut doc, root).unwrap_err();
    assert!(matches!(err, TreeError::InvalidIdentifier(_)));
}

#[test]
fn test_resource_widgets_emit_once() {
    let html = render(|doc| {
        let root = doc.root();
        for _ in 0..3 {
            script("grid-init", "initGrid();").mount(doc, root)?;
            meta("viewport", "width=device-width").mount(doc, root)?;
            on_load("grid-load", "loadGrid();").mount(doc, root)?;
        }
        stylesheet("grid/1.1/grid.css").mount(doc, root)?;
        stylesheet("grid/1.10/grid.css").mount(doc, root)?;
        stylesheet("grid/1.2/grid.css").mount(doc, root)?;
        Ok(())
    });
    assert_eq!(html.matches("initGrid();").count(), 1);
    assert_eq!(html.matches("name=\"viewport\"").count(), 1);
    assert_eq!(html.matches("loadGrid();").count(), 1);
    assert!(html.contains("href=\"grid/1.10/grid.css\""));
    assert_eq!(html.matches("grid.css").count(), 1);
}

#[test]
fn test_malformed_link_is_skipped() {
    let html = render(|doc| {
        let root = doc.root();
        module_script("not-an-address").mount(doc, root)?;
        Ok(())
    });
    assert!(!html.contains("not-an-address"));
}

#[test]
fn test_malformed_inline_style_ignored() {
    let html = render(|doc| {
        let root = doc.root();
        div()
            .style("color red")
            .style("margin: 0")
            .mount(doc, root)?;
        Ok(())
    });
    assert!(html.contains("margin:0"));
    assert!(!html.contains("color red"));
}

#[test]
fn test_tooltips_share_one_script() {
    let html = render(|doc| {
        let root = doc.root();
        button("A", "a()").tooltip("First").mount(doc, root)?;
        button("B", "b()").tooltip("Second").mount(doc, root)?;
        Ok(())
    });
    assert_eq!(html.matches("function arborTooltip").count(), 1);
    assert_eq!(html.matches("onmouseover=").count(), 2);
    assert!(html.contains("data-tooltip=\"Second\""));
}

#[test]
fn test_reattached_hidden_field_keeps_its_name() {
    init_logger();
    let mut doc = Document::new(DocumentConfig::default()).unwrap();
    let root = doc.root();
    let field = hidden("page", "1").mount(&mut doc, root).unwrap();
    let owner = FlagValue::Text(field.to_string());

    let detached = doc.detach(root, 0).unwrap();
    assert_eq!(detached, field);
    doc.attach(root, field).unwrap();
    assert_eq!(doc.flags().get("hidden-field:page"), Some(&owner));

    // A second field with the same name leaves the first owner in place.
    hidden("page", "2").mount(&mut doc, root).unwrap();
    assert_eq!(doc.flags().get("hidden-field:page"), Some(&owner));
}
