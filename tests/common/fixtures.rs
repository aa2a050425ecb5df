use serde_json::{Value, json};

/// A configuration that changes every user-visible default.
pub fn custom_config() -> Value {
    json!({
        "title": "Quarterly Report",
        "charset": "iso-8859-1",
        "language": "nb",
        "idPrefix": "w",
        "styleClassPrefix": "rule",
        "emitDoctype": false
    })
}

/// A configuration that only sets the title; everything else is defaulted.
pub fn title_only_config(title: &str) -> Value {
    json!({ "title": title })
}

/// Module link addresses registered in an order where the last explicit
/// version is not the highest one.
pub fn grid_versions() -> [&'static str; 4] {
    [
        "widgets/1.1/grid.js",
        "widgets/1.10/grid.js",
        "widgets/1.2/grid.js",
        "widgets/default/grid.js",
    ]
}
