use crate::ids::DEFAULT_ID_PREFIX;
use serde::{Deserialize, Serialize};

/// Per-document settings. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentConfig {
    pub title: String,
    pub charset: String,
    pub language: Option<String>,
    /// Prefix of synthetic identifiers (`ID_GEN0`, `ID_GEN1`, ...).
    pub id_prefix: String,
    /// Prefix of generated class names for interned style rules.
    pub style_class_prefix: String,
    pub emit_doctype: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            charset: "utf-8".to_string(),
            language: None,
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            style_class_prefix: "s".to_string(),
            emit_doctype: true,
        }
    }
}

impl DocumentConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}
