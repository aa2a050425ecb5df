//! Defines the presentation rule-set attached to nodes and interned into the
//! page's generated style block.

use crate::parsers::{StyleParseError, parse_declaration_block};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An ordered set of `property: value` declarations.
///
/// Equality and hashing are structural, so two independently built rules with
/// the same declarations intern to the same generated class.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct StyleRule {
    declarations: BTreeMap<String, String>,
}

impl StyleRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a CSS-like declaration block such as `color: red; width: 10px`.
    pub fn parse(block: &str) -> Result<Self, StyleParseError> {
        let mut rule = Self::new();
        for (property, value) in parse_declaration_block(block)? {
            rule.insert(property, value);
        }
        Ok(rule)
    }

    /// Builder-style setter.
    pub fn with(mut self, property: &str, value: impl Into<String>) -> Self {
        self.insert(property, value);
        self
    }

    pub fn insert(&mut self, property: &str, value: impl Into<String>) {
        self.declarations
            .insert(property.trim().to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations.get(property).map(String::as_str)
    }

    pub fn contains(&self, property: &str) -> bool {
        self.declarations.contains_key(property)
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        self.declarations.remove(property)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serializes the declarations as a rule body, e.g. `color:red;width:10px`.
    pub fn to_css(&self) -> String {
        self.iter()
            .map(|(property, value)| format!("{property}:{value}"))
            .join(";")
    }
}
