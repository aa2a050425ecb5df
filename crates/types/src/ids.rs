//! Newtype wrappers for node identifiers and registration tokens
//!
//! These types keep element identifiers (which end up in the rendered markup and
//! must match a strict token pattern) apart from the free-form tokens callers use
//! to deduplicate resource registrations.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use thiserror::Error;

static ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_\-:.]*$").expect("identifier pattern is a valid regex")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("Invalid element identifier '{0}': must start with a letter and contain only letters, digits, '_', '-', ':' or '.'")]
    InvalidSyntax(String),
}

/// A validated identifier for a node in the document tree.
///
/// Identifiers are compared case-sensitively by `Eq`; use [`ElementId::matches`]
/// for the case-insensitive lookup the tree search performs.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ElementId(Arc<str>);

impl ElementId {
    /// Validates `id` against the identifier token pattern.
    pub fn new(id: impl AsRef<str>) -> Result<Self, IdError> {
        let id = id.as_ref();
        if ID_PATTERN.is_match(id) {
            Ok(Self(id.into()))
        } else {
            Err(IdError::InvalidSyntax(id.to_string()))
        }
    }

    /// Builds a synthetic identifier of the form `<prefix><n>`.
    pub fn generated(prefix: &str, n: u64) -> Result<Self, IdError> {
        Self::new(format!("{prefix}{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a raw identifier.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl TryFrom<String> for ElementId {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for ElementId {
    type Error = IdError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ElementId> for String {
    fn from(id: ElementId) -> Self {
        id.0.to_string()
    }
}

impl AsRef<str> for ElementId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A caller-chosen idempotence token for a resource registration.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ResourceToken(Arc<str>);

impl ResourceToken {
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ResourceToken {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for ResourceToken {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for ResourceToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
