//! ModuleCatalog trait for resolving the script/style modules a document needs
//! to a deployable bundle.

use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt::Debug;
use std::sync::RwLock;
use thiserror::Error;

/// Error type for bundle resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("No registered bundle provides modules [{}]", .0.iter().join(", "))]
    Unsatisfied(BTreeSet<String>),

    #[error("Module catalog is unavailable: {0}")]
    Unavailable(String),
}

/// A deployable set of modules served from one base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub name: String,
    pub base_url: String,
    pub modules: BTreeSet<String>,
}

impl Bundle {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            modules: BTreeSet::new(),
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.modules.insert(module.into());
        self
    }

    pub fn provides_all(&self, required: &BTreeSet<String>) -> bool {
        required.is_subset(&self.modules)
    }
}

/// A trait for resolving a document's module requirements to one bundle.
pub trait ModuleCatalog: Send + Sync + Debug {
    /// Picks a bundle providing every module in `required`.
    ///
    /// # Errors
    ///
    /// `CatalogError::Unsatisfied` names the modules no candidate bundle covers.
    fn resolve(&self, required: &BTreeSet<String>) -> Result<Bundle, CatalogError>;

    /// Returns a human-readable name for this catalog (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// An in-memory catalog; bundles are tried in registration order.
#[derive(Debug, Default)]
pub struct InMemoryModuleCatalog {
    bundles: RwLock<Vec<Bundle>>,
}

impl InMemoryModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bundle to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` if the internal lock is poisoned.
    pub fn add(&self, bundle: Bundle) -> Result<(), CatalogError> {
        let mut bundles = self
            .bundles
            .write()
            .map_err(|_| CatalogError::Unavailable("bundle list lock poisoned".to_string()))?;
        bundles.push(bundle);
        Ok(())
    }

    /// Builder-style variant of [`add`](Self::add) for catalogs assembled up front.
    pub fn with_bundle(self, bundle: Bundle) -> Self {
        if let Ok(mut bundles) = self.bundles.write() {
            bundles.push(bundle);
        }
        self
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.bundles.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ModuleCatalog for InMemoryModuleCatalog {
    fn resolve(&self, required: &BTreeSet<String>) -> Result<Bundle, CatalogError> {
        let bundles = self
            .bundles
            .read()
            .map_err(|_| CatalogError::Unavailable("bundle list lock poisoned".to_string()))?;

        if let Some(bundle) = bundles.iter().find(|b| b.provides_all(required)) {
            return Ok(bundle.clone());
        }

        // Report what the closest candidate is missing.
        let unmet = bundles
            .iter()
            .map(|b| required.difference(&b.modules).cloned().collect::<BTreeSet<_>>())
            .min_by_key(BTreeSet::len)
            .unwrap_or_else(|| required.clone());
        Err(CatalogError::Unsatisfied(unmet))
    }

    fn name(&self) -> &'static str {
        "InMemoryModuleCatalog"
    }
}
