// src/pipeline/builder.rs
use super::orchestrator::DocumentPipeline;
use crate::error::PipelineError;
use arbor_core::{Document, DocumentConfig};
use arbor_traits::{Capabilities, ModuleCatalog, StaticCapabilities};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// A builder for creating a `DocumentPipeline`.
pub struct PipelineBuilder {
    capabilities: Arc<dyn Capabilities>,
    catalog: Option<Arc<dyn ModuleCatalog>>,
    config: DocumentConfig,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            capabilities: Arc::new(StaticCapabilities::modern()),
            catalog: None,
            config: DocumentConfig::default(),
        }
    }
}

impl PipelineBuilder {
    /// Creates a builder targeting a modern client with the default configuration.
    pub fn new() -> Self {
        Default::default()
    }

    /// Uses the given capability oracle for every document this pipeline builds.
    pub fn with_capabilities(mut self, capabilities: impl Capabilities + 'static) -> Self {
        self.capabilities = Arc::new(capabilities);
        self
    }

    /// Selects one of the built-in capability presets (`modern`, `legacy`).
    pub fn with_profile(self, name: &str) -> Result<Self, PipelineError> {
        let caps = StaticCapabilities::preset(name)
            .ok_or_else(|| PipelineError::UnknownProfile(name.to_string()))?;
        Ok(self.with_capabilities(caps))
    }

    /// Resolves module links against `catalog` at render time.
    pub fn with_catalog(mut self, catalog: impl ModuleCatalog + 'static) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    pub fn with_config(mut self, config: DocumentConfig) -> Self {
        self.config = config;
        self
    }

    /// Parses the document configuration from a JSON string. Missing fields keep
    /// their defaults.
    pub fn with_config_json(mut self, json: &str) -> Result<Self, PipelineError> {
        self.config = serde_json::from_str(json)?;
        Ok(self)
    }

    /// Loads the document configuration from a JSON file.
    pub fn with_config_file<P: AsRef<Path>>(self, path: P) -> Result<Self, PipelineError> {
        let path_ref = path.as_ref();
        let source = fs::read_to_string(path_ref).map_err(|e| {
            PipelineError::Io(io::Error::new(
                e.kind(),
                format!("Failed to read config from '{}': {}", path_ref.display(), e),
            ))
        })?;
        self.with_config_json(&source)
    }

    /// Consumes the builder and creates the `DocumentPipeline`.
    ///
    /// The configuration is validated up front so a bad identifier prefix is
    /// reported here rather than on the first document.
    pub fn build(self) -> Result<DocumentPipeline, PipelineError> {
        Document::new(self.config.clone()).map_err(|e| PipelineError::Config(e.to_string()))?;
        log::info!(
            "Building pipeline for '{}' clients{}.",
            self.capabilities.name(),
            self.catalog
                .as_ref()
                .map(|c| format!(" with catalog '{}'", c.name()))
                .unwrap_or_default()
        );
        Ok(DocumentPipeline::new(
            self.capabilities,
            self.catalog,
            Arc::new(self.config),
        ))
    }
}
