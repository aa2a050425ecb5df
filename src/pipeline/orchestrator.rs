// src/pipeline/orchestrator.rs
use crate::error::PipelineError;
use arbor_core::{CompileReport, Compiler, Document, DocumentConfig, Renderer};
use arbor_traits::{Capabilities, ModuleCatalog};
use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// The document build pipeline.
///
/// Holds the per-request collaborators (capability oracle, module catalog,
/// configuration) and runs the compile pass followed by the render pass. A
/// pipeline can be shared across threads; each document is built on one.
#[derive(Debug, Clone)]
pub struct DocumentPipeline {
    capabilities: Arc<dyn Capabilities>,
    catalog: Option<Arc<dyn ModuleCatalog>>,
    config: Arc<DocumentConfig>,
}

impl DocumentPipeline {
    pub(super) fn new(
        capabilities: Arc<dyn Capabilities>,
        catalog: Option<Arc<dyn ModuleCatalog>>,
        config: Arc<DocumentConfig>,
    ) -> Self {
        Self {
            capabilities,
            catalog,
            config,
        }
    }

    pub fn capabilities(&self) -> &dyn Capabilities {
        self.capabilities.as_ref()
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Creates an empty document rooted at a page, ready for widgets.
    pub fn new_document(&self) -> Result<Document, PipelineError> {
        Ok(Document::new(DocumentConfig::clone(&self.config))?)
    }

    /// Runs the compile pass only. Repeated calls compile nothing new unless
    /// nodes were touched or attached in between.
    pub fn compile(&self, doc: &mut Document) -> Result<CompileReport, PipelineError> {
        Ok(Compiler::new(self.capabilities.as_ref()).compile(doc)?)
    }

    /// Renders an already compiled document.
    pub fn render(&self, doc: &Document) -> Result<String, PipelineError> {
        let mut renderer = Renderer::new(self.capabilities.as_ref());
        if let Some(catalog) = &self.catalog {
            renderer = renderer.with_catalog(catalog.as_ref());
        }
        Ok(renderer.render(doc)?)
    }

    /// Compiles `doc` and serializes it.
    pub fn generate(&self, doc: &mut Document) -> Result<String, PipelineError> {
        let start = Instant::now();
        let report = self.compile(doc)?;
        let html = self.render(doc)?;
        debug!(
            "Generated {} bytes ({} nodes compiled, {} resources) in {:?}",
            html.len(),
            report.nodes_compiled,
            report.resources_flushed,
            start.elapsed()
        );
        Ok(html)
    }

    /// Compiles `doc` and writes the markup to `writer`, handing the writer back.
    pub fn generate_to_writer<W: Write>(
        &self,
        doc: &mut Document,
        mut writer: W,
    ) -> Result<W, PipelineError> {
        let html = self.generate(doc)?;
        writer.write_all(html.as_bytes())?;
        writer.flush()?;
        Ok(writer)
    }

    /// Compiles `doc` and writes the markup to the file at `path`.
    pub fn generate_to_file<P: AsRef<Path>>(
        &self,
        doc: &mut Document,
        path: P,
    ) -> Result<(), PipelineError> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let html = self.generate(doc)?;
        fs::write(path_ref, html)?;
        info!("Wrote {}", path_ref.display());
        Ok(())
    }
}
