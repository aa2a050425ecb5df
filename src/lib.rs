//! # arbor
//!
//! Builds server-side document trees and serializes them for the requesting
//! client. Widgets are mounted under a page, compiled once (identifiers,
//! theme inheritance, resource registration) and rendered any number of
//! times.
//!
//! ```ignore
//! use arbor::PipelineBuilder;
//! use arbor::widgets::widgets::*;
//!
//! let pipeline = PipelineBuilder::new().with_profile("modern")?.build()?;
//! let mut doc = pipeline.new_document()?;
//! let root = doc.root();
//! h1("Hello").mount(&mut doc, root)?;
//! let html = pipeline.generate(&mut doc)?;
//! ```

pub mod demo;
pub mod error;
pub mod pipeline;

pub use error::PipelineError;
pub use pipeline::{DocumentPipeline, PipelineBuilder};

pub use arbor_core::{CompileReport, Document, DocumentConfig, NodeId};
pub use arbor_traits::{
    Bundle, Capabilities, ClientClass, Feature, InMemoryModuleCatalog, ModuleCatalog,
    StaticCapabilities,
};

pub use arbor_core;
pub use arbor_widgets as widgets;
