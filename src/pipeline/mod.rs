//! Document build orchestration.
//!
//! - [`PipelineBuilder`]: fluent builder selecting the capability profile,
//!   module catalog and document configuration
//! - [`DocumentPipeline`]: hands out fresh documents and runs compile → render
//!
//! # Example
//!
//! ```ignore
//! use arbor::PipelineBuilder;
//!
//! let pipeline = PipelineBuilder::new()
//!     .with_profile("legacy")?
//!     .with_config_file("arbor.json")?
//!     .build()?;
//!
//! let mut doc = pipeline.new_document()?;
//! // ... mount widgets under doc.root() ...
//! pipeline.generate_to_file(&mut doc, "out.html")?;
//! ```

mod builder;
mod orchestrator;

pub use builder::PipelineBuilder;
pub use orchestrator::DocumentPipeline;
