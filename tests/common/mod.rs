#![allow(dead_code)]

pub mod fixtures;
pub mod html_assertions;

use arbor::{Document, DocumentPipeline, PipelineBuilder, PipelineError};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A pipeline for one of the built-in capability profiles.
pub fn pipeline(profile: &str) -> DocumentPipeline {
    init_logger();
    PipelineBuilder::new()
        .with_profile(profile)
        .and_then(PipelineBuilder::build)
        .unwrap_or_else(|e| panic!("failed to build '{profile}' pipeline: {e}"))
}

/// Builds a fresh document with `build`, then compiles and renders it for a
/// modern client.
pub fn generate_with(
    build: impl FnOnce(&mut Document) -> Result<(), PipelineError>,
) -> Result<String, PipelineError> {
    let pipeline = pipeline("modern");
    let mut doc = pipeline.new_document()?;
    build(&mut doc)?;
    pipeline.generate(&mut doc)
}
