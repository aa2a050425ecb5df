// src/error.rs
use arbor_core::{CompileError, RenderError, TreeError};
use thiserror::Error;

/// A comprehensive error type for the whole compile-and-render pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Tree construction failed: {0}")]
    Tree(#[from] TreeError),

    #[error("Compilation failed: {0}")]
    Compile(#[from] CompileError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration could not be parsed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown capability profile '{0}'")]
    UnknownProfile(String),

    #[error("Pipeline is misconfigured: {0}")]
    Config(String),
}
