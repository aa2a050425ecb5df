use arbor::demo::{demo_catalog, demo_document};
use arbor::{PipelineBuilder, PipelineError};
use clap::Parser;
use std::io;
use std::path::PathBuf;

/// Renders the built-in demonstration document for a client profile.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Capability profile of the requesting client (modern, legacy).
    #[arg(short, long, default_value = "modern")]
    profile: String,

    /// JSON document configuration (title, charset, idPrefix, ...).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serve module links from a bundle at this base URL.
    #[arg(long)]
    bundle_url: Option<String>,

    /// Number of table rows in the demo document.
    #[arg(long, default_value_t = 5)]
    rows: usize,

    /// Output file; markup goes to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), PipelineError> {
    env_logger::init();
    let args = Args::parse();

    let mut builder = PipelineBuilder::new().with_profile(&args.profile)?;
    if let Some(path) = &args.config {
        builder = builder.with_config_file(path)?;
    }
    if let Some(url) = &args.bundle_url {
        builder = builder.with_catalog(demo_catalog(url));
    }
    let pipeline = builder.build()?;

    let mut doc = demo_document(&pipeline, args.rows)?;
    match &args.output {
        Some(path) => pipeline.generate_to_file(&mut doc, path)?,
        None => {
            pipeline.generate_to_writer(&mut doc, io::stdout().lock())?;
        }
    }
    Ok(())
}
