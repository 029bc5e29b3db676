//! Scan, extract and export in one run

pub mod orchestrator;

pub use orchestrator::{run, run_with_cancel, PipelineResult};
