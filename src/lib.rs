//! dawdash - DAW project dashboard
//!
//! A command-line utility that walks a folder tree for project files of one
//! DAW (Ableton Live, Bitwig Studio, Studio One, Cubase, Akai MPC), reads
//! tempo, musical scale and track counts out of each, and lists or exports
//! them as CSV and JSON.
//!
//! # Architecture
//!
//! - `config`: CLI argument parsing and runtime settings
//! - `discovery`: Directory walking, exclusions and cancellation
//! - `document`: Owned XML element tree built with quick-xml
//! - `decode`: Per-format container decoders (gzip, zip, sibling files)
//! - `extract`: Per-format metadata extractors and the `Extractor` dispatcher
//! - `pipeline`: Parallel processing orchestration
//! - `view`: Filtering, sorting, table and folder-tree rendering
//! - `export`: CSV and JSON output
//!
//! # Example
//!
//! ```no_run
//! use dawdash::{config::Settings, pipeline, types::DawFormat};
//!
//! let settings = Settings {
//!     input: "/music/projects".into(),
//!     format: DawFormat::Ableton,
//!     ..Settings::default()
//! };
//! let result = pipeline::run(&settings).expect("Scan failed");
//! println!("Read {} of {} projects", result.extracted, result.total_files);
//! ```

pub mod config;
pub mod decode;
pub mod discovery;
pub mod document;
pub mod error;
pub mod export;
pub mod extract;
pub mod pipeline;
pub mod types;
pub mod view;

// Re-export key types at crate root
pub use error::{DawdashError, Result};
pub use extract::Extractor;
pub use types::{DawFormat, ProjectMetadata, ProjectRecord, ScaleInfo, TrackCounts};
