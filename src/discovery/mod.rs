//! Finding project files on disk

pub mod scanner;

pub use scanner::{scan, CancelFlag, DiscoveredProject, ScanOptions};
