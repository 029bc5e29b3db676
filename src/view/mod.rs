//! Terminal views of the scan results

pub mod table;
pub mod tree;

pub use table::{filter_by_name, render, sort_records, SortDirection, SortKey};
pub use tree::FolderTree;
