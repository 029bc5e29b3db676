//! Folder tree view of discovered projects

use super::table::format_tempo;
use crate::types::ProjectRecord;
use std::collections::BTreeMap;
use std::path::{Component, Path};

/// A folder with its subfolders and the project files directly inside it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderTree {
    pub name: String,
    pub folders: BTreeMap<String, FolderTree>,
    pub files: Vec<TreeFile>,
}

/// A project file leaf
#[derive(Debug, Clone, PartialEq)]
pub struct TreeFile {
    pub name: String,
    pub tempo: Option<f64>,
}

impl FolderTree {
    /// Build the tree of `records` relative to the start directory `root`
    ///
    /// The root node is named after the last component of `root`. Records
    /// outside `root` hang directly off the root by file name.
    pub fn build(root: &Path, records: &[ProjectRecord]) -> Self {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| root.display().to_string());

        let mut tree = FolderTree {
            name,
            ..Default::default()
        };

        for record in records {
            let relative = record.path.strip_prefix(root).unwrap_or(&record.path);
            let mut parts: Vec<String> = relative
                .components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().to_string()),
                    _ => None,
                })
                .collect();

            let Some(file_name) = parts.pop().or_else(|| {
                record
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
            }) else {
                continue;
            };

            if record.path.strip_prefix(root).is_err() {
                parts.clear();
            }

            let mut node = &mut tree;
            for part in parts {
                node = node.folders.entry(part.clone()).or_insert_with(|| FolderTree {
                    name: part,
                    ..Default::default()
                });
            }
            node.files.push(TreeFile {
                name: file_name,
                tempo: record.tempo(),
            });
        }

        tree
    }

    /// Number of project files in this folder and below
    pub fn file_count(&self) -> usize {
        self.files.len() + self.folders.values().map(FolderTree::file_count).sum::<usize>()
    }

    /// Render as an indented text tree, two spaces per level
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        out.push_str(&format!("{}{}/\n", indent, self.name));
        for folder in self.folders.values() {
            folder.render_into(out, depth + 1);
        }
        for file in &self.files {
            out.push_str(&format!(
                "{}  {} ({} BPM)\n",
                indent,
                file.name,
                format_tempo(file.tempo)
            ));
        }
    }
}
