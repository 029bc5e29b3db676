//! Filtering, sorting and plain-text table rendering of project records

use crate::types::{ProjectRecord, TrackCounts};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Column to sort the dashboard by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    ProjectName,
    Date,
    Tempo,
    Path,
    Format,
}

impl SortKey {
    /// Parse a CLI sort key (`name`, `date`, `tempo`, `path`, `format`)
    pub fn parse(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "name" | "projectname" => Some(SortKey::ProjectName),
            "date" => Some(SortKey::Date),
            "tempo" | "bpm" => Some(SortKey::Tempo),
            "path" => Some(SortKey::Path),
            "format" => Some(SortKey::Format),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Keep records whose project name contains `term`, ignoring case
///
/// An empty term keeps everything.
pub fn filter_by_name(records: Vec<ProjectRecord>, term: &str) -> Vec<ProjectRecord> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| r.project_name().to_lowercase().contains(&term))
        .collect()
}

/// Stable sort; missing values come first when ascending
pub fn sort_records(records: &mut [ProjectRecord], key: SortKey, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn compare(a: &ProjectRecord, b: &ProjectRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::ProjectName => a
            .project_name()
            .to_lowercase()
            .cmp(&b.project_name().to_lowercase()),
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::Tempo => match (a.tempo(), b.tempo()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => x.total_cmp(&y),
        },
        SortKey::Path => a
            .path
            .to_string_lossy()
            .to_lowercase()
            .cmp(&b.path.to_string_lossy().to_lowercase()),
        SortKey::Format => a.format.display_name().cmp(b.format.display_name()),
    }
}

/// Tempo for display: "124" or "97.5", "-" when unknown
pub fn format_tempo(tempo: Option<f64>) -> String {
    match tempo {
        Some(t) => format!("{}", (t * 100.0).round() / 100.0),
        None => "-".to_string(),
    }
}

fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn format_key(record: &ProjectRecord) -> String {
    let Some(scale) = record.scale_info() else {
        return "-".to_string();
    };
    match (&scale.root_note, &scale.name) {
        (Some(root), Some(name)) => format!("{} {}", root, name),
        (Some(root), None) => root.clone(),
        (None, Some(name)) => name.clone(),
        (None, None) => "-".to_string(),
    }
}

fn format_tracks(counts: Option<TrackCounts>) -> String {
    match counts {
        Some(TrackCounts::Typed {
            midi_tracks,
            audio_tracks,
            return_tracks,
        }) => format!("{}/{}/{}", midi_tracks, audio_tracks, return_tracks),
        Some(TrackCounts::Single { count }) => format!("{} ret", count),
        None => "-".to_string(),
    }
}

const HEADERS: [&str; 6] = ["Project", "Tempo", "Key", "Tracks M/A/R", "Modified", "Path"];

/// Render records as a fixed-width text table
pub fn render(records: &[ProjectRecord]) -> String {
    let rows: Vec<[String; 6]> = records
        .iter()
        .map(|r| {
            [
                r.project_name(),
                format_tempo(r.tempo()),
                format_key(r),
                format_tracks(r.track_counts()),
                format_date(r.date),
                r.path.display().to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(rule.join("  ").trim_end());
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
