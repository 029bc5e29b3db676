//! CSV export of the project dashboard

use super::write_atomically;
use crate::error::Result;
use crate::types::ProjectRecord;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the CSV export inside the output directory
pub const CSV_FILE_NAME: &str = "DAW Projects Dashboard.csv";

/// Written for any value the project did not provide
pub const MISSING_VALUE: &str = "N/A";

/// One exported column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvColumn {
    ProjectName,
    Tempo,
    Date,
    Path,
    RootNote,
    Scale,
    MidiTracks,
    AudioTracks,
    ReturnTracks,
}

pub const DEFAULT_COLUMNS: [CsvColumn; 4] = [
    CsvColumn::ProjectName,
    CsvColumn::Tempo,
    CsvColumn::Date,
    CsvColumn::Path,
];

pub const EXTENDED_COLUMNS: [CsvColumn; 9] = [
    CsvColumn::ProjectName,
    CsvColumn::Tempo,
    CsvColumn::Date,
    CsvColumn::Path,
    CsvColumn::RootNote,
    CsvColumn::Scale,
    CsvColumn::MidiTracks,
    CsvColumn::AudioTracks,
    CsvColumn::ReturnTracks,
];

impl CsvColumn {
    pub fn header(self) -> &'static str {
        match self {
            CsvColumn::ProjectName => "projectName",
            CsvColumn::Tempo => "tempo",
            CsvColumn::Date => "date",
            CsvColumn::Path => "path",
            CsvColumn::RootNote => "rootNote",
            CsvColumn::Scale => "scale",
            CsvColumn::MidiTracks => "midiTracks",
            CsvColumn::AudioTracks => "audioTracks",
            CsvColumn::ReturnTracks => "returnTracks",
        }
    }

    /// Cell value for `record`
    pub fn value(self, record: &ProjectRecord) -> String {
        let value = match self {
            CsvColumn::ProjectName => Some(record.project_name()),
            CsvColumn::Tempo => record.tempo().map(|t| t.to_string()),
            CsvColumn::Date => record.date.map(|d| d.to_rfc3339()),
            CsvColumn::Path => Some(record.path.to_string_lossy().to_string()),
            CsvColumn::RootNote => record.scale_info().and_then(|s| s.root_note.clone()),
            CsvColumn::Scale => record.scale_info().and_then(|s| s.name.clone()),
            CsvColumn::MidiTracks => record
                .track_counts()
                .and_then(|c| c.midi_tracks())
                .map(|n| n.to_string()),
            CsvColumn::AudioTracks => record
                .track_counts()
                .and_then(|c| c.audio_tracks())
                .map(|n| n.to_string()),
            CsvColumn::ReturnTracks => record
                .track_counts()
                .map(|c| c.return_tracks().to_string()),
        };
        value.unwrap_or_else(|| MISSING_VALUE.to_string())
    }
}

/// Write `records` as `DAW Projects Dashboard.csv` into `output_dir`
///
/// Uses the same temp-file-then-rename pattern as the JSON export. Returns
/// the path of the written file.
pub fn write_csv(records: &[ProjectRecord], columns: &[CsvColumn], output_dir: &Path) -> Result<PathBuf> {
    let output_path = output_dir.join(CSV_FILE_NAME);

    write_atomically(&output_path, |writer| {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(columns.iter().map(|c| c.header()))?;
        for record in records {
            wtr.write_record(columns.iter().map(|c| c.value(record)))?;
        }
        wtr.flush()?;
        Ok(())
    })?;

    info!("Wrote {} projects to {}", records.len(), output_path.display());

    Ok(output_path)
}
