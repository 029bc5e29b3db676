//! Core data types for dawdash
//!
//! These types represent the domain model and flow from the extractors
//! through the pipeline into the views and exporters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// =============================================================================
// Musical primitives
// =============================================================================

/// The 12 pitch classes in Western music
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    Cs, // C#/Db
    D,
    Ds, // D#/Eb
    E,
    F,
    Fs, // F#/Gb
    G,
    Gs, // G#/Ab
    A,
    As, // A#/Bb
    B,
}

impl PitchClass {
    const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Convert from numeric index (0 = C, 1 = C#, ..., 11 = B), wrapping at 12
    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index % 12) as usize]
    }

    /// Standard notation with sharps (e.g., "C", "F#")
    pub fn to_standard_notation(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }
}

/// Name a MIDI note number as pitch class plus octave (0 -> "C0", 61 -> "C#5")
///
/// Returns `None` outside the MIDI range 0..=127.
pub fn midi_note_name(note: i64) -> Option<String> {
    if !(0..=127).contains(&note) {
        return None;
    }
    let pitch = PitchClass::from_index((note % 12) as u8);
    Some(format!("{}{}", pitch.to_standard_notation(), note / 12))
}

/// Parse a raw root-note attribute and name it
pub fn root_note_from_str(raw: &str) -> Option<String> {
    raw.trim().parse::<i64>().ok().and_then(midi_note_name)
}

/// Lookup table from numeric scale codes to scale names
///
/// Index `i` names scale code `i`. The default follows the scale menu order
/// shared by Studio One and Live's numeric scale codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleTable {
    names: Vec<String>,
}

impl ScaleTable {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Name for a numeric scale code
    pub fn name(&self, code: usize) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// Resolve a raw attribute value
    ///
    /// Integer codes go through the table; anything else is already a name.
    pub fn resolve(&self, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<usize>() {
            Ok(code) => self.name(code).map(str::to_string),
            Err(_) => Some(raw.to_string()),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for ScaleTable {
    fn default() -> Self {
        Self::new([
            "Major",
            "Minor",
            "Harmonic Minor",
            "Melodic Minor",
            "Major Pentatonic",
            "Minor Pentatonic",
            "Blues",
            "Dorian",
            "Phrygian",
            "Lydian",
            "Mixolydian",
            "Locrian",
            "Whole Tone",
            "Half-Whole Diminished",
            "Whole-Half Diminished",
            "Chromatic",
        ])
    }
}

// =============================================================================
// Extraction results
// =============================================================================

/// Musical key stored in a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleInfo {
    /// Root note with octave, e.g. "C0"
    pub root_note: Option<String>,
    /// Scale or mode label
    pub name: Option<String>,
}

impl ScaleInfo {
    pub fn is_empty(&self) -> bool {
        self.root_note.is_none() && self.name.is_none()
    }
}

/// Track counts as far as a format exposes them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TrackCounts {
    /// Counts split by track type
    Typed {
        midi_tracks: usize,
        audio_tracks: usize,
        return_tracks: usize,
    },
    /// A single unsplit count (Akai MPC return tracks)
    Single { count: usize },
}

impl TrackCounts {
    pub fn typed(midi_tracks: usize, audio_tracks: usize, return_tracks: usize) -> Self {
        TrackCounts::Typed {
            midi_tracks,
            audio_tracks,
            return_tracks,
        }
    }

    /// Sum of all counted tracks
    pub fn total(&self) -> usize {
        match *self {
            TrackCounts::Typed {
                midi_tracks,
                audio_tracks,
                return_tracks,
            } => midi_tracks + audio_tracks + return_tracks,
            TrackCounts::Single { count } => count,
        }
    }

    pub fn midi_tracks(&self) -> Option<usize> {
        match *self {
            TrackCounts::Typed { midi_tracks, .. } => Some(midi_tracks),
            TrackCounts::Single { .. } => None,
        }
    }

    pub fn audio_tracks(&self) -> Option<usize> {
        match *self {
            TrackCounts::Typed { audio_tracks, .. } => Some(audio_tracks),
            TrackCounts::Single { .. } => None,
        }
    }

    /// Return tracks; the single Akai MPC count is a return count
    pub fn return_tracks(&self) -> usize {
        match *self {
            TrackCounts::Typed { return_tracks, .. } => return_tracks,
            TrackCounts::Single { count } => count,
        }
    }
}

/// Metadata extracted from one project file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Beats per minute
    pub tempo: Option<f64>,
    pub scale_info: Option<ScaleInfo>,
    pub track_counts: Option<TrackCounts>,
    pub project_name: Option<String>,
    pub author: Option<String>,
}

/// Parse a tempo value, rejecting NaN and infinities
pub fn parse_tempo(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|t| t.is_finite())
}

// =============================================================================
// Project representation
// =============================================================================

/// One matched project file with whatever could be extracted from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Project file path
    pub path: PathBuf,
    pub format: DawFormat,
    /// Last modification time of the project file
    pub date: Option<DateTime<Utc>>,
    /// `None` when the file could not be decoded at all
    pub metadata: Option<ProjectMetadata>,
}

impl ProjectRecord {
    pub fn new(path: PathBuf, format: DawFormat, metadata: Option<ProjectMetadata>) -> Self {
        Self {
            path,
            format,
            date: None,
            metadata,
        }
    }

    /// File name with the format extension stripped
    pub fn project_name(&self) -> String {
        project_name_from_path(&self.path, self.format)
    }

    /// Name stored inside the project, if the format records one
    pub fn title(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.project_name.as_deref())
    }

    pub fn tempo(&self) -> Option<f64> {
        self.metadata.as_ref().and_then(|m| m.tempo)
    }

    pub fn scale_info(&self) -> Option<&ScaleInfo> {
        self.metadata.as_ref().and_then(|m| m.scale_info.as_ref())
    }

    pub fn track_counts(&self) -> Option<TrackCounts> {
        self.metadata.as_ref().and_then(|m| m.track_counts)
    }
}

/// Strip the format extension from a project file's base name
pub fn project_name_from_path(path: &Path, format: DawFormat) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let suffix_len = format.extension().len() + 1;
    if file_name.len() > suffix_len && format.matches_path(path) {
        file_name[..file_name.len() - suffix_len].to_string()
    } else {
        file_name
    }
}

// =============================================================================
// Supported formats
// =============================================================================

/// Project formats supported by dawdash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DawFormat {
    /// Ableton Live set (.als, gzip-compressed XML)
    Ableton,
    /// Bitwig Studio project (.bwproject, metadata from a sibling .dawproject)
    Bitwig,
    /// PreSonus Studio One song (.song, zip of XML members)
    StudioOne,
    /// Steinberg Cubase project (.cpr, metadata from sibling XML exports)
    Cubase,
    /// Akai MPC project (.xpj, plain XML)
    AkaiMpc,
}

impl DawFormat {
    pub const ALL: [DawFormat; 5] = [
        DawFormat::Ableton,
        DawFormat::Bitwig,
        DawFormat::StudioOne,
        DawFormat::Cubase,
        DawFormat::AkaiMpc,
    ];

    /// Detect format from file extension, with or without the leading dot
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        match ext.to_ascii_lowercase().as_str() {
            "als" => Some(DawFormat::Ableton),
            "bwproject" => Some(DawFormat::Bitwig),
            "song" => Some(DawFormat::StudioOne),
            "cpr" => Some(DawFormat::Cubase),
            "xpj" => Some(DawFormat::AkaiMpc),
            _ => None,
        }
    }

    /// Detect format from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// File extension without the dot
    pub fn extension(self) -> &'static str {
        match self {
            DawFormat::Ableton => "als",
            DawFormat::Bitwig => "bwproject",
            DawFormat::StudioOne => "song",
            DawFormat::Cubase => "cpr",
            DawFormat::AkaiMpc => "xpj",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            DawFormat::Ableton => "Ableton Live",
            DawFormat::Bitwig => "Bitwig Studio",
            DawFormat::StudioOne => "Studio One",
            DawFormat::Cubase => "Cubase",
            DawFormat::AkaiMpc => "Akai MPC",
        }
    }

    /// Check if a path carries this format's extension (ASCII case-insensitive)
    pub fn matches_path(self, path: &Path) -> bool {
        Self::from_path(path) == Some(self)
    }
}

impl std::fmt::Display for DawFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midi_note_name_all_notes() {
        let names = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
        for n in 0..=127i64 {
            let expected = format!("{}{}", names[(n % 12) as usize], n / 12);
            assert_eq!(midi_note_name(n).as_deref(), Some(expected.as_str()));
        }
    }

    #[test]
    fn test_midi_note_name_out_of_range() {
        assert_eq!(midi_note_name(-1), None);
        assert_eq!(midi_note_name(128), None);
        assert_eq!(root_note_from_str("abc"), None);
        assert_eq!(root_note_from_str(" 9 ").as_deref(), Some("A0"));
    }

    #[test]
    fn test_scale_table_resolve() {
        let table = ScaleTable::default();
        assert_eq!(table.resolve("0").as_deref(), Some("Major"));
        assert_eq!(table.resolve("1").as_deref(), Some("Minor"));
        assert_eq!(table.resolve("Dorian").as_deref(), Some("Dorian"));
        assert_eq!(table.resolve("999"), None);
        assert_eq!(table.resolve(""), None);
    }

    #[test]
    fn test_parse_tempo_rejects_non_finite() {
        assert_eq!(parse_tempo("128.5"), Some(128.5));
        assert_eq!(parse_tempo(" 90 "), Some(90.0));
        assert_eq!(parse_tempo("NaN"), None);
        assert_eq!(parse_tempo("inf"), None);
        assert_eq!(parse_tempo("fast"), None);
    }

    #[test]
    fn test_track_counts_total() {
        assert_eq!(TrackCounts::typed(2, 1, 3).total(), 6);
        assert_eq!(TrackCounts::Single { count: 4 }.total(), 4);
        assert_eq!(TrackCounts::Single { count: 4 }.midi_tracks(), None);
        assert_eq!(TrackCounts::Single { count: 4 }.return_tracks(), 4);
    }

    #[test]
    fn test_track_counts_serialize_tagged() {
        let json = serde_json::to_value(TrackCounts::typed(1, 2, 0)).unwrap();
        assert_eq!(json["kind"], "typed");
        assert_eq!(json["audio_tracks"], 2);

        let json = serde_json::to_value(TrackCounts::Single { count: 3 }).unwrap();
        assert_eq!(json["kind"], "single");
        assert_eq!(json["count"], 3);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DawFormat::from_extension(".als"), Some(DawFormat::Ableton));
        assert_eq!(DawFormat::from_extension("BWPROJECT"), Some(DawFormat::Bitwig));
        assert_eq!(DawFormat::from_extension("song"), Some(DawFormat::StudioOne));
        assert_eq!(DawFormat::from_extension(".cpr"), Some(DawFormat::Cubase));
        assert_eq!(DawFormat::from_extension("xpj"), Some(DawFormat::AkaiMpc));
        assert_eq!(DawFormat::from_extension(".wav"), None);
    }

    #[test]
    fn test_project_name_strips_extension() {
        let record = ProjectRecord::new(
            PathBuf::from("/music/My Song v2.als"),
            DawFormat::Ableton,
            None,
        );
        assert_eq!(record.project_name(), "My Song v2");
        assert_eq!(record.title(), None);

        let name = project_name_from_path(Path::new("/beats/Loop.XPJ"), DawFormat::AkaiMpc);
        assert_eq!(name, "Loop");
    }

    #[test]
    fn test_title_does_not_replace_file_name() {
        let metadata = ProjectMetadata {
            project_name: Some("Night Drive".to_string()),
            ..Default::default()
        };
        let record = ProjectRecord::new(
            PathBuf::from("/beats/nd.xpj"),
            DawFormat::AkaiMpc,
            Some(metadata),
        );
        assert_eq!(record.title(), Some("Night Drive"));
        assert_eq!(record.project_name(), "nd");
    }
}
