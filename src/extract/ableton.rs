//! Ableton Live set extractor

use super::search::{count_by_tag, find_manual_tempo, scale_from_raw};
use crate::document::{XmlDocument, XmlNode};
use crate::types::{ProjectMetadata, ScaleInfo, ScaleTable, TrackCounts};

/// Extract tempo, scale and track counts from a decoded Live set
pub fn extract_ableton(doc: &XmlDocument, scales: &ScaleTable) -> ProjectMetadata {
    let root = &doc.root;
    ProjectMetadata {
        tempo: find_manual_tempo(root),
        scale_info: Some(scale_info(root, scales)),
        track_counts: track_counts(root),
        project_name: None,
        author: None,
    }
}

/// `LiveSet/ScaleInformation`, or the first one anywhere (Live 11+)
fn scale_info(root: &XmlNode, scales: &ScaleTable) -> ScaleInfo {
    let node = live_set(root)
        .and_then(|set| set.child("ScaleInformation"))
        .or_else(|| root.find_named("ScaleInformation"));

    match node {
        Some(node) => scale_from_raw(
            node.child("RootNote").and_then(|n| n.attr("Value")),
            node.child("Name").and_then(|n| n.attr("Value")),
            scales,
        ),
        None => ScaleInfo::default(),
    }
}

/// Count track elements under `LiveSet/Tracks` by tag
fn track_counts(root: &XmlNode) -> Option<TrackCounts> {
    let tracks = live_set(root)?.child("Tracks")?;
    let [midi, audio, ret] = count_by_tag(tracks, ["MidiTrack", "AudioTrack", "ReturnTrack"]);
    Some(TrackCounts::typed(midi, audio, ret))
}

/// `LiveSet` under the `<Ableton>` root
fn live_set(root: &XmlNode) -> Option<&XmlNode> {
    if root.name == "Ableton" {
        root.child("LiveSet")
    } else {
        None
    }
}
