//! Akai MPC project extractor

use crate::document::{XmlDocument, XmlNode};
use crate::types::{parse_tempo, ProjectMetadata, TrackCounts};

/// Extract tempo, return-track count and names from an `.xpj` document
pub fn extract_akai_mpc(doc: &XmlDocument) -> ProjectMetadata {
    let project = &doc.root;
    ProjectMetadata {
        tempo: tempo(project),
        scale_info: None,
        track_counts: return_count(project),
        project_name: text(project, "Name"),
        author: text(project, "Creator"),
    }
}

/// `BPM`, falling back to `MasterTempo.Value`
fn tempo(project: &XmlNode) -> Option<f64> {
    match project.child("BPM").and_then(XmlNode::text) {
        Some(bpm) => parse_tempo(bpm),
        None => project
            .child("MasterTempo.Value")
            .and_then(XmlNode::text)
            .and_then(parse_tempo),
    }
}

/// Number of `Mixer.Return` entries under `Mixer`
fn return_count(project: &XmlNode) -> Option<TrackCounts> {
    let mixer = project.child("Mixer")?;
    Some(TrackCounts::Single {
        count: mixer.children_named("Mixer.Return").count(),
    })
}

fn text(project: &XmlNode, tag: &str) -> Option<String> {
    project.child(tag).and_then(XmlNode::text).map(str::to_string)
}
