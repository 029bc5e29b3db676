//! Cubase track archive extractor
//!
//! Track archives list tracks as `<obj class="M...TrackEvent">` entries inside
//! `<list name="track" type="obj">`. They carry no project tempo, so only
//! track counts come out of here.

use crate::decode::cubase::tracklist;
use crate::document::{XmlDocument, XmlNode};
use crate::types::{ProjectMetadata, TrackCounts};

const MIDI_TRACK_CLASS: &str = "MMidiTrackEvent";
const AUDIO_TRACK_CLASS: &str = "MAudioTrackEvent";
const RETURN_TRACK_CLASS: &str = "MReturnTrackEvent";

/// Extract track counts from a decoded track archive
pub fn extract_cubase(doc: &XmlDocument) -> ProjectMetadata {
    ProjectMetadata {
        track_counts: tracklist(&doc.root).map(track_counts),
        ..Default::default()
    }
}

fn track_counts(tracklist: &XmlNode) -> TrackCounts {
    let mut counts = [0usize; 3];
    let track_lists = tracklist
        .children_named("list")
        .filter(|list| list.attr("name") == Some("track"));

    for list in track_lists {
        for obj in list.children_named("obj") {
            match obj.attr("class") {
                Some(MIDI_TRACK_CLASS) => counts[0] += 1,
                Some(AUDIO_TRACK_CLASS) => counts[1] += 1,
                Some(RETURN_TRACK_CLASS) => counts[2] += 1,
                _ => {}
            }
        }
    }

    TrackCounts::typed(counts[0], counts[1], counts[2])
}
