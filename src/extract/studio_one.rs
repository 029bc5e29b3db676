//! Studio One song extractor
//!
//! Studio One identifies nodes by an `x:id` attribute rather than by tag, so
//! lookups here search by identifier.

use super::search::{count_by_attr, find_by_id, scale_from_raw};
use crate::decode::StudioOneDocuments;
use crate::document::XmlNode;
use crate::types::{parse_tempo, ProjectMetadata, ScaleInfo, ScaleTable, TrackCounts};
use tracing::debug;

const TEMPO_ATTRIBUTE_ID: &str = "Media:Tempo";

/// Extract tempo, scale and track counts from the members of a `.song`
pub fn extract_studio_one(docs: &StudioOneDocuments, scales: &ScaleTable) -> ProjectMetadata {
    ProjectMetadata {
        tempo: docs.metainfo.as_ref().and_then(|doc| tempo(&doc.root)),
        scale_info: Some(
            docs.editor
                .as_ref()
                .map(|doc| scale_info(&doc.root, scales))
                .unwrap_or_default(),
        ),
        track_counts: docs.song.as_ref().and_then(|doc| track_counts(&doc.root)),
        project_name: None,
        author: None,
    }
}

/// `MetaInformation/Attribute[@id="Media:Tempo"]@value`
fn tempo(metainfo: &XmlNode) -> Option<f64> {
    metainfo
        .children_named("Attribute")
        .find(|attr| attr.attr("id") == Some(TEMPO_ATTRIBUTE_ID))
        .and_then(|attr| attr.attr("value"))
        .and_then(parse_tempo)
}

/// `MusicalScale` inside the `MusicEditor` node of editor.xml
fn scale_info(editor: &XmlNode, scales: &ScaleTable) -> ScaleInfo {
    let Some(scale) = find_by_id(editor, "MusicEditor").and_then(|e| find_by_id(e, "MusicalScale"))
    else {
        debug!("editor.xml has no MusicalScale");
        return ScaleInfo::default();
    };

    let info = scale_from_raw(scale.attr("rootNote"), scale.attr("scale"), scales);
    if info.name.is_none() {
        if let Some(code) = scale.attr("scale") {
            debug!("Unknown Studio One scale code {}", code);
        }
    }
    info
}

/// Count `MediaTrack`s in the `Tracks` list under the `Root` node
fn track_counts(song: &XmlNode) -> Option<TrackCounts> {
    let tracks = find_by_id(song, "Root").and_then(|root| find_by_id(root, "Tracks"))?;
    let [music, audio, ret] = count_by_attr(tracks, "MediaTrack", "mediaType", ["Music", "Audio", "Return"]);
    Some(TrackCounts::typed(music, audio, ret))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::XmlDocument;
    use std::path::Path;

    fn parse(xml: &str) -> Option<XmlDocument> {
        Some(XmlDocument::parse_str(xml, Path::new("member.xml")).unwrap())
    }

    const METAINFO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <MetaInformation>
            <Attribute id="Document:Title" value="Groove"/>
            <Attribute id="Media:Tempo" value="97.5"/>
        </MetaInformation>"#;

    const EDITOR: &str = r#"<Editor xmlns:x="peterlinks">
        <Attributes x:id="MusicEditor">
            <Attributes x:id="MusicalScale" rootNote="7" scale="1"/>
        </Attributes>
    </Editor>"#;

    const SONG: &str = r#"<Song xmlns:x="peterlinks">
        <Attributes x:id="Root">
            <List x:id="Tracks">
                <MediaTrack mediaType="Audio" name="Gtr"/>
                <MediaTrack mediaType="Music" name="Keys"/>
                <MediaTrack mediaType="Music" name="Lead"/>
                <MediaTrack mediaType="Return" name="Verb"/>
            </List>
        </Attributes>
    </Song>"#;

    #[test]
    fn test_all_members() {
        let docs = StudioOneDocuments {
            metainfo: parse(METAINFO),
            editor: parse(EDITOR),
            song: parse(SONG),
        };
        let meta = extract_studio_one(&docs, &ScaleTable::default());
        assert_eq!(meta.tempo, Some(97.5));
        let scale = meta.scale_info.unwrap();
        assert_eq!(scale.root_note.as_deref(), Some("G0"));
        assert_eq!(scale.name.as_deref(), Some("Minor"));
        assert_eq!(meta.track_counts, Some(TrackCounts::typed(2, 1, 1)));
    }

    #[test]
    fn test_only_editor_member() {
        let docs = StudioOneDocuments {
            editor: parse(EDITOR),
            ..Default::default()
        };
        let meta = extract_studio_one(&docs, &ScaleTable::default());
        assert_eq!(meta.tempo, None);
        assert_eq!(meta.track_counts, None);
        assert!(meta.scale_info.is_some());
    }

    #[test]
    fn test_no_members() {
        let meta = extract_studio_one(&StudioOneDocuments::default(), &ScaleTable::default());
        assert_eq!(meta.tempo, None);
        assert_eq!(meta.scale_info, Some(ScaleInfo::default()));
        assert_eq!(meta.track_counts, None);
    }

    #[test]
    fn test_scale_outside_music_editor_is_ignored() {
        let docs = StudioOneDocuments {
            editor: parse(r#"<Editor><Attributes x:id="MusicalScale" rootNote="1" scale="0"/></Editor>"#),
            ..Default::default()
        };
        let meta = extract_studio_one(&docs, &ScaleTable::default());
        assert_eq!(meta.scale_info, Some(ScaleInfo::default()));
    }

    #[test]
    fn test_unknown_scale_code() {
        let docs = StudioOneDocuments {
            editor: parse(
                r#"<Editor><Attributes x:id="MusicEditor"><Attributes x:id="MusicalScale" rootNote="0" scale="77"/></Attributes></Editor>"#,
            ),
            ..Default::default()
        };
        let scale = extract_studio_one(&docs, &ScaleTable::default()).scale_info.unwrap();
        assert_eq!(scale.root_note.as_deref(), Some("C0"));
        assert_eq!(scale.name, None);
    }

    #[test]
    fn test_empty_track_list() {
        let docs = StudioOneDocuments {
            song: parse(r#"<Song><Attributes x:id="Root"><List x:id="Tracks"/></Attributes></Song>"#),
            ..Default::default()
        };
        let meta = extract_studio_one(&docs, &ScaleTable::default());
        assert_eq!(meta.track_counts, Some(TrackCounts::typed(0, 0, 0)));
    }
}
