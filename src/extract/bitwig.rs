//! Bitwig Studio (DAWproject) extractor

use super::search::count_by_attr;
use crate::decode::BitwigDocuments;
use crate::document::XmlNode;
use crate::types::{parse_tempo, ProjectMetadata, TrackCounts};

/// Extract tempo, track counts and names from a decoded `.dawproject`
pub fn extract_bitwig(docs: &BitwigDocuments) -> ProjectMetadata {
    let project = &docs.project.root;
    let metadata = docs.metadata.as_ref().map(|doc| &doc.root);

    ProjectMetadata {
        tempo: tempo(project),
        scale_info: None,
        track_counts: track_counts(project),
        project_name: metadata
            .and_then(|m| meta_text(m, "Title"))
            .or_else(|| {
                project
                    .path(&["Application"])
                    .and_then(|app| app.attr("name"))
                    .map(str::to_string)
            }),
        author: metadata.and_then(|m| meta_text(m, "Artist")),
    }
}

/// `Project/Transport/Tempo@value`
fn tempo(project: &XmlNode) -> Option<f64> {
    if project.name != "Project" {
        return None;
    }
    project
        .path(&["Transport", "Tempo"])
        .and_then(|tempo| tempo.attr("value"))
        .and_then(parse_tempo)
}

/// Count `Project/Structure/Track` by `contentType`
fn track_counts(project: &XmlNode) -> Option<TrackCounts> {
    if project.name != "Project" {
        return None;
    }
    let structure = project.child("Structure")?;
    let [notes, audio, ret] = count_by_attr(structure, "Track", "contentType", ["notes", "audio", "return"]);
    Some(TrackCounts::typed(notes, audio, ret))
}

fn meta_text(metadata: &XmlNode, tag: &str) -> Option<String> {
    metadata.child(tag).and_then(XmlNode::text).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::XmlDocument;
    use std::path::Path;

    fn docs(project: &str, metadata: Option<&str>) -> BitwigDocuments {
        BitwigDocuments {
            project: XmlDocument::parse_str(project, Path::new("project.xml")).unwrap(),
            metadata: metadata
                .map(|m| XmlDocument::parse_str(m, Path::new("metadata.xml")).unwrap()),
        }
    }

    const PROJECT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <Project version="1.0">
            <Application name="Bitwig Studio" version="5.1"/>
            <Transport>
                <Tempo max="666.0" min="20.0" unit="bpm" value="142.0" id="id0" name="Tempo"/>
                <TimeSignature denominator="4" numerator="4" id="id1"/>
            </Transport>
            <Structure>
                <Track contentType="notes" loaded="true" id="id2" name="Bass"/>
                <Track contentType="audio" loaded="true" id="id3" name="Vox"/>
                <Track contentType="audio" loaded="true" id="id4" name="Drums"/>
                <Track contentType="return" loaded="true" id="id5" name="FX"/>
            </Structure>
        </Project>"#;

    #[test]
    fn test_project_fields() {
        let meta = extract_bitwig(&docs(PROJECT, None));
        assert_eq!(meta.tempo, Some(142.0));
        assert_eq!(meta.track_counts, Some(TrackCounts::typed(1, 2, 1)));
        assert_eq!(meta.project_name.as_deref(), Some("Bitwig Studio"));
        assert_eq!(meta.author, None);
        assert_eq!(meta.scale_info, None);
    }

    #[test]
    fn test_metadata_overrides_names() {
        let meta = extract_bitwig(&docs(
            PROJECT,
            Some("<MetaData><Title>Sunrise</Title><Artist>K. Lee</Artist></MetaData>"),
        ));
        assert_eq!(meta.project_name.as_deref(), Some("Sunrise"));
        assert_eq!(meta.author.as_deref(), Some("K. Lee"));
    }

    #[test]
    fn test_missing_nodes() {
        let meta = extract_bitwig(&docs("<Project><Structure/></Project>", None));
        assert_eq!(meta.tempo, None);
        assert_eq!(meta.track_counts, Some(TrackCounts::typed(0, 0, 0)));

        let meta = extract_bitwig(&docs("<Project/>", None));
        assert_eq!(meta.track_counts, None);
        assert_eq!(meta.project_name, None);
    }
}
