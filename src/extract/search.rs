//! Tree searches shared by several extractors

use crate::document::XmlNode;
use crate::types::{parse_tempo, root_note_from_str, ScaleInfo, ScaleTable};

/// First `Tempo/Manual@Value` in document order
///
/// Live moved the master tempo around between versions (`MasterTrack`,
/// `MainTrack`, ...), so this searches the whole tree instead of a fixed
/// path. Only a `Tempo` whose first `Manual` child carries `Value` matches;
/// an unparsable value yields `None` rather than a later match.
pub fn find_manual_tempo(root: &XmlNode) -> Option<f64> {
    root.find_map(|node| {
        if node.name != "Tempo" {
            return None;
        }
        node.child("Manual")
            .and_then(|manual| manual.attr("Value"))
            .map(parse_tempo)
    })
    .flatten()
}

/// Node carrying the Studio One style `x:id` identifier
pub fn find_by_id<'a>(root: &'a XmlNode, id: &str) -> Option<&'a XmlNode> {
    root.find_by_attr("x:id", id)
}

/// Build a scale from raw root-note and scale-name values
pub fn scale_from_raw(root_note: Option<&str>, name: Option<&str>, scales: &ScaleTable) -> ScaleInfo {
    ScaleInfo {
        root_note: root_note.and_then(root_note_from_str),
        name: name.and_then(|raw| scales.resolve(raw)),
    }
}

/// Count `children` of `parent` with tag `tag` whose attribute `key` equals
/// each of `values`
pub fn count_by_attr<const N: usize>(
    parent: &XmlNode,
    tag: &str,
    key: &str,
    values: [&str; N],
) -> [usize; N] {
    let mut counts = [0usize; N];
    for child in parent.children_named(tag) {
        if let Some(value) = child.attr(key) {
            if let Some(i) = values.iter().position(|v| *v == value) {
                counts[i] += 1;
            }
        }
    }
    counts
}

/// Count direct children of `parent` by tag
pub fn count_by_tag<const N: usize>(parent: &XmlNode, tags: [&str; N]) -> [usize; N] {
    let mut counts = [0usize; N];
    for child in &parent.children {
        if let Some(i) = tags.iter().position(|t| *t == child.name) {
            counts[i] += 1;
        }
    }
    counts
}
