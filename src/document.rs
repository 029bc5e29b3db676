//! Parsed XML documents
//!
//! Every container format ends up as XML. Decoders parse it into an owned
//! [`XmlNode`] tree that keeps element order, attribute order and text, and
//! extractors walk that tree with typed helpers instead of probing for
//! properties.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

use crate::error::{DawdashError, Result};

/// Deepest element nesting accepted by the parser
///
/// Tree searches recurse once per level, so deeper documents are rejected.
pub const MAX_DEPTH: usize = 1024;

/// One XML element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    /// Qualified tag name as written (prefix kept, e.g. "x:id" style names)
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order
    pub children: Vec<XmlNode>,
    /// Concatenated text content directly inside this element
    pub text: String,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Attribute value by exact name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child element with the given tag
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given tag, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a chain of child tags, taking the first match at each step
    pub fn path(&self, steps: &[&str]) -> Option<&XmlNode> {
        steps.iter().try_fold(self, |node, step| node.child(step))
    }

    /// Trimmed text content, `None` when empty
    pub fn text(&self) -> Option<&str> {
        let text = self.text.trim();
        (!text.is_empty()).then_some(text)
    }

    /// Depth-first pre-order search, this node included
    ///
    /// Returns the first element in document order for which `pred` holds.
    pub fn find_first<F>(&self, pred: F) -> Option<&XmlNode>
    where
        F: Fn(&XmlNode) -> bool,
    {
        self.find_first_ref(&pred)
    }

    fn find_first_ref<F>(&self, pred: &F) -> Option<&XmlNode>
    where
        F: Fn(&XmlNode) -> bool,
    {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_first_ref(pred))
    }

    /// Depth-first search returning the first non-`None` projection
    pub fn find_map<T, F>(&self, f: F) -> Option<T>
    where
        F: Fn(&XmlNode) -> Option<T>,
    {
        self.find_map_ref(&f)
    }

    fn find_map_ref<T, F>(&self, f: &F) -> Option<T>
    where
        F: Fn(&XmlNode) -> Option<T>,
    {
        f(self).or_else(|| self.children.iter().find_map(|c| c.find_map_ref(f)))
    }

    /// First element in this subtree with the given tag
    pub fn find_named(&self, name: &str) -> Option<&XmlNode> {
        self.find_first(|n| n.name == name)
    }

    /// First element in this subtree whose attribute `key` equals `value`
    pub fn find_by_attr(&self, key: &str, value: &str) -> Option<&XmlNode> {
        self.find_first(|n| n.attr(key) == Some(value))
    }

    /// Number of elements in this subtree, this node included
    pub fn element_count(&self) -> usize {
        1 + self.children.iter().map(XmlNode::element_count).sum::<usize>()
    }
}

/// A parsed document: the root element
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub root: XmlNode,
}

impl XmlDocument {
    /// Parse UTF-8 XML text; `source` is only used for error messages
    pub fn parse_str(xml: &str, source: &Path) -> Result<Self> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        parse_root(xml.as_bytes(), source).map(|root| XmlDocument { root })
    }

    /// Parse raw bytes that must be UTF-8
    pub fn parse_bytes(bytes: &[u8], source: &Path) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|e| {
            DawdashError::malformed(source, format!("not valid UTF-8: {}", e))
        })?;
        Self::parse_str(text, source)
    }
}

fn parse_root(bytes: &[u8], source: &Path) -> Result<XmlNode> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    // Open elements; the finished root lands in `root`
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;
    let mut buf = Vec::new();

    loop {
        let pos = reader.buffer_position();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(DawdashError::malformed(
                        source,
                        format!("elements nested deeper than {}", MAX_DEPTH),
                    ));
                }
                let node = start_node(e, source)?;
                stack.push(node);
            }
            Ok(Event::Empty(ref e)) => {
                let node = start_node(e, source)?;
                attach(node, &mut stack, &mut root, source)?;
            }
            Ok(Event::End(_)) => {
                // Mismatched end tags are rejected by the reader itself
                let node = stack
                    .pop()
                    .ok_or_else(|| DawdashError::malformed(source, "unexpected closing tag"))?;
                attach(node, &mut stack, &mut root, source)?;
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().map_err(|err| xml_error(source, pos, err))?;
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(xml_error(source, pos, e)),
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(DawdashError::malformed(
            source,
            format!("unclosed element <{}>", open.name),
        ));
    }

    root.ok_or_else(|| DawdashError::malformed(source, "document has no root element"))
}

fn xml_error(source: &Path, pos: impl std::fmt::Display, e: impl std::fmt::Display) -> DawdashError {
    DawdashError::malformed(source, format!("XML error at byte {}: {}", pos, e))
}

fn start_node(e: &BytesStart<'_>, source: &Path) -> Result<XmlNode> {
    let mut node = XmlNode::new(String::from_utf8_lossy(e.name().as_ref()));
    for attr in e.attributes() {
        let attr = attr.map_err(|err| {
            DawdashError::malformed(source, format!("bad attribute in <{}>: {}", node.name, err))
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| DawdashError::malformed(source, err.to_string()))?
            .to_string();
        node.attributes.push((key, value));
    }
    Ok(node)
}

fn attach(
    node: XmlNode,
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    source: &Path,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => {
            return Err(DawdashError::malformed(
                source,
                format!("second root element <{}>", node.name),
            ))
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> XmlNode {
        XmlDocument::parse_str(xml, Path::new("test.xml"))
            .expect("fixture should parse")
            .root
    }

    #[test]
    fn test_parse_keeps_order_and_attributes() {
        let root = parse(r#"<?xml version="1.0"?><A x="1" y="2"><B/><C>hi</C><B n="2"/></A>"#);
        assert_eq!(root.name, "A");
        assert_eq!(root.attr("y"), Some("2"));
        let names: Vec<_> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["B", "C", "B"]);
        assert_eq!(root.children_named("B").count(), 2);
        assert_eq!(root.child("C").and_then(XmlNode::text), Some("hi"));
    }

    #[test]
    fn test_prefixed_names_are_kept() {
        let root = parse(r#"<Song xmlns:x="urn:x"><Attributes x:id="Root"/></Song>"#);
        assert!(root.find_by_attr("x:id", "Root").is_some());
    }

    #[test]
    fn test_unescapes_entities() {
        let root = parse(r#"<P name="Rock &amp; Roll">a &lt; b</P>"#);
        assert_eq!(root.attr("name"), Some("Rock & Roll"));
        assert_eq!(root.text(), Some("a < b"));
    }

    #[test]
    fn test_find_first_is_document_order() {
        let root = parse(r#"<R><A><T v="1"/></A><T v="2"/></R>"#);
        let found = root.find_named("T").unwrap();
        assert_eq!(found.attr("v"), Some("1"));
    }

    #[test]
    fn test_find_map_projects() {
        let root = parse(r#"<R><X/><Y n="7"/><Y n="8"/></R>"#);
        let n = root.find_map(|node| node.attr("n").and_then(|v| v.parse::<u32>().ok()));
        assert_eq!(n, Some(7));
    }

    #[test]
    fn test_path_walks_first_children() {
        let root = parse(r#"<A><B><C id="1"/></B><B><C id="2"/></B></A>"#);
        assert_eq!(root.path(&["B", "C"]).and_then(|c| c.attr("id")), Some("1"));
        assert!(root.path(&["B", "D"]).is_none());
    }

    #[test]
    fn test_bom_is_skipped() {
        let root = parse("\u{feff}<Project><BPM>90</BPM></Project>");
        assert_eq!(root.name, "Project");
    }

    #[test]
    fn test_rejects_broken_documents() {
        let path = Path::new("broken.xml");
        assert!(XmlDocument::parse_str("<A><B></A>", path).is_err());
        assert!(XmlDocument::parse_str("<A><B>", path).is_err());
        assert!(XmlDocument::parse_str("", path).is_err());
        assert!(XmlDocument::parse_bytes(&[0x3c, 0xff, 0xfe], path).is_err());
    }

    fn nested(depth: usize) -> String {
        format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth))
    }

    #[test]
    fn test_nesting_limit() {
        let root = parse(&nested(MAX_DEPTH));
        assert!(root.find_named("missing").is_none());
        assert_eq!(root.element_count(), MAX_DEPTH);

        let err = XmlDocument::parse_str(&nested(MAX_DEPTH + 1), Path::new("deep.xml")).unwrap_err();
        assert!(matches!(err, DawdashError::MalformedData { .. }));

        let err = XmlDocument::parse_str(&nested(200_000), Path::new("deeper.xml")).unwrap_err();
        assert!(matches!(err, DawdashError::MalformedData { .. }));
    }

    #[test]
    fn test_element_count() {
        let root = parse("<A><B/><B><C/></B></A>");
        assert_eq!(root.element_count(), 4);
    }
}
