use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::DocumentError;
use crate::models::{RawFields, RawNode};
use crate::normalizers::normalize_whitespace;

/// Read an XML file into a raw tree
pub fn parse_xml_file(path: &Path) -> Result<RawFields> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_xml_str(&content).with_context(|| format!("Failed to parse XML file: {:?}", path))
}

/// Parse an XML document into a raw tree rooted at the document level
///
/// The returned fields hold a single entry: the root element. Attributes,
/// comments and processing instructions are dropped and every text value
/// is whitespace-normalized.
pub fn parse_xml_str(xml: &str) -> Result<RawFields, DocumentError> {
    if xml.trim().is_empty() {
        return Err(DocumentError::Empty);
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    // the bottom frame collects the root element
    let mut stack = vec![Frame::new(String::new())];

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Frame::new(element_name(&start))),
            Event::Empty(start) => {
                current(&mut stack)?
                    .fields
                    .push_child(element_name(&start), RawNode::Text(String::new()));
            }
            Event::Text(text) => current(&mut stack)?.text.push_str(&text.unescape()?),
            Event::CData(data) => current(&mut stack)?
                .text
                .push_str(&String::from_utf8_lossy(&data.into_inner())),
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.local_name().as_ref()).into_owned();
                let closed = match stack.pop() {
                    Some(frame) if !stack.is_empty() => frame,
                    _ => return Err(DocumentError::Unbalanced(name)),
                };
                let (name, node) = closed.finish();
                current(&mut stack)?.fields.push_child(name, node);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match stack.pop() {
        Some(document) if stack.is_empty() => Ok(document.fields),
        Some(unclosed) => Err(DocumentError::Unbalanced(unclosed.name)),
        None => Err(DocumentError::Empty),
    }
}

/// An element being read: its children so far and its text content
struct Frame {
    name: String,
    fields: RawFields,
    text: String,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            fields: RawFields::new(),
            text: String::new(),
        }
    }

    /// Elements with children become objects, the others text
    fn finish(self) -> (String, RawNode) {
        let node = if self.fields.is_empty() {
            RawNode::Text(normalize_whitespace(&self.text))
        } else {
            RawNode::Map(self.fields)
        };
        (self.name, node)
    }
}

fn current(stack: &mut [Frame]) -> Result<&mut Frame, DocumentError> {
    stack
        .last_mut()
        .ok_or_else(|| DocumentError::Unbalanced(String::new()))
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

/// Parse an XML fragment and return the fields of its root element
#[cfg(test)]
pub(crate) fn raw_fields(xml: &str) -> RawFields {
    let mut document = parse_xml_str(xml).expect("valid test XML");
    match document.take_first() {
        Some((_, node)) => node.into_fields().expect("root element with children"),
        None => RawFields::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_elements() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <RCS-A_IMMAT xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
                <parution>20210042</parution>
                <dateParution>2021-03-01</dateParution>
                <listeAvis>
                    <avis><numeroAnnonce>1</numeroAnnonce></avis>
                    <avis><numeroAnnonce>2</numeroAnnonce></avis>
                </listeAvis>
            </RCS-A_IMMAT>"#;

        let mut document = parse_xml_str(xml).unwrap();
        let mut root = document.take_fields("RCS-A_IMMAT").unwrap();

        assert_eq!(root.take_text("parution").as_deref(), Some("20210042"));
        let mut liste = root.take_fields("listeAvis").unwrap();
        let avis = liste.take_list("avis").unwrap();
        assert_eq!(avis.len(), 2);
        assert!(document.is_empty());
    }

    #[test]
    fn test_text_is_whitespace_normalized_and_unescaped() {
        let fields = raw_fields(
            "<avis><denomination>  SARL   Dupont &amp; Fils\n </denomination><note><![CDATA[a < b]]></note></avis>",
        );

        assert_eq!(
            fields.get("denomination").and_then(RawNode::as_text),
            Some("SARL Dupont & Fils")
        );
        assert_eq!(fields.get("note").and_then(RawNode::as_text), Some("a < b"));
    }

    #[test]
    fn test_empty_element_is_blank_text() {
        let fields = raw_fields("<typeAnnonce><annulation/></typeAnnonce>");
        assert_eq!(fields.get("annulation"), Some(&RawNode::Text(String::new())));
    }

    #[test]
    fn test_attributes_are_ignored() {
        let fields = raw_fields(r#"<capital devise="EUR"><montantCapital>1000</montantCapital></capital>"#);
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["montantCapital"]);
    }

    #[test]
    fn test_empty_document() {
        assert!(matches!(parse_xml_str("  \n"), Err(DocumentError::Empty)));
    }

    #[test]
    fn test_malformed_document() {
        assert!(parse_xml_str("<a><b></a>").is_err());
        assert!(parse_xml_str("<a><b>text</b>").is_err());
    }
}
