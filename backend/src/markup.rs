//! Element tree for USFX markup
//!
//! The converter works on a fully materialized tree, not on the event stream:
//! each node keeps its own direct text and the "tail" text that follows it up
//! to the next sibling, so inline markers like `<w>` or `<f>` can interrupt a
//! verse's text without losing the words after them.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::errors::ConvertError;

/// Deepest element nesting accepted. The tree is walked recursively, so
/// anything deeper is rejected while parsing.
pub const MAX_DEPTH: usize = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    /// Text before the first child.
    pub text: String,
    /// Text after this element's end tag, before the next sibling.
    pub tail: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// First direct child with the given tag.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All direct children with the given tag, in document order.
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// All text inside this element, depth-first: own text, then each
    /// child's text and tail. The element's own tail is not included.
    pub fn itertext(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
            out.push_str(&child.tail);
        }
    }
}

/// Parse markup into an element tree rooted at the document element.
pub fn parse_markup(content: &str) -> Result<Element, ConvertError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                check_depth(&stack, position)?;
                let element = start_element(e, position)?;
                stack.push(element);
            }
            Ok(Event::Empty(ref e)) => {
                check_depth(&stack, position)?;
                let element = start_element(e, position)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack.pop()
                    .ok_or_else(|| ConvertError::Unbalanced(format!("unexpected end tag at position {}", position)))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape()
                    .map_err(|source| ConvertError::Xml { position, source })?;
                push_text(&mut stack, &text);
            }
            Ok(Event::CData(ref e)) => {
                push_text(&mut stack, &String::from_utf8_lossy(e));
            }
            Ok(Event::Eof) => break,
            Err(source) => return Err(ConvertError::Xml { position: reader.buffer_position(), source }),
            // Declarations, comments, processing instructions and doctype carry no content.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ConvertError::Unbalanced(format!("element <{}> is never closed", open.tag)));
    }

    root.ok_or_else(|| ConvertError::Unbalanced("document has no root element".to_string()))
}

fn check_depth(stack: &[Element], position: u64) -> Result<(), ConvertError> {
    if stack.len() >= MAX_DEPTH {
        return Err(ConvertError::TooDeep { limit: MAX_DEPTH, position });
    }
    Ok(())
}

fn start_element(e: &BytesStart, position: u64) -> Result<Element, ConvertError> {
    let mut element = Element::new(&String::from_utf8_lossy(e.name().as_ref()));

    for attr in e.attributes() {
        let attr = attr.map_err(|source| ConvertError::Attribute { position, source })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()
            .map_err(|source| ConvertError::Xml { position, source })?
            .into_owned();
        element.attributes.insert(key, value);
    }

    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<(), ConvertError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(ConvertError::Unbalanced(format!(
            "second top-level element <{}>", element.tag
        ))),
    }
}

/// Text goes to the open element's text if it has no children yet,
/// otherwise to the tail of its last child. Text outside the root is dropped.
fn push_text(stack: &mut [Element], text: &str) {
    if let Some(parent) = stack.last_mut() {
        match parent.children.last_mut() {
            Some(last) => last.tail.push_str(text),
            None => parent.text.push_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_tail() {
        let xml = r#"<p>Before <w s="H1">word</w> after<f>note</f> end</p>"#;
        let root = parse_markup(xml).unwrap();

        assert_eq!(root.tag, "p");
        assert_eq!(root.text, "Before ");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].text, "word");
        assert_eq!(root.children[0].tail, " after");
        assert_eq!(root.children[0].attr("s"), Some("H1"));
        assert_eq!(root.children[1].tail, " end");
        assert_eq!(root.tail, "");
    }

    #[test]
    fn test_empty_elements_and_entities() {
        let xml = "<usfx><book id=\"GEN\"><v bcv=\"GEN.1.1\"/>In &amp; out&#x2014;<ve/></book></usfx>";
        let root = parse_markup(xml).unwrap();
        let book = root.find("book").unwrap();

        assert_eq!(book.attr("id"), Some("GEN"));
        assert_eq!(book.children[0].tag, "v");
        assert_eq!(book.children[0].tail, "In & out\u{2014}");
        assert_eq!(book.children[1].tag, "ve");
    }

    #[test]
    fn test_itertext_excludes_own_tail() {
        let xml = "<f>1:1 <fr>x</fr>Or, <fq>beginning</fq>.</f>";
        let mut root = parse_markup(xml).unwrap();
        root.tail = "ignored".to_string();
        assert_eq!(root.itertext(), "1:1 xOr, beginning.");
    }

    #[test]
    fn test_find_and_find_all() {
        let xml = r#"<book><h>Genesis</h><c id="1"/><p/><c id="2"/></book>"#;
        let root = parse_markup(xml).unwrap();

        assert_eq!(root.find("h").map(|h| h.text.as_str()), Some("Genesis"));
        assert!(root.find("toc").is_none());
        let ids: Vec<_> = root.find_all("c").filter_map(|c| c.attr("id")).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_declaration_and_comments_are_skipped() {
        let xml = "<?xml version=\"1.0\"?>\n<!-- header -->\n<usfx>a<!-- c -->b</usfx>";
        let root = parse_markup(xml).unwrap();
        assert_eq!(root.tag, "usfx");
        assert_eq!(root.text, "ab");
    }

    #[test]
    fn test_mismatched_end_tag_is_error() {
        assert!(parse_markup("<usfx><book></usfx>").is_err());
    }

    #[test]
    fn test_unclosed_element_is_error() {
        assert!(parse_markup("<usfx><book>").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}{}", "<p>".repeat(depth), "</p>".repeat(depth));

        let root = parse_markup(&nested(MAX_DEPTH)).unwrap();
        assert_eq!(root.tag, "p");

        let err = parse_markup(&nested(MAX_DEPTH + 1)).unwrap_err();
        assert!(matches!(err, ConvertError::TooDeep { limit: MAX_DEPTH, .. }));
    }

    #[test]
    fn test_empty_document_is_error() {
        let err = parse_markup("   ").unwrap_err();
        assert!(matches!(err, ConvertError::Unbalanced(_)));
    }
}
