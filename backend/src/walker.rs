//! Depth-first traversal of a USFX `<book>` subtree

use crate::accumulator::VerseAccumulator;
use crate::diagnostics::DiagnosticKind;
use crate::helpers::{compact_whitespace, parse_bcv};
use crate::markup::Element;

/// The USFX elements the walker treats specially.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// `<p style="..">`, paragraph-level style scope
    Paragraph,
    /// `<v bcv="GEN.1.1"/>`
    VerseStart,
    /// `<ve/>`
    VerseEnd,
    /// `<w s="H7225">`, word with a Strong's number
    Word,
    /// `<f>`, footnote
    Footnote,
    Other,
}

impl ElementKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "p" => ElementKind::Paragraph,
            "v" => ElementKind::VerseStart,
            "ve" => ElementKind::VerseEnd,
            "w" => ElementKind::Word,
            "f" => ElementKind::Footnote,
            _ => ElementKind::Other,
        }
    }
}

/// Visit `element` and its subtree, feeding verse content into `acc`.
///
/// `inside_footnote` is true for everything below an `<f>`: that text
/// belongs to the footnote, never to the verse body.
pub fn visit(element: &Element, inside_footnote: bool, acc: &mut VerseAccumulator) {
    let kind = ElementKind::from_tag(&element.tag);
    let mut saved_block = None;

    match kind {
        ElementKind::Paragraph => {
            let style = element.attr("style")
                .filter(|s| !s.is_empty())
                .or_else(|| element.attr("sfm"))
                .filter(|s| !s.is_empty());
            if let Some(style) = style {
                saved_block = Some(acc.set_block(Some(style.to_string())));
            }
            acc.append_text(&element.text, inside_footnote);
        }

        ElementKind::VerseStart => {
            match element.attr("bcv").and_then(parse_bcv) {
                Some((chapter, verse)) => acc.begin_verse(chapter, verse),
                None => {
                    let bcv = element.attr("bcv").unwrap_or("");
                    acc.report(DiagnosticKind::MalformedLocation, format!("<v> with bcv=\"{}\" ignored", bcv));
                }
            }
        }

        ElementKind::VerseEnd => {
            acc.end_verse();
        }

        ElementKind::Word => {
            acc.record_word(&element.text, element.attr("s"), inside_footnote);
            acc.append_text(&element.text, inside_footnote);
        }

        ElementKind::Footnote => {
            // A nested <f> is already part of the enclosing footnote's text.
            if acc.is_open() && !inside_footnote {
                acc.record_footnote(compact_whitespace(&element.itertext()));
            }
        }

        ElementKind::Other => {
            acc.append_text(&element.text, inside_footnote);
        }
    }

    let child_inside_footnote = inside_footnote || kind == ElementKind::Footnote;
    for child in &element.children {
        visit(child, child_inside_footnote, acc);
    }

    acc.append_text(&element.tail, inside_footnote);

    if let Some(previous) = saved_block {
        acc.set_block(previous);
    }
}
