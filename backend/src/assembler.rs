//! Turns one `<book>` element into a [`Book`]
//!
//! Chapter numbers come from the book's `<c id="..">` markers when it has
//! any, otherwise from the chapters its verses were seen in. Either way every
//! chapter that received verses is kept, and a declared chapter without
//! verses is written as an empty chapter.

use std::collections::{BTreeMap, BTreeSet};

use crate::accumulator::{BookContent, VerseAccumulator};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::markup::Element;
use crate::types::{Book, Chapter, DEFAULT_BOOK_NAME};
use crate::walker::visit;

/// A converted book with what was noticed along the way.
#[derive(Debug)]
pub struct AssembledBook {
    pub code: String,
    pub book: Book,
    pub diagnostics: Vec<Diagnostic>,
}

impl AssembledBook {
    pub fn verse_count(&self) -> usize {
        self.book.chapters.values().map(|c| c.verses.len()).sum()
    }
}

/// Walk `book_el` with a fresh accumulator and build its [`Book`].
pub fn assemble_book(book_el: &Element, code: &str) -> AssembledBook {
    let mut diagnostics = Vec::new();

    let name = match book_el.find("h").map(|h| h.text.trim()).filter(|t| !t.is_empty()) {
        Some(name) => name.to_string(),
        None => {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::MissingHeader,
                Some(code),
                format!("no <h> header, using \"{}\"", DEFAULT_BOOK_NAME),
            ));
            DEFAULT_BOOK_NAME.to_string()
        }
    };

    let titles = book_el.find("toc")
        .map(|toc| toc.text.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string());

    let explicit = explicit_chapters(book_el, code, &mut diagnostics);

    let mut acc = VerseAccumulator::new(code);
    visit(book_el, false, &mut acc);
    let content = acc.finish();

    diagnostics.extend(content.diagnostics.iter().cloned());
    let chapters = assemble_chapters(content, &explicit);

    AssembledBook {
        code: code.to_string(),
        book: Book { name, chapters, titles },
        diagnostics,
    }
}

/// Numbers of the `<c>` markers directly under the book, deduplicated.
pub fn explicit_chapters(book_el: &Element, code: &str, diagnostics: &mut Vec<Diagnostic>) -> BTreeSet<u32> {
    let mut chapters = BTreeSet::new();

    for marker in book_el.find_all("c") {
        match marker.attr("id").map(|id| id.trim().parse::<u32>()) {
            Some(Ok(number)) => {
                chapters.insert(number);
            }
            Some(Err(_)) => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::InvalidChapterMarker,
                    Some(code),
                    format!("<c id=\"{}\"> is not a chapter number", marker.attr("id").unwrap_or_default()),
                ));
            }
            None => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::InvalidChapterMarker,
                    Some(code),
                    "<c> without id".to_string(),
                ));
            }
        }
    }

    chapters
}

/// Reconcile the chapters that received verses with the declared (or, if
/// none were declared, inferred) chapter numbers.
pub fn assemble_chapters(content: BookContent, explicit: &BTreeSet<u32>) -> BTreeMap<u32, Chapter> {
    let BookContent { mut chapters, inferred_chapters, .. } = content;

    let working = if explicit.is_empty() { &inferred_chapters } else { explicit };

    for number in working {
        chapters.entry(*number).or_default();
    }

    chapters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_markup;

    fn assemble(xml: &str) -> AssembledBook {
        let book = parse_markup(xml).unwrap();
        let code = book.attr("id").unwrap_or("TST").to_string();
        assemble_book(&book, &code)
    }

    fn chapter_numbers(book: &Book) -> Vec<u32> {
        book.chapters.keys().copied().collect()
    }

    #[test]
    fn test_header_and_toc() {
        let result = assemble(r#"<book id="GEN"><h>Genesis </h><toc level="1">The First Book of Moses, called Genesis</toc><c id="1"/></book>"#);
        assert_eq!(result.book.name, "Genesis");
        assert_eq!(result.book.titles.as_deref(), Some("The First Book of Moses, called Genesis"));
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_missing_header_uses_default() {
        let result = assemble(r#"<book id="GEN"><h>  </h><toc/></book>"#);
        assert_eq!(result.book.name, "No Title");
        assert_eq!(result.book.titles, None);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::MissingHeader);
    }

    #[test]
    fn test_explicit_chapters_are_filled() {
        let result = assemble(r#"<book id="OBA"><h>Obadiah</h><c id="1"/><c id="2"/><c id="2"/><v bcv="OBA.1.1"/>Vision<ve/></book>"#);
        assert_eq!(chapter_numbers(&result.book), vec![1, 2]);
        assert_eq!(result.book.chapters[&1].verses.len(), 1);
        assert!(result.book.chapters[&2].verses.is_empty());
    }

    #[test]
    fn test_chapters_inferred_without_markers() {
        let xml = r#"<book id="TST"><h>T</h>
            <v bcv="TST.1.1"/>a<ve/><v bcv="TST.1.2"/>b<ve/>
            <v bcv="TST.3.1"/>c<ve/>
        </book>"#;
        let result = assemble(xml);
        assert_eq!(chapter_numbers(&result.book), vec![1, 3]);
        assert_eq!(result.book.chapters[&1].verses.len(), 2);
        assert_eq!(result.book.chapters[&3].verses.len(), 1);
        assert_eq!(result.verse_count(), 3);
    }

    #[test]
    fn test_chapters_with_verses_outside_markers_are_kept() {
        let result = assemble(r#"<book id="TST"><h>T</h><c id="1"/><v bcv="TST.2.1"/>x<ve/></book>"#);
        assert_eq!(chapter_numbers(&result.book), vec![1, 2]);
    }

    #[test]
    fn test_invalid_chapter_markers_are_skipped() {
        let result = assemble(r#"<book id="TST"><h>T</h><c id="one"/><c/><c id=" 4 "/></book>"#);
        assert_eq!(chapter_numbers(&result.book), vec![4]);
        let invalid = result.diagnostics.iter()
            .filter(|d| d.kind == DiagnosticKind::InvalidChapterMarker)
            .count();
        assert_eq!(invalid, 2);
    }

    #[test]
    fn test_unterminated_verse_only_infers_chapter() {
        let with_open = assemble(r#"<book id="TST"><h>T</h><v bcv="TST.1.1"/>a<ve/><v bcv="TST.1.2"/>dangling</book>"#);
        let without = assemble(r#"<book id="TST"><h>T</h><v bcv="TST.1.1"/>a<ve/>dangling</book>"#);
        assert_eq!(with_open.book, without.book);
    }

    #[test]
    fn test_unterminated_verse_in_new_chapter_adds_nothing() {
        let with_open = assemble(r#"<book id="TST"><h>T</h><v bcv="TST.1.1"/>a<ve/><v bcv="TST.2.1"/>dangling</book>"#);
        let without = assemble(r#"<book id="TST"><h>T</h><v bcv="TST.1.1"/>a<ve/>dangling</book>"#);
        assert_eq!(with_open.book, without.book);
        assert_eq!(chapter_numbers(&with_open.book), vec![1]);

        let reopened = assemble(r#"<book id="TST"><h>T</h><v bcv="TST.3.1"/>lost<v bcv="TST.1.1"/>a<ve/></book>"#);
        assert_eq!(chapter_numbers(&reopened.book), vec![1]);
    }

    #[test]
    fn test_chapter_numbers_sorted_numerically() {
        let result = assemble(r#"<book id="PSA"><h>Psalms</h><c id="10"/><c id="9"/><c id="100"/></book>"#);
        assert_eq!(chapter_numbers(&result.book), vec![9, 10, 100]);

        let json = serde_json::to_string(&result.book).unwrap();
        let nine = json.find("\"9\"").unwrap();
        let ten = json.find("\"10\"").unwrap();
        let hundred = json.find("\"100\"").unwrap();
        assert!(nine < ten && ten < hundred);
    }
}
