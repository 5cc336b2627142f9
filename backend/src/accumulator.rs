//! Per-book verse state for the tree walker
//!
//! A verse is open between a `<v>` and the next `<ve/>`. While it is open,
//! body text, Strong's codes, footnotes and words are collected here; closing
//! it turns them into a [`Verse`] stored in the book's chapter map.

use std::collections::{BTreeMap, BTreeSet};

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::helpers::{compact_whitespace, strip_verse_prefix};
use crate::types::{Chapter, Footnote, Verse, WordEntry};

#[derive(Debug)]
pub struct VerseAccumulator {
    book_code: String,
    /// (chapter, verse) of the open verse.
    location: Option<(u32, u32)>,
    buffer: Vec<String>,
    strongs: Vec<String>,
    footnotes: Vec<String>,
    words: Vec<WordEntry>,
    block: Option<String>,
    chapters: BTreeMap<u32, Chapter>,
    /// Highest closed verse number per chapter. A verse that is never
    /// closed leaves no trace here.
    max_verse: BTreeMap<u32, u32>,
    diagnostics: Vec<Diagnostic>,
}

/// What one book's traversal produced.
#[derive(Debug, Default)]
pub struct BookContent {
    pub chapters: BTreeMap<u32, Chapter>,
    /// Chapters with at least one closed verse.
    pub inferred_chapters: BTreeSet<u32>,
    pub diagnostics: Vec<Diagnostic>,
}

impl VerseAccumulator {
    pub fn new(book_code: &str) -> Self {
        VerseAccumulator {
            book_code: book_code.to_string(),
            location: None,
            buffer: Vec::new(),
            strongs: Vec::new(),
            footnotes: Vec::new(),
            words: Vec::new(),
            block: None,
            chapters: BTreeMap::new(),
            max_verse: BTreeMap::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.location.is_some()
    }

    pub fn block(&self) -> Option<&str> {
        self.block.as_deref()
    }

    /// Replace the active block style, returning the previous one so the
    /// caller can put it back when its scope ends.
    pub fn set_block(&mut self, block: Option<String>) -> Option<String> {
        std::mem::replace(&mut self.block, block)
    }

    pub fn begin_verse(&mut self, chapter: u32, verse: u32) {
        if let Some((open_chapter, open_verse)) = self.location {
            self.report(
                DiagnosticKind::UnterminatedVerse,
                format!("verse {}:{} reopened at {}:{} before <ve/>", open_chapter, open_verse, chapter, verse),
            );
        }

        self.clear_verse();
        self.location = Some((chapter, verse));
    }

    /// Close the open verse and store it. Without an open verse this only
    /// records a diagnostic.
    pub fn end_verse(&mut self) {
        let Some((chapter, verse)) = self.location else {
            self.report(DiagnosticKind::UnmatchedVerseEnd, "<ve/> without an open verse".to_string());
            return;
        };

        let text = compact_whitespace(&self.buffer.concat());

        let footnotes = self.footnotes
            .iter()
            .enumerate()
            .map(|(idx, raw)| Footnote {
                id: format!("{}.{}.{}.{}", self.book_code, chapter, verse, idx + 1),
                text: strip_verse_prefix(raw, chapter, verse).to_string(),
            })
            .collect();

        let entry = Verse {
            text,
            block: self.block.clone(),
            strongs: std::mem::take(&mut self.strongs),
            footnotes,
            words: std::mem::take(&mut self.words),
        };

        self.chapters
            .entry(chapter)
            .or_default()
            .verses
            .insert(verse, entry);

        let max = self.max_verse.entry(chapter).or_insert(0);
        if verse > *max {
            *max = verse;
        }

        self.clear_verse();
    }

    pub fn append_text(&mut self, fragment: &str, inside_footnote: bool) {
        if self.is_open() && !inside_footnote && !fragment.is_empty() {
            self.buffer.push(fragment.to_string());
        }
    }

    /// Record a `<w>` element: its code goes to the verse's code list, its
    /// text (if not blank) becomes a word entry.
    pub fn record_word(&mut self, text: &str, code: Option<&str>, inside_footnote: bool) {
        if !self.is_open() || inside_footnote {
            return;
        }

        let code = code.filter(|c| !c.is_empty());
        if let Some(code) = code {
            self.strongs.push(code.to_string());
        }

        if !text.trim().is_empty() {
            self.words.push(WordEntry {
                w: text.to_string(),
                strongs: code.map(|c| vec![c.to_string()]).unwrap_or_default(),
            });
        }
    }

    pub fn record_footnote(&mut self, text: String) {
        if self.is_open() && !text.is_empty() {
            self.footnotes.push(text);
        }
    }

    pub fn report(&mut self, kind: DiagnosticKind, message: String) {
        let diagnostic = Diagnostic::new(kind, Some(&self.book_code), message);
        self.diagnostics.push(diagnostic);
    }

    /// End of book. A verse still open here is dropped.
    pub fn finish(mut self) -> BookContent {
        if let Some((chapter, verse)) = self.location {
            self.report(
                DiagnosticKind::UnterminatedVerse,
                format!("verse {}:{} has no <ve/> before the end of the book", chapter, verse),
            );
        }

        BookContent {
            chapters: self.chapters,
            inferred_chapters: self.max_verse.into_keys().collect(),
            diagnostics: self.diagnostics,
        }
    }

    fn clear_verse(&mut self) {
        self.location = None;
        self.buffer.clear();
        self.strongs.clear();
        self.footnotes.clear();
        self.words.clear();
    }
}
