use std::fmt;

use serde::Serialize;

/// Input problems the converter recovers from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// `<v>` without a usable `bcv="WORK.chapter.verse"` attribute.
    MalformedLocation,
    /// `<ve/>` while no verse is open.
    UnmatchedVerseEnd,
    /// A verse still open when its book ends, or reopened before being closed.
    UnterminatedVerse,
    /// `<book>` without an `id`.
    MissingBookCode,
    /// `<book>` without a usable `<h>` header.
    MissingHeader,
    /// `<c>` whose `id` is missing or not a number.
    InvalidChapterMarker,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::MalformedLocation => "malformed-location",
            DiagnosticKind::UnmatchedVerseEnd => "unmatched-verse-end",
            DiagnosticKind::UnterminatedVerse => "unterminated-verse",
            DiagnosticKind::MissingBookCode => "missing-book-code",
            DiagnosticKind::MissingHeader => "missing-header",
            DiagnosticKind::InvalidChapterMarker => "invalid-chapter-marker",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub book: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, book: Option<&str>, message: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            book: book.map(|b| b.to_string()),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.book {
            Some(book) => write!(f, "[{}] {}: {}", self.kind.as_str(), book, self.message),
            None => write!(f, "[{}] {}", self.kind.as_str(), self.message),
        }
    }
}
