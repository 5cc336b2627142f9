//! USFX document → [`Document`]

use std::path::Path;

use anyhow::{Context, Result};

use crate::assembler::assemble_book;
use crate::book_filter::BookFilter;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::encoding::read_markup_file;
use crate::errors::ConvertError;
use crate::logger;
use crate::markup::{parse_markup, Element};
use crate::types::{Books, Document, Metadata, DEFAULT_SCOPE, USJ_VERSION};
use crate::works::WorkInfo;

pub const USFX_ROOT_TAG: &str = "usfx";

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub filter: BookFilter,
    /// Fail the run if any diagnostic was recorded, instead of only logging it.
    pub strict: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub books_converted: usize,
    pub books_excluded: usize,
    pub books_without_code: usize,
    pub chapters: usize,
    pub verses: usize,
    pub footnotes: usize,
}

#[derive(Debug)]
pub struct ConvertedDocument {
    pub document: Document,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: ConversionStats,
}

/// Convert a parsed USFX tree. Fails only if the root is not `<usfx>`, or
/// in strict mode when something had to be recovered.
pub fn convert_document(
    root: &Element,
    work: &WorkInfo,
    options: &ConvertOptions,
) -> Result<ConvertedDocument, ConvertError> {
    if root.tag != USFX_ROOT_TAG {
        return Err(ConvertError::NotUsfx { found: root.tag.clone() });
    }

    let mut books = Books::new();
    let mut diagnostics = Vec::new();
    let mut stats = ConversionStats::default();

    for (idx, book_el) in root.find_all("book").enumerate() {
        let code = book_el.attr("id").filter(|c| !c.is_empty());

        let Some(code) = code else {
            stats.books_without_code += 1;
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::MissingBookCode,
                None,
                format!("<book> #{} has no id, skipped", idx + 1),
            ));
            continue;
        };

        if !options.filter.keeps(Some(code)) {
            stats.books_excluded += 1;
            logger::debug(&format!("Skipping excluded book {}", code));
            continue;
        }

        let assembled = assemble_book(book_el, code);

        let verses = assembled.verse_count();
        let footnotes: usize = assembled.book.chapters.values()
            .flat_map(|c| c.verses.values())
            .map(|v| v.footnotes.len())
            .sum();

        logger::debug(&format!(
            "{}: {} chapters, {} verses, {} footnotes",
            code,
            assembled.book.chapters.len(),
            verses,
            footnotes
        ));

        stats.books_converted += 1;
        stats.chapters += assembled.book.chapters.len();
        stats.verses += verses;
        stats.footnotes += footnotes;

        diagnostics.extend(assembled.diagnostics);
        books.insert(assembled.code, assembled.book);
    }

    for diagnostic in &diagnostics {
        logger::warn(&diagnostic.to_string());
    }

    logger::info(&format!(
        "Converted {}: {} books, {} chapters, {} verses ({} excluded, {} without code)",
        work.id,
        stats.books_converted,
        stats.chapters,
        stats.verses,
        stats.books_excluded,
        stats.books_without_code
    ));

    if options.strict && !diagnostics.is_empty() {
        return Err(ConvertError::Strict { count: diagnostics.len() });
    }

    Ok(ConvertedDocument {
        document: new_document(work, books),
        diagnostics,
        stats,
    })
}

/// Parse and convert USFX markup.
pub fn convert_str(
    content: &str,
    work: &WorkInfo,
    options: &ConvertOptions,
) -> Result<ConvertedDocument, ConvertError> {
    let root = parse_markup(content)?;
    convert_document(&root, work, options)
}

/// Read, parse and convert a USFX file.
pub fn convert_file(input: &Path, work: &WorkInfo, options: &ConvertOptions) -> Result<ConvertedDocument> {
    let content = read_markup_file(input)?;
    let converted = convert_str(&content, work, options)
        .with_context(|| format!("Failed to convert {:?}", input))?;
    Ok(converted)
}

fn new_document(work: &WorkInfo, books: Books) -> Document {
    Document {
        usj_version: USJ_VERSION.to_string(),
        id: work.id.clone(),
        language: work.language.clone(),
        scope: DEFAULT_SCOPE.to_string(),
        metadata: Metadata {
            title: work.title.clone(),
            subtitle: None,
            publisher: None,
            license: work.license.clone(),
            copyright: None,
            source: work.source.clone(),
            created_at: None,
            revised_at: None,
        },
        books,
    }
}
