use std::collections::BTreeSet;

/// Front/back matter and Apocrypha found in the KJV and WEBU USFX sources.
pub const DEFAULT_EXCLUDED_BOOKS: &[&str] = &[
    // Preface, glossary
    "FRT", "GLO",
    // KJV Apocrypha
    "TOB", "JDT", "ESG", "WIS", "SIR", "BAR", "S3Y", "SUS", "BEL",
    "1MA", "2MA", "1ES", "MAN", "2ES",
    // WEBU additions
    "DAG", "PS2", "3MA", "4MA",
];

/// Decides which `<book>` elements are converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFilter {
    excluded: BTreeSet<String>,
}

impl Default for BookFilter {
    fn default() -> Self {
        BookFilter::new(DEFAULT_EXCLUDED_BOOKS.iter().copied())
    }
}

impl BookFilter {
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        BookFilter {
            excluded: excluded.into_iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    /// A filter that keeps every book that has a code.
    pub fn none() -> Self {
        BookFilter { excluded: BTreeSet::new() }
    }

    pub fn exclude(&mut self, code: &str) {
        self.excluded.insert(code.to_string());
    }

    pub fn include(&mut self, code: &str) {
        self.excluded.remove(code);
    }

    pub fn is_excluded(&self, code: &str) -> bool {
        self.excluded.contains(code)
    }

    /// True if a book with this `id` attribute should be converted.
    /// Books without a code are never kept.
    pub fn keeps(&self, code: Option<&str>) -> bool {
        match code {
            Some(code) if !code.is_empty() => !self.is_excluded(code),
            _ => false,
        }
    }

    pub fn excluded(&self) -> impl Iterator<Item = &str> {
        self.excluded.iter().map(|s| s.as_str())
    }
}
