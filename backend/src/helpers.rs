use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Collapse every run of whitespace to a single space and trim the ends.
pub fn compact_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Parse a verse location of the form `WORK.chapter.verse`.
///
/// Returns `None` unless there are exactly three dot-separated fields and
/// the last two are numbers.
pub fn parse_bcv(bcv: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = bcv.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let chapter = parts[1].parse::<u32>().ok()?;
    let verse = parts[2].parse::<u32>().ok()?;
    Some((chapter, verse))
}

/// Footnotes often repeat their anchor, e.g. `"1:1 Or, In the beginning"`.
/// Strip that prefix when it names this exact verse.
pub fn strip_verse_prefix(note: &str, chapter: u32, verse: u32) -> &str {
    let prefix = format!("{}:{} ", chapter, verse);
    note.strip_prefix(prefix.as_str()).unwrap_or(note)
}
