use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const USJ_VERSION: &str = "1.0-rich";
pub const DEFAULT_SCOPE: &str = "bible";
pub const DEFAULT_BOOK_NAME: &str = "No Title";

/// A converted work, as written to the output JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub usj_version: String,
    pub id: String,
    pub language: String,
    pub scope: String,
    pub metadata: Metadata,
    pub books: Books,
}

/// Work metadata. Unknown values are written as `null`, not omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub subtitle: Option<String>,
    pub publisher: Option<String>,
    pub license: String,
    pub copyright: Option<String>,
    pub source: String,
    pub created_at: Option<String>,
    pub revised_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub name: String,
    /// Keyed by chapter number; serde_json writes the keys as strings,
    /// the map keeps them in numeric order.
    pub chapters: BTreeMap<u32, Chapter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titles: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub verses: BTreeMap<u32, Verse>,
}

/// One verse. Optional fields are only written when they carry data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strongs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub footnotes: Vec<Footnote>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<WordEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footnote {
    /// `BOOK.chapter.verse.n`, with `n` counting from 1 within the verse.
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub w: String,
    /// Zero or one codes, for this word only.
    pub strongs: Vec<String>,
}

/// Books keyed by code, in source order.
pub type Books = IndexMap<String, Book>;
