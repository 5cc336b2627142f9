//! USFX to USJ-rich JSON conversion
//!
//! [`converter::convert_file`] reads a USFX source, walks every retained
//! `<book>` and returns a [`types::Document`] for [`writer::write_document`].

pub mod accumulator;
pub mod assembler;
pub mod book_filter;
pub mod converter;
pub mod diagnostics;
pub mod encoding;
pub mod errors;
pub mod helpers;
pub mod logger;
pub mod markup;
pub mod types;
pub mod walker;
pub mod works;
pub mod writer;

pub use book_filter::BookFilter;
pub use converter::{convert_document, convert_file, convert_str, ConversionStats, ConvertOptions, ConvertedDocument};
pub use errors::ConvertError;
pub use types::Document;
pub use works::WorkInfo;
