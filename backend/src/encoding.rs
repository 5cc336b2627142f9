//! Reading USFX sources from disk
//!
//! USFX files in the wild come as UTF-8 with or without a BOM, and
//! occasionally as UTF-16 exported from Windows tools.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use crate::logger;

/// Read a markup file, detect its encoding and return UTF-8 with Unix line endings.
pub fn read_markup_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)
        .with_context(|| format!("Failed to open file: {:?}", path))?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .with_context(|| format!("Failed to read file: {:?}", path))?;

    let text = decode_markup(&bytes, &path.display().to_string());
    Ok(text)
}

/// Decode raw bytes, honoring a BOM if there is one. `label` is only used for logging.
pub fn decode_markup(bytes: &[u8], label: &str) -> String {
    let (encoding, bom_len) = detect_encoding(bytes);

    logger::debug(&format!(
        "File: {}, Encoding: {}, BOM: {}",
        label,
        encoding.name(),
        bom_len > 0
    ));

    let (decoded, _encoding_used, had_errors) = encoding.decode(&bytes[bom_len..]);

    if had_errors {
        logger::warn(&format!("Encoding errors detected while decoding {}", label));
    }

    decoded.replace("\r\n", "\n")
}

/// Detect the encoding from the BOM. Returns the encoding and the BOM length in bytes.
fn detect_encoding(bytes: &[u8]) -> (&'static Encoding, usize) {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return (UTF_16LE, 2);
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return (UTF_16BE, 2);
    }
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return (UTF_8, 3);
    }
    // No BOM, assume UTF-8
    (UTF_8, 0)
}
