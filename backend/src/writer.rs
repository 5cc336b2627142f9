use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::types::Document;

/// Pretty-printed JSON with two-space indentation. Non-ASCII text is
/// written as-is, not as `\u` escapes.
pub fn document_to_json(document: &Document) -> Result<String> {
    serde_json::to_string_pretty(document).context("Failed to serialize document")
}

/// Write `document` to `path`, creating parent directories as needed.
pub fn write_document(document: &Document, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let json = document_to_json(document)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
