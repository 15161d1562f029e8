//! Plain-text extraction from downloaded documents.
//!
//! Dispatches on file extension. PDFs are read page by page; XML and plain
//! text files are returned verbatim.

use std::path::Path;

use lopdf::Document;
use tracing::{debug, warn};

use crate::errors::ExtractError;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "xml", "txt"];

/// Extracts the text content of the file at `path`.
///
/// # Errors
///
/// - [`ExtractError::NotFound`] if the file does not exist
/// - [`ExtractError::Unsupported`] for extensions outside [`SUPPORTED_EXTENSIONS`]
/// - [`ExtractError::EmptyContent`] if nothing but whitespace remains
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::NotFound(path.display().to_string()));
    }

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => extract_from_pdf(path),
        "xml" | "txt" => extract_from_markup(path),
        _ => Err(ExtractError::Unsupported {
            extension: if extension.is_empty() {
                "(none)".to_string()
            } else {
                format!(".{extension}")
            },
            supported: SUPPORTED_EXTENSIONS
                .iter()
                .map(|e| format!(".{e}"))
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

fn extract_from_pdf(path: &Path) -> Result<String, ExtractError> {
    let document = Document::load(path).map_err(|e| ExtractError::Pdf(e.to_string()))?;
    let pages = document.get_pages();

    if pages.is_empty() {
        return Err(ExtractError::EmptyContent(path.display().to_string()));
    }

    let mut parts: Vec<String> = Vec::with_capacity(pages.len());
    for page_number in pages.keys() {
        match document.extract_text(&[*page_number]) {
            Ok(text) => {
                let cleaned = normalize_whitespace(&text);
                if !cleaned.is_empty() {
                    parts.push(cleaned);
                }
            }
            Err(e) => warn!("Skipping page {} of {}: {}", page_number, path.display(), e),
        }
    }

    let full_text = parts.join("\n\n");
    if full_text.trim().is_empty() {
        return Err(ExtractError::EmptyContent(path.display().to_string()));
    }

    debug!(
        "Extracted {} chars from {} PDF pages",
        full_text.chars().count(),
        pages.len()
    );
    Ok(full_text)
}

fn extract_from_markup(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|e| ExtractError::Io(e.to_string()))?;
    let content = decode_text(bytes);

    if content.trim().is_empty() {
        return Err(ExtractError::EmptyContent(path.display().to_string()));
    }
    Ok(content)
}

/// UTF-8 when valid, Latin-1 otherwise. Latin-1 maps every byte to a code
/// point, so this never fails.
#[must_use]
pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| char::from(b)).collect(),
    }
}

/// Collapses every whitespace run to a single space and trims the ends.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
