//! Documents submitted to the search index.

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// File extension of loadable corpus documents.
pub const DOCUMENT_EXTENSION: &str = ".txt";

/// A text document as stored in the search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Stable key derived from the source filename, see [`document_id`].
    pub id: String,
    pub content: String,
}

impl Document {
    /// Build a document from a corpus file name and its raw text.
    ///
    /// Content is trimmed of surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if `file_name` is not a `.txt` file.
    pub fn from_file(file_name: &str, raw: &str) -> Result<Self, CoreError> {
        Ok(Self {
            id: document_id(file_name)?,
            content: raw.trim().to_string(),
        })
    }
}

/// Derive the index key for a corpus file.
///
/// The `.txt` extension is dropped and the remaining stem is encoded as
/// padded URL-safe base64, which only uses characters the index accepts in
/// document keys.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] if the name has no `.txt` extension or
/// an empty stem.
pub fn document_id(file_name: &str) -> Result<String, CoreError> {
    let stem = file_name
        .strip_suffix(DOCUMENT_EXTENSION)
        .ok_or_else(|| CoreError::Validation(format!("not a {DOCUMENT_EXTENSION} file: {file_name}")))?;
    if stem.is_empty() {
        return Err(CoreError::Validation(format!(
            "empty document name: {file_name}"
        )));
    }
    Ok(base64::engine::general_purpose::URL_SAFE.encode(stem.as_bytes()))
}
