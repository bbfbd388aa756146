//! Cross-cutting error types.
//!
//! Service, configuration and report errors live in their own crates. The
//! binary converges them with `anyhow`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (file naming, empty labels).
    #[error("Validation error: {0}")]
    Validation(String),
}
