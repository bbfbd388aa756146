//! # tally-services
//!
//! HTTP clients for the three cloud services the pipeline talks to:
//! - the search index (index lifecycle, upload, query, count)
//! - key-phrase extraction
//! - chat completion
//!
//! Pipeline code depends on the traits below rather than the clients, so the
//! clients are built once by the binary and tests can substitute fakes.

pub mod chat;
pub mod key_phrases;
pub mod retry;
pub mod search;

mod error;
mod http;

pub use chat::{ChatClient, ChatRequest};
pub use error::ServiceError;
pub use key_phrases::{KeyPhraseClient, KeyPhrases, MAX_TEXTS_PER_CALL};
pub use retry::RetryPolicy;
pub use search::{
    IndexingResult, MATCH_ALL, MAX_UPLOAD_BATCH, SearchClient, SearchHit, phrase_query,
};

use async_trait::async_trait;
use tally_core::Document;

/// Ranked full-text retrieval.
#[async_trait]
pub trait DocumentSearch: Send + Sync {
    /// Return up to `top` hits for `query`, best first.
    async fn search(&self, query: &str, top: u32) -> Result<Vec<SearchHit>, ServiceError>;
}

/// Index lifecycle and ingestion.
#[async_trait]
pub trait DocumentIndex: Send + Sync {
    /// Delete the index. `Ok(false)` if it did not exist.
    async fn delete_index(&self) -> Result<bool, ServiceError>;

    async fn create_index(&self) -> Result<(), ServiceError>;

    /// Upload at most [`MAX_UPLOAD_BATCH`] documents.
    async fn upload(&self, documents: &[Document]) -> Result<Vec<IndexingResult>, ServiceError>;

    async fn document_count(&self) -> Result<u64, ServiceError>;
}

#[async_trait]
pub trait KeyPhraseExtraction: Send + Sync {
    /// Extract phrases from at most [`MAX_TEXTS_PER_CALL`] texts. Results are
    /// in input order; a per-text failure does not fail the call.
    async fn extract(&self, texts: &[&str]) -> Result<Vec<KeyPhrases>, ServiceError>;
}

#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Return the text of the first completion choice.
    async fn complete(&self, request: &ChatRequest) -> Result<String, ServiceError>;
}
