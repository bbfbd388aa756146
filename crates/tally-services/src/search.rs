//! Search index REST client.
//!
//! Covers the index lifecycle (delete, create), document upload, full-text
//! queries and the document count. Every request carries the `api-key`
//! header and the configured `api-version`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tally_config::SearchConfig;
use tally_core::Document;

use crate::error::ServiceError;
use crate::http::{build_client, check_response, join_url};
use crate::{DocumentIndex, DocumentSearch};

/// Most documents the index accepts in one upload request.
pub const MAX_UPLOAD_BATCH: usize = 1000;

/// Query that matches every document.
pub const MATCH_ALL: &str = "*";

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "@search.score", default)]
    pub score: f64,
    pub id: String,
    #[serde(default)]
    pub content: String,
}

/// Per-document outcome of an upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexingResult {
    pub key: String,
    pub status: bool,
    #[serde(rename = "errorMessage", default)]
    pub error_message: Option<String>,
    #[serde(rename = "statusCode", default)]
    pub status_code: u16,
}

#[derive(Deserialize)]
struct SearchResponse {
    value: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct IndexResponse {
    value: Vec<IndexingResult>,
}

#[derive(Serialize)]
struct UploadAction<'a> {
    #[serde(rename = "@search.action")]
    action: &'static str,
    id: &'a str,
    content: &'a str,
}

/// Client for one search index.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    index_name: String,
    api_version: String,
    analyzer: String,
}

impl SearchClient {
    /// # Errors
    ///
    /// Returns [`ServiceError::Http`] if the HTTP client cannot be built.
    pub fn from_config(
        config: &SearchConfig,
        timeout: std::time::Duration,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            http: build_client(timeout)?,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            index_name: config.index_name.clone(),
            api_version: config.api_version.clone(),
            analyzer: config.analyzer.clone(),
        })
    }

    #[must_use]
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    fn index_url(&self) -> String {
        join_url(
            &self.endpoint,
            &format!(
                "indexes/{}?api-version={}",
                self.index_name, self.api_version
            ),
        )
    }

    fn docs_url(&self, operation: &str) -> String {
        join_url(
            &self.endpoint,
            &format!(
                "indexes/{}/docs/{operation}?api-version={}",
                self.index_name, self.api_version
            ),
        )
    }

    fn index_definition(&self) -> serde_json::Value {
        json!({
            "name": self.index_name,
            "fields": [
                { "name": "id", "type": "Edm.String", "key": true, "searchable": false },
                {
                    "name": "content",
                    "type": "Edm.String",
                    "searchable": true,
                    "analyzer": self.analyzer,
                },
            ],
        })
    }
}

#[async_trait]
impl DocumentIndex for SearchClient {
    async fn delete_index(&self) -> Result<bool, ServiceError> {
        let resp = self
            .http
            .delete(self.index_url())
            .header("api-key", &self.api_key)
            .send()
            .await?;
        if resp.status() == 404 {
            return Ok(false);
        }
        check_response(resp).await?;
        Ok(true)
    }

    async fn create_index(&self) -> Result<(), ServiceError> {
        let resp = self
            .http
            .put(self.index_url())
            .header("api-key", &self.api_key)
            .json(&self.index_definition())
            .send()
            .await?;
        check_response(resp).await?;
        Ok(())
    }

    async fn upload(&self, documents: &[Document]) -> Result<Vec<IndexingResult>, ServiceError> {
        if documents.len() > MAX_UPLOAD_BATCH {
            return Err(ServiceError::BatchTooLarge {
                len: documents.len(),
                max: MAX_UPLOAD_BATCH,
            });
        }
        let actions: Vec<UploadAction<'_>> = documents
            .iter()
            .map(|doc| UploadAction {
                action: "upload",
                id: &doc.id,
                content: &doc.content,
            })
            .collect();

        let resp = self
            .http
            .post(self.docs_url("index"))
            .header("api-key", &self.api_key)
            .json(&json!({ "value": actions }))
            .send()
            .await?;
        let data: IndexResponse = check_response(resp).await?.json().await?;
        Ok(data.value)
    }

    async fn document_count(&self) -> Result<u64, ServiceError> {
        let resp = self
            .http
            .get(self.docs_url("$count"))
            .header("api-key", &self.api_key)
            .header(reqwest::header::ACCEPT, "text/plain")
            .send()
            .await?;
        let body = check_response(resp).await?.text().await?;
        parse_count(&body)
    }
}

#[async_trait]
impl DocumentSearch for SearchClient {
    async fn search(&self, query: &str, top: u32) -> Result<Vec<SearchHit>, ServiceError> {
        let resp = self
            .http
            .post(self.docs_url("search"))
            .header("api-key", &self.api_key)
            .json(&json!({
                "search": query,
                "top": top,
                "select": "id,content",
            }))
            .send()
            .await?;
        let data: SearchResponse = check_response(resp).await?.json().await?;
        tracing::debug!(query, top, hits = data.value.len(), "search complete");
        Ok(data.value)
    }
}

/// Parse the plain-text `$count` body, which may carry a byte-order mark.
fn parse_count(body: &str) -> Result<u64, ServiceError> {
    let trimmed = body.trim_start_matches('\u{feff}').trim();
    trimmed
        .parse()
        .map_err(|_| ServiceError::Parse(format!("document count is not a number: {trimmed:?}")))
}

/// Wrap a multi-word label in quotes so the index matches it as a phrase.
#[must_use]
pub fn phrase_query(label: &str) -> String {
    if label.split_whitespace().nth(1).is_some() {
        format!("\"{label}\"")
    } else {
        label.to_string()
    }
}
