//! Key-phrase extraction client (Language REST API v3.1).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tally_config::TextAnalyticsConfig;

use crate::KeyPhraseExtraction;
use crate::error::ServiceError;
use crate::http::{build_client, check_response, join_url};

/// Most texts accepted per key-phrase request.
pub const MAX_TEXTS_PER_CALL: usize = 10;

const KEY_PHRASES_PATH: &str = "text/analytics/v3.1/keyPhrases";

/// Extraction outcome for one submitted text, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPhrases {
    Extracted(Vec<String>),
    /// The service rejected this text (e.g. too long) but not the call.
    Failed { code: String, message: String },
}

#[derive(Serialize)]
struct RequestDocument<'a> {
    id: String,
    language: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct KeyPhraseResponse {
    #[serde(default)]
    documents: Vec<DocumentPhrases>,
    #[serde(default)]
    errors: Vec<DocumentError>,
}

#[derive(Deserialize)]
struct DocumentPhrases {
    id: String,
    #[serde(rename = "keyPhrases")]
    key_phrases: Vec<String>,
}

#[derive(Deserialize)]
struct DocumentError {
    id: String,
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

#[derive(Debug, Clone)]
pub struct KeyPhraseClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    language: String,
}

impl KeyPhraseClient {
    /// # Errors
    ///
    /// Returns [`ServiceError::Http`] if the HTTP client cannot be built.
    pub fn from_config(
        config: &TextAnalyticsConfig,
        timeout: std::time::Duration,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            http: build_client(timeout)?,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        })
    }
}

#[async_trait]
impl KeyPhraseExtraction for KeyPhraseClient {
    async fn extract(&self, texts: &[&str]) -> Result<Vec<KeyPhrases>, ServiceError> {
        if texts.len() > MAX_TEXTS_PER_CALL {
            return Err(ServiceError::BatchTooLarge {
                len: texts.len(),
                max: MAX_TEXTS_PER_CALL,
            });
        }
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let documents: Vec<RequestDocument<'_>> = texts
            .iter()
            .enumerate()
            .map(|(idx, text)| RequestDocument {
                id: idx.to_string(),
                language: &self.language,
                text,
            })
            .collect();

        let resp = self
            .http
            .post(join_url(&self.endpoint, KEY_PHRASES_PATH))
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .json(&serde_json::json!({ "documents": documents }))
            .send()
            .await?;
        let data: KeyPhraseResponse = check_response(resp).await?.json().await?;
        Ok(order_results(data, texts.len()))
    }
}

/// Place each per-document result at the index its id names.
fn order_results(data: KeyPhraseResponse, len: usize) -> Vec<KeyPhrases> {
    let mut results = vec![
        KeyPhrases::Failed {
            code: "MissingResult".into(),
            message: "no result returned for this text".into(),
        };
        len
    ];
    let slot = |id: &str| id.parse::<usize>().ok().filter(|idx| *idx < len);

    for doc in data.documents {
        if let Some(idx) = slot(&doc.id) {
            results[idx] = KeyPhrases::Extracted(doc.key_phrases);
        }
    }
    for err in data.errors {
        if let Some(idx) = slot(&err.id) {
            results[idx] = KeyPhrases::Failed {
                code: err.error.code,
                message: err.error.message,
            };
        }
    }
    results
}
