//! Per-label count estimators.
//!
//! Both estimators retrieve the best-matching documents for a label and never
//! return an error: service failures are logged and produce an
//! [`Estimate`] with status `failed` and a count of zero.

use async_trait::async_trait;
use tally_core::{Estimate, LexicalCount, combine_contents};
use tally_services::{
    ChatCompletion, ChatRequest, DocumentSearch, KeyPhraseExtraction, KeyPhrases, SearchHit,
    ServiceError, phrase_query,
};

const COUNT_SYSTEM_PROMPT: &str = "You are an AI assistant tasked with analyzing incident reports. \
Your job is to count the number of distinct incidents related to a specific query.";

const COUNT_MAX_TOKENS: u32 = 10;

/// Something that turns a label into an [`Estimate`].
#[async_trait]
pub trait CountEstimator: Send + Sync {
    /// Short name used in logs and summaries.
    fn method(&self) -> &'static str;

    async fn estimate(&self, label: &str) -> Estimate;
}

/// Outcome of the retrieval step shared by both estimators.
enum Retrieval {
    Found(Vec<SearchHit>),
    Empty,
    Failed(ServiceError),
}

async fn retrieve<S>(search: &S, query: &str, top: u32) -> Retrieval
where
    S: DocumentSearch + ?Sized,
{
    match search.search(query, top).await {
        Ok(hits) if hits.is_empty() => Retrieval::Empty,
        Ok(hits) => Retrieval::Found(hits),
        Err(e) => Retrieval::Failed(e),
    }
}

fn combined_text(hits: &[SearchHit]) -> String {
    let contents: Vec<&str> = hits.iter().map(|hit| hit.content.as_str()).collect();
    combine_contents(&contents)
}

fn failed(label: &str, stage: &str, error: impl std::fmt::Display) -> Estimate {
    tracing::error!(label, stage, error = %error, "estimate failed");
    Estimate::failed(label, format!("{stage}: {error}"))
}

/// Substring and key-phrase counting over the retrieved documents.
pub struct LexicalEstimator<'a, S: ?Sized, K: ?Sized> {
    search: &'a S,
    phrases: &'a K,
    top: u32,
    phrase_search: bool,
}

impl<'a, S: ?Sized, K: ?Sized> LexicalEstimator<'a, S, K> {
    /// `phrase_search` quotes multi-word labels in the search query; counting
    /// always uses the raw label.
    pub const fn new(search: &'a S, phrases: &'a K, top: u32, phrase_search: bool) -> Self {
        Self {
            search,
            phrases,
            top,
            phrase_search,
        }
    }
}

#[async_trait]
impl<'a, S, K> CountEstimator for LexicalEstimator<'a, S, K>
where
    S: DocumentSearch + ?Sized,
    K: KeyPhraseExtraction + ?Sized,
{
    fn method(&self) -> &'static str {
        "lexical"
    }

    async fn estimate(&self, label: &str) -> Estimate {
        let query = if self.phrase_search {
            phrase_query(label)
        } else {
            label.to_string()
        };
        let hits = match retrieve(self.search, &query, self.top).await {
            Retrieval::Found(hits) => hits,
            Retrieval::Empty => {
                tracing::info!(label, "no documents matched");
                return Estimate::no_documents(label);
            }
            Retrieval::Failed(e) => return failed(label, "search", e),
        };
        let combined = combined_text(&hits);

        let phrases = match self.phrases.extract(&[combined.as_str()]).await {
            Ok(mut results) if !results.is_empty() => match results.swap_remove(0) {
                KeyPhrases::Extracted(phrases) => phrases,
                KeyPhrases::Failed { code, message } => {
                    tracing::warn!(label, %code, %message, "key-phrase extraction rejected text");
                    Vec::new()
                }
            },
            Ok(_) => Vec::new(),
            Err(e) => return failed(label, "key phrases", e),
        };

        let count = LexicalCount::measure(&combined, &phrases, label);
        tracing::debug!(
            label,
            documents = hits.len(),
            content_count = count.content_count,
            phrase_count = count.phrase_count,
            "lexical count"
        );
        Estimate::counted(label, count.estimate())
    }
}

/// Asks a chat model to count distinct incidents in the retrieved documents.
pub struct ModelEstimator<'a, S: ?Sized, C: ?Sized> {
    search: &'a S,
    chat: &'a C,
    top: u32,
}

impl<'a, S: ?Sized, C: ?Sized> ModelEstimator<'a, S, C> {
    pub const fn new(search: &'a S, chat: &'a C, top: u32) -> Self {
        Self { search, chat, top }
    }
}

/// Build the counting request for `label` over `combined` report text.
#[must_use]
pub fn count_request(label: &str, combined: &str) -> ChatRequest {
    ChatRequest {
        system: COUNT_SYSTEM_PROMPT.to_string(),
        user: format!(
            "Based on the following incident reports, how many distinct incidents related to \
             '{label}' can you identify? Please provide only a number as your response.\n\n\
             Incident reports:\n{combined}"
        ),
        temperature: 0.0,
        max_tokens: COUNT_MAX_TOKENS,
        json_mode: false,
    }
}

/// Parse a model answer as a non-negative integer.
fn parse_count(answer: &str) -> Option<u64> {
    answer.trim().parse().ok()
}

#[async_trait]
impl<'a, S, C> CountEstimator for ModelEstimator<'a, S, C>
where
    S: DocumentSearch + ?Sized,
    C: ChatCompletion + ?Sized,
{
    fn method(&self) -> &'static str {
        "model"
    }

    async fn estimate(&self, label: &str) -> Estimate {
        let hits = match retrieve(self.search, label, self.top).await {
            Retrieval::Found(hits) => hits,
            Retrieval::Empty => {
                tracing::info!(label, "no documents matched");
                return Estimate::no_documents(label);
            }
            Retrieval::Failed(e) => return failed(label, "search", e),
        };

        let request = count_request(label, &combined_text(&hits));
        let answer = match self.chat.complete(&request).await {
            Ok(answer) => answer,
            Err(e) => return failed(label, "completion", e),
        };
        match parse_count(&answer) {
            Some(count) => {
                tracing::debug!(label, documents = hits.len(), count, "model count");
                Estimate::counted(label, count)
            }
            None => failed(
                label,
                "completion",
                format!("answer is not a whole number: {answer:?}"),
            ),
        }
    }
}
