//! Category discovery over the whole index.
//!
//! Documents are fetched with a match-all query and processed in batches.
//! Each batch contributes labels to a [`CategoryTally`]; the most frequent
//! labels are returned with ties in first-encounter order.

use std::time::Duration;

use serde::Deserialize;
use tally_core::{CategoryCount, CategoryTally, combine_contents};
use tally_services::{
    ChatCompletion, ChatRequest, DocumentSearch, KeyPhraseExtraction, KeyPhrases, MATCH_ALL,
    MAX_TEXTS_PER_CALL, RetryPolicy, SearchHit,
};

use crate::error::PipelineError;

const DISCOVERY_SYSTEM_PROMPT: &str = "You are an AI assistant that classifies incident reports. \
Respond only with a JSON object of the form {\"categories\": [\"category\", ...]}.";

const DISCOVERY_MAX_TOKENS: u32 = 500;

#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Documents fetched from the index.
    pub scan_limit: u32,
    pub batch_size: usize,
    /// Categories returned.
    pub top_n: usize,
    /// Pause before each completion batch after the first.
    pub batch_delay: Duration,
}

#[derive(Deserialize)]
struct CategoriesAnswer {
    categories: Vec<String>,
}

async fn scan<S>(search: &S, options: &DiscoveryOptions) -> Result<Vec<SearchHit>, PipelineError>
where
    S: DocumentSearch + ?Sized,
{
    let hits = search.search(MATCH_ALL, options.scan_limit).await?;
    tracing::info!(documents = hits.len(), "scanned index");
    Ok(hits)
}

/// Aggregate lower-cased key phrases across all documents.
///
/// Batches are capped at the key-phrase service limit. A failed batch or a
/// rejected text is logged and skipped.
///
/// # Errors
///
/// Returns [`PipelineError::Service`] if the match-all search fails.
pub async fn discover_key_phrases<S, K>(
    search: &S,
    phrases: &K,
    options: &DiscoveryOptions,
) -> Result<Vec<CategoryCount>, PipelineError>
where
    S: DocumentSearch + ?Sized,
    K: KeyPhraseExtraction + ?Sized,
{
    let hits = scan(search, options).await?;
    let batch_size = options.batch_size.clamp(1, MAX_TEXTS_PER_CALL);
    let mut tally = CategoryTally::new();

    for (batch_no, batch) in hits.chunks(batch_size).enumerate() {
        let texts: Vec<&str> = batch.iter().map(|hit| hit.content.as_str()).collect();
        let results = match phrases.extract(&texts).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(batch = batch_no, error = %e, "key-phrase batch failed, skipping");
                continue;
            }
        };
        for result in results {
            match result {
                KeyPhrases::Extracted(found) => {
                    tally.extend(found.iter().map(|phrase| phrase.to_lowercase()));
                }
                KeyPhrases::Failed { code, message } => {
                    tracing::warn!(batch = batch_no, %code, %message, "key-phrase extraction rejected text");
                }
            }
        }
    }

    tracing::info!(distinct = tally.len(), "key-phrase discovery complete");
    Ok(tally.top(options.top_n))
}

/// Build the category request for one batch of report texts.
#[must_use]
pub fn categories_request(combined: &str) -> ChatRequest {
    ChatRequest {
        system: DISCOVERY_SYSTEM_PROMPT.to_string(),
        user: format!(
            "Identify the distinct incident categories described in the following incident \
             reports. Use short lower-case names and list each category once.\n\n\
             Incident reports:\n{combined}"
        ),
        temperature: 0.0,
        max_tokens: DISCOVERY_MAX_TOKENS,
        json_mode: true,
    }
}

/// Ask the chat model for categories per batch and aggregate them.
///
/// Each completion is retried per `retry`. A batch that still fails, or
/// whose answer is not a `{"categories": [...]}` object, is skipped.
///
/// # Errors
///
/// Returns [`PipelineError::Service`] if the match-all search fails.
pub async fn discover_categories<S, C>(
    search: &S,
    chat: &C,
    retry: &RetryPolicy,
    options: &DiscoveryOptions,
) -> Result<Vec<CategoryCount>, PipelineError>
where
    S: DocumentSearch + ?Sized,
    C: ChatCompletion + ?Sized,
{
    let hits = scan(search, options).await?;
    let mut tally = CategoryTally::new();

    for (batch_no, batch) in hits.chunks(options.batch_size.max(1)).enumerate() {
        if batch_no > 0 {
            tokio::time::sleep(options.batch_delay).await;
        }
        let contents: Vec<&str> = batch.iter().map(|hit| hit.content.as_str()).collect();
        let request = categories_request(&combine_contents(&contents));

        let answer = match retry
            .run("category discovery", || chat.complete(&request))
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(batch = batch_no, error = %e, "completion failed, skipping batch");
                continue;
            }
        };
        match serde_json::from_str::<CategoriesAnswer>(&answer) {
            Ok(parsed) => {
                tracing::debug!(batch = batch_no, categories = parsed.categories.len(), "batch classified");
                tally.extend(parsed.categories);
            }
            Err(e) => {
                tracing::warn!(batch = batch_no, error = %e, "unparseable categories answer, skipping batch");
            }
        }
    }

    tracing::info!(distinct = tally.len(), "model discovery complete");
    Ok(tally.top(options.top_n))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tally_services::ServiceError;

    use super::*;
    use crate::fakes::{FakeChat, FakePhrases, FakeSearch};

    fn options(batch_size: usize, top_n: usize) -> DiscoveryOptions {
        DiscoveryOptions {
            scan_limit: 1000,
            batch_size,
            top_n,
            batch_delay: Duration::ZERO,
        }
    }

    fn pairs(counts: &[CategoryCount]) -> Vec<(&str, u64)> {
        counts.iter().map(|c| (c.label.as_str(), c.count)).collect()
    }

    #[tokio::test]
    async fn model_aggregation_is_order_stable() {
        let search = FakeSearch::with(&["r1", "r2", "r3", "r4"]);
        let chat = FakeChat::scripted(&[
            r#"{"categories": ["a", "b"]}"#,
            r#"{"categories": ["a", "c"]}"#,
        ]);
        let top = discover_categories(&search, &chat, &RetryPolicy::immediate(5), &options(2, 2))
            .await
            .unwrap();

        assert_eq!(pairs(&top), [("a", 2), ("b", 1)]);
        assert_eq!(chat.calls(), 2);
        assert!(chat.requests.lock().unwrap().iter().all(|r| r.json_mode));
        assert_eq!(search.queries.lock().unwrap()[0], ("*".to_string(), 1000));
    }

    #[tokio::test]
    async fn unparseable_batch_is_skipped() {
        let search = FakeSearch::with(&["r1", "r2"]);
        let chat = FakeChat::scripted(&["categories: fire", r#"{"categories": ["fire"]}"#]);
        let top = discover_categories(&search, &chat, &RetryPolicy::immediate(5), &options(1, 20))
            .await
            .unwrap();
        assert_eq!(pairs(&top), [("fire", 1)]);
    }

    #[tokio::test]
    async fn completion_is_retried() {
        let search = FakeSearch::with(&["r1"]);
        let chat = FakeChat {
            fail_first: 2,
            ..FakeChat::answering(r#"{"categories": ["flood"]}"#)
        };
        let top = discover_categories(&search, &chat, &RetryPolicy::immediate(5), &options(10, 20))
            .await
            .unwrap();

        assert_eq!(chat.calls(), 3);
        assert_eq!(pairs(&top), [("flood", 1)]);
    }

    #[tokio::test]
    async fn exhausted_retries_skip_the_batch() {
        let search = FakeSearch::with(&["r1"]);
        let chat = FakeChat {
            fail_first: usize::MAX,
            ..FakeChat::default()
        };
        let top = discover_categories(&search, &chat, &RetryPolicy::immediate(5), &options(10, 20))
            .await
            .unwrap();

        assert_eq!(chat.calls(), 5);
        assert!(top.is_empty());
    }

    #[tokio::test]
    async fn empty_index_makes_no_completion_calls() {
        let search = FakeSearch::default();
        let chat = FakeChat::answering("{}");
        let top = discover_categories(&search, &chat, &RetryPolicy::immediate(5), &options(10, 20))
            .await
            .unwrap();
        assert!(top.is_empty());
        assert_eq!(chat.calls(), 0);
    }

    #[tokio::test]
    async fn search_failure_is_an_error() {
        let search = FakeSearch::failing();
        let chat = FakeChat::default();
        let result =
            discover_categories(&search, &chat, &RetryPolicy::immediate(5), &options(10, 20)).await;
        assert!(matches!(result, Err(PipelineError::Service(_))));
    }

    #[tokio::test]
    async fn key_phrases_are_lower_cased_and_ranked() {
        let search = FakeSearch::with(&["r1", "r2", "r3"]);
        let phrases = FakePhrases::scripted(vec![
            Ok(vec![
                KeyPhrases::Extracted(vec!["Fire".into(), "Ladder".into()]),
                KeyPhrases::Extracted(vec!["fire".into()]),
            ]),
            Ok(vec![KeyPhrases::Failed {
                code: "InvalidDocument".into(),
                message: "too long".into(),
            }]),
        ]);
        let top = discover_key_phrases(&search, &phrases, &options(2, 20))
            .await
            .unwrap();

        assert_eq!(pairs(&top), [("fire", 2), ("ladder", 1)]);
        assert_eq!(*phrases.batch_sizes.lock().unwrap(), [2, 1]);
    }

    #[tokio::test]
    async fn key_phrase_batches_are_capped_at_service_limit() {
        let contents: Vec<String> = (0..25).map(|i| format!("r{i}")).collect();
        let refs: Vec<&str> = contents.iter().map(String::as_str).collect();
        let search = FakeSearch::with(&refs);
        let phrases = FakePhrases::returning(&["x"]);
        let top = discover_key_phrases(&search, &phrases, &options(50, 20))
            .await
            .unwrap();

        assert_eq!(*phrases.batch_sizes.lock().unwrap(), [10, 10, 5]);
        assert_eq!(pairs(&top), [("x", 25)]);
    }

    #[tokio::test]
    async fn failed_key_phrase_batch_is_skipped() {
        let search = FakeSearch::with(&["r1", "r2"]);
        let phrases = FakePhrases {
            default: vec!["smoke".into()],
            ..FakePhrases::scripted(vec![Err(ServiceError::Parse("bad".into()))])
        };
        let top = discover_key_phrases(&search, &phrases, &options(1, 20))
            .await
            .unwrap();

        assert_eq!(phrases.calls(), 2);
        assert_eq!(pairs(&top), [("smoke", 1)]);
    }
}
