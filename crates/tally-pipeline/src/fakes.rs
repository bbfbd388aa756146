//! In-memory service doubles that count their calls.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tally_core::Document;
use tally_services::{
    ChatCompletion, ChatRequest, DocumentIndex, DocumentSearch, IndexingResult,
    KeyPhraseExtraction, KeyPhrases, SearchHit, ServiceError,
};

pub fn hits(contents: &[&str]) -> Vec<SearchHit> {
    contents
        .iter()
        .enumerate()
        .map(|(idx, content)| SearchHit {
            score: 1.0,
            id: idx.to_string(),
            content: (*content).to_string(),
        })
        .collect()
}

fn api_error() -> ServiceError {
    ServiceError::Api {
        status: 503,
        message: "unavailable".into(),
    }
}

#[derive(Default)]
pub struct FakeSearch {
    pub hits: Vec<SearchHit>,
    pub fail: bool,
    pub calls: AtomicUsize,
    pub queries: Mutex<Vec<(String, u32)>>,
}

impl FakeSearch {
    pub fn with(contents: &[&str]) -> Self {
        Self {
            hits: hits(contents),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentSearch for FakeSearch {
    async fn search(&self, query: &str, top: u32) -> Result<Vec<SearchHit>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push((query.to_string(), top));
        if self.fail {
            return Err(api_error());
        }
        Ok(self.hits.iter().take(top as usize).cloned().collect())
    }
}

/// Returns scripted results per call; once the script runs out, every text
/// gets the `default` phrases.
#[derive(Default)]
pub struct FakePhrases {
    pub script: Mutex<Vec<Result<Vec<KeyPhrases>, ServiceError>>>,
    pub default: Vec<String>,
    pub calls: AtomicUsize,
    pub batch_sizes: Mutex<Vec<usize>>,
}

impl FakePhrases {
    pub fn returning(phrases: &[&str]) -> Self {
        Self {
            default: phrases.iter().map(ToString::to_string).collect(),
            ..Default::default()
        }
    }

    pub fn scripted(script: Vec<Result<Vec<KeyPhrases>, ServiceError>>) -> Self {
        let mut script = script;
        script.reverse();
        Self {
            script: Mutex::new(script),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyPhraseExtraction for FakePhrases {
    async fn extract(&self, texts: &[&str]) -> Result<Vec<KeyPhrases>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batch_sizes.lock().unwrap().push(texts.len());
        if let Some(next) = self.script.lock().unwrap().pop() {
            return next;
        }
        Ok(texts
            .iter()
            .map(|_| KeyPhrases::Extracted(self.default.clone()))
            .collect())
    }
}

/// Answers from a script, falling back to `default`; `fail_first` calls
/// error before any answer is given.
#[derive(Default)]
pub struct FakeChat {
    pub script: Mutex<Vec<String>>,
    pub default: String,
    pub fail_first: usize,
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl FakeChat {
    pub fn answering(answer: &str) -> Self {
        Self {
            default: answer.to_string(),
            ..Default::default()
        }
    }

    pub fn scripted(answers: &[&str]) -> Self {
        Self {
            script: Mutex::new(answers.iter().rev().map(ToString::to_string).collect()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatCompletion for FakeChat {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ServiceError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if n < self.fail_first {
            return Err(api_error());
        }
        Ok(self
            .script
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| self.default.clone()))
    }
}

/// Index double; `count_after` is the number of count polls that see zero.
#[derive(Default)]
pub struct FakeIndex {
    pub exists: bool,
    pub reject_keys: Vec<String>,
    pub fail_uploads: bool,
    pub count_after: usize,
    pub deletes: AtomicUsize,
    pub creates: AtomicUsize,
    pub uploads: Mutex<Vec<usize>>,
    pub count_calls: AtomicUsize,
    pub stored: AtomicUsize,
}

#[async_trait]
impl DocumentIndex for FakeIndex {
    async fn delete_index(&self) -> Result<bool, ServiceError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(self.exists)
    }

    async fn create_index(&self) -> Result<(), ServiceError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn upload(&self, documents: &[Document]) -> Result<Vec<IndexingResult>, ServiceError> {
        self.uploads.lock().unwrap().push(documents.len());
        if self.fail_uploads {
            return Err(api_error());
        }
        let results: Vec<IndexingResult> = documents
            .iter()
            .map(|doc| {
                let rejected = self.reject_keys.contains(&doc.id);
                IndexingResult {
                    key: doc.id.clone(),
                    status: !rejected,
                    error_message: rejected.then(|| "rejected".to_string()),
                    status_code: if rejected { 400 } else { 201 },
                }
            })
            .collect();
        let ok = results.iter().filter(|r| r.status).count();
        self.stored.fetch_add(ok, Ordering::SeqCst);
        Ok(results)
    }

    async fn document_count(&self) -> Result<u64, ServiceError> {
        let n = self.count_calls.fetch_add(1, Ordering::SeqCst);
        if n < self.count_after {
            return Ok(0);
        }
        Ok(self.stored.load(Ordering::SeqCst) as u64)
    }
}
