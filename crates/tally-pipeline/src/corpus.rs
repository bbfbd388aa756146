//! Corpus loading and index ingest.

use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use tally_core::Document;
use tally_core::document::DOCUMENT_EXTENSION;
use tally_services::{DocumentIndex, MAX_UPLOAD_BATCH};

use crate::error::PipelineError;

/// Read every `*.txt` file in `dir`, in file-name order.
///
/// Files that cannot be read as UTF-8 text are logged and skipped.
///
/// # Errors
///
/// Returns [`PipelineError::Io`] if the directory itself cannot be listed.
pub fn load_documents(dir: &Path) -> Result<Vec<Document>, PipelineError> {
    let io_err = |source| PipelineError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut names: Vec<String> = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let is_file = entry.file_type().is_ok_and(|t| t.is_file());
        let Ok(name) = entry.file_name().into_string() else {
            tracing::warn!(path = %entry.path().display(), "skipping non-UTF-8 file name");
            continue;
        };
        if is_file && name.ends_with(DOCUMENT_EXTENSION) {
            names.push(name);
        }
    }
    names.sort();

    let mut documents = Vec::with_capacity(names.len());
    for name in names {
        let path = dir.join(&name);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to read document");
                continue;
            }
        };
        match Document::from_file(&name, &raw) {
            Ok(doc) => {
                tracing::debug!(file = %name, id = %doc.id, "read document");
                documents.push(doc);
            }
            Err(e) => tracing::warn!(file = %name, error = %e, "skipping document"),
        }
    }

    tracing::info!(dir = %dir.display(), count = documents.len(), "loaded documents");
    Ok(documents)
}

/// Timing and mode for [`ingest`].
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Drop and create the index before uploading.
    pub recreate: bool,
    pub settle_delay: Duration,
    pub poll_attempts: u32,
    pub poll_interval: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadFailure {
    pub key: String,
    pub message: String,
}

/// Outcome of an ingest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub submitted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<UploadFailure>,
    /// Document count the index reported after settling; 0 if it never
    /// became non-empty.
    pub indexed: u64,
}

/// (Re)create the index, upload `documents` in batches and confirm the index
/// reports a non-zero document count.
///
/// Per-document and per-batch upload failures are recorded in the report
/// rather than returned.
///
/// # Errors
///
/// Returns [`PipelineError::Service`] if the index cannot be deleted or
/// created.
pub async fn ingest<I>(
    index: &I,
    documents: &[Document],
    options: &IngestOptions,
) -> Result<IngestReport, PipelineError>
where
    I: DocumentIndex + ?Sized,
{
    if options.recreate {
        if index.delete_index().await? {
            tracing::info!("deleted existing index");
        } else {
            tracing::info!("index did not exist, creating");
        }
        index.create_index().await?;
        tracing::info!("created index");
    }

    let mut report = IngestReport {
        submitted: documents.len(),
        ..IngestReport::default()
    };

    for batch in documents.chunks(MAX_UPLOAD_BATCH) {
        match index.upload(batch).await {
            Ok(results) => {
                for result in results {
                    if result.status {
                        report.succeeded += 1;
                    } else {
                        let message = result
                            .error_message
                            .unwrap_or_else(|| format!("status {}", result.status_code));
                        tracing::error!(key = %result.key, %message, "document failed to index");
                        report.failed += 1;
                        report.failures.push(UploadFailure {
                            key: result.key,
                            message,
                        });
                    }
                }
            }
            Err(e) => {
                tracing::error!(batch = batch.len(), error = %e, "upload batch failed");
                report.failed += batch.len();
                report
                    .failures
                    .extend(batch.iter().map(|doc| UploadFailure {
                        key: doc.id.clone(),
                        message: e.to_string(),
                    }));
            }
        }
    }
    tracing::info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "indexing complete"
    );

    report.indexed = await_documents(index, options).await;
    Ok(report)
}

/// Wait for the index to report documents. Count errors are logged and
/// treated as an empty index.
async fn await_documents<I>(index: &I, options: &IngestOptions) -> u64
where
    I: DocumentIndex + ?Sized,
{
    tokio::time::sleep(options.settle_delay).await;
    for attempt in 1..=options.poll_attempts {
        match index.document_count().await {
            Ok(count) if count > 0 => {
                tracing::info!(count, attempt, "index reports documents");
                return count;
            }
            Ok(_) => tracing::debug!(attempt, "index still empty"),
            Err(e) => tracing::warn!(attempt, error = %e, "document count failed"),
        }
        if attempt < options.poll_attempts {
            tokio::time::sleep(options.poll_interval).await;
        }
    }
    tracing::error!(
        attempts = options.poll_attempts,
        "index still empty after upload"
    );
    0
}
