//! # tally-pipeline
//!
//! The work behind each `tally` subcommand:
//! - [`corpus`]: read the `*.txt` corpus and ingest it into the search index
//! - [`estimate`]: lexical and model-based per-label counting
//! - [`discovery`]: key-phrase and model-based category discovery
//! - [`run`]: estimate every label of a ground-truth distribution
//!
//! Everything is generic over the service traits in `tally-services` and
//! runs sequentially.

pub mod corpus;
pub mod discovery;
pub mod estimate;
pub mod run;

mod error;
#[cfg(test)]
mod fakes;

pub use corpus::{IngestOptions, IngestReport, UploadFailure, ingest, load_documents};
pub use discovery::{DiscoveryOptions, discover_categories, discover_key_phrases};
pub use error::PipelineError;
pub use estimate::{CountEstimator, LexicalEstimator, ModelEstimator};
pub use run::{RunOutcome, run_distribution};
