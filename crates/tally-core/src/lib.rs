//! # tally-core
//!
//! Core types and counting primitives shared across the incident tally crates.
//!
//! - Documents and the filename-derived ids they are indexed under
//! - Incident-type report records and per-label estimates
//! - Lexical counting (substring occurrences, key-phrase matches)
//! - Order-stable category tallies for discovery
//! - Cross-cutting error types

pub mod counting;
pub mod document;
pub mod errors;
pub mod record;
pub mod tally;

pub use counting::{LexicalCount, combine_contents, count_matching_phrases, count_occurrences};
pub use document::{Document, document_id};
pub use errors::CoreError;
pub use record::{Estimate, EstimateStatus, IncidentTypeRecord, sort_by_ground_truth};
pub use tally::{CategoryCount, CategoryTally};
