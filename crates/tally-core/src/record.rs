//! Per-label estimates and the report records built from them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How an estimate was reached.
///
/// `NoDocuments` and `Failed` both carry a count of zero; keeping them apart
/// lets callers tell "nothing found" from "could not ask".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateStatus {
    Counted,
    NoDocuments,
    Failed,
}

impl EstimateStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Counted => "counted",
            Self::NoDocuments => "no_documents",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for EstimateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of estimating one incident label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    pub label: String,
    pub count: u64,
    pub status: EstimateStatus,
    /// Error text when `status` is `Failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Estimate {
    #[must_use]
    pub fn counted(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
            status: EstimateStatus::Counted,
            error: None,
        }
    }

    #[must_use]
    pub fn no_documents(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            count: 0,
            status: EstimateStatus::NoDocuments,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(label: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            label: label.into(),
            count: 0,
            status: EstimateStatus::Failed,
            error: Some(error.to_string()),
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.status, EstimateStatus::Failed)
    }
}

/// One row of the comparison report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentTypeRecord {
    pub name: String,
    pub ground_truth_count: u64,
    pub discovered_count: u64,
}

impl IncidentTypeRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, ground_truth_count: u64, discovered_count: u64) -> Self {
        Self {
            name: name.into(),
            ground_truth_count,
            discovered_count,
        }
    }

    /// Pair an estimate with its ground truth. Failed estimates report zero.
    #[must_use]
    pub fn from_estimate(estimate: &Estimate, ground_truth_count: u64) -> Self {
        Self::new(estimate.label.clone(), ground_truth_count, estimate.count)
    }
}

/// Sort records by ground truth, largest first, keeping input order on ties.
pub fn sort_by_ground_truth(records: &mut [IncidentTypeRecord]) {
    records.sort_by(|a, b| b.ground_truth_count.cmp(&a.ground_truth_count));
}
