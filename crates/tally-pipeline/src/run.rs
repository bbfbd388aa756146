//! Batch run over a ground-truth distribution.

use tally_config::GroundTruth;
use tally_core::{Estimate, IncidentTypeRecord, sort_by_ground_truth};

use crate::estimate::CountEstimator;

/// Records for the report plus the raw estimates behind them.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// Sorted by ground truth, largest first.
    pub records: Vec<IncidentTypeRecord>,
    /// In distribution order.
    pub estimates: Vec<Estimate>,
}

impl RunOutcome {
    /// Labels whose estimate failed, in distribution order.
    pub fn failed_labels(&self) -> impl Iterator<Item = &str> {
        self.estimates
            .iter()
            .filter(|e| e.is_failed())
            .map(|e| e.label.as_str())
    }
}

/// Estimate every label in `truth`, one at a time.
///
/// `on_estimate` is called after each label, e.g. to advance a progress bar.
pub async fn run_distribution<E, F>(
    estimator: &E,
    truth: &GroundTruth,
    mut on_estimate: F,
) -> RunOutcome
where
    E: CountEstimator + ?Sized,
    F: FnMut(&Estimate),
{
    let mut outcome = RunOutcome::default();
    for entry in truth.entries() {
        tracing::info!(label = %entry.label, method = estimator.method(), "estimating");
        let estimate = estimator.estimate(&entry.label).await;
        on_estimate(&estimate);
        outcome
            .records
            .push(IncidentTypeRecord::from_estimate(&estimate, entry.count));
        outcome.estimates.push(estimate);
    }
    sort_by_ground_truth(&mut outcome.records);
    outcome
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::estimate::ModelEstimator;
    use crate::fakes::{FakeChat, FakeSearch};

    fn truth(pairs: &[(&str, u64)]) -> GroundTruth {
        pairs.iter().map(|(l, c)| ((*l).to_string(), *c)).collect()
    }

    #[tokio::test]
    async fn records_are_sorted_and_failures_listed() {
        let search = FakeSearch::with(&["report"]);
        let chat = FakeChat::scripted(&["2", "not sure", "7"]);
        let estimator = ModelEstimator::new(&search, &chat, 100);
        let mut seen = Vec::new();

        let outcome = run_distribution(
            &estimator,
            &truth(&[("burn", 1), ("fire", 9), ("flood", 4)]),
            |e| seen.push(e.label.clone()),
        )
        .await;

        assert_eq!(seen, ["burn", "fire", "flood"]);
        assert_eq!(
            outcome.records,
            [
                IncidentTypeRecord::new("fire", 9, 0),
                IncidentTypeRecord::new("flood", 4, 7),
                IncidentTypeRecord::new("burn", 1, 2),
            ]
        );
        assert_eq!(outcome.failed_labels().collect::<Vec<_>>(), ["fire"]);
    }

    #[tokio::test]
    async fn empty_distribution_makes_no_calls() {
        let search = FakeSearch::with(&["report"]);
        let chat = FakeChat::answering("1");
        let estimator = ModelEstimator::new(&search, &chat, 100);
        let outcome = run_distribution(&estimator, &GroundTruth::default(), |_| {}).await;

        assert!(outcome.records.is_empty());
        assert_eq!(search.calls(), 0);
    }
}
