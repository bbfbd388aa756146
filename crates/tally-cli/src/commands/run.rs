use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;
use tally_config::GroundTruth;
use tally_core::Estimate;
use tally_pipeline::{CountEstimator, LexicalEstimator, ModelEstimator, RunOutcome};
use tally_report::ReportPaths;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{EstimateMethod, RunArgs};
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct RunResponse {
    method: &'static str,
    labels: usize,
    failed_labels: Vec<String>,
    report: ReportPaths,
    records: Vec<tally_core::IncidentTypeRecord>,
}

pub async fn handle(args: &RunArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let general = &ctx.config.general;
    let distribution_path = args
        .distribution
        .clone()
        .unwrap_or_else(|| general.distribution_path.clone());
    let truth = GroundTruth::load(&distribution_path).with_context(|| {
        format!(
            "failed to load ground-truth distribution from {}",
            distribution_path.display()
        )
    })?;
    tracing::info!(labels = truth.len(), path = %distribution_path.display(), "loaded ground truth");

    let search = ctx.search()?;
    let outcome = match args.method {
        EstimateMethod::Lexical => {
            let estimator = LexicalEstimator::new(
                search,
                ctx.key_phrases()?,
                general.lexical_top,
                general.phrase_search,
            );
            run_with_progress(&estimator, &truth).await
        }
        EstimateMethod::Model => {
            let estimator = ModelEstimator::new(search, ctx.chat()?, general.model_top);
            run_with_progress(&estimator, &truth).await
        }
    };

    let output_path: PathBuf = args
        .output
        .clone()
        .unwrap_or_else(|| general.default_report_path());
    let timestamp = args.timestamp.then(|| chrono::Local::now().naive_local());
    let report = tally_report::write_report(&outcome.records, &output_path, timestamp)
        .context("failed to write report")?;

    let failed_labels: Vec<String> = outcome.failed_labels().map(str::to_string).collect();
    if failed_labels.is_empty() {
        tracing::info!(labels = outcome.estimates.len(), "run complete");
    } else {
        tracing::warn!(
            failed = failed_labels.len(),
            labels = %failed_labels.join(", "),
            "run complete; some estimates failed and were reported as 0"
        );
    }

    output(
        &RunResponse {
            method: crate::commands::count::method_name(args.method),
            labels: outcome.estimates.len(),
            failed_labels,
            report,
            records: outcome.records,
        },
        flags.format,
    )
}

async fn run_with_progress<E>(estimator: &E, truth: &GroundTruth) -> RunOutcome
where
    E: CountEstimator + ?Sized,
{
    let progress = Progress::labels(truth.len() as u64);
    let outcome = tally_pipeline::run_distribution(estimator, truth, |estimate: &Estimate| {
        progress.advance(&estimate.label);
    })
    .await;
    progress.finish();
    outcome
}
