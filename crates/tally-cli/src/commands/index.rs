use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;
use tally_pipeline::{IngestOptions, IngestReport};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::IndexArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct IndexResponse {
    index: String,
    data_dir: PathBuf,
    recreated: bool,
    #[serde(flatten)]
    report: IngestReport,
}

pub async fn handle(args: &IndexArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let search = ctx.search()?;
    let general = &ctx.config.general;
    let data_dir = args.data_dir.clone().unwrap_or_else(|| general.data_dir.clone());

    let documents = tally_pipeline::load_documents(&data_dir)
        .with_context(|| format!("failed to load corpus from {}", data_dir.display()))?;

    let options = IngestOptions {
        recreate: !args.skip_recreate,
        settle_delay: general.settle_delay(),
        poll_attempts: general.poll_attempts,
        poll_interval: general.poll_interval(),
    };

    let progress = Progress::spinner(&format!("indexing {} documents", documents.len()));
    let ingested = tally_pipeline::ingest(search, &documents, &options).await;
    progress.finish();
    let report = ingested.context("ingest failed")?;

    output(
        &IndexResponse {
            index: search.index_name().to_string(),
            data_dir,
            recreated: options.recreate,
            report,
        },
        flags.format,
    )
}
