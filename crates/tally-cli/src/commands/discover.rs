use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;
use tally_core::CategoryCount;
use tally_pipeline::DiscoveryOptions;

use crate::cli::root_commands::{DiscoverArgs, DiscoveryMethod};
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct DiscoverResponse {
    method: &'static str,
    output: PathBuf,
    categories: Vec<CategoryCount>,
}

pub async fn handle(args: &DiscoverArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let general = &ctx.config.general;
    let options = DiscoveryOptions {
        scan_limit: general.discovery_scan_limit,
        batch_size: general.discovery_batch_size,
        top_n: args.top.unwrap_or(general.discovery_top_n),
        batch_delay: general.batch_delay(),
    };
    let search = ctx.search()?;

    let progress = Progress::spinner("discovering categories");
    let discovered = match args.method {
        DiscoveryMethod::Phrases => {
            tally_pipeline::discover_key_phrases(search, ctx.key_phrases()?, &options).await
        }
        DiscoveryMethod::Model => {
            tally_pipeline::discover_categories(search, ctx.chat()?, &ctx.retry, &options).await
        }
    };
    progress.finish();
    let categories = discovered.context("category discovery failed")?;

    let output_path = args.output.clone().unwrap_or_else(|| general.default_terms_path());
    tally_report::write_discovered_terms(&categories, &output_path)
        .context("failed to write discovered terms")?;

    // a table of the categories reads better than a key/value summary
    if flags.format == OutputFormat::Table {
        return output(&categories, flags.format);
    }

    output(
        &DiscoverResponse {
            method: match args.method {
                DiscoveryMethod::Phrases => "phrases",
                DiscoveryMethod::Model => "model",
            },
            output: output_path,
            categories,
        },
        flags.format,
    )
}
