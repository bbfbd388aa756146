use serde::Serialize;
use tally_core::Estimate;
use tally_pipeline::{CountEstimator, LexicalEstimator, ModelEstimator};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{CountArgs, EstimateMethod};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct CountResponse {
    method: &'static str,
    #[serde(flatten)]
    estimate: Estimate,
}

pub async fn handle(args: &CountArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let estimate = estimate_one(ctx, args.method, &args.label).await?;
    output(
        &CountResponse {
            method: method_name(args.method),
            estimate,
        },
        flags.format,
    )
}

async fn estimate_one(ctx: &AppContext, method: EstimateMethod, label: &str) -> anyhow::Result<Estimate> {
    let general = &ctx.config.general;
    let search = ctx.search()?;
    let estimate = match method {
        EstimateMethod::Lexical => {
            let estimator = LexicalEstimator::new(
                search,
                ctx.key_phrases()?,
                general.lexical_top,
                general.phrase_search,
            );
            estimator.estimate(label).await
        }
        EstimateMethod::Model => {
            ModelEstimator::new(search, ctx.chat()?, general.model_top)
                .estimate(label)
                .await
        }
    };
    Ok(estimate)
}

pub const fn method_name(method: EstimateMethod) -> &'static str {
    match method {
        EstimateMethod::Lexical => "lexical",
        EstimateMethod::Model => "model",
    }
}
