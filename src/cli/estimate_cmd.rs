use anyhow::Result;
use colored::{control, Colorize};
use serde::Serialize;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::core::estimator::{self, TextAnalysis};
use crate::core::models::cost::CostBreakdown;
use crate::core::pricing::PricingTable;

#[derive(Serialize)]
struct EstimatePayload {
    #[serde(flatten)]
    analysis: TextAnalysis,
    model: String,
    estimated_cost: CostBreakdown,
}

/// One-shot estimate of a single text blob. The cost shown treats the whole
/// blob as input tokens.
pub fn run(text: &str, model: &str, pricing: &PricingTable, opts: &OutputOptions) -> Result<()> {
    let tokenizer = estimator::for_model(model);
    let analysis = estimator::analyze(text, tokenizer.as_ref());
    let cost = pricing.cost(analysis.tokens, 0, model);

    match opts.format {
        OutputFormat::Json => {
            let payload = EstimatePayload {
                analysis,
                model: model.to_string(),
                estimated_cost: cost,
            };
            let json = if opts.pretty {
                serde_json::to_string_pretty(&payload)?
            } else {
                serde_json::to_string(&payload)?
            };
            println!("{}", json);
        }
        OutputFormat::Text => {
            control::set_override(opts.use_color);
            println!("{} {}", "Characters:".cyan(), analysis.characters);
            println!(
                "{} {} ({})",
                "Tokens:".cyan(),
                analysis.tokens,
                analysis.method
            );
            println!("{} {}", "Content type:".cyan(), analysis.content_type);
            println!("{} ${:.6}", "Est. cost (input):".cyan(), cost.input);
        }
    }

    Ok(())
}
