mod cli;
mod core;

use std::path::PathBuf;

use clap::builder::PossibleValuesParser;
use clap::{CommandFactory, Parser};

use crate::cli::output::{detect_color, OutputFormat, OutputOptions};
use crate::core::pricing::{self, PricingTable};

#[derive(Parser)]
#[command(
    name = "tkm",
    about = "Estimate token counts and API costs for LLM prompts, offline",
    version
)]
struct Cli {
    /// Text to estimate tokens for
    #[arg(short, long)]
    input: Option<String>,

    /// JSON file containing conversation turns
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Run in interactive mode
    #[arg(long)]
    interactive: bool,

    /// Model for cost calculation
    #[arg(
        short,
        long,
        default_value = pricing::DEFAULT_MODEL,
        value_parser = PossibleValuesParser::new(pricing::MODELS)
    )]
    model: String,

    /// Output as JSON
    #[arg(short = 'j', long = "json")]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Custom pricing table (TOML), merged over the builtin rates
    #[arg(long, value_name = "FILE")]
    pricing_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let opts = OutputOptions {
        format: if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        },
        pretty: cli.pretty,
        use_color: detect_color(!cli.no_color),
    };

    let pricing = match &cli.pricing_file {
        Some(path) => PricingTable::builtin().merge_file(path)?,
        None => PricingTable::builtin(),
    };

    if cli.interactive {
        return cli::interactive_cmd::run(&cli.model, &pricing, &opts);
    }
    if let Some(text) = &cli.input {
        return cli::estimate_cmd::run(text, &cli.model, &pricing, &opts);
    }
    if let Some(path) = &cli.file {
        return cli::batch_cmd::run(path, &cli.model, &pricing, &opts);
    }

    Cli::command().print_help()?;
    println!();
    Ok(())
}
