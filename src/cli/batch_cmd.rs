use anyhow::Result;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::models::session::SessionExport;
use crate::core::models::turn::TurnRecord;
use crate::core::pricing::PricingTable;

/// Batch input problems. The invalid-shape case is the single condition in
/// the tool that terminates the process with a non-zero exit.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read input file: {0}")]
    Read(#[from] std::io::Error),
    #[error("invalid JSON in input file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid file format: expected a list of turns or an object with a `turns` key")]
    InvalidFormat,
}

/// Estimate a whole conversation from a JSON file and render the dashboard
/// or the session export.
pub fn run(path: &Path, model: &str, pricing: &PricingTable, opts: &OutputOptions) -> Result<()> {
    let turns = load_turns(path)?;

    match opts.format {
        OutputFormat::Json => {
            let export = SessionExport::build(&turns, model, pricing);
            let json = if opts.pretty {
                serde_json::to_string_pretty(&export)?
            } else {
                serde_json::to_string(&export)?
            };
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!(
                "{}",
                renderer::render_dashboard(&turns, model, pricing, opts.use_color)
            );
        }
    }

    Ok(())
}

/// Load turn records from a file holding either a bare JSON list or an
/// object with a `turns` key. Totals are re-derived and missing turn
/// indices renumbered by position, so downstream code can trust both.
fn load_turns(path: &Path) -> Result<Vec<TurnRecord>, InputError> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;

    let raw = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => map.remove("turns").ok_or(InputError::InvalidFormat)?,
        _ => return Err(InputError::InvalidFormat),
    };
    if !raw.is_array() {
        return Err(InputError::InvalidFormat);
    }

    let mut turns: Vec<TurnRecord> = serde_json::from_value(raw)?;
    for (i, turn) in turns.iter_mut().enumerate() {
        if turn.turn == 0 {
            turn.turn = i as u32 + 1;
        }
        turn.recompute_total();
    }
    Ok(turns)
}
