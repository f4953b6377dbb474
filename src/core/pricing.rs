use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::core::models::cost::CostBreakdown;

/// Model used when a requested model has no pricing entry.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4";

/// Key set of the builtin pricing table; `--model` is restricted to these.
pub const MODELS: [&str; 8] = [
    "claude-opus-4",
    "claude-sonnet-4",
    "claude-haiku",
    "gpt-4o",
    "gpt-4o-mini",
    "gpt-o1",
    "gemini-1.5-pro",
    "gemini-2.0-flash",
];

/// Builtin USD prices per million tokens, (model, input, output).
const BUILTIN_PRICES: [(&str, f64, f64); 8] = [
    ("claude-opus-4", 15.00, 75.00),
    ("claude-sonnet-4", 3.00, 15.00),
    ("claude-haiku", 0.25, 1.25),
    ("gpt-4o", 2.50, 10.00),
    ("gpt-4o-mini", 0.15, 0.60),
    ("gpt-o1", 15.00, 60.00),
    ("gemini-1.5-pro", 1.25, 5.00),
    ("gemini-2.0-flash", 0.10, 0.40),
];

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("failed to read pricing file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse pricing file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// USD prices per million tokens for one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingEntry {
    pub input: f64,
    pub output: f64,
}

/// Read-only per-model pricing, constructed once at startup and passed in
/// wherever costs are computed. Lookup never fails: unknown models resolve
/// to the [`DEFAULT_MODEL`] entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingTable {
    #[serde(flatten)]
    models: BTreeMap<String, PricingEntry>,
}

impl PricingTable {
    /// The builtin table.
    pub fn builtin() -> Self {
        let models = BUILTIN_PRICES
            .iter()
            .map(|&(model, input, output)| (model.to_string(), PricingEntry { input, output }))
            .collect();
        Self { models }
    }

    /// Merge a user TOML file over the builtin entries. Overrides win per
    /// model; builtin models absent from the file keep their rates, so the
    /// fallback entry always exists.
    ///
    /// ```toml
    /// [claude-sonnet-4]
    /// input = 2.50
    /// output = 12.00
    /// ```
    pub fn merge_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, PricingError> {
        let content = std::fs::read_to_string(path)?;
        let overrides: BTreeMap<String, PricingEntry> = toml::from_str(&content)?;
        self.models.extend(overrides);
        Ok(self)
    }

    /// Look up a model's entry, falling back to [`DEFAULT_MODEL`].
    pub fn entry(&self, model: &str) -> &PricingEntry {
        self.models.get(model).unwrap_or_else(|| {
            self.models
                .get(DEFAULT_MODEL)
                .expect("default model present in pricing table")
        })
    }

    /// Cost of an input/output token pair under a model's rates. Each figure
    /// is rounded to 6 decimal places after multiplication, never before.
    pub fn cost(&self, input_tokens: u64, output_tokens: u64, model: &str) -> CostBreakdown {
        let entry = self.entry(model);
        let input = input_tokens as f64 / 1_000_000.0 * entry.input;
        let output = output_tokens as f64 / 1_000_000.0 * entry.output;
        CostBreakdown {
            input: round6(input),
            output: round6(output),
            total: round6(input + output),
        }
    }
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}
