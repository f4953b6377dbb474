use serde::{Deserialize, Serialize};

/// USD cost of one input/output token pair, rounded to 6 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub input: f64,
    pub output: f64,
    pub total: f64,
}
