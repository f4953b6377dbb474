use chrono::Local;
use serde::Serialize;

use crate::core::models::cost::CostBreakdown;
use crate::core::models::turn::{TurnRecord, UsageTotals};
use crate::core::pricing::PricingTable;

/// Machine-readable export of one estimation session. Built fresh per
/// request; the session id and timestamp reflect the time of the call, not
/// the time of the data. Tool tokens count toward the totals but are never
/// priced.
#[derive(Debug, Clone, Serialize)]
pub struct SessionExport {
    pub session_id: String,
    pub model: String,
    pub timestamp: String,
    pub turns: Vec<TurnRecord>,
    pub totals: UsageTotals,
    pub estimated_cost: SessionCost,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionCost {
    #[serde(flatten)]
    pub breakdown: CostBreakdown,
    pub currency: &'static str,
}

impl SessionExport {
    pub fn build(turns: &[TurnRecord], model: &str, pricing: &PricingTable) -> Self {
        let totals = UsageTotals::from_turns(turns);
        let breakdown = pricing.cost(totals.input, totals.output, model);
        let now = Local::now();

        Self {
            session_id: now.format("%Y%m%d_%H%M%S").to_string(),
            model: model.to_string(),
            timestamp: now.to_rfc3339(),
            turns: turns.to_vec(),
            totals,
            estimated_cost: SessionCost {
                breakdown,
                currency: "USD",
            },
        }
    }
}
