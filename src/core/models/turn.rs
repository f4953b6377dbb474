use serde::{Deserialize, Serialize};

/// Token usage for one conversational exchange.
///
/// `total` is derived from the other three counts. Batch files may carry a
/// stale or missing `total`; callers normalize after deserializing so the
/// invariant `total == input + output + tools` always holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    /// 1-based position in the conversation.
    #[serde(default)]
    pub turn: u32,
    #[serde(default)]
    pub input: u64,
    #[serde(default)]
    pub output: u64,
    #[serde(default)]
    pub tools: u64,
    #[serde(default)]
    pub total: u64,
}

impl TurnRecord {
    pub fn new(turn: u32, input: u64, output: u64, tools: u64) -> Self {
        Self {
            turn,
            input,
            output,
            tools,
            total: input + output + tools,
        }
    }

    /// Re-derive `total` from the component counts.
    pub fn recompute_total(&mut self) {
        self.total = self.input + self.output + self.tools;
    }

    /// Input + output tokens. Tool tokens are excluded: this is the value
    /// the dashboard's per-turn bars are scaled against.
    pub fn conversation_tokens(&self) -> u64 {
        self.input + self.output
    }
}

/// Sums across an ordered sequence of turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsageTotals {
    pub input: u64,
    pub output: u64,
    pub tools: u64,
    pub total: u64,
}

impl UsageTotals {
    pub fn from_turns(turns: &[TurnRecord]) -> Self {
        let input = turns.iter().map(|t| t.input).sum();
        let output = turns.iter().map(|t| t.output).sum();
        let tools = turns.iter().map(|t| t.tools).sum();
        Self {
            input,
            output,
            tools,
            total: input + output + tools,
        }
    }
}
