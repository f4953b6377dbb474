use serde::Serialize;
use std::fmt;

use crate::core::classify::{self, ContentType};

const PREVIEW_CHARS: usize = 100;

/// Which strategy produced a token count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateMethod {
    /// Exact count from a BPE vocabulary (tiktoken).
    Bpe,
    /// Character-ratio approximation.
    Heuristic,
}

impl fmt::Display for EstimateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EstimateMethod::Bpe => "bpe",
            EstimateMethod::Heuristic => "heuristic",
        })
    }
}

/// Strategy for turning text into a token count.
///
/// Implementations never fail: anything that could go wrong is resolved
/// when the strategy is constructed, so callers get a plain integer.
pub trait TokenEstimator: Send + Sync {
    fn estimate(&self, text: &str, content_type: ContentType) -> u64;
    fn method(&self) -> EstimateMethod;
}

/// Character-ratio estimator. Whitespace runs collapse to single spaces
/// before counting so formatting noise does not inflate the estimate.
pub struct HeuristicEstimator;

impl TokenEstimator for HeuristicEstimator {
    fn estimate(&self, text: &str, content_type: ContentType) -> u64 {
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let chars = normalized.chars().count();
        (chars as f64 / content_type.chars_per_token()).ceil() as u64
    }

    fn method(&self) -> EstimateMethod {
        EstimateMethod::Heuristic
    }
}

/// Exact estimator backed by the tiktoken BPE vocabulary for one model.
pub struct BpeEstimator {
    bpe: tiktoken_rs::CoreBPE,
}

impl BpeEstimator {
    /// Returns `None` when tiktoken does not know the model, letting the
    /// caller fall back to the heuristic.
    pub fn for_model(model: &str) -> Option<Self> {
        tiktoken_rs::get_bpe_from_model(model)
            .ok()
            .map(|bpe| Self { bpe })
    }
}

impl TokenEstimator for BpeEstimator {
    fn estimate(&self, text: &str, _content_type: ContentType) -> u64 {
        self.bpe.encode_with_special_tokens(text).len() as u64
    }

    fn method(&self) -> EstimateMethod {
        EstimateMethod::Bpe
    }
}

/// Pick the estimation strategy for a model, once, at startup. Exact when
/// tiktoken recognizes the model, heuristic otherwise — never an error.
pub fn for_model(model: &str) -> Box<dyn TokenEstimator> {
    match BpeEstimator::for_model(model) {
        Some(bpe) => Box::new(bpe),
        None => Box::new(HeuristicEstimator),
    }
}

/// Result of analyzing a single text blob.
#[derive(Debug, Clone, Serialize)]
pub struct TextAnalysis {
    pub text_preview: String,
    pub characters: usize,
    pub tokens: u64,
    pub content_type: ContentType,
    pub method: EstimateMethod,
}

/// Classify a blob and count its tokens with the given strategy.
pub fn analyze(text: &str, estimator: &dyn TokenEstimator) -> TextAnalysis {
    let content_type = classify::detect(text);
    let tokens = estimator.estimate(text, content_type);

    TextAnalysis {
        text_preview: preview(text),
        characters: text.chars().count(),
        tokens,
        content_type,
        method: estimator.method(),
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_text_ratio() {
        // "hello world" is 11 chars; ceil(11 / 4.0) = 3
        let est = HeuristicEstimator;
        assert_eq!(est.estimate("hello world", ContentType::Text), 3);
    }

    #[test]
    fn heuristic_empty_is_zero() {
        let est = HeuristicEstimator;
        assert_eq!(est.estimate("", ContentType::Text), 0);
        assert_eq!(est.estimate("   \n\t ", ContentType::Text), 0);
    }

    #[test]
    fn heuristic_normalizes_whitespace() {
        // "a   b\n\n c" normalizes to "a b c": 5 chars, ceil(5/4) = 2
        let est = HeuristicEstimator;
        assert_eq!(est.estimate("a   b\n\n c", ContentType::Text), 2);
    }

    #[test]
    fn heuristic_respects_content_ratio() {
        let est = HeuristicEstimator;
        let code = "fn main() { println!(\"x\"); }"; // 28 chars
        assert_eq!(est.estimate(code, ContentType::Code), 8); // ceil(28/3.5)
        assert_eq!(est.estimate(code, ContentType::Text), 7); // ceil(28/4.0)
    }

    #[test]
    fn url_ratio_reachable_by_override() {
        let est = HeuristicEstimator;
        let url = "https://example.com/a/b?q=1"; // 27 chars
        assert_eq!(est.estimate(url, ContentType::Url), 9); // ceil(27/3.0)
    }

    #[test]
    fn unknown_model_selects_heuristic() {
        let est = for_model("claude-haiku");
        assert_eq!(est.method(), EstimateMethod::Heuristic);
    }

    #[test]
    fn openai_model_selects_bpe() {
        let est = for_model("gpt-4o");
        assert_eq!(est.method(), EstimateMethod::Bpe);
        assert!(est.estimate("hello world", ContentType::Text) > 0);
        assert_eq!(est.estimate("", ContentType::Text), 0);
    }

    #[test]
    fn analyze_reports_type_and_method() {
        let est = HeuristicEstimator;
        let analysis = analyze(r#"{"a": 1}"#, &est);
        assert_eq!(analysis.content_type, ContentType::Json);
        assert_eq!(analysis.method, EstimateMethod::Heuristic);
        assert_eq!(analysis.characters, 8);
        assert_eq!(analysis.tokens, 3); // ceil(8/3.8)
    }

    #[test]
    fn analyze_truncates_preview() {
        let est = HeuristicEstimator;
        let long = "x".repeat(150);
        let analysis = analyze(&long, &est);
        assert_eq!(analysis.text_preview.chars().count(), 103);
        assert!(analysis.text_preview.ends_with("..."));
        assert_eq!(analysis.characters, 150);
    }
}
