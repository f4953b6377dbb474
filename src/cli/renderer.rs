use colored::{control, Colorize};

use crate::core::formatter::{format_count, format_token_bar, percent_of};
use crate::core::models::turn::{TurnRecord, UsageTotals};
use crate::core::pricing::PricingTable;

const BAR_WIDTH: usize = 20;
const INNER_WIDTH: usize = 64;

/// Render the session dashboard as a colored (or plain) string.
///
/// Layout:
/// ```text
/// ╔════════════════════════════════════════╗
/// ║          TOKEN USAGE DASHBOARD         ║
/// ╠════════════════════════════════════════╣
/// ║ Model: claude-sonnet-4                 ║
/// ╠════════════════════════════════════════╣
/// ║
/// ║  Token Usage by Turn:
/// ║  Turn 1: ████████████████████  1,500 tokens (In: 1,000, Out: 500)
/// ║
/// ║  Distribution:
/// ║  Input:  ██████████████░░░░░░  1,000 tokens (67%)
/// ║  Output: ███████░░░░░░░░░░░░░  500 tokens (33%)
/// ╠════════════════════════════════════════╣
/// ║  TOTALS
/// ║  Total Tokens: 1,500
/// ║  Estimated Cost: $0.0105 (Input: $0.0030, Output: $0.0075)
/// ╚════════════════════════════════════════╝
/// ```
///
/// Per-turn bars are scaled against the largest input+output sum across
/// turns; tool tokens do not participate. An empty turn list renders a
/// single explanatory line instead of the box.
pub fn render_dashboard(
    turns: &[TurnRecord],
    model: &str,
    pricing: &PricingTable,
    use_color: bool,
) -> String {
    control::set_override(use_color);

    if turns.is_empty() {
        return "No usage data to display.".to_string();
    }

    let totals = UsageTotals::from_turns(turns);
    let conversation_total = totals.input + totals.output;
    let max_turn = turns
        .iter()
        .map(|t| t.conversation_tokens())
        .max()
        .unwrap_or(0);
    let cost = pricing.cost(totals.input, totals.output, model);

    let horiz = "═".repeat(INNER_WIDTH);
    let rule = format!("║  {}", "─".repeat(INNER_WIDTH - 3));

    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("╔{}╗", horiz));
    lines.push(format!(
        "║{}║",
        format!("{:^width$}", "TOKEN USAGE DASHBOARD", width = INNER_WIDTH).bold()
    ));
    lines.push(format!("╠{}╣", horiz));
    lines.push(format!(
        "║ Model: {:<width$}║",
        model,
        width = INNER_WIDTH - 8
    ));
    lines.push(format!("╠{}╣", horiz));
    lines.push("║".to_string());

    lines.push("║  Token Usage by Turn:".to_string());
    lines.push(rule.clone());
    for turn in turns {
        let value = turn.conversation_tokens();
        let bar = format_token_bar(value, max_turn, BAR_WIDTH);
        lines.push(format!(
            "║  Turn {}: {}  {} tokens (In: {}, Out: {})",
            turn.turn,
            bar.magenta(),
            format_count(value),
            format_count(turn.input),
            format_count(turn.output)
        ));
    }
    lines.push("║".to_string());

    if conversation_total > 0 {
        lines.push(rule.clone());
        lines.push("║  Distribution:".to_string());
        let input_bar = format_token_bar(totals.input, conversation_total, BAR_WIDTH);
        let output_bar = format_token_bar(totals.output, conversation_total, BAR_WIDTH);
        lines.push(format!(
            "║  Input:  {}  {} tokens ({}%)",
            input_bar.magenta(),
            format_count(totals.input),
            percent_of(totals.input, conversation_total)
        ));
        lines.push(format!(
            "║  Output: {}  {} tokens ({}%)",
            output_bar.magenta(),
            format_count(totals.output),
            percent_of(totals.output, conversation_total)
        ));
        lines.push("║".to_string());
    }

    lines.push(format!("╠{}╣", horiz));
    lines.push(format!("║  {}", "TOTALS".bold()));
    lines.push(rule);
    lines.push(format!(
        "║  Total Tokens: {}",
        format_count(conversation_total)
    ));
    lines.push(format!(
        "║  Estimated Cost: ${:.4} (Input: ${:.4}, Output: ${:.4})",
        cost.total, cost.input, cost.output
    ));
    lines.push(format!("╚{}╝", horiz));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_turns() -> Vec<TurnRecord> {
        vec![
            TurnRecord::new(1, 1_000, 500, 0),
            TurnRecord::new(2, 200, 300, 100),
        ]
    }

    #[test]
    fn empty_turns_render_one_line() {
        let pricing = PricingTable::builtin();
        let output = render_dashboard(&[], "claude-sonnet-4", &pricing, false);
        assert_eq!(output, "No usage data to display.");
    }

    #[test]
    fn renders_every_turn() {
        let pricing = PricingTable::builtin();
        let output = render_dashboard(&sample_turns(), "claude-sonnet-4", &pricing, false);
        assert!(output.contains("Turn 1:"));
        assert!(output.contains("Turn 2:"));
        assert!(output.contains("(In: 1,000, Out: 500)"));
    }

    #[test]
    fn renders_model_and_totals() {
        let pricing = PricingTable::builtin();
        let output = render_dashboard(&sample_turns(), "gpt-4o", &pricing, false);
        assert!(output.contains("Model: gpt-4o"));
        // 1000 + 500 + 200 + 300; tool tokens excluded from the dashboard
        assert!(output.contains("Total Tokens: 2,000"));
    }

    #[test]
    fn renders_distribution_percentages() {
        let pricing = PricingTable::builtin();
        let output = render_dashboard(&sample_turns(), "claude-sonnet-4", &pricing, false);
        assert!(output.contains("Distribution:"));
        assert!(output.contains("(60%)")); // 1,200 / 2,000 input
        assert!(output.contains("(40%)")); // 800 / 2,000 output
    }

    #[test]
    fn zero_token_turns_skip_distribution() {
        let pricing = PricingTable::builtin();
        let turns = vec![TurnRecord::new(1, 0, 0, 0)];
        let output = render_dashboard(&turns, "claude-sonnet-4", &pricing, false);
        assert!(!output.contains("Distribution:"));
        assert!(output.contains("Turn 1:"));
        assert!(output.contains("Total Tokens: 0"));
    }

    #[test]
    fn largest_turn_gets_full_bar() {
        let pricing = PricingTable::builtin();
        let output = render_dashboard(&sample_turns(), "claude-sonnet-4", &pricing, false);
        assert!(output.contains(&"█".repeat(BAR_WIDTH)));
    }

    #[test]
    fn cost_footer_uses_four_decimals() {
        let pricing = PricingTable::builtin();
        // 1,200 input * $3/M = $0.0036; 800 output * $15/M = $0.0120
        let output = render_dashboard(&sample_turns(), "claude-sonnet-4", &pricing, false);
        assert!(output.contains("Estimated Cost: $0.0156 (Input: $0.0036, Output: $0.0120)"));
    }

    #[test]
    fn no_ansi_when_color_disabled() {
        let pricing = PricingTable::builtin();
        let output = render_dashboard(&sample_turns(), "claude-sonnet-4", &pricing, false);
        assert!(!output.contains('\x1b'));
    }
}
