use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crate::cli::output::OutputOptions;
use crate::cli::renderer;
use crate::core::estimator;
use crate::core::models::session::SessionExport;
use crate::core::models::turn::TurnRecord;
use crate::core::pricing::PricingTable;

/// Interactive estimation loop: read an input block and an output block per
/// turn, accumulate turn records, and answer `show` / `export` / `quit`
/// commands. Ctrl-C renders a final dashboard before exiting; EOF ends the
/// loop quietly.
pub fn run(model: &str, pricing: &PricingTable, opts: &OutputOptions) -> Result<()> {
    let tokenizer = estimator::for_model(model);
    let turns: Arc<Mutex<Vec<TurnRecord>>> = Arc::new(Mutex::new(Vec::new()));

    {
        let turns = Arc::clone(&turns);
        let model = model.to_string();
        let pricing = pricing.clone();
        let use_color = opts.use_color;
        ctrlc::set_handler(move || {
            let turns = turns.lock().unwrap_or_else(PoisonError::into_inner);
            println!("\n\nFinal Summary:");
            println!(
                "{}",
                renderer::render_dashboard(&turns, &model, &pricing, use_color)
            );
            std::process::exit(130);
        })?;
    }

    println!("Token Usage Estimator - Interactive Mode");
    println!("Enter text to estimate tokens (Ctrl+C to exit)");
    println!("{}", "-".repeat(50));

    let stdin = io::stdin();
    let mut turn_index: u32 = 0;

    loop {
        println!("\n[Input] Enter your prompt (empty line to finish):");
        let input_text = match read_block(&mut stdin.lock())? {
            Some(text) => text,
            None => break, // EOF
        };
        if input_text.is_empty() {
            continue;
        }

        let input_analysis = estimator::analyze(&input_text, tokenizer.as_ref());
        println!(
            "\nInput: {} tokens ({})",
            input_analysis.tokens, input_analysis.content_type
        );

        println!("\n[Output] Enter the response (empty line to finish):");
        // An empty response block is a zero-token output, not an error.
        let output_tokens = match read_block(&mut stdin.lock())? {
            Some(text) => estimator::analyze(&text, tokenizer.as_ref()).tokens,
            None => 0,
        };
        println!("Output: {} tokens", output_tokens);

        turn_index += 1;
        let record = TurnRecord::new(turn_index, input_analysis.tokens, output_tokens, 0);
        println!("\nTurn {} total: {} tokens", turn_index, record.total);
        turns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);

        println!("\nCommands: 'show' for summary, 'export' for JSON, 'quit' to exit");
        print!("Command (or press Enter to continue): ");
        io::stdout().flush()?;

        let mut command = String::new();
        if stdin.lock().read_line(&mut command)? == 0 {
            break; // EOF
        }
        let snapshot = turns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match command.trim().to_lowercase().as_str() {
            "show" => println!(
                "{}",
                renderer::render_dashboard(&snapshot, model, pricing, opts.use_color)
            ),
            "export" => {
                let export = SessionExport::build(&snapshot, model, pricing);
                println!("{}", serde_json::to_string_pretty(&export)?);
            }
            "quit" | "exit" | "q" => break,
            _ => {}
        }
    }

    Ok(())
}

/// Read lines until a blank line. Returns `None` on EOF before any content;
/// EOF mid-block returns the lines gathered so far.
fn read_block<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut lines: Vec<String> = Vec::new();
    loop {
        let mut line = String::new();
        let bytes = reader.read_line(&mut line)?;
        if bytes == 0 {
            if lines.is_empty() {
                return Ok(None);
            }
            break;
        }
        let line = line.trim_end_matches(['\n', '\r']);
        if line.is_empty() {
            break;
        }
        lines.push(line.to_string());
    }
    Ok(Some(lines.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn block_stops_at_blank_line() {
        let mut input = Cursor::new("first\nsecond\n\nrest\n");
        let block = read_block(&mut input).unwrap();
        assert_eq!(block.as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn immediate_blank_line_is_empty_block() {
        let mut input = Cursor::new("\nmore\n");
        let block = read_block(&mut input).unwrap();
        assert_eq!(block.as_deref(), Some(""));
    }

    #[test]
    fn eof_before_content_is_none() {
        let mut input = Cursor::new("");
        assert!(read_block(&mut input).unwrap().is_none());
    }

    #[test]
    fn eof_mid_block_returns_partial() {
        let mut input = Cursor::new("only line");
        let block = read_block(&mut input).unwrap();
        assert_eq!(block.as_deref(), Some("only line"));
    }

    #[test]
    fn strips_carriage_returns() {
        let mut input = Cursor::new("windows\r\nline\r\n\r\n");
        let block = read_block(&mut input).unwrap();
        assert_eq!(block.as_deref(), Some("windows\nline"));
    }
}
