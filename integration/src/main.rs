use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use integration::modes::{self, AgreementEnvelope, ConfidenceEnvelope, VisualEnvelope};
use integration::config;
use scorer::ScorerError;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    /// Criteria-based confidence scoring for a free-text answer
    Confidence,
    /// Geometric grading of a hand-drawn shape
    Visual,
    /// Agreement confidence across multiple marking runs
    Agreement,
}

#[derive(Parser, Debug)]
#[command(version, about = "Scoring entry point for the automated marking pipeline")]
struct Args {
    /// Mode to run
    #[arg(long, value_enum)]
    mode: Mode,
    /// Path to input JSON file
    #[arg(long)]
    input_file: Option<PathBuf>,
    /// Input JSON data as string
    #[arg(long)]
    input_data: Option<String>,
    /// Also write the output JSON to this path
    #[arg(long)]
    output_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let output = match read_input(&args) {
        Some(Ok(raw)) => render(args.mode, &raw)?,
        Some(Err(e)) => render_failure(args.mode, &e)?,
        None => {
            // Neither input source given: a usage error, not a scoring failure.
            let envelope = serde_json::json!({
                "success": false,
                "error": "Either --input-file or --input-data must be provided",
            });
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            std::process::exit(1);
        }
    };

    println!("{output}");
    if let Some(path) = &args.output_file {
        fs::write(path, &output)
            .with_context(|| format!("failed to write output to {}", path.display()))?;
    }

    Ok(())
}

/// Resolves the raw input payload: `None` when no source was given, `Err`
/// when a given file could not be read.
fn read_input(args: &Args) -> Option<Result<String, ScorerError>> {
    if let Some(path) = &args.input_file {
        let result = fs::read_to_string(path).map_err(|e| {
            ScorerError::InvalidInput(format!("could not read input file {}: {e}", path.display()))
        });
        return Some(result);
    }
    args.input_data.clone().map(Ok)
}

fn render(mode: Mode, raw: &str) -> Result<String> {
    let output = match mode {
        Mode::Confidence => serde_json::to_string_pretty(&modes::run_confidence(raw))?,
        Mode::Visual => serde_json::to_string_pretty(&modes::run_visual(raw))?,
        Mode::Agreement => serde_json::to_string_pretty(&modes::run_agreement(raw))?,
    };
    Ok(output)
}

/// Input could not even be read; emit the mode's failure envelope so callers
/// still get the documented default payload.
fn render_failure(mode: Mode, error: &ScorerError) -> Result<String> {
    let output = match mode {
        Mode::Confidence => serde_json::to_string_pretty(&ConfidenceEnvelope::failure(error))?,
        Mode::Visual => serde_json::to_string_pretty(&VisualEnvelope::failure(error))?,
        Mode::Agreement => serde_json::to_string_pretty(&AgreementEnvelope::failure(error))?,
    };
    Ok(output)
}

fn init_logging() {
    // Scoring output goes to stdout; logs must stay on stderr.
    let filter = EnvFilter::new(config::log_level());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
