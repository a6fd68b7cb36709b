//! Health Status Predictor - Main Entry Point
//!
//! Prints exactly one label on stdout; diagnostics go to stderr.

use inference_engine::{init_logging, DiagnosticEvent, DiagnosticSink, TracingSink};
use predictor::{Predictor, PredictorConfig, REQUIRED_ARGS, USAGE};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < REQUIRED_ARGS {
        eprintln!("ERROR: missing args");
        eprintln!("{}", USAGE);
        return ExitCode::from(1);
    }

    // Configuration problems never stop a prediction.
    let (config, config_error) = match PredictorConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (PredictorConfig::default(), Some(e)),
    };
    init_logging(&config.log_level);

    let sink = TracingSink;
    if let Some(e) = config_error {
        sink.record(DiagnosticEvent::ConfigUnavailable { error: e.to_string() });
    }

    let predictor = Predictor::with_validation(config.locator(), config.validation.clone());
    let outcome = predictor.predict(&args, &sink);
    println!("{}", outcome.label);

    ExitCode::SUCCESS
}
