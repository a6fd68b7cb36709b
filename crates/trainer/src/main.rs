//! Health Status Trainer - Main Entry Point

use anyhow::Context;
use inference_engine::init_logging;
use trainer::{train, TrainerConfig};

fn main() -> anyhow::Result<()> {
    let config = TrainerConfig::load().context("loading trainer configuration")?;
    init_logging(&config.log_level);

    println!("Loading dataset from {}", config.dataset_path.display());
    let report = train(&config)
        .with_context(|| format!("training on {}", config.dataset_path.display()))?;

    println!("Label Mapping:");
    for (label, index) in &report.label_mapping {
        println!("  {} -> {}", label, index);
    }
    println!("Model Accuracy: {:.4}", report.accuracy);
    println!("Classification Report:");
    println!("{}", report.classification);
    println!("Model saved to {}", report.model_path.display());

    Ok(())
}
