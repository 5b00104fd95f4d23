use crate::config::Settings;
use crate::engine::HeadlessOfficeEngine;
use crate::location;
use crate::model::PricingInputs;
use crate::orchestrator::Orchestrator;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(
    name = "quote-pricing-cli",
    version,
    about = "Price quoting against an external costing workbook"
)]
pub struct Cli {
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute a priced breakdown (served from cache when unchanged).
    Price {
        workbook: String,
        /// Pricing inputs as a JSON object; defaults apply for omitted fields.
        #[arg(long)]
        inputs: Option<String>,
        #[arg(long)]
        margin: Option<f64>,
    },
    /// Invalidate the cache and recompute.
    Refresh {
        workbook: String,
        #[arg(long)]
        inputs: Option<String>,
        #[arg(long)]
        margin: Option<f64>,
    },
    /// Show how a workbook location would be classified.
    Classify { path: String },
}

pub async fn run_command(command: Commands) -> Result<Value> {
    match command {
        Commands::Price {
            workbook,
            inputs,
            margin,
        } => price(workbook, inputs, margin, false).await,
        Commands::Refresh {
            workbook,
            inputs,
            margin,
        } => price(workbook, inputs, margin, true).await,
        Commands::Classify { path } => {
            let location = location::classify(&path);
            Ok(json!({
                "path": location.raw,
                "kind": location.kind,
                "reachable": location.signature.is_some(),
            }))
        }
    }
}

async fn price(
    workbook: String,
    inputs: Option<String>,
    margin: Option<f64>,
    refresh: bool,
) -> Result<Value> {
    let mut inputs: PricingInputs = match inputs {
        Some(raw) => serde_json::from_str(&raw).context("failed to parse --inputs JSON")?,
        None => PricingInputs::default(),
    };
    if let Some(margin) = margin {
        inputs.margin = margin;
    }

    let settings = Settings {
        workbook_path: workbook,
        engine_binary: engine_binary_from_env(),
        ..Settings::default()
    };
    let engine = Arc::new(HeadlessOfficeEngine::new(settings.engine_binary.clone()));
    let orchestrator = Orchestrator::new(engine);

    let result = if refresh {
        orchestrator
            .refresh(&settings.workbook_path, &inputs, &settings)
            .await?
    } else {
        orchestrator.compute(&inputs, &settings).await?
    };
    Ok(serde_json::to_value(result)?)
}

fn engine_binary_from_env() -> Option<PathBuf> {
    std::env::var_os("QUOTE_PRICING_ENGINE_BINARY").map(PathBuf::from)
}

pub fn emit_value(value: &Value, compact: bool) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    if compact {
        serde_json::to_writer(&mut handle, value)?;
    } else {
        serde_json::to_writer_pretty(&mut handle, value)?;
    }
    use std::io::Write;
    handle.write_all(b"\n")?;
    Ok(())
}
