//! Synthesize every stack for the selected stage into a cloud assembly directory.
//!
//! `synth -c stage=prod -c alertEmail=ops@example.com --output cdk.out`

use clap::Parser;
use modular_stack::config::{parse_context_pair, DeployContext, ALERT_EMAIL_KEY, REGION_KEY, STAGE_KEY};
use modular_stack::synthesize;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "synth", version, about = "Render stage stacks as deployable templates")]
struct Cli {
    /// Context entry `key=value` (stage, region, alertEmail). Repeatable.
    #[arg(short = 'c', long = "context", value_name = "KEY=VALUE")]
    context: Vec<String>,

    /// Directory receiving templates and manifest.json.
    #[arg(short, long, default_value = "cdk.out")]
    output: PathBuf,
}

/// CLI entries win over the environment; absent keys fall back to defaults.
fn context_values(entries: &[String]) -> Result<HashMap<String, String>, Box<dyn std::error::Error>> {
    let mut values = HashMap::new();
    for (key, var) in [(STAGE_KEY, "STAGE"), (REGION_KEY, "REGION"), (ALERT_EMAIL_KEY, "ALERT_EMAIL")] {
        if let Ok(value) = std::env::var(var) {
            values.insert(key.to_string(), value);
        }
    }
    for entry in entries {
        let (key, value) = parse_context_pair(entry)?;
        values.insert(key, value);
    }
    Ok(values)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("modular_stack=info,synth=info")),
        )
        .init();

    let cli = Cli::parse();
    let ctx = DeployContext::from_values(&context_values(&cli.context)?);
    let assembly = synthesize(&ctx)?;
    assembly.write_to(&cli.output)?;
    tracing::info!(
        stage = %ctx.stage,
        stacks = ?assembly.stack_ids(),
        output = %cli.output.display(),
        "cloud assembly written"
    );
    Ok(())
}
