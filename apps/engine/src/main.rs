use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use interview_engine::config::Config;
use interview_engine::interview::profile::{ResumeData, VacancyData};
use interview_engine::{
    simulate_interview, AnthropicClient, GenerationClient, SimulationOptions, UsageCounter,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting interview engine v{}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let resume_path = args.next().context("usage: interview-engine <resume.json> <vacancy.json>")?;
    let vacancy_path = args.next().context("usage: interview-engine <resume.json> <vacancy.json>")?;

    let resume: ResumeData = read_json(&resume_path)?;
    let vacancy: VacancyData = read_json(&vacancy_path)?;

    let recorder = Arc::new(UsageCounter::new(config.generation_enabled));
    let client = GenerationClient::new(
        Arc::new(AnthropicClient::new(config.anthropic_api_key.clone())),
        Arc::clone(&recorder) as Arc<dyn interview_engine::UsageRecorder>,
        Duration::from_secs(config.generation_timeout_secs),
    );

    let options = SimulationOptions {
        overrides: None,
        progress: Some(Box::new(|round, total| {
            info!("completed round {round}/{total}");
        })),
    };

    let simulation = simulate_interview(&client, &resume, &vacancy, options).await?;

    println!("{}", serde_json::to_string_pretty(&simulation)?);
    info!(
        "usage: {} calls, {} tokens, {} failures",
        client.usage().total,
        client.usage().tokens,
        client.usage().failures
    );

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("cannot read {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("cannot parse {path}"))
}
