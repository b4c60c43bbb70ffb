mod agents;
mod cli;
mod config;
mod content;
mod errors;
mod llm_client;
mod pipeline;
mod report;
mod results;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::content::formatter::format_for_platform;
use crate::content::platform::Platform;
use crate::content::scorer::score_content;
use crate::llm_client::LlmClient;
use crate::pipeline::{run_content_repurposer, PipelineSettings};
use crate::results::{summarize, ResultRow, ResultsLog};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries the generated content.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command_or_default() {
        Commands::Run {
            brief,
            results,
            no_save,
            json,
        } => run(&config, brief, results, no_save, json).await,
        Commands::Score { platform, file } => {
            let text = read_input(file.as_deref()).await?;
            let result = score_content(&config.platform_rules, &platform, &text, None);
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Commands::Format {
            platform,
            hashtags,
            file,
        } => {
            let text = read_input(file.as_deref()).await?;
            let result = format_for_platform(&config.platform_rules, &platform, &text, hashtags.as_slice());
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Commands::Summary { results } => {
            let log = ResultsLog::new(results.unwrap_or_else(|| config.results_path.clone()));
            let rows = log.load()?;
            print!("{}", report::render_summary(rows.len(), &summarize(&rows)));
            Ok(())
        }
    }
}

async fn run(
    config: &Config,
    brief: Option<String>,
    results: Option<PathBuf>,
    no_save: bool,
    json: bool,
) -> Result<()> {
    if !json {
        println!("=== Agentic Content Repurposer ===");
        println!("This will take a single brief and create LinkedIn, Instagram, and Email content.\n");
    }

    let brief = match brief {
        Some(b) => b,
        None => prompt_for_brief().await?,
    };
    let brief = brief.trim();
    if brief.is_empty() {
        println!("No brief provided. Exiting.");
        return Ok(());
    }

    let llm = LlmClient::new(config.require_api_key()?.to_string())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let settings = PipelineSettings::from(config);
    let state = run_content_repurposer(&llm, &settings, brief).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", report::render_run(&state));
    }

    if no_save {
        return Ok(());
    }

    let log = ResultsLog::new(results.unwrap_or_else(|| config.results_path.clone()));
    let test_case = log.next_test_case_id()?;
    log.append(&ResultRow::now(
        test_case,
        state.score_of(Platform::LinkedIn),
        state.score_of(Platform::Instagram),
        state.score_of(Platform::Email),
    ))?;
    info!(
        "Test results appended to {} as test_case={test_case}",
        log.path().display()
    );

    Ok(())
}

async fn prompt_for_brief() -> Result<String> {
    print!("Enter your content brief (1–3 sentences about your idea, audience, and tone):\n> ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read brief from stdin")?;
    Ok(line)
}

async fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read content from stdin")?;
            Ok(text)
        }
    }
}
