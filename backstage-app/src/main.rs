use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use backstage_common::BackstageError;
use backstage_common::observability::{LogConfig, init_logging};
use backstage_config::{BackstageConfig, BackstageConfigLoader, default_config_path};
use clap::Parser;
use pipeline::{Mode, Runner};

mod envelope;
mod pipeline;

/// Print the latest community post of each YouTube channel page as JSON.
#[derive(Debug, Parser)]
#[command(name = "backstage", version)]
struct Cli {
    /// YAML configuration file (defaults to the platform config dir).
    #[arg(long, env = "BACKSTAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Report every post on the community tab instead of only the latest.
    #[arg(long)]
    all: bool,

    /// Pages fetched at the same time; overrides `http.concurrency`.
    #[arg(long)]
    concurrency: Option<usize>,

    /// Pretty-print each envelope.
    #[arg(long)]
    pretty: bool,

    /// Channel community page URLs.
    #[arg(required = true)]
    urls: Vec<String>,
}

fn load_config(path: Option<&PathBuf>) -> backstage_common::Result<BackstageConfig> {
    let loader = match (path, default_config_path()) {
        (Some(p), _) => BackstageConfigLoader::new().with_file(p),
        (None, Some(p)) => BackstageConfigLoader::new().with_optional_file(p),
        (None, None) => BackstageConfigLoader::new(),
    };
    loader.load().map_err(|e| BackstageError::Config(e.to_string()))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 1) Load config (env wins over the file)
    let cfg = load_config(cli.config.as_ref())?;

    // 2) Logging goes to the rolling file; stdout is reserved for envelopes
    let log_path = init_logging(LogConfig {
        app_name: "backstage",
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.stderr,
        format: cfg.logging.format,
        default_filter: cfg.logging.filter.clone(),
    })?;
    tracing::info!(log = %log_path.display(), urls = cli.urls.len(), "backstage.start");

    let runner = Runner::from_config(&cfg).context("building page fetcher")?;
    let mode = if cli.all { Mode::All } else { Mode::Latest };
    let concurrency = cli.concurrency.unwrap_or(cfg.http.concurrency);

    let envelopes = runner.run(&cli.urls, mode, concurrency).await;

    let mut out = std::io::stdout().lock();
    for env in &envelopes {
        if cli.pretty {
            serde_json::to_writer_pretty(&mut out, env)?;
        } else {
            serde_json::to_writer(&mut out, env)?;
        }
        writeln!(out)?;
    }
    out.flush()?;

    let failed = envelopes.iter().filter(|e| !e.is_success()).count();
    tracing::info!(total = envelopes.len(), failed, "backstage.done");

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
