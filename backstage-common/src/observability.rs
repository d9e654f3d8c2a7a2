//! Logging setup for the Backstage binaries.
//!
//! Events go to a daily rolling file, named `<app>.log.<YYYY-MM-DD>` with a UTC date,
//! and optionally to stderr as well. Stdout is left alone so the CLI can print its JSON
//! results there. [`init_logging`] installs the global subscriber once; later calls
//! return the first resolved file path.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

const LOG_DIR_ENV: &str = "BACKSTAGE_LOG_DIR";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Output encoding for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Configuration passed to [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Component name, used as the log file prefix and default directory name.
    pub app_name: &'static str,
    /// Directory for the log files. `None` means `BACKSTAGE_LOG_DIR`, then the
    /// platform data dir. A leading `~` is expanded.
    pub log_dir: Option<PathBuf>,
    /// Mirror every event to stderr.
    pub emit_stderr: bool,
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "backstage",
            log_dir: None,
            emit_stderr: false,
            format: LogFormat::Text,
            default_filter: "info".to_string(),
        }
    }
}

/// Where the rolling appender writes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogSink {
    dir: PathBuf,
    prefix: String,
}

impl LogSink {
    fn resolve(config: &LogConfig) -> Self {
        let dir = match &config.log_dir {
            Some(dir) => expand_tilde(dir),
            None => match std::env::var(LOG_DIR_ENV) {
                Ok(env_dir) if !env_dir.trim().is_empty() => expand_tilde(Path::new(&env_dir)),
                _ => default_data_dir(config.app_name),
            },
        };
        Self {
            dir,
            prefix: format!("{}.log", config.app_name),
        }
    }

    /// File the daily appender uses on `date`; the appender rotates on UTC days.
    fn file_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}.{}", self.prefix, date.format("%Y-%m-%d")))
    }
}

/// Install the global `tracing` subscriber and return today's log file path.
pub fn init_logging(config: LogConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let sink = LogSink::resolve(&config);
    std::fs::create_dir_all(&sink.dir)
        .with_context(|| format!("failed to create log directory: {}", sink.dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&sink.dir, &sink.prefix));
    let _ = LOG_GUARD.set(guard);

    let mut layers: Vec<BoxedLayer> = vec![format_layer(config.format, writer, false)];
    if config.emit_stderr {
        layers.push(format_layer(config.format, std::io::stderr, true));
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_filter))
        .with_context(|| format!("invalid log filter: {}", config.default_filter))?;

    tracing_subscriber::registry()
        .with(layers.with_filter(filter))
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let path = sink.file_for(Utc::now().date_naive());
    let _ = LOG_PATH.set(path.clone());
    Ok(path)
}

fn format_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer).with_ansi(ansi);
    match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    }
}

fn default_data_dir(app_name: &str) -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(app_name))
        .unwrap_or_else(|| PathBuf::from(".").join(app_name))
}
