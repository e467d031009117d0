//! Tracing setup.
//!
//! The TUI owns the terminal, so it only ever logs to
//! `$QUILL_HOME/logs/quill.log`. CLI commands additionally log warnings to
//! stderr. `QUILL_LOG` overrides every configured filter.

use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::{LogConfig, paths};

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "QUILL_LOG";

const LOG_FILE: &str = "quill.log";

/// Default stderr filter for CLI commands.
const STDERR_DEFAULT: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// CLI commands: stderr, plus the log file when enabled.
    Stderr,
    /// Full-screen UI: log file only.
    File,
}

/// Keeps the non-blocking file writer alive; drop it last.
#[must_use]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

fn env_override() -> Option<String> {
    std::env::var(LOG_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn build_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive).with_context(|| format!("Invalid log filter: {directive}"))
}

/// Filter directives for the file and stderr layers; `None` disables a layer.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Directives {
    file: Option<String>,
    stderr: Option<String>,
}

fn directives(config: &LogConfig, target: LogTarget, env: Option<&str>) -> Directives {
    let write_file = config.file || target == LogTarget::File;
    Directives {
        file: write_file.then(|| env.unwrap_or(&config.level).to_string()),
        stderr: (target == LogTarget::Stderr).then(|| env.unwrap_or(STDERR_DEFAULT).to_string()),
    }
}

/// Installs the global subscriber.
pub fn init(config: &LogConfig, target: LogTarget) -> Result<LogGuard> {
    let directives = directives(config, target, env_override().as_deref());

    let (file_layer, guard) = if let Some(directive) = &directives.file {
        let dir = paths::logs_dir();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(build_filter(directive)?);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let stderr_layer = match &directives.stderr {
        Some(directive) => Some(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .with_filter(build_filter(directive)?),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LogGuard { _file: guard })
}
