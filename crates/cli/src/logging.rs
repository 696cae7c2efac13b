use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Keeps the log file writer alive; dropping it flushes pending lines.
pub struct LogGuard {
    _file: Option<WorkerGuard>,
    pub log_path: Option<PathBuf>,
}

pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

pub fn log_file_name(started: &DateTime<Local>) -> String {
    format!("livetidy_{}.log", started.format("%Y-%m-%d_%H-%M-%S"))
}

/// Stderr follows `-v`; the optional execution log in `log_dir` always
/// records INFO and above.
pub fn init(verbosity: u8, log_dir: Option<&Path>, started: &DateTime<Local>) -> Result<LogGuard> {
    let filter = EnvFilter::from_default_env().add_directive(level_for(verbosity).into());
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .with_filter(filter);

    let (file_layer, guard, log_path) = match log_dir {
        Some(dir) => {
            let name = log_file_name(started);
            let path = dir.join(&name);
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to create log file: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false)
                .with_filter(LevelFilter::INFO);
            (Some(layer), Some(guard), Some(path))
        }
        None => (None, None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to initialise logging")?;

    Ok(LogGuard {
        _file: guard,
        log_path,
    })
}
