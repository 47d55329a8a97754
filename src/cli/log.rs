use std::{
    fs::{OpenOptions, create_dir_all},
    path::PathBuf,
    sync::Mutex,
};

use chrono::Local;
use clap::{
    Parser,
    builder::{BoolishValueParser, FalseyValueParser},
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{format::Writer, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::prelude::*;

#[derive(Parser)]
pub struct LogArgs {
    /// Log at the debug level.
    #[clap(short, long, env = "VERBOSE", value_parser = BoolishValueParser::new())]
    pub verbose: bool,

    /// Disable the ANSI colors on the console.
    ///
    /// `NO_COLOR` disables them too, unless it is empty or one of `0`, `false`, `no`, `off`, `n`, `f`.
    #[clap(long = "no-color", env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    /// Also append the log lines to this file, without colors.
    #[clap(long = "log-file", env = "LOG_FILE")]
    pub file: Option<PathBuf>,
}

impl LogArgs {
    /// Install the global subscriber.
    ///
    /// `RUST_LOG`, when set, takes precedence over `--verbose`.
    pub fn init(&self) -> Result {
        let level = if self.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
        let filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();
        let console_layer = tracing_subscriber::fmt::layer()
            .with_timer(LocalTime)
            .with_target(false)
            .with_ansi(!self.no_color);
        let file_layer = match &self.file {
            Some(path) => {
                if let Some(parent) = path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    create_dir_all(parent).with_context(|| {
                        format!("failed to create the log directory `{}`", parent.display())
                    })?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("failed to open the log file `{}`", path.display()))?;
                Some(
                    tracing_subscriber::fmt::layer()
                        .with_timer(LocalTime)
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
            }
            None => None,
        };
        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .context("failed to install the tracing subscriber")
    }
}

/// Local time as `2025-10-12/14:03:27`.
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, writer: &mut Writer<'_>) -> std::fmt::Result {
        write!(writer, "{}", Local::now().format("%Y-%m-%d/%H:%M:%S"))
    }
}
