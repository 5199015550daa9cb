//! Logging setup.
//!
//! Console logging filtered through `RUST_LOG` (default `info`). Setting
//! `TOPPREISE_LOG_DIR` additionally writes a daily-rolling file log to that
//! directory.

use std::sync::Mutex;

use anyhow::Result;
use once_cell::sync::Lazy;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Keeps the non-blocking file writer alive for the process lifetime.
static LOG_GUARD: Lazy<Mutex<Option<tracing_appender::non_blocking::WorkerGuard>>> =
    Lazy::new(|| Mutex::new(None));

pub fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let file_layer = match std::env::var("TOPPREISE_LOG_DIR") {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "toppreise-scraper.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            *LOG_GUARD.lock().expect("log guard lock") = Some(guard);
            Some(fmt::layer().with_ansi(false).with_writer(writer))
        }
        Err(_) => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}
