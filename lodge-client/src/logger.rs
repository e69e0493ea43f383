//! Logging Infrastructure
//!
//! Console output always; a daily rolling `lodge-admin.YYYY-MM-DD` file is
//! added when a log directory is given. `RUST_LOG` overrides `level`.

use std::fs;
use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// File name prefix of the rolling log
pub const LOG_FILE_PREFIX: &str = "lodge-admin";

/// Initialize the logging system
///
/// # Examples
/// ```no_run
/// // console only
/// lodge_client::logger::init_logger("debug", None)?;
///
/// // console + ./logs/lodge-admin.YYYY-MM-DD
/// lodge_client::logger::init_logger("info", Some(std::path::Path::new("./logs")))?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logger(level: &str, log_dir: Option<&Path>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_layer = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_writer(std::sync::Mutex::new(appender)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}
