use std::fs::OpenOptions;
use std::sync::Mutex;

use dialtimer_core::storage::data_dir;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "dialtimer.log";

pub enum LogTarget {
    Stderr,
    /// Append to `dialtimer.log` in the data directory so the
    /// alternate screen is not scribbled over.
    File,
}

/// Install the global subscriber. Filter comes from `RUST_LOG`, default `warn`.
pub fn init(target: LogTarget) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogTarget::File => {
            let file = data_dir().ok().and_then(|dir| {
                std::fs::create_dir_all(&dir).ok()?;
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(dir.join(LOG_FILE))
                    .ok()
            });
            // No log file means no logging at all; stderr belongs to the screen.
            if let Some(file) = file {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
            }
        }
    }
}
