mod config;

pub use config::{AlarmConfig, Config, CountdownConfig, DialConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/dialtimer/`, or `$DIALTIMER_HOME` when set.
///
/// The directory is not created here; writers create it on demand.
///
/// # Errors
/// Returns an error if no home directory can be determined.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = std::env::var_os("DIALTIMER_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    let home = dirs::home_dir()
        .ok_or_else(|| ConfigError::NoDataDir("home directory not found".into()))?;
    Ok(home.join(".config").join("dialtimer"))
}
