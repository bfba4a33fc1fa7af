//! TOML-based application configuration.
//!
//! Stores tuning values for the timer screen:
//! - Countdown tick cadence and the text shown at zero
//! - Alarm loop count, volume and clip length
//! - Dial gesture sensitivity and the initial dial values
//!
//! Configuration is stored at `~/.config/dialtimer/config.toml`. A missing
//! file means defaults; nothing is written until a value is set.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::alarm::ClipSettings;
use crate::error::{ConfigError, ValidationError};
use crate::screen::{ScreenSettings, FINISHED_TEXT};
use crate::timer::{DialDuration, SCROLL_SENSITIVITY};

/// Countdown configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_finished_text")]
    pub finished_text: String,
}

/// Alarm configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Repetitions after the first.
    #[serde(default = "default_loops")]
    pub loops: u32,
    #[serde(default = "default_clip_period_ms")]
    pub clip_period_ms: u64,
}

/// Dial configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialConfig {
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
    #[serde(default)]
    pub default_hours: u32,
    #[serde(default)]
    pub default_minutes: u32,
    #[serde(default)]
    pub default_seconds: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/dialtimer/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub countdown: CountdownConfig,
    #[serde(default)]
    pub alarm: AlarmConfig,
    #[serde(default)]
    pub dial: DialConfig,
}

// Default functions
fn default_tick_interval_ms() -> u64 {
    1_000
}
fn default_finished_text() -> String {
    FINISHED_TEXT.into()
}
fn default_true() -> bool {
    true
}
fn default_volume() -> f32 {
    1.0
}
fn default_loops() -> u32 {
    10
}
fn default_clip_period_ms() -> u64 {
    1_000
}
fn default_sensitivity() -> f64 {
    SCROLL_SENSITIVITY
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            finished_text: default_finished_text(),
        }
    }
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: default_volume(),
            loops: default_loops(),
            clip_period_ms: default_clip_period_ms(),
        }
    }
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            default_hours: 0,
            default_minutes: 0,
            default_seconds: 0,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|e| invalid(e.to_string()))?,
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) => return Err(unknown()),
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Path of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, or defaults if there is no file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("using default config: {e}");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// as the existing type, or the result fails validation.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a value by key and save. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Reject values the timer cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| {
            Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: message.to_string(),
            })
        };

        if self.countdown.tick_interval_ms == 0 {
            return invalid("countdown.tick_interval_ms", "must be greater than 0");
        }
        if self.alarm.clip_period_ms == 0 {
            return invalid("alarm.clip_period_ms", "must be greater than 0");
        }
        if !(0.0..=1.0).contains(&self.alarm.volume) {
            return invalid("alarm.volume", "must be between 0.0 and 1.0");
        }
        if !(self.dial.sensitivity.is_finite() && self.dial.sensitivity > 0.0) {
            return invalid("dial.sensitivity", "must be a positive number");
        }
        if let Err(e) = self.initial_dial() {
            let ValidationError::OutOfRange { unit, .. } = &e;
            return invalid(&format!("dial.default_{unit}s"), &e.to_string());
        }
        Ok(())
    }

    /// The dial values the screen opens with.
    pub fn initial_dial(&self) -> Result<DialDuration, ValidationError> {
        DialDuration::new(
            self.dial.default_hours,
            self.dial.default_minutes,
            self.dial.default_seconds,
        )
    }

    pub fn screen_settings(&self) -> ScreenSettings {
        ScreenSettings {
            sensitivity: self.dial.sensitivity,
            tick_interval: Duration::from_millis(self.countdown.tick_interval_ms),
            finished_text: self.countdown.finished_text.clone(),
        }
    }

    pub fn clip_settings(&self) -> ClipSettings {
        ClipSettings {
            loops: self.alarm.loops,
            volume: self.alarm.volume,
            period: Duration::from_millis(self.alarm.clip_period_ms),
        }
    }
}
