//! Tracker settings loaded from TOML.
//!
//! Every field has a default, so an empty document (or no file at all) is a
//! valid configuration.

use crate::logging::{default_log_level, parse_level};
use crate::service::reminder::ReminderPolicy;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    pub reminder: ReminderPolicy,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            reminder: ReminderPolicy::default(),
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    InvalidLogLevel(String),
    InvalidThreshold(f64),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read settings: {err}"),
            Self::Parse(err) => write!(f, "invalid settings: {err}"),
            Self::InvalidLogLevel(reason) => write!(f, "invalid log_level: {reason}"),
            Self::InvalidThreshold(value) => write!(
                f,
                "reminder.threshold_ratio must be within 0.0..=1.0, got {value}"
            ),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::InvalidLogLevel(_) | Self::InvalidThreshold(_) => None,
        }
    }
}

impl TrackerSettings {
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        let mut settings: Self = toml::from_str(text).map_err(SettingsError::Parse)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(SettingsError::Io)?;
        Self::from_toml_str(&text)
    }

    fn validate(&mut self) -> Result<(), SettingsError> {
        self.log_level = parse_level(&self.log_level)
            .map_err(SettingsError::InvalidLogLevel)?
            .to_string();

        let ratio = self.reminder.threshold_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(SettingsError::InvalidThreshold(ratio));
        }
        Ok(())
    }
}
