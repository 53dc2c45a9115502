use anyhow::{Context, Result};
use clap::ValueEnum;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{env, fmt::Display, fs, path::Path, str::FromStr, time::Duration};
use thiserror::Error;

pub const API_URL_VAR: &str = "FEEDBACK_API_URL";
pub const POLL_SECS_VAR: &str = "FEEDBACK_POLL_SECS";
pub const DENSITY_VAR: &str = "FEEDBACK_DENSITY";
pub const TIMEOUT_SECS_VAR: &str = "FEEDBACK_TIMEOUT_SECS";

const DEFAULT_POLL_SECS: u64 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("backend URL is not configured; set {} or pass --api-url", API_URL_VAR)]
    MissingBackendUrl,

    #[error("backend URL '{0}' must start with http:// or https://")]
    InvalidBackendUrl(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    #[default]
    Comfortable,
    Compact,
}

impl FromStr for Density {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "comfortable" => Ok(Density::Comfortable),
            "compact" => Ok(Density::Compact),
            other => Err(format!("unknown density '{other}'")),
        }
    }
}

/// Presentation knobs for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ViewConfig {
    pub poll_interval_secs: u64,
    pub density: Density,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_SECS,
            density: Density::default(),
        }
    }
}

impl ViewConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: u64,
    pub view: ViewConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            view: ViewConfig::default(),
        }
    }
}

impl Settings {
    /// Defaults, then the optional JSON file, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env(|key| env::var(key).ok());
        Ok(settings)
    }

    /// A missing file is an error; a malformed one falls back to defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        Ok(serde_json::from_str(&contents).unwrap_or_else(|err| {
            warn!(
                "Ignoring malformed settings file {}: {err}",
                path.display()
            );
            Self::default()
        }))
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_VAR) {
            self.api_base_url = Some(url);
        }
        if let Some(secs) = parse_var(&lookup, POLL_SECS_VAR) {
            self.view.poll_interval_secs = secs;
        }
        if let Some(density) = parse_var(&lookup, DENSITY_VAR) {
            self.view.density = density;
        }
        if let Some(secs) = parse_var(&lookup, TIMEOUT_SECS_VAR) {
            self.request_timeout_secs = secs;
        }
    }

    /// The validated backend base URL, without a trailing slash.
    pub fn backend_url(&self) -> Result<&str, ConfigError> {
        let url = self
            .api_base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingBackendUrl)?;

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBackendUrl(url.to_string()));
        }

        Ok(url.trim_end_matches('/'))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => {
            info!("{key} set from environment");
            Some(value)
        }
        Err(err) => {
            warn!("Invalid {key} value '{raw}': {err}, keeping default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_have_no_backend() {
        let settings = Settings::default();
        assert_eq!(settings.backend_url(), Err(ConfigError::MissingBackendUrl));
        assert_eq!(settings.view.poll_interval(), Duration::from_secs(10));
        assert_eq!(settings.view.density, Density::Comfortable);
    }

    #[test]
    fn env_overrides_and_bad_values_fall_back() {
        let mut settings = Settings::default();
        settings.apply_env(env_of(&[
            (API_URL_VAR, "http://localhost:8000/"),
            (POLL_SECS_VAR, "3"),
            (DENSITY_VAR, "Compact"),
            (TIMEOUT_SECS_VAR, "soon"),
        ]));

        assert_eq!(settings.backend_url(), Ok("http://localhost:8000"));
        assert_eq!(settings.view.poll_interval_secs, 3);
        assert_eq!(settings.view.density, Density::Compact);
        assert_eq!(settings.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn zero_poll_interval_is_clamped() {
        let view = ViewConfig {
            poll_interval_secs: 0,
            density: Density::Compact,
        };
        assert_eq!(view.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn rejects_blank_and_schemeless_urls() {
        let mut settings = Settings {
            api_base_url: Some("   ".into()),
            ..Settings::default()
        };
        assert_eq!(settings.backend_url(), Err(ConfigError::MissingBackendUrl));

        settings.api_base_url = Some("localhost:8000".into());
        assert_eq!(
            settings.backend_url(),
            Err(ConfigError::InvalidBackendUrl("localhost:8000".into()))
        );
    }

    #[test]
    fn reads_partial_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"api_base_url": "https://feedback.example.com", "view": {{"density": "compact"}}}}"#
        )
        .unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.backend_url(), Ok("https://feedback.example.com"));
        assert_eq!(settings.view.density, Density::Compact);
        assert_eq!(settings.view.poll_interval_secs, DEFAULT_POLL_SECS);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert_eq!(Settings::from_file(file.path()).unwrap(), Settings::default());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::from_file(&dir.path().join("absent.json")).is_err());
    }
}
