// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Runtime knobs for dialogs: defaults, then an optional JSON file, then the environment.

use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const ENV_DOUBLE_CLICK_MS: &str = "MODALIST_DOUBLE_CLICK_MS";
pub const ENV_WHEEL_STEP: &str = "MODALIST_WHEEL_STEP";
pub const ENV_FAVORITES: &str = "MODALIST_FAVORITES";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid env var {name}={value}")]
    InvalidEnv { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DialogConfig {
    pub double_click_ms: u64,
    pub wheel_step: u16,
    pub max_recent_dirs: usize,
    pub show_hidden_files: bool,
    pub favorites_path: Option<PathBuf>,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            double_click_ms: 300,
            wheel_step: 2,
            max_recent_dirs: 5,
            show_hidden_files: false,
            favorites_path: None,
        }
    }
}

impl DialogConfig {
    pub fn double_click_threshold(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    /// Loads `path` (when given) over the defaults, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_owned(), source })?;
        let config = serde_json::from_str(&raw)
            .map_err(|source| ConfigError::Json { path: path.to_owned(), source })?;
        debug!(path = %path.display(), "loaded dialog config");
        Ok(config)
    }

    /// Overrides from a variable lookup; blank values are ignored.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = non_blank(lookup(ENV_DOUBLE_CLICK_MS)) {
            self.double_click_ms = parse_env(ENV_DOUBLE_CLICK_MS, &value)?;
        }
        if let Some(value) = non_blank(lookup(ENV_WHEEL_STEP)) {
            let step: u16 = parse_env(ENV_WHEEL_STEP, &value)?;
            if step == 0 {
                return Err(ConfigError::InvalidEnv { name: ENV_WHEEL_STEP.to_owned(), value });
            }
            self.wheel_step = step;
        }
        if let Some(value) = non_blank(lookup(ENV_FAVORITES)) {
            self.favorites_path = Some(PathBuf::from(value));
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { name: name.to_owned(), value: value.to_owned() })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::{ConfigError, DialogConfig, ENV_DOUBLE_CLICK_MS, ENV_WHEEL_STEP};

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = DialogConfig::default();
        assert_eq!(config.double_click_threshold(), Duration::from_millis(300));
        assert_eq!(config.wheel_step, 2);
        assert_eq!(config.max_recent_dirs, 5);
    }

    #[test]
    fn file_values_overlay_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modalist.json");
        std::fs::write(&path, r#"{ "wheel_step": 4, "show_hidden_files": true }"#).unwrap();

        let config = DialogConfig::from_file(&path).unwrap();
        assert_eq!(config.wheel_step, 4);
        assert!(config.show_hidden_files);
        assert_eq!(config.double_click_ms, 300);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "wheel": 4 }"#).unwrap();
        assert!(matches!(DialogConfig::from_file(&path), Err(ConfigError::Json { .. })));
    }

    #[test]
    fn env_overrides_and_rejects_garbage() {
        let mut config = DialogConfig::default();
        config.apply_env(lookup(&[(ENV_DOUBLE_CLICK_MS, " 450 ")])).unwrap();
        assert_eq!(config.double_click_ms, 450);

        let err = config.apply_env(lookup(&[(ENV_WHEEL_STEP, "fast")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { ref name, .. } if name == ENV_WHEEL_STEP));

        let err = config.apply_env(lookup(&[(ENV_WHEEL_STEP, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }
}
