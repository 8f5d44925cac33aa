use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::ConfigError;
use crate::settings::{self, DEFAULT_MAX_IN_PROGRESS};

pub const DEFAULT_CONFIG_FILE: &str = ".taskboard.json";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    /// WIP limit used while the backend offers no `/settings`.
    pub max_in_progress_fallback: u32,
    pub timeout_secs: u64,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_owned(),
            max_in_progress_fallback: DEFAULT_MAX_IN_PROGRESS,
            timeout_secs: 10,
            log_file: PathBuf::from(".taskboard.log"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum InitOutcome {
    Created(PathBuf),
    AlreadyExists(PathBuf),
}

impl Config {
    /// Reads the config file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config: Config = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        settings::validate_max_in_progress(i64::from(config.max_in_progress_fallback)).map_err(
            |source| ConfigError::Invalid {
                path: path.to_owned(),
                source,
            },
        )?;
        Ok(config)
    }

    /// Writes a default config into `dir` unless one is already there.
    pub fn init(dir: &Path) -> Result<InitOutcome, ConfigError> {
        let config_path = dir.join(DEFAULT_CONFIG_FILE);
        if config_path.exists() {
            return Ok(InitOutcome::AlreadyExists(config_path));
        }
        let write_err = |source| ConfigError::Write {
            path: config_path.clone(),
            source,
        };
        fs::create_dir_all(dir).map_err(write_err)?;
        let body = serde_json::to_string_pretty(&Self::default()).map_err(|source| {
            ConfigError::Parse {
                path: config_path.clone(),
                source,
            }
        })?;
        fs::write(&config_path, body).map_err(write_err)?;
        Ok(InitOutcome::Created(config_path))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = Config::load(&dir.path().join("nope.json")).expect("defaults");
        assert_eq!(config, Config::default());
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000");
        assert_eq!(config.max_in_progress_fallback, 5);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_base_url": "http://board.local:9000"}"#).expect("write");

        let config = Config::load(&path).expect("config loads");
        assert_eq!(config.api_base_url, "http://board.local:9000");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn fallback_limit_is_range_checked() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"max_in_progress_fallback": 0}"#).expect("write");

        let err = Config::load(&path).expect_err("out of range");
        assert!(matches!(
            err,
            ConfigError::Invalid {
                source: ValidationError::LimitOutOfRange { value: 0, .. },
                ..
            }
        ));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").expect("write");

        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn init_writes_once() {
        let dir = tempfile::tempdir().expect("temp dir");
        let target = dir.path().join("board");

        let first = Config::init(&target).expect("init");
        let path = target.join(DEFAULT_CONFIG_FILE);
        assert_eq!(first, InitOutcome::Created(path.clone()));
        assert_eq!(Config::load(&path).expect("reload"), Config::default());

        let second = Config::init(&target).expect("second init");
        assert_eq!(second, InitOutcome::AlreadyExists(path));
    }
}
