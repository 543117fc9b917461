use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cotton_engine::ClientSettings;
use cotton_logging::{cotton_debug, cotton_info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILENAME: &str = "cotton.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to serialize config: {0}")]
    Serialize(String),
    #[error("invalid config value {field} = {value}")]
    Invalid { field: &'static str, value: String },
}

/// Settings read from `cotton.ron`; every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
    pub log: LogDestination,
    pub preview_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            base_url: client.base_url,
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            max_response_bytes: client.max_response_bytes,
            log: LogDestination::default(),
            preview_dir: None,
        }
    }
}

impl AppConfig {
    /// Loads `explicit` if given (it must exist), else `./cotton.ron` if present,
    /// else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILENAME);
                if path.is_file() {
                    Self::from_file(&path)
                } else {
                    cotton_debug!("No {} found; using defaults", DEFAULT_CONFIG_FILENAME);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        cotton_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        ron::from_str(content).map_err(|err| err.to_string())
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())
            .map_err(|err| ConfigError::Serialize(err.to_string()))
    }

    pub fn client_settings(&self) -> Result<ClientSettings, ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "request_timeout_secs",
                value: "0".to_string(),
            });
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "base_url",
                value: self.base_url.clone(),
            });
        }
        Ok(ClientSettings {
            base_url: self.base_url.trim().to_string(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs.max(1)),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_response_bytes: self.max_response_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn omitted_keys_fall_back_to_defaults() {
        let config = AppConfig::parse(r#"(base_url: "http://10.0.0.5:9000/")"#).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:9000/");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.log, LogDestination::File);
    }

    #[test]
    fn log_destination_uses_snake_case() {
        let config = AppConfig::parse("(log: both, request_timeout_secs: 5)").unwrap();
        assert_eq!(config.log, LogDestination::Both);
        assert_eq!(
            config.client_settings().unwrap().request_timeout,
            Duration::from_secs(5)
        );
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = AppConfig {
            request_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert!(matches!(
            config.client_settings(),
            Err(ConfigError::Invalid {
                field: "request_timeout_secs",
                ..
            })
        ));
    }

    #[test]
    fn pretty_output_parses_back() {
        let config = AppConfig {
            preview_dir: Some(PathBuf::from("/tmp/previews")),
            ..AppConfig::default()
        };
        let text = config.to_ron().unwrap();
        assert_eq!(AppConfig::parse(&text).unwrap(), config);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/definitely/not/here.ron"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn reads_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "(base_url: \"http://example.test/\")").unwrap();
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.base_url, "http://example.test/");
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "(base_url: 42").unwrap();
        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
