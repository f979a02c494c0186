/// Server configuration loaded from a JSON file
use crate::plans::DEFAULT_STORAGE_KEY;
use crate::timetable::{TimetableError, DEFAULT_PERIOD_COUNT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "TIMETABLE_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub address: String,
    pub port: u16,
    /// SQLite file holding saved plans
    pub database_path: String,
    /// Record key the plan list is stored under
    pub storage_key: String,
    pub period_count: u32,
    /// Optional JSON file of bundled baseline courses
    pub baseline_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
            database_path: "timetable.db".to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            period_count: DEFAULT_PERIOD_COUNT,
            baseline_path: None,
        }
    }
}

impl AppConfig {
    /// Loads a configuration file; fields it omits keep their defaults
    pub fn load(path: &Path) -> Result<Self, TimetableError> {
        let content = fs::read_to_string(path).map_err(|e| TimetableError::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        let config: AppConfig = serde_json::from_str(&content).map_err(|e| TimetableError::Config {
            message: format!("failed to parse {}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads from the file named by `TIMETABLE_CONFIG`, or returns defaults if unset
    pub fn from_env() -> Result<Self, TimetableError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), TimetableError> {
        if self.period_count == 0 {
            return Err(TimetableError::Config {
                message: "period_count must be at least 1".to_string(),
            });
        }
        if self.storage_key.trim().is_empty() {
            return Err(TimetableError::Config {
                message: "storage_key must not be blank".to_string(),
            });
        }
        Ok(())
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"port": 9000, "period_count": 10}}"#).unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.period_count, 10);
        assert_eq!(config.storage_key, "saved-timetables");
        assert_eq!(config.listen_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_invalid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"period_count": 0}}"#).unwrap();
        assert!(matches!(
            AppConfig::load(file.path()),
            Err(TimetableError::Config { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "port = 9000").unwrap();
        assert!(AppConfig::load(file.path()).is_err());
    }
}
