use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::EngineOptions;
use crate::error::{Result, ViolationError};

const CONFIG_FILE: &str = "config.toml";
const DEFAULT_PATTERNS_FILE: &str = "patterns.toml";
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# violation-lens configuration file
# Location: ~/.violation-lens/config.toml

[engine]
# Cache classification results per exact input text
# Default: true
cache_enabled = true

# Rule-set file, relative to this directory (.toml or .json)
# Default: "patterns.toml"
patterns_file = "patterns.toml"

[log]
# One of: error, warn, info, debug, trace (RUST_LOG takes precedence)
# Default: "warn"
level = "warn"
"#;

/// Global configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Engine-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    #[serde(default = "default_patterns_file")]
    pub patterns_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_true() -> bool {
    true
}

fn default_patterns_file() -> String {
    DEFAULT_PATTERNS_FILE.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            patterns_file: default_patterns_file(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| ViolationError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self)?;

        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "engine.cache_enabled" => Some(self.engine.cache_enabled.to_string()),
            "engine.patterns_file" => Some(self.engine.patterns_file.clone()),
            "log.level" => Some(self.log.level.clone()),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = |message: &str| ViolationError::ConfigInvalidValue {
            key: key.to_string(),
            message: format!("{:?} ({})", value, message),
        };

        match key {
            "engine.cache_enabled" => {
                self.engine.cache_enabled =
                    parse_bool(value).ok_or_else(|| invalid("expected true or false"))?;
            }
            "engine.patterns_file" => {
                if value.trim().is_empty() {
                    return Err(invalid("must not be empty"));
                }
                self.engine.patterns_file = value.trim().to_string();
            }
            "log.level" => {
                let level = value.trim().to_lowercase();
                if !["error", "warn", "info", "debug", "trace", "off"].contains(&level.as_str()) {
                    return Err(invalid("unknown log level"));
                }
                self.log.level = level;
            }
            _ => {
                return Err(ViolationError::ConfigKeyNotFound {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        ["engine.cache_enabled", "engine.patterns_file", "log.level"]
            .iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }

    /// Rule-set file location under `base_dir`
    pub fn patterns_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.engine.patterns_file)
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            cache_enabled: self.engine.cache_enabled,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_config_get_set() {
        let mut config = Config::default();

        config.set("engine.cache_enabled", "false").unwrap();
        assert!(!config.engine.cache_enabled);
        assert_eq!(config.get("engine.cache_enabled").unwrap(), "false");

        config.set("log.level", "DEBUG").unwrap();
        assert_eq!(config.log.level, "debug");

        assert!(matches!(
            config.set("log.level", "loud"),
            Err(ViolationError::ConfigInvalidValue { ref key, .. }) if key == "log.level"
        ));
        assert!(matches!(
            config.set("engine.cache_enabled", "maybe"),
            Err(ViolationError::ConfigInvalidValue { .. })
        ));
        assert!(!config.engine.cache_enabled);
        assert!(matches!(
            config.set("nope", "1"),
            Err(ViolationError::ConfigKeyNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load(tmp.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.list().len(), 3);
    }

    #[test]
    fn test_init_template_parses() {
        let tmp = TempDir::new().unwrap();
        let path = Config::init(tmp.path()).unwrap();
        assert!(path.exists());
        assert_eq!(Config::load(tmp.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.set("engine.patterns_file", "rules.json").unwrap();
        config.save(tmp.path()).unwrap();

        let loaded = Config::load(tmp.path()).unwrap();
        assert_eq!(loaded.patterns_path(tmp.path()), tmp.path().join("rules.json"));
    }

    #[test]
    fn test_parse_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[engine\n").unwrap();
        assert!(matches!(
            Config::load(tmp.path()),
            Err(ViolationError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_engine_options() {
        let mut config = Config::default();
        assert!(config.engine_options().cache_enabled);
        config.engine.cache_enabled = false;
        assert!(!config.engine_options().cache_enabled);
    }
}
