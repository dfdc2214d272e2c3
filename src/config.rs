use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::DEFAULT_LANGUAGES;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: Option<String>,
    pub default_languages: Option<Vec<String>>,
    pub user_agent: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load config from ~/.config/yt-transcript-service/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    /// Load config from an explicit path; the file must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).wrap_err_with(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn listen_addr(&self) -> &str {
        self.listen_addr.as_deref().unwrap_or(DEFAULT_LISTEN_ADDR)
    }

    /// Configured default languages with blanks removed, or `en`
    pub fn default_languages(&self) -> Vec<String> {
        let languages: Vec<String> = self
            .default_languages
            .iter()
            .flatten()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();

        if languages.is_empty() {
            DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect()
        } else {
            languages
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("yt-transcript-service")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
listen_addr = "127.0.0.1:9000"
default_languages = ["es", "en"]
user_agent = "test-agent"
log_file = "/tmp/yt-transcript-service.log"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.listen_addr(), "127.0.0.1:9000");
        assert_eq!(config.default_languages(), vec!["es", "en"]);
        assert_eq!(config.user_agent.as_deref(), Some("test-agent"));
        assert_eq!(
            config.log_file.as_deref(),
            Some(Path::new("/tmp/yt-transcript-service.log"))
        );
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.listen_addr(), DEFAULT_LISTEN_ADDR);
        assert_eq!(config.default_languages(), vec!["en"]);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn test_blank_languages_fall_back_to_default() {
        let config: Config = toml::from_str(r#"default_languages = ["", "  "]"#).unwrap();
        assert_eq!(config.default_languages(), vec!["en"]);
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = Config::load_from(Path::new("/nonexistent/yt-transcript-service.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("yt-transcript-service-{}.toml", std::process::id()));
        std::fs::write(&path, r#"listen_addr = "127.0.0.1:8123""#).unwrap();
        let config = Config::load_from(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.listen_addr(), "127.0.0.1:8123");
    }
}
