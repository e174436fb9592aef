use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

pub const DEFAULT_TRIGGER_PHRASE: &str = "+bench";
pub const DEFAULT_COMMENT_TITLE: &str = "Benchmark results";

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BotConfig {
    pub trigger: TriggerConfig,
    pub comment: CommentConfig,
}

/// Who may start a benchmark run, and with which comment.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TriggerConfig {
    pub phrase: String,
    pub authorized_roles: Vec<String>,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        TriggerConfig {
            phrase: DEFAULT_TRIGGER_PHRASE.to_string(),
            authorized_roles: vec!["OWNER".to_string(), "MEMBER".to_string()],
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CommentConfig {
    pub title: String,
    pub show_percentiles: bool,
    pub show_statuses: bool,
}

impl Default for CommentConfig {
    fn default() -> Self {
        CommentConfig {
            title: DEFAULT_COMMENT_TITLE.to_string(),
            show_percentiles: true,
            show_statuses: true,
        }
    }
}

impl BotConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(BotConfig::default());
        }
        let config: BotConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => BotConfig::from_file(path),
            None => Ok(BotConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = BotConfig::load(None).unwrap();
        assert_eq!(config.trigger.phrase, "+bench");
        assert_eq!(config.trigger.authorized_roles, vec!["OWNER", "MEMBER"]);
        assert_eq!(config.comment.title, "Benchmark results");
        assert!(config.comment.show_percentiles);
        assert!(config.comment.show_statuses);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let yaml_content = r#"
trigger:
  phrase: "/bench"
comment:
  show_percentiles: false
"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let config = BotConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.trigger.phrase, "/bench");
        assert_eq!(config.trigger.authorized_roles, vec!["OWNER", "MEMBER"]);
        assert_eq!(config.comment.title, "Benchmark results");
        assert!(!config.comment.show_percentiles);
        assert!(config.comment.show_statuses);
    }

    #[test]
    fn test_empty_file_is_default() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = BotConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config, BotConfig::default());
    }

    #[test]
    fn test_invalid_yaml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"trigger: [unclosed").unwrap();
        let err = BotConfig::from_file(temp_file.path()).unwrap_err();
        assert!(matches!(err, Error::YamlError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = BotConfig::from_file("/nonexistent/benchbot.yaml").unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
    }
}
