//! fishfeed.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FishfeedConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8001
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("./data/feed_model.json")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

impl FishfeedConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FishfeedConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Path of the redb file holding the reference brackets.
    pub fn database_path(&self) -> PathBuf {
        self.storage.data_dir.join("fishfeed.redb")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: FishfeedConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8001);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.database_path(), PathBuf::from("./data/fishfeed.redb"));
    }

    #[test]
    fn partial_sections() {
        let toml_str = r#"
[server]
port = 9000

[model]
path = "/opt/models/feed.json"
"#;
        let config: FishfeedConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.model.path, PathBuf::from("/opt/models/feed.json"));
        assert_eq!(config.storage.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn serialized_default_parses_back() {
        let toml_str = FishfeedConfig::default().to_toml_string().unwrap();
        assert!(toml_str.contains("8001"));
        let parsed: FishfeedConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.port, 8001);
    }
}
