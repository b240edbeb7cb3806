//! Configuration management for the CLI.
//!
//! Stored as TOML at `~/.quarry/config.toml` unless `--config` points
//! elsewhere.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name
    #[serde(default = "default_profile")]
    pub active_profile: String,

    /// Available profiles
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Connection profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Contentful space and tokens
    #[serde(default)]
    pub contentful: ContentfulProfile,

    /// OpenSearch cluster and index
    #[serde(default)]
    pub opensearch: OpenSearchProfile,

    /// Model used to embed search questions
    #[serde(default)]
    pub embedding: EmbeddingProfile,
}

/// Contentful settings of a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentfulProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

/// OpenSearch settings of a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenSearchProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

/// Embedding model settings of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingProfile {
    /// Which model implementation to use
    #[serde(default)]
    pub provider: EmbeddingProvider,

    /// Ollama server root
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Ollama model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Expected vector length, 0 to accept any
    #[serde(default)]
    pub dimension: usize,
}

/// Embedding implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Ollama HTTP server
    #[default]
    Ollama,
    /// Deterministic hash-based vectors, no network
    Mock,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (text only) format
    Quiet,
}

impl Config {
    /// Default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".quarry").join("config.toml"))
    }

    /// Load configuration from `path`, or the default if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the active profile.
    pub fn get_active_profile(&self) -> Result<&Profile> {
        self.profiles
            .get(&self.active_profile)
            .ok_or_else(|| CliError::Config(format!("Profile '{}' not found", self.active_profile)))
    }

    /// Add or update a profile.
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Switch to a different profile.
    pub fn switch_profile(&mut self, name: String) -> Result<()> {
        if !self.profiles.contains_key(&name) {
            return Err(CliError::Config(format!("Profile '{}' does not exist", name)));
        }
        self.active_profile = name;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert("default".to_string(), Profile::default());

        Self {
            active_profile: "default".to_string(),
            profiles,
            settings: Settings::default(),
        }
    }
}

impl Default for EmbeddingProfile {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::Ollama,
            endpoint: default_endpoint(),
            model: default_model(),
            dimension: 0,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_endpoint() -> String {
    quarry_embed::ollama::DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    "nomic-embed-text".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.active_profile, "default");
        assert!(config.profiles.contains_key("default"));
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
    }

    #[test]
    fn test_profile_management() {
        let mut config = Config::default();

        let mut profile = Profile::default();
        profile.contentful.space_id = Some("sp1".to_string());
        config.set_profile("staging".to_string(), profile);
        assert!(config.profiles.contains_key("staging"));

        config.switch_profile("staging".to_string()).unwrap();
        assert_eq!(config.active_profile, "staging");
        assert_eq!(
            config.get_active_profile().unwrap().contentful.space_id.as_deref(),
            Some("sp1")
        );
    }

    #[test]
    fn test_switch_to_nonexistent_profile() {
        let mut config = Config::default();
        let result = config.switch_profile("nonexistent".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        let mut profile = Profile::default();
        profile.opensearch.url = Some("localhost:9200".to_string());
        profile.opensearch.index = Some("docs".to_string());
        profile.embedding.provider = EmbeddingProvider::Mock;
        profile.embedding.dimension = 8;
        config.set_profile("local".to_string(), profile);
        config.settings.format = OutputFormat::Json;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_gives_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "active_profile = \"work\"\n\n[profiles.work.contentful]\nspace_id = \"abc\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        let profile = config.get_active_profile().unwrap();
        assert_eq!(profile.contentful.space_id.as_deref(), Some("abc"));
        assert_eq!(profile.embedding, EmbeddingProfile::default());
        assert!(config.settings.color);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "active_profile = [").unwrap();
        assert!(matches!(Config::load(&path), Err(CliError::Toml(_))));
    }
}
