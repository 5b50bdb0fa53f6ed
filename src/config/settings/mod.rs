
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use crate::embeddings::chunking::ChunkingConfig;

/// Service configuration, persisted as `config.toml` under the data
/// directory. Upload policy (accepted type, size cap) is fixed by the
/// validator and intentionally not configurable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OllamaConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub model: String,
    pub batch_size: u32,
}

impl Default for OllamaConfig {
    #[inline]
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: 11434,
            model: "nomic-embed-text:latest".to_string(),
            batch_size: 16,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Data directory not found or could not be created")]
    DirectoryError,
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
    #[error("Invalid port: {0} (must be between 1 and 65535)")]
    InvalidPort(u16),
    #[error("Invalid batch size: {0} (must be between 1 and 1000)")]
    InvalidBatchSize(u32),
    #[error("Invalid model name: {0} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid protocol: {0} (must be 'http' or 'https')")]
    InvalidProtocol(String),
    #[error("Invalid target chunk size: {0} (must be between 100 and 2048)")]
    InvalidTargetChunkSize(usize),
    #[error("Invalid max chunk size: {0} (must be between 200 and 4096)")]
    InvalidMaxChunkSize(usize),
    #[error("Invalid min chunk size: {0} (must be between 10 and 1024)")]
    InvalidMinChunkSize(usize),
    #[error("Max chunk size ({0}) must be greater than target chunk size ({1})")]
    MaxChunkSizeTooSmall(usize, usize),
    #[error("Target chunk size ({0}) must be greater than min chunk size ({1})")]
    TargetChunkSizeTooSmall(usize, usize),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Config {
    /// Load configuration from `<data_dir>/config.toml`, falling back to
    /// defaults when the file does not exist yet.
    #[inline]
    pub fn load<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let config_path = data_dir.as_ref().join("config.toml");

        if !config_path.exists() {
            return Ok(Self {
                ollama: OllamaConfig::default(),
                chunking: ChunkingConfig::default(),
                base_dir: data_dir.as_ref().to_path_buf(),
            });
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        config.base_dir = data_dir.as_ref().to_path_buf();

        config
            .validate()
            .context("Configuration validation failed")?;

        Ok(config)
    }

    #[inline]
    pub fn save(&self) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        fs::create_dir_all(&self.base_dir).with_context(|| {
            format!(
                "Failed to create data directory: {}",
                self.base_dir.display()
            )
        })?;

        let config_path = self.config_file_path();
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ollama.validate()?;
        self.validate_chunking_config()?;
        Ok(())
    }

    fn validate_chunking_config(&self) -> Result<(), ConfigError> {
        let config = &self.chunking;

        if !(100..=2048).contains(&config.target_chunk_size) {
            return Err(ConfigError::InvalidTargetChunkSize(
                config.target_chunk_size,
            ));
        }

        if !(200..=4096).contains(&config.max_chunk_size) {
            return Err(ConfigError::InvalidMaxChunkSize(config.max_chunk_size));
        }

        if !(10..=1024).contains(&config.min_chunk_size) {
            return Err(ConfigError::InvalidMinChunkSize(config.min_chunk_size));
        }

        if config.max_chunk_size <= config.target_chunk_size {
            return Err(ConfigError::MaxChunkSizeTooSmall(
                config.max_chunk_size,
                config.target_chunk_size,
            ));
        }

        if config.target_chunk_size <= config.min_chunk_size {
            return Err(ConfigError::TargetChunkSizeTooSmall(
                config.target_chunk_size,
                config.min_chunk_size,
            ));
        }

        Ok(())
    }

    #[inline]
    pub fn config_file_path(&self) -> PathBuf {
        self.base_dir.join("config.toml")
    }

    /// Path of the SQLite metadata database.
    #[inline]
    pub fn database_path(&self) -> PathBuf {
        self.base_dir.join("documents.db")
    }

    /// Flat directory holding raw uploaded blobs.
    #[inline]
    pub fn uploads_dir(&self) -> PathBuf {
        self.base_dir.join("uploads")
    }

    /// Directory holding one vector index subtree per filename stem.
    #[inline]
    pub fn indexes_dir(&self) -> PathBuf {
        self.base_dir.join("indexes")
    }
}

impl OllamaConfig {
    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.protocol != "http" && self.protocol != "https" {
            return Err(ConfigError::InvalidProtocol(self.protocol.clone()));
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.model.clone()));
        }

        if self.batch_size == 0 || self.batch_size > 1000 {
            return Err(ConfigError::InvalidBatchSize(self.batch_size));
        }

        self.endpoint()?;

        Ok(())
    }

    /// Base URL of the embedding server.
    #[inline]
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let url_str = format!("{}://{}:{}", self.protocol, self.host, self.port);
        Url::parse(&url_str).map_err(|_| ConfigError::InvalidUrl(url_str))
    }
}
