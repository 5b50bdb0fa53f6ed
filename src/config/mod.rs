// Configuration management module
// Handles TOML settings and the on-disk data directory layout

pub mod settings;

pub use settings::{Config, ConfigError, OllamaConfig};

/// Resolve the default data directory for the service.
#[inline]
pub fn default_data_dir() -> Result<std::path::PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join("doc-ingest"))
        .ok_or(ConfigError::DirectoryError)
}
