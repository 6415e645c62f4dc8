//! Configuration file loading and saving

use super::file::{ConfigFile, CONFIG_FILE_NAME};
use crate::error::PagePulseError;
use crate::infra::{FileSystem, RealFileSystem};
use anyhow::{Context, Result};
use std::path::Path;

/// Handles loading and saving configuration files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from .pagepulse.toml in the given directory.
    ///
    /// A missing file yields the default configuration; an unparseable or
    /// invalid file is an error.
    pub fn load(project_root: &Path) -> Result<ConfigFile> {
        Self::load_with_fs(project_root, &RealFileSystem)
    }

    /// Load config with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(project_root: &Path, fs: &FS) -> Result<ConfigFile> {
        let config_path = project_root.join(CONFIG_FILE_NAME);

        let contents = match fs.read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ConfigFile::default());
            }
            Err(e) => {
                return Err(e).context("Failed to read .pagepulse.toml");
            }
        };

        let config: ConfigFile = toml_edit::de::from_str(&contents).map_err(|e| {
            PagePulseError::ConfigInvalid {
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config
            .validate()
            .map_err(|reason| PagePulseError::ConfigInvalid {
                path: config_path,
                reason,
            })?;

        Ok(config)
    }

    /// Save config to .pagepulse.toml in the given directory
    pub fn save<FS: FileSystem>(project_root: &Path, config: &ConfigFile, fs: &FS) -> Result<()> {
        let config_path = project_root.join(CONFIG_FILE_NAME);
        let contents =
            toml_edit::ser::to_string_pretty(config).context("Failed to serialize config")?;
        fs.write(&config_path, contents)
            .context("Failed to write .pagepulse.toml")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigLoader::load(temp_dir.path()).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = ConfigFile::default();
        config.backend.sample_rate = 0.25;
        config.report.html = true;

        ConfigLoader::save(temp_dir.path(), &config, &RealFileSystem).unwrap();
        let loaded = ConfigLoader::load(temp_dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "not = [valid").unwrap();
        assert!(ConfigLoader::load(temp_dir.path()).is_err());
    }

    #[test]
    fn test_semantically_invalid_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[frontend]\nsample_rate = 2.0\n",
        )
        .unwrap();
        let err = ConfigLoader::load(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }
}
