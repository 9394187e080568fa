//! Configuration management for the benchmark harness

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::runner::BenchmarkProfile;

/// Harness configuration, stored as TOML
///
/// `size`, `iterations` and `warmup_iterations` override the selected
/// profile when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Profile used when the command line does not name one
    pub profile: String,

    /// Number of elements in each input buffer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,

    /// Timed iterations per kernel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,

    /// Untimed iterations per kernel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warmup_iterations: Option<u32>,

    /// Output directory for results
    pub output_dir: PathBuf,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            profile: "standard".to_string(),
            size: None,
            iterations: None,
            warmup_iterations: None,
            output_dir: PathBuf::from("./bench_results"),
        }
    }
}

impl BenchConfig {
    /// Load configuration from file or create default
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

            let config: BenchConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

            Ok(config)
        } else {
            let config = BenchConfig::default();
            config.save(&config_path)?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".config"))
            .join("lanefold")
            .join("bench.toml")
    }

    /// Resolves a profile by name, with this file's overrides applied
    ///
    /// Unknown names fall back to the standard profile.
    pub fn resolve_profile(&self, name: Option<&str>) -> BenchmarkProfile {
        let name = name.unwrap_or(&self.profile);
        let mut profile = BenchmarkProfile::by_name(name).unwrap_or_else(|| {
            tracing::warn!("Unknown profile: {}. Using standard.", name);
            BenchmarkProfile::standard()
        });

        if let Some(size) = self.size {
            profile.sizes = vec![size];
        }
        if let Some(iterations) = self.iterations {
            profile.iterations = iterations;
        }
        if let Some(warmup) = self.warmup_iterations {
            profile.warmup_iterations = warmup;
        }
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bench.toml");

        let config = BenchConfig {
            profile: "quick".to_string(),
            size: Some(1003),
            iterations: Some(7),
            warmup_iterations: None,
            output_dir: PathBuf::from("/tmp/lanefold"),
        };
        config.save(&path).unwrap();

        assert_eq!(BenchConfig::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.toml");

        let config = BenchConfig::load(Some(&path)).unwrap();

        assert_eq!(config, BenchConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.toml");
        std::fs::write(&path, "size = 64\n").unwrap();

        let config = BenchConfig::load(Some(&path)).unwrap();

        assert_eq!(config.size, Some(64));
        assert_eq!(config.profile, "standard");

        let profile = config.resolve_profile(None);
        assert_eq!(profile.sizes, vec![64]);
        assert_eq!(profile.iterations, BenchmarkProfile::standard().iterations);
    }

    #[test]
    fn test_resolve_profile() {
        let config = BenchConfig::default();
        assert_eq!(config.resolve_profile(Some("quick")).name, "quick");
        assert_eq!(config.resolve_profile(Some("bogus")).name, "standard");
        assert_eq!(config.resolve_profile(None).name, "standard");
    }
}
