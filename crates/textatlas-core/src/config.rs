use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AtlasError, Result};

/// Top-level configuration for a text exploration run.
///
/// Loaded from a TOML file. Each section corresponds to one pipeline stage;
/// missing sections fall back to their defaults (seed 42, min_cluster_size 5,
/// 2000-char prompt cap).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default)]
    pub clustering: ClusteringConfig,
    #[serde(default)]
    pub labeling: LabelingConfig,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            projection: ProjectionConfig::default(),
            clustering: ClusteringConfig::default(),
            labeling: LabelingConfig::default(),
        }
    }
}

impl AtlasConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AtlasConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AtlasError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// Language-analysis model selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Registered lexicon name. The built-in English lexicon is
    /// "english-small".
    pub name: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "english-small".to_string(),
        }
    }
}

/// Dimensionality reduction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// RNG seed for the layout. Fixed by default so repeated runs over the
    /// same embeddings produce identical coordinates.
    pub seed: u64,
    /// Neighborhood size for the kNN graph (clamped to n-1 for small inputs).
    pub n_neighbors: usize,
    /// Number of gradient-descent refinement passes over the layout.
    pub epochs: usize,
    /// Repulsion samples drawn per edge per epoch.
    pub negative_samples: usize,
    /// Initial step size; decays linearly to zero over the epochs.
    pub learning_rate: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            n_neighbors: 15,
            epochs: 200,
            negative_samples: 5,
            learning_rate: 1.0,
        }
    }
}

/// Density clustering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Minimum number of points needed to form a cluster. Must be >= 2.
    pub min_cluster_size: usize,
    /// Neighbor count used for core distances. Defaults to
    /// `min_cluster_size` when unset; must be >= 1 and <= `min_cluster_size`.
    pub min_samples: Option<usize>,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            min_cluster_size: 5,
            min_samples: None,
        }
    }
}

/// Cluster labeling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelingConfig {
    /// Completion model identifier passed to the language-model service.
    pub model: String,
    /// Hard character cutoff applied to concatenated cluster text before it
    /// is placed in the prompt.
    pub max_prompt_chars: usize,
    /// Per-request deadline in seconds; an expired request fails that
    /// cluster's labeling.
    pub timeout_secs: u64,
    /// Upper bound on in-flight completion requests.
    pub max_concurrent_requests: usize,
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_prompt_chars: 2000,
            timeout_secs: 30,
            max_concurrent_requests: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AtlasConfig::default();
        assert_eq!(config.model.name, "english-small");
        assert_eq!(config.projection.seed, 42);
        assert_eq!(config.projection.n_neighbors, 15);
        assert_eq!(config.clustering.min_cluster_size, 5);
        assert_eq!(config.clustering.min_samples, None);
        assert_eq!(config.labeling.max_prompt_chars, 2000);
        assert_eq!(config.labeling.model, "gpt-3.5-turbo");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AtlasConfig::default();
        config.projection.seed = 7;
        config.clustering.min_cluster_size = 10;
        config.labeling.max_concurrent_requests = 2;

        config.save(&path).unwrap();
        let loaded = AtlasConfig::load(&path).unwrap();

        assert_eq!(loaded.projection.seed, 7);
        assert_eq!(loaded.clustering.min_cluster_size, 10);
        assert_eq!(loaded.labeling.max_concurrent_requests, 2);
        // Untouched sections keep their defaults.
        assert_eq!(loaded.model.name, "english-small");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = AtlasConfig::load(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AtlasConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.projection.seed, 42);
    }

    #[test]
    fn test_load_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[clustering]\nmin_cluster_size = 3\n").unwrap();

        let config = AtlasConfig::load(&path).unwrap();
        assert_eq!(config.clustering.min_cluster_size, 3);
        // Everything else defaults.
        assert_eq!(config.projection.seed, 42);
        assert_eq!(config.labeling.timeout_secs, 30);
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "projection = [[[").unwrap();

        let result = AtlasConfig::load(&path);
        assert!(matches!(result, Err(AtlasError::Config(_))));
    }

    #[test]
    fn test_min_samples_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AtlasConfig::default();
        config.clustering.min_samples = Some(3);
        config.save(&path).unwrap();

        let loaded = AtlasConfig::load(&path).unwrap();
        assert_eq!(loaded.clustering.min_samples, Some(3));
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("config.toml");

        AtlasConfig::default().save(&path).unwrap();
        assert!(path.exists());
    }
}
