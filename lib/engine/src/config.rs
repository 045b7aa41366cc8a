use serde::{Deserialize, Serialize};
use simx_core::{Error, PoolConfig, Result};
use simx_measures::PermutationConfig;
use std::path::Path;

/// Engine settings, usually read from a JSON file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Randomizations per permutation estimate
    pub permutations: usize,
    /// Worker threads; defaults to the available parallelism
    pub workers: Option<usize>,
    /// Fixed RNG seed for reproducible p-values
    pub seed: Option<u64>,
    /// Reuse results across requests in a session
    pub cache: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let permutation = PermutationConfig::default();
        Self {
            permutations: permutation.iterations,
            workers: None,
            seed: permutation.seed,
            cache: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.permutations == 0 {
            return Err(Error::InvalidInput("permutations must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn permutation_config(&self) -> PermutationConfig {
        PermutationConfig {
            iterations: self.permutations,
            seed: self.seed,
        }
    }

    pub fn pool_config(&self) -> PoolConfig {
        let mut config = PoolConfig::default();
        if let Some(workers) = self.workers {
            config.workers = workers.max(1);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.permutations, 1000);
        assert!(config.cache);
        assert!(config.pool_config().workers >= 1);
    }

    #[test]
    fn test_partial_json() {
        let config = EngineConfig::from_json_str(r#"{"permutations": 200, "seed": 4}"#).unwrap();
        assert_eq!(config.permutations, 200);
        assert_eq!(config.permutation_config(), PermutationConfig { iterations: 200, seed: Some(4) });
        assert!(config.workers.is_none());
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"workers": 0, "cache": false}}"#).unwrap();
        let config = EngineConfig::from_path(file.path()).unwrap();
        assert_eq!(config.pool_config().workers, 1);
        assert!(!config.cache);
    }

    #[test]
    fn test_zero_permutations_rejected() {
        let err = EngineConfig::from_json_str(r#"{"permutations": 0}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::from_path(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, simx_core::Error::Io(_)));
    }
}
