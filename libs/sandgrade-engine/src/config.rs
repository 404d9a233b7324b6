// Runtime configuration for the grading engine
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Semaphore;

const DEFAULT_CONFIG_PATH: &str = "config/sandgrade.json";

fn default_racket_root() -> PathBuf {
    PathBuf::from("RacketInstalls/racket")
}

fn default_timeout_seconds() -> u64 {
    15
}

fn default_max_concurrency() -> usize {
    8
}

/// Where the bundled Racket lives and how long a submission may run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_racket_root")]
    pub racket_root: PathBuf,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Directory for harness files; the system temp dir when unset
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            racket_root: default_racket_root(),
            timeout_seconds: default_timeout_seconds(),
            max_concurrency: default_max_concurrency(),
            scratch_dir: None,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            bail!("Config file not found: {}", config_path.display());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: RuntimeConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load `config/sandgrade.json` if present, built-in defaults otherwise
    pub fn load_default() -> Result<Self> {
        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply `RACKET_ROOT`, `SANDGRADE_TIMEOUT_SECS`, `SANDGRADE_MAX_CONCURRENCY`
    /// and `SANDGRADE_SCRATCH_DIR` from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup("RACKET_ROOT") {
            self.racket_root = PathBuf::from(root);
        }
        if let Some(secs) = lookup("SANDGRADE_TIMEOUT_SECS") {
            self.timeout_seconds = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid SANDGRADE_TIMEOUT_SECS: {}", secs))?;
        }
        if let Some(limit) = lookup("SANDGRADE_MAX_CONCURRENCY") {
            self.max_concurrency = limit
                .trim()
                .parse()
                .with_context(|| format!("Invalid SANDGRADE_MAX_CONCURRENCY: {}", limit))?;
        }
        if let Some(dir) = lookup("SANDGRADE_SCRATCH_DIR") {
            self.scratch_dir = Some(PathBuf::from(dir));
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            bail!("timeout_seconds must be greater than zero");
        }
        if self.max_concurrency == 0 {
            bail!("max_concurrency must be greater than zero");
        }
        if self.max_concurrency > Semaphore::MAX_PERMITS {
            bail!(
                "max_concurrency must be at most {}, got {}",
                Semaphore::MAX_PERMITS,
                self.max_concurrency
            );
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// The interpreter binary inside the bundled installation
    pub fn interpreter_path(&self) -> PathBuf {
        self.racket_root.join("bin").join("racket")
    }

    /// Collection directory exported as `PLTCOLLECTS`
    pub fn collects_path(&self) -> PathBuf {
        self.racket_root.join("collects")
    }

    /// Check that the bundled installation looks usable
    pub fn check_installation(&self) -> Result<()> {
        let interpreter = self.interpreter_path();
        if !interpreter.is_file() {
            bail!("Racket interpreter not found at {}", interpreter.display());
        }
        let collects = self.collects_path();
        if !collects.is_dir() {
            bail!("Racket collects directory not found at {}", collects.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert_eq!(config.interpreter_path(), PathBuf::from("RacketInstalls/racket/bin/racket"));
        assert_eq!(config.collects_path(), PathBuf::from("RacketInstalls/racket/collects"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sandgrade.json");
        fs::write(&path, r#"{"racket_root": "/opt/racket", "timeout_seconds": 5}"#).unwrap();

        let config = RuntimeConfig::load(&path).unwrap();

        assert_eq!(config.racket_root, PathBuf::from("/opt/racket"));
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.scratch_dir, None);
    }

    #[test]
    fn test_load_missing_file() {
        let err = RuntimeConfig::load(Path::new("/nonexistent/sandgrade.json")).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_rejects_zero_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sandgrade.json");
        fs::write(&path, r#"{"timeout_seconds": 0}"#).unwrap();

        assert!(RuntimeConfig::load(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = RuntimeConfig::default()
            .apply_overrides(lookup_from(&[
                ("RACKET_ROOT", "/srv/racket"),
                ("SANDGRADE_TIMEOUT_SECS", " 3 "),
                ("SANDGRADE_MAX_CONCURRENCY", "2"),
                ("SANDGRADE_SCRATCH_DIR", "/var/tmp/grading"),
            ]))
            .unwrap();

        assert_eq!(config.racket_root, PathBuf::from("/srv/racket"));
        assert_eq!(config.timeout_seconds, 3);
        assert_eq!(config.max_concurrency, 2);
        assert_eq!(config.scratch_dir, Some(PathBuf::from("/var/tmp/grading")));
    }

    #[test]
    fn test_env_override_invalid_number() {
        let result = RuntimeConfig::default()
            .apply_overrides(lookup_from(&[("SANDGRADE_TIMEOUT_SECS", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_env_override_concurrency_above_permit_limit() {
        let too_many = (Semaphore::MAX_PERMITS + 1).to_string();
        let result = RuntimeConfig::default()
            .apply_overrides(lookup_from(&[("SANDGRADE_MAX_CONCURRENCY", too_many.as_str())]));

        let err = result.unwrap_err();
        assert!(err.to_string().contains("max_concurrency must be at most"));
    }

    #[test]
    fn test_check_installation() {
        let dir = tempfile::tempdir().unwrap();
        let config = RuntimeConfig {
            racket_root: dir.path().to_path_buf(),
            ..RuntimeConfig::default()
        };
        assert!(config.check_installation().is_err());

        fs::create_dir_all(dir.path().join("bin")).unwrap();
        fs::write(dir.path().join("bin").join("racket"), "").unwrap();
        fs::create_dir_all(dir.path().join("collects")).unwrap();
        assert!(config.check_installation().is_ok());
    }
}
