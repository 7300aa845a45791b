//! Runtime configuration, loadable from a JSON file and overridable by CLI flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What a batch run does when a single query fails to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log the error and treat the query as matching nothing
    #[default]
    Skip,
    /// Stop the whole run
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub on_error: ErrorPolicy,
    /// Worker threads for index loading and batch evaluation (None = rayon default)
    pub threads: Option<usize>,
    pub progress: bool,
    pub color: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            on_error: ErrorPolicy::Skip,
            threads: None,
            progress: true,
            color: true,
        }
    }
}

impl SearchConfig {
    /// Load from a JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Size the global rayon pool. Only the first call in a process has effect.
    pub fn init_thread_pool(&self) -> Result<()> {
        if let Some(threads) = self.threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .context("Failed to configure thread pool")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.on_error, ErrorPolicy::Skip);
        assert!(config.threads.is_none());
        assert!(config.progress);
    }

    #[test]
    fn test_partial_json() {
        let config: SearchConfig = serde_json::from_str(r#"{"on_error": "abort"}"#).unwrap();
        assert_eq!(config.on_error, ErrorPolicy::Abort);
        assert!(config.color);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"threads": 2, "progress": false}}"#).unwrap();
        let config = SearchConfig::load(file.path()).unwrap();
        assert_eq!(config.threads, Some(2));
        assert!(!config.progress);
    }

    #[test]
    fn test_load_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"on_error": "retry"}}"#).unwrap();
        assert!(SearchConfig::load(file.path()).is_err());
    }
}
