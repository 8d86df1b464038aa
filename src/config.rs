use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::fetcher::UserAgent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Directory the CSV export is written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Fixed User-Agent header; a built-in list is rotated when unset
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            user_agent: None,
        }
    }
}

impl ScraperConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn user_agent(&self) -> UserAgent {
        UserAgent::from(self.user_agent.clone())
    }
}
