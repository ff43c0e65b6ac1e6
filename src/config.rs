use colored::*;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{Result, SymdexError};
use crate::index::{BuildOptions, QueryMode, QueryOptions};

pub const CONFIG_FILE: &str = "symdex.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_search_dir")]
    pub search_dir: PathBuf,
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default)]
    pub mode: QueryMode,
    #[serde(default = "default_allow_empty")]
    pub allow_empty: bool,
}

fn default_search_dir() -> PathBuf {
    PathBuf::from("./html/search")
}

fn default_file_pattern() -> String {
    r"^all_[0-9a-f]+\.js(\.gz)?$".to_string()
}

fn default_max_results() -> usize {
    50
}

fn default_allow_empty() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_dir: default_search_dir(),
            file_pattern: default_file_pattern(),
            max_results: default_max_results(),
            mode: QueryMode::default(),
            allow_empty: default_allow_empty(),
        }
    }
}

impl Config {
    /// Read `symdex.toml` from the working directory, falling back to defaults.
    pub fn load() -> Self {
        let config_path = PathBuf::from(CONFIG_FILE);

        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    eprintln!("{} {}", "⚠️".yellow(), e);
                    eprintln!("   Using default configuration");
                }
            }
        }

        Config::default()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SymdexError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            SymdexError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;

        if config.max_results == 0 {
            return Err(SymdexError::Config(
                "max_results must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            max_results: self.max_results,
            mode: self.mode,
        }
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            allow_empty: self.allow_empty,
        }
    }
}
