//! Configuration file loading and resolution against CLI flags
//!
//! Precedence, highest first: CLI flags, config file, defaults. List flags
//! extend the config file's lists instead of replacing them.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::scan::ScanConfig;
use crate::tree::Metric;

/// Contents of a JSON config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Replaces the default ignore list (`[".git"]`) when present
    pub ignore: Option<Vec<String>>,
    pub extensions: Vec<String>,
    pub skip_prefixes: Vec<String>,
    pub gitignore: Option<bool>,
    pub metric: Option<Metric>,
    pub jobs: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded config from '{}': {:?}", path.display(), config);
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub ignore: Vec<String>,
    pub extensions: Vec<String>,
    pub skip_prefixes: Vec<String>,
    /// Disable gitignore and hidden-file filtering
    pub all: bool,
    pub metric: Option<Metric>,
    pub jobs: Option<usize>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub scan: ScanConfig,
    pub metric: Metric,
    /// Parallel workers for leaf measurement (0 = auto)
    pub jobs: usize,
}

impl Settings {
    pub fn resolve(file: Option<FileConfig>, cli: Overrides) -> Self {
        let file = file.unwrap_or_default();
        let defaults = ScanConfig::default();

        let mut ignore_patterns = file.ignore.unwrap_or(defaults.ignore_patterns);
        ignore_patterns.extend(cli.ignore);

        let mut extensions = file.extensions;
        extensions.extend(cli.extensions);

        let mut skip_prefixes = file.skip_prefixes;
        skip_prefixes.extend(cli.skip_prefixes);

        let gitignore = !cli.all && file.gitignore.unwrap_or(defaults.gitignore);

        Self {
            scan: ScanConfig {
                ignore_patterns,
                extensions,
                skip_prefixes,
                gitignore,
            },
            metric: cli.metric.or(file.metric).unwrap_or_default(),
            jobs: cli.jobs.or(file.jobs).unwrap_or(0),
        }
    }
}
