//! Error types for tree building, measurement, scanning and configuration

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Structural problems with an input path.
///
/// Both variants concern a single entry of the path set. `build` skips
/// malformed paths and stops on the first conflict.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("malformed path '{}': {reason}", path.display())]
    MalformedPath { path: PathBuf, reason: &'static str },

    #[error("conflicting path '{}': {reason} at '{at}'", path.display())]
    TreeConflict {
        path: PathBuf,
        /// Relative path of the node where the conflict was found.
        at: String,
        reason: &'static str,
    },
}

impl TreeError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: &'static str) -> Self {
        TreeError::MalformedPath {
            path: path.into(),
            reason,
        }
    }

    pub(crate) fn conflict(
        path: impl Into<PathBuf>,
        at: impl Into<String>,
        reason: &'static str,
    ) -> Self {
        TreeError::TreeConflict {
            path: path.into(),
            at: at.into(),
            reason,
        }
    }
}

/// Recoverable problems met while measuring a leaf.
///
/// These never abort aggregation; the leaf keeps whatever could be measured.
#[derive(Debug, Error)]
pub enum MetricError {
    #[error("'{}' is not valid UTF-8 text, counted as binary", path.display())]
    UnreadableContent { path: PathBuf },

    #[error("cannot access '{}': {source}", path.display())]
    FileSystemAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MetricError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            MetricError::UnreadableContent { path } => path,
            MetricError::FileSystemAccess { path, .. } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot access '{}': No such file or directory", .0.display())]
    NotFound(PathBuf),

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
