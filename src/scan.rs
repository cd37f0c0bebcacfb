//! Path set collection
//!
//! Walks a directory and returns the file paths to measure, relative to the
//! walk root. All filtering happens here; the tree builder consumes the
//! result as-is.

use std::path::{Path, PathBuf};

use glob::Pattern;
use ignore::WalkBuilder;
use tracing::{info, warn};

use crate::error::ScanError;

/// Configuration for path collection.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Glob patterns matched against entry names. Matching directories are
    /// not descended, matching files are dropped.
    pub ignore_patterns: Vec<String>,
    /// Keep only files with one of these extensions (empty = keep all).
    /// Case-insensitive, leading dot optional.
    pub extensions: Vec<String>,
    /// Drop files whose name starts with any of these prefixes
    pub skip_prefixes: Vec<String>,
    /// Honour .gitignore/.ignore files and skip hidden entries
    pub gitignore: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: vec![".git".to_string()],
            extensions: Vec::new(),
            skip_prefixes: Vec::new(),
            gitignore: true,
        }
    }
}

/// Collect file paths under `root`, relative to it, in sorted walk order.
pub fn collect_paths(root: &Path, config: &ScanConfig) -> Result<Vec<PathBuf>, ScanError> {
    if !root.exists() {
        return Err(ScanError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let patterns = compile_patterns(&config.ignore_patterns)?;
    let extensions = normalize_extensions(&config.extensions);

    let mut builder = WalkBuilder::new(root);
    builder
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .hidden(config.gitignore)
        .parents(config.gitignore)
        .ignore(config.gitignore)
        .git_ignore(config.gitignore)
        .git_global(config.gitignore)
        .git_exclude(config.gitignore)
        .require_git(false);

    let dir_patterns = patterns.clone();
    builder.filter_entry(move |entry| {
        // Never filter the root itself
        entry.depth() == 0 || !matches_any(&dir_patterns, &entry.file_name().to_string_lossy())
    });

    let mut paths = Vec::new();
    let mut skipped = 0usize;
    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping entry: {}", err);
                continue;
            }
        };

        let path = entry.path();
        let is_file = match entry.file_type() {
            Some(ft) if ft.is_file() => true,
            // Links to files are measured through the link
            Some(ft) if ft.is_symlink() => path.is_file(),
            _ => false,
        };
        if !is_file {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !should_include_file(&name, path, &extensions, &config.skip_prefixes) {
            skipped += 1;
            continue;
        }

        match path.strip_prefix(root) {
            Ok(relative) => paths.push(relative.to_path_buf()),
            Err(_) => warn!("'{}' is outside '{}'", path.display(), root.display()),
        }
    }

    info!(
        files = paths.len(),
        skipped, "collected paths under '{}'", root.display()
    );
    Ok(paths)
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>, ScanError> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| ScanError::InvalidPattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

fn matches_any(patterns: &[Pattern], name: &str) -> bool {
    patterns
        .iter()
        .any(|p| p.as_str() == name || p.matches(name))
}

fn normalize_extensions(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Check a file against the extension and prefix filters.
fn should_include_file(
    name: &str,
    path: &Path,
    extensions: &[String],
    skip_prefixes: &[String],
) -> bool {
    if skip_prefixes
        .iter()
        .any(|prefix| !prefix.is_empty() && name.starts_with(prefix.as_str()))
    {
        return false;
    }

    if extensions.is_empty() {
        return true;
    }
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.contains(&ext))
}
