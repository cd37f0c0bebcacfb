//! Bottom-up metric aggregation
//!
//! Leaves are measured from the filesystem first (optionally in parallel),
//! then every directory is set to the sum of its children in a single
//! post-order pass. Unreadable or binary files never abort the run; they are
//! recorded as issues and contribute whatever could be measured.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::MetricError;

use super::metric::Metrics;
use super::node::{Content, Node};

/// Read buffer for line counting; bounds memory regardless of file size.
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Configuration for metric aggregation.
#[derive(Debug, Clone)]
pub struct AggregateConfig {
    /// Number of parallel workers for leaf measurement.
    /// 0 = auto-detect (rayon's global pool)
    /// 1 = sequential
    /// N = dedicated pool of N threads
    pub parallel_workers: usize,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            parallel_workers: 1,
        }
    }
}

/// Outcome of one aggregation run.
#[derive(Debug, Default)]
pub struct AggregateReport {
    /// Totals of the root, equal to the sum over all leaves
    pub totals: Metrics,
    /// Recoverable problems, in traversal order
    pub issues: Vec<MetricError>,
}

impl AggregateReport {
    pub fn binary_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| matches!(i, MetricError::UnreadableContent { .. }))
            .count()
    }
}

#[derive(Debug, Default)]
pub struct Aggregator {
    config: AggregateConfig,
}

impl Aggregator {
    pub fn new(config: AggregateConfig) -> Self {
        Self { config }
    }

    /// Measure every leaf below `root`, then sum directories up to `root`.
    ///
    /// `root` itself is always treated as a directory, so an empty tree
    /// aggregates to zero without touching the filesystem.
    pub fn aggregate(&self, root: &mut Node) -> AggregateReport {
        let issues: Vec<MetricError> = {
            let mut leaves = Vec::new();
            for child in root.children.values_mut() {
                collect_leaves(child, &mut leaves);
            }
            debug!(leaves = leaves.len(), "measuring leaves");
            self.measure_all(&mut leaves).into_iter().flatten().collect()
        };

        let totals = sum_children(root);
        AggregateReport { totals, issues }
    }

    fn measure_all(&self, leaves: &mut [&mut Node]) -> Vec<Option<MetricError>> {
        match self.config.parallel_workers {
            1 => leaves.iter_mut().map(|leaf| measure_into(leaf)).collect(),
            0 => leaves.par_iter_mut().map(|leaf| measure_into(leaf)).collect(),
            workers => match rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
            {
                Ok(pool) => {
                    pool.install(|| leaves.par_iter_mut().map(|leaf| measure_into(leaf)).collect())
                }
                Err(err) => {
                    // Fall back to rayon's global pool if custom pool creation fails
                    warn!("cannot start {} workers ({}), using the global pool", workers, err);
                    leaves.par_iter_mut().map(|leaf| measure_into(leaf)).collect()
                }
            },
        }
    }
}

/// Aggregate sequentially and return the root totals.
pub fn aggregate(root: &mut Node) -> Metrics {
    Aggregator::default().aggregate(root).totals
}

fn collect_leaves<'a>(node: &'a mut Node, out: &mut Vec<&'a mut Node>) {
    if node.children.is_empty() {
        out.push(node);
    } else {
        for child in node.children.values_mut() {
            collect_leaves(child, out);
        }
    }
}

fn measure_into(leaf: &mut Node) -> Option<MetricError> {
    let measured = measure_leaf(&leaf.full_path);
    leaf.metrics = measured.metrics;
    leaf.content = measured.content;
    measured.issue
}

/// Post-order sum. Leaves must already be measured.
fn sum_children(node: &mut Node) -> Metrics {
    let total = node
        .children
        .values_mut()
        .map(|child| {
            if child.children.is_empty() {
                child.metrics
            } else {
                sum_children(child)
            }
        })
        .sum();
    node.metrics = total;
    node.content = Content::Directory;
    total
}

/// Result of measuring a single leaf.
#[derive(Debug)]
pub struct Measurement {
    pub metrics: Metrics,
    pub content: Content,
    pub issue: Option<MetricError>,
}

impl Measurement {
    fn ok(metrics: Metrics, content: Content) -> Self {
        Self {
            metrics,
            content,
            issue: None,
        }
    }
}

/// Measure the entry at `path`.
///
/// Bytes come from the entry's metadata and are kept even when the content
/// cannot be read or decoded. A directory or vanished path has no metrics
/// of its own.
pub fn measure_leaf(path: &Path) -> Measurement {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("'{}' no longer exists", path.display());
            return Measurement::ok(Metrics::ZERO, Content::Missing);
        }
        Err(source) => {
            warn!("cannot stat '{}': {}", path.display(), source);
            return Measurement {
                metrics: Metrics::ZERO,
                content: Content::Unreadable,
                issue: Some(MetricError::FileSystemAccess {
                    path: path.to_path_buf(),
                    source,
                }),
            };
        }
    };

    if metadata.is_dir() {
        return Measurement::ok(Metrics::ZERO, Content::Directory);
    }

    let bytes = metadata.len();
    if !metadata.is_file() {
        // Sockets, FIFOs and devices are never read
        return Measurement::ok(Metrics::new(0, bytes), Content::Binary);
    }

    match count_text_lines(path) {
        Ok(Some(lines)) => Measurement::ok(Metrics::new(lines, bytes), Content::Text),
        Ok(None) => {
            debug!("'{}' is binary", path.display());
            Measurement {
                metrics: Metrics::new(0, bytes),
                content: Content::Binary,
                issue: Some(MetricError::UnreadableContent {
                    path: path.to_path_buf(),
                }),
            }
        }
        Err(source) => {
            warn!("cannot read '{}': {}", path.display(), source);
            Measurement {
                metrics: Metrics::new(0, bytes),
                content: Content::Unreadable,
                issue: Some(MetricError::FileSystemAccess {
                    path: path.to_path_buf(),
                    source,
                }),
            }
        }
    }
}

/// Count lines in a file, or `None` if it is not valid UTF-8.
pub fn count_text_lines(path: &Path) -> io::Result<Option<u64>> {
    let mut file = File::open(path)?;
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    let mut counter = LineCounter::default();

    loop {
        let n = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        if !counter.feed(&buf[..n]) {
            return Ok(None);
        }
    }
    Ok(counter.finish())
}

/// Streaming newline counter that also validates UTF-8 across chunk edges.
#[derive(Debug, Default)]
struct LineCounter {
    newlines: u64,
    last: Option<u8>,
    /// Trailing bytes of an incomplete multi-byte sequence
    pending: Vec<u8>,
}

impl LineCounter {
    /// Returns false as soon as the content is known not to be UTF-8.
    fn feed(&mut self, chunk: &[u8]) -> bool {
        if chunk.is_empty() {
            return true;
        }
        self.newlines += chunk.iter().filter(|&&b| b == b'\n').count() as u64;
        self.last = chunk.last().copied();

        let joined;
        let bytes = if self.pending.is_empty() {
            chunk
        } else {
            let mut j = std::mem::take(&mut self.pending);
            j.extend_from_slice(chunk);
            joined = j;
            &joined[..]
        };

        match std::str::from_utf8(bytes) {
            Ok(_) => true,
            Err(err) if err.error_len().is_none() => {
                self.pending = bytes[err.valid_up_to()..].to_vec();
                true
            }
            Err(_) => false,
        }
    }

    fn finish(self) -> Option<u64> {
        if !self.pending.is_empty() {
            return None;
        }
        // A last line without a trailing newline still counts
        Some(match self.last {
            None => 0,
            Some(b'\n') => self.newlines,
            Some(_) => self.newlines + 1,
        })
    }
}
