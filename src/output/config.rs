//! Output configuration types

use crate::tree::Metric;

/// Configuration for output formatting.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Metric shown next to each node and used as the treemap value
    pub metric: Metric,
}
