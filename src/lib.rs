//! Sizemap - line and byte totals for every file and directory of a tree,
//! flattened for treemap rendering

pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod scan;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{FileConfig, Overrides, Settings};
pub use error::{ConfigError, MetricError, ScanError, TreeError};
pub use output::{OutputConfig, TreeFormatter, TreemapData, print_json, print_treemap};
pub use scan::{ScanConfig, collect_paths};
pub use tree::{
    AggregateConfig, AggregateReport, Aggregator, Content, Measurement, Metric, Metrics, Node,
    NodeKind, Record, Tree, TreeBuilder, aggregate, build, count_text_lines, flatten,
    measure_leaf,
};
