//! Tree construction, aggregation and flattening
//!
//! The pipeline runs in strict sequence on one tree:
//!
//! - `build` / `TreeBuilder`: path set to deduplicated hierarchy
//! - `aggregate` / `Aggregator`: per-leaf metrics, summed bottom-up
//! - `flatten`: pre-order records with parent identities for rendering

mod aggregate;
mod builder;
mod flatten;
mod metric;
mod node;

// Re-export public types
pub use aggregate::{
    AggregateConfig, AggregateReport, Aggregator, Measurement, aggregate, count_text_lines,
    measure_leaf,
};
pub use builder::{TreeBuilder, build};
pub use flatten::{Record, flatten};
pub use metric::{Metric, Metrics};
pub use node::{Content, Node, NodeKind, Tree};

impl Tree {
    /// Aggregate sequentially and return the root totals.
    pub fn aggregate(&mut self) -> Metrics {
        aggregate(&mut self.root)
    }

    /// Aggregate with the given configuration.
    pub fn aggregate_with(&mut self, config: AggregateConfig) -> AggregateReport {
        Aggregator::new(config).aggregate(&mut self.root)
    }

    pub fn flatten(&self) -> Vec<Record<'_>> {
        flatten(self)
    }
}
