//! Size metrics carried by every node

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which metric a renderer should use as the node value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Newline-delimited lines of text files
    #[default]
    Lines,
    /// Size on disk of every file
    Bytes,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Lines => "lines",
            Metric::Bytes => "bytes",
        }
    }
}

/// Line and byte totals for a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub lines: u64,
    pub bytes: u64,
}

impl Metrics {
    pub const ZERO: Metrics = Metrics { lines: 0, bytes: 0 };

    pub fn new(lines: u64, bytes: u64) -> Self {
        Self { lines, bytes }
    }

    pub fn get(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Lines => self.lines,
            Metric::Bytes => self.bytes,
        }
    }
}

impl Add for Metrics {
    type Output = Metrics;

    fn add(self, rhs: Metrics) -> Metrics {
        Metrics {
            lines: self.lines + rhs.lines,
            bytes: self.bytes + rhs.bytes,
        }
    }
}

impl AddAssign for Metrics {
    fn add_assign(&mut self, rhs: Metrics) {
        self.lines += rhs.lines;
        self.bytes += rhs.bytes;
    }
}

impl Sum for Metrics {
    fn sum<I: Iterator<Item = Metrics>>(iter: I) -> Metrics {
        iter.fold(Metrics::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_sum() {
        let total: Metrics = [Metrics::new(1, 10), Metrics::new(2, 20), Metrics::ZERO]
            .into_iter()
            .sum();
        assert_eq!(total, Metrics::new(3, 30));
    }

    #[test]
    fn test_metric_selects_value() {
        let m = Metrics::new(7, 300);
        assert_eq!(m.get(Metric::Lines), 7);
        assert_eq!(m.get(Metric::Bytes), 300);
    }

    #[test]
    fn test_metric_deserializes_lowercase() {
        let metric: Metric = serde_json::from_str("\"bytes\"").unwrap();
        assert_eq!(metric, Metric::Bytes);
        assert_eq!(Metric::default(), Metric::Lines);
    }
}
