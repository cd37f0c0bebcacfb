//! Tree formatting and display
//!
//! This module turns an aggregated tree into output:
//! - Console tree with colors
//! - JSON record list
//! - Treemap column data (JSON)
//!
//! # Module Structure
//!
//! - `config` - Output configuration types
//! - `labels` - Number, size and label formatting
//! - `tree` - Console tree formatter
//! - `json` - JSON outputs

mod config;
mod json;
mod labels;
mod tree;

// Re-export public types and functions
pub use config::OutputConfig;
pub use json::{JsonRecord, TreemapData, print_json, print_treemap, records_to_json};
pub use labels::{format_count, format_label, format_number, format_size, format_value};
pub use tree::TreeFormatter;
