//! JSON output formatting
//!
//! Two shapes are supported: a list of records, and parallel columns that a
//! treemap component can take directly (`ids`, `labels`, `parents`,
//! `values` with `branchvalues = "total"`).

use std::io;

use serde::Serialize;

use crate::tree::{Content, Metric, NodeKind, Record, Tree, flatten};

use super::labels::format_label;

/// One flattened node in the record list output.
#[derive(Debug, Serialize)]
pub struct JsonRecord<'a> {
    pub id: &'a str,
    pub parent: &'a str,
    pub name: &'a str,
    pub kind: NodeKind,
    pub content: Content,
    pub lines: u64,
    pub bytes: u64,
}

impl<'a> From<&Record<'a>> for JsonRecord<'a> {
    fn from(record: &Record<'a>) -> Self {
        Self {
            id: record.id(),
            parent: record.parent_id(),
            name: record.name(),
            kind: record.kind(),
            content: record.content(),
            lines: record.lines(),
            bytes: record.bytes(),
        }
    }
}

/// Column data for a treemap. The first entry is the root.
#[derive(Debug, Serialize)]
pub struct TreemapData {
    pub title: String,
    pub metric: Metric,
    /// Parent values are totals of their children
    pub branchvalues: &'static str,
    pub ids: Vec<String>,
    pub labels: Vec<String>,
    pub parents: Vec<String>,
    pub values: Vec<u64>,
}

impl TreemapData {
    pub fn from_tree(tree: &Tree, metric: Metric) -> Self {
        let records = flatten(tree);
        let len = records.len() + 1;
        let mut data = Self {
            title: tree.root_id().to_string(),
            metric,
            branchvalues: "total",
            ids: Vec::with_capacity(len),
            labels: Vec::with_capacity(len),
            parents: Vec::with_capacity(len),
            values: Vec::with_capacity(len),
        };

        data.ids.push(tree.root_id().to_string());
        data.labels
            .push(format_label(tree.root_id(), tree.root(), metric));
        data.parents.push(String::new());
        data.values.push(tree.root().metrics().get(metric));

        for record in &records {
            data.ids.push(record.id().to_string());
            data.labels
                .push(format_label(record.name(), record.node(), metric));
            data.parents.push(record.parent_id().to_string());
            data.values.push(record.value(metric));
        }
        data
    }
}

/// Serialize the flattened records as a pretty JSON array.
pub fn records_to_json(tree: &Tree) -> serde_json::Result<String> {
    let records = flatten(tree);
    let json: Vec<JsonRecord<'_>> = records.iter().map(JsonRecord::from).collect();
    serde_json::to_string_pretty(&json)
}

/// Print flattened records as pretty-printed JSON to stdout.
pub fn print_json(tree: &Tree) -> io::Result<()> {
    let json = records_to_json(tree).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}

/// Print treemap column data as pretty-printed JSON to stdout.
pub fn print_treemap(tree: &Tree, metric: Metric) -> io::Result<()> {
    let json = serde_json::to_string_pretty(&TreemapData::from_tree(tree, metric))
        .map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}
