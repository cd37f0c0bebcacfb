//! Human-readable labels for node values

use crate::tree::{Content, Metric, Node};

/// Format a number with thousand separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Format large counts with a word: 1_200_000 -> "1.2 million".
/// Counts below one million use thousand separators.
pub fn format_count(n: u64) -> String {
    const WORDS: [(u64, &str); 3] = [
        (1_000_000_000_000, "trillion"),
        (1_000_000_000, "billion"),
        (1_000_000, "million"),
    ];

    for (scale, word) in WORDS {
        if n >= scale {
            return format!("{:.1} {}", n as f64 / scale as f64, word);
        }
    }
    format_number(n)
}

/// Format a size in bytes to human-readable format.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1}G", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1}M", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}K", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}

/// The value part of a label, without the node name.
pub fn format_value(node: &Node, metric: Metric) -> String {
    match metric {
        Metric::Bytes => format_size(node.bytes()),
        Metric::Lines => match node.content() {
            Content::Binary => "binary".to_string(),
            Content::Unreadable => "unreadable".to_string(),
            _ if node.lines() == 1 => "1 line".to_string(),
            _ => format!("{} lines", format_count(node.lines())),
        },
    }
}

/// Display label for a treemap cell: `"<name> - <value>"`.
pub fn format_label(name: &str, node: &Node, metric: Metric) -> String {
    format!("{} - {}", name, format_value(node, metric))
}
