//! Console tree formatter
//!
//! Prints the aggregated tree with box-drawing prefixes and a value label on
//! every line, followed by a summary of counts and totals.

use std::io;
use termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

use crate::tree::{Content, Node, Tree};

use super::config::OutputConfig;
use super::labels::{format_number, format_size, format_value};

/// Formatter for an aggregated tree.
pub struct TreeFormatter {
    config: OutputConfig,
}

impl TreeFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Render to a plain string without colors.
    pub fn format(&self, tree: &Tree) -> String {
        let mut out = NoColor::new(Vec::new());
        // Writing into a Vec cannot fail
        let _ = self.write_tree(tree, &mut out);
        String::from_utf8_lossy(&out.into_inner()).into_owned()
    }

    pub fn print(&self, tree: &Tree) -> io::Result<()> {
        let choice = if self.config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.write_tree(tree, &mut stdout)
    }

    fn write_tree<W: WriteColor>(&self, tree: &Tree, out: &mut W) -> io::Result<()> {
        let root = tree.root();
        out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
        write!(out, "{}", tree.root_id())?;
        out.reset()?;
        self.write_value(out, root)?;

        let count = root.child_count();
        for (i, child) in root.children().enumerate() {
            self.write_node(out, child, "", i + 1 == count)?;
        }

        let (dirs, files) = tree.counts();
        let totals = tree.totals();
        writeln!(out)?;
        writeln!(
            out,
            "{} directories, {} files, {} lines, {}",
            dirs,
            files,
            format_number(totals.lines),
            format_size(totals.bytes)
        )?;
        Ok(())
    }

    fn write_node<W: WriteColor>(
        &self,
        out: &mut W,
        node: &Node,
        prefix: &str,
        is_last: bool,
    ) -> io::Result<()> {
        let connector = if is_last { "└── " } else { "├── " };
        write!(out, "{}{}", prefix, connector)?;

        let mut name_color = ColorSpec::new();
        if node.is_dir() {
            name_color.set_fg(Some(Color::Blue)).set_bold(true);
        } else {
            name_color.set_fg(Some(Color::White));
        }
        out.set_color(&name_color)?;
        write!(out, "{}", node.name())?;
        out.reset()?;
        self.write_value(out, node)?;

        let child_prefix = if is_last {
            format!("{}    ", prefix)
        } else {
            format!("{}│   ", prefix)
        };
        let count = node.child_count();
        for (i, child) in node.children().enumerate() {
            self.write_node(out, child, &child_prefix, i + 1 == count)?;
        }
        Ok(())
    }

    fn write_value<W: WriteColor>(&self, out: &mut W, node: &Node) -> io::Result<()> {
        let mut spec = ColorSpec::new();
        match node.content() {
            Content::Binary | Content::Unreadable | Content::Missing => {
                spec.set_fg(Some(Color::Yellow));
            }
            _ => {
                spec.set_fg(Some(Color::Black)).set_intense(true);
            }
        }
        write!(out, "  ")?;
        out.set_color(&spec)?;
        write!(out, "{}", format_value(node, self.config.metric))?;
        out.reset()?;
        writeln!(out)
    }
}
