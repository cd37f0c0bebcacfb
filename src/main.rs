//! CLI entry point for sizemap

use std::io::IsTerminal;
use std::path::{Component, Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, ValueEnum};
use sizemap::logging::init_logging;
use sizemap::{
    AggregateConfig, FileConfig, Metric, OutputConfig, Overrides, Settings, TreeFormatter, build,
    collect_paths, print_json, print_treemap,
};
use tracing::{debug, info};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "sizemap")]
#[command(about = "Line and byte totals for every file and directory, ready for a treemap")]
#[command(version)]
struct Args {
    /// Directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Identity of the root node (default: the directory name)
    #[arg(long = "root-id", value_name = "ID")]
    root_id: Option<String>,

    /// Metric used as the node value
    #[arg(short = 'm', long = "metric", value_name = "METRIC")]
    metric: Option<Metric>,

    /// JSON config file with ignore/extension/prefix filters
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Ignore files and directories matching pattern (can be used multiple times)
    #[arg(short = 'I', long = "ignore", value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Only include files with this extension (can be used multiple times)
    #[arg(short = 'e', long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Skip files whose name starts with prefix (can be used multiple times)
    #[arg(long = "skip-prefix", value_name = "PREFIX")]
    skip_prefixes: Vec<String>,

    /// Include hidden and .gitignore'd files
    #[arg(short, long)]
    all: bool,

    /// Output flattened records as JSON
    #[arg(long = "json", conflicts_with = "treemap")]
    json: bool,

    /// Output treemap columns (ids, labels, parents, values) as JSON
    #[arg(long = "treemap", conflicts_with = "json")]
    treemap: bool,

    /// Number of parallel workers for measuring files
    /// (0 = auto-detect, 1 = sequential, N = use N workers)
    #[arg(short = 'j', long = "jobs")]
    jobs: Option<usize>,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("sizemap: {}", message);
    process::exit(1);
}

/// Root identity fallback when the directory name is taken by a top-level entry.
/// No node can have it, since `.` segments never become nodes.
const FALLBACK_ROOT_ID: &str = ".";

/// Default root identity: the final component of the scanned directory,
/// unless a top-level entry shares that name (`proj/proj/...`).
fn default_root_id(root: &Path, paths: &[PathBuf]) -> String {
    let Some(name) = root.file_name() else {
        return root.display().to_string();
    };
    let taken = paths
        .iter()
        .any(|p| p.components().next() == Some(Component::Normal(name)));
    if taken {
        debug!(
            "'{}' is also a top-level entry, using '{}' as the root id",
            name.to_string_lossy(),
            FALLBACK_ROOT_ID
        );
        return FALLBACK_ROOT_ID.to_string();
    }
    name.to_string_lossy().to_string()
}

fn main() {
    let args = Args::parse();
    let use_color = should_use_color(args.color);
    init_logging(args.verbose, args.quiet, use_color);

    let file_config = args
        .config
        .as_deref()
        .map(|path| FileConfig::load(path).unwrap_or_else(|e| fail(e)));

    let settings = Settings::resolve(
        file_config,
        Overrides {
            ignore: args.ignore.clone(),
            extensions: args.extensions.clone(),
            skip_prefixes: args.skip_prefixes.clone(),
            all: args.all,
            metric: args.metric,
            jobs: args.jobs,
        },
    );

    let root = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(&args.path)
    };
    let root = root.canonicalize().unwrap_or(root);

    let paths = collect_paths(&root, &settings.scan).unwrap_or_else(|e| fail(e));
    info!("found {} files", paths.len());

    let root_id = args
        .root_id
        .clone()
        .unwrap_or_else(|| default_root_id(&root, &paths));
    let mut tree = build(&root_id, &root, &paths).unwrap_or_else(|e| fail(e));

    let report = tree.aggregate_with(AggregateConfig {
        parallel_workers: settings.jobs,
    });
    if !report.issues.is_empty() {
        info!(
            binary = report.binary_count(),
            unreadable = report.issues.len() - report.binary_count(),
            "some files were measured without line counts"
        );
    }

    let result = if args.json {
        print_json(&tree)
    } else if args.treemap {
        print_treemap(&tree, settings.metric)
    } else {
        TreeFormatter::new(OutputConfig {
            use_color,
            metric: settings.metric,
        })
        .print(&tree)
    };

    if let Err(e) = result {
        fail(format!("error writing output: {}", e));
    }
}
