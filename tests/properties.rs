//! Property tests for tree construction, aggregation and flattening

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use proptest::prelude::*;
use sizemap::{Metrics, NodeKind, Tree, TreeBuilder, build};
use tempfile::TempDir;

/// Drop every path that would make the set conflict: a path that is a
/// segment-wise prefix of another, or that extends an earlier file.
fn prefix_free(paths: Vec<String>) -> Vec<String> {
    let unique: BTreeSet<String> = paths.into_iter().collect();
    let unique: Vec<String> = unique.into_iter().collect();
    unique
        .iter()
        .filter(|p| {
            !unique
                .iter()
                .any(|other| other.len() > p.len() && other.starts_with(&format!("{}/", p)))
        })
        .cloned()
        .collect()
}

fn path_set() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::collection::vec("[a-c]{1,2}", 1..4).prop_map(|segments| segments.join("/")),
        0..24,
    )
    .prop_map(prefix_free)
}

/// A path set together with an arbitrary permutation of it.
fn shuffled_path_set() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    path_set().prop_flat_map(|paths| (Just(paths.clone()), Just(paths).prop_shuffle()))
}

fn distinct_prefixes(paths: &[String]) -> usize {
    let mut prefixes = HashSet::new();
    for path in paths {
        let mut current = String::new();
        for segment in path.split('/') {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);
            prefixes.insert(current.clone());
        }
    }
    prefixes.len()
}

fn shape(tree: &Tree) -> Vec<(String, String, NodeKind)> {
    tree.flatten()
        .iter()
        .map(|r| (r.parent_id().to_string(), r.id().to_string(), r.kind()))
        .collect()
}

fn write_files(dir: &Path, paths: &[String]) {
    for (i, path) in paths.iter().enumerate() {
        let full = dir.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, "x\n".repeat(i + 1)).unwrap();
    }
}

fn check_sums(node: &sizemap::Node) {
    if node.kind() == NodeKind::Directory {
        let sum: Metrics = node.children().map(|c| c.metrics()).sum();
        assert_eq!(node.metrics(), sum, "'{}'", node.relative_path());
    }
    for child in node.children() {
        check_sums(child);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_path_becomes_one_leaf(paths in path_set()) {
        let tree = build("ROOT", Path::new(""), &paths).unwrap();

        prop_assert_eq!(tree.root().files().len(), paths.len());
        prop_assert_eq!(tree.root().node_count() - 1, distinct_prefixes(&paths));
        for path in &paths {
            let node = tree.find(path).unwrap();
            prop_assert_eq!(node.kind(), NodeKind::File);
            prop_assert_eq!(node.relative_path(), path.as_str());
        }
    }

    #[test]
    fn insertion_order_does_not_change_the_tree((paths, shuffled) in shuffled_path_set()) {
        let sorted = build("ROOT", Path::new(""), &paths).unwrap();
        let permuted = build("ROOT", Path::new(""), &shuffled).unwrap();
        prop_assert_eq!(shape(&sorted), shape(&permuted));
    }

    #[test]
    fn repeated_inserts_are_idempotent(paths in path_set()) {
        let once = build("ROOT", Path::new(""), &paths).unwrap();

        let mut builder = TreeBuilder::new("ROOT", "");
        for path in paths.iter().chain(paths.iter()) {
            builder.insert(Path::new(path)).unwrap();
        }
        let twice = builder.finish();
        prop_assert_eq!(shape(&once), shape(&twice));
    }

    #[test]
    fn parents_are_emitted_before_children(paths in path_set()) {
        let tree = build("ROOT", Path::new(""), &paths).unwrap();
        let records = tree.flatten();
        prop_assert_eq!(records.len(), tree.root().node_count() - 1);

        let mut seen: HashSet<&str> = HashSet::from(["ROOT"]);
        for record in &records {
            prop_assert!(seen.contains(record.parent_id()));
            prop_assert!(seen.insert(record.id()), "duplicate id {}", record.id());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn directory_metrics_sum_their_children(paths in path_set()) {
        let dir = TempDir::new().unwrap();
        write_files(dir.path(), &paths);

        let mut tree = build("ROOT", dir.path(), &paths).unwrap();
        let totals = tree.aggregate();
        check_sums(tree.root());

        let expected_lines: u64 = (1..=paths.len() as u64).sum();
        prop_assert_eq!(totals.lines, expected_lines);
        prop_assert_eq!(totals.bytes, expected_lines * 2);

        let first = tree.root().metrics();
        let again = tree.aggregate();
        prop_assert_eq!(first, again);
    }
}

#[test]
fn empty_path_set_gives_lone_root() {
    let mut tree = build("ROOT", Path::new(""), Vec::<String>::new()).unwrap();
    assert_eq!(tree.aggregate(), Metrics::ZERO);
    assert!(tree.flatten().is_empty());
    assert_eq!(tree.root().node_count(), 1);
}

#[test]
fn concrete_scenario_totals() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("a/c")).unwrap();
    fs::write(dir.path().join("a/b.py"), vec![b'x'; 100]).unwrap();
    fs::write(dir.path().join("a/c/d.py"), vec![b'y'; 50]).unwrap();

    let mut tree = build("repo", dir.path(), ["a/b.py", "a/c/d.py"]).unwrap();
    tree.aggregate();

    assert_eq!(tree.find("a").unwrap().bytes(), 150);
    assert_eq!(tree.find("a/c").unwrap().bytes(), 50);
    assert_eq!(tree.totals().bytes, 150);
}
