#![allow(missing_docs)]

use std::fs;
use std::path::PathBuf;

use odgi_ffi::ffi::GraphRef;
use odgi_ffi::storage::{load_gfa, LoadOptions};
use odgi_ffi::types::{GraphError, Handle, NodeId};
use tempfile::TempDir;

fn fixture(body: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("graph.gfa");
    fs::write(&path, body).expect("write fixture");
    (dir, path)
}

#[test]
fn missing_file_is_io_error_with_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.gfa");
    let err = GraphRef::load(&path).unwrap_err();
    match &err {
        GraphError::Io { path: reported, .. } => assert_eq!(reported, &path),
        other => panic!("unexpected error {other}"),
    }
    assert!(err.to_string().contains("nope.gfa"));
}

#[test]
fn parse_errors_carry_line_numbers() {
    let (_dir, path) = fixture("H\tVN:Z:1.0\nS\t1\tA\nS\t1\tC\n");
    let err = GraphRef::load(&path).unwrap_err();
    match err {
        GraphError::Parse { line, message } => {
            assert_eq!(line, 3);
            assert!(message.contains("duplicate node 1"), "{message}");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn duplicate_path_is_rejected() {
    let (_dir, path) = fixture("S\t1\tA\nP\tp\t1+\t*\nP\tp\t1-\t*\n");
    let err = GraphRef::load(&path).unwrap_err();
    assert!(matches!(err, GraphError::Parse { line: 3, .. }), "{err}");
}

#[test]
fn comments_and_blank_lines_are_skipped() {
    let (_dir, path) = fixture("# made by hand\n\nS\t1\tACGT\n\n# trailing\n");
    let g = GraphRef::load(&path).unwrap();
    assert_eq!(g.node_count(), 1);
    assert_eq!(g.length(g.handle(1, false)), 4);
}

#[test]
fn strict_mode_rejects_containments() {
    let body = "S\t1\tACGT\nS\t2\tCG\nC\t1\t+\t2\t+\t1\t2M\n";
    let (_dir, path) = fixture(body);
    let lenient = GraphRef::load(&path).unwrap();
    assert_eq!(lenient.node_count(), 2);

    let strict = LoadOptions::new().strict(true);
    let err = GraphRef::load_with(&path, &strict).unwrap_err();
    match err {
        GraphError::Parse { line, message } => {
            assert_eq!(line, 3);
            assert!(message.contains("'C'"), "{message}");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn path_edges_are_inferred_unless_disabled() {
    let body = "S\t1\tA\nS\t2\tC\nS\t3\tG\nL\t1\t+\t2\t+\t0M\nP\tp\t1+,2+,3-\t*\n";
    let (_dir, path) = fixture(body);

    let g = load_gfa(&path, &LoadOptions::default()).unwrap();
    assert_eq!(g.edge_count(), 2);
    assert!(g.has_edge(
        Handle::forward(NodeId(2)),
        Handle::new(NodeId(3), true)
    ));

    let opts = LoadOptions::new().infer_path_edges(false);
    let err = load_gfa(&path, &opts).unwrap_err();
    match err {
        GraphError::Parse { line, message } => {
            assert_eq!(line, 5);
            assert!(message.contains("no edge between 2+ and 3-"), "{message}");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn id_range_and_stats_follow_file() {
    let (_dir, path) = fixture("S\t10\tAAA\nS\t4\tCC\nS\t7\t*\nL\t4\t+\t10\t-\t*\n");
    let g = GraphRef::load(&path).unwrap();
    assert_eq!(g.min_node_id(), 4);
    assert_eq!(g.max_node_id(), 10);
    let stats = g.graph().stats();
    assert_eq!(stats.nodes, 3);
    assert_eq!(stats.edges, 1);
    assert_eq!(stats.paths, 0);
    assert_eq!(stats.total_length, 5);
    // Storage order is file order.
    let ids: Vec<u64> = g.handles().map(|h| g.id(h)).collect();
    assert_eq!(ids, vec![10, 4, 7]);
}

#[test]
fn zero_node_id_is_rejected() {
    let (_dir, path) = fixture("S\t0\tA\n");
    let err = GraphRef::load(&path).unwrap_err();
    assert!(matches!(err, GraphError::Parse { line: 1, .. }), "{err}");
}
