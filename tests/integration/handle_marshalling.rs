#![allow(missing_docs)]

use std::fs;
use std::path::PathBuf;

use odgi_ffi::ffi::{
    as_edge_handle_i, as_edge_t, as_handle_i, as_handle_t, as_step_handle_i, as_step_handle_t,
    edge_first_handle, edge_second_handle, pack_edge, GraphRef, StepHandleI, NO_PATH,
};
use odgi_ffi::types::Edge;
use tempfile::TempDir;

const CHR1: &str = "H\tVN:Z:1.0
S\t1\tCAAATAAG
S\t2\tA
S\t3\tG
L\t1\t+\t2\t+\t0M
L\t2\t+\t3\t+\t0M
P\tchr1\t1+,2+,3+\t*
";

// 1 -> {2, 3-} -> 4 with one path through each branch.
const BUBBLE: &str = "S\t1\tAC
S\t2\tG
S\t3\tTTA
S\t4\tC
L\t1\t+\t2\t+\t*
L\t2\t+\t4\t+\t*
L\t1\t+\t3\t-\t*
L\t3\t-\t4\t+\t*
P\ta\t1+,2+,4+\t*
P\tb\t1+,3-,4+\t*
";

fn write_gfa(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).expect("write fixture");
    path
}

fn load(body: &str) -> (TempDir, GraphRef) {
    let dir = TempDir::new().expect("tempdir");
    let path = write_gfa(&dir, "graph.gfa", body);
    let graph = GraphRef::load(&path).expect("load graph");
    (dir, graph)
}

#[test]
fn three_node_scenario() {
    let (_dir, g) = load(CHR1);
    assert_eq!(g.node_count(), 3);
    assert_eq!(g.path_count(), 1);
    assert_eq!(g.min_node_id(), 1);
    assert_eq!(g.max_node_id(), 3);

    let path = g.path_handle("chr1");
    assert_ne!(path, NO_PATH);
    assert_eq!(g.path_name(path), Some("chr1"));
    assert!(!g.path_is_empty(path));

    let end = g.path_end(path);
    let mut step = g.path_begin(path);
    let mut handles = Vec::new();
    while !g.step_eq(step, end) {
        handles.push(g.handle_of_step(step));
        step = g.next_step(step);
    }
    assert_eq!(handles.len(), 3);
    let ids: Vec<u64> = handles.iter().map(|&h| g.id(h)).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    for pair in handles.windows(2) {
        assert!(g.has_edge(pair[0], pair[1]));
    }
}

#[test]
fn load_free_load_again() {
    let dir = TempDir::new().unwrap();
    let path = write_gfa(&dir, "graph.gfa", CHR1);
    let first = GraphRef::load(&path).unwrap();
    let nodes = first.node_count();
    drop(first);
    let second = GraphRef::load(&path).unwrap();
    assert_eq!(second.node_count(), nodes);
}

#[test]
fn loaded_handles_roundtrip() {
    let (_dir, g) = load(BUBBLE);
    for h in g.handles() {
        for oriented in [h, g.flip(h)] {
            assert_eq!(as_handle_i(as_handle_t(oriented)), oriented);
        }
    }
    for p in g.path_handles() {
        for step in g.steps_in_path(p) {
            assert_eq!(as_step_handle_i(as_step_handle_t(step)), step);
            assert_eq!(StepHandleI::from_u128(step.to_u128()), step);
        }
    }
}

#[test]
fn edge_decomposes_in_order() {
    let (_dir, g) = load(BUBBLE);
    let a = g.handle(1, false);
    let b = g.handle(3, true);
    let packed = pack_edge(a, b);
    assert_eq!(g.edge_first_handle(packed), a);
    assert_eq!(g.edge_second_handle(packed), b);
    let edge = as_edge_t(packed);
    assert_eq!(edge, Edge::new(as_handle_t(a), as_handle_t(b)));
    assert_eq!(as_edge_handle_i(edge), packed);
    assert_eq!(edge_first_handle(packed), a);
    assert_eq!(edge_second_handle(packed), b);
}

#[test]
fn reverse_handle_reads_reverse_complement() {
    let (_dir, g) = load(BUBBLE);
    let fwd = g.handle(3, false);
    let rev = g.flip(fwd);
    assert_eq!(g.sequence(fwd).unwrap().as_ref(), b"TTA");
    assert_eq!(g.sequence(rev).unwrap().as_ref(), b"TAA");
    assert_eq!(g.length(rev), 3);
    assert!(g.is_reverse(rev));
    assert_eq!(g.id(rev), 3);
}

#[test]
fn has_edge_is_strand_symmetric() {
    let (_dir, g) = load(BUBBLE);
    let all: Vec<u64> = g.handles().flat_map(|h| [h, g.flip(h)]).collect();
    for &l in &all {
        for &r in &all {
            assert_eq!(g.has_edge(l, r), g.has_edge(g.flip(r), g.flip(l)));
        }
    }
}

#[test]
fn follow_edges_yields_oriented_neighbors() {
    let (_dir, g) = load(BUBBLE);
    let one = g.handle(1, false);
    let mut right = Vec::new();
    assert!(g.follow_edges(one, false, |h| {
        right.push(h);
        true
    }));
    right.sort_unstable();
    assert_eq!(right, vec![g.handle(2, false), g.handle(3, true)]);

    let four = g.handle(4, false);
    let left: Vec<u64> = g.neighbors(four, true).collect();
    assert_eq!(left.len(), 2);
    assert!(left.contains(&g.handle(2, false)));
    assert!(left.contains(&g.handle(3, true)));

    let mut seen = 0;
    assert!(!g.follow_edges(one, false, |_| {
        seen += 1;
        false
    }));
    assert_eq!(seen, 1);
}

#[test]
fn early_termination_visits_exactly_n() {
    let (_dir, g) = load(BUBBLE);
    let total = g.node_count();
    for n in 1..=total {
        let mut seen = 0;
        let completed = g.for_each_handle(|_| {
            seen += 1;
            seen != n
        });
        assert_eq!(seen, n);
        assert!(!completed);
    }

    let node_one = g.handle(1, false);
    let mut seen = 0;
    assert!(!g.for_each_step_on_handle(node_one, |_| {
        seen += 1;
        false
    }));
    assert_eq!(seen, 1);

    let mut all = 0;
    assert!(g.for_each_step_on_handle(node_one, |_| {
        all += 1;
        true
    }));
    assert_eq!(all, 2);
}

#[test]
fn void_enumerations_visit_everything_once() {
    let (_dir, g) = load(BUBBLE);
    let mut paths = Vec::new();
    g.for_each_path_handle(|p| paths.push(g.path_name(p).unwrap().to_string()));
    assert_eq!(paths, vec!["a", "b"]);

    let b = g.path_handle("b");
    let mut ids = Vec::new();
    g.for_each_step_in_path(b, |s| ids.push(g.id(g.handle_of_step(s))));
    assert_eq!(ids, vec![1, 3, 4]);
}

#[test]
fn sentinels_and_step_links() {
    let (_dir, g) = load(BUBBLE);
    let b = g.path_handle("b");
    let front = g.path_front_end(b);
    let end = g.path_end(b);
    assert!(g.is_path_front_end(front));
    assert!(g.is_path_end(end));
    assert_eq!(g.next_step(end), end);
    assert_eq!(g.previous_step(front), front);
    assert!(g.step_eq(g.next_step(front), g.path_begin(b)));
    assert!(g.step_eq(g.previous_step(end), g.path_back(b)));
    assert_eq!(g.path_of_step(end), b);

    let middle = g.next_step(g.path_begin(b));
    assert!(g.step_is_reverse(middle));
    assert_eq!(g.handle_of_step(middle), g.handle(3, true));
    assert_eq!(g.step_prev_id(middle), 1);
    // Node 1 already carries the step of path a, so this visit has rank 1.
    assert_eq!(g.step_prev_rank(middle), 1);
    assert_eq!(g.step_next_id(middle), 4);
    assert_eq!(g.step_next_rank(middle), 1);
    assert_eq!(g.step_rank(g.previous_step(middle)), g.step_prev_rank(middle));
    assert_eq!(g.step_rank(g.next_step(middle)), g.step_next_rank(middle));
    assert_eq!(g.step_rank(end), -1);
    assert_eq!(g.step_path_id(middle), b as i64);
    assert!(g.has_next_step(middle));
    assert!(g.has_previous_step(middle));
    assert!(!g.has_next_step(g.path_back(b)));
    assert!(!g.has_previous_step(g.path_begin(b)));
}

#[test]
fn steps_on_handle_cover_both_strands() {
    let (_dir, g) = load(BUBBLE);
    let four = g.handle(4, true);
    assert_eq!(g.step_count(four), 2);
    let paths: Vec<u64> = g.steps_on_handle(four).map(|s| g.path_of_step(s)).collect();
    assert_eq!(paths, vec![g.path_handle("a"), g.path_handle("b")]);
}

#[test]
fn unknown_values_map_to_no_value() {
    let (_dir, g) = load(CHR1);
    assert!(!g.has_node(99));
    assert!(!g.has_path("chrX"));
    assert_eq!(g.path_handle("chrX"), NO_PATH);
    assert_eq!(g.handle(99, false), 0);
    assert!(g.sequence(g.flip(0)).is_none());
    assert_eq!(g.step_count(42 << 1), 0);
    let bogus = StepHandleI::new(42 << 1, 0);
    assert_eq!(g.handle_of_step(bogus), 0);
    assert_eq!(g.next_step(bogus), StepHandleI::default());
    assert_eq!(g.path_name(NO_PATH), None);
}

#[test]
fn graph_ref_is_shared_across_threads() {
    let (_dir, g) = load(BUBBLE);
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let g = g.clone();
            std::thread::spawn(move || g.handles().map(|h| g.length(h)).sum::<usize>())
        })
        .collect();
    for w in workers {
        assert_eq!(w.join().unwrap(), 7);
    }
}
