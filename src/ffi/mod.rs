#![forbid(unsafe_code)]

//! Handle marshalling shared by the C ABI and other language bindings.
//!
//! Engine handles cross the boundary as fixed-width integers:
//!
//! | handle | boundary type | width |
//! |---|---|---|
//! | node | [`HandleI`] | 8 bytes |
//! | path | [`PathHandleI`] | 8 bytes |
//! | edge | [`EdgeHandleI`] | 16 bytes |
//! | step | [`StepHandleI`] | 16 bytes |
//!
//! Every conversion here is a lossless bijection. Node-handle bits are never
//! inspected directly; the engine's own accessors do that. The only packing
//! done at this layer is splitting and joining the two halves of edges and
//! steps.
//!
//! [`GraphRef`] is the typed graph reference. Its methods are the flat
//! query surface expressed with integer handles: each one decodes its
//! arguments, calls the engine and re-encodes any handle it returns.

use std::borrow::Cow;
use std::mem::size_of;
use std::os::raw::c_longlong;
use std::path::Path;
use std::sync::Arc;

use crate::storage::{load_gfa, Graph, LoadOptions};
use crate::types::{Direction, Edge, Handle, NodeId, PathHandle, Result, StepHandle};

/// Boundary form of a node handle.
pub type HandleI = u64;
/// Boundary form of a path handle.
pub type PathHandleI = u64;
/// Boundary form of an edge: first handle in the high half, second in the low half.
pub type EdgeHandleI = u128;

/// Boundary form of a step handle.
///
/// Laid out as two consecutive `i64` so it can be passed by value through a
/// C ABI without relying on 128-bit integer support.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct StepHandleI {
    /// Handle component.
    pub handle: i64,
    /// Path component.
    pub path: i64,
}

impl StepHandleI {
    /// Builds a step from its two components.
    pub const fn new(handle: i64, path: i64) -> Self {
        Self { handle, path }
    }

    /// Packs the step into one 128-bit value, handle component first.
    pub const fn to_u128(self) -> u128 {
        ((self.handle as u64 as u128) << 64) | (self.path as u64 as u128)
    }

    /// Inverse of [`StepHandleI::to_u128`].
    pub const fn from_u128(value: u128) -> Self {
        Self {
            handle: (value >> 64) as u64 as i64,
            path: value as u64 as i64,
        }
    }
}

/// Marker path handle meaning "no such path".
pub const NO_PATH: PathHandleI = u64::MAX;

/// Byte width of `long long` on this platform.
pub const LONG_LONG_SIZE: usize = size_of::<c_longlong>();
/// Byte width of [`HandleI`].
pub const HANDLE_I_SIZE: usize = size_of::<HandleI>();
/// Byte width of [`EdgeHandleI`].
pub const EDGE_HANDLE_I_SIZE: usize = size_of::<EdgeHandleI>();
/// Byte width of [`StepHandleI`].
pub const STEP_HANDLE_I_SIZE: usize = size_of::<StepHandleI>();

/// Fixed value callers read back to check 128-bit transport.
pub const TEST_UINT128: u128 = 0x0123_4567_89ab_cdef_fedc_ba98_7654_3210;

/// Library version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Node handle to integer.
pub fn as_handle_i(handle: Handle) -> HandleI {
    handle.as_integer()
}

/// Integer to node handle.
pub fn as_handle_t(handle: HandleI) -> Handle {
    Handle::from_integer(handle)
}

/// Path handle to integer.
pub fn as_path_handle_i(path: PathHandle) -> PathHandleI {
    path.as_integer()
}

/// Integer to path handle.
pub fn as_path_handle_t(path: PathHandleI) -> PathHandle {
    PathHandle::from_integer(path)
}

/// Step handle to its component pair.
pub fn as_step_handle_i(step: StepHandle) -> StepHandleI {
    let [handle, path] = step.as_integers();
    StepHandleI::new(handle, path)
}

/// Component pair to step handle.
pub fn as_step_handle_t(step: StepHandleI) -> StepHandle {
    StepHandle::from_integers([step.handle, step.path])
}

/// Edge to its packed 128-bit form.
pub fn as_edge_handle_i(edge: Edge) -> EdgeHandleI {
    pack_edge(as_handle_i(edge.0), as_handle_i(edge.1))
}

/// Packed 128-bit form to edge.
pub fn as_edge_t(edge: EdgeHandleI) -> Edge {
    Edge::new(
        as_handle_t(edge_first_handle(edge)),
        as_handle_t(edge_second_handle(edge)),
    )
}

/// Packs two boundary handles into an edge.
pub const fn pack_edge(first: HandleI, second: HandleI) -> EdgeHandleI {
    ((first as u128) << 64) | second as u128
}

/// First handle of a packed edge.
pub const fn edge_first_handle(edge: EdgeHandleI) -> HandleI {
    (edge >> 64) as u64
}

/// Second handle of a packed edge.
pub const fn edge_second_handle(edge: EdgeHandleI) -> HandleI {
    edge as u64
}

/// Handle component of a step packed with [`StepHandleI::to_u128`].
pub const fn step_u128_handle(step: u128) -> i64 {
    StepHandleI::from_u128(step).handle
}

/// Path component of a step packed with [`StepHandleI::to_u128`].
pub const fn step_u128_path(step: u128) -> i64 {
    StepHandleI::from_u128(step).path
}

/// Typed reference to one loaded graph.
///
/// Cloning shares the same graph. The graph is released when the last
/// reference is dropped. Queries never mutate, so a `GraphRef` may be used
/// from several threads at once.
#[derive(Clone, Debug)]
pub struct GraphRef {
    graph: Arc<Graph>,
}

impl From<Graph> for GraphRef {
    fn from(graph: Graph) -> Self {
        Self {
            graph: Arc::new(graph),
        }
    }
}

impl GraphRef {
    /// Loads a graph file with default options.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(path, &LoadOptions::default())
    }

    /// Loads a graph file with explicit options.
    pub fn load_with(path: impl AsRef<Path>, opts: &LoadOptions) -> Result<Self> {
        load_gfa(path, opts).map(Self::from)
    }

    /// The engine graph behind this reference.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    // ===== Introspection =====

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of paths.
    pub fn path_count(&self) -> usize {
        self.graph.path_count()
    }

    /// Smallest node id.
    pub fn min_node_id(&self) -> u64 {
        self.graph.min_node_id().0
    }

    /// Largest node id.
    pub fn max_node_id(&self) -> u64 {
        self.graph.max_node_id().0
    }

    // ===== Nodes =====

    /// Whether node `id` exists.
    pub fn has_node(&self, id: u64) -> bool {
        self.graph.has_node(NodeId(id))
    }

    /// Handle for node `id`; `0` when the node does not exist.
    pub fn handle(&self, id: u64, is_reverse: bool) -> HandleI {
        self.graph
            .handle(NodeId(id), is_reverse)
            .map_or(0, as_handle_i)
    }

    /// Same node, opposite orientation.
    pub fn flip(&self, handle: HandleI) -> HandleI {
        as_handle_i(as_handle_t(handle).flip())
    }

    /// Sequence in the handle's orientation.
    pub fn sequence(&self, handle: HandleI) -> Option<Cow<'_, [u8]>> {
        self.graph.sequence(as_handle_t(handle))
    }

    /// Node id of a handle.
    pub fn id(&self, handle: HandleI) -> u64 {
        as_handle_t(handle).id().0
    }

    /// Orientation bit of a handle.
    pub fn is_reverse(&self, handle: HandleI) -> bool {
        as_handle_t(handle).is_reverse()
    }

    /// Sequence length; `0` for unknown handles.
    pub fn length(&self, handle: HandleI) -> usize {
        self.graph.length(as_handle_t(handle)).unwrap_or(0)
    }

    // ===== Edges =====

    /// Whether `right` follows `left` directly.
    pub fn has_edge(&self, left: HandleI, right: HandleI) -> bool {
        self.graph.has_edge(as_handle_t(left), as_handle_t(right))
    }

    /// First handle of a packed edge.
    pub fn edge_first_handle(&self, edge: EdgeHandleI) -> HandleI {
        edge_first_handle(edge)
    }

    /// Second handle of a packed edge.
    pub fn edge_second_handle(&self, edge: EdgeHandleI) -> HandleI {
        edge_second_handle(edge)
    }

    /// Neighbors on the left (`go_left`) or right side of `handle`.
    pub fn neighbors(&self, handle: HandleI, go_left: bool) -> impl Iterator<Item = HandleI> + '_ {
        self.graph
            .neighbors(as_handle_t(handle), Direction::from_go_left(go_left))
            .map(as_handle_i)
    }

    /// Calls `next` for each neighbor until it returns `false`.
    ///
    /// Returns `false` if iteration was stopped early.
    pub fn follow_edges<F>(&self, handle: HandleI, go_left: bool, next: F) -> bool
    where
        F: FnMut(HandleI) -> bool,
    {
        visit_all(self.neighbors(handle, go_left), next)
    }

    // ===== Paths =====

    /// Whether a path named `name` exists.
    pub fn has_path(&self, name: &str) -> bool {
        self.graph.has_path(name)
    }

    /// Path handle for `name`, or [`NO_PATH`].
    pub fn path_handle(&self, name: &str) -> PathHandleI {
        self.graph.path_handle(name).map_or(NO_PATH, as_path_handle_i)
    }

    /// Name of a path.
    pub fn path_name(&self, path: PathHandleI) -> Option<&str> {
        self.graph.path_name(as_path_handle_t(path))
    }

    /// Whether a path has no steps. Unknown paths count as empty.
    pub fn path_is_empty(&self, path: PathHandleI) -> bool {
        self.graph.path_len(as_path_handle_t(path)).unwrap_or(0) == 0
    }

    /// Number of steps in a path.
    pub fn path_step_count(&self, path: PathHandleI) -> usize {
        self.graph.path_len(as_path_handle_t(path)).unwrap_or(0)
    }

    /// First step of a path.
    pub fn path_begin(&self, path: PathHandleI) -> StepHandleI {
        as_step_handle_i(self.graph.path_begin(as_path_handle_t(path)))
    }

    /// End sentinel of a path.
    pub fn path_end(&self, path: PathHandleI) -> StepHandleI {
        as_step_handle_i(self.graph.path_end(as_path_handle_t(path)))
    }

    /// Last step of a path.
    pub fn path_back(&self, path: PathHandleI) -> StepHandleI {
        as_step_handle_i(self.graph.path_back(as_path_handle_t(path)))
    }

    /// Front-end sentinel of a path.
    pub fn path_front_end(&self, path: PathHandleI) -> StepHandleI {
        as_step_handle_i(self.graph.path_front_end(as_path_handle_t(path)))
    }

    /// Number of path steps visiting the node behind `handle`.
    pub fn step_count(&self, handle: HandleI) -> usize {
        self.graph.step_count(as_handle_t(handle))
    }

    // ===== Steps =====

    /// Handle visited by a step; `0` for sentinels and unknown steps.
    pub fn handle_of_step(&self, step: StepHandleI) -> HandleI {
        self.graph
            .handle_of_step(as_step_handle_t(step))
            .map_or(0, as_handle_i)
    }

    /// Path a step belongs to, or [`NO_PATH`].
    pub fn path_of_step(&self, step: StepHandleI) -> PathHandleI {
        self.graph
            .path_of_step(as_step_handle_t(step))
            .map_or(NO_PATH, as_path_handle_i)
    }

    /// Same as [`GraphRef::path_of_step`].
    pub fn path_handle_of_step(&self, step: StepHandleI) -> PathHandleI {
        self.path_of_step(step)
    }

    /// Step after `step`; the zero pair for unknown steps.
    pub fn next_step(&self, step: StepHandleI) -> StepHandleI {
        self.graph
            .next_step(as_step_handle_t(step))
            .map_or_else(StepHandleI::default, as_step_handle_i)
    }

    /// Step before `step`; the zero pair for unknown steps.
    pub fn previous_step(&self, step: StepHandleI) -> StepHandleI {
        self.graph
            .previous_step(as_step_handle_t(step))
            .map_or_else(StepHandleI::default, as_step_handle_i)
    }

    /// Whether a regular step follows `step`.
    pub fn has_next_step(&self, step: StepHandleI) -> bool {
        self.graph.has_next_step(as_step_handle_t(step))
    }

    /// Whether a regular step precedes `step`.
    pub fn has_previous_step(&self, step: StepHandleI) -> bool {
        self.graph.has_previous_step(as_step_handle_t(step))
    }

    /// Component-wise step equality.
    pub fn step_eq(&self, a: StepHandleI, b: StepHandleI) -> bool {
        as_step_handle_t(a) == as_step_handle_t(b)
    }

    /// Whether `step` is the end sentinel.
    pub fn is_path_end(&self, step: StepHandleI) -> bool {
        as_step_handle_t(step).is_end()
    }

    /// Whether `step` is the front-end sentinel.
    pub fn is_path_front_end(&self, step: StepHandleI) -> bool {
        as_step_handle_t(step).is_front_end()
    }

    /// Path id stored with a step; `-1` for unknown steps.
    pub fn step_path_id(&self, step: StepHandleI) -> i64 {
        self.graph
            .step_record(as_step_handle_t(step))
            .map_or(-1, |rec| as_path_handle_i(rec.path) as i64)
    }

    /// Orientation in which the path visits the step's node.
    pub fn step_is_reverse(&self, step: StepHandleI) -> bool {
        self.graph
            .step_record(as_step_handle_t(step))
            .is_some_and(|rec| rec.is_reverse)
    }

    /// Rank of `step` on its own node; `-1` for sentinels and unknown steps.
    pub fn step_rank(&self, step: StepHandleI) -> i64 {
        self.graph
            .step_rank(as_step_handle_t(step))
            .map_or(-1, |rank| rank as i64)
    }

    /// Node id of the previous step; `0` at the start of the path.
    pub fn step_prev_id(&self, step: StepHandleI) -> i64 {
        self.record_field(step, |rec| rec.prev_id)
    }

    /// Rank of the previous step on its node.
    pub fn step_prev_rank(&self, step: StepHandleI) -> i64 {
        self.record_field(step, |rec| rec.prev_rank)
    }

    /// Node id of the next step; `0` at the end of the path.
    pub fn step_next_id(&self, step: StepHandleI) -> i64 {
        self.record_field(step, |rec| rec.next_id)
    }

    /// Rank of the next step on its node.
    pub fn step_next_rank(&self, step: StepHandleI) -> i64 {
        self.record_field(step, |rec| rec.next_rank)
    }

    fn record_field<F>(&self, step: StepHandleI, field: F) -> i64
    where
        F: Fn(&crate::storage::StepRecord) -> u64,
    {
        self.graph
            .step_record(as_step_handle_t(step))
            .map_or(0, |rec| field(rec) as i64)
    }

    // ===== Enumeration =====

    /// All node handles, forward orientation, storage order.
    pub fn handles(&self) -> impl Iterator<Item = HandleI> + '_ {
        self.graph.handles().map(as_handle_i)
    }

    /// All path handles.
    pub fn path_handles(&self) -> impl Iterator<Item = PathHandleI> {
        self.graph.path_handles().map(as_path_handle_i)
    }

    /// Steps of `path` from first to last.
    pub fn steps_in_path(&self, path: PathHandleI) -> impl Iterator<Item = StepHandleI> + '_ {
        self.graph
            .steps_in_path(as_path_handle_t(path))
            .map(as_step_handle_i)
    }

    /// Steps on the node behind `handle`.
    pub fn steps_on_handle(&self, handle: HandleI) -> impl Iterator<Item = StepHandleI> {
        self.graph
            .steps_on_handle(as_handle_t(handle))
            .map(as_step_handle_i)
    }

    /// Calls `next` for each node handle until it returns `false`.
    pub fn for_each_handle<F>(&self, next: F) -> bool
    where
        F: FnMut(HandleI) -> bool,
    {
        visit_all(self.handles(), next)
    }

    /// Calls `next` for every path handle.
    pub fn for_each_path_handle<F>(&self, next: F)
    where
        F: FnMut(PathHandleI),
    {
        self.path_handles().for_each(next);
    }

    /// Calls `next` for every step of `path`.
    pub fn for_each_step_in_path<F>(&self, path: PathHandleI, next: F)
    where
        F: FnMut(StepHandleI),
    {
        self.steps_in_path(path).for_each(next);
    }

    /// Calls `next` for each step on `handle` until it returns `false`.
    pub fn for_each_step_on_handle<F>(&self, handle: HandleI, next: F) -> bool
    where
        F: FnMut(StepHandleI) -> bool,
    {
        visit_all(self.steps_on_handle(handle), next)
    }
}

// Stops at the first `false` and reports whether the walk completed.
fn visit_all<I, F>(items: I, mut next: F) -> bool
where
    I: Iterator,
    F: FnMut(I::Item) -> bool,
{
    for item in items {
        if !next(item) {
            return false;
        }
    }
    true
}
