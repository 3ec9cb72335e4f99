//! C ABI over [`GraphRef`].
//!
//! Every `odgi_*` function takes the graph as an explicit first argument and
//! exchanges handles in their integer form (see [`crate::ffi`]).
//!
//! # Memory management
//!
//! A graph returned by [`odgi_load_graph`] must be released with
//! [`odgi_free_graph`]. Strings returned by [`odgi_get_sequence`] and
//! [`odgi_get_path_name`] are owned by the caller and must be released with
//! [`odgi_free_string`]. [`odgi_version`] returns a static string.
//!
//! # Errors
//!
//! Failing calls return the "no value" result of their type (null, `0`,
//! `false` or [`NO_PATH`]) and leave a message readable through
//! [`odgi_last_error`].
//!
//! # Threads
//!
//! A loaded graph is immutable, so one pointer may be queried from several
//! threads. It must not be freed while a call on it is running.

#![allow(unsafe_code)]

mod error;

use std::ffi::CString;
use std::os::raw::{c_char, c_void};

use tracing::warn;

use crate::ffi::{
    pack_edge, EdgeHandleI, GraphRef, HandleI, PathHandleI, StepHandleI, EDGE_HANDLE_I_SIZE,
    HANDLE_I_SIZE, LONG_LONG_SIZE, NO_PATH, STEP_HANDLE_I_SIZE, TEST_UINT128,
};
use crate::logging::init_logging;

pub use error::{odgi_clear_error, odgi_last_error};
use error::{set_last_error, str_from_ptr};

/// Opaque graph type handed to C callers.
pub struct OdgiGraph {
    inner: GraphRef,
}

/// Visitor for node handles. Returning `false` stops the walk.
pub type HandleVisitor = Option<extern "C" fn(HandleI, *mut c_void) -> bool>;
/// Visitor for path handles.
pub type PathHandleVisitor = Option<extern "C" fn(PathHandleI, *mut c_void)>;
/// Visitor for steps.
pub type StepVisitor = Option<extern "C" fn(StepHandleI, *mut c_void)>;
/// Visitor for steps. Returning `false` stops the walk.
pub type StepPredicate = Option<extern "C" fn(StepHandleI, *mut c_void) -> bool>;

// ===== Helpers =====

/// Dereferences an opaque graph pointer, returning `$none` on null.
macro_rules! graph_ref {
    ($ptr:expr, $none:expr) => {{
        if $ptr.is_null() {
            set_last_error("null graph pointer");
            return $none;
        }
        // SAFETY: Caller guarantees ptr came from odgi_load_graph and was not freed.
        unsafe { &(*$ptr).inner }
    }};
}

fn into_c_string(bytes: Vec<u8>, what: &str) -> *mut c_char {
    match CString::new(bytes) {
        Ok(s) => s.into_raw(),
        Err(_) => {
            set_last_error(&format!("{what} contains a NUL byte"));
            std::ptr::null_mut()
        }
    }
}

// =========================================================================
// Lifecycle
// =========================================================================

/// Loads a GFA file.
///
/// Returns null on failure; the reason is available from [`odgi_last_error`].
#[no_mangle]
pub extern "C" fn odgi_load_graph(path: *const c_char) -> *mut OdgiGraph {
    let Some(path) = str_from_ptr(path, "path") else {
        return std::ptr::null_mut();
    };
    match GraphRef::load(path) {
        Ok(inner) => Box::into_raw(Box::new(OdgiGraph { inner })),
        Err(err) => {
            warn!(path, error = %err, "failed to load graph");
            set_last_error(&err.to_string());
            std::ptr::null_mut()
        }
    }
}

/// Releases a graph. Null is ignored.
#[no_mangle]
pub extern "C" fn odgi_free_graph(graph: *mut OdgiGraph) {
    if !graph.is_null() {
        // SAFETY: Caller guarantees ptr came from odgi_load_graph and is freed once.
        unsafe { drop(Box::from_raw(graph)) };
    }
}

/// Releases a string returned by this library. Null is ignored.
#[no_mangle]
pub extern "C" fn odgi_free_string(s: *mut c_char) {
    if !s.is_null() {
        // SAFETY: Caller guarantees ptr came from CString::into_raw in this library.
        unsafe { drop(CString::from_raw(s)) };
    }
}

/// Installs the native log subscriber.
///
/// `filter` uses `EnvFilter` syntax; null reads `ODGI_LOG`. Returns `false`
/// if the filter is malformed or logging was already set up.
#[no_mangle]
pub extern "C" fn odgi_init_logging(filter: *const c_char) -> bool {
    let directives = if filter.is_null() {
        None
    } else {
        match str_from_ptr(filter, "filter") {
            Some(s) => Some(s),
            None => return false,
        }
    };
    match init_logging(directives) {
        Ok(()) => true,
        Err(err) => {
            set_last_error(&err.to_string());
            false
        }
    }
}

// =========================================================================
// Introspection
// =========================================================================

/// Library version. The pointer is static and must NOT be freed.
#[no_mangle]
pub extern "C" fn odgi_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr().cast::<c_char>()
}

/// Width of `long long`.
#[no_mangle]
pub extern "C" fn odgi_long_long_size() -> usize {
    LONG_LONG_SIZE
}

/// Width of a node handle.
#[no_mangle]
pub extern "C" fn odgi_handle_i_size() -> usize {
    HANDLE_I_SIZE
}

/// Width of an edge handle.
#[no_mangle]
pub extern "C" fn odgi_edge_handle_i_size() -> usize {
    EDGE_HANDLE_I_SIZE
}

/// Width of a step handle.
#[no_mangle]
pub extern "C" fn odgi_step_handle_i_size() -> usize {
    STEP_HANDLE_I_SIZE
}

/// Fixed 128-bit pattern for transport checks.
#[no_mangle]
pub extern "C" fn odgi_test_uint128() -> u128 {
    TEST_UINT128
}

/// Number of nodes.
#[no_mangle]
pub extern "C" fn odgi_get_node_count(graph: *const OdgiGraph) -> usize {
    graph_ref!(graph, 0).node_count()
}

/// Number of paths.
#[no_mangle]
pub extern "C" fn odgi_get_path_count(graph: *const OdgiGraph) -> usize {
    graph_ref!(graph, 0).path_count()
}

/// Smallest node id.
#[no_mangle]
pub extern "C" fn odgi_min_node_id(graph: *const OdgiGraph) -> u64 {
    graph_ref!(graph, 0).min_node_id()
}

/// Largest node id.
#[no_mangle]
pub extern "C" fn odgi_max_node_id(graph: *const OdgiGraph) -> u64 {
    graph_ref!(graph, 0).max_node_id()
}

// =========================================================================
// Nodes
// =========================================================================

/// Whether node `id` exists.
#[no_mangle]
pub extern "C" fn odgi_has_node(graph: *const OdgiGraph, id: u64) -> bool {
    graph_ref!(graph, false).has_node(id)
}

/// Handle for node `id`, or `0` when it does not exist.
#[no_mangle]
pub extern "C" fn odgi_get_handle(graph: *const OdgiGraph, id: u64, is_reverse: bool) -> HandleI {
    graph_ref!(graph, 0).handle(id, is_reverse)
}

/// Same node, opposite orientation.
#[no_mangle]
pub extern "C" fn odgi_flip(graph: *const OdgiGraph, handle: HandleI) -> HandleI {
    graph_ref!(graph, 0).flip(handle)
}

/// Sequence in the handle's orientation, or null for unknown handles.
///
/// Free the result with [`odgi_free_string`].
#[no_mangle]
pub extern "C" fn odgi_get_sequence(graph: *const OdgiGraph, handle: HandleI) -> *mut c_char {
    let g = graph_ref!(graph, std::ptr::null_mut());
    match g.sequence(handle) {
        Some(seq) => into_c_string(seq.into_owned(), "sequence"),
        None => {
            set_last_error(&format!("unknown handle {handle}"));
            std::ptr::null_mut()
        }
    }
}

/// Node id of a handle.
#[no_mangle]
pub extern "C" fn odgi_get_id(graph: *const OdgiGraph, handle: HandleI) -> u64 {
    graph_ref!(graph, 0).id(handle)
}

/// Orientation of a handle.
#[no_mangle]
pub extern "C" fn odgi_get_is_reverse(graph: *const OdgiGraph, handle: HandleI) -> bool {
    graph_ref!(graph, false).is_reverse(handle)
}

/// Sequence length.
#[no_mangle]
pub extern "C" fn odgi_get_length(graph: *const OdgiGraph, handle: HandleI) -> usize {
    graph_ref!(graph, 0).length(handle)
}

// =========================================================================
// Edges
// =========================================================================

/// Whether `right` follows `left` directly.
#[no_mangle]
pub extern "C" fn odgi_has_edge(graph: *const OdgiGraph, left: HandleI, right: HandleI) -> bool {
    graph_ref!(graph, false).has_edge(left, right)
}

/// Packs two handles into an edge.
#[no_mangle]
pub extern "C" fn odgi_edge_handle(left: HandleI, right: HandleI) -> EdgeHandleI {
    pack_edge(left, right)
}

/// First handle of an edge.
#[no_mangle]
pub extern "C" fn odgi_edge_first_handle(graph: *const OdgiGraph, edge: EdgeHandleI) -> HandleI {
    graph_ref!(graph, 0).edge_first_handle(edge)
}

/// Second handle of an edge.
#[no_mangle]
pub extern "C" fn odgi_edge_second_handle(graph: *const OdgiGraph, edge: EdgeHandleI) -> HandleI {
    graph_ref!(graph, 0).edge_second_handle(edge)
}

/// Calls `next` for each neighbor on one side of `handle`.
///
/// Returns `false` if `next` stopped the walk.
#[no_mangle]
pub extern "C" fn odgi_follow_edges(
    graph: *const OdgiGraph,
    handle: HandleI,
    go_left: bool,
    next: HandleVisitor,
    user_data: *mut c_void,
) -> bool {
    let g = graph_ref!(graph, false);
    let Some(next) = next else {
        return true;
    };
    g.follow_edges(handle, go_left, |h| next(h, user_data))
}

// =========================================================================
// Paths
// =========================================================================

/// Whether a path named `name` exists.
#[no_mangle]
pub extern "C" fn odgi_has_path(graph: *const OdgiGraph, name: *const c_char) -> bool {
    let g = graph_ref!(graph, false);
    str_from_ptr(name, "path name").is_some_and(|name| g.has_path(name))
}

/// Whether a path has no steps.
#[no_mangle]
pub extern "C" fn odgi_path_is_empty(graph: *const OdgiGraph, path: PathHandleI) -> bool {
    graph_ref!(graph, false).path_is_empty(path)
}

/// Path handle for `name`, or [`NO_PATH`].
#[no_mangle]
pub extern "C" fn odgi_get_path_handle(graph: *const OdgiGraph, name: *const c_char) -> PathHandleI {
    let g = graph_ref!(graph, NO_PATH);
    str_from_ptr(name, "path name").map_or(NO_PATH, |name| g.path_handle(name))
}

/// Name of a path, or null for unknown paths.
///
/// Free the result with [`odgi_free_string`].
#[no_mangle]
pub extern "C" fn odgi_get_path_name(graph: *const OdgiGraph, path: PathHandleI) -> *mut c_char {
    let g = graph_ref!(graph, std::ptr::null_mut());
    match g.path_name(path) {
        Some(name) => into_c_string(name.as_bytes().to_vec(), "path name"),
        None => {
            set_last_error(&format!("unknown path {path}"));
            std::ptr::null_mut()
        }
    }
}

/// Number of steps in a path.
#[no_mangle]
pub extern "C" fn odgi_get_path_step_count(graph: *const OdgiGraph, path: PathHandleI) -> usize {
    graph_ref!(graph, 0).path_step_count(path)
}

/// Number of path steps on the node behind `handle`.
#[no_mangle]
pub extern "C" fn odgi_get_step_count(graph: *const OdgiGraph, handle: HandleI) -> usize {
    graph_ref!(graph, 0).step_count(handle)
}

/// First step of a path.
#[no_mangle]
pub extern "C" fn odgi_path_begin(graph: *const OdgiGraph, path: PathHandleI) -> StepHandleI {
    graph_ref!(graph, StepHandleI::default()).path_begin(path)
}

/// End sentinel of a path.
#[no_mangle]
pub extern "C" fn odgi_path_end(graph: *const OdgiGraph, path: PathHandleI) -> StepHandleI {
    graph_ref!(graph, StepHandleI::default()).path_end(path)
}

/// Last step of a path.
#[no_mangle]
pub extern "C" fn odgi_path_back(graph: *const OdgiGraph, path: PathHandleI) -> StepHandleI {
    graph_ref!(graph, StepHandleI::default()).path_back(path)
}

/// Front-end sentinel of a path.
#[no_mangle]
pub extern "C" fn odgi_path_front_end(graph: *const OdgiGraph, path: PathHandleI) -> StepHandleI {
    graph_ref!(graph, StepHandleI::default()).path_front_end(path)
}

// =========================================================================
// Steps
// =========================================================================

/// Handle visited by a step.
#[no_mangle]
pub extern "C" fn odgi_get_handle_of_step(graph: *const OdgiGraph, step: StepHandleI) -> HandleI {
    graph_ref!(graph, 0).handle_of_step(step)
}

/// Path a step belongs to.
#[no_mangle]
pub extern "C" fn odgi_get_path(graph: *const OdgiGraph, step: StepHandleI) -> PathHandleI {
    graph_ref!(graph, NO_PATH).path_of_step(step)
}

/// Path a step belongs to.
#[no_mangle]
pub extern "C" fn odgi_get_path_handle_of_step(
    graph: *const OdgiGraph,
    step: StepHandleI,
) -> PathHandleI {
    graph_ref!(graph, NO_PATH).path_handle_of_step(step)
}

/// Step after `step`.
#[no_mangle]
pub extern "C" fn odgi_get_next_step(graph: *const OdgiGraph, step: StepHandleI) -> StepHandleI {
    graph_ref!(graph, StepHandleI::default()).next_step(step)
}

/// Step before `step`.
#[no_mangle]
pub extern "C" fn odgi_get_previous_step(
    graph: *const OdgiGraph,
    step: StepHandleI,
) -> StepHandleI {
    graph_ref!(graph, StepHandleI::default()).previous_step(step)
}

/// Whether a regular step follows `step`.
#[no_mangle]
pub extern "C" fn odgi_has_next_step(graph: *const OdgiGraph, step: StepHandleI) -> bool {
    graph_ref!(graph, false).has_next_step(step)
}

/// Whether a regular step precedes `step`.
#[no_mangle]
pub extern "C" fn odgi_has_previous_step(graph: *const OdgiGraph, step: StepHandleI) -> bool {
    graph_ref!(graph, false).has_previous_step(step)
}

/// Whether two steps are the same.
#[no_mangle]
pub extern "C" fn odgi_step_eq(graph: *const OdgiGraph, a: StepHandleI, b: StepHandleI) -> bool {
    graph_ref!(graph, false).step_eq(a, b)
}

/// Whether `step` is the end sentinel.
#[no_mangle]
pub extern "C" fn odgi_is_path_end(graph: *const OdgiGraph, step: StepHandleI) -> bool {
    graph_ref!(graph, false).is_path_end(step)
}

/// Whether `step` is the front-end sentinel.
#[no_mangle]
pub extern "C" fn odgi_is_path_front_end(graph: *const OdgiGraph, step: StepHandleI) -> bool {
    graph_ref!(graph, false).is_path_front_end(step)
}

/// Path id stored with a step, `-1` if unknown.
#[no_mangle]
pub extern "C" fn odgi_step_path_id(graph: *const OdgiGraph, step: StepHandleI) -> i64 {
    graph_ref!(graph, -1).step_path_id(step)
}

/// Orientation in which the step visits its node.
#[no_mangle]
pub extern "C" fn odgi_step_is_reverse(graph: *const OdgiGraph, step: StepHandleI) -> bool {
    graph_ref!(graph, false).step_is_reverse(step)
}

/// Node id of the previous step.
#[no_mangle]
pub extern "C" fn odgi_step_prev_id(graph: *const OdgiGraph, step: StepHandleI) -> i64 {
    graph_ref!(graph, 0).step_prev_id(step)
}

/// Rank of `step` on its node; `-1` for sentinels and unknown steps.
#[no_mangle]
pub extern "C" fn odgi_step_rank(graph: *const OdgiGraph, step: StepHandleI) -> i64 {
    graph_ref!(graph, -1).step_rank(step)
}

/// Rank of the previous step.
#[no_mangle]
pub extern "C" fn odgi_step_prev_rank(graph: *const OdgiGraph, step: StepHandleI) -> i64 {
    graph_ref!(graph, 0).step_prev_rank(step)
}

/// Node id of the next step.
#[no_mangle]
pub extern "C" fn odgi_step_next_id(graph: *const OdgiGraph, step: StepHandleI) -> i64 {
    graph_ref!(graph, 0).step_next_id(step)
}

/// Rank of the next step.
#[no_mangle]
pub extern "C" fn odgi_step_next_rank(graph: *const OdgiGraph, step: StepHandleI) -> i64 {
    graph_ref!(graph, 0).step_next_rank(step)
}

// =========================================================================
// Enumeration
// =========================================================================

/// Calls `next` for each node handle. Returns `false` if `next` stopped the walk.
#[no_mangle]
pub extern "C" fn odgi_for_each_handle(
    graph: *const OdgiGraph,
    next: HandleVisitor,
    user_data: *mut c_void,
) -> bool {
    let g = graph_ref!(graph, false);
    let Some(next) = next else {
        return true;
    };
    g.for_each_handle(|h| next(h, user_data))
}

/// Calls `next` for each path handle.
#[no_mangle]
pub extern "C" fn odgi_for_each_path_handle(
    graph: *const OdgiGraph,
    next: PathHandleVisitor,
    user_data: *mut c_void,
) {
    let g = graph_ref!(graph, ());
    if let Some(next) = next {
        g.for_each_path_handle(|p| next(p, user_data));
    }
}

/// Calls `next` for each step of `path`.
#[no_mangle]
pub extern "C" fn odgi_for_each_step_in_path(
    graph: *const OdgiGraph,
    path: PathHandleI,
    next: StepVisitor,
    user_data: *mut c_void,
) {
    let g = graph_ref!(graph, ());
    if let Some(next) = next {
        g.for_each_step_in_path(path, |s| next(s, user_data));
    }
}

/// Calls `next` for each step on `handle`. Returns `false` if `next` stopped the walk.
#[no_mangle]
pub extern "C" fn odgi_for_each_step_on_handle(
    graph: *const OdgiGraph,
    handle: HandleI,
    next: StepPredicate,
    user_data: *mut c_void,
) -> bool {
    let g = graph_ref!(graph, false);
    let Some(next) = next else {
        return true;
    };
    g.for_each_step_on_handle(handle, |s| next(s, user_data))
}
