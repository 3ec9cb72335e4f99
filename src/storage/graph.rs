use std::borrow::Cow;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::types::{Direction, Handle, NodeId, PathHandle, StepHandle};

use super::iter::{Handles, Neighbors, NodeSteps, PathHandles, PathSteps};
use super::node::{reverse_complement, Node, StepRecord};

#[derive(Clone, Debug)]
pub(crate) struct PathMeta {
    pub(crate) name: String,
    pub(crate) first: Option<StepHandle>,
    pub(crate) last: Option<StepHandle>,
    pub(crate) len: usize,
}

/// Summary counters for a loaded graph.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct GraphStats {
    /// Number of nodes.
    pub nodes: usize,
    /// Number of distinct edges.
    pub edges: usize,
    /// Number of embedded paths.
    pub paths: usize,
    /// Number of steps over all paths.
    pub steps: usize,
    /// Smallest node id, `0` for an empty graph.
    pub min_node_id: u64,
    /// Largest node id, `0` for an empty graph.
    pub max_node_id: u64,
    /// Total sequence length in bases.
    pub total_length: usize,
}

/// Immutable bidirected sequence graph with embedded paths.
///
/// Built through [`super::GraphBuilder`] or [`super::load_gfa`]. Every query
/// takes `&self`, so a `Graph` can be shared between reader threads.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) index: FxHashMap<NodeId, usize>,
    pub(crate) paths: Vec<PathMeta>,
    pub(crate) path_index: FxHashMap<String, PathHandle>,
    pub(crate) edge_count: usize,
    pub(crate) min_id: NodeId,
    pub(crate) max_id: NodeId,
}

impl Graph {
    pub(crate) fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&idx| &self.nodes[idx])
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of embedded paths.
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Smallest node id, `NodeId(0)` when the graph is empty.
    pub fn min_node_id(&self) -> NodeId {
        self.min_id
    }

    /// Largest node id, `NodeId(0)` when the graph is empty.
    pub fn max_node_id(&self) -> NodeId {
        self.max_id
    }

    /// Collects the summary counters.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.node_count(),
            edges: self.edge_count,
            paths: self.path_count(),
            steps: self.paths.iter().map(|p| p.len).sum(),
            min_node_id: self.min_id.0,
            max_node_id: self.max_id.0,
            total_length: self.nodes.iter().map(|n| n.sequence.len()).sum(),
        }
    }

    /// Whether a node with this id exists.
    pub fn has_node(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Handle for an existing node.
    pub fn handle(&self, id: NodeId, is_reverse: bool) -> Option<Handle> {
        (id.is_valid() && self.has_node(id)).then(|| Handle::new(id, is_reverse))
    }

    /// Sequence read in the handle's orientation.
    pub fn sequence(&self, handle: Handle) -> Option<Cow<'_, [u8]>> {
        let node = self.node(handle.id())?;
        if handle.is_reverse() {
            Some(Cow::Owned(reverse_complement(&node.sequence)))
        } else {
            Some(Cow::Borrowed(node.sequence.as_slice()))
        }
    }

    /// Sequence length of the node behind `handle`.
    pub fn length(&self, handle: Handle) -> Option<usize> {
        self.node(handle.id()).map(|n| n.sequence.len())
    }

    /// Forward handles of all nodes, in load order.
    pub fn handles(&self) -> Handles<'_> {
        Handles::new(self.nodes.iter())
    }

    /// Handles attached to the given side of `handle`, oriented relative to it.
    pub fn neighbors(&self, handle: Handle, dir: Direction) -> Neighbors<'_> {
        let Some(node) = self.node(handle.id()) else {
            return Neighbors::empty();
        };
        let list = match (dir, handle.is_reverse()) {
            (Direction::Left, false) | (Direction::Right, true) => &node.left,
            (Direction::Right, false) | (Direction::Left, true) => &node.right,
        };
        Neighbors::new(list.iter(), handle.is_reverse())
    }

    /// Whether `right` can be reached directly from the end of `left`.
    pub fn has_edge(&self, left: Handle, right: Handle) -> bool {
        self.neighbors(left, Direction::Right).any(|h| h == right)
    }

    /// Handles of all paths, in load order.
    pub fn path_handles(&self) -> PathHandles {
        PathHandles::new(self.paths.len())
    }

    /// Whether a path with this name exists.
    pub fn has_path(&self, name: &str) -> bool {
        self.path_index.contains_key(name)
    }

    /// Looks up a path by name.
    pub fn path_handle(&self, name: &str) -> Option<PathHandle> {
        self.path_index.get(name).copied()
    }

    fn path(&self, path: PathHandle) -> Option<&PathMeta> {
        self.paths.get(path.index())
    }

    /// Name of a path.
    pub fn path_name(&self, path: PathHandle) -> Option<&str> {
        self.path(path).map(|p| p.name.as_str())
    }

    /// Number of steps in a path.
    pub fn path_len(&self, path: PathHandle) -> Option<usize> {
        self.path(path).map(|p| p.len)
    }

    /// First step of `path`, or [`StepHandle::path_end`] when it has none.
    pub fn path_begin(&self, path: PathHandle) -> StepHandle {
        self.path(path)
            .and_then(|p| p.first)
            .unwrap_or_else(|| StepHandle::path_end(path))
    }

    /// Last step of `path`, or [`StepHandle::path_front_end`] when it has none.
    pub fn path_back(&self, path: PathHandle) -> StepHandle {
        self.path(path)
            .and_then(|p| p.last)
            .unwrap_or_else(|| StepHandle::path_front_end(path))
    }

    /// Sentinel one past the last step of `path`.
    pub fn path_end(&self, path: PathHandle) -> StepHandle {
        StepHandle::path_end(path)
    }

    /// Sentinel one before the first step of `path`.
    pub fn path_front_end(&self, path: PathHandle) -> StepHandle {
        StepHandle::path_front_end(path)
    }

    /// Link record of a regular step.
    pub fn step_record(&self, step: StepHandle) -> Option<&StepRecord> {
        let (id, rank) = step.node_rank()?;
        self.node(id)?.steps.get(rank)
    }

    /// Position of `step` among the steps recorded on its node.
    pub fn step_rank(&self, step: StepHandle) -> Option<usize> {
        self.step_record(step)?;
        step.node_rank().map(|(_, rank)| rank)
    }

    /// Oriented handle visited by `step`.
    pub fn handle_of_step(&self, step: StepHandle) -> Option<Handle> {
        let (id, _) = step.node_rank()?;
        let rec = self.step_record(step)?;
        Some(Handle::new(id, rec.is_reverse))
    }

    /// Path that `step` belongs to, sentinels included.
    pub fn path_of_step(&self, step: StepHandle) -> Option<PathHandle> {
        if let Some(path) = step.sentinel_path() {
            return self.path(path).map(|_| path);
        }
        self.step_record(step).map(|rec| rec.path)
    }

    /// Step after `step`.
    ///
    /// The last step moves to [`StepHandle::path_end`], the front-end sentinel
    /// moves to [`Graph::path_begin`] and the end sentinel stays where it is.
    pub fn next_step(&self, step: StepHandle) -> Option<StepHandle> {
        if step.is_end() {
            return step.sentinel_path().map(|_| step);
        }
        if let Some(path) = step.sentinel_path() {
            return Some(self.path_begin(path));
        }
        let rec = self.step_record(step)?;
        if rec.has_next() {
            let next = Handle::forward(NodeId(rec.next_id));
            Some(StepHandle::on_node(next, rec.next_rank as usize))
        } else {
            Some(StepHandle::path_end(rec.path))
        }
    }

    /// Step before `step`; mirror image of [`Graph::next_step`].
    pub fn previous_step(&self, step: StepHandle) -> Option<StepHandle> {
        if step.is_front_end() {
            return step.sentinel_path().map(|_| step);
        }
        if let Some(path) = step.sentinel_path() {
            return Some(self.path_back(path));
        }
        let rec = self.step_record(step)?;
        if rec.has_prev() {
            let prev = Handle::forward(NodeId(rec.prev_id));
            Some(StepHandle::on_node(prev, rec.prev_rank as usize))
        } else {
            Some(StepHandle::path_front_end(rec.path))
        }
    }

    /// Whether [`Graph::next_step`] lands on a regular step.
    pub fn has_next_step(&self, step: StepHandle) -> bool {
        if step.is_end() {
            return false;
        }
        if let Some(path) = step.sentinel_path() {
            return self.path_len(path).unwrap_or(0) > 0;
        }
        self.step_record(step).is_some_and(StepRecord::has_next)
    }

    /// Whether [`Graph::previous_step`] lands on a regular step.
    pub fn has_previous_step(&self, step: StepHandle) -> bool {
        if step.is_front_end() {
            return false;
        }
        if let Some(path) = step.sentinel_path() {
            return self.path_len(path).unwrap_or(0) > 0;
        }
        self.step_record(step).is_some_and(StepRecord::has_prev)
    }

    /// Steps of `path` from first to last.
    pub fn steps_in_path(&self, path: PathHandle) -> PathSteps<'_> {
        PathSteps::new(self, self.path_begin(path))
    }

    /// Steps of any path that visit the node behind `handle`.
    pub fn steps_on_handle(&self, handle: Handle) -> NodeSteps {
        let count = self.step_count(handle);
        NodeSteps::new(handle.as_forward(), count)
    }

    /// Number of path steps on the node behind `handle`.
    pub fn step_count(&self, handle: Handle) -> usize {
        self.node(handle.id()).map_or(0, |n| n.steps.len())
    }
}
