use tracing::debug;

use crate::types::{Edge, GraphError, Handle, NodeId, PathHandle, Result, StepHandle};

use super::graph::{Graph, PathMeta};
use super::node::{Node, StepRecord};
use super::options::LoadOptions;

/// Incrementally assembles a [`Graph`].
///
/// Nodes must exist before edges or paths refer to them. Once
/// [`GraphBuilder::build`] is called the graph is frozen.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: Graph,
    options: LoadOptions,
}

impl GraphBuilder {
    /// Creates an empty builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty builder with explicit options.
    pub fn with_options(options: LoadOptions) -> Self {
        Self {
            graph: Graph::default(),
            options,
        }
    }

    /// Adds a node and returns its forward handle.
    pub fn add_node(&mut self, id: NodeId, sequence: impl Into<Vec<u8>>) -> Result<Handle> {
        if id.0 == 0 {
            return Err(GraphError::InvalidArgument("node id 0 is reserved".into()));
        }
        if !id.is_valid() {
            return Err(GraphError::InvalidArgument(format!(
                "node id {id} exceeds the largest encodable id {}",
                NodeId::MAX
            )));
        }
        if self.graph.index.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        let g = &mut self.graph;
        g.index.insert(id, g.nodes.len());
        g.nodes.push(Node::new(id, sequence.into()));
        if g.nodes.len() == 1 {
            g.min_id = id;
            g.max_id = id;
        } else {
            g.min_id = g.min_id.min(id);
            g.max_id = g.max_id.max(id);
        }
        Ok(Handle::forward(id))
    }

    fn node_index(&self, id: NodeId, context: &'static str) -> Result<usize> {
        self.graph
            .index
            .get(&id)
            .copied()
            .ok_or(GraphError::MissingNode { context, id })
    }

    /// Connects the end of `left` to the start of `right`.
    ///
    /// Returns `false` when the edge (or its reverse reading) already exists.
    pub fn add_edge(&mut self, left: Handle, right: Handle) -> Result<bool> {
        let left_idx = self.node_index(left.id(), "edge")?;
        let right_idx = self.node_index(right.id(), "edge")?;
        if self.graph.has_edge(left, right) {
            return Ok(false);
        }

        let nodes = &mut self.graph.nodes;
        if left.is_reverse() {
            nodes[left_idx].left.push(right.flip());
        } else {
            nodes[left_idx].right.push(right);
        }
        // A reversing self-loop reads the same on both strands; one entry is enough.
        let edge = Edge::new(left, right);
        if edge.reversed() != edge {
            if right.is_reverse() {
                nodes[right_idx].right.push(left.flip());
            } else {
                nodes[right_idx].left.push(left);
            }
        }
        self.graph.edge_count += 1;
        Ok(true)
    }

    /// Embeds a path visiting `steps` in order.
    pub fn add_path(&mut self, name: &str, steps: &[Handle]) -> Result<PathHandle> {
        if self.graph.path_index.contains_key(name) {
            return Err(GraphError::DuplicatePath(name.to_string()));
        }
        for handle in steps {
            self.node_index(handle.id(), "path")?;
        }
        for pair in steps.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if self.graph.has_edge(from, to) {
                continue;
            }
            if !self.options.infer_path_edges {
                return Err(GraphError::MissingEdge { from, to });
            }
            debug!(path = name, %from, %to, "inferring edge from path");
            self.add_edge(from, to)?;
        }

        let path = PathHandle::from_index(self.graph.paths.len());
        let mut first = None;
        let mut prev: Option<(usize, NodeId, usize)> = None;
        for handle in steps {
            let idx = self.node_index(handle.id(), "path")?;
            let node = &mut self.graph.nodes[idx];
            let rank = node.steps.len();
            let mut record = StepRecord::new(path, handle.is_reverse());
            if let Some((_, prev_id, prev_rank)) = prev {
                record.prev_id = prev_id.0;
                record.prev_rank = prev_rank as u64;
            }
            node.steps.push(record);
            if let Some((prev_idx, _, prev_rank)) = prev {
                let prev_record = &mut self.graph.nodes[prev_idx].steps[prev_rank];
                prev_record.next_id = handle.id().0;
                prev_record.next_rank = rank as u64;
            }
            let step = StepHandle::on_node(*handle, rank);
            first.get_or_insert(step);
            prev = Some((idx, handle.id(), rank));
        }
        let last = prev.map(|(_, id, rank)| StepHandle::on_node(Handle::forward(id), rank));

        self.graph.paths.push(PathMeta {
            name: name.to_string(),
            first,
            last,
            len: steps.len(),
        });
        self.graph.path_index.insert(name.to_string(), path);
        Ok(path)
    }

    /// Number of nodes added so far.
    pub fn node_count(&self) -> usize {
        self.graph.nodes.len()
    }

    /// Freezes the graph.
    pub fn build(self) -> Graph {
        self.graph
    }
}
