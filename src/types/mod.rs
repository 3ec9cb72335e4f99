#![forbid(unsafe_code)]

//! Core identifiers and handle types shared by the graph engine and the
//! marshalling layer.
//!
//! The bit layout of [`Handle`], [`PathHandle`] and [`StepHandle`] belongs to
//! the engine. Code outside this module goes through the constructors and
//! accessors below and never shifts or masks handle bits itself.

use std::fmt;
use std::path::PathBuf;

/// Identifier of a node in the graph. Id `0` is never assigned.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Largest id that still fits in a [`Handle`] next to the orientation bit.
    pub const MAX: NodeId = NodeId(u64::MAX >> 1);

    /// Whether this id can be assigned to a node: non-zero and at most [`NodeId::MAX`].
    pub const fn is_valid(self) -> bool {
        self.0 != 0 && self.0 <= Self::MAX.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        NodeId(value)
    }
}

impl From<NodeId> for u64 {
    fn from(value: NodeId) -> Self {
        value.0
    }
}

/// A node visited in a specific orientation.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Handle(u64);

impl Handle {
    /// Builds a handle for `id` in the given orientation.
    pub const fn new(id: NodeId, is_reverse: bool) -> Self {
        Handle((id.0 << 1) | is_reverse as u64)
    }

    /// Forward-oriented handle for `id`.
    pub const fn forward(id: NodeId) -> Self {
        Self::new(id, false)
    }

    /// Node this handle refers to.
    pub const fn id(self) -> NodeId {
        NodeId(self.0 >> 1)
    }

    /// Whether the node is traversed on its reverse strand.
    pub const fn is_reverse(self) -> bool {
        self.0 & 1 != 0
    }

    /// Same node, opposite orientation.
    pub const fn flip(self) -> Self {
        Handle(self.0 ^ 1)
    }

    /// Same node, forward orientation.
    pub const fn as_forward(self) -> Self {
        Handle(self.0 & !1)
    }

    /// Integer form of the handle.
    pub const fn as_integer(self) -> u64 {
        self.0
    }

    /// Rebuilds a handle from [`Handle::as_integer`].
    pub const fn from_integer(value: u64) -> Self {
        Handle(value)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strand = if self.is_reverse() { '-' } else { '+' };
        write!(f, "{}{}", self.id(), strand)
    }
}

/// Identifier of an embedded path.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct PathHandle(u64);

impl PathHandle {
    pub(crate) const fn from_index(index: usize) -> Self {
        PathHandle(index as u64)
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }

    /// Integer form of the path handle.
    pub const fn as_integer(self) -> u64 {
        self.0
    }

    /// Rebuilds a path handle from [`PathHandle::as_integer`].
    pub const fn from_integer(value: u64) -> Self {
        PathHandle(value)
    }
}

/// One occurrence of a node within a path.
///
/// A regular step stores the forward handle of the visited node and the rank
/// of the step in that node's step list. The two sentinels produced by
/// [`StepHandle::path_end`] and [`StepHandle::path_front_end`] store the path
/// handle and a negative marker instead.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct StepHandle {
    data: [i64; 2],
}

const END_MARKER: i64 = -1;
const FRONT_END_MARKER: i64 = -2;

impl StepHandle {
    pub(crate) const fn on_node(node: Handle, rank: usize) -> Self {
        StepHandle {
            data: [node.as_forward().as_integer() as i64, rank as i64],
        }
    }

    /// Sentinel one past the last step of `path`.
    pub const fn path_end(path: PathHandle) -> Self {
        StepHandle {
            data: [path.as_integer() as i64, END_MARKER],
        }
    }

    /// Sentinel one before the first step of `path`.
    pub const fn path_front_end(path: PathHandle) -> Self {
        StepHandle {
            data: [path.as_integer() as i64, FRONT_END_MARKER],
        }
    }

    /// Raw components: `[handle component, path component]`.
    pub const fn as_integers(self) -> [i64; 2] {
        self.data
    }

    /// Rebuilds a step from [`StepHandle::as_integers`].
    pub const fn from_integers(data: [i64; 2]) -> Self {
        StepHandle { data }
    }

    /// Whether this is the [`StepHandle::path_end`] sentinel.
    pub const fn is_end(self) -> bool {
        self.data[1] == END_MARKER
    }

    /// Whether this is the [`StepHandle::path_front_end`] sentinel.
    pub const fn is_front_end(self) -> bool {
        self.data[1] == FRONT_END_MARKER
    }

    /// Path carried by a sentinel step.
    pub(crate) fn sentinel_path(self) -> Option<PathHandle> {
        (self.is_end() || self.is_front_end())
            .then(|| PathHandle::from_integer(self.data[0] as u64))
    }

    /// Node and rank of a regular step.
    pub(crate) fn node_rank(self) -> Option<(NodeId, usize)> {
        if self.data[1] < 0 {
            return None;
        }
        let handle = Handle::from_integer(self.data[0] as u64);
        Some((handle.id(), self.data[1] as usize))
    }
}

/// Directed connection between two oriented nodes.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Edge(pub Handle, pub Handle);

impl Edge {
    /// Edge leaving `left` on its right side and entering `right`.
    pub const fn new(left: Handle, right: Handle) -> Self {
        Edge(left, right)
    }

    /// The same connection read from the other strand.
    pub const fn reversed(self) -> Self {
        Edge(self.1.flip(), self.0.flip())
    }
}

/// Side of a handle to look at when following edges.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Direction {
    /// Towards the start of the handle.
    Left,
    /// Towards the end of the handle.
    Right,
}

impl Direction {
    /// `go_left` flag used by the flat interface.
    pub fn from_go_left(go_left: bool) -> Self {
        if go_left {
            Direction::Left
        } else {
            Direction::Right
        }
    }
}

/// Errors raised while loading or building a graph.
#[derive(thiserror::Error, Debug)]
pub enum GraphError {
    /// The graph file could not be read.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A GFA record could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the record.
        message: String,
    },
    /// A node id was declared twice.
    #[error("duplicate node {0}")]
    DuplicateNode(NodeId),
    /// A path name was declared twice.
    #[error("duplicate path '{0}'")]
    DuplicatePath(String),
    /// A record refers to a node that does not exist.
    #[error("{context} refers to missing node {id}")]
    MissingNode {
        /// Record kind that carried the reference.
        context: &'static str,
        /// The unknown id.
        id: NodeId,
    },
    /// Consecutive path steps are not connected and edge inference is off.
    #[error("no edge between {from} and {to}")]
    MissingEdge {
        /// Step the path leaves.
        from: Handle,
        /// Step the path enters.
        to: Handle,
    },
    /// A caller-supplied value was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result alias used across the engine.
pub type Result<T> = std::result::Result<T, GraphError>;
