#![forbid(unsafe_code)]

//! Read-only variation graph engine.
//!
//! Nodes carry a DNA sequence and are connected by bidirected edges. Paths
//! are stored as per-node step records linked to their neighbors, so
//! walking a path and listing the paths through a node are both direct
//! lookups.

mod builder;
mod gfa;
mod graph;
mod iter;
mod node;
mod options;

/// Incremental graph construction.
pub use builder::GraphBuilder;

/// GFA 1 loading.
pub use gfa::{load_gfa, read_gfa};

/// The immutable graph and its summary counters.
pub use graph::{Graph, GraphStats};

/// Iterators returned by graph queries.
pub use iter::{Handles, Neighbors, NodeSteps, PathHandles, PathSteps};

/// Per-node step links.
pub use node::StepRecord;

/// Graph loading options.
pub use options::LoadOptions;
