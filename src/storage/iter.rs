//! Lazy cursors over graph collections.

use std::slice;

use crate::types::{Handle, PathHandle, StepHandle};

use super::graph::Graph;
use super::node::Node;

/// Forward handles of all nodes, in storage order.
pub struct Handles<'a> {
    inner: slice::Iter<'a, Node>,
}

impl<'a> Handles<'a> {
    pub(crate) fn new(inner: slice::Iter<'a, Node>) -> Self {
        Self { inner }
    }
}

impl Iterator for Handles<'_> {
    type Item = Handle;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|node| Handle::forward(node.id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Handles<'_> {}

/// All path handles, in load order.
pub struct PathHandles {
    next: usize,
    len: usize,
}

impl PathHandles {
    pub(crate) fn new(len: usize) -> Self {
        Self { next: 0, len }
    }
}

impl Iterator for PathHandles {
    type Item = PathHandle;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let item = PathHandle::from_index(self.next);
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PathHandles {}

/// Neighbors of a handle on one side.
pub struct Neighbors<'a> {
    inner: slice::Iter<'a, Handle>,
    flip: bool,
}

impl<'a> Neighbors<'a> {
    pub(crate) fn new(inner: slice::Iter<'a, Handle>, flip: bool) -> Self {
        Self { inner, flip }
    }

    pub(crate) fn empty() -> Self {
        const NONE: &[Handle] = &[];
        Self {
            inner: NONE.iter(),
            flip: false,
        }
    }
}

impl Iterator for Neighbors<'_> {
    type Item = Handle;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = *self.inner.next()?;
        Some(if self.flip { handle.flip() } else { handle })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Neighbors<'_> {}

/// Steps of one path, following the step links from the first step.
pub struct PathSteps<'a> {
    graph: &'a Graph,
    cursor: Option<StepHandle>,
}

impl<'a> PathSteps<'a> {
    pub(crate) fn new(graph: &'a Graph, begin: StepHandle) -> Self {
        let cursor = (!begin.is_end()).then_some(begin);
        Self { graph, cursor }
    }
}

impl Iterator for PathSteps<'_> {
    type Item = StepHandle;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = self
            .graph
            .next_step(current)
            .filter(|next| !next.is_end());
        Some(current)
    }
}

/// Steps visiting a single node, in rank order.
pub struct NodeSteps {
    node: Handle,
    rank: usize,
    len: usize,
}

impl NodeSteps {
    pub(crate) fn new(node: Handle, len: usize) -> Self {
        Self { node, rank: 0, len }
    }
}

impl Iterator for NodeSteps {
    type Item = StepHandle;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rank >= self.len {
            return None;
        }
        let step = StepHandle::on_node(self.node, self.rank);
        self.rank += 1;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.rank;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for NodeSteps {}
