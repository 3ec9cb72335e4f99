use smallvec::SmallVec;

use crate::types::{Handle, NodeId, PathHandle};

/// Link recorded for one step of a path on the node it visits.
///
/// `prev_id`/`next_id` name the node of the neighboring step on the same
/// path and `prev_rank`/`next_rank` its position in that node's step list.
/// An id of `0` means the step is the first (or last) one of its path.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StepRecord {
    /// Path this step belongs to.
    pub path: PathHandle,
    /// Orientation in which the path traverses the node.
    pub is_reverse: bool,
    /// Node of the previous step, `0` when there is none.
    pub prev_id: u64,
    /// Rank of the previous step on `prev_id`.
    pub prev_rank: u64,
    /// Node of the next step, `0` when there is none.
    pub next_id: u64,
    /// Rank of the next step on `next_id`.
    pub next_rank: u64,
}

impl StepRecord {
    pub(crate) fn new(path: PathHandle, is_reverse: bool) -> Self {
        Self {
            path,
            is_reverse,
            prev_id: 0,
            prev_rank: 0,
            next_id: 0,
            next_rank: 0,
        }
    }

    pub(crate) fn has_prev(&self) -> bool {
        self.prev_id != 0
    }

    pub(crate) fn has_next(&self) -> bool {
        self.next_id != 0
    }
}

pub(crate) type EdgeList = SmallVec<[Handle; 2]>;

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) id: NodeId,
    pub(crate) sequence: Vec<u8>,
    // Handles attached to the start (left) and end (right) of the forward strand.
    pub(crate) left: EdgeList,
    pub(crate) right: EdgeList,
    pub(crate) steps: Vec<StepRecord>,
}

impl Node {
    pub(crate) fn new(id: NodeId, sequence: Vec<u8>) -> Self {
        Self {
            id,
            sequence,
            left: EdgeList::new(),
            right: EdgeList::new(),
            steps: Vec::new(),
        }
    }
}

pub(crate) fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' | b'U' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'a' => b't',
        b't' | b'u' => b'a',
        b'c' => b'g',
        b'g' => b'c',
        b'R' => b'Y',
        b'Y' => b'R',
        b'K' => b'M',
        b'M' => b'K',
        b'B' => b'V',
        b'V' => b'B',
        b'D' => b'H',
        b'H' => b'D',
        b'r' => b'y',
        b'y' => b'r',
        b'k' => b'm',
        b'm' => b'k',
        b'b' => b'v',
        b'v' => b'b',
        b'd' => b'h',
        b'h' => b'd',
        // N, S, W and anything unrecognized map to themselves.
        other => other,
    }
}

pub(crate) fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}
