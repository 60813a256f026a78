//! Ancestral segments: arena-allocated links of a per-node segment chain.

use crate::arena::ArenaIndex;
use crate::ordered_map::Comparator;
use crate::{NodeId, Position};
use std::cmp::Ordering;

/// One interval `[left, right)` of an ancestor's retained ancestry,
/// labeled with the output node it currently maps to.
///
/// Chains are acyclic and singly linked; a segment is reachable from
/// exactly one of `ancestor_map` or the merge queue at any time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Segment {
    pub left: Position,
    pub right: Position,
    pub node: NodeId,
    pub next: Option<ArenaIndex<Segment>>,
}

/// The merge queue's key: chain heads are ordered by `(left, node)`.
pub(crate) type QueueKey = (Position, NodeId);

pub(crate) struct QueueKeyComparator;

impl Comparator<QueueKey> for QueueKeyComparator {
    fn cmp(&self, a: &QueueKey, b: &QueueKey) -> Ordering {
        a.0.partial_cmp(&b.0)
            .expect("genomic coordinates are never NaN")
            .then_with(|| i32::from(a.1).cmp(&i32::from(b.1)))
    }
}
