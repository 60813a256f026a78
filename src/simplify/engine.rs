//! The simplifier (C5): streams sorted edgesets by parent, merging
//! segment chains through a priority queue and an overlap-count index.

use crate::arena::{Arena, ArenaIndex};
use crate::edgeset_table::{EdgesetTable, EdgesetTableRow};
use crate::node_table::{NodeTable, NodeTableRow};
use crate::ordered_map::{OrderedMap, Relation};
use crate::simplify::overlap::{OverlapCount, StartComparator};
use crate::simplify::segment::{QueueKey, QueueKeyComparator, Segment};
use crate::{NodeId, Position, TskitError};

/// The squash buffer: a one-row state machine so that consecutive
/// edgesets sharing a parent, abutting intervals, and an identical
/// children list collapse into a single output row instead of emitting a
/// new one per merge.
struct PendingEdgeset {
    left: Position,
    right: Position,
    parent: NodeId,
    children: Vec<NodeId>,
}

/// One run of the simplification algorithm. Owns every arena-allocated
/// small object (segments, the two ordered maps) for the duration of the
/// run; nothing here outlives [`Simplifier::run`].
pub(crate) struct Simplifier<'a> {
    input_nodes: Vec<NodeTableRow>,
    input_edgesets: Vec<EdgesetTableRow>,
    output_nodes: &'a mut NodeTable,
    output_edgesets: &'a mut EdgesetTable,
    sequence_length: Position,

    segments: Arena<Segment>,
    ancestor_map: Vec<Option<ArenaIndex<Segment>>>,
    merge_queue: OrderedMap<QueueKey, ArenaIndex<Segment>, QueueKeyComparator>,
    overlap_counts: OrderedMap<Position, OverlapCount, StartComparator>,

    idmap: Vec<NodeId>,
    last_edgeset: Option<PendingEdgeset>,
}

/// Default chunk size for the segment and ordered-map node arenas. Chosen
/// to amortize allocation over a run with nontrivial segment churn
/// without reserving an unreasonable amount up front for small inputs.
const ARENA_CHUNK: usize = 1024;

impl<'a> Simplifier<'a> {
    pub(crate) fn new(
        input_nodes: Vec<NodeTableRow>,
        input_edgesets: Vec<EdgesetTableRow>,
        output_nodes: &'a mut NodeTable,
        output_edgesets: &'a mut EdgesetTable,
        samples: &[NodeId],
        sequence_length: Position,
    ) -> Result<Self, TskitError> {
        let num_input_nodes = input_nodes.len();
        let num_samples = samples.len();

        let mut segments = Arena::new(ARENA_CHUNK)?;
        let mut overlap_counts = OrderedMap::new(ARENA_CHUNK, StartComparator)?;
        overlap_counts.insert(
            Position::from(0.0),
            OverlapCount {
                count: num_samples as u32,
            },
        )?;
        overlap_counts.insert(
            sequence_length,
            OverlapCount {
                count: num_samples as u32 + 1,
            },
        )?;

        let mut ancestor_map = vec![None; num_input_nodes];
        let mut idmap = vec![NodeId::NULL; num_input_nodes];

        for &s in samples {
            let i = usize::try_from(s)?;
            let row = &input_nodes[i];
            let s_out =
                output_nodes.add_row(row.flags, row.time, row.population, &row.name)?;
            idmap[i] = s_out;
            let seg = segments.alloc(Segment {
                left: Position::from(0.0),
                right: sequence_length,
                node: s_out,
                next: None,
            })?;
            ancestor_map[i] = Some(seg);
        }

        Ok(Self {
            input_nodes,
            input_edgesets,
            output_nodes,
            output_edgesets,
            sequence_length,
            segments,
            ancestor_map,
            merge_queue: OrderedMap::new(ARENA_CHUNK, QueueKeyComparator)?,
            overlap_counts,
            idmap,
            last_edgeset: None,
        })
    }

    fn checked_index(&self, id: NodeId) -> Result<usize, TskitError> {
        let i = usize::try_from(id)?;
        if i >= self.input_nodes.len() {
            return Err(TskitError::OutOfBounds {
                reason: "node id exceeds input node table size",
            });
        }
        Ok(i)
    }

    /// Run the main streaming loop over all input edgesets, then flush
    /// the squash buffer, returning the input-id -> output-id map.
    pub(crate) fn run(mut self) -> Result<Vec<NodeId>, TskitError> {
        if !self.input_edgesets.is_empty() {
            let mut current_parent = self.input_edgesets[0].parent;
            let n = self.input_edgesets.len();
            for j in 0..n {
                let parent = self.input_edgesets[j].parent;
                if parent != current_parent {
                    let idx = self.checked_index(current_parent)?;
                    self.merge_ancestors(idx)?;
                    debug_assert!(
                        self.merge_queue.is_empty(),
                        "merge_ancestors must drain the queue before returning"
                    );
                    let t_cur = self.node_time(current_parent)?;
                    let t_new = self.node_time(parent)?;
                    if f64::from(t_cur) > f64::from(t_new) {
                        return Err(TskitError::RecordsNotTimeSorted);
                    }
                    current_parent = parent;
                }

                let left = self.input_edgesets[j].left;
                let right = self.input_edgesets[j].right;
                let children = self.input_edgesets[j].children.clone();
                for child in children {
                    let ci = self.checked_index(child)?;
                    if self.ancestor_map[ci].is_some() {
                        self.remove_ancestry(left, right, ci)?;
                    }
                }
            }
            let idx = self.checked_index(current_parent)?;
            self.merge_ancestors(idx)?;
        }
        self.flush_last_edgeset()?;
        Ok(self.idmap)
    }

    fn node_time(&self, id: NodeId) -> Result<crate::Time, TskitError> {
        let i = self.checked_index(id)?;
        Ok(self.input_nodes[i].time)
    }

    /// Extract the portion of `ancestor_map[input_id]`'s chain overlapping
    /// `[left, right)` and enqueue its head into the merge queue.
    fn remove_ancestry(
        &mut self,
        left: Position,
        right: Position,
        input_id: usize,
    ) -> Result<(), TskitError> {
        let head = self.ancestor_map[input_id];
        let mut last: Option<ArenaIndex<Segment>> = None;
        let mut cursor = head;
        while let Some(idx) = cursor {
            let seg = *self.segments.get(idx);
            if f64::from(seg.right) > f64::from(left) {
                break;
            }
            last = cursor;
            cursor = seg.next;
        }

        let mut new_head = head;
        if let Some(x_idx) = cursor {
            let mut x = *self.segments.get(x_idx);
            if f64::from(x.left) < f64::from(left) {
                let y_idx = self.segments.alloc(Segment {
                    left: x.left,
                    right: left,
                    node: x.node,
                    next: Some(x_idx),
                })?;
                self.segments.get_mut(x_idx).left = left;
                x.left = left;
                match last {
                    Some(l) => self.segments.get_mut(l).next = Some(y_idx),
                    None => new_head = Some(y_idx),
                }
                last = Some(y_idx);
            }

            if f64::from(x.left) < f64::from(right) {
                // Advance past every segment fully consumed by [left,
                // right): `cursor` ends up at the first segment with
                // `right > right`, or `None` if the chain runs out first.
                let mut prev_idx: Option<ArenaIndex<Segment>> = None;
                let mut cursor = Some(x_idx);
                while let Some(idx) = cursor {
                    let seg = *self.segments.get(idx);
                    if f64::from(seg.right) <= f64::from(right) {
                        prev_idx = Some(idx);
                        cursor = seg.next;
                    } else {
                        break;
                    }
                }

                let remainder = match cursor {
                    Some(tail_idx) if f64::from(self.segments.get(tail_idx).left) < f64::from(right) => {
                        let tail = *self.segments.get(tail_idx);
                        let y_idx = self.segments.alloc(Segment {
                            left: right,
                            right: tail.right,
                            node: tail.node,
                            next: tail.next,
                        })?;
                        self.segments.get_mut(tail_idx).right = right;
                        self.segments.get_mut(tail_idx).next = None;
                        Some(y_idx)
                    }
                    Some(tail_idx) => {
                        // `tail` begins at or after `right`: it is already
                        // the untouched remainder, not part of the
                        // extracted chain -- just sever the link to it.
                        if let Some(p) = prev_idx {
                            self.segments.get_mut(p).next = None;
                        }
                        Some(tail_idx)
                    }
                    None => None, // consumed to the end of the chain
                };

                self.merge_queue.insert((x.left, x.node), x_idx)?;

                match last {
                    Some(l) => self.segments.get_mut(l).next = remainder,
                    None => new_head = remainder,
                }
            }
        }
        self.ancestor_map[input_id] = new_head;
        Ok(())
    }

    /// Detach `x`'s tail (re-enqueuing it if non-null) and return `x`
    /// itself, now a standalone segment, as the single-coverage `alpha`.
    fn detach_and_requeue_tail(
        &mut self,
        x_idx: ArenaIndex<Segment>,
    ) -> Result<ArenaIndex<Segment>, TskitError> {
        let next = self.segments.get(x_idx).next;
        self.segments.get_mut(x_idx).next = None;
        if let Some(next_idx) = next {
            let next_seg = *self.segments.get(next_idx);
            self.merge_queue
                .insert((next_seg.left, next_seg.node), next_idx)?;
        }
        Ok(x_idx)
    }

    fn append_to_chain(
        &mut self,
        z: &mut Option<ArenaIndex<Segment>>,
        input_id: usize,
        alpha_idx: ArenaIndex<Segment>,
    ) {
        match *z {
            None => self.ancestor_map[input_id] = Some(alpha_idx),
            Some(zi) => self.segments.get_mut(zi).next = Some(alpha_idx),
        }
        *z = Some(alpha_idx);
    }

    /// Insert a breakpoint at `coord` if one doesn't already exist,
    /// copying its count from the inclusive predecessor so the step
    /// function is unchanged.
    fn ensure_breakpoint(&mut self, coord: Position) -> Result<(), TskitError> {
        if self.overlap_counts.search(&coord).is_some() {
            return Ok(());
        }
        let (node, relation) = self
            .overlap_counts
            .search_closest(&coord)
            .expect("overlap_counts is seeded with at least two entries");
        let predecessor = match relation {
            Relation::Less => node,
            Relation::Greater => self
                .overlap_counts
                .prev(node)
                .expect("coord lies within [0, sequence_length]; the 0 entry is always a predecessor"),
            Relation::Equal => unreachable!("handled by the exact search above"),
        };
        let count = self.overlap_counts.value(predecessor).count;
        self.overlap_counts.insert(coord, OverlapCount { count })?;
        Ok(())
    }

    /// Resolve all queued chain fragments into a new ancestor chain for
    /// `input_id`, emitting edgesets for every coalescence encountered.
    fn merge_ancestors(&mut self, input_id: usize) -> Result<(), TskitError> {
        self.ancestor_map[input_id] = None;
        let mut z: Option<ArenaIndex<Segment>> = None;
        let mut output_node: Option<NodeId> = None;

        while let Some(head_handle) = self.merge_queue.head() {
            let l = self.merge_queue.key(head_handle).0;

            let mut h_items = Vec::new();
            loop {
                match self.merge_queue.head() {
                    Some(handle) if self.merge_queue.key(handle).0 == l => {
                        let idx = *self.merge_queue.value(handle);
                        self.merge_queue.unlink(handle);
                        h_items.push(idx);
                    }
                    _ => break,
                }
            }

            let mut r_max = self.sequence_length;
            for &idx in &h_items {
                let right = self.segments.get(idx).right;
                if f64::from(right) < f64::from(r_max) {
                    r_max = right;
                }
            }
            let lookahead = self.merge_queue.head().map(|h| self.merge_queue.key(h).0);
            if let Some(next_l) = lookahead {
                if f64::from(next_l) < f64::from(r_max) {
                    r_max = next_l;
                }
            }

            if h_items.len() == 1 {
                let x_idx = h_items[0];
                let x = *self.segments.get(x_idx);
                let alpha_idx = match lookahead {
                    Some(next_l) if f64::from(next_l) < f64::from(x.right) => {
                        let alpha = self.segments.alloc(Segment {
                            left: x.left,
                            right: next_l,
                            node: x.node,
                            next: None,
                        })?;
                        self.segments.get_mut(x_idx).left = next_l;
                        self.merge_queue.insert((next_l, x.node), x_idx)?;
                        alpha
                    }
                    _ => self.detach_and_requeue_tail(x_idx)?,
                };
                self.append_to_chain(&mut z, input_id, alpha_idx);
            } else {
                let h = h_items.len() as u32;
                if output_node.is_none() {
                    let row = self.input_nodes[input_id].clone();
                    let v = self
                        .output_nodes
                        .add_row(row.flags, row.time, row.population, &row.name)?;
                    output_node = Some(v);
                    self.idmap[input_id] = v;
                }
                let v = output_node.expect("just assigned above");

                self.ensure_breakpoint(l)?;
                self.ensure_breakpoint(r_max)?;

                let l_handle = self
                    .overlap_counts
                    .search(&l)
                    .expect("breakpoint at l was just ensured");
                let l_count = self.overlap_counts.value(l_handle).count;

                let (r, emit_alpha) = if l_count == h {
                    self.overlap_counts.value_mut(l_handle).count = 0;
                    let r = match self.overlap_counts.next(l_handle) {
                        Some(n) => *self.overlap_counts.key(n),
                        None => r_max,
                    };
                    (r, false)
                } else {
                    let mut cur = l_handle;
                    loop {
                        let cur_start = *self.overlap_counts.key(cur);
                        let cur_count = self.overlap_counts.value(cur).count;
                        if cur_count == h || f64::from(cur_start) >= f64::from(r_max) {
                            break;
                        }
                        self.overlap_counts.value_mut(cur).count -= h - 1;
                        match self.overlap_counts.next(cur) {
                            Some(n) => cur = n,
                            None => break,
                        }
                    }
                    (*self.overlap_counts.key(cur), true)
                };

                let mut children = Vec::with_capacity(h_items.len());
                for &idx in &h_items {
                    let seg = *self.segments.get(idx);
                    children.push(seg.node);
                    if f64::from(seg.right) == f64::from(r) {
                        let freed = self.segments.free(idx);
                        if let Some(next_idx) = freed.next {
                            let next_seg = *self.segments.get(next_idx);
                            self.merge_queue
                                .insert((next_seg.left, next_seg.node), next_idx)?;
                        }
                    } else if f64::from(seg.right) > f64::from(r) {
                        self.segments.get_mut(idx).left = r;
                        self.merge_queue.insert((r, seg.node), idx)?;
                    }
                }
                self.record_edgeset(l, r, v, children)?;

                if emit_alpha {
                    let alpha = self.segments.alloc(Segment {
                        left: l,
                        right: r,
                        node: v,
                        next: None,
                    })?;
                    self.append_to_chain(&mut z, input_id, alpha);
                }
            }
        }
        Ok(())
    }

    /// Record one parent -> children edgeset, squashing it into the
    /// pending row when it abuts and matches; otherwise flush the
    /// pending row and start a new one.
    fn record_edgeset(
        &mut self,
        left: Position,
        right: Position,
        parent: NodeId,
        mut children: Vec<NodeId>,
    ) -> Result<(), TskitError> {
        children.sort_by_key(|n| i32::from(*n));

        let squashes = matches!(
            &self.last_edgeset,
            Some(p) if f64::from(p.right) == f64::from(left)
                && p.parent == parent
                && p.children == children
        );
        if squashes {
            self.last_edgeset.as_mut().unwrap().right = right;
        } else {
            self.flush_last_edgeset()?;
            self.last_edgeset = Some(PendingEdgeset {
                left,
                right,
                parent,
                children,
            });
        }
        Ok(())
    }

    fn flush_last_edgeset(&mut self) -> Result<(), TskitError> {
        if let Some(pending) = self.last_edgeset.take() {
            self.output_edgesets
                .add_row(pending.left, pending.right, pending.parent, &pending.children)?;
        }
        Ok(())
    }
}
