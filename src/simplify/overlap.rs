//! The overlap-count step function: how many ancestral segments cover
//! each genomic coordinate, across the whole simplifier run.
//!
//! Seeded once at the start of a run with two breakpoints -- `{0,
//! num_samples}` and `{sequence_length, num_samples + 1}` (the sentinel
//! upper bound that prevents `merge_ancestors` from walking past the end
//! of the genome) -- and refined with extra breakpoints as coalescence
//! events need them. This is a single map shared by every parent
//! processed during the run, not reset in between: it tracks the running
//! total of ancestral redundancy left in the whole graph, which only ever
//! decreases as ancestry coalesces.

use crate::ordered_map::Comparator;
use crate::Position;
use std::cmp::Ordering;

/// The value half of an overlap-count map entry; the `start` coordinate
/// is the map key, so it isn't duplicated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OverlapCount {
    pub count: u32,
}

/// Key comparator for the overlap-count map: ordered by `start`.
pub(crate) struct StartComparator;

impl Comparator<Position> for StartComparator {
    fn cmp(&self, a: &Position, b: &Position) -> Ordering {
        f64::from(*a)
            .partial_cmp(&f64::from(*b))
            .expect("genomic coordinates are never NaN")
    }
}
