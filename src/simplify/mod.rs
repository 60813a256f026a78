//! The simplifier (C5): reduces a set of tables to the ancestry of a
//! named sample set.
//!
//! [`simplify`] is the free-function entry point described in §6 of the
//! design; [`crate::TableCollection::simplify`] wraps it for the common
//! case of a caller holding all five tables together. `migrations` is not
//! part of this interface: simplification never inspects or mutates it
//! (it is a pass-through concern, same as in [`crate::sort::sort_tables`]).

mod engine;
mod overlap;
mod segment;

use crate::edgeset_table::EdgesetTable;
use crate::mutation_table::MutationTable;
use crate::node_table::NodeTable;
use crate::site_table::SiteTable;
use crate::{NodeId, Position, SimplifyFlags, TskitError};
use engine::Simplifier;

/// Reduce `nodes`/`edgesets` to the ancestry of `samples`, resetting
/// `sites` and `mutations` (mutation carry-over through the segment-merge
/// engine is out of scope for this core; see the design notes).
///
/// `nodes` and `edgesets` must already satisfy the order
/// [`crate::sort::sort_tables`] establishes: edgesets sorted by
/// `(parent-time, parent, left)` with each row's children ascending by
/// node id.
///
/// On success, returns the input-node-id -> output-node-id map
/// ([`NodeId::NULL`] for nodes that were not retained in the output).
///
/// # Errors
///
/// - [`TskitError::BadParam`] if `samples.len() < 2` or `nodes` is empty.
/// - [`TskitError::DuplicateSample`] if `samples` repeats an id.
/// - [`TskitError::BadSamples`] if a sample id lacks
///   [`crate::NodeFlags::IS_SAMPLE`].
/// - [`TskitError::OutOfBounds`] if a sample, parent, or child id falls
///   outside `nodes`.
/// - [`TskitError::RecordsNotTimeSorted`] if edgesets are not in
///   non-decreasing parent-time order (the table sorter should have
///   prevented this).
/// - [`TskitError::NoMemory`] on arena or ordered-map growth failure.
pub fn simplify(
    nodes: &mut NodeTable,
    edgesets: &mut EdgesetTable,
    sites: &mut SiteTable,
    mutations: &mut MutationTable,
    samples: &[NodeId],
    sequence_length: Position,
    _flags: SimplifyFlags,
) -> Result<Vec<NodeId>, TskitError> {
    if samples.len() < 2 {
        return Err(TskitError::BadParam {
            reason: "simplify requires at least 2 samples",
        });
    }
    if nodes.num_rows() == 0 {
        return Err(TskitError::BadParam {
            reason: "simplify requires a non-empty node table",
        });
    }

    let mut seen = std::collections::HashSet::with_capacity(samples.len());
    for &s in samples {
        if !seen.insert(s) {
            return Err(TskitError::DuplicateSample);
        }
    }
    for &s in samples {
        let i = usize::try_from(s).map_err(|_| TskitError::OutOfBounds {
            reason: "sample id is negative",
        })?;
        if i >= nodes.num_rows() {
            return Err(TskitError::OutOfBounds {
                reason: "sample id exceeds num_rows",
            });
        }
        if !nodes.flags(s)?.is_sample() {
            return Err(TskitError::BadSamples);
        }
    }

    let input_nodes: Vec<_> = nodes.iter().collect();
    let input_edgesets: Vec<_> = edgesets.iter().collect();

    nodes.reset();
    edgesets.reset();
    sites.reset();
    mutations.reset();

    let simplifier = Simplifier::new(
        input_nodes,
        input_edgesets,
        nodes,
        edgesets,
        samples,
        sequence_length,
    )?;
    simplifier.run()
}
