//! [`TableCollection`]: the five tables bundled together with convenience
//! methods for sorting and simplification.

use crate::edgeset_table::EdgesetTable;
use crate::migration_table::MigrationTable;
use crate::mutation_table::MutationTable;
use crate::node_table::NodeTable;
use crate::site_table::SiteTable;
use crate::{NodeId, Position, SimplifyFlags, TskitError};

/// Default row-capacity growth increment for every table in a freshly
/// constructed collection.
const DEFAULT_ROW_INCREMENT: usize = 1024;
/// Default payload-capacity growth increment for every table in a freshly
/// constructed collection.
const DEFAULT_PAYLOAD_INCREMENT: usize = 4096;

/// A tree sequence's tables, bundled together.
///
/// This is the ordinary entry point: most callers construct one
/// `TableCollection`, populate it via the individual tables' `add_row`/
/// `set_columns`, then call [`TableCollection::full_sort`] followed by
/// [`TableCollection::simplify`].
///
/// # Examples
///
/// ```
/// use tskit_simplify::prelude::*;
///
/// let mut tables = TableCollection::new(Position::from(1.0)).unwrap();
/// let n0 = tables
///     .nodes
///     .add_row(NodeFlags::new_sample(), Time::from(0.0), PopulationId::NULL, b"")
///     .unwrap();
/// let n1 = tables
///     .nodes
///     .add_row(NodeFlags::new_sample(), Time::from(0.0), PopulationId::NULL, b"")
///     .unwrap();
/// let n2 = tables
///     .nodes
///     .add_row(NodeFlags::NONE, Time::from(1.0), PopulationId::NULL, b"")
///     .unwrap();
/// tables
///     .edgesets
///     .add_row(Position::from(0.0), Position::from(1.0), n2, &[n0, n1])
///     .unwrap();
/// tables.full_sort().unwrap();
/// let idmap = tables.simplify(&[n0, n1], SimplifyFlags::NONE).unwrap();
/// assert_eq!(tables.edgesets.num_rows(), 1);
/// assert!(!idmap[usize::try_from(n0).unwrap()].is_null());
/// ```
pub struct TableCollection {
    pub nodes: NodeTable,
    pub edgesets: EdgesetTable,
    pub migrations: MigrationTable,
    pub sites: SiteTable,
    pub mutations: MutationTable,
    sequence_length: Position,
}

impl TableCollection {
    /// Create an empty collection for a genome of the given length.
    pub fn new(sequence_length: Position) -> Result<Self, TskitError> {
        if !(sequence_length > 0.0) {
            return Err(TskitError::BadParam {
                reason: "sequence_length must be positive",
            });
        }
        Ok(Self {
            nodes: NodeTable::new(DEFAULT_ROW_INCREMENT, DEFAULT_PAYLOAD_INCREMENT)?,
            edgesets: EdgesetTable::new(DEFAULT_ROW_INCREMENT, DEFAULT_PAYLOAD_INCREMENT)?,
            migrations: MigrationTable::new(DEFAULT_ROW_INCREMENT)?,
            sites: SiteTable::new(DEFAULT_ROW_INCREMENT, DEFAULT_PAYLOAD_INCREMENT)?,
            mutations: MutationTable::new(DEFAULT_ROW_INCREMENT, DEFAULT_PAYLOAD_INCREMENT)?,
            sequence_length,
        })
    }

    pub fn sequence_length(&self) -> Position {
        self.sequence_length
    }

    /// Sort edgesets, sites, and mutations into the order
    /// [`TableCollection::simplify`] requires. See [`crate::sort::sort_tables`].
    pub fn full_sort(&mut self) -> Result<(), TskitError> {
        crate::sort::sort_tables(
            &self.nodes,
            &mut self.edgesets,
            &mut self.sites,
            &mut self.mutations,
        )
    }

    /// Reduce the tables to the ancestry of `samples`. Returns a map from
    /// input node id to output node id (`NodeId::NULL` for nodes that were
    /// not retained). See [`crate::simplify::simplify`].
    pub fn simplify(
        &mut self,
        samples: &[NodeId],
        flags: SimplifyFlags,
    ) -> Result<Vec<NodeId>, TskitError> {
        crate::simplify::simplify(
            &mut self.nodes,
            &mut self.edgesets,
            &mut self.sites,
            &mut self.mutations,
            samples,
            self.sequence_length,
            flags,
        )
    }

    pub fn print_state(&self, sink: &mut dyn std::io::Write) -> std::io::Result<()> {
        writeln!(sink, "sequence_length={}", self.sequence_length)?;
        self.nodes.print_state(sink)?;
        self.edgesets.print_state(sink)?;
        self.migrations.print_state(sink)?;
        self.sites.print_state(sink)?;
        self.mutations.print_state(sink)
    }
}
