//! Export commonly-used types.

pub use crate::{
    EdgesetTable, MigrationId, MigrationTable, MutationId, MutationTable, NodeFlags, NodeId,
    NodeTable, PopulationId, Position, SimplifyFlags, SiteId, SiteTable, TableCollection, Time,
    TskitError,
};
