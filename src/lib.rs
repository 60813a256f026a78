//! Tree-sequence table simplification core.
//!
//! A tree sequence encodes the ancestry of a set of sampled chromosomes as
//! correlated genealogical trees along a genome, represented as tabular
//! node and edgeset records. This crate implements the two algorithms that
//! turn an arbitrary (but internally consistent) set of such tables into
//! the minimal equivalent tree sequence restricted to a chosen subset of
//! samples:
//!
//! - [`sort::sort_tables`]: establishes the `(parent-time, parent, left)`
//!   edgeset order (plus sorted sites/mutations) that the simplifier
//!   requires of its input.
//! - [`simplify::simplify`]: the segment-merging coalescent reducer
//!   itself.
//!
//! [`table_collection::TableCollection`] bundles the five tables together
//! with convenience wrappers over both. Most callers only need
//! `prelude::*` plus `TableCollection`.
//!
//! Serialization, on-disk formats, simulation, and language bindings are
//! out of scope; this crate operates purely on in-memory tables.

mod arena;
mod edgeset_table;
mod error;
mod flags;
mod growth;
mod migration_table;
mod mutation_table;
mod newtypes;
mod node_table;
mod ordered_map;
pub mod prelude;
mod simplify;
mod site_table;
mod sort;
mod table_collection;
mod util;

pub use edgeset_table::{EdgesetTable, EdgesetTableRow};
pub use error::{TskResult, TskitError};
pub use flags::{NodeFlags, SimplifyFlags};
pub use migration_table::{MigrationTable, MigrationTableRow};
pub use mutation_table::{MutationTable, MutationTableRow};
pub use newtypes::{
    MigrationId, MutationId, NodeId, PopulationId, Position, RawId, SiteId, Time,
};
pub use node_table::{NodeTable, NodeTableRow};
pub use site_table::{SiteTable, SiteTableRow};
pub use sort::sort_tables;
pub use table_collection::TableCollection;

pub use simplify::simplify;
