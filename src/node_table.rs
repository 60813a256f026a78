//! The node table: one row per ancestor, with a variable-length name.

use crate::growth::Growth;
use crate::{NodeFlags, NodeId, PopulationId, Time, TskitError};

/// Row of a [`NodeTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTableRow {
    pub id: NodeId,
    pub flags: NodeFlags,
    pub time: Time,
    pub population: PopulationId,
    pub name: Vec<u8>,
}

/// Compute the byte range of payload element `row` given its prefix-summed
/// lengths. No offset column is stored; this is recomputed on access, per
/// the "implicit prefix sums" data model.
fn payload_range(lengths: &[u32], row: usize) -> std::ops::Range<usize> {
    let start: usize = lengths[..row].iter().map(|&l| l as usize).sum();
    let end = start + lengths[row] as usize;
    start..end
}

/// Column-oriented, append-only table of nodes.
pub struct NodeTable {
    flags: Vec<NodeFlags>,
    time: Vec<Time>,
    population: Vec<PopulationId>,
    name: Vec<u8>,
    name_length: Vec<u32>,
    growth: Growth,
}

impl NodeTable {
    /// Allocate a table that grows rows and name payload by the given
    /// increments. Fails with [`TskitError::BadParam`] if either increment
    /// is zero.
    pub fn new(row_increment: usize, payload_increment: usize) -> Result<Self, TskitError> {
        Ok(Self {
            flags: Vec::new(),
            time: Vec::new(),
            population: Vec::new(),
            name: Vec::new(),
            name_length: Vec::new(),
            growth: Growth::new(row_increment, payload_increment)?,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.flags.len()
    }

    pub fn time(&self, row: NodeId) -> Result<Time, TskitError> {
        let i = Self::checked_index(row, self.num_rows())?;
        Ok(self.time[i])
    }

    pub fn flags(&self, row: NodeId) -> Result<NodeFlags, TskitError> {
        let i = Self::checked_index(row, self.num_rows())?;
        Ok(self.flags[i])
    }

    pub fn population(&self, row: NodeId) -> Result<PopulationId, TskitError> {
        let i = Self::checked_index(row, self.num_rows())?;
        Ok(self.population[i])
    }

    fn checked_index(row: NodeId, num_rows: usize) -> Result<usize, TskitError> {
        let i = row.to_usize().ok_or(TskitError::OutOfBounds {
            reason: "node id is negative",
        })?;
        if i >= num_rows {
            return Err(TskitError::OutOfBounds {
                reason: "node id exceeds num_rows",
            });
        }
        Ok(i)
    }

    /// Append one row, growing capacity by the configured increments as
    /// needed.
    pub fn add_row(
        &mut self,
        flags: NodeFlags,
        time: Time,
        population: PopulationId,
        name: &[u8],
    ) -> Result<NodeId, TskitError> {
        self.growth.ensure_rows(self.num_rows() + 1);
        self.growth.ensure_payload(self.name.len() + name.len());
        self.growth.reserve_rows(&mut self.flags);
        self.growth.reserve_rows(&mut self.time);
        self.growth.reserve_rows(&mut self.population);
        self.growth.reserve_rows(&mut self.name_length);
        self.growth.reserve_payload(&mut self.name);
        let id = NodeId::from(self.num_rows());
        self.flags.push(flags);
        self.time.push(time);
        self.population.push(population);
        self.name.extend_from_slice(name);
        self.name_length.push(name.len() as u32);
        Ok(id)
    }

    /// Bulk-replace all columns. `population`, `name`, and `name_length`
    /// are optional: an absent `population` fills with
    /// [`PopulationId::NULL`] ("unspecified"); an absent `name`/
    /// `name_length` pair clears the name payload.
    pub fn set_columns(
        &mut self,
        flags: &[NodeFlags],
        time: &[Time],
        population: Option<&[PopulationId]>,
        name: Option<&[u8]>,
        name_length: Option<&[u32]>,
    ) -> Result<(), TskitError> {
        if flags.len() != time.len() {
            return Err(TskitError::BadParam {
                reason: "node table set_columns: flags and time length mismatch",
            });
        }
        if let Some(p) = population {
            if p.len() != flags.len() {
                return Err(TskitError::BadParam {
                    reason: "node table set_columns: population length mismatch",
                });
            }
        }
        if name.is_some() != name_length.is_some() {
            return Err(TskitError::BadParam {
                reason: "node table set_columns: name and name_length must be given together",
            });
        }
        if let Some(nl) = name_length {
            if nl.len() != flags.len() {
                return Err(TskitError::BadParam {
                    reason: "node table set_columns: name_length length mismatch",
                });
            }
        }

        let num_rows = flags.len();
        self.growth.ensure_rows(num_rows);
        let payload_len = name.map_or(0, <[u8]>::len);
        self.growth.ensure_payload(payload_len);

        self.flags = flags.to_vec();
        self.time = time.to_vec();
        self.population = match population {
            Some(p) => p.to_vec(),
            None => vec![PopulationId::NULL; num_rows],
        };
        self.name = name.map_or_else(Vec::new, <[u8]>::to_vec);
        self.name_length = name_length.map_or_else(|| vec![0; num_rows], <[u32]>::to_vec);
        Ok(())
    }

    /// Logically clear all rows, keeping allocated capacity.
    pub fn reset(&mut self) {
        self.flags.clear();
        self.time.clear();
        self.population.clear();
        self.name.clear();
        self.name_length.clear();
    }

    /// Release all storage.
    pub fn free(&mut self) {
        *self = NodeTable {
            flags: Vec::new(),
            time: Vec::new(),
            population: Vec::new(),
            name: Vec::new(),
            name_length: Vec::new(),
            growth: self.growth,
        };
    }

    pub fn equal(&self, other: &Self) -> bool {
        self.flags == other.flags
            && self.population == other.population
            && self.name == other.name
            && self.name_length == other.name_length
            && self.time.len() == other.time.len()
            && self
                .time
                .iter()
                .zip(other.time.iter())
                .all(|(a, b)| crate::util::f64_partial_cmp_equal(&f64::from(*a), &f64::from(*b)))
    }

    /// Write a plain-text dump of the table to `sink`.
    pub fn print_state(&self, sink: &mut dyn std::io::Write) -> std::io::Result<()> {
        writeln!(sink, "NodeTable: {} rows", self.num_rows())?;
        for row in self.iter() {
            writeln!(
                sink,
                "id={} flags={:?} time={} population={} name={:?}",
                row.id, row.flags, row.time, row.population, row.name
            )?;
        }
        Ok(())
    }

    fn row_at(&self, i: usize) -> NodeTableRow {
        NodeTableRow {
            id: NodeId::from(i),
            flags: self.flags[i],
            time: self.time[i],
            population: self.population[i],
            name: self.name[payload_range(&self.name_length, i)].to_vec(),
        }
    }

    pub fn row(&self, id: NodeId) -> Result<NodeTableRow, TskitError> {
        let i = Self::checked_index(id, self.num_rows())?;
        Ok(self.row_at(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeTableRow> + '_ {
        (0..self.num_rows()).map(move |i| self.row_at(i))
    }

    /// The ids of every row flagged [`NodeFlags::IS_SAMPLE`], in row order.
    pub fn samples_as_vector(&self) -> Vec<NodeId> {
        (0..self.num_rows())
            .filter(|&i| self.flags[i].is_sample())
            .map(NodeId::from)
            .collect()
    }

    /// The ids of every row for which `predicate` returns `true`, in row
    /// order.
    pub fn create_node_id_vector(&self, predicate: impl Fn(&NodeTableRow) -> bool) -> Vec<NodeId> {
        self.iter().filter(predicate).map(|row| row.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_row_and_read_back() {
        let mut t = NodeTable::new(4, 16).unwrap();
        let id = t
            .add_row(NodeFlags::new_sample(), Time::from(0.0), PopulationId::NULL, b"a")
            .unwrap();
        assert_eq!(id, 0);
        let row = t.row(id).unwrap();
        assert!(row.flags.is_sample());
        assert_eq!(row.name, b"a");
    }

    #[test]
    fn reset_keeps_capacity_clears_rows() {
        let mut t = NodeTable::new(4, 16).unwrap();
        for _ in 0..3 {
            t.add_row(NodeFlags::NONE, Time::from(0.0), PopulationId::NULL, b"")
                .unwrap();
        }
        t.reset();
        assert_eq!(t.num_rows(), 0);
    }

    #[test]
    fn set_columns_defaults_population_and_name() {
        let mut t = NodeTable::new(4, 16).unwrap();
        t.set_columns(
            &[NodeFlags::NONE, NodeFlags::new_sample()],
            &[Time::from(1.0), Time::from(2.0)],
            None,
            None,
            None,
        )
        .unwrap();
        assert_eq!(t.num_rows(), 2);
        assert_eq!(t.population(NodeId::from(0)).unwrap(), PopulationId::NULL);
        assert_eq!(t.row(NodeId::from(0)).unwrap().name, Vec::<u8>::new());
    }

    #[test]
    fn set_columns_rejects_length_mismatch() {
        let mut t = NodeTable::new(4, 16).unwrap();
        let err = t
            .set_columns(&[NodeFlags::NONE], &[Time::from(1.0), Time::from(2.0)], None, None, None)
            .unwrap_err();
        assert!(matches!(err, TskitError::BadParam { .. }));
    }

    #[test]
    fn variable_length_names_round_trip() {
        let mut t = NodeTable::new(2, 4).unwrap();
        t.add_row(NodeFlags::NONE, Time::from(0.0), PopulationId::NULL, b"anc")
            .unwrap();
        t.add_row(NodeFlags::NONE, Time::from(1.0), PopulationId::NULL, b"")
            .unwrap();
        t.add_row(NodeFlags::NONE, Time::from(2.0), PopulationId::NULL, b"xy")
            .unwrap();
        assert_eq!(t.row(NodeId::from(0)).unwrap().name, b"anc");
        assert_eq!(t.row(NodeId::from(1)).unwrap().name, Vec::<u8>::new());
        assert_eq!(t.row(NodeId::from(2)).unwrap().name, b"xy");
    }

    #[test]
    fn samples_as_vector_filters_by_flag() {
        let mut t = NodeTable::new(4, 16).unwrap();
        t.add_row(NodeFlags::new_sample(), Time::from(0.0), PopulationId::NULL, b"")
            .unwrap();
        t.add_row(NodeFlags::NONE, Time::from(1.0), PopulationId::NULL, b"")
            .unwrap();
        t.add_row(NodeFlags::new_sample(), Time::from(0.0), PopulationId::NULL, b"")
            .unwrap();
        assert_eq!(
            t.samples_as_vector(),
            vec![NodeId::from(0), NodeId::from(2)]
        );
    }

    #[test]
    fn create_node_id_vector_filters_by_predicate() {
        let mut t = NodeTable::new(4, 16).unwrap();
        t.add_row(NodeFlags::NONE, Time::from(0.0), PopulationId::NULL, b"")
            .unwrap();
        t.add_row(NodeFlags::NONE, Time::from(5.0), PopulationId::NULL, b"")
            .unwrap();
        let old = t.create_node_id_vector(|row| f64::from(row.time) >= 2.0);
        assert_eq!(old, vec![NodeId::from(1)]);
    }
}
