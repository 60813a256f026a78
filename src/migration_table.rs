//! The migration table. Pass-through for simplification: C5 never inspects
//! or mutates it beyond what [`crate::sort::sort_tables`] leaves untouched.

use crate::growth::Growth;
use crate::{NodeId, PopulationId, Position, Time, TskitError};

/// Row of a [`MigrationTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationTableRow {
    pub left: Position,
    pub right: Position,
    pub node: NodeId,
    pub source: PopulationId,
    pub dest: PopulationId,
    pub time: Time,
}

/// Column-oriented, append-only table of migrations.
pub struct MigrationTable {
    left: Vec<Position>,
    right: Vec<Position>,
    node: Vec<NodeId>,
    source: Vec<PopulationId>,
    dest: Vec<PopulationId>,
    time: Vec<Time>,
    growth: Growth,
}

impl MigrationTable {
    pub fn new(row_increment: usize) -> Result<Self, TskitError> {
        Ok(Self {
            left: Vec::new(),
            right: Vec::new(),
            node: Vec::new(),
            source: Vec::new(),
            dest: Vec::new(),
            time: Vec::new(),
            // Migrations carry no variable-length payload; the payload
            // increment is unused but kept so `Growth` stays uniform
            // across every table in the collection.
            growth: Growth::new(row_increment, 1)?,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.left.len()
    }

    pub fn add_row(
        &mut self,
        left: Position,
        right: Position,
        node: NodeId,
        source: PopulationId,
        dest: PopulationId,
        time: Time,
    ) -> Result<usize, TskitError> {
        self.growth.ensure_rows(self.num_rows() + 1);
        self.growth.reserve_rows(&mut self.left);
        self.growth.reserve_rows(&mut self.right);
        self.growth.reserve_rows(&mut self.node);
        self.growth.reserve_rows(&mut self.source);
        self.growth.reserve_rows(&mut self.dest);
        self.growth.reserve_rows(&mut self.time);
        let row = self.num_rows();
        self.left.push(left);
        self.right.push(right);
        self.node.push(node);
        self.source.push(source);
        self.dest.push(dest);
        self.time.push(time);
        Ok(row)
    }

    pub fn set_columns(
        &mut self,
        left: &[Position],
        right: &[Position],
        node: &[NodeId],
        source: &[PopulationId],
        dest: &[PopulationId],
        time: &[Time],
    ) -> Result<(), TskitError> {
        let num_rows = left.len();
        if [right.len(), node.len(), source.len(), dest.len(), time.len()]
            .iter()
            .any(|&l| l != num_rows)
        {
            return Err(TskitError::BadParam {
                reason: "migration table set_columns: column length mismatch",
            });
        }
        self.growth.ensure_rows(num_rows);
        self.left = left.to_vec();
        self.right = right.to_vec();
        self.node = node.to_vec();
        self.source = source.to_vec();
        self.dest = dest.to_vec();
        self.time = time.to_vec();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
        self.node.clear();
        self.source.clear();
        self.dest.clear();
        self.time.clear();
    }

    pub fn free(&mut self) {
        *self = MigrationTable {
            left: Vec::new(),
            right: Vec::new(),
            node: Vec::new(),
            source: Vec::new(),
            dest: Vec::new(),
            time: Vec::new(),
            growth: self.growth,
        };
    }

    pub fn print_state(&self, sink: &mut dyn std::io::Write) -> std::io::Result<()> {
        writeln!(sink, "MigrationTable: {} rows", self.num_rows())?;
        for row in self.iter() {
            writeln!(
                sink,
                "left={} right={} node={} source={} dest={} time={}",
                row.left, row.right, row.node, row.source, row.dest, row.time
            )?;
        }
        Ok(())
    }

    fn row_at(&self, i: usize) -> MigrationTableRow {
        MigrationTableRow {
            left: self.left[i],
            right: self.right[i],
            node: self.node[i],
            source: self.source[i],
            dest: self.dest[i],
            time: self.time[i],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = MigrationTableRow> + '_ {
        (0..self.num_rows()).map(move |i| self.row_at(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_row_and_iterate() {
        let mut t = MigrationTable::new(4).unwrap();
        t.add_row(
            Position::from(0.0),
            Position::from(1.0),
            NodeId::from(0),
            PopulationId::from(0),
            PopulationId::from(1),
            Time::from(3.0),
        )
        .unwrap();
        let rows: Vec<_> = t.iter().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].node, NodeId::from(0));
    }
}
