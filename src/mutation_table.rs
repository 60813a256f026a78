//! The mutation table: a derived state at a site, on a node.

use crate::growth::Growth;
use crate::{NodeId, SiteId, TskitError};

/// Row of a [`MutationTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationTableRow {
    pub site: SiteId,
    pub node: NodeId,
    pub derived_state: Vec<u8>,
}

fn payload_range(lengths: &[u16], row: usize) -> std::ops::Range<usize> {
    let start: usize = lengths[..row].iter().map(|&l| l as usize).sum();
    let end = start + lengths[row] as usize;
    start..end
}

/// Column-oriented, append-only table of mutations.
pub struct MutationTable {
    site: Vec<SiteId>,
    node: Vec<NodeId>,
    derived_state: Vec<u8>,
    derived_state_length: Vec<u16>,
    growth: Growth,
}

impl MutationTable {
    pub fn new(row_increment: usize, payload_increment: usize) -> Result<Self, TskitError> {
        Ok(Self {
            site: Vec::new(),
            node: Vec::new(),
            derived_state: Vec::new(),
            derived_state_length: Vec::new(),
            growth: Growth::new(row_increment, payload_increment)?,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.site.len()
    }

    pub fn site(&self, row: usize) -> SiteId {
        self.site[row]
    }

    pub fn node(&self, row: usize) -> NodeId {
        self.node[row]
    }

    pub fn derived_state(&self, row: usize) -> &[u8] {
        &self.derived_state[payload_range(&self.derived_state_length, row)]
    }

    pub fn add_row(
        &mut self,
        site: SiteId,
        node: NodeId,
        derived_state: &[u8],
    ) -> Result<usize, TskitError> {
        self.growth.ensure_rows(self.num_rows() + 1);
        self.growth
            .ensure_payload(self.derived_state.len() + derived_state.len());
        self.growth.reserve_rows(&mut self.site);
        self.growth.reserve_rows(&mut self.node);
        self.growth.reserve_rows(&mut self.derived_state_length);
        self.growth.reserve_payload(&mut self.derived_state);
        let row = self.num_rows();
        self.site.push(site);
        self.node.push(node);
        self.derived_state.extend_from_slice(derived_state);
        self.derived_state_length.push(derived_state.len() as u16);
        Ok(row)
    }

    pub fn set_columns(
        &mut self,
        site: &[SiteId],
        node: &[NodeId],
        derived_state: &[u8],
        derived_state_length: &[u16],
    ) -> Result<(), TskitError> {
        let num_rows = site.len();
        if node.len() != num_rows || derived_state_length.len() != num_rows {
            return Err(TskitError::BadParam {
                reason: "mutation table set_columns: column length mismatch",
            });
        }
        let expected: usize = derived_state_length.iter().map(|&l| l as usize).sum();
        if expected != derived_state.len() {
            return Err(TskitError::BadParam {
                reason: "mutation table set_columns: derived_state payload length mismatch",
            });
        }
        self.growth.ensure_rows(num_rows);
        self.growth.ensure_payload(derived_state.len());

        self.site = site.to_vec();
        self.node = node.to_vec();
        self.derived_state = derived_state.to_vec();
        self.derived_state_length = derived_state_length.to_vec();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.site.clear();
        self.node.clear();
        self.derived_state.clear();
        self.derived_state_length.clear();
    }

    pub fn free(&mut self) {
        *self = MutationTable {
            site: Vec::new(),
            node: Vec::new(),
            derived_state: Vec::new(),
            derived_state_length: Vec::new(),
            growth: self.growth,
        };
    }

    pub fn equal(&self, other: &Self) -> bool {
        self.site == other.site
            && self.node == other.node
            && self.derived_state == other.derived_state
            && self.derived_state_length == other.derived_state_length
    }

    pub fn print_state(&self, sink: &mut dyn std::io::Write) -> std::io::Result<()> {
        writeln!(sink, "MutationTable: {} rows", self.num_rows())?;
        for row in self.iter() {
            writeln!(
                sink,
                "site={} node={} derived_state={:?}",
                row.site, row.node, row.derived_state
            )?;
        }
        Ok(())
    }

    fn row_at(&self, i: usize) -> MutationTableRow {
        MutationTableRow {
            site: self.site[i],
            node: self.node[i],
            derived_state: self.derived_state(i).to_vec(),
        }
    }

    pub fn row(&self, r: usize) -> Result<MutationTableRow, TskitError> {
        if r >= self.num_rows() {
            return Err(TskitError::OutOfBounds {
                reason: "mutation row index exceeds num_rows",
            });
        }
        Ok(self.row_at(r))
    }

    pub fn iter(&self) -> impl Iterator<Item = MutationTableRow> + '_ {
        (0..self.num_rows()).map(move |i| self.row_at(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_row_and_read_back() {
        let mut t = MutationTable::new(4, 16).unwrap();
        t.add_row(SiteId::from(0), NodeId::from(1), b"T").unwrap();
        assert_eq!(t.row(0).unwrap().derived_state, b"T");
    }
}
