//! The site table: a genomic position plus an ancestral state.

use crate::growth::Growth;
use crate::{Position, TskitError};

/// Row of a [`SiteTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteTableRow {
    pub position: Position,
    pub ancestral_state: Vec<u8>,
}

fn payload_range(lengths: &[u32], row: usize) -> std::ops::Range<usize> {
    let start: usize = lengths[..row].iter().map(|&l| l as usize).sum();
    let end = start + lengths[row] as usize;
    start..end
}

/// Column-oriented, append-only table of sites.
///
/// Invariant: `position` is strictly increasing after [`crate::sort::sort_tables`].
pub struct SiteTable {
    position: Vec<Position>,
    ancestral_state: Vec<u8>,
    ancestral_state_length: Vec<u32>,
    growth: Growth,
}

impl SiteTable {
    pub fn new(row_increment: usize, payload_increment: usize) -> Result<Self, TskitError> {
        Ok(Self {
            position: Vec::new(),
            ancestral_state: Vec::new(),
            ancestral_state_length: Vec::new(),
            growth: Growth::new(row_increment, payload_increment)?,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.position.len()
    }

    pub fn position(&self, row: usize) -> Position {
        self.position[row]
    }

    pub fn ancestral_state(&self, row: usize) -> &[u8] {
        &self.ancestral_state[payload_range(&self.ancestral_state_length, row)]
    }

    pub fn add_row(
        &mut self,
        position: Position,
        ancestral_state: &[u8],
    ) -> Result<usize, TskitError> {
        self.growth.ensure_rows(self.num_rows() + 1);
        self.growth
            .ensure_payload(self.ancestral_state.len() + ancestral_state.len());
        self.growth.reserve_rows(&mut self.position);
        self.growth.reserve_rows(&mut self.ancestral_state_length);
        self.growth.reserve_payload(&mut self.ancestral_state);
        let row = self.num_rows();
        self.position.push(position);
        self.ancestral_state.extend_from_slice(ancestral_state);
        self.ancestral_state_length.push(ancestral_state.len() as u32);
        Ok(row)
    }

    pub fn set_columns(
        &mut self,
        position: &[Position],
        ancestral_state: &[u8],
        ancestral_state_length: &[u32],
    ) -> Result<(), TskitError> {
        let num_rows = position.len();
        if ancestral_state_length.len() != num_rows {
            return Err(TskitError::BadParam {
                reason: "site table set_columns: ancestral_state_length length mismatch",
            });
        }
        let expected: usize = ancestral_state_length.iter().map(|&l| l as usize).sum();
        if expected != ancestral_state.len() {
            return Err(TskitError::BadParam {
                reason: "site table set_columns: ancestral_state payload length mismatch",
            });
        }
        self.growth.ensure_rows(num_rows);
        self.growth.ensure_payload(ancestral_state.len());

        self.position = position.to_vec();
        self.ancestral_state = ancestral_state.to_vec();
        self.ancestral_state_length = ancestral_state_length.to_vec();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.position.clear();
        self.ancestral_state.clear();
        self.ancestral_state_length.clear();
    }

    pub fn free(&mut self) {
        *self = SiteTable {
            position: Vec::new(),
            ancestral_state: Vec::new(),
            ancestral_state_length: Vec::new(),
            growth: self.growth,
        };
    }

    pub fn equal(&self, other: &Self) -> bool {
        self.num_rows() == other.num_rows()
            && self.ancestral_state == other.ancestral_state
            && self.ancestral_state_length == other.ancestral_state_length
            && (0..self.num_rows()).all(|i| {
                crate::util::f64_partial_cmp_equal(
                    &self.position[i].into(),
                    &other.position[i].into(),
                )
            })
    }

    pub fn print_state(&self, sink: &mut dyn std::io::Write) -> std::io::Result<()> {
        writeln!(sink, "SiteTable: {} rows", self.num_rows())?;
        for row in self.iter() {
            writeln!(
                sink,
                "position={} ancestral_state={:?}",
                row.position, row.ancestral_state
            )?;
        }
        Ok(())
    }

    fn row_at(&self, i: usize) -> SiteTableRow {
        SiteTableRow {
            position: self.position[i],
            ancestral_state: self.ancestral_state(i).to_vec(),
        }
    }

    pub fn row(&self, r: usize) -> Result<SiteTableRow, TskitError> {
        if r >= self.num_rows() {
            return Err(TskitError::OutOfBounds {
                reason: "site row index exceeds num_rows",
            });
        }
        Ok(self.row_at(r))
    }

    pub fn iter(&self) -> impl Iterator<Item = SiteTableRow> + '_ {
        (0..self.num_rows()).map(move |i| self.row_at(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_row_and_read_back() {
        let mut t = SiteTable::new(4, 16).unwrap();
        t.add_row(Position::from(1.5), b"A").unwrap();
        t.add_row(Position::from(2.5), b"GG").unwrap();
        assert_eq!(t.row(0).unwrap().ancestral_state, b"A");
        assert_eq!(t.row(1).unwrap().ancestral_state, b"GG");
    }

    #[test]
    fn set_columns_rejects_payload_mismatch() {
        let mut t = SiteTable::new(4, 16).unwrap();
        let err = t
            .set_columns(&[Position::from(0.0)], b"AB", &[1])
            .unwrap_err();
        assert!(matches!(err, TskitError::BadParam { .. }));
    }
}
