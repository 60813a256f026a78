//! The edgeset table: parent -> children over a genomic interval.

use crate::growth::Growth;
use crate::{NodeId, Position, TskitError};

/// Row of an [`EdgesetTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgesetTableRow {
    pub left: Position,
    pub right: Position,
    pub parent: NodeId,
    pub children: Vec<NodeId>,
}

fn payload_range(lengths: &[u16], row: usize) -> std::ops::Range<usize> {
    let start: usize = lengths[..row].iter().map(|&l| l as usize).sum();
    let end = start + lengths[row] as usize;
    start..end
}

/// Column-oriented, append-only table of edgesets.
///
/// Invariant on every row: `left < right` and `children_length >= 1`.
pub struct EdgesetTable {
    left: Vec<Position>,
    right: Vec<Position>,
    parent: Vec<NodeId>,
    children: Vec<NodeId>,
    children_length: Vec<u16>,
    growth: Growth,
}

impl EdgesetTable {
    pub fn new(row_increment: usize, payload_increment: usize) -> Result<Self, TskitError> {
        Ok(Self {
            left: Vec::new(),
            right: Vec::new(),
            parent: Vec::new(),
            children: Vec::new(),
            children_length: Vec::new(),
            growth: Growth::new(row_increment, payload_increment)?,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.left.len()
    }

    pub fn left(&self, row: usize) -> Position {
        self.left[row]
    }

    pub fn right(&self, row: usize) -> Position {
        self.right[row]
    }

    pub fn parent(&self, row: usize) -> NodeId {
        self.parent[row]
    }

    pub fn children(&self, row: usize) -> &[NodeId] {
        &self.children[payload_range(&self.children_length, row)]
    }

    /// Append one row. Fails with [`TskitError::BadParam`] if `children`
    /// is empty or `left >= right`.
    pub fn add_row(
        &mut self,
        left: Position,
        right: Position,
        parent: NodeId,
        children: &[NodeId],
    ) -> Result<usize, TskitError> {
        if !(left < right) {
            return Err(TskitError::BadParam {
                reason: "edgeset left must be strictly less than right",
            });
        }
        if children.is_empty() {
            return Err(TskitError::BadParam {
                reason: "edgeset children list must be non-empty",
            });
        }
        self.growth.ensure_rows(self.num_rows() + 1);
        self.growth
            .ensure_payload(self.children.len() + children.len());
        self.growth.reserve_rows(&mut self.left);
        self.growth.reserve_rows(&mut self.right);
        self.growth.reserve_rows(&mut self.parent);
        self.growth.reserve_rows(&mut self.children_length);
        self.growth.reserve_payload(&mut self.children);
        let row = self.num_rows();
        self.left.push(left);
        self.right.push(right);
        self.parent.push(parent);
        self.children.extend_from_slice(children);
        self.children_length.push(children.len() as u16);
        Ok(row)
    }

    /// Bulk-replace all columns.
    pub fn set_columns(
        &mut self,
        left: &[Position],
        right: &[Position],
        parent: &[NodeId],
        children: &[NodeId],
        children_length: &[u16],
    ) -> Result<(), TskitError> {
        let num_rows = left.len();
        if right.len() != num_rows || parent.len() != num_rows || children_length.len() != num_rows
        {
            return Err(TskitError::BadParam {
                reason: "edgeset table set_columns: column length mismatch",
            });
        }
        let expected_payload: usize = children_length.iter().map(|&l| l as usize).sum();
        if expected_payload != children.len() {
            return Err(TskitError::BadParam {
                reason: "edgeset table set_columns: children payload length mismatch",
            });
        }
        self.growth.ensure_rows(num_rows);
        self.growth.ensure_payload(children.len());

        self.left = left.to_vec();
        self.right = right.to_vec();
        self.parent = parent.to_vec();
        self.children = children.to_vec();
        self.children_length = children_length.to_vec();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
        self.parent.clear();
        self.children.clear();
        self.children_length.clear();
    }

    pub fn free(&mut self) {
        *self = EdgesetTable {
            left: Vec::new(),
            right: Vec::new(),
            parent: Vec::new(),
            children: Vec::new(),
            children_length: Vec::new(),
            growth: self.growth,
        };
    }

    pub fn equal(&self, other: &Self) -> bool {
        self.num_rows() == other.num_rows()
            && self.parent == other.parent
            && self.children == other.children
            && self.children_length == other.children_length
            && (0..self.num_rows()).all(|i| {
                crate::util::f64_partial_cmp_equal(&self.left[i].into(), &other.left[i].into())
                    && crate::util::f64_partial_cmp_equal(
                        &self.right[i].into(),
                        &other.right[i].into(),
                    )
            })
    }

    pub fn print_state(&self, sink: &mut dyn std::io::Write) -> std::io::Result<()> {
        writeln!(sink, "EdgesetTable: {} rows", self.num_rows())?;
        for row in self.iter() {
            writeln!(
                sink,
                "left={} right={} parent={} children={:?}",
                row.left, row.right, row.parent, row.children
            )?;
        }
        Ok(())
    }

    fn row_at(&self, i: usize) -> EdgesetTableRow {
        EdgesetTableRow {
            left: self.left[i],
            right: self.right[i],
            parent: self.parent[i],
            children: self.children(i).to_vec(),
        }
    }

    pub fn row(&self, r: usize) -> Result<EdgesetTableRow, TskitError> {
        if r >= self.num_rows() {
            return Err(TskitError::OutOfBounds {
                reason: "edgeset row index exceeds num_rows",
            });
        }
        Ok(self.row_at(r))
    }

    pub fn iter(&self) -> impl Iterator<Item = EdgesetTableRow> + '_ {
        (0..self.num_rows()).map(move |i| self.row_at(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_row_rejects_empty_children() {
        let mut t = EdgesetTable::new(4, 16).unwrap();
        let err = t
            .add_row(Position::from(0.0), Position::from(1.0), NodeId::from(0), &[])
            .unwrap_err();
        assert!(matches!(err, TskitError::BadParam { .. }));
    }

    #[test]
    fn add_row_rejects_non_increasing_interval() {
        let mut t = EdgesetTable::new(4, 16).unwrap();
        let err = t
            .add_row(
                Position::from(1.0),
                Position::from(1.0),
                NodeId::from(0),
                &[NodeId::from(1)],
            )
            .unwrap_err();
        assert!(matches!(err, TskitError::BadParam { .. }));
    }

    #[test]
    fn variable_length_children_round_trip() {
        let mut t = EdgesetTable::new(2, 4).unwrap();
        t.add_row(
            Position::from(0.0),
            Position::from(1.0),
            NodeId::from(2),
            &[NodeId::from(0), NodeId::from(1)],
        )
        .unwrap();
        t.add_row(
            Position::from(1.0),
            Position::from(2.0),
            NodeId::from(3),
            &[NodeId::from(0)],
        )
        .unwrap();
        assert_eq!(t.row(0).unwrap().children, vec![NodeId::from(0), NodeId::from(1)]);
        assert_eq!(t.row(1).unwrap().children, vec![NodeId::from(0)]);
    }
}
