//! Additive (non-geometric) capacity growth for table columns.
//!
//! Mirrors the arena's chunked growth discipline (see [`crate::arena`]) but
//! applied to plain `Vec`-backed columns: capacity is bumped by a
//! client-supplied increment, never doubled, so that a caller who picks a
//! large initial increment gets predictable, bounded reallocation behavior
//! rather than the amortized-doubling growth `Vec` uses on its own.

use crate::TskitError;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Growth {
    row_increment: usize,
    payload_increment: usize,
    row_capacity: usize,
    payload_capacity: usize,
}

impl Growth {
    pub(crate) fn new(row_increment: usize, payload_increment: usize) -> Result<Self, TskitError> {
        if row_increment == 0 || payload_increment == 0 {
            return Err(TskitError::BadParam {
                reason: "growth increments must be nonzero",
            });
        }
        Ok(Self {
            row_increment,
            payload_increment,
            row_capacity: 0,
            payload_capacity: 0,
        })
    }

    /// Ensure room for at least `needed` rows, growing by whole
    /// increments.
    pub(crate) fn ensure_rows(&mut self, needed: usize) {
        while self.row_capacity < needed {
            self.row_capacity += self.row_increment;
        }
    }

    /// Ensure room for at least `needed` payload elements, growing by
    /// whole increments.
    pub(crate) fn ensure_payload(&mut self, needed: usize) {
        while self.payload_capacity < needed {
            self.payload_capacity += self.payload_increment;
        }
    }

    #[cfg(test)]
    pub(crate) fn row_capacity(&self) -> usize {
        self.row_capacity
    }

    #[cfg(test)]
    pub(crate) fn payload_capacity(&self) -> usize {
        self.payload_capacity
    }

    /// Reserve `vec` up to the tracked row capacity, if it isn't already
    /// there. Keeps a column's actual backing allocation in step with the
    /// additive growth schedule instead of `Vec`'s own amortized doubling.
    pub(crate) fn reserve_rows<T>(&self, vec: &mut Vec<T>) {
        if vec.capacity() < self.row_capacity {
            vec.reserve_exact(self.row_capacity - vec.capacity());
        }
    }

    /// Same as [`Growth::reserve_rows`], for a payload buffer.
    pub(crate) fn reserve_payload<T>(&self, vec: &mut Vec<T>) {
        if vec.capacity() < self.payload_capacity {
            vec.reserve_exact(self.payload_capacity - vec.capacity());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_by_whole_increments() {
        let mut g = Growth::new(10, 100).unwrap();
        g.ensure_rows(3);
        assert_eq!(g.row_capacity(), 10);
        g.ensure_rows(25);
        assert_eq!(g.row_capacity(), 30);
        g.ensure_payload(150);
        assert_eq!(g.payload_capacity(), 200);
    }

    #[test]
    fn zero_increment_is_bad_param() {
        assert!(Growth::new(0, 10).is_err());
        assert!(Growth::new(10, 0).is_err());
    }
}
