//! Strongly-typed identifiers and measurement values.
//!
//! Mirrors the new-type pattern used throughout `tskit-rust`: row
//! identifiers are thin wrappers around a signed integer so that a
//! [`NodeId`] and a [`SiteId`] can't be accidentally swapped, while still
//! behaving like an integer at call sites (`Into`/`From`, comparisons with
//! bare integers, `Display`).

use crate::TskitError;

/// The raw representation backing every row-id new-type in this crate.
pub type RawId = i32;

macro_rules! impl_id_traits {
    ($idtype: ident) => {
        impl $idtype {
            /// The sentinel value denoting "missing"/"null"/"unspecified".
            /// All bits set, i.e. `-1` for a signed 32-bit representation.
            pub const NULL: Self = Self(-1);

            /// `true` if this id is the [`Self::NULL`] sentinel (or any
            /// other negative value).
            pub fn is_null(&self) -> bool {
                self.0 < 0
            }

            /// Convert to `usize`, for indexing into a `Vec`-backed column.
            ///
            /// Returns `None` for negative ids.
            pub fn to_usize(&self) -> Option<usize> {
                usize::try_from(self.0).ok()
            }
        }

        impl Default for $idtype {
            fn default() -> Self {
                Self::NULL
            }
        }

        impl From<RawId> for $idtype {
            fn from(value: RawId) -> Self {
                Self(value)
            }
        }

        impl From<&RawId> for $idtype {
            fn from(value: &RawId) -> Self {
                Self(*value)
            }
        }

        impl From<$idtype> for RawId {
            fn from(value: $idtype) -> Self {
                value.0
            }
        }

        impl From<&$idtype> for RawId {
            fn from(value: &$idtype) -> Self {
                value.0
            }
        }

        impl From<usize> for $idtype {
            fn from(value: usize) -> Self {
                Self(value as RawId)
            }
        }

        impl TryFrom<$idtype> for usize {
            type Error = TskitError;

            fn try_from(value: $idtype) -> Result<Self, Self::Error> {
                usize::try_from(value.0).map_err(|_| TskitError::OutOfBounds {
                    reason: concat!(stringify!($idtype), " is negative"),
                })
            }
        }

        impl TryFrom<&$idtype> for usize {
            type Error = TskitError;

            fn try_from(value: &$idtype) -> Result<Self, Self::Error> {
                usize::try_from(*value)
            }
        }

        impl PartialEq<RawId> for $idtype {
            fn eq(&self, other: &RawId) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$idtype> for RawId {
            fn eq(&self, other: &$idtype) -> bool {
                *self == other.0
            }
        }

        impl PartialOrd<RawId> for $idtype {
            fn partial_cmp(&self, other: &RawId) -> Option<std::cmp::Ordering> {
                self.0.partial_cmp(other)
            }
        }

        impl PartialOrd<$idtype> for RawId {
            fn partial_cmp(&self, other: &$idtype) -> Option<std::cmp::Ordering> {
                self.partial_cmp(&other.0)
            }
        }

        impl std::fmt::Display for $idtype {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if self.is_null() {
                    write!(f, "NULL")
                } else {
                    write!(f, "{}", self.0)
                }
            }
        }
    };
}

/// A node ID: an integer referring to a row of a [`crate::NodeTable`].
///
/// Negative values (conventionally [`NodeId::NULL`]) denote "no node".
///
/// # Examples
///
/// ```
/// use tskit_simplify::NodeId;
///
/// assert_eq!(NodeId::default(), NodeId::NULL);
/// let y: NodeId = NodeId::from(1);
/// assert_eq!(y, 1);
/// assert_eq!(1, y);
/// assert!(y < 2);
/// assert!(2 > y);
/// assert_eq!(format!("{}", NodeId::from(11)), "11");
/// assert_eq!(format!("{}", NodeId::NULL), "NULL");
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(RawId);
impl_id_traits!(NodeId);

/// A site ID: an integer referring to a row of a [`crate::SiteTable`].
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SiteId(RawId);
impl_id_traits!(SiteId);

/// A mutation ID: an integer referring to a row of a
/// [`crate::MutationTable`].
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MutationId(RawId);
impl_id_traits!(MutationId);

/// A migration ID: an integer referring to a row of a
/// [`crate::MigrationTable`].
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MigrationId(RawId);
impl_id_traits!(MigrationId);

/// A population ID: an integer referring to a population.
///
/// The sentinel [`PopulationId::NULL`] (all bits set) denotes
/// "unspecified"; this is the default a [`crate::NodeTable::set_columns`]
/// call fills in when the `population` column is absent.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PopulationId(RawId);
impl_id_traits!(PopulationId);

macro_rules! impl_f64_newtype {
    ($t: ident) => {
        impl From<f64> for $t {
            fn from(value: f64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for f64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl PartialEq<f64> for $t {
            fn eq(&self, other: &f64) -> bool {
                self.0 == *other
            }
        }

        impl PartialOrd<f64> for $t {
            fn partial_cmp(&self, other: &f64) -> Option<std::cmp::Ordering> {
                self.0.partial_cmp(other)
            }
        }

        impl std::fmt::Display for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Add for $t {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl std::ops::Sub for $t {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }
    };
}

/// A genomic coordinate: either end of a half-open `[left, right)`
/// interval. Wraps [`f64`].
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Position(f64);
impl_f64_newtype!(Position);

/// A point in time (in the past, larger is older by convention). Wraps
/// [`f64`].
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Time(f64);
impl_f64_newtype!(Time);
