//! Domain identifier types with validation
//!
//! Newtype wrappers keep bibliographic record ids and org unit ids from being
//! mixed up at query boundaries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Bibliographic record identifier
///
/// Always positive. Ids of zero or below denote deleted or placeholder
/// bibliographic rows and are never exported.
///
/// # Examples
///
/// ```
/// use catalog_export::domain::ids::RecordId;
///
/// let id = RecordId::new(42).unwrap();
/// assert_eq!(id.get(), 42);
/// assert!(RecordId::new(-1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RecordId(i64);

impl RecordId {
    /// Creates a new RecordId, rejecting non-positive values
    pub fn new(id: i64) -> Result<Self, String> {
        if id <= 0 {
            return Err(format!("Record ID must be positive, got {id}"));
        }
        Ok(Self(id))
    }

    /// Returns the raw identifier
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s
            .trim()
            .parse()
            .map_err(|e| format!("Invalid record ID '{s}': {e}"))?;
        Self::new(raw)
    }
}

impl TryFrom<i64> for RecordId {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for i64 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

/// Organization unit identifier
///
/// Identifies a library branch or system whose holdings count toward an
/// organization's export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct OrgUnitId(i32);

impl OrgUnitId {
    /// Creates a new OrgUnitId, rejecting non-positive values
    pub fn new(id: i32) -> Result<Self, String> {
        if id <= 0 {
            return Err(format!("Org unit ID must be positive, got {id}"));
        }
        Ok(Self(id))
    }

    /// Returns the raw identifier
    pub fn get(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for OrgUnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for OrgUnitId {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrgUnitId> for i32 {
    fn from(id: OrgUnitId) -> Self {
        id.0
    }
}

/// Ordered set of record identifiers (ascending, unique)
///
/// Built from raw query output: duplicates collapse and ids of zero or below
/// are dropped.
///
/// ```
/// use catalog_export::domain::ids::RecordIdSet;
///
/// let set = RecordIdSet::from_raw([5, 5, 12, 3, 0, -7]);
/// let ids: Vec<i64> = set.iter().map(|id| id.get()).collect();
/// assert_eq!(ids, vec![3, 5, 12]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordIdSet(BTreeSet<RecordId>);

impl RecordIdSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Builds a set from raw database identifiers
    pub fn from_raw(raw: impl IntoIterator<Item = i64>) -> Self {
        Self(
            raw.into_iter()
                .filter_map(|id| RecordId::new(id).ok())
                .collect(),
        )
    }

    /// Adds an identifier; returns false if it was already present
    pub fn insert(&mut self, id: RecordId) -> bool {
        self.0.insert(id)
    }

    /// Returns true if the identifier is in the set
    pub fn contains(&self, id: &RecordId) -> bool {
        self.0.contains(id)
    }

    /// Number of identifiers
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set has no identifiers
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates identifiers in ascending order
    pub fn iter(&self) -> impl Iterator<Item = &RecordId> + '_ {
        self.0.iter()
    }

    /// Removes every identifier that also appears in `other`, returning how
    /// many were removed.
    pub fn subtract(&mut self, other: &RecordIdSet) -> usize {
        let before = self.0.len();
        self.0.retain(|id| !other.contains(id));
        before - self.0.len()
    }

    /// Returns true if the two sets share no identifier
    pub fn is_disjoint(&self, other: &RecordIdSet) -> bool {
        self.0.is_disjoint(&other.0)
    }

    /// Raw identifiers in ascending order, as bound into SQL array parameters
    pub fn to_raw(&self) -> Vec<i64> {
        self.0.iter().map(RecordId::get).collect()
    }
}

impl FromIterator<RecordId> for RecordIdSet {
    fn from_iter<I: IntoIterator<Item = RecordId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RecordIdSet {
    type Item = &'a RecordId;
    type IntoIter = std::collections::btree_set::Iter<'a, RecordId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
