use serde::Serialize;
use thiserror::Error;

pub mod chained;
pub mod logger;
pub mod probing;
pub mod trace;
pub mod workload;

pub use chained::ChainedTable;
pub use probing::ProbingTable;

/// Plain modulo hash shared by every table so that comparison counts measured
/// on the same workload isolate the collision discipline, not the hash.
///
/// Uses the Euclidean remainder, so negative keys still land in
/// `[0, capacity)`. Panics when `capacity` is zero, like `%`.
#[inline]
pub fn bucket_index(key: i64, capacity: usize) -> usize {
    assert!(capacity > 0, "bucket_index called with zero capacity");
    (key as i128).rem_euclid(capacity as i128) as usize
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: i64,
    pub value: String,
}

impl Entry {
    pub fn new(key: i64, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// Outcome of a successful insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The key was absent and claimed a new slot or chain position.
    Inserted,
    /// The key was present; its value was overwritten in place.
    Updated,
}

/// Outcome of a search. A miss is a normal result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Search<'a> {
    Found { value: &'a str, comparisons: usize },
    NotFound { comparisons: usize },
}

impl<'a> Search<'a> {
    /// Stored entries examined before the search resolved.
    pub fn comparisons(&self) -> usize {
        match *self {
            Search::Found { comparisons, .. } | Search::NotFound { comparisons } => comparisons,
        }
    }

    pub fn value(&self) -> Option<&'a str> {
        match *self {
            Search::Found { value, .. } => Some(value),
            Search::NotFound { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Search::Found { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InsertError {
    /// Every slot was visited without finding an empty one or the key.
    /// The table is left unmodified.
    #[error("table is full: all {capacity} slots are occupied")]
    CapacityExceeded { capacity: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("table capacity must be positive")]
    ZeroCapacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableConfig {
    /// Slot count (probing) or bucket count (chaining). Fixed for the
    /// lifetime of the table.
    pub capacity: usize,
}

impl TableConfig {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    fn validate(&self) -> Result<(), BuildError> {
        if self.capacity == 0 {
            return Err(BuildError::ZeroCapacity);
        }
        Ok(())
    }
}

pub trait LookupTable {
    type EntryIter<'a>: Iterator<Item = &'a Entry>
    where
        Self: 'a;

    /// Inserts `key`, or overwrites its value if already present.
    fn insert(&mut self, key: i64, value: String) -> Result<Insertion, InsertError>;
    fn search(&self, key: i64) -> Search<'_>;
    /// Number of distinct keys stored.
    fn len(&self) -> usize;
    fn capacity(&self) -> usize;
    /// Iterates stored entries in storage order.
    fn iter(&self) -> Self::EntryIter<'_>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, key: i64) -> bool {
        self.search(key).is_found()
    }

    fn get(&self, key: i64) -> Option<&str> {
        self.search(key).value()
    }

    fn load_factor(&self) -> f64 {
        let capacity = self.capacity();
        if capacity == 0 {
            0.0
        } else {
            self.len() as f64 / capacity as f64
        }
    }
}
