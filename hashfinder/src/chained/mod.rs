//! Separate chaining: one append-ordered overflow list per bucket.

pub mod analysis;

use crate::{BuildError, Entry, InsertError, Insertion, LookupTable, Search, TableConfig, bucket_index};

#[derive(Debug, Clone)]
pub struct ChainedTable {
    pub config: TableConfig,
    buckets: Vec<Vec<Entry>>,
    len: usize,
}

impl ChainedTable {
    pub fn new(config: TableConfig) -> Result<Self, BuildError> {
        config.validate()?;
        log::debug!("chained table: allocating {} buckets", config.capacity);

        Ok(Self {
            config,
            buckets: vec![Vec::new(); config.capacity],
            len: 0,
        })
    }

    #[inline]
    pub fn bucket_of(&self, key: i64) -> usize {
        bucket_index(key, self.buckets.len())
    }

    /// Entries of one bucket in insertion order.
    pub fn bucket(&self, bucket: usize) -> &[Entry] {
        &self.buckets[bucket]
    }

    pub fn buckets(&self) -> &[Vec<Entry>] {
        &self.buckets
    }
}

impl LookupTable for ChainedTable {
    type EntryIter<'a> = std::iter::Flatten<std::slice::Iter<'a, Vec<Entry>>>;

    /// Never fails: chains grow without bound.
    fn insert(&mut self, key: i64, value: String) -> Result<Insertion, InsertError> {
        let b = self.bucket_of(key);
        let chain = &mut self.buckets[b];

        if let Some(entry) = chain.iter_mut().find(|e| e.key == key) {
            log::trace!("chained table: key {key} updated in bucket {b}");
            entry.value = value;
            return Ok(Insertion::Updated);
        }

        chain.push(Entry::new(key, value));
        self.len += 1;
        Ok(Insertion::Inserted)
    }

    fn search(&self, key: i64) -> Search<'_> {
        let chain = &self.buckets[self.bucket_of(key)];
        for (i, entry) in chain.iter().enumerate() {
            if entry.key == key {
                return Search::Found {
                    value: &entry.value,
                    comparisons: i + 1,
                };
            }
        }

        Search::NotFound {
            comparisons: chain.len(),
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn iter(&self) -> Self::EntryIter<'_> {
        self.buckets.iter().flatten()
    }
}
