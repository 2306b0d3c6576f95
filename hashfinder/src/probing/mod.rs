//! Open addressing with linear probing over a fixed slot array.
//! An empty slot terminates every probe sequence; there is no deletion and
//! therefore no tombstone state.

pub mod analysis;

use crate::{BuildError, Entry, InsertError, Insertion, LookupTable, Search, TableConfig, bucket_index};

/// Wrapping probe sequence starting at a key's home slot. Yields each slot
/// index at most once, so any scan driven by it is bounded by the capacity.
#[derive(Debug, Clone)]
pub struct ProbeSeq {
    pos: usize,
    capacity: usize,
    remaining: usize,
}

impl ProbeSeq {
    #[inline]
    pub fn new(home: usize, capacity: usize) -> Self {
        debug_assert!(home < capacity);
        Self {
            pos: home,
            capacity,
            remaining: capacity,
        }
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let pos = self.pos;
        self.pos += 1;
        if self.pos == self.capacity {
            self.pos = 0;
        }
        Some(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSeq {}

#[derive(Debug, Clone)]
pub struct ProbingTable {
    pub config: TableConfig,
    slots: Vec<Option<Entry>>,
    len: usize,
}

impl ProbingTable {
    pub fn new(config: TableConfig) -> Result<Self, BuildError> {
        config.validate()?;
        log::debug!("probing table: allocating {} slots", config.capacity);

        Ok(Self {
            config,
            slots: vec![None; config.capacity],
            len: 0,
        })
    }

    #[inline]
    pub fn home_slot(&self, key: i64) -> usize {
        bucket_index(key, self.slots.len())
    }

    pub fn probe_seq(&self, key: i64) -> ProbeSeq {
        ProbeSeq::new(self.home_slot(key), self.slots.len())
    }

    /// Raw slot view, `None` for empty slots.
    pub fn slots(&self) -> &[Option<Entry>] {
        &self.slots
    }
}

impl LookupTable for ProbingTable {
    type EntryIter<'a> = std::iter::Flatten<std::slice::Iter<'a, Option<Entry>>>;

    fn insert(&mut self, key: i64, value: String) -> Result<Insertion, InsertError> {
        for idx in self.probe_seq(key) {
            let slot = &mut self.slots[idx];
            match slot {
                None => {
                    *slot = Some(Entry::new(key, value));
                    self.len += 1;
                    return Ok(Insertion::Inserted);
                }
                Some(entry) if entry.key == key => {
                    log::trace!("probing table: key {key} updated in slot {idx}");
                    entry.value = value;
                    return Ok(Insertion::Updated);
                }
                Some(_) => {}
            }
        }

        log::debug!(
            "probing table: rejected key {key}, all {} slots occupied",
            self.slots.len()
        );
        Err(InsertError::CapacityExceeded {
            capacity: self.slots.len(),
        })
    }

    fn search(&self, key: i64) -> Search<'_> {
        let mut comparisons = 0usize;
        for idx in self.probe_seq(key) {
            let Some(entry) = &self.slots[idx] else {
                return Search::NotFound { comparisons };
            };
            comparisons += 1;
            if entry.key == key {
                return Search::Found {
                    value: &entry.value,
                    comparisons,
                };
            }
        }

        // Wrapped the whole table without meeting an empty slot.
        Search::NotFound { comparisons }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn iter(&self) -> Self::EntryIter<'_> {
        self.slots.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::{ProbeSeq, ProbingTable};
    use crate::{BuildError, InsertError, Insertion, LookupTable, Search, TableConfig};

    fn table(capacity: usize) -> ProbingTable {
        ProbingTable::new(TableConfig::new(capacity)).expect("build")
    }

    #[test]
    fn rejects_zero_capacity() {
        let t = ProbingTable::new(TableConfig::new(0));
        assert!(matches!(t, Err(BuildError::ZeroCapacity)));
    }

    #[test]
    fn slots_start_empty() {
        let t = table(11);
        assert_eq!(t.slots().len(), 11);
        assert!(t.slots().iter().all(Option::is_none));
        assert_eq!(t.len(), 0);
    }

    #[test]
    fn probe_seq_wraps_and_visits_each_slot_once() {
        let seq: Vec<usize> = ProbeSeq::new(3, 5).collect();
        assert_eq!(seq, vec![3, 4, 0, 1, 2]);
        assert_eq!(ProbeSeq::new(0, 1).collect::<Vec<_>>(), vec![0]);
        assert_eq!(ProbeSeq::new(2, 4).len(), 4);
    }

    #[test]
    fn insert_then_search_round_trips() {
        let mut t = table(13);
        assert_eq!(t.insert(42, "answer".to_string()), Ok(Insertion::Inserted));
        let found = t.search(42);
        assert_eq!(found.value(), Some("answer"));
        assert!(found.comparisons() >= 1);
    }

    #[test]
    fn colliding_keys_occupy_consecutive_slots() {
        let mut t = table(5);
        for (k, v) in [(10, "a"), (15, "b"), (20, "c")] {
            t.insert(k, v.to_string()).expect("insert");
        }

        let keys: Vec<Option<i64>> = t.slots().iter().map(|s| s.as_ref().map(|e| e.key)).collect();
        assert_eq!(keys, vec![Some(10), Some(15), Some(20), None, None]);
        assert_eq!(
            t.search(10),
            Search::Found {
                value: "a",
                comparisons: 1
            }
        );
        assert_eq!(
            t.search(20),
            Search::Found {
                value: "c",
                comparisons: 3
            }
        );
    }

    #[test]
    fn probe_wraps_past_the_last_slot() {
        let mut t = table(5);
        t.insert(4, "a".to_string()).expect("insert");
        t.insert(9, "b".to_string()).expect("insert");
        assert_eq!(t.slots()[0].as_ref().map(|e| e.key), Some(9));
        assert_eq!(
            t.search(9),
            Search::Found {
                value: "b",
                comparisons: 2
            }
        );
    }

    #[test]
    fn duplicate_insert_updates_in_place() {
        let mut t = table(7);
        assert_eq!(t.insert(3, "first".to_string()), Ok(Insertion::Inserted));
        assert_eq!(t.insert(3, "second".to_string()), Ok(Insertion::Updated));
        assert_eq!(t.len(), 1);
        assert_eq!(t.iter().filter(|e| e.key == 3).count(), 1);
        assert_eq!(t.get(3), Some("second"));
    }

    #[test]
    fn miss_stops_at_first_empty_slot() {
        let mut t = table(7);
        t.insert(0, "a".to_string()).expect("insert");
        t.insert(7, "b".to_string()).expect("insert");
        // Home slot 0, walks over 0 and 7, stops at the empty slot 2.
        assert_eq!(t.search(14), Search::NotFound { comparisons: 2 });
        // Home slot 5 is empty.
        assert_eq!(t.search(5), Search::NotFound { comparisons: 0 });
    }

    #[test]
    fn full_table_rejects_new_keys_without_mutation() {
        let mut t = table(4);
        for k in 0..4 {
            t.insert(k, format!("v{k}")).expect("insert");
        }
        let before = t.slots().to_vec();

        assert_eq!(
            t.insert(100, "overflow".to_string()),
            Err(InsertError::CapacityExceeded { capacity: 4 })
        );
        assert_eq!(t.slots(), before.as_slice());
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn full_table_still_accepts_updates() {
        let mut t = table(3);
        for k in 0..3 {
            t.insert(k, "old".to_string()).expect("insert");
        }
        assert_eq!(t.insert(2, "new".to_string()), Ok(Insertion::Updated));
        assert_eq!(t.get(2), Some("new"));
    }

    #[test]
    fn full_table_miss_costs_exactly_capacity() {
        let mut t = table(6);
        for k in 0..6 {
            t.insert(k * 6, format!("v{k}")).expect("insert");
        }
        assert_eq!(t.search(-1), Search::NotFound { comparisons: 6 });
        assert_eq!(t.search(1_000_003), Search::NotFound { comparisons: 6 });
    }

    #[test]
    fn negative_keys_probe_from_normalized_home() {
        let mut t = table(5);
        t.insert(-1, "neg".to_string()).expect("insert");
        assert_eq!(t.home_slot(-1), 4);
        assert_eq!(t.slots()[4].as_ref().map(|e| e.key), Some(-1));
        assert_eq!(t.get(-1), Some("neg"));
    }

    #[test]
    fn comparisons_never_exceed_capacity() {
        let capacity = 31;
        let mut t = table(capacity);
        let mut inserted = Vec::new();
        for i in 0..capacity as i64 {
            let key = i.wrapping_mul(0x9e37_79b9) % 10_007;
            if t.insert(key, i.to_string()).is_ok() {
                inserted.push(key);
            }
        }
        for &key in &inserted {
            let s = t.search(key);
            assert!(s.is_found());
            assert!(s.comparisons() <= capacity);
        }
        for miss in 20_000..20_100 {
            assert!(t.search(miss).comparisons() <= capacity);
        }
    }
}
