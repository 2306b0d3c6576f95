use serde::Serialize;

use crate::LookupTable;

/// Aggregate comparison cost of replaying a batch of searches against one
/// table. Comparable across table kinds because every table counts stored
/// entries examined.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonTrace {
    pub lookups: usize,
    pub hits: usize,
    pub misses: usize,
    pub hit_comparisons: usize,
    pub miss_comparisons: usize,
    pub max_comparisons: usize,
}

impl ComparisonTrace {
    pub fn record<T: LookupTable>(table: &T, keys: &[i64]) -> Self {
        let mut trace = Self::default();
        for &key in keys {
            trace.observe(table, key);
        }
        trace
    }

    pub fn observe<T: LookupTable>(&mut self, table: &T, key: i64) {
        let search = table.search(key);
        let comparisons = search.comparisons();
        if search.is_found() {
            self.hits += 1;
            self.hit_comparisons += comparisons;
        } else {
            self.misses += 1;
            self.miss_comparisons += comparisons;
        }
        self.lookups += 1;
        self.max_comparisons = self.max_comparisons.max(comparisons);
    }

    pub fn total_comparisons(&self) -> usize {
        self.hit_comparisons + self.miss_comparisons
    }

    pub fn mean_hit_comparisons(&self) -> f64 {
        mean(self.hit_comparisons, self.hits)
    }

    pub fn mean_miss_comparisons(&self) -> f64 {
        mean(self.miss_comparisons, self.misses)
    }
}

fn mean(total: usize, n: usize) -> f64 {
    if n == 0 { 0.0 } else { total as f64 / n as f64 }
}

#[cfg(test)]
mod tests {
    use super::ComparisonTrace;
    use crate::{ChainedTable, LookupTable, ProbingTable, TableConfig};

    #[test]
    fn empty_batch_is_zeroed() {
        let t = ChainedTable::new(TableConfig::new(3)).expect("build");
        let trace = ComparisonTrace::record(&t, &[]);
        assert_eq!(trace, ComparisonTrace::default());
        assert_eq!(trace.mean_hit_comparisons(), 0.0);
    }

    #[test]
    fn splits_hits_and_misses() {
        let mut t = ProbingTable::new(TableConfig::new(5)).expect("build");
        for k in [10, 15, 20] {
            t.insert(k, String::new()).expect("insert");
        }

        // Hits cost 1, 2, 3; miss 25 walks the run and stops at slot 3.
        let trace = ComparisonTrace::record(&t, &[10, 15, 20, 25, 4]);
        assert_eq!(trace.lookups, 5);
        assert_eq!(trace.hits, 3);
        assert_eq!(trace.misses, 2);
        assert_eq!(trace.hit_comparisons, 6);
        assert_eq!(trace.miss_comparisons, 3);
        assert_eq!(trace.max_comparisons, 3);
        assert_eq!(trace.total_comparisons(), 9);
        assert_eq!(trace.mean_hit_comparisons(), 2.0);
        assert_eq!(trace.mean_miss_comparisons(), 1.5);
    }

    #[test]
    fn chained_and_probing_agree_on_a_single_collision_run() {
        let keys = [7, 14, 21, 28];
        let mut probing = ProbingTable::new(TableConfig::new(7)).expect("build");
        let mut chained = ChainedTable::new(TableConfig::new(7)).expect("build");
        for k in keys {
            probing.insert(k, k.to_string()).expect("insert");
            chained.insert(k, k.to_string()).expect("insert");
        }

        assert_eq!(
            ComparisonTrace::record(&probing, &keys),
            ComparisonTrace::record(&chained, &keys)
        );
    }
}
