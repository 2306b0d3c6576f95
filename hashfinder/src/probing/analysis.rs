use serde::Serialize;

use super::ProbingTable;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterStats {
    pub capacity: usize,
    pub occupied: usize,
    /// Maximal runs of occupied slots. A run crossing the last slot and
    /// continuing at slot 0 counts once.
    pub clusters: usize,
    pub longest_cluster: usize,
    /// Sum over all entries of the distance from home slot to actual slot.
    pub total_displacement: usize,
    pub max_displacement: usize,
}

impl ClusterStats {
    pub fn mean_cluster_len(&self) -> f64 {
        if self.clusters == 0 {
            0.0
        } else {
            self.occupied as f64 / self.clusters as f64
        }
    }

    /// Mean probe steps past the home slot for a successful search.
    pub fn mean_displacement(&self) -> f64 {
        if self.occupied == 0 {
            0.0
        } else {
            self.total_displacement as f64 / self.occupied as f64
        }
    }
}

impl ProbingTable {
    /// Static scan of the slot array: clustering and displacement.
    pub fn cluster_stats(&self) -> ClusterStats {
        let slots = self.slots();
        let capacity = slots.len();
        let mut stats = ClusterStats {
            capacity,
            ..ClusterStats::default()
        };

        for (idx, slot) in slots.iter().enumerate() {
            if let Some(entry) = slot {
                let home = self.home_slot(entry.key);
                let displacement = (idx + capacity - home) % capacity;
                stats.occupied += 1;
                stats.total_displacement += displacement;
                stats.max_displacement = stats.max_displacement.max(displacement);
            }
        }

        // Walk from an empty slot so a wrapping run is never split in two.
        let Some(start) = slots.iter().position(Option::is_none) else {
            if capacity > 0 {
                stats.clusters = 1;
                stats.longest_cluster = capacity;
            }
            return stats;
        };

        let mut run = 0usize;
        for offset in 1..=capacity {
            let idx = (start + offset) % capacity;
            if slots[idx].is_some() {
                run += 1;
            } else if run > 0 {
                stats.clusters += 1;
                stats.longest_cluster = stats.longest_cluster.max(run);
                run = 0;
            }
        }

        stats
    }
}
