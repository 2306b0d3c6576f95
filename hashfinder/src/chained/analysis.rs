use serde::Serialize;

use super::ChainedTable;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ChainStats {
    pub buckets: usize,
    pub entries: usize,
    pub empty_buckets: usize,
    pub longest_chain: usize,
    /// Histogram: `chain_lengths[n]` buckets hold exactly `n` entries.
    pub chain_lengths: Vec<usize>,
}

impl ChainStats {
    /// Mean length over buckets holding at least one entry. This is the
    /// expected miss cost for keys hashing to an occupied bucket.
    pub fn mean_nonempty_chain(&self) -> f64 {
        let nonempty = self.buckets - self.empty_buckets;
        if nonempty == 0 {
            0.0
        } else {
            self.entries as f64 / nonempty as f64
        }
    }
}

impl ChainedTable {
    pub fn chain_stats(&self) -> ChainStats {
        let mut stats = ChainStats {
            buckets: self.buckets().len(),
            ..ChainStats::default()
        };

        for chain in self.buckets() {
            let len = chain.len();
            if stats.chain_lengths.len() <= len {
                stats.chain_lengths.resize(len + 1, 0);
            }
            stats.chain_lengths[len] += 1;
            stats.entries += len;
            stats.longest_chain = stats.longest_chain.max(len);
            if len == 0 {
                stats.empty_buckets += 1;
            }
        }

        stats
    }
}
