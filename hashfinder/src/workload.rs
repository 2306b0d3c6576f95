//! Synthetic account-number -> phone-number workload used by the driver,
//! benches and integration tests. The tables never depend on it.

use std::ops::RangeInclusive;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const DEFAULT_COUNT: usize = 100_000;
pub const KEY_RANGE: RangeInclusive<i64> = 10_000..=999_999_999;
/// Below `KEY_RANGE`, so never present in a generated workload.
pub const MISS_KEY: i64 = 123;
const PHONE_DIGITS: usize = 11;

#[derive(Debug, Clone)]
pub struct Workload {
    pub seed: u64,
    pub pairs: Vec<(i64, String)>,
}

impl Workload {
    /// Generates `count` pairs. Keys are uniform over `KEY_RANGE` and may
    /// repeat; a repeated key exercises the update path.
    pub fn generate(count: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let pairs = (0..count)
            .map(|_| {
                let key = rng.gen_range(KEY_RANGE);
                (key, phone_number(&mut rng))
            })
            .collect();

        Self { seed, pairs }
    }

    /// Last generated key; present in any table loaded with this workload.
    pub fn hit_key(&self) -> Option<i64> {
        self.pairs.last().map(|(key, _)| *key)
    }

    pub fn keys(&self) -> impl Iterator<Item = i64> + '_ {
        self.pairs.iter().map(|(key, _)| *key)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Eleven digits, leading `1`.
fn phone_number(rng: &mut impl Rng) -> String {
    let mut phone = String::with_capacity(PHONE_DIGITS);
    phone.push('1');
    for _ in 1..PHONE_DIGITS {
        phone.push(char::from(b'0' + rng.gen_range(0..10u8)));
    }
    phone
}
