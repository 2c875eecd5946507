use log::{Level, debug, info, log_enabled, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::functions::hash_counter::{BucketHash, HashCounter, LowBits};
use crate::utils::rolling_encoder::{Window, WindowKeys, pack, unpack};
use crate::utils::symbol_encoder::{EncodedSeq, encode};

/// Average chain length above which the table is reported as undersized.
const CROWDED_LOAD: f64 = 4.0;

/// Counts every window of `seq` into a default-sized table.
pub fn count_all(seq: &EncodedSeq, window: Window) -> HashCounter<LowBits> {
    let mut table = HashCounter::default();
    count_all_into(seq, window, &mut table);
    table
}

/// Feeds each window key of `seq` to `table` exactly once, left to right.
/// Fewer symbols than the window length means no windows and no increments.
pub fn count_all_into<H: BucketHash>(seq: &EncodedSeq, window: Window, table: &mut HashCounter<H>) {
    let keys = WindowKeys::new(seq.codes(), window);
    debug!(
        "scanning {} symbols, {} windows of {}",
        seq.len(),
        keys.len(),
        window.len()
    );
    for key in keys {
        table.increment(key);
    }
}

/// A window length bound to the table its windows are counted into.
#[derive(Debug, Clone)]
pub struct KmerCounter<H = LowBits> {
    window: Window,
    table: HashCounter<H>,
}

impl<H: BucketHash> KmerCounter<H> {
    /// Fails if the window or table size is out of range, or if `config.hash`
    /// names a different bucket function than `H`.
    pub fn new(config: &Config) -> Result<Self> {
        let window = config.validate()?;
        if config.hash != H::KIND {
            return Err(Error::HashMismatch {
                configured: config.hash,
                table: H::KIND,
            });
        }
        let table = HashCounter::with_bits(config.table_bits)?;
        Ok(Self { window, table })
    }

    /// Counts every window of `seq`. May be called again to add more sequence;
    /// windows never span two calls.
    pub fn count(&mut self, seq: &EncodedSeq) {
        count_all_into(seq, self.window, &mut self.table);

        // stats() walks every bucket
        if log_enabled!(Level::Info) {
            let stats = self.table.stats();
            info!(
                "{} windows, {} distinct, longest chain {}, load {:.2}",
                stats.total, stats.distinct, stats.max_chain, stats.load_factor
            );
        }
        let (distinct, buckets) = (self.table.len(), self.table.capacity());
        if distinct as f64 / buckets as f64 > CROWDED_LOAD {
            warn!("table of {buckets} buckets holds {distinct} keys, consider more table bits");
        }
    }

    /// Occurrences of `query`, encoded the same way as the corpus.
    /// A query of a different length than the window never occurs.
    pub fn query(&self, query: &[u8]) -> Result<u64> {
        Ok(self.query_encoded(&encode(query)?))
    }

    pub fn query_encoded(&self, query: &EncodedSeq) -> u64 {
        if query.len() != self.window.len() {
            return 0;
        }
        self.table.get(pack(query.codes()))
    }

    /// The `n` most frequent windows as `(symbols, count)`, ties broken by key.
    pub fn top(&self, n: usize) -> Vec<(Vec<u8>, u64)> {
        let mut entries: Vec<(u64, u64)> = self.table.iter().collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
            .into_iter()
            .take(n)
            .map(|(key, count)| (unpack(key, self.window), count))
            .collect()
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn table(&self) -> &HashCounter<H> {
        &self.table
    }

    pub fn into_table(self) -> HashCounter<H> {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HashKind;
    use crate::functions::hash_counter::Xxh3;

    fn key_of(symbols: &[u8]) -> u64 {
        pack(encode(symbols).unwrap().codes())
    }

    #[test]
    fn repeated_symbol() {
        let seq = encode(b"AAAA").unwrap();
        let table = count_all(&seq, Window::new(2).unwrap());
        assert_eq!(table.get(key_of(b"AA")), 3);
        assert_eq!(table.get(key_of(b"GG")), 0);
        assert_eq!(table.len(), 1);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn shorter_than_window() {
        let seq = encode(b"ACG").unwrap();
        let table = count_all(&seq, Window::new(5).unwrap());
        assert!(table.is_empty());
        assert_eq!(table.get(key_of(b"ACGAA")), 0);
        assert_eq!(table.get(0), 0);
    }

    #[test]
    fn exact_window_length_is_one_window() {
        let seq = encode(b"ACGTA").unwrap();
        let table = count_all(&seq, Window::new(5).unwrap());
        assert_eq!(table.total(), 1);
        assert_eq!(table.get(key_of(b"ACGTA")), 1);
    }

    #[test]
    fn query_through_counter() {
        let config = Config { table_bits: 8, ..Config::with_window(3) };
        let mut counter = KmerCounter::<LowBits>::new(&config).unwrap();
        counter.count(&encode(b"ACGACGACG\nACG").unwrap());

        assert_eq!(counter.query(b"ACG").unwrap(), 4);
        assert_eq!(counter.query(b"acg").unwrap(), 4);
        assert_eq!(counter.query(b"CGA").unwrap(), 3);
        assert_eq!(counter.query(b"TTT").unwrap(), 0);
        assert_eq!(counter.query(b"AC").unwrap(), 0);
        assert!(matches!(
            counter.query(b"ANG"),
            Err(Error::InvalidSymbol { byte: b'N', position: 1 })
        ));
    }

    #[test]
    fn xxh3_counter_agrees() {
        let config = Config::with_window(4);
        let seq = encode(b"GATTACAGATTACAGATTACA").unwrap();
        let mut low = KmerCounter::<LowBits>::new(&config).unwrap();
        let xxh3 = Config { hash: HashKind::Xxh3, ..config };
        let mut xxh = KmerCounter::<Xxh3>::new(&xxh3).unwrap();
        low.count(&seq);
        xxh.count(&seq);
        for (key, count) in low.table().iter() {
            assert_eq!(xxh.table().get(key), count);
        }
        assert_eq!(xxh.table().len(), low.table().len());
    }

    #[test]
    fn hash_kind_must_match_table() {
        let xxh3 = Config { hash: HashKind::Xxh3, ..Config::with_window(4) };
        assert!(matches!(
            KmerCounter::<LowBits>::new(&xxh3),
            Err(Error::HashMismatch { configured: HashKind::Xxh3, table: HashKind::LowBits })
        ));
        assert!(matches!(
            KmerCounter::<Xxh3>::new(&Config::with_window(4)),
            Err(Error::HashMismatch { configured: HashKind::LowBits, table: HashKind::Xxh3 })
        ));
        let counter = KmerCounter::<Xxh3>::new(&xxh3).unwrap();
        assert_eq!(counter.table().bucket_of(1 << 20), Xxh3::bucket(1 << 20, (1 << 18) - 1));
    }

    #[test]
    fn framing_in_query_is_dropped() {
        let query = encode(b"ACG\n").unwrap();
        let mut counter = KmerCounter::<LowBits>::new(&Config::with_window(query.len())).unwrap();
        counter.count(&encode(b"ACGACGACG").unwrap());
        assert_eq!(counter.query_encoded(&query), 3);
        assert_eq!(counter.query(b"ACG\r\n").unwrap(), 3);
    }

    #[test]
    fn top_windows() {
        let mut counter = KmerCounter::<LowBits>::new(&Config::with_window(2)).unwrap();
        counter.count(&encode(b"AAAACCG").unwrap());
        let top = counter.top(2);
        assert_eq!(top, vec![(b"AA".to_vec(), 3), (b"AC".to_vec(), 1)]);
    }

    #[test]
    fn invalid_config_fails_before_scanning() {
        assert!(KmerCounter::<LowBits>::new(&Config::with_window(0)).is_err());
        assert!(KmerCounter::<LowBits>::new(&Config::with_window(33)).is_err());
    }
}
