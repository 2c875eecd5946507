//! Fixed-length window counting over a 4-symbol (A, C, G, T) sequence.
//!
//! Symbols are encoded to 2-bit codes, each window of `L` codes is packed
//! into a u64 key by a rolling encoder, and keys are tallied in a fixed-size
//! chained hash table.

pub mod config;
pub mod error;
pub mod functions;
pub mod input;
pub mod utils;

pub use config::{Config, HashKind};
pub use error::{Error, Result};
pub use functions::hash_counter::{BucketHash, HashCounter, LowBits, TableStats, Xxh3};
pub use functions::kmer_counter::{KmerCounter, count_all, count_all_into};
pub use utils::rolling_encoder::{RollingKey, Window, WindowKeys, pack, unpack};
pub use utils::symbol_encoder::{EncodedSeq, decode_code, encode, encode_symbol};

/// Counts the windows of `corpus` and returns how often `query` occurs,
/// the window length being the query's encoded length. The query is checked
/// before the corpus is touched.
pub fn count_occurrences(corpus: &[u8], query: &[u8]) -> Result<u64> {
    let query = encode(query)?;
    let mut counter = KmerCounter::<LowBits>::new(&Config::with_window(query.len()))?;
    counter.count(&encode(corpus)?);
    Ok(counter.query_encoded(&query))
}
