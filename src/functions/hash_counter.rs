use std::marker::PhantomData;

use xxhash_rust::xxh3::xxh3_64;

use crate::config::HashKind;
use crate::error::{Error, Result};

pub const DEFAULT_TABLE_BITS: u32 = 18;
pub const MAX_TABLE_BITS: u32 = 28;

const NIL: usize = usize::MAX;

/// Maps a key to a bucket. `mask` is `table size - 1`.
pub trait BucketHash {
    const KIND: HashKind;

    fn bucket(key: u64, mask: u64) -> usize;
}

/// The key's low bits, i.e. `key mod size`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowBits;

impl BucketHash for LowBits {
    const KIND: HashKind = HashKind::LowBits;

    #[inline(always)]
    fn bucket(key: u64, mask: u64) -> usize {
        (key & mask) as usize
    }
}

/// xxh3 of the key. Spreads keys whose low bits are poorly distributed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xxh3;

impl BucketHash for Xxh3 {
    const KIND: HashKind = HashKind::Xxh3;

    #[inline(always)]
    fn bucket(key: u64, mask: u64) -> usize {
        (xxh3_64(&key.to_le_bytes()) & mask) as usize
    }
}

#[derive(Debug, Clone)]
struct Entry {
    key: u64,
    value: u64,
    next: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStats {
    pub buckets: usize,
    pub distinct: usize,
    pub total: u64,
    pub max_chain: usize,
    pub load_factor: f64,
}

/// Fixed-size chained hash table of counts.
///
/// Entries live in one arena and chains link them by index. The table never
/// resizes and entries are never removed, so an undersized table only makes
/// chains longer.
#[derive(Debug, Clone)]
pub struct HashCounter<H = LowBits> {
    buckets: Vec<usize>,
    entries: Vec<Entry>,
    mask: u64,
    total: u64,
    hasher: PhantomData<H>,
}

impl<H: BucketHash> HashCounter<H> {
    /// A table of `2^bits` empty buckets.
    pub fn with_bits(bits: u32) -> Result<Self> {
        if bits > MAX_TABLE_BITS {
            return Err(Error::TableTooLarge { bits, max: MAX_TABLE_BITS });
        }
        Ok(Self::sized(bits))
    }

    fn sized(bits: u32) -> Self {
        let size = 1usize << bits;
        Self {
            buckets: vec![NIL; size],
            entries: Vec::new(),
            mask: (size - 1) as u64,
            total: 0,
            hasher: PhantomData,
        }
    }

    /// Adds one to `key`'s count, inserting it with count 1 if unseen.
    /// One chain walk either way.
    #[inline]
    pub fn increment(&mut self, key: u64) {
        let bucket = H::bucket(key, self.mask);
        let mut idx = self.buckets[bucket];
        while idx != NIL {
            let entry = &mut self.entries[idx];
            if entry.key == key {
                entry.value += 1;
                self.total += 1;
                return;
            }
            idx = entry.next;
        }

        let head = self.entries.len();
        self.entries.push(Entry {
            key,
            value: 1,
            next: self.buckets[bucket],
        });
        self.buckets[bucket] = head;
        self.total += 1;
    }

    /// Count for `key`, 0 if it was never incremented.
    #[inline]
    pub fn get(&self, key: u64) -> u64 {
        self.chain(H::bucket(key, self.mask))
            .find(|e| e.key == key)
            .map_or(0, |e| e.value)
    }

    fn chain(&self, bucket: usize) -> impl Iterator<Item = &Entry> + '_ {
        let mut idx = self.buckets[bucket];
        std::iter::from_fn(move || {
            let entry = self.entries.get(idx)?;
            idx = entry.next;
            Some(entry)
        })
    }

    pub fn chain_len(&self, bucket: usize) -> usize {
        self.chain(bucket).count()
    }

    pub fn bucket_of(&self, key: u64) -> usize {
        H::bucket(key, self.mask)
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Distinct keys stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts, i.e. the number of increments.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// `(key, count)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.entries.iter().map(|e| (e.key, e.value))
    }

    pub fn stats(&self) -> TableStats {
        let max_chain = (0..self.buckets.len())
            .map(|b| self.chain_len(b))
            .max()
            .unwrap_or(0);
        TableStats {
            buckets: self.buckets.len(),
            distinct: self.entries.len(),
            total: self.total,
            max_chain,
            load_factor: self.entries.len() as f64 / self.buckets.len() as f64,
        }
    }
}

impl<H: BucketHash> Default for HashCounter<H> {
    fn default() -> Self {
        Self::sized(DEFAULT_TABLE_BITS)
    }
}
