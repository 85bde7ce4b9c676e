//! A deduplication table whose hash and equality are supplied
//! externally rather than implemented by the keys themselves.
//!
//! Both the builder (deduplicating spec states) and the reducer
//! (deduplicating branch tuples) need "is this key equivalent to one
//! I've already seen, under a comparison that depends on which level
//! I'm at" — the level-parameterized hash/equality a client spec
//! supplies. This mirrors the reference corpus's `ctxhash.rs`, where a
//! `CtxHash`/`CtxEq` pair supplied externally (the "context") drives
//! a table whose keys carry no `Hash`/`Eq` impl of their own.
//!
//! `ctxhash.rs` reaches for `hashbrown::raw::RawTable` directly, which
//! requires `unsafe` at the call site to manage uninitialized
//! buckets. This crate denies `unsafe_code`, so [`UniqueTable`] instead
//! buckets candidates by their externally supplied hash in a plain
//! `hashbrown::HashMap<u64, SmallVec<[K; 4]>>` and does the final
//! disambiguation with a linear scan under the externally supplied
//! equality — the same externally-hashed shape, at the cost of one
//! extra indirection per bucket instead of raw-table bucket control.

use hashbrown::HashMap;
use smallvec::SmallVec;

/// A source of level-parameterized hash and equality for keys of type
/// `K`. The builder implements this over spec states; the reducer
/// implements it over node branch-tuples.
pub trait UniqueKeyed<K> {
    /// Hash of the key at `level`.
    fn hash_at(&self, key: K, level: u32) -> u64;

    /// Whether `a` and `b` are equivalent at `level`.
    fn eq_at(&self, a: K, b: K, level: u32) -> bool;
}

/// An externally-hashed deduplication table.
///
/// `intern` either returns the first-seen representative equivalent
/// to `key`, or registers `key` itself as a new representative.
pub struct UniqueTable<K> {
    buckets: HashMap<u64, SmallVec<[K; 4]>>,
}

impl<K: Copy> UniqueTable<K> {
    /// A table with no entries.
    pub fn new() -> Self {
        UniqueTable {
            buckets: HashMap::new(),
        }
    }

    /// A table pre-sized for roughly `capacity` distinct keys.
    pub fn with_capacity(capacity: usize) -> Self {
        UniqueTable {
            buckets: HashMap::with_capacity(capacity),
        }
    }

    /// Number of distinct representatives registered so far.
    pub fn len(&self) -> usize {
        self.buckets.values().map(|b| b.len()).sum()
    }

    /// True if no key has been interned.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Intern `key` at `level` using `src` for hash/equality.
    ///
    /// Returns the representative: either `key` itself (first time
    /// this equivalence class is seen) or a previously interned key
    /// equivalent to it.
    pub fn intern(&mut self, key: K, level: u32, src: &impl UniqueKeyed<K>) -> K {
        let hash = src.hash_at(key, level);
        let bucket = self.buckets.entry(hash).or_insert_with(SmallVec::new);
        for &existing in bucket.iter() {
            if src.eq_at(existing, key, level) {
                return existing;
            }
        }
        bucket.push(key);
        key
    }

    /// Drop every entry, e.g. between levels.
    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}

impl<K: Copy> Default for UniqueTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Mod3;

    impl UniqueKeyed<u32> for Mod3 {
        fn hash_at(&self, key: u32, _level: u32) -> u64 {
            (key % 3) as u64
        }

        fn eq_at(&self, a: u32, b: u32, _level: u32) -> bool {
            a % 3 == b % 3
        }
    }

    #[test]
    fn equivalent_keys_collapse_to_first_seen() {
        let mut table = UniqueTable::new();
        let src = Mod3;
        let r0 = table.intern(0, 1, &src);
        let r3 = table.intern(3, 1, &src);
        let r1 = table.intern(1, 1, &src);
        assert_eq!(r0, 0);
        assert_eq!(r3, 0);
        assert_eq!(r1, 1);
        assert_eq!(table.len(), 2);
    }
}
