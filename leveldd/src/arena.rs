//! Growing storage with two different stability contracts, used for
//! the two very different things this framework allocates:
//!
//! - [`ChunkedVec`] backs each row of the [`crate::table::NodeTable`].
//!   Appending a node to a row must never invalidate a `NodeId`
//!   already handed out pointing into that row. Rather than reach for
//!   raw pointers into a single growable buffer (the approach the
//!   original frontier-search implementation takes), each row is a
//!   sequence of fixed-capacity chunks: a chunk's backing allocation
//!   never moves once created, because we never push past the
//!   capacity it was created with.
//! - [`LevelArenas`] is the §4.1 per-level pool primitive made
//!   available to spec implementations that want scratch allocation
//!   bulk-freed alongside a level (e.g. a spec building a temporary
//!   adjacency scan while expanding one row). The builder's own
//!   frontier scheduling does not need it: a `Spec::State` here is an
//!   owned, `Clone`-able Rust value, so the builder just holds
//!   `Vec<(State, Slot)>` per level and lets `Drop` reclaim it, rather
//!   than threading every state through a hand-rolled intrusive pool
//!   the way the pointer-based original design requires.

const CHUNK_SIZE: usize = 1024;

/// A pointer-stable, append-only vector built from fixed-capacity
/// chunks.
///
/// Unlike `Vec<T>`, growing a `ChunkedVec` never reallocates existing
/// elements: once an element is pushed, its index is valid for the
/// lifetime of the `ChunkedVec`, and `&`/`&mut` borrows of distinct
/// elements can be taken without the whole structure being borrowed
/// mutably (via [`ChunkedVec::get`]/[`ChunkedVec::get_mut`] on
/// disjoint indices through raw slicing of `chunks`).
#[derive(Debug)]
pub struct ChunkedVec<T> {
    chunks: Vec<Vec<T>>,
    len: usize,
}

impl<T> ChunkedVec<T> {
    /// An empty chunked vector.
    pub fn new() -> Self {
        ChunkedVec {
            chunks: Vec::new(),
            len: 0,
        }
    }

    /// Number of elements pushed so far.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no element has been pushed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append `value`, returning its stable index.
    pub fn push(&mut self, value: T) -> usize {
        if self.chunks.is_empty() || self.chunks.last().unwrap().len() == CHUNK_SIZE {
            self.chunks.push(Vec::with_capacity(CHUNK_SIZE));
        }
        let chunk = self.chunks.last_mut().unwrap();
        chunk.push(value);
        let idx = self.len;
        self.len += 1;
        idx
    }

    /// Borrow the element at `idx`.
    pub fn get(&self, idx: usize) -> &T {
        &self.chunks[idx / CHUNK_SIZE][idx % CHUNK_SIZE]
    }

    /// Mutably borrow the element at `idx`.
    pub fn get_mut(&mut self, idx: usize) -> &mut T {
        &mut self.chunks[idx / CHUNK_SIZE][idx % CHUNK_SIZE]
    }

    /// Iterate over elements in push order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.chunks.iter().flat_map(|c| c.iter())
    }

    /// Iterate mutably over elements in push order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.chunks.iter_mut().flat_map(|c| c.iter_mut())
    }

    /// Discard every element, keeping allocated chunk capacity for
    /// reuse.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.len = 0;
    }
}

impl<T> Default for ChunkedVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::ops::Index<usize> for ChunkedVec<T> {
    type Output = T;
    fn index(&self, idx: usize) -> &T {
        self.get(idx)
    }
}

impl<T> std::ops::IndexMut<usize> for ChunkedVec<T> {
    fn index_mut(&mut self, idx: usize) -> &mut T {
        self.get_mut(idx)
    }
}

/// Per-level `bumpalo::Bump` pools, indexed by level.
///
/// A level's pool is created lazily on first use and `reset` (which
/// keeps the backing chunk for reuse rather than releasing it to the
/// allocator) once the builder finishes constructing that level.
pub struct LevelArenas {
    pools: Vec<bumpalo::Bump>,
}

impl LevelArenas {
    /// An arena set with no pools yet allocated.
    pub fn new() -> Self {
        LevelArenas { pools: Vec::new() }
    }

    fn ensure(&mut self, level: u32) {
        let level = level as usize;
        if self.pools.len() <= level {
            self.pools.resize_with(level + 1, bumpalo::Bump::new);
        }
    }

    /// Borrow the pool for `level`, creating it if this is the first
    /// use.
    pub fn pool(&mut self, level: u32) -> &bumpalo::Bump {
        self.ensure(level);
        &self.pools[level as usize]
    }

    /// Release every allocation made in `level`'s pool, keeping its
    /// backing chunk(s) for reuse by the next level that reaches this
    /// index.
    pub fn clear(&mut self, level: u32) {
        let level = level as usize;
        if let Some(pool) = self.pools.get_mut(level) {
            pool.reset();
        }
    }
}

impl Default for LevelArenas {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunked_vec_preserves_indices_across_growth() {
        let mut v: ChunkedVec<u32> = ChunkedVec::new();
        let mut indices = Vec::new();
        for i in 0..(CHUNK_SIZE * 3 + 7) as u32 {
            indices.push(v.push(i));
        }
        for (i, idx) in indices.iter().enumerate() {
            assert_eq!(*v.get(*idx), i as u32);
        }
        assert_eq!(v.len(), indices.len());
    }

    #[test]
    fn level_arena_alloc_and_reset() {
        let mut arenas = LevelArenas::new();
        {
            let pool = arenas.pool(3);
            let x: &i32 = pool.alloc(42);
            assert_eq!(*x, 42);
        }
        arenas.clear(3);
        let pool = arenas.pool(3);
        let y: &i32 = pool.alloc(7);
        assert_eq!(*y, 7);
    }
}
