//! Level-indexed storage of fixed-arity node records.

use crate::arena::ChunkedVec;
use crate::error::{DdError, Result};
use crate::node::{Node, NodeId, MAX_ROW};

/// Rows of fixed-arity [`Node`]s, one row per level, row 0 reserved
/// for the two terminals.
///
/// Every node at row `i` MUST have every branch pointing at a row
/// strictly below `i`; this is the topological order the builder,
/// reducer, and evaluators all rely on and is checked with
/// `debug_assert!` at the points nodes are inserted, since a
/// violation is always a spec-contract bug, never a recoverable
/// runtime condition.
pub struct NodeTable<const A: usize> {
    rows: Vec<ChunkedVec<Node<A>>>,
    /// Reference count per row: how many live handles (façade roots,
    /// or nodes at higher rows) still refer into this row or above.
    ref_counts: Vec<u32>,
}

impl<const A: usize> NodeTable<A> {
    /// An empty table holding only the terminal row.
    pub fn new() -> Self {
        NodeTable {
            rows: vec![ChunkedVec::new()],
            ref_counts: vec![1],
        }
    }

    /// Ensure rows exist up to and including `level`.
    pub fn ensure_row(&mut self, level: u32) -> Result<()> {
        if level > MAX_ROW {
            return Err(DdError::RowOverflow {
                row: level as u64,
                max: MAX_ROW,
            });
        }
        let level = level as usize;
        while self.rows.len() <= level {
            self.rows.push(ChunkedVec::new());
            self.ref_counts.push(0);
        }
        Ok(())
    }

    /// Number of rows currently allocated, including row 0.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Append `node` to row `level`, returning the resulting
    /// `NodeId`. The caller is responsible for having already
    /// deduplicated via the unique hasher; this always creates a new
    /// entry.
    pub fn push(&mut self, level: u32, node: Node<A>) -> Result<NodeId> {
        debug_assert!(
            node.branch.iter().all(|b| b.row() < level || b.is_terminal()),
            "node at level {level} has a branch that does not point strictly lower"
        );
        self.ensure_row(level)?;
        let col = self.rows[level as usize].push(node) as u64;
        Ok(NodeId::new(level, col))
    }

    /// Borrow the node at `id`. Panics on the terminal rows; callers
    /// MUST check `id.is_terminal()` first.
    pub fn get(&self, id: NodeId) -> &Node<A> {
        debug_assert!(!id.is_terminal(), "terminals have no node record");
        &self.rows[id.row() as usize][id.col() as usize]
    }

    /// Mutably borrow the node at `id`.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<A> {
        debug_assert!(!id.is_terminal(), "terminals have no node record");
        &mut self.rows[id.row() as usize][id.col() as usize]
    }

    /// Number of live nodes at `level`.
    pub fn row_size(&self, level: u32) -> usize {
        self.rows
            .get(level as usize)
            .map(|r| r.len())
            .unwrap_or(0)
    }

    /// Iterate over `(col, &Node)` pairs at `level`.
    pub fn row_iter(&self, level: u32) -> impl Iterator<Item = (u64, &Node<A>)> {
        self.rows[level as usize]
            .iter()
            .enumerate()
            .map(|(i, n)| (i as u64, n))
    }

    /// Increment the reference count guarding row `level` and every
    /// row above it.
    pub fn incref(&mut self, level: u32) {
        if let Some(c) = self.ref_counts.get_mut(level as usize) {
            *c += 1;
        }
    }

    /// Decrement the reference count guarding row `level`.
    pub fn decref(&mut self, level: u32) {
        if let Some(c) = self.ref_counts.get_mut(level as usize) {
            debug_assert!(*c > 0, "decref below zero at level {level}");
            *c -= 1;
        }
    }

    /// True if row `level` has no outstanding references and may be
    /// discarded by [`Self::deref_level`].
    pub fn is_releasable(&self, level: u32) -> bool {
        self.ref_counts.get(level as usize).copied().unwrap_or(0) == 0
    }

    /// Discard row `level`'s contents. The caller must have already
    /// confirmed [`Self::is_releasable`].
    pub fn deref_level(&mut self, level: u32) {
        if let Some(row) = self.rows.get_mut(level as usize) {
            row.clear();
        }
    }

    /// Replace the contents of row `level` wholesale, used by the
    /// reducer and sweeper after compacting or canonicalizing a row.
    pub fn replace_row(&mut self, level: u32, nodes: Vec<Node<A>>) {
        let mut chunked = ChunkedVec::new();
        for n in nodes {
            chunked.push(n);
        }
        if (level as usize) < self.rows.len() {
            self.rows[level as usize] = chunked;
        }
    }
}

impl<const A: usize> Default for NodeTable<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_get_round_trip() {
        let mut t: NodeTable<2> = NodeTable::new();
        let n = Node {
            branch: [NodeId::ZERO, NodeId::ONE],
        };
        let id = t.push(1, n).unwrap();
        assert_eq!(id.row(), 1);
        assert_eq!(*t.get(id), n);
    }

    #[test]
    fn ref_counting_gates_release() {
        let mut t: NodeTable<2> = NodeTable::new();
        t.ensure_row(3).unwrap();
        t.incref(3);
        assert!(!t.is_releasable(3));
        t.decref(3);
        assert!(t.is_releasable(3));
    }
}
