//! The level-by-level walk external dumpers (Graphviz, Sapporo) both
//! need, kept in-core per §6 so neither collaborator has to re-derive
//! traversal order from a [`crate::table::NodeTable`] by hand.
//!
//! Both consumers need every node reachable from a set of roots,
//! visited exactly once, with dense integer ids. Sapporo additionally
//! requires that a node's id is already assigned by the time it is
//! referenced as someone else's child — i.e. ids must be assigned in
//! topological order. Since [`crate::table::NodeTable`] already
//! maintains "every branch points strictly below its own row" as an
//! invariant, walking rows in ascending order and assigning ids as
//! nodes are encountered satisfies that for free; [`Introspect`]
//! assigns ids this way rather than in the root-to-leaf (descending)
//! order a naive reading of the Graphviz requirement might suggest,
//! since a single shared walk has to satisfy both collaborators at
//! once and only the ascending order can.

use crate::node::NodeId;
use crate::table::NodeTable;

/// One node's record in an introspection walk: its assigned dense id,
/// the row/column it lives at in the table, and its branch targets
/// translated to dense ids (with terminals mapped to `0`/`1`).
#[derive(Clone, Debug)]
pub struct Record<const A: usize> {
    /// Dense id assigned to this node. `0` and `1` are reserved for
    /// the `ZERO`/`ONE` terminals and never assigned to a real node.
    pub id: u64,
    /// The row (level) this node lives at.
    pub level: u32,
    /// The column within `level`'s row.
    pub col: u64,
    /// This node's branches, as `(child_id, child_is_terminal)`.
    pub branches: [(u64, bool); A],
}

/// A finished introspection walk: every node reachable from the given
/// roots, each visited exactly once, in ascending-row (topological)
/// order.
pub struct Introspect<const A: usize> {
    records: std::vec::IntoIter<Record<A>>,
}

impl<const A: usize> Iterator for Introspect<A> {
    type Item = Record<A>;

    fn next(&mut self) -> Option<Record<A>> {
        self.records.next()
    }
}

const ZERO_ID: u64 = 0;
const ONE_ID: u64 = 1;

/// Walk every node reachable from `roots`, assigning dense ids in
/// ascending-row order so that every child's id is already assigned
/// by the time its parent is emitted.
pub fn introspect<const A: usize>(table: &NodeTable<A>, roots: &[NodeId]) -> Introspect<A> {
    let num_rows = table.num_rows();

    let mut reachable: Vec<Vec<bool>> = (0..num_rows)
        .map(|l| vec![false; table.row_size(l as u32)])
        .collect();

    let mut stack: Vec<NodeId> = roots.iter().copied().filter(|r| !r.is_terminal()).collect();
    while let Some(id) = stack.pop() {
        let (row, col) = (id.row() as usize, id.col() as usize);
        if reachable[row][col] {
            continue;
        }
        reachable[row][col] = true;
        let node = *table.get(id);
        for b in node.branch {
            if !b.is_terminal() {
                stack.push(b);
            }
        }
    }

    let mut dense_id: Vec<Vec<Option<u64>>> = (0..num_rows)
        .map(|l| vec![None; table.row_size(l as u32)])
        .collect();
    let mut next_id = ONE_ID + 1;
    for level in 1..num_rows {
        for (col, marked) in reachable[level].iter().enumerate() {
            if *marked {
                dense_id[level][col] = Some(next_id);
                next_id += 1;
            }
        }
    }

    let resolve = |id: NodeId| -> (u64, bool) {
        if id.is_zero() {
            (ZERO_ID, true)
        } else if id.is_one() {
            (ONE_ID, true)
        } else {
            let dense = dense_id[id.row() as usize][id.col() as usize]
                .expect("branch referenced a node unreachable from the introspected roots");
            (dense, false)
        }
    };

    let mut records = Vec::new();
    for level in 1..num_rows as u32 {
        let size = table.row_size(level);
        for col in 0..size as u64 {
            if !reachable[level as usize][col as usize] {
                continue;
            }
            let node = *table.get(NodeId::new(level, col));
            let id = dense_id[level as usize][col as usize].unwrap();
            let branches = std::array::from_fn(|k| resolve(node.branch[k]));
            records.push(Record { id, level, col, branches });
        }
    }

    Introspect { records: records.into_iter() }
}
