//! Bottom-up canonicalization: QDD (merge-only), BDD, and ZDD
//! reduction, with a multi-root rewrite pass.

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::node::{Node, NodeId};
use crate::table::NodeTable;

/// Which short-circuit rule, if any, collapses a node into one of its
/// own children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReduceMode {
    /// Merge identical branch tuples; never delete a node.
    Qdd,
    /// QDD, plus: a node whose branches are all equal is replaced by
    /// that child.
    Bdd,
    /// QDD, plus: a node whose non-zero-value branches are all
    /// `ZERO` is replaced by branch 0.
    Zdd,
}

/// Canonicalize `table` in place under `mode`, then rewrite every
/// entry of `roots` to its canonical image.
///
/// Rows are processed ascending (lowest level first) since a row's
/// collapse and dedup decisions only ever need the already-finalized
/// canonical map of strictly lower rows — the topological invariant
/// [`crate::table::NodeTable`] maintains.
pub fn reduce<const A: usize>(
    table: &mut NodeTable<A>,
    roots: &mut [NodeId],
    mode: ReduceMode,
) -> Result<()> {
    let mut canon: FxHashMap<NodeId, NodeId> = FxHashMap::default();
    canon.insert(NodeId::ZERO, NodeId::ZERO);
    canon.insert(NodeId::ONE, NodeId::ONE);

    let num_rows = table.num_rows();
    for level in 1..num_rows as u32 {
        let row_size = table.row_size(level);
        if row_size == 0 {
            continue;
        }

        let mut rewritten: Vec<Node<A>> = Vec::with_capacity(row_size);
        for col in 0..row_size as u64 {
            let mut node = *table.get(NodeId::new(level, col));
            for b in node.branch.iter_mut() {
                if let Some(&canonical) = canon.get(b) {
                    *b = canonical;
                }
            }
            rewritten.push(node);
        }

        let mut new_row: Vec<Node<A>> = Vec::new();
        let mut by_branches: FxHashMap<[NodeId; A], u64> = FxHashMap::default();

        for (col, node) in rewritten.into_iter().enumerate() {
            let old_id = NodeId::new(level, col as u64);

            let collapse_to = match mode {
                ReduceMode::Qdd => None,
                ReduceMode::Bdd if node.all_branches_equal() => Some(node.branch[0]),
                ReduceMode::Zdd if node.only_branch_zero_nonzero() => Some(node.branch[0]),
                _ => None,
            };

            if let Some(target) = collapse_to {
                canon.insert(old_id, target);
                continue;
            }

            if let Some(&existing_col) = by_branches.get(&node.branch) {
                canon.insert(old_id, NodeId::new(level, existing_col));
            } else {
                let new_col = new_row.len() as u64;
                by_branches.insert(node.branch, new_col);
                new_row.push(node);
                canon.insert(old_id, NodeId::new(level, new_col));
            }
        }

        table.replace_row(level, new_row);
    }

    for root in roots.iter_mut() {
        if let Some(&canonical) = canon.get(root) {
            *root = canonical;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::progress::NullProgress;
    use crate::spec::{Spec, Transition};

    /// `x1 AND x2`, a three-variable spec where `x3` is irrelevant,
    /// deliberately producing duplicate-branch nodes for the BDD rule
    /// to collapse.
    struct AndIgnoreThird;

    impl Spec for AndIgnoreThird {
        const ARITY: usize = 2;
        type State = u8; // bitmask of x1,x2 seen-as-1 so far

        fn get_root(&self) -> Transition<u8> {
            Transition::Continue(0, 3)
        }

        fn get_child(&self, state: &mut u8, level: u32, value: usize) -> Transition<()> {
            if level == 3 {
                // x3 is irrelevant: both branches continue with the
                // same state.
                let _ = value;
                return Transition::Continue((), 2);
            }
            if level == 2 {
                if value == 1 {
                    *state |= 0b10;
                }
                return Transition::Continue((), 1);
            }
            // level == 1, deciding x1
            let mut final_state = *state;
            if value == 1 {
                final_state |= 0b01;
            }
            if final_state == 0b11 {
                Transition::True
            } else {
                Transition::False
            }
        }

        fn hash_code(&self, state: &u8, _level: u32) -> u64 {
            *state as u64
        }

        fn equal_to(&self, a: &u8, b: &u8, _level: u32) -> bool {
            a == b
        }
    }

    #[test]
    fn bdd_reduction_collapses_the_irrelevant_variable() {
        let mut spec = AndIgnoreThird;
        let mut progress = NullProgress;
        let mut dag = build::<2, _>(&mut spec, &mut progress).unwrap();
        reduce(&mut dag.table, &mut dag.roots, ReduceMode::Bdd).unwrap();
        // Level 3 (x3) must have fully collapsed away: no nodes
        // remain at that row after BDD reduction.
        assert_eq!(dag.table.row_size(3), 0);
    }

    #[test]
    fn reduction_is_idempotent() {
        let mut spec = AndIgnoreThird;
        let mut progress = NullProgress;
        let mut dag = build::<2, _>(&mut spec, &mut progress).unwrap();
        reduce(&mut dag.table, &mut dag.roots, ReduceMode::Bdd).unwrap();
        let first_pass_row1 = dag.table.row_size(1);
        let first_pass_root = dag.roots[0];
        reduce(&mut dag.table, &mut dag.roots, ReduceMode::Bdd).unwrap();
        assert_eq!(dag.table.row_size(1), first_pass_row1);
        assert_eq!(dag.roots[0], first_pass_root);
    }
}
