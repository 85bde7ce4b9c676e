//! BDD↔ZDD conversion over a fixed variable count `n`, the operation
//! the testable-properties round-trip (§8) exercises.
//!
//! Both directions walk a source diagram top-down with memoization,
//! re-inserting the levels the source's reduction rule let it skip:
//!
//! - `zdd_to_bdd`: wherever the ZDD skipped a level (its zero-
//!   suppression rule let an all-excluded chain of variables vanish),
//!   the equivalent BDD needs an explicit node whose `1`-branch is the
//!   false terminal (choosing that variable is never in any
//!   represented set) and whose `0`-branch continues one level down.
//! - `bdd_to_zdd`: wherever the BDD skipped a level (its "all branches
//!   equal" rule let an irrelevant variable vanish), the equivalent
//!   ZDD needs an explicit node whose two branches are both the
//!   (converted) child, since the ZDD rule only ever collapses on
//!   "high branch is the false terminal", never on "both branches
//!   equal".
//!
//! Neither direction reduces its output; callers chain [`crate::reduce::reduce`]
//! afterwards, matching §8's stated round-trip
//! (`bdd_reduce . zdd_to_bdd . bdd_to_zdd . bdd_reduce`).

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::node::{Node, NodeId};
use crate::table::NodeTable;

/// Emits nodes into a fresh table, hash-consing by `(level,
/// branch-tuple)` so structurally identical nodes introduced by
/// different source paths collapse immediately rather than waiting
/// for a later [`crate::reduce::reduce`] pass.
struct Builder<const A: usize> {
    table: NodeTable<A>,
    by_branches: FxHashMap<(u32, [NodeId; A]), NodeId>,
}

impl<const A: usize> Builder<A> {
    fn new() -> Self {
        Builder { table: NodeTable::new(), by_branches: FxHashMap::default() }
    }

    fn intern(&mut self, level: u32, branch: [NodeId; A]) -> Result<NodeId> {
        if let Some(&existing) = self.by_branches.get(&(level, branch)) {
            return Ok(existing);
        }
        let id = self.table.push(level, Node { branch })?;
        self.by_branches.insert((level, branch), id);
        Ok(id)
    }
}

/// Convert a ZDD node `root` (over a diagram whose top level is `n`)
/// into the equivalent BDD over the same `n` variables.
pub fn zdd_to_bdd<const A: usize>(
    table: &NodeTable<A>,
    root: NodeId,
    n: u32,
) -> Result<(NodeTable<A>, NodeId)> {
    debug_assert_eq!(A, 2, "zero-suppression conversion assumes binary branching");
    let mut builder = Builder::new();
    let mut memo: FxHashMap<(NodeId, u32), NodeId> = FxHashMap::default();
    let result = convert_zdd_node(table, &mut builder, &mut memo, root, n)?;
    Ok((builder.table, result))
}

fn convert_zdd_node<const A: usize>(
    source: &NodeTable<A>,
    builder: &mut Builder<A>,
    memo: &mut FxHashMap<(NodeId, u32), NodeId>,
    id: NodeId,
    level: u32,
) -> Result<NodeId> {
    if level == 0 {
        return Ok(id);
    }
    if let Some(&cached) = memo.get(&(id, level)) {
        return Ok(cached);
    }

    let result = if !id.is_terminal() && id.row() == level {
        let node = *source.get(id);
        let low = convert_zdd_node(source, builder, memo, node.branch[0], level - 1)?;
        let high = convert_zdd_node(source, builder, memo, node.branch[1], level - 1)?;
        let mut branch = [NodeId::ZERO; A];
        branch[0] = low;
        branch[1] = high;
        builder.intern(level, branch)?
    } else {
        // The ZDD skipped this level: the variable never appears on
        // this path, so choosing it (branch 1) is always false.
        let low = convert_zdd_node(source, builder, memo, id, level - 1)?;
        let mut branch = [NodeId::ZERO; A];
        branch[0] = low;
        branch[1] = NodeId::ZERO;
        builder.intern(level, branch)?
    };

    memo.insert((id, level), result);
    Ok(result)
}

/// Convert a BDD node `root` (over `n` variables) into the equivalent
/// ZDD, unreduced (callers run [`crate::reduce::reduce`] with
/// [`crate::reduce::ReduceMode::Zdd`] afterwards).
pub fn bdd_to_zdd<const A: usize>(
    table: &NodeTable<A>,
    root: NodeId,
    n: u32,
) -> Result<(NodeTable<A>, NodeId)> {
    debug_assert_eq!(A, 2, "zero-suppression conversion assumes binary branching");
    let mut builder = Builder::new();
    let mut memo: FxHashMap<(NodeId, u32), NodeId> = FxHashMap::default();
    let result = convert_bdd_node(table, &mut builder, &mut memo, root, n)?;
    Ok((builder.table, result))
}

fn convert_bdd_node<const A: usize>(
    source: &NodeTable<A>,
    builder: &mut Builder<A>,
    memo: &mut FxHashMap<(NodeId, u32), NodeId>,
    id: NodeId,
    level: u32,
) -> Result<NodeId> {
    if level == 0 {
        return Ok(id);
    }
    if let Some(&cached) = memo.get(&(id, level)) {
        return Ok(cached);
    }

    let result = if !id.is_terminal() && id.row() == level {
        let node = *source.get(id);
        let low = convert_bdd_node(source, builder, memo, node.branch[0], level - 1)?;
        let high = convert_bdd_node(source, builder, memo, node.branch[1], level - 1)?;
        let mut branch = [NodeId::ZERO; A];
        branch[0] = low;
        branch[1] = high;
        builder.intern(level, branch)?
    } else {
        // The BDD skipped this level: the variable was irrelevant, so
        // both branches of the inserted ZDD node lead to the same
        // (converted) child — left unreduced, since ZDD reduction
        // never merges on "both branches equal", only on "high is
        // zero".
        let child = convert_bdd_node(source, builder, memo, id, level - 1)?;
        let mut branch = [NodeId::ZERO; A];
        branch[0] = child;
        branch[1] = child;
        builder.intern(level, branch)?
    };

    memo.insert((id, level), result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::eval::{evaluate, Cardinality, CardinalityDomain};
    use crate::progress::NullProgress;
    use crate::reduce::{reduce, ReduceMode};
    use crate::specs::combination::Combination;

    #[test]
    fn zdd_to_bdd_preserves_cardinality() {
        let mut progress = NullProgress;
        let mut spec = Combination::new(5, 2);
        let mut dag = build::<2, _>(&mut spec, &mut progress).unwrap();
        reduce(&mut dag.table, &mut dag.roots, ReduceMode::Zdd).unwrap();

        let mut set_count: Cardinality<u64> = Cardinality::new(CardinalityDomain::SetCount);
        let expected = evaluate(&dag.table, dag.roots[0], &mut set_count);

        let (mut bdd_table, bdd_root) = zdd_to_bdd(&dag.table, dag.roots[0], 5).unwrap();
        let mut roots = vec![bdd_root];
        reduce(&mut bdd_table, &mut roots, ReduceMode::Bdd).unwrap();

        let mut assignment_count: Cardinality<u64> =
            Cardinality::new(CardinalityDomain::AssignmentCount);
        assert_eq!(evaluate(&bdd_table, roots[0], &mut assignment_count), expected);
    }

    #[test]
    fn bdd_zdd_round_trip_preserves_cardinality() {
        let mut progress = NullProgress;
        let mut spec = Combination::new(4, 2);
        let mut zdd = build::<2, _>(&mut spec, &mut progress).unwrap();
        reduce(&mut zdd.table, &mut zdd.roots, ReduceMode::Zdd).unwrap();

        let (mut bdd_table, bdd_root) = zdd_to_bdd(&zdd.table, zdd.roots[0], 4).unwrap();
        let mut bdd_roots = vec![bdd_root];
        reduce(&mut bdd_table, &mut bdd_roots, ReduceMode::Bdd).unwrap();

        let (mut back_table, back_root) = bdd_to_zdd(&bdd_table, bdd_roots[0], 4).unwrap();
        let mut back_roots = vec![back_root];
        reduce(&mut back_table, &mut back_roots, ReduceMode::Zdd).unwrap();

        let mut original: Cardinality<u64> = Cardinality::new(CardinalityDomain::SetCount);
        let mut roundtripped: Cardinality<u64> = Cardinality::new(CardinalityDomain::SetCount);
        assert_eq!(
            evaluate(&zdd.table, zdd.roots[0], &mut original),
            evaluate(&back_table, back_roots[0], &mut roundtripped)
        );
    }
}
