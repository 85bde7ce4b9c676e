//! Dead-subgraph pruning triggered by a per-level density heuristic.
//!
//! Mirrors the commented-out `gcForMultipleRoots` mark-and-compact
//! pass this framework's lineage carries: mark every node reachable
//! from the registered roots, then compact each row so surviving
//! nodes occupy a dense, low column range, rewriting every branch
//! (and every root) by the resulting remap.

use leveldd_entity::{EntityRef, SecondaryMap};

use crate::node::{Col, NodeId};
use crate::progress::Progress;
use crate::table::NodeTable;

/// Tunables for when the sweeper fires.
#[derive(Clone, Copy, Debug)]
pub struct SweepConfig {
    /// A level sweeps once `dead_count >= alpha * row_size`.
    pub alpha: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig { alpha: 0.125 }
    }
}

/// Count nodes at `level` whose every branch is `ZERO`.
pub fn dead_count<const A: usize>(table: &NodeTable<A>, level: u32) -> usize {
    table.row_iter(level).filter(|(_, n)| n.is_dead()).count()
}

/// Check `level`'s density heuristic and run a full mark-and-compact
/// sweep across the whole table if it fires. Returns whether a sweep
/// ran.
pub fn maybe_sweep<const A: usize>(
    table: &mut NodeTable<A>,
    roots: &mut [NodeId],
    level: u32,
    config: &SweepConfig,
    progress: &mut dyn Progress,
) -> bool {
    let size = table.row_size(level);
    if size == 0 {
        return false;
    }
    let dead = dead_count(table, level);
    if (dead as f64) < config.alpha * size as f64 {
        return false;
    }
    sweep(table, roots);
    progress.on_sweep(level, dead);
    true
}

/// Unconditionally mark-and-compact `table` against `roots`.
///
/// Each row's reachability bits and column remap are a dense table
/// keyed by the column within that row, so they are kept as
/// [`SecondaryMap<Col, _>`] rather than raw `Vec<_>` indexed by a bare
/// `usize` — the same newtype-indexed bookkeeping `leveldd-entity`
/// exists for.
pub fn sweep<const A: usize>(table: &mut NodeTable<A>, roots: &mut [NodeId]) {
    let num_rows = table.num_rows();

    let mut reachable: Vec<SecondaryMap<Col, bool>> = (0..num_rows)
        .map(|l| {
            let mut m = SecondaryMap::new();
            m.resize(table.row_size(l as u32));
            m
        })
        .collect();

    let mut stack: Vec<NodeId> = roots.iter().copied().filter(|r| !r.is_terminal()).collect();
    while let Some(id) = stack.pop() {
        let (row, col) = (id.row() as usize, Col::new(id.col() as usize));
        if *reachable[row].get(col) {
            continue;
        }
        *reachable[row].get_mut(col) = true;
        let node = *table.get(id);
        for b in node.branch {
            if !b.is_terminal() {
                stack.push(b);
            }
        }
    }

    let mut remap: Vec<SecondaryMap<Col, Option<Col>>> = (0..num_rows)
        .map(|l| {
            let mut m = SecondaryMap::new();
            m.resize(table.row_size(l as u32));
            m
        })
        .collect();
    for level in 1..num_rows {
        let mut next_col = 0usize;
        for (col, marked) in reachable[level].iter() {
            if *marked {
                *remap[level].get_mut(col) = Some(Col::new(next_col));
                next_col += 1;
            }
        }
    }

    let remap_id = |remap: &[SecondaryMap<Col, Option<Col>>], id: NodeId| -> NodeId {
        if id.is_terminal() {
            return id;
        }
        let new_col = remap[id.row() as usize]
            .get(Col::new(id.col() as usize))
            .expect("branch pointed at an unreachable node");
        NodeId::new(id.row(), new_col.index() as u64)
    };

    for level in 1..num_rows as u32 {
        let size = table.row_size(level);
        if size == 0 {
            continue;
        }
        let mut new_row = Vec::new();
        for col in 0..size {
            if !*reachable[level as usize].get(Col::new(col)) {
                continue;
            }
            let mut node = *table.get(NodeId::new(level, col as u64));
            for b in node.branch.iter_mut() {
                *b = remap_id(&remap, *b);
            }
            new_row.push(node);
        }
        table.replace_row(level, new_row);
    }

    for root in roots.iter_mut() {
        *root = remap_id(&remap, *root);
    }
}
