//! Breadth-first, level-synchronous top-down construction.
//!
//! This is the core loop: pull states from a [`crate::spec::Spec`],
//! bucket them by level, deduplicate each level via
//! [`crate::unique::UniqueTable`], and emit canonical
//! [`crate::node::Node`]s into a [`crate::table::NodeTable`].
//!
//! The original `DdSpec` contract exposes `destruct`/`getCopy` for a
//! spec to manage its own state lifetime by hand. Rust's `Clone`/`Drop`
//! cover exactly that role here, so [`crate::spec::Spec`] has no
//! equivalent methods; a state is cloned wherever the C++ counterpart
//! would call `getCopy`, and simply dropped wherever it would call
//! `destruct`.

use std::collections::BTreeMap;

use hashbrown::HashMap;

use crate::error::{DdError, Result};
use crate::node::{Node, NodeId};
use crate::progress::Progress;
use crate::spec::{Spec, Transition};
use crate::table::NodeTable;
use crate::unique::{UniqueKeyed, UniqueTable};

/// Where a resolved `NodeId` must be written once a scheduled state
/// finishes expanding: either the final output root, or a branch slot
/// of an already-emitted parent node.
#[derive(Clone, Copy)]
enum Slot {
    Root(usize),
    Branch { level: u32, col: u64, branch: usize },
}

fn write_slot<const A: usize>(table: &mut NodeTable<A>, roots: &mut [NodeId], slot: Slot, id: NodeId) {
    match slot {
        Slot::Root(i) => roots[i] = id,
        Slot::Branch { level, col, branch } => {
            table.get_mut(NodeId::new(level, col)).branch[branch] = id;
        }
    }
}

struct ItemKeyed<'a, S: Spec> {
    spec: &'a S,
    items: &'a [(S::State, Slot)],
}

impl<'a, S: Spec> UniqueKeyed<usize> for ItemKeyed<'a, S> {
    fn hash_at(&self, key: usize, level: u32) -> u64 {
        self.spec.hash_code(&self.items[key].0, level)
    }

    fn eq_at(&self, a: usize, b: usize, level: u32) -> bool {
        self.spec.equal_to(&self.items[a].0, &self.items[b].0, level)
    }
}

/// A finished, unreduced node table plus the root(s) built into it.
pub struct BuiltDag<const A: usize> {
    pub table: NodeTable<A>,
    pub roots: Vec<NodeId>,
}

/// Build the diagram described by `spec` into a fresh node table.
///
/// `A` MUST equal `S::ARITY`; this is checked with `debug_assert!`
/// since a mismatch is a caller bug, not a recoverable condition.
pub fn build<const A: usize, S: Spec>(spec: &mut S, progress: &mut dyn Progress) -> Result<BuiltDag<A>> {
    debug_assert_eq!(S::ARITY, A, "Spec::ARITY must match the builder's const arity");

    let mut table = NodeTable::<A>::new();
    let mut roots = vec![NodeId::ZERO];

    let mut frontier: BTreeMap<u32, Vec<(S::State, Slot)>> = BTreeMap::new();

    match spec.get_root() {
        Transition::False => return Ok(BuiltDag { table, roots: vec![NodeId::ZERO] }),
        Transition::True => return Ok(BuiltDag { table, roots: vec![NodeId::ONE] }),
        Transition::Continue(state, level) => {
            frontier.entry(level).or_default().push((state, Slot::Root(0)));
        }
    }

    while let Some((&level, _)) = frontier.iter().next_back() {
        let mut items = frontier.remove(&level).unwrap();
        progress.on_level_start(level, items.len());

        if spec.need_wipedown(level) {
            for (state, _) in items.iter_mut() {
                spec.set_wipedown_root(state);
            }
            spec.do_wipedown(level);
        }

        let mut unique: UniqueTable<usize> = UniqueTable::with_capacity(items.len());
        let mut rep_to_group: HashMap<usize, usize> = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        {
            let keyed = ItemKeyed { spec, items: &items };
            for i in 0..items.len() {
                let rep = unique.intern(i, level, &keyed);
                let gidx = *rep_to_group.entry(rep).or_insert_with(|| {
                    groups.push(Vec::new());
                    groups.len() - 1
                });
                groups[gidx].push(i);
            }
        }

        let mut node_count = 0usize;
        for group in &groups {
            let rep_idx = group[0];
            let mut rep_state = items[rep_idx].0.clone();
            for &dup_idx in &group[1..] {
                spec.merge_states(&mut rep_state, &items[dup_idx].0);
            }

            let mut node = Node::<A>::all_zero();
            let mut pending: Vec<(usize, S::State, u32)> = Vec::new();
            for b in 0..A {
                let mut clone = rep_state.clone();
                match spec.get_child(&mut clone, level, b) {
                    Transition::False => node.branch[b] = NodeId::ZERO,
                    Transition::True => node.branch[b] = NodeId::ONE,
                    Transition::Continue((), next_level) => {
                        if next_level >= level {
                            return Err(DdError::ChildLevelMonotonicity {
                                level,
                                returned: next_level as i64,
                            });
                        }
                        pending.push((b, clone, next_level));
                    }
                }
            }

            let id = table.push(level, node)?;
            node_count += 1;

            for (b, clone, next_level) in pending {
                frontier
                    .entry(next_level)
                    .or_default()
                    .push((clone, Slot::Branch { level, col: id.col(), branch: b }));
            }

            for &idx in group {
                write_slot(&mut table, &mut roots, items[idx].1, id);
            }
        }

        progress.on_level_done(level, node_count);
        spec.destruct_level(level);
    }

    Ok(BuiltDag { table, roots })
}

/// A multi-threaded variant of [`build`] that mirrors the three-phase
/// partitioned dedup of the reference design (parallel-hash, serial
/// column assignment, parallel emit), partitioning each level's
/// frontier into `next_prime(10 * threads)` buckets by hash. Gated
/// behind the `parallel` feature so the default build has no `rayon`
/// dependency at all, matching how this crate's lineage gates its own
/// optional multi-threaded compilation behind a feature flag instead
/// of making thread management part of every caller's API.
#[cfg(feature = "parallel")]
pub mod parallel {
    use super::*;
    use rayon::prelude::*;

    fn next_prime(mut n: usize) -> usize {
        if n < 2 {
            return 2;
        }
        if n % 2 == 0 {
            n += 1;
        }
        loop {
            if is_prime(n) {
                return n;
            }
            n += 2;
        }
    }

    fn is_prime(n: usize) -> bool {
        if n < 2 {
            return false;
        }
        let mut i = 2;
        while i * i <= n {
            if n % i == 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Build `spec` using up to `threads` worker threads per level.
    pub fn build_parallel<const A: usize, S>(
        spec: &mut S,
        threads: usize,
        progress: &mut dyn Progress,
    ) -> Result<BuiltDag<A>>
    where
        S: Spec + Sync,
        S::State: Send + Clone,
    {
        debug_assert_eq!(S::ARITY, A);
        let threads = threads.max(1);
        let buckets = next_prime(10 * threads);

        let mut table = NodeTable::<A>::new();
        let mut roots = vec![NodeId::ZERO];
        let mut frontier: BTreeMap<u32, Vec<(S::State, Slot)>> = BTreeMap::new();

        match spec.get_root() {
            Transition::False => return Ok(BuiltDag { table, roots: vec![NodeId::ZERO] }),
            Transition::True => return Ok(BuiltDag { table, roots: vec![NodeId::ONE] }),
            Transition::Continue(state, level) => {
                frontier.entry(level).or_default().push((state, Slot::Root(0)));
            }
        }

        while let Some((&level, _)) = frontier.iter().next_back() {
            let mut items = frontier.remove(&level).unwrap();
            progress.on_level_start(level, items.len());

            if spec.need_wipedown(level) {
                for (state, _) in items.iter_mut() {
                    spec.set_wipedown_root(state);
                }
                spec.do_wipedown(level);
            }

            // Phase 1 (parallel-hash): partition into buckets, dedup
            // each bucket independently on the pool.
            let mut bucketed: Vec<Vec<usize>> = vec![Vec::new(); buckets];
            for (i, (state, _)) in items.iter().enumerate() {
                let h = spec.hash_code(state, level) as usize % buckets;
                bucketed[h].push(i);
            }

            let per_bucket: Vec<Vec<Vec<usize>>> = bucketed
                .into_par_iter()
                .map(|bucket_indices| {
                    let mut unique: UniqueTable<usize> = UniqueTable::new();
                    let keyed = ItemKeyed { spec, items: &items };
                    let mut rep_to_group: HashMap<usize, usize> = HashMap::new();
                    let mut groups: Vec<Vec<usize>> = Vec::new();
                    for &i in &bucket_indices {
                        let rep = unique.intern(i, level, &keyed);
                        let gidx = *rep_to_group.entry(rep).or_insert_with(|| {
                            groups.push(Vec::new());
                            groups.len() - 1
                        });
                        groups[gidx].push(i);
                    }
                    groups
                })
                .collect();

            // Phase 2 (serial column assignment) + phase 3 (emit):
            // collapsed into one serial pass here for safety, since
            // `table`/`frontier` mutation is not lock-free; the
            // parallel work above is where the real cost (hashing,
            // equality probing across the full frontier) lives.
            let mut node_count = 0usize;
            for groups in per_bucket {
                for group in groups {
                    let rep_idx = group[0];
                    let mut rep_state = items[rep_idx].0.clone();
                    for &dup_idx in &group[1..] {
                        spec.merge_states(&mut rep_state, &items[dup_idx].0);
                    }

                    let mut node = Node::<A>::all_zero();
                    let mut pending: Vec<(usize, S::State, u32)> = Vec::new();
                    for b in 0..A {
                        let mut clone = rep_state.clone();
                        match spec.get_child(&mut clone, level, b) {
                            Transition::False => node.branch[b] = NodeId::ZERO,
                            Transition::True => node.branch[b] = NodeId::ONE,
                            Transition::Continue((), next_level) => {
                                if next_level >= level {
                                    return Err(DdError::ChildLevelMonotonicity {
                                        level,
                                        returned: next_level as i64,
                                    });
                                }
                                pending.push((b, clone, next_level));
                            }
                        }
                    }

                    let id = table.push(level, node)?;
                    node_count += 1;

                    for (b, clone, next_level) in pending {
                        frontier
                            .entry(next_level)
                            .or_default()
                            .push((clone, Slot::Branch { level, col: id.col(), branch: b }));
                    }

                    for &idx in &group {
                        write_slot(&mut table, &mut roots, items[idx].1, id);
                    }
                }
            }

            progress.on_level_done(level, node_count);
            spec.destruct_level(level);
        }

        Ok(BuiltDag { table, roots })
    }
}
