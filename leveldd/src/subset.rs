//! Breadth-first descent over the pair `(existing DAG, spec)`.
//!
//! The subsetter is the builder's frontier discipline run over a
//! combined state: an existing `NodeId` paired with a spec state.
//! Because the existing side and the spec side may sit at different
//! levels (either one may have skipped intervening levels), every
//! step first synchronizes them by repeatedly taking the "0" branch
//! of whichever side is currently higher — the zero-chain collapse —
//! until both reach the same level or one side resolves to a
//! terminal.

use std::collections::BTreeMap;

use hashbrown::HashMap;

use crate::builder::BuiltDag;
use crate::error::{DdError, Result};
use crate::node::{Node, NodeId};
use crate::progress::Progress;
use crate::spec::{Spec, Transition};
use crate::table::NodeTable;
use crate::unique::{UniqueKeyed, UniqueTable};

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

enum SyncOutcome<St> {
    Zero,
    One,
    Live(NodeId, St, u32),
}

/// Synchronize `existing` against the spec transition `transition`,
/// advancing whichever side sits at a higher level by taking its
/// "0" branch until both align or one resolves to a terminal.
fn resolve<const A: usize, S: Spec>(
    existing_table: &NodeTable<A>,
    mut existing: NodeId,
    spec: &S,
    transition: Transition<S::State>,
) -> SyncOutcome<S::State> {
    let mut spec_done: Option<bool> = None;
    let mut spec_state: Option<S::State> = None;
    let mut spec_level: u32 = 0;

    match transition {
        Transition::False => spec_done = Some(false),
        Transition::True => spec_done = Some(true),
        Transition::Continue(s, l) => {
            spec_state = Some(s);
            spec_level = l;
        }
    }

    loop {
        let existing_terminal = existing.is_terminal();
        if spec_done.is_some() && existing_terminal {
            break;
        }
        if spec_done.is_some() {
            existing = existing_table.get(existing).branch[0];
            continue;
        }
        if existing_terminal {
            let mut state = spec_state.take().unwrap();
            match spec.get_child(&mut state, spec_level, 0) {
                Transition::False => spec_done = Some(false),
                Transition::True => spec_done = Some(true),
                Transition::Continue((), next) => {
                    spec_level = next;
                    spec_state = Some(state);
                }
            }
            continue;
        }
        let existing_level = existing.row();
        if spec_level == existing_level {
            break;
        } else if spec_level > existing_level {
            let mut state = spec_state.take().unwrap();
            match spec.get_child(&mut state, spec_level, 0) {
                Transition::False => spec_done = Some(false),
                Transition::True => spec_done = Some(true),
                Transition::Continue((), next) => {
                    spec_level = next;
                    spec_state = Some(state);
                }
            }
        } else {
            existing = existing_table.get(existing).branch[0];
        }
    }

    if let Some(one) = spec_done {
        return if one && existing.is_one() {
            SyncOutcome::One
        } else {
            SyncOutcome::Zero
        };
    }
    SyncOutcome::Live(existing, spec_state.unwrap(), spec_level)
}

struct ItemKeyed<'a, S: Spec> {
    spec: &'a S,
    items: &'a [(NodeId, S::State, Slot)],
}

impl<'a, S: Spec> UniqueKeyed<usize> for ItemKeyed<'a, S> {
    fn hash_at(&self, key: usize, level: u32) -> u64 {
        let (existing, state, _) = &self.items[key];
        existing.row() as u64 ^ existing.col().wrapping_mul(0x9E37_79B9) ^ self.spec.hash_code(state, level)
    }

    fn eq_at(&self, a: usize, b: usize, level: u32) -> bool {
        let (ea, sa, _) = &self.items[a];
        let (eb, sb, _) = &self.items[b];
        ea == eb && self.spec.equal_to(sa, sb, level)
    }
}

/// Build the diagram obtained by descending `spec` against
/// `existing_root` of `existing_table` in lock-step.
pub fn subset<const A: usize, S: Spec>(
    existing_table: &NodeTable<A>,
    existing_root: NodeId,
    spec: &mut S,
    progress: &mut dyn Progress,
) -> Result<BuiltDag<A>> {
    debug_assert_eq!(S::ARITY, A);

    let mut table = NodeTable::<A>::new();

    let root_outcome = match spec.get_root() {
        Transition::False => SyncOutcome::Zero,
        Transition::True => SyncOutcome::One,
        t @ Transition::Continue(..) => resolve(existing_table, existing_root, spec, t),
    };

    let mut frontier: BTreeMap<u32, Vec<(NodeId, S::State, Slot)>> = BTreeMap::new();
    match root_outcome {
        SyncOutcome::Zero => return Ok(BuiltDag { table, roots: vec![NodeId::ZERO] }),
        SyncOutcome::One => return Ok(BuiltDag { table, roots: vec![NodeId::ONE] }),
        SyncOutcome::Live(existing, state, level) => {
            frontier.entry(level).or_default().push((existing, state, Slot::Root(0)));
        }
    }

    let mut roots = vec![NodeId::ZERO];

    while let Some((&level, _)) = frontier.iter().next_back() {
        let items = frontier.remove(&level).unwrap();
        progress.on_level_start(level, items.len());

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
            let (existing_rep, ref rep_state0, _) = items[rep_idx];
            let mut rep_state = rep_state0.clone();
            for &dup_idx in &group[1..] {
                spec.merge_states(&mut rep_state, &items[dup_idx].1);
            }

            debug_assert!(!existing_rep.is_terminal(), "live items must reference a real existing node");
            let existing_node = *existing_table.get(existing_rep);

            let mut node = Node::<A>::all_zero();
            let mut pending: Vec<(usize, NodeId, S::State, u32)> = Vec::new();
            for b in 0..A {
                let mut clone = rep_state.clone();
                let transition = spec.get_child(&mut clone, level, b);
                let outcome = resolve(existing_table, existing_node.branch[b], spec, transition);
                match outcome {
                    SyncOutcome::Zero => node.branch[b] = NodeId::ZERO,
                    SyncOutcome::One => node.branch[b] = NodeId::ONE,
                    SyncOutcome::Live(next_existing, next_state, next_level) => {
                        if next_level >= level {
                            return Err(DdError::ChildLevelMonotonicity {
                                level,
                                returned: next_level as i64,
                            });
                        }
                        pending.push((b, next_existing, next_state, next_level));
                    }
                }
            }

            let id = table.push(level, node)?;
            node_count += 1;

            for (b, next_existing, next_state, next_level) in pending {
                frontier.entry(next_level).or_default().push((
                    next_existing,
                    next_state,
                    Slot::Branch { level, col: id.col(), branch: b },
                ));
            }

            for &idx in group {
                write_slot(&mut table, &mut roots, items[idx].2, id);
            }
        }

        progress.on_level_done(level, node_count);
        spec.destruct_level(level);
    }

    Ok(BuiltDag { table, roots })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::progress::NullProgress;
    use crate::specs::size_constraint::SizeConstraint;
    use crate::specs::universal::UniversalZdd;

    #[test]
    fn subsetting_universal_by_size_constraint_matches_direct_build() {
        let mut progress = NullProgress;
        let mut universal = UniversalZdd::new(5);
        let universal_dag = build::<2, _>(&mut universal, &mut progress).unwrap();

        let mut constrained_direct = SizeConstraint::new(5, 2, 3);
        let direct_dag = build::<2, _>(&mut constrained_direct, &mut progress).unwrap();

        let mut constrained_for_subset = SizeConstraint::new(5, 2, 3);
        let subset_dag = subset(
            &universal_dag.table,
            universal_dag.roots[0],
            &mut constrained_for_subset,
            &mut progress,
        )
        .unwrap();

        let mut eval_direct = crate::eval::Cardinality::<u64>::new(crate::eval::CardinalityDomain::SetCount);
        let mut eval_subset = crate::eval::Cardinality::<u64>::new(crate::eval::CardinalityDomain::SetCount);
        let direct_count = crate::eval::evaluate(&direct_dag.table, direct_dag.roots[0], &mut eval_direct);
        let subset_count = crate::eval::evaluate(&subset_dag.table, subset_dag.roots[0], &mut eval_subset);
        assert_eq!(direct_count, subset_count);
    }
}
