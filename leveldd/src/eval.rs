//! Bottom-up value folds over a finished node table.
//!
//! An [`Evaluator`] never sees the table directly; [`evaluate`] drives
//! it, handing each node's already-computed children values (and the
//! level each child lives at, so an evaluator can account for skipped
//! levels the way [`Cardinality`]'s assignment-count domain does).

use crate::node::NodeId;
use crate::table::NodeTable;

/// A value-type collaborator folded bottom-up over a node table.
pub trait Evaluator {
    /// The value associated with one node or terminal.
    type Value: Clone;

    /// Value of a terminal.
    fn eval_terminal(&self, one: bool) -> Self::Value;

    /// Value of an internal node at `level`, given each branch's
    /// `(value, level)` — `level` is the row the branch target lives
    /// at (`0` for a terminal), letting an evaluator detect level
    /// skips.
    fn eval_node(&self, level: u32, children: &[(Self::Value, u32)]) -> Self::Value;

    /// Post-process the root's folded value.
    fn get_value(&self, root_value: &Self::Value, root_level: u32) -> Self::Value;

    /// Called before any node at `level` is folded, so an evaluator
    /// can size level-scoped scratch state.
    fn init_level(&mut self, level: u32) {
        let _ = level;
    }

    /// Called once every node at `level` has been folded.
    fn destruct_level(&mut self, level: u32) {
        let _ = level;
    }
}

/// Fold `eval` bottom-up over `table`, starting from `root`.
pub fn evaluate<const A: usize, E: Evaluator>(
    table: &NodeTable<A>,
    root: NodeId,
    eval: &mut E,
) -> E::Value {
    if root.is_terminal() {
        let v = eval.eval_terminal(root.is_one());
        return eval.get_value(&v, 0);
    }

    let num_rows = table.num_rows();
    let mut values: Vec<Vec<E::Value>> = Vec::with_capacity(num_rows);
    values.push(Vec::new()); // row 0 is never indexed; terminals are synthesized directly.

    for level in 1..num_rows as u32 {
        eval.init_level(level);
        let size = table.row_size(level);
        let mut row_vals = Vec::with_capacity(size);
        for (_, node) in table.row_iter(level) {
            let children: Vec<(E::Value, u32)> = node
                .branch
                .iter()
                .map(|b| {
                    if b.is_terminal() {
                        (eval.eval_terminal(b.is_one()), 0)
                    } else {
                        (values[b.row() as usize][b.col() as usize].clone(), b.row())
                    }
                })
                .collect();
            row_vals.push(eval.eval_node(level, &children));
        }
        values.push(row_vals);
        eval.destruct_level(level);
    }

    let root_value = values[root.row() as usize][root.col() as usize].clone();
    eval.get_value(&root_value, root.row())
}

/// A numeric ring minimal enough to count decision-diagram paths.
pub trait CardinalityValue: Clone + std::ops::Add<Output = Self> + std::ops::Mul<Output = Self> {
    fn zero() -> Self;
    fn one() -> Self;
}

impl CardinalityValue for u64 {
    fn zero() -> Self {
        0
    }
    fn one() -> Self {
        1
    }
}

impl CardinalityValue for u128 {
    fn zero() -> Self {
        0
    }
    fn one() -> Self {
        1
    }
}

impl CardinalityValue for f64 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
}

/// Whether a level gap between a node and one of its children
/// represents a free choice (each skipped variable doubles the
/// assignment count) or an implicit absence (a ZDD set member that is
/// simply never mentioned, contributing no multiplier).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardinalityDomain {
    /// ZDD-style "how many sets does this diagram represent".
    SetCount,
    /// BDD-style "how many satisfying assignments over every
    /// variable does this diagram represent".
    AssignmentCount,
}

/// Counts the number of 1-paths (satisfying assignments, or
/// represented sets, depending on `domain`) from a root to the `ONE`
/// terminal.
pub struct Cardinality<T> {
    pub domain: CardinalityDomain,
    _marker: std::marker::PhantomData<T>,
}

impl<T: CardinalityValue> Cardinality<T> {
    pub fn new(domain: CardinalityDomain) -> Self {
        Cardinality { domain, _marker: std::marker::PhantomData }
    }
}

impl<T: CardinalityValue> Evaluator for Cardinality<T> {
    type Value = T;

    fn eval_terminal(&self, one: bool) -> T {
        if one {
            T::one()
        } else {
            T::zero()
        }
    }

    fn eval_node(&self, level: u32, children: &[(T, u32)]) -> T {
        let two = T::one() + T::one();
        let mut sum = T::zero();
        for (value, child_level) in children {
            let gap = match self.domain {
                CardinalityDomain::SetCount => 0,
                CardinalityDomain::AssignmentCount => (level - 1) - child_level,
            };
            let mut contrib = value.clone();
            for _ in 0..gap {
                contrib = contrib * two.clone();
            }
            sum = sum + contrib;
        }
        sum
    }

    fn get_value(&self, root_value: &T, _root_level: u32) -> T {
        root_value.clone()
    }
}

/// Cardinality normalized by `2^num_vars`, assuming the diagram's
/// root sits at level `num_vars` (no level skip above the root).
pub struct Density {
    pub num_vars: u32,
    inner: Cardinality<f64>,
}

impl Density {
    pub fn new(num_vars: u32) -> Self {
        Density {
            num_vars,
            inner: Cardinality::new(CardinalityDomain::AssignmentCount),
        }
    }
}

impl Evaluator for Density {
    type Value = f64;

    fn eval_terminal(&self, one: bool) -> f64 {
        self.inner.eval_terminal(one)
    }

    fn eval_node(&self, level: u32, children: &[(f64, u32)]) -> f64 {
        self.inner.eval_node(level, children)
    }

    fn get_value(&self, root_value: &f64, _root_level: u32) -> f64 {
        root_value / 2f64.powi(self.num_vars as i32)
    }
}

/// Length of the longest 1-path to `ONE`, or `None` if no such path
/// exists (the diagram is identically false). Branch index is taken
/// as the per-variable "item included" weight, so this is intended
/// for binary (arity-2) specs.
#[derive(Default)]
pub struct MaxNumItems;

impl Evaluator for MaxNumItems {
    type Value = Option<u32>;

    fn eval_terminal(&self, one: bool) -> Option<u32> {
        if one {
            Some(0)
        } else {
            None
        }
    }

    fn eval_node(&self, _level: u32, children: &[(Option<u32>, u32)]) -> Option<u32> {
        children
            .iter()
            .enumerate()
            .filter_map(|(b, (v, _))| v.map(|x| x + b as u32))
            .max()
    }

    fn get_value(&self, root_value: &Option<u32>, _root_level: u32) -> Option<u32> {
        *root_value
    }
}

/// Length of the shortest 1-path to `ONE`, or `None` if no such path
/// exists.
#[derive(Default)]
pub struct MinNumItems;

impl Evaluator for MinNumItems {
    type Value = Option<u32>;

    fn eval_terminal(&self, one: bool) -> Option<u32> {
        if one {
            Some(0)
        } else {
            None
        }
    }

    fn eval_node(&self, _level: u32, children: &[(Option<u32>, u32)]) -> Option<u32> {
        children
            .iter()
            .enumerate()
            .filter_map(|(b, (v, _))| v.map(|x| x + b as u32))
            .min()
    }

    fn get_value(&self, root_value: &Option<u32>, _root_level: u32) -> Option<u32> {
        *root_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::table::NodeTable;

    #[test]
    fn cardinality_counts_two_paths() {
        let mut table: NodeTable<2> = NodeTable::new();
        let root = table
            .push(1, Node { branch: [NodeId::ONE, NodeId::ONE] })
            .unwrap();
        let mut eval: Cardinality<u64> = Cardinality::new(CardinalityDomain::SetCount);
        assert_eq!(evaluate(&table, root, &mut eval), 2);
    }

    #[test]
    fn max_and_min_num_items_over_a_chain() {
        let mut table: NodeTable<2> = NodeTable::new();
        let low = table
            .push(1, Node { branch: [NodeId::ONE, NodeId::ZERO] })
            .unwrap();
        let root = table
            .push(2, Node { branch: [low, NodeId::ONE] })
            .unwrap();

        let mut max = MaxNumItems;
        assert_eq!(evaluate(&table, root, &mut max), Some(1));
        let mut min = MinNumItems;
        assert_eq!(evaluate(&table, root, &mut min), Some(0));
    }
}
