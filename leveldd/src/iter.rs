//! A stable depth-first path iterator.
//!
//! Yields, for each distinct 1-path from a root to the `ONE`
//! terminal, the ordered sequence of rows at which a "chose-1" branch
//! was taken (descending, since rows are visited root-to-leaf and a
//! root sits at the highest row). Implemented as an explicit stack
//! machine rather than recursion, since a grid- or graph-scale
//! diagram can have root-to-leaf chains many thousands of rows deep.

use crate::node::NodeId;
use crate::table::NodeTable;

struct Frame {
    id: NodeId,
    // Remaining branch values to try, popped off in traversal order
    // (highest value first, so binary specs try "chose 1" before
    // "chose 0").
    remaining: Vec<usize>,
    // The row pushed onto the path when this frame was entered via a
    // branch-1 edge, so it can be popped again on backtrack.
    entered_via_row: Option<u32>,
}

/// Iterates every distinct 1-path from `root` to `ONE`, in
/// lexicographic order over "chose-1 at row r" events.
pub struct PathIter<'a, const A: usize> {
    table: &'a NodeTable<A>,
    stack: Vec<Frame>,
    path: Vec<u32>,
    root_is_one: bool,
}

impl<'a, const A: usize> PathIter<'a, A> {
    pub fn new(table: &'a NodeTable<A>, root: NodeId) -> Self {
        let mut stack = Vec::new();
        let mut root_is_one = false;
        if root.is_one() {
            root_is_one = true;
        } else if !root.is_zero() {
            stack.push(Frame {
                id: root,
                remaining: (0..A).rev().collect(),
                entered_via_row: None,
            });
        }
        PathIter { table, stack, path: Vec::new(), root_is_one }
    }
}

impl<'a, const A: usize> Iterator for PathIter<'a, A> {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Vec<u32>> {
        if self.root_is_one {
            self.root_is_one = false;
            return Some(Vec::new());
        }

        loop {
            let frame = self.stack.last_mut()?;
            let Some(value) = frame.remaining.pop() else {
                let frame = self.stack.pop().unwrap();
                if frame.entered_via_row.is_some() {
                    self.path.pop();
                }
                continue;
            };

            let node = self.table.get(frame.id);
            let child = node.branch[value];
            let row_for_path = if value == 1 { Some(frame.id.row()) } else { None };
            if let Some(r) = row_for_path {
                self.path.push(r);
            }

            if child.is_one() {
                let result = self.path.clone();
                if row_for_path.is_some() {
                    self.path.pop();
                }
                return Some(result);
            }
            if child.is_zero() {
                if row_for_path.is_some() {
                    self.path.pop();
                }
                continue;
            }

            self.stack.push(Frame {
                id: child,
                remaining: (0..A).rev().collect(),
                entered_via_row: row_for_path,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::progress::NullProgress;
    use crate::reduce::{reduce, ReduceMode};
    use crate::specs::combination::Combination;

    #[test]
    fn two_of_four_yields_six_paths_in_row_descending_lexicographic_order() {
        let mut spec = Combination::new(4, 2);
        let mut progress = NullProgress;
        let mut dag = build::<2, _>(&mut spec, &mut progress).unwrap();
        reduce(&mut dag.table, &mut dag.roots, ReduceMode::Zdd).unwrap();

        let paths: Vec<Vec<u32>> = PathIter::new(&dag.table, dag.roots[0]).collect();
        assert_eq!(
            paths,
            vec![
                vec![4, 3],
                vec![4, 2],
                vec![4, 1],
                vec![3, 2],
                vec![3, 1],
                vec![2, 1],
            ]
        );
    }

    #[test]
    fn a_false_diagram_yields_no_paths() {
        let table: NodeTable<2> = NodeTable::new();
        let paths: Vec<Vec<u32>> = PathIter::new(&table, NodeId::ZERO).collect();
        assert!(paths.is_empty());
    }

    #[test]
    fn a_true_diagram_yields_one_empty_path() {
        let table: NodeTable<2> = NodeTable::new();
        let paths: Vec<Vec<u32>> = PathIter::new(&table, NodeId::ONE).collect();
        assert_eq!(paths, vec![Vec::<u32>::new()]);
    }
}
