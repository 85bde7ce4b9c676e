//! The universal ZDD over `n` variables: every one of the `2^n`
//! possible subsets, grounded directly on `spec/UniversalZdd.hpp` in
//! this framework's lineage — a stateless spec whose every node simply
//! continues one level down on either branch.

use crate::spec::{Spec, Transition};

/// Represents all `2^n` subsets of `{1, .., n}`.
///
/// Carries no per-node state: every node at level `i` is identical, so
/// the builder collapses it to a single node per level regardless of
/// how many frontier entries reach it.
pub struct UniversalZdd {
    n: u32,
}

impl UniversalZdd {
    /// A universal ZDD over `n` variables. `n == 0` is the degenerate
    /// diagram representing only the empty set.
    pub fn new(n: u32) -> Self {
        UniversalZdd { n }
    }
}

impl Spec for UniversalZdd {
    const ARITY: usize = 2;
    type State = ();

    fn get_root(&self) -> Transition<()> {
        if self.n == 0 {
            Transition::True
        } else {
            Transition::Continue((), self.n)
        }
    }

    fn get_child(&self, _state: &mut (), level: u32, _value: usize) -> Transition<()> {
        if level == 1 {
            Transition::True
        } else {
            Transition::Continue((), level - 1)
        }
    }

    fn hash_code(&self, _state: &(), _level: u32) -> u64 {
        0
    }

    fn equal_to(&self, _a: &(), _b: &(), _level: u32) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::eval::{evaluate, Cardinality, CardinalityDomain};
    use crate::progress::NullProgress;

    #[test]
    fn five_variables_yields_thirty_two_sets() {
        let mut spec = UniversalZdd::new(5);
        let mut progress = NullProgress;
        let dag = build::<2, _>(&mut spec, &mut progress).unwrap();

        let mut set_count: Cardinality<u64> = Cardinality::new(CardinalityDomain::SetCount);
        assert_eq!(evaluate(&dag.table, dag.roots[0], &mut set_count), 32);

        let mut assignment_count: Cardinality<u64> =
            Cardinality::new(CardinalityDomain::AssignmentCount);
        assert_eq!(evaluate(&dag.table, dag.roots[0], &mut assignment_count), 32);
    }

    #[test]
    fn zero_variables_is_the_empty_set_only() {
        let mut spec = UniversalZdd::new(0);
        let mut progress = NullProgress;
        let dag = build::<2, _>(&mut spec, &mut progress).unwrap();
        assert!(dag.roots[0].is_one());
    }
}
