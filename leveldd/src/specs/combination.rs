//! "Choose exactly `k` of `n`" as a spec, grounded on the `Combination`
//! example from this framework lineage's own worked test
//! (`apps/test/example1.cpp`): the state tracks how many of the
//! variables decided so far were included, pruning a branch the moment
//! it can no longer reach exactly `k`.

use crate::spec::{Spec, Transition};

/// The family of all `n`-bit combinations with exactly `k` bits set.
pub struct Combination {
    n: u32,
    k: i32,
}

impl Combination {
    /// Choose exactly `k` of `n` variables. `k` may be negative or
    /// exceed `n`, in which case the diagram is identically false.
    pub fn new(n: u32, k: i32) -> Self {
        Combination { n, k }
    }
}

impl Spec for Combination {
    const ARITY: usize = 2;
    // Number of variables chosen so far.
    type State = i32;

    fn get_root(&self) -> Transition<i32> {
        if self.k < 0 || self.k as u32 > self.n {
            return Transition::False;
        }
        if self.n == 0 {
            return if self.k == 0 { Transition::True } else { Transition::False };
        }
        Transition::Continue(0, self.n)
    }

    fn get_child(&self, state: &mut i32, level: u32, value: usize) -> Transition<()> {
        *state += value as i32;
        if level == 1 {
            return if *state == self.k { Transition::True } else { Transition::False };
        }
        if *state > self.k {
            return Transition::False;
        }
        // Even taking every remaining variable can't reach k: dead.
        if *state + (level as i32 - 1) < self.k {
            return Transition::False;
        }
        Transition::Continue((), level - 1)
    }

    fn hash_code(&self, state: &i32, _level: u32) -> u64 {
        *state as u64
    }

    fn equal_to(&self, a: &i32, b: &i32, _level: u32) -> bool {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::eval::{evaluate, Cardinality, CardinalityDomain};
    use crate::progress::NullProgress;
    use crate::reduce::{reduce, ReduceMode};

    fn binomial(n: u64, k: u64) -> u64 {
        if k > n {
            return 0;
        }
        let k = k.min(n - k);
        let mut result = 1u64;
        for i in 0..k {
            result = result * (n - i) / (i + 1);
        }
        result
    }

    #[test]
    fn six_choose_three_has_cardinality_twenty_before_and_after_zdd_reduce() {
        let mut progress = NullProgress;
        let mut spec = Combination::new(6, 3);
        let mut dag = build::<2, _>(&mut spec, &mut progress).unwrap();

        let mut before: Cardinality<u64> = Cardinality::new(CardinalityDomain::SetCount);
        assert_eq!(evaluate(&dag.table, dag.roots[0], &mut before), 20);

        reduce(&mut dag.table, &mut dag.roots, ReduceMode::Zdd).unwrap();
        let mut after: Cardinality<u64> = Cardinality::new(CardinalityDomain::SetCount);
        assert_eq!(evaluate(&dag.table, dag.roots[0], &mut after), 20);
    }

    #[test]
    fn matches_the_binomial_coefficient_across_small_n_and_k() {
        let mut progress = NullProgress;
        for n in 1..=8u32 {
            for k in 0..=n as i32 {
                let mut spec = Combination::new(n, k);
                let dag = build::<2, _>(&mut spec, &mut progress).unwrap();
                let mut set_count: Cardinality<u64> = Cardinality::new(CardinalityDomain::SetCount);
                let mut assignment_count: Cardinality<u64> =
                    Cardinality::new(CardinalityDomain::AssignmentCount);
                let expected = binomial(n as u64, k as u64);
                assert_eq!(evaluate(&dag.table, dag.roots[0], &mut set_count), expected);
                assert_eq!(
                    evaluate(&dag.table, dag.roots[0], &mut assignment_count),
                    expected
                );
            }
        }
    }
}
