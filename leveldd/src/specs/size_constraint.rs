//! "At least `lower` and at most `upper` out of `n`" as a ZDD spec,
//! grounded on `spec/SizeConstraint.hpp`: unlike [`super::combination`],
//! this one actually exercises the builder's level-skip path. Once
//! `count` has already reached `upper`, including another item is
//! pruned at every remaining level, so the only reachable future is
//! "exclude everything else" — a run of levels across which `count`
//! never changes and the final feasibility check is the same
//! regardless of how many of them there are. `get_child` jumps
//! straight from that point to level 1 instead of visiting each of
//! those levels one at a time.

use crate::spec::{Spec, Transition};

/// All subsets of `{1, .., n}` whose size lies in `[lower, upper]`.
pub struct SizeConstraint {
    n: u32,
    lower: u32,
    upper: u32,
}

impl SizeConstraint {
    /// Subsets of `n` items with size in `[lower, upper]`.
    pub fn new(n: u32, lower: u32, upper: u32) -> Self {
        SizeConstraint { n, lower, upper }
    }
}

impl Spec for SizeConstraint {
    const ARITY: usize = 2;
    // Number of items included so far.
    type State = u32;

    fn get_root(&self) -> Transition<u32> {
        if self.n < self.lower {
            return Transition::False;
        }
        if self.n == 0 {
            return if self.lower == 0 { Transition::True } else { Transition::False };
        }
        Transition::Continue(0, self.n)
    }

    fn get_child(&self, count: &mut u32, level: u32, value: usize) -> Transition<()> {
        if value == 1 {
            if *count >= self.upper {
                return Transition::False;
            }
            *count += 1;
        } else if *count + (level - 1) < self.lower {
            // Even taking every remaining item can't reach `lower`.
            return Transition::False;
        }

        if level == 1 {
            return if *count >= self.lower && *count <= self.upper {
                Transition::True
            } else {
                Transition::False
            };
        }

        if *count == self.upper {
            // Every remaining item is now forced to be excluded
            // (branch 1 is pruned above at any level once `count ==
            // upper`), and excluding one never changes `count`, so
            // every level between here and the terminal check is the
            // same deterministic link: skip straight to level 1.
            return Transition::Continue((), 1);
        }

        Transition::Continue((), level - 1)
    }

    fn hash_code(&self, count: &u32, _level: u32) -> u64 {
        *count as u64
    }

    fn equal_to(&self, a: &u32, b: &u32, _level: u32) -> bool {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::eval::{evaluate, Cardinality, CardinalityDomain};
    use crate::progress::NullProgress;
    use crate::subset::subset;

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
    fn subsetting_the_universal_ten_zdd_matches_the_summed_binomials() {
        let mut progress = NullProgress;
        let mut universal = crate::specs::universal::UniversalZdd::new(10);
        let universal_dag = build::<2, _>(&mut universal, &mut progress).unwrap();

        let mut constraint = SizeConstraint::new(10, 3, 5);
        let dag = subset(
            &universal_dag.table,
            universal_dag.roots[0],
            &mut constraint,
            &mut progress,
        )
        .unwrap();

        let mut eval: Cardinality<u64> = Cardinality::new(CardinalityDomain::SetCount);
        let expected = binomial(10, 3) + binomial(10, 4) + binomial(10, 5);
        assert_eq!(expected, 582);
        assert_eq!(evaluate(&dag.table, dag.roots[0], &mut eval), expected);
    }

    #[test]
    fn the_three_size_windows_partitioning_n_sum_to_the_universal_cardinality() {
        let mut progress = NullProgress;
        let n = 6u32;
        let windows = [(0u32, 1u32), (2, 3), (4, n)];
        let mut total = 0u64;
        for &(lower, upper) in &windows {
            let mut spec = SizeConstraint::new(n, lower, upper);
            let dag = build::<2, _>(&mut spec, &mut progress).unwrap();
            let mut eval: Cardinality<u64> = Cardinality::new(CardinalityDomain::SetCount);
            total += evaluate(&dag.table, dag.roots[0], &mut eval);
        }
        assert_eq!(total, 1u64 << n);
    }

    #[test]
    fn lower_bound_is_inclusive_at_the_feasibility_boundary() {
        // n=2, window [1,2]: every non-empty subset of {1,2}, i.e.
        // {1}, {2}, {1,2} — cardinality 3. An off-by-one in the
        // lower-bound prune drops the exactly-reaches-`lower` subsets
        // ({1} and {2}), undercounting to 1.
        let mut progress = NullProgress;
        let mut spec = SizeConstraint::new(2, 1, 2);
        let dag = build::<2, _>(&mut spec, &mut progress).unwrap();
        let mut eval: Cardinality<u64> = Cardinality::new(CardinalityDomain::SetCount);
        assert_eq!(evaluate(&dag.table, dag.roots[0], &mut eval), 3);
    }

    #[test]
    fn get_child_skips_directly_to_level_one_once_upper_is_reached() {
        let spec = SizeConstraint::new(5, 0, 1);
        let mut count = 1; // already at `upper`
        match spec.get_child(&mut count, 4, 0) {
            Transition::Continue((), next) => assert_eq!(next, 1),
            Transition::False => panic!("expected a level skip, got the false terminal"),
            Transition::True => panic!("expected a level skip, got the true terminal"),
        }
    }

    #[test]
    fn builder_materializes_the_level_skip_as_a_direct_branch() {
        // With upper == 1, the first included item sends every
        // subsequent branch straight to level 1, so the root's
        // `value = 1` branch must point directly at a row-1 node
        // rather than row `n - 1`.
        let mut progress = NullProgress;
        let mut spec = SizeConstraint::new(5, 0, 1);
        let dag = build::<2, _>(&mut spec, &mut progress).unwrap();
        let root_node = dag.table.get(dag.roots[0]);
        assert_eq!(root_node.branch[1].row(), 1);
    }
}
