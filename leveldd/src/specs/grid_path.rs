//! Simple s-t paths across a rectangular grid, as a frontier-based
//! ("mate array") spec, grounded on the `Simpath` class from
//! `apps/test/example2.cpp`: each node's state tracks, for every
//! vertex currently straddling the edge frontier, which other such
//! vertex it is connected to by partial path segments so far (its
//! "mate"), using a sliding window sized to the grid's frontier width
//! rather than the whole vertex set.
//!
//! The window always covers exactly `cols + 1` vertices: the two
//! endpoints of the edge about to be decided, plus every vertex
//! between the current edge and the next one still pending a
//! decision. Once an edge's decision can no longer affect a vertex,
//! the window slides past it instead of growing to hold the whole
//! grid, which is what keeps the frontier narrow regardless of grid
//! size.

use crate::spec::{Spec, Transition};

/// Self-avoiding simple paths from the top-left to the bottom-right
/// corner of a `rows` by `cols` grid graph.
pub struct GridPath {
    mate_size: usize,
    num_vertex: i32,
    num_edge: u32,
    edges: Vec<(i32, i32)>,
}

impl GridPath {
    /// A grid with `rows` by `cols` vertices (so `(rows-1) * (cols-1)`
    /// unit squares).
    pub fn new(rows: u32, cols: u32) -> Self {
        let mut edges = Vec::new();
        for i in 0..rows {
            for j in 0..cols {
                let v = (i * cols + j + 1) as i32;
                if j + 1 < cols {
                    edges.push((v, v + 1));
                }
                if i + 1 < rows {
                    edges.push((v, v + cols as i32));
                }
            }
        }
        GridPath {
            mate_size: (cols + 1) as usize,
            num_vertex: (rows * cols) as i32,
            num_edge: edges.len() as u32,
            edges,
        }
    }

    fn idx(v1: i32, v: i32) -> usize {
        (v - v1) as usize
    }
}

impl Spec for GridPath {
    const ARITY: usize = 2;
    // A sliding window of "mate" pointers: `window[v - offset]` is the
    // partner of vertex `v` in the partial matching built so far,
    // where `offset` is always recoverable from the current level (it
    // is the first endpoint of the edge about to be decided).
    // `0` means "already closed off", negative means "path endpoint".
    type State = Vec<i32>;

    fn get_root(&self) -> Transition<Vec<i32>> {
        if self.num_edge == 0 {
            // A single vertex with no edges is itself the trivial path.
            return Transition::True;
        }
        let mut window = vec![0i32; self.mate_size];
        window[0] = -1;
        for v in 2..=self.mate_size as i32 {
            window[(v - 1) as usize] = if v == self.num_vertex { -1 } else { v };
        }
        Transition::Continue(window, self.num_edge)
    }

    fn get_child(&self, window: &mut Vec<i32>, level: u32, value: usize) -> Transition<()> {
        let e = (self.num_edge - level) as usize;
        let (v1, v2) = self.edges[e];
        let mate_size = self.mate_size as i32;

        if value == 1 {
            let w1 = window[Self::idx(v1, v1)];
            let w2 = window[Self::idx(v1, v2)];

            if w1 == 0 || w2 == 0 {
                return Transition::False; // one endpoint already used up
            }
            if w1 == v2 {
                return Transition::False; // would close a cycle
            }

            if w1 < 0 && w2 < 0 {
                // Both endpoints are open path ends: this edge would
                // complete the s-t path. Legal only if no other open
                // endpoint remains in the window.
                let mut v = v1 + 1;
                while v < v1 + mate_size {
                    if v != v2 {
                        let mv = window[Self::idx(v1, v)];
                        if mv != 0 && mv != v {
                            return Transition::False;
                        }
                    }
                    v += 1;
                }
                return Transition::True;
            }

            window[Self::idx(v1, v1)] = 0;
            window[Self::idx(v1, v2)] = 0;
            if w1 > 0 {
                window[Self::idx(v1, w1)] = w2;
            }
            if w2 > 0 {
                window[Self::idx(v1, w2)] = w1;
            }
        }

        if (e + 1) < self.num_edge as usize {
            let vv = self.edges[e + 1].0;
            let d = vv - v1;
            if d > 0 {
                let mut v = v1;
                while v < vv {
                    let mv = window[Self::idx(v1, v)];
                    if mv != 0 && mv != v {
                        return Transition::False; // a vertex leaving the window is still dangling
                    }
                    v += 1;
                }

                let mut shifted = window.clone();
                let mut v = vv;
                while v < v1 + mate_size {
                    shifted[(v - vv) as usize] = window[Self::idx(v1, v)];
                    v += 1;
                }
                let mut v = v1 + mate_size;
                while v < vv + mate_size {
                    shifted[(v - vv) as usize] = if v == self.num_vertex { -1 } else { v };
                    v += 1;
                }
                *window = shifted;
            }
        }

        if level == 1 {
            Transition::False
        } else {
            Transition::Continue((), level - 1)
        }
    }

    fn hash_code(&self, window: &Vec<i32>, _level: u32) -> u64 {
        let mut h: u64 = 0xcbf29ce484222325;
        for &x in window {
            h ^= x as i64 as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        h
    }

    fn equal_to(&self, a: &Vec<i32>, b: &Vec<i32>, _level: u32) -> bool {
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

    // OEIS A007764: self-avoiding corner-to-corner paths on an
    // (n+1)x(n+1) grid, n = 0..=10. Values past n = 8 overflow `u64`.
    const A007764: [u128; 11] = [
        1,
        2,
        12,
        184,
        8512,
        1262816,
        575780564,
        789360053252,
        3266598486981642,
        41044208702632496804,
        1568758030464750013214100,
    ];

    #[test]
    fn counts_self_avoiding_corner_paths_before_and_after_zdd_reduce() {
        let mut progress = NullProgress;
        for n in 1..=6u32 {
            let mut spec = GridPath::new(n + 1, n + 1);
            let mut dag = build::<2, _>(&mut spec, &mut progress).unwrap();

            let mut before: Cardinality<u128> = Cardinality::new(CardinalityDomain::SetCount);
            assert_eq!(evaluate(&dag.table, dag.roots[0], &mut before), A007764[n as usize]);

            reduce(&mut dag.table, &mut dag.roots, ReduceMode::Zdd).unwrap();
            let mut after: Cardinality<u128> = Cardinality::new(CardinalityDomain::SetCount);
            assert_eq!(evaluate(&dag.table, dag.roots[0], &mut after), A007764[n as usize]);
        }
    }

    #[test]
    fn a_single_square_has_exactly_two_paths() {
        let mut progress = NullProgress;
        let mut spec = GridPath::new(2, 2);
        let dag = build::<2, _>(&mut spec, &mut progress).unwrap();
        let mut eval: Cardinality<u128> = Cardinality::new(CardinalityDomain::SetCount);
        assert_eq!(evaluate(&dag.table, dag.roots[0], &mut eval), 2);
    }
}
