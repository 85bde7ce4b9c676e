//! The user-facing handle: construct, reduce, subset, evaluate,
//! iterate, and introspect a diagram without touching
//! [`crate::table::NodeTable`] or [`crate::spec::Spec`] plumbing
//! directly.
//!
//! Only one framework operation runs against a given table at a time;
//! nothing here hands out a `NodeTable` borrow that outlives the call
//! that produced it, so there is no way to start, say, a `reduce`
//! while a `subset` built from the same `Dag` is still in flight.

use crate::builder::build;
#[cfg(feature = "parallel")]
use crate::builder::parallel::build_parallel;
use crate::convert;
use crate::error::Result;
use crate::eval::{evaluate, Evaluator};
use crate::introspect::{introspect, Introspect};
use crate::iter::PathIter;
use crate::node::NodeId;
use crate::progress::{NullProgress, Progress};
use crate::reduce::{reduce, ReduceMode};
use crate::spec::Spec;
use crate::subset::subset;
use crate::sweep::{self, SweepConfig};
use crate::table::NodeTable;

/// Tunables governing how a [`Dag`] is built and swept.
///
/// Every field has a documented default; nothing here is read from
/// the environment or a file, per §6/§7.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    /// Worker thread count for [`Dag::build_parallel`]. Ignored by
    /// [`Dag::build`]. Default `1`.
    pub threads: usize,
    /// Whether [`Dag::build`]/[`Dag::subset`] run a mark-and-compact
    /// sweep once construction finishes. Default `true`.
    pub auto_sweep: bool,
    /// The sweeper's density threshold, used when `auto_sweep` fires.
    pub sweep: SweepConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig { threads: 1, auto_sweep: true, sweep: SweepConfig::default() }
    }
}

/// A shared, multi-rooted decision diagram under construction or
/// already built: the library's single user-facing handle.
pub struct Dag<const A: usize> {
    table: NodeTable<A>,
    roots: Vec<NodeId>,
}

impl<const A: usize> Dag<A> {
    fn from_parts(table: NodeTable<A>, roots: Vec<NodeId>) -> Self {
        Dag { table, roots }
    }

    /// Build the diagram `spec` describes, single-threaded.
    pub fn build<S: Spec>(spec: &mut S, config: &BuildConfig, progress: &mut dyn Progress) -> Result<Self> {
        let built = build::<A, S>(spec, progress)?;
        let mut dag = Dag::from_parts(built.table, built.roots);
        if config.auto_sweep {
            dag.sweep();
        }
        Ok(dag)
    }

    /// [`Dag::build`] with no progress reporting and default tunables.
    pub fn build_default<S: Spec>(spec: &mut S) -> Result<Self> {
        Dag::build(spec, &BuildConfig::default(), &mut NullProgress)
    }

    /// Build `spec` using up to `config.threads` worker threads per
    /// level. Requires the `parallel` feature.
    #[cfg(feature = "parallel")]
    pub fn build_parallel<S>(spec: &mut S, config: &BuildConfig, progress: &mut dyn Progress) -> Result<Self>
    where
        S: Spec + Sync,
        S::State: Send + Clone,
    {
        let built = build_parallel::<A, S>(spec, config.threads, progress)?;
        let mut dag = Dag::from_parts(built.table, built.roots);
        if config.auto_sweep {
            dag.sweep();
        }
        Ok(dag)
    }

    /// Canonicalize this diagram in place under `mode`, rewriting
    /// every registered root to its canonical image.
    pub fn reduce(&mut self, mode: ReduceMode) -> Result<()> {
        reduce(&mut self.table, &mut self.roots, mode)
    }

    /// Build the diagram obtained by descending `spec` against this
    /// diagram's root `root_index` in lock-step, per §4.6.
    pub fn subset<S: Spec>(
        &self,
        root_index: usize,
        spec: &mut S,
        config: &BuildConfig,
        progress: &mut dyn Progress,
    ) -> Result<Self> {
        let built = subset::<A, S>(&self.table, self.roots[root_index], spec, progress)?;
        let mut dag = Dag::from_parts(built.table, built.roots);
        if config.auto_sweep {
            dag.sweep();
        }
        Ok(dag)
    }

    /// Fold `eval` bottom-up from root `root_index`.
    pub fn evaluate<E: Evaluator>(&self, root_index: usize, eval: &mut E) -> E::Value {
        evaluate(&self.table, self.roots[root_index], eval)
    }

    /// Iterate every distinct 1-path from root `root_index` to `ONE`.
    pub fn iter_paths(&self, root_index: usize) -> PathIter<'_, A> {
        PathIter::new(&self.table, self.roots[root_index])
    }

    /// Unconditionally mark-and-compact this diagram's table against
    /// its registered roots, reclaiming every node no root can reach.
    pub fn sweep(&mut self) {
        sweep::sweep(&mut self.table, &mut self.roots);
    }

    /// Check `level`'s density heuristic under `config` and sweep the
    /// whole table if it fires. Returns whether a sweep ran.
    pub fn maybe_sweep(&mut self, level: u32, config: &SweepConfig, progress: &mut dyn Progress) -> bool {
        sweep::maybe_sweep(&mut self.table, &mut self.roots, level, config, progress)
    }

    /// Walk every node reachable from every registered root, in the
    /// ascending-row order external dumpers (Graphviz, Sapporo) need.
    pub fn introspect(&self) -> Introspect<A> {
        introspect(&self.table, &self.roots)
    }

    /// The `NodeId` registered at `root_index`.
    pub fn root(&self, root_index: usize) -> NodeId {
        self.roots[root_index]
    }

    /// Every registered root, in registration order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of rows currently allocated, including the terminal row.
    pub fn num_rows(&self) -> usize {
        self.table.num_rows()
    }

    /// Number of live nodes at `level`.
    pub fn row_size(&self, level: u32) -> usize {
        self.table.row_size(level)
    }

    /// Borrow the underlying node table, for callers building their
    /// own [`crate::eval::Evaluator`] or introspection logic.
    pub fn table(&self) -> &NodeTable<A> {
        &self.table
    }

    /// Convert this diagram, read as a ZDD over `n` variables, into
    /// the equivalent BDD, then canonicalize the result under
    /// [`ReduceMode::Bdd`].
    pub fn zdd_to_bdd(&self, root_index: usize, n: u32) -> Result<Self> {
        let (table, root) = convert::zdd_to_bdd(&self.table, self.roots[root_index], n)?;
        let mut dag = Dag::from_parts(table, vec![root]);
        dag.reduce(ReduceMode::Bdd)?;
        Ok(dag)
    }

    /// Convert this diagram, read as a BDD over `n` variables, into
    /// the equivalent ZDD, then canonicalize the result under
    /// [`ReduceMode::Zdd`].
    pub fn bdd_to_zdd(&self, root_index: usize, n: u32) -> Result<Self> {
        let (table, root) = convert::bdd_to_zdd(&self.table, self.roots[root_index], n)?;
        let mut dag = Dag::from_parts(table, vec![root]);
        dag.reduce(ReduceMode::Zdd)?;
        Ok(dag)
    }
}
