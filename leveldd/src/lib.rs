//! Breadth-first, top-down construction of shared, reduced decision
//! diagrams (BDDs, ZDDs, and the common "quasi-reduced" relaxation
//! between them).
//!
//! A client implements [`spec::Spec`] to describe a decision diagram
//! implicitly, level by level, without ever materializing more than
//! one level's worth of states at a time. [`builder::build`] (and,
//! behind the `parallel` feature, [`builder::parallel::build_parallel`])
//! turns that implicit description into a [`table::NodeTable`]: an
//! unreduced, multi-rooted DAG. [`reduce::reduce`] canonicalizes it in
//! place under one of three rules; [`subset::subset`] descends an
//! existing DAG and a spec in lock-step to build the DAG restricted to
//! states the spec also accepts; [`eval::evaluate`] folds a value-type
//! collaborator bottom-up over a finished table; [`sweep::sweep`]
//! reclaims dead subgraphs; [`dag::Dag`] ties construction, reduction,
//! subsetting, evaluation, iteration, and introspection together behind
//! one user-facing handle.
//!
//! [`specs`] bundles a handful of worked `Spec` implementations
//! (a universal ZDD, an exact-k-of-n combination, a size-window
//! constraint, and a frontier-based simple-path counter over a grid
//! graph) used throughout this crate's own test suite.

pub mod arena;
pub mod builder;
pub mod convert;
pub mod dag;
pub mod error;
pub mod eval;
pub mod introspect;
pub mod iter;
pub mod node;
pub mod progress;
pub mod reduce;
pub mod spec;
pub mod specs;
pub mod subset;
pub mod sweep;
pub mod table;
pub mod unique;

pub use crate::dag::{BuildConfig, Dag};
pub use crate::error::{DdError, Result};
pub use crate::node::{Node, NodeId};
pub use crate::progress::{NullProgress, Progress};
pub use crate::reduce::ReduceMode;
pub use crate::spec::{ArraySpec, Spec, Transition};
pub use crate::sweep::SweepConfig;
