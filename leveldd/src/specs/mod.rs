//! Bundled, reusable spec fixtures.
//!
//! These are worked examples of [`crate::spec::Spec`] shipped as
//! library types — grounded directly on the small reusable specs this
//! framework's lineage bundles alongside its core (a universal ZDD, a
//! cardinality-window constraint, and a frontier-based simple-path
//! counter) — distinct from the standalone application binaries
//! (N-queens, Numberlink, magic squares, path-enumeration CLIs) that
//! stay out of this crate's scope.

pub mod combination;
pub mod grid_path;
pub mod size_constraint;
pub mod universal;
