//! # incidence
//!
//! incidence is a library for representing and manipulating typed
//! multi-relational sparse graphs, centered on a family of adjacency
//! containers for bipartite element–node relations and their matrix-algebra
//! operations. It targets mesh/topology, combinatorial, and
//! relational-analytics workloads that repeatedly query neighborhoods,
//! compose relations, and perform coordinated deletions across multiple
//! interacting relations.
//!
//! ## The three layers
//! - [`relation::OneToMany`]: the core sparse element→node adjacency, with
//!   mutation, renumbering, transposition, boolean algebra, symbolic
//!   multiplication, topological ordering and CSR round-tripping.
//! - [`relation::ManyToMany`]: a `OneToMany` plus a lazily synchronized
//!   inverse view and reciprocal position tables, exposing neighborhood,
//!   superset and clique queries with coherent invalidation.
//! - [`relation::TypedMatrix`]: a `T×T` grid of `ManyToMany` cells over
//!   typed entities, with cross-type traversal and a cascading
//!   mark-and-sweep deletion protocol.
//!
//! Bulk passes (transpose, products, clique expansion, position tables)
//! parallelize per row via Rayon once the workload crosses an internal
//! threshold; mutation paths are always sequential. The containers are not
//! internally synchronized — `&mut` exclusivity serializes individual
//! operations, and callers needing multi-step atomicity wrap a container
//! in the lock of their choice.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! incidence = "0.1"
//! # Optional features:
//! # features = ["serde", "deterministic-order"]
//! ```
//!
//! ```rust
//! use incidence::prelude::*;
//!
//! let mut m = ManyToMany::from_rows(vec![vec![0, 1], vec![1, 2]]);
//! assert_eq!(m.elements_with_nodes(&[1]), vec![0, 1]);
//! let t = m.forward().transpose();
//! assert_eq!(&t[1], &[0, 1]);
//! ```

pub mod algs;
pub mod cache;
pub mod error;
pub mod io;
pub mod perf;
pub mod relation;

/// A convenient prelude to import the most-used types.
pub mod prelude {
    pub use crate::algs::{RenumberMaps, cliques, random_one_to_many, renumber_surviving};
    pub use crate::cache::InvalidateCache;
    pub use crate::error::RelationError;
    pub use crate::relation::{
        CsrAdjacency, ElementId, ManyToMany, NodeId, OneToMany, TypedMatrix,
    };
}
