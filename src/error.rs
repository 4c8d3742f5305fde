//! `RelationError`: unified error type for incidence public APIs.
//!
//! Every precondition violation on the public surface is reported through
//! this enum; the receiver's state is left untouched (validation happens
//! before any mutation). Tolerated degenerate inputs (out-of-range query
//! nodes, kill-list entries past the id range, unmapped values in a node
//! permutation) do not error at all — they return empty or degraded
//! results as documented on the individual methods.

use thiserror::Error;

/// Unified error type for incidence operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelationError {
    /// Element index outside `[0, len)` where a bounded index is required.
    #[error("element {element} out of bounds (relation has {len} elements)")]
    ElementOutOfBounds { element: usize, len: usize },
    /// Type index outside `[0, types)` in a typed matrix call.
    #[error("type {index} out of bounds (matrix has {types} types)")]
    TypeOutOfBounds { index: usize, types: usize },
    /// A typed matrix must have at least one type.
    #[error("typed matrix requires at least one type")]
    ZeroTypes,
    /// CSR import with inconsistent offsets.
    #[error("malformed CSR input: {0}")]
    MalformedCsr(&'static str),
}
