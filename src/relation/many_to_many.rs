//! [`ManyToMany`]: a [`OneToMany`] with a synchronized inverse view.
//!
//! The container maintains three derived views of the forward adjacency:
//! the inverse relation (node → elements, the transpose), and two position
//! tables giving, for every incidence, where the partner sits inside the
//! mirrored row. The views are rebuilt lazily: every mutation marks them
//! dirty and the next read that needs them re-synchronizes. A batch mode
//! suppresses re-synchronization across a run of mutations; leaving batch
//! mode re-syncs if dirty. While a batch is open, inverse-backed queries
//! observe the views as of the last synchronization.

use rayon::prelude::*;

use crate::algs::ordered;
use crate::cache::InvalidateCache;
use crate::error::RelationError;

use super::{ElementId, NodeId, OneToMany, PAR_THRESHOLD};

/// A forward element→node relation plus its lazily maintained inverse and
/// reciprocal position tables.
///
/// # Example
/// ```rust
/// use incidence::relation::ManyToMany;
/// let mut m = ManyToMany::from_rows(vec![vec![0, 1], vec![1, 2], vec![2, 3]]);
/// assert_eq!(m.elements_with_nodes(&[1]), vec![0, 1]);
/// assert_eq!(m.element_neighbours(0).unwrap(), vec![1]);
/// assert_eq!(m.node_neighbours(1), vec![0, 2]);
/// ```
#[derive(Clone, Debug)]
pub struct ManyToMany {
    forward: OneToMany,
    inverse: OneToMany,
    /// `element_positions[e][k]`: index of `e` inside
    /// `inverse[forward[e][k]]`.
    element_positions: Vec<Vec<usize>>,
    /// `node_positions[n][k]`: index of `n` inside
    /// `forward[inverse[n][k]]`.
    node_positions: Vec<Vec<usize>>,
    in_sync: bool,
    batch: bool,
}

impl Default for ManyToMany {
    fn default() -> Self {
        Self {
            forward: OneToMany::new(),
            inverse: OneToMany::new(),
            element_positions: Vec::new(),
            node_positions: Vec::new(),
            in_sync: true,
            batch: false,
        }
    }
}

impl ManyToMany {
    /// Creates a new, empty relation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty relation with room for `elements` rows.
    pub fn with_capacity(elements: usize) -> Self {
        Self {
            forward: OneToMany::with_capacity(elements),
            ..Self::default()
        }
    }

    /// Adopts an existing adjacency; the views are built on first use.
    pub fn from_rows(rows: Vec<Vec<NodeId>>) -> Self {
        Self::from(OneToMany::from_rows(rows))
    }

    /// The forward adjacency.
    #[inline]
    pub fn forward(&self) -> &OneToMany {
        &self.forward
    }

    /// Unwraps into the forward adjacency, dropping the views.
    pub fn into_one_to_many(self) -> OneToMany {
        self.forward
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// True if the relation has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Largest node id in any row, if any.
    #[inline]
    pub fn max_node(&self) -> Option<NodeId> {
        self.forward.max_node()
    }

    /// The nodes of element `e`.
    #[inline]
    pub fn row(&self, e: ElementId) -> Result<&[NodeId], RelationError> {
        self.forward.row(e)
    }

    // --- synchronization --------------------------------------------------

    /// Whether the derived views currently reflect the forward adjacency.
    #[inline]
    pub fn is_synchronized(&self) -> bool {
        self.in_sync
    }

    /// Enter batch mode: mutations stop triggering re-synchronization
    /// until [`end_batch`](Self::end_batch).
    pub fn begin_batch(&mut self) {
        self.batch = true;
    }

    /// Leave batch mode, re-synchronizing if dirty.
    pub fn end_batch(&mut self) {
        self.batch = false;
        if !self.in_sync {
            self.synchronize();
        }
    }

    /// Force the derived views up to date (also inside a batch).
    pub fn synchronize(&mut self) {
        if self.in_sync {
            return;
        }
        self.inverse = self.forward.transpose();
        self.element_positions = Self::positions_of(&self.forward, &self.inverse, true);
        self.node_positions = Self::positions_of(&self.inverse, &self.forward, false);
        self.in_sync = true;
        #[cfg(any(debug_assertions, feature = "strict-invariants"))]
        self.debug_assert_synced();
    }

    #[inline]
    fn ensure_synced(&mut self) {
        if !self.in_sync && !self.batch {
            self.synchronize();
        }
    }

    /// For every row of `of`, the position of the owning index inside the
    /// mirrored row of `within`. `sorted` marks that `within` rows are
    /// ascending (the transpose), enabling binary search.
    fn positions_of(of: &OneToMany, within: &OneToMany, sorted: bool) -> Vec<Vec<usize>> {
        let locate = |own: usize, row: &[NodeId]| -> Vec<usize> {
            row.iter()
                .map(|&partner| {
                    let mirror: &[usize] = within.rows.get(partner).map_or(&[], Vec::as_slice);
                    if sorted {
                        mirror.binary_search(&own).unwrap_or(mirror.len())
                    } else {
                        mirror.iter().position(|&v| v == own).unwrap_or(mirror.len())
                    }
                })
                .collect()
        };
        if of.len() >= PAR_THRESHOLD {
            of.rows
                .par_iter()
                .enumerate()
                .map(|(own, row)| locate(own, row))
                .collect()
        } else {
            of.rows
                .iter()
                .enumerate()
                .map(|(own, row)| locate(own, row))
                .collect()
        }
    }

    #[cfg(any(debug_assertions, feature = "strict-invariants"))]
    fn debug_assert_synced(&self) {
        for (e, row) in self.forward.rows().enumerate() {
            for (k, &n) in row.iter().enumerate() {
                let pos = self.element_positions[e][k];
                debug_assert_eq!(
                    self.inverse.rows[n].get(pos).copied(),
                    Some(e),
                    "inverse position table out of sync at ({e}, {k})"
                );
            }
        }
    }

    // --- views ------------------------------------------------------------

    /// The inverse (node → elements) relation, synchronized.
    pub fn inverse(&mut self) -> &OneToMany {
        self.ensure_synced();
        &self.inverse
    }

    /// Elements whose row contains node `n`, ascending. Out-of-range
    /// nodes yield an empty slice.
    pub fn elements_of_node(&mut self, n: NodeId) -> &[ElementId] {
        self.ensure_synced();
        self.inverse.rows.get(n).map_or(&[], Vec::as_slice)
    }

    /// Positions of element `e` inside the inverse rows of its nodes.
    pub fn element_positions(&mut self, e: ElementId) -> Result<&[usize], RelationError> {
        self.ensure_synced();
        if e >= self.element_positions.len() {
            return Err(RelationError::ElementOutOfBounds {
                element: e,
                len: self.element_positions.len(),
            });
        }
        Ok(&self.element_positions[e])
    }

    /// Positions of node `n` inside the forward rows of its elements.
    /// Out-of-range nodes yield an empty slice.
    pub fn node_positions(&mut self, n: NodeId) -> &[usize] {
        self.ensure_synced();
        self.node_positions.get(n).map_or(&[], Vec::as_slice)
    }

    // --- queries ----------------------------------------------------------

    /// Elements whose row is a superset of `nodes`, ascending.
    ///
    /// Intersects the inverse rows of the given nodes, short-circuiting as
    /// soon as the running intersection is empty. Any out-of-range node
    /// (and an empty `nodes` list) yields an empty result.
    pub fn elements_with_nodes(&mut self, nodes: &[NodeId]) -> Vec<ElementId> {
        self.ensure_synced();
        let Some((&first, rest)) = nodes.split_first() else {
            return Vec::new();
        };
        let mut acc: Vec<ElementId> = match self.inverse.rows.get(first) {
            Some(row) if !row.is_empty() => row.clone(),
            _ => return Vec::new(),
        };
        for &n in rest {
            let row: &[usize] = self.inverse.rows.get(n).map_or(&[], Vec::as_slice);
            acc = ordered::intersection(&acc, row);
            if acc.is_empty() {
                return acc;
            }
        }
        acc
    }

    /// Elements whose row is *exactly* the given node set: the subset of
    /// [`elements_with_nodes`](Self::elements_with_nodes) whose row holds
    /// `nodes.len()` entries.
    pub fn elements_from_nodes(&mut self, nodes: &[NodeId]) -> Vec<ElementId> {
        let mut found = self.elements_with_nodes(nodes);
        found.retain(|&e| self.forward.rows[e].len() == nodes.len());
        found
    }

    /// Elements sharing at least one node with `e`, ascending, without
    /// `e` itself.
    pub fn element_neighbours(&mut self, e: ElementId) -> Result<Vec<ElementId>, RelationError> {
        self.ensure_synced();
        if e >= self.forward.len() {
            return Err(RelationError::ElementOutOfBounds {
                element: e,
                len: self.forward.len(),
            });
        }
        let mut out = Vec::new();
        for &n in &self.forward.rows[e] {
            if let Some(row) = self.inverse.rows.get(n) {
                out.extend_from_slice(row);
            }
        }
        ordered::sort_unique(&mut out);
        out.retain(|&other| other != e);
        Ok(out)
    }

    /// Nodes sharing at least one element with `n`, ascending, without
    /// `n` itself. Out-of-range nodes yield an empty result.
    pub fn node_neighbours(&mut self, n: NodeId) -> Vec<NodeId> {
        self.ensure_synced();
        let mut out = Vec::new();
        let elements: &[usize] = self.inverse.rows.get(n).map_or(&[], Vec::as_slice);
        for &e in elements {
            out.extend_from_slice(&self.forward.rows[e]);
        }
        ordered::sort_unique(&mut out);
        out.retain(|&other| other != n);
        out
    }

    /// The element-sharing-a-node graph: `forward * inverse`.
    pub fn elements_to_elements(&mut self) -> OneToMany {
        self.ensure_synced();
        self.forward.multiply(&self.inverse)
    }

    /// The node-sharing-an-element graph: `inverse * forward`.
    pub fn nodes_to_nodes(&mut self) -> OneToMany {
        self.ensure_synced();
        self.inverse.multiply(&self.forward)
    }

    /// Dense per-element clique expansion over the synchronized inverse.
    pub fn cliques(&mut self) -> OneToMany {
        self.ensure_synced();
        crate::algs::cliques(&self.forward, &self.inverse)
    }

    // --- mutation (delegated, with invalidation) ---------------------------

    /// Appends a row and returns its element id.
    pub fn push_row(&mut self, row: Vec<NodeId>) -> ElementId {
        self.invalidate_cache();
        self.forward.push_row(row)
    }

    /// Appends every row of `rows` in order.
    pub fn extend_rows<I: IntoIterator<Item = Vec<NodeId>>>(&mut self, rows: I) {
        self.invalidate_cache();
        self.forward.extend_rows(rows);
    }

    /// Appends `n` to the row of element `e`.
    pub fn push_node(&mut self, e: ElementId, n: NodeId) -> Result<(), RelationError> {
        self.forward.push_node(e, n)?;
        self.invalidate_cache();
        Ok(())
    }

    /// Removes the first occurrence of `n` from the row of element `e`.
    pub fn remove_node(&mut self, e: ElementId, n: NodeId) -> Result<bool, RelationError> {
        let removed = self.forward.remove_node(e, n)?;
        self.invalidate_cache();
        Ok(removed)
    }

    /// Empties the row of element `e`.
    pub fn clear_row(&mut self, e: ElementId) -> Result<(), RelationError> {
        self.forward.clear_row(e)?;
        self.invalidate_cache();
        Ok(())
    }

    /// Replaces the row of element `e` wholesale.
    pub fn replace_row(&mut self, e: ElementId, row: Vec<NodeId>) -> Result<(), RelationError> {
        self.forward.replace_row(e, row)?;
        self.invalidate_cache();
        Ok(())
    }

    /// See [`OneToMany::compress_elements`].
    pub fn compress_elements(&mut self, new_to_old: &[ElementId]) {
        self.invalidate_cache();
        self.forward.compress_elements(new_to_old);
    }

    /// See [`OneToMany::permute_elements`].
    pub fn permute_elements(&mut self, old_to_new: &[ElementId]) {
        self.invalidate_cache();
        self.forward.permute_elements(old_to_new);
    }

    /// See [`OneToMany::permute_nodes`].
    pub fn permute_nodes(&mut self, old_to_new: &[Option<NodeId>]) {
        self.invalidate_cache();
        self.forward.permute_nodes(old_to_new);
    }

    /// See [`OneToMany::rearrange_after_renumbering`].
    pub fn rearrange_after_renumbering(
        &mut self,
        new_to_old: &[ElementId],
        old_to_new: &[Option<NodeId>],
    ) {
        self.invalidate_cache();
        self.forward.rearrange_after_renumbering(new_to_old, old_to_new);
    }

    /// Removes every element and drops the cached views.
    pub fn clear_all(&mut self) {
        self.forward.clear_all();
        self.inverse = OneToMany::new();
        self.element_positions.clear();
        self.node_positions.clear();
        self.in_sync = true;
    }
}

impl InvalidateCache for ManyToMany {
    #[inline]
    fn invalidate_cache(&mut self) {
        self.in_sync = false;
    }
}

impl From<OneToMany> for ManyToMany {
    fn from(forward: OneToMany) -> Self {
        let in_sync = forward.is_empty();
        Self {
            forward,
            inverse: OneToMany::new(),
            element_positions: Vec::new(),
            node_positions: Vec::new(),
            in_sync,
            batch: false,
        }
    }
}

impl PartialEq for ManyToMany {
    /// Equality is over the forward adjacency only; views are derived.
    fn eq(&self, other: &Self) -> bool {
        self.forward == other.forward
    }
}

impl Eq for ManyToMany {}
