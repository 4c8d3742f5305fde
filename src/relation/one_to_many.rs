//! [`OneToMany`]: sparse row-indexed relation from elements to nodes.
//!
//! Rows are order-significant sequences of node ids; element ids are the
//! dense row indices `0..len`. Duplicates inside a row are tolerated by
//! construction (every operation copes with them) but rejected by
//! [`OneToMany::is_valid`]. The maximum node id is cached and the cache is
//! invalidated on every mutation.
//!
//! The algebraic operators live in [`super::algebra`], transposition in
//! [`super::transpose`], topological ordering in [`super::order`] and the
//! CSR/boolean-matrix interop in [`super::csr`].

use crate::algs::ordered;
use crate::cache::InvalidateCache;
use crate::error::RelationError;
use once_cell::sync::OnceCell;
use std::cmp::Ordering;

use super::{ElementId, NodeId};

/// A sparse, row-indexed relation from *elements* to *nodes*.
///
/// # Example
/// ```rust
/// use incidence::relation::OneToMany;
/// let mut rel = OneToMany::new();
/// let e = rel.push_row(vec![0, 2]);
/// assert_eq!(e, 0);
/// assert_eq!(rel.max_node(), Some(2));
/// ```
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OneToMany {
    pub(crate) rows: Vec<Vec<NodeId>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    max_node: OnceCell<Option<NodeId>>,
}

impl OneToMany {
    /// Creates a new, empty relation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty relation with room for `elements` rows.
    pub fn with_capacity(elements: usize) -> Self {
        Self {
            rows: Vec::with_capacity(elements),
            max_node: OnceCell::new(),
        }
    }

    /// Adopts an existing adjacency. The rows are moved in, not copied.
    pub fn from_rows(rows: Vec<Vec<NodeId>>) -> Self {
        Self {
            rows,
            max_node: OnceCell::new(),
        }
    }

    /// Number of elements (rows).
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the relation has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The nodes of element `e`.
    ///
    /// # Errors
    /// [`RelationError::ElementOutOfBounds`] if `e >= len`.
    #[inline]
    pub fn row(&self, e: ElementId) -> Result<&[NodeId], RelationError> {
        self.rows.get(e).map(Vec::as_slice).ok_or_else(|| self.oob(e))
    }

    /// Iterator over all rows in element-id order.
    #[inline]
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[NodeId]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Largest node id appearing in any row, or `None` if no row holds a
    /// node. Cached; recomputed lazily after mutations.
    #[inline]
    pub fn max_node(&self) -> Option<NodeId> {
        *self
            .max_node
            .get_or_init(|| self.rows.iter().flatten().copied().max())
    }

    /// `max_node + 1`, or `0` when the relation holds no nodes.
    #[inline]
    pub fn node_space(&self) -> usize {
        self.max_node().map_or(0, |m| m + 1)
    }

    /// Joint vertex space covering both element and node ids:
    /// `max(len, max_node + 1)`.
    #[inline]
    pub(crate) fn vertex_space(&self) -> usize {
        self.len().max(self.node_space())
    }

    /// True if no row contains a duplicate node.
    pub fn is_valid(&self) -> bool {
        use crate::perf::FastSet;
        let mut seen: FastSet<NodeId> = FastSet::default();
        self.rows.iter().all(|row| {
            seen.clear();
            row.iter().all(|&n| seen.insert(n))
        })
    }

    #[inline]
    fn oob(&self, e: ElementId) -> RelationError {
        RelationError::ElementOutOfBounds {
            element: e,
            len: self.rows.len(),
        }
    }

    // --- mutation ---------------------------------------------------------

    /// Appends a row and returns its element id.
    pub fn push_row(&mut self, row: Vec<NodeId>) -> ElementId {
        self.invalidate_cache();
        self.rows.push(row);
        self.rows.len() - 1
    }

    /// Appends every row of `rows` in order.
    pub fn extend_rows<I: IntoIterator<Item = Vec<NodeId>>>(&mut self, rows: I) {
        self.invalidate_cache();
        self.rows.extend(rows);
    }

    /// Appends `n` to the row of element `e`.
    pub fn push_node(&mut self, e: ElementId, n: NodeId) -> Result<(), RelationError> {
        if e >= self.rows.len() {
            return Err(self.oob(e));
        }
        self.invalidate_cache();
        self.rows[e].push(n);
        Ok(())
    }

    /// Removes the first occurrence of `n` from the row of element `e`.
    /// Returns whether anything was removed.
    pub fn remove_node(&mut self, e: ElementId, n: NodeId) -> Result<bool, RelationError> {
        if e >= self.rows.len() {
            return Err(self.oob(e));
        }
        self.invalidate_cache();
        match self.rows[e].iter().position(|&v| v == n) {
            Some(pos) => {
                self.rows[e].remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Empties the row of element `e` (the element itself stays).
    pub fn clear_row(&mut self, e: ElementId) -> Result<(), RelationError> {
        if e >= self.rows.len() {
            return Err(self.oob(e));
        }
        self.invalidate_cache();
        self.rows[e].clear();
        Ok(())
    }

    /// Replaces the row of element `e` wholesale.
    pub fn replace_row(&mut self, e: ElementId, row: Vec<NodeId>) -> Result<(), RelationError> {
        if e >= self.rows.len() {
            return Err(self.oob(e));
        }
        self.invalidate_cache();
        self.rows[e] = row;
        Ok(())
    }

    /// Removes every element.
    pub fn clear_all(&mut self) {
        self.invalidate_cache();
        self.rows.clear();
    }

    // --- renumbering ------------------------------------------------------

    /// Rebuilds the adjacency so that new index `k` holds the row at old
    /// index `new_to_old[k]`. Out-of-range and repeated old indices are
    /// skipped; each old row is consumed at most once.
    pub fn compress_elements(&mut self, new_to_old: &[ElementId]) {
        self.invalidate_cache();
        let mut old: Vec<Option<Vec<NodeId>>> =
            std::mem::take(&mut self.rows).into_iter().map(Some).collect();
        let mut rows = Vec::with_capacity(new_to_old.len().min(old.len()));
        for &o in new_to_old {
            if let Some(slot) = old.get_mut(o)
                && let Some(row) = slot.take()
            {
                rows.push(row);
            }
        }
        self.rows = rows;
    }

    /// Reorders rows so that old index `i` ends at position `old_to_new[i]`.
    ///
    /// If `old_to_new` is not a valid permutation of `[0, len)`, the map is
    /// reinterpreted as a compress map (`new_to_old`) and the call degrades
    /// to [`compress_elements`](Self::compress_elements) semantics.
    pub fn permute_elements(&mut self, old_to_new: &[ElementId]) {
        if !self.is_permutation_map(old_to_new) {
            self.compress_elements(old_to_new);
            return;
        }
        self.invalidate_cache();
        let old = std::mem::take(&mut self.rows);
        let mut rows = vec![Vec::new(); old.len()];
        for (i, row) in old.into_iter().enumerate() {
            rows[old_to_new[i]] = row;
        }
        self.rows = rows;
    }

    fn is_permutation_map(&self, old_to_new: &[ElementId]) -> bool {
        if old_to_new.len() != self.rows.len() {
            return false;
        }
        let mut hit = vec![false; old_to_new.len()];
        old_to_new.iter().all(|&v| {
            v < hit.len() && !std::mem::replace(&mut hit[v], true)
        })
    }

    /// Remaps every node `v` to `old_to_new[v]` where a mapping exists.
    /// Values past the end of the map, and values mapped to `None`, are
    /// left untouched.
    pub fn permute_nodes(&mut self, old_to_new: &[Option<NodeId>]) {
        self.invalidate_cache();
        for row in &mut self.rows {
            for v in row.iter_mut() {
                if let Some(&Some(n)) = old_to_new.get(*v) {
                    *v = n;
                }
            }
        }
    }

    /// Compress the element axis, then remap the node axis: the joint
    /// renumbering step after a kill-list pass.
    pub fn rearrange_after_renumbering(
        &mut self,
        new_to_old: &[ElementId],
        old_to_new: &[Option<NodeId>],
    ) {
        self.compress_elements(new_to_old);
        self.permute_nodes(old_to_new);
    }

    // --- ordering ---------------------------------------------------------

    /// True iff `self` and `other` hold the same multiset of rows
    /// (compared as ordered sequences).
    pub fn is_permutation_of(&self, other: &OneToMany) -> bool {
        if self.rows.len() != other.rows.len() {
            return false;
        }
        let sorted = |rel: &OneToMany| {
            let mut idx: Vec<usize> = (0..rel.rows.len()).collect();
            idx.sort_unstable_by(|&a, &b| ordered::compare(&rel.rows[a], &rel.rows[b]));
            idx
        };
        let (a, b) = (sorted(self), sorted(other));
        a.iter()
            .zip(&b)
            .all(|(&i, &j)| self.rows[i] == other.rows[j])
    }
}

impl InvalidateCache for OneToMany {
    #[inline]
    fn invalidate_cache(&mut self) {
        self.max_node.take();
    }
}

impl From<Vec<Vec<NodeId>>> for OneToMany {
    fn from(rows: Vec<Vec<NodeId>>) -> Self {
        Self::from_rows(rows)
    }
}

impl FromIterator<Vec<NodeId>> for OneToMany {
    fn from_iter<I: IntoIterator<Item = Vec<NodeId>>>(iter: I) -> Self {
        Self::from_rows(iter.into_iter().collect())
    }
}

impl std::ops::Index<ElementId> for OneToMany {
    type Output = [NodeId];
    #[inline]
    fn index(&self, e: ElementId) -> &[NodeId] {
        &self.rows[e]
    }
}

impl PartialEq for OneToMany {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl Eq for OneToMany {}

/// Lexicographic over rows: row count first, then row-wise comparison
/// (element-wise, ties broken by row length).
impl Ord for OneToMany {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rows
            .len()
            .cmp(&other.rows.len())
            .then_with(|| {
                for (a, b) in self.rows.iter().zip(&other.rows) {
                    match ordered::compare(a, b) {
                        Ordering::Equal => continue,
                        o => return o,
                    }
                }
                Ordering::Equal
            })
    }
}

impl PartialOrd for OneToMany {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn json_round_trip_rebuilds_the_cache() -> Result<(), Box<dyn std::error::Error>> {
        let a = OneToMany::from_rows(vec![vec![0, 2], vec![1]]);
        let s = serde_json::to_string(&a)?;
        let b: OneToMany = serde_json::from_str(&s)?;
        assert_eq!(b, a);
        assert_eq!(b.max_node(), Some(2));
        Ok(())
    }
}
