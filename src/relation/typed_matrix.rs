//! [`TypedMatrix`]: a `T×T` grid of [`ManyToMany`] relations over typed
//! entities, with cascading mark-and-sweep deletion.
//!
//! Cell `(i, j)` models "elements of type `i` are made of nodes of type
//! `j`". The diagonal cell `(t, t)` carries the canonical self-list of the
//! entities of type `t`; its row count is the entity count of that type.
//! All `T²` cells exist for the whole lifetime of the matrix and every
//! call validates its type indices.
//!
//! Deletion is two-phased: [`mark_to_erase`](TypedMatrix::mark_to_erase)
//! walks the cross-type relations and transitively marks every element
//! that references a marked entity; a single
//! [`compress`](TypedMatrix::compress) then renumbers all surviving ids
//! densely across every cell at once, leaving no dangling references.

use crate::algs::renumber::{RenumberMaps, renumber_surviving};
use crate::error::RelationError;
use crate::perf::FastSet;

use super::{ElementId, ManyToMany, NodeId, OneToMany};

/// A fixed `T×T` matrix of element→node relations between typed entities.
///
/// # Example
/// ```rust
/// use incidence::relation::TypedMatrix;
/// let mut m = TypedMatrix::new(2).unwrap();
/// // two type-0 elements built from type-1 nodes
/// m.cell_mut(0, 1).unwrap().extend_rows(vec![vec![0, 1], vec![1, 2]]);
/// m.mark_to_erase(1, 1).unwrap();
/// m.compress();
/// assert_eq!(m.cell(0, 1).unwrap().len(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct TypedMatrix {
    types: usize,
    /// Row-major `types × types` grid.
    cells: Vec<ManyToMany>,
    /// Ids scheduled for deletion, partitioned by type.
    marked: Vec<FastSet<usize>>,
}

impl TypedMatrix {
    /// Allocates a matrix over `types` entity types, every cell empty.
    ///
    /// # Errors
    /// [`RelationError::ZeroTypes`] when `types == 0`.
    pub fn new(types: usize) -> Result<Self, RelationError> {
        if types == 0 {
            return Err(RelationError::ZeroTypes);
        }
        Ok(Self {
            types,
            cells: (0..types * types).map(|_| ManyToMany::new()).collect(),
            marked: vec![FastSet::default(); types],
        })
    }

    /// Number of entity types.
    #[inline]
    pub fn types(&self) -> usize {
        self.types
    }

    #[inline]
    fn check_type(&self, index: usize) -> Result<(), RelationError> {
        if index < self.types {
            Ok(())
        } else {
            Err(RelationError::TypeOutOfBounds {
                index,
                types: self.types,
            })
        }
    }

    #[inline]
    fn idx(&self, i: usize, j: usize) -> usize {
        i * self.types + j
    }

    /// The relation from type-`i` elements to type-`j` nodes.
    pub fn cell(&self, i: usize, j: usize) -> Result<&ManyToMany, RelationError> {
        self.check_type(i)?;
        self.check_type(j)?;
        Ok(&self.cells[self.idx(i, j)])
    }

    /// Mutable access to the relation from type-`i` elements to type-`j`
    /// nodes.
    pub fn cell_mut(&mut self, i: usize, j: usize) -> Result<&mut ManyToMany, RelationError> {
        self.check_type(i)?;
        self.check_type(j)?;
        let idx = self.idx(i, j);
        Ok(&mut self.cells[idx])
    }

    // --- cross-type queries ------------------------------------------------

    /// Every `(elem_type, elem)` with `elem_type != node_type` whose row in
    /// cell `(elem_type, node_type)` contains `node`. Sorted.
    pub fn all_elements_of_node(
        &mut self,
        node_type: usize,
        node: NodeId,
    ) -> Result<Vec<(usize, ElementId)>, RelationError> {
        self.check_type(node_type)?;
        let types = self.types;
        let mut out = Vec::new();
        for elem_type in 0..types {
            if elem_type == node_type {
                continue;
            }
            let idx = elem_type * types + node_type;
            for &e in self.cells[idx].elements_of_node(node) {
                out.push((elem_type, e));
            }
        }
        Ok(out)
    }

    /// Every `(node_type, node)` appearing in the row of `elem` across all
    /// cells of grid row `elem_type`. Sorted and deduplicated.
    pub fn all_nodes_of_element(
        &mut self,
        elem_type: usize,
        elem: ElementId,
    ) -> Result<Vec<(usize, NodeId)>, RelationError> {
        self.check_type(elem_type)?;
        let types = self.types;
        let mut out = Vec::new();
        for node_type in 0..types {
            let cell = &self.cells[elem_type * types + node_type];
            if let Ok(row) = cell.row(elem) {
                out.extend(row.iter().map(|&n| (node_type, n)));
            }
        }
        crate::algs::ordered::sort_unique(&mut out);
        Ok(out)
    }

    /// Union of [`all_elements_of_node`](Self::all_elements_of_node) over
    /// every node of `node_type`: the `(elem_type, elem)` pairs whose cell
    /// row references any node of that type. Sorted, deduplicated.
    pub fn all_elements_for_type(
        &mut self,
        node_type: usize,
    ) -> Result<Vec<(usize, ElementId)>, RelationError> {
        self.check_type(node_type)?;
        let types = self.types;
        let mut out = Vec::new();
        for elem_type in 0..types {
            if elem_type == node_type {
                continue;
            }
            let cell = &self.cells[elem_type * types + node_type];
            for (e, row) in cell.forward().rows().enumerate() {
                if !row.is_empty() {
                    out.push((elem_type, e));
                }
            }
        }
        Ok(out)
    }

    /// Union of [`all_nodes_of_element`](Self::all_nodes_of_element) over
    /// every element of `elem_type`. Sorted, deduplicated.
    pub fn all_nodes_for_type(
        &mut self,
        elem_type: usize,
    ) -> Result<Vec<(usize, NodeId)>, RelationError> {
        self.check_type(elem_type)?;
        let types = self.types;
        let mut out = Vec::new();
        for node_type in 0..types {
            let cell = &self.cells[elem_type * types + node_type];
            for row in cell.forward().rows() {
                out.extend(row.iter().map(|&n| (node_type, n)));
            }
        }
        crate::algs::ordered::sort_unique(&mut out);
        Ok(out)
    }

    /// Entity count of `t`: the row count of the diagonal cell.
    pub fn element_count(&self, t: usize) -> Result<usize, RelationError> {
        self.check_type(t)?;
        Ok(self.cells[self.idx(t, t)].len())
    }

    /// Diagonal rows of `t` whose leading node is currently marked for
    /// erasure.
    pub fn marked_element_count(&self, t: usize) -> Result<usize, RelationError> {
        self.check_type(t)?;
        let marked = &self.marked[t];
        Ok(self.cells[self.idx(t, t)]
            .forward()
            .rows()
            .filter(|row| row.first().is_some_and(|n| marked.contains(n)))
            .count())
    }

    /// Ids of `t` currently marked for erasure, ascending.
    pub fn marked_for_erasure(&self, t: usize) -> Result<Vec<usize>, RelationError> {
        self.check_type(t)?;
        let mut ids: Vec<usize> = self.marked[t].iter().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    // --- type-level DAG ----------------------------------------------------

    /// The auxiliary relation over types: edge `i → j` iff cell `(i, j)`
    /// holds any element and `i != j`.
    pub fn type_relation(&self) -> OneToMany {
        let types = self.types;
        (0..types)
            .map(|i| {
                (0..types)
                    .filter(|&j| j != i && !self.cells[i * types + j].is_empty())
                    .collect()
            })
            .collect()
    }

    /// True iff the type relation has no cycle.
    pub fn are_types_acyclic(&self) -> bool {
        self.type_relation().is_acyclic()
    }

    /// Topological order of the type relation; the identity order when no
    /// cross-type cell is populated.
    pub fn type_topological_order(&self) -> Vec<usize> {
        let relation = self.type_relation();
        if relation.rows().all(<[usize]>::is_empty) {
            (0..self.types).collect()
        } else {
            relation.topological_order()
        }
    }

    // --- cascading deletion ------------------------------------------------

    /// Marks `(node_type, node)` for erasure and transitively marks every
    /// element, in any type, that references a marked entity.
    ///
    /// Already-marked entities return immediately; the marked sets double
    /// as the visited set of the traversal, so the walk terminates in
    /// linear work even on cyclic cross-type relations.
    pub fn mark_to_erase(&mut self, node_type: usize, node: NodeId) -> Result<(), RelationError> {
        self.check_type(node_type)?;
        if !self.marked[node_type].insert(node) {
            return Ok(());
        }
        let mut stack = vec![(node_type, node)];
        while let Some((t, id)) = stack.pop() {
            for (elem_type, elem) in self.all_elements_of_node(t, id)? {
                if self.marked[elem_type].insert(elem) {
                    stack.push((elem_type, elem));
                }
            }
        }
        Ok(())
    }

    /// Erases every marked entity and densely renumbers the survivors of
    /// each type across all cells at once. Survivor order is preserved;
    /// afterwards no cell refers to an erased id and all marked sets are
    /// empty.
    pub fn compress(&mut self) {
        let types = self.types;
        let maps: Vec<RenumberMaps> = (0..types)
            .map(|t| {
                let domain = self.type_domain(t);
                if domain == 0 {
                    RenumberMaps {
                        old_to_new: Vec::new(),
                        new_to_old: Vec::new(),
                    }
                } else {
                    renumber_surviving(domain - 1, self.marked[t].iter().copied())
                }
            })
            .collect();
        for i in 0..types {
            for j in 0..types {
                self.cells[i * types + j]
                    .rearrange_after_renumbering(&maps[i].new_to_old, &maps[j].old_to_new);
            }
        }
        for set in &mut self.marked {
            set.clear();
        }
    }

    /// Id domain of type `t`: wide enough to cover its element rows in
    /// grid row `t` and its node occurrences in grid column `t`.
    fn type_domain(&self, t: usize) -> usize {
        let types = self.types;
        let mut domain = 0;
        for j in 0..types {
            domain = domain.max(self.cells[t * types + j].len());
        }
        for i in 0..types {
            domain = domain.max(self.cells[i * types + t].forward().node_space());
        }
        domain
    }
}
