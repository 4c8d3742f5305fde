//! Compressed-sparse-row and dense boolean-matrix interop for
//! [`OneToMany`].
//!
//! The CSR export uses the standard two-array format: `row_ptr` of length
//! `len + 1` with `row_ptr[0] = 0` and `row_ptr[i+1] - row_ptr[i]` equal
//! to the length of row `i`; `col` is the concatenation of the rows in
//! element-id order, values preserved in source order.

use crate::error::RelationError;

use super::{NodeId, OneToMany};

/// Row-pointer / column-index export of a [`OneToMany`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CsrAdjacency {
    /// Offsets into `col`; monotone, `row_ptr[0] = 0`,
    /// `row_ptr[len] = col.len()`.
    pub row_ptr: Vec<usize>,
    /// Concatenated rows in element-id order.
    pub col: Vec<NodeId>,
}

impl CsrAdjacency {
    /// Number of rows described by the offsets.
    #[inline]
    pub fn len(&self) -> usize {
        self.row_ptr.len().saturating_sub(1)
    }

    /// True if there are no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The column slice of row `i`.
    #[inline]
    pub fn neighbors(&self, i: usize) -> &[NodeId] {
        &self.col[self.row_ptr[i]..self.row_ptr[i + 1]]
    }
}

impl OneToMany {
    /// Export as CSR.
    ///
    /// # Example
    /// ```rust
    /// use incidence::relation::OneToMany;
    /// let a = OneToMany::from_rows(vec![vec![0, 2], vec![1]]);
    /// let csr = a.to_csr();
    /// assert_eq!(csr.row_ptr, vec![0, 2, 3]);
    /// assert_eq!(csr.col, vec![0, 2, 1]);
    /// assert_eq!(OneToMany::from_csr(&csr).unwrap(), a);
    /// ```
    pub fn to_csr(&self) -> CsrAdjacency {
        let mut row_ptr = Vec::with_capacity(self.len() + 1);
        row_ptr.push(0);
        let mut col = Vec::with_capacity(self.rows().map(|r| r.len()).sum());
        for row in self.rows() {
            col.extend_from_slice(row);
            row_ptr.push(col.len());
        }
        CsrAdjacency { row_ptr, col }
    }

    /// Import from CSR.
    ///
    /// # Errors
    /// [`RelationError::MalformedCsr`] when the offsets are empty, do not
    /// start at zero, are not monotone, or do not end at `col.len()`.
    pub fn from_csr(csr: &CsrAdjacency) -> Result<Self, RelationError> {
        let ptr = &csr.row_ptr;
        if ptr.is_empty() {
            return Err(RelationError::MalformedCsr("row_ptr must not be empty"));
        }
        if ptr[0] != 0 {
            return Err(RelationError::MalformedCsr("row_ptr must start at 0"));
        }
        if ptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(RelationError::MalformedCsr("row_ptr must be monotone"));
        }
        if *ptr.last().unwrap() != csr.col.len() {
            return Err(RelationError::MalformedCsr(
                "row_ptr must end at col.len()",
            ));
        }
        let rows = ptr
            .windows(2)
            .map(|w| csr.col[w[0]..w[1]].to_vec())
            .collect();
        Ok(Self::from_rows(rows))
    }

    /// Dense boolean membership matrix of shape `len × (max_node + 1)`.
    pub fn to_boolean_matrix(&self) -> Vec<Vec<bool>> {
        let width = self.node_space();
        self.rows()
            .map(|row| {
                let mut dense = vec![false; width];
                for &n in row {
                    dense[n] = true;
                }
                dense
            })
            .collect()
    }

    /// Inverse of [`to_boolean_matrix`](Self::to_boolean_matrix): each row
    /// lists its true columns in ascending order.
    pub fn from_boolean_matrix(matrix: &[Vec<bool>]) -> Self {
        let rows = matrix
            .iter()
            .map(|dense| {
                dense
                    .iter()
                    .enumerate()
                    .filter_map(|(j, &set)| set.then_some(j))
                    .collect()
            })
            .collect();
        Self::from_rows(rows)
    }
}
