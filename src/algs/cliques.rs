//! Dense per-element clique expansion.
//!
//! For every element, its node list is mapped to compact ids and the full
//! `|nodes|²` Cartesian self-product is emitted row-major, flattened as
//! `(x, y)` id pairs. Mesh workloads use this as the element-local
//! connectivity stencil (each element couples all of its nodes with all of
//! its nodes), which is why the diagonal and both orientations of every
//! pair are kept rather than reduced to the `n·(n−1)/2` edge list.
//!
//! Compact ids come from the inverse relation: node `n` gets the rank of
//! `n` among the nodes with a non-empty inverse row, i.e. the sorted-unique
//! enumeration of every node that actually occurs.

use rayon::prelude::*;

use crate::perf::{acquire_scratch, release_scratch};
use crate::relation::{OneToMany, PAR_THRESHOLD};

/// Expand each element of `forward` into its dense node clique.
///
/// `inverse` must be the transpose of `forward` (as maintained by
/// [`ManyToMany`]); nodes without an inverse row are skipped.
///
/// [`ManyToMany`]: crate::relation::ManyToMany
pub fn cliques(forward: &OneToMany, inverse: &OneToMany) -> OneToMany {
    // Rank occupied inverse rows: compact[n] = #occupied rows before n.
    let mut compact = Vec::with_capacity(inverse.len());
    let mut rank = 0usize;
    for row in inverse.rows() {
        if row.is_empty() {
            compact.push(None);
        } else {
            compact.push(Some(rank));
            rank += 1;
        }
    }

    let expand = |row: &[usize]| -> Vec<usize> {
        let mut ids = acquire_scratch();
        ids.extend(row.iter().filter_map(|&n| compact.get(n).copied().flatten()));
        let mut out = Vec::with_capacity(2 * ids.len() * ids.len());
        for &x in &ids {
            for &y in &ids {
                out.push(x);
                out.push(y);
            }
        }
        release_scratch(ids);
        out
    };

    let rows = if forward.len() >= PAR_THRESHOLD {
        forward.rows.par_iter().map(|row| expand(row)).collect()
    } else {
        forward.rows().map(expand).collect()
    };
    OneToMany::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_each_element_to_its_dense_pair_block() {
        let forward = OneToMany::from_rows(vec![vec![5, 7], vec![7]]);
        let inverse = forward.transpose();
        let c = cliques(&forward, &inverse);
        // occupied inverse rows: 5 -> 0, 7 -> 1
        assert_eq!(&c[0], &[0, 0, 0, 1, 1, 0, 1, 1]);
        assert_eq!(&c[1], &[1, 1]);
    }

    #[test]
    fn empty_rows_expand_to_empty_cliques() {
        let forward = OneToMany::from_rows(vec![vec![], vec![0]]);
        let inverse = forward.transpose();
        let c = cliques(&forward, &inverse);
        assert!(c[0].is_empty());
        assert_eq!(&c[1], &[0, 0]);
    }

    #[test]
    fn nodes_without_inverse_rows_are_skipped() {
        let forward = OneToMany::from_rows(vec![vec![0, 9]]);
        let inverse = OneToMany::from_rows(vec![vec![0]]);
        let c = cliques(&forward, &inverse);
        assert_eq!(&c[0], &[0, 0]);
    }

    #[test]
    fn clique_row_count_matches_forward() {
        let forward = OneToMany::from_rows(vec![vec![1, 2, 3]]);
        let inverse = forward.transpose();
        let c = cliques(&forward, &inverse);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].len(), 2 * 9);
    }
}
