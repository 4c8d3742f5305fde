//! Transposition of a [`OneToMany`] relation.
//!
//! The transpose of an element→node relation is the node→element relation:
//! row `n` of the result lists every element `e` with `n ∈ rows[e]`, in
//! ascending `e` order. The result has `max(len, max_node + 1)` rows so
//! that both the element and the node id space survive a round trip.
//!
//! Below the parallel workload threshold the serial two-pass (count, fill)
//! construction is used; above it, rows are accumulated in parallel behind
//! per-target mutexes and then sorted, which restores the ascending order
//! the sequential scan produces for free.

use parking_lot::Mutex;
use rayon::prelude::*;

use super::{ElementId, OneToMany, PAR_THRESHOLD};

impl OneToMany {
    /// Transpose: row `n` of the result lists the elements whose row
    /// contains `n`, ascending.
    ///
    /// # Example
    /// ```rust
    /// use incidence::relation::OneToMany;
    /// let a = OneToMany::from_rows(vec![vec![0, 2], vec![1], vec![0, 1, 2]]);
    /// let t = a.transpose();
    /// assert_eq!(t.len(), 3);
    /// assert_eq!(&t[0], &[0, 2]);
    /// assert_eq!(&t[1], &[1, 2]);
    /// assert_eq!(&t[2], &[0, 2]);
    /// ```
    pub fn transpose(&self) -> OneToMany {
        if self.len() >= PAR_THRESHOLD {
            self.transpose_parallel()
        } else {
            self.transpose_serial()
        }
    }

    fn transpose_serial(&self) -> OneToMany {
        let targets = self.vertex_space();
        let mut counts = vec![0usize; targets];
        for row in self.rows() {
            for &n in row {
                counts[n] += 1;
            }
        }
        let mut out: Vec<Vec<ElementId>> =
            counts.iter().map(|&c| Vec::with_capacity(c)).collect();
        for (e, row) in self.rows().enumerate() {
            for &n in row {
                out[n].push(e);
            }
        }
        OneToMany::from_rows(out)
    }

    fn transpose_parallel(&self) -> OneToMany {
        let targets = self.vertex_space();
        let slots: Vec<Mutex<Vec<ElementId>>> =
            (0..targets).map(|_| Mutex::new(Vec::new())).collect();
        self.rows.par_iter().enumerate().for_each(|(e, row)| {
            for &n in row {
                slots[n].lock().push(e);
            }
        });
        let mut out: Vec<Vec<ElementId>> =
            slots.into_iter().map(|m| m.into_inner()).collect();
        // Chunk scheduling is nondeterministic; restore ascending element order.
        out.par_iter_mut().for_each(|row| row.sort_unstable());
        OneToMany::from_rows(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transpose_of_empty_is_empty() {
        let a = OneToMany::new();
        assert!(a.transpose().is_empty());
    }

    #[test]
    fn transpose_round_trip_sorts_rows() {
        let a = OneToMany::from_rows(vec![vec![2, 0], vec![1], vec![2, 0, 1]]);
        let tt = a.transpose().transpose();
        assert_eq!(tt.len(), 3);
        assert_eq!(&tt[0], &[0, 2]);
        assert_eq!(&tt[1], &[1, 2]);
        assert_eq!(&tt[2], &[0, 2]);
    }

    #[test]
    fn transpose_covers_both_id_spaces() {
        // 1 element, nodes up to 3: transpose must have 4 rows.
        let a = OneToMany::from_rows(vec![vec![3]]);
        let t = a.transpose();
        assert_eq!(t.len(), 4);
        assert_eq!(&t[3], &[0]);
        assert!(t[0].is_empty());

        // 3 elements, nodes only up to 0: transpose keeps 3 rows.
        let b = OneToMany::from_rows(vec![vec![0], vec![], vec![0]]);
        let t = b.transpose();
        assert_eq!(t.len(), 3);
        assert_eq!(&t[0], &[0, 2]);
    }

    #[test]
    fn parallel_path_matches_serial() {
        let a = crate::algs::random::random_one_to_many(PAR_THRESHOLD + 50, 64, 0.05, Some(11));
        assert_eq!(a.transpose_parallel(), a.transpose_serial());
    }

    #[test]
    fn duplicate_nodes_produce_duplicate_elements() {
        let a = OneToMany::from_rows(vec![vec![1, 1]]);
        let t = a.transpose();
        assert_eq!(&t[1], &[0, 0]);
    }
}
