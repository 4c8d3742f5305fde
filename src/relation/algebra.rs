//! Boolean algebra over [`OneToMany`] relations.
//!
//! All operations produce new relations. Row results follow the
//! "left-first, then right-additions" ordering rule: elements of the left
//! row in source order (deduplicated), then unseen elements of the right
//! row. The symbolic product `a * b` unions `b`'s rows over the left row's
//! entries; its row order is the left-to-right first-seen order, identical
//! on the serial and parallel paths.
//!
//! Membership testing uses a pooled bitset while the node domain fits
//! [`BITSET_DOMAIN_MAX`], and a `FastSet` beyond it.

use rayon::prelude::*;
use std::mem;
use std::ops::{Add, BitAnd, BitOr, BitXor, Mul, Sub};

use crate::perf::{FastSet, acquire_scratch, release_scratch};

use super::{NodeId, OneToMany, PAR_THRESHOLD};

/// Largest node domain served by the bitset membership path.
const BITSET_DOMAIN_MAX: usize = 4096;

const BITS: usize = usize::BITS as usize;

/// Per-row membership scratch: bitset for small domains, hash set
/// otherwise. Bitset blocks come from the shared scratch pool and return
/// to it on drop.
pub(crate) enum MembershipSet {
    Bits { blocks: Vec<usize> },
    Hash(FastSet<NodeId>),
}

impl MembershipSet {
    pub(crate) fn new(domain: usize) -> Self {
        if domain <= BITSET_DOMAIN_MAX {
            let mut blocks = acquire_scratch();
            blocks.resize(domain.div_ceil(BITS), 0);
            MembershipSet::Bits { blocks }
        } else {
            MembershipSet::Hash(FastSet::default())
        }
    }

    #[inline]
    pub(crate) fn contains(&self, n: NodeId) -> bool {
        match self {
            MembershipSet::Bits { blocks } => blocks[n / BITS] & (1 << (n % BITS)) != 0,
            MembershipSet::Hash(set) => set.contains(&n),
        }
    }

    /// Returns true when `n` was not yet present.
    #[inline]
    pub(crate) fn insert(&mut self, n: NodeId) -> bool {
        match self {
            MembershipSet::Bits { blocks } => {
                let (block, bit) = (n / BITS, 1 << (n % BITS));
                let fresh = blocks[block] & bit == 0;
                blocks[block] |= bit;
                fresh
            }
            MembershipSet::Hash(set) => set.insert(n),
        }
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        match self {
            MembershipSet::Bits { blocks } => blocks.fill(0),
            MembershipSet::Hash(set) => set.clear(),
        }
    }
}

impl Drop for MembershipSet {
    fn drop(&mut self) {
        if let MembershipSet::Bits { blocks } = self {
            release_scratch(mem::take(blocks));
        }
    }
}

#[inline]
fn union_row(a: &[NodeId], b: &[NodeId], seen: &mut MembershipSet) -> Vec<NodeId> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    for &v in a.iter().chain(b) {
        if seen.insert(v) {
            out.push(v);
        }
    }
    seen.clear();
    out
}

#[inline]
fn intersection_row(
    a: &[NodeId],
    b: &[NodeId],
    in_b: &mut MembershipSet,
    emitted: &mut MembershipSet,
) -> Vec<NodeId> {
    for &v in b {
        in_b.insert(v);
    }
    let mut out = Vec::new();
    for &v in a {
        if in_b.contains(v) && emitted.insert(v) {
            out.push(v);
        }
    }
    in_b.clear();
    emitted.clear();
    out
}

#[inline]
fn difference_row(
    a: &[NodeId],
    b: &[NodeId],
    in_b: &mut MembershipSet,
    emitted: &mut MembershipSet,
) -> Vec<NodeId> {
    for &v in b {
        in_b.insert(v);
    }
    let mut out = Vec::new();
    for &v in a {
        if !in_b.contains(v) && emitted.insert(v) {
            out.push(v);
        }
    }
    in_b.clear();
    emitted.clear();
    out
}

#[inline]
fn empty_padded(rel: &OneToMany, i: usize) -> &[NodeId] {
    rel.rows.get(i).map_or(&[], Vec::as_slice)
}

impl OneToMany {
    /// Symbolic boolean matrix product: row `i` of the result is the
    /// deduplicated union of `rhs`'s rows selected by `self`'s row `i`.
    ///
    /// Entries of `self` that do not index a row of `rhs` contribute
    /// nothing; when `self.max_node() < rhs.len()` the bounds checks are
    /// skipped entirely.
    ///
    /// # Example
    /// ```rust
    /// use incidence::relation::OneToMany;
    /// let a = OneToMany::from_rows(vec![vec![0, 1], vec![2]]);
    /// let b = OneToMany::from_rows(vec![vec![10], vec![10, 20], vec![30]]);
    /// let p = a.multiply(&b);
    /// assert_eq!(&p[0], &[10, 20]);
    /// assert_eq!(&p[1], &[30]);
    /// ```
    pub fn multiply(&self, rhs: &OneToMany) -> OneToMany {
        let in_bounds = self.max_node().is_none_or(|m| m < rhs.len());
        let domain = rhs.node_space();
        let build = |seen: &mut MembershipSet, row: &[NodeId]| -> Vec<NodeId> {
            let mut out = Vec::new();
            for &m in row {
                if !in_bounds && m >= rhs.len() {
                    continue;
                }
                for &v in &rhs.rows[m] {
                    if seen.insert(v) {
                        out.push(v);
                    }
                }
            }
            seen.clear();
            out
        };
        let rows = if self.len() >= PAR_THRESHOLD {
            self.rows
                .par_iter()
                .map_init(
                    || MembershipSet::new(domain),
                    |seen, row| build(seen, row),
                )
                .collect()
        } else {
            let mut seen = MembershipSet::new(domain);
            self.rows.iter().map(|row| build(&mut seen, row)).collect()
        };
        OneToMany::from_rows(rows)
    }

    /// Row-wise union over `0..max(len, rhs.len())`; short sides pair with
    /// empty rows. Left row order first, then unseen right entries.
    pub fn union(&self, rhs: &OneToMany) -> OneToMany {
        let count = self.len().max(rhs.len());
        let domain = self.node_space().max(rhs.node_space());
        self.zip_rows(rhs, count, domain, union_row)
    }

    /// Row-wise intersection over `0..min(len, rhs.len())`, in the left
    /// row's order, deduplicated.
    pub fn intersection(&self, rhs: &OneToMany) -> OneToMany {
        let count = self.len().min(rhs.len());
        let domain = self.node_space().max(rhs.node_space());
        self.zip_rows2(rhs, count, domain, intersection_row)
    }

    /// Row-wise difference over `0..len`, preserving the left row's order,
    /// deduplicated.
    pub fn difference(&self, rhs: &OneToMany) -> OneToMany {
        let domain = self.node_space().max(rhs.node_space());
        self.zip_rows2(rhs, self.len(), domain, difference_row)
    }

    /// Row-wise symmetric difference: `(self | rhs) - (self & rhs)`.
    pub fn symmetric_difference(&self, rhs: &OneToMany) -> OneToMany {
        self.union(rhs).difference(&self.intersection(rhs))
    }

    fn zip_rows(
        &self,
        rhs: &OneToMany,
        count: usize,
        domain: usize,
        op: impl Fn(&[NodeId], &[NodeId], &mut MembershipSet) -> Vec<NodeId> + Sync,
    ) -> OneToMany {
        let rows = if count >= PAR_THRESHOLD {
            (0..count)
                .into_par_iter()
                .map_init(
                    || MembershipSet::new(domain),
                    |seen, i| op(empty_padded(self, i), empty_padded(rhs, i), seen),
                )
                .collect()
        } else {
            let mut seen = MembershipSet::new(domain);
            (0..count)
                .map(|i| op(empty_padded(self, i), empty_padded(rhs, i), &mut seen))
                .collect()
        };
        OneToMany::from_rows(rows)
    }

    fn zip_rows2(
        &self,
        rhs: &OneToMany,
        count: usize,
        domain: usize,
        op: impl Fn(&[NodeId], &[NodeId], &mut MembershipSet, &mut MembershipSet) -> Vec<NodeId>
        + Sync,
    ) -> OneToMany {
        let rows = if count >= PAR_THRESHOLD {
            (0..count)
                .into_par_iter()
                .map_init(
                    || (MembershipSet::new(domain), MembershipSet::new(domain)),
                    |(in_b, emitted), i| {
                        op(empty_padded(self, i), empty_padded(rhs, i), in_b, emitted)
                    },
                )
                .collect()
        } else {
            let mut in_b = MembershipSet::new(domain);
            let mut emitted = MembershipSet::new(domain);
            (0..count)
                .map(|i| {
                    op(
                        empty_padded(self, i),
                        empty_padded(rhs, i),
                        &mut in_b,
                        &mut emitted,
                    )
                })
                .collect()
        };
        OneToMany::from_rows(rows)
    }
}

impl Mul for &OneToMany {
    type Output = OneToMany;
    fn mul(self, rhs: Self) -> OneToMany {
        self.multiply(rhs)
    }
}

impl BitOr for &OneToMany {
    type Output = OneToMany;
    fn bitor(self, rhs: Self) -> OneToMany {
        self.union(rhs)
    }
}

/// `a + b` is an alias for the union `a | b`.
impl Add for &OneToMany {
    type Output = OneToMany;
    fn add(self, rhs: Self) -> OneToMany {
        self.union(rhs)
    }
}

impl BitAnd for &OneToMany {
    type Output = OneToMany;
    fn bitand(self, rhs: Self) -> OneToMany {
        self.intersection(rhs)
    }
}

impl Sub for &OneToMany {
    type Output = OneToMany;
    fn sub(self, rhs: Self) -> OneToMany {
        self.difference(rhs)
    }
}

impl BitXor for &OneToMany {
    type Output = OneToMany;
    fn bitxor(self, rhs: Self) -> OneToMany {
        self.symmetric_difference(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(rows: &[&[usize]]) -> OneToMany {
        rows.iter().map(|r| r.to_vec()).collect()
    }

    #[test]
    fn product_unions_selected_rows() {
        let a = rel(&[&[0, 1], &[2]]);
        let b = rel(&[&[10], &[10, 20], &[30]]);
        let p = &a * &b;
        assert_eq!(&p[0], &[10, 20]);
        assert_eq!(&p[1], &[30]);
    }

    #[test]
    fn product_skips_out_of_range_selectors() {
        let a = rel(&[&[0, 7], &[9]]);
        let b = rel(&[&[5]]);
        let p = &a * &b;
        assert_eq!(&p[0], &[5]);
        assert!(p[1].is_empty());
    }

    #[test]
    fn union_keeps_left_order_then_right_additions() {
        let a = rel(&[&[3, 1, 3]]);
        let b = rel(&[&[2, 1]]);
        let u = &a | &b;
        assert_eq!(&u[0], &[3, 1, 2]);
    }

    #[test]
    fn union_pads_short_sides_with_empty_rows() {
        let a = rel(&[&[0]]);
        let b = rel(&[&[1], &[5, 5]]);
        let u = &a | &b;
        assert_eq!(u.len(), 2);
        assert_eq!(&u[0], &[0, 1]);
        assert_eq!(&u[1], &[5]);
        assert_eq!(&a + &b, u);
    }

    #[test]
    fn intersection_keeps_left_order() {
        let a = rel(&[&[4, 2, 9, 2], &[1]]);
        let b = rel(&[&[2, 4], &[0], &[8]]);
        let i = &a & &b;
        assert_eq!(i.len(), 2);
        assert_eq!(&i[0], &[4, 2]);
        assert!(i[1].is_empty());
    }

    #[test]
    fn difference_keeps_left_rows_beyond_rhs() {
        let a = rel(&[&[1, 2, 1], &[7]]);
        let b = rel(&[&[2]]);
        let d = &a - &b;
        assert_eq!(d.len(), 2);
        assert_eq!(&d[0], &[1]);
        assert_eq!(&d[1], &[7]);
    }

    #[test]
    fn symmetric_difference_matches_identity() {
        let a = rel(&[&[0, 1, 3], &[2]]);
        let b = rel(&[&[1, 4], &[2], &[9]]);
        let x = &a ^ &b;
        let identity = &(&a | &b) - &(&a & &b);
        assert_eq!(x, identity);
        assert_eq!(&x[0], &[0, 3, 4]);
        assert!(x[1].is_empty());
        assert_eq!(&x[2], &[9]);
    }

    #[test]
    fn large_domain_falls_back_to_hash_membership() {
        let a = rel(&[&[100_000, 7]]);
        let b = rel(&[&[7, 100_001]]);
        let u = &a | &b;
        assert_eq!(&u[0], &[100_000, 7, 100_001]);
        let i = &a & &b;
        assert_eq!(&i[0], &[7]);
    }

    #[test]
    fn parallel_rows_match_serial_semantics() {
        let a = crate::algs::random::random_one_to_many(PAR_THRESHOLD + 10, 40, 0.1, Some(3));
        let b = crate::algs::random::random_one_to_many(PAR_THRESHOLD + 10, 40, 0.1, Some(4));
        let u = &a | &b;
        for i in 0..8 {
            let expected = union_row(
                &a[i],
                &b[i],
                &mut MembershipSet::new(a.node_space().max(b.node_space())),
            );
            assert_eq!(&u[i], &expected[..]);
        }
    }
}
