//! Random relation factory for tests and benches.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::relation::OneToMany;

/// Build a random element→node relation by an independent Bernoulli trial
/// per `(element, node)` pair at the given `density ∈ [0, 1]`.
///
/// With a `seed` the result is reproducible; without one the generator is
/// seeded from the OS.
///
/// # Example
/// ```rust
/// use incidence::algs::random::random_one_to_many;
/// let a = random_one_to_many(16, 8, 0.5, Some(42));
/// let b = random_one_to_many(16, 8, 0.5, Some(42));
/// assert_eq!(a, b);
/// ```
pub fn random_one_to_many(
    element_count: usize,
    node_count: usize,
    density: f64,
    seed: Option<u64>,
) -> OneToMany {
    let mut rng = match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => SmallRng::from_entropy(),
    };
    let mut rel = OneToMany::with_capacity(element_count);
    for _ in 0..element_count {
        let row = (0..node_count)
            .filter(|_| rng.r#gen::<f64>() < density)
            .collect();
        rel.push_row(row);
    }
    rel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_runs_are_reproducible() {
        let a = random_one_to_many(32, 16, 0.3, Some(7));
        let b = random_one_to_many(32, 16, 0.3, Some(7));
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn density_extremes() {
        let empty = random_one_to_many(4, 10, 0.0, Some(1));
        assert!(empty.rows().all(|r| r.is_empty()));
        let full = random_one_to_many(4, 10, 1.0, Some(1));
        assert!(full.rows().all(|r| r.len() == 10));
        assert_eq!(full.max_node(), Some(9));
    }

    #[test]
    fn rows_are_valid_and_in_range() {
        let a = random_one_to_many(64, 20, 0.5, Some(99));
        assert!(a.is_valid());
        assert!(a.max_node().is_none_or(|m| m < 20));
    }
}
