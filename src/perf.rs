// Iteration order of these aliases is **not** relied upon for correctness;
// every public query that exposes a set sorts before returning.

use once_cell::sync::Lazy;
use parking_lot::Mutex;

#[cfg(all(feature = "fast-hash", not(feature = "deterministic-order")))]
pub type FastSet<T> = ahash::AHashSet<T>;

#[cfg(feature = "deterministic-order")]
pub type FastSet<T> = std::collections::BTreeSet<T>;

#[cfg(not(any(feature = "fast-hash", feature = "deterministic-order")))]
pub type FastSet<T> = std::collections::HashSet<T>;

#[cfg(all(feature = "fast-hash", not(feature = "deterministic-order")))]
pub type FastMap<K, V> = ahash::AHashMap<K, V>;

#[cfg(feature = "deterministic-order")]
pub type FastMap<K, V> = std::collections::BTreeMap<K, V>;

#[cfg(not(any(feature = "fast-hash", feature = "deterministic-order")))]
pub type FastMap<K, V> = std::collections::HashMap<K, V>;

/// Row-accumulation buffers recycled across symbolic products and clique
/// expansion. Buffers are returned cleared; capacity survives the round
/// trip so steady-state row assembly does not allocate.
static SCRATCH_POOL: Lazy<Mutex<Vec<Vec<usize>>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Maximum number of idle buffers retained by the pool.
const SCRATCH_POOL_CAP: usize = 64;

/// Take a cleared scratch buffer from the pool (or allocate a fresh one).
#[inline]
pub fn acquire_scratch() -> Vec<usize> {
    SCRATCH_POOL.lock().pop().unwrap_or_default()
}

/// Return a scratch buffer to the pool.
#[inline]
pub fn release_scratch(mut buf: Vec<usize>) {
    buf.clear();
    let mut pool = SCRATCH_POOL.lock();
    if pool.len() < SCRATCH_POOL_CAP {
        pool.push(buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scratch_round_trip_preserves_capacity() {
        let mut buf = acquire_scratch();
        buf.extend(0..100);
        release_scratch(buf);
        let buf = acquire_scratch();
        assert!(buf.is_empty());
        release_scratch(buf);
    }
}
