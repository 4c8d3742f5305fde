//! Cache invalidation utilities shared across relation containers.

/// Anything that caches derived adjacency data (node bounds, inverse views,
/// position tables, …) should implement this.
pub trait InvalidateCache {
    /// Invalidate *all* internal caches so future queries recompute correctly.
    fn invalidate_cache(&mut self);
}

// Blanket impl for Box<T>
impl<T: InvalidateCache + ?Sized> InvalidateCache for Box<T> {
    #[inline]
    fn invalidate_cache(&mut self) {
        (**self).invalidate_cache();
    }
}
