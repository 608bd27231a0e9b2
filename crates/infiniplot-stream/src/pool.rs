//! Surface pool for reusing chunk drawables as chunks stream in and out.
//!
//! Instead of allocating a fresh RGBA buffer every time a chunk becomes
//! visible and freeing it when it leaves, the [`SurfacePool`] keeps released
//! drawables on a free list and hands them back out. All surfaces share one
//! resolution, so there is a single bucket.

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use infiniplot_raster::RgbaSurface;

use crate::{ActiveChunks, ChunkDrawable, SurfaceId};

/// Creates the backing surface for a new drawable. Receives the new id and
/// the edge resolution.
pub type SurfaceFactory = Box<dyn FnMut(SurfaceId, u32) -> RgbaSurface + Send>;

/// Lifetime counters for a pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Drawables constructed because the free list was empty.
    pub created: u64,
    /// Calls to [`SurfacePool::acquire`].
    pub acquired: u64,
    /// Calls to [`SurfacePool::release`].
    pub released: u64,
    /// Drawables disposed by [`SurfacePool::destroy_all`].
    pub destroyed: u64,
}

/// Free list of chunk drawables.
pub struct SurfacePool {
    resolution: u32,
    factory: SurfaceFactory,
    free: Vec<ChunkDrawable>,
    /// Ids on the free list, to catch a drawable released twice.
    free_ids: FxHashSet<SurfaceId>,
    next_id: u64,
    stats: PoolStats,
}

impl SurfacePool {
    /// Create an empty pool producing `resolution × resolution` surfaces.
    pub fn new(resolution: u32) -> Self {
        Self::with_factory(resolution, Box::new(|_, res| RgbaSurface::new(res, res)))
    }

    /// Create an empty pool that asks `factory` for each new surface, so the
    /// host can register drawables with its scene as they are made.
    pub fn with_factory(resolution: u32, factory: SurfaceFactory) -> Self {
        assert!(resolution > 0, "surface resolution must be non-zero");
        Self {
            resolution,
            factory,
            free: Vec::new(),
            free_ids: FxHashSet::default(),
            next_id: 0,
            stats: PoolStats::default(),
        }
    }

    /// Texels per surface edge.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Take a drawable from the free list, or construct one if it is empty.
    /// The returned drawable is marked visible.
    pub fn acquire(&mut self) -> ChunkDrawable {
        let mut drawable = match self.free.pop() {
            Some(drawable) => {
                self.free_ids.remove(&drawable.id());
                drawable
            }
            None => {
                let id = SurfaceId(self.next_id);
                self.next_id += 1;
                self.stats.created += 1;
                trace!(%id, resolution = self.resolution, "created surface");
                let surface = (self.factory)(id, self.resolution);
                debug_assert_eq!(
                    surface.dimensions(),
                    (self.resolution, self.resolution),
                    "factory returned a surface of the wrong size"
                );
                ChunkDrawable::from_surface(id, surface)
            }
        };
        drawable.set_visible(true);
        self.stats.acquired += 1;
        drawable
    }

    /// Hide a drawable and put it back on the free list.
    ///
    /// # Panics
    ///
    /// Panics if a drawable with the same id is already free: the active set
    /// and the pool would both own it.
    pub fn release(&mut self, mut drawable: ChunkDrawable) {
        let id = drawable.id();
        assert!(
            self.free_ids.insert(id),
            "{id} released while already in the pool"
        );
        drawable.set_visible(false);
        self.free.push(drawable);
        self.stats.released += 1;
    }

    /// Release every drawable in `active`, leaving it empty.
    ///
    /// Returns the number of drawables released.
    pub fn drain(&mut self, active: &mut ActiveChunks) -> usize {
        let drained = active.take_all();
        let count = drained.len();
        for (_, drawable) in drained {
            self.release(drawable);
        }
        if count > 0 {
            debug!(count, "drained active chunks into pool");
        }
        count
    }

    /// Dispose of every pooled and active drawable. Teardown only.
    ///
    /// Returns the number of drawables destroyed.
    pub fn destroy_all(&mut self, active: &mut ActiveChunks) -> usize {
        let active_count = active.take_all().len();
        let free_count = self.free.len();
        self.free.clear();
        self.free_ids.clear();
        let total = active_count + free_count;
        self.stats.destroyed += total as u64;
        debug!(active_count, free_count, "destroyed all surfaces");
        total
    }

    /// Number of drawables on the free list.
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Drawables that exist, free or in use.
    pub fn live_count(&self) -> u64 {
        self.stats.created - self.stats.destroyed
    }

    /// Whether a drawable with this id is on the free list.
    pub fn is_free(&self, id: SurfaceId) -> bool {
        self.free_ids.contains(&id)
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use infiniplot_coords::ChunkCoord;

    use super::*;

    #[test]
    fn test_acquire_creates_when_empty() {
        let mut pool = SurfacePool::new(8);
        let d = pool.acquire();
        assert!(d.is_visible());
        assert_eq!(d.surface().dimensions(), (8, 8));
        assert_eq!(pool.stats().created, 1);
        assert_eq!(pool.free_len(), 0);
    }

    #[test]
    fn test_factory_called_once_per_new_surface() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicU32, Ordering};

        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let mut pool = SurfacePool::with_factory(
            4,
            Box::new(move |_, res| {
                counter.fetch_add(1, Ordering::Relaxed);
                RgbaSurface::new(res, res)
            }),
        );
        let a = pool.acquire();
        let b = pool.acquire();
        pool.release(a);
        let _c = pool.acquire();
        pool.release(b);
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_pool_reuses_released_drawables() {
        let mut pool = SurfacePool::new(8);
        let d = pool.acquire();
        let id = d.id();
        pool.release(d);
        assert!(pool.is_free(id));

        let again = pool.acquire();
        assert_eq!(again.id(), id, "pool should reuse, not allocate");
        assert!(again.is_visible());
        assert_eq!(pool.stats().created, 1);
        assert!(!pool.is_free(id));
    }

    #[test]
    fn test_release_hides() {
        let mut pool = SurfacePool::new(4);
        let d = pool.acquire();
        pool.release(d);
        let d = pool.free.last().unwrap();
        assert!(!d.is_visible());
    }

    #[test]
    #[should_panic(expected = "already in the pool")]
    fn test_double_release_panics() {
        let mut pool = SurfacePool::new(4);
        let d = pool.acquire();
        let forged = ChunkDrawable::new(d.id(), 4);
        pool.release(d);
        pool.release(forged);
    }

    /// Every drawable is either active or free, never both, and the total
    /// never shrinks while the pool is alive.
    #[test]
    fn test_partition_invariant_over_sequence() {
        let mut pool = SurfacePool::new(4);
        let mut active = ActiveChunks::new();
        active.set_chunk_size(1.0);
        let mut prev_total = 0;

        let ops: &[(bool, i64)] = &[
            (true, 0),
            (true, 1),
            (true, 2),
            (false, 1),
            (true, 3),
            (false, 0),
            (false, 2),
            (true, 4),
            (true, 5),
            (true, 6),
            (false, 6),
        ];
        for &(acquire, x) in ops {
            let coord = ChunkCoord::new(x, 0);
            if acquire {
                active.insert(coord, pool.acquire());
            } else if let Some(d) = active.remove(coord) {
                pool.release(d);
            }

            for (_, d) in active.iter() {
                assert!(!pool.is_free(d.id()), "{} both active and free", d.id());
            }
            let total = active.len() + pool.free_len();
            assert_eq!(total as u64, pool.live_count());
            assert!(total >= prev_total);
            prev_total = total;
        }
    }

    #[test]
    fn test_drain_empties_active_set() {
        let mut pool = SurfacePool::new(4);
        let mut active = ActiveChunks::new();
        active.set_chunk_size(2.0);
        for x in 0..5 {
            active.insert(ChunkCoord::new(x, x), pool.acquire());
        }
        assert_eq!(pool.drain(&mut active), 5);
        assert!(active.is_empty());
        assert_eq!(pool.free_len(), 5);
        assert_eq!(pool.stats().released, 5);
    }

    #[test]
    fn test_destroy_all() {
        let mut pool = SurfacePool::new(4);
        let mut active = ActiveChunks::new();
        active.set_chunk_size(1.0);
        active.insert(ChunkCoord::new(0, 0), pool.acquire());
        let spare = pool.acquire();
        pool.release(spare);

        assert_eq!(pool.destroy_all(&mut active), 2);
        assert_eq!(pool.live_count(), 0);
        assert_eq!(pool.free_len(), 0);
        assert!(active.is_empty());
    }
}
