//! The set of chunks currently displayed, keyed by grid coordinate.

use rustc_hash::FxHashMap;

use infiniplot_coords::ChunkCoord;

use crate::ChunkDrawable;

/// Active chunk map.
///
/// Every entry was laid out with the same chunk size, recorded alongside the
/// map. The size may only change while the map is empty, which is how an LOD
/// bucket change is forced to drain before anything new is inserted.
#[derive(Debug, Default)]
pub struct ActiveChunks {
    chunks: FxHashMap<ChunkCoord, ChunkDrawable>,
    chunk_size: Option<f64>,
}

impl ActiveChunks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chunk size shared by every entry, or `None` before the first layout.
    pub fn chunk_size(&self) -> Option<f64> {
        self.chunk_size
    }

    /// Record the chunk size for subsequent inserts.
    ///
    /// # Panics
    ///
    /// Panics if the map is not empty and `size` differs from the current
    /// size.
    pub fn set_chunk_size(&mut self, size: f64) {
        assert!(
            self.chunks.is_empty() || self.chunk_size == Some(size),
            "chunk size changed with {} chunks still active",
            self.chunks.len()
        );
        self.chunk_size = Some(size);
    }

    /// Insert a drawable for `coord`.
    ///
    /// # Panics
    ///
    /// Panics if `coord` already has a drawable; replacing one would leak it
    /// from the pool's accounting.
    pub fn insert(&mut self, coord: ChunkCoord, drawable: ChunkDrawable) {
        assert!(self.chunk_size.is_some(), "insert before chunk size is set");
        let previous = self.chunks.insert(coord, drawable);
        assert!(previous.is_none(), "chunk {coord} inserted twice");
    }

    pub fn remove(&mut self, coord: ChunkCoord) -> Option<ChunkDrawable> {
        self.chunks.remove(&coord)
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&ChunkDrawable> {
        self.chunks.get(&coord)
    }

    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut ChunkDrawable> {
        self.chunks.get_mut(&coord)
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterate over active chunks in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (ChunkCoord, &ChunkDrawable)> {
        self.chunks.iter().map(|(coord, drawable)| (*coord, drawable))
    }

    /// Active coordinates, sorted for stable output.
    pub fn sorted_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<_> = self.chunks.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    /// Remove every entry. The chunk size is kept.
    pub(crate) fn take_all(&mut self) -> Vec<(ChunkCoord, ChunkDrawable)> {
        self.chunks.drain().collect()
    }
}
