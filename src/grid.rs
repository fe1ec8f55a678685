//! Per-layer chunk store.
//!
//! The grid is a fixed arena of `grid_size.x * grid_size.y` chunks addressed
//! toroidally: a tile coordinate is wrapped into tile space, split into a
//! logical chunk coordinate and a local offset, and the logical chunk is mapped
//! to its arena slot through `base`. Shifting the window only moves `base` and
//! releases the chunks that slide out; no tile data is copied.

use crate::chunk::{Chunk, TilePool};
use crate::config::MapConfig;
use crate::sheet::SpriteSheetId;
use crate::tile::TileRecord;
use macroquad::math::{ivec2, IVec2};
use std::any::Any;
use tracing::debug;

pub struct ChunkGrid {
    sheet: SpriteSheetId,
    chunk_size: IVec2,
    grid_size: IVec2,
    /// Arena slot of logical chunk (0, 0).
    base: IVec2,
    chunks: Vec<Chunk>,
    pool: TilePool,
}

/// Arena slot and in-chunk index of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TileLoc {
    slot: usize,
    local: usize,
}

impl ChunkGrid {
    /// `config` must already be validated.
    pub fn new(config: &MapConfig, sheet: SpriteSheetId) -> Self {
        let grid_size = config.grid_size();
        let count = (grid_size.x * grid_size.y) as usize;
        let mut chunks = Vec::with_capacity(count);
        chunks.resize_with(count, Chunk::default);
        Self {
            sheet,
            chunk_size: config.chunk_size,
            grid_size,
            base: IVec2::ZERO,
            chunks,
            pool: TilePool::new(),
        }
    }

    #[inline]
    pub fn sheet(&self) -> SpriteSheetId {
        self.sheet
    }

    pub fn set_sheet(&mut self, sheet: SpriteSheetId) {
        self.sheet = sheet;
    }

    #[inline]
    pub fn chunk_size(&self) -> IVec2 {
        self.chunk_size
    }

    #[inline]
    pub fn grid_size(&self) -> IVec2 {
        self.grid_size
    }

    /// Tile-space wrap dimensions.
    #[inline]
    pub fn tile_span(&self) -> IVec2 {
        self.grid_size * self.chunk_size
    }

    #[inline]
    fn chunk_len(&self) -> usize {
        (self.chunk_size.x * self.chunk_size.y) as usize
    }

    #[inline]
    fn slot_of(&self, chunk: IVec2) -> usize {
        let p = (chunk + self.base).rem_euclid(self.grid_size);
        (p.y * self.grid_size.x + p.x) as usize
    }

    #[inline]
    fn locate(&self, tile: IVec2) -> TileLoc {
        let t = tile.rem_euclid(self.tile_span());
        let chunk = t / self.chunk_size;
        let local = t - chunk * self.chunk_size;
        TileLoc {
            slot: self.slot_of(chunk),
            local: (local.y * self.chunk_size.x + local.x) as usize,
        }
    }

    pub fn tile(&self, tile: IVec2) -> TileRecord {
        let loc = self.locate(tile);
        self.chunks[loc.slot].get(loc.local)
    }

    pub fn set_tile(&mut self, tile: IVec2, rec: TileRecord) {
        let loc = self.locate(tile);
        let len = self.chunk_len();
        let chunk = &mut self.chunks[loc.slot];
        let was_materialized = chunk.is_materialized();
        chunk.set(loc.local, rec, len, &mut self.pool);
        if !was_materialized && chunk.is_materialized() {
            debug!(slot = loc.slot, "chunk_materialized");
        }
    }

    pub fn data_set<T: Any>(&mut self, tile: IVec2, value: T) {
        let loc = self.locate(tile);
        self.chunks[loc.slot].data_set(loc.local, Box::new(value));
    }

    /// `None` if the tile has no payload or holds a different type.
    pub fn data_get<T: Any>(&self, tile: IVec2) -> Option<&T> {
        let loc = self.locate(tile);
        self.chunks[loc.slot].data_get::<T>(loc.local)
    }

    pub fn data_remove(&mut self, tile: IVec2) -> bool {
        let loc = self.locate(tile);
        self.chunks[loc.slot].data_remove(loc.local).is_some()
    }

    /// Whether the chunk at logical chunk coordinate `chunk` (wrapped) is empty.
    pub fn chunk_empty(&self, chunk: IVec2) -> bool {
        self.chunks[self.slot_of(chunk)].is_empty()
    }

    pub(crate) fn chunk(&self, chunk: IVec2) -> &Chunk {
        &self.chunks[self.slot_of(chunk)]
    }

    /// Reset every tile and payload; the grid itself stays allocated.
    pub fn clear(&mut self) {
        for chunk in &mut self.chunks {
            chunk.release(&mut self.pool);
        }
        self.base = IVec2::ZERO;
    }

    /// Slide the loaded window by `shift` chunks.
    ///
    /// Content at logical chunk `c` is afterwards addressed at `c - shift`.
    /// Chunks whose new coordinate leaves `0..grid_size` on either axis are
    /// released; the slots they vacate are the newly exposed edge of the window.
    pub fn shift_chunks(&mut self, shift: IVec2) {
        if shift == IVec2::ZERO {
            return;
        }

        let new_base = (self.base + shift).rem_euclid(self.grid_size);
        let g = self.grid_size;
        let mut evicted = 0usize;
        for py in 0..g.y {
            for px in 0..g.x {
                let new_logical = (ivec2(px, py) - new_base).rem_euclid(g);
                let old_logical = new_logical + shift;
                let inside = old_logical.x >= 0
                    && old_logical.x < g.x
                    && old_logical.y >= 0
                    && old_logical.y < g.y;
                if !inside {
                    let slot = (py * g.x + px) as usize;
                    if !self.chunks[slot].is_empty() || self.chunks[slot].is_materialized() {
                        evicted += 1;
                    }
                    self.chunks[slot].release(&mut self.pool);
                }
            }
        }
        self.base = new_base;
        debug!(shift_x = shift.x, shift_y = shift.y, evicted, "chunks_shifted");
    }

    /// Non-cleared tiles of one logical chunk, as absolute tile coordinates
    /// inside the window.
    pub fn chunk_tiles(&self, chunk: IVec2) -> impl Iterator<Item = (IVec2, &TileRecord)> + '_ {
        let origin = chunk.rem_euclid(self.grid_size) * self.chunk_size;
        let cw = self.chunk_size.x as usize;
        self.chunk(chunk)
            .populated_tiles()
            .map(move |(idx, rec)| (origin + ivec2((idx % cw) as i32, (idx / cw) as i32), rec))
    }
}
