use crate::tile::TileRecord;
use std::any::Any;
use std::collections::HashMap;

/// Recycled tile storage, shared by all chunks of one grid.
pub(crate) type TilePool = Vec<Box<[TileRecord]>>;

/// Dense block of `chunk_width * chunk_height` tiles.
///
/// Storage is materialized on the first non-cleared write and handed back to
/// the grid's pool on release. Callers pass indices that are already wrapped
/// into `0..len`.
#[derive(Default)]
pub(crate) struct Chunk {
    tiles: Option<Box<[TileRecord]>>,
    /// Number of tiles not in the cleared state.
    populated: u32,
    data: HashMap<u32, Box<dyn Any>>,
}

impl Chunk {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.populated == 0 && self.data.is_empty()
    }

    #[inline]
    pub fn is_materialized(&self) -> bool {
        self.tiles.is_some()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> TileRecord {
        match &self.tiles {
            Some(tiles) => tiles[idx],
            None => TileRecord::CLEARED,
        }
    }

    pub fn set(&mut self, idx: usize, rec: TileRecord, len: usize, pool: &mut TilePool) {
        let new_cleared = rec.is_cleared();
        if self.tiles.is_none() {
            if new_cleared {
                return;
            }
            self.tiles = Some(
                pool.pop()
                    .unwrap_or_else(|| vec![TileRecord::CLEARED; len].into_boxed_slice()),
            );
        }
        let Some(tiles) = self.tiles.as_mut() else {
            return;
        };

        let old_cleared = tiles[idx].is_cleared();
        tiles[idx] = rec;
        // branch-free bookkeeping: +1 when populating, -1 when clearing
        self.populated = (self.populated as i64 + old_cleared as i64 - new_cleared as i64) as u32;
    }

    pub fn data_set(&mut self, idx: usize, value: Box<dyn Any>) {
        self.data.insert(idx as u32, value);
    }

    pub fn data_get<T: Any>(&self, idx: usize) -> Option<&T> {
        self.data.get(&(idx as u32))?.downcast_ref::<T>()
    }

    pub fn data_remove(&mut self, idx: usize) -> Option<Box<dyn Any>> {
        self.data.remove(&(idx as u32))
    }

    /// Reset to the cleared state, returning tile storage to `pool`.
    pub fn release(&mut self, pool: &mut TilePool) {
        if let Some(mut tiles) = self.tiles.take() {
            tiles.fill(TileRecord::CLEARED);
            pool.push(tiles);
        }
        self.populated = 0;
        self.data.clear();
    }

    /// Non-cleared tiles with their local index.
    pub fn populated_tiles(&self) -> impl Iterator<Item = (usize, &TileRecord)> + '_ {
        self.tiles
            .iter()
            .flat_map(|tiles| tiles.iter().enumerate())
            .filter(|(_, rec)| !rec.is_cleared())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::SpriteId;

    fn rec(id: i32) -> TileRecord {
        TileRecord {
            sprite: SpriteId(id),
            ..TileRecord::CLEARED
        }
    }

    #[test]
    fn writing_cleared_tile_does_not_materialize() {
        let mut pool = TilePool::new();
        let mut c = Chunk::default();
        c.set(3, TileRecord::CLEARED, 16, &mut pool);
        assert!(!c.is_materialized());
        assert!(c.is_empty());
    }

    #[test]
    fn empty_flag_tracks_populated_count() {
        let mut pool = TilePool::new();
        let mut c = Chunk::default();
        c.set(0, rec(1), 16, &mut pool);
        c.set(1, rec(2), 16, &mut pool);
        c.set(0, rec(7), 16, &mut pool);
        assert!(!c.is_empty());
        c.set(0, TileRecord::CLEARED, 16, &mut pool);
        assert!(!c.is_empty());
        c.set(1, TileRecord::CLEARED, 16, &mut pool);
        assert!(c.is_empty());
        assert_eq!(c.populated_tiles().count(), 0);
    }

    #[test]
    fn release_recycles_storage() {
        let mut pool = TilePool::new();
        let mut c = Chunk::default();
        c.set(5, rec(9), 16, &mut pool);
        c.data_set(5, Box::new(42u8));
        c.release(&mut pool);
        assert!(c.is_empty());
        assert_eq!(pool.len(), 1);
        assert!(pool[0].iter().all(|t| t.is_cleared()));

        c.set(2, rec(1), 16, &mut pool);
        assert!(pool.is_empty());
        assert_eq!(c.get(5), TileRecord::CLEARED);
        assert_eq!(c.data_get::<u8>(5), None);
    }

    #[test]
    fn payload_alone_keeps_chunk_non_empty() {
        let mut c = Chunk::default();
        c.data_set(0, Box::new("door"));
        assert!(!c.is_empty());
        assert_eq!(c.data_get::<&str>(0), Some(&"door"));
        assert_eq!(c.data_get::<u32>(0), None);
        c.data_remove(0);
        assert!(c.is_empty());
    }
}
