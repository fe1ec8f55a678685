//! Copies decoded Tiled layers into a [`ChunkGrid`].

use crate::error::MapError;
use crate::flags::SpriteFlags;
use crate::geom::PixelRect;
use crate::grid::ChunkGrid;
use crate::ir_map::{IrLayerKind, IrMap, IrTileLayer};
use crate::tile::{PackedSpriteId, Rgba8, SpriteId, TileRecord};
use macroquad::math::{ivec2, IVec2};
use tracing::warn;

/// Maps tileset-local tile ids to the sprites written into the grid.
#[derive(Debug, Clone, Copy)]
pub enum SpriteLookup<'a> {
    Sprites(&'a [SpriteId]),
    Packed(&'a [PackedSpriteId]),
}

impl SpriteLookup<'_> {
    fn resolve(&self, local: u32) -> Option<(SpriteId, SpriteFlags)> {
        match self {
            SpriteLookup::Sprites(ids) => ids.get(local as usize).map(|&id| (id, SpriteFlags::NONE)),
            SpriteLookup::Packed(ids) => ids
                .get(local as usize)
                .and_then(|id| i32::try_from(id.0).ok())
                .map(|id| (SpriteId(id), SpriteFlags::SPRITE_PACK)),
        }
    }
}

fn tile_layer<'m>(map: &'m IrMap, name: &str) -> Result<&'m IrTileLayer, MapError> {
    match map.layer(name).map(|l| &l.kind) {
        Some(IrLayerKind::Tiles(t)) => Ok(t),
        _ => Err(MapError::MissingLayer(name.to_owned())),
    }
}

/// Record for one raw gid; gid 0 and lookup misses give the cleared record.
fn record_for_gid(map: &IrMap, raw_gid: u32, lookup: Option<SpriteLookup<'_>>) -> TileRecord {
    let Some((_, local)) = map.tileset_for_gid(raw_gid) else {
        return TileRecord::CLEARED;
    };
    let (sprite, extra) = match lookup {
        None => (SpriteId(local as i32), SpriteFlags::NONE),
        Some(lookup) => match lookup.resolve(local) {
            Some(found) => found,
            None => {
                warn!(local_id = local, "tile_missing_from_sprite_lookup");
                return TileRecord::CLEARED;
            }
        },
    };
    TileRecord {
        sprite,
        tint: Rgba8::WHITE,
        flags: SpriteFlags::from_tiled_gid(raw_gid) | extra,
    }
}

fn copy_rect(
    grid: &mut ChunkGrid,
    map: &IrMap,
    layer: &IrTileLayer,
    source: PixelRect,
    dest_pos: IVec2,
    lookup: Option<SpriteLookup<'_>>,
) {
    for y in 0..source.height {
        for x in 0..source.width {
            let raw = layer.raw_gid_at(source.pos() + ivec2(x, y));
            grid.set_tile(dest_pos + ivec2(x, y), record_for_gid(map, raw, lookup));
        }
    }
}

/// Copy a fixed-size layer (or `source_rect` of it) so its top-left lands on
/// `dest_pos`.
pub fn load_layer(
    grid: &mut ChunkGrid,
    map: &IrMap,
    layer_name: &str,
    source_rect: Option<PixelRect>,
    dest_pos: IVec2,
    lookup: Option<SpriteLookup<'_>>,
) -> Result<(), MapError> {
    let layer = tile_layer(map, layer_name)?;
    let Some(size) = layer.fixed_size() else {
        return Err(MapError::InvalidMap(format!(
            "Layer '{layer_name}' is infinite; load it chunk by chunk"
        )));
    };
    let full = PixelRect::from_pos_size(IVec2::ZERO, size);
    let source = match source_rect {
        Some(r) => match r.intersect(&full) {
            Some(clipped) => clipped,
            None => return Ok(()),
        },
        None => full,
    };
    let dest = dest_pos + (source.pos() - source_rect.map(|r| r.pos()).unwrap_or_default());
    copy_rect(grid, map, layer, source, dest, lookup);
    Ok(())
}

/// Copy exactly one grid chunk worth of tiles, taken from chunk coordinate
/// `chunk_offset` of the source layer, to `dest_pos`. Empty source tiles are
/// written too so a re-streamed chunk replaces what was there.
pub fn load_layer_chunk(
    grid: &mut ChunkGrid,
    map: &IrMap,
    layer_name: &str,
    chunk_offset: IVec2,
    dest_pos: IVec2,
    lookup: Option<SpriteLookup<'_>>,
) -> Result<(), MapError> {
    let layer = tile_layer(map, layer_name)?;
    let size = grid.chunk_size();
    let origin = chunk_offset
        .x
        .checked_mul(size.x)
        .zip(chunk_offset.y.checked_mul(size.y))
        .and_then(|(x, y)| x.checked_add(size.x).zip(y.checked_add(size.y)).map(|_| ivec2(x, y)));
    let Some(origin) = origin else {
        return Err(MapError::InvalidMap(format!(
            "Chunk offset ({}, {}) of layer '{layer_name}' is out of range",
            chunk_offset.x, chunk_offset.y
        )));
    };
    let source = PixelRect::from_pos_size(origin, size);
    copy_rect(grid, map, layer, source, dest_pos, lookup);
    Ok(())
}
