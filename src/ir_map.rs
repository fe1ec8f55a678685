use crate::flags::TILED_GID_MASK;
use macroquad::math::{ivec2, IVec2};
use std::collections::HashMap;

/// Canonical, format-agnostic map.
pub struct IrMap {
    pub tile_w: u32,
    pub tile_h: u32,
    pub infinite: bool,
    pub tilesets: Vec<IrTileset>, // must be sorted by first_gid
    pub layers: Vec<IrLayer>,     // draw order: array order
}

pub struct IrTileset {
    pub name: String,
    pub first_gid: u32,
    pub tilecount: u32,
}

pub enum IrLayerKind {
    Tiles(IrTileLayer),
    /// Object, image and group layers carry nothing the tile store can use.
    Unsupported,
}

pub struct IrLayer {
    pub name: String,
    pub visible: bool,
    pub kind: IrLayerKind,
}

pub enum IrTileData {
    /// Row-major gids covering `width x height` tiles from (0, 0).
    Fixed {
        width: i32,
        height: i32,
        data: Vec<u32>,
    },
    /// Equally sized chunks keyed by chunk coordinate.
    Chunked {
        chunk_size: IVec2,
        chunks: HashMap<IVec2, Vec<u32>>,
    },
}

pub struct IrTileLayer {
    pub data: IrTileData,
}

impl IrTileLayer {
    pub fn is_infinite(&self) -> bool {
        matches!(self.data, IrTileData::Chunked { .. })
    }

    /// Raw gid (flip bits included) at a tile coordinate, 0 outside the data.
    pub fn raw_gid_at(&self, tile: IVec2) -> u32 {
        match &self.data {
            IrTileData::Fixed {
                width,
                height,
                data,
            } => {
                if tile.x < 0 || tile.y < 0 || tile.x >= *width || tile.y >= *height {
                    return 0;
                }
                data[(tile.y * width + tile.x) as usize]
            }
            IrTileData::Chunked { chunk_size, chunks } => {
                let key = tile.div_euclid(*chunk_size);
                let local = tile - key * *chunk_size;
                chunks
                    .get(&key)
                    .map(|c| c[(local.y * chunk_size.x + local.x) as usize])
                    .unwrap_or(0)
            }
        }
    }

    /// Size of the fixed data, `None` for infinite layers.
    pub fn fixed_size(&self) -> Option<IVec2> {
        match &self.data {
            IrTileData::Fixed { width, height, .. } => Some(ivec2(*width, *height)),
            IrTileData::Chunked { .. } => None,
        }
    }
}

impl IrMap {
    pub fn layer(&self, name: &str) -> Option<&IrLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Tileset owning `raw_gid` and the tileset-local tile id.
    pub fn tileset_for_gid(&self, raw_gid: u32) -> Option<(&IrTileset, u32)> {
        let gid = raw_gid & TILED_GID_MASK;
        if gid == 0 {
            return None;
        }
        let idx = self.tilesets.partition_point(|t| t.first_gid <= gid);
        let ts = self.tilesets.get(idx.checked_sub(1)?)?;
        let local = gid - ts.first_gid;
        (local < ts.tilecount).then_some((ts, local))
    }

    pub fn max_gid(&self) -> u32 {
        self.tilesets
            .iter()
            .map(|t| t.first_gid + t.tilecount.saturating_sub(1))
            .max()
            .unwrap_or(0)
    }
}
