//! Chunk-paged tile maps and trimmed-atlas sprite drawing for Macroquad.
//!
//! Tile layers live in a fixed window of chunks that can be scrolled over an
//! unbounded world with [`TileEngine::map_shift_chunks`]. Sprites come from
//! fixed-grid sheets or from packed atlases whose entries are trimmed; both
//! can be flipped and quarter-turned through [`SpriteFlags`].

mod chunk;
mod command;
mod config;
mod engine;
mod error;
mod flags;
mod geom;
mod grid;
mod ir_map;
mod loader {
    pub mod atlas_loader;
    pub mod json_loader;
}
mod nine_slice;
mod pack;
mod render {
    pub mod backend;
    pub mod cull;
}
mod sheet;
mod tile;
mod tiled_import;
pub mod transform;

pub use command::{CommandBuffer, DrawCommand, RenderBackend};
pub use config::{MapConfig, MAX_CHUNKS, MAX_LAYERS};
pub use engine::TileEngine;
pub use error::MapError;
pub use flags::{SpriteFlags, TILED_FLIP_D, TILED_FLIP_H, TILED_FLIP_V, TILED_GID_MASK};
pub use geom::PixelRect;
pub use grid::ChunkGrid;
pub use ir_map::{IrLayer, IrLayerKind, IrMap, IrTileData, IrTileLayer, IrTileset};
pub use loader::atlas_loader::{decode_atlas_file, decode_atlas_str};
pub use loader::json_loader::{decode_map_file_to_ir, decode_map_str_to_ir};
pub use nine_slice::{NineSlice, NineSlicePart};
pub use pack::{PackedSpriteDescriptor, SpritePack};
pub use render::backend::MacroquadBackend;
pub use render::cull::{visible_chunk_range, ChunkRange};
pub use sheet::{SpriteSheet, SpriteSheetId};
pub use tile::{PackedSpriteId, Rgba8, SpriteId, SpriteRef, TileRecord};
pub use tiled_import::SpriteLookup;
