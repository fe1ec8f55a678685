//! The tile/sprite context driven by the game loop.
//!
//! All public operations validate their layer and sheet arguments here, log a
//! diagnostic and fall back to a no-op or sentinel on bad input. Everything
//! below this layer assumes valid, wrapped coordinates.

use crate::command::{DrawCommand, RenderBackend};
use crate::config::MapConfig;
use crate::error::MapError;
use crate::flags::SpriteFlags;
use crate::geom::PixelRect;
use crate::grid::ChunkGrid;
use crate::ir_map::IrMap;
use crate::nine_slice::{self, NineSlice};
use crate::pack::PackedSpriteDescriptor;
use crate::render::cull::visible_chunk_range;
use crate::sheet::{SpriteSheet, SpriteSheetId};
use crate::tiled_import::{self, SpriteLookup};
use crate::tile::{PackedSpriteId, Rgba8, SpriteId, SpriteRef, TileRecord};
use crate::transform::{self, oriented_full_size};
use macroquad::math::IVec2;
use std::any::Any;
use tracing::{debug, warn};

pub struct TileEngine {
    config: MapConfig,
    sheets: Vec<Option<SpriteSheet>>,
    layers: Vec<Option<ChunkGrid>>,
    current_sheet: SpriteSheetId,
    tint: Rgba8,
    camera: IVec2,
    view_size: IVec2,
}

impl TileEngine {
    pub fn new(config: MapConfig) -> Result<Self, MapError> {
        config.validate()?;
        let mut layers = Vec::with_capacity(config.layer_count);
        layers.resize_with(config.layer_count, || None);
        Ok(Self {
            config,
            sheets: Vec::new(),
            layers,
            current_sheet: SpriteSheetId(0),
            tint: Rgba8::WHITE,
            camera: IVec2::ZERO,
            view_size: IVec2::new(320, 180),
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    // ---- sheets & per-frame state -------------------------------------

    pub fn sprite_sheet_setup(&mut self, id: SpriteSheetId, sheet: SpriteSheet) {
        if self.sheets.len() <= id.0 {
            self.sheets.resize_with(id.0 + 1, || None);
        }
        self.sheets[id.0] = Some(sheet);
    }

    pub fn sprite_sheet(&self, id: SpriteSheetId) -> Option<&SpriteSheet> {
        self.sheets.get(id.0).and_then(Option::as_ref)
    }

    /// Select the sheet used by the `draw_sprite*` family.
    pub fn sprite_sheet_set(&mut self, id: SpriteSheetId) -> bool {
        if self.sprite_sheet(id).is_none() {
            warn!(sheet = id.0, "sprite_sheet_set: sheet not set up");
            return false;
        }
        self.current_sheet = id;
        true
    }

    pub fn current_sheet(&self) -> SpriteSheetId {
        self.current_sheet
    }

    pub fn tint_set(&mut self, tint: Rgba8) {
        self.tint = tint;
    }

    pub fn camera_set(&mut self, pos: IVec2) {
        self.camera = pos;
    }

    pub fn camera(&self) -> IVec2 {
        self.camera
    }

    pub fn view_size_set(&mut self, size: IVec2) {
        self.view_size = size.max(IVec2::ZERO);
    }

    pub fn view_size(&self) -> IVec2 {
        self.view_size
    }

    // ---- layer plumbing -----------------------------------------------

    /// Bind a layer to a sheet; the first bind creates the layer's grid.
    pub fn map_layer_sprite_sheet_set(&mut self, layer: usize, sheet: SpriteSheetId) -> bool {
        if layer >= self.layers.len() {
            warn!(layer, "map_layer_sprite_sheet_set: invalid layer");
            return false;
        }
        if self.sprite_sheet(sheet).is_none() {
            warn!(layer, sheet = sheet.0, "map_layer_sprite_sheet_set: invalid sprite sheet");
            return false;
        }
        match &mut self.layers[layer] {
            Some(grid) => grid.set_sheet(sheet),
            slot @ None => {
                debug!(layer, sheet = sheet.0, "layer_grid_created");
                *slot = Some(ChunkGrid::new(&self.config, sheet));
            }
        }
        true
    }

    fn grid(&self, layer: usize, op: &'static str) -> Option<&ChunkGrid> {
        let grid = self.layers.get(layer).and_then(Option::as_ref);
        if grid.is_none() {
            warn!(layer, op, "invalid layer or layer has no sprite sheet");
        }
        grid
    }

    fn grid_mut(&mut self, layer: usize, op: &'static str) -> Option<&mut ChunkGrid> {
        let grid = self.layers.get_mut(layer).and_then(Option::as_mut);
        if grid.is_none() {
            warn!(layer, op, "invalid layer or layer has no sprite sheet");
        }
        grid
    }

    /// Direct access for bulk streaming code.
    pub fn layer_grid(&self, layer: usize) -> Option<&ChunkGrid> {
        self.layers.get(layer).and_then(Option::as_ref)
    }

    pub fn layer_grid_mut(&mut self, layer: usize) -> Option<&mut ChunkGrid> {
        self.layers.get_mut(layer).and_then(Option::as_mut)
    }

    // ---- tile access --------------------------------------------------

    pub fn map_sprite_set(
        &mut self,
        layer: usize,
        tile: IVec2,
        sprite: SpriteId,
        tint: Rgba8,
        flags: SpriteFlags,
    ) {
        if sprite.0 < SpriteId::EMPTY.0 {
            warn!(layer, sprite = sprite.0, "map_sprite_set: invalid sprite id");
            return;
        }
        let Some(grid) = self.grid_mut(layer, "map_sprite_set") else {
            return;
        };
        // sheet-index tiles never carry the pack marker
        let flags = SpriteFlags(flags.bits() & !SpriteFlags::SPRITE_PACK.bits());
        grid.set_tile(tile, TileRecord { sprite, tint, flags });
    }

    pub fn map_sprite_set_packed(
        &mut self,
        layer: usize,
        tile: IVec2,
        sprite: PackedSpriteId,
        tint: Rgba8,
        flags: SpriteFlags,
    ) {
        let Ok(id) = i32::try_from(sprite.0) else {
            warn!(layer, sprite = sprite.0, "map_sprite_set_packed: packed sprite id out of range");
            return;
        };
        let Some(grid) = self.grid_mut(layer, "map_sprite_set_packed") else {
            return;
        };
        grid.set_tile(
            tile,
            TileRecord {
                sprite: SpriteId(id),
                tint,
                flags: flags | SpriteFlags::SPRITE_PACK,
            },
        );
    }

    /// Set a tile by packed sprite name, looked up in the layer sheet's pack.
    pub fn map_sprite_set_named(
        &mut self,
        layer: usize,
        tile: IVec2,
        name: &str,
        tint: Rgba8,
        flags: SpriteFlags,
    ) {
        let Some(grid) = self.grid(layer, "map_sprite_set_named") else {
            return;
        };
        let id = self
            .sprite_sheet(grid.sheet())
            .and_then(SpriteSheet::pack)
            .and_then(|pack| pack.id(name));
        match id {
            Some(id) => self.map_sprite_set_packed(layer, tile, id, tint, flags),
            None => warn!(layer, name, "map_sprite_set_named: unknown packed sprite"),
        }
    }

    /// `SpriteId::INVALID` for a bad layer, `SpriteId::EMPTY` for unset tiles.
    pub fn map_sprite_get(&self, layer: usize, tile: IVec2) -> SpriteId {
        self.grid(layer, "map_sprite_get")
            .map(|g| g.tile(tile).sprite)
            .unwrap_or(SpriteId::INVALID)
    }

    pub fn map_tile_get(&self, layer: usize, tile: IVec2) -> Option<TileRecord> {
        self.grid(layer, "map_tile_get").map(|g| g.tile(tile))
    }

    pub fn map_data_set<T: Any>(&mut self, layer: usize, tile: IVec2, value: T) {
        if let Some(grid) = self.grid_mut(layer, "map_data_set") {
            grid.data_set(tile, value);
        }
    }

    /// `None` when the tile has no payload or it is not a `T`.
    pub fn map_data_get<T: Any>(&self, layer: usize, tile: IVec2) -> Option<&T> {
        self.grid(layer, "map_data_get")?.data_get::<T>(tile)
    }

    /// Lossy variant: absent or mismatched payloads read as `T::default()`.
    pub fn map_data_get_or_default<T: Any + Clone + Default>(&self, layer: usize, tile: IVec2) -> T {
        self.map_data_get::<T>(layer, tile).cloned().unwrap_or_default()
    }

    pub fn map_data_remove(&mut self, layer: usize, tile: IVec2) -> bool {
        self.grid_mut(layer, "map_data_remove")
            .map(|g| g.data_remove(tile))
            .unwrap_or(false)
    }

    /// Clear one layer, or every layer when `layer` is `None`.
    pub fn map_clear(&mut self, layer: Option<usize>) {
        match layer {
            Some(layer) => {
                if let Some(grid) = self.grid_mut(layer, "map_clear") {
                    grid.clear();
                }
            }
            None => self.layers.iter_mut().flatten().for_each(ChunkGrid::clear),
        }
    }

    /// Whether the chunk at chunk coordinate `chunk` is empty; `false` for a bad layer.
    pub fn map_chunk_empty(&self, layer: usize, chunk: IVec2) -> bool {
        self.grid(layer, "map_chunk_empty")
            .map(|g| g.chunk_empty(chunk))
            .unwrap_or(false)
    }

    pub fn map_shift_chunks(&mut self, layer: usize, shift: IVec2) {
        if let Some(grid) = self.grid_mut(layer, "map_shift_chunks") {
            grid.shift_chunks(shift);
        }
    }

    // ---- Tiled import ---------------------------------------------------

    /// Copy a fixed Tiled layer into `layer`. Returns `false` (and logs) on failure.
    pub fn map_load_tiled_layer(
        &mut self,
        map: &IrMap,
        source_layer: &str,
        layer: usize,
        source_rect: Option<PixelRect>,
        dest_pos: IVec2,
        lookup: Option<SpriteLookup<'_>>,
    ) -> bool {
        let Some(grid) = self.grid_mut(layer, "map_load_tiled_layer") else {
            return false;
        };
        match tiled_import::load_layer(grid, map, source_layer, source_rect, dest_pos, lookup) {
            Ok(()) => true,
            Err(error) => {
                warn!(layer, source_layer, error = %error, "map_load_tiled_layer failed");
                false
            }
        }
    }

    /// Stream one chunk of a (typically infinite) Tiled layer into `layer`.
    pub fn map_load_tiled_layer_chunk(
        &mut self,
        map: &IrMap,
        source_layer: &str,
        layer: usize,
        chunk_offset: IVec2,
        dest_pos: IVec2,
        lookup: Option<SpriteLookup<'_>>,
    ) -> bool {
        let Some(grid) = self.grid_mut(layer, "map_load_tiled_layer_chunk") else {
            return false;
        };
        match tiled_import::load_layer_chunk(grid, map, source_layer, chunk_offset, dest_pos, lookup)
        {
            Ok(()) => true,
            Err(error) => {
                warn!(layer, source_layer, error = %error, "map_load_tiled_layer_chunk failed");
                false
            }
        }
    }

    // ---- drawing --------------------------------------------------------

    fn descriptor(sheet: &SpriteSheet, sprite: SpriteRef) -> Option<PackedSpriteDescriptor> {
        match sprite {
            SpriteRef::Index(i) => sheet.source_rect(i).map(PackedSpriteDescriptor::untrimmed),
            SpriteRef::Packed(id) => sheet.pack()?.get(id).copied(),
        }
    }

    fn current_descriptor(&self, sprite: SpriteRef, op: &'static str) -> Option<PackedSpriteDescriptor> {
        let Some(sheet) = self.sprite_sheet(self.current_sheet) else {
            warn!(sheet = self.current_sheet.0, op, "no current sprite sheet");
            return None;
        };
        let desc = Self::descriptor(sheet, sprite);
        if desc.is_none() {
            warn!(?sprite, op, "sprite not found in current sheet");
        }
        desc
    }

    /// Draw every visible, non-empty tile of `layer`. `offset` is a pixel
    /// offset applied on top of the camera.
    pub fn draw_map_layer(&self, layer: usize, offset: IVec2, backend: &mut impl RenderBackend) {
        let Some(grid) = self.grid(layer, "draw_map_layer") else {
            return;
        };
        let Some(sheet) = self.sprite_sheet(grid.sheet()) else {
            warn!(layer, sheet = grid.sheet().0, "draw_map_layer: sprite sheet missing");
            return;
        };
        let tile_size = sheet.sprite_size();
        let view_min = self.camera - offset;
        let view = PixelRect::from_pos_size(view_min, self.view_size);
        let range = visible_chunk_range(
            view_min,
            view_min + self.view_size,
            tile_size,
            grid.chunk_size(),
            grid.grid_size(),
        );

        for chunk in range.iter() {
            if grid.chunk_empty(chunk) {
                continue;
            }
            for (pos, rec) in grid.chunk_tiles(chunk) {
                let world = PixelRect::from_pos_size(pos * tile_size, tile_size);
                if world.intersect(&view).is_none() {
                    continue;
                }
                let Some(sprite) = rec.sprite_ref() else {
                    continue;
                };
                let Some(desc) = Self::descriptor(sheet, sprite) else {
                    debug!(layer, ?sprite, "tile sprite missing from sheet");
                    continue;
                };
                let dest = PixelRect::from_pos_size(world.pos() - view_min, tile_size);
                let geom = transform::resolve_in(&desc, dest, rec.flags);
                backend.submit(&DrawCommand::new(grid.sheet(), geom, rec.flags, rec.tint));
            }
        }
    }

    /// Draw at `pos` (world pixels), 1:1.
    pub fn draw_sprite(
        &self,
        sprite: SpriteRef,
        pos: IVec2,
        flags: SpriteFlags,
        backend: &mut impl RenderBackend,
    ) {
        let Some(desc) = self.current_descriptor(sprite, "draw_sprite") else {
            return;
        };
        let geom = transform::resolve_at(&desc, pos - self.camera, flags);
        backend.submit(&DrawCommand::new(self.current_sheet, geom, flags, self.tint));
    }

    /// Stretch the sprite's untrimmed footprint over `dest` (world pixels).
    pub fn draw_sprite_rect(
        &self,
        sprite: SpriteRef,
        dest: PixelRect,
        flags: SpriteFlags,
        backend: &mut impl RenderBackend,
    ) {
        let Some(desc) = self.current_descriptor(sprite, "draw_sprite_rect") else {
            return;
        };
        let dest = PixelRect::from_pos_size(dest.pos() - self.camera, dest.size());
        let geom = transform::resolve_in(&desc, dest, flags);
        backend.submit(&DrawCommand::new(self.current_sheet, geom, flags, self.tint));
    }

    /// Like [`draw_sprite_rect`](Self::draw_sprite_rect), rotated by
    /// `degrees` around `pivot` (relative to `dest`'s top-left).
    pub fn draw_sprite_rotated(
        &self,
        sprite: SpriteRef,
        dest: PixelRect,
        pivot: IVec2,
        degrees: f32,
        flags: SpriteFlags,
        backend: &mut impl RenderBackend,
    ) {
        let Some(desc) = self.current_descriptor(sprite, "draw_sprite_rotated") else {
            return;
        };
        let dest = PixelRect::from_pos_size(dest.pos() - self.camera, dest.size());
        let geom = transform::resolve_rotated(&desc, dest, pivot, degrees, flags);
        backend.submit(&DrawCommand::new(self.current_sheet, geom, flags, self.tint));
    }

    pub fn draw_nine_slice(&self, dest: PixelRect, slice: &NineSlice, backend: &mut impl RenderBackend) {
        let parts = slice.parts();
        let mut descs = [PackedSpriteDescriptor::untrimmed(PixelRect::default()); 9];
        let mut sizes = [IVec2::ZERO; 9];
        for (i, part) in parts.iter().enumerate() {
            let Some(desc) = self.current_descriptor(part.sprite, "draw_nine_slice") else {
                return;
            };
            sizes[i] = oriented_full_size(&desc, part.flags);
            descs[i] = desc;
        }

        let dest = PixelRect::from_pos_size(dest.pos() - self.camera, dest.size());
        let rects = nine_slice::layout(dest, sizes);
        for ((part, desc), rect) in parts.iter().zip(&descs).zip(rects) {
            if rect.is_empty() {
                continue;
            }
            let geom = transform::resolve_in(desc, rect, part.flags);
            backend.submit(&DrawCommand::new(self.current_sheet, geom, part.flags, self.tint));
        }
    }

    /// Nine-slice from a single corner, edge and middle.
    pub fn draw_nine_slice_symmetric(
        &self,
        dest: PixelRect,
        corner: SpriteRef,
        side: SpriteRef,
        middle: SpriteRef,
        backend: &mut impl RenderBackend,
    ) {
        self.draw_nine_slice(dest, &NineSlice::symmetric(corner, side, middle), backend);
    }
}
