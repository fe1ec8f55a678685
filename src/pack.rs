use crate::error::MapError;
use crate::geom::PixelRect;
use crate::tile::PackedSpriteId;
use macroquad::math::IVec2;
use std::collections::HashMap;

/// A trimmed atlas entry.
///
/// `source_rect` holds only the visible pixels; `full_size` is the logical
/// footprint the artist drew, and `trim_offset` is where the visible pixels
/// sit inside that footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedSpriteDescriptor {
    pub source_rect: PixelRect,
    pub full_size: IVec2,
    pub trim_offset: IVec2,
}

impl PackedSpriteDescriptor {
    /// `None` unless the visible rect fits inside the full footprint.
    pub fn new(source_rect: PixelRect, full_size: IVec2, trim_offset: IVec2) -> Option<Self> {
        let fits = trim_offset.x >= 0
            && trim_offset.y >= 0
            && source_rect.width >= 0
            && source_rect.height >= 0
            && trim_offset.x + source_rect.width <= full_size.x
            && trim_offset.y + source_rect.height <= full_size.y;
        fits.then_some(Self {
            source_rect,
            full_size,
            trim_offset,
        })
    }

    /// Descriptor for an untrimmed rect.
    pub fn untrimmed(source_rect: PixelRect) -> Self {
        Self {
            source_rect,
            full_size: source_rect.size(),
            trim_offset: IVec2::ZERO,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpritePack {
    ids: HashMap<String, PackedSpriteId>,
    sprites: Vec<PackedSpriteDescriptor>,
}

impl SpritePack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sprite; re-adding a name replaces its descriptor and keeps its id.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        sprite: PackedSpriteDescriptor,
    ) -> PackedSpriteId {
        let name = name.into();
        if let Some(&id) = self.ids.get(&name) {
            self.sprites[id.0 as usize] = sprite;
            return id;
        }
        let id = PackedSpriteId(self.sprites.len() as u32);
        self.sprites.push(sprite);
        self.ids.insert(name, id);
        id
    }

    pub fn id(&self, name: &str) -> Option<PackedSpriteId> {
        self.ids.get(name).copied()
    }

    pub fn get(&self, id: PackedSpriteId) -> Option<&PackedSpriteDescriptor> {
        self.sprites.get(id.0 as usize)
    }

    pub fn by_name(&self, name: &str) -> Option<&PackedSpriteDescriptor> {
        self.id(name).and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        crate::loader::atlas_loader::decode_atlas_str(json)
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, MapError> {
        crate::loader::atlas_loader::decode_atlas_file(path.as_ref())
    }
}
