use crate::flags::SpriteFlags;
use macroquad::color::Color;

/// Sprite reference stored in a tile: a sheet index, a packed sprite id
/// (when the tile carries [`SpriteFlags::SPRITE_PACK`]) or a sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId(pub i32);

impl SpriteId {
    /// Returned for lookups against an invalid layer.
    pub const INVALID: SpriteId = SpriteId(-2);
    /// An unset tile.
    pub const EMPTY: SpriteId = SpriteId(-1);

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl From<u32> for SpriteId {
    fn from(index: u32) -> Self {
        SpriteId(index as i32)
    }
}

/// Index into a [`SpritePack`](crate::pack::SpritePack).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedSpriteId(pub u32);

/// What to draw: a fixed-grid sheet sprite or a packed atlas entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteRef {
    Index(u32),
    Packed(PackedSpriteId),
}

impl From<PackedSpriteId> for SpriteRef {
    fn from(id: PackedSpriteId) -> Self {
        SpriteRef::Packed(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<Rgba8> for Color {
    fn from(c: Rgba8) -> Color {
        Color::from_rgba(c.r, c.g, c.b, c.a)
    }
}

/// One cell of a tile layer.
///
/// Per-tile user payload lives in the owning chunk's side table, so the record
/// itself stays `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRecord {
    pub sprite: SpriteId,
    pub tint: Rgba8,
    pub flags: SpriteFlags,
}

impl TileRecord {
    pub const CLEARED: TileRecord = TileRecord {
        sprite: SpriteId::EMPTY,
        tint: Rgba8::WHITE,
        flags: SpriteFlags::NONE,
    };

    #[inline]
    pub fn is_cleared(&self) -> bool {
        *self == Self::CLEARED
    }

    /// `None` for empty tiles.
    pub fn sprite_ref(&self) -> Option<SpriteRef> {
        if !self.sprite.is_valid() {
            return None;
        }
        let id = self.sprite.0 as u32;
        Some(if self.flags.contains(SpriteFlags::SPRITE_PACK) {
            SpriteRef::Packed(PackedSpriteId(id))
        } else {
            SpriteRef::Index(id)
        })
    }
}

impl Default for TileRecord {
    fn default() -> Self {
        Self::CLEARED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_cleared_state() {
        let t = TileRecord::default();
        assert!(t.is_cleared());
        assert_eq!(t.sprite, SpriteId::EMPTY);
        assert_eq!(t.tint, Rgba8::WHITE);
        assert_eq!(t.sprite_ref(), None);
    }

    #[test]
    fn sprite_pack_bit_selects_packed_ref() {
        let t = TileRecord {
            sprite: SpriteId(3),
            tint: Rgba8::WHITE,
            flags: SpriteFlags::SPRITE_PACK | SpriteFlags::FLIP_V,
        };
        assert_eq!(t.sprite_ref(), Some(SpriteRef::Packed(PackedSpriteId(3))));
    }
}
