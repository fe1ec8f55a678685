use crate::error::MapError;
use crate::geom::PixelRect;
use crate::pack::SpritePack;
use macroquad::math::{ivec2, IVec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SpriteSheetId(pub usize);

/// A texture cut into a regular grid of equally sized sprites, optionally
/// carrying a packed atlas description of the same texture.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    texture_size: IVec2,
    sprite_size: IVec2,
    pack: Option<SpritePack>,
}

impl SpriteSheet {
    pub fn new(texture_size: IVec2, sprite_size: IVec2) -> Result<Self, MapError> {
        if sprite_size.x <= 0
            || sprite_size.y <= 0
            || sprite_size.x > texture_size.x
            || sprite_size.y > texture_size.y
        {
            return Err(MapError::InvalidSpriteSheet {
                sprite_w: sprite_size.x,
                sprite_h: sprite_size.y,
                texture_w: texture_size.x,
                texture_h: texture_size.y,
            });
        }
        Ok(Self {
            texture_size,
            sprite_size,
            pack: None,
        })
    }

    pub fn with_pack(mut self, pack: SpritePack) -> Self {
        self.pack = Some(pack);
        self
    }

    #[inline]
    pub fn texture_size(&self) -> IVec2 {
        self.texture_size
    }

    /// Tile pixel size of every layer bound to this sheet.
    #[inline]
    pub fn sprite_size(&self) -> IVec2 {
        self.sprite_size
    }

    pub fn pack(&self) -> Option<&SpritePack> {
        self.pack.as_ref()
    }

    #[inline]
    pub fn columns(&self) -> u32 {
        (self.texture_size.x / self.sprite_size.x) as u32
    }

    pub fn sprite_count(&self) -> u32 {
        self.columns() * (self.texture_size.y / self.sprite_size.y) as u32
    }

    /// Atlas rect of grid sprite `index`, `None` past the end of the sheet.
    pub fn source_rect(&self, index: u32) -> Option<PixelRect> {
        if index >= self.sprite_count() {
            return None;
        }
        let cols = self.columns();
        let cell = ivec2((index % cols) as i32, (index / cols) as i32);
        Some(PixelRect::from_pos_size(cell * self.sprite_size, self.sprite_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_rect_walks_rows() {
        let sheet = SpriteSheet::new(ivec2(64, 32), ivec2(16, 16)).expect("sheet");
        assert_eq!(sheet.sprite_count(), 8);
        assert_eq!(sheet.source_rect(5), Some(PixelRect::new(16, 16, 16, 16)));
        assert_eq!(sheet.source_rect(8), None);
    }

    #[test]
    fn rejects_sprite_larger_than_texture() {
        let err = SpriteSheet::new(ivec2(8, 8), ivec2(16, 16)).unwrap_err();
        assert!(matches!(err, MapError::InvalidSpriteSheet { .. }));
    }
}
