use macroquad::math::{ivec2, IVec2, Rect};
use serde::Deserialize;

/// Integer rectangle in pixels (atlas or screen space).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "w")]
    pub width: i32,
    #[serde(rename = "h")]
    pub height: i32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn from_pos_size(pos: IVec2, size: IVec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn pos(&self) -> IVec2 {
        ivec2(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> IVec2 {
        ivec2(self.width, self.height)
    }

    #[inline]
    pub fn max(&self) -> IVec2 {
        self.pos() + self.size()
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn intersect(&self, other: &PixelRect) -> Option<PixelRect> {
        let min = self.pos().max(other.pos());
        let max = self.max().min(other.max());
        if max.x <= min.x || max.y <= min.y {
            return None;
        }
        Some(PixelRect::from_pos_size(min, max - min))
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.x as f32,
            self.y as f32,
            self.width as f32,
            self.height as f32,
        )
    }
}
