//! Nine-slice panels: four corners, four edges and a centre stretched over a
//! destination rect. Every piece is an ordinary oriented sprite draw.

use crate::flags::SpriteFlags;
use crate::geom::PixelRect;
use crate::tile::SpriteRef;
use macroquad::math::{ivec2, IVec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NineSlicePart {
    pub sprite: SpriteRef,
    pub flags: SpriteFlags,
}

impl NineSlicePart {
    pub fn new(sprite: impl Into<SpriteRef>, flags: SpriteFlags) -> Self {
        Self {
            sprite: sprite.into(),
            flags,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NineSlice {
    pub top_left: NineSlicePart,
    pub top: NineSlicePart,
    pub top_right: NineSlicePart,
    pub left: NineSlicePart,
    pub middle: NineSlicePart,
    pub right: NineSlicePart,
    pub bottom_left: NineSlicePart,
    pub bottom: NineSlicePart,
    pub bottom_right: NineSlicePart,
}

impl NineSlice {
    /// Build all nine pieces from one top-left corner, one top edge and the
    /// middle, mirroring and rotating them into place.
    pub fn symmetric(
        corner: impl Into<SpriteRef>,
        side: impl Into<SpriteRef>,
        middle: impl Into<SpriteRef>,
    ) -> Self {
        let (corner, side, middle) = (corner.into(), side.into(), middle.into());
        let part = |sprite: SpriteRef, flags: SpriteFlags| NineSlicePart { sprite, flags };
        Self {
            top_left: part(corner, SpriteFlags::NONE),
            top: part(side, SpriteFlags::NONE),
            top_right: part(corner, SpriteFlags::FLIP_H),
            left: part(side, SpriteFlags::ROT_90_CCW),
            middle: part(middle, SpriteFlags::NONE),
            right: part(side, SpriteFlags::ROT_90_CW),
            bottom_left: part(corner, SpriteFlags::FLIP_V),
            bottom: part(side, SpriteFlags::FLIP_V),
            bottom_right: part(corner, SpriteFlags::FLIP_H | SpriteFlags::FLIP_V),
        }
    }

    /// Row-major: top row, middle row, bottom row.
    pub fn parts(&self) -> [NineSlicePart; 9] {
        [
            self.top_left,
            self.top,
            self.top_right,
            self.left,
            self.middle,
            self.right,
            self.bottom_left,
            self.bottom,
            self.bottom_right,
        ]
    }
}

/// Destination rects for the nine pieces given their oriented footprint sizes
/// (same order as [`NineSlice::parts`]). Corners keep their size, edges
/// stretch along their length, the middle fills what is left.
pub fn layout(dest: PixelRect, sizes: [IVec2; 9]) -> [PixelRect; 9] {
    let [tl, top, tr, left, _, right, bl, bottom, br] = sizes;
    let (x, y, w, h) = (dest.x, dest.y, dest.width, dest.height);
    let r = |px: i32, py: i32, size: IVec2| PixelRect::from_pos_size(ivec2(px, py), size);
    [
        r(x, y, tl),
        r(x + tl.x, y, ivec2(w - tl.x - tr.x, top.y)),
        r(x + w - tr.x, y, tr),
        r(x, y + tl.y, ivec2(left.x, h - tl.y - bl.y)),
        r(
            x + left.x,
            y + top.y,
            ivec2(w - left.x - right.x, h - top.y - bottom.y),
        ),
        r(x + w - right.x, y + tr.y, ivec2(right.x, h - tr.y - br.y)),
        r(x, y + h - bl.y, bl),
        r(x + bl.x, y + h - bottom.y, ivec2(w - bl.x - br.x, bottom.y)),
        r(x + w - br.x, y + h - br.y, br),
    ]
}
