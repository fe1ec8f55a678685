//! Destination geometry for trimmed sprites.
//!
//! A packed sprite only stores its visible pixels, so drawing it means placing
//! that visible rect inside the sprite's untrimmed footprint. Under a flip the
//! trim offset has to be measured from the opposite edge, and under the 90°
//! rotation the axes swap. Both are resolved through an 8-entry table and
//! integer selects, never by testing individual flag bits.

use crate::flags::SpriteFlags;
use crate::geom::PixelRect;
use crate::pack::PackedSpriteDescriptor;
use macroquad::math::{ivec2, IVec2, Vec2};

/// Per orientation `(mx, my)`: 1 keeps the trim measured from the near edge,
/// 0 mirrors it to the far edge. Offsets are expressed before the axis swap.
const TRIM_EDGE_LUT: [(i32, i32); 8] = [
    (1, 1), // none
    (0, 1), // H
    (1, 0), // V
    (0, 0), // H V
    (1, 0), // R
    (0, 0), // R H
    (1, 1), // R V
    (0, 1), // R H V
];

/// Arbitrary-angle rotation around a pivot given relative to the
/// destination rect's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub pivot: IVec2,
    pub degrees: f32,
}

/// Resolved source and destination of one sprite draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteGeometry {
    pub src: PixelRect,
    pub dest: PixelRect,
    /// Displacement of `dest` from the requested position.
    pub offset: IVec2,
    pub rotation: Option<Rotation>,
}

/// `v` with its components exchanged when `invert` is 1.
#[inline]
pub fn swap_axes(v: IVec2, invert: i32) -> IVec2 {
    ivec2(
        (1 - invert) * v.x + invert * v.y,
        (1 - invert) * v.y + invert * v.x,
    )
}

/// Offset of the visible rect inside the oriented footprint.
#[inline]
pub fn trim_offset(flags: SpriteFlags, full: IVec2, src: IVec2, trim: IVec2) -> IVec2 {
    let (mx, my) = TRIM_EDGE_LUT[flags.orientation()];
    let ox = mx * trim.x + (1 - mx) * (full.x - src.x - trim.x);
    let oy = my * trim.y + (1 - my) * (full.y - src.y - trim.y);
    swap_axes(ivec2(ox, oy), flags.rotate_bit())
}

/// Footprint of the sprite on screen once oriented.
#[inline]
pub fn oriented_full_size(sprite: &PackedSpriteDescriptor, flags: SpriteFlags) -> IVec2 {
    swap_axes(sprite.full_size, flags.rotate_bit())
}

/// Draw at `pos` (top-left of the untrimmed footprint) at 1:1 scale.
pub fn resolve_at(sprite: &PackedSpriteDescriptor, pos: IVec2, flags: SpriteFlags) -> SpriteGeometry {
    let src = sprite.source_rect;
    let offset = trim_offset(flags, sprite.full_size, src.size(), sprite.trim_offset);
    SpriteGeometry {
        src,
        dest: PixelRect::from_pos_size(pos + offset, swap_axes(src.size(), flags.rotate_bit())),
        offset,
        rotation: None,
    }
}

/// Stretch the untrimmed footprint over `dest`.
pub fn resolve_in(sprite: &PackedSpriteDescriptor, dest: PixelRect, flags: SpriteFlags) -> SpriteGeometry {
    let invert = flags.rotate_bit();
    let src = sprite.source_rect;

    // scale in the sprite's own (unrotated) frame
    let target = swap_axes(dest.size(), invert).as_vec2();
    let scale = target / sprite.full_size.max(IVec2::ONE).as_vec2();
    let scaled = |v: IVec2| -> IVec2 { (v.as_vec2() * scale).round().as_ivec2() };

    let full = scaled(sprite.full_size);
    let size = scaled(src.size());
    let offset = trim_offset(flags, full, size, scaled(sprite.trim_offset));

    let dest_size = dest.size() - swap_axes(full, invert) + swap_axes(size, invert);
    SpriteGeometry {
        src,
        dest: PixelRect::from_pos_size(dest.pos() + offset, dest_size),
        offset,
        rotation: None,
    }
}

/// Like [`resolve_in`], additionally rotated by `degrees` around `pivot`
/// (relative to `dest`'s top-left). A zero angle takes the plain path.
pub fn resolve_rotated(
    sprite: &PackedSpriteDescriptor,
    dest: PixelRect,
    pivot: IVec2,
    degrees: f32,
    flags: SpriteFlags,
) -> SpriteGeometry {
    let mut geom = resolve_in(sprite, dest, flags);
    if degrees == 0.0 {
        return geom;
    }
    geom.rotation = Some(Rotation {
        pivot: pivot - geom.offset,
        degrees,
    });
    geom
}

/// World position of a rotation's pivot.
#[inline]
pub fn absolute_pivot(dest: &PixelRect, rotation: &Rotation) -> Vec2 {
    (dest.pos() + rotation.pivot).as_vec2()
}
