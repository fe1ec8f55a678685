//! Sprite orientation flags.
//!
//! Three primitive bits (horizontal flip, vertical flip, 90° clockwise
//! rotation) encode all 8 orientations of a sprite. Flips are applied first,
//! then the rotation, so every composite below is a fixed OR of the primitives.

use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Tiled stores orientation in the top three bits of a gid.
pub const TILED_FLIP_H: u32 = 0x8000_0000; // bit 31
pub const TILED_FLIP_V: u32 = 0x4000_0000; // bit 30
pub const TILED_FLIP_D: u32 = 0x2000_0000; // bit 29
pub const TILED_GID_MASK: u32 = 0x1FFF_FFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SpriteFlags(pub u16);

impl SpriteFlags {
    pub const NONE: SpriteFlags = SpriteFlags(0);
    pub const FLIP_H: SpriteFlags = SpriteFlags(1);
    pub const FLIP_V: SpriteFlags = SpriteFlags(2);
    pub const ROT_90_CW: SpriteFlags = SpriteFlags(4);
    pub const ROT_180_CW: SpriteFlags = SpriteFlags(1 | 2);
    pub const ROT_270_CW: SpriteFlags = SpriteFlags(1 | 2 | 4);
    pub const ROT_90_CCW: SpriteFlags = Self::ROT_270_CW;
    pub const ROT_180_CCW: SpriteFlags = Self::ROT_180_CW;
    pub const ROT_270_CCW: SpriteFlags = Self::ROT_90_CW;

    /// Marks a tile whose sprite id refers to a packed sprite rather than a
    /// sheet index. Not an orientation bit.
    pub const SPRITE_PACK: SpriteFlags = SpriteFlags(0x8000);

    pub const ORIENTATION_MASK: u16 = 0b111;

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: SpriteFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// The 3-bit orientation index, `0..8`.
    #[inline]
    pub const fn orientation(self) -> usize {
        (self.0 & Self::ORIENTATION_MASK) as usize
    }

    /// 1 when the rotate bit is set, 0 otherwise.
    #[inline]
    pub const fn rotate_bit(self) -> i32 {
        ((self.0 >> 2) & 1) as i32
    }

    #[inline]
    pub const fn without_orientation(self) -> SpriteFlags {
        SpriteFlags(self.0 & !Self::ORIENTATION_MASK)
    }

    #[inline]
    pub const fn with_orientation(self, orientation: SpriteFlags) -> SpriteFlags {
        SpriteFlags(
            (self.0 & !Self::ORIENTATION_MASK) | (orientation.0 & Self::ORIENTATION_MASK),
        )
    }

    /// Orientation obtained by applying `self` and then `next`.
    ///
    /// Non-orientation bits of `self` are preserved.
    pub fn then(self, next: SpriteFlags) -> SpriteFlags {
        let m = mat_mul(to_matrix(next), to_matrix(self));
        self.with_orientation(from_matrix(m))
    }

    /// Translate Tiled's flip bits (taken from a raw gid) into an orientation.
    pub fn from_tiled_gid(raw_gid: u32) -> SpriteFlags {
        let h = ((raw_gid & TILED_FLIP_H) != 0) as usize;
        let v = ((raw_gid & TILED_FLIP_V) != 0) as usize;
        let d = ((raw_gid & TILED_FLIP_D) != 0) as usize;
        TILED_TO_ORIENTATION[h << 2 | v << 1 | d]
    }
}

// Tiled applies the diagonal flip first, then H, then V. Indexed by (h, v, d).
const TILED_TO_ORIENTATION: [SpriteFlags; 8] = [
    SpriteFlags::NONE,
    SpriteFlags(2 | 4), // d
    SpriteFlags::FLIP_V,
    SpriteFlags(1 | 2 | 4), // v d
    SpriteFlags::FLIP_H,
    SpriteFlags::ROT_90_CW, // h d
    SpriteFlags(1 | 2),
    SpriteFlags(1 | 4), // h v d
];

type Mat2 = [[i32; 2]; 2];

// Signed permutation acting on centered sprite coordinates, y pointing down.
fn to_matrix(flags: SpriteFlags) -> Mat2 {
    let sx = 1 - 2 * (flags.0 & 1) as i32;
    let sy = 1 - 2 * ((flags.0 >> 1) & 1) as i32;
    let flip = [[sx, 0], [0, sy]];
    if flags.rotate_bit() == 1 {
        mat_mul([[0, -1], [1, 0]], flip)
    } else {
        flip
    }
}

fn from_matrix(m: Mat2) -> SpriteFlags {
    let bits = if m[0][0] != 0 {
        (m[0][0] < 0) as u16 | ((m[1][1] < 0) as u16) << 1
    } else {
        (m[1][0] < 0) as u16 | ((m[0][1] > 0) as u16) << 1 | 4
    };
    SpriteFlags(bits)
}

fn mat_mul(a: Mat2, b: Mat2) -> Mat2 {
    let mut out = [[0; 2]; 2];
    for (r, row) in out.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = a[r][0] * b[0][c] + a[r][1] * b[1][c];
        }
    }
    out
}

impl BitOr for SpriteFlags {
    type Output = SpriteFlags;
    fn bitor(self, rhs: SpriteFlags) -> SpriteFlags {
        SpriteFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for SpriteFlags {
    fn bitor_assign(&mut self, rhs: SpriteFlags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for SpriteFlags {
    type Output = SpriteFlags;
    fn bitand(self, rhs: SpriteFlags) -> SpriteFlags {
        SpriteFlags(self.0 & rhs.0)
    }
}
