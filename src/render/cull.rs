use macroquad::math::{ivec2, IVec2};

/// Inclusive-exclusive chunk range `[min, max)` inside the loaded window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub min: IVec2,
    pub max: IVec2,
}

impl ChunkRange {
    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// Row-major, so draws come out in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = IVec2> {
        let (min, max) = (self.min, self.max);
        (min.y..max.y).flat_map(move |y| (min.x..max.x).map(move |x| ivec2(x, y)))
    }
}

/// Chunks of a `grid_size` window whose pixels intersect the view
/// `[view_min, view_max)`. The window starts at pixel (0, 0) and does not repeat.
pub fn visible_chunk_range(
    view_min: IVec2,
    view_max: IVec2,
    tile_size: IVec2,
    chunk_size: IVec2,
    grid_size: IVec2,
) -> ChunkRange {
    let chunk_px = tile_size * chunk_size;
    let lo = view_min.min(view_max);
    let hi = view_min.max(view_max);

    let min = lo.div_euclid(chunk_px).max(IVec2::ZERO);
    // ceil so a partially visible chunk at the far edge is included
    let max = (hi + chunk_px - IVec2::ONE)
        .div_euclid(chunk_px)
        .min(grid_size);
    ChunkRange { min, max }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILE: IVec2 = IVec2::new(8, 8);
    const CHUNK: IVec2 = IVec2::new(4, 4);

    #[test]
    fn partially_visible_chunks_are_included() {
        // one chunk = 32px
        let r = visible_chunk_range(ivec2(10, 0), ivec2(70, 33), TILE, CHUNK, ivec2(8, 8));
        assert_eq!(r.min, ivec2(0, 0));
        assert_eq!(r.max, ivec2(3, 2));
        assert_eq!(r.iter().count(), 6);
    }

    #[test]
    fn range_is_clipped_to_window() {
        let r = visible_chunk_range(ivec2(-100, -100), ivec2(1000, 1000), TILE, CHUNK, ivec2(4, 2));
        assert_eq!(r, ChunkRange { min: IVec2::ZERO, max: ivec2(4, 2) });
    }

    #[test]
    fn view_outside_window_is_empty() {
        let r = visible_chunk_range(ivec2(-64, 0), ivec2(-1, 32), TILE, CHUNK, ivec2(4, 4));
        assert!(r.is_empty());
        assert_eq!(r.iter().count(), 0);
    }

    #[test]
    fn iteration_is_row_major() {
        let r = ChunkRange { min: ivec2(0, 0), max: ivec2(2, 2) };
        let coords: Vec<IVec2> = r.iter().collect();
        assert!(coords.windows(2).all(|w| (w[0].y, w[0].x) <= (w[1].y, w[1].x)));
    }
}
