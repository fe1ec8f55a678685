// tests/sprite_tests.rs

use macroquad::math::{ivec2, IVec2};
use macroquad_chunked_tiles::transform::{oriented_full_size, resolve_at, resolve_in};
use macroquad_chunked_tiles::{
    CommandBuffer, MapConfig, NineSlice, NineSlicePart, PackedSpriteDescriptor, PackedSpriteId,
    PixelRect, SpriteFlags, SpritePack, SpriteRef, SpriteSheet, SpriteSheetId, TileEngine,
};

fn all_orientations() -> impl Iterator<Item = SpriteFlags> {
    (0..8u16).map(SpriteFlags)
}

fn ui_pack() -> SpritePack {
    let mut pack = SpritePack::new();
    let desc = |x, w, h, full: IVec2, trim: IVec2| {
        PackedSpriteDescriptor::new(PixelRect::new(x, 0, w, h), full, trim).expect("fits")
    };
    pack.insert("corner", desc(0, 5, 6, ivec2(8, 8), ivec2(3, 2)));
    pack.insert("edge", desc(8, 8, 4, ivec2(8, 8), ivec2(0, 4)));
    pack.insert("fill", desc(16, 8, 8, ivec2(8, 8), IVec2::ZERO));
    pack
}

fn ui_engine() -> TileEngine {
    let mut e = TileEngine::new(MapConfig::default()).expect("default config");
    let sheet = SpriteSheet::new(ivec2(32, 8), ivec2(8, 8))
        .expect("sheet")
        .with_pack(ui_pack());
    e.sprite_sheet_setup(SpriteSheetId(1), sheet);
    assert!(e.sprite_sheet_set(SpriteSheetId(1)));
    e
}

#[test]
fn composing_orientations_is_a_group() {
    for f in all_orientations() {
        assert_eq!(f.then(SpriteFlags::FLIP_H).then(SpriteFlags::FLIP_H), f);
        assert_eq!(f.then(SpriteFlags::FLIP_V).then(SpriteFlags::FLIP_V), f);
        let quarter = SpriteFlags::ROT_90_CW;
        assert_eq!(f.then(quarter).then(quarter).then(quarter).then(quarter), f);
        assert_eq!(f.then(SpriteFlags::ROT_90_CW).then(SpriteFlags::ROT_90_CCW), f);
    }
    assert_eq!(
        SpriteFlags::ROT_90_CW.then(SpriteFlags::ROT_90_CW),
        SpriteFlags::ROT_180_CW
    );
}

#[test]
fn trimmed_draws_are_consistent_across_scales() {
    let pack = ui_pack();
    let corner = pack.by_name("corner").expect("corner");
    for f in all_orientations() {
        let full = oriented_full_size(corner, f);
        // drawing into the natural footprint equals drawing 1:1 at its corner
        let natural = resolve_in(corner, PixelRect::from_pos_size(ivec2(40, 40), full), f);
        assert_eq!(natural, resolve_at(corner, ivec2(40, 40), f), "flags={f:?}");

        // doubling the footprint doubles the trimmed rect
        let doubled = resolve_in(corner, PixelRect::from_pos_size(IVec2::ZERO, full * 2), f);
        let single = resolve_at(corner, IVec2::ZERO, f);
        assert_eq!(doubled.dest.size(), single.dest.size() * 2, "flags={f:?}");
        assert_eq!(doubled.dest.pos(), single.dest.pos() * 2, "flags={f:?}");
    }
}

#[test]
fn symmetric_nine_slice_matches_hand_built_panel() {
    let e = ui_engine();
    let pack = ui_pack();
    let id = |name| pack.id(name).expect("known sprite");
    let (corner, edge, fill) = (id("corner"), id("edge"), id("fill"));
    let dest = PixelRect::new(10, 20, 64, 40);

    let mut symmetric = CommandBuffer::new();
    e.draw_nine_slice_symmetric(dest, corner.into(), edge.into(), fill.into(), &mut symmetric);

    let hand_built = NineSlice {
        top_left: NineSlicePart::new(corner, SpriteFlags::NONE),
        top: NineSlicePart::new(edge, SpriteFlags::NONE),
        top_right: NineSlicePart::new(corner, SpriteFlags::FLIP_H),
        left: NineSlicePart::new(edge, SpriteFlags::ROT_270_CW),
        middle: NineSlicePart::new(fill, SpriteFlags::NONE),
        right: NineSlicePart::new(edge, SpriteFlags::ROT_90_CW),
        bottom_left: NineSlicePart::new(corner, SpriteFlags::FLIP_V),
        bottom: NineSlicePart::new(edge, SpriteFlags::FLIP_V),
        bottom_right: NineSlicePart::new(corner, SpriteFlags::ROT_180_CW),
    };
    let mut manual = CommandBuffer::new();
    e.draw_nine_slice(dest, &hand_built, &mut manual);

    assert_eq!(symmetric.len(), 9);
    assert_eq!(symmetric.commands, manual.commands);
}

#[test]
fn nine_slice_corners_mirror_each_other() {
    let e = ui_engine();
    let corner = SpriteRef::Packed(PackedSpriteId(0));
    let edge = SpriteRef::Packed(PackedSpriteId(1));
    let fill = SpriteRef::Packed(PackedSpriteId(2));
    let dest = PixelRect::new(0, 0, 40, 40);

    let mut buf = CommandBuffer::new();
    e.draw_nine_slice_symmetric(dest, corner, edge, fill, &mut buf);
    let (tl, tr, bl, br) = (
        buf.commands[0].dest,
        buf.commands[2].dest,
        buf.commands[6].dest,
        buf.commands[8].dest,
    );
    // visible corner pixels sit at (3, 2) in an 8x8 footprint
    assert_eq!(tl, PixelRect::new(3, 2, 5, 6));
    assert_eq!(tr, PixelRect::new(40 - tl.x - tl.width, tl.y, 5, 6));
    assert_eq!(bl, PixelRect::new(tl.x, 40 - tl.y - tl.height, 5, 6));
    assert_eq!(br, PixelRect::new(tr.x, bl.y, 5, 6));

    // every piece comes from the same atlas texture
    assert!(buf.commands.iter().all(|c| c.sheet == SpriteSheetId(1)));
}

#[test]
fn pack_marker_never_reaches_the_backend() {
    let e = ui_engine();
    let mut buf = CommandBuffer::new();
    let flags = SpriteFlags::SPRITE_PACK | SpriteFlags::ROT_90_CW;
    e.draw_sprite(PackedSpriteId(2).into(), IVec2::ZERO, flags, &mut buf);
    assert_eq!(buf.commands[0].flags, SpriteFlags::ROT_90_CW);
}

#[test]
fn flush_replays_in_order() {
    let e = ui_engine();
    let mut recorded = CommandBuffer::new();
    for x in 0..3 {
        e.draw_sprite(SpriteRef::Index(x), ivec2(x as i32 * 8, 0), SpriteFlags::NONE, &mut recorded);
    }
    let mut replay = CommandBuffer::new();
    let expected = recorded.commands.clone();
    recorded.flush(&mut replay);
    assert!(recorded.is_empty());
    assert_eq!(replay.commands, expected);
}
