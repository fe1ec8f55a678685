use macroquad::prelude::*;
use macroquad_chunked_tiles::{
    MacroquadBackend, MapConfig, Rgba8, SpriteFlags, SpriteId, SpriteRef, SpriteSheet,
    SpriteSheetId, TileEngine,
};
use tracing_subscriber::EnvFilter;

const TILE: i32 = 16;
const CHUNK: i32 = 16;
const SPEED: f32 = 240.0;
const GROUND: usize = 0;

fn window_conf() -> Conf {
    Conf {
        window_title: "Infinite Scroll".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Four flat-coloured tiles with a dark notch in the top-left so orientation is visible.
fn tile_texture() -> Texture2D {
    let colors = [DARKGREEN, GREEN, BROWN, GRAY];
    let mut image = Image::gen_image_color((TILE * 4) as u16, TILE as u16, BLANK);
    for (i, color) in colors.iter().enumerate() {
        for y in 0..TILE as u32 {
            for x in 0..TILE as u32 {
                let notch = x < 4 && y < 4;
                let c = if notch { BLACK } else { *color };
                image.set_pixel(i as u32 * TILE as u32 + x, y, c);
            }
        }
    }
    Texture2D::from_image(&image)
}

fn world_tile(t: IVec2) -> (SpriteId, SpriteFlags) {
    let h = (t.x.wrapping_mul(73_856_093) ^ t.y.wrapping_mul(19_349_663)) as u32;
    (SpriteId((h % 4) as i32), SpriteFlags((h >> 8) as u16 & SpriteFlags::ORIENTATION_MASK))
}

/// Fill every empty window chunk from the procedural world.
fn stream_chunks(engine: &mut TileEngine, origin: IVec2, grid: IVec2) {
    for cy in 0..grid.y {
        for cx in 0..grid.x {
            let c = ivec2(cx, cy);
            if !engine.map_chunk_empty(GROUND, c) {
                continue;
            }
            for ty in 0..CHUNK {
                for tx in 0..CHUNK {
                    let local = c * CHUNK + ivec2(tx, ty);
                    let (sprite, flags) = world_tile(origin * CHUNK + local);
                    engine.map_sprite_set(GROUND, local, sprite, Rgba8::WHITE, flags);
                }
            }
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = MapConfig::new(1, ivec2(128, 96), ivec2(CHUNK, CHUNK));
    let grid = config.grid_size();
    let mut engine = TileEngine::new(config)?;

    let texture = tile_texture();
    let sheet = SpriteSheet::new(ivec2(TILE * 4, TILE), ivec2(TILE, TILE))?;
    engine.sprite_sheet_setup(SpriteSheetId(0), sheet);
    engine.sprite_sheet_set(SpriteSheetId(0));
    engine.map_layer_sprite_sheet_set(GROUND, SpriteSheetId(0));

    let mut backend = MacroquadBackend::new();
    backend.set_texture(SpriteSheetId(0), texture);

    let chunk_px = TILE * CHUNK;
    let mut camera = Vec2::ZERO;
    // world chunk shown at window chunk (0, 0)
    let mut origin = ivec2(-1, -1);

    loop {
        let dir = vec2(
            is_key_down(KeyCode::Right) as i32 as f32 - is_key_down(KeyCode::Left) as i32 as f32,
            is_key_down(KeyCode::Down) as i32 as f32 - is_key_down(KeyCode::Up) as i32 as f32,
        );
        camera += dir * SPEED * get_frame_time();

        let cam = camera.as_ivec2();
        let wanted = cam.div_euclid(IVec2::splat(chunk_px)) - IVec2::ONE;
        if wanted != origin {
            engine.map_shift_chunks(GROUND, wanted - origin);
            origin = wanted;
        }
        stream_chunks(&mut engine, origin, grid);

        clear_background(BLACK);
        engine.view_size_set(ivec2(screen_width() as i32, screen_height() as i32));
        engine.camera_set(cam - origin * chunk_px);
        engine.draw_map_layer(GROUND, IVec2::ZERO, &mut backend);
        engine.draw_sprite(SpriteRef::Index(3), ivec2(8, 8) + engine.camera(), SpriteFlags::ROT_90_CW, &mut backend);

        draw_text(
            &format!("FPS: {}  origin: {origin}", get_fps()),
            20.0,
            30.0,
            30.0,
            RED,
        );
        next_frame().await;
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    init_tracing();
    if let Err(error) = run().await {
        tracing::error!(error = %error, "demo failed");
    }
}
