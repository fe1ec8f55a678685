use crate::command::{DrawCommand, RenderBackend};
use crate::flags::SpriteFlags;
use crate::sheet::SpriteSheetId;
use crate::transform::absolute_pivot;
use macroquad::prelude::*;
use std::f32::consts::FRAC_PI_2;
use tracing::warn;

/// Draws commands immediately with `draw_texture_ex`; macroquad batches
/// consecutive quads that share a texture.
#[derive(Default)]
pub struct MacroquadBackend {
    textures: Vec<Option<Texture2D>>,
}

impl MacroquadBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_texture(&mut self, sheet: SpriteSheetId, tex: Texture2D) {
        tex.set_filter(FilterMode::Nearest);
        if self.textures.len() <= sheet.0 {
            self.textures.resize(sheet.0 + 1, None);
        }
        self.textures[sheet.0] = Some(tex);
    }
}

impl RenderBackend for MacroquadBackend {
    fn submit(&mut self, cmd: &DrawCommand) {
        let Some(Some(tex)) = self.textures.get(cmd.sheet.0) else {
            warn!(sheet = cmd.sheet.0, "draw_without_texture");
            return;
        };

        let dest = cmd.dest.to_rect();
        let quarter = cmd.flags.rotate_bit() as f32;
        // macroquad rotates the unrotated quad around its centre, so draw the
        // pre-rotation size centred on the same point
        let size = vec2(
            (1.0 - quarter) * dest.w + quarter * dest.h,
            (1.0 - quarter) * dest.h + quarter * dest.w,
        );
        let mut center = dest.center();
        let mut angle = quarter * FRAC_PI_2;
        if let Some(rot) = cmd.rotation {
            let pivot = absolute_pivot(&cmd.dest, &rot);
            let theta = rot.degrees.to_radians();
            center = pivot + Vec2::from_angle(theta).rotate(center - pivot);
            angle += theta;
        }

        draw_texture_ex(
            tex,
            center.x - size.x * 0.5,
            center.y - size.y * 0.5,
            cmd.tint.into(),
            DrawTextureParams {
                source: Some(cmd.src.to_rect()),
                dest_size: Some(size),
                rotation: angle,
                flip_x: cmd.flags.contains(SpriteFlags::FLIP_H),
                flip_y: cmd.flags.contains(SpriteFlags::FLIP_V),
                pivot: None,
            },
        );
    }
}
