use crate::flags::SpriteFlags;
use crate::geom::PixelRect;
use crate::sheet::SpriteSheetId;
use crate::tile::Rgba8;
use crate::transform::{Rotation, SpriteGeometry};

/// One fully resolved sprite draw, ready for a GPU backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub sheet: SpriteSheetId,
    pub src: PixelRect,
    /// Screen rect after orientation; for quarter-turned sprites this is
    /// already the rotated footprint.
    pub dest: PixelRect,
    /// Orientation bits only.
    pub flags: SpriteFlags,
    pub tint: Rgba8,
    pub rotation: Option<Rotation>,
}

impl DrawCommand {
    pub fn new(sheet: SpriteSheetId, geom: SpriteGeometry, flags: SpriteFlags, tint: Rgba8) -> Self {
        Self {
            sheet,
            src: geom.src,
            dest: geom.dest,
            flags: SpriteFlags(flags.bits() & SpriteFlags::ORIENTATION_MASK),
            tint,
            rotation: geom.rotation,
        }
    }
}

/// Receives resolved draws. Batching and GPU submission live behind this.
pub trait RenderBackend {
    fn submit(&mut self, cmd: &DrawCommand);
}

/// Records draws in submission order.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    pub commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Replay everything into another backend.
    pub fn flush(&mut self, backend: &mut impl RenderBackend) {
        for cmd in self.commands.drain(..) {
            backend.submit(&cmd);
        }
    }
}

impl RenderBackend for CommandBuffer {
    fn submit(&mut self, cmd: &DrawCommand) {
        self.commands.push(*cmd);
    }
}
