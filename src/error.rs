use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading map, atlas or configuration data.
#[derive(Debug, Error)]
pub enum MapError {
    /// File I/O error
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
    /// JSON parse error
    #[error("failed to parse {path}: {source}")]
    Json {
        /// File that failed to parse
        path: PathBuf,
        /// Underlying serde error
        source: serde_json::Error,
    },
    /// Structurally valid JSON that does not describe a usable map
    #[error("invalid map: {0}")]
    InvalidMap(String),
    /// No layer with this name exists in the decoded map
    #[error("map has no tile layer named '{0}'")]
    MissingLayer(String),
    /// A tile layer references a gid that no tileset covers
    #[error("layer '{layer}' references gid {gid}, but the highest known gid is {max_gid}")]
    InvalidTileGid {
        /// Layer name
        layer: String,
        /// Offending gid, flip bits stripped
        gid: u32,
        /// Highest gid covered by the tilesets
        max_gid: u32,
    },
    /// Chunk dimensions must be non-zero
    #[error("chunk size must be at least 1x1, got {width}x{height}")]
    InvalidChunkSize {
        /// Requested chunk width in tiles
        width: i32,
        /// Requested chunk height in tiles
        height: i32,
    },
    /// Map dimensions must be non-zero
    #[error("map size must be at least 1x1, got {width}x{height}")]
    InvalidMapSize {
        /// Requested map width in tiles
        width: i32,
        /// Requested map height in tiles
        height: i32,
    },
    /// At least one layer is required
    #[error("layer count must be between 1 and {max}, got {count}")]
    InvalidLayerCount {
        /// Requested layer count
        count: usize,
        /// Largest supported layer count
        max: usize,
    },
    /// Sprite sheets need a non-zero sprite size that fits the texture
    #[error("sprite size {sprite_w}x{sprite_h} does not fit texture {texture_w}x{texture_h}")]
    InvalidSpriteSheet {
        /// Sprite width in pixels
        sprite_w: i32,
        /// Sprite height in pixels
        sprite_h: i32,
        /// Texture width in pixels
        texture_w: i32,
        /// Texture height in pixels
        texture_h: i32,
    },
    /// A sprite atlas entry violates the trim invariant
    #[error("packed sprite '{name}' has a source rect that does not fit its full size")]
    InvalidPackedSprite {
        /// Atlas entry name
        name: String,
    },
}
