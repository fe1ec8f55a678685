use crate::error::MapError;
use macroquad::math::{ivec2, IVec2};
use serde::Deserialize;
use std::path::Path;

/// Upper bound on layers per map.
pub const MAX_LAYERS: usize = 64;

/// Upper bound on chunk slots per layer.
pub const MAX_CHUNKS: i32 = 1 << 20;

#[derive(Deserialize)]
struct JsonSize {
    width: i32,
    height: i32,
}

#[derive(Deserialize)]
struct JsonMapConfig {
    #[serde(default = "default_layer_count")]
    layer_count: usize,
    #[serde(default)]
    map_size: Option<JsonSize>,
    #[serde(default)]
    chunk_size: Option<JsonSize>,
}

fn default_layer_count() -> usize {
    8
}

/// Map-wide settings, fixed once per map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapConfig {
    pub layer_count: usize,
    /// Map (loaded window) size in tiles.
    pub map_size: IVec2,
    /// Chunk size in tiles.
    pub chunk_size: IVec2,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            layer_count: default_layer_count(),
            map_size: ivec2(256, 256),
            chunk_size: ivec2(16, 16),
        }
    }
}

impl MapConfig {
    pub fn new(layer_count: usize, map_size: IVec2, chunk_size: IVec2) -> Self {
        Self {
            layer_count,
            map_size,
            chunk_size,
        }
    }

    pub fn validate(&self) -> Result<(), MapError> {
        if self.layer_count == 0 || self.layer_count > MAX_LAYERS {
            return Err(MapError::InvalidLayerCount {
                count: self.layer_count,
                max: MAX_LAYERS,
            });
        }
        if self.chunk_size.x <= 0 || self.chunk_size.y <= 0 {
            return Err(MapError::InvalidChunkSize {
                width: self.chunk_size.x,
                height: self.chunk_size.y,
            });
        }
        let invalid_map = MapError::InvalidMapSize {
            width: self.map_size.x,
            height: self.map_size.y,
        };
        if self.map_size.x <= 0 || self.map_size.y <= 0 {
            return Err(invalid_map);
        }
        if self.chunk_size.x.checked_mul(self.chunk_size.y).is_none() {
            return Err(MapError::InvalidChunkSize {
                width: self.chunk_size.x,
                height: self.chunk_size.y,
            });
        }
        // grid arena and tile-space wrap size must both fit in i32
        let grid = self.grid_size();
        let fits = grid
            .x
            .checked_mul(grid.y)
            .is_some_and(|count| count <= MAX_CHUNKS)
            && grid.x.checked_mul(self.chunk_size.x).is_some()
            && grid.y.checked_mul(self.chunk_size.y).is_some();
        if !fits {
            return Err(invalid_map);
        }
        Ok(())
    }

    /// Chunk grid dimensions, rounding partial chunks up. Assumes positive sizes.
    pub fn grid_size(&self) -> IVec2 {
        ivec2(
            (self.map_size.x - 1) / self.chunk_size.x + 1,
            (self.map_size.y - 1) / self.chunk_size.y + 1,
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        Self::parse(json, Path::new("<inline>"))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let p = path.as_ref();
        let txt = std::fs::read_to_string(p).map_err(|source| MapError::Io {
            path: p.to_path_buf(),
            source,
        })?;
        Self::parse(&txt, p)
    }

    fn parse(json: &str, path: &Path) -> Result<Self, MapError> {
        let j: JsonMapConfig = serde_json::from_str(json).map_err(|source| MapError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let defaults = Self::default();
        let cfg = Self {
            layer_count: j.layer_count,
            map_size: j
                .map_size
                .map(|s| ivec2(s.width, s.height))
                .unwrap_or(defaults.map_size),
            chunk_size: j
                .chunk_size
                .map(|s| ivec2(s.width, s.height))
                .unwrap_or(defaults.chunk_size),
        };
        cfg.validate()?;
        Ok(cfg)
    }
}
