// TexturePacker-style JSON atlas ("hash" or "array" frame lists).
use crate::error::MapError;
use crate::geom::PixelRect;
use crate::pack::{PackedSpriteDescriptor, SpritePack};
use macroquad::math::ivec2;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Deserialize)]
struct JsonSize {
    w: i32,
    h: i32,
}

#[derive(Deserialize)]
struct JsonFrame {
    #[serde(default)]
    filename: String,
    frame: PixelRect,
    #[serde(default)]
    rotated: bool,
    #[serde(default, rename = "spriteSourceSize")]
    sprite_source_size: Option<PixelRect>,
    #[serde(default, rename = "sourceSize")]
    source_size: Option<JsonSize>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonFrames {
    Array(Vec<JsonFrame>),
    Hash(BTreeMap<String, JsonFrame>),
}

#[derive(Deserialize)]
struct JsonAtlas {
    frames: JsonFrames,
}

/// "ui/button.png" -> "ui/button"
fn sprite_name(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !ext.contains('/') => stem,
        _ => filename,
    }
}

fn frame_to_descriptor(name: &str, f: &JsonFrame) -> Result<PackedSpriteDescriptor, MapError> {
    if f.rotated {
        return Err(MapError::InvalidPackedSprite {
            name: name.to_owned(),
        });
    }
    let full = f
        .source_size
        .as_ref()
        .map(|s| ivec2(s.w, s.h))
        .unwrap_or(f.frame.size());
    let trim = f.sprite_source_size.map(|r| r.pos()).unwrap_or_default();
    PackedSpriteDescriptor::new(f.frame, full, trim).ok_or_else(|| MapError::InvalidPackedSprite {
        name: name.to_owned(),
    })
}

fn atlas_to_pack(atlas: JsonAtlas) -> Result<SpritePack, MapError> {
    let mut pack = SpritePack::new();
    let frames: Vec<(String, JsonFrame)> = match atlas.frames {
        JsonFrames::Array(v) => v.into_iter().map(|f| (f.filename.clone(), f)).collect(),
        JsonFrames::Hash(m) => m.into_iter().collect(),
    };
    for (filename, frame) in &frames {
        let name = sprite_name(filename);
        pack.insert(name, frame_to_descriptor(name, frame)?);
    }
    Ok(pack)
}

pub fn decode_atlas_str(json: &str) -> Result<SpritePack, MapError> {
    let atlas: JsonAtlas = serde_json::from_str(json).map_err(|source| MapError::Json {
        path: "<inline>".into(),
        source,
    })?;
    atlas_to_pack(atlas)
}

pub fn decode_atlas_file(path: &Path) -> Result<SpritePack, MapError> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(MapError::InvalidMap(format!(
            "Atlas file must be a JSON file: {}",
            path.display()
        )));
    }
    let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let atlas: JsonAtlas = serde_json::from_str(&txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    atlas_to_pack(atlas)
}
