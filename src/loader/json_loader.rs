// Tiled JSON map export -> IrMap
use crate::error::MapError;
use crate::flags::TILED_GID_MASK;
use crate::ir_map::*;
use macroquad::math::ivec2;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
struct JsonChunk {
    data: Vec<u32>,
    width: i32,
    height: i32,
    x: i32,
    y: i32,
}

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(default)]
    data: Vec<u32>,
    #[serde(default)]
    chunks: Vec<JsonChunk>,
    #[serde(default)]
    width: i32,
    #[serde(default)]
    height: i32,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: Option<String>, // "tilelayer" expected here
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
struct JsonTilesetRef {
    firstgid: u32,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    tilecount: Option<u32>,
}

#[derive(Deserialize)]
struct JsonMap {
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    infinite: bool,
    layers: Vec<JsonLayer>,
    tilesets: Vec<JsonTilesetRef>,
}

#[derive(Deserialize)]
struct ExternalTileset {
    #[serde(default)]
    name: String,
    tilecount: u32,
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, MapError> {
    let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn tileset_to_ir(ts: JsonTilesetRef, map_dir: &Path) -> Result<IrTileset, MapError> {
    if let Some(tilecount) = ts.tilecount {
        return Ok(IrTileset {
            name: ts.name,
            first_gid: ts.firstgid,
            tilecount,
        });
    }
    let Some(source) = ts.source else {
        return Err(MapError::InvalidMap(format!(
            "Tileset with firstgid {} has neither a source nor a tilecount",
            ts.firstgid
        )));
    };
    if !source.ends_with(".json") {
        return Err(MapError::InvalidMap(format!(
            "External tileset must be JSON: {source}"
        )));
    }
    let ext: ExternalTileset = read_json(&map_dir.join(&source))?;
    Ok(IrTileset {
        name: ext.name,
        first_gid: ts.firstgid,
        tilecount: ext.tilecount,
    })
}

fn check_gids(layer: &str, data: &[u32], max_gid: u32) -> Result<(), MapError> {
    for &raw_gid in data {
        let gid = raw_gid & TILED_GID_MASK;
        if gid != 0 && gid > max_gid {
            return Err(MapError::InvalidTileGid {
                layer: layer.to_owned(),
                gid,
                max_gid,
            });
        }
    }
    Ok(())
}

fn tile_layer_to_ir(l: JsonLayer, max_gid: u32) -> Result<IrTileLayer, MapError> {
    if l.chunks.is_empty() {
        check_gids(&l.name, &l.data, max_gid)?;
        if l.data.len() != (l.width.max(0) * l.height.max(0)) as usize {
            return Err(MapError::InvalidMap(format!(
                "Layer '{}' has {} tiles, expected {}x{}",
                l.name,
                l.data.len(),
                l.width,
                l.height
            )));
        }
        return Ok(IrTileLayer {
            data: IrTileData::Fixed {
                width: l.width,
                height: l.height,
                data: l.data,
            },
        });
    }

    let chunk_size = ivec2(l.chunks[0].width, l.chunks[0].height);
    if chunk_size.x <= 0 || chunk_size.y <= 0 {
        return Err(MapError::InvalidMap(format!(
            "Layer '{}' has an empty chunk",
            l.name
        )));
    }
    let mut chunks = HashMap::with_capacity(l.chunks.len());
    for c in l.chunks {
        let origin = ivec2(c.x, c.y);
        let aligned = origin.rem_euclid(chunk_size) == ivec2(0, 0);
        if ivec2(c.width, c.height) != chunk_size
            || !aligned
            || c.data.len() != (c.width * c.height) as usize
        {
            return Err(MapError::InvalidMap(format!(
                "Layer '{}' has an irregular chunk at ({}, {})",
                l.name, c.x, c.y
            )));
        }
        check_gids(&l.name, &c.data, max_gid)?;
        chunks.insert(origin.div_euclid(chunk_size), c.data);
    }
    Ok(IrTileLayer {
        data: IrTileData::Chunked { chunk_size, chunks },
    })
}

fn map_to_ir(j: JsonMap, map_dir: &Path) -> Result<IrMap, MapError> {
    let mut ir_tilesets = j
        .tilesets
        .into_iter()
        .map(|ts| tileset_to_ir(ts, map_dir))
        .collect::<Result<Vec<_>, _>>()?;

    // Sort by first_gid so gid lookup can binary search
    ir_tilesets.sort_by_key(|t| t.first_gid);

    let max_gid = ir_tilesets
        .iter()
        .map(|t| t.first_gid + t.tilecount.saturating_sub(1))
        .max()
        .unwrap_or(0);

    let mut ir_layers = Vec::with_capacity(j.layers.len());
    for l in j.layers {
        let name = l.name.clone();
        let visible = l.visible;
        let kind = match l.kind.as_deref().unwrap_or("tilelayer") {
            "tilelayer" => IrLayerKind::Tiles(tile_layer_to_ir(l, max_gid)?),
            _ => IrLayerKind::Unsupported,
        };
        ir_layers.push(IrLayer {
            name,
            visible,
            kind,
        });
    }

    Ok(IrMap {
        tile_w: j.tilewidth,
        tile_h: j.tileheight,
        infinite: j.infinite,
        tilesets: ir_tilesets,
        layers: ir_layers,
    })
}

/// Decode an in-memory map; external tilesets resolve against `base_dir`.
pub fn decode_map_str_to_ir(json: &str, base_dir: &Path) -> Result<IrMap, MapError> {
    let j: JsonMap = serde_json::from_str(json).map_err(|source| MapError::Json {
        path: PathBuf::from("<inline>"),
        source,
    })?;
    map_to_ir(j, base_dir)
}

pub fn decode_map_file_to_ir(path: &Path) -> Result<IrMap, MapError> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(MapError::InvalidMap(format!(
            "Map file must be a JSON file: {}",
            path.display()
        )));
    }

    let j: JsonMap = read_json(path)?;

    let map_dir = path
        .parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"));

    map_to_ir(j, &map_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::TILED_FLIP_H;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock went backwards")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("mq_chunked_tiles_{nanos}"));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    #[test]
    fn decodes_fixed_layer_with_external_tileset() {
        let dir = temp_dir();
        let map_path = dir.join("map.json");
        let ts_path = dir.join("tileset.json");

        let map_json = r#"{
          "tilewidth": 16,
          "tileheight": 16,
          "layers": [
            { "type":"tilelayer", "name":"ground", "width":2, "height":2, "data":[1,0,0,4] },
            { "type":"objectgroup", "name":"spawns", "objects":[] }
          ],
          "tilesets":[{"firstgid":1,"source":"tileset.json"}]
        }"#;
        let tileset_json = r#"{ "name":"terrain", "tilewidth":16, "tileheight":16, "tilecount":4, "columns":2, "image":"tiles.png" }"#;

        fs::write(&map_path, map_json).expect("failed to write map");
        fs::write(&ts_path, tileset_json).expect("failed to write tileset");

        let ir = decode_map_file_to_ir(&map_path).expect("decode");
        assert_eq!(ir.tilesets[0].name, "terrain");
        assert_eq!(ir.max_gid(), 4);
        match &ir.layers[0].kind {
            IrLayerKind::Tiles(t) => {
                assert_eq!(t.fixed_size(), Some(ivec2(2, 2)));
                assert_eq!(t.raw_gid_at(ivec2(1, 1)), 4);
            }
            IrLayerKind::Unsupported => panic!("expected tile layer"),
        }
        assert!(matches!(ir.layers[1].kind, IrLayerKind::Unsupported));
    }

    #[test]
    fn decodes_infinite_chunks_and_keeps_flip_bits() {
        let flipped = 2 | TILED_FLIP_H;
        let json = format!(
            r#"{{
              "tilewidth": 8, "tileheight": 8, "infinite": true,
              "layers": [ {{
                "type":"tilelayer", "name":"world",
                "chunks": [
                  {{ "x": -2, "y": 0, "width": 2, "height": 2, "data": [0, {flipped}, 0, 0] }},
                  {{ "x": 0, "y": 0, "width": 2, "height": 2, "data": [1, 0, 0, 0] }}
                ]
              }} ],
              "tilesets":[{{"firstgid":1,"name":"inline","tilecount":2}}]
            }}"#
        );
        let ir = decode_map_str_to_ir(&json, Path::new(".")).expect("decode");
        assert!(ir.infinite);
        let IrLayerKind::Tiles(layer) = &ir.layers[0].kind else {
            panic!("expected tile layer");
        };
        assert!(layer.is_infinite());
        assert_eq!(layer.raw_gid_at(ivec2(-1, 0)), flipped);
        assert_eq!(layer.raw_gid_at(ivec2(0, 0)), 1);
    }

    #[test]
    fn returns_typed_error_for_malformed_json() {
        let err = decode_map_str_to_ir("{ not json", Path::new(".")).err().expect("error");
        assert!(matches!(err, MapError::Json { .. }));
    }

    #[test]
    fn returns_typed_error_for_missing_tileset_file() {
        let dir = temp_dir();
        let map_path = dir.join("map.json");
        let map_json = r#"{
          "tilewidth": 16,
          "tileheight": 16,
          "layers": [],
          "tilesets":[{"firstgid":1,"source":"missing_tileset.json"}]
        }"#;
        fs::write(&map_path, map_json).expect("failed to write map");

        let err = decode_map_file_to_ir(&map_path).err().expect("expected decode error");
        assert!(matches!(err, MapError::Io { .. }));
    }

    #[test]
    fn returns_typed_error_for_invalid_gid_reference() {
        let json = r#"{
          "tilewidth": 16, "tileheight": 16,
          "layers": [ { "type":"tilelayer", "name":"ground", "width":1, "height":1, "data":[99] } ],
          "tilesets":[{"firstgid":1,"tilecount":1}]
        }"#;
        let err = decode_map_str_to_ir(json, Path::new(".")).err().expect("error");
        assert!(matches!(err, MapError::InvalidTileGid { gid: 99, max_gid: 1, .. }));
    }

    #[test]
    fn rejects_layer_size_mismatch() {
        let json = r#"{
          "tilewidth": 16, "tileheight": 16,
          "layers": [ { "type":"tilelayer", "name":"oops", "width":2, "height":2, "data":[1,1,1] } ],
          "tilesets":[{"firstgid":1,"tilecount":1}]
        }"#;
        let err = decode_map_str_to_ir(json, Path::new(".")).err().expect("error");
        assert!(matches!(err, MapError::InvalidMap(msg) if msg.contains("oops")));
    }

    #[test]
    fn rejects_non_json_map_path() {
        let err = decode_map_file_to_ir(Path::new("level.tmx")).err().expect("error");
        assert!(matches!(err, MapError::InvalidMap(_)));
    }
}
