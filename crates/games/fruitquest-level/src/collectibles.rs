use std::fmt;

use serde::{Deserialize, Serialize};

use fruitquest_core::events::{CollectibleId, CollectibleSpawn};

/// Tile edge length the fruit sprites are drawn at, in pixels.
pub const TILE_SIZE: f32 = 16.0;

/// One rectangle from a map object layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
}

/// A fruit placed in the level. Once consumed it stays consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: CollectibleId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    consumed: bool,
}

impl Collectible {
    pub fn new(id: CollectibleId, entry: ObjectEntry) -> Self {
        Self {
            id,
            x: entry.x,
            y: entry.y,
            width: entry.width,
            height: entry.height,
            consumed: false,
        }
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Mark consumed. Returns false if it already was.
    pub(crate) fn consume(&mut self) -> bool {
        !std::mem::replace(&mut self.consumed, true)
    }

    /// Sprite scale so a 16px frame covers the object rectangle.
    pub fn scale(&self) -> (f32, f32) {
        (self.width / TILE_SIZE, self.height / TILE_SIZE)
    }

    /// Placement for the host, looping the given clip.
    pub fn spawn(&self, clip: &str) -> CollectibleSpawn {
        let (scale_x, scale_y) = self.scale();
        CollectibleSpawn {
            id: self.id,
            x: self.x,
            y: self.y,
            scale_x,
            scale_y,
            clip: clip.to_string(),
        }
    }
}

/// Create one collectible per object entry, numbered from 0.
pub fn spawn_collectibles(entries: &[ObjectEntry]) -> Vec<Collectible> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| Collectible::new(i as CollectibleId, *e))
        .collect()
}

#[derive(Debug)]
pub enum MapError {
    Parse(serde_json::Error),
    MissingLayer(String),
    NotObjectLayer(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Parse(e) => write!(f, "invalid map JSON: {e}"),
            MapError::MissingLayer(name) => write!(f, "map has no layer named {name:?}"),
            MapError::NotObjectLayer(name) => write!(f, "layer {name:?} is not an object layer"),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TiledMap {
    layers: Vec<TiledLayer>,
}

#[derive(Debug, Deserialize)]
struct TiledLayer {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    objects: Vec<ObjectEntry>,
}

/// Read the entries of a named object layer from a Tiled JSON map.
pub fn load_object_layer(map_json: &str, layer: &str) -> Result<Vec<ObjectEntry>, MapError> {
    let map: TiledMap = serde_json::from_str(map_json).map_err(MapError::Parse)?;
    let found = map
        .layers
        .into_iter()
        .find(|l| l.name == layer)
        .ok_or_else(|| MapError::MissingLayer(layer.to_string()))?;
    if found.kind != "objectgroup" {
        return Err(MapError::NotObjectLayer(layer.to_string()));
    }
    tracing::debug!(layer, count = found.objects.len(), "Loaded object layer");
    Ok(found.objects)
}
