use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::level::geometry::{Aabb, Platform, WaterVolume};

/// Level description, loaded from JSON at runtime.
///
/// Field names are camelCase on the wire to stay compatible with the
/// hand-authored level tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub platforms: Vec<RectDef>,
    #[serde(default)]
    pub water_areas: Vec<RectDef>,
    #[serde(default)]
    pub checkpoints: Vec<PointDef>,
    #[serde(default)]
    pub enemies: Vec<EnemyDef>,
    pub player_start: PointDef,
    pub goal: PointDef,
    pub world_bounds: BoundsDef,
}

/// Center-based rectangle, the convention of the level tables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RectDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointDef {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyDef {
    pub x: f32,
    pub y: f32,
    pub patrol_start: f32,
    pub patrol_end: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundsDef {
    pub width: f32,
    pub height: f32,
}

impl LevelData {
    /// Parse a level from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl RectDef {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(Vec2::new(self.x, self.y), Vec2::new(self.width, self.height))
    }

    pub fn platform(&self) -> Platform {
        Platform {
            bounds: self.bounds(),
        }
    }

    pub fn water_volume(&self) -> WaterVolume {
        WaterVolume::from_bounds(self.bounds())
    }
}

impl PointDef {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}
