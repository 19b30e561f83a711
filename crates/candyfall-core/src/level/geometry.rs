use glam::Vec2;

/// Axis-aligned box, min/max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// Static platform collider. Read-only after level load.
#[derive(Debug, Clone, Copy)]
pub struct Platform {
    pub bounds: Aabb,
}

/// Axis-aligned water region. The surface is the top edge; the buoyancy
/// model floats the marshmallow a fixed depth below it. Read-only after
/// level load.
#[derive(Debug, Clone, Copy)]
pub struct WaterVolume {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl WaterVolume {
    pub fn from_bounds(bounds: Aabb) -> Self {
        Self {
            left: bounds.min.x,
            right: bounds.max.x,
            top: bounds.min.y,
            bottom: bounds.max.y,
        }
    }

    pub fn surface_y(&self) -> f32 {
        self.top
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }

    pub fn distance_to_left_edge(&self, x: f32) -> f32 {
        x - self.left
    }

    pub fn distance_to_right_edge(&self, x: f32) -> f32 {
        self.right - x
    }
}
