use glam::Vec2;

use crate::level::geometry::Aabb;

/// World gravity in units/s². Y-down coordinates: positive is downward.
pub const GRAVITY: f32 = 1920.0;
/// Baseline horizontal drag outside water.
pub const BASE_DRAG_X: f32 = 50.0;
/// Terminal falling speed.
pub const MAX_FALL_SPEED: f32 = 2400.0;

/// Contact flags reported by collision resolution.
/// `down` means contact on the body's underside, and so on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Axis-aligned arcade rigid body.
///
/// Arcade semantics rather than rigid-body dynamics: game code commands
/// acceleration or writes velocity directly; drag applies only on axes with
/// no commanded acceleration; velocity is clamped per axis; the platform
/// resolver applies `bounce` and fills the contact flags.
#[derive(Debug, Clone)]
pub struct ArcadeBody {
    /// Center of the collision box.
    pub pos: Vec2,
    pub vel: Vec2,
    /// Commanded acceleration, on top of gravity.
    pub accel: Vec2,
    /// Full extents of the collision box.
    pub size: Vec2,
    /// Per-axis velocity decay, applied only when `accel` is zero on that axis.
    pub drag: Vec2,
    /// Restitution used when the platform resolver stops this body.
    pub bounce: f32,
    /// Per-axis velocity clamp (symmetric).
    pub max_vel: Vec2,
    pub allow_gravity: bool,
    /// Overlap contact from the most recent resolution pass.
    pub touching: ContactFlags,
    /// Movement stopped by static geometry in the most recent pass.
    pub blocked: ContactFlags,
}

impl ArcadeBody {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            size,
            drag: Vec2::new(BASE_DRAG_X, 0.0),
            bounce: 0.0,
            max_vel: Vec2::new(f32::MAX, MAX_FALL_SPEED),
            allow_gravity: true,
            touching: ContactFlags::default(),
            blocked: ContactFlags::default(),
        }
    }

    // -- Builder pattern --

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_max_vel(mut self, max_vel: Vec2) -> Self {
        self.max_vel = max_vel;
        self
    }

    pub fn with_drag(mut self, drag: Vec2) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_bounce(mut self, bounce: f32) -> Self {
        self.bounce = bounce;
        self
    }

    pub fn with_gravity(mut self, allow: bool) -> Self {
        self.allow_gravity = allow;
        self
    }

    /// Collision box in world space.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// Clear contact flags ahead of this step's resolution pass.
    /// The flags stay valid for readers until the next `begin_step`.
    pub fn begin_step(&mut self) {
        self.touching = ContactFlags::default();
        self.blocked = ContactFlags::default();
    }

    /// Integrate one fixed step. Non-finite or negative `dt` is treated as
    /// zero so a bad frame delta can never poison velocity with NaN.
    pub fn integrate(&mut self, gravity: f32, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        let g = if self.allow_gravity { gravity } else { 0.0 };
        self.vel.x += self.accel.x * dt;
        self.vel.y += (self.accel.y + g) * dt;

        if self.accel.x == 0.0 {
            self.vel.x = decay(self.vel.x, self.drag.x * dt);
        }
        if self.accel.y == 0.0 {
            self.vel.y = decay(self.vel.y, self.drag.y * dt);
        }

        self.vel.x = self.vel.x.clamp(-self.max_vel.x, self.max_vel.x);
        self.vel.y = self.vel.y.clamp(-self.max_vel.y, self.max_vel.y);

        self.pos += self.vel * dt;
    }
}

/// Move `v` toward zero by `amount`, never crossing it.
fn decay(v: f32, amount: f32) -> f32 {
    if v > 0.0 {
        (v - amount).max(0.0)
    } else {
        (v + amount).min(0.0)
    }
}
