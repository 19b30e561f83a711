use glam::Vec2;

use crate::level::data::EnemyDef;
use crate::level::geometry::Aabb;

const PATROL_SPEED: f32 = 150.0;
/// Bob phase advances per millisecond, so the wobble speed is framerate
/// independent.
const BOB_PHASE_RATE: f32 = 0.003;
const BOB_AMPLITUDE: f32 = 15.0;
/// Vertical spring pull toward the bobbing rest height.
const BOB_SPRING: f32 = 3.0;

const BODY_SIZE: Vec2 = Vec2::new(50.0, 35.0);

/// A patrolling hazard: walks between two x bounds at constant speed while
/// bobbing around its spawn height. Touching one costs a life.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    base_y: f32,
    patrol_start: f32,
    patrol_end: f32,
    direction: f32,
    bob_phase: f32,
}

impl Enemy {
    pub fn new(def: &EnemyDef) -> Self {
        Self {
            pos: Vec2::new(def.x, def.y),
            vel: Vec2::ZERO,
            base_y: def.y,
            patrol_start: def.patrol_start,
            patrol_end: def.patrol_end,
            direction: 1.0,
            bob_phase: 0.0,
        }
    }

    pub fn step(&mut self, delta_ms: f32) {
        let delta_ms = if delta_ms.is_finite() { delta_ms.max(0.0) } else { 0.0 };
        let dt = delta_ms / 1000.0;

        if self.pos.x <= self.patrol_start {
            self.direction = 1.0;
        } else if self.pos.x >= self.patrol_end {
            self.direction = -1.0;
        }
        self.vel.x = PATROL_SPEED * self.direction;

        self.bob_phase += BOB_PHASE_RATE * delta_ms;
        let rest_y = self.base_y + self.bob_phase.sin() * BOB_AMPLITUDE;
        self.vel.y = (rest_y - self.pos.y) * BOB_SPRING;

        self.pos += self.vel * dt;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, BODY_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_MS: f32 = 1000.0 / 60.0;

    fn patroller() -> Enemy {
        Enemy::new(&EnemyDef {
            x: 500.0,
            y: 900.0,
            patrol_start: 400.0,
            patrol_end: 700.0,
        })
    }

    #[test]
    fn walks_right_then_reverses_at_the_end() {
        let mut enemy = patroller();
        // 700 - 500 = 200 units at 150/s is 80 frames; give it slack.
        for _ in 0..100 {
            enemy.step(FRAME_MS);
        }
        assert!(enemy.vel.x < 0.0, "should have turned around");
        assert!(enemy.pos.x < 700.0 + PATROL_SPEED * FRAME_MS / 1000.0);
    }

    #[test]
    fn stays_within_patrol_bounds() {
        let mut enemy = patroller();
        let slack = PATROL_SPEED * FRAME_MS / 1000.0;
        for _ in 0..1000 {
            enemy.step(FRAME_MS);
            assert!(enemy.pos.x >= 400.0 - slack);
            assert!(enemy.pos.x <= 700.0 + slack);
        }
    }

    #[test]
    fn bobs_around_spawn_height() {
        let mut enemy = patroller();
        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        for _ in 0..2000 {
            enemy.step(FRAME_MS);
            min_y = min_y.min(enemy.pos.y);
            max_y = max_y.max(enemy.pos.y);
        }
        assert!(min_y < 900.0 && max_y > 900.0, "range {min_y}..{max_y}");
        assert!(min_y > 900.0 - 2.0 * BOB_AMPLITUDE);
        assert!(max_y < 900.0 + 2.0 * BOB_AMPLITUDE);
    }

    #[test]
    fn bounds_follow_position() {
        let enemy = patroller();
        let bounds = enemy.bounds();
        assert_eq!(bounds.center(), Vec2::new(500.0, 900.0));
        assert_eq!(bounds.max.x - bounds.min.x, 50.0);
        assert_eq!(bounds.max.y - bounds.min.y, 35.0);
    }
}
