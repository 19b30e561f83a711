use glam::Vec2;
use log::{debug, info};

use crate::api::events::GameEvent;
use crate::api::input::InputState;
use crate::core::body::{ArcadeBody, GRAVITY, MAX_FALL_SPEED};
use crate::core::collide::resolve_platforms;
use crate::core::time::{FixedTimestep, SimClock};
use crate::level::data::LevelData;
use crate::level::geometry::{Aabb, Platform, WaterVolume};
use crate::player::buoyancy;
use crate::player::controller::{PlayerController, BALL_RADIUS};
use crate::player::form::Form;
use crate::systems::enemy::Enemy;

/// Collision box edge. Slightly tighter than the visual diameter so the ball
/// overlaps ledges the way the art suggests.
const PLAYER_BODY_SIZE: f32 = 2.0 * BALL_RADIUS - 8.0;
const STARTING_LIVES: u32 = 3;
const CHECKPOINT_SIZE: Vec2 = Vec2::new(60.0, 80.0);
const GOAL_SIZE: Vec2 = Vec2::new(120.0, 180.0);
/// Respawn slightly above a checkpoint so the player falls onto it.
const CHECKPOINT_RESPAWN_LIFT: f32 = 50.0;
/// Fixed tick driven by `advance`. The water and friction constants are
/// tuned against this rate.
const STEP_MS: f32 = 1000.0 / 60.0;

#[derive(Debug)]
struct Checkpoint {
    bounds: Aabb,
    activated: bool,
}

/// Snapshot of player state for the presentation layer.
#[derive(Debug, Clone, Copy)]
pub struct PlayerView {
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
    pub form: Form,
    pub is_grounded: bool,
    pub in_water: bool,
    pub is_dead: bool,
}

/// The whole simulation for one loaded level: the player and its physics
/// body, enemies, static geometry, checkpoints, lives, and the goal latch.
///
/// Hosts drive it with `step()` once per fixed tick and drain the returned
/// events. Rendering reads `player_view()` and `enemies`.
pub struct LevelRuntime {
    body: ArcadeBody,
    player: PlayerController,
    pub enemies: Vec<Enemy>,
    platforms: Vec<Platform>,
    water: Vec<WaterVolume>,
    checkpoints: Vec<Checkpoint>,
    goal: Aabb,
    world_bounds: Vec2,
    respawn_point: Vec2,
    lives: u32,
    clock: SimClock,
    timestep: FixedTimestep,
    goal_reached: bool,
    events: Vec<GameEvent>,
}

impl LevelRuntime {
    pub fn new(level: &LevelData) -> Self {
        let start = level.player_start.position();
        let candy = Form::Candy.profile();
        let body = ArcadeBody::new(start, Vec2::splat(PLAYER_BODY_SIZE))
            .with_max_vel(Vec2::new(candy.max_horizontal_speed, MAX_FALL_SPEED));

        info!(
            "level loaded: {} platforms, {} water areas, {} checkpoints, {} enemies",
            level.platforms.len(),
            level.water_areas.len(),
            level.checkpoints.len(),
            level.enemies.len(),
        );

        Self {
            body,
            player: PlayerController::new(),
            enemies: level.enemies.iter().map(Enemy::new).collect(),
            platforms: level.platforms.iter().map(|r| r.platform()).collect(),
            water: level.water_areas.iter().map(|r| r.water_volume()).collect(),
            checkpoints: level
                .checkpoints
                .iter()
                .map(|p| Checkpoint {
                    bounds: Aabb::from_center(p.position(), CHECKPOINT_SIZE),
                    activated: false,
                })
                .collect(),
            goal: Aabb::from_center(level.goal.position(), GOAL_SIZE),
            world_bounds: Vec2::new(level.world_bounds.width, level.world_bounds.height),
            respawn_point: start,
            lives: STARTING_LIVES,
            clock: SimClock::new(),
            timestep: FixedTimestep::new(STEP_MS),
            goal_reached: false,
            events: Vec::new(),
        }
    }

    /// Parse and load a level in one go.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(&LevelData::from_json(json)?))
    }

    /// Feed an irregular host frame. Accumulates the delta and runs zero or
    /// more fixed ticks, so the per-tick tuning constants hold no matter how
    /// uneven the host's frame pacing is. Returns every event that fired.
    pub fn advance(&mut self, input: &InputState, frame_ms: f32) -> &[GameEvent] {
        self.events.clear();
        let steps = self.timestep.accumulate(frame_ms);
        for _ in 0..steps {
            self.run_step(input, STEP_MS);
        }
        &self.events
    }

    /// Advance the simulation by exactly one step of `delta_ms`. Hosts that
    /// already tick at a fixed rate call this directly. Returns the events
    /// that fired this step; the slice is valid until the next call.
    pub fn step(&mut self, input: &InputState, delta_ms: f32) -> &[GameEvent] {
        self.events.clear();
        self.run_step(input, delta_ms);
        &self.events
    }

    fn run_step(&mut self, input: &InputState, delta_ms: f32) {
        let delta_ms = if delta_ms.is_finite() { delta_ms.max(0.0) } else { 0.0 };
        let dt = delta_ms / 1000.0;
        self.clock.advance(delta_ms);

        if !self.goal_reached {
            self.player
                .step(&mut self.body, input, &self.clock, delta_ms, &mut self.events);

            let volume = if self.player.state.form.is_marshmallow() {
                let pos = self.body.pos;
                self.water.iter().find(|w| w.contains(pos))
            } else {
                None
            };
            buoyancy::step(&mut self.player.state, &mut self.body, volume, &mut self.events);

            self.body.begin_step();
            self.body.integrate(GRAVITY, dt);
            resolve_platforms(&mut self.body, &self.platforms);
        }

        for enemy in &mut self.enemies {
            enemy.step(delta_ms);
        }

        if !self.goal_reached && !self.player.state.is_dead {
            self.check_overlaps();
        }
    }

    /// Reset the player at the active checkpoint. A no-op unless the player
    /// is dead with lives remaining; hosts call it after their death
    /// animation finishes.
    pub fn respawn(&mut self) -> &[GameEvent] {
        self.events.clear();
        if self.player.state.is_dead && self.lives > 0 {
            let point = self.respawn_point;
            self.player.respawn(&mut self.body, point, &mut self.events);
        }
        &self.events
    }

    pub fn player_view(&self) -> PlayerView {
        PlayerView {
            position: self.body.pos,
            velocity: self.body.vel,
            rotation: self.player.state.rotation,
            form: self.player.state.form,
            is_grounded: self.player.state.is_grounded,
            in_water: self.player.state.in_water,
            is_dead: self.player.state.is_dead,
        }
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn goal_reached(&self) -> bool {
        self.goal_reached
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    fn check_overlaps(&mut self) {
        let player_box = self.body.aabb();

        for (index, checkpoint) in self.checkpoints.iter_mut().enumerate() {
            if !checkpoint.activated && player_box.overlaps(&checkpoint.bounds) {
                checkpoint.activated = true;
                self.respawn_point =
                    checkpoint.bounds.center() - Vec2::new(0.0, CHECKPOINT_RESPAWN_LIFT);
                debug!("checkpoint {index} activated");
                self.events.push(GameEvent::CheckpointReached { index });
            }
        }

        let hit = self
            .enemies
            .iter()
            .any(|enemy| player_box.overlaps(&enemy.bounds()));
        if hit {
            self.lose_life();
            return;
        }

        if self.body.pos.y > self.world_bounds.y {
            self.lose_life();
            return;
        }

        if player_box.overlaps(&self.goal) {
            self.goal_reached = true;
            self.body.vel = Vec2::ZERO;
            self.body.accel = Vec2::ZERO;
            self.body.allow_gravity = false;
            info!("goal reached at {:.0} ms", self.clock.now_ms());
            self.events.push(GameEvent::GoalReached {
                completion_ms: self.clock.now_ms(),
            });
        }
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.player.kill(&mut self.body, &mut self.events);
        if self.lives == 0 {
            info!("game over");
            self.events.push(GameEvent::GameOver);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::data::{BoundsDef, EnemyDef, PointDef, RectDef};

    const FRAME_MS: f32 = 1000.0 / 60.0;

    fn flat_level() -> LevelData {
        LevelData {
            platforms: vec![RectDef {
                x: 2000.0,
                y: 1044.0,
                width: 4000.0,
                height: 72.0,
            }],
            water_areas: vec![],
            checkpoints: vec![PointDef { x: 800.0, y: 950.0 }],
            enemies: vec![],
            player_start: PointDef { x: 240.0, y: 900.0 },
            goal: PointDef { x: 1600.0, y: 900.0 },
            world_bounds: BoundsDef {
                width: 4000.0,
                height: 1080.0,
            },
        }
    }

    fn run(runtime: &mut LevelRuntime, input: &InputState, frames: usize) -> Vec<GameEvent> {
        let mut all = Vec::new();
        for _ in 0..frames {
            all.extend_from_slice(runtime.step(input, FRAME_MS));
        }
        all
    }

    #[test]
    fn player_falls_from_start_and_lands() {
        let mut runtime = LevelRuntime::new(&flat_level());
        let events = run(&mut runtime, &InputState::default(), 60);

        assert!(events.iter().any(|e| matches!(e, GameEvent::Landed { .. })));
        let view = runtime.player_view();
        assert!(view.is_grounded);
        // Platform top is 1008; body half-extent is 44.
        assert!((view.position.y - 964.0).abs() < 1.0, "y = {}", view.position.y);
    }

    #[test]
    fn checkpoint_sets_respawn_point() {
        let mut runtime = LevelRuntime::new(&flat_level());
        run(&mut runtime, &InputState::default(), 60);

        let right = InputState {
            right: true,
            ..Default::default()
        };
        // 560 units to the checkpoint at up to 480/s.
        let events = run(&mut runtime, &right, 240);
        assert!(events.contains(&GameEvent::CheckpointReached { index: 0 }));
        assert_eq!(runtime.respawn_point, Vec2::new(800.0, 900.0));
    }

    #[test]
    fn checkpoint_activates_once() {
        let mut runtime = LevelRuntime::new(&flat_level());
        run(&mut runtime, &InputState::default(), 60);
        let right = InputState {
            right: true,
            ..Default::default()
        };
        let events = run(&mut runtime, &right, 300);
        let count = events
            .iter()
            .filter(|e| matches!(e, GameEvent::CheckpointReached { .. }))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn enemy_contact_costs_a_life_and_respawn_restores() {
        let mut level = flat_level();
        level.enemies = vec![EnemyDef {
            x: 700.0,
            y: 964.0,
            patrol_start: 600.0,
            patrol_end: 900.0,
        }];
        let mut runtime = LevelRuntime::new(&level);
        run(&mut runtime, &InputState::default(), 60);

        let right = InputState {
            right: true,
            ..Default::default()
        };
        let events = run(&mut runtime, &right, 240);
        assert!(events.contains(&GameEvent::Died));
        assert_eq!(runtime.lives(), 2);
        assert!(runtime.player_view().is_dead);

        // Dead player ignores further stepping.
        let frozen = runtime.player_view().position;
        run(&mut runtime, &right, 30);
        assert_eq!(runtime.player_view().position, frozen);

        let events = runtime.respawn().to_vec();
        assert!(events.contains(&GameEvent::Respawned));
        assert!(!runtime.player_view().is_dead);
        // No checkpoint was reached, so respawn is at the start.
        assert_eq!(runtime.player_view().position, Vec2::new(240.0, 900.0));
    }

    #[test]
    fn falling_out_of_the_world_kills() {
        let mut level = flat_level();
        level.platforms.clear();
        let mut runtime = LevelRuntime::new(&level);

        let events = run(&mut runtime, &InputState::default(), 120);
        assert!(events.contains(&GameEvent::Died));
        assert_eq!(runtime.lives(), 2);
    }

    #[test]
    fn three_deaths_end_the_game() {
        let mut level = flat_level();
        level.platforms.clear();
        let mut runtime = LevelRuntime::new(&level);

        for expected_lives in [2, 1] {
            run(&mut runtime, &InputState::default(), 120);
            assert_eq!(runtime.lives(), expected_lives);
            assert!(!runtime.respawn().is_empty());
        }

        let events = run(&mut runtime, &InputState::default(), 120);
        assert!(events.contains(&GameEvent::GameOver));
        assert_eq!(runtime.lives(), 0);
        assert!(runtime.respawn().is_empty(), "no respawn at zero lives");
    }

    #[test]
    fn reaching_the_goal_latches_the_run() {
        let mut runtime = LevelRuntime::new(&flat_level());
        run(&mut runtime, &InputState::default(), 60);

        let right = InputState {
            right: true,
            ..Default::default()
        };
        let events = run(&mut runtime, &right, 600);
        let completion = events.iter().find_map(|e| match e {
            GameEvent::GoalReached { completion_ms } => Some(*completion_ms),
            _ => None,
        });
        assert!(completion.is_some());
        assert!(runtime.goal_reached());

        // Latched: the player stops responding, position freezes.
        let frozen = runtime.player_view().position;
        run(&mut runtime, &right, 60);
        assert_eq!(runtime.player_view().position, frozen);
    }

    #[test]
    fn goal_fires_exactly_once() {
        let mut runtime = LevelRuntime::new(&flat_level());
        let right = InputState {
            right: true,
            ..Default::default()
        };
        let events = run(&mut runtime, &right, 900);
        let count = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GoalReached { .. }))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn advance_accumulates_host_frames_into_fixed_ticks() {
        let mut runtime = LevelRuntime::new(&flat_level());

        // Too little time for a tick: nothing moves.
        runtime.advance(&InputState::default(), 8.0);
        assert_eq!(runtime.now_ms(), 0.0);
        assert_eq!(runtime.player_view().position, Vec2::new(240.0, 900.0));

        // The leftover 8 ms plus 10 more crosses one tick.
        runtime.advance(&InputState::default(), 10.0);
        assert_eq!(runtime.now_ms(), f64::from(FRAME_MS));
        assert!(runtime.player_view().position.y > 900.0, "one tick of fall");
    }

    #[test]
    fn advance_matches_fixed_stepping() {
        let mut stepped = LevelRuntime::new(&flat_level());
        let mut advanced = LevelRuntime::new(&flat_level());
        let right = InputState {
            right: true,
            ..Default::default()
        };

        // Uneven host frames; compare against the same number of fixed ticks.
        let frames = [9.0_f32, 33.0, 17.0, 25.0, 8.0];
        for _ in 0..40 {
            for frame in frames {
                advanced.advance(&right, frame);
            }
        }
        let ticks = (advanced.now_ms() / f64::from(FRAME_MS)).round() as u32;
        assert!(ticks > 100, "uneven frames should still produce ticks");
        for _ in 0..ticks {
            stepped.step(&right, FRAME_MS);
        }

        let a = advanced.player_view();
        let s = stepped.player_view();
        assert_eq!(a.position, s.position);
        assert_eq!(a.velocity, s.velocity);
    }

    #[test]
    fn advance_caps_a_long_hitch() {
        let mut runtime = LevelRuntime::new(&flat_level());
        runtime.advance(&InputState::default(), 5000.0);
        // At most ten ticks run after a stall, never a five-second burst.
        assert!(runtime.now_ms() <= f64::from(10.0 * FRAME_MS) + 1e-3);
    }

    #[test]
    fn advance_collects_events_across_ticks() {
        let mut runtime = LevelRuntime::new(&flat_level());
        // One big frame spans several ticks including the landing.
        let mut landed = false;
        for _ in 0..10 {
            landed |= runtime
                .advance(&InputState::default(), 10.0 * FRAME_MS)
                .iter()
                .any(|e| matches!(e, GameEvent::Landed { .. }));
        }
        assert!(landed);
    }

    #[test]
    fn loads_from_json() {
        let json = r#"{
            "platforms": [ { "x": 350, "y": 1044, "width": 700, "height": 72 } ],
            "playerStart": { "x": 240, "y": 900 },
            "goal": { "x": 600, "y": 900 },
            "worldBounds": { "width": 8220, "height": 1080 }
        }"#;
        let runtime = LevelRuntime::from_json(json).unwrap();
        assert_eq!(runtime.lives(), STARTING_LIVES);
        assert!(LevelRuntime::from_json("{}").is_err());
    }
}
