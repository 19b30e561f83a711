use glam::Vec2;
use log::debug;

use crate::api::events::GameEvent;
use crate::api::input::InputState;
use crate::core::body::{ArcadeBody, BASE_DRAG_X};
use crate::core::time::SimClock;
use crate::player::form::{Form, JELLY_TUNING, MARSHMALLOW_BUOYANCY_ACCEL};

/// Visual ball radius; the roll formula spins one full circumference per
/// `2 * radius` units travelled.
pub const BALL_RADIUS: f32 = 48.0;
/// A jump pressed in the air executes on landing if the landing happens
/// within this window.
pub const JUMP_BUFFER_WINDOW_MS: f64 = 150.0;

/// Deceleration when no direction is held.
const FRICTION: f32 = 720.0;
/// |vx| at or below this snaps straight to zero instead of creeping.
const FRICTION_SNAP: f32 = 3.0;
/// Roll only when moving faster than this.
const ROLL_MIN_SPEED: f32 = 10.0;
/// Jelly big-jump tolerance: with last frame's grounded flag still set,
/// vertical velocity inside this open interval counts as "on the ground".
const JELLY_NEAR_GROUND_VY_MIN: f32 = -100.0;
const JELLY_NEAR_GROUND_VY_MAX: f32 = 50.0;

/// Mutable per-entity player record. Created once at level start and reset
/// in place on respawn so camera-follow and attached visuals keep their
/// target.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub form: Form,
    /// Visual roll angle, radians. No gameplay effect.
    pub rotation: f32,
    pub is_grounded: bool,
    /// Set while airborne; the grounded edge plus this flag is a landing.
    pub was_airborne: bool,
    pub is_dead: bool,
    /// Simulation time of an unconsumed airborne jump press.
    pub jump_buffered_at_ms: Option<f64>,
    /// Simulation time of the last jelly hop or jump.
    pub jelly_hop_timer_ms: f64,
    pub jelly_fast_falling: bool,
    // Water interaction state, written by the buoyancy step.
    pub in_water: bool,
    pub water_bob_phase: f32,
    pub water_dip_amount: f32,
    pub water_dip_recovery: f32,
    pub water_entry_velocity: f32,
}

impl PlayerState {
    pub fn new() -> Self {
        Self {
            form: Form::Candy,
            rotation: 0.0,
            is_grounded: false,
            was_airborne: false,
            is_dead: false,
            jump_buffered_at_ms: None,
            jelly_hop_timer_ms: 0.0,
            jelly_fast_falling: false,
            in_water: false,
            water_bob_phase: 0.0,
            water_dip_amount: 0.0,
            water_dip_recovery: 0.0,
            water_entry_velocity: 0.0,
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Translates per-frame input plus physics-body feedback into velocity and
/// acceleration commands: the form state machine, jump buffering, the jelly
/// hop/fast-fall behaviors, and the visual roll angle.
#[derive(Debug, Default)]
pub struct PlayerController {
    pub state: PlayerState,
}

impl PlayerController {
    pub fn new() -> Self {
        Self {
            state: PlayerState::new(),
        }
    }

    /// One simulation step, before the body integrates.
    ///
    /// Reads the body's contact flags from the previous frame's resolution
    /// pass and writes acceleration/velocity commands for this frame's
    /// integration.
    pub fn step(
        &mut self,
        body: &mut ArcadeBody,
        input: &InputState,
        clock: &SimClock,
        delta_ms: f32,
        events: &mut Vec<GameEvent>,
    ) {
        if self.state.is_dead {
            return;
        }
        // Non-finite or negative frame deltas degrade to a zero-length step.
        let delta_ms = if delta_ms.is_finite() { delta_ms.max(0.0) } else { 0.0 };
        let dt = delta_ms / 1000.0;

        if input.toggle_jelly {
            self.toggle(Form::Jelly, body, clock, events);
        }
        if input.toggle_marshmallow {
            self.toggle(Form::Marshmallow, body, clock, events);
        }

        let profile = self.state.form.profile();
        if input.left {
            body.accel.x = -profile.acceleration;
        } else if input.right {
            body.accel.x = profile.acceleration;
        } else {
            apply_friction(body, dt);
        }

        let jumped = if input.jump_pressed {
            match self.state.form {
                Form::Jelly => self.jelly_jump_input(body, clock, events),
                form if form.profile().can_jump => self.jump_input(body, clock, events),
                _ => false,
            }
        } else {
            false
        };

        // Contact flags still show last frame's ground on the jump frame;
        // re-deriving grounded state then would report a phantom landing.
        if !jumped {
            self.update_grounded(body, clock, events);
        }
        self.apply_form_forces(body, clock);
        self.update_roll(body, dt);
    }

    /// Freeze the player. Every subsequent `step` is a no-op until respawn.
    pub fn kill(&mut self, body: &mut ArcadeBody, events: &mut Vec<GameEvent>) {
        if self.state.is_dead {
            return;
        }
        self.state.is_dead = true;
        body.vel = Vec2::ZERO;
        body.accel = Vec2::ZERO;
        body.allow_gravity = false;
        debug!("player died at {:?}", body.pos);
        events.push(GameEvent::Died);
    }

    /// Reset in place at `position`: velocity zeroed, form back to Candy,
    /// all transient state cleared.
    pub fn respawn(&mut self, body: &mut ArcadeBody, position: Vec2, events: &mut Vec<GameEvent>) {
        self.state = PlayerState::new();
        body.pos = position;
        body.vel = Vec2::ZERO;
        body.accel = Vec2::ZERO;
        body.allow_gravity = true;
        body.drag.x = BASE_DRAG_X;
        let candy = Form::Candy.profile();
        body.max_vel.x = candy.max_horizontal_speed;
        body.bounce = candy.bounce;
        debug!("player respawned at {position:?}");
        events.push(GameEvent::Respawned);
    }

    fn toggle(
        &mut self,
        toggled: Form,
        body: &mut ArcadeBody,
        clock: &SimClock,
        events: &mut Vec<GameEvent>,
    ) {
        let next = if self.state.form == toggled {
            Form::Candy
        } else {
            toggled
        };
        if self.state.form.is_jelly() {
            self.state.jelly_fast_falling = false;
        }
        // The jump buffer intentionally survives a transform; whether it
        // fires on landing is decided by the active form's can_jump.
        self.state.form = next;
        let profile = next.profile();
        body.max_vel.x = profile.max_horizontal_speed;
        body.bounce = profile.bounce;
        if next.is_jelly() {
            self.state.jelly_hop_timer_ms = clock.now_ms();
        }
        debug!("form changed to {next:?}");
        events.push(GameEvent::FormChanged(next));
    }

    fn jump_input(
        &mut self,
        body: &mut ArcadeBody,
        clock: &SimClock,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if body.touching.down || body.blocked.down {
            body.vel.y = self.state.form.profile().jump_velocity;
            self.state.is_grounded = false;
            self.state.was_airborne = true;
            self.state.jump_buffered_at_ms = None;
            events.push(GameEvent::Jumped {
                form: self.state.form,
            });
            true
        } else {
            self.state.jump_buffered_at_ms = Some(clock.now_ms());
            false
        }
    }

    fn jelly_jump_input(
        &mut self,
        body: &mut ArcadeBody,
        clock: &SimClock,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let on_ground = body.touching.down || body.blocked.down;
        let near_ground = self.state.is_grounded
            && body.vel.y > JELLY_NEAR_GROUND_VY_MIN
            && body.vel.y < JELLY_NEAR_GROUND_VY_MAX;

        if on_ground || near_ground {
            body.vel.y = Form::Jelly.profile().jump_velocity;
            self.state.jelly_hop_timer_ms = clock.now_ms();
            self.state.is_grounded = false;
            self.state.was_airborne = true;
            self.state.jump_buffered_at_ms = None;
            events.push(GameEvent::Jumped { form: Form::Jelly });
            true
        } else {
            // Airborne press: cancel any rise and drop fast. The press is
            // consumed here, not kept as a buffered jump, so landing right
            // after a fast-fall never relaunches.
            body.vel.y = body.vel.y.max(0.0);
            self.state.jelly_fast_falling = true;
            self.state.jump_buffered_at_ms = None;
            false
        }
    }

    fn update_grounded(
        &mut self,
        body: &mut ArcadeBody,
        clock: &SimClock,
        events: &mut Vec<GameEvent>,
    ) {
        let was_grounded = self.state.is_grounded;
        let impact_velocity = body.vel.y;
        self.state.is_grounded = body.touching.down || body.blocked.down;

        if let Some(pressed_at) = self.state.jump_buffered_at_ms {
            let age = clock.now_ms() - pressed_at;
            if age > JUMP_BUFFER_WINDOW_MS {
                self.state.jump_buffered_at_ms = None;
            } else if self.state.is_grounded {
                // Landing consumes the buffer either way; a form that cannot
                // jump simply eats it.
                self.state.jump_buffered_at_ms = None;
                let profile = self.state.form.profile();
                if profile.can_jump {
                    body.vel.y = profile.jump_velocity;
                    if self.state.form.is_jelly() {
                        self.state.jelly_hop_timer_ms = clock.now_ms();
                    }
                    self.state.is_grounded = false;
                    self.state.was_airborne = true;
                    events.push(GameEvent::Jumped {
                        form: self.state.form,
                    });
                    // The buffered jump replaces the landing this frame.
                    return;
                }
            }
        }

        if self.state.is_grounded && !was_grounded && self.state.was_airborne {
            debug!("landed at vy {impact_velocity:.1}");
            events.push(GameEvent::Landed { impact_velocity });
        }
        self.state.was_airborne = !self.state.is_grounded;
    }

    fn apply_form_forces(&mut self, body: &mut ArcadeBody, clock: &SimClock) {
        match self.state.form {
            Form::Candy => {
                body.accel.y = 0.0;
            }
            Form::Marshmallow => {
                // Buoyant only while falling; gravity alone governs the rise.
                if !self.state.is_grounded && body.vel.y > 0.0 {
                    body.accel.y = MARSHMALLOW_BUOYANCY_ACCEL;
                } else {
                    body.accel.y = 0.0;
                }
            }
            Form::Jelly => {
                if self.state.is_grounded {
                    self.state.jelly_fast_falling = false;
                    body.accel.y = 0.0;
                    if clock.now_ms() - self.state.jelly_hop_timer_ms
                        > JELLY_TUNING.idle_hop_interval_ms
                    {
                        body.vel.y = JELLY_TUNING.idle_hop_velocity;
                        self.state.jelly_hop_timer_ms = clock.now_ms();
                    }
                } else if self.state.jelly_fast_falling {
                    body.accel.y = JELLY_TUNING.fast_fall_acceleration;
                    body.vel.y = body.vel.y.max(JELLY_TUNING.fast_fall_min_velocity);
                } else if body.vel.y > 0.0 {
                    body.accel.y = MARSHMALLOW_BUOYANCY_ACCEL;
                } else {
                    body.accel.y = 0.0;
                }
            }
        }
    }

    fn update_roll(&mut self, body: &ArcadeBody, dt: f32) {
        // In water the tilt interpolation owns the rotation instead.
        if self.state.in_water {
            return;
        }
        let vx = body.vel.x;
        if vx.abs() > ROLL_MIN_SPEED {
            let profile = self.state.form.profile();
            self.state.rotation += vx / (2.0 * BALL_RADIUS) * profile.rotation_multiplier * dt;
        }
    }
}

fn apply_friction(body: &mut ArcadeBody, dt: f32) {
    body.accel.x = 0.0;
    if body.vel.x.abs() <= FRICTION_SNAP {
        body.vel.x = 0.0;
    } else {
        let step = (FRICTION * dt).min(body.vel.x.abs());
        body.vel.x -= body.vel.x.signum() * step;
    }
}
