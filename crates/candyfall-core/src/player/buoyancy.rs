use log::debug;

use crate::api::events::GameEvent;
use crate::core::body::{ArcadeBody, BASE_DRAG_X};
use crate::level::geometry::WaterVolume;
use crate::player::controller::PlayerState;

/// Resting depth below the surface line.
const FLOAT_DEPTH: f32 = 15.0;

const BOB_SPEED_BASE: f32 = 0.02;
const BOB_SPEED_DIVISOR: f32 = 10_000.0;
const BOB_AMPLITUDE: f32 = 6.0;

/// Entry dip: |entry vy| / divisor, capped.
const DIP_DIVISOR: f32 = 30.0;
const DIP_MAX: f32 = 25.0;
const DIP_RECOVERY_RATE: f32 = 0.04;
const DIP_EASE_SCALE: f32 = 0.15;

const SPLASH_DIVISOR: f32 = 500.0;

const WATER_DRAG_BASE: f32 = 180.0;
const WATER_DRAG_SPEED_FACTOR: f32 = 0.5;

/// Tilt target is (vx / 300) * 0.15, approached at 10% per frame.
const TILT_VELOCITY_DIVISOR: f32 = 300.0;
const TILT_MAX: f32 = 0.15;
const TILT_RATE: f32 = 0.1;

/// Edge climb: within this band of a side edge, moving outward fast enough,
/// the float spring yields to an upward boost.
const EDGE_BAND: f32 = 120.0;
const EDGE_MIN_SPEED: f32 = 20.0;
const CLIMB_BOOST: f32 = -600.0;
const CLIMB_NUDGE: f32 = 5.0;
const CLIMB_MIN_OUTWARD: f32 = 280.0;

/// Float spring stiffens with distance from the rest point.
const SPRING_K_MIN: f32 = 6.0;
const SPRING_K_MAX: f32 = 10.0;
const SPRING_K_RAMP: f32 = 20.0;
const SPRING_DAMPING: f32 = 0.6;

const WAKE_MIN_SPEED: f32 = 50.0;
const WAKE_AMPLITUDE: f32 = 2.0;

/// One buoyancy step for the player, run after the controller and before the
/// body integrates. Only the marshmallow form interacts with water; anything
/// else passes straight through.
///
/// The bob, dip, tilt, and spring constants are per-frame values tuned for a
/// 60 Hz step.
pub fn step(
    state: &mut PlayerState,
    body: &mut ArcadeBody,
    volume: Option<&WaterVolume>,
    events: &mut Vec<GameEvent>,
) {
    let volume = match volume {
        Some(v) if state.form.is_marshmallow() => v,
        _ => {
            if state.in_water {
                exit_water(state, body, events);
            }
            return;
        }
    };

    if !state.in_water {
        enter_water(state, body, events);
    }

    // Bob faster while moving.
    let speed = body.vel.x.abs();
    let mut bob_speed = BOB_SPEED_BASE;
    if speed > WAKE_MIN_SPEED {
        bob_speed += speed / BOB_SPEED_DIVISOR;
    }
    state.water_bob_phase += bob_speed;

    // The entry dip eases back out over ~25 frames.
    if state.water_dip_amount > 0.0 {
        state.water_dip_recovery += DIP_RECOVERY_RATE;
        let t = state.water_dip_recovery.min(1.0);
        let ease = 1.0 - (1.0 - t).powi(3);
        state.water_dip_amount -= state.water_dip_amount * ease * DIP_EASE_SCALE;
        if state.water_dip_recovery >= 1.0 {
            state.water_dip_amount = 0.0;
            state.water_dip_recovery = 0.0;
        }
    }

    body.drag.x = WATER_DRAG_BASE + WATER_DRAG_SPEED_FACTOR * speed;

    // Lean into the drift.
    let tilt_target = (body.vel.x / TILT_VELOCITY_DIVISOR) * TILT_MAX;
    state.rotation += (tilt_target - state.rotation) * TILT_RATE;

    if try_edge_climb(body, volume) {
        return;
    }

    // Damped spring toward the float line, offset by bob and dip.
    let bob_offset = state.water_bob_phase.sin() * BOB_AMPLITUDE;
    let target_y = volume.surface_y() + FLOAT_DEPTH + bob_offset + state.water_dip_amount;
    let dist = target_y - body.pos.y;
    let k = lerp(SPRING_K_MIN, SPRING_K_MAX, (dist.abs() / SPRING_K_RAMP).min(1.0));
    body.vel.y = dist * k - SPRING_DAMPING * body.vel.y;

    // Trailing wake while cruising, superimposed on the spring output.
    if speed > WAKE_MIN_SPEED {
        body.vel.y += (state.water_bob_phase * 2.0).sin() * WAKE_AMPLITUDE;
    }
}

fn enter_water(state: &mut PlayerState, body: &ArcadeBody, events: &mut Vec<GameEvent>) {
    state.in_water = true;
    state.water_entry_velocity = body.vel.y;
    state.water_dip_amount = (body.vel.y.abs() / DIP_DIVISOR).min(DIP_MAX);
    state.water_dip_recovery = 0.0;
    let intensity = (body.vel.y.abs() / SPLASH_DIVISOR).min(1.0);
    debug!("entered water at vy {:.1}", body.vel.y);
    events.push(GameEvent::EnteredWater { intensity });
}

fn exit_water(state: &mut PlayerState, body: &mut ArcadeBody, events: &mut Vec<GameEvent>) {
    state.in_water = false;
    state.water_dip_amount = 0.0;
    state.water_dip_recovery = 0.0;
    body.drag.x = BASE_DRAG_X;
    debug!("exited water");
    events.push(GameEvent::ExitedWater);
}

/// Swimming hard at a side edge converts the float into a climb-out: an
/// upward boost scaled by proximity, a small lift, and enough outward speed
/// to clear the lip.
fn try_edge_climb(body: &mut ArcadeBody, volume: &WaterVolume) -> bool {
    let (edge_dist, outward) = if body.vel.x < -EDGE_MIN_SPEED {
        (volume.distance_to_left_edge(body.pos.x), -1.0)
    } else if body.vel.x > EDGE_MIN_SPEED {
        (volume.distance_to_right_edge(body.pos.x), 1.0)
    } else {
        return false;
    };
    if edge_dist >= EDGE_BAND {
        return false;
    }

    let strength = 1.0 - edge_dist / EDGE_BAND;
    body.vel.y = strength * CLIMB_BOOST;
    body.pos.y -= CLIMB_NUDGE;
    let min_outward = strength * CLIMB_MIN_OUTWARD;
    if body.vel.x.abs() < min_outward {
        body.vel.x = outward * min_outward;
    }
    true
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
