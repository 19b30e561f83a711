use crate::player::form::Form;

/// Semantic events emitted by the simulation for the presentation layer.
/// The core never draws, plays sounds, or touches UI — it announces what
/// happened and subscribers react (splash particles, camera shake, etc.).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// The player transformed. Carries the new form.
    FormChanged(Form),
    /// A jump executed (immediate or buffered).
    Jumped { form: Form },
    /// Airborne-to-grounded transition. `impact_velocity` is the vertical
    /// velocity on the frame before contact (positive = downward).
    Landed { impact_velocity: f32 },
    /// The marshmallow hit water. `intensity` in [0, 1] sizes the splash.
    EnteredWater { intensity: f32 },
    /// The marshmallow left all water volumes.
    ExitedWater,
    /// A checkpoint activated for the first time.
    CheckpointReached { index: usize },
    /// The player died (enemy contact or falling out of the world).
    Died,
    /// The player was reset at the active checkpoint.
    Respawned,
    /// The last life was spent.
    GameOver,
    /// The goal overlap fired. `completion_ms` is simulation time at arrival.
    GoalReached { completion_ms: f64 },
}
