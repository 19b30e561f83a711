pub mod api;
pub mod core;
pub mod level;
pub mod player;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::events::GameEvent;
pub use api::input::{InputSampler, InputState, Key};
pub use crate::core::body::{ArcadeBody, ContactFlags, BASE_DRAG_X, GRAVITY, MAX_FALL_SPEED};
pub use crate::core::time::{FixedTimestep, SimClock};
pub use level::data::{BoundsDef, EnemyDef, LevelData, PointDef, RectDef};
pub use level::geometry::{Aabb, Platform, WaterVolume};
pub use player::controller::{PlayerController, PlayerState, BALL_RADIUS, JUMP_BUFFER_WINDOW_MS};
pub use player::form::{Form, FormProfile, JellyTuning, JELLY_TUNING, MARSHMALLOW_BUOYANCY_ACCEL};
pub use systems::enemy::Enemy;
pub use systems::runtime::{LevelRuntime, PlayerView};
