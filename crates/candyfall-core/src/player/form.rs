/// The three physics/visual profiles the player can occupy.
///
/// Exactly one form is active at a time; code needing a boolean view calls
/// `is_marshmallow()`/`is_jelly()` instead of storing flags that could
/// drift out of sync with the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Form {
    #[default]
    Candy,
    Marshmallow,
    Jelly,
}

/// Movement constants for one form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormProfile {
    pub max_horizontal_speed: f32,
    /// Commanded acceleration while a direction is held.
    pub acceleration: f32,
    /// Negative = upward (Y-down coordinates).
    pub jump_velocity: f32,
    pub bounce: f32,
    pub can_jump: bool,
    /// Scales the rolling-ball spin; soft forms spin slower.
    pub rotation_multiplier: f32,
}

const CANDY: FormProfile = FormProfile {
    max_horizontal_speed: 480.0,
    acceleration: 1440.0,
    jump_velocity: -960.0,
    bounce: 0.0,
    can_jump: true,
    rotation_multiplier: 1.0,
};

const MARSHMALLOW: FormProfile = FormProfile {
    max_horizontal_speed: 240.0,
    acceleration: 720.0,
    // Unused: marshmallow cannot jump at all.
    jump_velocity: -960.0,
    bounce: 0.1,
    can_jump: false,
    rotation_multiplier: 0.5,
};

const JELLY: FormProfile = FormProfile {
    max_horizontal_speed: 360.0,
    acceleration: 1200.0,
    jump_velocity: -1320.0,
    bounce: 0.4,
    can_jump: true,
    rotation_multiplier: 0.7,
};

/// Jelly-only tuning: the automatic idle hop and the fast-fall drop.
#[derive(Debug, Clone, Copy)]
pub struct JellyTuning {
    pub idle_hop_velocity: f32,
    pub idle_hop_interval_ms: f64,
    pub fast_fall_acceleration: f32,
    /// Downward speed floor while fast-falling.
    pub fast_fall_min_velocity: f32,
}

pub const JELLY_TUNING: JellyTuning = JellyTuning {
    idle_hop_velocity: -300.0,
    idle_hop_interval_ms: 1200.0,
    fast_fall_acceleration: 4800.0,
    fast_fall_min_velocity: 1200.0,
};

/// Upward acceleration opposing a marshmallow's fall (also used for the
/// jelly's floaty descent).
pub const MARSHMALLOW_BUOYANCY_ACCEL: f32 = -400.0;

impl Form {
    pub fn profile(self) -> &'static FormProfile {
        match self {
            Form::Candy => &CANDY,
            Form::Marshmallow => &MARSHMALLOW,
            Form::Jelly => &JELLY,
        }
    }

    pub fn is_marshmallow(self) -> bool {
        self == Form::Marshmallow
    }

    pub fn is_jelly(self) -> bool {
        self == Form::Jelly
    }
}
