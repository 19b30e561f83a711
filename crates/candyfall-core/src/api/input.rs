/// Logical keys the simulation understands.
/// Hosts map physical keyboard/gamepad input onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Jump,
    Marshmallow,
    Jelly,
}

/// Per-frame input snapshot consumed by the player controller.
///
/// `jump_pressed` and the two toggles are edges — true only on the frame
/// the key went down. `left`/`right`/`jump_held` are level-triggered.
/// The controller acts on the edge only; `jump_held` is carried for hosts
/// (hold-to-repeat UI, a future variable-height jump) and is not read by
/// the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump_pressed: bool,
    pub jump_held: bool,
    pub toggle_marshmallow: bool,
    pub toggle_jelly: bool,
}

/// Turns key-down/key-up streams into per-frame `InputState` snapshots.
/// The host pushes raw transitions as they arrive; `sample()` builds the
/// snapshot for the frame and clears the press edges.
#[derive(Debug, Default)]
pub struct InputSampler {
    left_down: bool,
    right_down: bool,
    jump_down: bool,
    jump_edge: bool,
    marshmallow_edge: bool,
    jelly_edge: bool,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Left => self.left_down = true,
            Key::Right => self.right_down = true,
            Key::Jump => {
                // Auto-repeat from held keys must not re-trigger the edge.
                if !self.jump_down {
                    self.jump_edge = true;
                }
                self.jump_down = true;
            }
            Key::Marshmallow => self.marshmallow_edge = true,
            Key::Jelly => self.jelly_edge = true,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.left_down = false,
            Key::Right => self.right_down = false,
            Key::Jump => self.jump_down = false,
            Key::Marshmallow | Key::Jelly => {}
        }
    }

    /// Build the snapshot for this frame and consume the press edges.
    pub fn sample(&mut self) -> InputState {
        let state = InputState {
            left: self.left_down,
            right: self.right_down,
            jump_pressed: self.jump_edge,
            jump_held: self.jump_down,
            toggle_marshmallow: self.marshmallow_edge,
            toggle_jelly: self.jelly_edge,
        };
        self.jump_edge = false;
        self.marshmallow_edge = false;
        self.jelly_edge = false;
        state
    }
}
