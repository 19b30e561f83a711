/// Milliseconds since simulation start.
///
/// Jump buffering and the jelly hop cadence measure time against this clock
/// rather than the wall clock, so a test (or a replay) can step it
/// deterministically. The runtime advances it once per frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimClock {
    now_ms: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame delta. Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, delta_ms: f32) {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.now_ms += f64::from(delta_ms);
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

/// Fixed timestep accumulator, in milliseconds.
/// Ensures simulation logic runs at a consistent rate regardless of how
/// irregular the host's frame deltas are.
pub struct FixedTimestep {
    dt_ms: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt_ms: f32) -> Self {
        Self {
            dt_ms,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps
    /// to run. Capped at 10 steps to prevent a spiral of death after a hitch.
    pub fn accumulate(&mut self, frame_ms: f32) -> u32 {
        if frame_ms.is_finite() && frame_ms > 0.0 {
            self.accumulator += frame_ms;
        }
        self.accumulator = self.accumulator.min(self.dt_ms * 10.0);
        let steps = (self.accumulator / self.dt_ms) as u32;
        self.accumulator -= steps as f32 * self.dt_ms;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt_ms
    }

    pub fn dt_ms(&self) -> f32 {
        self.dt_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_MS: f32 = 1000.0 / 60.0;

    #[test]
    fn clock_accumulates_deltas() {
        let mut clock = SimClock::new();
        clock.advance(FRAME_MS);
        clock.advance(FRAME_MS);
        assert!((clock.now_ms() - 2.0 * f64::from(FRAME_MS)).abs() < 1e-6);
    }

    #[test]
    fn clock_rejects_bad_deltas() {
        let mut clock = SimClock::new();
        clock.advance(-5.0);
        clock.advance(f32::NAN);
        assert_eq!(clock.now_ms(), 0.0);
    }

    #[test]
    fn full_frame_yields_one_tick() {
        let mut ts = FixedTimestep::new(FRAME_MS);
        assert_eq!(ts.dt_ms(), FRAME_MS);
        assert_eq!(ts.accumulate(FRAME_MS), 1);
    }

    #[test]
    fn short_frames_carry_over() {
        let mut ts = FixedTimestep::new(FRAME_MS);
        assert_eq!(ts.accumulate(8.0), 0);
        assert_eq!(ts.accumulate(10.0), 1, "8 + 10 ms crosses one tick");
    }

    #[test]
    fn hitch_is_capped_at_ten_ticks() {
        let mut ts = FixedTimestep::new(FRAME_MS);
        assert_eq!(ts.accumulate(1000.0), 10);
    }

    #[test]
    fn bad_frame_is_ignored() {
        let mut ts = FixedTimestep::new(FRAME_MS);
        assert_eq!(ts.accumulate(f32::NAN), 0);
        assert_eq!(ts.accumulate(-20.0), 0);
        assert_eq!(ts.accumulate(FRAME_MS), 1);
    }

    #[test]
    fn alpha_tracks_the_leftover_fraction() {
        let mut ts = FixedTimestep::new(FRAME_MS);
        ts.accumulate(8.0);
        let a = ts.alpha();
        assert!((0.0..1.0).contains(&a), "alpha was {a}");
        assert!((a - 8.0 / FRAME_MS).abs() < 1e-5);
    }
}
