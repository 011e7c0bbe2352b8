//! Timing and loop-driver abstractions
//!
//! Simulation correctness must not depend on the render frame rate, so the
//! per-frame wall-clock delta is computed and clamped here and the
//! fixed-interval games accumulate time through [`FixedStep`]. The actual
//! animation-frame scheduling lives in the host layer; these types are what
//! make the update rate testable without a display.

/// Maximum delta accepted from the platform clock, in seconds.
///
/// Absorbs pauses from backgrounded tabs; anything longer is treated as a
/// single clamped frame rather than a burst of catch-up simulation.
pub const MAX_FRAME_DT: f32 = 0.1;

/// Fixed substep used by the continuous-physics games (60 Hz reference rate).
pub const SIM_DT: f32 = 1.0 / 60.0;

/// Maximum substeps per frame to prevent spiral of death
pub const MAX_SUBSTEPS: u32 = 8;

/// Wall-clock frame timer. Fed timestamps in milliseconds (the resolution the
/// browser animation callback provides), produces clamped deltas in seconds.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_time_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous call, in seconds, clamped to [`MAX_FRAME_DT`].
    /// The first call yields one reference timestep.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_time_ms {
            Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => SIM_DT,
        };
        self.last_time_ms = Some(now_ms);
        dt
    }

    /// Forget the previous timestamp (after pause/resume, so the gap is not
    /// counted as elapsed play time).
    pub fn reset(&mut self) {
        self.last_time_ms = None;
    }
}

/// Accumulator for fixed-interval games (Tetris gravity, Snake movement).
///
/// Feed it frame deltas; it reports how many whole intervals have elapsed,
/// capped so a long stall cannot trigger a catch-up burst.
#[derive(Debug, Clone)]
pub struct FixedStep {
    interval: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedStep {
    pub fn new(interval_secs: f32) -> Self {
        Self {
            interval: interval_secs,
            accumulator: 0.0,
            max_steps: MAX_SUBSTEPS,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Change the interval mid-game (Tetris speeds up while soft-dropping).
    pub fn set_interval(&mut self, interval_secs: f32) {
        self.interval = interval_secs.max(0.001);
    }

    /// Accumulate a frame delta and return the number of fixed steps to run.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= self.interval && steps < self.max_steps {
            self.accumulator -= self.interval;
            steps += 1;
        }
        // Drop any backlog beyond the cap
        if self.accumulator >= self.interval {
            self.accumulator = 0.0;
        }
        steps
    }

    /// Discard accumulated time (on restart or hard drop).
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock_first_tick_is_reference_step() {
        let mut clock = FrameClock::new();
        assert!((clock.tick(1000.0) - SIM_DT).abs() < 1e-6);
    }

    #[test]
    fn test_frame_clock_delta_and_clamp() {
        let mut clock = FrameClock::new();
        clock.tick(1000.0);
        let dt = clock.tick(1016.0);
        assert!((dt - 0.016).abs() < 1e-4);

        // A 5-second tab-hidden gap clamps to the maximum
        let dt = clock.tick(6016.0);
        assert!((dt - MAX_FRAME_DT).abs() < 1e-6);
    }

    #[test]
    fn test_fixed_step_accumulation() {
        let mut step = FixedStep::new(0.5);
        assert_eq!(step.advance(0.3), 0);
        assert_eq!(step.advance(0.3), 1);
        assert_eq!(step.advance(1.0), 2);
    }

    #[test]
    fn test_fixed_step_caps_backlog() {
        let mut step = FixedStep::new(0.1);
        // A huge stall cannot trigger more than MAX_SUBSTEPS catch-up steps
        assert_eq!(step.advance(10.0), MAX_SUBSTEPS);
        // And the backlog is dropped, not carried forward
        assert_eq!(step.advance(0.05), 0);
    }
}
