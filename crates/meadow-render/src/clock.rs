//! Animation clock feeding the wind shader's time uniform.

use std::time::{Duration, Instant};

/// Explicit animation state threaded through the frame loop.
#[derive(Debug, Clone, Copy)]
pub struct AnimationClock {
    start: Instant,
    last_tick: Instant,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self { start, last_tick: start }
    }

    /// Milliseconds since the clock started, as the shader expects.
    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms_at(Instant::now())
    }

    pub fn elapsed_ms_at(&self, now: Instant) -> f32 {
        duration_ms(now.saturating_duration_since(self.start))
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        dt
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new()
    }
}

fn duration_ms(d: Duration) -> f32 {
    d.as_secs_f32() * 1000.0
}
