use std::time::Instant;

/// Source of per-frame delta time.
pub enum FrameTimer {
    /// Wall clock, for interactive runs.
    Realtime { last: Instant, dt: f32 },
    /// Constant step, for headless and reproducible runs.
    Fixed { dt: f32 },
}

impl FrameTimer {
    pub fn realtime() -> Self {
        FrameTimer::Realtime {
            last: Instant::now(),
            dt: 0.0,
        }
    }

    pub fn fixed(dt: f32) -> Self {
        FrameTimer::Fixed { dt }
    }

    /// Advance one frame and return its length in seconds.
    pub fn tick(&mut self) -> f32 {
        match self {
            FrameTimer::Realtime { last, dt } => {
                let now = Instant::now();
                *dt = now.duration_since(*last).as_secs_f32();
                *last = now;
                *dt
            }
            FrameTimer::Fixed { dt } => *dt,
        }
    }
}
