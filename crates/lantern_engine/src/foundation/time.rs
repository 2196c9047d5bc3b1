//! Frame timing

use std::time::Instant;

/// Per-frame timer producing delta times for the render loop
pub struct Timer {
    last_frame: Instant,
}

impl Timer {
    /// Create a new timer starting now
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
        }
    }

    /// Seconds elapsed since the previous call (or since creation)
    pub fn delta_time(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        delta
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
