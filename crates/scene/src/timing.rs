/// Per-frame delta time bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTiming {
    pub delta_time: f32,
    pub last_frame: f32,
}

impl FrameTiming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to `now` (seconds since the loop started) and return the
    /// elapsed time since the previous call.
    pub fn tick(&mut self, now: f32) -> f32 {
        self.delta_time = now - self.last_frame;
        self.last_frame = now;
        self.delta_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_measures_from_zero() {
        let mut timing = FrameTiming::new();
        assert_eq!(timing.tick(0.5), 0.5);
        assert_eq!(timing.last_frame, 0.5);
    }

    #[test]
    fn consecutive_ticks() {
        let mut timing = FrameTiming::new();
        timing.tick(1.0);
        let dt = timing.tick(1.25);
        assert_eq!(dt, 0.25);
        assert_eq!(timing.delta_time, 0.25);
    }
}
