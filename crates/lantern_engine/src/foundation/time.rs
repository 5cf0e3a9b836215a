//! Frame clock
//!
//! The engine never reads the wall clock itself. The host advances a
//! [`FrameClock`] once per frame and every time-driven subsystem (scroll
//! momentum, caret blink, key repeat, effects) reads it.

/// Per-frame elapsed and cumulative time
#[derive(Debug, Clone)]
pub struct FrameClock {
    delta_time: f32,
    total_time: f32,
    time_scale: f32,
    frame_count: u64,
    fps_timer: f32,
    fps_frames: u32,
    current_fps: Option<u32>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self {
            delta_time: 0.0,
            total_time: 0.0,
            time_scale: 1.0,
            frame_count: 0,
            fps_timer: 0.0,
            fps_frames: 0,
            current_fps: None,
        }
    }

    /// Clock frozen at a fixed delta, handy for deterministic stepping
    pub fn fixed(delta_time: f32) -> Self {
        let mut clock = Self::new();
        clock.advance(delta_time);
        clock
    }

    /// Advance by one frame (should be called once per frame)
    pub fn advance(&mut self, delta_time: f32) {
        self.delta_time = delta_time.max(0.0);
        self.total_time += self.delta_time;
        self.frame_count += 1;

        self.fps_timer += self.delta_time;
        self.fps_frames += 1;
        if self.fps_timer >= 1.0 {
            self.current_fps = Some(self.fps_frames);
            self.fps_frames = 0;
            self.fps_timer = 0.0;
        }
    }

    /// Time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Delta multiplied by the time scale
    pub fn scaled_delta_time(&self) -> f32 {
        self.delta_time * self.time_scale
    }

    /// Total elapsed time in seconds
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Time scale applied by [`FrameClock::scaled_delta_time`]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set the time scale (0 pauses scaled time)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// True while the time scale is zero
    pub fn is_paused(&self) -> bool {
        self.time_scale == 0.0
    }

    /// Frames counted over the last full second, or the instantaneous rate
    /// before one second has elapsed
    pub fn fps(&self) -> u32 {
        match self.current_fps {
            Some(fps) => fps,
            None if self.delta_time > 0.0 => (1.0 / self.delta_time) as u32,
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accumulates() {
        let mut clock = FrameClock::new();
        clock.advance(0.25);
        clock.advance(0.5);

        assert_eq!(clock.delta_time(), 0.5);
        assert_eq!(clock.total_time(), 0.75);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_fps_counts_frames_per_second() {
        let mut clock = FrameClock::new();
        clock.advance(0.5);
        assert_eq!(clock.fps(), 2);

        clock.advance(0.25);
        clock.advance(0.25);
        assert_eq!(clock.fps(), 3);
    }

    #[test]
    fn test_pause() {
        let mut clock = FrameClock::fixed(0.016);
        clock.set_time_scale(0.0);
        assert!(clock.is_paused());
        assert_eq!(clock.scaled_delta_time(), 0.0);
    }
}
