//! Time management utilities
//!
//! `Timer` measures variable render frames; `FixedTimestep` turns that
//! variable frame time into whole logical ticks for input-driven movement.

use std::time::Duration;

/// Default logical tick length (60 Hz)
pub const DEFAULT_TICK: f64 = 1.0 / 60.0;

/// High-precision timer for frame timing
pub struct Timer {
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
    fps_window_start: f32,
    fps_window_frames: u32,
    last_fps: f32,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            fps_window_start: 0.0,
            fps_window_frames: 0,
            last_fps: 0.0,
        }
    }

    /// Record a frame that took `elapsed`
    ///
    /// Returns `Some(fps)` once per elapsed second, mirroring the once-a-second
    /// FPS counter of the interactive editor.
    pub fn advance(&mut self, elapsed: Duration) -> Option<f32> {
        self.delta_time = elapsed.as_secs_f32();
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.fps_window_frames += 1;

        let window = self.total_time - self.fps_window_start;
        if window >= 1.0 {
            self.last_fps = self.fps_window_frames as f32 / window;
            self.fps_window_frames = 0;
            self.fps_window_start = self.total_time;
            Some(self.last_fps)
        } else {
            None
        }
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// FPS measured over the last completed one-second window
    pub fn fps(&self) -> f32 {
        self.last_fps
    }
}

/// Fixed-update / variable-render decoupling
///
/// Frame time is accumulated and consumed in whole ticks; the remainder
/// carries over to the next frame. No interpolation between ticks is done.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f64,
    max_frame_time: f64,
    accumulator: f64,
}

impl FixedTimestep {
    /// Create an accumulator with the given tick length in seconds
    ///
    /// A step that is not a positive finite number falls back to
    /// [`DEFAULT_TICK`].
    pub fn new(step: f64) -> Self {
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            log::warn!("Invalid fixed step {}, using {}", step, DEFAULT_TICK);
            DEFAULT_TICK
        };
        Self {
            step,
            max_frame_time: 0.25,
            accumulator: 0.0,
        }
    }

    /// Cap on a single frame's contribution (prevents runaway catch-up after a stall)
    ///
    /// Negative or non-finite caps are ignored.
    pub fn with_max_frame_time(mut self, max_frame_time: f64) -> Self {
        if max_frame_time.is_finite() && max_frame_time >= 0.0 {
            self.max_frame_time = max_frame_time;
        } else {
            log::warn!("Invalid max frame time {}, keeping {}", max_frame_time, self.max_frame_time);
        }
        self
    }

    /// Accumulate one frame and return how many ticks should run
    pub fn advance(&mut self, frame_time: f64) -> u32 {
        self.accumulator += frame_time.clamp(0.0, self.max_frame_time);

        let mut ticks = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            ticks += 1;
        }
        ticks
    }

    /// Tick length in seconds
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Unconsumed time carried into the next frame
    pub fn remainder(&self) -> f64 {
        self.accumulator
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(DEFAULT_TICK)
    }
}
