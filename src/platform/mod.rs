//! Platform abstraction layer
//!
//! Host-loop helpers shared by the browser and native entry points:
//! - Fixed-timestep accumulator
//! - FPS tracking

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Turns variable frame times into a whole number of fixed sim ticks
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    /// Timestamp of the previous frame (ms), 0 before the first frame
    last_time: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a frame timestamp (ms, as from `requestAnimationFrame`)
    /// and get the number of ticks to run
    pub fn advance(&mut self, time_ms: f64) -> u32 {
        let dt = if self.last_time > 0.0 {
            ((time_ms - self.last_time) / 1000.0) as f32
        } else {
            SIM_DT
        };
        self.last_time = time_ms;
        self.advance_by(dt)
    }

    /// Feed a frame delta (seconds) and get the number of ticks to run
    pub fn advance_by(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop backlog we could not catch up on
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Forget accumulated time (after pause or restart)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = 0.0;
    }
}

/// Frames-per-second over a sliding window of 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    /// Record a frame timestamp (ms) and return the current estimate
    pub fn record(&mut self, time_ms: f64) -> u32 {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest frame sits where the next write goes
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time_ms - oldest_time;
            if elapsed > 0.0 {
                let frames = (self.frame_times.len() - 1) as f64;
                self.fps = (frames * 1000.0 / elapsed).round() as u32;
            }
        }
        self.fps
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}
