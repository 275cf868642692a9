//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (milliseconds since an arbitrary origin)
//! - The display surface the frame is written to
//! - Scheduling the fixed-delay tick loop

pub mod headless;
pub mod scheduler;

pub use headless::HeadlessRunner;
pub use scheduler::{LoopScheduler, LoopState};

use std::cell::Cell;

use glam::Vec2;

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Somewhere to show the object and the scores
pub trait Surface {
    /// Left/top of the object, screen pixels
    fn set_object_position(&mut self, position: Vec2);
    /// Width/height of the object, screen pixels
    fn set_object_size(&mut self, size: Vec2);
    fn set_score_text(&mut self, text: &str);
    fn set_high_score_text(&mut self, text: &str);
}

/// Clock advanced by hand (headless runs and tests)
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Wall clock for native builds
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Surface that keeps the last values written to it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSurface {
    pub position: Vec2,
    pub size: Vec2,
    pub score_text: String,
    pub high_score_text: String,
    /// Number of frames presented
    pub frames: u64,
}

impl Surface for RecordingSurface {
    fn set_object_position(&mut self, position: Vec2) {
        self.position = position;
        self.frames += 1;
    }

    fn set_object_size(&mut self, size: Vec2) {
        self.size = size;
    }

    fn set_score_text(&mut self, text: &str) {
        self.score_text = text.to_string();
    }

    fn set_high_score_text(&mut self, text: &str) {
        self.high_score_text = text.to_string();
    }
}
