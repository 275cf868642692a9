//! Throwable - a bouncing ball you can fling around the page
//!
//! Core modules:
//! - `sim`: Physics world, scoring, launch impulses and the per-tick pipeline
//! - `platform`: Display surface, clocks and the fixed-delay loop scheduler
//! - `settings`: Launch configuration read from the page URL
//! - `tuning`: Data-driven physics and scoring constants

pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::LaunchConfig;
pub use sim::{Frame, Session};
pub use tuning::{DecayCurve, Tuning, TuningError};

use glam::Vec2;
use rapier2d::prelude::{Real, Vector};

/// Default tuning constants
pub mod consts {
    /// Fixed tick length (ms); the physics step uses the same duration
    pub const STEP_MS: u32 = 33;

    /// Downward gravity in pixels/s² (screen space, y grows down)
    pub const GRAVITY_Y: f32 = 2000.0;
    pub const LINEAR_DAMPING: f32 = 0.5;

    /// Thrown object
    pub const OBJ_BASE_RADIUS: f32 = 30.0;
    pub const OBJ_MASS: f32 = 100.0;

    /// Perfectly elastic walls
    pub const WALL_RESTITUTION: f32 = 1.0;

    /// Scoring
    pub const SCORE_INCREMENT: f64 = 150.0;
    pub const SCORE_DECAY_CURVE_L: f64 = 1000.0;
    pub const SCORE_DECAY_CURVE_K: f64 = 0.01;
    pub const SCORE_DECAY_CURVE_X0: f64 = 1000.0;

    /// Squash/stretch animation
    pub const TARGET_WIDTH_FACTOR: f32 = 0.05;
    pub const WIDTH_JUMP_FACTOR: f32 = 5.0;

    /// Impulse magnitude applied toward the click point
    pub const CLICK_IMPULSE_MULTIPLIER: f32 = 300_000.0;
}

/// Convert a glam vector into the physics engine's vector type
#[inline]
pub fn to_physics(v: Vec2) -> Vector<Real> {
    Vector::new(v.x, v.y)
}

/// Convert a physics engine vector into glam
#[inline]
pub fn from_physics(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physics_vector_conversion() {
        let v = to_physics(Vec2::new(3.5, -7.0));
        assert_eq!((v.x, v.y), (3.5, -7.0));
        assert_eq!(from_physics(&v), Vec2::new(3.5, -7.0));
    }
}
