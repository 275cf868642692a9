//! Data-driven tuning for the toy
//!
//! Every physics, scoring and animation constant lives in [`Tuning`]. The
//! defaults match [`crate::consts`]; a stored JSON blob can override any subset
//! of fields.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Logistic curve controlling how long the score may sit idle before decaying
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayCurve {
    /// Curve ceiling (ms)
    pub l: f64,
    /// Steepness
    pub k: f64,
    /// Midpoint score
    pub x0: f64,
}

impl Default for DecayCurve {
    fn default() -> Self {
        Self {
            l: SCORE_DECAY_CURVE_L,
            k: SCORE_DECAY_CURVE_K,
            x0: SCORE_DECAY_CURVE_X0,
        }
    }
}

impl DecayCurve {
    /// Idle time (ms) after the last score before decay kicks in.
    ///
    /// Falls toward zero as `score` climbs past `x0`, so big scores bleed
    /// away almost immediately.
    pub fn threshold(&self, score: f64) -> f64 {
        self.l - self.l / (1.0 + (-self.k * (score - self.x0)).exp())
    }
}

/// All tunable constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fixed tick length in milliseconds (also the physics timestep)
    pub step_ms: u32,
    /// World gravity, screen space (y grows downward)
    pub gravity: Vec2,
    pub linear_damping: f32,
    pub object_radius: f32,
    pub object_mass: f32,
    /// Restitution of the four viewport walls
    pub wall_restitution: f32,
    /// Points awarded per new collision pair
    pub score_increment: f64,
    pub decay_curve: DecayCurve,
    /// Pixels of stretch per unit of per-tick velocity change
    pub deform_factor: f32,
    /// Each tick the visual size closes `1 / jump_factor` of the gap to its target
    pub jump_factor: f32,
    /// Impulse magnitude applied on click
    pub launch_impulse: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            step_ms: STEP_MS,
            gravity: Vec2::new(0.0, GRAVITY_Y),
            linear_damping: LINEAR_DAMPING,
            object_radius: OBJ_BASE_RADIUS,
            object_mass: OBJ_MASS,
            wall_restitution: WALL_RESTITUTION,
            score_increment: SCORE_INCREMENT,
            decay_curve: DecayCurve::default(),
            deform_factor: TARGET_WIDTH_FACTOR,
            jump_factor: WIDTH_JUMP_FACTOR,
            launch_impulse: CLICK_IMPULSE_MULTIPLIER,
        }
    }
}

/// Reasons a [`Tuning`] is rejected
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// Tick length must be at least 1 ms.
    ZeroStep,
    /// Radius must be positive and finite.
    InvalidRadius(f32),
    /// Mass must be positive and finite.
    InvalidMass(f32),
    /// Smoothing divisor below 1 would overshoot the target.
    InvalidJumpFactor(f32),
    /// Damping and restitution cannot be negative.
    Negative { field: &'static str, value: f32 },
    /// JSON did not parse.
    Parse(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::ZeroStep => write!(f, "step_ms must be at least 1"),
            TuningError::InvalidRadius(r) => write!(f, "object_radius must be positive (got {})", r),
            TuningError::InvalidMass(m) => write!(f, "object_mass must be positive (got {})", m),
            TuningError::InvalidJumpFactor(j) => {
                write!(f, "jump_factor must be at least 1 (got {})", j)
            }
            TuningError::Negative { field, value } => {
                write!(f, "{} must not be negative (got {})", field, value)
            }
            TuningError::Parse(msg) => write!(f, "invalid tuning JSON: {}", msg),
        }
    }
}

impl std::error::Error for TuningError {}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

impl Tuning {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "throwable_tuning";

    /// Env var naming a JSON tuning file (native only)
    #[allow(dead_code)]
    const ENV_VAR: &'static str = "THROWABLE_TUNING";

    /// Tick length in seconds
    pub fn step_secs(&self) -> f32 {
        self.step_ms as f32 / 1000.0
    }

    /// Resting visual size: the collider's diameter on both axes
    pub fn base_size(&self) -> Vec2 {
        Vec2::splat(self.object_radius * 2.0)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.step_ms == 0 {
            return Err(TuningError::ZeroStep);
        }
        if !positive(self.object_radius) {
            return Err(TuningError::InvalidRadius(self.object_radius));
        }
        if !positive(self.object_mass) {
            return Err(TuningError::InvalidMass(self.object_mass));
        }
        if self.jump_factor.is_nan() || self.jump_factor < 1.0 {
            return Err(TuningError::InvalidJumpFactor(self.jump_factor));
        }
        for (field, value) in [
            ("linear_damping", self.linear_damping),
            ("wall_restitution", self.wall_restitution),
        ] {
            if value < 0.0 {
                return Err(TuningError::Negative { field, value });
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Resolve a stored override, falling back to defaults
    fn from_stored(json: Option<String>) -> Self {
        match json.as_deref().map(Self::from_json) {
            Some(Ok(tuning)) => {
                log::info!("Loaded tuning override");
                tuning
            }
            Some(Err(e)) => {
                log::warn!("Ignoring stored tuning: {}", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten());
        Self::from_stored(stored)
    }

    /// Load tuning from the file named by `THROWABLE_TUNING`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let stored = std::env::var(Self::ENV_VAR).ok().and_then(|path| {
            std::fs::read_to_string(&path)
                .map_err(|e| log::warn!("Cannot read tuning file {}: {}", path, e))
                .ok()
        });
        Self::from_stored(stored)
    }
}
