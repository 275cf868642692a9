//! Simulation module
//!
//! Owns the physics world and everything derived from it each tick:
//! - Fixed timestep only
//! - One dynamic object, four static walls
//! - No DOM or platform dependencies

pub mod driver;
pub mod launch;
pub mod score;
pub mod tick;
pub mod visual;

pub use driver::{CollisionRecord, SimulationDriver};
pub use launch::launch_impulse;
pub use score::ScoreEngine;
pub use tick::{Frame, Session};
pub use visual::{ObjectVisual, VisualMapper};
