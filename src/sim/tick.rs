//! Fixed-step tick pipeline
//!
//! One tick: step physics, feed its collision events to the score, decay the
//! score, then derive the frame the display surface should show.

use glam::Vec2;

use super::driver::SimulationDriver;
use super::launch::launch_impulse;
use super::score::ScoreEngine;
use super::visual::{ObjectVisual, VisualMapper};
use crate::platform::Surface;
use crate::tuning::Tuning;

/// Everything the display needs after a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub score: f64,
    pub high_score: f64,
    pub object: ObjectVisual,
    /// Collision events drained during the tick
    pub collisions: usize,
    /// How many of those events scored
    pub scored: usize,
}

impl Frame {
    pub fn display_score(&self) -> i64 {
        self.score.round() as i64
    }

    pub fn display_high_score(&self) -> i64 {
        self.high_score.round() as i64
    }

    /// Push this frame to a display surface
    pub fn present(&self, surface: &mut dyn Surface) {
        surface.set_score_text(&self.display_score().to_string());
        surface.set_high_score_text(&self.display_high_score().to_string());
        surface.set_object_position(self.object.position);
        surface.set_object_size(self.object.size);
    }
}

/// A running toy: physics, score and visuals for one page load
pub struct Session {
    tuning: Tuning,
    driver: SimulationDriver,
    score: ScoreEngine,
    visual: VisualMapper,
    ticks: u64,
}

impl Session {
    /// Set up the world for a viewport. `now` is the current clock reading in ms.
    pub fn new(viewport: Vec2, tuning: Tuning, now: f64) -> Self {
        Self {
            driver: SimulationDriver::new(viewport, &tuning),
            score: ScoreEngine::new(&tuning, now),
            visual: VisualMapper::new(&tuning),
            tuning,
            ticks: 0,
        }
    }

    /// Advance the session by one fixed step
    pub fn tick(&mut self, now: f64) -> Frame {
        let events = self.driver.step();
        let mut scored = 0;
        for record in &events {
            if self.score.on_collision(record, now) {
                scored += 1;
            }
        }
        self.score.decay_step(now);

        let object = self
            .visual
            .update(self.driver.position(), self.driver.velocity());
        self.ticks += 1;

        Frame {
            score: self.score.score(),
            high_score: self.score.high_score(),
            object,
            collisions: events.len(),
            scored,
        }
    }

    /// Throw the object toward a click point.
    ///
    /// Existing momentum is always cancelled. Returns the applied impulse, or
    /// `None` when the click hit the object's centre.
    pub fn click(&mut self, at: Vec2) -> Option<Vec2> {
        let impulse = launch_impulse(self.driver.position(), at, self.tuning.launch_impulse);
        self.driver.set_velocity(Vec2::ZERO);
        if let Some(impulse) = impulse {
            self.driver.apply_impulse(impulse);
            log::debug!("Launch toward {:?} with impulse {:?}", at, impulse);
        }
        impulse
    }

    pub fn driver(&self) -> &SimulationDriver {
        &self.driver
    }

    pub fn score(&self) -> &ScoreEngine {
        &self.score
    }

    pub fn visual(&self) -> &VisualMapper {
        &self.visual
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
