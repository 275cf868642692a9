//! Headless tick loop over a virtual clock
//!
//! Drives a [`Session`] the same way the browser does (tick, present,
//! re-arm after a fixed delay) without sleeping, so runs are deterministic.

use glam::Vec2;

use super::{Clock, LoopScheduler, ManualClock, RecordingSurface};
use crate::sim::{Frame, Session};
use crate::tuning::Tuning;

pub struct HeadlessRunner {
    session: Session,
    scheduler: LoopScheduler,
    clock: ManualClock,
    surface: RecordingSurface,
    last_frame: Option<Frame>,
}

impl HeadlessRunner {
    pub fn new(viewport: Vec2, tuning: Tuning) -> Self {
        let clock = ManualClock::default();
        let scheduler = LoopScheduler::new(tuning.step_ms);
        Self {
            session: Session::new(viewport, tuning, clock.now_ms()),
            scheduler,
            clock,
            surface: RecordingSurface::default(),
            last_frame: None,
        }
    }

    /// Run up to `max_ticks` ticks. Returns how many actually ran; fewer when
    /// the loop was stopped.
    pub fn run(&mut self, max_ticks: u64) -> u64 {
        self.scheduler.start();
        let generation = self.scheduler.generation();
        let mut ran = 0;
        while ran < max_ticks {
            if !self.scheduler.is_current(generation) {
                break;
            }
            let frame = self.session.tick(self.clock.now_ms());
            frame.present(&mut self.surface);
            self.last_frame = Some(frame);
            ran += 1;
            match self.scheduler.complete_tick(generation) {
                Some(delay) => self.clock.advance(delay as f64),
                None => break,
            }
        }
        ran
    }

    /// Deliver a click between ticks
    pub fn click(&mut self, at: Vec2) -> Option<Vec2> {
        self.session.click(at)
    }

    pub fn stop(&mut self) -> bool {
        self.scheduler.stop()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn scheduler(&self) -> &LoopScheduler {
        &self.scheduler
    }

    pub fn surface(&self) -> &RecordingSurface {
        &self.surface
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }
}
