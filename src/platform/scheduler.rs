//! Fixed-delay repeating tick task
//!
//! The next tick is armed `interval_ms` after the previous one finishes, so
//! slow ticks push the schedule back rather than bunching up. The scheduler
//! only tracks lifecycle; the platform owns the actual timer.
//!
//! Every `start()` opens a new generation. A timer armed under an older
//! generation may still fire after a stop/start cycle (a frozen page restored
//! from the back/forward cache keeps its pending timeouts), so each re-arm
//! carries the generation it was armed under and stale ones are dropped.

/// Lifecycle of the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Never started
    Idle,
    Running,
    /// Stopped; no further ticks are scheduled until restarted
    Stopped,
}

#[derive(Debug, Clone)]
pub struct LoopScheduler {
    interval_ms: u32,
    state: LoopState,
    ticks: u64,
    generation: u64,
}

impl LoopScheduler {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            state: LoopState::Idle,
            ticks: 0,
            generation: 0,
        }
    }

    /// Begin (or resume) ticking under a new generation. Returns `false` if
    /// already running.
    pub fn start(&mut self) -> bool {
        if self.state == LoopState::Running {
            return false;
        }
        self.state = LoopState::Running;
        self.generation += 1;
        log::info!("Tick loop started ({} ms interval)", self.interval_ms);
        true
    }

    /// Stop ticking after the current tick. Returns `false` if not running.
    pub fn stop(&mut self) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        self.state = LoopState::Stopped;
        log::info!("Tick loop stopped after {} ticks", self.ticks);
        true
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Ticks completed while running
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Generation opened by the most recent `start()`
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a timer armed under `generation` may still tick
    pub fn is_current(&self, generation: u64) -> bool {
        self.is_running() && generation == self.generation
    }

    /// Record a finished tick of `generation`. Returns the delay before the
    /// next one, or `None` if the loop was stopped or restarted since.
    pub fn complete_tick(&mut self, generation: u64) -> Option<u32> {
        if !self.is_current(generation) {
            return None;
        }
        self.ticks += 1;
        Some(self.interval_ms)
    }
}
