//! Collision-driven score with logistic decay
//!
//! Every new collision pair is worth a fixed bonus. Once the ball has been
//! quiet for longer than the decay threshold the score bleeds away a little
//! each tick; the threshold shrinks as the score grows.

use rapier2d::prelude::ColliderHandle;

use super::driver::CollisionRecord;
use crate::tuning::{DecayCurve, Tuning};

/// Score state for one session
#[derive(Debug, Clone)]
pub struct ScoreEngine {
    score: f64,
    high_score: f64,
    /// Timestamp (ms) of the last scoring collision
    last_scored_at: f64,
    /// Most recent collision pair, started or stopped
    last_pair: Option<(ColliderHandle, ColliderHandle)>,
    increment: f64,
    curve: DecayCurve,
}

impl ScoreEngine {
    /// Fresh score at zero. `now` seeds the decay clock.
    pub fn new(tuning: &Tuning, now: f64) -> Self {
        Self {
            score: 0.0,
            high_score: 0.0,
            last_scored_at: now,
            last_pair: None,
            increment: tuning.score_increment,
            curve: tuning.decay_curve,
        }
    }

    /// Feed one collision event. Returns `true` if it scored.
    ///
    /// Only a start event for a pair different from the previous event's pair
    /// scores; the pair is recorded either way, so one physical contact that
    /// reports "started" on consecutive steps counts once.
    pub fn on_collision_event(
        &mut self,
        handle1: ColliderHandle,
        handle2: ColliderHandle,
        started: bool,
        now: f64,
    ) -> bool {
        let pair = (handle1, handle2);
        let scored = started && self.last_pair != Some(pair);
        if scored {
            self.score += self.increment;
            if self.score > self.high_score {
                self.high_score = self.score;
                log::debug!("New high score: {}", self.high_score.round());
            }
            self.last_scored_at = now;
        }
        self.last_pair = Some(pair);
        scored
    }

    pub fn on_collision(&mut self, record: &CollisionRecord, now: f64) -> bool {
        self.on_collision_event(record.handle1, record.handle2, record.started, now)
    }

    /// Current idle window (ms) before decay applies
    pub fn decay_threshold(&self) -> f64 {
        self.curve.threshold(self.score)
    }

    /// Apply one tick of decay. Returns the amount removed.
    ///
    /// The decrement is `max(ln(score), 1)`, with the log taken of
    /// `max(score, 1)` so scores below one lose a flat point and floor at zero.
    pub fn decay_step(&mut self, now: f64) -> f64 {
        let gap = now - self.last_scored_at;
        if gap <= self.decay_threshold() {
            return 0.0;
        }
        let before = self.score;
        let amount = self.score.max(1.0).ln().max(1.0);
        self.score = (self.score - amount).max(0.0);
        before - self.score
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn high_score(&self) -> f64 {
        self.high_score
    }

    pub fn last_scored_at(&self) -> f64 {
        self.last_scored_at
    }

    /// Score rounded for display
    pub fn display_score(&self) -> i64 {
        self.score.round() as i64
    }

    /// High score rounded for display
    pub fn display_high_score(&self) -> i64 {
        self.high_score.round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn handle(i: u32) -> ColliderHandle {
        ColliderHandle::from_raw_parts(i, 0)
    }

    fn engine() -> ScoreEngine {
        ScoreEngine::new(&Tuning::default(), 0.0)
    }

    /// Engine holding `score` with the decay clock at `at`
    fn engine_with_score(score: f64, at: f64) -> ScoreEngine {
        let mut engine = engine();
        engine.score = score;
        engine.high_score = score;
        engine.last_scored_at = at;
        engine
    }

    #[test]
    fn test_repeated_pair_scores_once() {
        let mut e = engine();
        assert!(e.on_collision_event(handle(1), handle(2), true, 10.0));
        assert!(!e.on_collision_event(handle(1), handle(2), true, 43.0));
        assert_eq!(e.score(), 150.0);
        assert_eq!(e.last_scored_at(), 10.0);
    }

    #[test]
    fn test_distinct_pairs_both_score() {
        let mut e = engine();
        e.on_collision_event(handle(1), handle(2), true, 10.0);
        e.on_collision_event(handle(3), handle(4), true, 10.0);
        assert_eq!(e.score(), 300.0);
        assert_eq!(e.high_score(), 300.0);
    }

    #[test]
    fn test_alternating_pairs_keep_scoring() {
        let mut e = engine();
        for _ in 0..3 {
            e.on_collision_event(handle(1), handle(2), true, 0.0);
            e.on_collision_event(handle(1), handle(3), true, 0.0);
        }
        assert_eq!(e.score(), 900.0);
    }

    #[test]
    fn test_stop_event_records_pair_without_scoring() {
        let mut e = engine();
        assert!(!e.on_collision_event(handle(1), handle(2), false, 5.0));
        assert_eq!(e.score(), 0.0);
        // The stop already recorded (1, 2), so the following start is a repeat.
        assert!(!e.on_collision_event(handle(1), handle(2), true, 6.0));
        assert!(e.on_collision_event(handle(2), handle(1), true, 7.0));
    }

    #[test]
    fn test_no_decay_inside_threshold() {
        let mut e = engine_with_score(1000.0, 0.0);
        assert!((e.decay_threshold() - 500.0).abs() < 1e-9);
        assert_eq!(e.decay_step(500.0), 0.0);
        assert_eq!(e.score(), 1000.0);
    }

    #[test]
    fn test_log_decay_past_threshold() {
        let mut e = engine_with_score(1000.0, 0.0);
        let removed = e.decay_step(501.0);
        assert!((removed - 1000f64.ln()).abs() < 1e-9);
        assert!((e.score() - (1000.0 - 1000f64.ln())).abs() < 1e-9);
        assert_eq!(e.high_score(), 1000.0);
    }

    #[test]
    fn test_small_scores_lose_one_point() {
        let mut e = engine_with_score(2.0, 0.0);
        assert_eq!(e.decay_step(5000.0), 1.0);
        assert_eq!(e.score(), 1.0);
    }

    #[test]
    fn test_fractional_score_floors_at_zero() {
        let mut e = engine_with_score(0.4, 0.0);
        e.decay_step(5000.0);
        assert_eq!(e.score(), 0.0);
        e.decay_step(5033.0);
        assert_eq!(e.score(), 0.0);
    }

    #[test]
    fn test_display_rounding() {
        let e = engine_with_score(149.5, 0.0);
        assert_eq!(e.display_score(), 150);
        let e = engine_with_score(149.49, 0.0);
        assert_eq!(e.display_high_score(), 149);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Collide { a: u32, b: u32, started: bool },
        Wait(f64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u32..4, 0u32..4, any::<bool>())
                .prop_map(|(a, b, started)| Op::Collide { a, b, started }),
            (0.0f64..2000.0).prop_map(Op::Wait),
        ]
    }

    proptest! {
        #[test]
        fn prop_score_never_negative_and_high_score_is_max(ops in prop::collection::vec(op(), 0..200)) {
            let mut e = engine();
            let mut now = 0.0;
            let mut max_seen = e.score();
            for op in ops {
                match op {
                    Op::Collide { a, b, started } => {
                        e.on_collision_event(handle(a), handle(b), started, now);
                    }
                    Op::Wait(ms) => {
                        now += ms;
                        e.decay_step(now);
                    }
                }
                prop_assert!(e.score() >= 0.0);
                prop_assert!(e.high_score() >= e.score());
                max_seen = max_seen.max(e.score());
                prop_assert_eq!(e.high_score(), max_seen);
            }
        }

        #[test]
        fn prop_decay_never_goes_negative(score in 0.0f64..10_000.0, gap in 0.0f64..5000.0) {
            let mut e = engine_with_score(score, 0.0);
            let removed = e.decay_step(gap);
            prop_assert!(e.score() >= 0.0);
            prop_assert!(removed >= 0.0);
            prop_assert!(e.score() <= score);
        }
    }
}
