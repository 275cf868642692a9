//! Physics world ownership and fixed-step advancement
//!
//! Wraps a `rapier2d` pipeline holding four static viewport walls and the
//! single dynamic ball the player throws around.

use std::sync::Mutex;

use glam::Vec2;
use rapier2d::prelude::*;

use crate::tuning::Tuning;
use crate::{from_physics, to_physics};

/// Half-thickness of each wall slab (px)
const WALL_HALF_THICKNESS: Real = 1.0;

/// One collision start/stop reported by the engine during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionRecord {
    pub handle1: ColliderHandle,
    pub handle2: ColliderHandle,
    /// `true` when contact began, `false` when it ended
    pub started: bool,
}

impl From<CollisionEvent> for CollisionRecord {
    fn from(event: CollisionEvent) -> Self {
        Self {
            handle1: event.collider1(),
            handle2: event.collider2(),
            started: event.started(),
        }
    }
}

/// Event handler that buffers collision events for a single step
#[derive(Default)]
struct StepEvents {
    records: Mutex<Vec<CollisionRecord>>,
}

impl StepEvents {
    fn into_records(self) -> Vec<CollisionRecord> {
        self.records
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventHandler for StepEvents {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        records.push(event.into());
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// Owns the physics world and the tracked object
pub struct SimulationDriver {
    viewport: Vec2,
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    walls: [ColliderHandle; 4],
    object: RigidBodyHandle,
    object_collider: ColliderHandle,
}

impl SimulationDriver {
    /// Build the world: gravity, four walls on the viewport edges and the
    /// dynamic object at `(width / 2, height / 3)`.
    pub fn new(viewport: Vec2, tuning: &Tuning) -> Self {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        // Walls are fixed colliders without a parent body. `Max` lets their
        // restitution win over the ball's default of zero.
        let wall = |half_extents: Vec2, at: Vec2| {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y)
                .translation(to_physics(at))
                .restitution(tuning.wall_restitution)
                .restitution_combine_rule(CoefficientCombineRule::Max)
                .build()
        };
        let horizontal = Vec2::new(viewport.x, WALL_HALF_THICKNESS);
        let vertical = Vec2::new(WALL_HALF_THICKNESS, viewport.y);
        let walls = [
            colliders.insert(wall(horizontal, Vec2::ZERO)),
            colliders.insert(wall(horizontal, Vec2::new(0.0, viewport.y))),
            colliders.insert(wall(vertical, Vec2::ZERO)),
            colliders.insert(wall(vertical, Vec2::new(viewport.x, 0.0))),
        ];

        let body = RigidBodyBuilder::dynamic()
            .translation(Vector::new(viewport.x / 2.0, viewport.y / 3.0))
            .linear_damping(tuning.linear_damping)
            .ccd_enabled(true)
            .build();
        let object = bodies.insert(body);
        let collider = ColliderBuilder::ball(tuning.object_radius)
            .mass(tuning.object_mass)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let object_collider = colliders.insert_with_parent(collider, object, &mut bodies);

        let params = IntegrationParameters {
            dt: tuning.step_secs(),
            ..IntegrationParameters::default()
        };

        log::info!(
            "Physics world ready: viewport {}x{}, gravity {:?}, dt {}s",
            viewport.x,
            viewport.y,
            tuning.gravity,
            params.dt
        );

        Self {
            viewport,
            gravity: to_physics(tuning.gravity),
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            walls,
            object,
            object_collider,
        }
    }

    /// Advance one fixed timestep, returning the collision events it produced
    /// in emission order.
    pub fn step(&mut self) -> Vec<CollisionRecord> {
        let events = StepEvents::default();
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &events,
        );
        events.into_records()
    }

    fn body(&self) -> &RigidBody {
        &self.bodies[self.object]
    }

    fn body_mut(&mut self) -> &mut RigidBody {
        &mut self.bodies[self.object]
    }

    pub fn position(&self) -> Vec2 {
        from_physics(self.body().translation())
    }

    pub fn velocity(&self) -> Vec2 {
        from_physics(self.body().linvel())
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.body_mut().set_linvel(to_physics(velocity), true);
    }

    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.body_mut().apply_impulse(to_physics(impulse), true);
    }

    /// Collider attached to the tracked object
    pub fn object_collider(&self) -> ColliderHandle {
        self.object_collider
    }

    /// Wall colliders: top, bottom, left, right
    pub fn boundary_colliders(&self) -> [ColliderHandle; 4] {
        self.walls
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weightless() -> Tuning {
        Tuning {
            gravity: Vec2::ZERO,
            ..Tuning::default()
        }
    }

    #[test]
    fn test_object_spawns_at_upper_third() {
        let driver = SimulationDriver::new(Vec2::new(900.0, 600.0), &Tuning::default());
        assert_eq!(driver.position(), Vec2::new(450.0, 200.0));
        assert_eq!(driver.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_gravity_pulls_down_screen() {
        let mut driver = SimulationDriver::new(Vec2::new(800.0, 600.0), &Tuning::default());
        let start = driver.position();
        for _ in 0..3 {
            driver.step();
        }
        assert!(driver.velocity().y > 0.0);
        assert!(driver.position().y > start.y);
        assert!((driver.position().x - start.x).abs() < 1e-3);
    }

    #[test]
    fn test_set_velocity_and_impulse() {
        let tuning = weightless();
        let mut driver = SimulationDriver::new(Vec2::new(800.0, 600.0), &tuning);
        driver.step();
        driver.set_velocity(Vec2::new(10.0, -5.0));
        assert_eq!(driver.velocity(), Vec2::new(10.0, -5.0));

        driver.set_velocity(Vec2::ZERO);
        driver.apply_impulse(Vec2::new(tuning.object_mass * 40.0, 0.0));
        let v = driver.velocity();
        assert!((v.x - 40.0).abs() < 1e-2, "impulse / mass = 40, got {}", v.x);
        assert!(v.y.abs() < 1e-4);
    }

    #[test]
    fn test_wall_bounce_reverses_normal_velocity() {
        let mut driver = SimulationDriver::new(Vec2::new(800.0, 600.0), &weightless());
        driver.set_velocity(Vec2::new(3000.0, 0.0));

        let mut before = driver.velocity().x;
        let mut bounced = None;
        for _ in 0..30 {
            driver.step();
            let vx = driver.velocity().x;
            if vx < 0.0 {
                bounced = Some(vx);
                break;
            }
            before = vx;
        }

        let after = bounced.expect("ball never reached the right wall");
        assert!(after.abs() > before * 0.5, "bounce lost too much energy: {} -> {}", before, after);
        assert!(driver.position().x < 800.0);
    }

    #[test]
    fn test_undamped_bounce_preserves_speed_at_both_walls() {
        let tuning = Tuning {
            linear_damping: 0.0,
            ..weightless()
        };
        let mut driver = SimulationDriver::new(Vec2::new(800.0, 600.0), &tuning);
        driver.set_velocity(Vec2::new(3000.0, 0.0));

        let mut flips = Vec::new();
        let mut last = driver.velocity();
        for _ in 0..40 {
            driver.step();
            let v = driver.velocity();
            if v.x.signum() != last.x.signum() {
                flips.push(v);
            }
            last = v;
        }

        assert!(flips.len() >= 2, "expected bounces off both side walls, got {:?}", flips);
        assert!((flips[0] - Vec2::new(-3000.0, 0.0)).length() < 1e-3, "right wall: {:?}", flips[0]);
        assert!((flips[1] - Vec2::new(3000.0, 0.0)).length() < 1e-3, "left wall: {:?}", flips[1]);
    }

    #[test]
    fn test_wall_contact_emits_start_events() {
        let mut driver = SimulationDriver::new(Vec2::new(800.0, 600.0), &weightless());
        driver.set_velocity(Vec2::new(0.0, 4000.0));

        let bottom = driver.boundary_colliders()[1];
        let ball = driver.object_collider();
        let mut started = Vec::new();
        for _ in 0..30 {
            started.extend(driver.step().into_iter().filter(|r| r.started));
        }

        assert!(!started.is_empty(), "no collision reported");
        let first = started[0];
        let pair = [first.handle1, first.handle2];
        assert!(pair.contains(&bottom));
        assert!(pair.contains(&ball));
    }

    #[test]
    fn test_events_do_not_carry_over_between_steps() {
        let mut driver = SimulationDriver::new(Vec2::new(800.0, 600.0), &weightless());
        // Resting mid-air with no gravity: nothing touches anything.
        for _ in 0..5 {
            assert!(driver.step().is_empty());
        }
    }
}
