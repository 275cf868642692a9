//! Squash/stretch presentation of the thrown object
//!
//! Purely cosmetic: reads physics state, never feeds back into it.

use glam::Vec2;

use crate::tuning::Tuning;

/// On-screen placement of the object for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectVisual {
    /// Left/top in screen pixels (1:1 with the physics translation)
    pub position: Vec2,
    /// Width/height in screen pixels
    pub size: Vec2,
}

/// Tracks the smoothed visual size of the object
#[derive(Debug, Clone)]
pub struct VisualMapper {
    base_size: Vec2,
    size: Vec2,
    /// Velocity seen on the previous tick, `None` before the first one
    last_velocity: Option<Vec2>,
    deform_factor: f32,
    jump_factor: f32,
}

impl VisualMapper {
    pub fn new(tuning: &Tuning) -> Self {
        let base_size = tuning.base_size();
        Self {
            base_size,
            size: base_size,
            last_velocity: None,
            deform_factor: tuning.deform_factor,
            jump_factor: tuning.jump_factor,
        }
    }

    /// Size the object eases toward for a given per-tick velocity change.
    ///
    /// Axes are crossed: vertical jolts widen the object, horizontal jolts make
    /// it taller, so a wall hit squashes it against the wall.
    pub fn target_size(&self, acceleration: Vec2) -> Vec2 {
        self.base_size + self.deform_factor * Vec2::new(acceleration.y.abs(), acceleration.x.abs())
    }

    /// Advance one tick from the current physics state
    pub fn update(&mut self, position: Vec2, velocity: Vec2) -> ObjectVisual {
        if let Some(last) = self.last_velocity {
            let target = self.target_size(velocity - last);
            self.size += (target - self.size) / self.jump_factor;
        }
        self.last_velocity = Some(velocity);

        ObjectVisual {
            position,
            size: self.size,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn base_size(&self) -> Vec2 {
        self.base_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_keeps_base_size() {
        let mut mapper = VisualMapper::new(&Tuning::default());
        let visual = mapper.update(Vec2::new(12.0, 34.0), Vec2::new(5000.0, -5000.0));
        assert_eq!(visual.position, Vec2::new(12.0, 34.0));
        assert_eq!(visual.size, Vec2::new(60.0, 60.0));
    }

    #[test]
    fn test_axes_are_cross_mapped() {
        let mut mapper = VisualMapper::new(&Tuning::default());
        mapper.update(Vec2::ZERO, Vec2::ZERO);
        // Vertical jolt of 1000: target width 60 + 50, height unchanged.
        let visual = mapper.update(Vec2::ZERO, Vec2::new(0.0, -1000.0));
        assert!((visual.size.x - 70.0).abs() < 1e-4);
        assert_eq!(visual.size.y, 60.0);

        let mut mapper = VisualMapper::new(&Tuning::default());
        mapper.update(Vec2::ZERO, Vec2::ZERO);
        let visual = mapper.update(Vec2::ZERO, Vec2::new(1000.0, 0.0));
        assert_eq!(visual.size.x, 60.0);
        assert!((visual.size.y - 70.0).abs() < 1e-4);
    }

    #[test]
    fn test_size_relaxes_geometrically() {
        let mut mapper = VisualMapper::new(&Tuning::default());
        mapper.update(Vec2::ZERO, Vec2::ZERO);
        mapper.update(Vec2::ZERO, Vec2::new(0.0, 4000.0));
        let base = mapper.base_size();
        let initial_gap = mapper.size() - base;
        assert!(initial_gap.x > 0.0);

        let mut previous_gap = initial_gap.x;
        for n in 1..=20 {
            // Constant velocity: zero acceleration, target is the base size.
            mapper.update(Vec2::ZERO, Vec2::new(0.0, 4000.0));
            let gap = mapper.size().x - base.x;
            let expected = initial_gap.x * 0.8f32.powi(n);
            assert!((gap - expected).abs() < 1e-3, "tick {}: {} vs {}", n, gap, expected);
            assert!(gap <= previous_gap);
            assert_eq!(mapper.size().y, base.y);
            previous_gap = gap;
        }
        assert!(previous_gap < initial_gap.x * 0.02);
    }
}
