//! Click-to-throw impulses

use glam::Vec2;

/// Impulse that throws an object at `object` toward `click`.
///
/// `None` when the click lands exactly on the object's centre, since there is
/// no direction to throw in.
pub fn launch_impulse(object: Vec2, click: Vec2, multiplier: f32) -> Option<Vec2> {
    let direction = click - object;
    let distance = direction.length();
    (distance > 0.0).then(|| direction / distance * multiplier)
}
