//! Collision detection and wall bounces
//!
//! Entities are circles. Two entities touch when their centres are closer than
//! the sum of their radii; walls reflect velocity components without moving
//! the entity back inside.

use glam::Vec2;

use super::state::Arena;
use crate::distance;

/// Result of a wall check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallBounce {
    /// Velocity after reflection
    pub vel: Vec2,
    /// Whether the horizontal component was flipped
    pub flipped_x: bool,
    /// Whether the vertical component was flipped
    pub flipped_y: bool,
}

impl WallBounce {
    pub fn hit(&self) -> bool {
        self.flipped_x || self.flipped_y
    }
}

/// Check whether two circles overlap
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    distance(a_pos, b_pos) < a_radius + b_radius
}

/// Reflect one velocity component against the `[0, extent]` walls
///
/// Touching or crossing a wall points the component back inward. A component
/// already heading inward is left alone, so an entity that overshot keeps
/// recovering instead of flipping every tick.
#[inline]
fn reflect_axis(pos: f32, vel: f32, radius: f32, extent: f32) -> f32 {
    let past_low = pos - radius <= 0.0 && vel < 0.0;
    let past_high = pos + radius >= extent && vel > 0.0;
    if past_low || past_high { -vel } else { vel }
}

/// Check a circle against the arena walls
pub fn wall_bounce(pos: Vec2, vel: Vec2, radius: f32, arena: Arena) -> WallBounce {
    let vx = reflect_axis(pos.x, vel.x, radius, arena.width);
    let vy = reflect_axis(pos.y, vel.y, radius, arena.height);
    WallBounce {
        vel: Vec2::new(vx, vy),
        flipped_x: vx != vel.x,
        flipped_y: vy != vel.y,
    }
}

/// Whether a point lies inside the arena, allowing `tolerance` of overshoot
pub fn within_arena(pos: Vec2, arena: Arena, tolerance: f32) -> bool {
    pos.x >= -tolerance
        && pos.x <= arena.width + tolerance
        && pos.y >= -tolerance
        && pos.y <= arena.height + tolerance
}
