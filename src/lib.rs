//! Emoji Clash - A rock-paper-scissors emoji battle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, bounces, collisions, conversions)
//! - `view`: Snapshot diffing for whatever renders the arena
//! - `settings`: Validated simulation configuration and presets
//! - `error`: Error type shared by spawn and configuration

pub mod error;
pub mod settings;
pub mod sim;
pub mod view;

pub use error::SimError;
pub use settings::{Preset, SimConfig, SpawnArea};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Hard cap on entities per arena (bounds the pairwise collision cost)
    pub const MAX_ENTITIES: usize = 50;

    /// Speed range per velocity component (pixels per tick)
    pub const MIN_SPEED: f32 = 1.0;
    pub const MAX_SPEED: f32 = 5.0;

    /// Entity defaults
    pub const ENTITY_RADIUS: f32 = 15.0;
    /// Minimum distance between entity centres at spawn
    pub const MIN_SEPARATION: f32 = 50.0;

    /// Rejection-sampling budget per entity and separation level
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

    /// Share of each arena axis covered by a corner spawn region
    pub const CORNER_FRACTION: f32 = 0.25;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Random sign flip: returns `magnitude` or `-magnitude` with equal odds
#[inline]
pub fn with_random_sign<R: rand::Rng + ?Sized>(rng: &mut R, magnitude: f32) -> f32 {
    if rng.random_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}
