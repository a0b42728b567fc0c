//! Error type for spawning and configuration
//!
//! Nothing here is fatal: a failed spawn leaves the simulation idle and the
//! driver decides how to tell the player.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Count text that is not a number at all
    #[error("entity count {0:?} is not a number")]
    InvalidCount(String),
    /// Arena too small to hold a single entity
    #[error("arena {width}x{height} cannot fit an entity of diameter {diameter}")]
    DegenerateArena { width: f32, height: f32, diameter: f32 },
    /// Not even one entity could be placed within the attempt budget
    #[error("could not place any of {requested} entities")]
    PlacementFailed { requested: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
