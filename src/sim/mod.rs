//! Deterministic simulation module
//!
//! All battle logic lives here. This module must be pure and deterministic:
//! - One tick per call, no internal timers
//! - Seeded RNG only
//! - Stable iteration order (by list index, lower index first)
//! - No rendering or platform dependencies

pub mod collision;
pub mod kind;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{WallBounce, circles_overlap, wall_bounce, within_arena};
pub use kind::{Kind, KindInfo, Roster};
pub use spawn::{SpawnReport, clamp_count, parse_count, spawn_entities};
pub use state::{Arena, Entity, SimPhase, Simulation, TickReport};
pub use tick::{Conversion, check_winner, step_entities};
