//! Simulation state and core types
//!
//! Everything a round needs lives in [`Simulation`]; there is no global state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::kind::{Kind, Roster};
use super::spawn::{SpawnReport, spawn_entities};
use super::tick::{Conversion, check_winner, step_entities};
use crate::error::SimError;
use crate::settings::SimConfig;

/// Lifecycle of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    /// No entities
    Idle,
    /// Tick loop active
    Running,
    /// One kind left, waiting for reset or respawn
    Finished,
}

/// Arena extent in pixels, supplied by the driver each call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether an entity of `diameter` fits at all
    pub fn fits(&self, diameter: f32) -> bool {
        self.width > diameter && self.height > diameter
    }
}

/// A moving participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: Kind,
    /// Centre position
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub radius: f32,
}

impl Entity {
    pub fn new(id: u32, kind: Kind, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            radius,
        }
    }

    /// Move one tick along the current velocity
    #[inline]
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }
}

/// Outcome of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Conversions applied this tick, in pair order
    pub conversions: Vec<Conversion>,
    /// Set on the tick that finished the round
    pub winner: Option<Kind>,
}

/// Complete simulation context (deterministic for a given seed)
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Seed the RNG was created from
    pub seed: u64,
    pub config: SimConfig,
    pub phase: SimPhase,
    /// Winning kind once `Finished`
    pub winner: Option<Kind>,
    /// Ticks since the last spawn
    pub time_ticks: u64,
    entities: Vec<Entity>,
    rng: Pcg32,
    /// Next entity ID (never reused, so respawned entities get fresh IDs)
    next_id: u32,
}

impl Simulation {
    /// Create an idle simulation
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            seed,
            config,
            phase: SimPhase::Idle,
            winner: None,
            time_ticks: 0,
            entities: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        })
    }

    /// Current entities (read-only snapshot for rendering)
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn roster(&self) -> &Roster {
        &self.config.roster
    }

    /// Replace the entity list with a fresh batch and start running
    ///
    /// On error the simulation is left idle.
    pub fn spawn(&mut self, count: usize, arena: Arena) -> Result<SpawnReport, SimError> {
        self.reset();
        self.config.validate()?;

        let (entities, report) =
            spawn_entities(&self.config, &mut self.rng, self.next_id, count, arena)?;
        self.next_id += entities.len() as u32;
        self.entities = entities;
        self.phase = SimPhase::Running;

        log::info!(
            "Spawned {}/{} entities in {}x{} arena",
            report.placed,
            report.requested,
            arena.width,
            arena.height
        );

        Ok(report)
    }

    /// Advance one tick; a no-op unless running
    pub fn tick(&mut self, arena: Arena) -> TickReport {
        if self.phase != SimPhase::Running {
            return TickReport::default();
        }

        self.time_ticks += 1;
        let conversions = step_entities(&mut self.entities, arena, &self.config.roster);

        let winner = check_winner(&self.entities);
        if let Some(kind) = winner {
            self.finish(kind);
        }

        TickReport {
            conversions,
            winner,
        }
    }

    /// Clear all entities and go idle
    pub fn reset(&mut self) {
        self.entities.clear();
        self.phase = SimPhase::Idle;
        self.winner = None;
        self.time_ticks = 0;
    }

    /// Count of entities per kind, in roster order
    pub fn census(&self) -> Vec<usize> {
        let mut counts = vec![0; self.config.roster.len()];
        for entity in &self.entities {
            if let Some(slot) = counts.get_mut(entity.kind.index()) {
                *slot += 1;
            }
        }
        counts
    }

    /// Place a hand-built entity list (scripted scenarios and tests)
    pub fn load_entities(&mut self, entities: Vec<Entity>) {
        self.reset();
        if let Some(max_id) = entities.iter().map(|e| e.id).max() {
            self.next_id = self.next_id.max(max_id + 1);
        }
        self.entities = entities;
        if !self.entities.is_empty() {
            self.phase = SimPhase::Running;
        }
    }

    fn finish(&mut self, kind: Kind) {
        self.phase = SimPhase::Finished;
        self.winner = Some(kind);
        log::info!(
            "{} wins after {} ticks",
            self.config.roster.glyph(kind),
            self.time_ticks
        );
    }
}
