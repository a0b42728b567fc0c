//! Batch spawning with bounded rejection sampling
//!
//! Candidates are redrawn while they sit too close to an entity already
//! placed. Each entity gets a fixed attempt budget; when it runs out, the
//! separation requirement is halved (never below the entity diameter) and the
//! search continues. If even the diameter cannot be honoured, spawning stops
//! and the shortfall is reported.

use glam::Vec2;
use rand::Rng;

use super::kind::Roster;
use super::state::{Arena, Entity};
use crate::distance;
use crate::error::SimError;
use crate::settings::{SimConfig, SpawnArea};
use crate::with_random_sign;

/// Summary of a spawn batch
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnReport {
    /// Count after clamping to `[1, max_entities]`
    pub requested: usize,
    /// Entities actually placed
    pub placed: usize,
    /// Separation in force when the batch finished
    pub final_separation: f32,
    /// Candidate positions drawn in total
    pub attempts: u64,
}

impl SpawnReport {
    /// Whether fewer entities were placed than requested
    pub fn is_short(&self) -> bool {
        self.placed < self.requested
    }

    /// Whether the separation requirement had to be relaxed
    pub fn relaxed(&self, config: &SimConfig) -> bool {
        self.final_separation < config.min_separation
    }
}

/// Clamp a requested count into `[1, max]`
pub fn clamp_count(requested: i64, max: usize) -> usize {
    if requested < 1 {
        log::warn!("Entity count {requested} raised to 1");
        1
    } else if requested as u64 > max as u64 {
        log::warn!("Entity count {requested} capped at {max}");
        max
    } else {
        requested as usize
    }
}

/// Parse count text from the UI, clamping numeric values into `[1, max]`
pub fn parse_count(text: &str, max: usize) -> Result<usize, SimError> {
    let trimmed = text.trim();
    let value = match trimmed.parse::<i64>() {
        Ok(v) => v,
        // Accept "12.7" the way a number input would, truncating
        Err(_) => match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => v.trunc() as i64,
            _ => return Err(SimError::InvalidCount(text.to_string())),
        },
    };
    Ok(clamp_count(value, max))
}

/// Uniform sample from `[lo, hi]`, collapsing to `lo` for an empty span
fn sample_span<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}

/// Centre-position bounds `(min, max)` for the candidate sampler
fn candidate_regions(area: SpawnArea, arena: Arena, radius: f32) -> Vec<(Vec2, Vec2)> {
    let max_x = arena.width - radius;
    let max_y = arena.height - radius;

    match area {
        SpawnArea::Anywhere => vec![(Vec2::splat(radius), Vec2::new(max_x, max_y))],
        SpawnArea::Corners { fraction } => {
            let span_x = arena.width * fraction;
            let span_y = arena.height * fraction;
            let near_x = (radius, (span_x - radius).max(radius));
            let far_x = ((arena.width - span_x + radius).min(max_x), max_x);
            let near_y = (radius, (span_y - radius).max(radius));
            let far_y = ((arena.height - span_y + radius).min(max_y), max_y);

            [(near_x, near_y), (far_x, near_y), (near_x, far_y), (far_x, far_y)]
                .into_iter()
                .map(|((x0, x1), (y0, y1))| (Vec2::new(x0, y0), Vec2::new(x1, y1)))
                .collect()
        }
    }
}

/// Random velocity with each component's magnitude in `[min_speed, max_speed]`
fn random_velocity<R: Rng + ?Sized>(rng: &mut R, config: &SimConfig) -> Vec2 {
    let vx = sample_span(rng, config.min_speed, config.max_speed);
    let vy = sample_span(rng, config.min_speed, config.max_speed);
    Vec2::new(with_random_sign(rng, vx), with_random_sign(rng, vy))
}

/// Find a free position, or `None` once `budget` candidates were rejected
fn place<R: Rng + ?Sized>(
    rng: &mut R,
    regions: &[(Vec2, Vec2)],
    placed: &[Entity],
    separation: f32,
    budget: u32,
    attempts: &mut u64,
) -> Option<Vec2> {
    for _ in 0..budget {
        *attempts += 1;
        let (min, max) = regions[rng.random_range(0..regions.len())];
        let candidate = Vec2::new(
            sample_span(rng, min.x, max.x),
            sample_span(rng, min.y, max.y),
        );
        if placed.iter().all(|e| distance(e.pos, candidate) > separation) {
            return Some(candidate);
        }
    }
    None
}

/// Build a fresh batch of entities
///
/// IDs start at `first_id`. Kinds cycle through the roster so the batch is
/// split as evenly as possible.
pub fn spawn_entities<R: Rng + ?Sized>(
    config: &SimConfig,
    rng: &mut R,
    first_id: u32,
    count: usize,
    arena: Arena,
) -> Result<(Vec<Entity>, SpawnReport), SimError> {
    let diameter = config.diameter();
    if !arena.fits(diameter) {
        return Err(SimError::DegenerateArena {
            width: arena.width,
            height: arena.height,
            diameter,
        });
    }

    let requested = count.clamp(1, config.max_entities);
    if requested != count {
        log::warn!("Entity count {count} clamped to {requested}");
    }

    let roster: &Roster = &config.roster;
    let regions = candidate_regions(config.spawn_area, arena, config.entity_radius);
    let mut entities: Vec<Entity> = Vec::with_capacity(requested);
    let mut separation = config.min_separation;
    let mut attempts = 0u64;

    'spawn: for slot in 0..requested {
        let pos = loop {
            if let Some(pos) = place(
                rng,
                &regions,
                &entities,
                separation,
                config.max_placement_attempts,
                &mut attempts,
            ) {
                break pos;
            }
            if separation <= diameter {
                log::warn!(
                    "No room for entity {} of {} at separation {}",
                    slot + 1,
                    requested,
                    separation
                );
                break 'spawn;
            }
            separation = (separation / 2.0).max(diameter);
            log::warn!("Relaxing spawn separation to {separation}");
        };

        let vel = random_velocity(rng, config);
        entities.push(Entity::new(
            first_id + slot as u32,
            roster.cycle(slot),
            pos,
            vel,
            config.entity_radius,
        ));
    }

    if entities.is_empty() {
        return Err(SimError::PlacementFailed { requested });
    }

    let report = SpawnReport {
        requested,
        placed: entities.len(),
        final_separation: separation,
        attempts,
    };
    if report.is_short() {
        log::warn!(
            "Placed only {} of {} entities",
            report.placed,
            report.requested
        );
    }

    Ok((entities, report))
}
