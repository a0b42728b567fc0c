//! Single simulation step
//!
//! One tick runs four phases in order: move, bounce, collide, convert.
//! Conversions read the kinds captured at the start of the collision phase,
//! so an entity converted this tick only acts as its new kind next tick.

use serde::{Deserialize, Serialize};

use super::collision::{circles_overlap, wall_bounce};
use super::kind::{Kind, Roster};
use super::state::{Arena, Entity};

/// A kind change caused by a collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    /// Entity that changed kind
    pub id: u32,
    /// Entity that converted it
    pub by: u32,
    pub from: Kind,
    pub to: Kind,
}

/// Advance a slice of entities by one tick and return the conversions applied
pub fn step_entities(entities: &mut [Entity], arena: Arena, roster: &Roster) -> Vec<Conversion> {
    for entity in entities.iter_mut() {
        entity.advance();
    }

    for entity in entities.iter_mut() {
        entity.vel = wall_bounce(entity.pos, entity.vel, entity.radius, arena).vel;
    }

    let kinds: Vec<Kind> = entities.iter().map(|e| e.kind).collect();
    let mut conversions = Vec::new();

    // Each unordered pair once, lower index first
    for i in 0..entities.len() {
        for j in (i + 1)..entities.len() {
            let (a, b) = (&entities[i], &entities[j]);
            if !circles_overlap(a.pos, a.radius, b.pos, b.radius) {
                continue;
            }

            let (winner, loser) = if roster.dominates(kinds[i], kinds[j]) {
                (i, j)
            } else if roster.dominates(kinds[j], kinds[i]) {
                (j, i)
            } else {
                continue;
            };

            // Only one kind beats any given kind, so repeat hits agree
            let to = kinds[winner];
            if entities[loser].kind == to {
                continue;
            }

            let conversion = Conversion {
                id: entities[loser].id,
                by: entities[winner].id,
                from: entities[loser].kind,
                to,
            };
            log::debug!(
                "Entity {} converted {} from {} to {}",
                conversion.by,
                conversion.id,
                roster.name(conversion.from),
                roster.name(conversion.to)
            );
            entities[loser].kind = to;
            conversions.push(conversion);
        }
    }

    conversions
}

/// The single kind left in the arena, if there is exactly one
pub fn check_winner(entities: &[Entity]) -> Option<Kind> {
    let first = entities.first()?.kind;
    entities.iter().all(|e| e.kind == first).then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimConfig;
    use crate::sim::collision::within_arena;
    use crate::sim::state::{SimPhase, Simulation};
    use glam::Vec2;

    const ROCK: Kind = Kind(0);
    const PAPER: Kind = Kind(1);
    const SCISSORS: Kind = Kind(2);
    const ARENA: Arena = Arena::new(500.0, 500.0);

    fn entity(id: u32, kind: Kind, x: f32, y: f32, vx: f32, vy: f32) -> Entity {
        Entity::new(id, kind, Vec2::new(x, y), Vec2::new(vx, vy), 15.0)
    }

    #[test]
    fn test_rock_converts_scissors() {
        let roster = Roster::classic();
        let mut entities = vec![
            entity(1, ROCK, 200.0, 250.0, 2.0, 0.0),
            entity(2, SCISSORS, 220.0, 250.0, -2.0, 0.0),
        ];

        let conversions = step_entities(&mut entities, ARENA, &roster);

        assert_eq!(entities[0].kind, ROCK);
        assert_eq!(entities[1].kind, ROCK);
        assert_eq!(
            conversions,
            vec![Conversion {
                id: 2,
                by: 1,
                from: SCISSORS,
                to: ROCK
            }]
        );
        assert_eq!(check_winner(&entities), Some(ROCK));
    }

    #[test]
    fn test_conversion_independent_of_pair_order() {
        let roster = Roster::classic();
        // Loser listed first this time
        let mut entities = vec![
            entity(1, SCISSORS, 220.0, 250.0, 0.0, 0.0),
            entity(2, ROCK, 200.0, 250.0, 0.0, 0.0),
        ];

        step_entities(&mut entities, ARENA, &roster);

        assert_eq!(entities[0].kind, ROCK);
        assert_eq!(entities[1].kind, ROCK);
    }

    #[test]
    fn test_same_kind_collision_does_nothing() {
        let roster = Roster::classic();
        let mut entities = vec![
            entity(1, PAPER, 200.0, 250.0, 0.0, 0.0),
            entity(2, PAPER, 210.0, 250.0, 0.0, 0.0),
        ];

        let conversions = step_entities(&mut entities, ARENA, &roster);
        assert!(conversions.is_empty());
    }

    #[test]
    fn test_three_way_pileup_uses_start_of_tick_kinds() {
        let roster = Roster::classic();
        let mut entities = vec![
            entity(1, ROCK, 250.0, 250.0, 0.0, 0.0),
            entity(2, SCISSORS, 260.0, 250.0, 0.0, 0.0),
            entity(3, PAPER, 255.0, 258.0, 0.0, 0.0),
        ];

        let conversions = step_entities(&mut entities, ARENA, &roster);

        // Everyone is hit by the kind that beat it at the start of the tick
        assert_eq!(entities[0].kind, PAPER);
        assert_eq!(entities[1].kind, ROCK);
        assert_eq!(entities[2].kind, SCISSORS);
        assert_eq!(conversions.len(), 3);
    }

    #[test]
    fn test_distant_entities_do_not_convert() {
        let roster = Roster::classic();
        let mut entities = vec![
            entity(1, ROCK, 100.0, 100.0, 1.0, 0.0),
            entity(2, SCISSORS, 400.0, 400.0, -1.0, 0.0),
        ];

        let conversions = step_entities(&mut entities, ARENA, &roster);
        assert!(conversions.is_empty());
        assert_eq!(entities[1].kind, SCISSORS);
    }

    #[test]
    fn test_move_then_bounce() {
        let roster = Roster::classic();
        let mut entities = vec![entity(1, ROCK, 483.0, 250.0, 3.0, 0.0)];

        step_entities(&mut entities, ARENA, &roster);

        // Moved to the wall, then the velocity flips without repositioning
        assert_eq!(entities[0].pos, Vec2::new(486.0, 250.0));
        assert_eq!(entities[0].vel, Vec2::new(-3.0, 0.0));
    }

    #[test]
    fn test_resized_arena_uses_latest_extent() {
        let roster = Roster::classic();
        let mut entities = vec![entity(1, ROCK, 300.0, 100.0, 2.0, 0.0)];

        // Shrunk arena: the entity is now outside and must head back in
        step_entities(&mut entities, Arena::new(200.0, 200.0), &roster);
        assert_eq!(entities[0].vel.x, -2.0);
    }

    #[test]
    fn test_check_winner() {
        assert_eq!(check_winner(&[]), None);

        let same = vec![
            entity(1, PAPER, 10.0, 10.0, 0.0, 0.0),
            entity(2, PAPER, 90.0, 90.0, 0.0, 0.0),
        ];
        assert_eq!(check_winner(&same), Some(PAPER));

        let mixed = vec![
            entity(1, PAPER, 10.0, 10.0, 0.0, 0.0),
            entity(2, ROCK, 90.0, 90.0, 0.0, 0.0),
        ];
        assert_eq!(check_winner(&mixed), None);
    }

    #[test]
    fn test_head_on_collision_finishes_round() {
        let mut sim = Simulation::new(SimConfig::default(), 1).unwrap();
        sim.load_entities(vec![
            entity(1, ROCK, 100.0, 250.0, 3.0, 0.0),
            entity(2, SCISSORS, 160.0, 250.0, -3.0, 0.0),
        ]);

        let mut ticks = 0;
        while sim.phase == SimPhase::Running && ticks < 20 {
            sim.tick(ARENA);
            ticks += 1;
        }

        // Gap closes by 6 per tick: 60 -> 24 < 30 on tick 6
        assert_eq!(ticks, 6);
        assert_eq!(sim.winner, Some(ROCK));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            /// Entities never leave the arena by more than one tick of travel
            #[test]
            fn test_boundary_containment(
                seed in any::<u64>(),
                count in 1usize..=50,
                width in 200.0f32..900.0,
                height in 200.0f32..900.0,
            ) {
                let config = SimConfig::default();
                let tolerance = config.max_speed;
                let arena = Arena::new(width, height);
                let mut sim = Simulation::new(config, seed).unwrap();
                sim.spawn(count, arena).unwrap();

                for _ in 0..300 {
                    sim.tick(arena);
                    for e in sim.entities() {
                        prop_assert!(
                            within_arena(e.pos, arena, tolerance),
                            "entity {} escaped to {:?}", e.id, e.pos
                        );
                    }
                }
            }

            /// Entities in a row moving in lockstep never touch, so kinds never change
            #[test]
            fn test_kind_conservation_without_contact(
                kinds in prop::collection::vec(0u8..3, 1..12),
                vy in 1.0f32..5.0,
                ticks in 1usize..400,
            ) {
                let roster = Roster::classic();
                let mut entities: Vec<Entity> = kinds
                    .iter()
                    .enumerate()
                    .map(|(i, &k)| entity(i as u32, Kind(k), 20.0 + i as f32 * 40.0, 250.0, 0.0, vy))
                    .collect();

                let mut before: Vec<Kind> = entities.iter().map(|e| e.kind).collect();
                for _ in 0..ticks {
                    let conversions = step_entities(&mut entities, ARENA, &roster);
                    prop_assert!(conversions.is_empty());
                }
                let mut after: Vec<Kind> = entities.iter().map(|e| e.kind).collect();
                before.sort();
                after.sort();
                prop_assert_eq!(before, after);
            }

            /// Identical input lists step to identical output lists
            #[test]
            fn test_step_is_deterministic(seed in any::<u64>(), count in 2usize..=50) {
                let mut sim = Simulation::new(SimConfig::default(), seed).unwrap();
                sim.spawn(count, ARENA).unwrap();
                let roster = Roster::classic();

                let mut a = sim.entities().to_vec();
                let mut b = sim.entities().to_vec();
                for _ in 0..50 {
                    let ca = step_entities(&mut a, ARENA, &roster);
                    let cb = step_entities(&mut b, ARENA, &roster);
                    prop_assert_eq!(ca, cb);
                }
                prop_assert_eq!(a, b);
            }
        }
    }
}
