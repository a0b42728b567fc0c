//! Snapshot diffing for renderers
//!
//! The simulation only produces plain entities. A renderer keeps a [`Scene`]
//! and turns each new snapshot into view operations keyed by entity ID, so
//! visual elements are created and destroyed by the renderer alone.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::sim::{Entity, Kind};

/// One change a renderer must apply
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewOp {
    /// New entity: create its visual
    Create { id: u32, kind: Kind, pos: Vec2, radius: f32 },
    /// Position changed
    Move { id: u32, pos: Vec2 },
    /// Kind changed (swap the glyph)
    Retype { id: u32, kind: Kind },
    /// Entity gone: destroy its visual
    Remove { id: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Shown {
    kind: Kind,
    pos: Vec2,
}

/// What the renderer currently displays
#[derive(Debug, Clone, Default)]
pub struct Scene {
    shown: BTreeMap<u32, Shown>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.shown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    /// Diff `entities` against what is shown and record the new snapshot
    ///
    /// Creates and updates come in entity order, removals last by ascending ID.
    pub fn sync(&mut self, entities: &[Entity]) -> Vec<ViewOp> {
        let mut ops = Vec::new();
        let mut next = BTreeMap::new();

        for entity in entities {
            match self.shown.remove(&entity.id) {
                None => ops.push(ViewOp::Create {
                    id: entity.id,
                    kind: entity.kind,
                    pos: entity.pos,
                    radius: entity.radius,
                }),
                Some(prev) => {
                    if prev.kind != entity.kind {
                        ops.push(ViewOp::Retype {
                            id: entity.id,
                            kind: entity.kind,
                        });
                    }
                    if prev.pos != entity.pos {
                        ops.push(ViewOp::Move {
                            id: entity.id,
                            pos: entity.pos,
                        });
                    }
                }
            }
            next.insert(
                entity.id,
                Shown {
                    kind: entity.kind,
                    pos: entity.pos,
                },
            );
        }

        ops.extend(self.shown.keys().map(|&id| ViewOp::Remove { id }));
        self.shown = next;
        ops
    }

    /// Forget everything, returning removals for whatever was shown
    pub fn clear(&mut self) -> Vec<ViewOp> {
        std::mem::take(&mut self.shown)
            .into_keys()
            .map(|id| ViewOp::Remove { id })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: u32, kind: u8, x: f32) -> Entity {
        Entity::new(id, Kind(kind), Vec2::new(x, 50.0), Vec2::ZERO, 15.0)
    }

    #[test]
    fn test_first_sync_creates_everything() {
        let mut scene = Scene::new();
        let ops = scene.sync(&[entity(1, 0, 10.0), entity(2, 1, 90.0)]);
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0], ViewOp::Create { id: 1, .. }));
        assert!(matches!(ops[1], ViewOp::Create { id: 2, .. }));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_unchanged_snapshot_is_quiet() {
        let mut scene = Scene::new();
        let entities = [entity(1, 0, 10.0)];
        scene.sync(&entities);
        assert!(scene.sync(&entities).is_empty());
    }

    #[test]
    fn test_move_and_retype() {
        let mut scene = Scene::new();
        scene.sync(&[entity(1, 0, 10.0), entity(2, 2, 90.0)]);

        let ops = scene.sync(&[entity(1, 0, 12.0), entity(2, 0, 90.0)]);
        assert_eq!(
            ops,
            vec![
                ViewOp::Move {
                    id: 1,
                    pos: Vec2::new(12.0, 50.0)
                },
                ViewOp::Retype { id: 2, kind: Kind(0) },
            ]
        );
    }

    #[test]
    fn test_respawn_removes_old_ids() {
        let mut scene = Scene::new();
        scene.sync(&[entity(1, 0, 10.0), entity(2, 1, 90.0)]);

        let ops = scene.sync(&[entity(3, 2, 40.0)]);
        assert_eq!(ops.len(), 3);
        assert!(matches!(ops[0], ViewOp::Create { id: 3, .. }));
        assert_eq!(ops[1], ViewOp::Remove { id: 1 });
        assert_eq!(ops[2], ViewOp::Remove { id: 2 });
    }

    #[test]
    fn test_clear() {
        let mut scene = Scene::new();
        scene.sync(&[entity(4, 0, 10.0), entity(2, 1, 90.0)]);
        assert_eq!(
            scene.clear(),
            vec![ViewOp::Remove { id: 2 }, ViewOp::Remove { id: 4 }]
        );
        assert!(scene.is_empty());
    }
}
