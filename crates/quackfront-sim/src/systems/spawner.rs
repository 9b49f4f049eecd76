//! Enemy spawning stage: brings scheduled enemies in as the battlefield
//! scrolls over them.

use glam::Vec2;

use quackfront_core::config::SpawnPointConfig;
use quackfront_core::enums::AnimalKind;
use quackfront_core::types::FloatRect;

use crate::context::GameContext;
use crate::graph::{NodeId, SceneGraph};
use crate::nodes::Animal;
use crate::world_setup::spawn_animal;

/// An enemy waiting to be spawned, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub kind: AnimalKind,
    pub x: f32,
    pub y: f32,
}

/// Pending enemies, sorted ascending by `y`. The tail is the lowest point
/// in the world and therefore the next one the camera reaches.
#[derive(Debug, Clone, Default)]
pub struct EnemySchedule {
    points: Vec<SpawnPoint>,
}

impl EnemySchedule {
    /// Resolve configured points relative to the player's spawn position.
    /// A positive configured `y` lies further up the level.
    pub fn from_config(spawn_position: Vec2, configured: &[SpawnPointConfig]) -> Self {
        let mut points: Vec<SpawnPoint> = configured
            .iter()
            .map(|point| SpawnPoint {
                kind: point.kind,
                x: spawn_position.x + point.x,
                y: spawn_position.y - point.y,
            })
            .collect();
        points.sort_by(|a, b| a.y.total_cmp(&b.y));
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Remove and return every point below the top of `battlefield`,
    /// nearest first.
    pub fn take_due(&mut self, battlefield: FloatRect) -> Vec<SpawnPoint> {
        let mut due = Vec::new();
        while let Some(point) = self.points.last() {
            if point.y <= battlefield.top {
                break;
            }
            due.extend(self.points.pop());
        }
        due
    }
}

/// Spawn due enemies into `layer`, facing down the screen. Returns the ids
/// of the new enemies.
pub fn run(
    graph: &mut SceneGraph,
    layer: NodeId,
    schedule: &mut EnemySchedule,
    battlefield: FloatRect,
    game: &GameContext,
) -> Vec<NodeId> {
    schedule
        .take_due(battlefield)
        .into_iter()
        .map(|point| {
            let enemy = Animal::new(point.kind, game);
            let id = spawn_animal(graph, layer, enemy, Vec2::new(point.x, point.y), 180.0);
            log::debug!("spawned {:?} {id:?} at ({}, {})", point.kind, point.x, point.y);
            id
        })
        .collect()
}
