//! Snapshot stage: reads the graph and builds a `WorldSnapshot`.
//!
//! Read-only; never modifies the graph.

use quackfront_core::enums::MissionStatus;
use quackfront_core::state::{EntityView, PlayerView, WorldSnapshot};
use quackfront_core::types::FloatRect;

use crate::graph::{NodeId, SceneGraph};
use crate::nodes::Animal;

pub fn build_snapshot(
    graph: &SceneGraph,
    frame: u64,
    view: FloatRect,
    mission: MissionStatus,
    player: NodeId,
    pending_spawns: usize,
) -> WorldSnapshot {
    WorldSnapshot {
        frame,
        view,
        mission,
        player: build_player(graph, player),
        entities: build_entities(graph),
        pending_spawns,
    }
}

fn build_player(graph: &SceneGraph, player: NodeId) -> Option<PlayerView> {
    let animal = graph.get::<Animal>(player)?;
    Some(PlayerView {
        position: graph.world_position(player),
        hitpoints: animal.hitpoints(),
        quacks: animal.quacks(),
        fire_rate_level: animal.fire_rate_level(),
        spread_level: animal.spread_level(),
    })
}

/// Every entity, in traversal order.
fn build_entities(graph: &SceneGraph) -> Vec<EntityView> {
    graph
        .descendants(graph.root())
        .into_iter()
        .filter_map(|id| {
            let node = graph.node(id)?;
            let entity = node.kind.entity()?;
            Some(EntityView {
                category: node.category(),
                position: graph.world_position(id),
                velocity: entity.velocity(),
                hitpoints: entity.hitpoints(),
                destroyed: entity.is_destroyed(),
            })
        })
        .collect()
}
