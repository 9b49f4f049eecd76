//! Cleanup stage: destroys entities that left the battlefield.

use quackfront_core::category::Category;
use quackfront_core::types::FloatRect;

use crate::command::Command;

/// Command that destroys every projectile or enemy whose bounds no longer
/// touch `battlefield`. Pickups and the player are never culled here.
pub fn out_of_battlefield_command(battlefield: FloatRect) -> Command {
    Command::new(
        Category::PROJECTILE | Category::ENEMY_ANIMAL,
        move |graph, node, _dt| {
            if battlefield.intersects(&graph.bounding_rect(node)) {
                return;
            }
            if let Some(entity) = graph.entity_mut(node) {
                entity.destroy();
            }
        },
    )
}
