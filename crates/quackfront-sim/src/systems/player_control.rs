//! Player velocity and position corrections applied around the drain and
//! update passes.

use glam::Vec2;

use quackfront_core::types::FloatRect;

use crate::graph::{NodeId, SceneGraph};
use crate::nodes::Animal;

/// Reset the player's velocity to the downward bias that cancels the scroll.
/// Input commands drained afterwards accelerate from there.
pub fn reset_velocity(graph: &mut SceneGraph, player: NodeId, scroll_bias: f32) {
    if let Some(animal) = graph.get_mut::<Animal>(player) {
        animal.set_velocity(Vec2::new(0.0, scroll_bias));
    }
}

/// Equalize diagonal speed, then add the scroll velocity.
pub fn adapt_velocity(graph: &mut SceneGraph, player: NodeId, scroll_speed: f32) {
    let Some(animal) = graph.get_mut::<Animal>(player) else {
        return;
    };
    let velocity = animal.velocity();
    if velocity.x != 0.0 && velocity.y != 0.0 {
        animal.set_velocity(velocity / std::f32::consts::SQRT_2);
    }
    animal.accelerate(Vec2::new(0.0, scroll_speed));
}

/// Keep the player inside `view`, at least `border` units from every edge.
pub fn adapt_position(graph: &mut SceneGraph, player: NodeId, view: FloatRect, border: f32) {
    let Some(node) = graph.node_mut(player) else {
        return;
    };
    let position = &mut node.transform.position;
    position.x = position.x.max(view.left + border).min(view.right() - border);
    position.y = position.y.max(view.top + border).min(view.bottom() - border);
}
