//! Frame stages that operate on the scene graph.
//!
//! Stages are free functions over the graph plus whatever small piece of
//! world state they need; `World::update` calls them in a fixed order.
//! They never hold state between frames.

pub mod cleanup;
pub mod collision;
pub mod guidance;
pub mod player_control;
pub mod snapshot;
pub mod spawner;
