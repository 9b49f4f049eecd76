//! Runtime core for QUACKFRONT.
//!
//! Owns the scene graph, routes deferred commands through it, detects and
//! resolves collisions, and drives the fixed per-frame sequence in `World`.
//! Completely headless: rendering and input are reached through small
//! traits and value types, enabling deterministic testing.

pub mod command;
pub mod context;
pub mod graph;
pub mod nodes;
pub mod player;
pub mod render;
pub mod systems;
pub mod world;
pub mod world_setup;

pub use command::{Command, CommandQueue};
pub use context::{ContextError, GameContext};
pub use graph::{NodeId, SceneGraph, SceneNode};
pub use quackfront_core as core;
pub use world::World;

#[cfg(test)]
mod tests;
