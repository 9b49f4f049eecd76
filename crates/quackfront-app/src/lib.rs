//! QUACKFRONT headless host.
//!
//! Runs the simulation on its own thread at a fixed tick rate, feeds it
//! input events over a channel, and publishes the latest snapshot for
//! whoever is presenting the game.

pub mod game_loop;
pub mod state;

pub use quackfront_core as core;
