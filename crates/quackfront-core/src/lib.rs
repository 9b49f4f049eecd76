//! Core types and definitions for the QUACKFRONT arcade simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! categories, geometry, identifiers, gameplay tables, resource holders,
//! configuration, input vocabulary, and state snapshots.
//! It has no dependency on any runtime, window, or rendering framework.

pub mod category;
pub mod config;
pub mod constants;
pub mod enums;
pub mod input;
pub mod resources;
pub mod state;
pub mod tables;
pub mod types;
