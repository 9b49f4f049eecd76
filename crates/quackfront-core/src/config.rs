//! World configuration and configuration errors.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::AnimalKind;

/// A scheduled enemy, positioned relative to the player's spawn point.
/// Positive `y` is further ahead (up the screen) of the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPointConfig {
    pub kind: AnimalKind,
    pub x: f32,
    pub y: f32,
}

/// Configuration for starting a new world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// RNG seed for determinism. Same seed and input = same simulation.
    pub seed: u64,
    pub view_width: f32,
    pub view_height: f32,
    pub world_height: f32,
    /// Camera scroll rate in world units per second (negative scrolls up).
    pub scroll_speed: f32,
    /// Extra area above the view where enemies spawn and entities survive.
    pub battlefield_margin: f32,
    /// Minimum distance between the player and the view edges.
    pub border_distance: f32,
    /// Damage dealt to the player by touching an enemy.
    pub contact_damage: i32,
    /// Player movement speed per unit input.
    pub player_speed: f32,
    /// Downward velocity the player is reset to each frame, cancelling the
    /// camera scroll so an idle player holds its place on screen.
    pub player_scroll_bias: f32,
    /// Enemies drop a pickup with probability 1 / `pickup_drop_chance`.
    pub pickup_drop_chance: u32,
    pub spawn_points: Vec<SpawnPointConfig>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            view_width: VIEW_WIDTH,
            view_height: VIEW_HEIGHT,
            world_height: WORLD_HEIGHT,
            scroll_speed: SCROLL_SPEED,
            battlefield_margin: BATTLEFIELD_MARGIN,
            border_distance: BORDER_DISTANCE,
            contact_damage: CONTACT_DAMAGE,
            player_speed: PLAYER_SPEED,
            player_scroll_bias: PLAYER_SCROLL_BIAS,
            pickup_drop_chance: PICKUP_DROP_CHANCE,
            spawn_points: default_spawn_points(),
        }
    }
}

impl WorldConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

/// The stock enemy line-up.
pub fn default_spawn_points() -> Vec<SpawnPointConfig> {
    [
        (-300.0, 100.0),
        (-100.0, 100.0),
        (-100.0, 200.0),
        (-300.0, 300.0),
        (100.0, 500.0),
        (-100.0, 800.0),
        (70.0, 1300.0),
        (270.0, 2100.0),
    ]
    .into_iter()
    .map(|(x, y)| SpawnPointConfig {
        kind: AnimalKind::Frog,
        x,
        y,
    })
    .collect()
}

/// Configuration and table loading errors.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Missing table entry for {0}")]
    MissingTableEntry(String),
}
