//! World state snapshot — the visible state published after each frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::enums::MissionStatus;
use crate::types::FloatRect;

/// Complete world state after a frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub frame: u64,
    pub view: FloatRect,
    pub mission: MissionStatus,
    pub player: Option<PlayerView>,
    /// Every entity in the scene, in traversal order.
    pub entities: Vec<EntityView>,
    /// Scheduled enemies that have not entered the battlefield yet.
    pub pending_spawns: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Vec2,
    pub hitpoints: i32,
    pub quacks: u32,
    pub fire_rate_level: u32,
    pub spread_level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub category: Category,
    pub position: Vec2,
    pub velocity: Vec2,
    pub hitpoints: i32,
    pub destroyed: bool,
}
