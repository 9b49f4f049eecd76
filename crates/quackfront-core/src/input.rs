//! Input vocabulary shared between the host and the simulation.
//!
//! The host translates raw device input into these values; the simulation's
//! `Player` turns them into commands.

use serde::{Deserialize, Serialize};

/// Keyboard keys the game can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Q,
    W,
    Space,
    Escape,
}

/// Player actions that keys map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerAction {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Fire,
    LaunchQuack,
}

impl PlayerAction {
    pub const ALL: [PlayerAction; 6] = [
        PlayerAction::MoveLeft,
        PlayerAction::MoveRight,
        PlayerAction::MoveUp,
        PlayerAction::MoveDown,
        PlayerAction::Fire,
        PlayerAction::LaunchQuack,
    ];

    /// Realtime actions repeat every frame while their key is held;
    /// the rest fire once per key press.
    pub fn is_realtime(self) -> bool {
        match self {
            PlayerAction::MoveLeft
            | PlayerAction::MoveRight
            | PlayerAction::MoveUp
            | PlayerAction::MoveDown
            | PlayerAction::Fire => true,
            PlayerAction::LaunchQuack => false,
        }
    }
}

/// Discrete input events delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputEvent {
    KeyPressed { key: Key },
    KeyReleased { key: Key },
}
