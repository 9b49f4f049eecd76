//! Input collaborator: turns key input into commands for the player's animal.

use std::collections::BTreeMap;

use glam::Vec2;

use quackfront_core::category::Category;
use quackfront_core::enums::MissionStatus;
use quackfront_core::input::{InputEvent, Key, PlayerAction};

use crate::command::{Command, CommandQueue};
use crate::nodes::Animal;

#[derive(Debug)]
pub struct Player {
    key_binding: BTreeMap<Key, PlayerAction>,
    action_binding: BTreeMap<PlayerAction, Command>,
    mission_status: MissionStatus,
}

impl Player {
    /// Default bindings: arrows move, Q fires, W launches a quack.
    pub fn new(player_speed: f32) -> Self {
        let key_binding = BTreeMap::from([
            (Key::Left, PlayerAction::MoveLeft),
            (Key::Right, PlayerAction::MoveRight),
            (Key::Up, PlayerAction::MoveUp),
            (Key::Down, PlayerAction::MoveDown),
            (Key::Q, PlayerAction::Fire),
            (Key::W, PlayerAction::LaunchQuack),
        ]);
        let action_binding = PlayerAction::ALL
            .into_iter()
            .map(|action| (action, action_command(action, player_speed)))
            .collect();

        Self {
            key_binding,
            action_binding,
            mission_status: MissionStatus::Running,
        }
    }

    /// One-shot actions fire on key press.
    pub fn handle_event(&self, event: &InputEvent, commands: &mut CommandQueue) {
        let InputEvent::KeyPressed { key } = event else {
            return;
        };
        if let Some(&action) = self.key_binding.get(key) {
            if !action.is_realtime() {
                self.push_action(action, commands);
            }
        }
    }

    /// Realtime actions repeat every frame their key is held.
    pub fn handle_realtime_input(&self, is_pressed: impl Fn(Key) -> bool, commands: &mut CommandQueue) {
        for (&key, &action) in &self.key_binding {
            if action.is_realtime() && is_pressed(key) {
                self.push_action(action, commands);
            }
        }
    }

    fn push_action(&self, action: PlayerAction, commands: &mut CommandQueue) {
        if let Some(command) = self.action_binding.get(&action) {
            commands.push(command.clone());
        }
    }

    /// Bind `key` to `action`, dropping any key previously bound to it.
    pub fn assign_key(&mut self, action: PlayerAction, key: Key) {
        self.key_binding.retain(|_, bound| *bound != action);
        self.key_binding.insert(key, action);
    }

    pub fn assigned_key(&self, action: PlayerAction) -> Option<Key> {
        self.key_binding
            .iter()
            .find(|(_, bound)| **bound == action)
            .map(|(&key, _)| key)
    }

    /// Record the status the host last observed from `World::mission_status`.
    pub fn set_mission_status(&mut self, status: MissionStatus) {
        self.mission_status = status;
    }

    /// Last status recorded by the host. Lags the world until the host
    /// records the change, so comparing the two detects transitions.
    pub fn mission_status(&self) -> MissionStatus {
        self.mission_status
    }
}

fn action_command(action: PlayerAction, player_speed: f32) -> Command {
    let category = Category::PLAYER_ANIMAL;
    match action {
        PlayerAction::MoveLeft => mover(Vec2::new(-player_speed, 0.0)),
        PlayerAction::MoveRight => mover(Vec2::new(player_speed, 0.0)),
        PlayerAction::MoveUp => mover(Vec2::new(0.0, -player_speed)),
        PlayerAction::MoveDown => mover(Vec2::new(0.0, player_speed)),
        PlayerAction::Fire => Command::derived::<Animal>(category, |animal, _| animal.fire()),
        PlayerAction::LaunchQuack => {
            Command::derived::<Animal>(category, |animal, _| animal.launch_quack())
        }
    }
}

fn mover(velocity: Vec2) -> Command {
    Command::derived::<Animal>(Category::PLAYER_ANIMAL, move |animal, _| {
        let speed = animal.max_speed();
        animal.accelerate(velocity * speed);
    })
}
