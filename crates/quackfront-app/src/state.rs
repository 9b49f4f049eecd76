//! Host state shared between the caller and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use quackfront_core::config::WorldConfig;
use quackfront_core::input::InputEvent;
use quackfront_core::state::WorldSnapshot;
use quackfront_core::tables::DataTables;

use crate::game_loop;

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A key event to forward to the player's input bindings.
    Input(InputEvent),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handle to a running game loop.
///
/// The sender is `None` until `start` is called. The latest snapshot is
/// shared with the loop thread, which replaces it after every tick.
#[derive(Default)]
pub struct Session {
    command_tx: Option<mpsc::Sender<GameLoopCommand>>,
    latest_snapshot: Arc<Mutex<Option<WorldSnapshot>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.command_tx.is_some()
    }

    /// Spawn the game loop. Fails if one is already running.
    pub fn start(&mut self, config: WorldConfig, tables: DataTables) -> Result<(), String> {
        if self.is_running() {
            return Err("Simulation already running".into());
        }
        let tx = game_loop::spawn_game_loop(config, tables, Arc::clone(&self.latest_snapshot));
        self.command_tx = Some(tx);
        Ok(())
    }

    pub fn send_input(&self, event: InputEvent) -> Result<(), String> {
        self.send(GameLoopCommand::Input(event))
    }

    /// Ask the loop to stop. The session can be started again afterwards.
    pub fn shutdown(&mut self) -> Result<(), String> {
        let result = self.send(GameLoopCommand::Shutdown);
        self.command_tx = None;
        result
    }

    fn send(&self, command: GameLoopCommand) -> Result<(), String> {
        match self.command_tx.as_ref() {
            Some(tx) => tx
                .send(command)
                .map_err(|e| format!("Failed to send command: {}", e)),
            None => Err("Simulation not started".into()),
        }
    }

    /// Latest published snapshot, if the loop has ticked at least once.
    pub fn snapshot(&self) -> Result<Option<WorldSnapshot>, String> {
        let lock = self.latest_snapshot.lock().map_err(|e| e.to_string())?;
        Ok(lock.clone())
    }
}
