//! Game loop thread: runs the world at `TICK_RATE` and publishes snapshots.
//!
//! The world is created inside this thread; its shared tables and resource
//! handles are reference counted and never leave it. Input arrives via an
//! `mpsc` channel and the latest snapshot is stored in shared state for
//! polling.

use std::collections::BTreeSet;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use quackfront_core::config::WorldConfig;
use quackfront_core::constants::{DT, TICK_RATE};
use quackfront_core::enums::MissionStatus;
use quackfront_core::input::{InputEvent, Key};
use quackfront_core::state::WorldSnapshot;
use quackfront_core::tables::DataTables;
use quackfront_sim::player::Player;
use quackfront_sim::{GameContext, World};

use crate::state::GameLoopCommand;

/// Duration of one tick.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender.
pub fn spawn_game_loop(
    config: WorldConfig,
    tables: DataTables,
    latest_snapshot: Arc<Mutex<Option<WorldSnapshot>>>,
) -> mpsc::Sender<GameLoopCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    std::thread::Builder::new()
        .name("quackfront-game-loop".into())
        .spawn(move || {
            run_game_loop(config, tables, cmd_rx, &latest_snapshot);
        })
        .expect("Failed to spawn game loop thread");

    cmd_tx
}

/// The game loop. Runs until Shutdown, channel disconnect, or the end of
/// the mission.
fn run_game_loop(
    config: WorldConfig,
    tables: DataTables,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<WorldSnapshot>>,
) {
    let game = match GameContext::headless(tables) {
        Ok(game) => game,
        Err(err) => {
            log::error!("cannot start world: {err}");
            return;
        }
    };
    let mut world = World::new(config, game);
    let mut player = Player::new(world.config().player_speed);
    let mut held = BTreeSet::new();
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Input(event)) => {
                    track_held_keys(&mut held, &event);
                    player.handle_event(&event, world.command_queue_mut());
                }
                Ok(GameLoopCommand::Shutdown) => return,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance one frame
        let snapshot = tick(&mut world, &mut player, &held);
        let finished = snapshot.mission != MissionStatus::Running;

        // 3. Store latest snapshot for polling
        match latest_snapshot.lock() {
            Ok(mut lock) => *lock = Some(snapshot),
            Err(_) => log::warn!("snapshot lock poisoned, dropping frame {}", world.frame()),
        }
        if finished {
            return;
        }

        // 4. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind; reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }
}

/// Feed held keys to the player, advance the world one frame, and record
/// mission status changes.
fn tick(world: &mut World, player: &mut Player, held: &BTreeSet<Key>) -> WorldSnapshot {
    player.handle_realtime_input(|key| held.contains(&key), world.command_queue_mut());
    world.update(DT);

    let status = world.mission_status();
    if status != player.mission_status() {
        log::info!(
            "frame {}: mission {:?} -> {:?}",
            world.frame(),
            player.mission_status(),
            status
        );
        player.set_mission_status(status);
    }
    world.snapshot()
}

fn track_held_keys(held: &mut BTreeSet<Key>, event: &InputEvent) {
    match *event {
        InputEvent::KeyPressed { key } => {
            held.insert(key);
        }
        InputEvent::KeyReleased { key } => {
            held.remove(&key);
        }
    }
}
