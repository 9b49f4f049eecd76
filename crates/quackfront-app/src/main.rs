//! Headless QUACKFRONT runner.
//!
//! Usage: `quackfront [world.json] [tables.json]`
//!
//! Reads input events from stdin, one JSON object per line, e.g.
//! `{"type":"KeyPressed","key":"Q"}`. On end of input (or when the mission
//! ends) prints the final snapshot as JSON.

use std::io::BufRead;
use std::path::Path;
use std::time::Duration;

use quackfront_app::state::Session;
use quackfront_core::config::WorldConfig;
use quackfront_core::input::InputEvent;
use quackfront_core::tables::DataTables;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match args.first() {
        Some(path) => WorldConfig::load(Path::new(path)),
        None => Ok(WorldConfig::default()),
    };
    let tables = match args.get(1) {
        Some(path) => DataTables::load(Path::new(path)),
        None => Ok(DataTables::standard()),
    };
    let (config, tables) = match (config, tables) {
        (Ok(config), Ok(tables)) => (config, tables),
        (Err(err), _) | (_, Err(err)) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    let mut session = Session::new();
    if let Err(err) = session.start(config, tables) {
        log::error!("{err}");
        std::process::exit(1);
    }

    for line in std::io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<InputEvent>(&line) {
            Ok(event) => {
                if session.send_input(event).is_err() {
                    // The loop has stopped: the mission is over.
                    break;
                }
            }
            Err(err) => log::warn!("ignoring input {line:?}: {err}"),
        }
    }

    // Let the last inputs land before stopping.
    std::thread::sleep(Duration::from_millis(50));
    if let Err(err) = session.shutdown() {
        log::debug!("game loop already stopped: {err}");
    }

    match session.snapshot() {
        Ok(Some(snapshot)) => match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("cannot serialize snapshot: {err}"),
        },
        Ok(None) => log::warn!("no frame was simulated"),
        Err(err) => log::error!("{err}"),
    }
}
