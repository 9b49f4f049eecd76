//! Simulation constants and tuning defaults.

/// Host tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- View & world ---

pub const VIEW_WIDTH: f32 = 1024.0;

pub const VIEW_HEIGHT: f32 = 768.0;

/// Total scrollable height of a level.
pub const WORLD_HEIGHT: f32 = 3000.0;

/// Camera scroll speed (world units per second). Negative scrolls up.
pub const SCROLL_SPEED: f32 = -30.0;

/// Height of the band above the view included in the battlefield.
pub const BATTLEFIELD_MARGIN: f32 = 100.0;

/// Minimum distance the player keeps from every view edge.
pub const BORDER_DISTANCE: f32 = 40.0;

// --- Player ---

pub const PLAYER_SPEED: f32 = 200.0;

/// Baseline downward player velocity, equal and opposite to the scroll.
pub const PLAYER_SCROLL_BIAS: f32 = 30.0;

/// Damage taken by the player per frame of contact with an enemy.
pub const CONTACT_DAMAGE: i32 = 1;

// --- Animals ---

pub const MAX_FIRE_RATE_LEVEL: u32 = 10;

pub const MAX_SPREAD_LEVEL: u32 = 3;

/// Guided missiles every animal starts with.
pub const STARTING_QUACKS: u32 = 2;

/// Enemies drop a pickup with probability 1 / N on destruction.
pub const PICKUP_DROP_CHANCE: u32 = 3;

/// Local offset of an animal's health display.
pub const HEALTH_DISPLAY_OFFSET: f32 = 50.0;

/// Local offset of the player's missile ammo display.
pub const QUACK_DISPLAY_OFFSET: f32 = 30.0;

// --- Projectiles & pickups ---

/// How strongly a guided missile turns toward its heading each second.
pub const GUIDED_APPROACH_RATE: f32 = 200.0;

/// Drift velocity of dropped pickups.
pub const PICKUP_DRIFT_SPEED: f32 = 1.0;
