//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Animal subtype. Indexes the animal table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnimalKind {
    /// The player's duck.
    Duck,
    /// Stationary enemy that fires lasers downward.
    Frog,
}

impl AnimalKind {
    pub const ALL: [AnimalKind; 2] = [AnimalKind::Duck, AnimalKind::Frog];
}

/// Projectile subtype. Indexes the projectile table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProjectileKind {
    AlliedLaser,
    EnemyLaser,
    /// Guided missile, homes in on the nearest enemy.
    Quack,
}

impl ProjectileKind {
    pub const ALL: [ProjectileKind; 3] = [
        ProjectileKind::AlliedLaser,
        ProjectileKind::EnemyLaser,
        ProjectileKind::Quack,
    ];
}

/// Pickup subtype. Indexes the pickup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PickupKind {
    HealthRefill,
    QuackRefill,
    FireSpread,
    FireRate,
}

impl PickupKind {
    pub const ALL: [PickupKind; 4] = [
        PickupKind::HealthRefill,
        PickupKind::QuackRefill,
        PickupKind::FireSpread,
        PickupKind::FireRate,
    ];
}

/// Texture identifiers understood by the resource collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TextureId {
    Duck,
    Duckling,
    Frog,
    LaserBeam,
    Quack,
    HealthRefill,
    QuackRefill,
    FireSpread,
    FireRate,
    Water,
    TitleScreen,
}

impl TextureId {
    pub const ALL: [TextureId; 11] = [
        TextureId::Duck,
        TextureId::Duckling,
        TextureId::Frog,
        TextureId::LaserBeam,
        TextureId::Quack,
        TextureId::HealthRefill,
        TextureId::QuackRefill,
        TextureId::FireSpread,
        TextureId::FireRate,
        TextureId::Water,
        TextureId::TitleScreen,
    ];
}

/// Font identifiers understood by the resource collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FontId {
    Main,
}

/// Scene layers directly under the root, drawn in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Background,
    Air,
}

impl Layer {
    pub const ALL: [Layer; 2] = [Layer::Background, Layer::Air];
}

/// Outcome of the current mission as seen by the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionStatus {
    #[default]
    Running,
    Success,
    Failure,
}
