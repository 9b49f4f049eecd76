//! Static gameplay tables, keyed by entity subtype.
//!
//! Tables are built once during initialization (`DataTables::standard` or
//! `DataTables::from_json_str`) and handed to the simulation as read-only
//! data. Nothing here is a global.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::enums::{AnimalKind, PickupKind, ProjectileKind, TextureId};

/// One leg of a scripted movement pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    /// Heading in degrees, relative to straight down.
    pub angle: f32,
    /// Distance travelled along this heading before switching to the next leg.
    pub distance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalData {
    pub hitpoints: i32,
    /// Movement speed multiplier (world units per second per unit input).
    pub speed: f32,
    pub texture: TextureId,
    /// Seconds between shots. Zero means the animal never fires.
    pub fire_interval_secs: f32,
    /// Player-side animal. Allied animals collect pickups and fire upward.
    #[serde(default)]
    pub allied: bool,
    #[serde(default)]
    pub directions: Vec<Direction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileData {
    pub damage: i32,
    pub speed: f32,
    pub texture: TextureId,
    /// Guided projectiles are steered toward the nearest enemy every frame.
    #[serde(default)]
    pub guided: bool,
}

/// What a pickup does to the animal that collects it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PickupEffect {
    Repair { hitpoints: i32 },
    CollectQuacks { count: u32 },
    IncreaseSpread,
    IncreaseFireRate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupData {
    pub effect: PickupEffect,
    pub texture: TextureId,
}

/// All gameplay tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTables {
    pub animals: BTreeMap<AnimalKind, AnimalData>,
    pub projectiles: BTreeMap<ProjectileKind, ProjectileData>,
    pub pickups: BTreeMap<PickupKind, PickupData>,
}

impl Default for DataTables {
    fn default() -> Self {
        Self::standard()
    }
}

impl DataTables {
    /// The stock tables shipped with the game.
    pub fn standard() -> Self {
        let mut animals = BTreeMap::new();
        animals.insert(
            AnimalKind::Duck,
            AnimalData {
                hitpoints: 100,
                speed: 1.0,
                texture: TextureId::Duck,
                fire_interval_secs: 1.0,
                allied: true,
                directions: Vec::new(),
            },
        );
        animals.insert(
            AnimalKind::Frog,
            AnimalData {
                hitpoints: 40,
                speed: 0.0,
                texture: TextureId::Frog,
                fire_interval_secs: 2.0,
                allied: false,
                directions: Vec::new(),
            },
        );

        let mut projectiles = BTreeMap::new();
        projectiles.insert(
            ProjectileKind::AlliedLaser,
            ProjectileData {
                damage: 10,
                speed: 300.0,
                texture: TextureId::LaserBeam,
                guided: false,
            },
        );
        projectiles.insert(
            ProjectileKind::EnemyLaser,
            ProjectileData {
                damage: 10,
                speed: 300.0,
                texture: TextureId::LaserBeam,
                guided: false,
            },
        );
        projectiles.insert(
            ProjectileKind::Quack,
            ProjectileData {
                damage: 200,
                speed: 150.0,
                texture: TextureId::Quack,
                guided: true,
            },
        );

        let mut pickups = BTreeMap::new();
        pickups.insert(
            PickupKind::HealthRefill,
            PickupData {
                effect: PickupEffect::Repair { hitpoints: 25 },
                texture: TextureId::HealthRefill,
            },
        );
        pickups.insert(
            PickupKind::QuackRefill,
            PickupData {
                effect: PickupEffect::CollectQuacks { count: 3 },
                texture: TextureId::QuackRefill,
            },
        );
        pickups.insert(
            PickupKind::FireSpread,
            PickupData {
                effect: PickupEffect::IncreaseSpread,
                texture: TextureId::FireSpread,
            },
        );
        pickups.insert(
            PickupKind::FireRate,
            PickupData {
                effect: PickupEffect::IncreaseFireRate,
                texture: TextureId::FireRate,
            },
        );

        Self {
            animals,
            projectiles,
            pickups,
        }
    }

    /// Parse tables from JSON and check that every subtype has an entry.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tables: DataTables = serde_json::from_str(json)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Every subtype must have a row; lookups below rely on it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in AnimalKind::ALL {
            if !self.animals.contains_key(&kind) {
                return Err(ConfigError::MissingTableEntry(format!("{kind:?}")));
            }
        }
        for kind in ProjectileKind::ALL {
            if !self.projectiles.contains_key(&kind) {
                return Err(ConfigError::MissingTableEntry(format!("{kind:?}")));
            }
        }
        for kind in PickupKind::ALL {
            if !self.pickups.contains_key(&kind) {
                return Err(ConfigError::MissingTableEntry(format!("{kind:?}")));
            }
        }
        Ok(())
    }

    pub fn animal(&self, kind: AnimalKind) -> &AnimalData {
        &self.animals[&kind]
    }

    pub fn projectile(&self, kind: ProjectileKind) -> &ProjectileData {
        &self.projectiles[&kind]
    }

    pub fn pickup(&self, kind: PickupKind) -> &PickupData {
        &self.pickups[&kind]
    }

    /// Every texture referenced by any table row.
    pub fn referenced_textures(&self) -> Vec<TextureId> {
        let mut ids: Vec<TextureId> = self
            .animals
            .values()
            .map(|a| a.texture)
            .chain(self.projectiles.values().map(|p| p.texture))
            .chain(self.pickups.values().map(|p| p.texture))
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}
