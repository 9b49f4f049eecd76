//! Collectable power-ups dropped by destroyed enemies.

use glam::Vec2;

use quackfront_core::enums::{PickupKind, TextureId};
use quackfront_core::tables::PickupEffect;
use quackfront_core::types::{FloatRect, Transform};

use crate::context::GameContext;
use crate::nodes::animal::Animal;
use crate::nodes::entity::EntityCore;
use crate::render::Visual;

#[derive(Debug)]
pub struct Pickup {
    kind: PickupKind,
    entity: EntityCore,
    effect: PickupEffect,
    texture: TextureId,
    sprite_size: Vec2,
}

impl Pickup {
    pub fn new(kind: PickupKind, game: &GameContext) -> Self {
        let data = game.tables.pickup(kind);
        Self {
            kind,
            entity: EntityCore::new(1),
            effect: data.effect,
            texture: data.texture,
            sprite_size: game.textures.size_of(data.texture),
        }
    }

    pub fn kind(&self) -> PickupKind {
        self.kind
    }

    pub fn effect(&self) -> PickupEffect {
        self.effect
    }

    /// Grant this pickup's effect to `animal`.
    pub fn apply(&self, animal: &mut Animal) {
        log::debug!("{:?} applied to {:?}", self.kind, animal.kind());
        animal.apply_pickup(self.effect);
    }

    pub fn entity(&self) -> &EntityCore {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut EntityCore {
        &mut self.entity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.entity.set_velocity(velocity);
    }

    pub fn destroy(&mut self) {
        self.entity.destroy();
    }

    pub fn is_destroyed(&self) -> bool {
        self.entity.is_destroyed()
    }

    pub fn local_bounds(&self) -> FloatRect {
        FloatRect::centered(Vec2::ZERO, self.sprite_size)
    }

    pub fn visual(&self) -> Visual {
        Visual::Sprite {
            texture: self.texture,
            rect: self.local_bounds(),
        }
    }

    pub(crate) fn update(&mut self, transform: &mut Transform, dt: f32) {
        self.entity.integrate(transform, dt);
    }
}
