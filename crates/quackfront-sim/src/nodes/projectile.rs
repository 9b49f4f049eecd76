//! Lasers and guided quacks.

use glam::Vec2;

use quackfront_core::category::Category;
use quackfront_core::constants::GUIDED_APPROACH_RATE;
use quackfront_core::enums::{ProjectileKind, TextureId};
use quackfront_core::types::{angle_degrees, unit_vector, FloatRect, Transform};

use crate::context::GameContext;
use crate::nodes::entity::EntityCore;
use crate::render::Visual;

#[derive(Debug)]
pub struct Projectile {
    kind: ProjectileKind,
    entity: EntityCore,
    damage: i32,
    max_speed: f32,
    guided: bool,
    texture: TextureId,
    sprite_size: Vec2,
    /// Unit heading toward the current target. Zero until guidance assigns one.
    target_direction: Vec2,
}

impl Projectile {
    /// Projectiles start with one hit point: any collision finishes them.
    pub fn new(kind: ProjectileKind, game: &GameContext) -> Self {
        let data = game.tables.projectile(kind);
        Self {
            kind,
            entity: EntityCore::new(1),
            damage: data.damage,
            max_speed: data.speed,
            guided: data.guided,
            texture: data.texture,
            sprite_size: game.textures.size_of(data.texture),
            target_direction: Vec2::ZERO,
        }
    }

    pub fn kind(&self) -> ProjectileKind {
        self.kind
    }

    pub fn category(&self) -> Category {
        match self.kind {
            ProjectileKind::EnemyLaser => Category::ENEMY_PROJECTILE,
            ProjectileKind::AlliedLaser | ProjectileKind::Quack => Category::ALLIED_PROJECTILE,
        }
    }

    pub fn entity(&self) -> &EntityCore {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut EntityCore {
        &mut self.entity
    }

    pub fn velocity(&self) -> Vec2 {
        self.entity.velocity()
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

    pub fn is_guided(&self) -> bool {
        self.guided
    }

    /// Steer toward `position`, given this projectile's own world position.
    /// Ignored by unguided projectiles.
    pub fn guide_towards(&mut self, own_position: Vec2, position: Vec2) {
        if self.guided {
            self.target_direction = unit_vector(position - own_position);
        }
    }

    pub fn target_direction(&self) -> Vec2 {
        self.target_direction
    }

    pub fn damage(&self) -> i32 {
        self.damage
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
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
        if self.guided {
            let steering = GUIDED_APPROACH_RATE * dt * self.target_direction;
            let velocity = unit_vector(steering + self.entity.velocity()) * self.max_speed;
            self.entity.set_velocity(velocity);
            // Sprite points up; angles are measured from +x.
            transform.rotation = angle_degrees(velocity) + 90.0;
        }
        self.entity.integrate(transform, dt);
    }
}
