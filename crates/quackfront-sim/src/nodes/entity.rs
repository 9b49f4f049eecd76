//! State shared by every entity variant: hit points, velocity, destruction.

use glam::Vec2;

use quackfront_core::types::Transform;

#[derive(Debug, Clone, PartialEq)]
pub struct EntityCore {
    /// May go negative; only ever surfaced as `is_destroyed`.
    hitpoints: i32,
    velocity: Vec2,
    destroyed: bool,
}

impl EntityCore {
    pub fn new(hitpoints: i32) -> Self {
        Self {
            hitpoints,
            velocity: Vec2::ZERO,
            destroyed: false,
        }
    }

    pub fn hitpoints(&self) -> i32 {
        self.hitpoints
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn accelerate(&mut self, delta: Vec2) {
        self.velocity += delta;
    }

    /// Restore hit points. A destroyed entity stays destroyed.
    pub fn repair(&mut self, points: i32) {
        if !self.is_destroyed() {
            self.hitpoints += points;
        }
    }

    pub fn damage(&mut self, points: i32) {
        self.hitpoints -= points;
    }

    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed || self.hitpoints <= 0
    }

    /// Advance the local position by velocity.
    pub fn integrate(&self, transform: &mut Transform, dt: f32) {
        transform.translate(self.velocity * dt);
    }
}
