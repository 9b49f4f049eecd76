//! Animals: the player's duck and the enemies it fights.

use glam::Vec2;
use rand::Rng;

use quackfront_core::category::Category;
use quackfront_core::constants::*;
use quackfront_core::enums::{AnimalKind, PickupKind, ProjectileKind, TextureId};
use quackfront_core::tables::{Direction, PickupEffect};
use quackfront_core::types::{FloatRect, Transform};

use crate::command::Command;
use crate::context::GameContext;
use crate::graph::{NodeId, SceneGraph, SceneNode, UpdateContext};
use crate::nodes::entity::EntityCore;
use crate::nodes::pickup::Pickup;
use crate::nodes::projectile::Projectile;
use crate::nodes::NodeKind;
use crate::render::Visual;

#[derive(Debug)]
pub struct Animal {
    kind: AnimalKind,
    entity: EntityCore,
    allied: bool,
    max_speed: f32,
    fire_interval: f32,
    texture: TextureId,
    sprite_size: Vec2,
    directions: Vec<Direction>,

    fire_countdown: f32,
    is_firing: bool,
    is_launching_quack: bool,
    marked_for_removal: bool,
    fire_rate_level: u32,
    spread_level: u32,
    quack_ammo: u32,

    travelled_distance: f32,
    direction_index: usize,
}

impl Animal {
    pub fn new(kind: AnimalKind, game: &GameContext) -> Self {
        let data = game.tables.animal(kind);
        Self {
            kind,
            entity: EntityCore::new(data.hitpoints),
            allied: data.allied,
            max_speed: data.speed,
            fire_interval: data.fire_interval_secs,
            texture: data.texture,
            sprite_size: game.textures.size_of(data.texture),
            directions: data.directions.clone(),
            fire_countdown: 0.0,
            is_firing: false,
            is_launching_quack: false,
            marked_for_removal: false,
            fire_rate_level: 1,
            spread_level: 1,
            quack_ammo: STARTING_QUACKS,
            travelled_distance: 0.0,
            direction_index: 0,
        }
    }

    pub fn kind(&self) -> AnimalKind {
        self.kind
    }

    /// Player-side animal.
    pub fn is_allied(&self) -> bool {
        self.allied
    }

    pub fn category(&self) -> Category {
        if self.allied {
            Category::PLAYER_ANIMAL
        } else {
            Category::ENEMY_ANIMAL
        }
    }

    pub fn entity(&self) -> &EntityCore {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut EntityCore {
        &mut self.entity
    }

    pub fn hitpoints(&self) -> i32 {
        self.entity.hitpoints()
    }

    pub fn velocity(&self) -> Vec2 {
        self.entity.velocity()
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.entity.set_velocity(velocity);
    }

    pub fn accelerate(&mut self, delta: Vec2) {
        self.entity.accelerate(delta);
    }

    pub fn damage(&mut self, points: i32) {
        self.entity.damage(points);
    }

    pub fn repair(&mut self, points: i32) {
        self.entity.repair(points);
    }

    pub fn destroy(&mut self) {
        self.entity.destroy();
    }

    pub fn is_destroyed(&self) -> bool {
        self.entity.is_destroyed()
    }

    /// Set on the first update after destruction.
    pub fn is_marked_for_removal(&self) -> bool {
        self.marked_for_removal
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn quacks(&self) -> u32 {
        self.quack_ammo
    }

    pub fn fire_rate_level(&self) -> u32 {
        self.fire_rate_level
    }

    pub fn spread_level(&self) -> u32 {
        self.spread_level
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

    /// Request a shot. Animals with no fire interval never shoot.
    pub fn fire(&mut self) {
        if self.fire_interval > 0.0 {
            self.is_firing = true;
        }
    }

    pub fn launch_quack(&mut self) {
        if self.quack_ammo > 0 {
            self.is_launching_quack = true;
            self.quack_ammo -= 1;
        }
    }

    pub fn increase_fire_rate(&mut self) {
        if self.fire_rate_level < MAX_FIRE_RATE_LEVEL {
            self.fire_rate_level += 1;
        }
    }

    pub fn increase_spread(&mut self) {
        if self.spread_level < MAX_SPREAD_LEVEL {
            self.spread_level += 1;
        }
    }

    pub fn collect_quacks(&mut self, count: u32) {
        self.quack_ammo += count;
    }

    pub fn apply_pickup(&mut self, effect: PickupEffect) {
        match effect {
            PickupEffect::Repair { hitpoints } => self.repair(hitpoints),
            PickupEffect::CollectQuacks { count } => self.collect_quacks(count),
            PickupEffect::IncreaseSpread => self.increase_spread(),
            PickupEffect::IncreaseFireRate => self.increase_fire_rate(),
        }
    }

    pub(crate) fn update(
        &mut self,
        id: NodeId,
        transform: &mut Transform,
        dt: f32,
        ctx: &mut UpdateContext<'_>,
    ) {
        // Destroyed: roll for a drop once, then wait one frame for the sweep.
        if self.is_destroyed() {
            if !self.marked_for_removal {
                self.check_pickup_drop(id, ctx);
                self.marked_for_removal = true;
            }
            return;
        }

        self.check_projectile_launch(id, dt, ctx);
        self.update_movement_pattern(dt);
        self.entity.integrate(transform, dt);
    }

    fn check_pickup_drop(&self, id: NodeId, ctx: &mut UpdateContext<'_>) {
        if self.allied || ctx.pickup_drop_chance == 0 {
            return;
        }
        if ctx.rng.gen_range(0..ctx.pickup_drop_chance) != 0 {
            return;
        }
        let kind = PickupKind::ALL[ctx.rng.gen_range(0..PickupKind::ALL.len())];
        log::debug!("{:?} {id:?} drops {kind:?}", self.kind);
        ctx.commands.push(drop_pickup_command(id, kind, ctx.game.clone()));
    }

    fn check_projectile_launch(&mut self, id: NodeId, dt: f32, ctx: &mut UpdateContext<'_>) {
        // Enemies try to fire all the time.
        if !self.allied {
            self.fire();
        }

        if self.is_firing && self.fire_countdown <= 0.0 {
            ctx.commands.push(fire_command(id, ctx.game.clone()));
            self.fire_countdown += self.fire_interval / (self.fire_rate_level as f32 + 1.0);
            self.is_firing = false;
        } else if self.fire_countdown > 0.0 {
            self.fire_countdown -= dt;
            self.is_firing = false;
        }

        if self.is_launching_quack {
            ctx.commands.push(quack_command(id, ctx.game.clone()));
            self.is_launching_quack = false;
        }
    }

    fn update_movement_pattern(&mut self, dt: f32) {
        if self.directions.is_empty() {
            return;
        }

        if self.travelled_distance > self.directions[self.direction_index].distance {
            self.direction_index = (self.direction_index + 1) % self.directions.len();
            self.travelled_distance = 0.0;
        }

        // Angles are measured from straight down.
        let radians = (self.directions[self.direction_index].angle + 90.0).to_radians();
        let heading = Vec2::new(radians.cos(), radians.sin());
        self.entity.set_velocity(heading * self.max_speed);
        self.travelled_distance += self.max_speed * dt;
    }
}

/// Where a shooter's projectiles start and which way they travel.
struct Launch {
    origin: Vec2,
    sprite_size: Vec2,
    /// -1 shoots up the screen (allied), +1 down (enemy).
    sign: f32,
    allied: bool,
    spread_level: u32,
}

impl Launch {
    /// `None` when the shooter is gone or destroyed by the time the command runs.
    fn from_shooter(graph: &SceneGraph, shooter: NodeId) -> Option<Self> {
        let animal = graph.get::<Animal>(shooter)?;
        if animal.is_destroyed() {
            return None;
        }
        Some(Self {
            origin: graph.world_position(shooter),
            sprite_size: animal.sprite_size,
            sign: if animal.allied { -1.0 } else { 1.0 },
            allied: animal.allied,
            spread_level: animal.spread_level,
        })
    }

    fn spawn(
        &self,
        graph: &mut SceneGraph,
        layer: NodeId,
        kind: ProjectileKind,
        offset: Vec2,
        game: &GameContext,
    ) -> NodeId {
        let mut projectile = Projectile::new(kind, game);
        let offset = offset * self.sprite_size;
        let velocity = Vec2::new(0.0, projectile.max_speed());
        projectile.set_velocity(velocity * self.sign);

        let node = SceneNode::new(NodeKind::Projectile(projectile))
            .with_position(self.origin + offset * self.sign);
        graph.attach(layer, node)
    }
}

/// Spawns lasers into the air layer according to the shooter's spread level.
fn fire_command(shooter: NodeId, game: GameContext) -> Command {
    Command::new(Category::SCENE_AIR_LAYER, move |graph, layer, _dt| {
        let Some(launch) = Launch::from_shooter(graph, shooter) else {
            return;
        };
        let kind = if launch.allied {
            ProjectileKind::AlliedLaser
        } else {
            ProjectileKind::EnemyLaser
        };
        let offsets: &[(f32, f32)] = match launch.spread_level {
            1 => &[(0.0, 0.5)],
            2 => &[(-0.33, 0.33), (0.33, 0.33)],
            _ => &[(-0.5, 0.33), (0.0, 0.5), (0.5, 0.33)],
        };
        for &(x, y) in offsets {
            launch.spawn(graph, layer, kind, Vec2::new(x, y), &game);
        }
    })
}

fn quack_command(shooter: NodeId, game: GameContext) -> Command {
    Command::new(Category::SCENE_AIR_LAYER, move |graph, layer, _dt| {
        if let Some(launch) = Launch::from_shooter(graph, shooter) {
            launch.spawn(graph, layer, ProjectileKind::Quack, Vec2::new(0.0, 0.5), &game);
        }
    })
}

fn drop_pickup_command(source: NodeId, kind: PickupKind, game: GameContext) -> Command {
    Command::new(Category::SCENE_AIR_LAYER, move |graph, layer, _dt| {
        if !graph.contains(source) {
            return;
        }
        let position = graph.world_position(source);
        let mut pickup = Pickup::new(kind, &game);
        pickup.set_velocity(Vec2::new(0.0, PICKUP_DRIFT_SPEED));
        graph.attach(layer, SceneNode::new(NodeKind::Pickup(pickup)).with_position(position));
    })
}
