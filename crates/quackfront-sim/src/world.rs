//! The frame orchestrator.
//!
//! `World` owns the scene graph, the command queue and the camera, and
//! advances them through a fixed ten-step sequence per frame. Completely
//! headless: rendering goes through `RenderTarget`, input arrives as
//! commands in the queue.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use quackfront_core::config::WorldConfig;
use quackfront_core::enums::MissionStatus;
use quackfront_core::state::WorldSnapshot;
use quackfront_core::types::FloatRect;

use crate::command::CommandQueue;
use crate::context::GameContext;
use crate::graph::{NodeId, SceneGraph, UpdateContext};
use crate::nodes::Animal;
use crate::render::RenderTarget;
use crate::systems::guidance::EnemyBuffer;
use crate::systems::spawner::EnemySchedule;
use crate::systems::{cleanup, collision, guidance, player_control, snapshot, spawner};
use crate::world_setup::{self, SceneLayout};

pub struct World {
    config: WorldConfig,
    game: GameContext,
    graph: SceneGraph,
    layout: SceneLayout,
    commands: CommandQueue,
    rng: ChaCha8Rng,
    view_center: Vec2,
    world_bounds: FloatRect,
    schedule: EnemySchedule,
    /// Scratch space for guidance. Always empty between frames.
    enemies: EnemyBuffer,
    frame: u64,
}

impl World {
    pub fn new(config: WorldConfig, game: GameContext) -> Self {
        let mut graph = SceneGraph::new();
        let layout = world_setup::build_scene(&mut graph, &game, &config);
        let spawn_position = world_setup::spawn_position(&config);
        let schedule = EnemySchedule::from_config(spawn_position, &config.spawn_points);

        log::info!(
            "world created: seed {}, {} scheduled enemies, {} nodes",
            config.seed,
            schedule.len(),
            graph.len()
        );

        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            world_bounds: world_setup::world_bounds(&config),
            view_center: spawn_position,
            config,
            game,
            graph,
            layout,
            commands: CommandQueue::new(),
            schedule,
            enemies: Rc::new(RefCell::new(Vec::new())),
            frame: 0,
        }
    }

    /// Advance one frame of `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        // 1. Scroll, and reset the player's velocity to the scroll bias.
        self.view_center.y += self.config.scroll_speed * dt;
        player_control::reset_velocity(&mut self.graph, self.layout.player, self.config.player_scroll_bias);

        // 2-3. Cull and guidance commands.
        let battlefield = self.battlefield_bounds();
        self.commands.push(cleanup::out_of_battlefield_command(battlefield));
        guidance::push_commands(&mut self.commands, &self.enemies);

        // 4. Everything queued so far, input included, lands now.
        let drained = self.drain_commands(dt);
        self.enemies.borrow_mut().clear();

        // 5.
        player_control::adapt_velocity(&mut self.graph, self.layout.player, self.config.scroll_speed);

        // 6.
        let pairs = collision::detect(&self.graph);
        let detected = pairs.len();
        let resolved = collision::resolve(&mut self.graph, pairs, self.config.contact_damage);

        // 7.
        let removed = self.graph.remove_wrecks();
        if removed > 0 {
            log::debug!("frame {}: swept {removed} nodes", self.frame);
        }

        // 8.
        let battlefield = self.battlefield_bounds();
        spawner::run(
            &mut self.graph,
            self.layout.air,
            &mut self.schedule,
            battlefield,
            &self.game,
        );

        // 9. Commands pushed here are drained next frame.
        let mut ctx = UpdateContext {
            commands: &mut self.commands,
            rng: &mut self.rng,
            game: &self.game,
            pickup_drop_chance: self.config.pickup_drop_chance,
        };
        self.graph.update(dt, &mut ctx);

        // 10.
        let view = self.view_bounds();
        player_control::adapt_position(&mut self.graph, self.layout.player, view, self.config.border_distance);

        log::trace!(
            "frame {}: drained {drained} commands, {detected} contacts ({resolved} resolved), {} nodes",
            self.frame,
            self.graph.len()
        );
        self.frame += 1;
    }

    fn drain_commands(&mut self, dt: f32) -> usize {
        let mut drained = 0;
        while !self.commands.is_empty() {
            let command = self.commands.pop();
            self.graph.on_command(&command, dt);
            drained += 1;
        }
        drained
    }

    pub fn draw(&self, target: &mut dyn RenderTarget) {
        self.graph.draw(target);
    }

    /// Queue that input producers push into. Drained at the next update.
    pub fn command_queue_mut(&mut self) -> &mut CommandQueue {
        &mut self.commands
    }

    pub fn view_bounds(&self) -> FloatRect {
        FloatRect::centered(
            self.view_center,
            Vec2::new(self.config.view_width, self.config.view_height),
        )
    }

    /// The view plus a band above it where enemies spawn and survive.
    pub fn battlefield_bounds(&self) -> FloatRect {
        let mut bounds = self.view_bounds();
        bounds.top -= self.config.battlefield_margin;
        bounds.height += self.config.battlefield_margin;
        bounds
    }

    pub fn world_bounds(&self) -> FloatRect {
        self.world_bounds
    }

    pub fn has_alive_player(&self) -> bool {
        self.graph
            .get::<Animal>(self.layout.player)
            .is_some_and(|player| !player.is_marked_for_removal())
    }

    /// The player has scrolled past the end of the level.
    pub fn has_player_reached_end(&self) -> bool {
        self.graph.contains(self.layout.player)
            && !self.world_bounds.contains(self.graph.world_position(self.layout.player))
    }

    pub fn mission_status(&self) -> MissionStatus {
        if !self.has_alive_player() {
            MissionStatus::Failure
        } else if self.has_player_reached_end() {
            MissionStatus::Success
        } else {
            MissionStatus::Running
        }
    }

    pub fn player(&self) -> NodeId {
        self.layout.player
    }

    pub fn air_layer(&self) -> NodeId {
        self.layout.air
    }

    pub fn background_layer(&self) -> NodeId {
        self.layout.background
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn game(&self) -> &GameContext {
        &self.game
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn pending_spawns(&self) -> usize {
        self.schedule.len()
    }

    /// Number of completed frames.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[cfg(test)]
    pub(crate) fn guidance_targets(&self) -> usize {
        self.enemies.borrow().len()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        snapshot::build_snapshot(
            &self.graph,
            self.frame,
            self.view_bounds(),
            self.mission_status(),
            self.layout.player,
            self.schedule.len(),
        )
    }
}
