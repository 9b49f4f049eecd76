//! Guidance stage: steers guided projectiles toward the nearest enemy.
//!
//! Two commands run back to back during the drain. The first collects every
//! living enemy into a scratch buffer, the second retargets each guided
//! projectile using that buffer. The world clears the buffer once the
//! queue is drained.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use quackfront_core::category::Category;

use crate::command::{Command, CommandQueue};
use crate::graph::NodeId;
use crate::nodes::{Animal, Projectile};

/// Living enemies and their world positions, in traversal order.
pub type EnemyBuffer = Rc<RefCell<Vec<(NodeId, Vec2)>>>;

pub fn push_commands(commands: &mut CommandQueue, enemies: &EnemyBuffer) {
    commands.push(enemy_collector(Rc::clone(enemies)));
    commands.push(projectile_guider(Rc::clone(enemies)));
}

fn enemy_collector(enemies: EnemyBuffer) -> Command {
    Command::new(Category::ENEMY_ANIMAL, move |graph, node, _dt| {
        let alive = graph
            .get::<Animal>(node)
            .is_some_and(|enemy| !enemy.is_destroyed());
        if alive {
            enemies.borrow_mut().push((node, graph.world_position(node)));
        }
    })
}

fn projectile_guider(enemies: EnemyBuffer) -> Command {
    Command::new(Category::ALLIED_PROJECTILE, move |graph, node, _dt| {
        let guided = graph.get::<Projectile>(node).is_some_and(Projectile::is_guided);
        if !guided {
            return;
        }

        let position = graph.world_position(node);
        let Some(target) = nearest(position, &enemies.borrow()) else {
            return;
        };
        if let Some(projectile) = graph.get_mut::<Projectile>(node) {
            projectile.guide_towards(position, target);
        }
    })
}

/// Closest candidate to `from`. Ties go to the earliest candidate.
pub fn nearest(from: Vec2, candidates: &[(NodeId, Vec2)]) -> Option<Vec2> {
    let mut best: Option<(f32, Vec2)> = None;
    for &(_, position) in candidates {
        let distance = from.distance(position);
        if best.map_or(true, |(min, _)| distance < min) {
            best = Some((distance, position));
        }
    }
    best.map(|(_, position)| position)
}
