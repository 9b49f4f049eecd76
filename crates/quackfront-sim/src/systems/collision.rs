//! Collision stage: pairwise overlap tests and role-based resolution.
//!
//! Detection is a plain O(n²) sweep over every entity's world bounding
//! rectangle. That is fine at the entity counts of a level; a grid or
//! quadtree could replace `detect` without touching `resolve`.

use quackfront_core::category::Category;

use crate::graph::{NodeId, SceneGraph};
use crate::nodes::{Animal, NodeKind, Projectile};

/// Two overlapping entities. Detection reports each unordered pair once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    pub first: NodeId,
    pub second: NodeId,
}

impl CollisionPair {
    pub fn new(first: NodeId, second: NodeId) -> Self {
        Self { first, second }
    }

    /// True if the pair plays the roles `(role1, role2)` in either order.
    /// When the match is reversed the pair is swapped, so afterwards `first`
    /// always plays `role1` and `second` plays `role2`.
    pub fn matches_roles(&mut self, graph: &SceneGraph, role1: Category, role2: Category) -> bool {
        let category1 = category_of(graph, self.first);
        let category2 = category_of(graph, self.second);

        if role1.matches(category1) && role2.matches(category2) {
            true
        } else if role1.matches(category2) && role2.matches(category1) {
            std::mem::swap(&mut self.first, &mut self.second);
            true
        } else {
            false
        }
    }

    fn involves_destroyed(&self, graph: &SceneGraph) -> bool {
        [self.first, self.second]
            .into_iter()
            .any(|id| graph.node(id).map_or(true, |node| node.is_destroyed()))
    }
}

fn category_of(graph: &SceneGraph, id: NodeId) -> Category {
    graph.node(id).map_or(Category::NONE, |node| node.category())
}

/// Every pair of living entities whose world bounds overlap, in traversal
/// order with `first` visited before `second`.
pub fn detect(graph: &SceneGraph) -> Vec<CollisionPair> {
    let colliders: Vec<_> = graph
        .descendants(graph.root())
        .into_iter()
        .filter(|&id| graph.node(id).is_some_and(|node| !node.is_destroyed()))
        .map(|id| (id, graph.bounding_rect(id)))
        .filter(|(_, rect)| !rect.is_empty())
        .collect();

    let mut pairs = Vec::new();
    for (i, (a, rect_a)) in colliders.iter().enumerate() {
        for (b, rect_b) in &colliders[i + 1..] {
            if rect_a.intersects(rect_b) {
                pairs.push(CollisionPair::new(*a, *b));
            }
        }
    }
    pairs
}

/// Apply gameplay effects for each pair. Returns the number of pairs that
/// had an effect.
pub fn resolve(graph: &mut SceneGraph, pairs: Vec<CollisionPair>, contact_damage: i32) -> usize {
    let mut resolved = 0;
    for mut pair in pairs {
        // An earlier pair this pass may already have finished one side off.
        if pair.involves_destroyed(graph) {
            continue;
        }

        let handled = if pair.matches_roles(graph, Category::PLAYER_ANIMAL, Category::ENEMY_ANIMAL) {
            // Contact hurts the player only.
            if let Some(player) = graph.get_mut::<Animal>(pair.first) {
                player.damage(contact_damage);
            }
            true
        } else if pair.matches_roles(graph, Category::PLAYER_ANIMAL, Category::PICKUP) {
            collect_pickup(graph, pair)
        } else if pair.matches_roles(graph, Category::ENEMY_ANIMAL, Category::ALLIED_PROJECTILE)
            || pair.matches_roles(graph, Category::PLAYER_ANIMAL, Category::ENEMY_PROJECTILE)
        {
            projectile_hit(graph, pair)
        } else {
            false
        };

        if handled {
            resolved += 1;
        }
    }
    resolved
}

fn collect_pickup(graph: &mut SceneGraph, pair: CollisionPair) -> bool {
    let Some([player, pickup]) = graph.pair_mut(pair.first, pair.second) else {
        return false;
    };
    let (NodeKind::Animal(player), NodeKind::Pickup(pickup)) = (&mut player.kind, &mut pickup.kind) else {
        return false;
    };
    pickup.apply(player);
    pickup.destroy();
    true
}

fn projectile_hit(graph: &mut SceneGraph, pair: CollisionPair) -> bool {
    let Some(projectile) = graph.get_mut::<Projectile>(pair.second) else {
        return false;
    };
    let damage = projectile.damage();
    projectile.destroy();

    if let Some(animal) = graph.get_mut::<Animal>(pair.first) {
        animal.damage(damage);
    }
    true
}
