//! Tests for the scene graph, command routing, collisions, and the frame
//! sequence.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use approx::assert_relative_eq;
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use quackfront_core::category::Category;
use quackfront_core::config::{ConfigError, SpawnPointConfig, WorldConfig};
use quackfront_core::constants::DT;
use quackfront_core::enums::*;
use quackfront_core::input::{InputEvent, Key, PlayerAction};
use quackfront_core::resources::{FontHolder, FontInfo, ResourceError, TextureHolder, TextureInfo};
use quackfront_core::tables::{DataTables, Direction, PickupEffect};
use quackfront_core::types::FloatRect;

use crate::command::{Command, CommandQueue};
use crate::context::{ContextError, GameContext};
use crate::graph::{NodeId, SceneGraph, SceneNode, UpdateContext};
use crate::nodes::{Animal, NodeKind, Pickup, Projectile, TextNode};
use crate::player::Player;
use crate::render::DrawList;
use crate::systems::collision::{self, CollisionPair};
use crate::systems::guidance::{self, EnemyBuffer};
use crate::systems::spawner::EnemySchedule;
use crate::world::World;
use crate::world_setup::spawn_animal;

fn game() -> GameContext {
    GameContext::headless(DataTables::standard()).unwrap()
}

/// No scheduled enemies, so tests control everything in the scene.
fn quiet_config() -> WorldConfig {
    WorldConfig {
        spawn_points: Vec::new(),
        ..Default::default()
    }
}

fn quiet_world() -> World {
    World::new(quiet_config(), game())
}

fn attach_entity(graph: &mut SceneGraph, parent: NodeId, kind: NodeKind, position: Vec2) -> NodeId {
    graph.attach(parent, SceneNode::new(kind).with_position(position))
}

fn frog(game: &GameContext) -> NodeKind {
    NodeKind::Animal(Animal::new(AnimalKind::Frog, game))
}

fn count_category(world: &World, category: Category) -> usize {
    world
        .snapshot()
        .entities
        .iter()
        .filter(|e| category.matches(e.category))
        .count()
}

fn count_pickups(graph: &SceneGraph) -> usize {
    graph
        .descendants(graph.root())
        .into_iter()
        .filter(|&id| graph.get::<Pickup>(id).is_some())
        .count()
}

// ---- Scene graph structure & transforms ----

#[test]
fn test_world_transform_composes_parent_chain() {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let a = graph.attach(
        root,
        SceneNode::plain()
            .with_position(Vec2::new(100.0, 50.0))
            .with_rotation(90.0),
    );
    let b = graph.attach(a, SceneNode::plain().with_position(Vec2::new(10.0, 0.0)));

    let world = graph.world_position(b);
    assert_relative_eq!(world.x, 100.0, epsilon = 1e-4);
    assert_relative_eq!(world.y, 60.0, epsilon = 1e-4);

    let expected = graph.node(root).unwrap().transform.to_affine()
        * graph.node(a).unwrap().transform.to_affine()
        * graph.node(b).unwrap().transform.to_affine();
    assert!(graph.world_transform(b).abs_diff_eq(expected, 1e-5));
}

#[test]
fn test_world_transform_follows_detach_and_reattach() {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let a = graph.attach(root, SceneNode::plain().with_position(Vec2::new(100.0, 0.0)));
    let b = graph.attach(a, SceneNode::plain().with_position(Vec2::new(10.0, 5.0)));
    let c = graph.attach(b, SceneNode::plain().with_position(Vec2::new(1.0, 1.0)));

    let detached = graph.detach_child(a, b);
    assert_eq!(detached, b);
    assert_eq!(graph.node(b).unwrap().parent(), None);
    assert!(graph.node(a).unwrap().children().is_empty());
    // The subtree is a root of its own now.
    assert_relative_eq!(graph.world_position(c).x, 11.0, epsilon = 1e-5);
    assert_relative_eq!(graph.world_position(c).y, 6.0, epsilon = 1e-5);

    let d = graph.attach(root, SceneNode::plain().with_position(Vec2::new(0.0, 200.0)));
    graph.attach_child(d, b);
    assert_eq!(graph.node(b).unwrap().parent(), Some(d));
    assert_relative_eq!(graph.world_position(c).x, 11.0, epsilon = 1e-5);
    assert_relative_eq!(graph.world_position(c).y, 206.0, epsilon = 1e-5);
}

#[test]
#[should_panic(expected = "is not a child of")]
fn test_detach_non_child_panics() {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let a = graph.attach(root, SceneNode::plain());
    let b = graph.attach(root, SceneNode::plain());
    graph.detach_child(a, b);
}

#[test]
#[should_panic(expected = "already has a parent")]
fn test_attach_child_with_parent_panics() {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let a = graph.attach(root, SceneNode::plain());
    let b = graph.attach(root, SceneNode::plain());
    graph.attach_child(a, b);
}

#[test]
#[should_panic(expected = "below its own descendant")]
fn test_attach_child_cycle_panics() {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let a = graph.attach(root, SceneNode::plain());
    let b = graph.attach(a, SceneNode::plain());
    graph.detach_child(root, a);
    graph.attach_child(b, a);
}

#[test]
fn test_remove_subtree_drops_descendants() {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let a = graph.attach(root, SceneNode::plain());
    let b = graph.attach(a, SceneNode::plain());
    graph.attach(b, SceneNode::plain());
    let keep = graph.attach(root, SceneNode::plain());

    assert_eq!(graph.remove_subtree(a), 3);
    assert_eq!(graph.len(), 2);
    assert!(graph.contains(keep));
    assert_eq!(graph.node(root).unwrap().children(), &[keep]);
}

#[test]
fn test_plain_nodes_have_empty_bounds() {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let a = graph.attach(root, SceneNode::plain().with_position(Vec2::new(5.0, 5.0)));
    assert!(graph.bounding_rect(a).is_empty());
}

#[test]
fn test_entity_bounds_follow_world_position() {
    let game = game();
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let layer = graph.attach(root, SceneNode::plain().with_position(Vec2::new(100.0, 0.0)));
    let enemy = attach_entity(&mut graph, layer, frog(&game), Vec2::new(0.0, 50.0));

    let rect = graph.bounding_rect(enemy);
    assert_relative_eq!(rect.center().x, 100.0, epsilon = 1e-4);
    assert_relative_eq!(rect.center().y, 50.0, epsilon = 1e-4);
    assert_relative_eq!(rect.width, 48.0, epsilon = 1e-4);
}

// ---- Command routing ----

#[test]
fn test_on_command_fires_only_on_matching_nodes() {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let a = graph.attach(root, SceneNode::plain().with_category(Category::PICKUP));
    let b = graph.attach(a, SceneNode::plain());
    graph.attach(b, SceneNode::plain().with_category(Category::ENEMY_ANIMAL));
    let e = graph.attach(a, SceneNode::plain().with_category(Category::ALLIED_PROJECTILE));
    let d = graph.attach(root, SceneNode::plain().with_category(Category::ENEMY_PROJECTILE));

    let hits = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&hits);
    let command = Command::new(Category::PROJECTILE | Category::PICKUP, move |_, node, _| {
        sink.borrow_mut().push(node);
    });
    graph.on_command(&command, DT);

    assert_eq!(*hits.borrow(), vec![a, e, d]);
}

#[test]
fn test_on_command_visits_every_node_once() {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let categories = [
        Category::PLAYER_ANIMAL,
        Category::NONE,
        Category::ENEMY_ANIMAL,
        Category::PICKUP,
        Category::SCENE_AIR_LAYER,
    ];
    // A lopsided tree: each node hangs under the previous one or the root.
    let mut parent = root;
    for (i, category) in categories.into_iter().enumerate() {
        let id = graph.attach(parent, SceneNode::plain().with_category(category));
        if i % 2 == 0 {
            parent = id;
        }
    }

    let hits = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&hits);
    let command = Command::new(Category::all(), move |_, node, _| sink.borrow_mut().push(node));
    graph.on_command(&command, DT);

    let hits = hits.borrow();
    let unique: HashSet<_> = hits.iter().copied().collect();
    assert_eq!(unique.len(), hits.len());
    // Everything except the root and the NONE node.
    assert_eq!(hits.len(), graph.len() - 2);
}

#[test]
fn test_derived_command_skips_other_variants() {
    let game = game();
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let enemy = attach_entity(&mut graph, root, frog(&game), Vec2::ZERO);
    let laser = attach_entity(
        &mut graph,
        root,
        NodeKind::Projectile(Projectile::new(ProjectileKind::AlliedLaser, &game)),
        Vec2::ZERO,
    );

    let command = Command::derived::<Animal>(Category::all(), |animal, _| animal.damage(5));
    graph.on_command(&command, DT);

    assert_eq!(graph.get::<Animal>(enemy).unwrap().hitpoints(), 35);
    assert_eq!(graph.entity(laser).unwrap().hitpoints(), 1);
}

#[test]
fn test_command_queue_is_fifo() {
    let mut queue = CommandQueue::new();
    queue.push(Command::new(Category::PICKUP, |_, _, _| {}));
    queue.push(Command::new(Category::ENEMY_ANIMAL, |_, _, _| {}));
    assert_eq!(queue.len(), 2);

    assert_eq!(queue.pop().category, Category::PICKUP);
    assert_eq!(queue.pop().category, Category::ENEMY_ANIMAL);
    assert!(queue.is_empty());
}

#[test]
#[should_panic(expected = "empty queue")]
fn test_pop_empty_queue_panics() {
    let mut queue = CommandQueue::new();
    queue.pop();
}

// ---- Collision detection ----

#[test]
fn test_detect_reports_exact_overlapping_pairs() {
    let game = game();
    let mut graph = SceneGraph::new();
    let root = graph.root();
    // Frogs are 48 wide: centres 48 apart only touch.
    let e1 = attach_entity(&mut graph, root, frog(&game), Vec2::new(0.0, 0.0));
    let e2 = attach_entity(&mut graph, root, frog(&game), Vec2::new(0.0, 0.0));
    let e3 = attach_entity(&mut graph, root, frog(&game), Vec2::new(30.0, 0.0));
    attach_entity(&mut graph, root, frog(&game), Vec2::new(78.0, 0.0));
    attach_entity(&mut graph, root, frog(&game), Vec2::new(500.0, 500.0));

    let pairs = collision::detect(&graph);
    let expected = vec![
        CollisionPair::new(e1, e2),
        CollisionPair::new(e1, e3),
        CollisionPair::new(e2, e3),
    ];
    assert_eq!(pairs, expected);
}

#[test]
fn test_detect_never_pairs_self_or_duplicates() {
    let game = game();
    let mut graph = SceneGraph::new();
    let root = graph.root();
    for _ in 0..6 {
        attach_entity(&mut graph, root, frog(&game), Vec2::new(10.0, 10.0));
    }

    let pairs = collision::detect(&graph);
    assert_eq!(pairs.len(), 15);

    let mut seen = HashSet::new();
    for pair in &pairs {
        assert_ne!(pair.first, pair.second);
        let key = if pair.first < pair.second {
            (pair.first, pair.second)
        } else {
            (pair.second, pair.first)
        };
        assert!(seen.insert(key), "duplicate pair {pair:?}");
    }
}

#[test]
fn test_detect_ignores_destroyed_entities() {
    let game = game();
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let a = attach_entity(&mut graph, root, frog(&game), Vec2::ZERO);
    attach_entity(&mut graph, root, frog(&game), Vec2::ZERO);
    graph.entity_mut(a).unwrap().destroy();

    assert!(collision::detect(&graph).is_empty());
}

#[test]
fn test_matches_roles_swaps_reversed_pair() {
    let game = game();
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let duck = attach_entity(
        &mut graph,
        root,
        NodeKind::Animal(Animal::new(AnimalKind::Duck, &game)),
        Vec2::ZERO,
    );
    let enemy = attach_entity(&mut graph, root, frog(&game), Vec2::ZERO);

    let mut pair = CollisionPair::new(enemy, duck);
    assert!(pair.matches_roles(&graph, Category::PLAYER_ANIMAL, Category::ENEMY_ANIMAL));
    assert_eq!(pair.first, duck);
    assert_eq!(pair.second, enemy);

    // Already in order: unchanged.
    assert!(pair.matches_roles(&graph, Category::PLAYER_ANIMAL, Category::ENEMY_ANIMAL));
    assert_eq!(pair.first, duck);

    let mut unrelated = CollisionPair::new(enemy, duck);
    assert!(!unrelated.matches_roles(&graph, Category::PICKUP, Category::ALLIED_PROJECTILE));
    assert_eq!(unrelated, CollisionPair::new(enemy, duck));
}

#[test]
fn test_resolve_skips_pairs_destroyed_earlier_in_pass() {
    let game = game();
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let enemy = attach_entity(&mut graph, root, frog(&game), Vec2::ZERO);
    let quack = NodeKind::Projectile(Projectile::new(ProjectileKind::Quack, &game));
    let first = attach_entity(&mut graph, root, quack, Vec2::ZERO);
    let laser = NodeKind::Projectile(Projectile::new(ProjectileKind::AlliedLaser, &game));
    let second = attach_entity(&mut graph, root, laser, Vec2::ZERO);

    let pairs = collision::detect(&graph);
    let resolved = collision::resolve(&mut graph, pairs, 1);

    assert_eq!(resolved, 1);
    assert!(graph.entity(enemy).unwrap().is_destroyed());
    assert!(graph.entity(first).unwrap().is_destroyed());
    // The second projectile found its target already gone.
    assert!(!graph.entity(second).unwrap().is_destroyed());
}

// ---- Frame sequence ----

#[test]
fn test_entity_lifecycle_three_frames() {
    let mut world = quiet_world();
    let air = world.air_layer();
    let enemy = Animal::new(AnimalKind::Frog, world.game());
    let nodes_before = world.graph().len();
    let id = spawn_animal(world.graph_mut(), air, enemy, Vec2::new(200.0, 2500.0), 180.0);
    assert_eq!(world.graph().len(), nodes_before + 2);

    world.graph_mut().get_mut::<Animal>(id).unwrap().damage(40);
    let animal = world.graph().get::<Animal>(id).unwrap();
    assert!(animal.is_destroyed());
    assert!(!animal.is_marked_for_removal());

    world.update(DT);
    let animal = world.graph().get::<Animal>(id).unwrap();
    assert!(animal.is_marked_for_removal());

    world.update(DT);
    assert!(!world.graph().contains(id));
}

#[test]
fn test_quack_kills_frog_and_drop_rolls_once() {
    let config = WorldConfig {
        pickup_drop_chance: 1,
        ..quiet_config()
    };
    let mut world = World::new(config, game());
    let air = world.air_layer();
    let position = Vec2::new(200.0, 2500.0);
    let enemy = Animal::new(AnimalKind::Frog, world.game());
    let enemy = spawn_animal(world.graph_mut(), air, enemy, position, 180.0);
    let quack = NodeKind::Projectile(Projectile::new(ProjectileKind::Quack, world.game()));
    let quack = attach_entity(world.graph_mut(), air, quack, position);

    world.update(DT);
    assert!(world.graph().get::<Animal>(enemy).unwrap().is_destroyed());
    assert!(!world.graph().contains(quack));

    world.update(DT);
    assert!(!world.graph().contains(enemy));

    for _ in 0..5 {
        world.update(DT);
    }
    assert_eq!(count_pickups(world.graph()), 1);
}

#[test]
fn test_no_drop_when_chance_disabled() {
    let config = WorldConfig {
        pickup_drop_chance: 0,
        ..quiet_config()
    };
    let mut world = World::new(config, game());
    let air = world.air_layer();
    let enemy = Animal::new(AnimalKind::Frog, world.game());
    let enemy = spawn_animal(world.graph_mut(), air, enemy, Vec2::new(200.0, 2500.0), 180.0);
    world.graph_mut().get_mut::<Animal>(enemy).unwrap().destroy();

    for _ in 0..4 {
        world.update(DT);
    }
    assert_eq!(count_pickups(world.graph()), 0);
}

#[test]
fn test_player_clamped_to_view_border() {
    let mut world = quiet_world();
    let player = world.player();
    let far = world.view_bounds();
    world.graph_mut().node_mut(player).unwrap().transform.position =
        Vec2::new(far.left - 500.0, far.bottom() + 500.0);

    world.update(DT);
    let view = world.view_bounds();
    let border = world.config().border_distance;
    let position = world.graph().world_position(player);
    assert_relative_eq!(position.x, view.left + border, epsilon = 1e-3);
    assert_relative_eq!(position.y, view.bottom() - border, epsilon = 1e-3);

    world.graph_mut().node_mut(player).unwrap().transform.position =
        Vec2::new(view.right() + 500.0, view.top - 500.0);
    world.update(DT);
    let view = world.view_bounds();
    let position = world.graph().world_position(player);
    assert_relative_eq!(position.x, view.right() - border, epsilon = 1e-3);
    assert_relative_eq!(position.y, view.top + border, epsilon = 1e-3);
}

#[test]
fn test_idle_player_holds_screen_position() {
    let mut world = quiet_world();
    let player = world.player();
    let start = world.graph().world_position(player);

    world.update(DT);
    let velocity = world.graph().get::<Animal>(player).unwrap().velocity();
    assert_relative_eq!(velocity.x, 0.0);
    assert_relative_eq!(velocity.y, 0.0);
    assert_relative_eq!(world.graph().world_position(player).y, start.y, epsilon = 1e-4);
}

#[test]
fn test_move_input_accelerates_player_with_diagonal_correction() {
    let mut world = quiet_world();
    let input = Player::new(world.config().player_speed);
    input.handle_realtime_input(|key| key == Key::Right, world.command_queue_mut());

    world.update(DT);
    let velocity = world.graph().get::<Animal>(world.player()).unwrap().velocity();
    // Rightward input plus the downward bias counts as diagonal.
    let root2 = std::f32::consts::SQRT_2;
    assert_relative_eq!(velocity.x, 200.0 / root2, epsilon = 1e-3);
    assert_relative_eq!(velocity.y, 30.0 / root2 - 30.0, epsilon = 1e-3);
}

#[test]
fn test_player_fire_spawns_laser_next_frame() {
    let mut world = quiet_world();
    let input = Player::new(world.config().player_speed);

    input.handle_realtime_input(|key| key == Key::Q, world.command_queue_mut());
    world.update(DT);
    assert_eq!(count_category(&world, Category::ALLIED_PROJECTILE), 0);

    world.update(DT);
    let lasers: Vec<_> = world
        .snapshot()
        .entities
        .into_iter()
        .filter(|e| e.category == Category::ALLIED_PROJECTILE)
        .collect();
    assert_eq!(lasers.len(), 1);
    assert!(lasers[0].velocity.y < 0.0);
}

#[test]
fn test_spread_level_three_fires_three_lasers() {
    let mut world = quiet_world();
    let player = world.player();
    {
        let duck = world.graph_mut().get_mut::<Animal>(player).unwrap();
        duck.increase_spread();
        duck.increase_spread();
        duck.increase_spread();
        assert_eq!(duck.spread_level(), 3);
        duck.fire();
    }

    world.update(DT);
    world.update(DT);
    assert_eq!(count_category(&world, Category::ALLIED_PROJECTILE), 3);
}

#[test]
fn test_enemy_fires_downward() {
    let mut world = quiet_world();
    let air = world.air_layer();
    let enemy = Animal::new(AnimalKind::Frog, world.game());
    spawn_animal(world.graph_mut(), air, enemy, Vec2::new(200.0, 2300.0), 180.0);

    world.update(DT);
    world.update(DT);
    let lasers: Vec<_> = world
        .snapshot()
        .entities
        .into_iter()
        .filter(|e| e.category == Category::ENEMY_PROJECTILE)
        .collect();
    assert_eq!(lasers.len(), 1);
    assert!(lasers[0].velocity.y > 0.0);
    assert!(lasers[0].position.y > 2300.0);
}

#[test]
fn test_launch_quack_consumes_ammo() {
    let mut world = quiet_world();
    let input = Player::new(world.config().player_speed);

    let press = InputEvent::KeyPressed { key: Key::W };
    input.handle_event(&press, world.command_queue_mut());
    world.update(DT);
    assert_eq!(world.snapshot().player.unwrap().quacks, 1);

    world.update(DT);
    let quacks = world
        .snapshot()
        .entities
        .iter()
        .filter(|e| e.category == Category::ALLIED_PROJECTILE)
        .count();
    assert_eq!(quacks, 1);
}

#[test]
fn test_contact_damages_player_only() {
    let mut world = quiet_world();
    let air = world.air_layer();
    let player = world.player();
    let position = world.graph().world_position(player);
    let enemy = Animal::new(AnimalKind::Frog, world.game());
    let enemy = spawn_animal(world.graph_mut(), air, enemy, position, 180.0);

    world.update(DT);
    assert_eq!(world.graph().get::<Animal>(player).unwrap().hitpoints(), 99);
    assert_eq!(world.graph().get::<Animal>(enemy).unwrap().hitpoints(), 40);
}

#[test]
fn test_enemy_laser_hits_player() {
    let mut world = quiet_world();
    let air = world.air_layer();
    let player = world.player();
    let position = world.graph().world_position(player);
    let laser = NodeKind::Projectile(Projectile::new(ProjectileKind::EnemyLaser, world.game()));
    let laser = attach_entity(world.graph_mut(), air, laser, position);

    world.update(DT);
    assert_eq!(world.graph().get::<Animal>(player).unwrap().hitpoints(), 90);
    assert!(!world.graph().contains(laser));
}

#[test]
fn test_player_collects_pickup() {
    let mut world = quiet_world();
    let air = world.air_layer();
    let player = world.player();
    let position = world.graph().world_position(player);
    let pickup = NodeKind::Pickup(Pickup::new(PickupKind::HealthRefill, world.game()));
    let pickup = attach_entity(world.graph_mut(), air, pickup, position);

    world.update(DT);
    assert_eq!(world.graph().get::<Animal>(player).unwrap().hitpoints(), 125);
    assert!(!world.graph().contains(pickup));
}

#[test]
fn test_projectile_outside_battlefield_is_culled() {
    let mut world = quiet_world();
    let air = world.air_layer();
    let laser = NodeKind::Projectile(Projectile::new(ProjectileKind::AlliedLaser, world.game()));
    let laser = attach_entity(world.graph_mut(), air, laser, Vec2::new(200.0, -1000.0));
    let inside = NodeKind::Projectile(Projectile::new(ProjectileKind::AlliedLaser, world.game()));
    let top = world.battlefield_bounds().top;
    let inside = attach_entity(world.graph_mut(), air, inside, Vec2::new(200.0, top + 20.0));

    world.update(DT);
    assert!(!world.graph().contains(laser));
    assert!(world.graph().contains(inside));
}

#[test]
fn test_bound_texts_track_parent_state() {
    let mut world = quiet_world();
    let player = world.player();
    world.update(DT);

    let children = world.graph().node(player).unwrap().children().to_vec();
    assert_eq!(children.len(), 2);
    let health = world.graph().get::<TextNode>(children[0]).unwrap();
    assert_eq!(health.string, "100 HP");
    let ammo = world.graph().get::<TextNode>(children[1]).unwrap();
    assert_eq!(ammo.string, "QUACKS: 2");

    {
        let duck = world.graph_mut().get_mut::<Animal>(player).unwrap();
        duck.damage(30);
        duck.launch_quack();
        duck.launch_quack();
    }
    world.update(DT);
    let health = world.graph().get::<TextNode>(children[0]).unwrap();
    assert_eq!(health.string, "70 HP");
    let ammo = world.graph().get::<TextNode>(children[1]).unwrap();
    assert!(ammo.visual().is_none());
}

#[test]
fn test_enemy_text_is_counter_rotated() {
    let mut world = quiet_world();
    let air = world.air_layer();
    let enemy = Animal::new(AnimalKind::Frog, world.game());
    let enemy = spawn_animal(world.graph_mut(), air, enemy, Vec2::new(200.0, 2500.0), 180.0);
    world.update(DT);

    let text = world.graph().node(enemy).unwrap().children()[0];
    let transform = world.graph().node(text).unwrap().transform;
    assert_relative_eq!(transform.rotation, -180.0);
    // Net world rotation is zero: the label stays upright.
    let world_text = world.graph().world_transform(text);
    assert_relative_eq!(world_text.matrix2.x_axis.x, 1.0, epsilon = 1e-5);
}

#[test]
fn test_only_health_text_is_counter_rotated() {
    let mut world = quiet_world();
    let air = world.air_layer();
    let duck = Animal::new(AnimalKind::Duck, world.game());
    let duck = spawn_animal(world.graph_mut(), air, duck, Vec2::new(200.0, 2500.0), 90.0);
    world.update(DT);

    let children = world.graph().node(duck).unwrap().children().to_vec();
    let health = world.graph().node(children[0]).unwrap().transform;
    assert_relative_eq!(health.rotation, -90.0);
    let ammo = world.graph().node(children[1]).unwrap().transform;
    assert_relative_eq!(ammo.rotation, 0.0);
}

#[test]
fn test_draw_skips_destroyed_entities() {
    let mut world = quiet_world();
    let air = world.air_layer();
    let enemy = Animal::new(AnimalKind::Frog, world.game());
    let enemy = spawn_animal(world.graph_mut(), air, enemy, Vec2::new(200.0, 2500.0), 180.0);
    world.update(DT);

    let mut list = DrawList::new();
    world.draw(&mut list);
    assert_eq!(list.count_sprites(TextureId::Water), 1);
    assert_eq!(list.count_sprites(TextureId::Duck), 1);
    assert_eq!(list.count_sprites(TextureId::Frog), 1);

    world.graph_mut().entity_mut(enemy).unwrap().destroy();
    list.clear();
    world.draw(&mut list);
    assert_eq!(list.count_sprites(TextureId::Frog), 0);
    assert_eq!(list.count_sprites(TextureId::Duck), 1);
}

// ---- Guidance ----

fn run_guidance(graph: &mut SceneGraph) {
    let enemies: EnemyBuffer = Rc::new(RefCell::new(Vec::new()));
    let mut queue = CommandQueue::new();
    guidance::push_commands(&mut queue, &enemies);
    while !queue.is_empty() {
        graph.on_command(&queue.pop(), DT);
    }
}

#[test]
fn test_guided_projectiles_target_nearest_enemy() {
    let game = game();
    let mut graph = SceneGraph::new();
    let root = graph.root();
    attach_entity(&mut graph, root, frog(&game), Vec2::new(0.0, 0.0));
    attach_entity(&mut graph, root, frog(&game), Vec2::new(100.0, 0.0));
    attach_entity(&mut graph, root, frog(&game), Vec2::new(0.0, 300.0));
    // A wreck closer than anything else is not a target.
    let wreck = attach_entity(&mut graph, root, frog(&game), Vec2::new(12.0, 12.0));
    graph.entity_mut(wreck).unwrap().destroy();

    let quack = || NodeKind::Projectile(Projectile::new(ProjectileKind::Quack, &game));
    let near_origin = attach_entity(&mut graph, root, quack(), Vec2::new(10.0, 10.0));
    let near_bottom = attach_entity(&mut graph, root, quack(), Vec2::new(90.0, 290.0));

    run_guidance(&mut graph);

    let heading = graph.get::<Projectile>(near_origin).unwrap().target_direction();
    let expected = (Vec2::new(0.0, 0.0) - Vec2::new(10.0, 10.0)).normalize();
    assert!(heading.abs_diff_eq(expected, 1e-5));

    let heading = graph.get::<Projectile>(near_bottom).unwrap().target_direction();
    let expected = (Vec2::new(0.0, 300.0) - Vec2::new(90.0, 290.0)).normalize();
    assert!(heading.abs_diff_eq(expected, 1e-5));
}

#[test]
fn test_world_guidance_forgets_enemies_between_frames() {
    let mut world = quiet_world();
    let air = world.air_layer();
    let player = world.player();
    let origin = world.graph().world_position(player) + Vec2::new(0.0, -250.0);

    let near = Animal::new(AnimalKind::Frog, world.game());
    let near = spawn_animal(world.graph_mut(), air, near, origin + Vec2::new(-80.0, 0.0), 180.0);
    let far = Animal::new(AnimalKind::Frog, world.game());
    let far = spawn_animal(world.graph_mut(), air, far, origin + Vec2::new(150.0, 0.0), 180.0);
    let quack = NodeKind::Projectile(Projectile::new(ProjectileKind::Quack, world.game()));
    let quack = attach_entity(world.graph_mut(), air, quack, origin);

    world.update(DT);
    assert_eq!(world.guidance_targets(), 0);
    let heading = world.graph().get::<Projectile>(quack).unwrap().target_direction();
    assert!(heading.x < 0.0);

    world.graph_mut().remove_subtree(near);
    let expected = (world.graph().world_position(far) - world.graph().world_position(quack)).normalize();

    world.update(DT);
    assert_eq!(world.guidance_targets(), 0);
    let heading = world.graph().get::<Projectile>(quack).unwrap().target_direction();
    assert!(heading.abs_diff_eq(expected, 1e-4));
}

#[test]
fn test_guidance_tie_goes_to_first_enemy() {
    let game = game();
    let mut graph = SceneGraph::new();
    let root = graph.root();
    attach_entity(&mut graph, root, frog(&game), Vec2::new(0.0, 0.0));
    attach_entity(&mut graph, root, frog(&game), Vec2::new(100.0, 0.0));
    let quack = NodeKind::Projectile(Projectile::new(ProjectileKind::Quack, &game));
    let quack = attach_entity(&mut graph, root, quack, Vec2::new(50.0, 0.0));

    run_guidance(&mut graph);

    let heading = graph.get::<Projectile>(quack).unwrap().target_direction();
    assert!(heading.abs_diff_eq(Vec2::new(-1.0, 0.0), 1e-6));
}

#[test]
fn test_unguided_projectiles_ignore_guidance() {
    let game = game();
    let mut graph = SceneGraph::new();
    let root = graph.root();
    attach_entity(&mut graph, root, frog(&game), Vec2::new(0.0, 0.0));
    let laser = NodeKind::Projectile(Projectile::new(ProjectileKind::AlliedLaser, &game));
    let laser = attach_entity(&mut graph, root, laser, Vec2::new(50.0, 0.0));

    run_guidance(&mut graph);
    assert_eq!(graph.get::<Projectile>(laser).unwrap().target_direction(), Vec2::ZERO);
}

#[test]
fn test_guided_update_keeps_speed_and_turns() {
    let game = game();
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let quack = NodeKind::Projectile(Projectile::new(ProjectileKind::Quack, &game));
    let quack = attach_entity(&mut graph, root, quack, Vec2::ZERO);
    {
        let projectile = graph.get_mut::<Projectile>(quack).unwrap();
        projectile.set_velocity(Vec2::new(0.0, -150.0));
        projectile.guide_towards(Vec2::ZERO, Vec2::new(100.0, 0.0));
    }

    let SceneNode { transform, kind, .. } = graph.node_mut(quack).unwrap();
    let NodeKind::Projectile(projectile) = kind else {
        unreachable!("node is a projectile");
    };
    projectile.update(transform, DT);

    let velocity = projectile.velocity();
    assert_relative_eq!(velocity.length(), 150.0, epsilon = 1e-3);
    assert!(velocity.x > 0.0);
    assert!(transform.rotation > 0.0);
}

#[test]
fn test_nearest_on_empty_candidates_is_none() {
    assert_eq!(guidance::nearest(Vec2::ZERO, &[]), None);
}

// ---- Spawning ----

#[test]
fn test_schedule_takes_lowest_points_first() {
    let spawn = Vec2::new(500.0, 2000.0);
    let configured = [(100.0, 800.0), (0.0, 100.0), (-50.0, 300.0)].map(|(x, y)| SpawnPointConfig {
        kind: AnimalKind::Frog,
        x,
        y,
    });
    let mut schedule = EnemySchedule::from_config(spawn, &configured);
    assert_eq!(schedule.len(), 3);

    let battlefield = FloatRect::new(0.0, 1500.0, 1000.0, 800.0);
    let due = schedule.take_due(battlefield);
    let ys: Vec<f32> = due.iter().map(|p| p.y).collect();
    assert_eq!(ys, vec![1900.0, 1700.0]);
    assert_eq!(schedule.len(), 1);
    assert!(schedule.take_due(battlefield).is_empty());
}

#[test]
fn test_world_spawns_enemies_entering_battlefield() {
    let mut world = World::new(WorldConfig::default(), game());
    assert_eq!(world.pending_spawns(), 8);

    world.update(DT);
    // Offsets 100, 100, 200 and 300 lie inside the first battlefield.
    assert_eq!(world.pending_spawns(), 4);
    assert_eq!(count_category(&world, Category::ENEMY_ANIMAL), 4);

    let enemy = world
        .graph()
        .descendants(world.air_layer())
        .into_iter()
        .find(|&id| world.graph().node(id).unwrap().category() == Category::ENEMY_ANIMAL)
        .unwrap();
    assert_relative_eq!(world.graph().node(enemy).unwrap().transform.rotation, 180.0);
}

// ---- World queries ----

#[test]
fn test_battlefield_extends_view_upward() {
    let world = quiet_world();
    let view = world.view_bounds();
    let battlefield = world.battlefield_bounds();
    assert_relative_eq!(battlefield.top, view.top - 100.0);
    assert_relative_eq!(battlefield.bottom(), view.bottom());
    assert_relative_eq!(view.width, 1024.0);
}

#[test]
fn test_destroyed_player_fails_mission() {
    let mut world = quiet_world();
    assert_eq!(world.mission_status(), MissionStatus::Running);

    let player = world.player();
    world.graph_mut().get_mut::<Animal>(player).unwrap().destroy();
    assert!(world.has_alive_player());
    world.update(DT);
    assert!(!world.has_alive_player());
    assert_eq!(world.mission_status(), MissionStatus::Failure);
}

#[test]
fn test_player_status_lags_world_until_recorded() {
    let mut world = quiet_world();
    let mut input = Player::new(world.config().player_speed);
    let player = world.player();
    world.graph_mut().get_mut::<Animal>(player).unwrap().destroy();
    world.update(DT);

    assert_eq!(world.mission_status(), MissionStatus::Failure);
    assert_eq!(input.mission_status(), MissionStatus::Running);
    input.set_mission_status(world.mission_status());
    assert_eq!(input.mission_status(), MissionStatus::Failure);
}

#[test]
fn test_player_reaching_end_succeeds() {
    let config = WorldConfig {
        world_height: 768.0,
        ..quiet_config()
    };
    let mut world = World::new(config, game());
    let mut frames = 0;
    while world.mission_status() == MissionStatus::Running && frames < 3000 {
        world.update(DT);
        frames += 1;
    }
    assert_eq!(world.mission_status(), MissionStatus::Success);
    assert!(world.has_player_reached_end());
}

// ---- Entities ----

#[test]
fn test_pickup_effects() {
    let game = game();
    let mut duck = Animal::new(AnimalKind::Duck, &game);
    duck.apply_pickup(PickupEffect::Repair { hitpoints: 25 });
    duck.apply_pickup(PickupEffect::CollectQuacks { count: 3 });
    for _ in 0..5 {
        duck.apply_pickup(PickupEffect::IncreaseSpread);
    }
    for _ in 0..20 {
        duck.apply_pickup(PickupEffect::IncreaseFireRate);
    }
    assert_eq!(duck.hitpoints(), 125);
    assert_eq!(duck.quacks(), 5);
    assert_eq!(duck.spread_level(), 3);
    assert_eq!(duck.fire_rate_level(), 10);
}

#[test]
fn test_launch_quack_without_ammo_is_ignored() {
    let game = game();
    let mut duck = Animal::new(AnimalKind::Duck, &game);
    duck.launch_quack();
    duck.launch_quack();
    duck.launch_quack();
    assert_eq!(duck.quacks(), 0);
}

#[test]
fn test_repair_does_not_revive() {
    let game = game();
    let mut enemy = Animal::new(AnimalKind::Frog, &game);
    enemy.damage(50);
    enemy.repair(100);
    assert!(enemy.is_destroyed());
}

#[test]
fn test_categories_per_variant() {
    let game = game();
    assert_eq!(Animal::new(AnimalKind::Duck, &game).category(), Category::PLAYER_ANIMAL);
    assert_eq!(Animal::new(AnimalKind::Frog, &game).category(), Category::ENEMY_ANIMAL);
    assert_eq!(
        Projectile::new(ProjectileKind::EnemyLaser, &game).category(),
        Category::ENEMY_PROJECTILE
    );
    assert_eq!(
        Projectile::new(ProjectileKind::Quack, &game).category(),
        Category::ALLIED_PROJECTILE
    );
}

#[test]
fn test_movement_pattern_switches_legs() {
    let mut tables = DataTables::standard();
    let data = tables.animals.get_mut(&AnimalKind::Frog).unwrap();
    data.speed = 60.0;
    data.directions = vec![
        Direction {
            angle: 0.0,
            distance: 1.5,
        },
        Direction {
            angle: 90.0,
            distance: 1.5,
        },
    ];
    let game = GameContext::headless(tables).unwrap();
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let enemy = attach_entity(&mut graph, root, frog(&game), Vec2::ZERO);

    let mut commands = CommandQueue::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut ctx = UpdateContext {
        commands: &mut commands,
        rng: &mut rng,
        game: &game,
        pickup_drop_chance: 3,
    };

    // Angle zero heads straight down.
    graph.update(DT, &mut ctx);
    let velocity = graph.get::<Animal>(enemy).unwrap().velocity();
    assert_relative_eq!(velocity.x, 0.0, epsilon = 1e-3);
    assert_relative_eq!(velocity.y, 60.0, epsilon = 1e-3);

    graph.update(DT, &mut ctx);
    graph.update(DT, &mut ctx);
    let velocity = graph.get::<Animal>(enemy).unwrap().velocity();
    assert_relative_eq!(velocity.x, -60.0, epsilon = 1e-3);
    assert_relative_eq!(velocity.y, 0.0, epsilon = 1e-3);
    assert!(!commands.is_empty());
}

// ---- Input ----

#[test]
fn test_default_key_bindings() {
    let input = Player::new(200.0);
    assert_eq!(input.assigned_key(PlayerAction::MoveLeft), Some(Key::Left));
    assert_eq!(input.assigned_key(PlayerAction::Fire), Some(Key::Q));
    assert_eq!(input.assigned_key(PlayerAction::LaunchQuack), Some(Key::W));
}

#[test]
fn test_assign_key_replaces_old_binding() {
    let mut input = Player::new(200.0);
    input.assign_key(PlayerAction::Fire, Key::Space);
    assert_eq!(input.assigned_key(PlayerAction::Fire), Some(Key::Space));

    let mut queue = CommandQueue::new();
    input.handle_realtime_input(|key| key == Key::Q, &mut queue);
    assert!(queue.is_empty());
    input.handle_realtime_input(|key| key == Key::Space, &mut queue);
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.pop().category, Category::PLAYER_ANIMAL);
}

#[test]
fn test_events_only_trigger_one_shot_actions() {
    let input = Player::new(200.0);
    let mut queue = CommandQueue::new();

    input.handle_event(&InputEvent::KeyPressed { key: Key::Q }, &mut queue);
    input.handle_event(&InputEvent::KeyReleased { key: Key::W }, &mut queue);
    assert!(queue.is_empty());

    input.handle_event(&InputEvent::KeyPressed { key: Key::W }, &mut queue);
    assert_eq!(queue.len(), 1);

    // Held one-shot keys do nothing in the realtime pass.
    input.handle_realtime_input(|key| key == Key::W, &mut queue);
    assert_eq!(queue.len(), 1);
}

// ---- Context ----

#[test]
fn test_context_rejects_missing_texture() {
    let mut textures = TextureHolder::new();
    textures.insert(
        TextureId::Water,
        TextureInfo { size: Vec2::ONE },
    );
    let mut fonts = FontHolder::new();
    fonts.insert(
        FontId::Main,
        FontInfo {
            name: "test".to_string(),
        },
    );

    let err = GameContext::new(DataTables::standard(), textures, fonts).unwrap_err();
    assert!(matches!(err, ContextError::Resource(ResourceError::Missing(_))));
}

#[test]
fn test_context_rejects_missing_table_row() {
    let mut tables = DataTables::standard();
    tables.animals.remove(&AnimalKind::Frog);

    match GameContext::headless(tables) {
        Err(ContextError::Tables(ConfigError::MissingTableEntry(name))) => {
            assert_eq!(name, "Frog")
        }
        other => panic!("expected a missing table entry, got {other:?}"),
    }
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut world_a = World::new(WorldConfig::default(), game());
    let mut world_b = World::new(WorldConfig::default(), game());
    let input = Player::new(200.0);

    for frame in 0..600 {
        let held = |key: Key| key == Key::Q || (frame % 90 < 45 && key == Key::Left);
        input.handle_realtime_input(held, world_a.command_queue_mut());
        input.handle_realtime_input(held, world_b.command_queue_mut());
        world_a.update(DT);
        world_b.update(DT);

        let json_a = serde_json::to_string(&world_a.snapshot()).unwrap();
        let json_b = serde_json::to_string(&world_b.snapshot()).unwrap();
        assert_eq!(json_a, json_b, "snapshots diverged at frame {frame}");
    }
}
