//! Scene construction: layers, background, the player, and the animal
//! factory shared with the enemy spawner.

use glam::Vec2;

use quackfront_core::category::Category;
use quackfront_core::config::WorldConfig;
use quackfront_core::enums::{AnimalKind, FontId, Layer, TextureId};
use quackfront_core::types::FloatRect;

use crate::context::GameContext;
use crate::graph::{NodeId, SceneGraph, SceneNode};
use crate::nodes::{Animal, NodeKind, SpriteNode, TextBinding, TextNode};

/// Ids of the nodes the world keeps track of after setup.
#[derive(Debug, Clone, Copy)]
pub struct SceneLayout {
    pub background: NodeId,
    pub air: NodeId,
    pub player: NodeId,
}

/// Whole-level rectangle, from the top of the level to its bottom.
pub fn world_bounds(config: &WorldConfig) -> FloatRect {
    FloatRect::new(0.0, 0.0, config.view_width, config.world_height)
}

/// The player starts horizontally centred, one half view above the bottom.
pub fn spawn_position(config: &WorldConfig) -> Vec2 {
    Vec2::new(
        config.view_width / 2.0,
        config.world_height - config.view_height / 2.0,
    )
}

/// Build the initial scene under `graph`'s root.
pub fn build_scene(graph: &mut SceneGraph, game: &GameContext, config: &WorldConfig) -> SceneLayout {
    let root = graph.root();
    let [background, air] = Layer::ALL.map(|layer| {
        let category = match layer {
            Layer::Background => Category::NONE,
            Layer::Air => Category::SCENE_AIR_LAYER,
        };
        graph.attach(root, SceneNode::plain().with_category(category))
    });

    // Background covers the whole level.
    let bounds = world_bounds(config);
    let water = SpriteNode::new(TextureId::Water, FloatRect::new(0.0, 0.0, bounds.width, bounds.height));
    graph.attach(
        background,
        SceneNode::new(NodeKind::Sprite(water)).with_position(Vec2::new(bounds.left, bounds.top)),
    );

    let mut duck = Animal::new(AnimalKind::Duck, game);
    duck.set_velocity(Vec2::new(config.player_scroll_bias, config.scroll_speed));
    let player = spawn_animal(graph, air, duck, spawn_position(config), 0.0);

    SceneLayout {
        background,
        air,
        player,
    }
}

/// Attach `animal` under `parent` together with its status labels.
pub fn spawn_animal(
    graph: &mut SceneGraph,
    parent: NodeId,
    animal: Animal,
    position: Vec2,
    rotation: f32,
) -> NodeId {
    let allied = animal.is_allied();
    let node = SceneNode::new(NodeKind::Animal(animal))
        .with_position(position)
        .with_rotation(rotation);
    let id = graph.attach(parent, node);

    let health = TextNode::bound(FontId::Main, TextBinding::Health);
    graph.attach(id, SceneNode::new(NodeKind::Text(health)));
    if allied {
        let ammo = TextNode::bound(FontId::Main, TextBinding::QuackAmmo);
        graph.attach(id, SceneNode::new(NodeKind::Text(ammo)));
    }
    id
}
