//! Node variants: the closed set of payloads a scene node can carry.
//!
//! One traversal algorithm in `graph` dispatches to the active variant's
//! hooks through `NodeKind`.

pub mod animal;
pub mod entity;
pub mod pickup;
pub mod projectile;
pub mod sprite;
pub mod text;

use quackfront_core::category::Category;
use quackfront_core::types::FloatRect;

use crate::graph::NodeVariant;
use crate::render::Visual;

pub use animal::Animal;
pub use entity::EntityCore;
pub use pickup::Pickup;
pub use projectile::Projectile;
pub use sprite::SpriteNode;
pub use text::{TextBinding, TextNode};

#[derive(Debug)]
pub enum NodeKind {
    /// Root, layers, and other grouping nodes.
    Plain,
    Sprite(SpriteNode),
    Text(TextNode),
    Animal(Animal),
    Projectile(Projectile),
    Pickup(Pickup),
}

impl NodeKind {
    /// Category reported by the variant itself; `None` for plain nodes,
    /// which use the category stored on the scene node.
    pub fn category(&self) -> Option<Category> {
        match self {
            NodeKind::Animal(animal) => Some(animal.category()),
            NodeKind::Projectile(projectile) => Some(projectile.category()),
            NodeKind::Pickup(_) => Some(Category::PICKUP),
            NodeKind::Plain | NodeKind::Sprite(_) | NodeKind::Text(_) => None,
        }
    }

    /// Local-space collision extent. Only entities have one.
    pub fn local_bounds(&self) -> Option<FloatRect> {
        match self {
            NodeKind::Animal(animal) => Some(animal.local_bounds()),
            NodeKind::Projectile(projectile) => Some(projectile.local_bounds()),
            NodeKind::Pickup(pickup) => Some(pickup.local_bounds()),
            NodeKind::Plain | NodeKind::Sprite(_) | NodeKind::Text(_) => None,
        }
    }

    pub fn entity(&self) -> Option<&EntityCore> {
        match self {
            NodeKind::Animal(animal) => Some(animal.entity()),
            NodeKind::Projectile(projectile) => Some(projectile.entity()),
            NodeKind::Pickup(pickup) => Some(pickup.entity()),
            NodeKind::Plain | NodeKind::Sprite(_) | NodeKind::Text(_) => None,
        }
    }

    pub fn entity_mut(&mut self) -> Option<&mut EntityCore> {
        match self {
            NodeKind::Animal(animal) => Some(animal.entity_mut()),
            NodeKind::Projectile(projectile) => Some(projectile.entity_mut()),
            NodeKind::Pickup(pickup) => Some(pickup.entity_mut()),
            NodeKind::Plain | NodeKind::Sprite(_) | NodeKind::Text(_) => None,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.entity().is_some_and(EntityCore::is_destroyed)
    }

    pub fn is_marked_for_removal(&self) -> bool {
        match self {
            NodeKind::Animal(animal) => animal.is_marked_for_removal(),
            NodeKind::Projectile(projectile) => projectile.entity().is_destroyed(),
            NodeKind::Pickup(pickup) => pickup.entity().is_destroyed(),
            NodeKind::Plain | NodeKind::Sprite(_) | NodeKind::Text(_) => false,
        }
    }

    pub fn visual(&self) -> Option<Visual> {
        match self {
            NodeKind::Plain => None,
            NodeKind::Sprite(sprite) => Some(sprite.visual()),
            NodeKind::Text(text) => text.visual(),
            NodeKind::Animal(animal) => Some(animal.visual()),
            NodeKind::Projectile(projectile) => Some(projectile.visual()),
            NodeKind::Pickup(pickup) => Some(pickup.visual()),
        }
    }
}

macro_rules! impl_node_variant {
    ($ty:ty, $variant:ident) => {
        impl NodeVariant for $ty {
            fn from_kind(kind: &NodeKind) -> Option<&Self> {
                match kind {
                    NodeKind::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_kind_mut(kind: &mut NodeKind) -> Option<&mut Self> {
                match kind {
                    NodeKind::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_node_variant!(Animal, Animal);
impl_node_variant!(Projectile, Projectile);
impl_node_variant!(Pickup, Pickup);
impl_node_variant!(SpriteNode, Sprite);
impl_node_variant!(TextNode, Text);
