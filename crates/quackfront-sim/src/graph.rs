//! Scene graph: an arena-backed tree of positioned nodes.
//!
//! The graph owns every node. Structurally, each parent exclusively owns the
//! nodes listed in its `children`; the `parent` link is a plain id and never
//! keeps anything alive. World transforms are composed on demand from the
//! local transforms along the root-to-node path and are never cached.
//!
//! The four recursive passes (`update`, `draw`, `on_command`,
//! `remove_wrecks`) walk children by index, so a node attached during a pass
//! is visited by that same pass and a node that disappears is skipped.

use glam::{Affine2, Vec2};
use rand_chacha::ChaCha8Rng;
use slotmap::{new_key_type, SlotMap};

use quackfront_core::category::Category;
use quackfront_core::types::{FloatRect, Transform};

use crate::command::{Command, CommandQueue};
use crate::context::GameContext;
use crate::nodes::entity::EntityCore;
use crate::nodes::text::AnimalReadout;
use crate::nodes::NodeKind;
use crate::render::RenderTarget;

new_key_type! {
    /// Stable handle for a scene node, backed by a generational slot map.
    pub struct NodeId;
}

/// Node payloads that commands and systems can address by type.
pub trait NodeVariant: Sized + 'static {
    fn from_kind(kind: &NodeKind) -> Option<&Self>;
    fn from_kind_mut(kind: &mut NodeKind) -> Option<&mut Self>;
}

/// Everything a node may need during the regular update pass.
pub struct UpdateContext<'a> {
    pub commands: &'a mut CommandQueue,
    pub rng: &'a mut ChaCha8Rng,
    pub game: &'a GameContext,
    /// Enemies drop a pickup with probability 1 / `pickup_drop_chance`.
    pub pickup_drop_chance: u32,
}

/// A tree element: local transform, category, links, and variant payload.
#[derive(Debug)]
pub struct SceneNode {
    pub transform: Transform,
    category: Category,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub kind: NodeKind,
}

impl SceneNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            transform: Transform::default(),
            category: Category::NONE,
            parent: None,
            children: Vec::new(),
            kind,
        }
    }

    /// A node with no payload, used for the root and layers.
    pub fn plain() -> Self {
        Self::new(NodeKind::Plain)
    }

    /// Category for plain nodes. Entity variants report their own.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.transform.rotation = degrees;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn category(&self) -> Category {
        self.kind.category().unwrap_or(self.category)
    }

    pub fn is_destroyed(&self) -> bool {
        self.kind.is_destroyed()
    }

    /// Only entities ever become eligible for removal.
    pub fn is_marked_for_removal(&self) -> bool {
        self.kind.is_marked_for_removal()
    }
}

/// The tree. Always has a root.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
    root: NodeId,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::plain());
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    /// Typed view of a node's payload, if it is a `T`.
    pub fn get<T: NodeVariant>(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id).and_then(|node| T::from_kind(&node.kind))
    }

    pub fn get_mut<T: NodeVariant>(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id).and_then(|node| T::from_kind_mut(&mut node.kind))
    }

    /// Shared entity state, if the node is an entity of any variant.
    pub fn entity(&self, id: NodeId) -> Option<&EntityCore> {
        self.nodes.get(id).and_then(|node| node.kind.entity())
    }

    pub fn entity_mut(&mut self, id: NodeId) -> Option<&mut EntityCore> {
        self.nodes.get_mut(id).and_then(|node| node.kind.entity_mut())
    }

    /// Two distinct nodes borrowed mutably at once. `None` if either is
    /// missing or `a == b`.
    pub fn pair_mut(&mut self, a: NodeId, b: NodeId) -> Option<[&mut SceneNode; 2]> {
        self.nodes.get_disjoint_mut([a, b])
    }

    fn expect_node(&self, id: NodeId) -> &SceneNode {
        match self.nodes.get(id) {
            Some(node) => node,
            None => panic!("scene node {id:?} does not exist"),
        }
    }

    fn expect_node_mut(&mut self, id: NodeId) -> &mut SceneNode {
        match self.nodes.get_mut(id) {
            Some(node) => node,
            None => panic!("scene node {id:?} does not exist"),
        }
    }

    fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.nodes.get(id)?.children.get(index).copied()
    }

    // ---- Structure ----

    /// Move a new node into the graph as the last child of `parent`.
    pub fn attach(&mut self, parent: NodeId, mut node: SceneNode) -> NodeId {
        self.expect_node(parent);
        node.parent = Some(parent);
        node.children.clear();
        let id = self.nodes.insert(node);
        self.expect_node_mut(parent).children.push(id);
        id
    }

    /// Re-attach a parentless subtree (e.g. one returned by `detach_child`).
    ///
    /// # Panics
    /// If either node is unknown, `child` already has a parent, or `child`
    /// is `parent` or one of its ancestors.
    pub fn attach_child(&mut self, parent: NodeId, child: NodeId) {
        self.expect_node(parent);
        if self.expect_node(child).parent.is_some() || child == self.root {
            panic!("cannot attach {child:?}: it already has a parent");
        }
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                panic!("cannot attach {child:?} below its own descendant {parent:?}");
            }
            cursor = self.nodes[id].parent;
        }
        self.expect_node_mut(child).parent = Some(parent);
        self.expect_node_mut(parent).children.push(child);
    }

    /// Unlink `child` from `parent`. The subtree stays in the graph as a
    /// parentless root until re-attached or dropped with `remove_subtree`.
    ///
    /// # Panics
    /// If `child` is not a direct child of `parent`.
    pub fn detach_child(&mut self, parent: NodeId, child: NodeId) -> NodeId {
        let siblings = &mut self.expect_node_mut(parent).children;
        let Some(index) = siblings.iter().position(|&c| c == child) else {
            panic!("{child:?} is not a child of {parent:?}");
        };
        siblings.remove(index);
        self.expect_node_mut(child).parent = None;
        child
    }

    /// Remove a node and its entire subtree from the graph. Returns the
    /// number of nodes removed.
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        if id == self.root {
            panic!("the root node cannot be removed");
        }
        if let Some(parent) = self.expect_node(id).parent {
            self.detach_child(parent, id);
        }
        self.drop_subtree(id)
    }

    fn drop_subtree(&mut self, id: NodeId) -> usize {
        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        removed
    }

    /// `id` and all of its descendants, pre-order, children in insertion order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get(next) {
                order.push(next);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }

    // ---- Transforms & bounds ----

    /// Composition of the local transforms from the root down to `id`.
    pub fn world_transform(&self, id: NodeId) -> Affine2 {
        let mut transform = self.expect_node(id).transform.to_affine();
        let mut cursor = self.nodes[id].parent;
        while let Some(parent) = cursor {
            let node = &self.nodes[parent];
            transform = node.transform.to_affine() * transform;
            cursor = node.parent;
        }
        transform
    }

    pub fn world_position(&self, id: NodeId) -> Vec2 {
        self.world_transform(id).translation
    }

    /// World-space bounds used for collision and culling. Nodes without a
    /// visual extent report an empty rectangle, which collides with nothing.
    pub fn bounding_rect(&self, id: NodeId) -> FloatRect {
        match self.expect_node(id).kind.local_bounds() {
            Some(local) => local.transformed(&self.world_transform(id)),
            None => FloatRect::default(),
        }
    }

    // ---- Recursive passes ----

    /// Run each node's update hook, parents before children.
    pub fn update(&mut self, dt: f32, ctx: &mut UpdateContext<'_>) {
        self.update_node(self.root, dt, ctx);
    }

    fn update_node(&mut self, id: NodeId, dt: f32, ctx: &mut UpdateContext<'_>) {
        self.update_current(id, dt, ctx);
        let mut index = 0;
        while let Some(child) = self.child_at(id, index) {
            self.update_node(child, dt, ctx);
            index += 1;
        }
    }

    fn update_current(&mut self, id: NodeId, dt: f32, ctx: &mut UpdateContext<'_>) {
        let readout = self.parent_readout(id);
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let SceneNode { transform, kind, .. } = node;
        match kind {
            NodeKind::Animal(animal) => animal.update(id, transform, dt, ctx),
            NodeKind::Projectile(projectile) => projectile.update(transform, dt),
            NodeKind::Pickup(pickup) => pickup.update(transform, dt),
            NodeKind::Text(text) => {
                if let Some(readout) = readout {
                    text.refresh(transform, &readout);
                }
            }
            NodeKind::Sprite(_) | NodeKind::Plain => {}
        }
    }

    /// State of a bound text node's parent animal, read before the text is
    /// borrowed mutably.
    fn parent_readout(&self, id: NodeId) -> Option<AnimalReadout> {
        let node = self.nodes.get(id)?;
        if !matches!(&node.kind, NodeKind::Text(text) if text.binding.is_some()) {
            return None;
        }
        let parent = self.nodes.get(node.parent?)?;
        match &parent.kind {
            NodeKind::Animal(animal) if !animal.is_destroyed() => Some(AnimalReadout {
                hitpoints: animal.hitpoints(),
                quacks: animal.quacks(),
                rotation: parent.transform.rotation,
            }),
            _ => None,
        }
    }

    /// Emit draw calls for the whole tree, parents before children.
    pub fn draw(&self, target: &mut dyn RenderTarget) {
        self.draw_node(self.root, target, Affine2::IDENTITY);
    }

    /// Draw `id` and its subtree under an inherited transform. Destroyed
    /// entities are not drawn, and neither is anything attached to them.
    pub fn draw_node(&self, id: NodeId, target: &mut dyn RenderTarget, inherited: Affine2) {
        let node = self.expect_node(id);
        if node.is_destroyed() {
            return;
        }
        let combined = inherited * node.transform.to_affine();
        if let Some(visual) = node.kind.visual() {
            target.draw(combined, &visual);
        }
        for &child in &node.children {
            self.draw_node(child, target, combined);
        }
    }

    /// Apply `command` to every node whose category intersects the
    /// command's, then continue into all children regardless of the match.
    pub fn on_command(&mut self, command: &Command, dt: f32) {
        self.command_node(self.root, command, dt);
    }

    fn command_node(&mut self, id: NodeId, command: &Command, dt: f32) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if command.category.matches(node.category()) {
            command.execute(self, id, dt);
        }
        let mut index = 0;
        while let Some(child) = self.child_at(id, index) {
            self.command_node(child, command, dt);
            index += 1;
        }
    }

    /// Post-order sweep: prune every child marked for removal together with
    /// its subtree. Returns the number of nodes removed.
    pub fn remove_wrecks(&mut self) -> usize {
        self.remove_wrecks_under(self.root)
    }

    fn remove_wrecks_under(&mut self, id: NodeId) -> usize {
        let mut removed = 0;
        let mut index = 0;
        while let Some(child) = self.child_at(id, index) {
            removed += self.remove_wrecks_under(child);
            index += 1;
        }

        let wrecks: Vec<NodeId> = self.nodes[id]
            .children
            .iter()
            .copied()
            .filter(|&child| self.nodes[child].is_marked_for_removal())
            .collect();
        if wrecks.is_empty() {
            return removed;
        }

        self.nodes[id].children.retain(|child| !wrecks.contains(child));
        for wreck in wrecks {
            removed += self.drop_subtree(wreck);
        }
        removed
    }
}
