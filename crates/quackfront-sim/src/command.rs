//! Deferred, category-targeted commands and the queue that buffers them.
//!
//! Producers (input, entities, the world) push commands during a frame;
//! the world drains the queue into the scene graph at one fixed point.

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use quackfront_core::category::Category;

use crate::graph::{NodeId, NodeVariant, SceneGraph};

/// Type-erased command body. Receives the graph, the matching node and the
/// frame's elapsed seconds.
pub type Action = dyn Fn(&mut SceneGraph, NodeId, f32);

/// An action aimed at every node whose category intersects `category`.
#[derive(Clone)]
pub struct Command {
    pub category: Category,
    action: Rc<Action>,
}

impl Command {
    pub fn new(category: Category, action: impl Fn(&mut SceneGraph, NodeId, f32) + 'static) -> Self {
        Self {
            category,
            action: Rc::new(action),
        }
    }

    /// Command whose action only needs the node's variant payload.
    /// Matching nodes of another variant are left alone.
    pub fn derived<T: NodeVariant>(category: Category, action: impl Fn(&mut T, f32) + 'static) -> Self {
        Self::new(category, move |graph, node, dt| {
            if let Some(target) = graph.get_mut::<T>(node) {
                action(target, dt);
            }
        })
    }

    pub fn execute(&self, graph: &mut SceneGraph, node: NodeId, dt: f32) {
        (self.action)(graph, node, dt);
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// FIFO buffer of commands.
#[derive(Debug, Default)]
pub struct CommandQueue {
    queue: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    /// Remove and return the oldest command.
    ///
    /// # Panics
    /// Popping an empty queue is a contract violation; check `is_empty` first.
    pub fn pop(&mut self) -> Command {
        match self.queue.pop_front() {
            Some(command) => command,
            None => panic!("CommandQueue::pop called on an empty queue"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
