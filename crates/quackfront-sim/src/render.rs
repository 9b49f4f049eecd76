//! Seam to the rendering backend.
//!
//! The scene graph emits `(world transform, visual)` pairs; turning them into
//! pixels is the backend's job.

use glam::Affine2;

use quackfront_core::enums::{FontId, TextureId};
use quackfront_core::types::FloatRect;

/// Something drawable, in the node's local space.
#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    /// A textured rectangle.
    Sprite { texture: TextureId, rect: FloatRect },
    Text { font: FontId, string: String },
}

/// Receiver of draw calls.
pub trait RenderTarget {
    fn draw(&mut self, transform: Affine2, visual: &Visual);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub transform: Affine2,
    pub visual: Visual,
}

/// In-memory render target that records draw calls in submission order.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub calls: Vec<DrawCall>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Number of recorded sprites drawn with `texture`.
    pub fn count_sprites(&self, texture: TextureId) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call.visual, Visual::Sprite { texture: t, .. } if t == texture))
            .count()
    }
}

impl RenderTarget for DrawList {
    fn draw(&mut self, transform: Affine2, visual: &Visual) {
        self.calls.push(DrawCall {
            transform,
            visual: visual.clone(),
        });
    }
}
