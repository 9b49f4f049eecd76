use quackfront_core::enums::TextureId;
use quackfront_core::types::FloatRect;

use crate::render::Visual;

/// Static textured rectangle, e.g. the scrolling background.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteNode {
    pub texture: TextureId,
    /// Local-space rectangle the texture is stretched or tiled over.
    pub rect: FloatRect,
}

impl SpriteNode {
    pub fn new(texture: TextureId, rect: FloatRect) -> Self {
        Self { texture, rect }
    }

    pub fn visual(&self) -> Visual {
        Visual::Sprite {
            texture: self.texture,
            rect: self.rect,
        }
    }
}
