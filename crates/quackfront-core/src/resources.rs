//! Read-only resource holders.
//!
//! Loading and decoding assets is the host's business; the simulation only
//! needs to look up metadata (texture sizes, font names) by identifier.

use std::collections::HashMap;
use std::hash::Hash;

use glam::Vec2;

use crate::enums::{FontId, TextureId};

/// Metadata of a loaded texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureInfo {
    pub size: Vec2,
}

/// Metadata of a loaded font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontInfo {
    pub name: String,
}

/// Identifier-keyed store of immutable resource handles.
#[derive(Debug, Clone)]
pub struct ResourceHolder<K, R> {
    resources: HashMap<K, R>,
}

pub type TextureHolder = ResourceHolder<TextureId, TextureInfo>;
pub type FontHolder = ResourceHolder<FontId, FontInfo>;

impl<K, R> Default for ResourceHolder<K, R> {
    fn default() -> Self {
        Self {
            resources: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Copy + std::fmt::Debug, R> ResourceHolder<K, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource. Returns the handle it replaced, if any.
    pub fn insert(&mut self, id: K, resource: R) -> Option<R> {
        self.resources.insert(id, resource)
    }

    pub fn get(&self, id: K) -> Result<&R, ResourceError> {
        self.resources
            .get(&id)
            .ok_or_else(|| ResourceError::Missing(format!("{id:?}")))
    }

    pub fn contains(&self, id: K) -> bool {
        self.resources.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl TextureHolder {
    /// Size of a texture, or zero (and a warning) if it was never registered.
    pub fn size_of(&self, id: TextureId) -> Vec2 {
        match self.get(id) {
            Ok(info) => info.size,
            Err(err) => {
                log::warn!("{err}, treating as zero-sized");
                Vec2::ZERO
            }
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Resource not loaded: {0}")]
    Missing(String),
}
