//! Read-only game context injected into entity constructors.

use std::rc::Rc;

use glam::Vec2;

use quackfront_core::config::ConfigError;
use quackfront_core::enums::{FontId, TextureId};
use quackfront_core::resources::{FontHolder, FontInfo, ResourceError, TextureHolder, TextureInfo};
use quackfront_core::tables::DataTables;

/// Setup failures caught before the first frame.
#[derive(thiserror::Error, Debug)]
pub enum ContextError {
    #[error("Invalid tables: {0}")]
    Tables(#[from] ConfigError),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Gameplay tables and resource handles, shared by reference count.
///
/// Built once, before the first frame. Cloning is cheap and every clone sees
/// the same immutable data.
#[derive(Debug, Clone)]
pub struct GameContext {
    pub tables: Rc<DataTables>,
    pub textures: Rc<TextureHolder>,
    pub fonts: Rc<FontHolder>,
}

impl GameContext {
    /// Bundle the collaborators, failing if a table row is missing or a
    /// table or the scene references a resource that was never loaded.
    pub fn new(
        tables: DataTables,
        textures: TextureHolder,
        fonts: FontHolder,
    ) -> Result<Self, ContextError> {
        tables.validate()?;
        for id in tables.referenced_textures() {
            textures.get(id)?;
        }
        textures.get(TextureId::Water)?;
        fonts.get(FontId::Main)?;

        Ok(Self {
            tables: Rc::new(tables),
            textures: Rc::new(textures),
            fonts: Rc::new(fonts),
        })
    }

    /// Context with nominal sprite sizes, for hosts that never load real
    /// image files.
    pub fn headless(tables: DataTables) -> Result<Self, ContextError> {
        let mut textures = TextureHolder::new();
        for id in TextureId::ALL {
            textures.insert(id, TextureInfo { size: nominal_size(id) });
        }
        let mut fonts = FontHolder::new();
        fonts.insert(
            FontId::Main,
            FontInfo {
                name: "Sansation".to_string(),
            },
        );
        Self::new(tables, textures, fonts)
    }
}

fn nominal_size(id: TextureId) -> Vec2 {
    match id {
        TextureId::Duck | TextureId::Frog => Vec2::new(48.0, 48.0),
        TextureId::Duckling => Vec2::new(32.0, 32.0),
        TextureId::LaserBeam => Vec2::new(8.0, 24.0),
        TextureId::Quack => Vec2::new(16.0, 16.0),
        TextureId::HealthRefill
        | TextureId::QuackRefill
        | TextureId::FireSpread
        | TextureId::FireRate => Vec2::new(32.0, 32.0),
        TextureId::Water => Vec2::new(256.0, 256.0),
        TextureId::TitleScreen => Vec2::new(1024.0, 768.0),
    }
}
