//! Scene node categories, used to route commands and filter collisions.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Gameplay role of a scene node.
    ///
    /// A command targeting `A | B` reaches every node carrying `A` or `B`.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Category: u32 {
        const SCENE_AIR_LAYER   = 1 << 0;
        const PLAYER_ANIMAL     = 1 << 1;
        const ALLIED_ANIMAL     = 1 << 2;
        const ENEMY_ANIMAL      = 1 << 3;
        const PICKUP            = 1 << 4;
        const ALLIED_PROJECTILE = 1 << 5;
        const ENEMY_PROJECTILE  = 1 << 6;

        const ANIMAL = Self::PLAYER_ANIMAL.bits()
            | Self::ALLIED_ANIMAL.bits()
            | Self::ENEMY_ANIMAL.bits();
        const PROJECTILE = Self::ALLIED_PROJECTILE.bits() | Self::ENEMY_PROJECTILE.bits();
    }
}

impl Category {
    /// The empty category. Nodes default to it and no command reaches them.
    pub const NONE: Category = Category::empty();

    /// True when the two masks share at least one role bit.
    pub fn matches(self, other: Category) -> bool {
        self.intersects(other)
    }
}
