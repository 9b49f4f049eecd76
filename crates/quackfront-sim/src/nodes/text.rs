//! Text labels, optionally bound to the animal they are attached to.

use glam::Vec2;

use quackfront_core::constants::{HEALTH_DISPLAY_OFFSET, QUACK_DISPLAY_OFFSET};
use quackfront_core::enums::FontId;
use quackfront_core::types::Transform;

use crate::render::Visual;

/// What a bound label shows about its parent animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBinding {
    Health,
    QuackAmmo,
}

/// Parent state a bound label reads each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimalReadout {
    pub hitpoints: i32,
    pub quacks: u32,
    /// Parent rotation in degrees.
    pub rotation: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub font: FontId,
    pub string: String,
    pub binding: Option<TextBinding>,
}

impl TextNode {
    pub fn new(font: FontId, string: impl Into<String>) -> Self {
        Self {
            font,
            string: string.into(),
            binding: None,
        }
    }

    pub fn bound(font: FontId, binding: TextBinding) -> Self {
        Self {
            font,
            string: String::new(),
            binding: Some(binding),
        }
    }

    /// Rewrite the label from its parent's state. The health label cancels
    /// the parent's rotation; the ammo label keeps the parent's.
    pub(crate) fn refresh(&mut self, transform: &mut Transform, readout: &AnimalReadout) {
        let Some(binding) = self.binding else {
            return;
        };
        match binding {
            TextBinding::Health => {
                self.string = format!("{} HP", readout.hitpoints);
                transform.position = Vec2::new(0.0, HEALTH_DISPLAY_OFFSET);
                transform.rotation = -readout.rotation;
            }
            TextBinding::QuackAmmo => {
                self.string = if readout.quacks > 0 {
                    format!("QUACKS: {}", readout.quacks)
                } else {
                    String::new()
                };
                transform.position = Vec2::new(0.0, QUACK_DISPLAY_OFFSET);
                transform.rotation = 0.0;
            }
        }
    }

    /// Empty labels draw nothing.
    pub fn visual(&self) -> Option<Visual> {
        if self.string.is_empty() {
            return None;
        }
        Some(Visual::Text {
            font: self.font,
            string: self.string.clone(),
        })
    }
}
