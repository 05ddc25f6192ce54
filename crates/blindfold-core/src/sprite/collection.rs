//! Ordered collection of placed sprites.
//!
//! Insertion order is render order: later instances draw on top. All
//! mutators address instances by index and silently ignore indices that are
//! out of range.

use serde::Serialize;

use super::instance::{SpriteId, SpriteInstance};
use crate::config::{EditorConfig, SpriteDefaults};
use crate::geometry::{normalize_degrees, Point, Rect};

/// Bounds enforced on every transform update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpriteLimits {
    pub safe_area: Rect,
    pub min_scale: f64,
    pub max_scale: f64,
    pub defaults: SpriteDefaults,
}

impl SpriteLimits {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            safe_area: config.safe_area,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            defaults: config.sprite_defaults,
        }
    }
}

impl Default for SpriteLimits {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpriteCollection {
    sprites: Vec<SpriteInstance>,
    limits: SpriteLimits,
}

impl SpriteCollection {
    pub fn new(limits: SpriteLimits) -> Self {
        Self {
            sprites: Vec::new(),
            limits,
        }
    }

    /// Append a sprite with the default transform. The new sprite is not
    /// selected.
    pub fn add(&mut self) -> SpriteId {
        let d = self.limits.defaults;
        let sprite = SpriteInstance::new(d.position, d.rotation_degrees, d.scale);
        let id = sprite.id;
        self.sprites.push(sprite);
        id
    }

    /// Remove the sprite at `index`, shifting later sprites down by one.
    pub fn remove(&mut self, index: usize) -> Option<SpriteInstance> {
        if index < self.sprites.len() {
            Some(self.sprites.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
    }

    /// Move a sprite, clamping into the safe area.
    pub fn update_position(&mut self, index: usize, x: f64, y: f64) {
        let safe = self.limits.safe_area;
        if let Some(sprite) = self.sprites.get_mut(index) {
            sprite.position = safe.clamp(Point::new(x, y));
        }
    }

    /// Rotate a sprite by `delta_degrees`, normalizing into `[0, 360)`.
    pub fn update_rotation(&mut self, index: usize, delta_degrees: f64) {
        if let Some(sprite) = self.sprites.get_mut(index) {
            sprite.rotation_degrees = normalize_degrees(sprite.rotation_degrees + delta_degrees);
        }
    }

    /// Change a sprite's scale by `delta`, clamped to the scale bounds.
    pub fn update_scale(&mut self, index: usize, delta: f64) {
        let (min, max) = (self.limits.min_scale, self.limits.max_scale);
        if let Some(sprite) = self.sprites.get_mut(index) {
            sprite.scale = (sprite.scale + delta).clamp(min, max);
        }
    }

    pub fn get(&self, index: usize) -> Option<&SpriteInstance> {
        self.sprites.get(index)
    }

    pub fn index_of(&self, id: SpriteId) -> Option<usize> {
        self.sprites.iter().position(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Sprites in render order.
    pub fn iter(&self) -> std::slice::Iter<'_, SpriteInstance> {
        self.sprites.iter()
    }
}

impl<'a> IntoIterator for &'a SpriteCollection {
    type Item = &'a SpriteInstance;
    type IntoIter = std::slice::Iter<'a, SpriteInstance>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
