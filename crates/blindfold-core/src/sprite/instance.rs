//! A single placed sprite and its transform state.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Point, Size, SpritePlacement};

/// Stable handle for a sprite instance, unaffected by reordering or deletion
/// of other instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteId(Uuid);

impl SpriteId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SpriteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One placed sprite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteInstance {
    pub id: SpriteId,
    /// Pivot point in canvas space.
    pub position: Point,
    /// Rotation in degrees, kept in `[0, 360)` by the collection.
    pub rotation_degrees: f64,
    /// Uniform scale, kept within the configured bounds by the collection.
    pub scale: f64,
}

impl SpriteInstance {
    /// Build an instance as-is; no clamping is applied on construction.
    pub fn new(position: Point, rotation_degrees: f64, scale: f64) -> Self {
        Self {
            id: SpriteId::new(),
            position,
            rotation_degrees,
            scale,
        }
    }

    /// Resolve where this instance lands on the canvas for a raster of the
    /// given size fit into `box_size`.
    pub fn placement(&self, raster: Size, box_size: Size) -> SpritePlacement {
        SpritePlacement::new(
            self.position,
            self.rotation_degrees,
            self.scale,
            raster,
            box_size,
        )
    }
}
