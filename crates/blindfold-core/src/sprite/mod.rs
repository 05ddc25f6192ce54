//! Sprite collection model.
//!
//! A sprite instance is one placed copy of the overlay decoration. The
//! collection owns every instance and enforces the transform invariants:
//! positions clamp into the safe area on move, rotation normalizes into
//! `[0, 360)`, and scale clamps to the configured bounds.

mod collection;
mod instance;

pub use collection::{SpriteCollection, SpriteLimits};
pub use instance::{SpriteId, SpriteInstance};
