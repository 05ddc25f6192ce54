//! Export compositing.
//!
//! Produces the final RGBA surface from the background photo, the sprite
//! raster and the sprite collection. The surface is the canvas size; areas
//! not covered by the background stay transparent.

mod render;
mod sample;

pub use render::{CompositeError, Compositor};
pub use sample::{blend_over, sample_bilinear, Premultiplied};
