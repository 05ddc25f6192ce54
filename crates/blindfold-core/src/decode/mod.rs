//! Asset decoding for Blindfold.
//!
//! This module turns raw file bytes into ready-to-draw raster handles:
//! - The user's uploaded photo (EXIF orientation applied)
//! - The bundled sprite asset (decoded as authored)
//!
//! All operations are synchronous. The browser host reads the file, then
//! hands the bytes over in one call.

mod raster;
mod types;

pub use raster::{decode_image, decode_image_no_orientation};
pub use types::{DecodeError, DecodedImage, Orientation};
