//! Image encoding for export.
//!
//! The compositor's RGBA surface is written out as lossless PNG.
//! All operations are synchronous and single-threaded.

mod png;

pub use png::{encode_png, EncodeError, PNG_SIGNATURE};
