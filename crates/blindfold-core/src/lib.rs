//! Blindfold Core - sprite overlay editor engine
//!
//! This crate holds everything the Blindfold editor does apart from talking
//! to the browser: decoding the uploaded photo and the sprite asset, the
//! sprite transform model, the pointer/keyboard interaction state machine,
//! the preview layout and the export compositor.
//!
//! # Module Structure
//!
//! - `geometry` - Contain fit and sprite pivot transforms shared by preview and export
//! - `sprite` - Placed sprite instances and the ordered collection
//! - `interaction` - Selection, drag gesture, keyboard and control handling
//! - `preview` - Owned layout snapshot for the DOM overlay
//! - `composite` - Deterministic RGBA compositor used at export time
//! - `decode` / `encode` - Raster decoding and PNG encoding
//! - `upload` / `export` - File validation, filenames and the save sink seam
//! - `editor` - The editing session tying the pieces together
//!
//! Logging goes through `tracing`; the host decides whether to install a
//! subscriber.

pub mod composite;
pub mod config;
pub mod decode;
pub mod editor;
pub mod encode;
pub mod export;
pub mod geometry;
pub mod interaction;
pub mod preview;
pub mod sprite;
pub mod upload;

pub use composite::{CompositeError, Compositor};
pub use config::{ConfigError, EditorConfig, SpriteDefaults};
pub use decode::{DecodeError, DecodedImage};
pub use editor::{Editor, EditorError};
pub use encode::EncodeError;
pub use export::{export_filename, ExportError, MemorySink, SaveSink, SinkError};
pub use geometry::{contain_rect, contain_size, Affine, Point, Rect, Size, SpritePlacement};
pub use interaction::{
    ControlAction, DetachedHost, InteractionController, Key, ListenerHost, ListenerKind,
    PointerTarget, Propagation, Subscription,
};
pub use preview::{PreviewFrame, SpriteView};
pub use sprite::{SpriteCollection, SpriteId, SpriteInstance};
pub use upload::{validate_upload, UploadError};
