//! Blindfold WASM - WebAssembly bindings for the Blindfold editor
//!
//! This crate exposes the blindfold-core editing session to JavaScript and
//! provides the browser pieces the core leaves abstract: document-level
//! listener registration and the download sink.
//!
//! # Module Structure
//!
//! - `editor` - `JsEditor`, the session binding
//! - `dom` - Listener host and synthetic-download sink
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditor } from '@blindfold/wasm';
//!
//! await init();
//! const editor = new JsEditor(canvasEl, undefined, rerender);
//! editor.checkUpload(file.type, file.size);
//! ```

use wasm_bindgen::prelude::*;

mod dom;
mod editor;

pub use editor::JsEditor;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
