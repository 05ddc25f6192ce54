//! Editor session bindings.
//!
//! # Example
//!
//! ```typescript
//! import { JsEditor } from '@blindfold/wasm';
//!
//! const editor = new JsEditor(canvasEl, undefined, () => render(editor.preview()));
//! editor.loadSprite(new Uint8Array(await (await fetch(spriteUrl)).arrayBuffer()));
//!
//! input.onchange = async () => {
//!   const file = input.files[0];
//!   try {
//!     editor.checkUpload(file.type, file.size);
//!     editor.uploadBackground(file.type, new Uint8Array(await file.arrayBuffer()));
//!   } catch (message) {
//!     alert(message);
//!   }
//! };
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use blindfold_core::upload::validate_upload;
use blindfold_core::{ControlAction, Editor, EditorConfig, EditorError, PointerTarget, Size};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, MouseEvent};

use crate::dom::{canvas_point, notify, DomListenerHost, DownloadSink, EditorCell};

/// Log the technical error and hand the user-facing notice to JavaScript.
fn to_js_error(err: EditorError) -> JsValue {
    web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
    JsValue::from_str(err.user_message())
}

fn size_to_js(size: Size) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&size).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Browser-facing editing session.
///
/// Errors thrown from methods are the notice strings meant for the user.
#[wasm_bindgen]
pub struct JsEditor {
    editor: Rc<EditorCell>,
    canvas: HtmlElement,
    on_change: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl JsEditor {
    /// Create a session bound to `canvas`.
    ///
    /// `config` may be `undefined` for the stock 500x400 editor. `on_change`
    /// is called after document-level listeners mutate the state.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlElement,
        config: JsValue,
        on_change: Option<js_sys::Function>,
    ) -> Result<JsEditor, JsValue> {
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid editor config: {}", e)))?
        };

        let cell: Rc<EditorCell> = Rc::new(RefCell::new(None));
        let host = DomListenerHost::new(canvas.clone(), Rc::downgrade(&cell), on_change.clone())?;
        let editor = Editor::new(config, Rc::new(host)).map_err(to_js_error)?;
        *cell.borrow_mut() = Some(editor);

        Ok(JsEditor {
            editor: cell,
            canvas,
            on_change,
        })
    }

    /// Validate and decode a user photo. Returns `{ width, height }`.
    #[wasm_bindgen(js_name = uploadBackground)]
    pub fn upload_background(&self, mime: &str, bytes: &[u8]) -> Result<JsValue, JsValue> {
        let size = self
            .with(|e| e.upload_background(mime, bytes))?
            .map_err(to_js_error)?;
        size_to_js(size)
    }

    /// Check a file from its `File` metadata before reading it.
    ///
    /// Uses this session's upload limit. Throws the notice text on rejection.
    #[wasm_bindgen(js_name = checkUpload)]
    pub fn check_upload(&self, mime: &str, size: f64) -> Result<(), JsValue> {
        self.with(|e| validate_upload(mime, size as u64, e.config().max_upload_bytes))?
            .map_err(|e| JsValue::from_str(e.user_message()))
    }

    /// Decode the bundled sprite asset. Returns `{ width, height }`.
    #[wasm_bindgen(js_name = loadSprite)]
    pub fn load_sprite(&self, bytes: &[u8]) -> Result<JsValue, JsValue> {
        let size = self.with(|e| e.load_sprite(bytes))?.map_err(to_js_error)?;
        size_to_js(size)
    }

    #[wasm_bindgen(getter, js_name = isBackgroundLoaded)]
    pub fn is_background_loaded(&self) -> Result<bool, JsValue> {
        self.with(|e| e.is_background_loaded())
    }

    #[wasm_bindgen(getter, js_name = isSpriteLoaded)]
    pub fn is_sprite_loaded(&self) -> Result<bool, JsValue> {
        self.with(|e| e.is_sprite_loaded())
    }

    #[wasm_bindgen(getter, js_name = canAddSprite)]
    pub fn can_add_sprite(&self) -> Result<bool, JsValue> {
        self.with(|e| e.can_add_sprite())
    }

    #[wasm_bindgen(getter, js_name = canExport)]
    pub fn can_export(&self) -> Result<bool, JsValue> {
        self.with(|e| e.can_export())
    }

    #[wasm_bindgen(getter, js_name = addButtonLabel)]
    pub fn add_button_label(&self) -> Result<String, JsValue> {
        self.with(|e| e.add_button_label().to_string())
    }

    /// Place a sprite with the default transform. Returns its id, or
    /// `undefined` when an asset is still missing.
    #[wasm_bindgen(js_name = addSprite)]
    pub fn add_sprite(&self) -> Result<Option<String>, JsValue> {
        self.with(|e| e.add_sprite().map(|id| id.to_string()))
    }

    /// Mouse-down on the sprite at `index`. Starts a drag and consumes the event.
    #[wasm_bindgen(js_name = spritePointerDown)]
    pub fn sprite_pointer_down(&self, index: usize, event: &MouseEvent) -> Result<(), JsValue> {
        let pointer = canvas_point(&self.canvas, event.client_x(), event.client_y());
        let propagation = self.with(|e| {
            e.controller_mut()
                .pointer_down(PointerTarget::Sprite(index), pointer)
        })?;
        if propagation.is_stopped() {
            event.prevent_default();
            event.stop_propagation();
        }
        Ok(())
    }

    /// Click on the canvas. Deselects when the canvas itself was hit.
    #[wasm_bindgen(js_name = canvasPointerDown)]
    pub fn canvas_pointer_down(&self, event: &MouseEvent) -> Result<(), JsValue> {
        let canvas: &JsValue = self.canvas.as_ref();
        let target = match event.target() {
            Some(t) if AsRef::<JsValue>::as_ref(&t) == canvas => PointerTarget::Canvas,
            _ => PointerTarget::Outside,
        };
        let pointer = canvas_point(&self.canvas, event.client_x(), event.client_y());
        self.with(|e| e.controller_mut().pointer_down(target, pointer))?;
        Ok(())
    }

    /// Click on one of the selected sprite's overlay buttons.
    ///
    /// `action` is one of `rotate-left`, `rotate-right`, `scale-up`,
    /// `scale-down`, `delete`.
    #[wasm_bindgen(js_name = applyControl)]
    pub fn apply_control(&self, action: JsValue, event: Option<MouseEvent>) -> Result<(), JsValue> {
        let action: ControlAction = serde_wasm_bindgen::from_value(action)
            .map_err(|e| JsValue::from_str(&format!("Unknown control: {}", e)))?;
        let propagation = self.with(|e| e.controller_mut().apply_control(action))?;
        if let Some(event) = event.filter(|_| propagation.is_stopped()) {
            event.stop_propagation();
        }
        Ok(())
    }

    /// Clear the selection.
    pub fn deselect(&self) -> Result<(), JsValue> {
        self.with(|e| e.controller_mut().deselect())
    }

    /// Owned layout snapshot for rendering the overlay.
    pub fn preview(&self) -> Result<JsValue, JsValue> {
        let frame = self.with(|e| e.preview())?;
        serde_wasm_bindgen::to_value(&frame).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Compose the image and trigger a PNG download. Returns the file name.
    pub fn export(&self) -> Result<String, JsValue> {
        let mut sink = DownloadSink::new()?;
        let timestamp_ms = js_sys::Date::now() as u64;
        self.with(|e| e.export(&mut sink, timestamp_ms))?
            .map_err(to_js_error)
    }

    /// Encode the composite without downloading it.
    #[wasm_bindgen(js_name = renderPng)]
    pub fn render_png(&self) -> Result<Vec<u8>, JsValue> {
        self.with(|e| e.render_png())?
            .map_err(|e| to_js_error(e.into()))
    }

    /// Drop the session, releasing every listener it registered.
    pub fn release(&self) -> Result<(), JsValue> {
        let editor = self
            .editor
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("Editor is busy"))?
            .take();
        drop(editor);
        notify(&self.on_change);
        Ok(())
    }
}

impl JsEditor {
    fn with<R>(&self, f: impl FnOnce(&mut Editor) -> R) -> Result<R, JsValue> {
        let mut slot = self
            .editor
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("Editor is busy"))?;
        let editor = slot
            .as_mut()
            .ok_or_else(|| JsValue::from_str("Editor has been released"))?;
        Ok(f(editor))
    }
}
