//! Browser implementations of the core's host seams.
//!
//! - [`DomListenerHost`] registers drag and keyboard listeners on `document`
//! - [`DownloadSink`] saves exported bytes through a synthetic download

use std::cell::RefCell;
use std::rc::Weak;

use blindfold_core::interaction::{Key, ListenerHost, ListenerKind};
use blindfold_core::{Editor, Point, SaveSink, SinkError};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Blob, BlobPropertyBag, Document, EventTarget, HtmlAnchorElement, HtmlElement, KeyboardEvent,
    MouseEvent, Url,
};

/// Shared editor slot. Filled once the editor has been constructed.
pub(crate) type EditorCell = RefCell<Option<Editor>>;

pub(crate) fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document available"))
}

/// Convert client coordinates into canvas space using the element's box.
pub(crate) fn canvas_point(canvas: &HtmlElement, client_x: i32, client_y: i32) -> Point {
    let rect = canvas.get_bounding_client_rect();
    local_point(f64::from(client_x), f64::from(client_y), rect.left(), rect.top())
}

fn local_point(client_x: f64, client_y: f64, left: f64, top: f64) -> Point {
    Point::new(client_x - left, client_y - top)
}

/// Run `f` with the editor if it exists and is not already borrowed.
///
/// Returns `None` when the editor has been dropped or a handler is already
/// running further up the stack.
fn with_editor<R>(cell: &Weak<EditorCell>, f: impl FnOnce(&mut Editor) -> R) -> Option<R> {
    let cell = cell.upgrade()?;
    let mut slot = cell.try_borrow_mut().ok()?;
    slot.as_mut().map(f)
}

/// Notify the page that the editor state changed.
pub(crate) fn notify(on_change: &Option<js_sys::Function>) {
    if let Some(callback) = on_change {
        if let Err(e) = callback.call0(&JsValue::NULL) {
            web_sys::console::error_2(&JsValue::from_str("blindfold: change callback failed"), &e);
        }
    }
}

/// Document-level listener registration.
///
/// The closures are created once and live as long as the host. The drag
/// pair is added on `attach(Drag)` and removed on `detach(Drag)`, which the
/// core guarantees to call exactly once per gesture.
pub struct DomListenerHost {
    target: EventTarget,
    on_move: Closure<dyn FnMut(MouseEvent)>,
    on_up: Closure<dyn FnMut(MouseEvent)>,
    on_key: Closure<dyn FnMut(KeyboardEvent)>,
}

impl DomListenerHost {
    pub(crate) fn new(
        canvas: HtmlElement,
        editor: Weak<EditorCell>,
        on_change: Option<js_sys::Function>,
    ) -> Result<Self, JsValue> {
        let target: EventTarget = document()?.into();

        let on_move = {
            let editor = editor.clone();
            let on_change = on_change.clone();
            Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                let pointer = canvas_point(&canvas, event.client_x(), event.client_y());
                let moved = with_editor(&editor, |e| {
                    e.controller_mut().pointer_move(pointer);
                })
                .is_some();
                if moved {
                    notify(&on_change);
                }
            })
        };

        let on_up = {
            let editor = editor.clone();
            let on_change = on_change.clone();
            Closure::<dyn FnMut(MouseEvent)>::new(move |_event: MouseEvent| {
                if with_editor(&editor, |e| e.controller_mut().pointer_up()).is_some() {
                    notify(&on_change);
                }
            })
        };

        let on_key = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            let key = Key::from_browser(&event.key());
            let handled = with_editor(&editor, |e| e.controller_mut().key_down(key));
            if handled == Some(true) {
                notify(&on_change);
            }
        });

        Ok(Self {
            target,
            on_move,
            on_up,
            on_key,
        })
    }

    fn add(&self, event: &str, listener: &JsValue) {
        if let Err(e) = self
            .target
            .add_event_listener_with_callback(event, listener.unchecked_ref())
        {
            web_sys::console::error_2(&JsValue::from_str("blindfold: addEventListener failed"), &e);
        }
    }

    fn remove(&self, event: &str, listener: &JsValue) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(event, listener.unchecked_ref())
        {
            web_sys::console::error_2(
                &JsValue::from_str("blindfold: removeEventListener failed"),
                &e,
            );
        }
    }
}

impl ListenerHost for DomListenerHost {
    fn attach(&self, kind: ListenerKind) {
        match kind {
            ListenerKind::Drag => {
                self.add("mousemove", self.on_move.as_ref());
                self.add("mouseup", self.on_up.as_ref());
            }
            ListenerKind::Keyboard => self.add("keydown", self.on_key.as_ref()),
        }
    }

    fn detach(&self, kind: ListenerKind) {
        match kind {
            ListenerKind::Drag => {
                self.remove("mousemove", self.on_move.as_ref());
                self.remove("mouseup", self.on_up.as_ref());
            }
            ListenerKind::Keyboard => self.remove("keydown", self.on_key.as_ref()),
        }
    }
}

/// Saves a file by clicking a transient `<a download>` element.
pub struct DownloadSink {
    document: Document,
}

impl DownloadSink {
    pub fn new() -> Result<Self, JsValue> {
        Ok(Self {
            document: document()?,
        })
    }

    fn download(&self, filename: &str, mime: &str, bytes: &[u8]) -> Result<(), JsValue> {
        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
        let options = BlobPropertyBag::new();
        options.set_type(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
        let url = Url::create_object_url_with_blob(&blob)?;

        let anchor: HtmlAnchorElement = self.document.create_element("a")?.dyn_into()?;
        anchor.set_href(&url);
        anchor.set_download(filename);

        let body = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("Document has no body"))?;
        body.append_child(&anchor)?;
        anchor.click();
        body.remove_child(&anchor)?;
        Url::revoke_object_url(&url)?;
        Ok(())
    }
}

impl SaveSink for DownloadSink {
    fn save(&mut self, filename: &str, mime: &str, bytes: &[u8]) -> Result<(), SinkError> {
        self.download(filename, mime, bytes)
            .map_err(|e| SinkError(e.as_string().unwrap_or_else(|| format!("{e:?}"))))
    }
}
