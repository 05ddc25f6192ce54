//! On-screen overlay layout.
//!
//! The live preview is DOM based: the background is a CSS `contain` image
//! and each sprite is an absolutely positioned box with a CSS transform.
//! Everything here is derived from [`crate::geometry`], the same functions
//! the compositor uses, so the preview and the exported file agree.

use serde::Serialize;

use crate::config::EditorConfig;
use crate::geometry::{contain_rect, Rect, Size, SpritePlacement};
use crate::interaction::{ControlAction, InteractionController};
use crate::sprite::SpriteId;

/// One button of the per-sprite controls overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlButton {
    pub action: ControlAction,
    pub label: &'static str,
    pub title: &'static str,
}

/// Controls shown on the selected sprite.
///
/// The overlay sits inside the sprite's transformed box, so it applies the
/// inverse scale to keep a constant on-screen size at any zoom.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlsView {
    pub counter_scale: f64,
    pub transform: String,
    pub buttons: Vec<ControlButton>,
}

impl ControlsView {
    fn for_scale(scale: f64) -> Self {
        let counter_scale = 1.0 / scale;
        Self {
            counter_scale,
            transform: format!("translateX(-50%) scale({counter_scale})"),
            buttons: ControlAction::ALL
                .iter()
                .map(|&action| ControlButton {
                    action,
                    label: action.label(),
                    title: action.title(),
                })
                .collect(),
        }
    }
}

/// Layout of a single sprite box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteView {
    pub id: SpriteId,
    pub index: usize,
    /// Untransformed box in canvas units.
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub rotation_degrees: f64,
    pub scale: f64,
    /// CSS transform applied about the box center.
    pub transform: String,
    /// Contain-fit image rectangle relative to the box.
    pub image: Rect,
    /// Canvas-space bounds of the drawn raster after the transform.
    pub bounds: Rect,
    pub selected: bool,
    pub dragging: bool,
    pub controls: Option<ControlsView>,
}

/// Owned snapshot of everything the preview needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewFrame {
    pub canvas: Size,
    /// Contain-fit background rectangle, `None` until a photo is loaded.
    pub background: Option<Rect>,
    pub sprites: Vec<SpriteView>,
}

impl PreviewFrame {
    /// Build a frame from the controller's current state.
    ///
    /// `sprite_raster` is the decoded sprite size; when the asset is not
    /// ready yet the image fills the sprite box.
    pub fn build(
        config: &EditorConfig,
        background: Option<Size>,
        sprite_raster: Option<Size>,
        controller: &InteractionController,
    ) -> Self {
        let canvas = config.canvas_size();
        let canvas_rect = Rect::new(0.0, 0.0, canvas.width, canvas.height);
        let raster = sprite_raster.unwrap_or(config.sprite_box);
        let selection = controller.selection();
        let dragging = controller.dragging_index();

        let sprites = controller
            .sprites()
            .iter()
            .enumerate()
            .map(|(index, instance)| {
                let placement = instance.placement(raster, config.sprite_box);
                let selected = selection == Some(index);
                sprite_view(index, instance.id, &placement, selected, dragging == Some(index))
            })
            .collect();

        Self {
            canvas,
            background: background
                .filter(|size| !size.is_empty())
                .map(|size| contain_rect(size, canvas_rect)),
            sprites,
        }
    }

    pub fn selected(&self) -> Option<&SpriteView> {
        self.sprites.iter().find(|s| s.selected)
    }
}

fn sprite_view(
    index: usize,
    id: SpriteId,
    placement: &SpritePlacement,
    selected: bool,
    dragging: bool,
) -> SpriteView {
    let layout = placement.layout_box();
    let draw = placement.local_draw_rect();

    SpriteView {
        id,
        index,
        left: layout.left(),
        top: layout.top(),
        width: layout.width,
        height: layout.height,
        rotation_degrees: placement.rotation_degrees,
        scale: placement.scale,
        transform: format!(
            "rotate({}deg) scale({})",
            placement.rotation_degrees, placement.scale
        ),
        // Local space is centered on the pivot; shift to the box's top-left
        image: Rect::new(
            draw.left() + layout.width / 2.0,
            draw.top() + layout.height / 2.0,
            draw.width,
            draw.height,
        ),
        bounds: placement.canvas_bounds(),
        selected,
        dragging,
        controls: selected.then(|| ControlsView::for_scale(placement.scale)),
    }
}
