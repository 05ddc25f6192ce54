//! Editing session: asset slots, interaction and export.

use std::rc::Rc;

use thiserror::Error;
use tracing::{info, warn};

use crate::composite::Compositor;
use crate::config::{ConfigError, EditorConfig};
use crate::decode::{decode_image, decode_image_no_orientation, DecodeError, DecodedImage};
use crate::encode::encode_png;
use crate::export::{export_filename, ExportError, SaveSink, PNG_MIME};
use crate::geometry::Size;
use crate::interaction::{InteractionController, ListenerHost};
use crate::preview::PreviewFrame;
use crate::sprite::SpriteId;
use crate::upload::{validate_upload, UploadError};

pub const ADD_LABEL: &str = "ADD BLINDFOLD";
pub const LOADING_LABEL: &str = "Loading...";

/// Any failure surfaced to the user by the editor.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Background image could not be decoded: {0}")]
    Background(#[source] DecodeError),

    #[error("Sprite image could not be decoded: {0}")]
    Sprite(#[source] DecodeError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl EditorError {
    /// Notice text shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            EditorError::Config(_) => "Editor configuration is invalid!",
            EditorError::Upload(e) => e.user_message(),
            EditorError::Background(_) => "Image loading failed, please try again!",
            EditorError::Sprite(_) => "Sprite image failed to load!",
            EditorError::Export(e) => e.user_message(),
        }
    }
}

/// One editing session.
///
/// Holds the two decoded assets and the controller. Readiness of each asset
/// is tracked independently; `can_add_sprite` and `can_export` gate on them.
pub struct Editor {
    config: EditorConfig,
    compositor: Compositor,
    background: Option<DecodedImage>,
    sprite: Option<DecodedImage>,
    controller: InteractionController,
}

impl Editor {
    pub fn new(config: EditorConfig, host: Rc<dyn ListenerHost>) -> Result<Self, EditorError> {
        config.validate()?;
        Ok(Self {
            compositor: Compositor::from_config(&config),
            controller: InteractionController::new(&config, host),
            background: None,
            sprite: None,
            config,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    pub fn is_background_loaded(&self) -> bool {
        self.background.is_some()
    }

    pub fn is_sprite_loaded(&self) -> bool {
        self.sprite.is_some()
    }

    pub fn background_size(&self) -> Option<Size> {
        self.background.as_ref().map(DecodedImage::size)
    }

    pub fn sprite_size(&self) -> Option<Size> {
        self.sprite.as_ref().map(DecodedImage::size)
    }

    /// Replace the background photo.
    ///
    /// A rejected file leaves everything as it was. A file that passes
    /// validation but fails to decode empties the background slot. Either way
    /// a new photo starts with no sprites.
    pub fn upload_background(&mut self, mime: &str, bytes: &[u8]) -> Result<Size, EditorError> {
        let size = bytes.len() as u64;
        if let Err(e) = validate_upload(mime, size, self.config.max_upload_bytes) {
            warn!(mime, size, error = %e, "upload rejected");
            return Err(e.into());
        }

        let decoded = decode_image(bytes);
        self.controller.reset();
        match decoded {
            Ok(image) => {
                let dims = image.size();
                info!(mime, size, width = image.width, height = image.height, "background loaded");
                self.background = Some(image);
                Ok(dims)
            }
            Err(e) => {
                warn!(mime, size, error = %e, "background decode failed");
                self.background = None;
                Err(EditorError::Background(e))
            }
        }
    }

    /// Decode the bundled sprite asset.
    pub fn load_sprite(&mut self, bytes: &[u8]) -> Result<Size, EditorError> {
        match decode_image_no_orientation(bytes) {
            Ok(image) => {
                let dims = image.size();
                info!(width = image.width, height = image.height, "sprite loaded");
                self.sprite = Some(image);
                Ok(dims)
            }
            Err(e) => {
                warn!(error = %e, "sprite decode failed");
                self.sprite = None;
                Err(EditorError::Sprite(e))
            }
        }
    }

    pub fn can_add_sprite(&self) -> bool {
        self.is_background_loaded() && self.is_sprite_loaded()
    }

    pub fn add_button_label(&self) -> &'static str {
        if self.is_sprite_loaded() {
            ADD_LABEL
        } else {
            LOADING_LABEL
        }
    }

    /// Place a new sprite if both assets are ready.
    pub fn add_sprite(&mut self) -> Option<SpriteId> {
        if !self.can_add_sprite() {
            return None;
        }
        Some(self.controller.add_sprite())
    }

    pub fn can_export(&self) -> bool {
        self.can_add_sprite() && !self.controller.sprites().is_empty()
    }

    /// Compose, encode and hand the PNG to `sink`.
    ///
    /// The sink sees nothing unless composing and encoding both succeed.
    /// Session state is never modified. Returns the file name used.
    pub fn export<S: SaveSink + ?Sized>(
        &self,
        sink: &mut S,
        timestamp_ms: u64,
    ) -> Result<String, EditorError> {
        let bytes = self
            .render_png()
            .inspect_err(|e| warn!(error = %e, "export failed"))?;

        let filename = export_filename(&self.config.export_prefix, timestamp_ms);
        sink.save(&filename, PNG_MIME, &bytes).map_err(|e| {
            warn!(%filename, error = %e, "save failed");
            EditorError::Export(e.into())
        })?;

        info!(%filename, bytes = bytes.len(), sprites = self.controller.sprites().len(), "exported");
        Ok(filename)
    }

    /// Composite and encode without saving.
    pub fn render_png(&self) -> Result<Vec<u8>, ExportError> {
        let background = self.background.as_ref().ok_or(ExportError::MissingBackground)?;
        let sprite = self.sprite.as_ref().ok_or(ExportError::MissingSprite)?;
        if self.controller.sprites().is_empty() {
            return Err(ExportError::NoSprites);
        }

        let surface = self
            .compositor
            .render(background, sprite, self.controller.sprites())?;
        Ok(encode_png(&surface.pixels, surface.width, surface.height)?)
    }

    pub fn preview(&self) -> PreviewFrame {
        PreviewFrame::build(
            &self.config,
            self.background_size(),
            self.sprite_size(),
            &self.controller,
        )
    }
}
