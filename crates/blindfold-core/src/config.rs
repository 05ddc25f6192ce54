//! Editor configuration.
//!
//! Every constant the editor relies on lives here so the browser host can
//! override it with a single object. `EditorConfig::default()` matches the
//! stock 500x400 canvas.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Point, Rect, Size};

/// Upload size limit in bytes (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Prefix used for exported file names.
pub const DEFAULT_EXPORT_PREFIX: &str = "swag-avatar";

/// Error returned when a configuration is internally inconsistent.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Canvas dimensions must be non-zero: {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },

    #[error("Safe area must be non-empty and lie inside the canvas")]
    InvalidSafeArea,

    #[error("Sprite box must have positive width and height")]
    InvalidSpriteBox,

    #[error("Scale bounds must satisfy 0 < min <= max (got {min}..={max})")]
    InvalidScaleBounds { min: f64, max: f64 },

    #[error("Default sprite scale {scale} must lie within {min}..={max}")]
    InvalidDefaultScale { scale: f64, min: f64, max: f64 },

    #[error("Default sprite position ({x}, {y}) must lie inside the canvas")]
    InvalidDefaultPosition { x: f64, y: f64 },

    #[error("Step sizes must be positive")]
    InvalidStep,

    #[error("Export prefix must not be empty")]
    EmptyExportPrefix,
}

/// Transform applied to a freshly added sprite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteDefaults {
    pub position: Point,
    pub rotation_degrees: f64,
    pub scale: f64,
}

impl Default for SpriteDefaults {
    fn default() -> Self {
        Self {
            position: Point::new(250.0, 150.0),
            rotation_degrees: 0.0,
            scale: 4.0,
        }
    }
}

/// Configuration for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Logical canvas width, also the export width in pixels.
    pub canvas_width: u32,
    /// Logical canvas height, also the export height in pixels.
    pub canvas_height: u32,
    /// Region a sprite's pivot may be dragged within.
    pub safe_area: Rect,
    /// Logical box each sprite raster is contain-fit into before transform.
    pub sprite_box: Size,
    pub sprite_defaults: SpriteDefaults,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Degrees applied per rotate action.
    pub rotation_step: f64,
    /// Scale delta applied per zoom action.
    pub scale_step: f64,
    pub max_upload_bytes: u64,
    pub export_prefix: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 500,
            canvas_height: 400,
            safe_area: Rect::new(50.0, 25.0, 400.0, 350.0),
            sprite_box: Size::new(100.0, 50.0),
            sprite_defaults: SpriteDefaults::default(),
            min_scale: 0.3,
            max_scale: 8.0,
            rotation_step: 5.0,
            scale_step: 0.1,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas size as floating point logical units.
    pub fn canvas_size(&self) -> Size {
        Size::new(f64::from(self.canvas_width), f64::from(self.canvas_height))
    }

    /// Check that the configuration can drive an editor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ConfigError::EmptyCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }

        let canvas = Rect::new(0.0, 0.0, self.canvas_size().width, self.canvas_size().height);
        if self.safe_area.width < 0.0
            || self.safe_area.height < 0.0
            || !canvas.contains_rect(&self.safe_area)
        {
            return Err(ConfigError::InvalidSafeArea);
        }

        if self.sprite_box.width <= 0.0 || self.sprite_box.height <= 0.0 {
            return Err(ConfigError::InvalidSpriteBox);
        }

        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(ConfigError::InvalidScaleBounds {
                min: self.min_scale,
                max: self.max_scale,
            });
        }

        let defaults = &self.sprite_defaults;
        if !(self.min_scale..=self.max_scale).contains(&defaults.scale) {
            return Err(ConfigError::InvalidDefaultScale {
                scale: defaults.scale,
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        if !canvas.contains(defaults.position) {
            return Err(ConfigError::InvalidDefaultPosition {
                x: defaults.position.x,
                y: defaults.position.y,
            });
        }

        if self.rotation_step <= 0.0 || self.scale_step <= 0.0 {
            return Err(ConfigError::InvalidStep);
        }

        if self.export_prefix.is_empty() {
            return Err(ConfigError::EmptyExportPrefix);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_stock_canvas() {
        let config = EditorConfig::default();
        assert_eq!(config.canvas_width, 500);
        assert_eq!(config.canvas_height, 400);
        assert_eq!(config.safe_area.left(), 50.0);
        assert_eq!(config.safe_area.right(), 450.0);
        assert_eq!(config.safe_area.top(), 25.0);
        assert_eq!(config.safe_area.bottom(), 375.0);
        assert_eq!(config.max_upload_bytes, 10_485_760);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_canvas_rejected() {
        let mut config = EditorConfig::default();
        config.canvas_height = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyCanvas { width: 500, height: 0 })
        ));
    }

    #[test]
    fn test_safe_area_outside_canvas_rejected() {
        let mut config = EditorConfig::default();
        config.safe_area = Rect::new(50.0, 25.0, 600.0, 350.0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidSafeArea));
    }

    #[test]
    fn test_inverted_scale_bounds_rejected() {
        let mut config = EditorConfig::default();
        config.min_scale = 9.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidScaleBounds { .. })
        ));
    }

    #[test]
    fn test_zero_default_scale_rejected() {
        let mut config = EditorConfig::default();
        config.sprite_defaults.scale = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidDefaultScale {
                scale: 0.0,
                min: 0.3,
                max: 8.0
            })
        );
    }

    #[test]
    fn test_default_scale_outside_bounds_rejected() {
        let mut config = EditorConfig::default();
        config.sprite_defaults.scale = 8.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDefaultScale { .. })
        ));

        config.sprite_defaults.scale = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDefaultScale { .. })
        ));
    }

    #[test]
    fn test_default_scale_at_bounds_accepted() {
        let mut config = EditorConfig::default();
        config.sprite_defaults.scale = config.min_scale;
        assert!(config.validate().is_ok());
        config.sprite_defaults.scale = config.max_scale;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_position_outside_canvas_rejected() {
        let mut config = EditorConfig::default();
        config.sprite_defaults.position = Point::new(600.0, 150.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidDefaultPosition { x: 600.0, y: 150.0 })
        );
    }

    #[test]
    fn test_non_positive_step_rejected() {
        let mut config = EditorConfig::default();
        config.scale_step = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidStep));
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let mut config = EditorConfig::default();
        config.export_prefix.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyExportPrefix));
    }
}
