//! Export workflow pieces: filenames and the save sink seam.
//!
//! The editor composes and encodes; the sink only delivers finished bytes.
//! A sink is never called with a partial result.

use thiserror::Error;

use crate::composite::CompositeError;
use crate::encode::EncodeError;

pub const PNG_MIME: &str = "image/png";

/// Failure reported by a save sink.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Save failed: {0}")]
pub struct SinkError(pub String);

/// Destination for exported files.
pub trait SaveSink {
    fn save(&mut self, filename: &str, mime: &str, bytes: &[u8]) -> Result<(), SinkError>;
}

/// Errors that abort an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No background image loaded")]
    MissingBackground,

    #[error("Sprite image is not loaded")]
    MissingSprite,

    #[error("Nothing to export, no sprites placed")]
    NoSprites,

    #[error(transparent)]
    Composite(#[from] CompositeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl ExportError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ExportError::Sink(_) => "Download failed, please try again!",
            _ => "Image processing failed, please try again!",
        }
    }
}

/// `<prefix>-<timestamp_ms>.png`
pub fn export_filename(prefix: &str, timestamp_ms: u64) -> String {
    format!("{prefix}-{timestamp_ms}.png")
}

/// Sink that keeps saved files in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub files: Vec<(String, Vec<u8>)>,
}

impl SaveSink for MemorySink {
    fn save(&mut self, filename: &str, _mime: &str, bytes: &[u8]) -> Result<(), SinkError> {
        self.files.push((filename.to_string(), bytes.to_vec()));
        Ok(())
    }
}
