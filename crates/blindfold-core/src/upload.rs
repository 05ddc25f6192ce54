//! Validation of user-selected background files.
//!
//! Runs before any decode work. The size check comes first, so an oversized
//! file of the wrong type reports the size problem.

use thiserror::Error;

/// Errors for a rejected upload. Rejected files leave the editor untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("File is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },

    #[error("Unsupported file type {mime:?}")]
    NotAnImage { mime: String },
}

impl UploadError {
    pub fn user_message(&self) -> &'static str {
        match self {
            UploadError::TooLarge { .. } => {
                "Image file is too large, please select an image smaller than 10MB!"
            }
            UploadError::NotAnImage { .. } => "Please select a valid image file!",
        }
    }
}

/// Check the declared MIME type and byte size of a candidate file.
///
/// `size` equal to `max_bytes` is accepted.
pub fn validate_upload(mime: &str, size: u64, max_bytes: u64) -> Result<(), UploadError> {
    if size > max_bytes {
        return Err(UploadError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    if !mime.starts_with("image/") {
        return Err(UploadError::NotAnImage {
            mime: mime.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_UPLOAD_BYTES;

    #[test]
    fn test_limit_is_inclusive() {
        assert_eq!(
            validate_upload("image/png", 10 * 1024 * 1024, DEFAULT_MAX_UPLOAD_BYTES),
            Ok(())
        );
        assert_eq!(
            validate_upload("image/png", 10 * 1024 * 1024 + 1, DEFAULT_MAX_UPLOAD_BYTES),
            Err(UploadError::TooLarge {
                size: 10_485_761,
                limit: 10_485_760
            })
        );
    }

    #[test]
    fn test_any_image_subtype_accepted() {
        for mime in ["image/jpeg", "image/png", "image/webp", "image/gif", "image/heic"] {
            assert!(validate_upload(mime, 1, DEFAULT_MAX_UPLOAD_BYTES).is_ok(), "{mime}");
        }
    }

    #[test]
    fn test_non_image_rejected() {
        for mime in ["", "text/plain", "application/pdf", "video/mp4", "IMAGE/PNG"] {
            let err = validate_upload(mime, 1, DEFAULT_MAX_UPLOAD_BYTES).unwrap_err();
            assert!(matches!(err, UploadError::NotAnImage { .. }), "{mime}");
        }
    }

    #[test]
    fn test_size_checked_before_type() {
        let limit = DEFAULT_MAX_UPLOAD_BYTES;
        let err = validate_upload("text/plain", limit + 1, limit).unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { .. }));
    }

    #[test]
    fn test_user_messages() {
        let too_large = UploadError::TooLarge { size: 2, limit: 1 };
        assert_eq!(
            too_large.user_message(),
            "Image file is too large, please select an image smaller than 10MB!"
        );
        let wrong_type = UploadError::NotAnImage {
            mime: "text/plain".into(),
        };
        assert_eq!(wrong_type.user_message(), "Please select a valid image file!");
    }
}
