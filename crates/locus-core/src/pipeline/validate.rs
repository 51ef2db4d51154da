//! Input validation before decoding.

use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Validates and loads image files from disk.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Read an image file after checking it is worth decoding.
    ///
    /// Checks:
    /// - File exists and is readable
    /// - File size is within limits
    /// - Leading bytes match a known image signature
    pub async fn read(&self, path: &Path) -> Result<Vec<u8>, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| PipelineError::Decode {
                message: format!("Cannot read metadata for {}: {e}", path.display()),
            })?;

        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if metadata.len() > max_bytes {
            return Err(PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| PipelineError::Decode {
                message: format!("Cannot read {}: {e}", path.display()),
            })?;

        match sniff_format(&bytes) {
            Some(format) => {
                tracing::trace!("{} looks like {format}", path.display());
                Ok(bytes)
            }
            None => Err(PipelineError::Decode {
                message: format!(
                    "{}: unrecognized image format (invalid magic bytes)",
                    path.display()
                ),
            }),
        }
    }
}

/// Identify an image container from its leading bytes.
pub fn sniff_format(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("jpeg"),
        [0x89, b'P', b'N', b'G', ..] => Some("png"),
        [b'G', b'I', b'F', b'8', ..] => Some("gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("webp"),
        [b'B', b'M', ..] => Some("bmp"),
        [b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => Some("tiff"),
        [_, _, _, _, b'f', b't', b'y', b'p', ..] => Some("heif"),
        _ => None,
    }
}
