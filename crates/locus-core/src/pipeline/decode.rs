//! Image decoding with format detection, dimension limits, and timeout support.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Image decoder with configurable limits and timeout.
#[derive(Debug, Clone)]
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
#[derive(Debug)]
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode an encoded image buffer on the blocking pool.
    ///
    /// The format is detected from content, not from any file name.
    pub async fn decode(&self, bytes: Vec<u8>) -> Result<DecodedImage, PipelineError> {
        let timeout_duration = Duration::from_millis(self.limits.decode_timeout_ms);

        let decode_result = timeout(
            timeout_duration,
            tokio::task::spawn_blocking(move || Self::decode_sync(bytes)),
        )
        .await;

        match decode_result {
            Ok(Ok(Ok(decoded))) => {
                let max_dim = self.limits.max_image_dimension;
                if decoded.width > max_dim || decoded.height > max_dim {
                    return Err(PipelineError::Decode {
                        message: format!(
                            "Image too large: {}x{} exceeds {max_dim}",
                            decoded.width, decoded.height
                        ),
                    });
                }
                Ok(decoded)
            }
            Ok(Ok(Err(e))) => Err(e),
            Ok(Err(e)) => Err(PipelineError::Decode {
                message: format!("Task join error: {e}"),
            }),
            Err(_) => Err(PipelineError::Timeout {
                stage: "decode".to_string(),
                timeout_ms: self.limits.decode_timeout_ms,
            }),
        }
    }

    fn decode_sync(bytes: Vec<u8>) -> Result<DecodedImage, PipelineError> {
        if bytes.is_empty() {
            return Err(PipelineError::Decode {
                message: "Empty image buffer".to_string(),
            });
        }

        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                message: format!("Cannot detect image format: {e}"),
            })?;
        let format = reader.format().ok_or_else(|| PipelineError::Decode {
            message: "Unsupported or unrecognized image format".to_string(),
        })?;
        let image = reader.decode().map_err(|e| PipelineError::Decode {
            message: e.to_string(),
        })?;

        let (width, height) = image.dimensions();
        Ok(DecodedImage {
            image,
            format,
            width,
            height,
        })
    }
}
