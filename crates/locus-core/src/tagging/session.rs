//! ONNX model session management and inference for the image classifier.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

use crate::error::PipelineError;

/// Wraps an ONNX Runtime session for a single-image classifier.
///
/// Uses a `Mutex` because `Session::run` requires `&mut self`.
pub struct ClassifierSession {
    session: Mutex<Session>,
    /// Name of the input tensor (detected from model metadata).
    input_name: String,
}

impl ClassifierSession {
    /// Load a classifier from an ONNX file.
    pub fn load(model_path: &Path) -> Result<Self, PipelineError> {
        let unavailable = |message: String| PipelineError::ModelUnavailable {
            path: model_path.to_path_buf(),
            message,
        };

        let session = Session::builder()
            .map_err(|e| unavailable(format!("Failed to create ONNX session builder: {e}")))?
            .commit_from_file(model_path)
            .map_err(|e| unavailable(format!("Failed to load ONNX model: {e}")))?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "input".to_string());

        tracing::debug!(
            "Loaded classifier from {:?} (input: {:?}, outputs: {:?})",
            model_path,
            input_name,
            session
                .outputs()
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }

    /// Run one forward pass and return the class scores for the single image.
    ///
    /// Input shape: \[1, 3, size, size\]. The first model output is taken as
    /// the score vector, either `[classes]` or `[1, classes]`.
    pub fn run(&self, preprocessed: &Array4<f32>) -> Result<Vec<f32>, PipelineError> {
        let shape: Vec<i64> = preprocessed.shape().iter().map(|&d| d as i64).collect();
        let flat_data: Vec<f32> = preprocessed.iter().copied().collect();

        let input_value =
            Value::from_array((shape, flat_data)).map_err(|e| PipelineError::Inference {
                message: format!("Failed to create input tensor: {e}"),
            })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_value];

        let mut session = self.session.lock().map_err(|e| PipelineError::Inference {
            message: format!("Session lock poisoned: {e}"),
        })?;

        let outputs = session.run(inputs).map_err(|e| PipelineError::Inference {
            message: format!("ONNX inference failed: {e}"),
        })?;

        let (_, scores) = outputs
            .iter()
            .next()
            .ok_or_else(|| PipelineError::Inference {
                message: "Model produced no outputs".to_string(),
            })?;

        let (shape, data) =
            scores
                .try_extract_tensor::<f32>()
                .map_err(|e| PipelineError::Inference {
                    message: format!("Failed to extract score tensor: {e}"),
                })?;

        match shape.len() {
            1 => Ok(data.to_vec()),
            2 if shape[0] == 1 => Ok(data.to_vec()),
            _ => Err(PipelineError::Inference {
                message: format!("Unexpected score tensor shape: {:?}", shape),
            }),
        }
    }
}
