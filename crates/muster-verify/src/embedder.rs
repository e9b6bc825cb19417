//! ArcFace-style face embedder via ONNX Runtime.
//!
//! Produces 512-dimensional embeddings from grayscale frames with the
//! w600k_r50 model. Frames are resized to the model's 112x112 input; no
//! detection or alignment stage runs first, so probes and references are
//! compared whole-frame.

use crate::embedding::Embedding;
use image::{imageops, GrayImage};
use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;
use thiserror::Error;

// --- Named constants ---
const EMBED_INPUT_SIZE: usize = 112;
const EMBED_MEAN: f32 = 127.5;
const EMBED_STD: f32 = 127.5; // symmetric normalization, per ArcFace
const EMBEDDING_DIM: usize = 512;
const EMBED_MODEL_VERSION: &str = "w600k_r50";

#[derive(Error, Debug)]
pub enum EmbedderError {
    #[error("model file not found: {0} — download from insightface and set MUSTER_MODEL_PATH")]
    ModelNotFound(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
    #[error("ort: {0}")]
    Ort(#[from] ort::Error),
}

/// ONNX-backed face embedder.
pub struct FaceEmbedder {
    session: Session,
}

impl FaceEmbedder {
    /// Load the embedding ONNX model from the given path.
    pub fn load(model_path: &str) -> Result<Self, EmbedderError> {
        if !Path::new(model_path).exists() {
            return Err(EmbedderError::ModelNotFound(model_path.to_string()));
        }

        let session = Session::builder()?
            .with_intra_threads(2)?
            .commit_from_file(model_path)?;

        tracing::info!(
            path = model_path,
            inputs = ?session.inputs().iter().map(|i| (i.name(), i.dtype())).collect::<Vec<_>>(),
            outputs = ?session.outputs().iter().map(|o| o.name()).collect::<Vec<_>>(),
            "loaded embedding model"
        );

        Ok(Self { session })
    }

    /// Embed a grayscale frame. The result is L2-normalized, so cosine
    /// similarity between embeddings reduces to a dot product.
    pub fn embed(&mut self, frame: &GrayImage) -> Result<Embedding, EmbedderError> {
        let size = EMBED_INPUT_SIZE as u32;
        let resized;
        let input_frame = if frame.dimensions() == (size, size) {
            frame
        } else {
            resized = imageops::resize(frame, size, size, imageops::FilterType::Triangle);
            &resized
        };

        let input = Self::preprocess(input_frame);

        let outputs = self
            .session
            .run(ort::inputs![TensorRef::from_array_view(input.view())?])?;

        let (_, raw_data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| EmbedderError::InferenceFailed(format!("embedding extraction: {e}")))?;

        let raw: Vec<f32> = raw_data.to_vec();

        if raw.len() != EMBEDDING_DIM {
            return Err(EmbedderError::InferenceFailed(format!(
                "expected {EMBEDDING_DIM}-dim embedding, got {}",
                raw.len()
            )));
        }

        // L2-normalize the embedding
        let norm: f32 = raw.iter().map(|x| x * x).sum::<f32>().sqrt();
        let values = if norm > 0.0 {
            raw.iter().map(|x| x / norm).collect()
        } else {
            raw
        };

        Ok(Embedding {
            values,
            model_version: Some(EMBED_MODEL_VERSION.to_string()),
        })
    }

    /// Preprocess a 112x112 grayscale frame into a NCHW float tensor,
    /// replicating the single channel to three.
    fn preprocess(frame: &GrayImage) -> Array4<f32> {
        let size = EMBED_INPUT_SIZE;
        let mut tensor = Array4::<f32>::zeros((1, 3, size, size));

        for y in 0..size {
            for x in 0..size {
                let pixel = frame
                    .get_pixel_checked(x as u32, y as u32)
                    .map(|p| p.0[0])
                    .unwrap_or(0) as f32;

                let normalized = (pixel - EMBED_MEAN) / EMBED_STD;
                tensor[[0, 0, y, x]] = normalized;
                tensor[[0, 1, y, x]] = normalized;
                tensor[[0, 2, y, x]] = normalized;
            }
        }

        tensor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn flat_frame(value: u8) -> GrayImage {
        GrayImage::from_pixel(
            EMBED_INPUT_SIZE as u32,
            EMBED_INPUT_SIZE as u32,
            Luma([value]),
        )
    }

    #[test]
    fn test_preprocess_output_shape() {
        let tensor = FaceEmbedder::preprocess(&flat_frame(128));
        assert_eq!(tensor.shape(), &[1, 3, EMBED_INPUT_SIZE, EMBED_INPUT_SIZE]);
    }

    #[test]
    fn test_preprocess_normalization() {
        let tensor = FaceEmbedder::preprocess(&flat_frame(128));
        let expected = (128.0 - EMBED_MEAN) / EMBED_STD;
        let val = tensor[[0, 0, 0, 0]];
        assert!((val - expected).abs() < 1e-6, "got {val}, expected {expected}");
    }

    #[test]
    fn test_preprocess_extremes_stay_in_unit_range() {
        let dark = FaceEmbedder::preprocess(&flat_frame(0));
        let bright = FaceEmbedder::preprocess(&flat_frame(255));
        assert!((dark[[0, 0, 0, 0]] + 1.0).abs() < 1e-2);
        assert!((bright[[0, 0, 0, 0]] - 1.0).abs() < 1e-2);
    }

    #[test]
    fn test_preprocess_channels_identical() {
        let tensor = FaceEmbedder::preprocess(&flat_frame(100));
        for y in 0..EMBED_INPUT_SIZE {
            for x in 0..EMBED_INPUT_SIZE {
                let r = tensor[[0, 0, y, x]];
                let g = tensor[[0, 1, y, x]];
                let b = tensor[[0, 2, y, x]];
                assert_eq!(r, g);
                assert_eq!(g, b);
            }
        }
    }
}
