//! Pairwise verification: embed both images, compare cosine similarity.

use crate::embedder::{EmbedderError, FaceEmbedder};
use image::GrayImage;
use muster_core::{Verdict, Verifier, VerifyError};

/// Default cosine similarity threshold for accepting two images as the
/// same person.
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.40;

/// ONNX-backed implementation of the verification port.
pub struct OnnxVerifier {
    embedder: FaceEmbedder,
    threshold: f32,
}

impl OnnxVerifier {
    /// Load the embedding model and fix the match threshold.
    pub fn load(model_path: &str, threshold: f32) -> Result<Self, EmbedderError> {
        Ok(Self {
            embedder: FaceEmbedder::load(model_path)?,
            threshold,
        })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl Verifier for OnnxVerifier {
    fn verify(&mut self, probe: &GrayImage, reference: &GrayImage) -> Result<Verdict, VerifyError> {
        let probe_embedding = self.embedder.embed(probe).map_err(backend)?;
        let reference_embedding = self.embedder.embed(reference).map_err(backend)?;

        let similarity = probe_embedding.similarity(&reference_embedding);
        tracing::debug!(similarity, threshold = self.threshold, "pair compared");

        Ok(Verdict {
            matched: similarity >= self.threshold,
            similarity,
        })
    }
}

fn backend(e: EmbedderError) -> VerifyError {
    VerifyError::Backend(e.to_string())
}
