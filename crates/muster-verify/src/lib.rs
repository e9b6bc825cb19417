//! muster-verify — face verification backed by an ArcFace-style ONNX model.
//!
//! Implements the [`muster_core::Verifier`] port: both images of a pair are
//! embedded with the w600k_r50 model and compared by cosine similarity
//! against a fixed threshold.

pub mod embedder;
pub mod embedding;
pub mod verifier;

pub use embedder::{EmbedderError, FaceEmbedder};
pub use embedding::Embedding;
pub use verifier::{OnnxVerifier, DEFAULT_MATCH_THRESHOLD};
