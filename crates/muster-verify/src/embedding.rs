//! Embedding vector type and similarity.

use serde::{Deserialize, Serialize};

/// Face embedding vector (512-dimensional for ArcFace-family models).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    pub values: Vec<f32>,
    /// Model version that produced this embedding (e.g., "w600k_r50").
    pub model_version: Option<String>,
}

impl Embedding {
    /// Cosine similarity between two embeddings, in [-1, 1]. Higher means
    /// more similar; zero-norm inputs compare as 0.0.
    pub fn similarity(&self, other: &Embedding) -> f32 {
        let mut dot = 0.0f32;
        let mut norm_a = 0.0f32;
        let mut norm_b = 0.0f32;

        for (a, b) in self.values.iter().zip(other.values.iter()) {
            dot += a * b;
            norm_a += a * a;
            norm_b += b * b;
        }

        let denom = norm_a.sqrt() * norm_b.sqrt();
        if denom > 0.0 {
            dot / denom
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emb(values: &[f32]) -> Embedding {
        Embedding {
            values: values.to_vec(),
            model_version: None,
        }
    }

    #[test]
    fn test_similarity_identical() {
        let a = emb(&[1.0, 0.0, 0.0]);
        let b = emb(&[1.0, 0.0, 0.0]);
        assert!((a.similarity(&b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_similarity_orthogonal() {
        let a = emb(&[1.0, 0.0]);
        let b = emb(&[0.0, 1.0]);
        assert!(a.similarity(&b).abs() < 1e-6);
    }

    #[test]
    fn test_similarity_opposite() {
        let a = emb(&[1.0, 0.0]);
        let b = emb(&[-1.0, 0.0]);
        assert!((a.similarity(&b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_similarity_zero_vector() {
        let a = emb(&[0.0, 0.0]);
        let b = emb(&[1.0, 0.0]);
        assert_eq!(a.similarity(&b), 0.0);
    }

    #[test]
    fn test_similarity_scale_invariant() {
        let a = emb(&[0.3, 0.4]);
        let b = emb(&[3.0, 4.0]);
        assert!((a.similarity(&b) - 1.0).abs() < 1e-6);
    }
}
