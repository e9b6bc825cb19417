//! Verification port and the policy that picks an enrolled identity.

use crate::identity::{Identity, IdentityName};
use image::GrayImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("verification backend failed: {0}")]
    Backend(String),
}

/// Outcome of comparing a probe against one reference.
#[derive(Debug, Clone, Copy)]
pub struct Verdict {
    pub matched: bool,
    /// Similarity reported by the backend, in [-1, 1].
    pub similarity: f32,
}

/// Decides whether two images depict the same person.
///
/// Stateless from the caller's perspective. A call may fail (for example
/// when a frame yields nothing the backend can compare); a failed call
/// says nothing definitive about the pair.
pub trait Verifier {
    fn verify(&mut self, probe: &GrayImage, reference: &GrayImage) -> Result<Verdict, VerifyError>;
}

/// An accepted identification.
#[derive(Debug, Clone)]
pub struct Identified {
    pub name: IdentityName,
    pub similarity: f32,
}

/// Strategy for deciding which enrolled identity, if any, a probe belongs to.
pub trait Identifier {
    fn identify(
        &self,
        verifier: &mut dyn Verifier,
        probe: &GrayImage,
        candidates: &[Identity],
    ) -> Option<Identified>;
}

/// Accept the first candidate the verifier matches, in candidate order.
///
/// No scoring or ranking across candidates: the scan stops at the first
/// accepted match. A failed comparison skips that candidate and the scan
/// continues; beyond the warning it logs, a failure is indistinguishable
/// from a non-match.
pub struct FirstMatch;

impl Identifier for FirstMatch {
    fn identify(
        &self,
        verifier: &mut dyn Verifier,
        probe: &GrayImage,
        candidates: &[Identity],
    ) -> Option<Identified> {
        for candidate in candidates {
            match verifier.verify(probe, &candidate.reference) {
                Ok(verdict) if verdict.matched => {
                    tracing::info!(
                        name = %candidate.name,
                        similarity = verdict.similarity,
                        "probe identified"
                    );
                    return Some(Identified {
                        name: candidate.name.clone(),
                        similarity: verdict.similarity,
                    });
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        name = %candidate.name,
                        error = %e,
                        "comparison failed; skipping candidate"
                    );
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Verifier that replays a fixed sequence of outcomes and counts calls.
    struct Scripted {
        outcomes: Vec<Result<bool, ()>>,
        calls: usize,
    }

    impl Scripted {
        fn new(outcomes: Vec<Result<bool, ()>>) -> Self {
            Self { outcomes, calls: 0 }
        }
    }

    impl Verifier for Scripted {
        fn verify(&mut self, _: &GrayImage, _: &GrayImage) -> Result<Verdict, VerifyError> {
            let i = self.calls;
            self.calls += 1;
            match self.outcomes[i] {
                Ok(matched) => Ok(Verdict {
                    matched,
                    similarity: if matched { 0.9 } else { 0.1 },
                }),
                Err(()) => Err(VerifyError::Backend("no face".into())),
            }
        }
    }

    fn candidates(names: &[&str]) -> Vec<Identity> {
        names
            .iter()
            .map(|raw| Identity {
                name: IdentityName::parse(raw).unwrap(),
                reference: GrayImage::new(1, 1),
            })
            .collect()
    }

    fn probe() -> GrayImage {
        GrayImage::new(1, 1)
    }

    #[test]
    fn test_empty_candidates_never_invokes_verifier() {
        let mut verifier = Scripted::new(vec![]);
        let result = FirstMatch.identify(&mut verifier, &probe(), &[]);
        assert!(result.is_none());
        assert_eq!(verifier.calls, 0);
    }

    #[test]
    fn test_short_circuits_on_first_match() {
        let mut verifier = Scripted::new(vec![Ok(false), Ok(true), Ok(true)]);
        let all = candidates(&["alice", "bob", "carol"]);

        let found = FirstMatch.identify(&mut verifier, &probe(), &all).unwrap();
        assert_eq!(found.name.as_str(), "bob");
        // carol is never evaluated.
        assert_eq!(verifier.calls, 2);
    }

    #[test]
    fn test_all_failures_yield_no_identity() {
        let mut verifier = Scripted::new(vec![Err(()), Err(()), Err(())]);
        let all = candidates(&["alice", "bob", "carol"]);

        let result = FirstMatch.identify(&mut verifier, &probe(), &all);
        assert!(result.is_none());
        assert_eq!(verifier.calls, 3);
    }

    #[test]
    fn test_failure_does_not_mask_later_match() {
        let mut verifier = Scripted::new(vec![Err(()), Ok(true)]);
        let all = candidates(&["alice", "bob"]);

        let found = FirstMatch.identify(&mut verifier, &probe(), &all).unwrap();
        assert_eq!(found.name.as_str(), "bob");
    }

    #[test]
    fn test_no_match_across_all_candidates() {
        let mut verifier = Scripted::new(vec![Ok(false), Ok(false)]);
        let all = candidates(&["alice", "bob"]);

        assert!(FirstMatch.identify(&mut verifier, &probe(), &all).is_none());
        assert_eq!(verifier.calls, 2);
    }
}
