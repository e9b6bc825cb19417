//! muster-core — identity registry, identification policy, and attendance ledger.
//!
//! The camera and the face-verification backend are collaborators behind
//! narrow interfaces ([`identify::Verifier`] for verification; frames arrive
//! as plain [`image::GrayImage`] values). This crate owns the durable state
//! (reference images on disk, the attendance CSV) and the policy that turns
//! one probe frame into at most one attendance event.

pub mod identify;
pub mod identity;
pub mod ledger;
pub mod registry;

pub use identify::{FirstMatch, Identified, Identifier, Verdict, Verifier, VerifyError};
pub use identity::{Identity, IdentityName, NameError};
pub use ledger::{AttendanceEvent, Ledger, LedgerError, LEDGER_HEADER, TIMESTAMP_FORMAT};
pub use registry::{Registry, RegistryError};
