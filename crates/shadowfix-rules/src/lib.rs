//! Shadow-pattern detection, rewrite planning and verification.
//!
//! The stages run over a [`shadowfix_syntax::StyleIndex`]:
//!
//! - [`detect`] flags shadows whose background is missing, transparent or
//!   computed at render time
//! - [`plan`] turns violations into [`shadowfix_harness::RewritePatch`]
//!   values, either adding a `backgroundColor` to the offending block or
//!   wrapping an inline-styled element in an opaque container
//! - [`verify`] re-runs detection as an acceptance check
//!
//! Violations are values; only reading and indexing can fail.

mod detector;
mod inline;
mod planner;
mod properties;
mod verifier;
mod violation;

pub use detector::detect;
pub use planner::{DEFAULT_OPAQUE_COLOR, PatchedBlocks, Plan, PlanNote, PlanOptions, plan};
pub use properties::{BACKGROUND_KEY, ELEVATION_KEY, SHADOW_KEYS, TRANSPARENT};
pub use verifier::{
    ExpectationMode, ExpectationResult, LineExpectation, VerificationReport, VerifyRequest,
    verify, verify_path,
};
pub use violation::{ShadowViolation, ViolationKind, ViolationLocation};
