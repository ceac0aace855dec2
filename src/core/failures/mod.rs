//! Validation failure handling
//!
//! - [`classifier`] - sorts a failure into dismiss / resolve / terminal
//! - [`tracker`] - distinct resolution attempts per failure and the ceiling
//! - [`engine`] - per-pass policy returning a [`ResolutionVerdict`]
//!
//! [`ResolutionVerdict`]: crate::domain::ResolutionVerdict

pub mod classifier;
pub mod engine;
pub mod tracker;

pub use classifier::{classify, is_unrecoverable_corruption, Classification, Disposition};
pub use engine::{FailureAction, PassDecision, ResolutionEngine};
pub use tracker::{AttemptHistory, AttemptTracker, ReportedHistory, MAX_RESOLUTION_ATTEMPTS};
