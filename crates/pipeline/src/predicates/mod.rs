//! Predicate implementations.
//!
//! Anything implementing [`crate::Predicate`] can drive the engine; this
//! module holds the ones the service ships with.

pub mod points;

// Re-export for convenience
pub use points::{PointsThreshold, extract_points};
