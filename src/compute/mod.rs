//! Compute layer shared by every sequence operation.
//!
//! - `segment`: interpolation, crossings and collinearity per base kind
//! - `validation`: structural checks applied before a sequence is built
//!
//! The compute layer knows nothing about sequences themselves; it works on
//! pairs and runs of instants.

pub mod segment;
pub mod validation;

pub use segment::EPSILON;
