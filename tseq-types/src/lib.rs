//! # tseq-types
//!
//! Base values and time types consumed by the `tseq` temporal sequence engine.
//!
//! This crate provides the collaborator types a temporal sequence is built from:
//!
//! - **Values**: `Value`, `ValueKind`, `GeoPoint`
//! - **Instants**: `Instant` (a value sampled at a timestamp)
//! - **Time**: `Timestamp`, `Interval`, `Period`, `PeriodSet`, `TimestampSet`
//! - **Ranges**: `FloatRange`
//! - **Summaries**: `BoundingBox` (`TBox`, `STBox`), `Trajectory`
//! - **Spatial primitives**: planar and geodesic locate/interpolate helpers
//!
//! All types are serializable with Serde and point math is built on top of the
//! `geo` crate's geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use tseq_types::instant::Instant;
//! use tseq_types::period::Period;
//! use tseq_types::point::GeoPoint;
//!
//! let inst = Instant::new(GeoPoint::new(1.0, 2.0), 1_000_000);
//! assert_eq!(inst.timestamp(), 1_000_000);
//!
//! let p = Period::new(0, 10, true, false).unwrap();
//! assert!(p.contains_timestamp(0));
//! assert!(!p.contains_timestamp(10));
//! ```

pub mod bbox;
pub mod error;
pub mod instant;
pub mod period;
pub mod point;
pub mod range;
pub mod spatial;
pub mod time;
pub mod trajectory;
pub mod value;

pub use bbox::{BoundingBox, STBox, TBox};
pub use error::TypesError;
pub use instant::Instant;
pub use period::{Period, PeriodSet, TimestampSet};
pub use point::GeoPoint;
pub use range::FloatRange;
pub use time::{Interval, Timestamp};
pub use trajectory::Trajectory;
pub use value::{Value, ValueKind};
