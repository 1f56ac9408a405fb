//! Temporal sequence algebra: values that evolve over a time period.
//!
//! A [`Sequence`] is a run of timestamped instants evaluated with step or
//! linear interpolation between them. Sequences can be built, normalized,
//! restricted to values or times, synchronized pairwise, compared, hashed
//! and aggregated. Restrictions produce a [`SequenceSet`].
//!
//! ```rust
//! use tseq::{Interpolation, Sequence};
//! use tseq_types::{Instant, Value};
//!
//! let seq = Sequence::make(
//!     vec![Instant::new(1.0, 0), Instant::new(3.0, 10), Instant::new(1.0, 20)],
//!     true,
//!     true,
//!     Interpolation::Linear,
//!     true,
//! )?;
//! assert_eq!(seq.value_at(5), Some(Value::Float(2.0)));
//!
//! let at_two = seq.at_value(&Value::Float(2.0));
//! assert_eq!(at_two.to_string(), "{[2@5], [2@15]}");
//! # Ok::<(), tseq::TseqError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod instant_set;
pub mod sequence;
pub mod sequence_set;
pub mod types;

pub use builder::SequenceBuilder;
pub use config::Config;
pub use error::{Result, TseqError};
pub use instant_set::InstantSet;
pub use sequence::Sequence;
pub use sequence_set::SequenceSet;
pub use types::Interpolation;

pub use tseq_types;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Config, Interpolation, Result, SequenceBuilder, TseqError};

    pub use crate::{InstantSet, Sequence, SequenceSet};

    pub use tseq_types::{
        FloatRange, GeoPoint, Instant, Interval, Period, PeriodSet, Timestamp, TimestampSet,
        Value, ValueKind,
    };
}
