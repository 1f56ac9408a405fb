//! Sequence builder for incremental construction
//!
//! Collects instants one at a time and validates the run once, when the
//! sequence is built.

use crate::config::Config;
use crate::error::Result;
use crate::sequence::Sequence;
use crate::types::Interpolation;
use tseq_types::Instant;

/// Builder for sequences with custom bounds, interpolation and settings.
///
/// # Examples
///
/// ```
/// use tseq::{Interpolation, SequenceBuilder};
/// use tseq_types::Instant;
///
/// let seq = SequenceBuilder::new()
///     .interpolation(Interpolation::Step)
///     .bounds(true, false)
///     .push(Instant::new(1, 0))
///     .push(Instant::new(1, 10))
///     .build()?;
/// assert_eq!(seq.to_string(), "[1@0, 1@10)");
/// # Ok::<(), tseq::TseqError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SequenceBuilder {
    instants: Vec<Instant>,
    lower_inc: bool,
    upper_inc: bool,
    interp: Interpolation,
    config: Config,
}

impl SequenceBuilder {
    /// Create a new builder: inclusive bounds, linear interpolation, default
    /// configuration.
    pub fn new() -> Self {
        Self {
            instants: Vec::new(),
            lower_inc: true,
            upper_inc: true,
            interp: Interpolation::default(),
            config: Config::default(),
        }
    }

    /// Set the construction settings (normalization, trajectory caching, limits).
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn interpolation(mut self, interp: Interpolation) -> Self {
        self.interp = interp;
        self
    }

    /// Set the inclusivity of the period bounds.
    pub fn bounds(mut self, lower_inc: bool, upper_inc: bool) -> Self {
        self.lower_inc = lower_inc;
        self.upper_inc = upper_inc;
        self
    }

    pub fn push(mut self, instant: Instant) -> Self {
        self.instants.push(instant);
        self
    }

    pub fn extend<I: IntoIterator<Item = Instant>>(mut self, instants: I) -> Self {
        self.instants.extend(instants);
        self
    }

    /// Build the sequence. Validates the collected run and applies the
    /// configured normalization.
    pub fn build(self) -> Result<Sequence> {
        log::debug!(
            "building {} sequence from {} instants",
            self.interp,
            self.instants.len()
        );
        Sequence::make_with_config(
            self.instants,
            self.lower_inc,
            self.upper_inc,
            self.interp,
            &self.config,
        )
    }
}

impl Default for SequenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
