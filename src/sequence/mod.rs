//! The temporal sequence value.
//!
//! A [`Sequence`] is a time-ordered, normalized run of instants evaluated by
//! Step or Linear interpolation over a period whose bounds may be open. It
//! caches its bounding box and, for point values, its trajectory. Every
//! operation returns a new value; nothing is mutated in place.
//!
//! Operations are grouped by concern:
//!
//! - construction, evaluation and accessors (this module)
//! - `normalize`: redundant-instant removal for runs and arrays of sequences
//! - `convert`: casts, interpolation change and time shift
//! - `restrict`: at/minus by value, value set, range and extreme values
//! - `time`: at/minus by timestamp, timestamp set, period and period set
//! - `sync`: pairwise synchronization and intersection
//! - `compare`: total order, hash and ever/always predicates
//! - `aggregate`: value sets, ranges, integral and time-weighted average
//! - `codec`: the binary wire layout

mod aggregate;
mod codec;
mod compare;
mod convert;
pub mod normalize;
mod restrict;
mod sync;
mod time;

use crate::compute::segment::value_at_timestamp;
use crate::compute::validation::{validate_instants, validate_successor, validate_value};
use crate::config::Config;
use crate::error::{Result, TseqError};
use crate::sequence_set::SequenceSet;
use crate::types::Interpolation;
use normalize::{is_redundant, normalize_instants};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tseq_types::{
    BoundingBox, GeoPoint, Instant, Interval, Period, Timestamp, Trajectory, Value, ValueKind,
};

/// A continuously defined function of time built from a run of instants.
///
/// # Examples
///
/// ```
/// use tseq::{Interpolation, Sequence};
/// use tseq_types::{Instant, Value};
///
/// let seq = Sequence::make(
///     vec![Instant::new(1.0, 0), Instant::new(3.0, 10)],
///     true,
///     false,
///     Interpolation::Linear,
///     true,
/// )?;
/// assert_eq!(seq.value_at(5), Some(Value::Float(2.0)));
/// assert_eq!(seq.value_at(10), None);
/// assert_eq!(seq.to_string(), "[1@0, 3@10)");
/// # Ok::<(), tseq::TseqError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawSequence", into = "RawSequence")]
pub struct Sequence {
    instants: Vec<Instant>,
    interp: Interpolation,
    period: Period,
    bbox: BoundingBox,
    trajectory: Option<Trajectory>,
}

impl Sequence {
    /// Build a sequence from a run of instants.
    ///
    /// Validates ordering, bound inclusivity, value frame and the Step
    /// end-value rule; when `normalize` is set, redundant instants are
    /// dropped first.
    pub fn make(
        instants: Vec<Instant>,
        lower_inc: bool,
        upper_inc: bool,
        interp: Interpolation,
        normalize: bool,
    ) -> Result<Self> {
        validate_instants(&instants, lower_inc, upper_inc, interp)?;
        Ok(Self::new_unchecked(
            instants, lower_inc, upper_inc, interp, normalize,
        ))
    }

    /// Build a sequence following the normalization and trajectory settings
    /// of `config`.
    pub fn make_with_config(
        instants: Vec<Instant>,
        lower_inc: bool,
        upper_inc: bool,
        interp: Interpolation,
        config: &Config,
    ) -> Result<Self> {
        if instants.len() > config.max_instants {
            return Err(TseqError::Validation(format!(
                "Sequence of {} instants exceeds the configured maximum of {}",
                instants.len(),
                config.max_instants
            )));
        }
        validate_instants(&instants, lower_inc, upper_inc, interp)?;
        let instants = if config.normalize {
            normalize_instants(instants, interp)
        } else {
            instants
        };
        Ok(Self::assemble(
            instants,
            lower_inc,
            upper_inc,
            interp,
            config.precompute_trajectory,
        ))
    }

    /// Build a sequence from a run already known to be valid.
    pub(crate) fn new_unchecked(
        instants: Vec<Instant>,
        lower_inc: bool,
        upper_inc: bool,
        interp: Interpolation,
        normalize: bool,
    ) -> Self {
        debug_assert!(
            validate_instants(&instants, lower_inc, upper_inc, interp).is_ok(),
            "invalid instant run: {:?}",
            validate_instants(&instants, lower_inc, upper_inc, interp)
        );
        let instants = if normalize {
            normalize_instants(instants, interp)
        } else {
            instants
        };
        Self::assemble(instants, lower_inc, upper_inc, interp, true)
    }

    /// Single-instant shorthand for [`Sequence::new_unchecked`].
    pub(crate) fn instantaneous(inst: Instant, interp: Interpolation) -> Self {
        Self::assemble(vec![inst], true, true, interp, true)
    }

    fn assemble(
        instants: Vec<Instant>,
        lower_inc: bool,
        upper_inc: bool,
        interp: Interpolation,
        with_trajectory: bool,
    ) -> Self {
        // Runs are never empty once validated
        let period = Period::new_unchecked(
            instants[0].t,
            instants[instants.len() - 1].t,
            lower_inc,
            upper_inc,
        );
        let bbox = summarize(&instants);
        let trajectory = if with_trajectory {
            trace(&instants, interp)
        } else {
            None
        };
        Self {
            instants,
            interp,
            period,
            bbox,
            trajectory,
        }
    }

    /// A constant sequence taking `value` over `period`.
    pub fn from_base(value: impl Into<Value>, period: &Period, interp: Interpolation) -> Result<Self> {
        let value = value.into();
        let instants = if period.is_instantaneous() {
            vec![Instant::new(value, period.lower)]
        } else {
            vec![
                Instant::new(value.clone(), period.lower),
                Instant::new(value, period.upper),
            ]
        };
        Self::make(instants, period.lower_inc, period.upper_inc, interp, false)
    }

    /// A sequence made of a single instant.
    pub fn from_instant(inst: Instant, interp: Interpolation) -> Result<Self> {
        Self::make(vec![inst], true, true, interp, false)
    }

    /// Concatenate `other` after `self`.
    ///
    /// The two must share the same interpolation and value frame, and
    /// `other` must start where `self` ends. The boundary instant is kept
    /// from one side or dropped from both according to the flags. The
    /// bounding box is expanded from the two cached boxes.
    pub fn join(&self, other: &Sequence, drop_last: bool, drop_first: bool) -> Result<Self> {
        if self.interp != other.interp {
            return Err(TseqError::Validation(format!(
                "Cannot join {} and {} interpolation",
                self.interp, other.interp
            )));
        }
        if self.period.upper != other.period.lower {
            return Err(TseqError::Validation(format!(
                "Cannot join sequences ending at {} and starting at {}",
                self.period.upper, other.period.lower
            )));
        }
        let head = if drop_last {
            &self.instants[..self.instants.len() - 1]
        } else {
            &self.instants[..]
        };
        let tail = if drop_first {
            &other.instants[1..]
        } else {
            &other.instants[..]
        };
        match (head.last(), tail.first()) {
            (Some(a), Some(b)) => validate_successor(a, b)?,
            _ => {
                return Err(TseqError::Validation(
                    "Joining would leave an empty side".to_string(),
                ));
            }
        }
        let joined = self.join_unchecked(other, drop_last, drop_first);
        validate_instants(
            &joined.instants,
            joined.period.lower_inc,
            joined.period.upper_inc,
            joined.interp,
        )?;
        Ok(joined)
    }

    pub(crate) fn join_unchecked(&self, other: &Sequence, drop_last: bool, drop_first: bool) -> Self {
        let keep = if drop_last {
            self.instants.len() - 1
        } else {
            self.instants.len()
        };
        let skip = usize::from(drop_first);
        let mut instants = Vec::with_capacity(keep + other.instants.len() - skip);
        instants.extend_from_slice(&self.instants[..keep]);
        instants.extend_from_slice(&other.instants[skip..]);

        let linear = self.interp.is_linear();
        let trajectory = match (&self.trajectory, &other.trajectory) {
            (Some(a), Some(b)) if !(linear && (drop_last || drop_first)) => {
                Some(a.extend(b.points().iter().copied(), linear))
            }
            (Some(_), Some(_)) => trace(&instants, self.interp),
            _ => None,
        };
        Self {
            period: Period::new_unchecked(
                self.period.lower,
                other.period.upper,
                self.period.lower_inc,
                other.period.upper_inc,
            ),
            bbox: self.bbox.expand(&other.bbox),
            instants,
            interp: self.interp,
            trajectory,
        }
    }

    /// Append an instant at the end, closing the upper bound.
    ///
    /// When the current final instant becomes redundant it is replaced
    /// instead of kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use tseq::{Interpolation, Sequence};
    /// use tseq_types::Instant;
    ///
    /// let seq = Sequence::make(
    ///     vec![Instant::new(1.0, 0), Instant::new(2.0, 5)],
    ///     true,
    ///     true,
    ///     Interpolation::Linear,
    ///     true,
    /// )?;
    /// let longer = seq.append(Instant::new(3.0, 10))?;
    /// assert_eq!(longer.len(), 2);
    /// assert_eq!(longer.end_timestamp(), 10);
    /// # Ok::<(), tseq::TseqError>(())
    /// ```
    pub fn append(&self, inst: Instant) -> Result<Self> {
        validate_successor(self.end_instant(), &inst)?;
        validate_value(&inst.value)?;

        let n = self.instants.len();
        let replace = n > 1 && is_redundant(&self.instants[n - 2], &self.instants[n - 1], &inst, self.interp);
        let linear = self.interp.is_linear();
        let keep = if replace { n - 1 } else { n };

        let mut instants = Vec::with_capacity(keep + 1);
        instants.extend_from_slice(&self.instants[..keep]);
        instants.push(inst);

        let trajectory = match &self.trajectory {
            Some(_) if replace && linear => trace(&instants, self.interp),
            Some(traj) => instants[keep]
                .value
                .as_point()
                .map(|p| traj.extend([*p], linear)),
            None => None,
        };
        Ok(Self {
            period: Period::new_unchecked(self.period.lower, instants[keep].t, self.period.lower_inc, true),
            bbox: self.bbox.expand(&BoundingBox::from_instant(&instants[keep])),
            instants,
            interp: self.interp,
            trajectory,
        })
    }

    /// Merge two sequences, see [`Sequence::merge_array`].
    pub fn merge(&self, other: &Sequence) -> Result<SequenceSet> {
        Self::merge_array(&[self.clone(), other.clone()])
    }

    /// Merge sequences that may touch but never overlap in time.
    ///
    /// Inputs are sorted; touching inputs are fused when their boundary
    /// allows it. The inputs must share one interpolation and value frame.
    /// Overlapping inputs, or inputs that both include a shared instant with
    /// different values, are rejected as [`TseqError::InternalInvariant`].
    pub fn merge_array(sequences: &[Sequence]) -> Result<SequenceSet> {
        let mut sorted: Vec<Sequence> = sequences.to_vec();
        sorted.sort_by(|a, b| a.period.cmp(&b.period));
        for pair in sorted.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.interp != next.interp {
                return Err(TseqError::Validation(format!(
                    "Cannot merge {} and {} interpolation",
                    prev.interp, next.interp
                )));
            }
            if !prev.start_instant().value.same_frame(&next.start_instant().value) {
                return Err(TseqError::Validation(
                    "Cannot merge values of different frames".to_string(),
                ));
            }
            let (last, first) = (prev.end_instant(), next.start_instant());
            if last.t > first.t {
                return Err(TseqError::InternalInvariant(format!(
                    "The temporal values cannot overlap on time: {} and {}",
                    prev.period, next.period
                )));
            }
            if last.t == first.t
                && prev.period.upper_inc
                && next.period.lower_inc
                && last.value != first.value
            {
                return Err(TseqError::InternalInvariant(format!(
                    "The temporal values have different values at their shared instant {}",
                    last.t
                )));
            }
        }
        Ok(SequenceSet::from_sorted(sorted, true))
    }

    pub fn instants(&self) -> &[Instant] {
        &self.instants
    }

    pub fn instant_n(&self, n: usize) -> Option<&Instant> {
        self.instants.get(n)
    }

    /// Number of instants.
    pub fn len(&self) -> usize {
        self.instants.len()
    }

    /// Always false: a sequence holds at least one instant.
    pub fn is_empty(&self) -> bool {
        self.instants.is_empty()
    }

    pub fn start_instant(&self) -> &Instant {
        &self.instants[0]
    }

    pub fn end_instant(&self) -> &Instant {
        &self.instants[self.instants.len() - 1]
    }

    pub fn start_timestamp(&self) -> Timestamp {
        self.period.lower
    }

    pub fn end_timestamp(&self) -> Timestamp {
        self.period.upper
    }

    pub fn timestamps(&self) -> Vec<Timestamp> {
        self.instants.iter().map(|inst| inst.t).collect()
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interp
    }

    pub fn is_linear(&self) -> bool {
        self.interp.is_linear()
    }

    pub fn kind(&self) -> ValueKind {
        self.start_instant().kind()
    }

    pub fn lower_inc(&self) -> bool {
        self.period.lower_inc
    }

    pub fn upper_inc(&self) -> bool {
        self.period.upper_inc
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn duration(&self) -> Interval {
        self.period.duration()
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bbox
    }

    /// The path traced by a point sequence; computed on demand when it was
    /// not cached at construction.
    pub fn trajectory(&self) -> Option<Cow<'_, Trajectory>> {
        match &self.trajectory {
            Some(traj) => Some(Cow::Borrowed(traj)),
            None => trace(&self.instants, self.interp).map(Cow::Owned),
        }
    }

    /// Index of the segment containing `t`.
    ///
    /// Only the first segment honors the lower bound flag and only the last
    /// honors the upper bound flag; interior segments are `[inclusive,
    /// exclusive)`. Single-instant sequences have no segment.
    pub fn find_segment(&self, t: Timestamp) -> Option<usize> {
        let n = self.instants.len();
        if n < 2 || !self.period.contains_timestamp(t) {
            return None;
        }
        let at_or_before = self.instants.partition_point(|inst| inst.t <= t);
        Some((at_or_before - 1).min(n - 2))
    }

    /// Value at `t`, `None` outside the period (open bounds excluded).
    pub fn value_at(&self, t: Timestamp) -> Option<Value> {
        if !self.period.contains_timestamp(t) {
            return None;
        }
        if self.instants.len() == 1 {
            return Some(self.start_instant().value.clone());
        }
        let i = self.find_segment(t)?;
        Some(value_at_timestamp(
            &self.instants[i],
            &self.instants[i + 1],
            self.interp,
            t,
        ))
    }

    /// Like [`Sequence::value_at`] but also answers at exclusive bounds.
    pub fn value_at_inclusive(&self, t: Timestamp) -> Option<Value> {
        if t == self.period.lower {
            return Some(self.start_instant().value.clone());
        }
        if t == self.period.upper {
            return Some(self.end_instant().value.clone());
        }
        self.value_at(t)
    }

    /// The instant the sequence takes at `t`.
    pub fn at_timestamp(&self, t: Timestamp) -> Option<Instant> {
        self.value_at(t).map(|value| Instant { value, t })
    }

    /// Consecutive instant pairs.
    pub(crate) fn segments(&self) -> std::slice::Windows<'_, Instant> {
        self.instants.windows(2)
    }

    /// Consecutive instant pairs with the bound flags each one honors.
    pub(crate) fn bounded_segments(&self) -> impl Iterator<Item = (&Instant, &Instant, bool, bool)> + '_ {
        let last = self.instants.len().saturating_sub(2);
        self.segments().enumerate().map(move |(i, pair)| {
            let lower_inc = i > 0 || self.period.lower_inc;
            let upper_inc = i == last && self.period.upper_inc;
            (&pair[0], &pair[1], lower_inc, upper_inc)
        })
    }

    /// This sequence as a one-element set.
    pub(crate) fn to_set(&self) -> SequenceSet {
        SequenceSet::from_sorted(vec![self.clone()], false)
    }
}

/// Box of a non-empty run.
fn summarize(instants: &[Instant]) -> BoundingBox {
    instants[1..]
        .iter()
        .fold(BoundingBox::from_instant(&instants[0]), |acc, inst| {
            acc.expand(&BoundingBox::from_instant(inst))
        })
}

fn trace(instants: &[Instant], interp: Interpolation) -> Option<Trajectory> {
    let points: Vec<GeoPoint> = instants
        .iter()
        .map_while(|inst| inst.value.as_point().copied())
        .collect();
    if points.len() != instants.len() {
        return None;
    }
    Trajectory::from_points(points, interp.is_linear())
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.interp == other.interp && self.period == other.period && self.instants == other.instants
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.interp.is_linear() && self.kind().supports_linear() {
            write!(f, "Interp={};", self.interp)?;
        }
        write!(f, "{}", if self.period.lower_inc { '[' } else { '(' })?;
        for (i, inst) in self.instants.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", inst)?;
        }
        write!(f, "{}", if self.period.upper_inc { ']' } else { ')' })
    }
}

/// Serde form of a sequence; deserialization goes through [`Sequence::make`].
#[derive(Serialize, Deserialize)]
struct RawSequence {
    instants: Vec<Instant>,
    lower_inc: bool,
    upper_inc: bool,
    interpolation: Interpolation,
}

impl TryFrom<RawSequence> for Sequence {
    type Error = TseqError;

    fn try_from(raw: RawSequence) -> Result<Self> {
        Sequence::make(
            raw.instants,
            raw.lower_inc,
            raw.upper_inc,
            raw.interpolation,
            true,
        )
    }
}

impl From<Sequence> for RawSequence {
    fn from(seq: Sequence) -> Self {
        RawSequence {
            lower_inc: seq.period.lower_inc,
            upper_inc: seq.period.upper_inc,
            interpolation: seq.interp,
            instants: seq.instants,
        }
    }
}
