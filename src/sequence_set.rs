//! Ordered collections of time-disjoint sequences.
//!
//! Every at/minus restriction returns a [`SequenceSet`], since removing
//! part of a sequence can split it into several pieces.

use crate::error::{Result, TseqError};
use crate::sequence::Sequence;
use crate::sequence::normalize::normalize_sequences;
use serde::{Deserialize, Serialize};
use tseq_types::{Interval, PeriodSet, Timestamp, Value};

/// Sequences sorted by time, sharing at most a bound instant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Sequence>", into = "Vec<Sequence>")]
pub struct SequenceSet {
    sequences: Vec<Sequence>,
}

impl SequenceSet {
    /// Build a set from sequences in any order.
    ///
    /// The sequences must share one interpolation and value frame and may
    /// only meet at a common instant carrying the same value. With
    /// `normalize`, touching sequences are fused where the boundary allows.
    ///
    /// # Examples
    ///
    /// ```
    /// use tseq::{Interpolation, Sequence, SequenceSet};
    /// use tseq_types::Instant;
    ///
    /// let a = Sequence::make(vec![Instant::new(1.0, 0), Instant::new(2.0, 10)], true, false, Interpolation::Linear, true)?;
    /// let b = Sequence::make(vec![Instant::new(2.0, 10), Instant::new(3.0, 20)], true, true, Interpolation::Linear, true)?;
    /// let set = SequenceSet::make(vec![b, a], true)?;
    /// assert_eq!(set.len(), 1);
    /// assert_eq!(set.duration(), 20);
    /// # Ok::<(), tseq::TseqError>(())
    /// ```
    pub fn make(mut sequences: Vec<Sequence>, normalize: bool) -> Result<Self> {
        sequences.sort_by(|a, b| a.period().cmp(b.period()));
        for pair in sequences.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.interpolation() != next.interpolation() {
                return Err(TseqError::Validation(
                    "Sequences of a set must share one interpolation".to_string(),
                ));
            }
            if !prev.start_instant().value.same_frame(&next.start_instant().value) {
                return Err(TseqError::Validation(
                    "Sequences of a set must share one value frame".to_string(),
                ));
            }
            if prev.period().overlaps(next.period()) {
                let shared = prev.end_timestamp() == next.start_timestamp()
                    && prev.end_instant().value == next.start_instant().value;
                if !shared {
                    return Err(TseqError::Validation(format!(
                        "Sequences {} and {} overlap",
                        prev.period(),
                        next.period()
                    )));
                }
            }
        }
        Ok(Self::from_sorted(sequences, normalize))
    }

    /// Build from sequences already sorted and disjoint.
    pub(crate) fn from_sorted(sequences: Vec<Sequence>, normalize: bool) -> Self {
        let sequences = if normalize && sequences.len() > 1 {
            normalize_sequences(sequences)
        } else {
            sequences
        };
        Self { sequences }
    }

    /// Build from disjoint sequences in any order.
    pub(crate) fn from_unsorted(mut sequences: Vec<Sequence>, normalize: bool) -> Self {
        sequences.sort_by(|a, b| a.period().cmp(b.period()));
        Self::from_sorted(sequences, normalize)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn into_sequences(self) -> Vec<Sequence> {
        self.sequences
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sequence> {
        self.sequences.iter()
    }

    /// Total number of instants across the sequences.
    pub fn num_instants(&self) -> usize {
        self.sequences.iter().map(Sequence::len).sum()
    }

    /// The time covered by the set.
    pub fn get_time(&self) -> PeriodSet {
        PeriodSet::new(self.sequences.iter().map(|seq| *seq.period()).collect())
    }

    pub fn duration(&self) -> Interval {
        self.sequences.iter().map(Sequence::duration).sum()
    }

    pub fn start_timestamp(&self) -> Option<Timestamp> {
        self.sequences.first().map(Sequence::start_timestamp)
    }

    pub fn end_timestamp(&self) -> Option<Timestamp> {
        self.sequences.last().map(Sequence::end_timestamp)
    }

    pub fn value_at(&self, t: Timestamp) -> Option<Value> {
        let idx = self.sequences.partition_point(|seq| {
            let p = seq.period();
            p.upper < t || (p.upper == t && !p.upper_inc)
        });
        self.sequences.get(idx)?.value_at(t)
    }
}

impl TryFrom<Vec<Sequence>> for SequenceSet {
    type Error = TseqError;

    fn try_from(sequences: Vec<Sequence>) -> Result<Self> {
        Self::make(sequences, true)
    }
}

impl From<SequenceSet> for Vec<Sequence> {
    fn from(set: SequenceSet) -> Self {
        set.sequences
    }
}

impl<'a> IntoIterator for &'a SequenceSet {
    type Item = &'a Sequence;
    type IntoIter = std::slice::Iter<'a, Sequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sequences.iter()
    }
}

impl IntoIterator for SequenceSet {
    type Item = Sequence;
    type IntoIter = std::vec::IntoIter<Sequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sequences.into_iter()
    }
}

impl std::fmt::Display for SequenceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, seq) in self.sequences.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", seq)?;
        }
        write!(f, "}}")
    }
}
