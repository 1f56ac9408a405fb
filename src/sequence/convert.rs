//! Casts between base kinds, interpolation changes and time shifting.

use super::Sequence;
use crate::error::{Result, TseqError};
use crate::instant_set::InstantSet;
use crate::sequence_set::SequenceSet;
use crate::types::Interpolation;
use tseq_types::{Instant, Interval, Value, ValueKind};

impl Sequence {
    /// Cast an Int sequence to Float, keeping Step interpolation.
    pub fn to_float(&self) -> Result<Sequence> {
        self.cast(ValueKind::Int, |value| match value {
            Value::Int(i) => Value::Float(f64::from(*i)),
            other => other.clone(),
        })
    }

    /// Cast a Step Float sequence to Int, truncating toward zero.
    pub fn to_int(&self) -> Result<Sequence> {
        if self.interp.is_linear() {
            return Err(TseqError::UnsupportedOperation(
                "Cannot cast a linear float sequence to int".to_string(),
            ));
        }
        self.cast(ValueKind::Float, |value| match value {
            Value::Float(f) => Value::Int(*f as i32),
            other => other.clone(),
        })
    }

    fn cast(&self, from: ValueKind, f: impl Fn(&Value) -> Value) -> Result<Sequence> {
        if self.kind() != from {
            return Err(TseqError::UnsupportedOperation(format!(
                "Expected a {} sequence, got {}",
                from,
                self.kind()
            )));
        }
        let instants = self
            .instants
            .iter()
            .map(|inst| Instant::new(f(&inst.value), inst.t))
            .collect();
        // Truncation may make neighbours equal; the run stays valid as is
        Ok(Sequence::new_unchecked(
            instants,
            self.period.lower_inc,
            self.period.upper_inc,
            self.interp,
            false,
        ))
    }

    /// Reinterpret a Step sequence as Linear.
    ///
    /// Each held value becomes a constant linear piece `[v@t1, v@t2)`; when
    /// the final value jumps under an inclusive upper bound, the last instant
    /// is kept as a piece of its own.
    pub fn step_to_linear(&self) -> Result<SequenceSet> {
        if !self.kind().supports_linear() {
            return Err(TseqError::UnsupportedOperation(format!(
                "Linear interpolation is not supported for {} values",
                self.kind()
            )));
        }
        if self.interp.is_linear() {
            return Ok(self.to_set());
        }
        if self.len() == 1 {
            return Ok(Sequence::instantaneous(self.start_instant().clone(), Interpolation::Linear).to_set());
        }

        let n = self.instants.len();
        let mut pieces = Vec::with_capacity(n);
        for (i, pair) in self.segments().enumerate() {
            let (inst1, inst2) = (&pair[0], &pair[1]);
            let lower_inc = i > 0 || self.period.lower_inc;
            let upper_inc = i == n - 2 && self.period.upper_inc && inst1.value == inst2.value;
            pieces.push(Sequence::new_unchecked(
                vec![inst1.clone(), Instant::new(inst1.value.clone(), inst2.t)],
                lower_inc,
                upper_inc,
                Interpolation::Linear,
                false,
            ));
        }
        let (prev, last) = (&self.instants[n - 2], &self.instants[n - 1]);
        if self.period.upper_inc && prev.value != last.value {
            pieces.push(Sequence::instantaneous(last.clone(), Interpolation::Linear));
        }
        Ok(SequenceSet::from_sorted(pieces, false))
    }

    /// The sequence moved in time by `interval` microseconds.
    pub fn shift(&self, interval: Interval) -> Sequence {
        Sequence {
            instants: self.instants.iter().map(|inst| inst.shift(interval)).collect(),
            interp: self.interp,
            period: self.period.shift(interval),
            bbox: self.bbox.shift(interval),
            trajectory: self.trajectory.clone(),
        }
    }
}

impl TryFrom<InstantSet> for Sequence {
    type Error = TseqError;

    /// A set holding one instant becomes an instantaneous sequence, linear
    /// when its kind allows it.
    fn try_from(set: InstantSet) -> Result<Self> {
        let mut instants: Vec<Instant> = set.into();
        if instants.len() != 1 {
            return Err(TseqError::Validation(format!(
                "Only a single-instant set converts to a sequence, got {} instants",
                instants.len()
            )));
        }
        let inst = instants.remove(0);
        let interp = Interpolation::from_linear(inst.kind().supports_linear());
        Ok(Sequence::instantaneous(inst, interp))
    }
}

impl TryFrom<SequenceSet> for Sequence {
    type Error = TseqError;

    fn try_from(set: SequenceSet) -> Result<Self> {
        let mut sequences = set.into_sequences();
        if sequences.len() != 1 {
            return Err(TseqError::Validation(format!(
                "Only a single-sequence set converts to a sequence, got {} sequences",
                sequences.len()
            )));
        }
        Ok(sequences.remove(0))
    }
}
