//! Restriction by timestamp, timestamp set, period and period set.

use super::Sequence;
use crate::compute::segment::value_at_timestamp;
use crate::instant_set::InstantSet;
use crate::sequence_set::SequenceSet;
use tseq_types::{Instant, Period, PeriodSet, Timestamp, TimestampSet};

impl Sequence {
    /// The time the sequence is defined on.
    pub fn get_time(&self) -> PeriodSet {
        PeriodSet::from_period(self.period)
    }

    /// Segment starting at or before `t`, ignoring bound inclusivity.
    fn segment_from(&self, t: Timestamp) -> usize {
        let n = self.instants.len();
        self.instants
            .partition_point(|inst| inst.t <= t)
            .saturating_sub(1)
            .min(n.saturating_sub(2))
    }

    /// The sequence cut to `period`, `None` when they do not overlap.
    ///
    /// Bound instants are interpolated; a Step cut with an open upper bound
    /// repeats the held value at its end.
    pub(crate) fn restrict_period(&self, period: &Period) -> Option<Sequence> {
        let inter = self.period.intersection(period)?;
        if inter.is_instantaneous() {
            let value = self.value_at_inclusive(inter.lower)?;
            return Some(Sequence::instantaneous(
                Instant::new(value, inter.lower),
                self.interp,
            ));
        }
        if inter == self.period {
            return Some(self.clone());
        }

        let first = self.segment_from(inter.lower);
        let last = self
            .instants
            .partition_point(|inst| inst.t < inter.upper)
            .saturating_sub(1);
        let mut instants = Vec::with_capacity(last - first + 2);
        instants.push(Instant::new(
            value_at_timestamp(
                &self.instants[first],
                &self.instants[first + 1],
                self.interp,
                inter.lower,
            ),
            inter.lower,
        ));
        instants.extend_from_slice(&self.instants[first + 1..=last]);
        let end_value = if self.interp.is_linear() || inter.upper_inc {
            value_at_timestamp(
                &self.instants[last],
                &self.instants[last + 1],
                self.interp,
                inter.upper,
            )
        } else {
            instants[instants.len() - 1].value.clone()
        };
        instants.push(Instant::new(end_value, inter.upper));
        Some(Sequence::new_unchecked(
            instants,
            inter.lower_inc,
            inter.upper_inc,
            self.interp,
            false,
        ))
    }

    /// The sequence restricted to `period`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tseq::{Interpolation, Sequence};
    /// use tseq_types::{Instant, Period};
    ///
    /// let seq = Sequence::make(
    ///     vec![Instant::new(1.0, 0), Instant::new(3.0, 10), Instant::new(1.0, 20)],
    ///     true,
    ///     true,
    ///     Interpolation::Linear,
    ///     true,
    /// )?;
    /// let cut = seq.at_period(&Period::new(5, 15, true, true)?);
    /// assert_eq!(cut.to_string(), "{[2@5, 3@10, 2@15]}");
    /// # Ok::<(), tseq::TseqError>(())
    /// ```
    pub fn at_period(&self, period: &Period) -> SequenceSet {
        match self.restrict_period(period) {
            Some(seq) => SequenceSet::from_sorted(vec![seq], false),
            None => SequenceSet::empty(),
        }
    }

    /// The sequence with `period` removed.
    pub fn minus_period(&self, period: &Period) -> SequenceSet {
        if !self.period.overlaps(period) {
            return self.to_set();
        }
        if self.len() == 1 {
            return SequenceSet::empty();
        }
        let rest = PeriodSet::minus_from(&self.period, &PeriodSet::from_period(*period));
        self.at_periodset(&rest)
    }

    /// The sequence restricted to each period of `periods`.
    pub fn at_periodset(&self, periods: &PeriodSet) -> SequenceSet {
        let Some(span) = periods.span() else {
            return SequenceSet::empty();
        };
        if !self.period.overlaps(&span) {
            return SequenceSet::empty();
        }
        if self.len() == 1 {
            return if periods.contains_timestamp(self.period.lower) {
                self.to_set()
            } else {
                SequenceSet::empty()
            };
        }
        let start = periods
            .periods()
            .partition_point(|p| p.upper < self.period.lower);
        let pieces = periods.periods()[start..]
            .iter()
            .take_while(|p| p.lower <= self.period.upper)
            .filter_map(|p| self.restrict_period(p))
            .collect();
        SequenceSet::from_sorted(pieces, false)
    }

    /// The sequence with every period of `periods` removed.
    pub fn minus_periodset(&self, periods: &PeriodSet) -> SequenceSet {
        if !periods.overlaps_period(&self.period) {
            return self.to_set();
        }
        if self.len() == 1 {
            return SequenceSet::empty();
        }
        let rest = PeriodSet::minus_from(&self.period, periods);
        self.at_periodset(&rest)
    }

    /// The sequence with the instant at `t` removed, split around `t`.
    pub fn minus_timestamp(&self, t: Timestamp) -> SequenceSet {
        if !self.period.contains_timestamp(t) {
            return self.to_set();
        }
        if self.len() == 1 {
            return SequenceSet::empty();
        }
        let p = &self.period;
        let mut pieces = Vec::with_capacity(2);
        if p.lower < t {
            let left = Period::new_unchecked(p.lower, t, p.lower_inc, false);
            pieces.extend(self.restrict_period(&left));
        }
        if t < p.upper {
            let right = Period::new_unchecked(t, p.upper, false, p.upper_inc);
            pieces.extend(self.restrict_period(&right));
        }
        SequenceSet::from_sorted(pieces, false)
    }

    /// The instants the sequence takes at each timestamp of `timestamps`.
    pub fn at_timestampset(&self, timestamps: &TimestampSet) -> InstantSet {
        let ts = timestamps.timestamps();
        let start = ts.partition_point(|&t| t < self.period.lower);
        let n = self.instants.len();
        let mut seg = 0;
        let mut instants = Vec::new();
        for &t in ts[start..].iter().take_while(|&&t| t <= self.period.upper) {
            if !self.period.contains_timestamp(t) {
                continue;
            }
            if n == 1 {
                instants.push(self.instants[0].clone());
                continue;
            }
            while seg < n - 2 && self.instants[seg + 1].t <= t {
                seg += 1;
            }
            let value = value_at_timestamp(&self.instants[seg], &self.instants[seg + 1], self.interp, t);
            instants.push(Instant::new(value, t));
        }
        InstantSet::from_sorted(instants)
    }

    /// The sequence with every timestamp of `timestamps` removed.
    pub fn minus_timestampset(&self, timestamps: &TimestampSet) -> SequenceSet {
        let removed: Vec<Period> = timestamps
            .timestamps()
            .iter()
            .filter(|&&t| self.period.contains_timestamp(t))
            .map(|&t| Period::instant(t))
            .collect();
        if removed.is_empty() {
            return self.to_set();
        }
        if self.len() == 1 {
            return SequenceSet::empty();
        }
        let rest = PeriodSet::minus_from(&self.period, &PeriodSet::new(removed));
        self.at_periodset(&rest)
    }

    pub fn intersects_timestamp(&self, t: Timestamp) -> bool {
        self.period.contains_timestamp(t)
    }

    pub fn intersects_timestampset(&self, timestamps: &TimestampSet) -> bool {
        let ts = timestamps.timestamps();
        let start = ts.partition_point(|&t| t < self.period.lower);
        ts[start..]
            .iter()
            .take_while(|&&t| t <= self.period.upper)
            .any(|&t| self.period.contains_timestamp(t))
    }

    pub fn intersects_period(&self, period: &Period) -> bool {
        self.period.overlaps(period)
    }

    pub fn intersects_periodset(&self, periods: &PeriodSet) -> bool {
        periods.overlaps_period(&self.period)
    }
}
