//! Time spans with independent bound inclusivity, and ordered sets of spans
//! and timestamps.

use crate::error::TypesError;
use crate::time::{Interval, Timestamp};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Compare two lower bounds. At the same timestamp an inclusive lower bound
/// starts earlier than an exclusive one.
pub fn cmp_lower(t1: Timestamp, inc1: bool, t2: Timestamp, inc2: bool) -> Ordering {
    t1.cmp(&t2).then_with(|| inc2.cmp(&inc1))
}

/// Compare two upper bounds. At the same timestamp an exclusive upper bound
/// ends earlier than an inclusive one.
pub fn cmp_upper(t1: Timestamp, inc1: bool, t2: Timestamp, inc2: bool) -> Ordering {
    t1.cmp(&t2).then_with(|| inc1.cmp(&inc2))
}

/// A span of time `[lower, upper]` where each bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub lower: Timestamp,
    pub upper: Timestamp,
    pub lower_inc: bool,
    pub upper_inc: bool,
}

impl Period {
    /// Create a period, rejecting reversed or empty spans.
    ///
    /// # Examples
    ///
    /// ```
    /// use tseq_types::period::Period;
    ///
    /// assert!(Period::new(0, 10, true, false).is_ok());
    /// assert!(Period::new(10, 0, true, true).is_err());
    /// assert!(Period::new(5, 5, true, false).is_err());
    /// ```
    pub fn new(
        lower: Timestamp,
        upper: Timestamp,
        lower_inc: bool,
        upper_inc: bool,
    ) -> Result<Self, TypesError> {
        if lower > upper {
            return Err(TypesError::InvalidPeriod(format!(
                "lower bound {} is after upper bound {}",
                lower, upper
            )));
        }
        if lower == upper && !(lower_inc && upper_inc) {
            return Err(TypesError::InvalidPeriod(format!(
                "instantaneous period at {} must have inclusive bounds",
                lower
            )));
        }
        Ok(Self {
            lower,
            upper,
            lower_inc,
            upper_inc,
        })
    }

    /// Build a period the caller has already validated.
    pub const fn new_unchecked(
        lower: Timestamp,
        upper: Timestamp,
        lower_inc: bool,
        upper_inc: bool,
    ) -> Self {
        Self {
            lower,
            upper,
            lower_inc,
            upper_inc,
        }
    }

    /// The closed instantaneous period `[t, t]`.
    pub const fn instant(t: Timestamp) -> Self {
        Self::new_unchecked(t, t, true, true)
    }

    pub fn is_instantaneous(&self) -> bool {
        self.lower == self.upper
    }

    pub fn duration(&self) -> Interval {
        self.upper - self.lower
    }

    pub fn contains_timestamp(&self, t: Timestamp) -> bool {
        (self.lower < t || (self.lower == t && self.lower_inc))
            && (t < self.upper || (t == self.upper && self.upper_inc))
    }

    pub fn contains_period(&self, other: &Period) -> bool {
        cmp_lower(self.lower, self.lower_inc, other.lower, other.lower_inc).is_le()
            && cmp_upper(self.upper, self.upper_inc, other.upper, other.upper_inc).is_ge()
    }

    pub fn overlaps(&self, other: &Period) -> bool {
        let self_before = self.upper < other.lower
            || (self.upper == other.lower && !(self.upper_inc && other.lower_inc));
        let other_before = other.upper < self.lower
            || (other.upper == self.lower && !(other.upper_inc && self.lower_inc));
        !self_before && !other_before
    }

    /// True when the two periods touch at one bound without overlapping.
    pub fn adjacent(&self, other: &Period) -> bool {
        (self.upper == other.lower && self.upper_inc != other.lower_inc)
            || (other.upper == self.lower && other.upper_inc != self.lower_inc)
    }

    pub fn intersection(&self, other: &Period) -> Option<Period> {
        let (lower, lower_inc) =
            if cmp_lower(self.lower, self.lower_inc, other.lower, other.lower_inc).is_ge() {
                (self.lower, self.lower_inc)
            } else {
                (other.lower, other.lower_inc)
            };
        let (upper, upper_inc) =
            if cmp_upper(self.upper, self.upper_inc, other.upper, other.upper_inc).is_le() {
                (self.upper, self.upper_inc)
            } else {
                (other.upper, other.upper_inc)
            };
        Period::new(lower, upper, lower_inc, upper_inc).ok()
    }

    /// The parts of `self` not covered by `other`: zero, one or two periods.
    pub fn minus(&self, other: &Period) -> Vec<Period> {
        if !self.overlaps(other) {
            return vec![*self];
        }
        let mut result = Vec::with_capacity(2);
        if cmp_lower(self.lower, self.lower_inc, other.lower, other.lower_inc).is_lt()
            && let Ok(left) = Period::new(self.lower, other.lower, self.lower_inc, !other.lower_inc)
        {
            result.push(left);
        }
        if cmp_upper(self.upper, self.upper_inc, other.upper, other.upper_inc).is_gt()
            && let Ok(right) =
                Period::new(other.upper, self.upper, !other.upper_inc, self.upper_inc)
        {
            result.push(right);
        }
        result
    }

    /// Smallest period covering both.
    pub fn expand(&self, other: &Period) -> Period {
        let (lower, lower_inc) =
            if cmp_lower(self.lower, self.lower_inc, other.lower, other.lower_inc).is_le() {
                (self.lower, self.lower_inc)
            } else {
                (other.lower, other.lower_inc)
            };
        let (upper, upper_inc) =
            if cmp_upper(self.upper, self.upper_inc, other.upper, other.upper_inc).is_ge() {
                (self.upper, self.upper_inc)
            } else {
                (other.upper, other.upper_inc)
            };
        Period::new_unchecked(lower, upper, lower_inc, upper_inc)
    }

    pub fn shift(&self, interval: Interval) -> Period {
        Period::new_unchecked(
            self.lower + interval,
            self.upper + interval,
            self.lower_inc,
            self.upper_inc,
        )
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_lower(self.lower, self.lower_inc, other.lower, other.lower_inc)
            .then_with(|| cmp_upper(self.upper, self.upper_inc, other.upper, other.upper_inc))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}, {}{}",
            if self.lower_inc { '[' } else { '(' },
            self.lower,
            self.upper,
            if self.upper_inc { ']' } else { ')' }
        )
    }
}

/// An ordered set of disjoint, non-adjacent periods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodSet {
    periods: Vec<Period>,
}

impl PeriodSet {
    /// Sort the periods and merge those that overlap or touch.
    ///
    /// # Examples
    ///
    /// ```
    /// use tseq_types::period::{Period, PeriodSet};
    ///
    /// let ps = PeriodSet::new(vec![
    ///     Period::new(5, 10, true, true).unwrap(),
    ///     Period::new(0, 5, true, false).unwrap(),
    ///     Period::new(20, 30, false, true).unwrap(),
    /// ]);
    /// assert_eq!(ps.len(), 2);
    /// assert_eq!(ps.duration(), 20);
    /// ```
    pub fn new(mut periods: Vec<Period>) -> Self {
        periods.sort();
        let mut merged: Vec<Period> = Vec::with_capacity(periods.len());
        for p in periods {
            match merged.last_mut() {
                Some(last) if last.overlaps(&p) || last.adjacent(&p) => {
                    *last = last.expand(&p);
                }
                _ => merged.push(p),
            }
        }
        Self { periods: merged }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_period(period: Period) -> Self {
        Self {
            periods: vec![period],
        }
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Period> {
        self.periods.iter()
    }

    /// The period from the first lower bound to the last upper bound.
    pub fn span(&self) -> Option<Period> {
        let first = self.periods.first()?;
        let last = self.periods.last()?;
        Some(Period::new_unchecked(
            first.lower,
            last.upper,
            first.lower_inc,
            last.upper_inc,
        ))
    }

    pub fn duration(&self) -> Interval {
        self.periods.iter().map(Period::duration).sum()
    }

    /// Locate `t`: `Ok(i)` when period `i` contains it, otherwise `Err(i)`
    /// with the index of the first period starting after `t`.
    pub fn find_timestamp(&self, t: Timestamp) -> Result<usize, usize> {
        let idx = self
            .periods
            .partition_point(|p| p.upper < t || (p.upper == t && !p.upper_inc));
        match self.periods.get(idx) {
            Some(p) if p.contains_timestamp(t) => Ok(idx),
            _ => Err(idx),
        }
    }

    pub fn contains_timestamp(&self, t: Timestamp) -> bool {
        self.find_timestamp(t).is_ok()
    }

    pub fn overlaps_period(&self, period: &Period) -> bool {
        self.periods.iter().any(|p| p.overlaps(period))
    }

    /// The parts of `period` not covered by `subtrahend`.
    pub fn minus_from(period: &Period, subtrahend: &PeriodSet) -> PeriodSet {
        let mut remaining = vec![*period];
        for s in &subtrahend.periods {
            if s.lower > period.upper {
                break;
            }
            remaining = remaining.iter().flat_map(|r| r.minus(s)).collect();
            if remaining.is_empty() {
                break;
            }
        }
        PeriodSet::new(remaining)
    }

    /// Pieces of this set inside `period`.
    pub fn intersection_period(&self, period: &Period) -> PeriodSet {
        let periods = self
            .periods
            .iter()
            .filter_map(|p| p.intersection(period))
            .collect();
        PeriodSet { periods }
    }

    pub fn shift(&self, interval: Interval) -> PeriodSet {
        PeriodSet {
            periods: self.periods.iter().map(|p| p.shift(interval)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PeriodSet {
    type Item = &'a Period;
    type IntoIter = std::slice::Iter<'a, Period>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.iter()
    }
}

impl std::fmt::Display for PeriodSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, p) in self.periods.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, "}}")
    }
}

/// A strictly increasing set of timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimestampSet {
    timestamps: Vec<Timestamp>,
}

impl TimestampSet {
    /// Sort and deduplicate.
    pub fn new(timestamps: impl IntoIterator<Item = Timestamp>) -> Self {
        let mut timestamps: Vec<Timestamp> = timestamps.into_iter().collect();
        timestamps.sort_unstable();
        timestamps.dedup();
        Self { timestamps }
    }

    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn span(&self) -> Option<Period> {
        let first = *self.timestamps.first()?;
        let last = *self.timestamps.last()?;
        Some(Period::new_unchecked(first, last, true, true))
    }

    pub fn find_timestamp(&self, t: Timestamp) -> Result<usize, usize> {
        self.timestamps.binary_search(&t)
    }

    pub fn contains(&self, t: Timestamp) -> bool {
        self.find_timestamp(t).is_ok()
    }

    pub fn shift(&self, interval: Interval) -> TimestampSet {
        TimestampSet {
            timestamps: self.timestamps.iter().map(|t| t + interval).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lower: i64, upper: i64, lower_inc: bool, upper_inc: bool) -> Period {
        Period::new(lower, upper, lower_inc, upper_inc).unwrap()
    }

    #[test]
    fn test_contains_timestamp_bounds() {
        let period = p(0, 10, false, true);
        assert!(!period.contains_timestamp(0));
        assert!(period.contains_timestamp(5));
        assert!(period.contains_timestamp(10));
        assert!(!period.contains_timestamp(11));
    }

    #[test]
    fn test_overlaps_at_shared_bound() {
        assert!(p(0, 5, true, true).overlaps(&p(5, 10, true, true)));
        assert!(!p(0, 5, true, false).overlaps(&p(5, 10, true, true)));
        assert!(p(0, 5, true, false).adjacent(&p(5, 10, true, true)));
    }

    #[test]
    fn test_intersection() {
        let i = p(0, 10, true, true).intersection(&p(5, 15, false, true)).unwrap();
        assert_eq!(i, p(5, 10, false, true));
        assert!(p(0, 5, true, false).intersection(&p(5, 10, true, true)).is_none());
    }

    #[test]
    fn test_minus_splits() {
        let pieces = p(0, 10, true, true).minus(&p(3, 6, true, true));
        assert_eq!(pieces, vec![p(0, 3, true, false), p(6, 10, false, true)]);

        let pieces = p(0, 10, true, true).minus(&Period::instant(0));
        assert_eq!(pieces, vec![p(0, 10, false, true)]);

        assert!(p(2, 4, true, true).minus(&p(0, 10, true, true)).is_empty());
    }

    #[test]
    fn test_ordering() {
        assert!(p(0, 5, true, true) < p(0, 5, false, true));
        assert!(p(0, 5, true, false) < p(0, 5, true, true));
        assert!(p(0, 5, true, true) < p(1, 2, true, true));
    }

    #[test]
    fn test_periodset_merge_and_find() {
        let ps = PeriodSet::new(vec![p(10, 20, true, true), p(0, 5, true, false), p(5, 7, true, true)]);
        assert_eq!(ps.periods(), &[p(0, 7, true, true), p(10, 20, true, true)]);
        assert_eq!(ps.find_timestamp(3), Ok(0));
        assert_eq!(ps.find_timestamp(8), Err(1));
        assert_eq!(ps.find_timestamp(15), Ok(1));
        assert_eq!(ps.find_timestamp(25), Err(2));
    }

    #[test]
    fn test_minus_from() {
        let whole = p(0, 10, true, true);
        let holes = PeriodSet::new(vec![Period::instant(5), p(8, 12, true, true)]);
        let rest = PeriodSet::minus_from(&whole, &holes);
        assert_eq!(
            rest.periods(),
            &[p(0, 5, true, false), p(5, 8, false, false)]
        );
    }

    #[test]
    fn test_timestampset() {
        let ts = TimestampSet::new([5, 1, 3, 3]);
        assert_eq!(ts.timestamps(), &[1, 3, 5]);
        assert_eq!(ts.span(), Some(p(1, 5, true, true)));
        assert!(ts.contains(3));
        assert!(!ts.contains(4));
    }
}
