use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A range over `f64` with independent bound inclusivity.
///
/// # Examples
///
/// ```
/// use tseq_types::range::FloatRange;
///
/// let r = FloatRange::new(1.0, 3.0, true, false).unwrap();
/// assert!(r.contains(1.0));
/// assert!(!r.contains(3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    pub lower: f64,
    pub upper: f64,
    pub lower_inc: bool,
    pub upper_inc: bool,
}

impl FloatRange {
    pub fn new(lower: f64, upper: f64, lower_inc: bool, upper_inc: bool) -> Result<Self, TypesError> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(TypesError::InvalidRange(format!(
                "bounds must be finite, got {} and {}",
                lower, upper
            )));
        }
        if lower > upper {
            return Err(TypesError::InvalidRange(format!(
                "lower bound {} is greater than upper bound {}",
                lower, upper
            )));
        }
        if lower == upper && !(lower_inc && upper_inc) {
            return Err(TypesError::InvalidRange(format!(
                "singleton range at {} must have inclusive bounds",
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

    /// The closed range `[v, v]`.
    pub fn singleton(v: f64) -> Self {
        Self {
            lower: v,
            upper: v,
            lower_inc: true,
            upper_inc: true,
        }
    }

    pub fn contains(&self, v: f64) -> bool {
        (self.lower < v || (self.lower == v && self.lower_inc))
            && (v < self.upper || (v == self.upper && self.upper_inc))
    }

    pub fn overlaps(&self, other: &FloatRange) -> bool {
        self.intersection(other).is_some()
    }

    pub fn intersection(&self, other: &FloatRange) -> Option<FloatRange> {
        let (lower, lower_inc) = match self.lower.total_cmp(&other.lower) {
            Ordering::Greater => (self.lower, self.lower_inc),
            Ordering::Less => (other.lower, other.lower_inc),
            Ordering::Equal => (self.lower, self.lower_inc && other.lower_inc),
        };
        let (upper, upper_inc) = match self.upper.total_cmp(&other.upper) {
            Ordering::Less => (self.upper, self.upper_inc),
            Ordering::Greater => (other.upper, other.upper_inc),
            Ordering::Equal => (self.upper, self.upper_inc && other.upper_inc),
        };
        FloatRange::new(lower, upper, lower_inc, upper_inc).ok()
    }

    /// Whether the ranges overlap or share a bound where one side is closed.
    fn touches(&self, next: &FloatRange) -> bool {
        self.upper > next.lower || (self.upper == next.lower && (self.upper_inc || next.lower_inc))
    }
}

impl std::fmt::Display for FloatRange {
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

/// Sort ranges by lower bound and merge overlapping or touching ones.
pub fn normalize_ranges(mut ranges: Vec<FloatRange>) -> Vec<FloatRange> {
    ranges.sort_by(|a, b| {
        a.lower
            .total_cmp(&b.lower)
            .then_with(|| b.lower_inc.cmp(&a.lower_inc))
    });
    let mut merged: Vec<FloatRange> = Vec::with_capacity(ranges.len());
    for r in ranges {
        match merged.last_mut() {
            Some(last) if last.touches(&r) => {
                match last.upper.total_cmp(&r.upper) {
                    Ordering::Less => {
                        last.upper = r.upper;
                        last.upper_inc = r.upper_inc;
                    }
                    Ordering::Equal => last.upper_inc |= r.upper_inc,
                    Ordering::Greater => {}
                }
            }
            _ => merged.push(r),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(lower: f64, upper: f64, lower_inc: bool, upper_inc: bool) -> FloatRange {
        FloatRange::new(lower, upper, lower_inc, upper_inc).unwrap()
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(FloatRange::new(2.0, 1.0, true, true).is_err());
        assert!(FloatRange::new(1.0, 1.0, true, false).is_err());
        assert!(FloatRange::new(f64::NAN, 1.0, true, true).is_err());
    }

    #[test]
    fn test_intersection() {
        let a = r(0.0, 5.0, true, true);
        let b = r(5.0, 8.0, false, true);
        assert!(a.intersection(&b).is_none());
        assert_eq!(
            a.intersection(&r(3.0, 8.0, true, true)),
            Some(r(3.0, 5.0, true, true))
        );
    }

    #[test]
    fn test_normalize_ranges() {
        let merged = normalize_ranges(vec![
            r(5.0, 6.0, true, true),
            r(0.0, 2.0, true, false),
            r(2.0, 3.0, true, true),
            r(6.0, 7.0, false, false),
        ]);
        assert_eq!(merged, vec![r(0.0, 3.0, true, true), r(5.0, 7.0, true, false)]);
    }
}
