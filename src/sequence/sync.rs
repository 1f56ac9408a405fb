//! Pairwise synchronization and temporal intersection.
//!
//! Binary operators on two sequences are lifted by first aligning them on a
//! common run of timestamps. With crossings enabled the alignment also gets
//! an instant wherever the two values meet inside a segment, so lifted
//! comparisons change truth value exactly there.

use super::Sequence;
use crate::compute::segment::crossing;
use crate::instant_set::InstantSet;
use std::cmp::Ordering;
use tseq_types::{Instant, Timestamp};

impl Sequence {
    /// Align `self` and `other` on their common period.
    ///
    /// Both results carry the same timestamps and bounds. They are not
    /// normalized. Returns `None` when the periods do not overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use tseq::{Interpolation, Sequence};
    /// use tseq_types::{Instant, Value};
    ///
    /// let make = |a: f64, b: f64| {
    ///     Sequence::make(
    ///         vec![Instant::new(a, 0), Instant::new(b, 10)],
    ///         true,
    ///         true,
    ///         Interpolation::Linear,
    ///         true,
    ///     )
    /// };
    /// let (up, down) = (make(1.0, 3.0)?, make(3.0, 1.0)?);
    /// let (s1, s2) = up.synchronize(&down, true).unwrap();
    /// assert_eq!(s1.timestamps(), vec![0, 5, 10]);
    /// assert_eq!(s1.value_at(5), Some(Value::Float(2.0)));
    /// assert_eq!(s2.value_at(5), Some(Value::Float(2.0)));
    /// # Ok::<(), tseq::TseqError>(())
    /// ```
    pub fn synchronize(&self, other: &Sequence, add_crossings: bool) -> Option<(Sequence, Sequence)> {
        let inter = self.period.intersection(&other.period)?;
        let a = self.restrict_period(&inter)?;
        let b = other.restrict_period(&inter)?;
        if inter.is_instantaneous() {
            return Some((a, b));
        }

        let (interp1, interp2) = (a.interp, b.interp);
        let crossings = add_crossings && (interp1.is_linear() || interp2.is_linear());
        let capacity = (a.len() + b.len()) * 2;
        let mut out1: Vec<Instant> = Vec::with_capacity(capacity);
        let mut out2: Vec<Instant> = Vec::with_capacity(capacity);
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            let (x, y) = (&a.instants[i], &b.instants[j]);
            let (inst1, inst2) = match x.t.cmp(&y.t) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                    (x.clone(), y.clone())
                }
                Ordering::Less => {
                    i += 1;
                    (x.clone(), b.interior_instant(x.t)?)
                }
                Ordering::Greater => {
                    j += 1;
                    (a.interior_instant(y.t)?, y.clone())
                }
            };
            if crossings
                && let (Some(prev1), Some(prev2)) = (out1.last(), out2.last())
                && let Some((v1, v2, t)) = crossing((prev1, &inst1, interp1), (prev2, &inst2, interp2))
            {
                log::trace!("crossing at {} between {} and {}", t, v1, v2);
                out1.push(Instant::new(v1, t));
                out2.push(Instant::new(v2, t));
            }
            out1.push(inst1);
            out2.push(inst2);
        }

        if !inter.upper_inc {
            close_held_value(&mut out1, interp1.is_linear());
            close_held_value(&mut out2, interp2.is_linear());
        }
        log::debug!(
            "synchronized {} and {} instants into {} on {}",
            self.len(),
            other.len(),
            out1.len(),
            inter
        );
        Some((
            Sequence::new_unchecked(out1, inter.lower_inc, inter.upper_inc, interp1, false),
            Sequence::new_unchecked(out2, inter.lower_inc, inter.upper_inc, interp2, false),
        ))
    }

    /// Instant at a timestamp known to lie inside the period.
    fn interior_instant(&self, t: Timestamp) -> Option<Instant> {
        self.value_at_inclusive(t).map(|value| Instant::new(value, t))
    }

    /// The instant of `self` at the timestamp of `inst`, paired with `inst`.
    pub fn intersection_with_instant(&self, inst: &Instant) -> Option<(Instant, Instant)> {
        let found = self.at_timestamp(inst.t)?;
        Some((found, inst.clone()))
    }

    /// The instants of `self` at the timestamps of `instants`, paired with
    /// the matching instants of the set.
    pub fn intersection_with_instants(&self, instants: &InstantSet) -> Option<(InstantSet, InstantSet)> {
        let (mut mine, mut theirs) = (Vec::new(), Vec::new());
        for inst in instants.iter() {
            if inst.t > self.period.upper {
                break;
            }
            if let Some(found) = self.at_timestamp(inst.t) {
                mine.push(found);
                theirs.push(inst.clone());
            }
        }
        if mine.is_empty() {
            return None;
        }
        Some((InstantSet::from_sorted(mine), InstantSet::from_sorted(theirs)))
    }

    /// Both sequences restricted to their common period.
    pub fn intersection(&self, other: &Sequence) -> Option<(Sequence, Sequence)> {
        let inter = self.period.intersection(&other.period)?;
        Some((self.restrict_period(&inter)?, other.restrict_period(&inter)?))
    }
}

/// A Step run with an open upper bound must end on its held value.
fn close_held_value(instants: &mut [Instant], linear: bool) {
    if linear {
        return;
    }
    if let [.., prev, last] = instants
        && prev.value != last.value
    {
        last.value = prev.value.clone();
    }
}
