//! Restriction by base value, value set, numeric range and extreme value.
//!
//! Value restrictions split the sequence segment by segment. Range
//! complements are always computed as the sequence span minus the time
//! covered by the `at` result.

use super::Sequence;
use crate::compute::segment::{intersection_value, value_at_timestamp};
use crate::sequence_set::SequenceSet;
use crate::types::Interpolation;
use smallvec::SmallVec;
use tseq_types::range::normalize_ranges;
use tseq_types::{FloatRange, Instant, PeriodSet, Timestamp, Value};

type Pieces = SmallVec<[Sequence; 2]>;

impl Sequence {
    /// The parts of the sequence where it takes `value`.
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
    ///     true,
    ///     Interpolation::Linear,
    ///     true,
    /// )?;
    /// assert_eq!(seq.at_value(&Value::Float(2.0)).to_string(), "{[2@5]}");
    /// assert_eq!(
    ///     seq.minus_value(&Value::Float(2.0)).to_string(),
    ///     "{[1@0, 2@5), (2@5, 3@10]}"
    /// );
    /// # Ok::<(), tseq::TseqError>(())
    /// ```
    pub fn at_value(&self, value: &Value) -> SequenceSet {
        if !self.bbox.may_contain_value(value) {
            return SequenceSet::empty();
        }
        if self.len() == 1 {
            return if self.start_instant().value == *value {
                self.to_set()
            } else {
                SequenceSet::empty()
            };
        }
        let pieces = self
            .bounded_segments()
            .filter_map(|(inst1, inst2, lower_inc, upper_inc)| {
                at_value_segment(inst1, inst2, lower_inc, upper_inc, self.interp, value)
            })
            .collect();
        SequenceSet::from_sorted(pieces, true)
    }

    /// The parts of the sequence where it differs from `value`.
    pub fn minus_value(&self, value: &Value) -> SequenceSet {
        if !self.bbox.may_contain_value(value) {
            return self.to_set();
        }
        if self.len() == 1 {
            return if self.start_instant().value == *value {
                SequenceSet::empty()
            } else {
                self.to_set()
            };
        }
        if !self.interp.is_linear() {
            return self.minus_value_step(value);
        }
        let pieces = self
            .bounded_segments()
            .flat_map(|(inst1, inst2, lower_inc, upper_inc)| {
                minus_value_segment(inst1, inst2, lower_inc, upper_inc, value)
            })
            .collect();
        SequenceSet::from_sorted(pieces, true)
    }

    fn minus_value_step(&self, value: &Value) -> SequenceSet {
        let mut pieces = Vec::new();
        let mut run: Vec<Instant> = Vec::new();
        let mut lower_inc = self.period.lower_inc;
        for inst in &self.instants {
            if inst.value != *value {
                run.push(inst.clone());
                continue;
            }
            if let Some(last) = run.last() {
                // The held value lasts until the matching instant
                let close = Instant::new(last.value.clone(), inst.t);
                run.push(close);
                pieces.push(Sequence::new_unchecked(
                    std::mem::take(&mut run),
                    lower_inc,
                    false,
                    Interpolation::Step,
                    false,
                ));
            }
            lower_inc = true;
        }
        if !run.is_empty() {
            pieces.push(Sequence::new_unchecked(
                run,
                lower_inc,
                self.period.upper_inc,
                Interpolation::Step,
                false,
            ));
        }
        SequenceSet::from_sorted(pieces, true)
    }

    /// The parts of the sequence where it takes any of `values`.
    pub fn at_values(&self, values: &[Value]) -> SequenceSet {
        let mut values: Vec<&Value> = values
            .iter()
            .filter(|v| self.bbox.may_contain_value(v))
            .collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup();
        match values.as_slice() {
            [] => return SequenceSet::empty(),
            [value] => return self.at_value(value),
            _ => {}
        }
        if self.len() == 1 {
            return if values.contains(&&self.start_instant().value) {
                self.to_set()
            } else {
                SequenceSet::empty()
            };
        }
        let mut pieces = Vec::new();
        for (inst1, inst2, lower_inc, upper_inc) in self.bounded_segments() {
            pieces.extend(values.iter().filter_map(|value| {
                at_value_segment(inst1, inst2, lower_inc, upper_inc, self.interp, value)
            }));
        }
        SequenceSet::from_unsorted(pieces, true)
    }

    /// The parts of the sequence where it takes none of `values`.
    pub fn minus_values(&self, values: &[Value]) -> SequenceSet {
        let at = self.at_values(values);
        self.complement(&at)
    }

    /// The parts of a numeric sequence whose value lies in `range`.
    ///
    /// Non-numeric sequences never match.
    ///
    /// # Examples
    ///
    /// ```
    /// use tseq::{Interpolation, Sequence};
    /// use tseq_types::{FloatRange, Instant};
    ///
    /// let seq = Sequence::make(
    ///     vec![Instant::new(0.0, 0), Instant::new(10.0, 10)],
    ///     true,
    ///     true,
    ///     Interpolation::Linear,
    ///     true,
    /// )?;
    /// let range = FloatRange::new(2.0, 4.0, true, false)?;
    /// assert_eq!(seq.at_range(&range).to_string(), "{[2@2, 4@4)}");
    /// # Ok::<(), tseq::TseqError>(())
    /// ```
    pub fn at_range(&self, range: &FloatRange) -> SequenceSet {
        self.at_ranges_normalized(std::slice::from_ref(range))
    }

    /// The parts of a numeric sequence whose value lies outside `range`.
    pub fn minus_range(&self, range: &FloatRange) -> SequenceSet {
        let at = self.at_range(range);
        self.complement(&at)
    }

    /// The parts of a numeric sequence whose value lies in any of `ranges`.
    pub fn at_ranges(&self, ranges: &[FloatRange]) -> SequenceSet {
        self.at_ranges_normalized(&normalize_ranges(ranges.to_vec()))
    }

    /// The parts of a numeric sequence whose value lies in none of `ranges`.
    pub fn minus_ranges(&self, ranges: &[FloatRange]) -> SequenceSet {
        let at = self.at_ranges(ranges);
        self.complement(&at)
    }

    /// Ranges must be sorted and pairwise disjoint.
    fn at_ranges_normalized(&self, ranges: &[FloatRange]) -> SequenceSet {
        if !self.kind().is_numeric() {
            return SequenceSet::empty();
        }
        let ranges: SmallVec<[&FloatRange; 4]> = ranges
            .iter()
            .filter(|r| self.bbox.overlaps_range(r))
            .collect();
        if ranges.is_empty() {
            return SequenceSet::empty();
        }
        let contains = |inst: &Instant| {
            inst.value
                .as_f64()
                .is_some_and(|v| ranges.iter().any(|r| r.contains(v)))
        };
        if self.len() == 1 {
            return if contains(self.start_instant()) {
                self.to_set()
            } else {
                SequenceSet::empty()
            };
        }

        let mut pieces = Vec::new();
        for (inst1, inst2, lower_inc, upper_inc) in self.bounded_segments() {
            for range in &ranges {
                pieces.extend(at_range_segment(
                    inst1, inst2, lower_inc, upper_inc, self.interp, range,
                ));
            }
        }
        // Step segments stop short of their end instant
        if !self.interp.is_linear() && self.period.upper_inc && contains(self.end_instant()) {
            pieces.push(Sequence::instantaneous(
                self.end_instant().clone(),
                self.interp,
            ));
        }
        SequenceSet::from_unsorted(pieces, true)
    }

    /// The parts of the sequence where it takes its minimum value.
    pub fn at_min(&self) -> SequenceSet {
        self.at_value(&self.min_value())
    }

    pub fn minus_min(&self) -> SequenceSet {
        self.minus_value(&self.min_value())
    }

    /// The parts of the sequence where it takes its maximum value.
    pub fn at_max(&self) -> SequenceSet {
        self.at_value(&self.max_value())
    }

    pub fn minus_max(&self) -> SequenceSet {
        self.minus_value(&self.max_value())
    }

    /// The sequence restricted to the time not covered by `at`.
    fn complement(&self, at: &SequenceSet) -> SequenceSet {
        if at.is_empty() {
            return self.to_set();
        }
        let rest = PeriodSet::minus_from(&self.period, &at.get_time());
        self.at_periodset(&rest)
    }
}

fn at_value_segment(
    inst1: &Instant,
    inst2: &Instant,
    lower_inc: bool,
    upper_inc: bool,
    interp: Interpolation,
    value: &Value,
) -> Option<Sequence> {
    let (v1, v2) = (&inst1.value, &inst2.value);
    if v1 == v2 {
        return (v1 == value).then(|| {
            Sequence::new_unchecked(
                vec![inst1.clone(), inst2.clone()],
                lower_inc,
                upper_inc,
                interp,
                false,
            )
        });
    }
    if !interp.is_linear() {
        if v1 == value {
            let held = Instant::new(v1.clone(), inst2.t);
            return Some(Sequence::new_unchecked(
                vec![inst1.clone(), held],
                lower_inc,
                false,
                interp,
                false,
            ));
        }
        return (upper_inc && v2 == value).then(|| Sequence::instantaneous(inst2.clone(), interp));
    }
    if v1 == value {
        return lower_inc.then(|| Sequence::instantaneous(inst1.clone(), interp));
    }
    if v2 == value {
        return upper_inc.then(|| Sequence::instantaneous(inst2.clone(), interp));
    }
    let t = intersection_value(inst1, inst2, value)?;
    Some(Sequence::instantaneous(
        Instant::new(value.clone(), t),
        interp,
    ))
}

/// Linear segments only; Step sequences are split instant by instant.
fn minus_value_segment(
    inst1: &Instant,
    inst2: &Instant,
    lower_inc: bool,
    upper_inc: bool,
    value: &Value,
) -> Pieces {
    let piece = |a: &Instant, b: &Instant, lower_inc, upper_inc| {
        Sequence::new_unchecked(
            vec![a.clone(), b.clone()],
            lower_inc,
            upper_inc,
            Interpolation::Linear,
            false,
        )
    };
    let (v1, v2) = (&inst1.value, &inst2.value);
    let mut pieces = Pieces::new();
    if v1 == v2 {
        if v1 != value {
            pieces.push(piece(inst1, inst2, lower_inc, upper_inc));
        }
    } else if v1 == value {
        pieces.push(piece(inst1, inst2, false, upper_inc));
    } else if v2 == value {
        pieces.push(piece(inst1, inst2, lower_inc, false));
    } else {
        match intersection_value(inst1, inst2, value) {
            Some(t) => {
                let cross = Instant::new(value.clone(), t);
                pieces.push(piece(inst1, &cross, lower_inc, false));
                pieces.push(piece(&cross, inst2, false, upper_inc));
            }
            None => pieces.push(piece(inst1, inst2, lower_inc, upper_inc)),
        }
    }
    pieces
}

fn at_range_segment(
    inst1: &Instant,
    inst2: &Instant,
    lower_inc: bool,
    upper_inc: bool,
    interp: Interpolation,
    range: &FloatRange,
) -> Option<Sequence> {
    let (Some(a), Some(b)) = (inst1.value.as_f64(), inst2.value.as_f64()) else {
        return None;
    };
    if !interp.is_linear() || a == b {
        if !range.contains(a) {
            return None;
        }
        // A Step segment holds its start value up to, not including, its end
        let (end, upper_inc) = if interp.is_linear() {
            (inst2.clone(), upper_inc)
        } else {
            (Instant::new(inst1.value.clone(), inst2.t), false)
        };
        return Some(Sequence::new_unchecked(
            vec![inst1.clone(), end],
            lower_inc,
            upper_inc,
            interp,
            false,
        ));
    }

    let increasing = a < b;
    let (min, max, min_inc, max_inc) = if increasing {
        (a, b, lower_inc, upper_inc)
    } else {
        (b, a, upper_inc, lower_inc)
    };
    let reached = FloatRange::new(min, max, min_inc, max_inc).ok()?;
    let inter = reached.intersection(range)?;
    // A bound reached too close to an end snaps onto that end and keeps its
    // inclusivity
    let bound = |v: f64, inc: bool| -> (Timestamp, bool) {
        if v == a {
            return (inst1.t, inc);
        }
        if v == b {
            return (inst2.t, inc);
        }
        match intersection_value(inst1, inst2, &Value::Float(v)) {
            Some(t) => (t, inc),
            None if (v - a) / (b - a) < 0.5 => (inst1.t, inc && lower_inc),
            None => (inst2.t, inc && upper_inc),
        }
    };
    let (t_lo, lo_inc) = bound(inter.lower, inter.lower_inc);
    let (t_hi, hi_inc) = bound(inter.upper, inter.upper_inc);
    let at = |t: Timestamp| Instant::new(value_at_timestamp(inst1, inst2, interp, t), t);
    if t_lo == t_hi {
        return (lo_inc && hi_inc).then(|| Sequence::instantaneous(at(t_lo), interp));
    }
    let (start, end, start_inc, end_inc) = if increasing {
        (t_lo, t_hi, lo_inc, hi_inc)
    } else {
        (t_hi, t_lo, hi_inc, lo_inc)
    };
    Some(Sequence::new_unchecked(
        vec![at(start), at(end)],
        start_inc,
        end_inc,
        interp,
        false,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::test_util::*;

    fn range(lower: f64, upper: f64, lower_inc: bool, upper_inc: bool) -> FloatRange {
        FloatRange::new(lower, upper, lower_inc, upper_inc).unwrap()
    }

    #[test]
    fn test_at_minus_value_linear_crossing() {
        let seq = linear(&[(1.0, 0), (3.0, 10)]);
        let at = seq.at_value(&Value::Float(2.0));
        assert_eq!(at.len(), 1);
        assert_eq!(at.sequences()[0].instants(), &[Instant::new(2.0, 5)]);

        let minus = seq.minus_value(&Value::Float(2.0));
        assert_eq!(minus.to_string(), "{[1@0, 2@5), (2@5, 3@10]}");
    }

    #[test]
    fn test_at_value_linear_turning_point() {
        let seq = linear(&[(1.0, 0), (3.0, 10), (1.0, 20)]);
        let at = seq.at_value(&Value::Float(3.0));
        assert_eq!(at.to_string(), "{[3@10]}");

        let minus = seq.minus_value(&Value::Float(3.0));
        assert_eq!(minus.to_string(), "{[1@0, 3@10), (3@10, 1@20]}");
    }

    #[test]
    fn test_at_value_constant_run_fuses() {
        let seq = linear(&[(2.0, 0), (2.0, 10), (4.0, 20)]);
        let at = seq.at_value(&Value::Float(2.0));
        assert_eq!(at.to_string(), "{[2@0, 2@10]}");
        let minus = seq.minus_value(&Value::Float(2.0));
        assert_eq!(minus.to_string(), "{(2@10, 4@20]}");
    }

    #[test]
    fn test_at_minus_value_step() {
        let seq = step(&[(1.0, 0), (2.0, 5), (1.0, 10)]);
        let at = seq.at_value(&Value::Float(1.0));
        assert_eq!(at.len(), 2);
        assert_eq!(at.get_time().duration(), 5);
        assert_eq!(at.sequences()[1].instants(), &[Instant::new(1.0, 10)]);

        let minus = seq.minus_value(&Value::Float(1.0));
        assert_eq!(minus.to_string(), "{Interp=Stepwise;[2@5, 2@10)}");
    }

    #[test]
    fn test_value_outside_box() {
        let seq = linear(&[(1.0, 0), (3.0, 10)]);
        assert!(seq.at_value(&Value::Float(7.0)).is_empty());
        assert_eq!(seq.minus_value(&Value::Float(7.0)).sequences(), &[seq.clone()]);

        let single = step(&[(4.0, 3)]);
        assert_eq!(single.at_value(&Value::Float(4.0)).len(), 1);
        assert!(single.minus_value(&Value::Float(4.0)).is_empty());
    }

    #[test]
    fn test_at_minus_values() {
        let seq = linear(&[(0.0, 0), (10.0, 10)]);
        let values = [Value::Float(2.0), Value::Float(8.0), Value::Float(2.0), Value::Float(20.0)];
        let at = seq.at_values(&values);
        assert_eq!(at.to_string(), "{[2@2], [8@8]}");

        let minus = seq.minus_values(&values);
        assert_eq!(minus.len(), 3);
        assert_eq!(minus.duration(), 10);
        assert!(!minus.get_time().contains_timestamp(2));
        assert!(minus.get_time().contains_timestamp(5));
    }

    #[test]
    fn test_at_range_linear() {
        let up = linear(&[(0.0, 0), (10.0, 10)]);
        assert_eq!(up.at_range(&range(2.0, 4.0, true, false)).to_string(), "{[2@2, 4@4)}");

        let down = linear(&[(10.0, 0), (0.0, 10)]);
        assert_eq!(down.at_range(&range(2.0, 4.0, true, false)).to_string(), "{(4@6, 2@8]}");

        // Only the closed end of the segment touches the range
        let open = floats(&[(0.0, 0), (10.0, 10)], true, false, Interpolation::Linear);
        assert!(open.at_range(&range(10.0, 12.0, true, true)).is_empty());
        assert_eq!(up.at_range(&range(10.0, 12.0, true, true)).to_string(), "{[10@10]}");
    }

    #[test]
    fn test_at_range_bound_truncated_onto_open_end() {
        // Value 1 is reached at 1.33, which truncates onto the excluded start
        let seq = floats(&[(0.0, 1), (3.0, 2)], false, false, Interpolation::Linear);
        let point = range(1.0, 1.0, true, true);
        assert!(seq.at_range(&point).is_empty());
        assert_eq!(seq.minus_range(&point).sequences(), &[seq.clone()]);

        let wide = seq.at_range(&range(1.0, 5.0, true, true));
        assert_eq!(wide.len(), 1);
        let piece = &wide.sequences()[0];
        assert_eq!(piece.timestamps(), vec![1, 2]);
        assert!(!piece.lower_inc() && !piece.upper_inc());
        assert_eq!(piece.start_instant().value, Value::Float(0.0));
    }

    #[test]
    fn test_at_range_bound_values_follow_timestamps() {
        let seq = linear(&[(1.0, 0), (3.0, 10)]);
        let at = seq.at_range(&range(1.5, 5.0, true, true));
        let piece = &at.sequences()[0];
        assert_eq!(piece.start_timestamp(), 2);
        assert_eq!(Some(piece.start_instant().value.clone()), seq.value_at(2));
    }

    #[test]
    fn test_minus_range_complements() {
        let seq = linear(&[(0.0, 0), (10.0, 10)]);
        let minus = seq.minus_range(&range(2.0, 4.0, true, false));
        assert_eq!(minus.to_string(), "{[0@0, 2@2), [4@4, 10@10]}");

        let outside = seq.minus_range(&range(20.0, 30.0, true, true));
        assert_eq!(outside.sequences(), &[seq.clone()]);
    }

    #[test]
    fn test_at_range_step_includes_end() {
        let seq = ints(&[(1, 0), (5, 5), (2, 10)], true, true);
        let at = seq.at_range(&range(1.0, 2.0, true, true));
        assert_eq!(at.len(), 2);
        assert_eq!(at.sequences()[0].timestamps(), vec![0, 5]);
        assert!(!at.sequences()[0].upper_inc());
        assert_eq!(at.sequences()[1].instants(), &[Instant::new(2, 10)]);
    }

    #[test]
    fn test_at_ranges_merges_touching() {
        let seq = linear(&[(0.0, 0), (10.0, 10)]);
        let ranges = [range(3.0, 5.0, true, false), range(1.0, 3.0, true, false), range(8.0, 9.0, true, true)];
        let at = seq.at_ranges(&ranges);
        assert_eq!(at.to_string(), "{[1@1, 5@5), [8@8, 9@9]}");
        let minus = seq.minus_ranges(&ranges);
        assert_eq!(minus.len(), 3);
        assert_eq!(minus.duration() + at.duration(), seq.duration());
    }

    #[test]
    fn test_range_on_text_is_empty() {
        let seq = Sequence::make(
            vec![Instant::new("a", 0), Instant::new("b", 10)],
            true,
            true,
            Interpolation::Step,
            false,
        )
        .unwrap();
        assert!(seq.at_range(&range(0.0, 1.0, true, true)).is_empty());
        assert_eq!(seq.minus_range(&range(0.0, 1.0, true, true)).len(), 1);
    }

    #[test]
    fn test_at_min_max() {
        let seq = linear(&[(3.0, 0), (1.0, 5), (2.0, 10)]);
        assert_eq!(seq.at_min().to_string(), "{[1@5]}");
        assert_eq!(seq.at_max().to_string(), "{[3@0]}");
        assert_eq!(seq.minus_min().len(), 2);
        assert_eq!(seq.minus_max().to_string(), "{(3@0, 1@5, 2@10]}");
    }
}
