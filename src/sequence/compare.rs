//! Total order, hashing and ever/always predicates.

use super::Sequence;
use crate::compute::segment::intersection_value;
use rustc_hash::FxHasher;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use tseq_types::{BoundingBox, Value};

impl Sequence {
    /// Total order over sequences of one base kind.
    ///
    /// Periods are compared first since boxes ignore bound inclusivity,
    /// then boxes, instants, instant count and interpolation.
    pub fn total_cmp(&self, other: &Sequence) -> Ordering {
        self.period
            .cmp(&other.period)
            .then_with(|| self.bbox.total_cmp(&other.bbox))
            .then_with(|| {
                self.instants
                    .iter()
                    .zip(&other.instants)
                    .map(|(a, b)| a.total_cmp(b))
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| self.instants.len().cmp(&other.instants.len()))
            .then_with(|| self.interp.cmp(&other.interp))
    }

    /// Order-sensitive hash of the bound flags and the instants.
    pub fn hash_value(&self) -> u32 {
        let mut flags: u32 = 0;
        if self.period.lower_inc {
            flags |= 0x01;
        }
        if self.period.upper_inc {
            flags |= 0x02;
        }
        self.instants.iter().fold(fx_hash(&flags), |acc, inst| {
            (acc << 5).wrapping_sub(acc).wrapping_add(fx_hash(inst))
        })
    }

    /// Whether the sequence takes `value` at some time.
    ///
    /// Int and Float operands compare numerically against either kind of
    /// number sequence.
    pub fn ever_eq(&self, value: &Value) -> bool {
        if !self.bbox.may_contain_value(value) {
            return false;
        }
        let eq = |v: &Value| cmp_operand(v, value).is_eq();
        if !self.interp.is_linear() || self.len() == 1 {
            return self.instants.iter().any(|inst| eq(&inst.value));
        }
        self.bounded_segments().any(|(inst1, inst2, lower_inc, upper_inc)| {
            if eq(&inst1.value) {
                return lower_inc || eq(&inst2.value);
            }
            if eq(&inst2.value) {
                return upper_inc;
            }
            intersection_value(inst1, inst2, value).is_some()
        })
    }

    /// Whether the sequence takes `value` at every time.
    pub fn always_eq(&self, value: &Value) -> bool {
        if let Some((min, max)) = numeric_extent(&self.bbox)
            && value.as_f64().is_some_and(|v| v != min || v != max)
        {
            return false;
        }
        self.instants.iter().all(|inst| cmp_operand(&inst.value, value).is_eq())
    }

    /// Whether the sequence is below `value` at some time.
    pub fn ever_lt(&self, value: &Value) -> bool {
        if let (Some((min, _)), Some(v)) = (numeric_extent(&self.bbox), value.as_f64())
            && min >= v
        {
            return false;
        }
        self.instants.iter().any(|inst| cmp_operand(&inst.value, value).is_lt())
    }

    /// Whether the sequence is at or below `value` at some time.
    ///
    /// A Linear segment only reaches its end value at an included bound.
    pub fn ever_le(&self, value: &Value) -> bool {
        if let (Some((min, _)), Some(v)) = (numeric_extent(&self.bbox), value.as_f64())
            && min > v
        {
            return false;
        }
        let cmp = |v: &Value| cmp_operand(v, value);
        if !self.interp.is_linear() || self.len() == 1 {
            return self.instants.iter().any(|inst| cmp(&inst.value).is_le());
        }
        self.bounded_segments().any(|(inst1, inst2, lower_inc, upper_inc)| {
            let (v1, v2) = (&inst1.value, &inst2.value);
            if v1 == v2 {
                cmp(v1).is_le()
            } else if v1 < v2 {
                cmp(v1).is_lt() || (lower_inc && cmp(v1).is_eq())
            } else {
                cmp(v2).is_lt() || (upper_inc && cmp(v2).is_eq())
            }
        })
    }

    /// Whether the sequence is below `value` at every time.
    ///
    /// A Linear segment may end at `value` on an excluded bound.
    pub fn always_lt(&self, value: &Value) -> bool {
        if let (Some((_, max)), Some(v)) = (numeric_extent(&self.bbox), value.as_f64())
            && max < v
        {
            return true;
        }
        let cmp = |v: &Value| cmp_operand(v, value);
        if !self.interp.is_linear() || self.len() == 1 {
            return self.instants.iter().all(|inst| cmp(&inst.value).is_lt());
        }
        self.bounded_segments().all(|(inst1, inst2, lower_inc, upper_inc)| {
            let (v1, v2) = (&inst1.value, &inst2.value);
            if v1 == v2 {
                cmp(v1).is_lt()
            } else if v1 < v2 {
                cmp(v2).is_lt() || (!upper_inc && cmp(v2).is_eq())
            } else {
                cmp(v1).is_lt() || (!lower_inc && cmp(v1).is_eq())
            }
        })
    }

    /// Whether the sequence is at or below `value` at every time.
    pub fn always_le(&self, value: &Value) -> bool {
        if let (Some((_, max)), Some(v)) = (numeric_extent(&self.bbox), value.as_f64()) {
            return max <= v;
        }
        self.instants.iter().all(|inst| cmp_operand(&inst.value, value).is_le())
    }
}

/// Orders a sequence value against an operand. An Int and a Float compare
/// as numbers; anything else uses the total order of values.
fn cmp_operand(value: &Value, operand: &Value) -> Ordering {
    match (value.as_f64(), operand.as_f64()) {
        (Some(a), Some(b)) if value.kind() != operand.kind() => a.total_cmp(&b),
        _ => value.total_cmp(operand),
    }
}

fn numeric_extent(bbox: &BoundingBox) -> Option<(f64, f64)> {
    match bbox {
        BoundingBox::Number(b) => Some((b.xmin, b.xmax)),
        _ => None,
    }
}

fn fx_hash<T: Hash + ?Sized>(value: &T) -> u32 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish() as u32
}

impl Hash for Sequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash_value());
    }
}

impl PartialOrd for Sequence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.total_cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::test_util::*;
    use crate::types::Interpolation;
    use tseq_types::Instant;

    #[test]
    fn test_total_cmp() {
        let a = linear(&[(1.0, 0), (2.0, 10)]);
        let b = linear(&[(1.0, 0), (3.0, 10)]);
        let c = floats(&[(1.0, 0), (2.0, 10)], false, true, Interpolation::Linear);
        let d = floats(&[(1.0, 0), (2.0, 10)], true, true, Interpolation::Step);

        assert_eq!(a.total_cmp(&a.clone()), Ordering::Equal);
        assert_eq!(a.total_cmp(&b), Ordering::Less);
        // Inclusive lower bound sorts first
        assert_eq!(a.total_cmp(&c), Ordering::Less);
        assert_eq!(d.total_cmp(&a), Ordering::Less);
        assert!(a < b);
    }

    #[test]
    fn test_hash_tracks_bounds_and_order() {
        let a = linear(&[(1.0, 0), (2.0, 10)]);
        let c = floats(&[(1.0, 0), (2.0, 10)], false, true, Interpolation::Linear);
        let e = linear(&[(2.0, 0), (1.0, 10)]);
        assert_eq!(a.hash_value(), a.clone().hash_value());
        assert_ne!(a.hash_value(), c.hash_value());
        assert_ne!(a.hash_value(), e.hash_value());
    }

    #[test]
    fn test_ever_eq_respects_bounds() {
        let seq = floats(&[(1.0, 0), (3.0, 10)], true, false, Interpolation::Linear);
        assert!(seq.ever_eq(&Value::Float(2.0)));
        assert!(seq.ever_eq(&Value::Float(1.0)));
        assert!(!seq.ever_eq(&Value::Float(3.0)));
        assert!(!seq.ever_eq(&Value::Float(5.0)));

        let stepped = step(&[(1.0, 0), (3.0, 10)]);
        assert!(!stepped.ever_eq(&Value::Float(2.0)));
    }

    #[test]
    fn test_always_eq() {
        let flat = linear(&[(2.0, 0), (2.0, 10)]);
        assert!(flat.always_eq(&Value::Float(2.0)));
        assert!(!linear(&[(2.0, 0), (3.0, 10)]).always_eq(&Value::Float(2.0)));

        let text = Sequence::make(
            vec![Instant::new("a", 0), Instant::new("a", 5)],
            true,
            true,
            Interpolation::Step,
            false,
        )
        .unwrap();
        assert!(text.always_eq(&Value::from("a")));
    }

    #[test]
    fn test_lt_le_predicates() {
        let seq = floats(&[(1.0, 0), (3.0, 10)], false, true, Interpolation::Linear);
        assert!(seq.ever_lt(&Value::Float(1.5)));
        assert!(!seq.ever_lt(&Value::Float(1.0)));
        // The minimum sits on the excluded lower bound
        assert!(!seq.ever_le(&Value::Float(1.0)));
        assert!(seq.ever_le(&Value::Float(3.0)));

        assert!(!seq.always_lt(&Value::Float(3.0)));
        assert!(seq.always_le(&Value::Float(3.0)));

        let open = floats(&[(1.0, 0), (3.0, 10)], true, false, Interpolation::Linear);
        assert!(open.always_lt(&Value::Float(3.0)));

        let flat = linear(&[(2.0, 0), (2.0, 10)]);
        assert!(!flat.always_lt(&Value::Float(2.0)));
        assert!(flat.always_lt(&Value::Float(2.5)));
    }

    #[test]
    fn test_predicates_mix_int_and_float() {
        let seq = linear(&[(1.0, 0), (3.0, 10)]);
        assert!(seq.ever_lt(&Value::Int(2)));
        assert!(seq.ever_eq(&Value::Int(2)));
        assert!(seq.ever_eq(&Value::Int(3)));
        assert!(seq.always_le(&Value::Int(3)));
        assert!(!seq.always_lt(&Value::Int(3)));
        assert!(!seq.ever_le(&Value::Int(0)));

        let counts = ints(&[(1, 0), (4, 5)], true, true);
        assert!(counts.ever_lt(&Value::Float(1.5)));
        assert!(!counts.ever_eq(&Value::Float(1.5)));
        assert!(counts.ever_eq(&Value::Float(4.0)));
        assert!(counts.always_lt(&Value::Float(4.5)));
        assert!(!counts.always_eq(&Value::Float(1.0)));
    }
}
