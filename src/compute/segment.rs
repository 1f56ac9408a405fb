//! Segment math: interpolation, crossings and collinearity.
//!
//! A segment is the stretch between two consecutive instants of a sequence.
//! Crossing routines only report *interior* intersections: a meeting point
//! at either end of the segment is not a crossing. All tolerance checks use
//! [`EPSILON`].

use crate::types::Interpolation;
use smallvec::SmallVec;
use tseq_types::spatial::{self, to_cartesian};
use tseq_types::{GeoPoint, Instant, Timestamp, Value};

/// Absolute tolerance for float comparisons in segment math.
pub const EPSILON: f64 = 1e-5;

type Components = SmallVec<[f64; 4]>;

/// Linear interpolation between two values of the same kind.
///
/// Geodetic points move along the great circle. Kinds without a notion of
/// interpolation keep `v1`.
///
/// # Examples
///
/// ```
/// use tseq::compute::segment::interpolate;
/// use tseq_types::Value;
///
/// let v = interpolate(&Value::Float(1.0), &Value::Float(3.0), 0.25);
/// assert_eq!(v, Value::Float(1.5));
/// ```
pub fn interpolate(v1: &Value, v2: &Value, ratio: f64) -> Value {
    match (v1, v2) {
        (Value::Float(a), Value::Float(b)) => Value::Float(a + (b - a) * ratio),
        (Value::Point(a), Value::Point(b)) if a.geodetic => {
            Value::Point(spatial::geodesic_interpolate(a, b, ratio))
        }
        (Value::Point(a), Value::Point(b)) => Value::Point(spatial::planar_interpolate(a, b, ratio)),
        (Value::Double2(a), Value::Double2(b)) => Value::Double2(lerp(a, b, ratio)),
        (Value::Double3(a), Value::Double3(b)) => Value::Double3(lerp(a, b, ratio)),
        (Value::Double4(a), Value::Double4(b)) => Value::Double4(lerp(a, b, ratio)),
        _ => v1.clone(),
    }
}

fn lerp<const N: usize>(a: &[f64; N], b: &[f64; N], ratio: f64) -> [f64; N] {
    std::array::from_fn(|i| a[i] + (b[i] - a[i]) * ratio)
}

/// The timestamp at `fraction` of the way from `t1` to `t2` (truncated).
#[inline]
pub fn timestamp_at_fraction(t1: Timestamp, t2: Timestamp, fraction: f64) -> Timestamp {
    t1 + ((t2 - t1) as f64 * fraction) as i64
}

/// Value taken by the segment `inst1 -> inst2` at `t`, with
/// `inst1.t <= t <= inst2.t`.
pub fn value_at_timestamp(inst1: &Instant, inst2: &Instant, interp: Interpolation, t: Timestamp) -> Value {
    if inst1.value == inst2.value || t == inst1.t || (!interp.is_linear() && t < inst2.t) {
        return inst1.value.clone();
    }
    if t == inst2.t {
        return inst2.value.clone();
    }
    let ratio = (t - inst1.t) as f64 / (inst2.t - inst1.t) as f64;
    interpolate(&inst1.value, &inst2.value, ratio)
}

/// Float components compared by the collinearity test.
fn components(value: &Value) -> Option<Components> {
    match value {
        Value::Float(f) => Some(SmallVec::from_slice(&[*f])),
        Value::Point(p) if p.has_z() => Some(SmallVec::from_slice(&p.coords())),
        Value::Point(p) => Some(SmallVec::from_slice(&[p.x, p.y])),
        other => other.as_doubles().map(SmallVec::from_slice),
    }
}

/// True when `v2` lies where the segment `v1 -> v3` is at `ratio`, within
/// [`EPSILON`] on every component.
pub fn collinear(v1: &Value, v2: &Value, v3: &Value, ratio: f64) -> bool {
    let expected = interpolate(v1, v3, ratio);
    match (components(v2), components(&expected)) {
        (Some(a), Some(b)) if a.len() == b.len() => {
            a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= EPSILON)
        }
        _ => false,
    }
}

/// Collinearity of three consecutive instants, the ratio taken from their
/// timestamps.
pub fn collinear_instants(inst1: &Instant, inst2: &Instant, inst3: &Instant) -> bool {
    let ratio = (inst2.t - inst1.t) as f64 / (inst3.t - inst1.t) as f64;
    collinear(&inst1.value, &inst2.value, &inst3.value, ratio)
}

/// Interior timestamp at which the linear segment `inst1 -> inst2` takes
/// `value`.
///
/// Returns `None` when `value` equals an endpoint, lies outside the segment,
/// or is only reached within [`EPSILON`] of either end. Aggregate payloads
/// have no crossing math.
///
/// # Examples
///
/// ```
/// use tseq::compute::segment::intersection_value;
/// use tseq_types::{Instant, Value};
///
/// let (a, b) = (Instant::new(1.0, 0), Instant::new(3.0, 10));
/// assert_eq!(intersection_value(&a, &b, &Value::Float(2.0)), Some(5));
/// assert_eq!(intersection_value(&a, &b, &Value::Float(3.0)), None);
/// ```
pub fn intersection_value(inst1: &Instant, inst2: &Instant, value: &Value) -> Option<Timestamp> {
    let fraction = match (&inst1.value, &inst2.value) {
        (Value::Float(v1), Value::Float(v2)) => {
            let v = value.as_f64()?;
            if v == *v1 || v == *v2 {
                return None;
            }
            let (min, max) = (v1.min(*v2), v1.max(*v2));
            if v < min || v > max {
                return None;
            }
            let partial = (v - min) / (max - min);
            if v1 < v2 { partial } else { 1.0 - partial }
        }
        (Value::Point(a), Value::Point(b)) => {
            let p = value.as_point()?;
            if p == a || p == b || !p.same_frame(a) {
                return None;
            }
            if a.geodetic {
                spatial::geodesic_locate_point(a, b, p, EPSILON)?
            } else {
                spatial::planar_locate_point(a, b, p, EPSILON)?
            }
        }
        _ => return None,
    };
    interior_timestamp(inst1.t, inst2.t, fraction)
}

/// Map an interior fraction to a timestamp strictly inside `(t1, t2)`.
fn interior_timestamp(t1: Timestamp, t2: Timestamp, fraction: f64) -> Option<Timestamp> {
    if fraction <= EPSILON || fraction >= 1.0 - EPSILON {
        return None;
    }
    let t = timestamp_at_fraction(t1, t2, fraction);
    (t1 < t && t < t2).then_some(t)
}

/// Solve `a1 + (a2 - a1) f == b1 + (b2 - b1) f` per axis.
///
/// Axes along which both segments move in parallel constrain nothing when
/// they coincide and rule out a crossing when they do not. The remaining
/// fractions must agree within [`EPSILON`].
fn solve_fraction(a1: &[f64], a2: &[f64], b1: &[f64], b2: &[f64], average: bool) -> Option<f64> {
    let mut fractions: Components = SmallVec::new();
    for i in 0..a1.len() {
        let denom = a2[i] - a1[i] - b2[i] + b1[i];
        if denom.abs() <= f64::EPSILON {
            if (b1[i] - a1[i]).abs() > EPSILON {
                return None;
            }
            continue;
        }
        let fraction = (b1[i] - a1[i]) / denom;
        if fraction <= EPSILON || fraction >= 1.0 - EPSILON {
            return None;
        }
        fractions.push(fraction);
    }
    let first = *fractions.first()?;
    if fractions.iter().any(|f| (f - first).abs() > EPSILON) {
        return None;
    }
    if average {
        Some(fractions.iter().sum::<f64>() / fractions.len() as f64)
    } else {
        Some(first)
    }
}

fn planar_axes(p: &GeoPoint) -> Components {
    if p.has_z() {
        SmallVec::from_slice(&p.coords())
    } else {
        SmallVec::from_slice(&[p.x, p.y])
    }
}

/// Interior timestamp at which two synchronized linear segments take the
/// same value (`start1.t == start2.t`, `end1.t == end2.t`).
///
/// Geodetic segments are solved on their unit-sphere cartesian coordinates
/// and the agreeing per-axis fractions are averaged.
pub fn segment_intersection(
    start1: &Instant,
    end1: &Instant,
    start2: &Instant,
    end2: &Instant,
) -> Option<Timestamp> {
    let fraction = match (&start1.value, &end1.value, &start2.value, &end2.value) {
        (Value::Point(a1), Value::Point(a2), Value::Point(b1), Value::Point(b2)) => {
            if a1.geodetic {
                if !spatial::arcs_intersect(a1, a2, b1, b2) {
                    return None;
                }
                let (ca1, ca2) = (to_cartesian(a1), to_cartesian(a2));
                let (cb1, cb2) = (to_cartesian(b1), to_cartesian(b2));
                solve_fraction(&ca1, &ca2, &cb1, &cb2, true)?
            } else {
                let (pa1, pa2) = (planar_axes(a1), planar_axes(a2));
                let (pb1, pb2) = (planar_axes(b1), planar_axes(b2));
                solve_fraction(&pa1, &pa2, &pb1, &pb2, false)?
            }
        }
        (v1, v2, v3, v4) => {
            let (x1, x2) = (v1.as_f64()?, v2.as_f64()?);
            let (x3, x4) = (v3.as_f64()?, v4.as_f64()?);
            let denom = x2 - x1 - x4 + x3;
            if denom == 0.0 {
                return None;
            }
            (x3 - x1) / denom
        }
    };
    interior_timestamp(start1.t, end1.t, fraction)
}

/// Crossing of two synchronized segments with their own interpolation.
///
/// Returns the values taken by each segment at the crossing timestamp. A
/// Step segment holds its start value, so the crossing is where the other
/// (linear) segment reaches that value. Two Step segments never cross.
pub fn crossing(
    (start1, end1, interp1): (&Instant, &Instant, Interpolation),
    (start2, end2, interp2): (&Instant, &Instant, Interpolation),
) -> Option<(Value, Value, Timestamp)> {
    match (interp1.is_linear(), interp2.is_linear()) {
        (false, false) => None,
        (false, true) => {
            let t = intersection_value(start2, end2, &start1.value)?;
            let v2 = value_at_timestamp(start2, end2, interp2, t);
            Some((start1.value.clone(), v2, t))
        }
        (true, false) => {
            let t = intersection_value(start1, end1, &start2.value)?;
            let v1 = value_at_timestamp(start1, end1, interp1, t);
            Some((v1, start2.value.clone(), t))
        }
        (true, true) => {
            let t = segment_intersection(start1, end1, start2, end2)?;
            Some((
                value_at_timestamp(start1, end1, interp1, t),
                value_at_timestamp(start2, end2, interp2, t),
                t,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inst(v: impl Into<Value>, t: Timestamp) -> Instant {
        Instant::new(v, t)
    }

    #[test]
    fn test_value_at_timestamp_step_and_linear() {
        let (a, b) = (inst(1.0, 0), inst(3.0, 10));
        assert_eq!(value_at_timestamp(&a, &b, Interpolation::Step, 5), Value::Float(1.0));
        assert_eq!(value_at_timestamp(&a, &b, Interpolation::Step, 10), Value::Float(3.0));
        assert_eq!(value_at_timestamp(&a, &b, Interpolation::Linear, 5), Value::Float(2.0));
        assert_eq!(value_at_timestamp(&a, &b, Interpolation::Linear, 0), Value::Float(1.0));
    }

    #[test]
    fn test_interpolate_points_and_doubles() {
        let a = Value::from(GeoPoint::new(0.0, 0.0));
        let b = Value::from(GeoPoint::new(2.0, 4.0));
        assert_eq!(interpolate(&a, &b, 0.5), Value::from(GeoPoint::new(1.0, 2.0)));
        assert_eq!(
            interpolate(&Value::from([0.0, 10.0]), &Value::from([2.0, 20.0]), 0.5),
            Value::from([1.0, 15.0])
        );
        assert_eq!(interpolate(&Value::Int(1), &Value::Int(5), 0.5), Value::Int(1));
    }

    #[test]
    fn test_collinear() {
        assert!(collinear(&1.0.into(), &2.0.into(), &3.0.into(), 0.5));
        assert!(!collinear(&1.0.into(), &2.5.into(), &3.0.into(), 0.5));
        let p = |x, y| Value::from(GeoPoint::new(x, y));
        assert!(collinear(&p(0.0, 0.0), &p(1.0, 1.0), &p(4.0, 4.0), 0.25));
        assert!(!collinear(&p(0.0, 0.0), &p(1.0, 1.0), &p(4.0, 4.0), 0.5));
        assert!(!collinear(&"a".into(), &"a".into(), &"a".into(), 0.5));
    }

    #[test]
    fn test_intersection_value_numbers() {
        let (a, b) = (inst(3.0, 0), inst(1.0, 10));
        assert_eq!(intersection_value(&a, &b, &Value::Float(2.5)), Some(2));
        assert_eq!(intersection_value(&a, &b, &Value::Int(2)), Some(5));
        assert_eq!(intersection_value(&a, &b, &Value::Float(1.0)), None);
        assert_eq!(intersection_value(&a, &b, &Value::Float(4.0)), None);
        // Within tolerance of an end
        assert_eq!(intersection_value(&a, &b, &Value::Float(1.000001)), None);
    }

    #[test]
    fn test_intersection_value_points() {
        let a = inst(GeoPoint::new(0.0, 0.0), 0);
        let b = inst(GeoPoint::new(10.0, 0.0), 100);
        let on = Value::from(GeoPoint::new(2.5, 0.0));
        let off = Value::from(GeoPoint::new(2.5, 0.1));
        assert_eq!(intersection_value(&a, &b, &on), Some(25));
        assert_eq!(intersection_value(&a, &b, &off), None);
        let doubles = (inst([0.0, 0.0], 0), inst([2.0, 2.0], 10));
        assert_eq!(intersection_value(&doubles.0, &doubles.1, &[1.0, 1.0].into()), None);
    }

    #[test]
    fn test_segment_intersection_numbers() {
        let (a1, a2) = (inst(1.0, 0), inst(3.0, 10));
        let (b1, b2) = (inst(3.0, 0), inst(1.0, 10));
        assert_eq!(segment_intersection(&a1, &a2, &b1, &b2), Some(5));
        // Parallel
        let (c1, c2) = (inst(2.0, 0), inst(4.0, 10));
        assert_eq!(segment_intersection(&a1, &a2, &c1, &c2), None);
        // Meeting at the end only
        let (d1, d2) = (inst(5.0, 0), inst(3.0, 10));
        assert_eq!(segment_intersection(&a1, &a2, &d1, &d2), None);
    }

    #[test]
    fn test_segment_intersection_planar_axes_must_agree() {
        let p = |x, y, t| inst(GeoPoint::new(x, y), t);
        let crossing = segment_intersection(
            &p(0.0, 0.0, 0),
            &p(2.0, 2.0, 10),
            &p(2.0, 2.0, 0),
            &p(0.0, 0.0, 10),
        );
        assert_eq!(crossing, Some(5));
        let skew = segment_intersection(
            &p(0.0, 0.0, 0),
            &p(4.0, 4.0, 10),
            &p(4.0, 1.0, 0),
            &p(0.0, 1.0, 10),
        );
        assert_eq!(skew, None);
    }

    #[test]
    fn test_segment_intersection_geodetic() {
        let g = |lon, t| inst(GeoPoint::geodetic(lon, 0.0), t);
        let t = segment_intersection(&g(-10.0, 0), &g(10.0, 10), &g(10.0, 0), &g(-10.0, 10));
        assert_eq!(t, Some(5));
    }

    #[test]
    fn test_crossing_mixed_interpolation() {
        let (a1, a2) = (inst(2.0, 0), inst(2.0, 10));
        let (b1, b2) = (inst(0.0, 0), inst(4.0, 10));
        let (v1, v2, t) = crossing(
            (&a1, &a2, Interpolation::Step),
            (&b1, &b2, Interpolation::Linear),
        )
        .unwrap();
        assert_eq!(t, 5);
        assert_eq!(v1, Value::Float(2.0));
        assert_eq!(v2, Value::Float(2.0));
        assert!(
            crossing((&a1, &a2, Interpolation::Step), (&b1, &b2, Interpolation::Step)).is_none()
        );
    }

    #[test]
    fn test_crossing_needs_room_inside_segment() {
        let (a1, a2) = (inst(0.0, 0), inst(1.0, 1));
        let (b1, b2) = (inst(1.0, 0), inst(0.0, 1));
        assert_eq!(segment_intersection(&a1, &a2, &b1, &b2), None);
    }
}
