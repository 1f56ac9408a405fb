//! Base values carried by instants.
//!
//! `Value` is a closed tagged variant over every base kind a temporal
//! sequence can hold. Kind-specific behavior (linear support, numeric
//! projection, ordering) is dispatched on the variant.

use crate::point::GeoPoint;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// The kind of a base value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Text,
    GeomPoint,
    GeogPoint,
    Double2,
    Double3,
    Double4,
}

impl ValueKind {
    /// Whether sequences of this kind may use linear interpolation.
    pub fn supports_linear(self) -> bool {
        matches!(
            self,
            Self::Float
                | Self::GeomPoint
                | Self::GeogPoint
                | Self::Double2
                | Self::Double3
                | Self::Double4
        )
    }

    /// Int and Float.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    pub fn is_point(self) -> bool {
        matches!(self, Self::GeomPoint | Self::GeogPoint)
    }

    /// Multi-field aggregate payloads used by moving averages.
    pub fn is_double(self) -> bool {
        matches!(self, Self::Double2 | Self::Double3 | Self::Double4)
    }

    /// Stable one-byte tag.
    pub fn tag(self) -> u8 {
        match self {
            Self::Bool => 1,
            Self::Int => 2,
            Self::Float => 3,
            Self::Text => 4,
            Self::GeomPoint => 5,
            Self::GeogPoint => 6,
            Self::Double2 => 7,
            Self::Double3 => 8,
            Self::Double4 => 9,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            1 => Self::Bool,
            2 => Self::Int,
            3 => Self::Float,
            4 => Self::Text,
            5 => Self::GeomPoint,
            6 => Self::GeogPoint,
            7 => Self::Double2,
            8 => Self::Double3,
            9 => Self::Double4,
            _ => return None,
        })
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
            Self::GeomPoint => "geometry",
            Self::GeogPoint => "geography",
            Self::Double2 => "double2",
            Self::Double3 => "double3",
            Self::Double4 => "double4",
        };
        f.write_str(name)
    }
}

/// A base value.
///
/// # Examples
///
/// ```
/// use tseq_types::value::{Value, ValueKind};
///
/// let v = Value::from(2.5);
/// assert_eq!(v.kind(), ValueKind::Float);
/// assert_eq!(v.as_f64(), Some(2.5));
/// assert!(Value::Int(1) < Value::Int(2));
/// ```
///
/// Equality agrees with [`Value::total_cmp`] and with `Hash`: floats compare
/// by bit pattern order, so `-0.0 != 0.0` and `NaN == NaN`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Float(f64),
    Text(String),
    Point(GeoPoint),
    Double2([f64; 2]),
    Double3([f64; 3]),
    Double4([f64; 4]),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
            Self::Point(p) if p.geodetic => ValueKind::GeogPoint,
            Self::Point(_) => ValueKind::GeomPoint,
            Self::Double2(_) => ValueKind::Double2,
            Self::Double3(_) => ValueKind::Double3,
            Self::Double4(_) => ValueKind::Double4,
        }
    }

    /// Numeric projection of Int and Float values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<&GeoPoint> {
        match self {
            Self::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Components of a DoubleN payload.
    pub fn as_doubles(&self) -> Option<&[f64]> {
        match self {
            Self::Double2(d) => Some(d),
            Self::Double3(d) => Some(d),
            Self::Double4(d) => Some(d),
            _ => None,
        }
    }

    /// True when two values may appear in the same sequence: same kind and,
    /// for points, same SRID and dimensionality.
    pub fn same_frame(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Point(a), Self::Point(b)) => a.same_frame(b),
            _ => self.kind() == other.kind(),
        }
    }

    /// Total order within a kind; values of different kinds order by kind.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Point(a), Self::Point(b)) => a
                .total_cmp(b)
                .then_with(|| a.has_z().cmp(&b.has_z()))
                .then_with(|| a.srid.cmp(&b.srid))
                .then_with(|| a.geodetic.cmp(&b.geodetic)),
            (Self::Double2(a), Self::Double2(b)) => cmp_slices(a, b),
            (Self::Double3(a), Self::Double3(b)) => cmp_slices(a, b),
            (Self::Double4(a), Self::Double4(b)) => cmp_slices(a, b),
            _ => self.kind().cmp(&other.kind()),
        }
    }
}

fn cmp_slices(a: &[f64], b: &[f64]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.total_cmp(other).is_eq()
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.total_cmp(other))
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().tag().hash(state);
        match self {
            Self::Bool(b) => b.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Float(f) => f.to_bits().hash(state),
            Self::Text(s) => s.hash(state),
            Self::Point(p) => {
                for c in p.coords() {
                    c.to_bits().hash(state);
                }
                p.srid.hash(state);
            }
            Self::Double2(d) => d.iter().for_each(|c| c.to_bits().hash(state)),
            Self::Double3(d) => d.iter().for_each(|c| c.to_bits().hash(state)),
            Self::Double4(d) => d.iter().for_each(|c| c.to_bits().hash(state)),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", if *b { "t" } else { "f" }),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(s) => write!(f, "\"{}\"", s),
            Self::Point(p) => write!(f, "{}", p),
            Self::Double2(d) => write!(f, "({}, {})", d[0], d[1]),
            Self::Double3(d) => write!(f, "({}, {}, {})", d[0], d[1], d[2]),
            Self::Double4(d) => write!(f, "({}, {}, {}, {})", d[0], d[1], d[2], d[3]),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<GeoPoint> for Value {
    fn from(v: GeoPoint) -> Self {
        Self::Point(v)
    }
}

impl From<[f64; 2]> for Value {
    fn from(v: [f64; 2]) -> Self {
        Self::Double2(v)
    }
}

impl From<[f64; 3]> for Value {
    fn from(v: [f64; 3]) -> Self {
        Self::Double3(v)
    }
}

impl From<[f64; 4]> for Value {
    fn from(v: [f64; 4]) -> Self {
        Self::Double4(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_dispatch() {
        assert_eq!(Value::from(true).kind(), ValueKind::Bool);
        assert_eq!(Value::from("a").kind(), ValueKind::Text);
        assert_eq!(
            Value::from(GeoPoint::geodetic(0.0, 0.0)).kind(),
            ValueKind::GeogPoint
        );
        assert_eq!(Value::from([1.0, 2.0]).kind(), ValueKind::Double2);
    }

    #[test]
    fn test_supports_linear() {
        assert!(ValueKind::Float.supports_linear());
        assert!(ValueKind::GeogPoint.supports_linear());
        assert!(ValueKind::Double3.supports_linear());
        assert!(!ValueKind::Int.supports_linear());
        assert!(!ValueKind::Text.supports_linear());
    }

    #[test]
    fn test_tag_roundtrip() {
        for tag in 1..=9 {
            let kind = ValueKind::from_tag(tag).unwrap();
            assert_eq!(kind.tag(), tag);
        }
        assert_eq!(ValueKind::from_tag(0), None);
    }

    #[test]
    fn test_equality_matches_order() {
        use std::hash::DefaultHasher;
        let hash = |v: &Value| {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        };

        let (neg, pos) = (Value::Float(-0.0), Value::Float(0.0));
        assert_ne!(neg, pos);
        assert_eq!(neg.partial_cmp(&pos), Some(Ordering::Less));
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));

        let flat = Value::from(GeoPoint::new(1.0, 2.0));
        let raised = Value::from(GeoPoint::new_3d(1.0, 2.0, 0.0));
        assert_ne!(flat, raised);
        assert_ne!(flat.total_cmp(&raised), Ordering::Equal);
        let projected = Value::from(GeoPoint::new(1.0, 2.0).with_srid(3857));
        assert_ne!(flat, projected);

        let same = Value::from(GeoPoint::new(1.0, 2.0));
        assert_eq!(flat, same);
        assert_eq!(hash(&flat), hash(&same));
        assert_eq!(Value::Int(3), Value::Int(3));
        assert_ne!(Value::Int(3), Value::Float(3.0));
    }

    #[test]
    fn test_total_order() {
        assert!(Value::Bool(false) < Value::Bool(true));
        assert!(Value::from("abc") < Value::from("abd"));
        assert!(Value::from(GeoPoint::new(1.0, 5.0)) < Value::from(GeoPoint::new(2.0, 0.0)));
        assert!(Value::from([1.0, 2.0]) < Value::from([1.0, 3.0]));
    }

    #[test]
    fn test_point_frame() {
        let a = Value::from(GeoPoint::new(0.0, 0.0));
        let b = Value::from(GeoPoint::new_3d(0.0, 0.0, 0.0));
        assert!(!a.same_frame(&b));
        assert!(a.same_frame(&Value::from(GeoPoint::new(1.0, 1.0))));
        assert!(!Value::Int(1).same_frame(&Value::Float(1.0)));
    }
}
