use crate::time::{Interval, Timestamp};
use crate::value::{Value, ValueKind};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A base value sampled at a timestamp.
///
/// # Examples
///
/// ```
/// use tseq_types::instant::Instant;
///
/// let inst = Instant::new(3.5, 10);
/// assert_eq!(inst.timestamp(), 10);
/// assert_eq!(inst.to_string(), "3.5@10");
/// ```
#[derive(Debug, Clone, PartialEq, Hash, Serialize, Deserialize)]
pub struct Instant {
    pub value: Value,
    pub t: Timestamp,
}

impl Instant {
    pub fn new(value: impl Into<Value>, t: Timestamp) -> Self {
        Self {
            value: value.into(),
            t,
        }
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn timestamp(&self) -> Timestamp {
        self.t
    }

    #[inline]
    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    /// A copy of this instant moved by `interval`.
    pub fn shift(&self, interval: Interval) -> Self {
        Self {
            value: self.value.clone(),
            t: self.t + interval,
        }
    }

    /// Orders by timestamp, then by value.
    pub fn total_cmp(&self, other: &Instant) -> Ordering {
        self.t
            .cmp(&other.t)
            .then_with(|| self.value.total_cmp(&other.value))
    }
}

impl std::fmt::Display for Instant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.value, self.t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::GeoPoint;

    #[test]
    fn test_shift() {
        let inst = Instant::new(GeoPoint::new(1.0, 1.0), 100);
        let moved = inst.shift(-50);
        assert_eq!(moved.t, 50);
        assert_eq!(moved.value, inst.value);
    }

    #[test]
    fn test_ordering() {
        let a = Instant::new(5, 1);
        let b = Instant::new(1, 2);
        let c = Instant::new(6, 1);
        assert_eq!(a.total_cmp(&b), Ordering::Less);
        assert_eq!(a.total_cmp(&c), Ordering::Less);
        assert_eq!(a.total_cmp(&a.clone()), Ordering::Equal);
    }
}
