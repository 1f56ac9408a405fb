//! Bounding boxes summarizing the value and time extent of a run of instants.
//!
//! The box kind follows the base kind: numeric values get a [`TBox`], points
//! get an [`STBox`], every other kind only carries its time extent. Boxes
//! store bare time extrema and do not record bound inclusivity.

use crate::instant::Instant;
use crate::period::Period;
use crate::range::FloatRange;
use crate::time::{Interval, Timestamp};
use crate::value::Value;
use geo::Rect;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Value range and time extent of a numeric run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TBox {
    pub xmin: f64,
    pub xmax: f64,
    pub tmin: Timestamp,
    pub tmax: Timestamp,
}

impl TBox {
    pub fn new(xmin: f64, xmax: f64, tmin: Timestamp, tmax: Timestamp) -> Self {
        Self {
            xmin,
            xmax,
            tmin,
            tmax,
        }
    }

    pub fn contains_value(&self, v: f64) -> bool {
        v >= self.xmin && v <= self.xmax
    }

    pub fn overlaps_range(&self, range: &FloatRange) -> bool {
        FloatRange::new(self.xmin, self.xmax, true, true)
            .ok()
            .and_then(|r| r.intersection(range))
            .is_some()
    }

    fn expand(&self, other: &TBox) -> TBox {
        TBox {
            xmin: self.xmin.min(other.xmin),
            xmax: self.xmax.max(other.xmax),
            tmin: self.tmin.min(other.tmin),
            tmax: self.tmax.max(other.tmax),
        }
    }
}

/// Spatial extent (2D or 3D) and time extent of a point run.
///
/// Geodetic boxes hold longitude/latitude extrema of the vertices only.
/// Great-circle arcs between vertices can leave that extent, so value
/// filtering against a geodetic box never rejects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct STBox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub zmin: f64,
    pub zmax: f64,
    pub has_z: bool,
    pub geodetic: bool,
    pub srid: i32,
    pub tmin: Timestamp,
    pub tmax: Timestamp,
}

impl STBox {
    /// The planar footprint of the box.
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            geo::coord! { x: self.xmin, y: self.ymin },
            geo::coord! { x: self.xmax, y: self.ymax },
        )
    }

    pub fn contains_point(&self, x: f64, y: f64, z: f64) -> bool {
        x >= self.xmin
            && x <= self.xmax
            && y >= self.ymin
            && y <= self.ymax
            && (!self.has_z || (z >= self.zmin && z <= self.zmax))
    }

    fn intersects(&self, other: &STBox) -> bool {
        !(self.xmax < other.xmin
            || self.xmin > other.xmax
            || self.ymax < other.ymin
            || self.ymin > other.ymax
            || (self.has_z && other.has_z && (self.zmax < other.zmin || self.zmin > other.zmax)))
    }

    fn expand(&self, other: &STBox) -> STBox {
        STBox {
            xmin: self.xmin.min(other.xmin),
            xmax: self.xmax.max(other.xmax),
            ymin: self.ymin.min(other.ymin),
            ymax: self.ymax.max(other.ymax),
            zmin: self.zmin.min(other.zmin),
            zmax: self.zmax.max(other.zmax),
            tmin: self.tmin.min(other.tmin),
            tmax: self.tmax.max(other.tmax),
            ..*self
        }
    }

    fn coords(&self) -> [f64; 6] {
        [self.xmin, self.ymin, self.zmin, self.xmax, self.ymax, self.zmax]
    }
}

/// The cached summary of a temporal value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BoundingBox {
    /// Kinds without a value extent (bool, text, aggregate payloads)
    Time { tmin: Timestamp, tmax: Timestamp },
    Number(TBox),
    Spatial(STBox),
}

impl BoundingBox {
    /// The box of a single instant.
    pub fn from_instant(inst: &Instant) -> Self {
        let t = inst.t;
        match &inst.value {
            Value::Int(_) | Value::Float(_) => {
                let x = inst.value.as_f64().unwrap_or_default();
                Self::Number(TBox::new(x, x, t, t))
            }
            Value::Point(p) => Self::Spatial(STBox {
                xmin: p.x,
                xmax: p.x,
                ymin: p.y,
                ymax: p.y,
                zmin: p.z(),
                zmax: p.z(),
                has_z: p.has_z(),
                geodetic: p.geodetic,
                srid: p.srid,
                tmin: t,
                tmax: t,
            }),
            _ => Self::Time { tmin: t, tmax: t },
        }
    }

    /// The box of a run of instants, `None` for an empty run.
    ///
    /// # Examples
    ///
    /// ```
    /// use tseq_types::bbox::BoundingBox;
    /// use tseq_types::instant::Instant;
    ///
    /// let run = [Instant::new(3.0, 0), Instant::new(1.0, 5), Instant::new(2.0, 9)];
    /// let bbox = BoundingBox::from_instants(&run).unwrap();
    /// assert_eq!((bbox.tmin(), bbox.tmax()), (0, 9));
    /// assert!(bbox.may_contain_value(&1.5.into()));
    /// assert!(!bbox.may_contain_value(&4.0.into()));
    /// ```
    pub fn from_instants(instants: &[Instant]) -> Option<Self> {
        let (first, rest) = instants.split_first()?;
        Some(
            rest.iter()
                .fold(Self::from_instant(first), |acc, inst| {
                    acc.expand(&Self::from_instant(inst))
                }),
        )
    }

    pub fn tmin(&self) -> Timestamp {
        match self {
            Self::Time { tmin, .. } => *tmin,
            Self::Number(b) => b.tmin,
            Self::Spatial(b) => b.tmin,
        }
    }

    pub fn tmax(&self) -> Timestamp {
        match self {
            Self::Time { tmax, .. } => *tmax,
            Self::Number(b) => b.tmax,
            Self::Spatial(b) => b.tmax,
        }
    }

    /// The closed period between the time extrema.
    pub fn period(&self) -> Period {
        Period::new_unchecked(self.tmin(), self.tmax(), true, true)
    }

    /// Union of two boxes. Boxes of different kinds keep only time.
    pub fn expand(&self, other: &BoundingBox) -> BoundingBox {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => Self::Number(a.expand(b)),
            (Self::Spatial(a), Self::Spatial(b)) => Self::Spatial(a.expand(b)),
            _ => Self::Time {
                tmin: self.tmin().min(other.tmin()),
                tmax: self.tmax().max(other.tmax()),
            },
        }
    }

    /// False only when `value` certainly lies outside the box.
    pub fn may_contain_value(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Number(b), v) => v.as_f64().is_none_or(|x| b.contains_value(x)),
            (Self::Spatial(b), Value::Point(p)) => {
                b.geodetic || b.contains_point(p.x, p.y, p.z())
            }
            _ => true,
        }
    }

    /// False only when no value of the box can fall in `range`.
    pub fn overlaps_range(&self, range: &FloatRange) -> bool {
        match self {
            Self::Number(b) => b.overlaps_range(range),
            _ => true,
        }
    }

    pub fn overlaps_period(&self, period: &Period) -> bool {
        self.period().overlaps(period)
    }

    /// Whether two boxes overlap in time and, when comparable, in value.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        if self.tmax() < other.tmin() || other.tmax() < self.tmin() {
            return false;
        }
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => !(a.xmax < b.xmin || b.xmax < a.xmin),
            (Self::Spatial(a), Self::Spatial(b)) => a.geodetic || b.geodetic || a.intersects(b),
            _ => true,
        }
    }

    pub fn shift(&self, interval: Interval) -> BoundingBox {
        match *self {
            Self::Time { tmin, tmax } => Self::Time {
                tmin: tmin + interval,
                tmax: tmax + interval,
            },
            Self::Number(b) => Self::Number(TBox {
                tmin: b.tmin + interval,
                tmax: b.tmax + interval,
                ..b
            }),
            Self::Spatial(b) => Self::Spatial(STBox {
                tmin: b.tmin + interval,
                tmax: b.tmax + interval,
                ..b
            }),
        }
    }

    /// Total order: time extrema first, then value extrema.
    pub fn total_cmp(&self, other: &BoundingBox) -> Ordering {
        let by_time = self
            .tmin()
            .cmp(&other.tmin())
            .then_with(|| self.tmax().cmp(&other.tmax()));
        if by_time.is_ne() {
            return by_time;
        }
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a
                .xmin
                .total_cmp(&b.xmin)
                .then_with(|| a.xmax.total_cmp(&b.xmax)),
            (Self::Spatial(a), Self::Spatial(b)) => a
                .coords()
                .iter()
                .zip(b.coords().iter())
                .map(|(x, y)| x.total_cmp(y))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::GeoPoint;

    #[test]
    fn test_tbox_from_instants() {
        let run = [Instant::new(3, 10), Instant::new(-1, 20)];
        match BoundingBox::from_instants(&run).unwrap() {
            BoundingBox::Number(b) => {
                assert_eq!((b.xmin, b.xmax), (-1.0, 3.0));
                assert_eq!((b.tmin, b.tmax), (10, 20));
            }
            other => panic!("unexpected box {:?}", other),
        }
    }

    #[test]
    fn test_stbox_contains() {
        let run = [
            Instant::new(GeoPoint::new_3d(0.0, 0.0, 0.0), 0),
            Instant::new(GeoPoint::new_3d(10.0, 10.0, 10.0), 10),
        ];
        let bbox = BoundingBox::from_instants(&run).unwrap();
        assert!(bbox.may_contain_value(&GeoPoint::new_3d(5.0, 5.0, 5.0).into()));
        assert!(!bbox.may_contain_value(&GeoPoint::new_3d(5.0, 5.0, 11.0).into()));
        if let BoundingBox::Spatial(b) = bbox {
            assert_eq!(b.to_rect().width(), 10.0);
        }
    }

    #[test]
    fn test_geodetic_box_never_rejects() {
        let run = [
            Instant::new(GeoPoint::geodetic(0.0, 50.0), 0),
            Instant::new(GeoPoint::geodetic(90.0, 50.0), 10),
        ];
        let bbox = BoundingBox::from_instants(&run).unwrap();
        assert!(bbox.may_contain_value(&GeoPoint::geodetic(45.0, 60.0).into()));
    }

    #[test]
    fn test_expand_and_shift() {
        let a = BoundingBox::from_instant(&Instant::new(true, 0));
        let b = BoundingBox::from_instant(&Instant::new(false, 50));
        let joined = a.expand(&b);
        assert_eq!(joined.period(), Period::new(0, 50, true, true).unwrap());
        let moved = joined.shift(10);
        assert_eq!((moved.tmin(), moved.tmax()), (10, 60));
    }

    #[test]
    fn test_overlaps_range() {
        let bbox = BoundingBox::from_instants(&[Instant::new(1.0, 0), Instant::new(3.0, 1)]).unwrap();
        assert!(bbox.overlaps_range(&FloatRange::new(2.0, 5.0, true, true).unwrap()));
        assert!(!bbox.overlaps_range(&FloatRange::new(3.0, 5.0, false, true).unwrap()));
    }

    #[test]
    fn test_total_cmp() {
        let a = BoundingBox::Number(TBox::new(0.0, 1.0, 0, 10));
        let b = BoundingBox::Number(TBox::new(0.0, 2.0, 0, 10));
        let c = BoundingBox::Number(TBox::new(-5.0, 2.0, 1, 10));
        assert_eq!(a.total_cmp(&b), Ordering::Less);
        assert_eq!(c.total_cmp(&a), Ordering::Greater);
    }
}
