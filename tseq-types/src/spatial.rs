//! Planar and geodesic point primitives used by segment math.
//!
//! Geodesic helpers treat the Earth as a sphere of radius
//! [`EARTH_RADIUS_METERS`]; z (when present) is interpolated linearly.

use crate::point::{EARTH_RADIUS_METERS, GeoPoint};
use geo::{InterpolatePoint, Line, LineLocatePoint};

/// Unit vector on the sphere for a longitude/latitude point in degrees.
pub fn to_cartesian(p: &GeoPoint) -> [f64; 3] {
    let lon = p.x.to_radians();
    let lat = p.y.to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

/// Longitude/latitude in degrees of a (not necessarily unit) vector.
pub fn from_cartesian(v: [f64; 3]) -> (f64, f64) {
    let lon = v[1].atan2(v[0]).to_degrees();
    let lat = v[2].atan2((v[0] * v[0] + v[1] * v[1]).sqrt()).to_degrees();
    (lon, lat)
}

/// Point at `ratio` along the straight segment from `start` to `end`.
pub fn planar_interpolate(start: &GeoPoint, end: &GeoPoint, ratio: f64) -> GeoPoint {
    start.with_coords(
        start.x + (end.x - start.x) * ratio,
        start.y + (end.y - start.y) * ratio,
        start.z() + (end.z() - start.z()) * ratio,
    )
}

/// Point at `ratio` along the great-circle arc from `start` to `end`.
///
/// # Examples
///
/// ```
/// use tseq_types::point::GeoPoint;
/// use tseq_types::spatial::geodesic_interpolate;
///
/// let a = GeoPoint::geodetic(0.0, 0.0);
/// let b = GeoPoint::geodetic(90.0, 0.0);
/// let mid = geodesic_interpolate(&a, &b, 0.5);
/// assert!((mid.x - 45.0).abs() < 1e-9);
/// assert!(mid.y.abs() < 1e-9);
/// ```
pub fn geodesic_interpolate(start: &GeoPoint, end: &GeoPoint, ratio: f64) -> GeoPoint {
    let p = geo::Haversine.point_at_ratio_between(start.to_geo(), end.to_geo(), ratio);
    start.with_coords(p.x(), p.y(), start.z() + (end.z() - start.z()) * ratio)
}

/// Fraction along the straight segment at which `point` lies, when it lies
/// within `tolerance` of the segment. Degenerate segments locate nothing.
pub fn planar_locate_point(
    start: &GeoPoint,
    end: &GeoPoint,
    point: &GeoPoint,
    tolerance: f64,
) -> Option<f64> {
    let [sx, sy, sz] = start.coords();
    let [ex, ey, ez] = end.coords();
    let [px, py, pz] = point.coords();
    let (dx, dy, dz) = (ex - sx, ey - sy, ez - sz);
    let len2 = dx * dx + dy * dy + dz * dz;
    if len2 <= f64::EPSILON {
        return None;
    }
    let fraction = if start.has_z() {
        (((px - sx) * dx + (py - sy) * dy + (pz - sz) * dz) / len2).clamp(0.0, 1.0)
    } else {
        Line::new(start.to_geo(), end.to_geo()).line_locate_point(&point.to_geo())?
    };
    let located = planar_interpolate(start, end, fraction);
    (located.distance(point) <= tolerance).then_some(fraction)
}

/// Fraction along the great-circle arc at which `point` lies, when it lies
/// within `tolerance` meters of the arc.
pub fn geodesic_locate_point(
    start: &GeoPoint,
    end: &GeoPoint,
    point: &GeoPoint,
    tolerance: f64,
) -> Option<f64> {
    let a = to_cartesian(start);
    let b = to_cartesian(end);
    let p = to_cartesian(point);
    let total = angle_between(a, b);
    if total <= f64::EPSILON {
        return None;
    }
    let normal = cross(a, b);
    let n2 = dot(normal, normal);
    // Project onto the arc's great circle plane
    let off = dot(p, normal) / n2;
    let proj = [
        p[0] - off * normal[0],
        p[1] - off * normal[1],
        p[2] - off * normal[2],
    ];
    if dot(proj, proj) <= f64::EPSILON {
        return None;
    }
    let from_start = angle_between(a, proj);
    let to_end = angle_between(proj, b);
    if (from_start + to_end - total).abs() > 1e-9 {
        return None;
    }
    let fraction = (from_start / total).clamp(0.0, 1.0);
    let located = geodesic_interpolate(start, end, fraction);
    (located.distance(point) <= tolerance).then_some(fraction)
}

/// Whether the great-circle arcs `a1 -> a2` and `b1 -> b2` cross or touch.
pub fn arcs_intersect(a1: &GeoPoint, a2: &GeoPoint, b1: &GeoPoint, b2: &GeoPoint) -> bool {
    let (pa1, pa2) = (to_cartesian(a1), to_cartesian(a2));
    let (pb1, pb2) = (to_cartesian(b1), to_cartesian(b2));
    let na = cross(pa1, pa2);
    let nb = cross(pb1, pb2);
    let d = cross(na, nb);
    if dot(d, d) <= f64::EPSILON {
        // Same great circle: the arcs meet when an endpoint of one lies on the other
        return [pb1, pb2].iter().any(|p| on_arc(*p, pa1, pa2))
            || [pa1, pa2].iter().any(|p| on_arc(*p, pb1, pb2));
    }
    [d, [-d[0], -d[1], -d[2]]]
        .iter()
        .any(|c| on_arc(*c, pa1, pa2) && on_arc(*c, pb1, pb2))
}

fn on_arc(p: [f64; 3], a: [f64; 3], b: [f64; 3]) -> bool {
    (angle_between(a, p) + angle_between(p, b) - angle_between(a, b)).abs() <= 1e-9
}

/// Length in meters of the arc between two geodetic points on the sphere.
pub fn arc_length(start: &GeoPoint, end: &GeoPoint) -> f64 {
    angle_between(to_cartesian(start), to_cartesian(end)) * EARTH_RADIUS_METERS
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn angle_between(a: [f64; 3], b: [f64; 3]) -> f64 {
    let c = cross(a, b);
    dot(c, c).sqrt().atan2(dot(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cartesian_roundtrip() {
        let p = GeoPoint::geodetic(-74.006, 40.7128);
        let (lon, lat) = from_cartesian(to_cartesian(&p));
        assert!((lon - p.x).abs() < 1e-9);
        assert!((lat - p.y).abs() < 1e-9);
    }

    #[test]
    fn test_planar_locate_2d() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(10.0, 0.0);
        let f = planar_locate_point(&a, &b, &GeoPoint::new(2.5, 0.0), 1e-5).unwrap();
        assert!((f - 0.25).abs() < 1e-12);
        assert!(planar_locate_point(&a, &b, &GeoPoint::new(2.5, 1.0), 1e-5).is_none());
        assert!(planar_locate_point(&a, &a, &a, 1e-5).is_none());
    }

    #[test]
    fn test_planar_locate_3d() {
        let a = GeoPoint::new_3d(0.0, 0.0, 0.0);
        let b = GeoPoint::new_3d(2.0, 2.0, 2.0);
        let f = planar_locate_point(&a, &b, &GeoPoint::new_3d(1.5, 1.5, 1.5), 1e-5).unwrap();
        assert!((f - 0.75).abs() < 1e-12);
        assert!(planar_locate_point(&a, &b, &GeoPoint::new_3d(1.5, 1.5, 0.0), 1e-5).is_none());
    }

    #[test]
    fn test_geodesic_locate_on_equator() {
        let a = GeoPoint::geodetic(0.0, 0.0);
        let b = GeoPoint::geodetic(40.0, 0.0);
        let f = geodesic_locate_point(&a, &b, &GeoPoint::geodetic(10.0, 0.0), 1e-3).unwrap();
        assert!((f - 0.25).abs() < 1e-9);
        assert!(geodesic_locate_point(&a, &b, &GeoPoint::geodetic(10.0, 1.0), 1e-3).is_none());
        assert!(geodesic_locate_point(&a, &b, &GeoPoint::geodetic(50.0, 0.0), 1e-3).is_none());
    }

    #[test]
    fn test_geodesic_interpolate_z() {
        let a = GeoPoint::geodetic_3d(0.0, 0.0, 0.0);
        let b = GeoPoint::geodetic_3d(10.0, 0.0, 100.0);
        let mid = geodesic_interpolate(&a, &b, 0.5);
        assert!((mid.z() - 50.0).abs() < 1e-9);
        assert!(mid.is_geodetic());
    }

    #[test]
    fn test_arcs_intersect() {
        let a1 = GeoPoint::geodetic(-10.0, 0.0);
        let a2 = GeoPoint::geodetic(10.0, 0.0);
        let b1 = GeoPoint::geodetic(0.0, -10.0);
        let b2 = GeoPoint::geodetic(0.0, 10.0);
        assert!(arcs_intersect(&a1, &a2, &b1, &b2));

        let c1 = GeoPoint::geodetic(20.0, -10.0);
        let c2 = GeoPoint::geodetic(20.0, 10.0);
        assert!(!arcs_intersect(&a1, &a2, &c1, &c2));
    }

    #[test]
    fn test_arc_length_matches_haversine() {
        let a = GeoPoint::geodetic(-74.0060, 40.7128);
        let b = GeoPoint::geodetic(-118.2437, 34.0522);
        let reference = a.haversine_2d(&b);
        let diff = (arc_length(&a, &b) - reference).abs();
        assert!(diff / reference < 1e-5);
    }
}
