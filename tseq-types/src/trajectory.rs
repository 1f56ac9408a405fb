use crate::point::GeoPoint;
use serde::{Deserialize, Serialize};

/// The geometric path traced by a point-valued sequence.
///
/// Linear sequences trace a line string through their vertices (consecutive
/// duplicates collapsed). Step sequences only ever occupy their sample
/// positions, so their trace is the set of distinct points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Trajectory {
    Point(GeoPoint),
    MultiPoint(Vec<GeoPoint>),
    LineString(Vec<GeoPoint>),
}

impl Trajectory {
    /// Build the trace of a run of points, `None` for an empty run.
    ///
    /// # Examples
    ///
    /// ```
    /// use tseq_types::point::GeoPoint;
    /// use tseq_types::trajectory::Trajectory;
    ///
    /// let pts = [GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.0), GeoPoint::new(3.0, 4.0)];
    /// let line = Trajectory::from_points(pts, true).unwrap();
    /// assert_eq!(line.points().len(), 2);
    /// assert_eq!(line.length(), 5.0);
    /// ```
    pub fn from_points(points: impl IntoIterator<Item = GeoPoint>, linear: bool) -> Option<Self> {
        let mut vertices: Vec<GeoPoint> = Vec::new();
        for p in points {
            push_vertex(&mut vertices, p, linear);
        }
        Self::from_vertices(vertices, linear)
    }

    fn from_vertices(vertices: Vec<GeoPoint>, linear: bool) -> Option<Self> {
        match vertices.len() {
            0 => None,
            1 => Some(Self::Point(vertices[0])),
            _ if linear => Some(Self::LineString(vertices)),
            _ => Some(Self::MultiPoint(vertices)),
        }
    }

    pub fn points(&self) -> &[GeoPoint] {
        match self {
            Self::Point(p) => std::slice::from_ref(p),
            Self::MultiPoint(pts) | Self::LineString(pts) => pts,
        }
    }

    /// The trace extended by further points in time order.
    pub fn extend(&self, more: impl IntoIterator<Item = GeoPoint>, linear: bool) -> Self {
        let mut vertices = self.points().to_vec();
        for p in more {
            push_vertex(&mut vertices, p, linear);
        }
        // `vertices` is never empty: it starts from at least one point
        Self::from_vertices(vertices, linear).unwrap_or_else(|| self.clone())
    }

    /// Path length in the points' own metric (meters for geodetic points).
    pub fn length(&self) -> f64 {
        match self {
            Self::LineString(pts) => pts.windows(2).map(|w| w[0].distance(&w[1])).sum(),
            _ => 0.0,
        }
    }

    /// The planar projection as a `geo` geometry.
    pub fn to_geometry(&self) -> geo::Geometry<f64> {
        match self {
            Self::Point(p) => geo::Geometry::Point(p.to_geo()),
            Self::MultiPoint(pts) => {
                geo::Geometry::MultiPoint(pts.iter().map(GeoPoint::to_geo).collect())
            }
            Self::LineString(pts) => geo::Geometry::LineString(
                pts.iter().map(|p| geo::coord! { x: p.x, y: p.y }).collect(),
            ),
        }
    }

    /// Render the trace as a GeoJSON geometry.
    #[cfg(feature = "geojson")]
    pub fn to_geojson(&self) -> Result<String, crate::error::TypesError> {
        use geojson::{Geometry, Value};

        let position = |p: &GeoPoint| match p.z {
            Some(z) => vec![p.x, p.y, z],
            None => vec![p.x, p.y],
        };
        let value = match self {
            Self::Point(p) => Value::Point(position(p)),
            Self::MultiPoint(pts) => Value::MultiPoint(pts.iter().map(position).collect()),
            Self::LineString(pts) => Value::LineString(pts.iter().map(position).collect()),
        };
        serde_json::to_string(&Geometry::new(value)).map_err(|e| {
            crate::error::TypesError::GeoJson(format!("Failed to serialize trajectory: {}", e))
        })
    }
}

fn push_vertex(vertices: &mut Vec<GeoPoint>, p: GeoPoint, linear: bool) {
    if linear {
        if vertices.last() != Some(&p) {
            vertices.push(p);
        }
    } else if let Err(idx) = vertices.binary_search_by(|v| v.total_cmp(&p)) {
        vertices.insert(idx, p);
    }
}
