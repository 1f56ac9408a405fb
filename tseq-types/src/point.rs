use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the geodesic helpers.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// SRID assigned to geodetic points unless overridden.
pub const WGS84_SRID: i32 = 4326;

/// A 2D or 3D point value, either planar (geometry) or geodetic (geography).
///
/// The reference frame of a point is its SRID, its dimensionality and whether
/// it is geodetic. All instants of one temporal sequence must share the same
/// frame.
///
/// # Examples
///
/// ```
/// use tseq_types::point::GeoPoint;
///
/// let p = GeoPoint::new_3d(1.0, 2.0, 3.0);
/// assert!(p.has_z());
/// assert_eq!(p.z(), 3.0);
///
/// let nyc = GeoPoint::geodetic(-74.0060, 40.7128);
/// assert!(nyc.is_geodetic());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub x: f64,
    pub y: f64,
    /// Altitude/elevation, present only for 3D points
    pub z: Option<f64>,
    pub srid: i32,
    pub geodetic: bool,
}

impl GeoPoint {
    /// Create a planar 2D point with SRID 0.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            srid: 0,
            geodetic: false,
        }
    }

    /// Create a planar 3D point with SRID 0.
    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            srid: 0,
            geodetic: false,
        }
    }

    /// Create a geodetic 2D point (longitude/latitude in degrees).
    pub fn geodetic(lon: f64, lat: f64) -> Self {
        Self {
            x: lon,
            y: lat,
            z: None,
            srid: WGS84_SRID,
            geodetic: true,
        }
    }

    /// Create a geodetic 3D point (longitude/latitude in degrees, z in meters).
    pub fn geodetic_3d(lon: f64, lat: f64, z: f64) -> Self {
        Self {
            x: lon,
            y: lat,
            z: Some(z),
            srid: WGS84_SRID,
            geodetic: true,
        }
    }

    pub fn with_srid(mut self, srid: i32) -> Self {
        self.srid = srid;
        self
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// The z coordinate, or 0 for 2D points.
    #[inline]
    pub fn z(&self) -> f64 {
        self.z.unwrap_or(0.0)
    }

    #[inline]
    pub fn has_z(&self) -> bool {
        self.z.is_some()
    }

    #[inline]
    pub fn is_geodetic(&self) -> bool {
        self.geodetic
    }

    /// True when both points share SRID, dimensionality and geodetic flag.
    pub fn same_frame(&self, other: &GeoPoint) -> bool {
        self.srid == other.srid
            && self.has_z() == other.has_z()
            && self.geodetic == other.geodetic
    }

    /// Build a point in the same frame as `self` from raw coordinates.
    pub fn with_coords(&self, x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z: self.z.map(|_| z),
            srid: self.srid,
            geodetic: self.geodetic,
        }
    }

    /// Project to a 2D `geo::Point`, discarding z.
    pub fn to_geo(&self) -> geo::Point<f64> {
        geo::Point::new(self.x, self.y)
    }

    /// Coordinates as `[x, y, z]` (z is 0 for 2D points).
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z()]
    }

    /// Distance to another point in the point's own metric.
    ///
    /// Planar points use Euclidean distance (3D when both carry z).
    /// Geodetic points use the haversine distance in meters, combined with
    /// the altitude difference when both carry z.
    ///
    /// # Examples
    ///
    /// ```
    /// use tseq_types::point::GeoPoint;
    ///
    /// let p1 = GeoPoint::new_3d(0.0, 0.0, 0.0);
    /// let p2 = GeoPoint::new_3d(3.0, 4.0, 12.0);
    /// assert_eq!(p1.distance(&p2), 13.0);
    /// ```
    pub fn distance(&self, other: &GeoPoint) -> f64 {
        if self.geodetic {
            let horizontal = self.haversine_2d(other);
            if self.has_z() && other.has_z() {
                let dz = self.z() - other.z();
                (horizontal * horizontal + dz * dz).sqrt()
            } else {
                horizontal
            }
        } else {
            let dx = self.x - other.x;
            let dy = self.y - other.y;
            let dz = if self.has_z() && other.has_z() {
                self.z() - other.z()
            } else {
                0.0
            };
            (dx * dx + dy * dy + dz * dz).sqrt()
        }
    }

    /// Haversine distance on the sphere in meters, ignoring altitude.
    #[inline]
    pub fn haversine_2d(&self, other: &GeoPoint) -> f64 {
        use geo::Distance;
        geo::Haversine.distance(self.to_geo(), other.to_geo())
    }

    /// Total order over coordinates (x, then y, then z).
    pub fn total_cmp(&self, other: &GeoPoint) -> std::cmp::Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
            .then_with(|| self.z().total_cmp(&other.z()))
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.srid != 0 {
            write!(f, "SRID={};", self.srid)?;
        }
        match self.z {
            Some(z) => write!(f, "POINT Z ({} {} {})", self.x, self.y, z),
            None => write!(f, "POINT({} {})", self.x, self.y),
        }
    }
}

impl From<geo::Point<f64>> for GeoPoint {
    fn from(point: geo::Point<f64>) -> Self {
        Self::new(point.x(), point.y())
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}
