/// Error type for invalid collaborator values.
#[derive(Debug, Clone, PartialEq)]
pub enum TypesError {
    /// Period bounds are out of order or describe an empty span
    InvalidPeriod(String),
    /// Range bounds are out of order, empty, or not finite
    InvalidRange(String),
    /// GeoJSON rendering failed
    GeoJson(String),
}

impl std::fmt::Display for TypesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPeriod(msg) => write!(f, "Invalid period: {}", msg),
            Self::InvalidRange(msg) => write!(f, "Invalid range: {}", msg),
            Self::GeoJson(msg) => write!(f, "GeoJSON error: {}", msg),
        }
    }
}

impl std::error::Error for TypesError {}
