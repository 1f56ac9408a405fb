//! Validation of values and instant runs before a sequence is built.

use crate::error::{Result, TseqError};
use crate::types::Interpolation;
use tseq_types::{GeoPoint, Instant, Value};

/// Validates a geodetic point has finite coordinates and valid longitude
/// and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use tseq::compute::validation::validate_geodetic_point;
/// use tseq_types::GeoPoint;
///
/// assert!(validate_geodetic_point(&GeoPoint::geodetic(-74.0060, 40.7128)).is_ok());
///
/// // Invalid latitude
/// assert!(validate_geodetic_point(&GeoPoint::geodetic(-74.0, 95.0)).is_err());
/// ```
pub fn validate_geodetic_point(point: &GeoPoint) -> Result<()> {
    let (x, y) = (point.x, point.y);

    if !(-180.0..=180.0).contains(&x) {
        return Err(TseqError::Validation(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            x
        )));
    }

    if !(-90.0..=90.0).contains(&y) {
        return Err(TseqError::Validation(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            y
        )));
    }

    Ok(())
}

/// Validates a base value: floats and coordinates must be finite.
pub fn validate_value(value: &Value) -> Result<()> {
    match value {
        Value::Float(f) if !f.is_finite() => Err(TseqError::Validation(format!(
            "Float value must be finite, got: {}",
            f
        ))),
        Value::Point(p) => {
            if p.coords().iter().any(|c| !c.is_finite()) {
                return Err(TseqError::Validation(format!(
                    "Point coordinates must be finite, got: {}",
                    p
                )));
            }
            if p.geodetic {
                validate_geodetic_point(p)?;
            }
            Ok(())
        }
        other => match other.as_doubles() {
            Some(d) if d.iter().any(|c| !c.is_finite()) => Err(TseqError::Validation(format!(
                "Aggregate components must be finite, got: {}",
                other
            ))),
            _ => Ok(()),
        },
    }
}

/// Validates that `next` may follow `prev` in a sequence: strictly later
/// and in the same value frame (kind, SRID, dimensionality).
pub fn validate_successor(prev: &Instant, next: &Instant) -> Result<()> {
    if !prev.value.same_frame(&next.value) {
        return Err(TseqError::Validation(format!(
            "Instant {} does not share the value frame of {}",
            next, prev
        )));
    }
    if next.t <= prev.t {
        return Err(TseqError::Validation(format!(
            "Timestamps must be strictly increasing: {} then {}",
            prev.t, next.t
        )));
    }
    Ok(())
}

/// Validates an instant run against the structural rules of a sequence.
///
/// # Examples
///
/// ```
/// use tseq::compute::validation::validate_instants;
/// use tseq::Interpolation;
/// use tseq_types::Instant;
///
/// let run = [Instant::new(1.0, 0), Instant::new(2.0, 10)];
/// assert!(validate_instants(&run, true, true, Interpolation::Linear).is_ok());
///
/// // A step sequence with an open upper bound must end on a flat pair
/// assert!(validate_instants(&run, true, false, Interpolation::Step).is_err());
/// ```
pub fn validate_instants(
    instants: &[Instant],
    lower_inc: bool,
    upper_inc: bool,
    interp: Interpolation,
) -> Result<()> {
    let Some(first) = instants.first() else {
        return Err(TseqError::Validation(
            "A sequence needs at least one instant".to_string(),
        ));
    };

    if interp.is_linear() && !first.kind().supports_linear() {
        return Err(TseqError::Validation(format!(
            "Linear interpolation is not supported for {} values",
            first.kind()
        )));
    }

    validate_value(&first.value).map_err(|e| at_index(0, e))?;
    for (idx, pair) in instants.windows(2).enumerate() {
        validate_successor(&pair[0], &pair[1]).map_err(|e| at_index(idx + 1, e))?;
        validate_value(&pair[1].value).map_err(|e| at_index(idx + 1, e))?;
    }

    if instants.len() == 1 && !(lower_inc && upper_inc) {
        return Err(TseqError::Validation(
            "A single-instant sequence must have inclusive bounds".to_string(),
        ));
    }

    if let [.., penultimate, last] = instants
        && !interp.is_linear()
        && !upper_inc
        && penultimate.value != last.value
    {
        return Err(TseqError::Validation(format!(
            "Step sequence with an exclusive upper bound must end on equal values, got {} and {}",
            penultimate.value, last.value
        )));
    }

    Ok(())
}

/// Prefix a per-instant failure with its position, keeping a single
/// `Validation` wrapper.
fn at_index(idx: usize, err: TseqError) -> TseqError {
    match err {
        TseqError::Validation(msg) => TseqError::Validation(format!("Instant at index {}: {}", idx, msg)),
        other => TseqError::Validation(format!("Instant at index {}: {}", idx, other)),
    }
}
