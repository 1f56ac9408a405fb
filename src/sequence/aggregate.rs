//! Value accessors and numeric aggregates.

use super::Sequence;
use crate::error::{Result, TseqError};
use tseq_types::{FloatRange, Instant, Value};

impl Sequence {
    /// Distinct instant values in ascending order.
    pub fn values(&self) -> Vec<Value> {
        let mut values: Vec<Value> = self.instants.iter().map(|inst| inst.value.clone()).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup();
        values
    }

    pub fn min_value(&self) -> Value {
        self.min_instant().value.clone()
    }

    pub fn max_value(&self) -> Value {
        self.instants
            .iter()
            .max_by(|a, b| a.value.total_cmp(&b.value))
            .unwrap_or(self.start_instant())
            .value
            .clone()
    }

    /// The first instant holding the minimum value, whether or not it sits
    /// on an excluded bound.
    pub fn min_instant(&self) -> &Instant {
        self.instants
            .iter()
            .min_by(|a, b| a.value.total_cmp(&b.value))
            .unwrap_or(self.start_instant())
    }

    /// Range of values taken by a numeric sequence.
    ///
    /// Each extreme is included only when some included instant reaches it,
    /// so a Linear sequence whose minimum lies on an open bound yields an
    /// open lower bound.
    ///
    /// # Examples
    ///
    /// ```
    /// use tseq::{Interpolation, Sequence};
    /// use tseq_types::Instant;
    ///
    /// let seq = Sequence::make(
    ///     vec![Instant::new(1.0, 0), Instant::new(3.0, 10)],
    ///     false,
    ///     true,
    ///     Interpolation::Linear,
    ///     true,
    /// )?;
    /// assert_eq!(seq.float_range().unwrap().to_string(), "(1, 3]");
    /// # Ok::<(), tseq::TseqError>(())
    /// ```
    pub fn float_range(&self) -> Option<FloatRange> {
        let numbers = self
            .instants
            .iter()
            .map(|inst| inst.value.as_f64())
            .collect::<Option<Vec<f64>>>()?;
        let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
        let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min == max || !self.interp.is_linear() {
            return FloatRange::new(min, max, true, true).ok();
        }
        let last = numbers.len() - 1;
        let reached = |target: f64| {
            numbers.iter().enumerate().any(|(i, &v)| {
                v == target
                    && (i > 0 || self.period.lower_inc)
                    && (i < last || self.period.upper_inc)
            })
        };
        FloatRange::new(min, max, reached(min), reached(max)).ok()
    }

    /// The float range of a Linear sequence, or one singleton range per
    /// distinct value of a Step sequence.
    pub fn float_ranges(&self) -> Vec<FloatRange> {
        if self.interp.is_linear() {
            return self.float_range().into_iter().collect();
        }
        self.values()
            .iter()
            .filter_map(Value::as_f64)
            .map(FloatRange::singleton)
            .collect()
    }

    /// Signed area under a numeric sequence, in value times microseconds.
    pub fn integral(&self) -> Result<f64> {
        if !self.kind().is_numeric() {
            return Err(TseqError::UnsupportedOperation(format!(
                "Integral of a {} sequence",
                self.kind()
            )));
        }
        let linear = self.interp.is_linear();
        Ok(self
            .segments()
            .map(|pair| {
                let v1 = pair[0].value.as_f64().unwrap_or_default();
                let v2 = pair[1].value.as_f64().unwrap_or_default();
                let dt = (pair[1].t - pair[0].t) as f64;
                if linear { (v1 + v2) * dt / 2.0 } else { v1 * dt }
            })
            .sum())
    }

    /// Time-weighted average of a numeric sequence.
    pub fn twavg(&self) -> Result<f64> {
        let integral = self.integral()?;
        let duration = self.duration();
        if duration == 0 {
            return Ok(self.start_instant().value.as_f64().unwrap_or_default());
        }
        Ok(integral / duration as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::test_util::*;
    use crate::types::Interpolation;

    #[test]
    fn test_values_and_extremes() {
        let seq = step(&[(1.0, 0), (2.0, 5), (1.0, 10)]);
        assert_eq!(seq.values(), vec![Value::Float(1.0), Value::Float(2.0)]);
        assert_eq!(seq.min_value(), Value::Float(1.0));
        assert_eq!(seq.max_value(), Value::Float(2.0));
        assert_eq!(seq.min_instant().t, 0);
    }

    #[test]
    fn test_float_range_bounds() {
        let seq = floats(&[(1.0, 0), (3.0, 10), (0.0, 20)], false, true, Interpolation::Linear);
        assert_eq!(seq.float_range().unwrap().to_string(), "[0, 3]");

        let open = floats(&[(1.0, 0), (3.0, 10)], false, false, Interpolation::Linear);
        assert_eq!(open.float_range().unwrap().to_string(), "(1, 3)");

        let flat = linear(&[(2.0, 0), (2.0, 10)]);
        assert_eq!(flat.float_range(), Some(FloatRange::singleton(2.0)));

        let text = Sequence::make(vec![Instant::new("a", 0)], true, true, Interpolation::Step, false).unwrap();
        assert!(text.float_range().is_none());
    }

    #[test]
    fn test_float_ranges_step() {
        let seq = step(&[(3.0, 0), (1.0, 5), (3.0, 10)]);
        assert_eq!(seq.float_ranges(), vec![FloatRange::singleton(1.0), FloatRange::singleton(3.0)]);
        assert_eq!(linear(&[(1.0, 0), (2.0, 5)]).float_ranges().len(), 1);
    }

    #[test]
    fn test_integral_and_twavg() {
        let ramp = linear(&[(0.0, 0), (10.0, 10)]);
        assert_eq!(ramp.integral().unwrap(), 50.0);
        assert_eq!(ramp.twavg().unwrap(), 5.0);

        let held = step(&[(1.0, 0), (3.0, 10), (3.0, 20)]);
        assert_eq!(held.integral().unwrap(), 40.0);
        assert_eq!(held.twavg().unwrap(), 2.0);

        let ints = ints(&[(4, 0)], true, true);
        assert_eq!(ints.twavg().unwrap(), 4.0);

        let text = Sequence::make(vec![Instant::new("a", 0)], true, true, Interpolation::Step, false).unwrap();
        assert!(matches!(text.integral(), Err(TseqError::UnsupportedOperation(_))));
    }
}
