//! Min-max scaling against an observed range.
//!
//! Every relative measure in the pipeline (stat percentiles, power index rescaling)
//! is a position inside the range actually observed on the roster:
//!
//! ```text
//! position(v) = clamp((v - min) / (max - min), 0, 1)
//! ```
//!
//! A degenerate range (`max == min`) carries no information, so every value maps to
//! the midpoint 0.5 instead of dividing by zero.

/// Position of the midpoint, used when the observed range is empty.
pub const DEGENERATE_POSITION: f32 = 0.5;

/// Linear map from an observed `[min, max]` range onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxScale {
    min: f32,
    max: f32,
}

impl MinMaxScale {
    /// Creates a scale over `[min, max]`. The bounds are swapped if given in reverse.
    #[must_use]
    pub fn new(min: f32, max: f32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    #[must_use]
    pub fn min(&self) -> f32 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Returns `true` if the range has zero width.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }

    /// Returns the clamped position of `value` inside the range.
    ///
    /// The observed maximum maps to exactly `1.0` and the observed minimum to exactly
    /// `0.0`. A degenerate range maps everything to [`DEGENERATE_POSITION`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use squadsmith_stats::scale::MinMaxScale;
    /// let scale = MinMaxScale::new(10.0, 20.0);
    /// assert_eq!(scale.position(15.0), 0.5);
    /// assert_eq!(scale.position(25.0), 1.0);
    /// assert_eq!(MinMaxScale::new(3.0, 3.0).position(3.0), 0.5);
    /// ```
    #[must_use]
    pub fn position(&self, value: f32) -> f32 {
        if self.is_degenerate() {
            return DEGENERATE_POSITION;
        }
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    /// Maps `value` onto `[0, span]`.
    #[must_use]
    pub fn rescale(&self, value: f32, span: f32) -> f32 {
        self.position(value) * span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_bounds() {
        let scale = MinMaxScale::new(-3.5, 812.25);
        for v in [-100.0, -3.5, 0.0, 17.0, 812.25, 5000.0] {
            let p = scale.position(v);
            assert!((0.0..=1.0).contains(&p), "{v} -> {p}");
        }
        assert_eq!(scale.position(812.25), 1.0);
        assert_eq!(scale.position(-3.5), 0.0);
    }

    #[test]
    fn test_degenerate_range_is_midpoint() {
        let scale = MinMaxScale::new(7.0, 7.0);
        assert!(scale.is_degenerate());
        assert_eq!(scale.position(7.0), DEGENERATE_POSITION);
        assert_eq!(scale.rescale(7.0, 100.0), 50.0);
    }

    #[test]
    fn test_reversed_bounds() {
        let scale = MinMaxScale::new(20.0, 10.0);
        assert_eq!(scale.min(), 10.0);
        assert_eq!(scale.position(20.0), 1.0);
    }
}
