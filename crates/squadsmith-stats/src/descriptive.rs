use crate::scale::MinMaxScale;

/// Descriptive statistics summarizing a dataset.
///
/// Range and mean of a dataset of `f32` values. Hero stats are sparse, so datasets
/// are built only from the values that are actually present.
#[derive(Debug, Clone)]
pub struct DescriptiveStats {
    /// Number of values in the dataset.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f32,
    /// The maximum value in the dataset.
    pub max: f32,
    /// The arithmetic mean (average) of the dataset.
    pub mean: f32,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// Non-finite values are ignored.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one finite value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use squadsmith_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut finite = values.into_iter().filter(|v| v.is_finite());
        let first = finite.next()?;
        let (mut min, mut max, mut sum, mut count) = (first, first, first, 1_usize);
        for value in finite {
            min = min.min(value);
            max = max.max(value);
            sum += value;
            count += 1;
        }
        Some(Self {
            count,
            min,
            max,
            mean: sum / count as f32,
        })
    }

    /// Returns the min-max scale spanning the observed range.
    #[must_use]
    pub fn scale(&self) -> MinMaxScale {
        MinMaxScale::new(self.min, self.max)
    }
}
