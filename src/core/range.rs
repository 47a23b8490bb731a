use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{DashError, DashResult};

/// Range used when there is nothing to scale against.
pub const FALLBACK_RANGE: PriceRange = PriceRange {
    low: 0.0,
    high: 100.0,
};

/// Low/high bounds of the continuous price color scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

impl PriceRange {
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// A range whose bounds coincide (or are inverted) cannot be interpolated.
    #[must_use]
    pub fn is_degenerate(self) -> bool {
        !(self.high > self.low)
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.high - self.low
    }

    #[must_use]
    pub fn clamp(self, value: f64) -> f64 {
        if self.is_degenerate() {
            return self.low;
        }
        value.clamp(self.low, self.high)
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        FALLBACK_RANGE
    }
}

/// Percentile pair used to trim outliers out of the visual scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPercentiles")]
pub struct RangePercentiles {
    low: f64,
    high: f64,
}

#[derive(Deserialize)]
struct RawPercentiles {
    low: f64,
    high: f64,
}

impl TryFrom<RawPercentiles> for RangePercentiles {
    type Error = DashError;

    fn try_from(raw: RawPercentiles) -> DashResult<Self> {
        Self::new(raw.low, raw.high)
    }
}

impl Default for RangePercentiles {
    fn default() -> Self {
        Self {
            low: 0.05,
            high: 0.95,
        }
    }
}

impl RangePercentiles {
    pub fn new(low: f64, high: f64) -> DashResult<Self> {
        if !low.is_finite() || !high.is_finite() {
            return Err(DashError::InvalidConfig(
                "range percentiles must be finite".to_owned(),
            ));
        }
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low > high {
            return Err(DashError::InvalidConfig(format!(
                "range percentiles must satisfy 0 <= low <= high <= 1 (got {low}, {high})"
            )));
        }
        Ok(Self { low, high })
    }

    #[must_use]
    pub fn low(self) -> f64 {
        self.low
    }

    #[must_use]
    pub fn high(self) -> f64 {
        self.high
    }
}

/// Computes a percentile-trimmed range over `values`.
///
/// Values are sorted ascending and the bounds are read at
/// `floor(n * low)` and `floor(n * high)`, clamped to the last index. Outliers
/// beyond those positions fall outside the range and saturate at render time.
/// Non-finite values are skipped; empty input yields [`FALLBACK_RANGE`].
#[must_use]
pub fn compute_robust_range(values: &[f64], percentiles: RangePercentiles) -> PriceRange {
    let mut sorted: Vec<OrderedFloat<f64>> = values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .map(OrderedFloat)
        .collect();
    if sorted.is_empty() {
        return FALLBACK_RANGE;
    }
    sorted.sort_unstable();

    let last = sorted.len() - 1;
    let pick = |fraction: f64| -> f64 {
        let index = (sorted.len() as f64 * fraction).floor() as usize;
        sorted[index.min(last)].0
    };

    PriceRange::new(pick(percentiles.low), pick(percentiles.high))
}
