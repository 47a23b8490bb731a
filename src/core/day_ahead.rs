use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::hourly::{HourlyPriceSeries, PriceSnapshot};
use crate::error::{DashError, DashResult};

/// Day-ahead price response for one delivery date.
///
/// Shape served by the price endpoint: one entry per hour with every queried
/// zone present (null when unavailable), plus the zones that failed upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAheadPrices {
    pub date: NaiveDate,
    #[serde(default)]
    pub run: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    pub hours: Vec<PriceSnapshot>,
    #[serde(default)]
    pub missing: Vec<String>,
}

impl DayAheadPrices {
    pub fn from_json_str(input: &str) -> DashResult<Self> {
        serde_json::from_str(input).map_err(|e| {
            DashError::InvalidData(format!("failed to parse day-ahead prices payload: {e}"))
        })
    }

    /// Validates the hourly entries and hands them over as a series.
    pub fn into_series(self) -> DashResult<HourlyPriceSeries> {
        debug!(
            date = %self.date,
            hours = self.hours.len(),
            missing = self.missing.len(),
            "accept day-ahead prices"
        );
        HourlyPriceSeries::new(self.hours)
    }

    /// Whether `zone` was reported as failing upstream.
    #[must_use]
    pub fn is_missing(&self, zone: &str) -> bool {
        self.missing
            .iter()
            .any(|missing| missing.eq_ignore_ascii_case(zone))
    }
}
