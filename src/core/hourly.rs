use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::range::{PriceRange, RangePercentiles, compute_robust_range};
use crate::core::zone::{RegionId, ZoneResolver};
use crate::error::{DashError, DashResult};

pub const HOURS_PER_DAY: u8 = 24;

/// Prices for every queried zone at one hour of the day.
///
/// `None` marks a zone with no data for that hour. Zones keep the order in
/// which they were received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub hour: u8,
    pub prices: IndexMap<String, Option<f64>>,
}

impl PriceSnapshot {
    #[must_use]
    pub fn new(hour: u8, prices: IndexMap<String, Option<f64>>) -> Self {
        Self { hour, prices }
    }

    /// Present, finite prices in iteration order.
    pub fn present_prices(&self) -> impl Iterator<Item = (&str, f64)> {
        self.prices.iter().filter_map(|(zone, price)| match price {
            Some(value) if value.is_finite() => Some((zone.as_str(), *value)),
            _ => None,
        })
    }

    #[must_use]
    pub fn has_data(&self) -> bool {
        self.present_prices().next().is_some()
    }
}

/// One day of hourly snapshots, at most one per hour.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HourlyPriceSeries {
    snapshots: Vec<PriceSnapshot>,
}

impl HourlyPriceSeries {
    pub fn new(snapshots: Vec<PriceSnapshot>) -> DashResult<Self> {
        let mut seen = [false; HOURS_PER_DAY as usize];
        for snapshot in &snapshots {
            if snapshot.hour >= HOURS_PER_DAY {
                return Err(DashError::InvalidData(format!(
                    "snapshot hour must be < {HOURS_PER_DAY} (got {})",
                    snapshot.hour
                )));
            }
            let slot = &mut seen[usize::from(snapshot.hour)];
            if *slot {
                return Err(DashError::InvalidData(format!(
                    "duplicate snapshot for hour {}",
                    snapshot.hour
                )));
            }
            *slot = true;
        }
        Ok(Self { snapshots })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshots(&self) -> &[PriceSnapshot] {
        &self.snapshots
    }

    #[must_use]
    pub fn snapshot(&self, hour: u8) -> Option<&PriceSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.hour == hour)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl<'de> Deserialize<'de> for HourlyPriceSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let snapshots = Vec::<PriceSnapshot>::deserialize(deserializer)?;
        Self::new(snapshots).map_err(serde::de::Error::custom)
    }
}

/// Region-level view over hourly zone prices.
#[derive(Debug, Clone)]
pub struct HourlyPriceIndex {
    resolver: ZoneResolver,
    percentiles: RangePercentiles,
}

impl HourlyPriceIndex {
    #[must_use]
    pub fn new(resolver: ZoneResolver, percentiles: RangePercentiles) -> Self {
        Self {
            resolver,
            percentiles,
        }
    }

    #[must_use]
    pub fn resolver(&self) -> &ZoneResolver {
        &self.resolver
    }

    #[must_use]
    pub fn percentiles(&self) -> RangePercentiles {
        self.percentiles
    }

    /// Region prices for `hour`.
    ///
    /// Returns an empty map when the series has no snapshot for `hour`.
    /// Unresolved zones and absent prices are dropped. When two zones alias
    /// the same region, the one later in the snapshot's order wins.
    #[must_use]
    pub fn for_hour(&self, series: &HourlyPriceSeries, hour: u8) -> IndexMap<RegionId, f64> {
        let Some(snapshot) = series.snapshot(hour) else {
            trace!(hour, "no snapshot for hour");
            return IndexMap::new();
        };

        let mut by_region = IndexMap::new();
        for (zone, price) in snapshot.present_prices() {
            if let Some(region) = self.resolver.resolve(zone) {
                by_region.insert(region.clone(), price);
            }
        }
        by_region
    }

    /// Whether any zone has a present price at any hour.
    #[must_use]
    pub fn has_any_data(&self, series: &HourlyPriceSeries) -> bool {
        series.snapshots().iter().any(PriceSnapshot::has_data)
    }

    /// Hours that carry at least one present price, ascending.
    #[must_use]
    pub fn available_hours(&self, series: &HourlyPriceSeries) -> Vec<u8> {
        let mut hours: Vec<u8> = series
            .snapshots()
            .iter()
            .filter(|snapshot| snapshot.has_data())
            .map(|snapshot| snapshot.hour)
            .collect();
        hours.sort_unstable();
        hours
    }

    /// Day-wide color range over every non-negative price of a drawn zone.
    ///
    /// Using the whole day keeps colors stable while the selected hour moves.
    /// Only zones the injected alias table resolves contribute, so the same
    /// series can yield different ranges under different tables: with the
    /// default table a `PL` price counts, with a `DE`/`FR`-only table it does
    /// not.
    #[must_use]
    pub fn robust_range(&self, series: &HourlyPriceSeries) -> PriceRange {
        let values: Vec<f64> = series
            .snapshots()
            .iter()
            .flat_map(|snapshot| snapshot.present_prices())
            .filter(|(zone, price)| *price >= 0.0 && self.resolver.resolve(zone).is_some())
            .map(|(_, price)| price)
            .collect();
        compute_robust_range(&values, self.percentiles)
    }
}
