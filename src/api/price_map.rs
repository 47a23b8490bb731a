use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{
    DayAheadPrices, HOURS_PER_DAY, HourlyPriceIndex, HourlyPriceSeries, PriceRange, RegionId,
};
use crate::error::{DashError, DashResult};
use crate::render::{Color, ColorScale};

use super::DashConfig;

/// Derived state that a view change can invalidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecomputeTopic {
    /// Day-wide range and data presence.
    Range,
    /// Per-region colors for the selected hour.
    Shades,
}

impl RecomputeTopic {
    const fn bit(self) -> u8 {
        match self {
            Self::Range => 1 << 0,
            Self::Shades => 1 << 1,
        }
    }
}

/// Set of stale derived values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StaleTopics {
    bits: u8,
}

impl StaleTopics {
    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn with_topic(self, topic: RecomputeTopic) -> Self {
        Self {
            bits: self.bits | topic.bit(),
        }
    }

    #[must_use]
    pub const fn contains(self, topic: RecomputeTopic) -> bool {
        self.bits & topic.bit() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }
}

/// Monotonic token identifying one price fetch.
///
/// Only a series delivered with the most recently issued ticket is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

/// Fill of one region for the selected hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RegionShade {
    /// No price for this region at this hour.
    NoData { color: Color },
    Priced { price: f64, color: Color },
}

impl RegionShade {
    #[must_use]
    pub fn color(self) -> Color {
        match self {
            Self::NoData { color } | Self::Priced { color, .. } => color,
        }
    }

    #[must_use]
    pub fn price(self) -> Option<f64> {
        match self {
            Self::NoData { .. } => None,
            Self::Priced { price, .. } => Some(price),
        }
    }
}

/// Legend content for the continuous scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub range: PriceRange,
    pub low_color: Color,
    pub high_color: Color,
    pub negative_color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Serializable state of the price map for debugging and regression tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceMapSnapshot {
    pub selected_hour: u8,
    pub has_data: bool,
    pub range: PriceRange,
    pub available_hours: Vec<u8>,
    pub regions: IndexMap<RegionId, RegionShade>,
}

/// Dashboard price map: one day of prices, a selected hour, derived colors.
///
/// Every state change recomputes what it invalidated before returning, so
/// accessors always read current values. Changing the hour leaves the
/// day-wide range untouched.
#[derive(Debug, Clone)]
pub struct PriceMapView {
    index: HourlyPriceIndex,
    scale: ColorScale,
    series: HourlyPriceSeries,
    unit: Option<String>,
    selected_hour: u8,
    issued_tickets: u64,
    range: PriceRange,
    has_data: bool,
    available_hours: Vec<u8>,
    shades: IndexMap<RegionId, RegionShade>,
}

impl PriceMapView {
    #[must_use]
    pub fn new(index: HourlyPriceIndex, scale: ColorScale) -> Self {
        let mut view = Self {
            index,
            scale,
            series: HourlyPriceSeries::empty(),
            unit: None,
            selected_hour: 0,
            issued_tickets: 0,
            range: PriceRange::default(),
            has_data: false,
            available_hours: Vec::new(),
            shades: IndexMap::new(),
        };
        view.recompute(
            StaleTopics::none()
                .with_topic(RecomputeTopic::Range)
                .with_topic(RecomputeTopic::Shades),
        );
        view
    }

    pub fn from_config(config: &DashConfig) -> DashResult<Self> {
        Ok(Self::new(config.price_index()?, config.color_scale()?))
    }

    /// Issues the ticket for a new fetch; earlier tickets become stale.
    pub fn begin_request(&mut self) -> RequestTicket {
        self.issued_tickets += 1;
        RequestTicket(self.issued_tickets)
    }

    /// Replaces the series if `ticket` is the latest issued one.
    ///
    /// Returns `false` (and leaves the view untouched) for stale tickets.
    pub fn apply_series(&mut self, ticket: RequestTicket, series: HourlyPriceSeries) -> bool {
        if ticket.0 != self.issued_tickets {
            warn!(
                ticket = ticket.0,
                latest = self.issued_tickets,
                "ignoring price series from superseded request"
            );
            return false;
        }
        self.replace_series(series);
        true
    }

    /// Converts and applies a day-ahead response delivered for `ticket`.
    pub fn apply_day_ahead(
        &mut self,
        ticket: RequestTicket,
        prices: DayAheadPrices,
    ) -> DashResult<bool> {
        let unit = prices.unit.clone();
        let series = prices.into_series()?;
        let applied = self.apply_series(ticket, series);
        if applied {
            self.unit = unit;
        }
        Ok(applied)
    }

    /// Replaces the series without ticket checks.
    pub fn replace_series(&mut self, series: HourlyPriceSeries) {
        debug!(
            snapshots = series.snapshots().len(),
            "replace price map series"
        );
        self.series = series;
        self.unit = None;
        self.recompute(
            StaleTopics::none()
                .with_topic(RecomputeTopic::Range)
                .with_topic(RecomputeTopic::Shades),
        );
    }

    pub fn select_hour(&mut self, hour: u8) -> DashResult<()> {
        if hour >= HOURS_PER_DAY {
            return Err(DashError::InvalidData(format!(
                "selected hour must be < {HOURS_PER_DAY} (got {hour})"
            )));
        }
        if hour == self.selected_hour {
            return Ok(());
        }
        self.selected_hour = hour;
        self.recompute(StaleTopics::none().with_topic(RecomputeTopic::Shades));
        Ok(())
    }

    fn recompute(&mut self, stale: StaleTopics) {
        if stale.contains(RecomputeTopic::Range) {
            self.range = self.index.robust_range(&self.series);
            self.has_data = self.index.has_any_data(&self.series);
            self.available_hours = self.index.available_hours(&self.series);
            trace!(
                low = self.range.low,
                high = self.range.high,
                has_data = self.has_data,
                "recomputed price range"
            );
        }
        if stale.contains(RecomputeTopic::Shades) {
            let prices = self.index.for_hour(&self.series, self.selected_hour);
            let no_data = self.scale.config().no_data_color;
            self.shades = self
                .index
                .resolver()
                .regions()
                .into_iter()
                .map(|region| {
                    let shade = match prices.get(region) {
                        Some(&price) => RegionShade::Priced {
                            price,
                            color: self.scale.color_for(price, self.range),
                        },
                        None => RegionShade::NoData { color: no_data },
                    };
                    (region.clone(), shade)
                })
                .collect();
            trace!(
                hour = self.selected_hour,
                priced = prices.len(),
                "recomputed region shades"
            );
        }
    }

    #[must_use]
    pub fn series(&self) -> &HourlyPriceSeries {
        &self.series
    }

    #[must_use]
    pub fn selected_hour(&self) -> u8 {
        self.selected_hour
    }

    #[must_use]
    pub fn range(&self) -> PriceRange {
        self.range
    }

    /// Whether the time scrubber and legend should be shown.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.has_data
    }

    #[must_use]
    pub fn available_hours(&self) -> &[u8] {
        &self.available_hours
    }

    #[must_use]
    pub fn shades(&self) -> &IndexMap<RegionId, RegionShade> {
        &self.shades
    }

    #[must_use]
    pub fn shade(&self, region: &RegionId) -> Option<RegionShade> {
        self.shades.get(region).copied()
    }

    /// Legend for the current day, or `None` for the empty state.
    #[must_use]
    pub fn legend(&self) -> Option<Legend> {
        self.has_data.then(|| Legend {
            range: self.range,
            low_color: self.scale.low_color(),
            high_color: self.scale.high_color(),
            negative_color: self.scale.config().negative_color,
            unit: self.unit.clone(),
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> PriceMapSnapshot {
        PriceMapSnapshot {
            selected_hour: self.selected_hour,
            has_data: self.has_data,
            range: self.range,
            available_hours: self.available_hours.clone(),
            regions: self.shades.clone(),
        }
    }
}
