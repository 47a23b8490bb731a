pub mod day_ahead;
pub mod hourly;
pub mod range;
pub mod zone;

pub use day_ahead::DayAheadPrices;
pub use hourly::{HOURS_PER_DAY, HourlyPriceIndex, HourlyPriceSeries, PriceSnapshot};
pub use range::{FALLBACK_RANGE, PriceRange, RangePercentiles, compute_robust_range};
pub use zone::{DEFAULT_ZONE_ALIASES, RegionId, ZoneResolver};
