use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_ZONE_ALIASES, HourlyPriceIndex, RangePercentiles, ZoneResolver};
use crate::error::{DashError, DashResult};
use crate::render::{
    ChartRenderAdapter, Color, ColorScale, ColorScaleConfig, PaletteEntry, SeriesStylePolicy,
};

use super::validation::{validate_palette, validate_zone_aliases};

/// Static dashboard configuration.
///
/// Loaded once at startup and handed to the components that need it; every
/// field falls back to the shipped default when omitted from the JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashConfig {
    #[serde(default)]
    pub percentiles: RangePercentiles,
    #[serde(default)]
    pub color_scale: ColorScaleConfig,
    #[serde(default = "default_zone_aliases")]
    pub zone_aliases: IndexMap<String, String>,
    #[serde(default = "default_palette")]
    pub palette: Vec<PaletteEntry>,
    #[serde(default)]
    pub series_style: SeriesStylePolicy,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            percentiles: RangePercentiles::default(),
            color_scale: ColorScaleConfig::default(),
            zone_aliases: default_zone_aliases(),
            palette: default_palette(),
            series_style: SeriesStylePolicy::default(),
        }
    }
}

impl DashConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(input: &str) -> DashResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| DashError::InvalidConfig(format!("failed to parse config json: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> DashResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DashError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    pub fn validate(&self) -> DashResult<()> {
        self.color_scale.validate()?;
        self.series_style.validate()?;
        validate_zone_aliases(&self.zone_aliases)?;
        validate_palette(&self.palette)?;
        Ok(())
    }

    /// Sets percentile trimming bounds.
    #[must_use]
    pub fn with_percentiles(mut self, percentiles: RangePercentiles) -> Self {
        self.percentiles = percentiles;
        self
    }

    /// Sets hue endpoints and reserved colors.
    #[must_use]
    pub fn with_color_scale(mut self, color_scale: ColorScaleConfig) -> Self {
        self.color_scale = color_scale;
        self
    }

    /// Replaces the whole zone alias table.
    #[must_use]
    pub fn with_zone_aliases<I, Z, R>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (Z, R)>,
        Z: Into<String>,
        R: Into<String>,
    {
        self.zone_aliases = aliases
            .into_iter()
            .map(|(zone, region)| (zone.into(), region.into()))
            .collect();
        self
    }

    /// Adds or replaces one zone alias.
    #[must_use]
    pub fn with_zone_alias(mut self, zone: impl Into<String>, region: impl Into<String>) -> Self {
        self.zone_aliases.insert(zone.into(), region.into());
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Vec<PaletteEntry>) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn with_series_style(mut self, series_style: SeriesStylePolicy) -> Self {
        self.series_style = series_style;
        self
    }

    pub fn zone_resolver(&self) -> DashResult<ZoneResolver> {
        ZoneResolver::from_pairs(&self.zone_aliases)
    }

    pub fn price_index(&self) -> DashResult<HourlyPriceIndex> {
        Ok(HourlyPriceIndex::new(self.zone_resolver()?, self.percentiles))
    }

    pub fn color_scale(&self) -> DashResult<ColorScale> {
        ColorScale::new(self.color_scale)
    }

    pub fn render_adapter(&self) -> DashResult<ChartRenderAdapter> {
        ChartRenderAdapter::new(self.series_style)
    }
}

fn default_zone_aliases() -> IndexMap<String, String> {
    DEFAULT_ZONE_ALIASES
        .iter()
        .map(|(zone, region)| ((*zone).to_owned(), (*region).to_owned()))
        .collect()
}

fn default_palette() -> Vec<PaletteEntry> {
    [
        ("Price", 0x25, 0x63, 0xeb),
        ("Forecast", 0xf5, 0x9e, 0x0b),
        ("Volatility", 0xdc, 0x26, 0x26),
        ("Actual", 0x10, 0xb9, 0x81),
    ]
    .into_iter()
    .map(|(name, r, g, b)| PaletteEntry::new(name, Color::from_rgb8(r, g, b)))
    .collect()
}
