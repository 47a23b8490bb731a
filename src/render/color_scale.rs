use serde::{Deserialize, Serialize};

use crate::core::PriceRange;
use crate::error::{DashError, DashResult};
use crate::render::{Color, Hsl};

/// Static parameters of the price color scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScaleConfig {
    /// Hue (degrees) at the low end of the range.
    pub cheap_hue: f64,
    /// Hue (degrees) at the high end of the range.
    pub expensive_hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    /// Reserved for prices below zero.
    pub negative_color: Color,
    /// Regions without a price for the selected hour.
    pub no_data_color: Color,
}

impl Default for ColorScaleConfig {
    fn default() -> Self {
        Self {
            cheap_hue: 140.0,
            expensive_hue: 0.0,
            saturation: 0.75,
            lightness: 0.5,
            negative_color: Color::from_rgb8(0x8b, 0x5c, 0xf6),
            no_data_color: Color::from_rgb8(0x9c, 0xa3, 0xaf),
        }
    }
}

impl ColorScaleConfig {
    pub fn validate(self) -> DashResult<Self> {
        for (name, hue) in [
            ("cheap_hue", self.cheap_hue),
            ("expensive_hue", self.expensive_hue),
        ] {
            if !hue.is_finite() || !(0.0..=360.0).contains(&hue) {
                return Err(DashError::InvalidConfig(format!(
                    "color scale `{name}` must be finite and in [0, 360]"
                )));
            }
        }
        for (name, value) in [
            ("saturation", self.saturation),
            ("lightness", self.lightness),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(DashError::InvalidConfig(format!(
                    "color scale `{name}` must be finite and in [0, 1]"
                )));
            }
        }
        self.negative_color.validate()?;
        self.no_data_color.validate()?;
        Ok(self)
    }

    /// Hue used when the range cannot be interpolated.
    #[must_use]
    pub fn neutral_hue(self) -> f64 {
        (self.cheap_hue + self.expensive_hue) / 2.0
    }
}

/// Where a price lands on the scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceBand {
    /// Price below zero; drawn with the reserved negative color.
    Negative,
    /// Range has no width; every non-negative price shares the neutral hue.
    Degenerate,
    /// Interpolated position; `ratio` is 0 at `low` and 1 at `high`.
    Scaled { ratio: f64, hue: f64 },
    /// Price is not a finite number.
    NoData,
}

/// Maps prices onto a cheap-to-expensive hue ramp.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorScale {
    config: ColorScaleConfig,
}

impl ColorScale {
    pub fn new(config: ColorScaleConfig) -> DashResult<Self> {
        Ok(Self {
            config: config.validate()?,
        })
    }

    #[must_use]
    pub fn config(&self) -> ColorScaleConfig {
        self.config
    }

    #[must_use]
    pub fn classify(&self, price: f64, range: PriceRange) -> PriceBand {
        if !price.is_finite() {
            return PriceBand::NoData;
        }
        if price < 0.0 {
            return PriceBand::Negative;
        }
        if range.is_degenerate() || !range.low.is_finite() || !range.high.is_finite() {
            return PriceBand::Degenerate;
        }

        let clamped = range.clamp(price);
        let ratio = (clamped - range.low) / range.span();
        let hue =
            self.config.cheap_hue + (self.config.expensive_hue - self.config.cheap_hue) * ratio;
        PriceBand::Scaled { ratio, hue }
    }

    #[must_use]
    pub fn color_for(&self, price: f64, range: PriceRange) -> Color {
        match self.classify(price, range) {
            PriceBand::Negative => self.config.negative_color,
            PriceBand::NoData => self.config.no_data_color,
            PriceBand::Degenerate => self.hue_color(self.config.neutral_hue()),
            PriceBand::Scaled { hue, .. } => self.hue_color(hue),
        }
    }

    #[must_use]
    pub fn low_color(&self) -> Color {
        self.hue_color(self.config.cheap_hue)
    }

    #[must_use]
    pub fn high_color(&self) -> Color {
        self.hue_color(self.config.expensive_hue)
    }

    #[must_use]
    pub fn neutral_color(&self) -> Color {
        self.hue_color(self.config.neutral_hue())
    }

    fn hue_color(&self, hue: f64) -> Color {
        Hsl::new(hue, self.config.saturation, self.config.lightness).to_color()
    }
}
