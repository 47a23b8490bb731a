use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::chart::{CanonicalChart, ChartKind};
use crate::error::{DashError, DashResult};
use crate::render::Color;

/// Declared color for one series name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    pub color: Color,
}

impl PaletteEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Stroke and opacity applied to one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub stroke_width: f64,
    pub opacity: f64,
}

impl SeriesStyle {
    #[must_use]
    pub const fn new(stroke_width: f64, opacity: f64) -> Self {
        Self {
            stroke_width,
            opacity,
        }
    }

    fn validate(self, name: &str) -> DashResult<Self> {
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(DashError::InvalidConfig(format!(
                "`{name}` stroke width must be finite and > 0"
            )));
        }
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(DashError::InvalidConfig(format!(
                "`{name}` opacity must be finite and in [0, 1]"
            )));
        }
        Ok(self)
    }
}

/// Styling applied to series depending on the highlight state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesStylePolicy {
    /// Every series when nothing is highlighted.
    pub uniform: SeriesStyle,
    /// The highlighted series.
    pub emphasized: SeriesStyle,
    /// Every other series while one is highlighted.
    pub dimmed: SeriesStyle,
    /// Color for series the palette does not name.
    pub fallback_color: Color,
}

impl Default for SeriesStylePolicy {
    fn default() -> Self {
        Self {
            uniform: SeriesStyle::new(2.0, 1.0),
            emphasized: SeriesStyle::new(3.0, 1.0),
            dimmed: SeriesStyle::new(1.0, 0.15),
            fallback_color: Color::from_rgb8(0x64, 0x74, 0x8b),
        }
    }
}

impl SeriesStylePolicy {
    pub fn validate(self) -> DashResult<Self> {
        self.uniform.validate("uniform")?;
        self.emphasized.validate("emphasized")?;
        self.dimmed.validate("dimmed")?;
        self.fallback_color.validate()?;
        Ok(self)
    }
}

/// How a series is drawn relative to the highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    Uniform,
    Emphasized,
    Dimmed,
}

/// Renderer-ready configuration of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRenderSpec {
    pub name: String,
    #[serde(with = "gap_values")]
    pub values: Vec<f64>,
    pub color: Color,
    pub stroke_width: f64,
    pub opacity: f64,
    pub emphasis: Emphasis,
}

/// Everything the presentation layer needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub series: Vec<SeriesRenderSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl RenderSpec {
    #[must_use]
    pub fn series_named(&self, name: &str) -> Option<&SeriesRenderSpec> {
        self.series.iter().find(|series| series.name == name)
    }
}

/// Applies palette colors and highlight styling to canonical charts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChartRenderAdapter {
    policy: SeriesStylePolicy,
}

impl ChartRenderAdapter {
    pub fn new(policy: SeriesStylePolicy) -> DashResult<Self> {
        Ok(Self {
            policy: policy.validate()?,
        })
    }

    #[must_use]
    pub fn policy(&self) -> SeriesStylePolicy {
        self.policy
    }

    /// Builds the render configuration for `chart`.
    ///
    /// A `highlighted` name that matches no series is treated as no highlight.
    #[must_use]
    pub fn present(
        &self,
        chart: &CanonicalChart,
        highlighted: Option<&str>,
        palette: &[PaletteEntry],
    ) -> RenderSpec {
        let highlighted = highlighted.filter(|name| chart.series_named(name).is_some());
        if let Some(name) = highlighted {
            trace!(series = name, "present chart with highlight");
        }

        let series = chart
            .series()
            .iter()
            .map(|series| {
                let emphasis = match highlighted {
                    None => Emphasis::Uniform,
                    Some(name) if name == series.name => Emphasis::Emphasized,
                    Some(_) => Emphasis::Dimmed,
                };
                let style = match emphasis {
                    Emphasis::Uniform => self.policy.uniform,
                    Emphasis::Emphasized => self.policy.emphasized,
                    Emphasis::Dimmed => self.policy.dimmed,
                };
                SeriesRenderSpec {
                    name: series.name.clone(),
                    values: series.values.clone(),
                    color: palette_color(palette, &series.name)
                        .unwrap_or(self.policy.fallback_color),
                    stroke_width: style.stroke_width,
                    opacity: style.opacity,
                    emphasis,
                }
            })
            .collect();

        RenderSpec {
            kind: chart.kind(),
            labels: chart.labels().to_vec(),
            series,
            highlighted: highlighted.map(str::to_owned),
            options: chart.options().cloned(),
        }
    }
}

fn palette_color(palette: &[PaletteEntry], name: &str) -> Option<Color> {
    palette
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| entry.color)
}

/// Click-to-focus transition: clicking the highlighted series clears it.
#[must_use]
pub fn toggle_highlight(current: Option<&str>, clicked: &str) -> Option<String> {
    match current {
        Some(name) if name == clicked => None,
        _ => Some(clicked.to_owned()),
    }
}

/// Serializes `NaN` gaps as `null` and reads them back.
mod gap_values {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        values
            .iter()
            .map(|value| value.is_finite().then_some(*value))
            .collect::<Vec<_>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let values = Vec::<Option<f64>>::deserialize(deserializer)?;
        Ok(values
            .into_iter()
            .map(|value| value.unwrap_or(f64::NAN))
            .collect())
    }
}
