use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DashError, DashResult};

/// Chart kinds the rendering layer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
}

impl ChartKind {
    /// Case-insensitive match against the known kinds.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("line") {
            Some(Self::Line)
        } else if input.eq_ignore_ascii_case("bar") {
            Some(Self::Bar)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named value sequence. `NaN` marks a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<f64>,
}

impl ChartSeries {
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// The single chart shape the rendering layer consumes.
///
/// Every series carries exactly one value per label; the constructor is the
/// only way in and refuses anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CanonicalChartWire", into = "CanonicalChartWire")]
pub struct CanonicalChart {
    kind: ChartKind,
    labels: Vec<String>,
    series: Vec<ChartSeries>,
    options: Option<Value>,
}

impl CanonicalChart {
    pub fn new(
        kind: ChartKind,
        labels: Vec<String>,
        series: Vec<ChartSeries>,
        options: Option<Value>,
    ) -> DashResult<Self> {
        if series.is_empty() {
            return Err(DashError::InvalidData(
                "chart must contain at least one series".to_owned(),
            ));
        }
        for item in &series {
            if item.values.len() != labels.len() {
                return Err(DashError::InvalidData(format!(
                    "series `{}` has {} values but chart has {} labels",
                    item.name,
                    item.values.len(),
                    labels.len()
                )));
            }
        }
        Ok(Self {
            kind,
            labels,
            series,
            options,
        })
    }

    #[must_use]
    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn series(&self) -> &[ChartSeries] {
        &self.series
    }

    #[must_use]
    pub fn options(&self) -> Option<&Value> {
        self.options.as_ref()
    }

    #[must_use]
    pub fn series_named(&self, name: &str) -> Option<&ChartSeries> {
        self.series.iter().find(|series| series.name == name)
    }

    /// Canonical JSON form (`{"type", "data": {"labels", "datasets"}, "options"}`).
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(CanonicalChartWire::from(self.clone())).unwrap_or(Value::Null)
    }
}

#[derive(Serialize, Deserialize)]
struct CanonicalChartWire {
    #[serde(rename = "type", default)]
    kind: ChartKind,
    data: ChartDataWire,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct ChartDataWire {
    labels: Vec<String>,
    datasets: Vec<DatasetWire>,
}

#[derive(Serialize, Deserialize)]
struct DatasetWire {
    label: String,
    data: Vec<Option<f64>>,
}

impl TryFrom<CanonicalChartWire> for CanonicalChart {
    type Error = DashError;

    fn try_from(wire: CanonicalChartWire) -> DashResult<Self> {
        let series = wire
            .data
            .datasets
            .into_iter()
            .map(|dataset| {
                ChartSeries::new(
                    dataset.label,
                    dataset
                        .data
                        .into_iter()
                        .map(|value| value.unwrap_or(f64::NAN))
                        .collect(),
                )
            })
            .collect();
        Self::new(wire.kind, wire.data.labels, series, wire.options)
    }
}

impl From<CanonicalChart> for CanonicalChartWire {
    fn from(chart: CanonicalChart) -> Self {
        Self {
            kind: chart.kind,
            data: ChartDataWire {
                labels: chart.labels,
                datasets: chart
                    .series
                    .into_iter()
                    .map(|series| DatasetWire {
                        label: series.name,
                        data: series
                            .values
                            .into_iter()
                            .map(|value| value.is_finite().then_some(value))
                            .collect(),
                    })
                    .collect(),
            },
            options: chart.options,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{CanonicalChart, ChartKind, ChartSeries};

    #[test]
    fn constructor_rejects_length_mismatch() {
        let result = CanonicalChart::new(
            ChartKind::Line,
            vec!["a".to_owned()],
            vec![ChartSeries::new("s", vec![1.0, 2.0])],
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn gaps_serialize_as_null() {
        let chart = CanonicalChart::new(
            ChartKind::Bar,
            vec!["a".to_owned(), "b".to_owned()],
            vec![ChartSeries::new("s", vec![1.5, f64::NAN])],
            None,
        )
        .expect("valid chart");
        assert_eq!(
            chart.to_value(),
            json!({"type": "bar", "data": {"labels": ["a", "b"], "datasets": [{"label": "s", "data": [1.5, null]}]}})
        );
    }

    #[test]
    fn kind_parse_is_case_insensitive() {
        assert_eq!(ChartKind::parse(" BAR "), Some(ChartKind::Bar));
        assert_eq!(ChartKind::parse("pie"), None);
    }
}
