use serde_json::{Map, Value};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::error::DashError;

use super::canonical::{CanonicalChart, ChartKind, ChartSeries};
use super::failure::{FailureKind, NormalizationFailure};
use super::payload::{RawChartPayload, decode};
use super::rules::{
    DATA_KEY, KIND_KEYS, LABELS_KEY, SERIES_COLLECTION_KEYS, SERIES_NAME_KEYS,
    SERIES_VALUE_KEYS, ShapeRule,
};

/// Successful normalization together with the adaptations it needed.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub chart: CanonicalChart,
    pub applied: SmallVec<[ShapeRule; 4]>,
    /// Number of string encodings peeled off before the shape rules ran.
    pub decode_depth: usize,
}

/// Turns loosely shaped agent chart payloads into [`CanonicalChart`]s.
///
/// Decoding runs first, then every [`ShapeRule`] in [`ShapeRule::ORDERED`]
/// gets one chance to adapt the payload, then the result is validated.
/// Normalization is total: every input ends as a chart or a tagged failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartPayloadNormalizer;

impl ChartPayloadNormalizer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    pub fn normalize(
        &self,
        raw: impl Into<RawChartPayload>,
    ) -> Result<CanonicalChart, NormalizationFailure> {
        self.normalize_traced(raw).map(|normalized| normalized.chart)
    }

    pub fn normalize_traced(
        &self,
        raw: impl Into<RawChartPayload>,
    ) -> Result<Normalized, NormalizationFailure> {
        let raw = raw.into();
        let result = normalize_payload(&raw);
        match &result {
            Ok(normalized) => debug!(
                kind = %normalized.chart.kind(),
                series = normalized.chart.series().len(),
                labels = normalized.chart.labels().len(),
                applied = ?normalized.applied.as_slice(),
                "normalized chart payload"
            ),
            Err((kind, detail)) => warn!(kind = %kind, detail = %detail, "chart payload rejected"),
        }
        result.map_err(|(kind, detail)| NormalizationFailure::new(kind, detail, raw))
    }
}

/// Shorthand for [`ChartPayloadNormalizer::normalize`].
pub fn normalize(raw: impl Into<RawChartPayload>) -> Result<CanonicalChart, NormalizationFailure> {
    ChartPayloadNormalizer::new().normalize(raw)
}

type Rejection = (FailureKind, String);

fn normalize_payload(raw: &RawChartPayload) -> Result<Normalized, Rejection> {
    let decoded = decode(raw).map_err(|detail| (FailureKind::Unparseable, detail))?;
    let mut root = match decoded.value {
        Value::Object(root) => root,
        other => {
            return Err(mismatch(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            )));
        }
    };

    let mut applied = SmallVec::new();
    for rule in ShapeRule::ORDERED {
        if rule.apply(&mut root) {
            applied.push(rule);
        }
    }

    let chart = validate(root)?;
    Ok(Normalized {
        chart,
        applied,
        decode_depth: decoded.depth,
    })
}

fn validate(mut root: Map<String, Value>) -> Result<CanonicalChart, Rejection> {
    let kind = chart_kind(&root);
    let options = root.remove("options").filter(|options| !options.is_null());

    let Some(Value::Object(mut data)) = root.remove(DATA_KEY) else {
        return Err(mismatch("payload has no `data` object"));
    };
    let Some(collection) = SERIES_COLLECTION_KEYS
        .into_iter()
        .find_map(|key| data.remove(key))
    else {
        return Err(mismatch("payload has no series collection"));
    };
    let Value::Array(datasets) = collection else {
        return Err(mismatch("series collection is not a list"));
    };
    if datasets.is_empty() {
        return Err((FailureKind::EmptySeries, "chart has no series".to_owned()));
    }

    let labels = match data.remove(LABELS_KEY) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(labels)) => labels
            .iter()
            .enumerate()
            .map(|(index, label)| {
                label_text(label)
                    .ok_or_else(|| mismatch(format!("label {index} is not a scalar")))
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(mismatch(format!(
                "labels must be a list, got {}",
                json_type_name(&other)
            )));
        }
    };

    let series = datasets
        .into_iter()
        .enumerate()
        .map(|(index, dataset)| series_from_value(index, dataset))
        .collect::<Result<Vec<_>, _>>()?;

    CanonicalChart::new(kind, labels, series, options).map_err(|err| match err {
        DashError::InvalidData(detail) | DashError::InvalidConfig(detail) => mismatch(detail),
    })
}

fn chart_kind(root: &Map<String, Value>) -> ChartKind {
    let Some(declared) = KIND_KEYS
        .into_iter()
        .find_map(|key| root.get(key).and_then(Value::as_str))
    else {
        return ChartKind::default();
    };
    ChartKind::parse(declared).unwrap_or_else(|| {
        debug!(declared, "unrecognized chart kind, defaulting to line");
        ChartKind::default()
    })
}

fn series_from_value(index: usize, dataset: Value) -> Result<ChartSeries, Rejection> {
    let Value::Object(mut dataset) = dataset else {
        return Err(mismatch(format!("series {index} is not an object")));
    };

    let name = SERIES_NAME_KEYS
        .into_iter()
        .find_map(|key| dataset.get(key).and_then(label_text))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("Series {}", index + 1));

    let Some(values) = SERIES_VALUE_KEYS
        .into_iter()
        .find_map(|key| dataset.remove(key))
    else {
        return Err(mismatch(format!("series `{name}` has no values")));
    };
    let Value::Array(values) = values else {
        return Err(mismatch(format!("series `{name}` values are not a list")));
    };

    let values = values
        .iter()
        .enumerate()
        .map(|(position, value)| {
            numeric_value(value).ok_or_else(|| {
                mismatch(format!("series `{name}` value {position} is not numeric"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ChartSeries::new(name, values))
}

/// Numbers, numeric strings and `null` (a gap, carried as `NaN`).
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(f64::NAN),
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .map(|parsed| if parsed.is_finite() { parsed } else { f64::NAN }),
        _ => None,
    }
}

fn label_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn mismatch(detail: impl Into<String>) -> Rejection {
    (FailureKind::StructureMismatch, detail.into())
}
