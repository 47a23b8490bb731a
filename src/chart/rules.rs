//! Shape-recognition rules applied between decoding and validation.
//!
//! Each rule owns one structural signature. `ShapeRule::apply` checks that
//! signature itself and only touches the fields it recognizes, so the rules
//! can run in sequence over the same payload and each can be tested alone.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::payload::parse_text;

pub(crate) const DATA_KEY: &str = "data";
pub(crate) const LABELS_KEY: &str = "labels";
pub(crate) const DATASETS_KEY: &str = "datasets";
pub(crate) const SERIES_COLLECTION_KEYS: [&str; 2] = [DATASETS_KEY, "series"];
pub(crate) const SINGULAR_SERIES_KEY: &str = "dataset";
const ANY_SERIES_KEYS: [&str; 3] = [DATASETS_KEY, "series", SINGULAR_SERIES_KEY];
pub(crate) const SERIES_NAME_KEYS: [&str; 2] = ["label", "name"];
pub(crate) const SERIES_VALUE_KEYS: [&str; 2] = ["data", "values"];
pub(crate) const KIND_KEYS: [&str; 3] = ["type", "kind", "chart_type"];
const OPTIONS_KEY: &str = "options";
const ENVELOPE_KEYS: [&str; 3] = ["chart_data", "chartData", "chart"];
const AXIS_PAIRS: [(&str, &str); 4] = [
    ("x", "y"),
    ("x_values", "y_values"),
    ("xAxis", "yAxis"),
    ("x_axis", "y_axis"),
];
const AXIS_LABEL_KEYS: [&str; 5] = ["ylabel", "y_label", "yLabel", "label", "name"];

/// Series name used when an axis pair carries no label.
pub const DEFAULT_AXIS_SERIES_NAME: &str = "Value";

/// Closed set of payload adaptations, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeRule {
    /// Chart wrapped one level deeper in an envelope field.
    Unwrap,
    /// Parallel `x`/`y` sequences instead of labeled series.
    AxisPair,
    /// Series collection at the root instead of under `data`.
    MissingWrapper,
    /// Single series object where a collection is expected, under `data`.
    SingularSeries,
    /// Single series object at the root with no `data` container.
    RootSingularSeries,
}

impl ShapeRule {
    pub const ORDERED: [Self; 5] = [
        Self::Unwrap,
        Self::AxisPair,
        Self::MissingWrapper,
        Self::SingularSeries,
        Self::RootSingularSeries,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unwrap => "unwrap",
            Self::AxisPair => "axis_pair",
            Self::MissingWrapper => "missing_wrapper",
            Self::SingularSeries => "singular_series",
            Self::RootSingularSeries => "root_singular_series",
        }
    }

    /// Whether `root` carries this rule's signature.
    #[must_use]
    pub fn matches(self, root: &Map<String, Value>) -> bool {
        match self {
            Self::Unwrap => !is_chart_shaped(root) && find_wrapped_chart(root).is_some(),
            Self::AxisPair => axis_pair_target(root).is_some(),
            Self::MissingWrapper => {
                (root_series_key(root).is_some() && container_accepts_series(root))
                    || has_orphaned_root_labels(root)
            }
            Self::SingularSeries => {
                data_container(root).is_some_and(|data| singular_series_key(data).is_some())
            }
            Self::RootSingularSeries => {
                root.get(SINGULAR_SERIES_KEY).is_some_and(Value::is_object)
                    && container_accepts_series(root)
            }
        }
    }

    /// Adapts `root` in place when it carries this rule's signature.
    ///
    /// Returns whether anything changed.
    pub fn apply(self, root: &mut Map<String, Value>) -> bool {
        if !self.matches(root) {
            return false;
        }
        match self {
            Self::Unwrap => unwrap_envelope(root),
            Self::AxisPair => adapt_axis_pair(root),
            Self::MissingWrapper => relocate_root_series(root),
            Self::SingularSeries => wrap_singular_series(root),
            Self::RootSingularSeries => wrap_root_singular_series(root),
        }
        true
    }
}

impl fmt::Display for ShapeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether `map` already looks like a chart description at this level.
pub(crate) fn is_chart_shaped(map: &Map<String, Value>) -> bool {
    let carries_series =
        |map: &Map<String, Value>| has_any_series_key(map) || find_axis_pair(map).is_some();

    carries_series(map)
        || data_container(map).is_some_and(|data| {
            carries_series(data) || data.get(LABELS_KEY).is_some_and(Value::is_array)
        })
}

pub(crate) fn data_container(root: &Map<String, Value>) -> Option<&Map<String, Value>> {
    root.get(DATA_KEY).and_then(Value::as_object)
}

fn data_container_mut(root: &mut Map<String, Value>) -> Option<&mut Map<String, Value>> {
    root.get_mut(DATA_KEY).and_then(Value::as_object_mut)
}

fn has_any_series_key(map: &Map<String, Value>) -> bool {
    ANY_SERIES_KEYS.iter().any(|key| map.contains_key(*key))
}

/// Detaches the `data` object, or starts a fresh one.
///
/// Callers check `container_accepts_series` first, so a non-object `data`
/// is only ever `null` here.
fn take_data_container(root: &mut Map<String, Value>) -> Map<String, Value> {
    match root.remove(DATA_KEY) {
        Some(Value::Object(data)) => data,
        _ => Map::new(),
    }
}

/// `data` is absent, null, or an object that has no series yet.
fn container_accepts_series(root: &Map<String, Value>) -> bool {
    match root.get(DATA_KEY) {
        None | Some(Value::Null) => true,
        Some(Value::Object(data)) => !has_any_series_key(data),
        Some(_) => false,
    }
}

fn root_series_key(root: &Map<String, Value>) -> Option<&'static str> {
    SERIES_COLLECTION_KEYS
        .into_iter()
        .find(|key| root.get(*key).is_some_and(|v| v.is_array() || v.is_object()))
}

fn singular_series_key(data: &Map<String, Value>) -> Option<&'static str> {
    if let Some(key) = SERIES_COLLECTION_KEYS
        .into_iter()
        .find(|key| data.contains_key(*key))
    {
        return data.get(key).is_some_and(Value::is_object).then_some(key);
    }
    data.get(SINGULAR_SERIES_KEY)
        .is_some_and(Value::is_object)
        .then_some(SINGULAR_SERIES_KEY)
}

fn take_root_labels(root: &mut Map<String, Value>) -> Value {
    root.remove(LABELS_KEY)
        .filter(|labels| !labels.is_null())
        .unwrap_or_else(|| Value::Array(Vec::new()))
}

// -- unwrap ------------------------------------------------------------------

fn find_wrapped_chart(root: &Map<String, Value>) -> Option<(String, Map<String, Value>)> {
    let sole_key = (root.len() == 1)
        .then(|| root.keys().next().map(String::as_str))
        .flatten();
    let candidates = ENVELOPE_KEYS
        .into_iter()
        .chain([DATA_KEY])
        .chain(sole_key);

    for key in candidates {
        let Some(value) = root.get(key) else {
            continue;
        };
        let inner = match value {
            Value::Object(map) => Some(map.clone()),
            Value::String(text) => match parse_text(text) {
                Ok((Value::Object(map), _)) => Some(map),
                _ => None,
            },
            _ => None,
        };
        if let Some(inner) = inner.filter(is_chart_shaped) {
            return Some((key.to_owned(), inner));
        }
    }
    None
}

fn unwrap_envelope(root: &mut Map<String, Value>) {
    let Some((key, mut inner)) = find_wrapped_chart(root) else {
        return;
    };
    root.remove(&key);
    for carried in KIND_KEYS.into_iter().chain([OPTIONS_KEY]) {
        if inner.contains_key(carried) {
            continue;
        }
        if let Some(value) = root.remove(carried) {
            inner.insert(carried.to_owned(), value);
        }
    }
    *root = inner;
}

// -- axis pair ---------------------------------------------------------------

#[derive(Clone, Copy)]
enum AxisTarget {
    Root,
    Data,
}

fn find_axis_pair(map: &Map<String, Value>) -> Option<(&'static str, &'static str)> {
    AXIS_PAIRS.into_iter().find(|(x_key, y_key)| {
        let x_ok = map.get(*x_key).is_some_and(Value::is_array);
        let y_ok = match map.get(*y_key) {
            Some(Value::Array(_)) => true,
            Some(Value::Object(named)) => !named.is_empty() && named.values().all(Value::is_array),
            _ => false,
        };
        x_ok && y_ok
    })
}

fn axis_pair_target(root: &Map<String, Value>) -> Option<(AxisTarget, &'static str, &'static str)> {
    if !has_any_series_key(root) && container_accepts_series(root) {
        if let Some((x_key, y_key)) = find_axis_pair(root) {
            return Some((AxisTarget::Root, x_key, y_key));
        }
    }
    let data = data_container(root)?;
    if has_any_series_key(data) {
        return None;
    }
    find_axis_pair(data).map(|(x_key, y_key)| (AxisTarget::Data, x_key, y_key))
}

fn adapt_axis_pair(root: &mut Map<String, Value>) {
    let Some((target, x_key, y_key)) = axis_pair_target(root) else {
        return;
    };
    match target {
        AxisTarget::Root => {
            let (labels, datasets) = take_axis_pair(root, x_key, y_key);
            let mut container = take_data_container(root);
            container.insert(LABELS_KEY.to_owned(), labels);
            container.insert(DATASETS_KEY.to_owned(), datasets);
            root.insert(DATA_KEY.to_owned(), Value::Object(container));
        }
        AxisTarget::Data => {
            if let Some(data) = data_container_mut(root) {
                let (labels, datasets) = take_axis_pair(data, x_key, y_key);
                data.insert(LABELS_KEY.to_owned(), labels);
                data.insert(DATASETS_KEY.to_owned(), datasets);
            }
        }
    }
}

/// Removes the axis pair and its label from `source`, returning labels and series.
fn take_axis_pair(
    source: &mut Map<String, Value>,
    x_key: &str,
    y_key: &str,
) -> (Value, Value) {
    let labels = source.remove(x_key).unwrap_or(Value::Array(Vec::new()));
    let dependent = source.remove(y_key).unwrap_or(Value::Array(Vec::new()));
    let name = AXIS_LABEL_KEYS
        .into_iter()
        .find(|key| source.get(*key).is_some_and(Value::is_string))
        .and_then(|key| source.remove(key))
        .and_then(|value| value.as_str().map(str::to_owned))
        .unwrap_or_else(|| DEFAULT_AXIS_SERIES_NAME.to_owned());

    let datasets = match dependent {
        Value::Object(named) => named
            .into_iter()
            .map(|(series_name, values)| series_object(series_name, values))
            .collect(),
        values => vec![series_object(name, values)],
    };
    (labels, Value::Array(datasets))
}

fn series_object(name: String, values: Value) -> Value {
    let mut series = Map::new();
    series.insert("label".to_owned(), Value::String(name));
    series.insert("data".to_owned(), values);
    Value::Object(series)
}

// -- missing wrapper ---------------------------------------------------------

/// Root `labels` next to a `data` container that has series but no labels.
fn has_orphaned_root_labels(root: &Map<String, Value>) -> bool {
    root.get(LABELS_KEY).is_some_and(Value::is_array)
        && data_container(root)
            .is_some_and(|data| has_any_series_key(data) && !data.contains_key(LABELS_KEY))
}

fn relocate_root_series(root: &mut Map<String, Value>) {
    let Some(key) = root_series_key(root).filter(|_| container_accepts_series(root)) else {
        if has_orphaned_root_labels(root) {
            let labels = take_root_labels(root);
            if let Some(data) = data_container_mut(root) {
                data.insert(LABELS_KEY.to_owned(), labels);
            }
        }
        return;
    };
    let Some(series) = root.remove(key) else {
        return;
    };
    let labels = take_root_labels(root);
    let mut container = take_data_container(root);
    container.insert(key.to_owned(), series);
    if !container.contains_key(LABELS_KEY) {
        container.insert(LABELS_KEY.to_owned(), labels);
    }
    root.insert(DATA_KEY.to_owned(), Value::Object(container));
}

// -- singular series ---------------------------------------------------------

fn wrap_singular_series(root: &mut Map<String, Value>) {
    let Some(data) = data_container_mut(root) else {
        return;
    };
    let Some(key) = singular_series_key(data) else {
        return;
    };
    if let Some(series) = data.remove(key) {
        data.insert(DATASETS_KEY.to_owned(), Value::Array(vec![series]));
    }
}

fn wrap_root_singular_series(root: &mut Map<String, Value>) {
    let Some(series) = root.remove(SINGULAR_SERIES_KEY) else {
        return;
    };
    let labels = take_root_labels(root);
    let mut container = take_data_container(root);
    container.insert(DATASETS_KEY.to_owned(), Value::Array(vec![series]));
    if !container.contains_key(LABELS_KEY) {
        container.insert(LABELS_KEY.to_owned(), labels);
    }
    root.insert(DATA_KEY.to_owned(), Value::Object(container));
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value, json};

    use super::ShapeRule;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn unwrap_descends_into_envelope_and_keeps_kind() {
        let mut root = object(json!({
            "type": "bar",
            "chart_data": {"data": {"labels": ["a"], "datasets": []}}
        }));
        assert!(ShapeRule::Unwrap.apply(&mut root));
        assert_eq!(
            Value::Object(root),
            json!({"data": {"labels": ["a"], "datasets": []}, "type": "bar"})
        );
    }

    #[test]
    fn unwrap_decodes_string_encoded_envelopes() {
        let inner = json!({"datasets": [{"label": "a", "data": []}]}).to_string();
        let mut root = object(json!({ "chart": inner }));
        assert!(ShapeRule::Unwrap.apply(&mut root));
        assert!(root.contains_key("datasets"));
    }

    #[test]
    fn unwrap_ignores_payloads_that_are_already_charts() {
        let mut root = object(json!({"data": {"labels": [], "datasets": []}}));
        assert!(!ShapeRule::Unwrap.apply(&mut root));
    }

    #[test]
    fn axis_pair_at_root_builds_data_container() {
        let mut root = object(json!({"x": ["a", "b"], "y": [1.0, 2.0], "label": "Load"}));
        assert!(ShapeRule::AxisPair.apply(&mut root));
        assert_eq!(
            Value::Object(root),
            json!({"data": {"labels": ["a", "b"], "datasets": [{"label": "Load", "data": [1.0, 2.0]}]}})
        );
    }

    #[test]
    fn axis_pair_with_named_dependents_yields_one_series_each() {
        let mut root = object(json!({"data": {"x": [1, 2], "y": {"DE": [1, 2], "FR": [3, 4]}}}));
        assert!(ShapeRule::AxisPair.apply(&mut root));
        let datasets = &root["data"]["datasets"];
        assert_eq!(datasets[0]["label"], json!("DE"));
        assert_eq!(datasets[1]["label"], json!("FR"));
    }

    #[test]
    fn missing_wrapper_moves_series_and_labels() {
        let mut root = object(json!({"labels": ["a"], "datasets": [{"label": "s", "data": [1]}]}));
        assert!(ShapeRule::MissingWrapper.apply(&mut root));
        assert_eq!(
            Value::Object(root),
            json!({"data": {"datasets": [{"label": "s", "data": [1]}], "labels": ["a"]}})
        );
    }

    #[test]
    fn singular_series_is_wrapped_in_collection() {
        let mut root = object(json!({"data": {"labels": [], "dataset": {"label": "s", "data": []}}}));
        assert!(ShapeRule::SingularSeries.apply(&mut root));
        assert_eq!(root["data"]["datasets"], json!([{"label": "s", "data": []}]));
    }

    #[test]
    fn root_singular_series_synthesizes_container() {
        let mut root = object(json!({"labels": ["h0"], "dataset": {"label": "s", "data": [4]}}));
        assert!(ShapeRule::RootSingularSeries.apply(&mut root));
        assert_eq!(
            Value::Object(root),
            json!({"data": {"datasets": [{"label": "s", "data": [4]}], "labels": ["h0"]}})
        );
    }

    #[test]
    fn rules_leave_unrelated_payloads_untouched() {
        for rule in ShapeRule::ORDERED {
            let mut root = object(json!({"message": "hello"}));
            assert!(!rule.apply(&mut root), "{rule} should not fire");
        }
    }

    #[test]
    fn root_labels_move_into_data_without_labels() {
        let mut root = object(json!({
            "labels": ["a", "b"],
            "data": {"datasets": [{"label": "P", "data": [1.0, 2.0]}]}
        }));
        assert!(ShapeRule::MissingWrapper.apply(&mut root));
        assert_eq!(
            Value::Object(root),
            json!({
                "data": {
                    "datasets": [{"label": "P", "data": [1.0, 2.0]}],
                    "labels": ["a", "b"]
                }
            })
        );
    }

    #[test]
    fn root_labels_do_not_override_data_labels() {
        let mut root = object(json!({
            "labels": ["x"],
            "data": {"labels": ["a"], "datasets": []}
        }));
        assert!(!ShapeRule::MissingWrapper.apply(&mut root));
    }
}
