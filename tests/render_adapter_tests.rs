use powerdash::chart::{CanonicalChart, ChartKind, ChartSeries};
use powerdash::render::{
    ChartRenderAdapter, Color, Emphasis, PaletteEntry, SeriesStyle, SeriesStylePolicy,
    toggle_highlight,
};

fn chart() -> CanonicalChart {
    CanonicalChart::new(
        ChartKind::Line,
        vec!["00:00".to_owned(), "01:00".to_owned()],
        vec![
            ChartSeries::new("Price", vec![50.0, 52.0]),
            ChartSeries::new("Forecast", vec![49.0, 53.0]),
            ChartSeries::new("Spread", vec![1.0, f64::NAN]),
        ],
        None,
    )
    .expect("valid chart")
}

fn palette() -> Vec<PaletteEntry> {
    vec![
        PaletteEntry::new("Price", Color::from_rgb8(0x25, 0x63, 0xeb)),
        PaletteEntry::new("Forecast", Color::from_rgb8(0xf5, 0x9e, 0x0b)),
    ]
}

#[test]
fn palette_colors_are_matched_by_name() {
    let adapter = ChartRenderAdapter::default();
    let spec = adapter.present(&chart(), None, &palette());

    assert_eq!(spec.kind, ChartKind::Line);
    assert_eq!(spec.labels, vec!["00:00", "01:00"]);
    let price = spec.series_named("Price").expect("price series");
    assert_eq!(price.color.to_hex(), "#2563eb");
    let forecast = spec.series_named("Forecast").expect("forecast series");
    assert_eq!(forecast.color.to_hex(), "#f59e0b");
}

#[test]
fn unmatched_series_use_fallback_color() {
    let adapter = ChartRenderAdapter::default();
    let spec = adapter.present(&chart(), None, &palette());
    let spread = spec.series_named("Spread").expect("spread series");
    assert_eq!(spread.color, adapter.policy().fallback_color);
}

#[test]
fn no_highlight_styles_uniformly() {
    let adapter = ChartRenderAdapter::default();
    let spec = adapter.present(&chart(), None, &palette());

    assert_eq!(spec.highlighted, None);
    let uniform = adapter.policy().uniform;
    for series in &spec.series {
        assert_eq!(series.emphasis, Emphasis::Uniform);
        assert_eq!(series.stroke_width, uniform.stroke_width);
        assert_eq!(series.opacity, uniform.opacity);
    }
}

#[test]
fn highlight_emphasizes_one_and_dims_others() {
    let adapter = ChartRenderAdapter::default();
    let spec = adapter.present(&chart(), Some("Forecast"), &palette());

    assert_eq!(spec.highlighted.as_deref(), Some("Forecast"));
    let forecast = spec.series_named("Forecast").expect("forecast series");
    assert_eq!(forecast.emphasis, Emphasis::Emphasized);
    assert_eq!(forecast.opacity, 1.0);

    for name in ["Price", "Spread"] {
        let dimmed = spec.series_named(name).expect("series present");
        assert_eq!(dimmed.emphasis, Emphasis::Dimmed);
        assert_eq!(dimmed.opacity, 0.15);
        assert!(dimmed.stroke_width < forecast.stroke_width);
    }
}

#[test]
fn unknown_highlight_is_treated_as_none() {
    let adapter = ChartRenderAdapter::default();
    let spec = adapter.present(&chart(), Some("Volatility"), &palette());
    assert_eq!(spec.highlighted, None);
    assert!(spec.series.iter().all(|s| s.emphasis == Emphasis::Uniform));
}

#[test]
fn toggling_same_series_clears_highlight() {
    let first = toggle_highlight(None, "Price");
    assert_eq!(first.as_deref(), Some("Price"));
    let second = toggle_highlight(first.as_deref(), "Forecast");
    assert_eq!(second.as_deref(), Some("Forecast"));
    assert_eq!(toggle_highlight(second.as_deref(), "Forecast"), None);
}

#[test]
fn custom_policy_is_validated() {
    let invalid = SeriesStylePolicy {
        dimmed: SeriesStyle::new(1.0, 1.5),
        ..SeriesStylePolicy::default()
    };
    assert!(ChartRenderAdapter::new(invalid).is_err());

    let faint = SeriesStylePolicy {
        dimmed: SeriesStyle::new(0.5, 0.05),
        ..SeriesStylePolicy::default()
    };
    let adapter = ChartRenderAdapter::new(faint).expect("valid policy");
    let spec = adapter.present(&chart(), Some("Price"), &[]);
    assert_eq!(spec.series_named("Forecast").expect("forecast").opacity, 0.05);
}

#[test]
fn gaps_serialize_as_null() {
    let spec = ChartRenderAdapter::default().present(&chart(), None, &palette());
    let json = serde_json::to_value(&spec).expect("serialize spec");
    assert_eq!(json["series"][2]["values"], serde_json::json!([1.0, null]));
    assert_eq!(json["series"][0]["color"], "#2563eb");
}
