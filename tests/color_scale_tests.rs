use powerdash::core::PriceRange;
use powerdash::render::{Color, ColorScale, ColorScaleConfig, Hsl, PriceBand};

fn scale() -> ColorScale {
    ColorScale::new(ColorScaleConfig::default()).expect("default scale is valid")
}

fn hue_color(hue: f64) -> Color {
    Hsl::new(hue, 0.75, 0.5).to_color()
}

#[test]
fn negative_prices_use_reserved_color() {
    let scale = scale();
    let negative = Color::from_hex("#8b5cf6").expect("valid hex");

    for range in [
        PriceRange::new(0.0, 100.0),
        PriceRange::new(50.0, 50.0),
        PriceRange::new(-20.0, -10.0),
    ] {
        assert_eq!(scale.color_for(-0.01, range), negative);
        assert_eq!(scale.color_for(-500.0, range), negative);
    }
}

#[test]
fn range_endpoints_map_to_endpoint_hues() {
    let scale = scale();
    let range = PriceRange::new(20.0, 180.0);

    assert_eq!(scale.color_for(20.0, range), hue_color(140.0));
    assert_eq!(scale.color_for(180.0, range), hue_color(0.0));
    assert_eq!(scale.low_color(), hue_color(140.0));
    assert_eq!(scale.high_color(), hue_color(0.0));
}

#[test]
fn prices_outside_range_saturate() {
    let scale = scale();
    let range = PriceRange::new(20.0, 180.0);

    assert_eq!(scale.color_for(5.0, range), scale.low_color());
    assert_eq!(scale.color_for(900.0, range), scale.high_color());
}

#[test]
fn midpoint_interpolates_hue_linearly() {
    let scale = scale();
    let band = scale.classify(60.0, PriceRange::new(40.0, 80.0));
    let PriceBand::Scaled { ratio, hue } = band else {
        panic!("expected scaled band, got {band:?}");
    };
    assert!((ratio - 0.5).abs() <= 1e-12);
    assert!((hue - 70.0).abs() <= 1e-9);
}

#[test]
fn degenerate_range_yields_neutral_hue() {
    let scale = scale();
    let range = PriceRange::new(50.0, 50.0);

    assert_eq!(scale.classify(50.0, range), PriceBand::Degenerate);
    assert_eq!(scale.color_for(50.0, range), hue_color(70.0));
    assert_eq!(scale.color_for(10.0, range), scale.neutral_color());
}

#[test]
fn inverted_range_is_treated_as_degenerate() {
    let scale = scale();
    assert_eq!(
        scale.classify(30.0, PriceRange::new(80.0, 20.0)),
        PriceBand::Degenerate
    );
}

#[test]
fn non_finite_price_is_no_data() {
    let scale = scale();
    let range = PriceRange::new(0.0, 100.0);
    let no_data = Color::from_hex("#9ca3af").expect("valid hex");

    assert_eq!(scale.classify(f64::NAN, range), PriceBand::NoData);
    assert_eq!(scale.color_for(f64::NAN, range), no_data);
    assert_eq!(scale.color_for(f64::INFINITY, range), no_data);
}

#[test]
fn custom_hues_are_honored() {
    let config = ColorScaleConfig {
        cheap_hue: 200.0,
        expensive_hue: 300.0,
        ..ColorScaleConfig::default()
    };
    let scale = ColorScale::new(config).expect("valid scale");
    let range = PriceRange::new(0.0, 10.0);
    assert_eq!(scale.color_for(0.0, range), hue_color(200.0));
    assert_eq!(scale.color_for(10.0, range), hue_color(300.0));
}

#[test]
fn invalid_config_is_rejected() {
    let bad_hue = ColorScaleConfig {
        cheap_hue: 400.0,
        ..ColorScaleConfig::default()
    };
    assert!(ColorScale::new(bad_hue).is_err());

    let bad_saturation = ColorScaleConfig {
        saturation: f64::NAN,
        ..ColorScaleConfig::default()
    };
    assert!(ColorScale::new(bad_saturation).is_err());
}

#[test]
fn colors_render_as_hex() {
    let scale = scale();
    assert_eq!(scale.config().negative_color.to_hex(), "#8b5cf6");
    assert_eq!(hue_color(0.0).to_hex(), "#df2020");
}
