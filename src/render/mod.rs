mod adapter;
mod color_scale;
mod primitives;

pub use adapter::{
    ChartRenderAdapter, Emphasis, PaletteEntry, RenderSpec, SeriesRenderSpec, SeriesStyle,
    SeriesStylePolicy, toggle_highlight,
};
pub use color_scale::{ColorScale, ColorScaleConfig, PriceBand};
pub use primitives::{Color, Hsl};
