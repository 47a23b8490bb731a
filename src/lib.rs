//! powerdash: presentation core for an electricity market dashboard.
//!
//! The crate maps hourly day-ahead prices onto colored map regions and turns
//! loosely shaped chart payloads from an analytics agent into renderer-ready
//! chart configurations. Rendering and transport stay outside the crate.

pub mod api;
pub mod chart;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{ChatPresenter, DashConfig, PriceMapView};
pub use error::{DashError, DashResult};
