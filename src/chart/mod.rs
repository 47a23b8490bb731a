//! Agent chart payload normalization.

mod canonical;
mod failure;
mod normalizer;
mod payload;
mod rules;

pub use canonical::{CanonicalChart, ChartKind, ChartSeries};
pub use failure::{ChartDiagnostic, FailureKind, NormalizationFailure};
pub use normalizer::{ChartPayloadNormalizer, Normalized, normalize};
pub use payload::{Decoded, MAX_DECODE_DEPTH, RawChartPayload, decode};
pub use rules::{DEFAULT_AXIS_SERIES_NAME, ShapeRule};
