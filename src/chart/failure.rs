use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::RawChartPayload;

/// Why a payload could not become a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Text that does not decode as JSON.
    Unparseable,
    /// Decoded, but matches no recognized chart shape.
    StructureMismatch,
    /// Chart-shaped, but with zero series. Treated like `StructureMismatch`.
    EmptySeries,
}

impl FailureKind {
    #[must_use]
    pub const fn is_structure_mismatch(self) -> bool {
        matches!(self, Self::StructureMismatch | Self::EmptySeries)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unparseable => "unparseable",
            Self::StructureMismatch => "structure mismatch",
            Self::EmptySeries => "empty series",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged normalization failure. Always carries the payload as received.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("chart payload {kind}: {detail}")]
pub struct NormalizationFailure {
    pub kind: FailureKind,
    pub detail: String,
    pub raw: RawChartPayload,
}

impl NormalizationFailure {
    #[must_use]
    pub fn new(kind: FailureKind, detail: impl Into<String>, raw: RawChartPayload) -> Self {
        Self {
            kind,
            detail: detail.into(),
            raw,
        }
    }

    #[must_use]
    pub fn diagnostic(&self) -> ChartDiagnostic {
        ChartDiagnostic {
            title: match self.kind {
                FailureKind::Unparseable => "Chart data could not be read".to_owned(),
                FailureKind::StructureMismatch | FailureKind::EmptySeries => {
                    "Chart data has an unsupported shape".to_owned()
                }
            },
            kind: self.kind,
            detail: self.detail.clone(),
            raw: self.raw.to_display_string(),
        }
    }
}

/// Placeholder block shown in place of a chart that failed to normalize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDiagnostic {
    pub title: String,
    pub kind: FailureKind,
    pub detail: String,
    /// Payload as received, pretty-printed when structured.
    pub raw: String,
}
