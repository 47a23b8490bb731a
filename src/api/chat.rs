use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::chart::{CanonicalChart, ChartDiagnostic, ChartPayloadNormalizer, RawChartPayload};
use crate::error::{DashError, DashResult};
use crate::render::{ChartRenderAdapter, PaletteEntry, RenderSpec, toggle_highlight};

use super::DashConfig;

/// One reply from the analytics agent endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReply {
    #[serde(default)]
    pub text_content: String,
    #[serde(default)]
    pub chart_data: Option<Value>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl AgentReply {
    pub fn from_json_str(input: &str) -> DashResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| DashError::InvalidData(format!("failed to parse agent reply: {e}")))
    }
}

/// What the conversation shows in place of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "block", rename_all = "snake_case")]
pub enum ChartBlock {
    Rendered(RenderSpec),
    Diagnostic(ChartDiagnostic),
}

/// A presented agent turn: text plus an optional chart block.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub text: String,
    pub session_id: Option<String>,
    pub chart: Option<ChartBlock>,
    canonical: Option<CanonicalChart>,
    highlighted: Option<String>,
}

impl ChatTurn {
    #[must_use]
    pub fn canonical_chart(&self) -> Option<&CanonicalChart> {
        self.canonical.as_ref()
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    /// Click on a series: focus it, or clear focus if it was focused.
    ///
    /// Does nothing for turns without a rendered chart or for names that
    /// match no series of the chart.
    pub fn toggle_series(&mut self, presenter: &ChatPresenter, series: &str) {
        let Some(chart) = self
            .canonical
            .as_ref()
            .filter(|chart| chart.series_named(series).is_some())
        else {
            return;
        };
        self.highlighted = toggle_highlight(self.highlighted.as_deref(), series);
        self.chart = Some(ChartBlock::Rendered(
            presenter.render(chart, self.highlighted.as_deref()),
        ));
    }
}

/// Turns agent replies into conversation blocks.
#[derive(Debug, Clone)]
pub struct ChatPresenter {
    normalizer: ChartPayloadNormalizer,
    adapter: ChartRenderAdapter,
    palette: Vec<PaletteEntry>,
}

impl ChatPresenter {
    #[must_use]
    pub fn new(adapter: ChartRenderAdapter, palette: Vec<PaletteEntry>) -> Self {
        Self {
            normalizer: ChartPayloadNormalizer::new(),
            adapter,
            palette,
        }
    }

    pub fn from_config(config: &DashConfig) -> DashResult<Self> {
        Ok(Self::new(config.render_adapter()?, config.palette.clone()))
    }

    /// Presents a reply. A bad chart becomes a diagnostic block; the text is
    /// always kept.
    #[must_use]
    pub fn present_reply(&self, reply: AgentReply) -> ChatTurn {
        let mut turn = ChatTurn {
            text: reply.text_content,
            session_id: reply.session_id,
            chart: None,
            canonical: None,
            highlighted: None,
        };

        let Some(raw) = reply.chart_data.filter(|value| !value.is_null()) else {
            debug!("agent reply carries no chart");
            return turn;
        };
        match self.normalizer.normalize(RawChartPayload::from(raw)) {
            Ok(chart) => {
                turn.chart = Some(ChartBlock::Rendered(self.render(&chart, None)));
                turn.canonical = Some(chart);
            }
            Err(failure) => {
                turn.chart = Some(ChartBlock::Diagnostic(failure.diagnostic()));
            }
        }
        turn
    }

    #[must_use]
    pub fn render(&self, chart: &CanonicalChart, highlighted: Option<&str>) -> RenderSpec {
        self.adapter.present(chart, highlighted, &self.palette)
    }
}
