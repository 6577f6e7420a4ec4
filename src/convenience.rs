//! One-call API for the qualification UI
//!
//! `visualize()` runs the cascade over the builtin corpus and returns
//! everything the UI needs for one insight card: the text, the render
//! config, the export rows, and a content hash for saving.
//!
//! ```rust,ignore
//! let payload = ContextPayload {
//!     industry: Some("Healthcare".into()),
//!     ..Default::default()
//! };
//! let card = sales_insights::visualize(&payload);
//! println!("{}", card.insight);
//! ```

use crate::cascade::{InsightEngine, Selection, Stage};
use crate::render::{self, RenderConfig};
use crate::types::{ChartType, ContextPayload, ExportTable};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything produced for one payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Visualization {
    pub insight: String,
    pub chart_type: ChartType,
    pub config: RenderConfig,
    pub export: ExportTable,
    pub stage: Stage,
    pub pool: String,
    /// SHA-256 of the selected artifact; equal for structurally equal artifacts
    pub content_hash: String,
    pub generated_at: DateTime<Utc>,
}

impl Visualization {
    pub fn from_selection(selection: &Selection<'_>) -> Self {
        let artifact = selection.artifact;
        Self {
            insight: artifact.insight.clone(),
            chart_type: artifact.chart_type,
            config: render::build_config(artifact),
            export: artifact.export_table(),
            stage: selection.stage,
            pool: selection.pool.clone(),
            content_hash: artifact.content_hash(),
            generated_at: Utc::now(),
        }
    }
}

/// Select from the builtin corpus with the thread-local RNG and render
pub fn visualize(payload: &ContextPayload) -> Visualization {
    let engine = InsightEngine::builtin();
    Visualization::from_selection(&engine.select_random(payload))
}
