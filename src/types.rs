//! Core types for the visualization content engine
//!
//! Everything here is plain data:
//! - `ContextPayload` comes in from the qualification UI
//! - `Artifact` is one pre-authored insight + chart from the corpus
//! - `ExportTable` goes out to the CSV/PNG/PDF exporters

use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Sales context used to pick an insight. Every field is optional free text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContextPayload {
    pub industry: Option<String>,
    pub cloud_provider: Option<String>,
    pub company: Option<String>,
    pub topic: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub technologies: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub pain_points: Vec<String>,
}

/// `null` lists count as empty, same as a missing key
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ContextPayload {
    /// Lower-cased industry, or None when absent or blank
    pub fn industry_text(&self) -> Option<String> {
        normalized(self.industry.as_deref())
    }

    pub fn cloud_text(&self) -> Option<String> {
        normalized(self.cloud_provider.as_deref())
    }

    pub fn company_text(&self) -> Option<String> {
        normalized(self.company.as_deref())
    }

    pub fn topic_text(&self) -> Option<String> {
        normalized(self.topic.as_deref())
    }

    /// Lower-cased non-blank technologies, in caller order
    pub fn technology_texts(&self) -> Vec<String> {
        self.technologies.iter().filter_map(|t| normalized(Some(t.as_str()))).collect()
    }

    pub fn pain_point_texts(&self) -> Vec<String> {
        self.pain_points.iter().filter_map(|p| normalized(Some(p.as_str()))).collect()
    }

    /// True when no field carries a usable signal
    pub fn is_empty(&self) -> bool {
        self.industry_text().is_none()
            && self.cloud_text().is_none()
            && self.company_text().is_none()
            && self.topic_text().is_none()
            && self.technology_texts().is_empty()
            && self.pain_point_texts().is_empty()
    }
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

/// The eight chart shapes the rendering surface supports.
///
/// Corpus entries that describe richer charts (waterfall, sankey, ...) are
/// stored as one of these shapes; unknown names are mapped on parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ChartType {
    Bar,
    Column,
    Line,
    Area,
    Pie,
    Donut,
    Radar,
    Scatter,
}

impl ChartType {
    pub const ALL: [ChartType; 8] = [
        ChartType::Bar,
        ChartType::Column,
        ChartType::Line,
        ChartType::Area,
        ChartType::Pie,
        ChartType::Donut,
        ChartType::Radar,
        ChartType::Scatter,
    ];

    /// Exact, case-insensitive match on one of the eight supported names
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "bar" => Some(ChartType::Bar),
            "column" => Some(ChartType::Column),
            "line" => Some(ChartType::Line),
            "area" => Some(ChartType::Area),
            "pie" => Some(ChartType::Pie),
            "donut" | "doughnut" => Some(ChartType::Donut),
            "radar" => Some(ChartType::Radar),
            "scatter" => Some(ChartType::Scatter),
            _ => None,
        }
    }

    /// Map any chart name onto a supported shape. Never fails; unknown names become Column.
    pub fn parse_lossy(name: &str) -> Self {
        if let Some(chart_type) = Self::from_name(name) {
            return chart_type;
        }
        match name.trim().to_lowercase().as_str() {
            "waterfall" | "heatmap" | "histogram" | "boxplot" => ChartType::Column,
            "sankey" | "funnel" => ChartType::Bar,
            "treemap" => ChartType::Pie,
            "gauge" => ChartType::Donut,
            "bubble" => ChartType::Scatter,
            "polar" => ChartType::Radar,
            other => {
                tracing::warn!(chart_type = other, "unknown chart type, rendering as column");
                ChartType::Column
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Column => "column",
            ChartType::Line => "line",
            ChartType::Area => "area",
            ChartType::Pie => "pie",
            ChartType::Donut => "donut",
            ChartType::Radar => "radar",
            ChartType::Scatter => "scatter",
        }
    }

    /// Charts drawn without category/value axes
    pub fn is_polar(&self) -> bool {
        matches!(self, ChartType::Pie | ChartType::Donut | ChartType::Radar)
    }
}

impl From<String> for ChartType {
    fn from(name: String) -> Self {
        ChartType::parse_lossy(&name)
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Abstract chart description: index-aligned labels and values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis_label: Option<String>,
}

impl ChartSeries {
    pub fn is_aligned(&self) -> bool {
        self.x.len() == self.y.len()
    }

    /// (label, value) pairs; trailing unpaired entries are dropped
    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.x.iter().map(String::as_str).zip(self.y.iter().copied())
    }
}

/// One pre-authored insight with the chart that illustrates it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub insight: String,
    pub chart_type: ChartType,
    pub chart_data: ChartSeries,
}

impl Artifact {
    pub fn title(&self) -> Option<&str> {
        self.chart_data.title.as_deref()
    }

    /// Lower-case containment test against the insight text
    pub fn insight_mentions(&self, keywords: &[&str]) -> bool {
        let text = self.insight.to_lowercase();
        keywords.iter().any(|k| text.contains(k))
    }

    /// SHA-256 of the canonical JSON form. Structurally equal artifacts hash equal.
    pub fn content_hash(&self) -> String {
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        hex::encode(hasher.finalize())
    }

    /// Plain rows for the export collaborators
    pub fn export_table(&self) -> ExportTable {
        let data = &self.chart_data;
        ExportTable {
            title: data.title.clone().unwrap_or_default(),
            x_label: data.x_axis_label.clone().unwrap_or_else(|| "Category".to_string()),
            y_label: data.y_axis_label.clone().unwrap_or_else(|| "Value".to_string()),
            rows: data.points().map(|(x, y)| (x.to_string(), y)).collect(),
        }
    }
}

/// Chart data flattened for CSV/PNG/PDF exporters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTable {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub rows: Vec<(String, f64)>,
}
