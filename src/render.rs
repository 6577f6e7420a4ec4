//! Chart Configuration Builder
//!
//! Turns an artifact's abstract chart (type + x/y series) into the themed,
//! chart-type-specific configuration the charting surface consumes.
//! Pure: a fresh `RenderConfig` per call, nothing cached.

use crate::types::{Artifact, ChartSeries, ChartType};
use serde::Serialize;

const PADDING: u32 = 20;
const BACKGROUND: &str = "#ffffff";
const TEXT_COLOR: &str = "#1f2937";
const MUTED_TEXT_COLOR: &str = "#6b7280";
const DONUT_INNER_RADIUS_RATIO: f64 = 0.6;
const STROKE_DARKEN: f64 = 0.8;

const CATEGORY_KEY: &str = "category";
const VALUE_KEY: &str = "value";

// ============================================================================
// PALETTES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteName {
    Cool,
    Forest,
    Vibrant,
    Warm,
    Default,
}

/// Ordered fill colors for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: PaletteName,
    pub fills: &'static [&'static str],
}

const COOL: &[&str] = &[
    "#1e3a8a", "#1d4ed8", "#3b82f6", "#0891b2", "#06b6d4", "#67e8f9", "#6366f1",
];
const FOREST: &[&str] = &[
    "#14532d", "#15803d", "#22c55e", "#65a30d", "#84cc16", "#0f766e",
];
const VIBRANT: &[&str] = &[
    "#e11d48", "#f97316", "#facc15", "#22c55e", "#3b82f6", "#8b5cf6", "#ec4899", "#14b8a6",
];
const WARM: &[&str] = &[
    "#b91c1c", "#ea580c", "#f59e0b", "#fbbf24", "#dc2626", "#fb923c",
];
const DEFAULT: &[&str] = &[
    "#2563eb", "#16a34a", "#f59e0b", "#dc2626", "#7c3aed", "#0891b2", "#db2777", "#4b5563",
];

impl Palette {
    pub fn named(name: PaletteName) -> Self {
        let fills = match name {
            PaletteName::Cool => COOL,
            PaletteName::Forest => FOREST,
            PaletteName::Vibrant => VIBRANT,
            PaletteName::Warm => WARM,
            PaletteName::Default => DEFAULT,
        };
        Palette { name, fills }
    }

    /// Fills darkened for outlines
    pub fn strokes(&self) -> Vec<String> {
        self.fills.iter().map(|c| darken(c, STROKE_DARKEN)).collect()
    }
}

/// Theme lookup by chart type
pub fn palette_for(chart_type: ChartType) -> Palette {
    let name = match chart_type {
        ChartType::Bar | ChartType::Column => PaletteName::Cool,
        ChartType::Line | ChartType::Area => PaletteName::Forest,
        ChartType::Pie | ChartType::Donut => PaletteName::Vibrant,
        ChartType::Radar => PaletteName::Warm,
        ChartType::Scatter => PaletteName::Default,
    };
    Palette::named(name)
}

/// Scale each channel of a `#rrggbb` color; anything unparseable is returned as-is
fn darken(hex: &str, factor: f64) -> String {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 {
        return hex.to_string();
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => {
            let scale = |c: u8| (c as f64 * factor).round() as u8;
            format!("#{:02x}{:02x}{:02x}", scale(r), scale(g), scale(b))
        }
        _ => hex.to_string(),
    }
}

// ============================================================================
// RENDER CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub title: Caption,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<Caption>,
    pub background: Background,
    pub padding: Padding,
    pub theme: Theme,
    pub legend: Legend,
    pub data: Vec<Datum>,
    pub series: Vec<Series>,
    /// Empty for pie, donut and radar
    pub axes: Vec<Axis>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Caption {
    pub enabled: bool,
    pub text: String,
    pub font_size: u32,
    pub font_weight: FontWeight,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Background {
    pub fill: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Padding {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Theme {
    pub palette: PaletteName,
    pub fills: Vec<String>,
    pub strokes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Left,
    Right,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Legend {
    pub enabled: bool,
    pub position: Position,
}

/// One row of chart data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Datum {
    pub category: DatumKey,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DatumKey {
    Number(f64),
    Label(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarDirection {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Series {
    #[serde(rename_all = "camelCase")]
    Bar {
        direction: BarDirection,
        x_key: String,
        y_key: String,
        x_name: String,
        y_name: String,
    },
    #[serde(rename_all = "camelCase")]
    Line {
        x_key: String,
        y_key: String,
        x_name: String,
        y_name: String,
        marker: bool,
    },
    #[serde(rename_all = "camelCase")]
    Area {
        x_key: String,
        y_key: String,
        x_name: String,
        y_name: String,
        fill_opacity: f64,
    },
    #[serde(rename_all = "camelCase")]
    Scatter {
        x_key: String,
        y_key: String,
        x_name: String,
        y_name: String,
    },
    #[serde(rename_all = "camelCase")]
    Pie {
        angle_key: String,
        callout_label_key: String,
        sector_label_key: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        inner_radius_ratio: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    RadarLine {
        angle_key: String,
        radius_key: String,
        marker: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Category,
    Number,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    #[serde(rename = "type")]
    pub kind: AxisKind,
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Round the domain to tidy tick bounds
    pub nice: bool,
}

impl Axis {
    fn category(position: Position, title: Option<String>) -> Self {
        Axis {
            kind: AxisKind::Category,
            position,
            title,
            nice: false,
        }
    }

    fn number(position: Position, title: Option<String>) -> Self {
        Axis {
            kind: AxisKind::Number,
            position,
            title,
            nice: true,
        }
    }
}

impl RenderConfig {
    pub fn has_axes(&self) -> bool {
        !self.axes.is_empty()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Build the render configuration for an artifact
pub fn build_config(artifact: &Artifact) -> RenderConfig {
    build(artifact.chart_type, &artifact.chart_data)
}

/// Build from a chart-type name; unknown names render as column charts
pub fn build_for_name(chart_type: &str, data: &ChartSeries) -> RenderConfig {
    build(ChartType::parse_lossy(chart_type), data)
}

pub fn build(chart_type: ChartType, data: &ChartSeries) -> RenderConfig {
    let palette = palette_for(chart_type);
    let legend_enabled = chart_type.is_polar();
    let (series, axes) = series_and_axes(chart_type, data);

    RenderConfig {
        title: Caption {
            enabled: data.title.is_some(),
            text: data.title.clone().unwrap_or_default(),
            font_size: 18,
            font_weight: FontWeight::Bold,
            color: TEXT_COLOR.to_string(),
        },
        subtitle: data.subtitle.as_ref().map(|text| Caption {
            enabled: true,
            text: text.clone(),
            font_size: 13,
            font_weight: FontWeight::Normal,
            color: MUTED_TEXT_COLOR.to_string(),
        }),
        background: Background {
            fill: BACKGROUND.to_string(),
        },
        padding: Padding {
            top: PADDING,
            right: PADDING,
            bottom: PADDING,
            left: PADDING,
        },
        theme: Theme {
            palette: palette.name,
            fills: palette.fills.iter().map(|c| c.to_string()).collect(),
            strokes: palette.strokes(),
        },
        legend: Legend {
            enabled: legend_enabled,
            position: if legend_enabled {
                Position::Bottom
            } else {
                Position::Right
            },
        },
        data: rows(chart_type, data),
        series: vec![series],
        axes,
    }
}

fn rows(chart_type: ChartType, data: &ChartSeries) -> Vec<Datum> {
    if !data.is_aligned() {
        tracing::warn!(
            x = data.x.len(),
            y = data.y.len(),
            "chart series misaligned, extra points dropped"
        );
    }
    data.points()
        .map(|(x, y)| {
            let category = match chart_type {
                ChartType::Scatter => x
                    .trim()
                    .parse::<f64>()
                    .map(DatumKey::Number)
                    .unwrap_or_else(|_| DatumKey::Label(x.to_string())),
                _ => DatumKey::Label(x.to_string()),
            };
            Datum { category, value: y }
        })
        .collect()
}

fn series_and_axes(chart_type: ChartType, data: &ChartSeries) -> (Series, Vec<Axis>) {
    let x_name = data.x_axis_label.clone().unwrap_or_else(|| "Category".to_string());
    let y_name = data.y_axis_label.clone().unwrap_or_else(|| "Value".to_string());
    let x_title = data.x_axis_label.clone();
    let y_title = data.y_axis_label.clone();
    let x_key = CATEGORY_KEY.to_string();
    let y_key = VALUE_KEY.to_string();

    match chart_type {
        ChartType::Bar => (
            Series::Bar {
                direction: BarDirection::Horizontal,
                x_key,
                y_key,
                x_name,
                y_name,
            },
            vec![
                Axis::category(Position::Left, x_title),
                Axis::number(Position::Bottom, y_title),
            ],
        ),
        ChartType::Column => (
            Series::Bar {
                direction: BarDirection::Vertical,
                x_key,
                y_key,
                x_name,
                y_name,
            },
            column_axes(x_title, y_title),
        ),
        ChartType::Line => (
            Series::Line {
                x_key,
                y_key,
                x_name,
                y_name,
                marker: true,
            },
            column_axes(x_title, y_title),
        ),
        ChartType::Area => (
            Series::Area {
                x_key,
                y_key,
                x_name,
                y_name,
                fill_opacity: 0.7,
            },
            column_axes(x_title, y_title),
        ),
        ChartType::Scatter => (
            Series::Scatter {
                x_key,
                y_key,
                x_name,
                y_name,
            },
            vec![
                Axis::number(Position::Bottom, x_title),
                Axis::number(Position::Left, y_title),
            ],
        ),
        ChartType::Pie => (pie(None), Vec::new()),
        ChartType::Donut => (pie(Some(DONUT_INNER_RADIUS_RATIO)), Vec::new()),
        ChartType::Radar => (
            Series::RadarLine {
                angle_key: CATEGORY_KEY.to_string(),
                radius_key: VALUE_KEY.to_string(),
                marker: true,
            },
            Vec::new(),
        ),
    }
}

fn column_axes(x_title: Option<String>, y_title: Option<String>) -> Vec<Axis> {
    vec![
        Axis::category(Position::Bottom, x_title),
        Axis::number(Position::Left, y_title),
    ]
}

fn pie(inner_radius_ratio: Option<f64>) -> Series {
    Series::Pie {
        angle_key: VALUE_KEY.to_string(),
        callout_label_key: CATEGORY_KEY.to_string(),
        sector_label_key: VALUE_KEY.to_string(),
        inner_radius_ratio,
    }
}
