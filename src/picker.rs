//! Random-with-fallback picker
//!
//! `pick` never fails: an empty candidate list yields the fixed default
//! artifact, which is what makes the whole cascade a total function.

use crate::types::{Artifact, ChartSeries, ChartType};
use rand::Rng;
use std::sync::OnceLock;

pub const DEFAULT_TITLE: &str = "Enterprise AI Adoption";

/// The artifact shown when nothing else is available
pub fn default_artifact() -> &'static Artifact {
    static DEFAULT: OnceLock<Artifact> = OnceLock::new();
    DEFAULT.get_or_init(|| Artifact {
        insight: "Enterprise AI adoption has more than tripled since 2020, and most \
                  organizations now run at least one production AI workload."
            .to_string(),
        chart_type: ChartType::Column,
        chart_data: ChartSeries {
            x: ["2020", "2021", "2022", "2023", "2024"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            y: vec![20.0, 31.0, 45.0, 58.0, 72.0],
            title: Some(DEFAULT_TITLE.to_string()),
            subtitle: Some("Share of enterprises with AI in production".to_string()),
            x_axis_label: Some("Year".to_string()),
            y_axis_label: Some("Adoption (%)".to_string()),
        },
    })
}

/// Uniformly random element of `pool`, or the default artifact when empty
pub fn pick<'a, R: Rng + ?Sized>(pool: &[&'a Artifact], rng: &mut R) -> &'a Artifact {
    if pool.is_empty() {
        tracing::warn!("empty candidate pool, using default artifact");
        return default_artifact();
    }
    pool[rng.gen_range(0..pool.len())]
}

/// `pick` over an owned pool slice
pub fn pick_from<'a, R: Rng + ?Sized>(pool: &'a [Artifact], rng: &mut R) -> &'a Artifact {
    pick(&pool.iter().collect::<Vec<_>>(), rng)
}
