//! sales-insights - Visualization Content Engine
//!
//! Picks the most relevant pre-authored insight + chart for a sales context
//! and turns its abstract chart into a themed render configuration.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sales_insights::{ContextPayload, InsightEngine, build_config};
//!
//! let engine = InsightEngine::builtin();
//! let payload = ContextPayload {
//!     industry: Some("Healthcare".into()),
//!     pain_points: vec!["rising cloud cost".into()],
//!     ..Default::default()
//! };
//!
//! let selection = engine.select_random(&payload);
//! let config = build_config(selection.artifact);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ContextPayload
//!      │
//!      ▼
//! ┌──────────────────┐   pool lookups   ┌──────────────┐
//! │  Match Cascade   │ ───────────────▶ │    Corpus    │
//! │  (cascade.rs)    │                  │ (corpus.rs)  │
//! └────────┬─────────┘                  └──────────────┘
//!          │ candidates
//!          ▼
//! ┌──────────────────┐
//! │ Picker           │ ── empty ──▶ default artifact
//! └────────┬─────────┘
//!          │ Artifact
//!          ▼
//! ┌──────────────────┐
//! │ Config Builder   │ ──▶ RenderConfig (charting surface)
//! │ (render.rs)      │
//! └──────────────────┘
//! ```
//!
//! Everything is synchronous and pure over a read-only corpus; share the
//! engine freely across threads.

pub mod cascade;
pub mod config;
pub mod convenience;
pub mod corpus;
pub mod picker;
pub mod render;
pub mod rules;
pub mod types;

// Core types
pub use types::*;

// Selection
pub use cascade::{Candidates, InsightEngine, Selection, Stage};
pub use corpus::{Corpus, Pool, PoolGroup};
pub use picker::{default_artifact, pick};

// Rendering
pub use render::{build_config, palette_for, Palette, PaletteName, RenderConfig};

// Configuration
pub use config::{CorpusSource, EngineConfig};

// Convenience API
pub use convenience::{visualize, Visualization};
