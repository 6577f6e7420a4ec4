//! Template Corpus: named pools of pre-authored insight + chart artifacts
//!
//! The corpus is content, not logic. The builtin copy lives in
//! `data/corpus.json`, is parsed once, and is read-only afterwards, so any
//! number of callers can share it by reference.
//!
//! Asset layout: `{ "<group>": { "<pool>": [Artifact, ...] } }`.
//! Directory layout (for `from_dir`): `<root>/<group>/<pool>.json`, each file a
//! JSON array of artifacts.

use crate::types::Artifact;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

const BUILTIN_CORPUS: &str = include_str!("../data/corpus.json");

/// Category a pool belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolGroup {
    Industry,
    Cloud,
    Tool,
    Topic,
    Generic,
    Advanced,
}

impl PoolGroup {
    pub const ALL: [PoolGroup; 6] = [
        PoolGroup::Industry,
        PoolGroup::Cloud,
        PoolGroup::Tool,
        PoolGroup::Topic,
        PoolGroup::Generic,
        PoolGroup::Advanced,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "industry" => Some(PoolGroup::Industry),
            "cloud" => Some(PoolGroup::Cloud),
            "tool" => Some(PoolGroup::Tool),
            "topic" => Some(PoolGroup::Topic),
            "generic" => Some(PoolGroup::Generic),
            "advanced" => Some(PoolGroup::Advanced),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PoolGroup::Industry => "industry",
            PoolGroup::Cloud => "cloud",
            PoolGroup::Tool => "tool",
            PoolGroup::Topic => "topic",
            PoolGroup::Generic => "generic",
            PoolGroup::Advanced => "advanced",
        }
    }
}

/// A named list of artifacts. Identity inside a pool is positional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub name: String,
    pub group: PoolGroup,
    pub artifacts: Vec<Artifact>,
}

/// All pools, keyed by lower-case name
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pools: BTreeMap<String, Pool>,
}

type CorpusFile = BTreeMap<PoolGroup, BTreeMap<String, Vec<Artifact>>>;

impl Corpus {
    /// The embedded corpus, parsed on first use.
    ///
    /// A broken embedded asset degrades to an empty corpus (every selection
    /// then yields the default artifact) rather than failing callers.
    pub fn builtin() -> &'static Corpus {
        static BUILTIN: OnceLock<Corpus> = OnceLock::new();
        BUILTIN.get_or_init(|| match Corpus::from_json(BUILTIN_CORPUS) {
            Ok(corpus) => {
                tracing::info!(
                    pools = corpus.len(),
                    artifacts = corpus.artifact_count(),
                    "builtin corpus loaded"
                );
                corpus
            }
            Err(e) => {
                tracing::error!("builtin corpus failed to load: {:#}", e);
                Corpus::default()
            }
        })
    }

    /// Parse a corpus from the grouped JSON layout
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CorpusFile = serde_json::from_str(json).context("Invalid corpus JSON")?;
        let mut corpus = Corpus::default();
        for (group, pools) in file {
            for (name, artifacts) in pools {
                corpus.insert(group, &name, artifacts)?;
            }
        }
        Ok(corpus)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read corpus file {:?}", path))?;
        let corpus =
            Self::from_json(&json).with_context(|| format!("Failed to load corpus {:?}", path))?;
        tracing::info!(path = ?path, pools = corpus.len(), "corpus loaded from file");
        Ok(corpus)
    }

    /// Load `<root>/<group>/<pool>.json` files. Files outside a known group directory are skipped.
    pub fn from_dir(root: &Path) -> Result<Self> {
        let mut corpus = Corpus::default();

        for entry in walkdir::WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
        {
            let path = entry.path();
            let group = path
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .and_then(PoolGroup::from_name);
            let Some(group) = group else {
                tracing::warn!(path = ?path, "skipping corpus file outside a pool group directory");
                continue;
            };
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read pool file {:?}", path))?;
            let artifacts: Vec<Artifact> = serde_json::from_str(&json)
                .with_context(|| format!("Invalid pool file {:?}", path))?;
            corpus.insert(group, name, artifacts)?;
        }

        tracing::info!(root = ?root, pools = corpus.len(), "corpus loaded from directory");
        Ok(corpus)
    }

    /// Build a corpus from in-memory pools
    pub fn from_pools<I, S>(pools: I) -> Result<Self>
    where
        I: IntoIterator<Item = (PoolGroup, S, Vec<Artifact>)>,
        S: AsRef<str>,
    {
        let mut corpus = Corpus::default();
        for (group, name, artifacts) in pools {
            corpus.insert(group, name.as_ref(), artifacts)?;
        }
        Ok(corpus)
    }

    /// Register a pool. Names are unique across groups and every artifact must be aligned.
    pub fn insert(&mut self, group: PoolGroup, name: &str, artifacts: Vec<Artifact>) -> Result<()> {
        let key = name.trim().to_lowercase();
        if key.is_empty() {
            bail!("Pool name must not be empty");
        }
        if let Some(existing) = self.pools.get(&key) {
            bail!(
                "Duplicate pool '{}' (already registered under '{}')",
                key,
                existing.group.name()
            );
        }
        for (index, artifact) in artifacts.iter().enumerate() {
            validate_artifact(artifact).with_context(|| format!("Pool '{}' entry {}", key, index))?;
        }

        self.pools.insert(
            key.clone(),
            Pool {
                name: key,
                group,
                artifacts,
            },
        );
        Ok(())
    }

    /// Artifacts registered under `name`. Unknown names give an empty slice.
    pub fn pool(&self, name: &str) -> &[Artifact] {
        self.pools
            .get(&name.to_lowercase())
            .map(|p| p.artifacts.as_slice())
            .unwrap_or(&[])
    }

    pub fn group_of(&self, name: &str) -> Option<PoolGroup> {
        self.pools.get(&name.to_lowercase()).map(|p| p.group)
    }

    /// Concatenate pools in the given order, skipping unknown names
    pub fn concat(&self, names: &[&str]) -> Vec<&Artifact> {
        names.iter().flat_map(|name| self.pool(name)).collect()
    }

    /// Pool names in a group, in name order
    pub fn pool_names(&self, group: PoolGroup) -> Vec<&str> {
        self.pools
            .values()
            .filter(|p| p.group == group)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Every generic chart-type pool followed by every advanced one
    pub fn variety_pool(&self) -> Vec<&Artifact> {
        [PoolGroup::Generic, PoolGroup::Advanced]
            .iter()
            .flat_map(|group| self.pool_names(*group))
            .flat_map(|name| self.pool(name))
            .collect()
    }

    pub fn pools(&self) -> impl Iterator<Item = &Pool> {
        self.pools.values()
    }

    /// Number of pools
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn artifact_count(&self) -> usize {
        self.pools.values().map(|p| p.artifacts.len()).sum()
    }
}

fn validate_artifact(artifact: &Artifact) -> Result<()> {
    let data = &artifact.chart_data;
    if !data.is_aligned() {
        bail!(
            "x has {} labels but y has {} values",
            data.x.len(),
            data.y.len()
        );
    }
    if let Some(bad) = data.y.iter().find(|v| !v.is_finite()) {
        bail!("non-finite value {}", bad);
    }
    if artifact.insight.trim().is_empty() {
        bail!("empty insight text");
    }
    Ok(())
}
