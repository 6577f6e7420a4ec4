//! Engine configuration
//!
//! Resolution order for the corpus:
//! 1. `SALES_INSIGHTS_CORPUS` (a corpus JSON file or a pool directory)
//! 2. `corpus.json` or `corpus/` under the user data dir (`<data_dir>/sales-insights`)
//! 3. The embedded corpus
//!
//! `SALES_INSIGHTS_SEED` fixes the RNG so selections are reproducible.

use crate::corpus::Corpus;
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

pub const CORPUS_ENV: &str = "SALES_INSIGHTS_CORPUS";
pub const SEED_ENV: &str = "SALES_INSIGHTS_SEED";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorpusSource {
    #[default]
    Builtin,
    File(PathBuf),
    Dir(PathBuf),
}

impl CorpusSource {
    /// File or directory, by what is on disk
    pub fn from_path(path: &Path) -> Self {
        if path.is_dir() {
            CorpusSource::Dir(path.to_path_buf())
        } else {
            CorpusSource::File(path.to_path_buf())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub corpus: CorpusSource,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

/// Per-user data directory for corpus overrides
pub fn get_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("sales-insights"))
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        Self::resolve(
            std::env::var(CORPUS_ENV).ok(),
            std::env::var(SEED_ENV).ok(),
            get_data_dir().as_deref(),
        )
    }

    fn resolve(corpus: Option<String>, seed: Option<String>, data_dir: Option<&Path>) -> Result<Self> {
        let corpus = match corpus.filter(|c| !c.trim().is_empty()) {
            Some(path) => CorpusSource::from_path(Path::new(path.trim())),
            None => data_dir.map(user_corpus).unwrap_or_default(),
        };

        let seed = seed
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse::<u64>()
                    .with_context(|| format!("{} must be an unsigned integer, got {:?}", SEED_ENV, s))
            })
            .transpose()?;

        Ok(Self { corpus, seed })
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }

    /// The builtin corpus is borrowed; overrides are loaded fresh
    pub fn load_corpus(&self) -> Result<Cow<'static, Corpus>> {
        match &self.corpus {
            CorpusSource::Builtin => Ok(Cow::Borrowed(Corpus::builtin())),
            CorpusSource::File(path) => Corpus::from_path(path).map(Cow::Owned),
            CorpusSource::Dir(path) => Corpus::from_dir(path).map(Cow::Owned),
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn user_corpus(data_dir: &Path) -> CorpusSource {
    let file = data_dir.join("corpus.json");
    let dir = data_dir.join("corpus");
    if file.is_file() {
        CorpusSource::File(file)
    } else if dir.is_dir() {
        CorpusSource::Dir(dir)
    } else {
        CorpusSource::Builtin
    }
}
