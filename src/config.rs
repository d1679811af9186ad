//! Runtime configuration.
//!
//! Layering is defaults, then environment, then whatever the CLI overrides.
//! Relative file names resolve against `data_dir`.

use std::path::{Path, PathBuf};

pub const ENV_DATA_DIR: &str = "FOLIO_DATA_DIR";
pub const ENV_INDEX: &str = "FOLIO_INDEX";

pub const DEFAULT_BATCH_SIZE: usize = 10_000;
pub const DEFAULT_CONTEXT_CHARS: usize = 300;
pub const DEFAULT_MAX_CONTEXTS: usize = 50;
pub const DEFAULT_PER_PAGE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Nested extraction output (`{datasets: [{dataset_number, files}]}`).
    pub full_corpus_file: String,
    /// Flat array of document records.
    pub search_corpus_file: String,
    pub index_file: PathBuf,
    pub batch_size: usize,
    pub context_chars: usize,
    pub max_contexts: usize,
    pub default_per_page: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            full_corpus_file: "corpus_full.json".to_string(),
            search_corpus_file: "corpus_search_index.json".to_string(),
            index_file: PathBuf::from("search.db"),
            batch_size: DEFAULT_BATCH_SIZE,
            context_chars: DEFAULT_CONTEXT_CHARS,
            max_contexts: DEFAULT_MAX_CONTEXTS,
            default_per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Config {
    /// Defaults overlaid with `FOLIO_DATA_DIR` / `FOLIO_INDEX`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(index) = lookup(ENV_INDEX).filter(|v| !v.is_empty()) {
            config.index_file = PathBuf::from(index);
        }
        config
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_index_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.index_file = file.into();
        self
    }

    /// Where the persistent index lives.
    pub fn index_path(&self) -> PathBuf {
        resolve(&self.data_dir, &self.index_file)
    }

    /// Corpus files in preference order: full artifact before the flat one,
    /// data directory before the working directory.
    pub fn corpus_candidates(&self) -> Vec<PathBuf> {
        let names = [&self.full_corpus_file, &self.search_corpus_file];
        let mut candidates: Vec<PathBuf> =
            names.iter().map(|name| self.data_dir.join(name)).collect();
        for name in names {
            let local = PathBuf::from(name);
            if !candidates.contains(&local) {
                candidates.push(local);
            }
        }
        candidates
    }
}

fn resolve(base: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        base.join(file)
    }
}
