//! Evaluation result caching with hash-based deduplication.
//!
//! The engine itself is pure; this layer sits outside it. Entries are keyed
//! by `EvaluationConfig::fingerprint(as_of_bucket)`, so identical
//! configurations evaluated within the same time bucket share a result, and
//! nothing "now"-dependent is cached indefinitely.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::report::Evaluation;

/// File-backed cache of evaluation results, one JSON file per fingerprint.
#[derive(Clone)]
pub struct ResultCache {
    cache_dir: PathBuf,
}

impl ResultCache {
    /// Creates a new cache rooted at `cache_dir` (created if missing).
    pub fn new(cache_dir: impl AsRef<Path>) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;
        Ok(Self { cache_dir })
    }

    /// Whether a result exists for the given fingerprint.
    pub fn contains(&self, fingerprint: &str) -> bool {
        self.entry_path(fingerprint).exists()
    }

    /// Retrieve a cached evaluation, `None` on miss.
    pub fn get(&self, fingerprint: &str) -> Result<Option<Evaluation>> {
        let path = self.entry_path(fingerprint);
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&path).context("Failed to read cached evaluation")?;
        let evaluation: Evaluation =
            serde_json::from_str(&json).context("Failed to deserialize cached evaluation")?;
        Ok(Some(evaluation))
    }

    /// Store an evaluation under its fingerprint.
    pub fn put(&self, fingerprint: &str, evaluation: &Evaluation) -> Result<()> {
        let path = self.entry_path(fingerprint);
        let json =
            serde_json::to_string_pretty(evaluation).context("Failed to serialize evaluation")?;
        std::fs::write(&path, json).context("Failed to write cached evaluation")?;
        Ok(())
    }

    /// Remove one entry if present.
    pub fn remove(&self, fingerprint: &str) -> Result<()> {
        let path = self.entry_path(fingerprint);
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove cached evaluation")?;
        }
        Ok(())
    }

    /// Remove every cached entry.
    pub fn clear(&self) -> Result<()> {
        for entry in std::fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
                std::fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    /// Number of cached entries.
    pub fn len(&self) -> Result<usize> {
        let count = std::fs::read_dir(&self.cache_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.path().is_file()
                    && entry.path().extension().and_then(|s| s.to_str()) == Some("json")
            })
            .count();
        Ok(count)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn entry_path(&self, fingerprint: &str) -> PathBuf {
        self.cache_dir.join(format!("{fingerprint}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvaluationConfig;
    use crate::report::{evaluate, EvaluationInputs};
    use phasegate_core::prices::PriceBook;

    fn sample_evaluation() -> Evaluation {
        let inputs = EvaluationInputs {
            trades: &[],
            prices: &PriceBook::new(),
            balance_snapshots: &[],
            runs: &[],
        };
        evaluate(
            &inputs,
            &EvaluationConfig::default(),
            "2026-02-09T12:00:00".parse().unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn put_then_get_roundtrips() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(temp_dir.path()).unwrap();
        let evaluation = sample_evaluation();
        let key = evaluation.config.fingerprint("2026-02-09#144");

        assert!(!cache.contains(&key));
        assert!(cache.get(&key).unwrap().is_none());

        cache.put(&key, &evaluation).unwrap();

        assert!(cache.contains(&key));
        let cached = cache.get(&key).unwrap().unwrap();
        assert_eq!(cached, evaluation);
    }

    #[test]
    fn remove_deletes_entry() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(temp_dir.path()).unwrap();
        let evaluation = sample_evaluation();

        cache.put("abc123", &evaluation).unwrap();
        assert!(cache.contains("abc123"));

        cache.remove("abc123").unwrap();
        assert!(!cache.contains("abc123"));
    }

    #[test]
    fn clear_empties_cache() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(temp_dir.path()).unwrap();
        let evaluation = sample_evaluation();

        for i in 0..4 {
            cache.put(&format!("entry_{i}"), &evaluation).unwrap();
        }
        assert_eq!(cache.len().unwrap(), 4);

        cache.clear().unwrap();
        assert!(cache.is_empty().unwrap());
    }
}
