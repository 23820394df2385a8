//! Summary quality metrics
//!
//! The extractor and tuner judge candidate summaries through the
//! [`QualityMetric`] trait. A metric returns a [`MetricReport`] of named
//! scalar scores; the tuner ranks configurations by one of those names.

pub mod rouge;

pub use rouge::RougeScorer;

use crate::errors::{PacSumError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default key used to rank tuning configurations
pub const DEFAULT_RANKING_METRIC: &str = "rouge_1_f_score";

/// Named scalar scores produced by a [`QualityMetric`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricReport {
    scores: BTreeMap<String, f64>,
}

impl MetricReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a score, replacing any previous value for `key`
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.scores.insert(key.into(), value);
    }

    /// Look up a score
    pub fn get(&self, key: &str) -> Option<f64> {
        self.scores.get(key).copied()
    }

    /// Look up a score that must be present
    pub fn require(&self, key: &str) -> Result<f64> {
        self.get(key).ok_or_else(|| {
            PacSumError::metric(format!(
                "metric report has no '{}' (available: {})",
                key,
                self.scores.keys().cloned().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    /// Iterate over `(key, score)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl FromIterator<(String, f64)> for MetricReport {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

/// Scores a batch of candidate summaries against their references
///
/// # Contract
///
/// - `candidates[i]` is the summary (a list of sentences) for document `i`.
/// - `references[i]` holds one or more reference summaries for document `i`.
/// - Empty candidate summaries must be scored, not rejected.
pub trait QualityMetric {
    fn score(
        &self,
        candidates: &[Vec<String>],
        references: &[Vec<Vec<String>>],
    ) -> Result<MetricReport>;
}

impl<T: QualityMetric + ?Sized> QualityMetric for &T {
    fn score(
        &self,
        candidates: &[Vec<String>],
        references: &[Vec<Vec<String>>],
    ) -> Result<MetricReport> {
        (**self).score(candidates, references)
    }
}
