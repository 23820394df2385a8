//! Grid search over (beta, lambda1, lambda2)
//!
//! For every document in the sample the similarity matrix is computed once
//! and the selector runs once per grid point. The i-th summaries of all
//! documents form one batch per grid point; each batch is scored by the
//! quality metric and the grid point with the highest ranking score wins.
//!
//! Document sweeps run on a Rayon pool scoped by the extractor's
//! [`RuntimeConfig`](crate::types::RuntimeConfig). Each document shuffles
//! with its own RNG seeded from the caller's RNG before the parallel
//! section, so results do not depend on scheduling.

use super::extractor::PacSumExtractor;
use crate::errors::{PacSumError, Result};
use crate::metrics::{QualityMetric, DEFAULT_RANKING_METRIC};
use crate::similarity::SimilarityProvider;
use crate::types::{Document, HyperParams, PacSumConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Default number of documents swept
pub const DEFAULT_SAMPLE_LIMIT: usize = 1000;

/// The hyperparameter grid
///
/// beta takes `beta_steps + 1` evenly spaced values in `[0, 1]`; for each,
/// lambda1 takes `lambda_steps + 1` values in `[0, 1]` with
/// `lambda2 = 1 - lambda1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HyperparamGrid {
    pub beta_steps: usize,
    pub lambda_steps: usize,
}

impl Default for HyperparamGrid {
    fn default() -> Self {
        Self {
            beta_steps: 10,
            lambda_steps: 10,
        }
    }
}

impl HyperparamGrid {
    /// Every grid point, beta-major
    pub fn configurations(&self) -> Vec<HyperParams> {
        let mut configurations = Vec::with_capacity(self.len());
        for k in 0..=self.beta_steps {
            let beta = k as f64 / self.beta_steps.max(1) as f64;
            for i in 0..=self.lambda_steps {
                let lambda1 = i as f64 / self.lambda_steps.max(1) as f64;
                configurations.push(HyperParams::new(beta, lambda1, 1.0 - lambda1));
            }
        }
        configurations
    }

    /// Number of grid points
    pub fn len(&self) -> usize {
        (self.beta_steps + 1) * (self.lambda_steps + 1)
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Score of one grid point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trial {
    pub params: HyperParams,
    pub score: f64,
}

/// Result of a grid search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TuningOutcome {
    /// Best grid point (earliest in grid order on ties)
    pub best: HyperParams,
    /// Its ranking score
    pub best_score: f64,
    /// The extractor's configuration with `best` applied
    pub config: PacSumConfig,
    /// Number of documents swept
    pub documents: usize,
    /// Every grid point with its score, in grid order
    pub trials: Vec<Trial>,
}

/// Hyperparameter grid search driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperparamTuner {
    pub grid: HyperparamGrid,
    /// Maximum number of documents swept, taken from the front
    pub sample_limit: usize,
    /// Metric report key used to rank grid points
    pub ranking_metric: String,
}

impl Default for HyperparamTuner {
    fn default() -> Self {
        Self {
            grid: HyperparamGrid::default(),
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            ranking_metric: DEFAULT_RANKING_METRIC.to_string(),
        }
    }
}

impl HyperparamTuner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the document sample limit
    pub fn with_sample_limit(mut self, sample_limit: usize) -> Self {
        self.sample_limit = sample_limit;
        self
    }

    /// Builder method: set the grid
    pub fn with_grid(mut self, grid: HyperparamGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Builder method: set the ranking metric key
    pub fn with_ranking_metric(mut self, key: impl Into<String>) -> Self {
        self.ranking_metric = key.into();
        self
    }

    /// Sweep the grid over the first `sample_limit` documents
    pub fn tune<P, M, R>(
        &self,
        extractor: &PacSumExtractor<P>,
        documents: &[Document],
        metric: &M,
        rng: &mut R,
    ) -> Result<TuningOutcome>
    where
        P: SimilarityProvider + Sync,
        M: QualityMetric,
        R: Rng + ?Sized,
    {
        trace_stage!("tune");

        if self.sample_limit == 0 {
            return Err(PacSumError::invalid_input("sample_limit must be > 0"));
        }
        if documents.is_empty() {
            return Err(PacSumError::invalid_input("no documents to tune on"));
        }

        let sample = &documents[..documents.len().min(self.sample_limit)];
        let configurations = self.grid.configurations();
        let seeds: Vec<u64> = sample.iter().map(|_| rng.gen()).collect();

        let sweeps = extractor.config().runtime.scoped(|| {
            sample
                .par_iter()
                .zip(seeds.par_iter())
                .map(|(document, &seed)| {
                    sweep_document(extractor, document, &configurations, seed)
                })
                .collect::<Result<Vec<_>>>()
        })??;

        let references: Vec<Vec<Vec<String>>> = sample
            .iter()
            .map(|document| vec![document.reference.clone()])
            .collect();

        let mut trials = Vec::with_capacity(configurations.len());
        let mut best: Option<Trial> = None;

        for (c, params) in configurations.iter().enumerate() {
            let batch: Vec<Vec<String>> = sweeps.iter().map(|sweep| sweep[c].clone()).collect();
            let score = metric
                .score(&batch, &references)?
                .require(&self.ranking_metric)?;
            if score.is_nan() {
                return Err(PacSumError::metric(format!(
                    "'{}' is NaN for {}",
                    self.ranking_metric, params
                )));
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(params = %params, score, "scored configuration");

            let trial = Trial {
                params: *params,
                score,
            };
            if best.map_or(true, |b| score > b.score) {
                best = Some(trial);
            }
            trials.push(trial);
        }

        let best = best.ok_or_else(|| PacSumError::invalid_input("hyperparameter grid is empty"))?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            best = %best.params,
            score = best.score,
            metric = %self.ranking_metric,
            documents = sample.len(),
            "tuning finished"
        );

        Ok(TuningOutcome {
            best: best.params,
            best_score: best.score,
            config: extractor.config().clone().with_params(best.params),
            documents: sample.len(),
            trials,
        })
    }
}

/// One summary per grid point for a single document
fn sweep_document<P: SimilarityProvider>(
    extractor: &PacSumExtractor<P>,
    document: &Document,
    configurations: &[HyperParams],
    seed: u64,
) -> Result<Vec<Vec<String>>> {
    document.validate()?;
    let extract_num = extractor.config().extract_num;
    if !document.needs_extraction(extract_num) {
        return Ok(vec![document.article.clone(); configurations.len()]);
    }

    let matrix = extractor.similarity_matrix(document)?;
    let selector = extractor.selector()?;
    let mut rng = StdRng::seed_from_u64(seed);

    Ok(configurations
        .iter()
        .map(|params| {
            selector
                .with_params(*params)
                .select(&matrix, &mut rng)
                .into_iter()
                .map(|i| document.article[i].clone())
                .collect()
        })
        .collect())
}
