//! JSON interface for batch summarization and tuning
//!
//! Requests carry pre-split sentences and, optionally, precomputed
//! similarity matrices. Documents without a matrix are scored with the
//! lexical bag-of-words provider; evaluation uses ROUGE.
//!
//! ```json
//! {
//!   "documents": [
//!     { "article": ["..."], "reference": ["..."], "similarity": [[1.0, 0.2], [0.2, 1.0]] }
//!   ],
//!   "config": { "extract_num": 3, "beta": 0.4, "lambda1": 0.6, "lambda2": 0.4, "seed": 7 },
//!   "sample_limit": 100
//! }
//! ```

use crate::errors::Result;
use crate::metrics::{MetricReport, RougeScorer, DEFAULT_RANKING_METRIC};
use crate::similarity::{BagOfWordsEmbedder, DotProductSimilarity};
use crate::summarizer::extractor::{DocumentSummary, PacSumExtractor};
use crate::summarizer::tuner::{HyperparamTuner, Trial, DEFAULT_SAMPLE_LIMIT};
use crate::types::{Document, HyperParams, PacSumConfig};
use serde::{Deserialize, Serialize};

/// Batch request
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRequest {
    pub documents: Vec<Document>,
    #[serde(default)]
    pub config: PacSumConfig,
    /// Stopword language for the lexical provider
    #[serde(default = "default_language")]
    pub language: String,
    /// Documents swept when tuning
    #[serde(default = "default_sample_limit")]
    pub sample_limit: usize,
    /// Metric key ranking tuning configurations
    #[serde(default = "default_ranking_metric")]
    pub ranking_metric: String,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_sample_limit() -> usize {
    DEFAULT_SAMPLE_LIMIT
}

fn default_ranking_metric() -> String {
    DEFAULT_RANKING_METRIC.to_string()
}

/// Output of [`summarize_json`]
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummaryResult {
    pub summaries: Vec<DocumentSummary>,
    pub metrics: MetricReport,
}

/// Output of [`tune_json`]
#[derive(Debug, Clone, Serialize)]
pub struct JsonTuningResult {
    pub best: HyperParams,
    pub best_score: f64,
    pub ranking_metric: String,
    pub documents: usize,
    pub config: PacSumConfig,
    pub trials: Vec<Trial>,
}

type LexicalExtractor = PacSumExtractor<DotProductSimilarity<BagOfWordsEmbedder>>;

fn build_extractor(request: &JsonRequest) -> Result<LexicalExtractor> {
    let provider = DotProductSimilarity::new(BagOfWordsEmbedder::new(&request.language));
    PacSumExtractor::new(provider, request.config.clone())
}

/// Summarize and evaluate every document in a JSON request
pub fn summarize_json(input: &str) -> Result<String> {
    let request: JsonRequest = serde_json::from_str(input)?;
    let extractor = build_extractor(&request)?;

    let evaluation =
        extractor.extract_summary(&request.documents, &RougeScorer::new(), &mut extractor.rng())?;

    let result = JsonSummaryResult {
        summaries: evaluation.extraction.summaries,
        metrics: evaluation.report,
    };
    Ok(serde_json::to_string(&result)?)
}

/// Tune hyperparameters over the documents in a JSON request
pub fn tune_json(input: &str) -> Result<String> {
    let request: JsonRequest = serde_json::from_str(input)?;
    let extractor = build_extractor(&request)?;

    let outcome = HyperparamTuner::new()
        .with_sample_limit(request.sample_limit)
        .with_ranking_metric(request.ranking_metric.clone())
        .tune(
            &extractor,
            &request.documents,
            &RougeScorer::new(),
            &mut extractor.rng(),
        )?;

    let result = JsonTuningResult {
        best: outcome.best,
        best_score: outcome.best_score,
        ranking_metric: request.ranking_metric,
        documents: outcome.documents,
        config: outcome.config,
        trials: outcome.trials,
    };
    Ok(serde_json::to_string(&result)?)
}
