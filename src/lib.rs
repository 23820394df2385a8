//! # rapid_pacsum
//!
//! Unsupervised extractive summarization by directional centrality (PacSum).
//!
//! Sentences of a document form a graph whose edge weights come from a
//! pairwise similarity matrix. Edges below a threshold are dropped, and each
//! sentence is scored by a weighted combination of the similarity it shares
//! with earlier and with later sentences. The top-scoring sentences form the
//! summary.
//!
//! ## Features
//!
//! - **Pluggable similarity**: bring precomputed matrices, any
//!   [`Embedder`], or the built-in lexical [`BagOfWordsEmbedder`]
//! - **Reproducible**: ties are broken by a seedable RNG
//! - **Tuning**: grid search over `(beta, lambda1, lambda2)` ranked by ROUGE
//!   or any other [`QualityMetric`], parallelised with Rayon
//! - **JSON interface**: [`json::summarize_json`] and [`json::tune_json`]

/// Enter a tracing span for a processing stage (no-op without `tracing`)
macro_rules! trace_stage {
    ($name:expr) => {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("pacsum_stage", stage = $name).entered();
    };
}

pub mod errors;
pub mod graph;
pub mod json;
pub mod metrics;
pub mod nlp;
pub mod similarity;
pub mod summarizer;
pub mod types;

// Re-export commonly used types
pub use errors::{PacSumError, Result};
pub use types::{Document, HyperParams, PacSumConfig, RuntimeConfig, SimilarityMatrix};

// Re-export main functionality
pub use graph::{compute_scores, DirectionalScores, Edge};
pub use metrics::{MetricReport, QualityMetric, RougeScorer, DEFAULT_RANKING_METRIC};
pub use nlp::{stopwords::StopwordFilter, tokenizer::Tokenizer};
pub use similarity::{BagOfWordsEmbedder, DotProductSimilarity, Embedder, SimilarityProvider};
pub use summarizer::extractor::{DocumentSummary, Evaluation, Extraction, PacSumExtractor};
pub use summarizer::selector::{select_tops, TopKSelector};
pub use summarizer::tuner::{HyperparamGrid, HyperparamTuner, Trial, TuningOutcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
