//! Core types for rapid_pacsum
//!
//! This module defines the fundamental data structures used throughout the library:
//! the similarity matrix, hyperparameter triples, documents, and configuration.

use crate::errors::{PacSumError, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Similarity Matrix
// ============================================================================

/// A dense N×N matrix of pairwise sentence scores, stored row-major.
///
/// No symmetry is assumed: entry `(i, j)` and entry `(j, i)` are independent
/// values, and the directional engine only ever reads the upper triangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct SimilarityMatrix {
    /// Number of rows (and columns)
    size: usize,
    /// Row-major entries, `size * size` long
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Create an empty 0×0 matrix
    pub fn empty() -> Self {
        Self {
            size: 0,
            values: Vec::new(),
        }
    }

    /// Build a matrix from nested rows, rejecting non-square input
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != size) {
            return Err(PacSumError::invalid_input(format!(
                "similarity matrix must be square: row {} has {} columns, expected {}",
                i,
                row.len(),
                size
            )));
        }
        let values = rows.into_iter().flatten().collect();
        Ok(Self { size, values })
    }

    /// Build a matrix from a flat row-major buffer
    pub fn from_flat(size: usize, values: Vec<f64>) -> Result<Self> {
        if size.checked_mul(size) != Some(values.len()) {
            return Err(PacSumError::invalid_input(format!(
                "flat buffer of {} values cannot form a {}x{} matrix",
                values.len(),
                size,
                size
            )));
        }
        Ok(Self { size, values })
    }

    /// Pairwise dot products of a set of equal-length embeddings
    ///
    /// Larger values mean more similar; for L2-normalised embeddings this is
    /// cosine similarity.
    pub fn dot_product(embeddings: &[Vec<f64>]) -> Result<Self> {
        let size = embeddings.len();
        if let Some(first) = embeddings.first() {
            let dim = first.len();
            if let Some((i, bad)) = embeddings.iter().enumerate().find(|(_, e)| e.len() != dim) {
                return Err(PacSumError::invalid_input(format!(
                    "embedding {} has dimension {}, expected {}",
                    i,
                    bad.len(),
                    dim
                )));
            }
        }

        let mut values = vec![0.0; size * size];
        for i in 0..size {
            for j in i..size {
                let dot: f64 = embeddings[i]
                    .iter()
                    .zip(&embeddings[j])
                    .map(|(a, b)| a * b)
                    .sum();
                values[i * size + j] = dot;
                values[j * size + i] = dot;
            }
        }
        Ok(Self { size, values })
    }

    /// Number of rows (equivalently, sentences)
    pub fn len(&self) -> usize {
        self.size
    }

    /// Check if the matrix has no rows
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Entry at row `i`, column `j`
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.size && j < self.size, "index ({i}, {j}) out of bounds");
        self.values[i * self.size + j]
    }

    /// Borrow row `i`
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }

    /// Global minimum and maximum over every entry (diagonal included)
    ///
    /// Returns `None` for an empty matrix.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        if self.values.is_empty() {
            return None;
        }
        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    /// A copy with `delta` subtracted from every entry
    pub fn shifted(&self, delta: f64) -> Self {
        Self {
            size: self.size,
            values: self.values.iter().map(|v| v - delta).collect(),
        }
    }

    /// A copy with every entry multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            size: self.size,
            values: self.values.iter().map(|v| v * factor).collect(),
        }
    }

    /// Convert back into nested rows
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.size).map(|i| self.row(i).to_vec()).collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for SimilarityMatrix {
    type Error = PacSumError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<SimilarityMatrix> for Vec<Vec<f64>> {
    fn from(matrix: SimilarityMatrix) -> Self {
        matrix.to_rows()
    }
}

// ============================================================================
// Hyperparameters
// ============================================================================

/// The (beta, lambda1, lambda2) triple controlling selection
///
/// `beta` positions the edge threshold between the matrix minimum and
/// maximum; `lambda1` and `lambda2` weight the forward and backward
/// centrality in the combined node score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HyperParams {
    pub beta: f64,
    pub lambda1: f64,
    pub lambda2: f64,
}

impl HyperParams {
    pub fn new(beta: f64, lambda1: f64, lambda2: f64) -> Self {
        Self {
            beta,
            lambda1,
            lambda2,
        }
    }

    /// Edge threshold for a matrix whose entries span `[min_score, max_score]`
    ///
    /// When `min_score == max_score` the threshold collapses to `min_score`
    /// and no edge survives the strict comparison.
    #[inline]
    pub fn edge_threshold(&self, min_score: f64, max_score: f64) -> f64 {
        min_score + self.beta * (max_score - min_score)
    }

    fn is_finite(&self) -> bool {
        self.beta.is_finite() && self.lambda1.is_finite() && self.lambda2.is_finite()
    }
}

impl Default for HyperParams {
    fn default() -> Self {
        Self {
            beta: 3.0,
            lambda1: -0.2,
            lambda2: -0.2,
        }
    }
}

impl std::fmt::Display for HyperParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "beta {:.4}, lambda1 {:.4}, lambda2 {:.4}",
            self.beta, self.lambda1, self.lambda2
        )
    }
}

// ============================================================================
// Document
// ============================================================================

/// A document to summarize, with its gold reference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Article sentences, in document order
    pub article: Vec<String>,
    /// Reference summary sentences
    #[serde(default)]
    pub reference: Vec<String>,
    /// Sentences handed to the similarity provider (the article when empty)
    #[serde(default)]
    pub embedding_inputs: Vec<String>,
    /// Precomputed similarity matrix; bypasses the provider when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<SimilarityMatrix>,
}

impl Document {
    /// Create a new document
    pub fn new<A, R>(article: A, reference: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            article: article.into_iter().map(Into::into).collect(),
            reference: reference.into_iter().map(Into::into).collect(),
            embedding_inputs: Vec::new(),
            similarity: None,
        }
    }

    /// Builder method: set the sentences handed to the similarity provider
    pub fn with_embedding_inputs<I>(mut self, inputs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.embedding_inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method: attach a precomputed similarity matrix
    pub fn with_similarity(mut self, matrix: SimilarityMatrix) -> Self {
        self.similarity = Some(matrix);
        self
    }

    /// Sentences the similarity provider should see
    pub fn provider_inputs(&self) -> &[String] {
        if self.embedding_inputs.is_empty() {
            &self.article
        } else {
            &self.embedding_inputs
        }
    }

    /// Number of article sentences
    pub fn len(&self) -> usize {
        self.article.len()
    }

    /// Check if the article has no sentences
    pub fn is_empty(&self) -> bool {
        self.article.is_empty()
    }

    /// Whether the article is long enough that selection is needed
    pub fn needs_extraction(&self, extract_num: usize) -> bool {
        self.article.len() > extract_num
    }

    /// Check that embedding inputs, when given, pair one-to-one with the article
    pub fn validate(&self) -> Result<()> {
        if !self.embedding_inputs.is_empty() && self.embedding_inputs.len() != self.article.len() {
            return Err(PacSumError::invalid_input(format!(
                "{} embedding inputs for {} article sentences",
                self.embedding_inputs.len(),
                self.article.len()
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Runtime
// ============================================================================

/// Thread-pool limits for document-level parallel work
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Upper bound on worker threads (`None` = Rayon default)
    pub max_threads: Option<usize>,
    /// Force single-threaded execution
    pub single_thread: bool,
}

impl RuntimeConfig {
    /// Resolve the effective thread count.
    ///
    /// - `single_thread == true` → `Some(1)`
    /// - `max_threads == Some(n)` → `Some(n)`
    /// - otherwise → `None` (use Rayon default)
    pub fn effective_threads(&self) -> Option<usize> {
        if self.single_thread {
            Some(1)
        } else {
            self.max_threads
        }
    }

    /// Build a scoped Rayon thread pool matching this config.
    ///
    /// Returns `Ok(None)` when no thread limit is set (use global pool).
    pub fn build_thread_pool(&self) -> Result<Option<rayon::ThreadPool>> {
        self.effective_threads()
            .map(|n| {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| PacSumError::runtime(format!("failed to build thread pool: {e}")))
            })
            .transpose()
    }

    /// Execute `f` within a scoped Rayon thread pool matching this config.
    ///
    /// If no thread limit is set, `f` runs directly (using the global pool).
    pub fn scoped<R: Send>(&self, f: impl FnOnce() -> R + Send) -> Result<R> {
        Ok(match self.build_thread_pool()? {
            Some(pool) => pool.install(f),
            None => f(),
        })
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for PacSum extraction
///
/// The default `beta = 3.0` places the threshold above every entry (no
/// edges survive) until the tuner picks a value inside `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacSumConfig {
    /// Identifier of the sentence model backing the similarity provider
    pub model_identifier: String,
    /// Number of sentences selected per document
    pub extract_num: usize,
    /// Threshold position between matrix minimum and maximum
    pub beta: f64,
    /// Weight of the (negated) forward centrality
    pub lambda1: f64,
    /// Weight of the backward centrality
    pub lambda2: f64,
    /// Seed for tie-breaking shuffles (`None` = entropy)
    pub seed: Option<u64>,
    /// Thread-pool limits for tuning
    pub runtime: RuntimeConfig,
}

impl Default for PacSumConfig {
    fn default() -> Self {
        let params = HyperParams::default();
        Self {
            model_identifier: String::new(),
            extract_num: 3,
            beta: params.beta,
            lambda1: params.lambda1,
            lambda2: params.lambda2,
            seed: None,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl PacSumConfig {
    /// Create a new config for the given sentence model
    pub fn new(model_identifier: impl Into<String>) -> Self {
        Self {
            model_identifier: model_identifier.into(),
            ..Self::default()
        }
    }

    /// The current hyperparameter triple
    pub fn params(&self) -> HyperParams {
        HyperParams::new(self.beta, self.lambda1, self.lambda2)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.extract_num == 0 {
            return Err(PacSumError::invalid_input("extract_num must be > 0"));
        }

        if !self.params().is_finite() {
            return Err(PacSumError::invalid_input(format!(
                "hyperparameters must be finite, got {}",
                self.params()
            )));
        }

        if self.runtime.max_threads == Some(0) {
            return Err(PacSumError::invalid_input("max_threads must be > 0"));
        }

        Ok(())
    }

    /// Builder method: set all three hyperparameters
    pub fn with_params(mut self, params: HyperParams) -> Self {
        self.beta = params.beta;
        self.lambda1 = params.lambda1;
        self.lambda2 = params.lambda2;
        self
    }

    /// Builder method: set number of sentences to extract
    pub fn with_extract_num(mut self, extract_num: usize) -> Self {
        self.extract_num = extract_num;
        self
    }

    /// Builder method: set beta
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Builder method: set lambda1
    pub fn with_lambda1(mut self, lambda1: f64) -> Self {
        self.lambda1 = lambda1;
        self
    }

    /// Builder method: set lambda2
    pub fn with_lambda2(mut self, lambda2: f64) -> Self {
        self.lambda2 = lambda2;
        self
    }

    /// Builder method: set the tie-breaking seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: set runtime limits
    pub fn with_runtime(mut self, runtime: RuntimeConfig) -> Self {
        self.runtime = runtime;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_rejects_non_square() {
        let err = SimilarityMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(err.is_invalid_input());

        let err = SimilarityMatrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]])
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_from_flat() {
        let m = SimilarityMatrix::from_flat(2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m.get(1, 0), 3.0);
        assert!(SimilarityMatrix::from_flat(2, vec![1.0]).is_err());
    }

    #[test]
    fn test_from_flat_size_overflow() {
        let err = SimilarityMatrix::from_flat(usize::MAX, vec![1.0]).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_from_rows_many_empty_rows() {
        // Rejected before any size * size buffer is reserved.
        let err = SimilarityMatrix::from_rows(vec![Vec::new(); 300_000]).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_document_validate() {
        assert!(Document::new(["a", "b"], ["a"]).validate().is_ok());
        assert!(Document::new(["a", "b"], ["a"])
            .with_embedding_inputs(["x", "y"])
            .validate()
            .is_ok());

        let err = Document::new(["a", "b"], ["a"])
            .with_embedding_inputs(["x", "y", "z", "w", "v"])
            .validate()
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_min_max_includes_diagonal_and_lower() {
        let m = SimilarityMatrix::from_rows(vec![
            vec![5.0, 0.2, 0.3],
            vec![-1.0, 5.0, 0.4],
            vec![0.0, 0.0, 5.0],
        ])
        .unwrap();
        assert_eq!(m.min_max(), Some((-1.0, 5.0)));
        assert_eq!(SimilarityMatrix::empty().min_max(), None);
    }

    #[test]
    fn test_dot_product() {
        let m = SimilarityMatrix::dot_product(&[vec![1.0, 0.0], vec![0.5, 0.5], vec![0.0, 2.0]])
            .unwrap();
        assert_eq!(m.len(), 3);
        assert!((m.get(0, 1) - 0.5).abs() < 1e-12);
        assert!((m.get(1, 0) - 0.5).abs() < 1e-12);
        assert!((m.get(2, 2) - 4.0).abs() < 1e-12);
        assert!((m.get(0, 2)).abs() < 1e-12);
    }

    #[test]
    fn test_dot_product_ragged_embeddings() {
        let err = SimilarityMatrix::dot_product(&[vec![1.0, 0.0], vec![1.0]]).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_shift_and_scale() {
        let m = SimilarityMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.shifted(1.0).to_rows(), vec![vec![0.0, 1.0], vec![2.0, 3.0]]);
        assert_eq!(m.scaled(2.0).to_rows(), vec![vec![2.0, 4.0], vec![6.0, 8.0]]);
    }

    #[test]
    fn test_matrix_serde_roundtrip() {
        let json = "[[1.0,0.5],[0.5,1.0]]";
        let m: SimilarityMatrix = serde_json::from_str(json).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(serde_json::to_string(&m).unwrap(), json);

        let bad = serde_json::from_str::<SimilarityMatrix>("[[1.0,0.5],[0.5]]");
        assert!(bad.is_err());
    }

    #[test]
    fn test_edge_threshold() {
        let params = HyperParams::new(0.5, -0.2, -0.2);
        assert!((params.edge_threshold(0.1, 0.9) - 0.5).abs() < 1e-12);

        // Degenerate matrix: threshold collapses onto the minimum.
        assert_eq!(params.edge_threshold(0.7, 0.7), 0.7);
    }

    #[test]
    fn test_config_defaults() {
        let cfg = PacSumConfig::default();
        assert_eq!(cfg.extract_num, 3);
        assert_eq!(cfg.beta, 3.0);
        assert_eq!(cfg.lambda1, -0.2);
        assert_eq!(cfg.lambda2, -0.2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(PacSumConfig::default().with_extract_num(0).validate().is_err());
        assert!(PacSumConfig::default().with_beta(f64::NAN).validate().is_err());

        let runtime = RuntimeConfig {
            max_threads: Some(0),
            single_thread: false,
        };
        assert!(PacSumConfig::default().with_runtime(runtime).validate().is_err());
    }

    #[test]
    fn test_config_serde_missing_fields_default() {
        let cfg: PacSumConfig =
            serde_json::from_str(r#"{"model_identifier": "all-MiniLM-L6-v2", "beta": 0.3}"#)
                .unwrap();
        assert_eq!(cfg.model_identifier, "all-MiniLM-L6-v2");
        assert_eq!(cfg.beta, 0.3);
        assert_eq!(cfg.extract_num, 3);
        assert_eq!(cfg.lambda2, -0.2);
        assert_eq!(cfg.runtime, RuntimeConfig::default());
    }

    #[test]
    fn test_with_params() {
        let cfg = PacSumConfig::new("m").with_params(HyperParams::new(0.1, 0.4, 0.6));
        assert_eq!(cfg.params(), HyperParams::new(0.1, 0.4, 0.6));
    }

    #[test]
    fn test_document_provider_inputs() {
        let doc = Document::new(["A.", "B."], ["A."]);
        assert_eq!(doc.provider_inputs(), doc.article.as_slice());

        let doc = doc.with_embedding_inputs(["a", "b"]);
        assert_eq!(doc.provider_inputs(), &["a".to_string(), "b".to_string()]);
        assert!(doc.needs_extraction(1));
        assert!(!doc.needs_extraction(2));
    }

    #[test]
    fn test_runtime_effective_threads() {
        let rt = RuntimeConfig::default();
        assert_eq!(rt.effective_threads(), None);

        let rt = RuntimeConfig {
            max_threads: Some(4),
            single_thread: true,
        };
        assert_eq!(rt.effective_threads(), Some(1));
        assert_eq!(rt.scoped(|| 7).unwrap(), 7);
    }
}
