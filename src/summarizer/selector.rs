//! Top-K sentence selection by directional centrality
//!
//! The selector places an edge threshold between the matrix minimum and
//! maximum, scores every sentence from its forward and backward centrality,
//! and keeps the `extract_num` best. The forward term is negated before
//! weighting while the backward term is not; with the default negative
//! lambdas this favours sentences that many *later* sentences resemble.
//!
//! Ties are broken by shuffling the candidates with the caller's RNG and then
//! sorting stably by score, so runs are reproducible only under a seeded RNG.

use crate::errors::{PacSumError, Result};
use crate::graph::directional::compute_scores;
use crate::types::{HyperParams, SimilarityMatrix};
use rand::seq::SliceRandom;
use rand::Rng;

/// A node and its combined score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedNode {
    /// Sentence index
    pub index: usize,
    /// `lambda1 * -forward + lambda2 * backward`
    pub score: f64,
}

/// Combined score per node, in index order
pub fn node_scores(matrix: &SimilarityMatrix, params: &HyperParams) -> Vec<f64> {
    let Some((min_score, max_score)) = matrix.min_max() else {
        return Vec::new();
    };

    let threshold = params.edge_threshold(min_score, max_score);
    let scores = compute_scores(&matrix.shifted(threshold), 0.0);

    scores
        .forward
        .iter()
        .zip(&scores.backward)
        .map(|(&fwd, &bwd)| params.lambda1 * -fwd + params.lambda2 * bwd)
        .collect()
}

/// All nodes ordered by descending combined score, ties in shuffled order
pub fn rank_nodes<R: Rng + ?Sized>(
    matrix: &SimilarityMatrix,
    params: &HyperParams,
    rng: &mut R,
) -> Vec<RankedNode> {
    let mut ranked: Vec<RankedNode> = node_scores(matrix, params)
        .into_iter()
        .enumerate()
        .map(|(index, score)| RankedNode {
            index,
            // Signed zeros must tie under `total_cmp`.
            score: if score == 0.0 { 0.0 } else { score },
        })
        .collect();

    ranked.shuffle(rng);
    // `sort_by` is stable, so equal scores keep their shuffled order.
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Indices of the `extract_num` highest-scoring nodes, best first
///
/// When the matrix has at most `extract_num` rows every index is returned,
/// still in ranked order.
pub fn select_tops<R: Rng + ?Sized>(
    matrix: &SimilarityMatrix,
    params: &HyperParams,
    extract_num: usize,
    rng: &mut R,
) -> Result<Vec<usize>> {
    if extract_num == 0 {
        return Err(PacSumError::invalid_input("extract_num must be > 0"));
    }

    Ok(rank_nodes(matrix, params, rng)
        .into_iter()
        .take(extract_num)
        .map(|node| node.index)
        .collect())
}

/// Reusable selector bound to one hyperparameter triple
#[derive(Debug, Clone, Copy)]
pub struct TopKSelector {
    params: HyperParams,
    extract_num: usize,
}

impl TopKSelector {
    /// Create a selector with default hyperparameters
    pub fn new(extract_num: usize) -> Result<Self> {
        if extract_num == 0 {
            return Err(PacSumError::invalid_input("extract_num must be > 0"));
        }
        Ok(Self {
            params: HyperParams::default(),
            extract_num,
        })
    }

    /// Set the hyperparameter triple
    pub fn with_params(mut self, params: HyperParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> HyperParams {
        self.params
    }

    pub fn extract_num(&self) -> usize {
        self.extract_num
    }

    /// Select the top sentences of one document's matrix
    pub fn select<R: Rng + ?Sized>(&self, matrix: &SimilarityMatrix, rng: &mut R) -> Vec<usize> {
        #[cfg(feature = "tracing")]
        tracing::trace!(nodes = matrix.len(), params = %self.params, "selecting sentences");

        rank_nodes(matrix, &self.params, rng)
            .into_iter()
            .take(self.extract_num)
            .map(|node| node.index)
            .collect()
    }
}
