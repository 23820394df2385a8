//! Directional centrality over a thresholded sentence graph
//!
//! Sentences are nodes and every pair `i < j` whose score exceeds the edge
//! threshold forms an edge `i → j`. Each surviving edge credits its weight to
//! the later node's *forward* score and to the earlier node's *backward*
//! score. Only the upper triangle of the matrix is read, so the result
//! depends on index order and never on the lower triangle or diagonal.

use crate::types::SimilarityMatrix;

/// A retained edge between an earlier and a later sentence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Earlier sentence index
    pub source: usize,
    /// Later sentence index (always `> source`)
    pub target: usize,
    /// Matrix entry at `(source, target)`
    pub weight: f64,
}

/// Per-node forward and backward centrality plus the edges that produced it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectionalScores {
    /// Weight accumulated at each node from edges arriving from earlier nodes
    pub forward: Vec<f64>,
    /// Weight accumulated at each node from edges leaving toward later nodes
    pub backward: Vec<f64>,
    /// Surviving edges, in row-major visiting order
    pub edges: Vec<Edge>,
}

impl DirectionalScores {
    /// Number of nodes scored
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Check if no nodes were scored
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Sum of all retained edge weights
    pub fn total_edge_weight(&self) -> f64 {
        self.edges.iter().map(|e| e.weight).sum()
    }
}

/// Compute forward/backward centrality for every node
///
/// An edge survives when its weight is strictly greater than `threshold`.
pub fn compute_scores(matrix: &SimilarityMatrix, threshold: f64) -> DirectionalScores {
    let n = matrix.len();
    let mut forward = vec![0.0; n];
    let mut backward = vec![0.0; n];
    let mut edges = Vec::new();

    for i in 0..n {
        let row = matrix.row(i);
        for (j, &weight) in row.iter().enumerate().skip(i + 1) {
            if weight > threshold {
                forward[j] += weight;
                backward[i] += weight;
                edges.push(Edge {
                    source: i,
                    target: j,
                    weight,
                });
            }
        }
    }

    DirectionalScores {
        forward,
        backward,
        edges,
    }
}
