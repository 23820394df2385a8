//! Sentence graph scoring
//!
//! This module turns a pairwise similarity matrix into directional
//! centrality scores over a thresholded sentence graph.

pub mod directional;

pub use directional::{compute_scores, DirectionalScores, Edge};
