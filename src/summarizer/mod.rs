//! Extractive summarization by directional centrality
//!
//! - [`selector`]: top-K sentence selection for one similarity matrix
//! - [`extractor`]: per-document orchestration and evaluation
//! - [`tuner`]: grid search over the selector's hyperparameters

pub mod extractor;
pub mod selector;
pub mod tuner;
