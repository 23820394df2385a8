//! Sentence similarity collaborators
//!
//! The selector only needs an N×N matrix per document. Where that matrix
//! comes from is pluggable:
//!
//! - [`SimilarityProvider`] produces the matrix directly.
//! - [`Embedder`] produces one vector per sentence; wrap it in
//!   [`DotProductSimilarity`] to score all pairs by dot product.
//! - [`BagOfWordsEmbedder`] is a dependency-free lexical embedder for
//!   running the pipeline without a neural sentence model.

pub mod lexical;

pub use lexical::BagOfWordsEmbedder;

use crate::errors::{PacSumError, Result};
use crate::types::SimilarityMatrix;

/// Produces a pairwise similarity matrix for a document's sentences
///
/// # Contract
///
/// - **Input**: the sentences of one document, in order.
/// - **Output**: an N×N matrix where larger means more similar.
/// - **Errors**: returned unchanged to the caller; nothing retries.
pub trait SimilarityProvider {
    /// Score every ordered pair of sentences.
    fn compute_similarity(&self, sentences: &[String]) -> Result<SimilarityMatrix>;
}

impl<T: SimilarityProvider + ?Sized> SimilarityProvider for &T {
    fn compute_similarity(&self, sentences: &[String]) -> Result<SimilarityMatrix> {
        (**self).compute_similarity(sentences)
    }
}

impl<T: SimilarityProvider + ?Sized> SimilarityProvider for Box<T> {
    fn compute_similarity(&self, sentences: &[String]) -> Result<SimilarityMatrix> {
        (**self).compute_similarity(sentences)
    }
}

/// Encodes sentences as fixed-length vectors
pub trait Embedder {
    /// One vector per sentence, all of the same dimension.
    fn encode(&self, sentences: &[String]) -> Result<Vec<Vec<f64>>>;
}

/// Dot-product similarity over any [`Embedder`]
#[derive(Debug, Clone, Default)]
pub struct DotProductSimilarity<E> {
    embedder: E,
}

impl<E: Embedder> DotProductSimilarity<E> {
    pub fn new(embedder: E) -> Self {
        Self { embedder }
    }

    /// Borrow the wrapped embedder
    pub fn embedder(&self) -> &E {
        &self.embedder
    }
}

impl<E: Embedder> SimilarityProvider for DotProductSimilarity<E> {
    fn compute_similarity(&self, sentences: &[String]) -> Result<SimilarityMatrix> {
        let embeddings = self.embedder.encode(sentences)?;
        if embeddings.len() != sentences.len() {
            return Err(PacSumError::invalid_input(format!(
                "embedder returned {} vectors for {} sentences",
                embeddings.len(),
                sentences.len()
            )));
        }
        SimilarityMatrix::dot_product(&embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEmbedder(Vec<Vec<f64>>);

    impl Embedder for FixedEmbedder {
        fn encode(&self, _sentences: &[String]) -> Result<Vec<Vec<f64>>> {
            Ok(self.0.clone())
        }
    }

    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn encode(&self, _sentences: &[String]) -> Result<Vec<Vec<f64>>> {
            Err(PacSumError::provider("model not loaded"))
        }
    }

    fn sentences(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("sentence {i}")).collect()
    }

    #[test]
    fn test_dot_product_provider() {
        let provider = DotProductSimilarity::new(FixedEmbedder(vec![vec![1.0, 0.0], vec![0.6, 0.8]]));
        let m = provider.compute_similarity(&sentences(2)).unwrap();
        assert!((m.get(0, 1) - 0.6).abs() < 1e-12);
        assert!((m.get(1, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let provider = DotProductSimilarity::new(FixedEmbedder(vec![vec![1.0]]));
        let err = provider.compute_similarity(&sentences(3)).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_embedder_error_propagates_unchanged() {
        let provider = DotProductSimilarity::new(FailingEmbedder);
        let err = provider.compute_similarity(&sentences(2)).unwrap_err();
        assert_eq!(err, PacSumError::provider("model not loaded"));
    }

    #[test]
    fn test_boxed_provider() {
        let boxed: Box<dyn SimilarityProvider> =
            Box::new(DotProductSimilarity::new(FixedEmbedder(vec![vec![2.0]])));
        let m = boxed.compute_similarity(&sentences(1)).unwrap();
        assert_eq!(m.get(0, 0), 4.0);
    }
}
