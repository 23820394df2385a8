//! Document-level extraction and evaluation
//!
//! [`PacSumExtractor`] ties a similarity provider to a [`PacSumConfig`]:
//! for each document it obtains the sentence similarity matrix, runs the
//! top-K selector, and maps the chosen indices back to sentences. Documents
//! with no more than `extract_num` sentences pass through unchanged.

use super::selector::TopKSelector;
use super::tuner::{HyperparamTuner, TuningOutcome};
use crate::errors::{PacSumError, Result};
use crate::metrics::{MetricReport, QualityMetric};
use crate::similarity::SimilarityProvider;
use crate::types::{Document, PacSumConfig, SimilarityMatrix};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// The summary chosen for one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSummary {
    /// Selected sentence indices, in selection order
    pub indices: Vec<usize>,
    /// Selected sentences, in selection order
    pub sentences: Vec<String>,
    /// True when the article was short enough to be its own summary
    pub passthrough: bool,
}

impl DocumentSummary {
    fn passthrough(article: &[String]) -> Self {
        Self {
            indices: (0..article.len()).collect(),
            sentences: article.to_vec(),
            passthrough: true,
        }
    }

    fn from_indices(article: &[String], indices: Vec<usize>) -> Self {
        let sentences = indices.iter().map(|&i| article[i].clone()).collect();
        Self {
            indices,
            sentences,
            passthrough: false,
        }
    }
}

/// Summaries for a batch plus the references they are judged against
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extraction {
    pub summaries: Vec<DocumentSummary>,
    /// One reference list per document (a single reference each)
    pub references: Vec<Vec<Vec<String>>>,
}

impl Extraction {
    /// Candidate summaries in the shape a [`QualityMetric`] expects
    pub fn candidates(&self) -> Vec<Vec<String>> {
        self.summaries.iter().map(|s| s.sentences.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

/// An extraction together with its quality scores
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub extraction: Extraction,
    pub report: MetricReport,
}

/// PacSum extractive summarizer
#[derive(Debug, Clone)]
pub struct PacSumExtractor<P> {
    provider: P,
    config: PacSumConfig,
}

impl<P: SimilarityProvider> PacSumExtractor<P> {
    /// Create an extractor, validating the configuration
    pub fn new(provider: P, config: PacSumConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    pub fn config(&self) -> &PacSumConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Replace the configuration, e.g. with one returned by tuning
    pub fn with_config(mut self, config: PacSumConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// A selector for the configured triple
    pub fn selector(&self) -> Result<TopKSelector> {
        Ok(TopKSelector::new(self.config.extract_num)?.with_params(self.config.params()))
    }

    /// RNG for tie-breaking: seeded from the config when a seed is set
    pub fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// The document's similarity matrix, precomputed or from the provider
    ///
    /// The matrix must have one row per article sentence.
    pub fn similarity_matrix(&self, document: &Document) -> Result<SimilarityMatrix> {
        document.validate()?;

        let matrix = match &document.similarity {
            Some(matrix) => matrix.clone(),
            None => self.provider.compute_similarity(document.provider_inputs())?,
        };

        if matrix.len() != document.article.len() {
            return Err(PacSumError::invalid_input(format!(
                "similarity matrix is {}x{} but the article has {} sentences",
                matrix.len(),
                matrix.len(),
                document.article.len()
            )));
        }
        Ok(matrix)
    }

    /// Summarize a single document
    pub fn summarize_document<R: Rng + ?Sized>(
        &self,
        document: &Document,
        rng: &mut R,
    ) -> Result<DocumentSummary> {
        document.validate()?;
        if !document.needs_extraction(self.config.extract_num) {
            return Ok(DocumentSummary::passthrough(&document.article));
        }

        let matrix = self.similarity_matrix(document)?;
        let indices = self.selector()?.select(&matrix, rng);
        Ok(DocumentSummary::from_indices(&document.article, indices))
    }

    /// Summarize every document without evaluating
    pub fn extract<R: Rng + ?Sized>(
        &self,
        documents: &[Document],
        rng: &mut R,
    ) -> Result<Extraction> {
        trace_stage!("extract");

        let mut extraction = Extraction {
            summaries: Vec::with_capacity(documents.len()),
            references: Vec::with_capacity(documents.len()),
        };

        for document in documents {
            let summary = self.summarize_document(document, rng)?;

            #[cfg(feature = "tracing")]
            tracing::debug!(
                sentences = document.len(),
                passthrough = summary.passthrough,
                "summarized document"
            );

            extraction.summaries.push(summary);
            extraction.references.push(vec![document.reference.clone()]);
        }

        Ok(extraction)
    }

    /// Summarize every document and score the batch with `metric`
    pub fn extract_summary<M: QualityMetric, R: Rng + ?Sized>(
        &self,
        documents: &[Document],
        metric: &M,
        rng: &mut R,
    ) -> Result<Evaluation> {
        let extraction = self.extract(documents, rng)?;
        let report = metric.score(&extraction.candidates(), &extraction.references)?;

        #[cfg(feature = "tracing")]
        tracing::info!(documents = extraction.len(), ?report, "evaluated extraction");

        Ok(Evaluation { extraction, report })
    }

    /// Sweep the default grid and return the best configuration found
    ///
    /// The extractor itself is left untouched; apply the result with
    /// [`PacSumExtractor::with_config`] using [`TuningOutcome::config`].
    pub fn tune<M: QualityMetric, R: Rng + ?Sized>(
        &self,
        documents: &[Document],
        metric: &M,
        sample_limit: usize,
        rng: &mut R,
    ) -> Result<TuningOutcome>
    where
        P: Sync,
    {
        HyperparamTuner::new()
            .with_sample_limit(sample_limit)
            .tune(self, documents, metric, rng)
    }
}
