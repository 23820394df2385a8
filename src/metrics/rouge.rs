//! ROUGE-1, ROUGE-2 and ROUGE-L
//!
//! Scores are computed at summary level: all sentences of a summary are
//! tokenized into one term sequence. With several references per document
//! the best-matching reference (by F-score) is kept for each ROUGE variant,
//! and the per-document scores are macro-averaged over the batch.
//!
//! Report keys follow the `rouge_{1,2,l}_{precision,recall,f_score}`
//! naming.

use super::{MetricReport, QualityMetric};
use crate::errors::{PacSumError, Result};
use crate::nlp::tokenizer::Tokenizer;
use rustc_hash::FxHashMap;

/// Precision, recall and F1 for one comparison
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PrfScore {
    pub precision: f64,
    pub recall: f64,
    pub f_score: f64,
}

impl PrfScore {
    /// Build from an overlap count and the candidate/reference totals
    ///
    /// Empty sides score zero rather than dividing by zero.
    pub fn from_counts(overlap: usize, candidate_total: usize, reference_total: usize) -> Self {
        let precision = if candidate_total > 0 {
            overlap as f64 / candidate_total as f64
        } else {
            0.0
        };
        let recall = if reference_total > 0 {
            overlap as f64 / reference_total as f64
        } else {
            0.0
        };
        let f_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            f_score,
        }
    }
}

/// N-gram overlap (ROUGE-N) between two term sequences
pub fn rouge_n(candidate: &[String], reference: &[String], n: usize) -> PrfScore {
    let candidate_counts = ngram_counts(candidate, n);
    let reference_counts = ngram_counts(reference, n);

    let overlap = candidate_counts
        .iter()
        .map(|(gram, &count)| count.min(reference_counts.get(gram).copied().unwrap_or(0)))
        .sum();

    PrfScore::from_counts(
        overlap,
        candidate.len().saturating_sub(n.saturating_sub(1)),
        reference.len().saturating_sub(n.saturating_sub(1)),
    )
}

/// Longest-common-subsequence overlap (ROUGE-L) between two term sequences
pub fn rouge_l(candidate: &[String], reference: &[String]) -> PrfScore {
    PrfScore::from_counts(
        lcs_length(candidate, reference),
        candidate.len(),
        reference.len(),
    )
}

fn ngram_counts(terms: &[String], n: usize) -> FxHashMap<&[String], usize> {
    let mut counts = FxHashMap::default();
    if n == 0 || terms.len() < n {
        return counts;
    }
    for gram in terms.windows(n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

fn lcs_length(a: &[String], b: &[String]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// ROUGE quality metric over sentence-list summaries
#[derive(Debug, Clone, Default)]
pub struct RougeScorer {
    tokenizer: Tokenizer,
}

/// Variants reported, in report-key order
const VARIANTS: [&str; 3] = ["1", "2", "l"];

impl RougeScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom tokenizer (e.g. without lemmatization)
    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    fn summary_terms(&self, sentences: &[String]) -> Vec<String> {
        sentences
            .iter()
            .flat_map(|s| self.tokenizer.terms(s))
            .collect()
    }

    /// Best score per variant for one candidate against its references
    fn score_document(&self, candidate: &[String], references: &[Vec<String>]) -> [PrfScore; 3] {
        let candidate_terms = self.summary_terms(candidate);
        let mut best = [PrfScore::default(); 3];

        for reference in references {
            let reference_terms = self.summary_terms(reference);
            let scores = [
                rouge_n(&candidate_terms, &reference_terms, 1),
                rouge_n(&candidate_terms, &reference_terms, 2),
                rouge_l(&candidate_terms, &reference_terms),
            ];
            for (slot, score) in best.iter_mut().zip(scores) {
                if score.f_score > slot.f_score {
                    *slot = score;
                }
            }
        }
        best
    }
}

impl QualityMetric for RougeScorer {
    fn score(
        &self,
        candidates: &[Vec<String>],
        references: &[Vec<Vec<String>>],
    ) -> Result<MetricReport> {
        if candidates.len() != references.len() {
            return Err(PacSumError::invalid_input(format!(
                "{} candidate summaries but {} reference sets",
                candidates.len(),
                references.len()
            )));
        }

        let mut totals = [PrfScore::default(); 3];
        for (candidate, refs) in candidates.iter().zip(references) {
            for (total, score) in totals.iter_mut().zip(self.score_document(candidate, refs)) {
                total.precision += score.precision;
                total.recall += score.recall;
                total.f_score += score.f_score;
            }
        }

        let count = candidates.len().max(1) as f64;
        let mut report = MetricReport::new();
        for (variant, total) in VARIANTS.iter().zip(totals) {
            report.insert(format!("rouge_{variant}_precision"), total.precision / count);
            report.insert(format!("rouge_{variant}_recall"), total.recall / count);
            report.insert(format!("rouge_{variant}_f_score"), total.f_score / count);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn sentences(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rouge_1() {
        let score = rouge_n(&terms("the cat sat"), &terms("the cat ran away"), 1);
        assert!((score.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((score.recall - 0.5).abs() < 1e-12);
        let f = 2.0 * (2.0 / 3.0) * 0.5 / (2.0 / 3.0 + 0.5);
        assert!((score.f_score - f).abs() < 1e-12);
    }

    #[test]
    fn test_rouge_1_clips_repeats() {
        let score = rouge_n(&terms("the the the"), &terms("the cat"), 1);
        assert!((score.precision - 1.0 / 3.0).abs() < 1e-12);
        assert!((score.recall - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_rouge_2() {
        let score = rouge_n(&terms("a b c d"), &terms("a b x c d"), 2);
        // candidate bigrams: ab bc cd; reference: ab bx xc cd
        assert!((score.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((score.recall - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_rouge_l() {
        let score = rouge_l(&terms("a b c d"), &terms("a x b d"));
        assert!((score.precision - 0.75).abs() < 1e-12);
        assert!((score.recall - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_empty_candidate_scores_zero() {
        let score = rouge_n(&[], &terms("a b"), 1);
        assert_eq!(score, PrfScore::default());
        assert_eq!(rouge_l(&[], &terms("a")), PrfScore::default());
    }

    #[test]
    fn test_scorer_report_keys() {
        let scorer = RougeScorer::new();
        let report = scorer
            .score(
                &[sentences(&["The cat sat on the mat."])],
                &[vec![sentences(&["The cat sat on the mat."])]],
            )
            .unwrap();

        assert_eq!(report.len(), 9);
        assert!((report.get("rouge_1_f_score").unwrap() - 1.0).abs() < 1e-12);
        assert!((report.get("rouge_2_recall").unwrap() - 1.0).abs() < 1e-12);
        assert!((report.get("rouge_l_precision").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scorer_best_reference() {
        let scorer = RougeScorer::new();
        let report = scorer
            .score(
                &[sentences(&["solar power"])],
                &[vec![sentences(&["wind farms"]), sentences(&["solar power"])]],
            )
            .unwrap();
        assert!((report.get("rouge_1_f_score").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scorer_tolerates_empty() {
        let scorer = RougeScorer::new();
        let report = scorer
            .score(&[Vec::new()], &[vec![sentences(&["Something."])]])
            .unwrap();
        assert_eq!(report.get("rouge_1_f_score"), Some(0.0));

        let report = scorer.score(&[], &[]).unwrap();
        assert_eq!(report.get("rouge_l_f_score"), Some(0.0));
    }

    #[test]
    fn test_scorer_length_mismatch() {
        let scorer = RougeScorer::new();
        assert!(scorer.score(&[Vec::new()], &[]).is_err());
    }
}
