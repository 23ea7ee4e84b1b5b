//! Metacognition - Judges how much to trust an answer and when to revise it.
//!
//! The evaluator works in three stages:
//! 1. **Scoring**: Turn evidence certainty factors into a confidence in [0, 1]
//! 2. **Gating**: Compare a confidence against the revision threshold
//! 3. **Revision**: Delegate low-confidence answers to a [`Reviser`] and log
//!    whether the attempt improved them

mod history;

pub use history::*;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::knowledge_base::{Atom, Revision};
use crate::{RevisionError, ValidationError};

/// Default revision threshold.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Steepness of the logistic curve used for scoring.
const LOGISTIC_STEEPNESS: f64 = 5.0;

/// Anything that can reconsider its answer to a goal.
pub trait Reviser {
    fn revise(&self, goal: &Atom) -> Result<Revision, RevisionError>;
}

/// Qualitative confidence bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceBand {
    VeryHigh,
    High,
    Moderate,
    Low,
    VeryLow,
}

impl ConfidenceBand {
    /// Classify a confidence score.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.9 {
            Self::VeryHigh
        } else if confidence >= 0.7 {
            Self::High
        } else if confidence >= 0.5 {
            Self::Moderate
        } else if confidence >= 0.3 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    /// Human-readable sentence for this band.
    pub fn description(self) -> &'static str {
        match self {
            Self::VeryHigh => "I am very confident in this answer.",
            Self::High => "I am reasonably confident in this answer.",
            Self::Moderate => {
                "I am somewhat confident in this answer, but there is room for doubt."
            }
            Self::Low => "I am not very confident in this answer. It should be treated with caution.",
            Self::VeryLow => {
                "I have very low confidence in this answer. It is likely incorrect or incomplete."
            }
        }
    }
}

impl std::fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Scores confidence, decides on revision and keeps both histories.
#[derive(Debug, Clone)]
pub struct ConfidenceEvaluator {
    threshold: f64,
    history: ConfidenceHistory,
    revisions: RevisionLog,
}

impl Default for ConfidenceEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE_THRESHOLD)
    }
}

impl ConfidenceEvaluator {
    /// Create an evaluator that revises answers below `threshold`.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            history: ConfidenceHistory::new(),
            revisions: RevisionLog::new(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Score a body of evidence.
    ///
    /// Each piece of evidence carries one certainty factor. The mean factor is
    /// mapped through a logistic curve centred on 0.5, so a mean of 0.5 scores
    /// 0.5 and a mean of 1.0 scores about 0.92. Empty input scores 0.0 and is
    /// not recorded.
    pub fn evaluate_confidence<E>(
        &mut self,
        evidence: &[E],
        certainty_factors: &[f64],
    ) -> Result<f64, ValidationError> {
        if evidence.is_empty() || certainty_factors.is_empty() {
            return Ok(0.0);
        }

        if evidence.len() != certainty_factors.len() {
            return Err(ValidationError::LengthMismatch {
                evidence: evidence.len(),
                factors: certainty_factors.len(),
            });
        }

        if let Some((index, &value)) = certainty_factors
            .iter()
            .enumerate()
            .find(|(_, f)| !f.is_finite())
        {
            return Err(ValidationError::NonFiniteFactor { index, value });
        }

        let mean = certainty_factors.iter().sum::<f64>() / certainty_factors.len() as f64;
        let confidence = (1.0 / (1.0 + (-LOGISTIC_STEEPNESS * (mean - 0.5)).exp())).clamp(0.0, 1.0);

        debug!(evidence = evidence.len(), mean, confidence, "Evaluated confidence");
        self.history.record(confidence);
        Ok(confidence)
    }

    /// Append an externally computed confidence to the history.
    ///
    /// The `Reasoner` records every knowledge-store answer through this, so
    /// the history covers answers as well as scored evidence.
    pub fn record_confidence(&mut self, confidence: f64) {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        self.history.record(confidence);
    }

    pub fn needs_revision(&self, confidence: f64) -> bool {
        confidence < self.threshold
    }

    /// Revise an answer if its confidence is below the threshold.
    ///
    /// A failing reviser leaves the answer as it was; the attempt still
    /// counts towards the revision statistics.
    pub fn revise_answer<R: Reviser + ?Sized>(
        &mut self,
        answer: bool,
        confidence: f64,
        reviser: &R,
        goal: &Atom,
    ) -> Revision {
        if !self.needs_revision(confidence) {
            return Revision {
                truth: answer,
                confidence,
                explanation: "No revision needed.".to_string(),
            };
        }

        let record = self.revisions.begin(confidence, goal.to_string());
        match reviser.revise(goal) {
            Ok(revision) => {
                record.complete(revision.confidence);
                info!(
                    goal = %goal,
                    original = confidence,
                    revised = revision.confidence,
                    "Revised answer"
                );
                revision
            }
            Err(e) => {
                warn!(goal = %goal, error = %e, "Revision failed");
                Revision {
                    truth: answer,
                    confidence,
                    explanation: format!("Revision failed: {e}"),
                }
            }
        }
    }

    pub fn get_confidence_stats(&self) -> ConfidenceStats {
        self.history.stats()
    }

    pub fn get_revision_stats(&self) -> RevisionStats {
        self.revisions.stats()
    }

    /// Qualitative sentence describing a confidence score.
    pub fn explain_confidence(&self, confidence: f64) -> &'static str {
        ConfidenceBand::from_confidence(confidence).description()
    }

    pub fn history(&self) -> &ConfidenceHistory {
        &self.history
    }

    pub fn revisions(&self) -> &RevisionLog {
        &self.revisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::knowledge_base::Term;
    use std::cell::Cell;

    struct FixedReviser {
        confidence: f64,
        calls: Cell<usize>,
    }

    impl FixedReviser {
        fn new(confidence: f64) -> Self {
            Self {
                confidence,
                calls: Cell::new(0),
            }
        }
    }

    impl Reviser for FixedReviser {
        fn revise(&self, _goal: &Atom) -> Result<Revision, RevisionError> {
            self.calls.set(self.calls.get() + 1);
            Ok(Revision {
                truth: true,
                confidence: self.confidence,
                explanation: "revised".to_string(),
            })
        }
    }

    struct FailingReviser;

    impl Reviser for FailingReviser {
        fn revise(&self, _goal: &Atom) -> Result<Revision, RevisionError> {
            Err(RevisionError::Collaborator("store offline".to_string()))
        }
    }

    fn goal() -> Atom {
        Atom::unary("philosopher", Term::constant("socrates"))
    }

    #[test]
    fn test_empty_evidence_scores_zero() {
        let mut evaluator = ConfidenceEvaluator::default();
        assert_eq!(evaluator.evaluate_confidence::<&str>(&[], &[0.9]), Ok(0.0));
        assert_eq!(evaluator.evaluate_confidence(&["a"], &[]), Ok(0.0));
        // Empty wins over a length mismatch
        assert_eq!(evaluator.evaluate_confidence::<&str>(&[], &[0.9, 0.8]), Ok(0.0));
        assert!(evaluator.history().is_empty());
    }

    #[test]
    fn test_length_mismatch() {
        let mut evaluator = ConfidenceEvaluator::default();
        let result = evaluator.evaluate_confidence(&["a", "b"], &[0.5]);
        assert_eq!(
            result,
            Err(ValidationError::LengthMismatch {
                evidence: 2,
                factors: 1
            })
        );
        assert!(evaluator.history().is_empty());
    }

    #[test]
    fn test_non_finite_factor() {
        let mut evaluator = ConfidenceEvaluator::default();
        let result = evaluator.evaluate_confidence(&["a", "b"], &[0.5, f64::INFINITY]);
        assert!(matches!(
            result,
            Err(ValidationError::NonFiniteFactor { index: 1, .. })
        ));
    }

    #[test]
    fn test_logistic_scoring() {
        let mut evaluator = ConfidenceEvaluator::default();

        let centre = evaluator.evaluate_confidence(&["a"], &[0.5]).unwrap();
        assert!((centre - 0.5).abs() < 1e-12);

        let certain = evaluator.evaluate_confidence(&["a", "b"], &[1.0, 1.0]).unwrap();
        let expected = 1.0 / (1.0 + (-2.5f64).exp());
        assert!((certain - expected).abs() < 1e-12);

        let doubtful = evaluator.evaluate_confidence(&["a"], &[0.0]).unwrap();
        assert!(doubtful < 0.1);

        assert_eq!(evaluator.history().len(), 3);
    }

    #[test]
    fn test_needs_revision_boundary() {
        let evaluator = ConfidenceEvaluator::default();
        assert!(evaluator.needs_revision(0.69));
        assert!(!evaluator.needs_revision(0.7));
        assert!(!evaluator.needs_revision(0.95));

        let strict = ConfidenceEvaluator::new(1.0);
        assert!(strict.needs_revision(0.99));
    }

    #[test]
    fn test_revise_answer_passthrough() {
        let mut evaluator = ConfidenceEvaluator::default();
        let reviser = FixedReviser::new(1.0);

        let outcome = evaluator.revise_answer(true, 0.85, &reviser, &goal());
        assert_eq!(
            outcome,
            Revision {
                truth: true,
                confidence: 0.85,
                explanation: "No revision needed.".to_string(),
            }
        );
        assert_eq!(reviser.calls.get(), 0);
        assert!(evaluator.revisions().is_empty());
    }

    #[test]
    fn test_revise_answer_delegates() {
        let mut evaluator = ConfidenceEvaluator::default();
        let reviser = FixedReviser::new(0.15);

        let outcome = evaluator.revise_answer(false, 0.0, &reviser, &goal());
        assert_eq!(outcome.confidence, 0.15);
        assert_eq!(outcome.explanation, "revised");
        assert_eq!(reviser.calls.get(), 1);

        let record = &evaluator.revisions().records()[0];
        assert_eq!(record.query, "philosopher(socrates)");
        assert_eq!(record.revised_confidence, Some(0.15));
        assert_eq!(record.successful, Some(true));

        let stats = evaluator.get_revision_stats();
        assert_eq!(stats.total_revisions, 1);
        assert_eq!(stats.successful_revisions, 1);
        assert_eq!(stats.success_rate, 1.0);
        assert!((stats.average_confidence_improvement - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_revise_answer_failure_keeps_answer() {
        let mut evaluator = ConfidenceEvaluator::default();

        let outcome = evaluator.revise_answer(false, 0.2, &FailingReviser, &goal());
        assert!(!outcome.truth);
        assert_eq!(outcome.confidence, 0.2);
        assert_eq!(outcome.explanation, "Revision failed: store offline");

        let stats = evaluator.get_revision_stats();
        assert_eq!(stats.total_revisions, 1);
        assert_eq!(stats.successful_revisions, 0);
        assert_eq!(stats.average_confidence_improvement, 0.0);
    }

    #[test]
    fn test_record_confidence_clamps() {
        let mut evaluator = ConfidenceEvaluator::default();
        evaluator.record_confidence(1.5);
        evaluator.record_confidence(-0.2);
        evaluator.record_confidence(0.85);
        assert_eq!(evaluator.history().scores(), &[1.0, 0.0, 0.85]);

        let stats = evaluator.get_confidence_stats();
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 1.0);
        assert_eq!(stats.median, 0.85);
    }

    #[test]
    fn test_explain_confidence_bands() {
        let evaluator = ConfidenceEvaluator::default();
        assert_eq!(evaluator.explain_confidence(0.95), "I am very confident in this answer.");
        assert_eq!(evaluator.explain_confidence(0.9), "I am very confident in this answer.");
        assert_eq!(
            evaluator.explain_confidence(0.7),
            "I am reasonably confident in this answer."
        );
        assert_eq!(ConfidenceBand::from_confidence(0.5), ConfidenceBand::Moderate);
        assert_eq!(ConfidenceBand::from_confidence(0.3), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::from_confidence(0.0), ConfidenceBand::VeryLow);
        assert_eq!(
            ConfidenceBand::VeryLow.to_string(),
            "I have very low confidence in this answer. It is likely incorrect or incomplete."
        );
    }

    proptest! {
        #[test]
        fn prop_confidence_in_unit_interval(
            factors in proptest::collection::vec(-100.0f64..100.0, 1..32)
        ) {
            let mut evaluator = ConfidenceEvaluator::default();
            let evidence = vec![(); factors.len()];
            let confidence = evaluator.evaluate_confidence(&evidence, &factors).unwrap();
            prop_assert!((0.0..=1.0).contains(&confidence));
        }
    }
}
