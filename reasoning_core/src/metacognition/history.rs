//! Running confidence and revision histories.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for revision attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevisionId(pub Uuid);

impl RevisionId {
    /// Create a new random revision ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RevisionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RevisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Summary statistics over recorded confidence scores.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfidenceStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation.
    pub std: f64,
}

/// Insertion-ordered record of every evaluated confidence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfidenceHistory {
    scores: Vec<f64>,
}

impl ConfidenceHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a score.
    pub fn record(&mut self, confidence: f64) {
        self.scores.push(confidence);
    }

    /// All scores in recording order.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Compute summary statistics; all zero when nothing was recorded.
    pub fn stats(&self) -> ConfidenceStats {
        if self.scores.is_empty() {
            return ConfidenceStats::default();
        }

        let n = self.scores.len() as f64;
        let mean = self.scores.iter().sum::<f64>() / n;
        let variance = self.scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

        let mut sorted = self.scores.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        ConfidenceStats {
            mean,
            median,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            std: variance.sqrt(),
        }
    }
}

/// One attempt to revise a low-confidence answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionRecord {
    pub id: RevisionId,
    pub original_confidence: f64,
    pub query: String,
    /// Filled in once the reviser answered.
    pub revised_confidence: Option<f64>,
    /// Whether the revised confidence strictly improved.
    pub successful: Option<bool>,
}

impl RevisionRecord {
    /// Start a record for a revision attempt.
    pub fn new(original_confidence: f64, query: impl Into<String>) -> Self {
        Self {
            id: RevisionId::new(),
            original_confidence,
            query: query.into(),
            revised_confidence: None,
            successful: None,
        }
    }

    /// Record the outcome of the attempt.
    pub fn complete(&mut self, revised_confidence: f64) {
        self.revised_confidence = Some(revised_confidence);
        self.successful = Some(revised_confidence > self.original_confidence);
    }

    /// Confidence change, when the attempt completed.
    pub fn improvement(&self) -> Option<f64> {
        self.revised_confidence
            .map(|revised| revised - self.original_confidence)
    }
}

/// Summary statistics over revision attempts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RevisionStats {
    pub total_revisions: usize,
    pub successful_revisions: usize,
    pub success_rate: f64,
    pub average_confidence_improvement: f64,
}

/// Insertion-ordered record of every revision attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevisionLog {
    records: Vec<RevisionRecord>,
}

impl RevisionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new record and return a handle to fill in its outcome.
    pub fn begin(&mut self, original_confidence: f64, query: impl Into<String>) -> &mut RevisionRecord {
        self.records.push(RevisionRecord::new(original_confidence, query));
        let last = self.records.len() - 1;
        &mut self.records[last]
    }

    /// All records in attempt order.
    pub fn records(&self) -> &[RevisionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Compute summary statistics; all zero when nothing was attempted.
    pub fn stats(&self) -> RevisionStats {
        let total = self.records.len();
        if total == 0 {
            return RevisionStats::default();
        }

        let successful = self
            .records
            .iter()
            .filter(|r| r.successful == Some(true))
            .count();
        let improvements: Vec<f64> = self.records.iter().filter_map(RevisionRecord::improvement).collect();
        let average = if improvements.is_empty() {
            0.0
        } else {
            improvements.iter().sum::<f64>() / improvements.len() as f64
        };

        RevisionStats {
            total_revisions: total,
            successful_revisions: successful,
            success_rate: successful as f64 / total as f64,
            average_confidence_improvement: average,
        }
    }
}
