//! Knowledge Store - asserts clauses and answers goals with a confidence
//! heuristic.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::resolution::Resolver;
use super::{Atom, Binding, Clause, ClauseId};
use crate::config::StoreConfig;
use crate::metacognition::Reviser;
use crate::{ClauseError, QueryError, RevisionError};

/// Confidence assigned to any proven goal before counting bindings.
pub const BASE_CONFIDENCE: f64 = 0.8;

/// Confidence added per binding of a proven goal.
pub const CONFIDENCE_PER_BINDING: f64 = 0.05;

/// Confidence added when revision finds related clauses.
pub const REVISION_BOOST: f64 = 0.15;

/// Result of reasoning about a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reasoning {
    pub truth: bool,
    /// Heuristic score, not a calibrated probability.
    pub confidence: f64,
    pub bindings: Vec<Binding>,
}

impl Reasoning {
    fn unproven() -> Self {
        Self {
            truth: false,
            confidence: 0.0,
            bindings: Vec::new(),
        }
    }
}

/// Result of revising the reasoning about a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    pub truth: bool,
    pub confidence: f64,
    pub explanation: String,
}

/// The logical knowledge store.
///
/// Clauses are append-only and kept in assertion order; asserting the same
/// clause twice stores it twice.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeStore {
    clauses: Vec<Clause>,
    config: StoreConfig,
}

impl KnowledgeStore {
    /// Create an empty store with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given settings.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            clauses: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Assert a fact.
    pub fn add_fact(&mut self, clause: Clause) -> Result<ClauseId, ClauseError> {
        if !clause.is_fact() {
            return Err(ClauseError::ExpectedFact(clause.to_string()));
        }
        self.assert_clause(clause)
    }

    /// Assert a rule.
    pub fn add_rule(&mut self, clause: Clause) -> Result<ClauseId, ClauseError> {
        if !clause.is_rule() {
            return Err(ClauseError::ExpectedRule(clause.to_string()));
        }
        self.assert_clause(clause)
    }

    /// Parse and assert a fact such as `human(socrates).`
    pub fn add_fact_text(&mut self, text: &str) -> Result<ClauseId, ClauseError> {
        self.add_fact(Clause::parse(text)?)
    }

    /// Parse and assert a rule such as `mortal(X) :- human(X).`
    pub fn add_rule_text(&mut self, text: &str) -> Result<ClauseId, ClauseError> {
        self.add_rule(Clause::parse(text)?)
    }

    fn assert_clause(&mut self, clause: Clause) -> Result<ClauseId, ClauseError> {
        clause.validate()?;
        let id = clause.id;
        debug!(clause = %clause, %id, "asserting clause");
        self.clauses.push(clause);
        Ok(id)
    }

    /// Run a goal against every clause.
    ///
    /// Unknown predicates simply have no solutions; a malformed goal is an
    /// error.
    pub fn query(&self, goal: &Atom) -> Result<Vec<Binding>, QueryError> {
        goal.validate()?;
        Resolver::new(&self.clauses, self.config.max_depth, self.config.max_solutions).solve(goal)
    }

    /// Parse and run a goal such as `mortal(X)`.
    pub fn query_text(&self, goal: &str) -> Result<Vec<Binding>, QueryError> {
        self.query(&Atom::parse(goal)?)
    }

    /// Decide a goal and score it.
    ///
    /// Confidence is `min(1, 0.8 + 0.05 * bindings)` for proven goals and
    /// zero otherwise. Query errors count as unproven.
    pub fn reason(&self, goal: &Atom) -> Reasoning {
        match self.query(goal) {
            Ok(bindings) if !bindings.is_empty() => {
                let confidence =
                    (BASE_CONFIDENCE + bindings.len() as f64 * CONFIDENCE_PER_BINDING).min(1.0);
                Reasoning {
                    truth: true,
                    confidence,
                    bindings,
                }
            }
            Ok(_) => Reasoning::unproven(),
            Err(err) => {
                warn!(goal = %goal, error = %err, "query rejected, treating goal as unproven");
                Reasoning::unproven()
            }
        }
    }

    /// Clauses whose text mentions the predicate name.
    pub fn related_clauses(&self, predicate: &str) -> Vec<&Clause> {
        self.clauses.iter().filter(|c| c.mentions(predicate)).collect()
    }

    /// Describe why a goal holds.
    ///
    /// This lists clauses that mention the goal's predicate; it is not a
    /// proof trace.
    pub fn explain(&self, goal: &Atom) -> String {
        let reasoning = self.reason(goal);

        if !reasoning.truth {
            return format!(
                "The query '{}' could not be proven based on the current knowledge base.",
                goal
            );
        }

        let mut explanation = format!(
            "The query '{}' is true with {} confidence.\n",
            goal,
            percent(reasoning.confidence)
        );
        explanation.push_str("This conclusion is based on the following facts and rules:\n");
        for clause in self.related_clauses(&goal.predicate) {
            explanation.push_str(&format!("- {}\n", clause));
        }
        explanation
    }

    /// Try to raise a low confidence by looking at related clauses.
    ///
    /// Below the store threshold, any clause mentioning the predicate earns a
    /// fixed `+0.15` boost (capped at 1). Otherwise the plain `reason` and
    /// `explain` output is returned.
    pub fn revise_reasoning(&self, goal: &Atom) -> Revision {
        let reasoning = self.reason(goal);

        if reasoning.confidence < self.config.confidence_threshold {
            let related = self.related_clauses(&goal.predicate);
            if !related.is_empty() {
                let revised = (reasoning.confidence + REVISION_BOOST).min(1.0);
                let mut explanation = format!(
                    "After revision, confidence increased from {} to {}.\n",
                    percent(reasoning.confidence),
                    percent(revised)
                );
                explanation.push_str("Revision considered these related facts and rules:\n");
                for clause in related {
                    explanation.push_str(&format!("- {}\n", clause));
                }

                debug!(goal = %goal, from = reasoning.confidence, to = revised, "revised reasoning");
                return Revision {
                    truth: reasoning.truth,
                    confidence: revised,
                    explanation,
                };
            }
        }

        Revision {
            truth: reasoning.truth,
            confidence: reasoning.confidence,
            explanation: self.explain(goal),
        }
    }

    /// All clauses in assertion order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Get the total number of clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Revision through the store fails for goals it could never resolve.
impl Reviser for KnowledgeStore {
    fn revise(&self, goal: &Atom) -> Result<Revision, RevisionError> {
        goal.validate().map_err(QueryError::from)?;
        Ok(self.revise_reasoning(goal))
    }
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}
