//! Reasoning Orchestrator - Routes input through the reasoning pipeline.
//!
//! Every input goes through the same stages:
//! 1. **Perception**: Parse text into an [`Intent`]
//! 2. **Reasoning**: Decide the goal against the knowledge store; "what"
//!    questions ask the world model instead
//! 3. **Revision**: Reconsider answers below the confidence threshold
//! 4. **Synthesis**: Phrase the answer and describe the confidence
//!
//! New facts and relations are asserted in the knowledge store and mirrored
//! into the world model so both keep describing the same world.

mod response;

pub use response::*;

use tracing::{debug, info, warn};
use world_model::{Entity, GraphSnapshot, SnapshotError, TypePredicate, WorldGraph};

use crate::config::ReasonerConfig;
use crate::knowledge_base::{Atom, Binding, ClauseId, KnowledgeStore};
use crate::metacognition::{ConfidenceEvaluator, ConfidenceStats, RevisionStats};
use crate::perception::{Intent, IntentParser, Question, TextParser, WHO_VARIABLE};
use crate::KnowledgeAdditionError;

const NOT_UNDERSTOOD: &str = "I don't understand the input.";
const NOT_PARSED: &str = "The input could not be parsed into a format that I can reason about.";
const GENERIC_ANSWER: &str = "I've processed your input, but I'm not sure how to respond.";
const NOT_KNOWLEDGE: &str =
    "The input does not appear to be a fact or relation that I can add to my knowledge base.";

const SEED_FACTS: &[&str] = &[
    "human(socrates).",
    "human(plato).",
    "human(aristotle).",
    "teacher(socrates, plato).",
    "teacher(plato, aristotle).",
];

const SEED_RULES: &[&str] = &[
    "mortal(X) :- human(X).",
    "student(X, Y) :- teacher(Y, X).",
    "philosopher(X) :- human(X), teacher(X, _).",
];

const SEED_ENTITIES: &[(&str, &str)] = &[
    ("socrates", "person"),
    ("plato", "person"),
    ("aristotle", "person"),
    ("human", "class"),
    ("mortal", "class"),
    ("philosopher", "class"),
];

const SEED_RELATIONSHIPS: &[(&str, &str, &str)] = &[
    ("socrates", "is_a", "human"),
    ("plato", "is_a", "human"),
    ("aristotle", "is_a", "human"),
    ("human", "is_a", "mortal"),
    ("socrates", "teacher_of", "plato"),
    ("plato", "teacher_of", "aristotle"),
    ("socrates", "is_a", "philosopher"),
    ("plato", "is_a", "philosopher"),
];

/// The reasoning pipeline and all of its state.
#[derive(Debug)]
pub struct Reasoner<P = TextParser> {
    parser: P,
    store: KnowledgeStore,
    world: WorldGraph,
    evaluator: ConfidenceEvaluator,
}

impl Reasoner<TextParser> {
    /// Create an empty reasoner using the default text parser.
    pub fn new(config: ReasonerConfig) -> Self {
        Self::with_parser(config, TextParser::new())
    }

    /// Create an empty reasoner with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ReasonerConfig::default())
    }
}

impl Default for Reasoner {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<P: IntentParser> Reasoner<P> {
    /// Create an empty reasoner that understands input through `parser`.
    pub fn with_parser(config: ReasonerConfig, parser: P) -> Self {
        Self {
            parser,
            store: KnowledgeStore::with_config(config.store),
            world: WorldGraph::new(),
            evaluator: ConfidenceEvaluator::new(config.confidence_threshold),
        }
    }

    /// Load the Socrates / Plato / Aristotle demo knowledge into both stores.
    /// A new reasoner starts empty; seeding is always explicit.
    pub fn seed_classical_knowledge(&mut self) -> Result<(), KnowledgeAdditionError> {
        for fact in SEED_FACTS {
            self.store.add_fact_text(fact)?;
        }
        for rule in SEED_RULES {
            self.store.add_rule_text(rule)?;
        }
        for (name, kind) in SEED_ENTITIES {
            self.world.insert_entity(typed(name, kind))?;
        }
        for (subject, predicate, object) in SEED_RELATIONSHIPS {
            self.world.add_relationship(*subject, *predicate, *object)?;
        }

        info!(
            clauses = self.store.len(),
            entities = self.world.entity_count(),
            relationships = self.world.relationship_count(),
            "Seeded classical knowledge"
        );
        Ok(())
    }

    /// Parse and answer a piece of text.
    pub fn process_input(&mut self, text: &str) -> Response {
        let intent = self.parser.parse(text);
        self.process_intent(&intent)
    }

    /// Answer an already parsed intent.
    pub fn process_intent(&mut self, intent: &Intent) -> Response {
        if let Intent::Question(Question::What { subject }) = intent {
            return self.describe(subject);
        }

        match intent.to_goal() {
            Some(goal) => self.answer(intent, &goal),
            None => self.respond(NOT_UNDERSTOOD.to_string(), 0.0, NOT_PARSED.to_string()),
        }
    }

    /// Parse a fact or relation and add it to both stores.
    pub fn add_knowledge(&mut self, text: &str) -> KnowledgeUpdate {
        let intent = self.parser.parse(text);
        self.add_labelled(&intent, text)
    }

    /// Add an already parsed fact or relation to both stores.
    pub fn add_intent_knowledge(&mut self, intent: &Intent) -> KnowledgeUpdate {
        let label = intent
            .to_clause()
            .map(|clause| clause.to_string())
            .unwrap_or_default();
        self.add_labelled(intent, &label)
    }

    pub fn get_confidence_stats(&self) -> ConfidenceStats {
        self.evaluator.get_confidence_stats()
    }

    pub fn get_revision_stats(&self) -> RevisionStats {
        self.evaluator.get_revision_stats()
    }

    /// Snapshot the world model.
    pub fn export_world(&self) -> GraphSnapshot {
        self.world.to_snapshot()
    }

    /// Replace the world model with a snapshot. The knowledge store is left
    /// as it is.
    pub fn import_world(&mut self, snapshot: GraphSnapshot) -> Result<(), SnapshotError> {
        self.world = WorldGraph::from_snapshot(snapshot)?;
        info!(
            entities = self.world.entity_count(),
            relationships = self.world.relationship_count(),
            "Imported world model"
        );
        Ok(())
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    pub fn world(&self) -> &WorldGraph {
        &self.world
    }

    pub fn evaluator(&self) -> &ConfidenceEvaluator {
        &self.evaluator
    }

    /// Decide a goal against the knowledge store, revising if needed.
    fn answer(&mut self, intent: &Intent, goal: &Atom) -> Response {
        let reasoning = self.store.reason(goal);
        let mut truth = reasoning.truth;
        let mut confidence = reasoning.confidence;
        let mut explanation = self.store.explain(goal);

        if self.evaluator.needs_revision(confidence) {
            let revision = self
                .evaluator
                .revise_answer(truth, confidence, &self.store, goal);
            truth = revision.truth;
            confidence = revision.confidence;
            explanation = revision.explanation;
        }

        self.evaluator.record_confidence(confidence);
        debug!(goal = %goal, truth, confidence, "Answered goal");

        let answer = synthesize(intent, truth, &reasoning.bindings);
        self.respond(answer, confidence, explanation)
    }

    /// Answer "what is <subject>?" from the world model.
    ///
    /// Each relationship of the subject counts as fully certain evidence.
    fn describe(&mut self, subject: &str) -> Response {
        let types = self.world.get_entity_types(subject);
        let relationships = self.world.get_relationships(subject);

        let factors = vec![1.0; relationships.len()];
        let confidence = self
            .evaluator
            .evaluate_confidence(&relationships, &factors)
            .unwrap_or_else(|e| {
                warn!(subject, error = %e, "Could not score world model evidence");
                0.0
            });

        let answer = if !types.is_empty() {
            let types: Vec<String> = types.into_iter().collect();
            format!("{subject} is a {}.", types.join(", "))
        } else if !relationships.is_empty() {
            let summary: Vec<String> = relationships
                .iter()
                .map(|rel| {
                    if rel.subject == subject {
                        format!("{} {}", rel.predicate, rel.object)
                    } else {
                        format!("is {} by {}", rel.predicate, rel.subject)
                    }
                })
                .collect();
            format!("{subject} {}.", summary.join(", "))
        } else {
            format!("I don't have any information about {subject}.")
        };

        let explanation = if relationships.is_empty() {
            format!("The world model has no information about '{subject}'.")
        } else {
            format!(
                "Found {} relationships involving '{}' in the world model.",
                relationships.len(),
                subject
            )
        };

        debug!(subject, confidence, "Described entity");
        self.respond(answer, confidence, explanation)
    }

    fn respond(&self, answer: String, confidence: f64, explanation: String) -> Response {
        Response {
            answer,
            confidence,
            explanation,
            confidence_explanation: self.evaluator.explain_confidence(confidence).to_string(),
        }
    }

    fn add_labelled(&mut self, intent: &Intent, label: &str) -> KnowledgeUpdate {
        match self.try_add(intent) {
            Ok(id) => {
                info!(clause = %id, knowledge = label, "Added knowledge");
                KnowledgeUpdate::added(label)
            }
            Err(KnowledgeAdditionError::NotKnowledge) => KnowledgeUpdate::rejected(NOT_KNOWLEDGE),
            Err(e) => {
                warn!(knowledge = label, error = %e, "Failed to add knowledge");
                KnowledgeUpdate::rejected(format!("Failed to add new knowledge: {e}"))
            }
        }
    }

    fn try_add(&mut self, intent: &Intent) -> Result<ClauseId, KnowledgeAdditionError> {
        let clause = intent
            .to_clause()
            .ok_or(KnowledgeAdditionError::NotKnowledge)?;
        let id = self.store.add_fact(clause)?;

        match intent {
            Intent::Fact { subject, predicate } => {
                self.world.insert_entity(typed(subject, "entity"))?;
                self.world.insert_entity(typed(predicate, "class"))?;
                self.world.add_relationship(
                    subject.as_str(),
                    TypePredicate::IsA.as_str(),
                    predicate.as_str(),
                )?;
            }
            Intent::Relation {
                subject,
                verb,
                object,
            } => {
                self.world.insert_entity(typed(subject, "entity"))?;
                self.world.insert_entity(typed(object, "entity"))?;
                self.world
                    .add_relationship(subject.as_str(), verb.as_str(), object.as_str())?;
            }
            Intent::Question(_) | Intent::Unknown { .. } => {}
        }

        Ok(id)
    }
}

fn typed(name: &str, kind: &str) -> Entity {
    Entity::new(name).with_attribute("type", kind)
}

fn synthesize(intent: &Intent, truth: bool, bindings: &[Binding]) -> String {
    match intent {
        Intent::Question(Question::YesNo { subject, predicate }) => {
            if truth {
                format!("Yes, {subject} is {predicate}.")
            } else {
                format!("No, {subject} is not {predicate} based on my knowledge.")
            }
        }
        Intent::Question(Question::Who { predicate }) => {
            let names: Vec<&str> = bindings
                .iter()
                .map(|binding| binding.get(WHO_VARIABLE).unwrap_or("unknown"))
                .collect();
            match names.as_slice() {
                [] => format!("I don't know of any entities that are {predicate}."),
                [only] => format!("{only} is {predicate}."),
                _ => format!(
                    "The following entities are {predicate}: {}.",
                    join_names(&names)
                ),
            }
        }
        _ => GENERIC_ANSWER.to_string(),
    }
}
