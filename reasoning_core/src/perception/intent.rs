//! Structured intents produced by parsing user input.

use serde::{Deserialize, Serialize};

use crate::knowledge_base::{Atom, Clause, Term};

/// Name of the variable a "who" question asks for.
pub const WHO_VARIABLE: &str = "X";

/// A question the reasoner can answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Question {
    /// "Is socrates mortal?"
    YesNo { subject: String, predicate: String },

    /// "Who is human?"
    Who { predicate: String },

    /// "What is socrates?"
    What { subject: String },
}

/// What the user meant by an input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    /// "socrates is human."
    Fact { subject: String, predicate: String },

    /// "socrates teaches plato."
    Relation {
        subject: String,
        verb: String,
        object: String,
    },

    Question(Question),

    /// Input no pattern recognised.
    Unknown { text: String },
}

impl Intent {
    pub fn fact(subject: impl Into<String>, predicate: impl Into<String>) -> Self {
        Intent::Fact {
            subject: subject.into(),
            predicate: predicate.into(),
        }
    }

    pub fn relation(
        subject: impl Into<String>,
        verb: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Intent::Relation {
            subject: subject.into(),
            verb: verb.into(),
            object: object.into(),
        }
    }

    pub fn yes_no(subject: impl Into<String>, predicate: impl Into<String>) -> Self {
        Intent::Question(Question::YesNo {
            subject: subject.into(),
            predicate: predicate.into(),
        })
    }

    pub fn who(predicate: impl Into<String>) -> Self {
        Intent::Question(Question::Who {
            predicate: predicate.into(),
        })
    }

    pub fn what(subject: impl Into<String>) -> Self {
        Intent::Question(Question::What {
            subject: subject.into(),
        })
    }

    pub fn unknown(text: impl Into<String>) -> Self {
        Intent::Unknown { text: text.into() }
    }

    /// Express the intent as a goal for the knowledge store.
    ///
    /// "What" questions would need a variable predicate and unknown input has
    /// nothing to ask, so both yield `None`.
    pub fn to_goal(&self) -> Option<Atom> {
        match self {
            Intent::Fact { subject, predicate }
            | Intent::Question(Question::YesNo { subject, predicate }) => Some(Atom::unary(
                predicate.as_str(),
                Term::constant(subject.as_str()),
            )),
            Intent::Relation {
                subject,
                verb,
                object,
            } => Some(Atom::binary(
                verb.as_str(),
                Term::constant(subject.as_str()),
                Term::constant(object.as_str()),
            )),
            Intent::Question(Question::Who { predicate }) => Some(Atom::unary(
                predicate.as_str(),
                Term::variable(WHO_VARIABLE),
            )),
            Intent::Question(Question::What { .. }) | Intent::Unknown { .. } => None,
        }
    }

    /// Express the intent as a fact to assert; only facts and relations can.
    pub fn to_clause(&self) -> Option<Clause> {
        if self.is_knowledge() {
            self.to_goal().map(Clause::fact)
        } else {
            None
        }
    }

    /// Check if this intent carries new knowledge.
    pub fn is_knowledge(&self) -> bool {
        matches!(self, Intent::Fact { .. } | Intent::Relation { .. })
    }
}
