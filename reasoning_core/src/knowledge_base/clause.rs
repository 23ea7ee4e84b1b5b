//! Clause definitions - facts and rules stored in the knowledge base.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{parser, Atom};
use crate::ClauseError;

/// Unique identifier for stored clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClauseId(pub Uuid);

impl ClauseId {
    /// Create a new random clause ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClauseId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClauseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Horn clause: a fact when the body is empty, a rule otherwise.
///
/// The textual form (`human(socrates).`, `mortal(X) :- human(X).`) is what
/// lexical explanations search through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub id: ClauseId,
    pub head: Atom,
    pub body: Vec<Atom>,
}

impl Clause {
    /// Create a fact.
    pub fn fact(atom: Atom) -> Self {
        Self::from_parts(atom, Vec::new())
    }

    /// Create a rule `head :- body`.
    pub fn rule(head: Atom, body: impl IntoIterator<Item = Atom>) -> Self {
        Self::from_parts(head, body.into_iter().collect())
    }

    pub(crate) fn from_parts(head: Atom, body: Vec<Atom>) -> Self {
        Self {
            id: ClauseId::new(),
            head,
            body,
        }
    }

    /// Parse a clause from its textual form.
    pub fn parse(text: &str) -> Result<Self, ClauseError> {
        parser::parse_clause(text)
    }

    /// Check if this clause is a fact.
    pub fn is_fact(&self) -> bool {
        self.body.is_empty()
    }

    /// Check if this clause is a rule.
    pub fn is_rule(&self) -> bool {
        !self.body.is_empty()
    }

    /// Check if the clause text mentions `needle` anywhere.
    pub fn mentions(&self, needle: &str) -> bool {
        self.to_string().contains(needle)
    }

    /// Check that every atom of the clause is well formed.
    pub fn validate(&self) -> Result<(), ClauseError> {
        self.head.validate()?;
        self.body.iter().try_for_each(Atom::validate)
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.head)?;
        for (i, atom) in self.body.iter().enumerate() {
            f.write_str(if i == 0 { " :- " } else { ", " })?;
            write!(f, "{}", atom)?;
        }
        f.write_str(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge_base::Term;

    #[test]
    fn test_fact_display() {
        let fact = Clause::fact(Atom::binary(
            "teacher",
            Term::constant("socrates"),
            Term::constant("plato"),
        ));
        assert!(fact.is_fact());
        assert_eq!(fact.to_string(), "teacher(socrates, plato).");
    }

    #[test]
    fn test_rule_display() {
        let rule = Clause::rule(
            Atom::unary("philosopher", Term::variable("X")),
            [
                Atom::unary("human", Term::variable("X")),
                Atom::binary("teacher", Term::variable("X"), Term::variable("_")),
            ],
        );
        assert!(rule.is_rule());
        assert_eq!(
            rule.to_string(),
            "philosopher(X) :- human(X), teacher(X, _)."
        );
    }

    #[test]
    fn test_parse_display_agree() {
        let text = "student(X, Y) :- teacher(Y, X).";
        assert_eq!(Clause::parse(text).unwrap().to_string(), text);
    }

    #[test]
    fn test_mentions_is_lexical() {
        let rule = Clause::parse("mortal(X) :- human(X).").unwrap();
        assert!(rule.mentions("mortal"));
        assert!(rule.mentions("human"));
        assert!(rule.mentions("man"));
        assert!(!rule.mentions("philosopher"));
    }

    #[test]
    fn test_distinct_ids() {
        let a = Clause::parse("human(plato).").unwrap();
        let b = Clause::parse("human(plato).").unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.head, b.head);
    }
}
