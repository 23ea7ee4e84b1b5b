//! Terms and atoms - the building blocks of clauses and goals.

use serde::{Deserialize, Serialize};

use super::parser;
use crate::ClauseError;

/// An argument of an atom.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// A concrete value such as `socrates` or `42`.
    Constant(String),

    /// A logic variable such as `X`. A bare `_` is anonymous.
    Variable(String),
}

impl Term {
    /// Create a constant term.
    pub fn constant(name: impl Into<String>) -> Self {
        Term::Constant(name.into())
    }

    /// Create a variable term.
    pub fn variable(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    /// Classify an identifier by its first character.
    pub fn from_identifier(name: impl Into<String>) -> Self {
        let name = name.into();
        if starts_variable(&name) {
            Term::Variable(name)
        } else {
            Term::Constant(name)
        }
    }

    /// Get the name of the constant or variable.
    pub fn name(&self) -> &str {
        match self {
            Term::Constant(name) | Term::Variable(name) => name,
        }
    }

    /// Check if this term is a variable.
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// Check if this is the anonymous variable `_`.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Term::Variable(name) if name == "_")
    }

    fn validate(&self) -> Result<(), ClauseError> {
        let valid = match self {
            Term::Constant(name) => is_constant_name(name),
            Term::Variable(name) => is_variable_name(name),
        };
        if valid {
            Ok(())
        } else {
            Err(ClauseError::InvalidName {
                kind: if self.is_variable() { "variable" } else { "constant" },
                name: self.name().to_string(),
            })
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A predicate applied to arguments, e.g. `teacher(socrates, X)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Atom {
    pub predicate: String,
    pub args: Vec<Term>,
}

impl Atom {
    /// Create an atom.
    pub fn new(predicate: impl Into<String>, args: impl IntoIterator<Item = Term>) -> Self {
        Self {
            predicate: predicate.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Create a one-argument atom.
    pub fn unary(predicate: impl Into<String>, arg: Term) -> Self {
        Self::new(predicate, [arg])
    }

    /// Create a two-argument atom.
    pub fn binary(predicate: impl Into<String>, first: Term, second: Term) -> Self {
        Self::new(predicate, [first, second])
    }

    /// Parse an atom from text such as `human(X)`. A trailing `.` is allowed.
    pub fn parse(text: &str) -> Result<Self, ClauseError> {
        let atom = parser::parse_goal(text)?;
        atom.validate()?;
        Ok(atom)
    }

    /// Number of arguments.
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Check if the atom contains no variables.
    pub fn is_ground(&self) -> bool {
        !self.args.iter().any(Term::is_variable)
    }

    /// Iterate over the named variables of the atom, skipping `_`.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.args
            .iter()
            .filter(|t| t.is_variable() && !t.is_anonymous())
            .map(Term::name)
    }

    /// Check that every name in the atom is well formed.
    pub fn validate(&self) -> Result<(), ClauseError> {
        if !is_constant_name(&self.predicate) || self.predicate.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(ClauseError::InvalidName {
                kind: "predicate",
                name: self.predicate.clone(),
            });
        }
        if self.args.is_empty() {
            return Err(ClauseError::NoArguments(self.predicate.clone()));
        }
        self.args.iter().try_for_each(Term::validate)
    }
}

impl std::fmt::Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.predicate)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}

pub(crate) fn starts_variable(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase() || c == '_')
}

fn is_identifier_tail(name: &str) -> bool {
    name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_constant_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit()) && is_identifier_tail(name)
}

fn is_variable_name(name: &str) -> bool {
    starts_variable(name) && is_identifier_tail(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_classification() {
        assert_eq!(Term::from_identifier("socrates"), Term::constant("socrates"));
        assert_eq!(Term::from_identifier("X"), Term::variable("X"));
        assert_eq!(Term::from_identifier("_"), Term::variable("_"));
        assert_eq!(Term::from_identifier("42"), Term::constant("42"));
        assert!(Term::variable("_").is_anonymous());
        assert!(!Term::variable("_Y").is_anonymous());
    }

    #[test]
    fn test_atom_display() {
        let atom = Atom::binary("teacher", Term::constant("socrates"), Term::variable("X"));
        assert_eq!(atom.to_string(), "teacher(socrates, X)");
        assert_eq!(atom.arity(), 2);
        assert!(!atom.is_ground());
        assert_eq!(atom.variables().collect::<Vec<_>>(), vec!["X"]);
    }

    #[test]
    fn test_atom_parse() {
        let atom = Atom::parse("human(X)").unwrap();
        assert_eq!(atom, Atom::unary("human", Term::variable("X")));

        let atom = Atom::parse(" teacher( socrates ,plato ). ").unwrap();
        assert!(atom.is_ground());
        assert_eq!(atom.to_string(), "teacher(socrates, plato)");
    }

    #[test]
    fn test_atom_validation() {
        let capitalised = Atom::unary("Human", Term::constant("socrates"));
        assert!(matches!(
            capitalised.validate(),
            Err(ClauseError::InvalidName { kind: "predicate", .. })
        ));

        let bad_constant = Atom::unary("human", Term::constant("Socrates"));
        assert!(matches!(
            bad_constant.validate(),
            Err(ClauseError::InvalidName { kind: "constant", .. })
        ));

        let spaced = Atom::unary("human", Term::constant("old man"));
        assert!(spaced.validate().is_err());

        let nullary = Atom::new("rain", Vec::new());
        assert_eq!(nullary.validate(), Err(ClauseError::NoArguments("rain".into())));
    }
}
