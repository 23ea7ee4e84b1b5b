//! Predicates with a fixed meaning inside the world model.

use serde::{Deserialize, Serialize};

/// Predicates that classify an entity rather than relate two peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypePredicate {
    /// `socrates -[is_a]-> human`
    IsA,
    /// `socrates -[type]-> person`
    Type,
}

impl TypePredicate {
    /// All type predicates, in lookup order.
    pub const ALL: [TypePredicate; 2] = [TypePredicate::IsA, TypePredicate::Type];

    /// The edge label used in the graph.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypePredicate::IsA => "is_a",
            TypePredicate::Type => "type",
        }
    }

    /// Parse an edge label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == label)
    }
}

impl std::fmt::Display for TypePredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_predicate_labels() {
        assert_eq!(TypePredicate::IsA.as_str(), "is_a");
        assert_eq!(TypePredicate::Type.to_string(), "type");
    }

    #[test]
    fn test_from_label() {
        assert_eq!(TypePredicate::from_label("is_a"), Some(TypePredicate::IsA));
        assert_eq!(TypePredicate::from_label("type"), Some(TypePredicate::Type));
        assert_eq!(TypePredicate::from_label("teacher_of"), None);
        assert_eq!(TypePredicate::from_label("IS_A"), None);
    }
}
