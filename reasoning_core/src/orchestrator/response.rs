//! Results handed back to callers of the reasoner.

use serde::{Deserialize, Serialize};

/// Answer to a processed input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub answer: String,
    pub confidence: f64,
    /// How the answer was reached.
    pub explanation: String,
    /// Qualitative reading of `confidence`.
    pub confidence_explanation: String,
}

/// Result of trying to add knowledge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeUpdate {
    pub success: bool,
    pub message: String,
}

impl KnowledgeUpdate {
    pub(crate) fn added(text: &str) -> Self {
        Self {
            success: true,
            message: format!("Successfully added new knowledge: {text}"),
        }
    }

    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Join names as "a, b and c".
pub(crate) fn join_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
