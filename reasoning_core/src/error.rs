//! Error types for the reasoning core.

use thiserror::Error;
use world_model::GraphError;

/// A clause was rejected by the resolution engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClauseError {
    #[error("syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("invalid {kind} name '{name}'")]
    InvalidName { kind: &'static str, name: String },

    #[error("atom '{0}' has no arguments")]
    NoArguments(String),

    #[error("expected a fact but got the rule '{0}'")]
    ExpectedFact(String),

    #[error("expected a rule but got the fact '{0}'")]
    ExpectedRule(String),
}

/// A goal was rejected by the resolution engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("syntax error in goal: {0}")]
    Syntax(String),

    #[error("malformed goal: {0}")]
    MalformedGoal(String),

    #[error("resolution exceeded the depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },
}

impl From<ClauseError> for QueryError {
    fn from(err: ClauseError) -> Self {
        match err {
            ClauseError::Syntax { .. } => QueryError::Syntax(err.to_string()),
            other => QueryError::MalformedGoal(other.to_string()),
        }
    }
}

/// Evidence handed to the confidence evaluator was inconsistent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("evidence and certainty factors must have the same length ({evidence} != {factors})")]
    LengthMismatch { evidence: usize, factors: usize },

    #[error("certainty factor at index {index} is not finite: {value}")]
    NonFiniteFactor { index: usize, value: f64 },
}

/// A reasoning collaborator failed while revising an answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RevisionError {
    #[error("query failed during revision: {0}")]
    Query(#[from] QueryError),

    #[error("{0}")]
    Collaborator(String),
}

/// New knowledge could not be mirrored into the stores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeAdditionError {
    #[error("the input is not a fact or relation")]
    NotKnowledge,

    #[error("knowledge store rejected the clause: {0}")]
    Clause(#[from] ClauseError),

    #[error("world model rejected the update: {0}")]
    Graph(#[from] GraphError),
}

/// Configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
