//! Error types for the world model.

use thiserror::Error;

/// Errors raised while mutating the graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("entity name must not be blank")]
    BlankEntityName,

    #[error("relationship predicate between '{subject}' and '{object}' must not be blank")]
    BlankPredicate { subject: String, object: String },
}

/// Errors raised while exporting or rebuilding a graph snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot contains an invalid graph element: {0}")]
    Graph(#[from] GraphError),
}
