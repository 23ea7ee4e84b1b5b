//! Entity and relationship definitions for the world model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::GraphError;

/// Free-form attributes attached to entities and relationships.
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// A named node in the world model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Entity {
    /// Create an entity with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
        }
    }

    /// Set a single attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Look up an attribute value.
    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }
}

/// A directed, labelled edge between two entities.
///
/// Values handed out by the graph are owned copies; mutating one never
/// touches the graph's own edge table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Relationship {
    /// Create a relationship with no attributes.
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            attributes: Attributes::new(),
        }
    }

    /// Replace the relationship attributes.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Reject names that would create an anonymous node.
pub(crate) fn validate_name(name: &str) -> Result<(), GraphError> {
    if name.trim().is_empty() {
        Err(GraphError::BlankEntityName)
    } else {
        Ok(())
    }
}
