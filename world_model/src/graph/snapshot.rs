//! Snapshot export and reconstruction of a world graph.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::WorldGraph;
use crate::entities::{Attributes, Relationship};
use crate::SnapshotError;

/// A structured, serializable image of a [`WorldGraph`].
///
/// This is the only persisted-state layout of the world model. The order of
/// `relationships` carries no meaning when rebuilding.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Entity name -> attributes.
    pub entities: BTreeMap<String, Attributes>,

    /// Every edge of the graph.
    pub relationships: Vec<Relationship>,
}

impl GraphSnapshot {
    /// Serialize the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl WorldGraph {
    /// Export the graph.
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            entities: self
                .entities()
                .map(|(name, attributes)| (name.to_string(), attributes.clone()))
                .collect(),
            relationships: self.relationships().collect(),
        }
    }

    /// Rebuild a graph from a snapshot: entities first, then relationships.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self, SnapshotError> {
        let mut graph = WorldGraph::new();

        for (name, attributes) in snapshot.entities {
            graph.add_entity(name, attributes)?;
        }
        for relationship in snapshot.relationships {
            graph.insert_relationship(relationship)?;
        }

        debug!(
            entities = graph.entity_count(),
            relationships = graph.relationship_count(),
            "rebuilt world graph from snapshot"
        );
        Ok(graph)
    }

    /// Export the graph as JSON text.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        self.to_snapshot().to_json()
    }

    /// Rebuild a graph from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Self::from_snapshot(GraphSnapshot::from_json(json)?)
    }
}
