//! World Graph - the directed entity/relationship store.

mod snapshot;

pub use snapshot::*;

use indexmap::IndexMap;
use std::collections::BTreeSet;
use tracing::debug;

use crate::entities::{validate_name, Attributes, Entity, Relationship};
use crate::predicates::TypePredicate;
use crate::GraphError;

/// Label and attributes stored on an edge.
#[derive(Debug, Clone, PartialEq)]
struct EdgeData {
    predicate: String,
    attributes: Attributes,
}

/// The world model graph.
///
/// Entities and edges are kept in insertion order so that scans and
/// snapshots are deterministic. There is at most one edge per ordered
/// `(subject, object)` pair: relating the same pair again replaces the
/// predicate and attributes of the existing edge in place.
#[derive(Debug, Clone, Default)]
pub struct WorldGraph {
    /// Entity name -> attributes.
    entities: IndexMap<String, Attributes>,

    /// (subject, object) -> edge data.
    edges: IndexMap<(String, String), EdgeData>,
}

impl WorldGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, or replace the attributes of an existing one.
    ///
    /// Attributes are not merged: the previous map is discarded.
    pub fn add_entity(
        &mut self,
        name: impl Into<String>,
        attributes: Attributes,
    ) -> Result<(), GraphError> {
        let name = name.into();
        validate_name(&name)?;

        debug!(entity = %name, attributes = attributes.len(), "registering entity");
        self.entities.insert(name, attributes);
        Ok(())
    }

    /// Add a prepared entity value.
    pub fn insert_entity(&mut self, entity: Entity) -> Result<(), GraphError> {
        self.add_entity(entity.name, entity.attributes)
    }

    /// Relate two entities with no edge attributes.
    pub fn add_relationship(
        &mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Result<(), GraphError> {
        self.add_relationship_with(subject, predicate, object, Attributes::new())
    }

    /// Relate two entities, creating missing endpoints with empty attributes.
    pub fn add_relationship_with(
        &mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
        attributes: Attributes,
    ) -> Result<(), GraphError> {
        let subject = subject.into();
        let predicate = predicate.into();
        let object = object.into();

        validate_name(&subject)?;
        validate_name(&object)?;
        if predicate.trim().is_empty() {
            return Err(GraphError::BlankPredicate { subject, object });
        }

        // Existing endpoints keep their attributes
        for endpoint in [&subject, &object] {
            if !self.entities.contains_key(endpoint) {
                self.entities.insert(endpoint.clone(), Attributes::new());
            }
        }

        debug!(%subject, %predicate, %object, "relating entities");
        self.edges.insert(
            (subject, object),
            EdgeData {
                predicate,
                attributes,
            },
        );
        Ok(())
    }

    /// Add a prepared relationship value.
    pub fn insert_relationship(&mut self, relationship: Relationship) -> Result<(), GraphError> {
        self.add_relationship_with(
            relationship.subject,
            relationship.predicate,
            relationship.object,
            relationship.attributes,
        )
    }

    /// Check if an entity exists.
    pub fn has_entity(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// Get the attributes of an entity.
    pub fn entity_attributes(&self, name: &str) -> Option<&Attributes> {
        self.entities.get(name)
    }

    /// Get an entity as an owned value.
    pub fn get_entity(&self, name: &str) -> Option<Entity> {
        self.entities.get_key_value(name).map(|(name, attributes)| Entity {
            name: name.clone(),
            attributes: attributes.clone(),
        })
    }

    /// Get all relationships involving an entity: outgoing edges first,
    /// then incoming ones.
    pub fn get_relationships(&self, entity: &str) -> Vec<Relationship> {
        let outgoing = self
            .edges
            .iter()
            .filter(|((subject, _), _)| subject == entity);
        let incoming = self
            .edges
            .iter()
            .filter(|((_, object), _)| object == entity);

        outgoing
            .chain(incoming)
            .map(|(key, edge)| materialize(key, edge))
            .collect()
    }

    /// Find relationships matching a pattern. `None` matches anything.
    pub fn query_relationship(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
    ) -> Vec<Relationship> {
        self.edges
            .iter()
            .filter(|((s, o), edge)| {
                subject.map_or(true, |subject| s == subject)
                    && predicate.map_or(true, |predicate| edge.predicate == predicate)
                    && object.map_or(true, |object| o == object)
            })
            .map(|(key, edge)| materialize(key, edge))
            .collect()
    }

    /// Get the classes an entity belongs to via `is_a` or `type` edges.
    pub fn get_entity_types(&self, entity: &str) -> BTreeSet<String> {
        self.type_edges()
            .filter(|(subject, _)| *subject == entity)
            .map(|(_, object)| object.to_string())
            .collect()
    }

    /// Get all entities classified under a type via `is_a` or `type` edges.
    pub fn get_entities_of_type(&self, type_name: &str) -> Vec<String> {
        self.type_edges()
            .filter(|(_, object)| *object == type_name)
            .map(|(subject, _)| subject.to_string())
            .collect()
    }

    /// `(subject, object)` pairs of every classifying edge, in insertion order.
    fn type_edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges
            .iter()
            .filter(|(_, edge)| TypePredicate::from_label(&edge.predicate).is_some())
            .map(|((subject, object), _)| (subject.as_str(), object.as_str()))
    }

    /// Get all entities whose attribute `key` equals `value`.
    pub fn entities_by_attribute(&self, key: &str, value: &serde_json::Value) -> Vec<String> {
        self.entities
            .iter()
            .filter(|(_, attributes)| attributes.get(key) == Some(value))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Iterate over entities in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = (&str, &Attributes)> {
        self.entities
            .iter()
            .map(|(name, attributes)| (name.as_str(), attributes))
    }

    /// Iterate over relationships in insertion order.
    pub fn relationships(&self) -> impl Iterator<Item = Relationship> + '_ {
        self.edges.iter().map(|(key, edge)| materialize(key, edge))
    }

    /// Get the total number of entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Get the total number of relationships.
    pub fn relationship_count(&self) -> usize {
        self.edges.len()
    }
}

fn materialize((subject, object): &(String, String), edge: &EdgeData) -> Relationship {
    Relationship {
        subject: subject.clone(),
        predicate: edge.predicate.clone(),
        object: object.clone(),
        attributes: edge.attributes.clone(),
    }
}
