//! # World Model
//!
//! The world model crate - a directed graph of named entities and labelled
//! relationships. It is queried independently of the logical knowledge store
//! and does not contain any inference logic; keeping the two in agreement is
//! the job of the reasoning orchestrator in `reasoning_core`.

pub mod entities;
pub mod error;
pub mod graph;
pub mod predicates;

pub use entities::*;
pub use error::*;
pub use graph::*;
pub use predicates::*;
