//! Knowledge Base module - the logical fact/rule store.
//!
//! The knowledge base consists of:
//! - **Atoms**: predicates applied to constants and variables
//! - **Clauses**: facts and rules, kept in assertion order
//! - **Resolution**: backward chaining that answers goals with bindings

mod clause;
mod parser;
mod resolution;
mod store;
mod term;

pub use clause::*;
pub use resolution::Binding;
pub use store::*;
pub use term::*;
