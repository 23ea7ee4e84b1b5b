//! # Reasoning Core
//!
//! Question answering over a small logical knowledge base. This crate owns
//! the knowledge store and its resolution engine, judges the confidence of
//! every answer, and keeps the `world_model` graph in step with what it
//! learns.
//!
//! ## Core Components
//!
//! - **knowledge_base**: Horn clauses and depth-first SLD resolution
//! - **metacognition**: Confidence scoring, revision gating and statistics
//! - **perception**: Text to intent parsing
//! - **orchestrator**: The `Reasoner` pipeline tying everything together
//! - **config**: TOML-backed settings
//!
//! ## Usage
//!
//! ```
//! use reasoning_core::Reasoner;
//!
//! let mut reasoner = Reasoner::with_defaults();
//! reasoner.seed_classical_knowledge().unwrap();
//!
//! let response = reasoner.process_input("Is Socrates mortal?");
//! assert_eq!(response.answer, "Yes, socrates is mortal.");
//! ```

pub mod config;
pub mod error;
pub mod knowledge_base;
pub mod metacognition;
pub mod orchestrator;
pub mod perception;

pub use config::*;
pub use error::*;
pub use knowledge_base::*;
pub use metacognition::*;
pub use orchestrator::*;
pub use perception::*;
