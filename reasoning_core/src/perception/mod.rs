//! Perception - Turns raw input text into structured intents.

mod intent;
mod parser;

pub use intent::*;
pub use parser::*;
