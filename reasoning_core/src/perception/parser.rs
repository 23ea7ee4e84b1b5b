//! Pattern-based intent parser.
//!
//! Understands a handful of sentence shapes:
//! - `<subject> is <predicate>.`
//! - `<subject> <verb> <object>.`
//! - `Is <subject> <predicate>?`
//! - `Who is <predicate>?`
//! - `What is <subject>?`

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::Intent;

/// Anything that can turn text into an intent.
pub trait IntentParser {
    fn parse(&self, text: &str) -> Intent;
}

/// Default parser backed by fixed regular expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextParser;

impl TextParser {
    pub fn new() -> Self {
        Self
    }
}

impl IntentParser for TextParser {
    fn parse(&self, text: &str) -> Intent {
        let text = text.trim();

        let intent = if let Some(caps) = FACT_PATTERN.captures(text) {
            Intent::fact(word(&caps[1]), word(&caps[2]))
        } else if let Some(caps) = RELATION_PATTERN.captures(text) {
            Intent::relation(word(&caps[1]), word(&caps[2]), word(&caps[3]))
        } else if let Some(caps) = YES_NO_PATTERN.captures(text) {
            Intent::yes_no(word(&caps[1]), word(&caps[2]))
        } else if let Some(caps) = WHO_PATTERN.captures(text) {
            Intent::who(word(&caps[1]))
        } else if let Some(caps) = WHAT_PATTERN.captures(text) {
            Intent::what(word(&caps[1]))
        } else {
            Intent::unknown(text)
        };

        debug!(input = text, ?intent, "Parsed input");
        intent
    }
}

impl<P: IntentParser + ?Sized> IntentParser for &P {
    fn parse(&self, text: &str) -> Intent {
        (**self).parse(text)
    }
}

fn word(text: &str) -> String {
    text.to_lowercase()
}

static FACT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)\s+is\s+([A-Za-z]+)\.$").expect("Invalid regex"));
static RELATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)\s+([A-Za-z]+)\s+([A-Za-z]+)\.$").expect("Invalid regex")
});
static YES_NO_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Is\s+([A-Za-z]+)\s+([A-Za-z]+)\?$").expect("Invalid regex"));
static WHO_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Who\s+is\s+([A-Za-z]+)\?$").expect("Invalid regex"));
static WHAT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^What\s+is\s+([A-Za-z]+)\?$").expect("Invalid regex"));
