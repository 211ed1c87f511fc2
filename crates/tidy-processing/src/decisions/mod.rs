//! Instruction interpretation.
//!
//! Turns the user's free-text cleaning request into a [`CleaningDirective`].

mod rule_engine;

pub use rule_engine::RuleBasedInstructionParser;

use crate::types::CleaningDirective;

/// Trait for instruction parsers.
///
/// Implementations must never fail: text they do not understand leaves the
/// directive at its defaults.
pub trait DirectiveParser: Send + Sync {
    /// Parse instruction text into a directive.
    fn parse(&self, text: &str) -> CleaningDirective;
}

/// Parse an instruction with the default rule-based parser.
pub fn parse_instructions(text: &str) -> CleaningDirective {
    RuleBasedInstructionParser::new().parse(text)
}
