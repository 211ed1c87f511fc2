//! Rule-based instruction parser using fixed phrase spotting.

use super::DirectiveParser;
use crate::types::{CleaningDirective, ColumnRole, DedupStrategy, SortKey};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// `fill missing with <words>`; the words end at a separator, a sentence end,
/// or a following `and` / `then` clause.
static FILL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"fill (?:missing|empty)(?: values)? with (.+?)(?:\s+(?:and|then)\s|[,;\n]|\.(?:\s|$)|$)",
    )
    .expect("Invalid regex: fill instruction")
});

/// Lowercased instruction text alongside the original.
///
/// Lowercasing can change a character's byte length, so `origins` maps every
/// byte offset of `lowered` (plus its end) to the offset of the original
/// character it came from.
struct Instruction<'a> {
    original: &'a str,
    lowered: String,
    origins: Vec<usize>,
}

impl<'a> Instruction<'a> {
    fn new(original: &'a str) -> Self {
        let mut lowered = String::with_capacity(original.len());
        let mut origins = Vec::with_capacity(original.len() + 1);
        for (offset, c) in original.char_indices() {
            for lower in c.to_lowercase() {
                lowered.push(lower);
            }
            origins.resize(lowered.len(), offset);
        }
        origins.push(original.len());

        Self {
            original,
            lowered,
            origins,
        }
    }

    fn mentions(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|phrase| self.lowered.contains(phrase))
    }

    /// Text captured by the fill pattern, in its original case.
    fn fill_words(&self) -> Option<&str> {
        let captures = FILL_PATTERN.captures(&self.lowered)?;
        let group = captures.get(1)?;
        let words = self
            .origins
            .get(group.start())
            .zip(self.origins.get(group.end()))
            .and_then(|(&start, &end)| self.original.get(start..end))
            .unwrap_or_else(|| group.as_str());
        let words = words.trim().trim_matches(['"', '\'']).trim();
        (!words.is_empty()).then_some(words)
    }
}

/// Map the fill words onto a fill value. Keywords are recognised in any case.
fn resolve_fill_value(words: &str) -> String {
    match words.to_lowercase().as_str() {
        "blank" | "empty" | "nothing" => String::new(),
        "unknown" => "Unknown".to_string(),
        "n/a" | "na" => "N/A".to_string(),
        _ => words.to_string(),
    }
}

#[derive(Debug, Clone, Copy)]
enum Predicate {
    /// Any of the phrases occurs in the lowercased text.
    AnyOf(&'static [&'static str]),
    /// The fill pattern matches with non-empty words.
    FillPattern,
}

#[derive(Debug, Clone, Copy)]
enum Effect {
    FillWith(&'static str),
    FillWithCapturedWords,
    SortBy(SortKey),
    FilterEmpty(ColumnRole),
    KeepCompleteRows,
    DedupBy(DedupStrategy),
}

#[derive(Debug)]
struct Rule {
    predicate: Predicate,
    effect: Effect,
}

impl Rule {
    /// Apply the rule when its predicate holds. Returns whether it fired.
    fn apply(&self, instruction: &Instruction<'_>, directive: &mut CleaningDirective) -> bool {
        let captured = match self.predicate {
            Predicate::AnyOf(phrases) => {
                if !instruction.mentions(phrases) {
                    return false;
                }
                None
            }
            Predicate::FillPattern => match instruction.fill_words() {
                Some(words) => Some(words),
                None => return false,
            },
        };

        match self.effect {
            Effect::FillWith(value) => directive.fill_value = value.to_string(),
            Effect::FillWithCapturedWords => {
                directive.fill_value = captured.map(resolve_fill_value).unwrap_or_default()
            }
            Effect::SortBy(key) => directive.sort_key = Some(key),
            Effect::FilterEmpty(role) => directive.add_filter(role),
            Effect::KeepCompleteRows => directive.keep_only_complete_rows = true,
            Effect::DedupBy(strategy) => directive.dedup_strategy = strategy,
        }
        debug!("Instruction rule fired: {:?}", self.effect);
        true
    }
}

/// How the rules of a group combine.
#[derive(Debug)]
enum RuleGroup {
    /// Only the first rule whose predicate holds takes effect.
    FirstMatch(&'static [Rule]),
    /// Every rule whose predicate holds takes effect.
    Cumulative(&'static [Rule]),
}

const FILL_RULES: &[Rule] = &[
    Rule {
        predicate: Predicate::FillPattern,
        effect: Effect::FillWithCapturedWords,
    },
    Rule {
        predicate: Predicate::AnyOf(&["fill missing with unknown"]),
        effect: Effect::FillWith("Unknown"),
    },
    Rule {
        predicate: Predicate::AnyOf(&["fill missing with blank", "leave empty"]),
        effect: Effect::FillWith(""),
    },
];

const SORT_RULES: &[Rule] = &[
    Rule {
        predicate: Predicate::AnyOf(&["sort by age", "order by age"]),
        effect: Effect::SortBy(SortKey::Age),
    },
    Rule {
        predicate: Predicate::AnyOf(&["sort by name", "order by name", "alphabetical"]),
        effect: Effect::SortBy(SortKey::Name),
    },
];

const FILTER_RULES: &[Rule] = &[
    Rule {
        predicate: Predicate::AnyOf(&["remove rows where email is empty", "delete empty emails"]),
        effect: Effect::FilterEmpty(ColumnRole::Email),
    },
    Rule {
        predicate: Predicate::AnyOf(&["remove rows where phone is empty", "delete empty phones"]),
        effect: Effect::FilterEmpty(ColumnRole::Phone),
    },
    Rule {
        predicate: Predicate::AnyOf(&["remove rows where name is empty", "delete empty names"]),
        effect: Effect::FilterEmpty(ColumnRole::Name),
    },
];

const COMPLETENESS_RULES: &[Rule] = &[Rule {
    predicate: Predicate::AnyOf(&[
        "only complete rows",
        "complete data only",
        "no empty fields",
        "no missing data",
    ]),
    effect: Effect::KeepCompleteRows,
}];

const DEDUP_RULES: &[Rule] = &[
    Rule {
        predicate: Predicate::AnyOf(&["dedup by phone", "dedupe by phone", "remove duplicate phones"]),
        effect: Effect::DedupBy(DedupStrategy::Phone),
    },
    Rule {
        predicate: Predicate::AnyOf(&[
            "dedup by name and email",
            "dedupe by name and email",
            "remove duplicates by name+email",
        ]),
        effect: Effect::DedupBy(DedupStrategy::NameEmail),
    },
    Rule {
        predicate: Predicate::AnyOf(&[
            "dedup by name and phone",
            "dedupe by name and phone",
            "remove duplicates by name+phone",
        ]),
        effect: Effect::DedupBy(DedupStrategy::NamePhone),
    },
    Rule {
        predicate: Predicate::AnyOf(&["remove all duplicates", "dedup everything"]),
        effect: Effect::DedupBy(DedupStrategy::AllColumns),
    },
];

const RULES: &[RuleGroup] = &[
    RuleGroup::FirstMatch(FILL_RULES),
    RuleGroup::FirstMatch(SORT_RULES),
    RuleGroup::Cumulative(FILTER_RULES),
    RuleGroup::Cumulative(COMPLETENESS_RULES),
    RuleGroup::FirstMatch(DEDUP_RULES),
];

/// Instruction parser built on an ordered list of `(predicate, effect)` rules.
///
/// Unrecognized text leaves the corresponding directive fields at their
/// defaults; parsing never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedInstructionParser;

impl RuleBasedInstructionParser {
    pub fn new() -> Self {
        Self
    }
}

impl DirectiveParser for RuleBasedInstructionParser {
    fn parse(&self, text: &str) -> CleaningDirective {
        let mut directive = CleaningDirective::default();
        if text.trim().is_empty() {
            return directive;
        }

        let instruction = Instruction::new(text);
        for group in RULES {
            match group {
                RuleGroup::FirstMatch(rules) => {
                    for rule in *rules {
                        if rule.apply(&instruction, &mut directive) {
                            break;
                        }
                    }
                }
                RuleGroup::Cumulative(rules) => {
                    for rule in *rules {
                        rule.apply(&instruction, &mut directive);
                    }
                }
            }
        }

        directive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> CleaningDirective {
        RuleBasedInstructionParser::new().parse(text)
    }

    #[test]
    fn test_empty_text_gives_default() {
        assert_eq!(parse(""), CleaningDirective::default());
        assert_eq!(parse("   "), CleaningDirective::default());
    }

    #[test]
    fn test_unrecognized_text_gives_default() {
        assert_eq!(parse("make it nice please"), CleaningDirective::default());
    }

    #[test]
    fn test_phone_dedup_with_blank_fill() {
        let directive = parse("Remove duplicate phones and fill empty with blank");
        assert_eq!(directive.dedup_strategy, DedupStrategy::Phone);
        assert_eq!(directive.fill_value, "");
    }

    #[test]
    fn test_fill_words_keep_original_case() {
        assert_eq!(parse("Fill missing with TBD").fill_value, "TBD");
        assert_eq!(
            parse("fill missing values with Not Given, then sort by age").fill_value,
            "Not Given"
        );
        assert_eq!(parse("fill empty with 'pending'.").fill_value, "pending");
    }

    #[test]
    fn test_fill_words_after_case_changing_characters() {
        // Kelvin sign shrinks and dotted capital I grows when lowercased.
        assert_eq!(
            parse("\u{212A}fill missing with Bob, \u{0130}\u{0130}").fill_value,
            "Bob"
        );
        assert_eq!(
            parse("\u{1E9E}TRASSE: fill missing with Übergabe").fill_value,
            "Übergabe"
        );
        assert_eq!(
            parse("\u{0130} fill missing with Ärger and sort by name").fill_value,
            "Ärger"
        );
    }

    #[test]
    fn test_fill_keywords() {
        assert_eq!(parse("fill missing with unknown").fill_value, "Unknown");
        assert_eq!(parse("Fill missing with N/A and dedup by phone").fill_value, "N/A");
        assert_eq!(parse("fill empty values with nothing").fill_value, "");
        assert_eq!(parse("please leave empty cells alone").fill_value, "");
    }

    #[test]
    fn test_sort_key_priority() {
        assert_eq!(parse("sort by age").sort_key, Some(SortKey::Age));
        assert_eq!(parse("Order by name").sort_key, Some(SortKey::Name));
        assert_eq!(
            parse("clean everything and sort alphabetically").sort_key,
            Some(SortKey::Name)
        );
        assert_eq!(
            parse("sort by name, or order by age").sort_key,
            Some(SortKey::Age)
        );
    }

    #[test]
    fn test_filters_are_cumulative() {
        let directive =
            parse("delete empty phones and remove rows where email is empty, delete empty names");
        assert_eq!(
            directive.filter_empty_columns,
            vec![ColumnRole::Email, ColumnRole::Phone, ColumnRole::Name]
        );
    }

    #[test]
    fn test_complete_rows_phrases() {
        for text in [
            "only complete rows",
            "complete data only",
            "No empty fields",
            "Only complete rows with no missing data",
        ] {
            assert!(parse(text).keep_only_complete_rows, "{}", text);
        }
        assert!(!parse("complete the data").keep_only_complete_rows);
    }

    #[test]
    fn test_dedup_strategies() {
        assert_eq!(parse("dedupe by phone").dedup_strategy, DedupStrategy::Phone);
        assert_eq!(
            parse("dedup by name and email").dedup_strategy,
            DedupStrategy::NameEmail
        );
        assert_eq!(
            parse("remove duplicates by name+phone").dedup_strategy,
            DedupStrategy::NamePhone
        );
        assert_eq!(
            parse("dedup everything").dedup_strategy,
            DedupStrategy::AllColumns
        );
        assert_eq!(parse("remove duplicates").dedup_strategy, DedupStrategy::Email);
    }

    #[test]
    fn test_dedup_phone_wins_over_all_columns() {
        let directive = parse("remove all duplicates, dedup by phone");
        assert_eq!(directive.dedup_strategy, DedupStrategy::Phone);
    }

    #[test]
    fn test_normalization_flags_not_settable_from_text() {
        let directive = parse("don't normalize email or phone");
        assert!(directive.normalize_email);
        assert!(directive.normalize_phone);
    }
}
