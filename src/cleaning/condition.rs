use crate::models::Condition;
use std::collections::{BTreeMap, HashMap};

/// Reverb's standard grades; configured phrases are layered on top
pub fn default_phrases() -> BTreeMap<String, Condition> {
    [
        ("brand new", Condition::BrandNew),
        ("new", Condition::BrandNew),
        ("mint", Condition::Mint),
        ("like new", Condition::Mint),
        ("excellent", Condition::Excellent),
        ("b stock", Condition::Excellent),
        ("very good", Condition::VeryGood),
        ("good", Condition::Good),
        ("fair", Condition::Fair),
        ("poor", Condition::Poor),
        ("non functioning", Condition::NonFunctioning),
        ("not functioning", Condition::NonFunctioning),
        ("for parts", Condition::NonFunctioning),
    ]
    .into_iter()
    .map(|(phrase, condition)| (phrase.to_string(), condition))
    .collect()
}

/// Lowercase, treat `-`/`_` as spaces, collapse runs of whitespace
pub fn normalize_phrase(text: &str) -> String {
    text.to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compiled phrase lookup: the default grades plus any configured phrases,
/// which win when both normalize to the same key
#[derive(Debug, Clone)]
pub struct ConditionTable {
    phrases: HashMap<String, Condition>,
}

impl ConditionTable {
    pub fn new(overrides: &BTreeMap<String, Condition>) -> Self {
        let mut phrases = HashMap::new();
        for (phrase, condition) in default_phrases().iter().chain(overrides) {
            phrases.insert(normalize_phrase(phrase), *condition);
        }
        Self { phrases }
    }

    /// Exact match on the normalized phrase; anything else is `Unknown`
    pub fn normalize(&self, text: &str) -> Condition {
        self.phrases
            .get(&normalize_phrase(text))
            .copied()
            .unwrap_or_default()
    }
}

impl Default for ConditionTable {
    fn default() -> Self {
        Self::new(&BTreeMap::new())
    }
}
