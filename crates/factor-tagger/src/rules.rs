//! Tag and lemma normalization.
//!
//! Tag rules run in a fixed order and each sees the tag left by the rules
//! before it. The stem rule runs afterwards against the tag the tagger
//! originally assigned.

use std::sync::Arc;

use tagger_morph::AdjFormLexicon;
use tagger_types::{CHINESE_SENTENCE_FINAL, Degree, Language};

use crate::config::PolicyConfig;

/// Result of normalizing one `(word, tag)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub tag: String,
    /// Dictionary base form replacing the computed lemma, if any.
    pub stem: Option<String>,
}

/// A tag rewrite: `None` leaves the tag untouched.
pub type TagRule = fn(word: &str, tag: &str, policy: &PolicyConfig) -> Option<String>;

/// Tag rules in application order.
pub const TAG_RULES: [(&str, TagRule); 3] = [
    ("common-noun", common_noun_rule),
    ("verb", verb_rule),
    ("chinese-sentence-final", chinese_sentence_final_rule),
];

fn common_noun_rule(_word: &str, tag: &str, policy: &PolicyConfig) -> Option<String> {
    (policy.normalize_nouns && tag.starts_with("NN")).then(|| "NN".to_string())
}

fn verb_rule(_word: &str, tag: &str, policy: &PolicyConfig) -> Option<String> {
    (policy.normalize_verbs && (tag == "VBP" || tag == "VBZ")).then(|| "VB".to_string())
}

fn chinese_sentence_final_rule(word: &str, tag: &str, policy: &PolicyConfig) -> Option<String> {
    (policy.language == Language::Chinese
        && tag.starts_with("PU")
        && CHINESE_SENTENCE_FINAL.contains(&word))
    .then(|| word.to_string())
}

/// Policy-driven normalizer shared by the flat and tree taggers.
#[derive(Debug, Clone)]
pub struct NormalizationRules {
    policy: Arc<PolicyConfig>,
    lexicon: Arc<AdjFormLexicon>,
}

impl NormalizationRules {
    pub fn new(policy: Arc<PolicyConfig>, lexicon: Arc<AdjFormLexicon>) -> Self {
        Self { policy, lexicon }
    }

    pub fn normalize(&self, word: &str, tag: &str) -> Normalized {
        Normalized {
            tag: self.rewrite_tag(word, tag),
            stem: self.stem_override(word, tag).map(str::to_string),
        }
    }

    /// Run every tag rule in order, threading the rewritten tag through.
    pub fn rewrite_tag(&self, word: &str, tag: &str) -> String {
        let mut current = tag.to_string();
        for (_, rule) in TAG_RULES {
            if let Some(rewritten) = rule(word, &current, &self.policy) {
                current = rewritten;
            }
        }
        current
    }

    /// Base form for irregular comparatives/superlatives, keyed on the original tag.
    pub fn stem_override(&self, word: &str, original_tag: &str) -> Option<&str> {
        if !self.policy.normalize_comparatives {
            return None;
        }
        let degree = Degree::from_penn(original_tag)?;
        self.lexicon.base_form(degree, word)
    }
}
