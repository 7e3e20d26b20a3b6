use std::collections::HashMap;
use std::path::Path;

use tagger_types::Language;
use tracing::debug;

use crate::model::{ModelError, PosTagger, read_pairs};

/// Closed-class English words the heuristics would otherwise get wrong.
const ENGLISH_CLOSED_CLASS: &[(&str, &str)] = &[
    ("a", "DT"),
    ("an", "DT"),
    ("the", "DT"),
    ("this", "DT"),
    ("that", "DT"),
    ("these", "DT"),
    ("those", "DT"),
    ("all", "PDT"),
    ("i", "PRP"),
    ("you", "PRP"),
    ("he", "PRP"),
    ("she", "PRP"),
    ("it", "PRP"),
    ("we", "PRP"),
    ("they", "PRP"),
    ("me", "PRP"),
    ("him", "PRP"),
    ("her", "PRP$"),
    ("us", "PRP"),
    ("them", "PRP"),
    ("my", "PRP$"),
    ("your", "PRP$"),
    ("his", "PRP$"),
    ("its", "PRP$"),
    ("our", "PRP$"),
    ("their", "PRP$"),
    ("in", "IN"),
    ("on", "IN"),
    ("at", "IN"),
    ("of", "IN"),
    ("with", "IN"),
    ("from", "IN"),
    ("by", "IN"),
    ("for", "IN"),
    ("about", "IN"),
    ("into", "IN"),
    ("over", "IN"),
    ("after", "IN"),
    ("before", "IN"),
    ("to", "TO"),
    ("and", "CC"),
    ("or", "CC"),
    ("but", "CC"),
    ("not", "RB"),
    ("n't", "RB"),
    ("now", "RB"),
    ("very", "RB"),
    ("also", "RB"),
    ("here", "RB"),
    ("there", "EX"),
    ("is", "VBZ"),
    ("'s", "POS"),
    ("are", "VBP"),
    ("am", "VBP"),
    ("'re", "VBP"),
    ("'m", "VBP"),
    ("was", "VBD"),
    ("were", "VBD"),
    ("be", "VB"),
    ("been", "VBN"),
    ("being", "VBG"),
    ("has", "VBZ"),
    ("have", "VBP"),
    ("'ve", "VBP"),
    ("had", "VBD"),
    ("does", "VBZ"),
    ("do", "VBP"),
    ("did", "VBD"),
    ("can", "MD"),
    ("could", "MD"),
    ("will", "MD"),
    ("'ll", "MD"),
    ("would", "MD"),
    ("'d", "MD"),
    ("should", "MD"),
    ("may", "MD"),
    ("might", "MD"),
    ("must", "MD"),
    ("who", "WP"),
    ("what", "WP"),
    ("which", "WDT"),
    ("when", "WRB"),
    ("where", "WRB"),
    ("why", "WRB"),
    ("how", "WRB"),
];

/// Dictionary tagger with shape-based fallbacks for unknown words.
///
/// Lookups fold the word to lowercase. Model entries take precedence over the
/// built-in closed-class table.
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    language: Language,
    entries: HashMap<String, String>,
}

impl LexiconTagger {
    /// Tagger with only the built-in entries for `language`.
    pub fn new(language: Language) -> Self {
        let entries = match language {
            Language::English => ENGLISH_CLOSED_CLASS
                .iter()
                .map(|(word, tag)| (word.to_string(), tag.to_string()))
                .collect(),
            Language::Chinese => HashMap::new(),
        };
        Self { language, entries }
    }

    /// Built-in entries overlaid with a `word<TAB>tag` model file.
    pub fn load(language: Language, path: &Path) -> Result<Self, ModelError> {
        let mut from_file: HashMap<String, String> = HashMap::new();
        for (word, tag) in read_pairs(path)? {
            from_file.entry(word.to_lowercase()).or_insert(tag);
        }
        debug!("loaded {} tagger entries from {}", from_file.len(), path.display());
        let mut tagger = Self::new(language);
        tagger.entries.extend(from_file);
        Ok(tagger)
    }

    fn tag_word(&self, word: &str) -> String {
        if let Some(tag) = self.entries.get(&word.to_lowercase()) {
            return tag.clone();
        }
        match self.language {
            Language::English => guess_english(word).to_string(),
            Language::Chinese => guess_chinese(word).to_string(),
        }
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, words: &[String]) -> Vec<(String, String)> {
        words
            .iter()
            .map(|word| (word.clone(), self.tag_word(word)))
            .collect()
    }
}

fn is_punctuation(word: &str) -> bool {
    word.chars().all(|ch| !ch.is_alphanumeric())
}

fn is_number(word: &str) -> bool {
    word.chars().any(|ch| ch.is_numeric())
        && word
            .chars()
            .all(|ch| ch.is_numeric() || matches!(ch, '.' | ',' | '-' | '%'))
}

fn guess_english(word: &str) -> &'static str {
    if is_punctuation(word) {
        return match word {
            "." | "?" | "!" => ".",
            "," => ",",
            ":" | ";" | "..." | "-" | "--" => ":",
            "\"" | "``" | "“" => "``",
            "''" | "”" => "''",
            "$" => "$",
            "#" => "#",
            _ => "SYM",
        };
    }
    // Escaped brackets from the splitter.
    if word.starts_with('-') && word.ends_with('-') && word.len() == 5 {
        return if word.contains("LRB") || word.contains("LSB") || word.contains("LCB") {
            "-LRB-"
        } else {
            "-RRB-"
        };
    }
    if is_number(word) {
        return "CD";
    }
    if word.chars().next().is_some_and(char::is_uppercase) {
        return "NNP";
    }
    let lower = word.to_lowercase();
    if lower.ends_with("ing") && lower.len() > 4 {
        "VBG"
    } else if lower.ends_with("ed") && lower.len() > 3 {
        "VBD"
    } else if lower.ends_with("ly") && lower.len() > 3 {
        "RB"
    } else if lower.ends_with("est") && lower.len() > 4 {
        "JJS"
    } else if lower.ends_with('s') && !lower.ends_with("ss") && lower.len() > 2 {
        "NNS"
    } else {
        "NN"
    }
}

fn guess_chinese(word: &str) -> &'static str {
    if is_punctuation(word) {
        "PU"
    } else if is_number(word) {
        "CD"
    } else {
        "NN"
    }
}
