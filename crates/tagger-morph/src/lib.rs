//! Morphology helpers for Penn-tagged English tokens.
//!
//! Two pieces live here:
//! - [`AdjFormLexicon`]: a closed dictionary of irregular comparative and
//!   superlative forms (`better` → `good`), loaded from a tab-separated file.
//! - [`RuleLemmatizer`]: a morphy-style lemmatizer. The tag tells it which
//!   inflection to undo, exception lists catch irregular forms, and suffix
//!   rules handle the rest.
//!
//! # How the lemmatizer works
//! 1. Recover the word class from the Penn tag; proper nouns and closed-class
//!    tags keep their surface form.
//! 2. Check exceptions (`*.exc` files plus a small built-in verb list).
//! 3. Apply the suffix rules the tag allows, longest suffix first.
//! 4. Fall back to the lowercased surface form.
//!
//! # Example
//! ```no_run
//! use tagger_morph::{AdjFormLexicon, RuleLemmatizer};
//!
//! # fn main() -> anyhow::Result<()> {
//! let lemmatizer = RuleLemmatizer::load("/path/to/exceptions")?;
//! assert_eq!(lemmatizer.lemma("running", "VBG"), "run");
//!
//! let forms = AdjFormLexicon::load("/path/to/adj_forms.tsv")?;
//! println!("{:?}", forms.comparative_base("better"));
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p tagger-morph --example lookup -- <word>/<TAG>...`.

mod adj_forms;

pub use adj_forms::AdjFormLexicon;

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tagger_types::WordClass;

/// Where a candidate lemma originated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CandidateSource {
    Surface,
    Exception,
    Rule {
        suffix: &'static str,
        replacement: &'static str,
    },
}

/// A lemma candidate paired with its provenance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LemmaCandidate<'a> {
    pub lemma: Cow<'a, str>,
    pub source: CandidateSource,
}

const VERB_IRREGULARS: &[(&str, &str)] = &[
    ("am", "be"),
    ("are", "be"),
    ("is", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("'m", "be"),
    ("'re", "be"),
    ("has", "have"),
    ("had", "have"),
    ("having", "have"),
    ("'ve", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("went", "go"),
    ("gone", "go"),
    ("said", "say"),
    ("made", "make"),
    ("got", "get"),
    ("took", "take"),
    ("taken", "take"),
    ("saw", "see"),
    ("seen", "see"),
    ("came", "come"),
    ("knew", "know"),
    ("known", "know"),
    ("gave", "give"),
    ("given", "give"),
    ("found", "find"),
    ("thought", "think"),
    ("told", "tell"),
    ("left", "leave"),
    ("felt", "feel"),
    ("brought", "bring"),
    ("began", "begin"),
    ("begun", "begin"),
    ("kept", "keep"),
    ("held", "hold"),
    ("wrote", "write"),
    ("written", "write"),
    ("stood", "stand"),
    ("heard", "hear"),
    ("meant", "mean"),
    ("met", "meet"),
    ("ran", "run"),
    ("paid", "pay"),
    ("sat", "sit"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("led", "lead"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("lost", "lose"),
    ("fell", "fall"),
    ("fallen", "fall"),
    ("sent", "send"),
    ("built", "build"),
    ("bought", "buy"),
];

const NOUN_IRREGULARS: &[(&str, &str)] = &[
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("geese", "goose"),
];

const ADV_IRREGULARS: &[(&str, &str)] = &[("n't", "not")];

/// Morphy-style lemmatizer driven by Penn tags.
#[derive(Clone, Debug)]
pub struct RuleLemmatizer {
    exceptions: HashMap<WordClass, HashMap<String, String>>,
}

impl Default for RuleLemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleLemmatizer {
    /// Lemmatizer with only the built-in irregular forms.
    pub fn new() -> Self {
        let builtin = |pairs: &[(&str, &str)]| -> HashMap<String, String> {
            pairs
                .iter()
                .map(|(surface, lemma)| (surface.to_string(), lemma.to_string()))
                .collect()
        };
        Self {
            exceptions: HashMap::from([
                (WordClass::Noun, builtin(NOUN_IRREGULARS)),
                (WordClass::Verb, builtin(VERB_IRREGULARS)),
                (WordClass::Adj, HashMap::new()),
                (WordClass::Adv, builtin(ADV_IRREGULARS)),
            ]),
        }
    }

    /// Load exception lists (`noun.exc`, `verb.exc`, `adj.exc`, `adv.exc`) from a
    /// directory on top of the built-in forms.
    ///
    /// Files are optional; missing ones are treated as empty. Entries from files
    /// replace built-in entries for the same surface form.
    pub fn load(exc_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = exc_dir.as_ref();
        let mut lemmatizer = Self::new();
        for (class, name) in [
            (WordClass::Noun, "noun.exc"),
            (WordClass::Verb, "verb.exc"),
            (WordClass::Adj, "adj.exc"),
            (WordClass::Adv, "adv.exc"),
        ] {
            let loaded = load_exc(dir.join(name))?;
            lemmatizer
                .exceptions
                .entry(class)
                .or_default()
                .extend(loaded);
        }
        Ok(lemmatizer)
    }

    /// Lemma for `surface` tagged `tag`.
    ///
    /// Proper nouns and tags outside the inflecting classes return the surface
    /// form unchanged; everything else is lowercased.
    pub fn lemma(&self, surface: &str, tag: &str) -> String {
        match self.candidates(surface, tag).into_iter().next() {
            Some(candidate) => candidate.lemma.into_owned(),
            None => surface.to_string(),
        }
    }

    /// All candidates for `surface`, best first.
    pub fn candidates<'a>(&'a self, surface: &str, tag: &str) -> Vec<LemmaCandidate<'a>> {
        let Some(class) = WordClass::from_penn(tag) else {
            return Vec::new();
        };
        let norm_surface = normalize(surface);
        let mut out = Vec::new();

        if let Some(exc_map) = self.exceptions.get(&class)
            && let Some(lemma) = exc_map.get(&norm_surface)
        {
            out.push(LemmaCandidate {
                lemma: Cow::Borrowed(lemma.as_str()),
                source: CandidateSource::Exception,
            });
        }

        for &(suffix, replacement) in rules_for(tag) {
            if let Some(candidate) = apply_rule(&norm_surface, suffix, replacement) {
                out.push(LemmaCandidate {
                    lemma: Cow::Owned(candidate),
                    source: CandidateSource::Rule {
                        suffix,
                        replacement,
                    },
                });
                // The rule table is ordered by preference; keep only the first hit.
                break;
            }
        }

        out.push(LemmaCandidate {
            lemma: Cow::Owned(norm_surface),
            source: CandidateSource::Surface,
        });
        out
    }
}

fn load_exc(path: PathBuf) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let file =
        File::open(&path).with_context(|| format!("open exception file {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut map = HashMap::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line =
            line.with_context(|| format!("read line {} in {}", lineno + 1, path.display()))?;
        let mut parts = line.split_whitespace();
        let surface = match parts.next() {
            Some(s) => normalize(s),
            None => continue,
        };
        if let Some(lemma) = parts.next() {
            map.entry(surface).or_insert_with(|| normalize(lemma));
        }
    }
    Ok(map)
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Rules allowed for an inflected tag, most specific suffix first.
///
/// An empty replacement means "strip the suffix", with doubled consonants
/// collapsed and a silent `e` restored where the stem calls for one.
fn rules_for(tag: &str) -> &'static [(&'static str, &'static str)] {
    match tag {
        "NNS" => &[
            ("ies", "y"),
            ("ches", "ch"),
            ("shes", "sh"),
            ("sses", "ss"),
            ("ses", "s"),
            ("xes", "x"),
            ("zes", "z"),
            ("men", "man"),
            ("s", ""),
        ],
        "VBZ" => &[
            ("ies", "y"),
            ("ches", "ch"),
            ("shes", "sh"),
            ("sses", "ss"),
            ("xes", "x"),
            ("zes", "z"),
            ("oes", "o"),
            ("s", ""),
        ],
        "VBD" | "VBN" => &[("ied", "y"), ("ed", "")],
        "VBG" => &[("ing", "")],
        "JJR" | "RBR" => &[("ier", "y"), ("er", "")],
        "JJS" | "RBS" => &[("iest", "y"), ("est", "")],
        _ => &[],
    }
}

fn apply_rule(surface: &str, suffix: &str, replacement: &str) -> Option<String> {
    let stem = surface.strip_suffix(suffix)?;
    if stem.chars().count() < 2 {
        return None;
    }
    if !replacement.is_empty() {
        return Some(format!("{stem}{replacement}"));
    }
    if suffix == "s" && (stem.ends_with('s') || stem.ends_with('u')) {
        return None;
    }
    if suffix == "s" {
        return Some(stem.to_string());
    }

    let mut candidate = stem.to_string();
    let chars: Vec<char> = candidate.chars().collect();
    let n = chars.len();
    // Handle doubled consonants from inflected forms (e.g. "running" -> "runn").
    let last = chars[n - 1];
    if n >= 3 && last == chars[n - 2] && is_consonant(last) && !"lsfz".contains(last) {
        candidate.pop();
    } else if wants_silent_e(&chars) {
        candidate.push('e');
    }
    Some(candidate)
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn is_consonant(c: char) -> bool {
    c.is_alphabetic() && !is_vowel(c)
}

/// Stems like "mak", "hop", "lov" or "danc" lost a final `e` to the suffix.
fn wants_silent_e(stem: &[char]) -> bool {
    let n = stem.len();
    if n == 2 {
        return stem == ['u', 's'];
    }
    let last = stem[n - 1];
    let prev = stem[n - 2];
    if last == 'v' || (last == 'z' && prev != 'z') {
        return true;
    }
    if last == 'c' && matches!(prev, 'n' | 'r' | 'u') {
        return true;
    }
    if last == 'g' && matches!(prev, 'd' | 'r') {
        return true;
    }
    n == 3 && is_consonant(stem[0]) && is_vowel(prev) && is_consonant(last) && !"wxy".contains(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemma(surface: &str, tag: &str) -> String {
        RuleLemmatizer::new().lemma(surface, tag)
    }

    #[test]
    fn undoes_regular_inflections() {
        assert_eq!(lemma("walked", "VBD"), "walk");
        assert_eq!(lemma("running", "VBG"), "run");
        assert_eq!(lemma("stopped", "VBN"), "stop");
        assert_eq!(lemma("making", "VBG"), "make");
        assert_eq!(lemma("watches", "VBZ"), "watch");
        assert_eq!(lemma("cities", "NNS"), "city");
        assert_eq!(lemma("boxes", "NNS"), "box");
        assert_eq!(lemma("dogs", "NNS"), "dog");
        assert_eq!(lemma("women", "NNS"), "woman");
        assert_eq!(lemma("faster", "JJR"), "fast");
        assert_eq!(lemma("happiest", "JJS"), "happy");
        assert_eq!(lemma("bigger", "JJR"), "big");
    }

    #[test]
    fn keeps_doubled_liquids_and_sibilants() {
        assert_eq!(lemma("falling", "VBG"), "fall");
        assert_eq!(lemma("passed", "VBD"), "pass");
        assert_eq!(lemma("glasses", "NNS"), "glass");
    }

    #[test]
    fn uses_builtin_irregulars() {
        assert_eq!(lemma("is", "VBZ"), "be");
        assert_eq!(lemma("Was", "VBD"), "be");
        assert_eq!(lemma("children", "NNS"), "child");
        assert_eq!(lemma("n't", "RB"), "not");
    }

    #[test]
    fn leaves_proper_nouns_and_closed_class_alone() {
        assert_eq!(lemma("Paris", "NNP"), "Paris");
        assert_eq!(lemma("The", "DT"), "The");
        assert_eq!(lemma(".", "."), ".");
        assert_eq!(lemma("Dog", "NN"), "dog");
    }

    #[test]
    fn reports_provenance() {
        let lemmatizer = RuleLemmatizer::new();
        let candidates = lemmatizer.candidates("walked", "VBD");
        assert!(matches!(
            candidates[0].source,
            CandidateSource::Rule { suffix: "ed", .. }
        ));
        assert_eq!(candidates[0].lemma, "walk");
        assert!(matches!(
            candidates.last().unwrap().source,
            CandidateSource::Surface
        ));

        let candidates = lemmatizer.candidates("went", "VBD");
        assert!(matches!(candidates[0].source, CandidateSource::Exception));
        assert_eq!(candidates[0].lemma, "go");
    }
}
