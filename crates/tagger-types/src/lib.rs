//! Shared vocabulary for the factor tagger.
//!
//! Tokens carry the surface form a tagger saw, the (Penn or CTB) tag it
//! assigned and the lemma computed for it. Factors name the fields a token
//! contributes to formatted output; a [`FactorSpec`] fixes their order.
//!
//! ```rust
//! use tagger_types::{FactorKind, FactorSpec, Language, WordClass};
//!
//! let spec = FactorSpec::parse("surface lemma-pos").unwrap();
//! assert_eq!(spec.kinds(), &[FactorKind::Surface, FactorKind::LemmaPos]);
//! assert_eq!("English".parse::<Language>().unwrap(), Language::English);
//! assert_eq!(WordClass::from_penn("JJR"), Some(WordClass::Adj));
//! ```

use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Tokens that close a sentence, ASCII and full-width.
pub const SENTENCE_FINAL_PUNCT: [&str; 6] = [".", "?", "!", "。", "？", "！"];

/// Chinese sentence-final punctuation that keeps its own tag after normalization.
pub const CHINESE_SENTENCE_FINAL: [&str; 3] = ["。", "？", "！"];

/// Literal line appended when end-of-stream markers are enabled.
pub const EOF_MARKER: &str = "__EOF__";

/// Corpus language.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Language {
    Chinese,
    English,
}

impl FromStr for Language {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chinese" => Ok(Language::Chinese),
            "english" => Ok(Language::English),
            _ => Err(UnknownName::new("language", s)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::Chinese => "chinese",
            Language::English => "english",
        })
    }
}

/// One field a token contributes to factored output.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FactorKind {
    Surface,
    Lemma,
    Pos,
    LemmaPos,
}

impl FactorKind {
    /// Parse a factor name (`surface`, `lemma`, `pos`, `lemma-pos`), ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "surface" => Some(FactorKind::Surface),
            "lemma" => Some(FactorKind::Lemma),
            "pos" => Some(FactorKind::Pos),
            "lemma-pos" => Some(FactorKind::LemmaPos),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FactorKind::Surface => "surface",
            FactorKind::Lemma => "lemma",
            FactorKind::Pos => "pos",
            FactorKind::LemmaPos => "lemma-pos",
        }
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered, non-empty list of factors to emit per token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FactorSpec {
    kinds: Vec<FactorKind>,
}

impl FactorSpec {
    /// Build a spec from explicit kinds; an empty list yields the default.
    pub fn new(kinds: Vec<FactorKind>) -> Self {
        if kinds.is_empty() {
            Self::default()
        } else {
            Self { kinds }
        }
    }

    /// Parse a whitespace-separated factor list.
    ///
    /// A blank list yields the default `surface lemma pos`. Any name outside the
    /// four known kinds is rejected rather than dropped.
    pub fn parse(list: &str) -> Result<Self, UnknownName> {
        let kinds = list
            .split_whitespace()
            .map(|name| FactorKind::from_name(name).ok_or_else(|| UnknownName::new("factor", name)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(kinds))
    }

    pub fn kinds(&self) -> &[FactorKind] {
        &self.kinds
    }
}

impl Default for FactorSpec {
    fn default() -> Self {
        Self {
            kinds: vec![FactorKind::Surface, FactorKind::Lemma, FactorKind::Pos],
        }
    }
}

impl fmt::Display for FactorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.kinds.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(kind.name())?;
        }
        Ok(())
    }
}

/// A tagged word with its computed lemma.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaggedToken {
    pub surface: String,
    pub tag: String,
    pub lemma: String,
}

impl TaggedToken {
    pub fn new(
        surface: impl Into<String>,
        tag: impl Into<String>,
        lemma: impl Into<String>,
    ) -> Self {
        Self {
            surface: surface.into(),
            tag: tag.into(),
            lemma: lemma.into(),
        }
    }
}

/// Open word classes that inflect, as recovered from a Penn tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum WordClass {
    Noun,
    Verb,
    Adj,
    Adv,
}

impl WordClass {
    /// Map a Penn Treebank tag to the word class morphology applies to.
    ///
    /// Proper nouns and closed-class tags yield `None`.
    pub fn from_penn(tag: &str) -> Option<Self> {
        match tag {
            "NN" | "NNS" => Some(WordClass::Noun),
            "VB" | "VBD" | "VBG" | "VBN" | "VBP" | "VBZ" => Some(WordClass::Verb),
            "JJ" | "JJR" | "JJS" => Some(WordClass::Adj),
            "RB" | "RBR" | "RBS" => Some(WordClass::Adv),
            _ => None,
        }
    }
}

impl fmt::Display for WordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WordClass::Noun => "noun",
            WordClass::Verb => "verb",
            WordClass::Adj => "adj",
            WordClass::Adv => "adv",
        })
    }
}

/// Degree marked by a comparative or superlative Penn tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Degree {
    Comparative,
    Superlative,
}

impl Degree {
    /// `JJR`/`RBR` are comparative, `JJS`/`RBS` superlative.
    pub fn from_penn(tag: &str) -> Option<Self> {
        match tag {
            "JJR" | "RBR" => Some(Degree::Comparative),
            "JJS" | "RBS" => Some(Degree::Superlative),
            _ => None,
        }
    }
}

/// A configuration value that names nothing known.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownName {
    pub field: &'static str,
    pub value: String,
}

impl UnknownName {
    pub fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for UnknownName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} \"{}\"", self.field, self.value)
    }
}

impl Error for UnknownName {}
