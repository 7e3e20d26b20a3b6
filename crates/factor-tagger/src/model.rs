//! Seams to the linguistic model.
//!
//! The taggers only see these traits. The baseline implementations in
//! [`crate::splitter`], [`crate::lexicon_tagger`] and [`crate::chunk_parser`]
//! are deterministic and file-driven; a statistical model plugs in by
//! implementing the same traits.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tagger_morph::RuleLemmatizer;
use thiserror::Error;

use crate::tree::{ParseTree, TreeError};

/// Turns a raw line into sentences of tokens.
pub trait SentenceSplitter: Send + Sync {
    fn split(&self, line: &str) -> Vec<Vec<String>>;
}

/// Assigns one tag to every token of a sentence, in order.
pub trait PosTagger: Send + Sync {
    fn tag(&self, words: &[String]) -> Vec<(String, String)>;
}

pub trait Lemmatizer: Send + Sync {
    fn lemma(&self, word: &str, tag: &str) -> String;
}

pub trait ConstituencyParser: Send + Sync {
    fn parse(&self, words: &[String]) -> Result<ParseTree, TreeError>;
}

impl Lemmatizer for RuleLemmatizer {
    fn lemma(&self, word: &str, tag: &str) -> String {
        RuleLemmatizer::lemma(self, word, tag)
    }
}

/// Every word is its own lemma. Used for Chinese.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLemmatizer;

impl Lemmatizer for IdentityLemmatizer {
    fn lemma(&self, word: &str, _tag: &str) -> String {
        word.to_string()
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}:{line} malformed model line (expected two tab-separated fields)")]
    Malformed { path: PathBuf, line: usize },
}

/// Read `key<TAB>value` lines, skipping blanks and `#` comments.
///
/// Fields are trimmed. Pairs come back in file order; callers that want
/// first-occurrence-wins semantics insert with `entry().or_insert`.
pub fn read_pairs(path: &Path) -> Result<Vec<(String, String)>, ModelError> {
    let io_err = |source: std::io::Error| ModelError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let mut pairs = Vec::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(io_err)?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = trimmed.split_once('\t') else {
            return Err(ModelError::Malformed {
                path: path.to_path_buf(),
                line: lineno + 1,
            });
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            return Err(ModelError::Malformed {
                path: path.to_path_buf(),
                line: lineno + 1,
            });
        }
        pairs.push((key.to_string(), value.to_string()));
    }
    Ok(pairs)
}
