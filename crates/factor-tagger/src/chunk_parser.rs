use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::model::{ConstituencyParser, ModelError, PosTagger, read_pairs};
use crate::tree::{ParseTree, TreeError};

/// Penn and CTB tag prefixes mapped to the phrase that groups them.
const DEFAULT_GRAMMAR: &[(&str, &str)] = &[
    ("DT", "NP"),
    ("PDT", "NP"),
    ("PRP", "NP"),
    ("POS", "NP"),
    ("CD", "NP"),
    ("JJ", "NP"),
    ("NN", "NP"),
    ("NR", "NP"),
    ("NT", "NP"),
    ("PN", "NP"),
    ("M", "NP"),
    ("VB", "VP"),
    ("MD", "VP"),
    ("VV", "VP"),
    ("VC", "VP"),
    ("VE", "VP"),
    ("VA", "VP"),
    ("RB", "ADVP"),
    ("AD", "ADVP"),
    ("IN", "PP"),
    ("TO", "PP"),
    ("P", "PP"),
];

/// Tags that attach directly under the clause.
const PUNCT_TAGS: &[&str] = &[".", ",", ":", "``", "''", "-LRB-", "-RRB-", "SYM", "PU", "#", "$"];

/// Shallow parser: tags the sentence, then groups runs of tags that map to
/// the same phrase under `(ROOT (S ...))`.
pub struct ChunkParser {
    tagger: Arc<dyn PosTagger>,
    grammar: Vec<(String, String)>,
}

impl ChunkParser {
    pub fn new(tagger: Arc<dyn PosTagger>) -> Self {
        let grammar = DEFAULT_GRAMMAR
            .iter()
            .map(|(prefix, phrase)| (prefix.to_string(), phrase.to_string()))
            .collect();
        Self::with_grammar(tagger, grammar)
    }

    /// Parser with an explicit prefix table instead of the built-in one.
    pub fn with_grammar(tagger: Arc<dyn PosTagger>, mut grammar: Vec<(String, String)>) -> Self {
        // Longest prefix first; stable so earlier entries win ties.
        grammar.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        let mut seen = std::collections::HashSet::new();
        grammar.retain(|(prefix, _)| seen.insert(prefix.clone()));
        Self { tagger, grammar }
    }

    /// Read a `TAG_PREFIX<TAB>PHRASE` grammar file.
    pub fn load(tagger: Arc<dyn PosTagger>, path: &Path) -> Result<Self, ModelError> {
        let grammar = read_pairs(path)?;
        debug!("loaded {} phrase rules from {}", grammar.len(), path.display());
        Ok(Self::with_grammar(tagger, grammar))
    }

    fn phrase_for(&self, tag: &str) -> Option<&str> {
        if PUNCT_TAGS.contains(&tag) {
            return None;
        }
        self.grammar
            .iter()
            .find(|(prefix, _)| tag.starts_with(prefix.as_str()))
            .map(|(_, phrase)| phrase.as_str())
    }
}

impl ConstituencyParser for ChunkParser {
    fn parse(&self, words: &[String]) -> Result<ParseTree, TreeError> {
        if words.is_empty() {
            return Err(TreeError::Empty);
        }
        let mut tree = ParseTree::new("ROOT");
        let clause = tree.add_child(tree.root(), "S");
        let mut open: Option<(String, usize)> = None;
        for (word, tag) in self.tagger.tag(words) {
            let parent = match self.phrase_for(&tag) {
                Some(phrase) => {
                    let continued = open
                        .as_ref()
                        .filter(|(label, _)| label == phrase)
                        .map(|&(_, id)| id);
                    match continued {
                        Some(id) => id,
                        None => {
                            let id = tree.add_child(clause, phrase);
                            open = Some((phrase.to_string(), id));
                            id
                        }
                    }
                }
                None => {
                    open = None;
                    clause
                }
            };
            let preterminal = tree.add_child(parent, tag);
            tree.add_child(preterminal, word);
        }
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon_tagger::LexiconTagger;
    use std::io::Write;
    use tagger_types::Language;
    use tempfile::NamedTempFile;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|word| word.to_string()).collect()
    }

    fn english() -> Arc<dyn PosTagger> {
        Arc::new(LexiconTagger::new(Language::English))
    }

    #[test]
    fn groups_runs_into_phrases() {
        let parser = ChunkParser::new(english());
        let tree = parser.parse(&words(&["the", "dogs", "walked", "."])).unwrap();
        assert_eq!(
            tree.to_oneline(false),
            "(S (NP (DT the) (NNS dogs)) (VP (VBD walked)) (. .))"
        );
    }

    #[test]
    fn punctuation_breaks_a_phrase() {
        let parser = ChunkParser::new(english());
        let tree = parser.parse(&words(&["dogs", ",", "cats"])).unwrap();
        assert_eq!(
            tree.to_oneline(false),
            "(S (NP (NNS dogs)) (, ,) (NP (NNS cats)))"
        );
    }

    #[test]
    fn chinese_tags_use_ctb_prefixes() {
        let parser = ChunkParser::new(Arc::new(LexiconTagger::new(Language::Chinese)));
        let tree = parser.parse(&words(&["你好", "。"])).unwrap();
        assert_eq!(tree.to_oneline(false), "(S (NP (NN 你好)) (PU 。))");
    }

    #[test]
    fn grammar_file_replaces_defaults() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "N\tX\nNNS\tPL").unwrap();
        let parser = ChunkParser::load(english(), file.path()).unwrap();
        let tree = parser.parse(&words(&["dogs", "world", "walked"])).unwrap();
        assert_eq!(
            tree.to_oneline(false),
            "(S (PL (NNS dogs)) (X (NN world)) (VBD walked))"
        );
    }

    #[test]
    fn empty_sentence_is_an_error() {
        let parser = ChunkParser::new(english());
        assert_eq!(parser.parse(&[]), Err(TreeError::Empty));
    }
}
