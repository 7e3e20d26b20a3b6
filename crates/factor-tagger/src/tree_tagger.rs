use std::sync::Arc;

use crate::config::PolicyConfig;
use crate::model::{ConstituencyParser, Lemmatizer, SentenceSplitter};
use crate::rules::NormalizationRules;
use crate::sink::FanOut;
use crate::tagger::{LineCounts, LineTagger, TagError, Throughput};
use crate::tree::{NodeId, ParseTree};

/// Label wrapping several sentences parsed from one input line.
pub const MULTI_SENTENCE_LABEL: &str = "MULTIS";

/// Parses each sentence and writes normalized bracketed trees.
pub struct TreeTagger {
    policy: Arc<PolicyConfig>,
    splitter: Arc<dyn SentenceSplitter>,
    parser: Arc<dyn ConstituencyParser>,
    lemmatizer: Arc<dyn Lemmatizer>,
    rules: NormalizationRules,
}

impl TreeTagger {
    pub fn new(
        policy: Arc<PolicyConfig>,
        splitter: Arc<dyn SentenceSplitter>,
        parser: Arc<dyn ConstituencyParser>,
        lemmatizer: Arc<dyn Lemmatizer>,
        rules: NormalizationRules,
    ) -> Self {
        Self {
            policy,
            splitter,
            parser,
            lemmatizer,
            rules,
        }
    }

    /// Rewrite preterminal labels and, if enabled, attach stems to leaves.
    pub fn annotate(&self, tree: &mut ParseTree) {
        let root = tree.root();
        self.visit(tree, root, None);
    }

    fn visit(&self, tree: &mut ParseTree, id: NodeId, governing: Option<(NodeId, &str)>) {
        if tree.is_leaf(id) {
            // A bare word directly under a phrase has no tag to normalize.
            if let Some((preterminal, original_tag)) = governing {
                self.rewrite_leaf(tree, preterminal, original_tag, id);
            }
            return;
        }
        // Read before any leaf rewrites the label.
        let original_tag = tree.is_preterminal(id).then(|| tree.label(id).to_string());
        let children = tree.children(id).to_vec();
        for child in children {
            self.visit(tree, child, original_tag.as_deref().map(|tag| (id, tag)));
        }
    }

    /// The tag rewrite reads the current label; stems come from the original tag.
    fn rewrite_leaf(
        &self,
        tree: &mut ParseTree,
        preterminal: NodeId,
        original_tag: &str,
        leaf: NodeId,
    ) {
        let word = tree.label(leaf).to_string();
        let rewritten = self.rules.rewrite_tag(&word, tree.label(preterminal));
        if self.policy.use_stem_in_tree {
            let stem = match self.rules.stem_override(&word, original_tag) {
                Some(stem) => stem.to_string(),
                None => self.lemmatizer.lemma(&word, original_tag),
            };
            tree.set_stem(leaf, stem);
        }
        tree.set_label(preterminal, rewritten);
    }

    /// Parse, normalize and render one sentence.
    pub fn parse_sentence(&self, words: &[String]) -> Result<String, TagError> {
        let mut tree = self.parser.parse(words)?;
        self.annotate(&mut tree);
        Ok(tree.to_oneline(self.policy.use_stem_in_tree))
    }
}

impl LineTagger for TreeTagger {
    fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    fn tag_line(&self, line: &str, out: &mut FanOut<'_>) -> Result<LineCounts, TagError> {
        let sentences = self.splitter.split(line);
        let mut counts = LineCounts::default();
        let mut rendered = Vec::with_capacity(sentences.len());
        for sentence in &sentences {
            rendered.push(self.parse_sentence(sentence)?);
            counts.words += sentence.len() as u64;
            counts.sentences += 1;
        }

        let auto_split = self.policy.auto_split_sentences;
        match rendered.as_slice() {
            [] if auto_split => {}
            [] => out.newline()?,
            [single] => {
                out.raw(single)?;
                out.newline()?;
            }
            many if auto_split => {
                for tree in many {
                    out.raw(tree)?;
                    out.newline()?;
                }
            }
            many => {
                let joined = many.join(" ").replace(['\r', '\n'], " ");
                out.raw(&format!("({MULTI_SENTENCE_LABEL} {joined})"))?;
                out.newline()?;
            }
        }
        Ok(counts)
    }

    fn writes_pos_stream(&self) -> bool {
        false
    }

    fn throughput(&self) -> Throughput {
        Throughput::Lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk_parser::ChunkParser;
    use crate::lexicon_tagger::LexiconTagger;
    use crate::model::PosTagger;
    use crate::splitter::RuleSplitter;
    use crate::tree::TreeError;
    use std::io::Cursor;
    use tagger_morph::{AdjFormLexicon, RuleLemmatizer};
    use tagger_types::Language;

    fn tree_tagger(policy: PolicyConfig) -> TreeTagger {
        let lexicon = AdjFormLexicon::from_reader(Cursor::new("good\tbetter\tbest\n"), "test")
            .unwrap();
        let policy = Arc::new(policy);
        let pos: Arc<dyn PosTagger> = Arc::new(LexiconTagger::new(policy.language));
        TreeTagger::new(
            Arc::clone(&policy),
            Arc::new(RuleSplitter::new()),
            Arc::new(ChunkParser::new(pos)),
            Arc::new(RuleLemmatizer::new()),
            NormalizationRules::new(Arc::clone(&policy), Arc::new(lexicon)),
        )
    }

    fn single(tagger: &TreeTagger, line: &str) -> String {
        let mut out = Vec::new();
        tagger.tag_single_line(line, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn wraps_multiple_sentences() {
        let tagger = tree_tagger(PolicyConfig::new(Language::English));
        assert_eq!(
            single(&tagger, "Go now. Stop."),
            "(MULTIS (S (NP (NNP Go)) (ADVP (RB now)) (. .)) (S (NP (NNP Stop)) (. .)))\n"
        );
    }

    #[test]
    fn auto_split_puts_each_tree_on_its_own_line() {
        let tagger = tree_tagger(PolicyConfig {
            auto_split_sentences: true,
            ..PolicyConfig::new(Language::English)
        });
        assert_eq!(
            single(&tagger, "Go now. Stop."),
            "(S (NP (NNP Go)) (ADVP (RB now)) (. .))\n(S (NP (NNP Stop)) (. .))\n"
        );
        assert_eq!(single(&tagger, ""), "");
    }

    #[test]
    fn blank_line_without_auto_split_is_empty_line() {
        let tagger = tree_tagger(PolicyConfig::new(Language::English));
        assert_eq!(single(&tagger, ""), "\n");
    }

    #[test]
    fn normalizes_preterminals_and_stems() {
        let tagger = tree_tagger(PolicyConfig {
            normalize_nouns: true,
            normalize_comparatives: true,
            use_stem_in_tree: true,
            ..PolicyConfig::new(Language::English)
        });
        assert_eq!(
            single(&tagger, "the dogs walked"),
            "(S (NP (DT the) (NN dog)) (VP (VBD walk)))\n"
        );
        let mut tree: ParseTree = "(ROOT (S (ADJP (JJR better)) (NP (NNS cities))))"
            .parse()
            .unwrap();
        tagger.annotate(&mut tree);
        assert_eq!(
            tree.to_oneline(true),
            "(S (ADJP (JJR good)) (NP (NN city)))"
        );
        assert_eq!(
            tree.to_oneline(false),
            "(S (ADJP (JJR better)) (NP (NN cities)))"
        );
    }

    #[test]
    fn every_leaf_of_a_preterminal_is_stemmed_from_the_original_tag() {
        let tagger = tree_tagger(PolicyConfig {
            normalize_nouns: true,
            normalize_verbs: true,
            normalize_comparatives: true,
            use_stem_in_tree: true,
            ..PolicyConfig::new(Language::English)
        });
        let mut tree: ParseTree = "(ROOT (S (NNS dogs cats) (VBZ runs walks) (JJR better worse)))"
            .parse()
            .unwrap();
        tagger.annotate(&mut tree);
        assert_eq!(
            tree.to_oneline(true),
            "(S (NN dog cat) (VB run walk) (JJR good worse))"
        );
        assert_eq!(
            tree.to_oneline(false),
            "(S (NN dogs cats) (VB runs walks) (JJR better worse))"
        );
    }

    #[test]
    fn words_without_preterminal_are_left_alone() {
        let tagger = tree_tagger(PolicyConfig {
            normalize_nouns: true,
            use_stem_in_tree: true,
            ..PolicyConfig::new(Language::English)
        });
        let mut tree: ParseTree = "(ROOT (NNS dogs (NN x)))".parse().unwrap();
        tagger.annotate(&mut tree);
        assert_eq!(tree.to_oneline(true), "(NNS dogs (NN x))");
    }

    #[test]
    fn parse_failures_surface_as_errors() {
        struct Broken;
        impl ConstituencyParser for Broken {
            fn parse(&self, _words: &[String]) -> Result<ParseTree, TreeError> {
                Err(TreeError::Empty)
            }
        }
        let policy = Arc::new(PolicyConfig::new(Language::English));
        let tagger = TreeTagger::new(
            Arc::clone(&policy),
            Arc::new(RuleSplitter::new()),
            Arc::new(Broken),
            Arc::new(RuleLemmatizer::new()),
            NormalizationRules::new(policy, Arc::new(AdjFormLexicon::empty())),
        );
        let mut out = Vec::new();
        assert!(matches!(
            tagger.tag_single_line("words here", &mut out),
            Err(TagError::Parse(TreeError::Empty))
        ));
    }

    #[test]
    fn chinese_final_punctuation_in_tree() {
        let tagger = tree_tagger(PolicyConfig::new(Language::Chinese));
        assert_eq!(single(&tagger, "你好。"), "(S (NP (NN 你好)) (。 。))\n");
    }
}
