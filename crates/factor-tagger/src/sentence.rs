use std::sync::Arc;

use tagger_types::TaggedToken;

use crate::config::PolicyConfig;
use crate::factor::FactorFormatter;
use crate::model::{Lemmatizer, PosTagger, SentenceSplitter};
use crate::rules::NormalizationRules;
use crate::sink::FanOut;
use crate::tagger::{LineCounts, LineTagger, TagError, Throughput};

/// Flat tagger: one factored token per word, with an optional POS-only stream.
pub struct SentenceTagger {
    policy: Arc<PolicyConfig>,
    splitter: Arc<dyn SentenceSplitter>,
    tagger: Arc<dyn PosTagger>,
    lemmatizer: Arc<dyn Lemmatizer>,
    rules: NormalizationRules,
    formatter: FactorFormatter,
}

impl SentenceTagger {
    pub fn new(
        policy: Arc<PolicyConfig>,
        splitter: Arc<dyn SentenceSplitter>,
        tagger: Arc<dyn PosTagger>,
        lemmatizer: Arc<dyn Lemmatizer>,
        rules: NormalizationRules,
    ) -> Self {
        let formatter = FactorFormatter::from_policy(&policy);
        Self {
            policy,
            splitter,
            tagger,
            lemmatizer,
            rules,
            formatter,
        }
    }

    /// Tag and normalize one sentence.
    ///
    /// The lemma comes from the tag the model assigned; normalization may then
    /// rewrite the tag and replace the lemma with a dictionary base form.
    pub fn tag_sentence(&self, words: &[String]) -> Vec<TaggedToken> {
        self.tagger
            .tag(words)
            .into_iter()
            .map(|(surface, tag)| {
                let lemma = self.lemmatizer.lemma(&surface, &tag);
                let normalized = self.rules.normalize(&surface, &tag);
                TaggedToken::new(surface, normalized.tag, normalized.stem.unwrap_or(lemma))
            })
            .collect()
    }
}

impl LineTagger for SentenceTagger {
    fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    fn tag_line(&self, line: &str, out: &mut FanOut<'_>) -> Result<LineCounts, TagError> {
        let auto_split = self.policy.auto_split_sentences;
        let mut counts = LineCounts::default();
        for (i, sentence) in self.splitter.split(line).iter().enumerate() {
            if i > 0 && !auto_split {
                out.space()?;
            }
            for (j, token) in self.tag_sentence(sentence).iter().enumerate() {
                if j > 0 {
                    out.space()?;
                }
                out.token(token, &self.formatter)?;
                counts.words += 1;
            }
            if auto_split {
                out.newline()?;
            }
            counts.sentences += 1;
        }
        if !auto_split {
            out.newline()?;
        }
        Ok(counts)
    }

    fn writes_pos_stream(&self) -> bool {
        true
    }

    fn throughput(&self) -> Throughput {
        Throughput::Words
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon_tagger::LexiconTagger;
    use crate::splitter::RuleSplitter;
    use std::io::Cursor;
    use tagger_morph::{AdjFormLexicon, RuleLemmatizer};
    use tagger_types::{FactorSpec, Language};

    fn tagger(policy: PolicyConfig) -> SentenceTagger {
        let lexicon = "good\tbetter\tbest\n";
        let lexicon = AdjFormLexicon::from_reader(Cursor::new(lexicon), "test").unwrap();
        let policy = Arc::new(policy);
        let rules = NormalizationRules::new(Arc::clone(&policy), Arc::new(lexicon));
        SentenceTagger::new(
            Arc::clone(&policy),
            Arc::new(RuleSplitter::new()),
            Arc::new(LexiconTagger::new(policy.language)),
            Arc::new(RuleLemmatizer::new()),
            rules,
        )
    }

    fn single(tagger: &SentenceTagger, line: &str) -> String {
        let mut out = Vec::new();
        tagger.tag_single_line(line, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn default_factors() {
        let tagger = tagger(PolicyConfig::new(Language::English));
        assert_eq!(
            single(&tagger, "the dogs walked"),
            "the|the|DT dogs|dog|NNS walked|walk|VBD\n"
        );
    }

    #[test]
    fn sentences_share_a_line_unless_auto_split() {
        let joined = tagger(PolicyConfig {
            factors: FactorSpec::parse("surface").unwrap(),
            ..PolicyConfig::new(Language::English)
        });
        assert_eq!(single(&joined, "Go now. Stop."), "Go now . Stop .\n");

        let split = tagger(PolicyConfig {
            factors: FactorSpec::parse("surface").unwrap(),
            auto_split_sentences: true,
            ..PolicyConfig::new(Language::English)
        });
        assert_eq!(single(&split, "Go now. Stop."), "Go now .\nStop .\n");
    }

    #[test]
    fn blank_lines() {
        let joined = tagger(PolicyConfig::new(Language::English));
        assert_eq!(single(&joined, "   "), "\n");
        let split = tagger(PolicyConfig {
            auto_split_sentences: true,
            ..PolicyConfig::new(Language::English)
        });
        assert_eq!(single(&split, ""), "");
    }

    #[test]
    fn normalization_flows_into_factors() {
        let tagger = tagger(PolicyConfig {
            normalize_nouns: true,
            normalize_verbs: true,
            normalize_comparatives: true,
            factors: FactorSpec::parse("surface lemma-pos").unwrap(),
            ..PolicyConfig::new(Language::English)
        });
        let tokens = tagger.tag_sentence(&["dogs".to_string(), "is".to_string()]);
        assert_eq!(tokens[0], TaggedToken::new("dogs", "NN", "dog"));
        assert_eq!(tokens[1], TaggedToken::new("is", "VB", "be"));
        assert_eq!(single(&tagger, "dogs is"), "dogs|dog_NN is|be_VB\n");
    }

    #[test]
    fn eof_marker_after_single_line() {
        let tagger = tagger(PolicyConfig {
            emit_eof_marker: true,
            factors: FactorSpec::parse("surface pos").unwrap(),
            ..PolicyConfig::new(Language::English)
        });
        assert_eq!(single(&tagger, "Hello world."), "Hello|NNP world|NN .|.\n__EOF__\n");
    }

    #[test]
    fn pos_stream_stays_aligned() {
        let tagger = tagger(PolicyConfig::new(Language::English));
        let mut input = Cursor::new("the dogs walked\n\nHello world.\n");
        let mut all = Vec::new();
        let mut pos = Vec::new();
        let stats = tagger
            .tag_multi_line(&mut input, &mut all, Some(&mut pos))
            .unwrap();
        assert_eq!(
            String::from_utf8(pos).unwrap(),
            "DT NNS VBD\n\nNNP NN .\n"
        );
        assert_eq!(String::from_utf8(all).unwrap().lines().count(), 3);
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.words, 6);
        assert_eq!(stats.sentences, 2);
    }

    #[test]
    fn chinese_sentence_final_tag() {
        let tagger = tagger(PolicyConfig {
            factors: FactorSpec::parse("surface pos").unwrap(),
            ..PolicyConfig::new(Language::Chinese)
        });
        assert_eq!(single(&tagger, "你好。"), "你好|NN 。|。\n");
    }
}
