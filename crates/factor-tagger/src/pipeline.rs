use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tagger_morph::{AdjFormLexicon, RuleLemmatizer};
use tagger_types::Language;
use tracing::{info, warn};

use crate::chunk_parser::ChunkParser;
use crate::config::{ModelPaths, RunConfig, TaggerKind};
use crate::lexicon_tagger::LexiconTagger;
use crate::model::{ConstituencyParser, IdentityLemmatizer, Lemmatizer, PosTagger, SentenceSplitter};
use crate::rules::NormalizationRules;
use crate::sentence::SentenceTagger;
use crate::splitter::RuleSplitter;
use crate::tagger::LineTagger;
use crate::tree_tagger::TreeTagger;

/// Load every model the run needs and assemble the selected tagger.
pub fn build_tagger(config: &RunConfig) -> Result<Box<dyn LineTagger>> {
    let started = Instant::now();
    let policy = Arc::new(config.policy.clone());
    let language = policy.language;
    let models = &config.models;

    let lexicon = match &models.adj_form_dictionary {
        Some(path) => AdjFormLexicon::load(path)?,
        None => AdjFormLexicon::empty(),
    };
    if policy.normalize_comparatives && lexicon.is_empty() {
        warn!("comparative normalization is on but no adjective forms are loaded");
    }
    let rules = NormalizationRules::new(Arc::clone(&policy), Arc::new(lexicon));

    let splitter: Arc<dyn SentenceSplitter> = Arc::new(RuleSplitter::new());
    let pos = load_pos_tagger(language, models)?;
    let lemmatizer = load_lemmatizer(language, models)?;

    let tagger: Box<dyn LineTagger> = match config.tagger {
        TaggerKind::Factor => Box::new(SentenceTagger::new(
            policy,
            splitter,
            pos,
            lemmatizer,
            rules,
        )),
        TaggerKind::Tree => {
            let parser: Arc<dyn ConstituencyParser> = match &models.grammar_model {
                Some(path) => Arc::new(ChunkParser::load(pos, path)?),
                None => Arc::new(ChunkParser::new(pos)),
            };
            Box::new(TreeTagger::new(policy, splitter, parser, lemmatizer, rules))
        }
    };
    info!(
        "{} tagger for {} ready in {} ms",
        match config.tagger {
            TaggerKind::Factor => "factor",
            TaggerKind::Tree => "tree",
        },
        language,
        started.elapsed().as_millis()
    );
    Ok(tagger)
}

fn load_pos_tagger(language: Language, models: &ModelPaths) -> Result<Arc<dyn PosTagger>> {
    let tagger = match &models.pos_model {
        Some(path) => LexiconTagger::load(language, path)?,
        None => LexiconTagger::new(language),
    };
    Ok(Arc::new(tagger))
}

fn load_lemmatizer(language: Language, models: &ModelPaths) -> Result<Arc<dyn Lemmatizer>> {
    if language == Language::Chinese {
        return Ok(Arc::new(IdentityLemmatizer));
    }
    let lemmatizer = match &models.lemma_exceptions {
        Some(dir) => RuleLemmatizer::load(dir)
            .with_context(|| format!("load lemma exceptions from {}", dir.display()))?,
        None => RuleLemmatizer::new(),
    };
    Ok(Arc::new(lemmatizer))
}
