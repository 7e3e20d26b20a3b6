pub mod batch;
pub mod chunk_parser;
pub mod config;
pub mod factor;
pub mod lexicon_tagger;
pub mod model;
pub mod pipeline;
pub mod rules;
pub mod sentence;
pub mod sink;
pub mod splitter;
pub mod tagger;
pub mod tree;
pub mod tree_tagger;

pub use batch::{BatchDriver, BatchError, BatchReport};
pub use config::{
    BatchPaths, ConfigError, IoKind, ModelPaths, PolicyConfig, RunConfig, Settings, TaggerKind,
};
pub use factor::{FactorFormatter, format_factors};
pub use model::{ConstituencyParser, Lemmatizer, ModelError, PosTagger, SentenceSplitter};
pub use pipeline::build_tagger;
pub use rules::{NormalizationRules, Normalized};
pub use sentence::SentenceTagger;
pub use tagger::{LineTagger, TagError, TagStats};
pub use tree::{NodeId, ParseTree, TreeError};
pub use tree_tagger::TreeTagger;
