use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tagger_types::{FactorSpec, Language, UnknownName};
use thiserror::Error;

pub const DEFAULT_FACTOR_DELIMITER: &str = "|";
pub const DEFAULT_FACTOR_INNER_DELIMITER: &str = "_";
pub const DEFAULT_FACTOR_LIST: &str = "surface lemma pos";

/// Output policy shared read-only by the rules, the formatter and both taggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfig {
    pub language: Language,
    pub normalize_nouns: bool,
    pub normalize_verbs: bool,
    pub normalize_comparatives: bool,
    pub use_stem_in_tree: bool,
    pub factors: FactorSpec,
    pub factor_delimiter: String,
    pub factor_inner_delimiter: String,
    pub auto_split_sentences: bool,
    pub emit_eof_marker: bool,
}

impl PolicyConfig {
    /// Defaults for `language`: no normalization, `surface lemma pos` joined by `|`.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            normalize_nouns: false,
            normalize_verbs: false,
            normalize_comparatives: false,
            use_stem_in_tree: false,
            factors: FactorSpec::default(),
            factor_delimiter: DEFAULT_FACTOR_DELIMITER.to_string(),
            factor_inner_delimiter: DEFAULT_FACTOR_INNER_DELIMITER.to_string(),
            auto_split_sentences: false,
            emit_eof_marker: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaggerKind {
    Factor,
    Tree,
}

impl FromStr for TaggerKind {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "factor" => Ok(TaggerKind::Factor),
            "tree" => Ok(TaggerKind::Tree),
            _ => Err(UnknownName::new("tagger type", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoKind {
    Stdio,
    File,
}

impl FromStr for IoKind {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stdio" => Ok(IoKind::Stdio),
            "file" => Ok(IoKind::File),
            _ => Err(UnknownName::new("io type", s)),
        }
    }
}

/// Files backing the models and the adjective form dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelPaths {
    pub adj_form_dictionary: Option<PathBuf>,
    pub pos_model: Option<PathBuf>,
    pub grammar_model: Option<PathBuf>,
    pub lemma_exceptions: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPaths {
    pub source: PathBuf,
    pub target_all: PathBuf,
    pub target_pos: Option<PathBuf>,
}

/// Fully validated configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub tagger: TaggerKind,
    pub io: IoKind,
    pub policy: PolicyConfig,
    pub models: ModelPaths,
    /// Present exactly when `io` is [`IoKind::File`].
    pub batch: Option<BatchPaths>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("language is required (chinese or english)")]
    MissingLanguage,
    #[error("{0}")]
    UnknownValue(UnknownName),
    #[error("unknown factor \"{0}\" (expected surface, lemma, pos or lemma-pos)")]
    UnknownFactor(String),
    #[error("{0} is required when io is file")]
    MissingPath(&'static str),
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl From<UnknownName> for ConfigError {
    fn from(err: UnknownName) -> Self {
        if err.field == "factor" {
            ConfigError::UnknownFactor(err.value)
        } else {
            ConfigError::UnknownValue(err)
        }
    }
}

/// Raw settings as read from a JSON file and overlaid with command-line flags.
///
/// Everything is optional here; [`Settings::resolve`] applies defaults and
/// rejects incomplete or unknown values.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub tagger_type: Option<String>,
    pub io: Option<String>,
    pub language: Option<String>,
    pub auto_split_sentence: Option<bool>,
    pub eof_mark: Option<bool>,
    pub normalize_nouns: Option<bool>,
    pub normalize_verbs: Option<bool>,
    pub normalize_comparatives: Option<bool>,
    pub tree_stem: Option<bool>,
    pub factor_delimiter: Option<String>,
    pub factor_inner_delimiter: Option<String>,
    pub factor_list: Option<String>,
    pub adj_form_dictionary: Option<PathBuf>,
    pub pos_model: Option<PathBuf>,
    pub grammar_model: Option<PathBuf>,
    pub lemma_exceptions: Option<PathBuf>,
    pub source_path: Option<PathBuf>,
    pub target_path_all: Option<PathBuf>,
    pub target_path_pos: Option<PathBuf>,
}

impl Settings {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay `other` on top of `self`: every value set in `other` wins.
    pub fn merge(self, other: Settings) -> Settings {
        Settings {
            tagger_type: other.tagger_type.or(self.tagger_type),
            io: other.io.or(self.io),
            language: other.language.or(self.language),
            auto_split_sentence: other.auto_split_sentence.or(self.auto_split_sentence),
            eof_mark: other.eof_mark.or(self.eof_mark),
            normalize_nouns: other.normalize_nouns.or(self.normalize_nouns),
            normalize_verbs: other.normalize_verbs.or(self.normalize_verbs),
            normalize_comparatives: other.normalize_comparatives.or(self.normalize_comparatives),
            tree_stem: other.tree_stem.or(self.tree_stem),
            factor_delimiter: other.factor_delimiter.or(self.factor_delimiter),
            factor_inner_delimiter: other.factor_inner_delimiter.or(self.factor_inner_delimiter),
            factor_list: other.factor_list.or(self.factor_list),
            adj_form_dictionary: other.adj_form_dictionary.or(self.adj_form_dictionary),
            pos_model: other.pos_model.or(self.pos_model),
            grammar_model: other.grammar_model.or(self.grammar_model),
            lemma_exceptions: other.lemma_exceptions.or(self.lemma_exceptions),
            source_path: other.source_path.or(self.source_path),
            target_path_all: other.target_path_all.or(self.target_path_all),
            target_path_pos: other.target_path_pos.or(self.target_path_pos),
        }
    }

    pub fn resolve(self) -> Result<RunConfig, ConfigError> {
        let language: Language = self
            .language
            .as_deref()
            .ok_or(ConfigError::MissingLanguage)?
            .parse()?;
        let tagger = match self.tagger_type.as_deref() {
            Some(raw) => raw.parse()?,
            None => TaggerKind::Factor,
        };
        let io = match self.io.as_deref() {
            Some(raw) => raw.parse()?,
            None => IoKind::Stdio,
        };
        let factors = FactorSpec::parse(self.factor_list.as_deref().unwrap_or(DEFAULT_FACTOR_LIST))?;

        let policy = PolicyConfig {
            language,
            normalize_nouns: self.normalize_nouns.unwrap_or(false),
            normalize_verbs: self.normalize_verbs.unwrap_or(false),
            normalize_comparatives: self.normalize_comparatives.unwrap_or(false),
            use_stem_in_tree: self.tree_stem.unwrap_or(false),
            factors,
            factor_delimiter: self
                .factor_delimiter
                .unwrap_or_else(|| DEFAULT_FACTOR_DELIMITER.to_string()),
            factor_inner_delimiter: self
                .factor_inner_delimiter
                .unwrap_or_else(|| DEFAULT_FACTOR_INNER_DELIMITER.to_string()),
            auto_split_sentences: self.auto_split_sentence.unwrap_or(false),
            emit_eof_marker: self.eof_mark.unwrap_or(false),
        };

        let batch = match io {
            IoKind::Stdio => None,
            IoKind::File => Some(BatchPaths {
                source: self.source_path.ok_or(ConfigError::MissingPath("source path"))?,
                target_all: self
                    .target_path_all
                    .ok_or(ConfigError::MissingPath("target path for all factors"))?,
                target_pos: self.target_path_pos,
            }),
        };

        Ok(RunConfig {
            tagger,
            io,
            policy,
            models: ModelPaths {
                adj_form_dictionary: self.adj_form_dictionary,
                pos_model: self.pos_model,
                grammar_model: self.grammar_model,
                lemma_exceptions: self.lemma_exceptions,
            },
            batch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tagger_types::FactorKind;
    use tempfile::NamedTempFile;

    fn english() -> Settings {
        Settings {
            language: Some("english".into()),
            ..Settings::default()
        }
    }

    #[test]
    fn resolves_defaults() {
        let config = english().resolve().unwrap();
        assert_eq!(config.tagger, TaggerKind::Factor);
        assert_eq!(config.io, IoKind::Stdio);
        assert_eq!(config.policy, PolicyConfig::new(Language::English));
        assert!(config.batch.is_none());
    }

    #[test]
    fn language_is_required() {
        assert!(matches!(
            Settings::default().resolve(),
            Err(ConfigError::MissingLanguage)
        ));
    }

    #[test]
    fn rejects_unknown_enum_values() {
        let settings = Settings {
            tagger_type: Some("forest".into()),
            ..english()
        };
        let err = settings.resolve().unwrap_err();
        assert_eq!(err.to_string(), "unknown tagger type \"forest\"");
    }

    #[test]
    fn rejects_unknown_factors() {
        let settings = Settings {
            factor_list: Some("surface lemmapos".into()),
            ..english()
        };
        assert!(matches!(
            settings.resolve(),
            Err(ConfigError::UnknownFactor(name)) if name == "lemmapos"
        ));
    }

    #[test]
    fn file_io_requires_paths() {
        let settings = Settings {
            io: Some("FILE".into()),
            source_path: Some("in".into()),
            ..english()
        };
        assert!(matches!(
            settings.resolve(),
            Err(ConfigError::MissingPath(_))
        ));

        let settings = Settings {
            io: Some("file".into()),
            source_path: Some("in".into()),
            target_path_all: Some("out".into()),
            ..english()
        };
        let batch = settings.resolve().unwrap().batch.unwrap();
        assert_eq!(batch.source, PathBuf::from("in"));
        assert_eq!(batch.target_pos, None);
    }

    #[test]
    fn cli_values_override_file_values() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"language": "chinese", "factor_list": "pos", "factor_delimiter": "/", "eof_mark": true}}"#
        )
        .unwrap();
        let from_file = Settings::from_json_file(file.path()).unwrap();
        let cli = Settings {
            language: Some("english".into()),
            factor_list: Some("surface lemma-pos".into()),
            ..Settings::default()
        };
        let config = from_file.merge(cli).resolve().unwrap();
        assert_eq!(config.policy.language, Language::English);
        assert_eq!(config.policy.factor_delimiter, "/");
        assert!(config.policy.emit_eof_marker);
        assert_eq!(
            config.policy.factors.kinds(),
            &[FactorKind::Surface, FactorKind::LemmaPos]
        );
    }

    #[test]
    fn cli_can_switch_off_a_flag_from_the_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"language": "english", "eof_mark": true, "normalize_nouns": true}}"#
        )
        .unwrap();
        let from_file = Settings::from_json_file(file.path()).unwrap();
        let cli = Settings {
            eof_mark: Some(false),
            ..Settings::default()
        };
        let config = from_file.merge(cli).resolve().unwrap();
        assert!(!config.policy.emit_eof_marker);
        assert!(config.policy.normalize_nouns);
    }

    #[test]
    fn settings_file_rejects_unknown_keys() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"language": "english", "colour": "red"}}"#).unwrap();
        assert!(matches!(
            Settings::from_json_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
