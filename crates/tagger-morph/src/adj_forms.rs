use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tagger_types::Degree;
use tracing::debug;

/// Irregular comparative/superlative forms mapped back to their base form.
///
/// Keys are the inflected forms, case-folded. The first entry for a key wins;
/// later duplicates in the source file are ignored.
#[derive(Clone, Debug, Default)]
pub struct AdjFormLexicon {
    comparative: HashMap<String, String>,
    superlative: HashMap<String, String>,
}

impl AdjFormLexicon {
    /// A lexicon with no entries; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a `base<TAB>comparative<TAB>superlative` dictionary file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("open adjective form dictionary {}", path.display()))?;
        let lexicon = Self::from_reader(BufReader::new(file), &path.display().to_string())?;
        debug!(
            "loaded {} comparative and {} superlative forms from {}",
            lexicon.comparative.len(),
            lexicon.superlative.len(),
            path.display()
        );
        Ok(lexicon)
    }

    /// Parse dictionary lines from any reader. `origin` names the source in errors.
    ///
    /// Each line is lowercased and split on tabs, and every field is trimmed. Blank lines
    /// are skipped; a line with fewer than three fields is an error.
    pub fn from_reader<R: BufRead>(reader: R, origin: &str) -> Result<Self> {
        let mut lexicon = Self::default();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("read line {} in {origin}", lineno + 1))?;
            let line = line.trim().to_lowercase();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            if fields.len() < 3 {
                bail!(
                    "{origin}:{} malformed adjective form line (expected base, comparative and superlative separated by tabs)",
                    lineno + 1
                );
            }
            let base = fields[0];
            lexicon
                .comparative
                .entry(fields[1].to_string())
                .or_insert_with(|| base.to_string());
            lexicon
                .superlative
                .entry(fields[2].to_string())
                .or_insert_with(|| base.to_string());
        }
        Ok(lexicon)
    }

    /// Base form for an inflected word of the given degree, if listed.
    pub fn base_form(&self, degree: Degree, word: &str) -> Option<&str> {
        let map = match degree {
            Degree::Comparative => &self.comparative,
            Degree::Superlative => &self.superlative,
        };
        map.get(&word.to_lowercase()).map(String::as_str)
    }

    pub fn comparative_base(&self, word: &str) -> Option<&str> {
        self.base_form(Degree::Comparative, word)
    }

    pub fn superlative_base(&self, word: &str) -> Option<&str> {
        self.base_form(Degree::Superlative, word)
    }

    /// Number of distinct inflected forms across both maps.
    pub fn len(&self) -> usize {
        self.comparative.len() + self.superlative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comparative.is_empty() && self.superlative.is_empty()
    }
}
