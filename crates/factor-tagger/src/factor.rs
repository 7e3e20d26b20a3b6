use tagger_types::{FactorKind, FactorSpec, TaggedToken};

use crate::config::PolicyConfig;

/// Renders a token as its configured factors, e.g. `walked|walk|VBD`.
#[derive(Debug, Clone)]
pub struct FactorFormatter {
    spec: FactorSpec,
    delimiter: String,
    inner_delimiter: String,
}

impl FactorFormatter {
    pub fn new(
        spec: FactorSpec,
        delimiter: impl Into<String>,
        inner_delimiter: impl Into<String>,
    ) -> Self {
        Self {
            spec,
            delimiter: delimiter.into(),
            inner_delimiter: inner_delimiter.into(),
        }
    }

    pub fn from_policy(policy: &PolicyConfig) -> Self {
        Self::new(
            policy.factors.clone(),
            policy.factor_delimiter.clone(),
            policy.factor_inner_delimiter.clone(),
        )
    }

    pub fn format(&self, token: &TaggedToken) -> String {
        format_factors(token, &self.spec, &self.delimiter, &self.inner_delimiter)
    }
}

pub fn format_factors(
    token: &TaggedToken,
    spec: &FactorSpec,
    delimiter: &str,
    inner_delimiter: &str,
) -> String {
    let mut out = String::new();
    for (i, kind) in spec.kinds().iter().enumerate() {
        if i > 0 {
            out.push_str(delimiter);
        }
        match kind {
            FactorKind::Surface => out.push_str(&token.surface),
            FactorKind::Lemma => out.push_str(&token.lemma),
            FactorKind::Pos => out.push_str(&token.tag),
            FactorKind::LemmaPos => {
                out.push_str(&token.lemma);
                out.push_str(inner_delimiter);
                out.push_str(&token.tag);
            }
        }
    }
    out
}
