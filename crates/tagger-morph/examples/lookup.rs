use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tagger_morph::{AdjFormLexicon, RuleLemmatizer};
use tagger_types::Degree;

const USAGE: &str = "usage: cargo run -p tagger-morph --example lookup -- [--exc <dir>] [--forms <file>] <word>/<TAG>...";

fn main() -> Result<()> {
    let mut exc_dir: Option<PathBuf> = None;
    let mut forms: Option<PathBuf> = None;
    let mut queries = Vec::new();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--exc" => exc_dir = Some(args.next().map(PathBuf::from).context(USAGE)?),
            "--forms" => forms = Some(args.next().map(PathBuf::from).context(USAGE)?),
            _ => queries.push(arg),
        }
    }
    if queries.is_empty() {
        bail!(USAGE);
    }

    let lemmatizer = match &exc_dir {
        Some(dir) => RuleLemmatizer::load(dir)
            .with_context(|| format!("loading exceptions from {}", dir.display()))?,
        None => RuleLemmatizer::new(),
    };
    let lexicon = match &forms {
        Some(path) => AdjFormLexicon::load(path)?,
        None => AdjFormLexicon::empty(),
    };

    for query in queries {
        let Some((word, tag)) = query.rsplit_once('/') else {
            bail!("expected <word>/<TAG>, got {query}");
        };
        println!("\n{word} [{tag}]");
        for cand in lemmatizer.candidates(word, tag) {
            println!("    {:<12} [{:?}]", cand.lemma, cand.source);
        }
        if let Some(degree) = Degree::from_penn(tag)
            && let Some(base) = lexicon.base_form(degree, word)
        {
            println!("    {:<12} [{:?} override]", base, degree);
        }
    }

    Ok(())
}
