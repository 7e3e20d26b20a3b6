use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::fmt::{MakeWriter, SubscriberBuilder};

use factor_tagger::{BatchDriver, IoKind, LineTagger, Settings, build_tagger};

#[derive(Parser)]
#[command(name = "factor-tagger")]
#[command(about = "Tag or parse text and write factored or bracketed output")]
struct Cli {
    /// JSON settings file; flags given here take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
    /// factor or tree
    #[arg(long)]
    tagger_type: Option<String>,
    /// stdio or file
    #[arg(long)]
    io: Option<String>,
    /// chinese or english
    #[arg(long)]
    language: Option<String>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    auto_split_sentence: Option<bool>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    eof_mark: Option<bool>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    normalize_nouns: Option<bool>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    normalize_verbs: Option<bool>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    normalize_comparatives: Option<bool>,
    #[arg(long)]
    factor_delimiter: Option<String>,
    #[arg(long)]
    factor_inner_delimiter: Option<String>,
    /// Space-separated factors from surface, lemma, pos and lemma-pos.
    #[arg(long)]
    factor_list: Option<String>,
    /// Print stems instead of words in trees.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    tree_stem: Option<bool>,
    #[arg(long)]
    adj_form_dictionary: Option<PathBuf>,
    #[arg(long)]
    pos_model: Option<PathBuf>,
    #[arg(long)]
    grammar_model: Option<PathBuf>,
    /// Directory holding noun.exc, verb.exc, adj.exc and adv.exc.
    #[arg(long)]
    lemma_exceptions: Option<PathBuf>,
    #[arg(long)]
    source_path: Option<PathBuf>,
    #[arg(long)]
    target_path_all: Option<PathBuf>,
    #[arg(long)]
    target_path_pos: Option<PathBuf>,
}

impl Cli {
    fn into_settings(self) -> Result<Settings> {
        let base = match &self.config {
            Some(path) => Settings::from_json_file(path)?,
            None => Settings::default(),
        };
        let flags = Settings {
            tagger_type: self.tagger_type,
            io: self.io,
            language: self.language,
            auto_split_sentence: self.auto_split_sentence,
            eof_mark: self.eof_mark,
            normalize_nouns: self.normalize_nouns,
            normalize_verbs: self.normalize_verbs,
            normalize_comparatives: self.normalize_comparatives,
            tree_stem: self.tree_stem,
            factor_delimiter: self.factor_delimiter,
            factor_inner_delimiter: self.factor_inner_delimiter,
            factor_list: self.factor_list,
            adj_form_dictionary: self.adj_form_dictionary,
            pos_model: self.pos_model,
            grammar_model: self.grammar_model,
            lemma_exceptions: self.lemma_exceptions,
            source_path: self.source_path,
            target_path_all: self.target_path_all,
            target_path_pos: self.target_path_pos,
        };
        Ok(base.merge(flags))
    }
}

fn main() -> Result<()> {
    init_tracing();

    let config = Cli::parse().into_settings()?.resolve()?;
    info!(
        "language {}, factors [{}] joined by {:?}",
        config.policy.language, config.policy.factors, config.policy.factor_delimiter
    );
    let tagger = build_tagger(&config)?;

    match (config.io, &config.batch) {
        (IoKind::File, Some(batch)) => {
            let report = BatchDriver::new(tagger.as_ref()).run(
                &batch.source,
                &batch.target_all,
                batch.target_pos.as_deref(),
            )?;
            if report.files_failed > 0 {
                warn!("{} files could not be tagged", report.files_failed);
            }
        }
        _ => serve_stdio(tagger.as_ref())?,
    }
    Ok(())
}

/// Answer one request per input line until stdin closes.
fn serve_stdio(tagger: &dyn LineTagger) -> Result<()> {
    info!("reading from stdin");
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut lines = 0u64;
    for line in stdin.lock().lines() {
        let line = line?;
        tagger.tag_single_line(line.trim_end_matches('\r'), &mut out)?;
        lines += 1;
    }
    out.flush()?;
    info!("stdin closed after {lines} lines");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    log_subscriber(env_filter, io::stderr).init();
}

fn log_subscriber<W>(
    env_filter: EnvFilter,
    writer: W,
) -> SubscriberBuilder<DefaultFields, Format, EnvFilter, W>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_writer(writer)
}
