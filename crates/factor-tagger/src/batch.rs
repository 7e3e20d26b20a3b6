//! Directory-tree batch tagging.
//!
//! The source tree is mirrored under one target root for the full output and,
//! for taggers that write one, a second root for the POS-only stream. A file
//! that cannot be read or written is logged and counted; the walk carries on.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::tagger::{LineTagger, TagStats};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("target {0} exists and is not a directory")]
    TargetNotDirectory(PathBuf),
    #[error("failed to read directory {path}: {source}")]
    Walk { path: PathBuf, source: io::Error },
}

/// Totals for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub files_tagged: u64,
    pub files_failed: u64,
    pub dirs_created: u64,
    pub words: u64,
}

pub struct BatchDriver<'t> {
    tagger: &'t dyn LineTagger,
}

impl<'t> BatchDriver<'t> {
    pub fn new(tagger: &'t dyn LineTagger) -> Self {
        Self { tagger }
    }

    /// Tag every file under `source` into the matching path under the targets.
    pub fn run(
        &self,
        source: &Path,
        target_all: &Path,
        target_pos: Option<&Path>,
    ) -> Result<BatchReport, BatchError> {
        let target_pos = match target_pos {
            Some(pos) if !self.tagger.writes_pos_stream() => {
                warn!(
                    "ignoring POS target {}: this tagger writes a single stream",
                    pos.display()
                );
                None
            }
            other => other,
        };

        let started = Instant::now();
        let mut walk = Walk {
            tagger: self.tagger,
            visited: HashSet::new(),
            report: BatchReport::default(),
        };
        walk.dir(source, target_all, target_pos)?;
        let report = walk.report;
        info!(
            "all files tagged: {} files, {} failed, {} words in {} ms",
            report.files_tagged,
            report.files_failed,
            report.words,
            started.elapsed().as_millis()
        );
        Ok(report)
    }
}

struct Walk<'t> {
    tagger: &'t dyn LineTagger,
    visited: HashSet<PathBuf>,
    report: BatchReport,
}

impl Walk<'_> {
    fn dir(&mut self, dir: &Path, all: &Path, pos: Option<&Path>) -> Result<(), BatchError> {
        let walk_err = |source: io::Error| BatchError::Walk {
            path: dir.to_path_buf(),
            source,
        };
        let canonical = fs::canonicalize(dir).map_err(walk_err)?;
        if !self.visited.insert(canonical) {
            warn!("skipping {}: directory already visited", dir.display());
            return Ok(());
        }

        self.ensure_dir(all)?;
        if let Some(pos) = pos {
            self.ensure_dir(pos)?;
        }

        let mut entries = fs::read_dir(dir)
            .map_err(walk_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(walk_err)?;
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let name = entry.file_name();
            // Follows symbolic links.
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(err) => {
                    error!("cannot stat {}: {err}", path.display());
                    self.report.files_failed += 1;
                    continue;
                }
            };
            let pos_child = pos.map(|pos| pos.join(&name));
            if metadata.is_dir() {
                self.dir(&path, &all.join(&name), pos_child.as_deref())?;
            } else if metadata.is_file() {
                self.file(&path, &all.join(&name), pos_child.as_deref());
            } else {
                debug!("skipping {}: not a regular file", path.display());
            }
        }
        Ok(())
    }

    fn ensure_dir(&mut self, path: &Path) -> Result<(), BatchError> {
        if path.is_dir() {
            return Ok(());
        }
        if path.exists() {
            return Err(BatchError::TargetNotDirectory(path.to_path_buf()));
        }
        fs::create_dir_all(path).map_err(|source| match source.kind() {
            io::ErrorKind::AlreadyExists => BatchError::TargetNotDirectory(path.to_path_buf()),
            _ => BatchError::CreateDir {
                path: path.to_path_buf(),
                source,
            },
        })?;
        debug!("created {}", path.display());
        self.report.dirs_created += 1;
        Ok(())
    }

    fn file(&mut self, source: &Path, all: &Path, pos: Option<&Path>) {
        match tag_file(self.tagger, source, all, pos) {
            Ok(stats) => {
                debug!(
                    "tagged {} ({} lines, {} words)",
                    source.display(),
                    stats.lines,
                    stats.words
                );
                self.report.files_tagged += 1;
                self.report.words += stats.words;
            }
            Err(err) => {
                error!("{err:#}");
                self.report.files_failed += 1;
            }
        }
    }
}

fn tag_file(
    tagger: &dyn LineTagger,
    source: &Path,
    all: &Path,
    pos: Option<&Path>,
) -> anyhow::Result<TagStats> {
    let input = File::open(source).with_context(|| format!("open {}", source.display()))?;
    let mut input = BufReader::new(input);
    let mut all_out = BufWriter::new(
        File::create(all).with_context(|| format!("create {}", all.display()))?,
    );
    let mut pos_out = match pos {
        Some(pos) => Some(BufWriter::new(
            File::create(pos).with_context(|| format!("create {}", pos.display()))?,
        )),
        None => None,
    };
    let stats = tagger
        .tag_multi_line(
            &mut input,
            &mut all_out,
            pos_out.as_mut().map(|out| out as &mut dyn Write),
        )
        .with_context(|| format!("tag {}", source.display()))?;
    Ok(stats)
}
