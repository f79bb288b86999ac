//! CSV emission. Every dataset of a run is staged as a temporary sibling and
//! the whole set is moved into place only once all of them were written. A
//! failure at any point removes the staged files and restores the previous
//! outputs.

use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{PipelineError, Result};

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

#[derive(Debug)]
struct Staged {
    tmp: PathBuf,
    path: PathBuf,
}

/// Output files of one run, written together or not at all.
#[derive(Debug, Default)]
pub struct OutputBatch {
    staged: Vec<Staged>,
}

impl OutputBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Serialize `records` under an explicit header row into the staging file
    /// for `path`. An empty slice still produces a headed file.
    pub fn stage_records<T: Serialize>(
        &mut self,
        path: &Path,
        headers: &[&str],
        records: &[T],
    ) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = sibling(path, ".tmp");
        let written = File::create(&tmp)
            .map_err(PipelineError::from)
            .and_then(|file| {
                let mut wtr = csv::WriterBuilder::new()
                    .has_headers(false)
                    .from_writer(BufWriter::new(file));
                wtr.write_record(headers)?;
                for record in records {
                    wtr.serialize(record)?;
                }
                wtr.flush()?;
                Ok(())
            });
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        debug!("Staged {}", tmp.display());
        self.staged.push(Staged {
            tmp,
            path: path.to_path_buf(),
        });
        Ok(())
    }

    /// Move every staged file into place. If any move fails, files already
    /// moved are removed again and the outputs they replaced are restored.
    pub fn commit(mut self) -> Result<Vec<PathBuf>> {
        let staged = std::mem::take(&mut self.staged);

        if let Some(blocked) = staged.iter().find(|s| s.path.is_dir()) {
            discard(&staged);
            return Err(PipelineError::Output(format!(
                "{} is a directory",
                blocked.path.display()
            )));
        }

        let mut backups = Vec::new();
        let mut promoted = Vec::new();
        if let Err(e) = promote(&staged, &mut backups, &mut promoted) {
            warn!("Restoring previous outputs after failed write: {}", e);
            for path in &promoted {
                let _ = fs::remove_file(path);
            }
            for (backup, path) in &backups {
                let _ = fs::rename(backup, path);
            }
            discard(&staged);
            return Err(e);
        }

        for (backup, _) in &backups {
            let _ = fs::remove_file(backup);
        }
        Ok(promoted)
    }
}

impl Drop for OutputBatch {
    fn drop(&mut self) {
        discard(&self.staged);
    }
}

fn promote(
    staged: &[Staged],
    backups: &mut Vec<(PathBuf, PathBuf)>,
    promoted: &mut Vec<PathBuf>,
) -> Result<()> {
    for s in staged {
        if s.path.exists() {
            let backup = sibling(&s.path, ".bak");
            fs::rename(&s.path, &backup)?;
            backups.push((backup, s.path.clone()));
        }
        fs::rename(&s.tmp, &s.path)?;
        debug!("Wrote {}", s.path.display());
        promoted.push(s.path.clone());
    }
    Ok(())
}

fn discard(staged: &[Staged]) {
    for s in staged {
        let _ = fs::remove_file(&s.tmp);
    }
}

/// File name for one sector's split. Path separators are replaced and an
/// absent sector is written as `Unknown`.
pub fn sector_file_name(sector: Option<&str>) -> String {
    let label = sector.unwrap_or("Unknown");
    let safe: String = label
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();
    format!("{}.csv", safe.trim())
}
