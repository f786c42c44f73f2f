// Copyright 2026 Oxide Computer Company

//! Writing merged trees to an output directory.

use crate::{AtomicWriteError, WriteTreeError};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::io::Write;
use synth_merge::FileTree;
use tracing::{debug, info};

/// Writes a [`FileTree`] into an output directory.
///
/// Each file is written atomically, replacing any existing file at the
/// same path. Files already in the output directory that are not part of
/// the tree are left alone. If writing stops partway, the output directory
/// holds a mix of old and new files; writing the same tree again completes
/// it.
#[derive(Clone, Debug)]
pub struct TreeWriter {
    output_dir: Utf8PathBuf,
    dry_run: bool,
}

impl TreeWriter {
    /// Creates a writer that places the merged package under `output_dir`.
    /// The directory is created on the first write if it is missing.
    pub fn new(output_dir: impl Into<Utf8PathBuf>) -> Self {
        TreeWriter { output_dir: output_dir.into(), dry_run: false }
    }

    /// If `dry_run` is true, [`write`](Self::write) reports the paths it
    /// would write without touching the filesystem.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns the output directory.
    pub fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }

    /// Writes every file in `tree`, creating directories as needed.
    ///
    /// Returns the full paths written (or, in dry-run mode, the paths that
    /// would have been written), in tree order.
    pub fn write(
        &self,
        tree: &FileTree,
    ) -> Result<Vec<Utf8PathBuf>, WriteTreeError> {
        let mut written = Vec::with_capacity(tree.len());
        for (path, contents) in tree.iter() {
            let output_path = self.output_dir.join(path);
            if self.dry_run {
                debug!(path = %output_path, bytes = contents.len(), "would write");
            } else {
                if let Some(parent) = output_path.parent() {
                    fs::create_dir_all(parent).map_err(|error| {
                        WriteTreeError::CreateDir {
                            path: parent.to_owned(),
                            error,
                        }
                    })?;
                }
                write_atomic(&output_path, contents).map_err(|error| {
                    WriteTreeError::WriteFile {
                        path: output_path.clone(),
                        error,
                    }
                })?;
                debug!(path = %output_path, bytes = contents.len(), "wrote");
            }
            written.push(output_path);
        }

        info!(
            output_dir = %self.output_dir,
            files = written.len(),
            dry_run = self.dry_run,
            "wrote merged tree"
        );
        Ok(written)
    }
}

fn write_atomic(path: &Utf8Path, contents: &[u8]) -> Result<(), AtomicWriteError> {
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(contents))
        .map_err(|error| match error {
            atomicwrites::Error::Internal(e) => AtomicWriteError::Rename(e),
            atomicwrites::Error::User(e) => AtomicWriteError::Write(e),
        })
}
