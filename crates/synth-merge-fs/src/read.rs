// Copyright 2026 Oxide Computer Company

//! Reading file trees from directories.

use crate::ReadTreeError;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::io;
use synth_merge::{FileTree, PathPattern};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Entries with these names are version-control metadata and are never
/// part of a package.
const VCS_NAMES: &[&str] = &[".git"];

/// Reads every regular file under a directory into a [`FileTree`].
///
/// Paths in the tree are relative to the root. Symlinks are followed;
/// directories themselves are not entries. `.git` is always skipped.
#[derive(Clone, Debug)]
pub struct TreeReader {
    root: Utf8PathBuf,
    exclude: Vec<PathPattern>,
    skip_dirs: Vec<Utf8PathBuf>,
}

impl TreeReader {
    /// Creates a reader for the directory at `root`.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        TreeReader {
            root: root.into(),
            exclude: Vec::new(),
            skip_dirs: Vec::new(),
        }
    }

    /// Skips files whose relative path matches any of `patterns`.
    pub fn exclude(
        mut self,
        patterns: impl IntoIterator<Item = PathPattern>,
    ) -> Self {
        self.exclude.extend(patterns);
        self
    }

    /// Skips the directory `dir` if it lies inside the root.
    ///
    /// `dir` is resolved against the filesystem when the tree is read, so
    /// `out` and `./gen/../out` name the same directory. A `dir` that does
    /// not exist, or that is outside the root, has no effect.
    pub fn skip_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.skip_dirs.push(dir.into());
        self
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Reads the tree.
    ///
    /// Returns an error if the root is missing or not a directory, or if
    /// any file under it cannot be read. A tree is never returned partially
    /// read.
    pub fn read(&self) -> Result<FileTree, ReadTreeError> {
        self.check_root()?;

        let skipped = self.nested_skip_dirs();
        let mut tree = FileTree::new();
        let walk = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_skipped(entry, &skipped));
        for entry in walk {
            let entry = entry.map_err(|source| ReadTreeError::Walk {
                root: self.root.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = Utf8Path::from_path(entry.path()).ok_or_else(|| {
                ReadTreeError::NonUtf8Path { path: entry.path().to_owned() }
            })?;
            let relative = path
                .strip_prefix(&self.root)
                .expect("walkdir yields paths under its root");
            if self.exclude.iter().any(|pattern| pattern.matches(relative)) {
                trace!(path = %relative, "excluded");
                continue;
            }

            let contents = fs::read(path).map_err(|error| {
                ReadTreeError::ReadFile { path: path.to_owned(), error }
            })?;
            tree.insert(relative, contents).map_err(|error| {
                ReadTreeError::InvalidPath { path: relative.to_owned(), error }
            })?;
        }

        debug!(root = %self.root, files = tree.len(), "read tree");
        Ok(tree)
    }

    /// Returns the skipped directories that lie strictly inside the root,
    /// relative to it.
    fn nested_skip_dirs(&self) -> Vec<Utf8PathBuf> {
        let Some(root) = canonicalize(&self.root) else {
            return Vec::new();
        };
        self.skip_dirs
            .iter()
            .filter_map(|dir| {
                let dir = canonicalize(dir)?;
                let relative = dir.strip_prefix(&root).ok()?;
                (!relative.as_str().is_empty()).then(|| relative.to_owned())
            })
            .collect()
    }

    fn is_skipped(&self, entry: &DirEntry, skipped: &[Utf8PathBuf]) -> bool {
        if entry.depth() == 0 {
            return false;
        }
        let name = entry.file_name();
        if VCS_NAMES.iter().any(|vcs| name == *vcs) {
            trace!(path = %entry.path().display(), "skipped VCS metadata");
            return true;
        }
        let Ok(relative) = entry.path().strip_prefix(&self.root) else {
            return false;
        };
        let skip = entry.file_type().is_dir()
            && skipped.iter().any(|dir| dir.as_std_path() == relative);
        if skip {
            trace!(path = %relative.display(), "skipped nested directory");
        }
        skip
    }

    fn check_root(&self) -> Result<(), ReadTreeError> {
        // A missing root and a root that is a file get their own errors;
        // anything else (permission denied) is passed through.
        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => {
                Err(ReadTreeError::NotADirectory { root: self.root.clone() })
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(ReadTreeError::RootNotFound { root: self.root.clone() })
            }
            Err(source) => {
                Err(ReadTreeError::Root { root: self.root.clone(), source })
            }
        }
    }
}

/// Resolves `path` to an absolute path with symlinks followed, or `None` if
/// it does not exist or is not UTF-8.
fn canonicalize(path: &Utf8Path) -> Option<Utf8PathBuf> {
    let path = fs::canonicalize(path).ok()?;
    Utf8PathBuf::from_path_buf(path).ok()
}

/// Reads every regular file under `root` into a [`FileTree`].
///
/// Shorthand for `TreeReader::new(root).read()`.
pub fn read_tree(
    root: impl Into<Utf8PathBuf>,
) -> Result<FileTree, ReadTreeError> {
    TreeReader::new(root).read()
}
