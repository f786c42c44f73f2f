// Copyright 2026 Oxide Computer Company

//! In-memory file trees.

use crate::TreePathError;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;

/// A set of files keyed by their path relative to the tree root.
///
/// # Invariants
///
/// - Every path is non-empty.
/// - Paths use forward slashes (backslashes are normalized on insertion).
/// - Every path component is a normal file or directory name (no `..`,
///   `.`, root `/`, or Windows prefixes).
///
/// Iteration is in lexicographic path order, so anything derived from a
/// tree (merged output, decision lists) is deterministic.
///
/// # Examples
///
/// ```
/// use synth_merge::FileTree;
///
/// let mut tree = FileTree::new();
/// tree.insert("lib\\client.rb", "module Client; end\n").unwrap();
///
/// assert_eq!(tree.get("lib/client.rb"), Some(&b"module Client; end\n"[..]));
/// assert!(tree.insert("../escape.rb", "").is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileTree {
    files: BTreeMap<Utf8PathBuf, Vec<u8>>,
}

impl FileTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree from `(path, contents)` pairs.
    ///
    /// Later entries replace earlier ones with the same normalized path.
    pub fn from_entries<I, P, C>(entries: I) -> Result<Self, TreePathError>
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<Utf8Path>,
        C: Into<Vec<u8>>,
    {
        let mut tree = FileTree::new();
        for (path, contents) in entries {
            tree.insert(path, contents)?;
        }
        Ok(tree)
    }

    /// Inserts a file, returning the previous contents at that path.
    ///
    /// Returns an error if the path is empty or contains anything other
    /// than plain file and directory names.
    pub fn insert(
        &mut self,
        path: impl AsRef<Utf8Path>,
        contents: impl Into<Vec<u8>>,
    ) -> Result<Option<Vec<u8>>, TreePathError> {
        let path = normalize(path.as_ref())?;
        Ok(self.files.insert(path, contents.into()))
    }

    /// Inserts a file whose path has already been validated.
    pub(crate) fn insert_normalized(
        &mut self,
        path: Utf8PathBuf,
        contents: Vec<u8>,
    ) {
        self.files.insert(path, contents);
    }

    /// Returns the contents of the file at `path`, if any.
    pub fn get(&self, path: impl AsRef<Utf8Path>) -> Option<&[u8]> {
        let path = normalize(path.as_ref()).ok()?;
        self.files.get(&path).map(Vec::as_slice)
    }

    /// Returns true if the tree contains a file at `path`.
    pub fn contains(&self, path: impl AsRef<Utf8Path>) -> bool {
        self.get(path).is_some()
    }

    /// Returns the number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if the tree has no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterates over paths in lexicographic order.
    pub fn paths(&self) -> impl Iterator<Item = &Utf8Path> {
        self.files.keys().map(Utf8PathBuf::as_path)
    }

    /// Iterates over `(path, contents)` pairs in lexicographic path order.
    pub fn iter(&self) -> impl Iterator<Item = (&Utf8Path, &[u8])> {
        self.files
            .iter()
            .map(|(path, contents)| (path.as_path(), contents.as_slice()))
    }
}

/// Normalizes a tree path to forward slashes and rejects anything that
/// could escape the tree root.
fn normalize(path: &Utf8Path) -> Result<Utf8PathBuf, TreePathError> {
    let raw = path.as_str().replace('\\', "/");
    if raw.is_empty() {
        return Err(TreePathError::Empty);
    }
    let path = Utf8PathBuf::from(raw);

    let mut names = Vec::new();
    for component in path.components() {
        match component {
            Utf8Component::Normal(name) => names.push(name),
            Utf8Component::Prefix(_)
            | Utf8Component::RootDir
            | Utf8Component::CurDir
            | Utf8Component::ParentDir => {
                return Err(TreePathError::InvalidComponent {
                    path: path.clone(),
                    component: component.as_str().to_owned(),
                });
            }
        }
    }

    // Re-joining drops repeated and trailing separators.
    Ok(Utf8PathBuf::from(names.join("/")))
}
