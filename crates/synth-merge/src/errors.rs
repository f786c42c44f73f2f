// Copyright 2026 Oxide Computer Company

//! Error types for tree construction, rule compilation and merging.

use camino::Utf8PathBuf;
use thiserror::Error;

/// An error that occurs while adding a path to a
/// [`FileTree`](crate::FileTree).
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum TreePathError {
    /// The path was empty.
    #[error("tree path is empty")]
    Empty,

    /// The path would escape the tree or is anchored somewhere, e.g. it is
    /// absolute or has a `..` segment.
    #[error(
        "tree path {path:?} has component {component:?}; \
         tree paths must be relative and made of plain names"
    )]
    InvalidComponent {
        /// The rejected path.
        path: Utf8PathBuf,
        /// The offending segment as written.
        component: String,
    },
}

/// An error that occurs while compiling a path or line pattern.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PatternError {
    /// The glob used as a path pattern is malformed.
    #[error("invalid path pattern {pattern:?}")]
    InvalidGlob {
        /// The pattern as written.
        pattern: String,
        /// The underlying glob error.
        #[source]
        error: glob::PatternError,
    },

    /// The regular expression used to select preserved lines is malformed.
    #[error("invalid line pattern {pattern:?}")]
    InvalidRegex {
        /// The pattern as written.
        pattern: String,
        /// The underlying regex error.
        #[source]
        error: regex::Error,
    },
}

/// An error that occurs while parsing a [`Preset`](crate::Preset) name.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum PresetParseError {
    /// No preset with this name exists.
    #[error("unknown preset {0:?} (expected one of: ruby)")]
    Unknown(String),
}

/// An error that aborts a merge.
///
/// A merge either produces a complete result or fails with one of these;
/// it never returns a partially merged tree.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum MergeError {
    /// A custom text merge could not find its anchor in the generated
    /// content.
    #[error("merge conflict in {path}: anchor {anchor:?} not found in generated content")]
    Conflict {
        /// The path being merged.
        path: Utf8PathBuf,
        /// The marker or line pattern that was not found.
        anchor: String,
    },

    /// One output path is a file and another output path lies beneath it,
    /// so the merged tree cannot be written to disk.
    #[error("{path} lies under {file}, which is also a merged file")]
    PathCollision {
        /// The path that is a file in the merged tree.
        file: Utf8PathBuf,
        /// The first path found beneath it.
        path: Utf8PathBuf,
    },
}
