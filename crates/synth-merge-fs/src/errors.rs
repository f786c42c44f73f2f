// Copyright 2026 Oxide Computer Company

//! Error types for reading trees, writing trees and loading configuration.

use camino::Utf8PathBuf;
use std::{io, path::PathBuf};
use synth_merge::{PatternError, PresetParseError, TreePathError};
use thiserror::Error;

// ---- Reading ----

/// An error that occurs while reading a tree from a directory.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReadTreeError {
    /// The tree root does not exist.
    #[error("tree root {root} does not exist")]
    RootNotFound {
        /// The root that was provided.
        root: Utf8PathBuf,
    },

    /// The tree root is not a directory.
    #[error("tree root {root} is not a directory")]
    NotADirectory {
        /// The root that was provided.
        root: Utf8PathBuf,
    },

    /// An I/O error occurred while probing the tree root.
    #[error("I/O error while checking tree root {root}")]
    Root {
        /// The root that was provided.
        root: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Walking the directory failed.
    #[error("failed to walk {root}")]
    Walk {
        /// The tree root being walked.
        root: Utf8PathBuf,
        /// The underlying walk error.
        #[source]
        source: walkdir::Error,
    },

    /// A file path is not valid UTF-8.
    #[error("path is not valid UTF-8: {path:?}")]
    NonUtf8Path {
        /// The offending path.
        path: PathBuf,
    },

    /// A file path could not be used as a tree path.
    #[error("invalid tree path {path}")]
    InvalidPath {
        /// The path relative to the tree root.
        path: Utf8PathBuf,
        /// Details about the validation failure.
        #[source]
        error: TreePathError,
    },

    /// Reading a file failed.
    #[error("failed to read {path}")]
    ReadFile {
        /// The file that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },
}

// ---- Writing ----

/// An error that occurs while writing a tree to a directory.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteTreeError {
    /// Failed to create an output directory.
    #[error("failed to create output directory {path}")]
    CreateDir {
        /// The directory path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// Failed to write an output file.
    #[error("failed to write merged file to {path}")]
    WriteFile {
        /// The path where the write failed.
        path: Utf8PathBuf,
        /// The underlying write error.
        #[source]
        error: AtomicWriteError,
    },
}

/// An error that occurred during an atomic file write.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AtomicWriteError {
    /// Writing contents to the temporary file failed.
    #[error("writing file contents failed")]
    Write(#[source] io::Error),

    /// The atomic write infrastructure failed (e.g., creating the
    /// temporary file, or renaming it into place).
    #[error("atomic create or rename failed")]
    Rename(#[source] io::Error),
}

// ---- Configuration ----

/// An error that occurs while loading a `synth.toml` configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read configuration {path}")]
    Read {
        /// The configuration file path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// The configuration is not valid TOML or has the wrong shape.
    #[error("failed to parse configuration {path}")]
    Parse {
        /// The configuration file path.
        path: Utf8PathBuf,
        /// The underlying TOML error.
        #[source]
        error: toml::de::Error,
    },

    /// The named preset does not exist.
    #[error("invalid merge preset")]
    Preset(#[from] PresetParseError),

    /// A rule is missing a field its strategy requires.
    #[error(
        "merge rule {index} ({pattern:?}) uses strategy {strategy} \
         but does not set `{field}`"
    )]
    MissingField {
        /// Position of the rule in the configuration.
        index: usize,
        /// The rule's path pattern.
        pattern: String,
        /// The rule's strategy.
        strategy: &'static str,
        /// The missing field.
        field: &'static str,
    },

    /// A rule has an invalid path or line pattern.
    #[error("merge rule {index} has an invalid pattern")]
    InvalidRule {
        /// Position of the rule in the configuration.
        index: usize,
        /// The underlying pattern error.
        #[source]
        error: PatternError,
    },

    /// An exclude entry is not a valid path pattern.
    #[error("invalid exclude pattern")]
    InvalidExclude(#[source] PatternError),
}
