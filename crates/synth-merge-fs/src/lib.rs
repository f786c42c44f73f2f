// Copyright 2026 Oxide Computer Company

//! Directory I/O and configuration for `synth-merge`.
//!
//! [`synth_merge`] merges in-memory trees. This crate connects it to the
//! filesystem:
//!
//! - [`TreeReader`] reads a generated tree or an override tree from a
//!   directory.
//! - [`TreeWriter`] writes a merged tree to an output directory, one atomic
//!   write per file.
//! - [`SynthConfig`] loads a `synth.toml` describing the generator
//!   configuration and the merge rules.
//!
//! # Examples
//!
//! ```no_run
//! use synth_merge::MergeEngine;
//! use synth_merge_fs::{SynthConfig, TreeReader, TreeWriter};
//!
//! let config = SynthConfig::load("synth.toml").expect("config is valid");
//! let exclude = config.exclude_patterns().expect("exclude patterns are valid");
//! let rules = config.rule_table().expect("rules are valid");
//!
//! let generated = TreeReader::new("out/generated")
//!     .exclude(exclude.clone())
//!     .read()
//!     .expect("generated tree is readable");
//! let overrides = TreeReader::new(".")
//!     .exclude(exclude)
//!     .read()
//!     .expect("override tree is readable");
//!
//! let result = MergeEngine::new(rules)
//!     .merge(&generated, &overrides)
//!     .expect("merge succeeded");
//! TreeWriter::new("out/package")
//!     .write(result.tree())
//!     .expect("output written");
//! ```

#![deny(missing_docs)]

mod config;
mod errors;
mod read;
mod write;

pub use config::{LibraryConfig, MergeConfig, RuleConfig, Strategy, SynthConfig};
pub use errors::{AtomicWriteError, ConfigError, ReadTreeError, WriteTreeError};
pub use read::{TreeReader, read_tree};
pub use write::TreeWriter;
