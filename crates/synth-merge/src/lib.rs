// Copyright 2026 Oxide Computer Company

//! Rule-driven merging of generated file trees with hand-written
//! overrides.
//!
//! Client library synthesis regenerates most of a package from an API
//! definition, but some files are maintained by hand: release notes,
//! version numbers, README sections and the like. This crate decides, file
//! by file, how a freshly generated tree and a tree of hand-maintained
//! overrides combine.
//!
//! The policy is an explicit, ordered [`RuleTable`] of
//! `(pattern, rule)` pairs. For every path that exists in both trees, the
//! first matching rule decides the output contents; if none matches, the
//! override wins. Paths that exist in only one tree pass through untouched,
//! so no file is ever dropped. Every choice is recorded as a
//! [`MergeDecision`].
//!
//! Merging is pure: the inputs are in-memory [`FileTree`]s and the output
//! is a [`MergeResult`]. Reading and writing trees on disk is left to the
//! caller.
//!
//! # Examples
//!
//! ```
//! use synth_merge::{FileTree, MergeEngine, MergeRule, RuleTable, TextMerge};
//!
//! let generated = FileTree::from_entries([
//!     ("README.md", "X<!--BEGIN-->old<!--END-->Y"),
//!     ("lib/client.rb", "# generated\n"),
//! ])
//! .unwrap();
//! let overrides = FileTree::from_entries([("README.md", "new")]).unwrap();
//!
//! let rules = RuleTable::new().with_rule(
//!     "README.md".parse().unwrap(),
//!     MergeRule::CustomTextMerge(TextMerge::marked_block(
//!         "<!--BEGIN-->",
//!         "<!--END-->",
//!     )),
//! );
//!
//! let result = MergeEngine::new(rules).merge(&generated, &overrides).unwrap();
//! assert_eq!(
//!     result.tree().get("README.md"),
//!     Some(&b"X<!--BEGIN-->new<!--END-->Y"[..]),
//! );
//! assert_eq!(result.tree().get("lib/client.rb"), Some(&b"# generated\n"[..]));
//! assert_eq!(result.decisions().len(), 2);
//! ```
//!
//! # Related crates
//!
//! For reading trees from and writing them to directories, and for loading
//! rule tables from configuration files, see `synth-merge-fs`.

#![deny(missing_docs)]

mod engine;
mod errors;
mod pattern;
mod preset;
mod rule;
mod tree;

pub use engine::{MergeDecision, MergeEngine, MergeResult, Sources, merge};
pub use errors::{MergeError, PatternError, PresetParseError, TreePathError};
pub use pattern::PathPattern;
pub use preset::Preset;
pub use rule::{LinePattern, MergeRule, RuleKind, RuleTable, TextMerge};
pub use tree::FileTree;
