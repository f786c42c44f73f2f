// Copyright 2026 Oxide Computer Company

//! The merge engine.

use crate::{FileTree, MergeError, MergeRule, RuleKind, RuleTable};
use camino::{Utf8Path, Utf8PathBuf};
use std::{
    collections::{BTreeMap, btree_map::Entry},
    fmt,
};
use tracing::debug;

/// Which input trees contained a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sources {
    /// Only the generated tree.
    Generated,
    /// Only the override tree.
    Override,
    /// Both trees.
    Both,
}

impl fmt::Display for Sources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sources::Generated => "generated",
            Sources::Override => "override",
            Sources::Both => "both",
        };
        f.pad(name)
    }
}

/// The record of how one output path was produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeDecision {
    path: Utf8PathBuf,
    sources: Sources,
    rule: RuleKind,
    rule_index: Option<usize>,
}

impl MergeDecision {
    /// Returns the path this decision is about.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns which input trees contained the path.
    pub fn sources(&self) -> Sources {
        self.sources
    }

    /// Returns the kind of rule that produced the output contents.
    pub fn rule(&self) -> RuleKind {
        self.rule
    }

    /// Returns the index of the matching rule in the [`RuleTable`].
    ///
    /// This is `None` if the path was only in one tree, or if it was in
    /// both and no rule matched (so the default applied).
    pub fn rule_index(&self) -> Option<usize> {
        self.rule_index
    }
}

impl fmt::Display for MergeDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<9} {:<23} {}", self.sources, self.rule, self.path)?;
        if let Some(index) = self.rule_index {
            write!(f, " (rule {index})")?;
        }
        Ok(())
    }
}

/// The output of a merge: the merged tree plus one decision per path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeResult {
    tree: FileTree,
    decisions: Vec<MergeDecision>,
}

impl MergeResult {
    /// Returns the merged tree.
    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    /// Consumes the result, returning the merged tree.
    pub fn into_tree(self) -> FileTree {
        self.tree
    }

    /// Returns the decisions, in path order.
    pub fn decisions(&self) -> &[MergeDecision] {
        &self.decisions
    }

    /// Returns the decision for `path`, if it is in the output.
    pub fn decision(&self, path: impl AsRef<Utf8Path>) -> Option<&MergeDecision> {
        let path = path.as_ref();
        self.decisions
            .binary_search_by(|d| d.path.as_path().cmp(path))
            .ok()
            .map(|index| &self.decisions[index])
    }
}

/// Merges generated trees with override trees according to a
/// [`RuleTable`].
///
/// For each path in either tree:
///
/// - If the path is only in one tree, its contents pass through unchanged.
/// - If it is in both, the first rule whose pattern matches decides the
///   contents. With no matching rule, the override wins.
#[derive(Clone, Debug, Default)]
pub struct MergeEngine {
    rules: RuleTable,
}

impl MergeEngine {
    /// Creates an engine with the given rules.
    pub fn new(rules: RuleTable) -> Self {
        MergeEngine { rules }
    }

    /// Returns the rules used by this engine.
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Merges `generated` with `overrides`. Neither input is modified.
    ///
    /// Returns an error, and no partial result, if any custom text merge
    /// cannot find its anchor or if one output file would sit beneath
    /// another.
    pub fn merge(
        &self,
        generated: &FileTree,
        overrides: &FileTree,
    ) -> Result<MergeResult, MergeError> {
        merge(generated, overrides, &self.rules)
    }
}

/// The contents available for one path.
#[derive(Clone, Copy)]
enum Inputs<'a> {
    Generated(&'a [u8]),
    Override(&'a [u8]),
    Both(&'a [u8], &'a [u8]),
}

/// Merges `generated` with `overrides` using `rules`.
///
/// This is what [`MergeEngine::merge`] calls.
pub fn merge(
    generated: &FileTree,
    overrides: &FileTree,
    rules: &RuleTable,
) -> Result<MergeResult, MergeError> {
    let mut inputs: BTreeMap<&Utf8Path, Inputs<'_>> = generated
        .iter()
        .map(|(path, contents)| (path, Inputs::Generated(contents)))
        .collect();
    for (path, contents) in overrides.iter() {
        match inputs.entry(path) {
            Entry::Vacant(entry) => {
                entry.insert(Inputs::Override(contents));
            }
            Entry::Occupied(mut entry) => {
                if let Inputs::Generated(g) = *entry.get() {
                    entry.insert(Inputs::Both(g, contents));
                }
            }
        }
    }
    check_collisions(inputs.keys().copied())?;

    let mut tree = FileTree::new();
    let mut decisions = Vec::with_capacity(inputs.len());
    for (path, input) in inputs {
        let (contents, sources, rule, rule_index) = match input {
            Inputs::Generated(g) => {
                (g.to_vec(), Sources::Generated, RuleKind::KeepGenerated, None)
            }
            Inputs::Override(o) => (
                o.to_vec(),
                Sources::Override,
                RuleKind::ReplaceWithOverride,
                None,
            ),
            Inputs::Both(g, o) => match rules.find(path) {
                Some((index, rule)) => (
                    rule.apply(path, g, o)?,
                    Sources::Both,
                    rule.kind(),
                    Some(index),
                ),
                None => (
                    MergeRule::ReplaceWithOverride.apply(path, g, o)?,
                    Sources::Both,
                    RuleKind::ReplaceWithOverride,
                    None,
                ),
            },
        };

        debug!(
            path = %path,
            sources = %sources,
            rule = %rule,
            rule_index = ?rule_index,
            "merged file"
        );
        tree.insert_normalized(path.to_owned(), contents);
        decisions.push(MergeDecision {
            path: path.to_owned(),
            sources,
            rule,
            rule_index,
        });
    }

    debug!(
        generated = generated.len(),
        overrides = overrides.len(),
        merged = tree.len(),
        "merge complete"
    );
    Ok(MergeResult { tree, decisions })
}

/// Fails if any path is a descendant of another path.
///
/// `paths` must be in path order. A file's descendants sort directly after
/// it, so checking neighbors is enough.
fn check_collisions<'a>(
    paths: impl Iterator<Item = &'a Utf8Path> + Clone,
) -> Result<(), MergeError> {
    let mut next = paths.clone();
    next.next();
    match paths.zip(next).find(|(file, path)| path.starts_with(file)) {
        Some((file, path)) => Err(MergeError::PathCollision {
            file: file.to_owned(),
            path: path.to_owned(),
        }),
        None => Ok(()),
    }
}
