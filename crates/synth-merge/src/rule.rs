// Copyright 2026 Oxide Computer Company

//! Merge rules and ordered rule tables.

use crate::{MergeError, PathPattern, PatternError};
use camino::Utf8Path;
use regex::bytes::{Regex, RegexBuilder};
use std::fmt;

/// How a generated file and an override file combine when both exist.
#[derive(Clone, Debug)]
pub enum MergeRule {
    /// Use the override contents.
    ReplaceWithOverride,
    /// Use the generated contents.
    KeepGenerated,
    /// Emit the generated contents, then `marker`, then the override
    /// contents.
    ConcatenateWithMarker {
        /// Bytes placed between the two halves.
        marker: String,
    },
    /// Rewrite part of the generated contents using the override.
    CustomTextMerge(TextMerge),
}

impl MergeRule {
    /// Returns the kind of this rule, for reporting.
    pub fn kind(&self) -> RuleKind {
        match self {
            MergeRule::ReplaceWithOverride => RuleKind::ReplaceWithOverride,
            MergeRule::KeepGenerated => RuleKind::KeepGenerated,
            MergeRule::ConcatenateWithMarker { .. } => {
                RuleKind::ConcatenateWithMarker
            }
            MergeRule::CustomTextMerge(_) => RuleKind::CustomTextMerge,
        }
    }

    /// Combines `generated` and `overrides` for the file at `path`.
    ///
    /// `path` is only used for error reporting.
    pub fn apply(
        &self,
        path: &Utf8Path,
        generated: &[u8],
        overrides: &[u8],
    ) -> Result<Vec<u8>, MergeError> {
        match self {
            MergeRule::ReplaceWithOverride => Ok(overrides.to_vec()),
            MergeRule::KeepGenerated => Ok(generated.to_vec()),
            MergeRule::ConcatenateWithMarker { marker } => {
                let mut out = Vec::with_capacity(
                    generated.len() + marker.len() + overrides.len(),
                );
                out.extend_from_slice(generated);
                out.extend_from_slice(marker.as_bytes());
                out.extend_from_slice(overrides);
                Ok(out)
            }
            MergeRule::CustomTextMerge(merge) => {
                merge.apply(path, generated, overrides)
            }
        }
    }
}

/// A text-level merge anchored in the generated contents.
#[derive(Clone, Debug)]
pub enum TextMerge {
    /// Replaces everything between the first `begin` marker and the next
    /// `end` marker in the generated contents with the override contents.
    /// The markers themselves are kept.
    ReplaceMarkedBlock {
        /// Opening marker.
        begin: String,
        /// Closing marker, searched for after `begin`.
        end: String,
    },
    /// Carries hand-edited lines over from the override.
    ///
    /// For each pattern that matches in the override, the first match in
    /// the generated contents is replaced with the override's first match.
    /// Patterns that do not match the override are skipped.
    PreserveLines(Vec<LinePattern>),
}

impl TextMerge {
    /// Shorthand for [`TextMerge::ReplaceMarkedBlock`].
    pub fn marked_block(
        begin: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        TextMerge::ReplaceMarkedBlock { begin: begin.into(), end: end.into() }
    }

    /// Compiles `patterns` into a [`TextMerge::PreserveLines`].
    pub fn preserve_lines<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| LinePattern::new(p.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(TextMerge::PreserveLines(patterns))
    }

    fn apply(
        &self,
        path: &Utf8Path,
        generated: &[u8],
        overrides: &[u8],
    ) -> Result<Vec<u8>, MergeError> {
        match self {
            TextMerge::ReplaceMarkedBlock { begin, end } => {
                let conflict = |anchor: &str| MergeError::Conflict {
                    path: path.to_owned(),
                    anchor: anchor.to_owned(),
                };
                let start = find(generated, begin.as_bytes())
                    .ok_or_else(|| conflict(begin.as_str()))?
                    + begin.len();
                let stop = find(&generated[start..], end.as_bytes())
                    .ok_or_else(|| conflict(end.as_str()))?
                    + start;

                let mut out = Vec::with_capacity(
                    generated.len() - (stop - start) + overrides.len(),
                );
                out.extend_from_slice(&generated[..start]);
                out.extend_from_slice(overrides);
                out.extend_from_slice(&generated[stop..]);
                Ok(out)
            }
            TextMerge::PreserveLines(patterns) => {
                let mut merged = generated.to_vec();
                for pattern in patterns {
                    let Some(keep) = pattern.regex.find(overrides) else {
                        continue;
                    };
                    let range = match pattern.regex.find(&merged) {
                        Some(found) => found.range(),
                        None => {
                            return Err(MergeError::Conflict {
                                path: path.to_owned(),
                                anchor: pattern.as_str().to_owned(),
                            });
                        }
                    };
                    merged.splice(range, keep.as_bytes().iter().copied());
                }
                Ok(merged)
            }
        }
    }
}

/// Returns the offset of the first occurrence of `needle` in `haystack`.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// A regular expression selecting a line to preserve.
///
/// Compiled in multi-line mode, so `^` and `$` match at line boundaries.
#[derive(Clone, Debug)]
pub struct LinePattern {
    regex: Regex,
}

impl LinePattern {
    /// Compiles a line pattern.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex =
            RegexBuilder::new(pattern).multi_line(true).build().map_err(
                |error| PatternError::InvalidRegex {
                    pattern: pattern.to_owned(),
                    error,
                },
            )?;
        Ok(LinePattern { regex })
    }

    /// Returns the pattern as written.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// The kind of rule applied to a path, as recorded in a
/// [`MergeDecision`](crate::MergeDecision).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// The override contents were used.
    ReplaceWithOverride,
    /// The generated contents were used.
    KeepGenerated,
    /// Generated and override contents were joined by a marker.
    ConcatenateWithMarker,
    /// A text merge rewrote part of the generated contents.
    CustomTextMerge,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleKind::ReplaceWithOverride => "replace-with-override",
            RuleKind::KeepGenerated => "keep-generated",
            RuleKind::ConcatenateWithMarker => "concatenate-with-marker",
            RuleKind::CustomTextMerge => "custom-text-merge",
        };
        f.pad(name)
    }
}

/// An ordered list of `(pattern, rule)` pairs. The first matching pattern
/// wins.
#[derive(Clone, Debug, Default)]
pub struct RuleTable {
    rules: Vec<(PathPattern, MergeRule)>,
}

impl RuleTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule, returning the table.
    pub fn with_rule(mut self, pattern: PathPattern, rule: MergeRule) -> Self {
        self.push(pattern, rule);
        self
    }

    /// Appends a rule. It has lower priority than every rule already in
    /// the table.
    pub fn push(&mut self, pattern: PathPattern, rule: MergeRule) {
        self.rules.push((pattern, rule));
    }

    /// Appends all rules from `other`, after the existing ones.
    pub fn extend(&mut self, other: RuleTable) {
        self.rules.extend(other.rules);
    }

    /// Returns the index and rule of the first pattern matching `path`.
    pub fn find(&self, path: &Utf8Path) -> Option<(usize, &MergeRule)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, (pattern, _))| pattern.matches(path))
            .map(|(index, (_, rule))| (index, rule))
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over the rules in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (&PathPattern, &MergeRule)> {
        self.rules.iter().map(|(pattern, rule)| (pattern, rule))
    }
}
