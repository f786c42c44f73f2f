// Copyright 2026 Oxide Computer Company

//! Built-in rule tables for common library ecosystems.

use crate::{MergeRule, PathPattern, PresetParseError, RuleTable, TextMerge};
use std::{fmt, str::FromStr};

/// `gem.version = "x.y.z"` in a gemspec.
const GEMSPEC_VERSION: &str = r#"^\s+gem.version\s*=\s*"[\d\.]+"$"#;
/// `gem.homepage = "..."` in a gemspec.
const GEMSPEC_HOMEPAGE: &str = r#"^\s+gem.homepage\s*=\s*"[^"]+"$"#;
/// `VERSION = "x.y.z"` in a `version.rb`.
const VERSION_RB: &str = r#"^\s+VERSION = "[\d\.]+"$"#;

/// A named, built-in rule table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Preset {
    /// Ruby gems.
    ///
    /// Regeneration wins everywhere except:
    ///
    /// - `CHANGELOG.md` keeps the hand-maintained file.
    /// - `*.gemspec` keeps the hand-edited version and homepage lines.
    /// - `version.rb` keeps the hand-edited `VERSION` line.
    Ruby,
}

impl Preset {
    /// Returns the rules for this preset.
    pub fn rules(self) -> RuleTable {
        match self {
            Preset::Ruby => ruby_rules(),
        }
    }
}

fn ruby_rules() -> RuleTable {
    RuleTable::new()
        .with_rule(builtin_pattern("CHANGELOG.md"), MergeRule::ReplaceWithOverride)
        .with_rule(
            builtin_pattern("*.gemspec"),
            preserve(&[GEMSPEC_VERSION, GEMSPEC_HOMEPAGE]),
        )
        .with_rule(builtin_pattern("version.rb"), preserve(&[VERSION_RB]))
        .with_rule(builtin_pattern("**"), MergeRule::KeepGenerated)
}

// Built-in patterns are fixed and exercised by the tests below.
fn builtin_pattern(pattern: &str) -> PathPattern {
    PathPattern::new(pattern).expect("built-in path pattern is valid")
}

fn preserve(lines: &[&str]) -> MergeRule {
    MergeRule::CustomTextMerge(
        TextMerge::preserve_lines(lines)
            .expect("built-in line pattern is valid"),
    )
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preset::Ruby => f.write_str("ruby"),
        }
    }
}

impl FromStr for Preset {
    type Err = PresetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ruby" => Ok(Preset::Ruby),
            other => Err(PresetParseError::Unknown(other.to_owned())),
        }
    }
}
