// Copyright 2026 Oxide Computer Company

//! `synth.toml` configuration.

use crate::ConfigError;
use camino::Utf8Path;
use fs_err as fs;
use serde::Deserialize;
use std::{collections::BTreeMap, str::FromStr};
use synth_merge::{MergeRule, PathPattern, Preset, RuleTable, TextMerge};

/// The contents of a `synth.toml` file.
///
/// # Examples
///
/// ```
/// use synth_merge_fs::SynthConfig;
///
/// let config: SynthConfig = r#"
/// [library]
/// api = "networkmanagement"
/// version = "v1"
///
/// [merge]
/// preset = "ruby"
///
/// [[merge.rule]]
/// pattern = "README.md"
/// strategy = "replace-marked-block"
/// begin = "<!--BEGIN-->"
/// end = "<!--END-->"
/// "#
/// .parse()
/// .unwrap();
///
/// let rules = config.rule_table().unwrap();
/// // One explicit rule followed by the four rules of the ruby preset.
/// assert_eq!(rules.len(), 5);
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SynthConfig {
    /// Configuration for the external generator.
    #[serde(default)]
    pub library: Option<LibraryConfig>,
    /// How generated and hand-written files are merged.
    #[serde(default)]
    pub merge: MergeConfig,
}

/// Configuration for the external generator that produced the generated
/// tree.
///
/// These values are carried for logging and are never interpreted by the
/// merge.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LibraryConfig {
    /// The API identifier, e.g. `networkmanagement`.
    pub api: String,
    /// The API version, e.g. `v1`.
    pub version: String,
    /// Path to the API's proto definitions.
    #[serde(default)]
    pub proto_path: Option<String>,
    /// Free-form generator arguments (gem name, title, description, product
    /// URL and so on).
    #[serde(default)]
    pub generator_args: BTreeMap<String, String>,
}

/// The `[merge]` table.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MergeConfig {
    /// A built-in rule table consulted after the explicit rules.
    #[serde(default)]
    pub preset: Option<String>,
    /// Path patterns skipped when reading input trees.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Explicit rules, highest priority first.
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleConfig>,
}

/// One `[[merge.rule]]` entry.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RuleConfig {
    /// The path pattern selecting files.
    pub pattern: String,
    /// How matching files are merged.
    pub strategy: Strategy,
    /// Separator for `concatenate-with-marker`.
    #[serde(default)]
    pub marker: Option<String>,
    /// Opening marker for `replace-marked-block`.
    #[serde(default)]
    pub begin: Option<String>,
    /// Closing marker for `replace-marked-block`.
    #[serde(default)]
    pub end: Option<String>,
    /// Line patterns for `preserve-lines`.
    #[serde(default)]
    pub patterns: Option<Vec<String>>,
}

/// The `strategy` of a rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// [`MergeRule::ReplaceWithOverride`].
    ReplaceWithOverride,
    /// [`MergeRule::KeepGenerated`].
    KeepGenerated,
    /// [`MergeRule::ConcatenateWithMarker`].
    ConcatenateWithMarker,
    /// [`TextMerge::ReplaceMarkedBlock`].
    ReplaceMarkedBlock,
    /// [`TextMerge::PreserveLines`].
    PreserveLines,
}

impl Strategy {
    fn as_str(self) -> &'static str {
        match self {
            Strategy::ReplaceWithOverride => "replace-with-override",
            Strategy::KeepGenerated => "keep-generated",
            Strategy::ConcatenateWithMarker => "concatenate-with-marker",
            Strategy::ReplaceMarkedBlock => "replace-marked-block",
            Strategy::PreserveLines => "preserve-lines",
        }
    }
}

impl SynthConfig {
    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|error| {
            ConfigError::Read { path: path.to_owned(), error }
        })?;
        contents
            .parse()
            .map_err(|error| ConfigError::Parse { path: path.to_owned(), error })
    }

    /// Builds the rule table: explicit rules in order, then the preset's
    /// rules, if any.
    pub fn rule_table(&self) -> Result<RuleTable, ConfigError> {
        let mut table = RuleTable::new();
        for (index, rule) in self.merge.rules.iter().enumerate() {
            let (pattern, rule) = rule.compile(index)?;
            table.push(pattern, rule);
        }
        if let Some(preset) = &self.merge.preset {
            let preset: Preset = preset.parse()?;
            table.extend(preset.rules());
        }
        Ok(table)
    }

    /// Compiles the exclude patterns.
    pub fn exclude_patterns(&self) -> Result<Vec<PathPattern>, ConfigError> {
        self.merge
            .exclude
            .iter()
            .map(|p| PathPattern::new(p).map_err(ConfigError::InvalidExclude))
            .collect()
    }
}

impl FromStr for SynthConfig {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

impl RuleConfig {
    fn compile(
        &self,
        index: usize,
    ) -> Result<(PathPattern, MergeRule), ConfigError> {
        let invalid = |error| ConfigError::InvalidRule { index, error };
        let missing = |field| ConfigError::MissingField {
            index,
            pattern: self.pattern.clone(),
            strategy: self.strategy.as_str(),
            field,
        };

        let pattern = PathPattern::new(&self.pattern).map_err(invalid)?;
        let rule = match self.strategy {
            Strategy::ReplaceWithOverride => MergeRule::ReplaceWithOverride,
            Strategy::KeepGenerated => MergeRule::KeepGenerated,
            Strategy::ConcatenateWithMarker => {
                let marker = self.marker.clone().ok_or_else(|| missing("marker"))?;
                MergeRule::ConcatenateWithMarker { marker }
            }
            Strategy::ReplaceMarkedBlock => {
                let begin = self.begin.clone().ok_or_else(|| missing("begin"))?;
                let end = self.end.clone().ok_or_else(|| missing("end"))?;
                MergeRule::CustomTextMerge(TextMerge::marked_block(begin, end))
            }
            Strategy::PreserveLines => {
                let patterns =
                    self.patterns.as_ref().ok_or_else(|| missing("patterns"))?;
                MergeRule::CustomTextMerge(
                    TextMerge::preserve_lines(patterns).map_err(invalid)?,
                )
            }
        };
        Ok((pattern, rule))
    }
}
