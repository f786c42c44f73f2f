// Copyright 2026 Oxide Computer Company

//! Path patterns used to select merge rules.

use crate::PatternError;
use camino::Utf8Path;
use glob::{MatchOptions, Pattern};
use std::{fmt, str::FromStr};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A glob pattern matched against tree paths.
///
/// A pattern containing `/` is matched against the whole relative path,
/// where `*` stops at separators and `**` crosses them. A pattern without
/// `/` is matched against the file name alone, so `*.gemspec` selects
/// gemspecs at any depth.
///
/// # Examples
///
/// ```
/// use synth_merge::PathPattern;
///
/// let by_name: PathPattern = "version.rb".parse().unwrap();
/// assert!(by_name.matches("lib/google/cloud/network_management/version.rb"));
///
/// let by_path: PathPattern = "lib/*.rb".parse().unwrap();
/// assert!(by_path.matches("lib/client.rb"));
/// assert!(!by_path.matches("lib/google/client.rb"));
/// ```
#[derive(Clone, Debug)]
pub struct PathPattern {
    source: String,
    pattern: Pattern,
    file_name_only: bool,
}

impl PathPattern {
    /// Compiles a pattern.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let compiled = Pattern::new(pattern).map_err(|error| {
            PatternError::InvalidGlob { pattern: pattern.to_owned(), error }
        })?;
        Ok(PathPattern {
            source: pattern.to_owned(),
            pattern: compiled,
            file_name_only: !pattern.contains('/'),
        })
    }

    /// Returns the pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if `path` is selected by this pattern.
    pub fn matches(&self, path: impl AsRef<Utf8Path>) -> bool {
        let path = path.as_ref();
        if self.file_name_only {
            path.file_name()
                .is_some_and(|name| self.pattern.matches_with(name, MATCH_OPTIONS))
        } else {
            self.pattern.matches_with(path.as_str(), MATCH_OPTIONS)
        }
    }
}

impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for PathPattern {}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for PathPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PathPattern::new(s)
    }
}
