// Copyright 2026 Oxide Computer Company

//! Command-line arguments.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser};
use synth_merge::Preset;

/// Merge a generated client library with hand-written overrides.
///
/// Files present in both trees are combined by the first matching rule from
/// the configuration (then the preset); files in only one tree are copied
/// as is.
#[derive(Debug, Parser)]
#[command(name = "synth-merge", version)]
pub(crate) struct Cli {
    /// Directory containing the generator's output.
    #[arg(long, value_name = "DIR")]
    pub(crate) generated: Utf8PathBuf,

    /// Directory containing hand-maintained files.
    #[arg(long, value_name = "DIR")]
    pub(crate) overrides: Utf8PathBuf,

    /// Directory to write the merged package to.
    #[arg(long, value_name = "DIR")]
    pub(crate) output: Utf8PathBuf,

    /// Path to a synth.toml with generator settings and merge rules.
    #[arg(long, value_name = "FILE")]
    pub(crate) config: Option<Utf8PathBuf>,

    /// Built-in rules appended after the configured ones.
    #[arg(long, value_name = "NAME")]
    pub(crate) preset: Option<Preset>,

    /// Report decisions without writing anything.
    #[arg(long)]
    pub(crate) dry_run: bool,

    /// Increase log verbosity (-v, -vv, -vvv). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub(crate) verbose: u8,
}
